const ENGLISH_FILLERS: &[&str] = &[
    "uh", "um", "like", "you know", "basically", "actually", "literally", "so", "yeah", "right",
    "i mean", "kind of", "sort of", "well",
];

const CHINESE_FILLERS: &[&str] = &[
    "那个", "就是", "然后", "呃", "嗯", "这个", "什么", "对", "就", "其实", "反正", "所以", "但是",
    "可能", "应该",
];

const TRAILING_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '。', '，', '？', '！', '、', '…',
];

/// Whether `text` is a filler in the given language.
///
/// Chinese (`zh*`) uses the Chinese list; everything else uses English.
/// Matching ignores case, surrounding whitespace and trailing punctuation.
pub fn is_filler(text: &str, language: &str) -> bool {
    let cleaned = text
        .trim()
        .trim_end_matches(TRAILING_PUNCTUATION)
        .to_lowercase();
    if cleaned.is_empty() {
        return false;
    }
    let list = if language.starts_with("zh") {
        CHINESE_FILLERS
    } else {
        ENGLISH_FILLERS
    };
    list.contains(&cleaned.as_str())
}
