use super::transcript::TranscriptWord;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SilenceGap {
    pub start: f64,
    pub end: f64,
}

impl SilenceGap {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Finds stretches without speech of at least `min_duration` seconds:
/// before the first word, between words, and after the last word up to
/// `total_duration`.
pub fn find_gaps(
    words: &[TranscriptWord],
    total_duration: f64,
    min_duration: f64,
) -> Vec<SilenceGap> {
    let mut ordered: Vec<&TranscriptWord> = words.iter().collect();
    ordered.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut gaps = Vec::new();
    let mut speech_end = 0.0_f64;

    for word in ordered {
        if word.start - speech_end >= min_duration {
            gaps.push(SilenceGap {
                start: speech_end,
                end: word.start,
            });
        }
        speech_end = speech_end.max(word.end);
    }

    if total_duration - speech_end >= min_duration {
        gaps.push(SilenceGap {
            start: speech_end,
            end: total_duration,
        });
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn word(start: f64, end: f64) -> TranscriptWord {
        TranscriptWord {
            text: "w".to_string(),
            start,
            end,
            confidence: 0.9,
        }
    }

    #[test]
    fn test_no_words_is_one_long_gap() {
        let gaps = find_gaps(&[], 3.0, 0.5);
        assert_eq!(gaps, vec![SilenceGap { start: 0.0, end: 3.0 }]);
    }

    #[test]
    fn test_short_gaps_ignored() {
        let words = vec![word(0.1, 0.5), word(0.8, 1.2)];
        assert!(find_gaps(&words, 1.4, 0.5).is_empty());
    }

    #[test]
    fn test_leading_inner_and_trailing_gaps() {
        let words = vec![word(1.0, 1.5), word(2.5, 3.0)];
        let gaps = find_gaps(&words, 4.0, 0.5);
        assert_eq!(gaps.len(), 3);
        assert_relative_eq!(gaps[0].start, 0.0);
        assert_relative_eq!(gaps[0].end, 1.0);
        assert_relative_eq!(gaps[1].start, 1.5);
        assert_relative_eq!(gaps[1].end, 2.5);
        assert_relative_eq!(gaps[2].start, 3.0);
        assert_relative_eq!(gaps[2].end, 4.0);
    }

    #[test]
    fn test_gap_at_exact_threshold_included() {
        let words = vec![word(0.0, 1.0), word(1.5, 2.0)];
        let gaps = find_gaps(&words, 2.0, 0.5);
        assert_eq!(gaps.len(), 1);
        assert_relative_eq!(gaps[0].duration(), 0.5);
    }

    #[test]
    fn test_overlapping_words_do_not_create_gap() {
        // Second word ends before the first; speech end must not move back
        let words = vec![word(0.0, 2.0), word(0.5, 1.0), word(2.2, 3.0)];
        assert!(find_gaps(&words, 3.0, 0.5).is_empty());
    }

    #[test]
    fn test_unsorted_input() {
        let words = vec![word(3.0, 3.5), word(0.0, 1.0)];
        let gaps = find_gaps(&words, 3.5, 0.5);
        assert_eq!(gaps, vec![SilenceGap { start: 1.0, end: 3.0 }]);
    }
}
