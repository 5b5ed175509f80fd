use std::fmt;
use std::str::FromStr;

use talkcut_core::editing::domain::cut_range::CutRange;
use talkcut_core::editing::domain::cut_range_sync::GroupToggle;
use talkcut_core::editing::domain::word_unit::UnitId;
use talkcut_core::editing::edit_session::EditSession;

/// One step of an `edit` invocation, applied in command-line order.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    Toggle(UnitId),
    ToggleGroup(Vec<UnitId>),
    Ranges(Vec<(f64, f64)>),
    DeleteSilences,
    DeleteFillers,
    RestoreAll,
    Undo,
    Redo,
}

impl FromStr for EditOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        match (name, arg) {
            ("toggle", Some(id)) if !id.is_empty() => Ok(EditOp::Toggle(UnitId::new(id))),
            ("words", Some(ids)) => {
                let ids: Vec<UnitId> = ids
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(UnitId::new)
                    .collect();
                if ids.is_empty() {
                    return Err("words: needs at least one unit id".to_string());
                }
                Ok(EditOp::ToggleGroup(ids))
            }
            ("ranges", Some(list)) => parse_ranges(list).map(EditOp::Ranges),
            ("silences", None) => Ok(EditOp::DeleteSilences),
            ("fillers", None) => Ok(EditOp::DeleteFillers),
            ("restore", None) => Ok(EditOp::RestoreAll),
            ("undo", None) => Ok(EditOp::Undo),
            ("redo", None) => Ok(EditOp::Redo),
            _ => Err(format!(
                "unrecognized edit '{s}' (expected toggle:ID, words:ID,ID, ranges:START-END,..., \
                 silences, fillers, restore, undo or redo)"
            )),
        }
    }
}

/// `1.0-2.5,3-4`; an empty list clears every range.
fn parse_ranges(list: &str) -> Result<Vec<(f64, f64)>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| {
            let (start, end) = r
                .split_once('-')
                .ok_or_else(|| format!("range '{r}' must look like START-END"))?;
            let start: f64 = start
                .trim()
                .parse()
                .map_err(|_| format!("bad range start in '{r}'"))?;
            let end: f64 = end
                .trim()
                .parse()
                .map_err(|_| format!("bad range end in '{r}'"))?;
            Ok((start, end))
        })
        .collect()
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOp::Toggle(id) => write!(f, "toggle {id}"),
            EditOp::ToggleGroup(ids) => write!(f, "toggle {} units", ids.len()),
            EditOp::Ranges(ranges) => write!(f, "set {} cut ranges", ranges.len()),
            EditOp::DeleteSilences => write!(f, "delete silences"),
            EditOp::DeleteFillers => write!(f, "delete fillers"),
            EditOp::RestoreAll => write!(f, "restore all"),
            EditOp::Undo => write!(f, "undo"),
            EditOp::Redo => write!(f, "redo"),
        }
    }
}

impl EditOp {
    /// Applies the op and describes what happened.
    pub fn apply(&self, session: &mut EditSession) -> String {
        match self {
            EditOp::Toggle(id) => match session.toggle_word(id) {
                Some(true) => format!("deleted {id}"),
                Some(false) => format!("restored {id}"),
                None => format!("no unit with id {id}"),
            },
            EditOp::ToggleGroup(ids) => match session.toggle_words(ids) {
                Some(GroupToggle::Deleted) => format!("deleted {} units", ids.len()),
                Some(GroupToggle::Restored) => format!("restored {} units", ids.len()),
                None => "no matching units".to_string(),
            },
            EditOp::Ranges(ranges) => {
                session.update_cut_ranges(
                    ranges
                        .iter()
                        .map(|&(start, end)| CutRange::new(start, end))
                        .collect(),
                );
                format!(
                    "{} ranges, {} units deleted",
                    session.project().cut_ranges.len(),
                    session.project().segments.deleted_count()
                )
            }
            EditOp::DeleteSilences => format!("deleted {} silences", session.delete_silences()),
            EditOp::DeleteFillers => format!("deleted {} fillers", session.delete_fillers()),
            EditOp::RestoreAll => {
                if session.restore_all() {
                    "restored everything".to_string()
                } else {
                    "nothing to restore".to_string()
                }
            }
            EditOp::Undo => if session.undo() { "undone" } else { "nothing to undo" }.to_string(),
            EditOp::Redo => if session.redo() { "redone" } else { "nothing to redo" }.to_string(),
        }
    }
}
