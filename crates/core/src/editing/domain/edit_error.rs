use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("invalid setting {field}: {value} ({reason})")]
    InvalidSettings {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}
