pub mod cut_range;
pub mod cut_range_sync;
pub mod edit_error;
pub mod edit_history;
pub mod project;
pub mod project_settings;
pub mod segment_store;
pub mod word_unit;
