pub mod domain;
pub mod edit_session;
