pub mod command_executor;
pub mod command_synthesizer;
pub mod cut_list;
pub mod export_error;
