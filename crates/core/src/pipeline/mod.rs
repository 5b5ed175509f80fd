pub mod export_project_use_case;
pub mod pipeline_logger;
pub mod transcribe_media_use_case;
