pub mod audio_reader;
pub mod media_metadata;
pub mod media_prober;
