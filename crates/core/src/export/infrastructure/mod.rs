pub mod ffmpeg_process_executor;
