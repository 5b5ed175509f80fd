pub mod project_file;
