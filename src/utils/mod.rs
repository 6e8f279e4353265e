pub mod environment;
pub mod paths;

pub use environment::get_cursor_dir;
pub use paths::{
    common_directory, format_path_with_tilde, path_separator, project_name_from_path,
    split_segments, strip_file_uri,
};
