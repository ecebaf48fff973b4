pub mod environment;
pub mod paths;
pub mod terminal;
pub mod text;
pub mod timestamps;

pub use environment::{ClaudeLayout, get_home_dir};
pub use paths::{
    display_name, encode_path, format_path_with_tilde, reconstruct_path, validate_directory_token,
};
pub use text::{clean_prompt, truncate_chars};
