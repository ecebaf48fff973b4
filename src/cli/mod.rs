pub mod commands;
pub mod render;

pub use commands::{Cli, Commands, run};
