pub mod brief_collector;
pub mod cli;
pub mod display;
pub mod interrupt;
pub mod load_config;
pub mod prompt;
pub mod session;

pub use cli::{run, Cli, Commands};
