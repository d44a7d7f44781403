// CLI module for oxiflac

pub mod commands;
pub mod config;
pub mod output;

pub use config::Config;
