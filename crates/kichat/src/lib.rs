//! kichat library interface

pub mod cli;
pub mod config;
pub mod console;
pub mod services;

pub use config::Config;
pub use console::Console;
