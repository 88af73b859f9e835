#![deny(clippy::print_stdout)]

pub mod assets;
pub mod chemistry;
pub mod codec;
pub mod command_line;
pub mod config;
pub mod errors;
pub mod imaging;
pub mod inference;
pub mod opsin;
pub mod rest_api;
pub mod translation;
pub mod verification;
