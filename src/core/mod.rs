// src/core/mod.rs

pub mod arg_parser;
pub mod command_line;
pub mod config_loader;
pub mod paths;
