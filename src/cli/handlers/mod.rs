// src/cli/handlers/mod.rs

// This module contains the logic for each CLI action.

pub mod commons;
pub mod exists;
pub mod feed;
pub mod line;
pub mod path;
pub mod read;
pub mod run;
