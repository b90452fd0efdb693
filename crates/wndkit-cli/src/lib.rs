//! Library components for the wndkit CLI.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
