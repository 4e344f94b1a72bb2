//! TUI screens

pub mod home;
pub mod reader;
pub mod status;
