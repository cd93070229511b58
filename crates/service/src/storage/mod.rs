//! Storage abstractions for service layer
//!
//! File-backed JSON helpers shared by the stores.

pub mod json_file;
