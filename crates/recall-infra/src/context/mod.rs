//! Context sources for injected turns.
//!
//! - `web`: HTTP fetch + main-content text extraction
//! - `ripgrep`: case-insensitive file search via the `rg` binary

pub mod ripgrep;
pub mod web;
