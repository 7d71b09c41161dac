//! Provider credential resolution.
//!
//! - `env`: environment variable lookup, the only credential source

pub mod env;

pub use env::api_key_from_env;
