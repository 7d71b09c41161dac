//! Interactive terminal chat for recall.
//!
//! Terminal implementations of the session ports (input, output, clipboard)
//! plus the wiring that runs a `SessionController`. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod clipboard;
pub mod input;
pub mod loop_runner;
pub mod output;
pub mod renderer;
