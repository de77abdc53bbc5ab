//! Captured execution
//!
//! Stream redirection, stdin replay and outcome classification for a
//! single callable invocation.

mod execution;
mod replay;

pub use execution::{capture, Callable, Interrupt, Invoke, Io};
pub(crate) use execution::{panic_message, SilencedPanics};
pub use replay::{BufferExhausted, StdinReplay};
