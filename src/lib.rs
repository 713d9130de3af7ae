//! Typing Toucan (workspace facade crate).
//!
//! Re-exports the member crates as `typing_toucan::{core,input,store,term,types}` and
//! hosts the pieces the binary is made of: command line parsing and the [`App`]
//! that wires input, session, persistence and rendering together.

pub mod app;
pub mod cli;

pub use typing_toucan_core as core;
pub use typing_toucan_input as input;
pub use typing_toucan_store as store;
pub use typing_toucan_term as term;
pub use typing_toucan_types as types;

pub use app::{App, BellSink, Flow};
pub use cli::{Cli, ModeArg};
