#![forbid(unsafe_code)]

//! `ridgeline-demo`: replay scroll gestures against a TOML page layout.

pub mod cli;
pub mod error;
pub mod layout;
pub mod replay;

pub use cli::{Cli, run, run_from_env};
pub use error::{DemoError, Result};
