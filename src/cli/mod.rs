//! Command-line interface
//!
//! This module contains argument parsing for the node and client binaries.

pub mod commands;

pub use commands::{ClientAction, ClientOpt, NodeOpt};
