//! Core types and trait definitions for the message board.
//!
//! No HTTP or database dependencies. Every other crate in the workspace
//! builds on these types.

// Trait methods return `impl Future + Send` explicitly.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod message;
pub mod store;
pub mod thread;

pub use error::{Error, Result};
