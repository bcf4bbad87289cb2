//! edgepack CLI - package a finished framework build for Cloudflare Pages.
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - `adapt` and `routes`
//! - [`error`] - CLI error type and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - colored status lines

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
