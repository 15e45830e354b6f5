//! Core utilities for the build-profile tool
//!
//! This crate provides functionality shared by the profile library and the CLI:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Validation**: collected violations and warnings with a fluent builder
//! - **Configuration**: TOML-based tool configuration with defaults
//! - **Process execution**: running the external build toolchain

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod process;
pub mod validation;

pub use error::{Error, ErrorCode, Result};
