//! CLI utilities for the build-profile tool
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Validation report rendering

#![warn(missing_docs)]

pub mod output;
