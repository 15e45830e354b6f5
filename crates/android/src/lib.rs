//! Android build profile support
//!
//! This crate provides:
//! - The [`BuildProfile`] data model
//! - Loading and serialization of profile documents (TOML or JSON)
//! - Validation of cross-field invariants against a [`ValidationPolicy`]
//! - Rendering to `build.gradle.kts` and the Gradle hand-off
//!
//! # Example
//!
//! ```rust,no_run
//! use buildprofile_android::{loader, validate};
//! use std::path::Path;
//!
//! let profile = loader::load(Path::new("android/app/build-profile.toml"))?;
//! let result = validate::validate(&profile);
//! for error in result.errors() {
//!     eprintln!("{}", error);
//! }
//! # Ok::<(), buildprofile_android::ProfileError>(())
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod gradle;
pub mod loader;
pub mod profile;
pub mod starter;
pub mod validate;

pub use error::{ProfileError, Result};
pub use profile::{AppVersion, BuildProfile, Dependency, JavaVersion, LanguageLevel, SdkBounds, Variant};
pub use validate::ValidationPolicy;
