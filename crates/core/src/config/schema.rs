//! Configuration schema definitions
//!
//! Every field has a default so an empty (or absent) file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigSchema {
    /// `[profile]`
    #[serde(default)]
    pub profile: ProfileConfig,

    /// `[policy]`
    #[serde(default)]
    pub policy: PolicyConfig,

    /// `[gradle]`
    #[serde(default)]
    pub gradle: GradleConfig,
}

/// Where the build profile document lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Path of the profile document, relative to the working directory
    #[serde(default = "default_profile_path")]
    pub path: PathBuf,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            path: default_profile_path(),
        }
    }
}

fn default_profile_path() -> PathBuf {
    PathBuf::from("android/app/build-profile.toml")
}

/// Validation policy knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Plugin that must be applied last
    #[serde(default = "default_platform_plugin")]
    pub platform_plugin: String,

    /// Fail when the platform plugin is not declared at all
    #[serde(default = "default_true")]
    pub require_platform_plugin: bool,

    /// Turn the unminified-release warning into an error
    #[serde(default)]
    pub require_release_minify: bool,

    /// Signing configurations provided by the toolchain outside the profile
    #[serde(default)]
    pub known_signing_configs: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            platform_plugin: default_platform_plugin(),
            require_platform_plugin: true,
            require_release_minify: false,
            known_signing_configs: Vec::new(),
        }
    }
}

fn default_platform_plugin() -> String {
    "dev.flutter.flutter-gradle-plugin".to_string()
}

fn default_true() -> bool {
    true
}

/// Gradle hand-off settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradleConfig {
    /// Directory holding the Gradle wrapper
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,
}

impl Default for GradleConfig {
    fn default() -> Self {
        Self {
            project_dir: default_project_dir(),
        }
    }
}

fn default_project_dir() -> PathBuf {
    PathBuf::from("android")
}
