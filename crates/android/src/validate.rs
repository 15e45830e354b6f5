//! Build profile validation
//!
//! Checks the rules that span fields or need outside knowledge (the plugin
//! ordering, the set of signing configurations the toolchain provides).
//! Violations block the build; warnings are reported and the build proceeds.

use crate::gradle::is_kotlin_identifier;
use crate::profile::{BuildProfile, DEBUG_SIGNING_CONFIG, RELEASE_VARIANT};
use buildprofile_core::config::PolicyConfig;
use buildprofile_core::validation::{ValidationError, ValidationResult, Validator};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

/// Dotted identifier with at least two segments, each starting with a letter
static APPLICATION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$").unwrap());

/// Maven `group:artifact`
static DEPENDENCY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+:[A-Za-z0-9_.\-]+$").unwrap());

const MULTIDEX_LIBRARY: &str = "androidx.multidex:multidex";

/// Android 5.0 runs multidex natively
const NATIVE_MULTIDEX_SDK: u32 = 21;

/// Validation codes reported by [`validate`]
pub mod codes {
    /// Two dependencies share a name
    pub const DUPLICATE_DEPENDENCY: &str = "DUPLICATE_DEPENDENCY";
    /// Dependency declaration is malformed
    pub const INVALID_DEPENDENCY: &str = "INVALID_DEPENDENCY";
    /// A variant signs with an undeclared configuration
    pub const UNKNOWN_SIGNING_CONFIG: &str = "UNKNOWN_SIGNING_CONFIG";
    /// The platform plugin is not applied last
    pub const PLUGIN_ORDER: &str = "PLUGIN_ORDER";
    /// The required platform plugin is absent
    pub const MISSING_PLUGIN: &str = "MISSING_PLUGIN";
    /// A plugin is applied twice
    pub const DUPLICATE_PLUGIN: &str = "DUPLICATE_PLUGIN";
    /// Language levels disagree
    pub const LANGUAGE_LEVEL_MISMATCH: &str = "LANGUAGE_LEVEL_MISMATCH";
    /// Resource shrinking without code shrinking
    pub const SHRINK_WITHOUT_MINIFY: &str = "SHRINK_WITHOUT_MINIFY";
    /// Application id or namespace is not a dotted identifier
    pub const INVALID_APPLICATION_ID: &str = "INVALID_APPLICATION_ID";
    /// SDK levels out of order
    pub const SDK_RANGE: &str = "SDK_RANGE";
    /// Release build is not minified
    pub const RELEASE_NOT_MINIFIED: &str = "RELEASE_NOT_MINIFIED";
    /// Release build signs with the debug key
    pub const RELEASE_DEBUG_SIGNING: &str = "RELEASE_DEBUG_SIGNING";
    /// Application id still uses `com.example`
    pub const EXAMPLE_APPLICATION_ID: &str = "EXAMPLE_APPLICATION_ID";
    /// Multidex library on an SDK with native multidex
    pub const MULTIDEX_UNNEEDED: &str = "MULTIDEX_UNNEEDED";
}

/// Knowledge the profile itself does not carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Plugin that must be applied after every other plugin
    pub platform_plugin: String,
    /// Report a profile without the platform plugin
    pub require_platform_plugin: bool,
    /// Report an unminified release as a violation instead of a warning
    pub require_release_minify: bool,
    /// Signing configurations supplied by the toolchain outside the profile
    pub known_signing_configs: Vec<String>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::from(&PolicyConfig::default())
    }
}

impl From<&PolicyConfig> for ValidationPolicy {
    fn from(config: &PolicyConfig) -> Self {
        Self {
            platform_plugin: config.platform_plugin.clone(),
            require_platform_plugin: config.require_platform_plugin,
            require_release_minify: config.require_release_minify,
            known_signing_configs: config.known_signing_configs.clone(),
        }
    }
}

/// Validate with the default policy
#[must_use]
pub fn validate(profile: &BuildProfile) -> ValidationResult {
    validate_with(profile, &ValidationPolicy::default())
}

/// Validate against an explicit policy
#[must_use]
pub fn validate_with(profile: &BuildProfile, policy: &ValidationPolicy) -> ValidationResult {
    let sdk = profile.sdk;
    let mut result = Validator::new()
        .pattern(
            "application_id",
            &profile.application_id,
            &APPLICATION_ID,
            codes::INVALID_APPLICATION_ID,
            "a dotted identifier such as com.company.app",
        )
        .ordered(
            "sdk",
            codes::SDK_RANGE,
            &[("min", sdk.min), ("target", sdk.target), ("compile", sdk.compile)],
        )
        .warn_if(
            "application_id",
            codes::EXAMPLE_APPLICATION_ID,
            profile.application_id.starts_with("com.example."),
            "com.example is rejected by app stores; choose a real application id before release",
        )
        .validate();

    if let Some(namespace) = &profile.namespace {
        result.merge(
            Validator::new()
                .pattern(
                    "namespace",
                    namespace,
                    &APPLICATION_ID,
                    codes::INVALID_APPLICATION_ID,
                    "a dotted identifier such as com.company.app",
                )
                .validate(),
        );
    }

    check_plugins(profile, policy, &mut result);
    check_language_level(profile, &mut result);
    check_variants(profile, policy, &mut result);
    check_dependencies(profile, &mut result);

    tracing::debug!(
        errors = result.errors().len(),
        warnings = result.warnings().len(),
        "validated build profile"
    );
    for warning in result.warnings() {
        tracing::debug!(field = %warning.field, code = %warning.code, "{}", warning.message);
    }
    result
}

fn check_plugins(profile: &BuildProfile, policy: &ValidationPolicy, result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for plugin in &profile.plugins {
        if !seen.insert(plugin.as_str()) {
            result.add_error(ValidationError::new(
                "plugins",
                codes::DUPLICATE_PLUGIN,
                format!("plugin `{}` is applied more than once", plugin),
            ));
        }
    }

    let platform = policy.platform_plugin.as_str();
    match profile.plugins.iter().rposition(|p| p == platform) {
        Some(index) if index + 1 != profile.plugins.len() => {
            result.add_error(
                ValidationError::new(
                    "plugins",
                    codes::PLUGIN_ORDER,
                    format!("`{}` must be applied after every other plugin", platform),
                )
                .expected(format!("{} last", platform))
                .actual(profile.plugins.last().cloned().unwrap_or_default()),
            );
        }
        Some(_) => {}
        None if policy.require_platform_plugin => {
            result.add_error(ValidationError::new(
                "plugins",
                codes::MISSING_PLUGIN,
                format!("`{}` is not applied", platform),
            ));
        }
        None => {}
    }
}

fn check_language_level(profile: &BuildProfile, result: &mut ValidationResult) {
    let Some(level) = &profile.language_level else {
        return;
    };
    if !level.is_consistent() {
        let actual = match &level.jvm_target {
            Some(jvm) => format!("source {}, target {}, jvm_target {}", level.source, level.target, jvm),
            None => format!("source {}, target {}", level.source, level.target),
        };
        result.add_error(
            ValidationError::new(
                "language_level",
                codes::LANGUAGE_LEVEL_MISMATCH,
                "source and target compatibility must match",
            )
            .expected(format!("{} everywhere", level.source))
            .actual(actual),
        );
    }
}

fn check_variants(profile: &BuildProfile, policy: &ValidationPolicy, result: &mut ValidationResult) {
    for (name, variant) in &profile.variants {
        if let Some(signing) = &variant.signing_config {
            let known = profile.declares_signing_config(signing)
                || policy.known_signing_configs.iter().any(|k| k == signing);
            if !known {
                result.add_error(
                    ValidationError::new(
                        format!("variants.{}.signing_config", name),
                        codes::UNKNOWN_SIGNING_CONFIG,
                        format!("signing configuration `{}` is not declared", signing),
                    )
                    .actual(signing.clone()),
                );
            }
        }

        if variant.shrink_resources && !variant.minify {
            result.add_error(ValidationError::new(
                format!("variants.{}.shrink_resources", name),
                codes::SHRINK_WITHOUT_MINIFY,
                "resource shrinking requires minify = true",
            ));
        }
    }

    let Some(release) = profile.release() else {
        return;
    };

    if !release.minify {
        let finding = ValidationError::new(
            format!("variants.{}.minify", RELEASE_VARIANT),
            codes::RELEASE_NOT_MINIFIED,
            "release builds ship without code shrinking",
        );
        if policy.require_release_minify {
            result.add_error(finding);
        } else {
            result.add_warning(finding);
        }
    }

    if release.signing_config.as_deref() == Some(DEBUG_SIGNING_CONFIG) {
        result.add_warning(ValidationError::new(
            format!("variants.{}.signing_config", RELEASE_VARIANT),
            codes::RELEASE_DEBUG_SIGNING,
            "release is signed with the debug key and cannot be published",
        ));
    }
}

fn check_dependencies(profile: &BuildProfile, result: &mut ValidationResult) {
    let mut versions: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for dep in &profile.dependencies {
        versions.entry(dep.name.as_str()).or_default().push(dep.version.as_str());

        if !DEPENDENCY_NAME.is_match(&dep.name) || dep.version.trim().is_empty() {
            result.add_error(
                ValidationError::new(
                    "dependencies",
                    codes::INVALID_DEPENDENCY,
                    format!("`{}` is not a group:artifact name with a version", dep.name),
                )
                .actual(dep.coordinate()),
            );
        }
        if !is_kotlin_identifier(&dep.configuration) {
            result.add_error(
                ValidationError::new(
                    "dependencies",
                    codes::INVALID_DEPENDENCY,
                    format!("`{}` has an invalid configuration", dep.name),
                )
                .expected("a Gradle configuration name such as implementation")
                .actual(dep.configuration.clone()),
            );
        }
    }

    for (name, found) in versions.iter().filter(|(_, v)| v.len() > 1) {
        result.add_error(
            ValidationError::new(
                "dependencies",
                codes::DUPLICATE_DEPENDENCY,
                format!("`{}` is declared {} times", name, found.len()),
            )
            .expected("one declaration per dependency")
            .actual(found.join(", ")),
        );
    }

    if profile.multidex
        && profile.sdk.min >= NATIVE_MULTIDEX_SDK
        && profile.dependency(MULTIDEX_LIBRARY).is_some()
    {
        result.add_warning(ValidationError::new(
            "dependencies",
            codes::MULTIDEX_UNNEEDED,
            format!(
                "{} is redundant when sdk.min >= {}",
                MULTIDEX_LIBRARY, NATIVE_MULTIDEX_SDK
            ),
        ));
    }
}
