//! Build profile data model
//!
//! A [`BuildProfile`] is the resolved form of the profile document: property
//! references have been replaced by integers and the SDK range has been
//! checked. It is read-only input for the build toolchain.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Signing configuration the Android toolchain always provides
pub const DEBUG_SIGNING_CONFIG: &str = "debug";

/// Name of the variant that ships to users
pub const RELEASE_VARIANT: &str = "release";

/// Default dependency configuration
pub const DEFAULT_CONFIGURATION: &str = "implementation";

/// Validated, in-memory build configuration
///
/// Field order follows the serialized layout: plain values first, tables last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildProfile {
    /// Plugins in application order
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Identifier on the distribution platform
    pub application_id: String,

    /// Android namespace; the application id when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Pinned NDK version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<String>,

    /// `multiDexEnabled`
    #[serde(default)]
    pub multidex: bool,

    /// Relative path to the platform project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_source: Option<String>,

    /// Signing configurations declared to the toolchain
    #[serde(default)]
    pub signing_configs: BTreeSet<String>,

    /// SDK compatibility bounds
    pub sdk: SdkBounds,

    /// Java and Kotlin compatibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_level: Option<LanguageLevel>,

    /// Version shown to users and the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<AppVersion>,

    /// Build variants by name
    #[serde(default)]
    pub variants: BTreeMap<String, Variant>,

    /// External dependencies in declaration order
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl BuildProfile {
    /// Effective namespace
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(&self.application_id)
    }

    /// The release variant, if declared
    #[must_use]
    pub fn release(&self) -> Option<&Variant> {
        self.variants.get(RELEASE_VARIANT)
    }

    /// Whether `name` is a declared or implicit signing configuration
    #[must_use]
    pub fn declares_signing_config(&self, name: &str) -> bool {
        name == DEBUG_SIGNING_CONFIG || self.signing_configs.contains(name)
    }

    /// Look up a dependency by `group:artifact`
    #[must_use]
    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.iter().find(|d| d.name == name)
    }
}

/// SDK levels; `min <= target <= compile` holds after loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkBounds {
    /// Lowest API level the app installs on (`minSdk`)
    pub min: u32,
    /// API level the app is tested against (`targetSdk`)
    pub target: u32,
    /// API level the app is compiled against (`compileSdk`)
    pub compile: u32,
}

impl SdkBounds {
    /// Whether the ordering invariant holds
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.min <= self.target && self.target <= self.compile
    }
}

impl fmt::Display for SdkBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "min {} / target {} / compile {}", self.min, self.target, self.compile)
    }
}

/// Java language level
///
/// Accepts `11`, `"11"`, `"1.8"`, and Gradle constant names such as
/// `"VERSION_11"` or `"VERSION_1_8"`; always stored in dotted form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct JavaVersion(String);

impl JavaVersion {
    /// Parse any accepted spelling
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let dotted = trimmed
            .strip_prefix("VERSION_")
            .map(|rest| rest.replace('_', "."))
            .unwrap_or_else(|| trimmed.to_string());

        let well_formed = !dotted.is_empty()
            && dotted
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));

        well_formed.then_some(Self(dotted))
    }

    /// Dotted form, e.g. `11` or `1.8`
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Gradle `JavaVersion` constant name, e.g. `VERSION_1_8`
    #[must_use]
    pub fn constant_name(&self) -> String {
        format!("VERSION_{}", self.0.replace('.', "_"))
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for JavaVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        };
        JavaVersion::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("`{}` is not a Java version", text)))
    }
}

/// Source/target compatibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageLevel {
    /// `sourceCompatibility`
    pub source: JavaVersion,
    /// `targetCompatibility`
    pub target: JavaVersion,
    /// Kotlin `jvmTarget`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm_target: Option<JavaVersion>,
}

impl LanguageLevel {
    /// Same version everywhere
    #[must_use]
    pub fn uniform(version: JavaVersion) -> Self {
        Self {
            source: version.clone(),
            target: version.clone(),
            jvm_target: Some(version),
        }
    }

    /// Whether source, target, and (if set) the JVM target agree
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.source == self.target && self.jvm_target.as_ref().is_none_or(|jvm| *jvm == self.target)
    }
}

/// `versionCode` / `versionName`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppVersion {
    /// Monotonic store version (`versionCode`)
    pub code: u32,
    /// User-visible version (`versionName`)
    pub name: String,
}

/// Per-variant toggles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variant {
    /// Name of the signing configuration this variant uses
    #[serde(default, alias = "signing_ref", skip_serializing_if = "Option::is_none")]
    pub signing_config: Option<String>,

    /// Code shrinking (R8)
    #[serde(default)]
    pub minify: bool,

    /// Resource shrinking; needs `minify`
    #[serde(default)]
    pub shrink_resources: bool,
}

/// External dependency declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    /// `group:artifact`
    pub name: String,
    /// Version requested from the repository
    pub version: String,
    /// Gradle configuration, e.g. `implementation`
    #[serde(default = "default_configuration")]
    pub configuration: String,
}

fn default_configuration() -> String {
    DEFAULT_CONFIGURATION.to_string()
}

impl Dependency {
    /// Dependency in the default configuration
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            configuration: default_configuration(),
        }
    }

    /// Parse a `group:artifact:version` coordinate
    pub fn from_coordinate(coordinate: &str) -> Option<Self> {
        let mut parts = coordinate.trim().split(':');
        let (group, artifact, version) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() || [group, artifact, version].iter().any(|p| p.is_empty()) {
            return None;
        }
        Some(Self::new(format!("{}:{}", group, artifact), version))
    }

    /// `group:artifact:version`
    #[must_use]
    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn java(v: &str) -> JavaVersion {
        JavaVersion::parse(v).unwrap()
    }

    #[test]
    fn test_java_version_spellings() {
        assert_eq!(java("11").as_str(), "11");
        assert_eq!(java("VERSION_11").as_str(), "11");
        assert_eq!(java("VERSION_1_8").as_str(), "1.8");
        assert_eq!(java("1.8").constant_name(), "VERSION_1_8");
        assert!(JavaVersion::parse("eleven").is_none());
        assert!(JavaVersion::parse("").is_none());
        assert!(JavaVersion::parse("1..8").is_none());
    }

    #[test]
    fn test_java_version_deserializes_number() {
        let v: JavaVersion = serde_json::from_str("17").unwrap();
        assert_eq!(v.as_str(), "17");
    }

    #[test]
    fn test_language_level_consistency() {
        assert!(LanguageLevel::uniform(java("11")).is_consistent());

        let mismatched = LanguageLevel {
            source: java("11"),
            target: java("17"),
            jvm_target: None,
        };
        assert!(!mismatched.is_consistent());

        let jvm_differs = LanguageLevel {
            source: java("11"),
            target: java("11"),
            jvm_target: Some(java("17")),
        };
        assert!(!jvm_differs.is_consistent());
    }

    #[test]
    fn test_dependency_coordinate() {
        let dep = Dependency::from_coordinate("androidx.multidex:multidex:2.0.1").unwrap();
        assert_eq!(dep.name, "androidx.multidex:multidex");
        assert_eq!(dep.version, "2.0.1");
        assert_eq!(dep.configuration, "implementation");
        assert_eq!(dep.coordinate(), "androidx.multidex:multidex:2.0.1");

        assert!(Dependency::from_coordinate("androidx.multidex:multidex").is_none());
        assert!(Dependency::from_coordinate("a:b:c:d").is_none());
        assert!(Dependency::from_coordinate("a::1.0").is_none());
    }

    #[test]
    fn test_sdk_bounds_ordering() {
        assert!(SdkBounds { min: 23, target: 35, compile: 35 }.is_ordered());
        assert!(!SdkBounds { min: 30, target: 20, compile: 35 }.is_ordered());
        assert!(!SdkBounds { min: 21, target: 35, compile: 34 }.is_ordered());
    }

    #[test]
    fn test_debug_signing_is_implicit() {
        let profile = BuildProfile {
            plugins: vec![],
            application_id: "com.acme.app".into(),
            namespace: None,
            ndk_version: None,
            multidex: false,
            platform_source: None,
            signing_configs: BTreeSet::new(),
            sdk: SdkBounds { min: 23, target: 35, compile: 35 },
            language_level: None,
            version: None,
            variants: BTreeMap::new(),
            dependencies: vec![],
        };
        assert!(profile.declares_signing_config("debug"));
        assert!(!profile.declares_signing_config("upload"));
        assert_eq!(profile.namespace(), "com.acme.app");
    }
}
