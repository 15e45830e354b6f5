//! Build profile loading and serialization
//!
//! Documents are TOML or JSON. Both are first parsed into a generic JSON
//! value, then taken apart field by field so every failure can name the
//! offending field. Keys left over once all known fields are taken are
//! rejected.
//!
//! SDK levels and `version.code` may be integers or references to entries of
//! the document's `[properties]` table. `version.name` is a literal unless it
//! names a string property:
//!
//! ```toml
//! [properties]
//! "flutter.compileSdkVersion" = 35
//!
//! [sdk]
//! min = 23
//! target = 35
//! compile = "flutter.compileSdkVersion"
//! ```

use crate::error::{ProfileError, Result};
use crate::profile::{AppVersion, BuildProfile, Dependency, LanguageLevel, SdkBounds, Variant};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const DOCUMENT: &str = "<document>";

/// Document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// `.toml`, and anything unrecognized
    #[default]
    Toml,
    /// `.json`
    Json,
}

impl Format {
    /// Pick the format from a file extension; anything but `.json` is TOML
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Toml,
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(Format::Toml),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown format `{}` (expected toml or json)", other)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Toml => "toml",
            Format::Json => "json",
        })
    }
}

/// Read, parse, resolve, and range-check the profile at `path`
pub fn load(path: &Path) -> Result<BuildProfile> {
    tracing::debug!(path = %path.display(), "loading build profile");
    let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, Format::from_path(path))
}

/// Parse a profile document held in memory
pub fn parse(text: &str, format: Format) -> Result<BuildProfile> {
    let root = match format {
        Format::Toml => {
            let table: toml::Table = toml::from_str(text)
                .map_err(|e| ProfileError::malformed(DOCUMENT, e.message().trim().to_string()))?;
            serde_json::to_value(table)
                .map_err(|e| ProfileError::malformed(DOCUMENT, e.to_string()))?
        }
        Format::Json => serde_json::from_str::<Value>(text)
            .map_err(|e| ProfileError::malformed(DOCUMENT, e.to_string()))?,
    };

    let Value::Object(map) = root else {
        return Err(ProfileError::malformed(DOCUMENT, "must be a table of fields"));
    };

    from_document(Document::new(map, None))
}

/// Serialize a profile; the output loads back into an identical profile
pub fn serialize(profile: &BuildProfile, format: Format) -> Result<String> {
    match format {
        Format::Toml => {
            toml::to_string_pretty(profile).map_err(|e| ProfileError::Serialize(e.to_string()))
        }
        Format::Json => serde_json::to_string_pretty(profile)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| ProfileError::Serialize(e.to_string())),
    }
}

/// Write a profile to `path` in the format its extension implies
pub fn save(profile: &BuildProfile, path: &Path) -> Result<()> {
    let text = serialize(profile, Format::from_path(path))?;
    std::fs::write(path, text).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn from_document(mut doc: Document) -> Result<BuildProfile> {
    let properties: Map<String, Value> = doc.take("properties", &[])?.unwrap_or_default();

    let application_id: String = doc
        .take("application_id", &["applicationId"])?
        .ok_or_else(|| ProfileError::missing("application_id"))?;
    if application_id.trim().is_empty() {
        return Err(ProfileError::malformed("application_id", "must not be empty"));
    }

    let sdk_table: Map<String, Value> = doc
        .take("sdk", &["sdk_bounds", "sdkBounds"])?
        .ok_or_else(|| ProfileError::missing("sdk"))?;
    let sdk = resolve_sdk(Document::new(sdk_table, Some("sdk")), &properties)?;

    let version = match doc.take::<Map<String, Value>>("version", &[])? {
        Some(table) => Some(resolve_version(Document::new(table, Some("version")), &properties)?),
        None => None,
    };

    let variants = match doc.take::<Map<String, Value>>("variants", &[])? {
        Some(table) => table
            .into_iter()
            .map(|(name, value)| {
                let variant: Variant = deserialize(&format!("variants.{}", name), value)?;
                Ok((name, variant))
            })
            .collect::<Result<BTreeMap<_, _>>>()?,
        None => BTreeMap::new(),
    };

    let dependencies = match doc.take::<Vec<Value>>("dependencies", &[])? {
        Some(entries) => entries
            .into_iter()
            .enumerate()
            .map(|(i, value)| dependency(&format!("dependencies[{}]", i), value))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    let profile = BuildProfile {
        plugins: doc.take("plugins", &[])?.unwrap_or_default(),
        application_id,
        namespace: doc.take("namespace", &[])?,
        ndk_version: doc.take("ndk_version", &["ndkVersion"])?,
        multidex: doc.take("multidex", &["multidex_enabled"])?.unwrap_or(false),
        platform_source: doc.take("platform_source", &[])?,
        signing_configs: doc
            .take::<BTreeSet<String>>("signing_configs", &[])?
            .unwrap_or_default(),
        sdk,
        language_level: doc.take::<LanguageLevel>("language_level", &["languageLevel"])?,
        version,
        variants,
        dependencies,
    };

    doc.finish()?;
    tracing::debug!(
        application_id = %profile.application_id,
        sdk = %profile.sdk,
        variants = profile.variants.len(),
        dependencies = profile.dependencies.len(),
        "build profile loaded"
    );
    Ok(profile)
}

fn resolve_sdk(mut table: Document, properties: &Map<String, Value>) -> Result<SdkBounds> {
    let mut level = |key: &str| -> Result<u32> {
        let field = table.path(key);
        let value = table.take_raw(key, &[]).ok_or_else(|| ProfileError::missing(&field))?;
        resolve_integer(&field, &value, properties)
    };

    let bounds = SdkBounds {
        min: level("min")?,
        target: level("target")?,
        compile: level("compile")?,
    };
    table.finish()?;

    if bounds.min == 0 {
        return Err(ProfileError::range("sdk.min", "must be at least 1"));
    }
    if bounds.min > bounds.target {
        return Err(ProfileError::range(
            "sdk.min",
            format!("min ({}) exceeds target ({})", bounds.min, bounds.target),
        ));
    }
    if bounds.target > bounds.compile {
        return Err(ProfileError::range(
            "sdk.target",
            format!("target ({}) exceeds compile ({})", bounds.target, bounds.compile),
        ));
    }
    Ok(bounds)
}

fn resolve_version(mut table: Document, properties: &Map<String, Value>) -> Result<AppVersion> {
    let code_value = table
        .take_raw("code", &[])
        .ok_or_else(|| ProfileError::missing("version.code"))?;
    let code = resolve_integer("version.code", &code_value, properties)?;
    let name_value = table
        .take_raw("name", &[])
        .ok_or_else(|| ProfileError::missing("version.name"))?;
    let name = resolve_text("version.name", name_value, properties)?;
    table.finish()?;
    Ok(AppVersion { code, name })
}

/// A string literal, unless it names a string entry in `properties`
fn resolve_text(field: &str, value: Value, properties: &Map<String, Value>) -> Result<String> {
    let Value::String(text) = value else {
        return Err(ProfileError::malformed(field, "must be a string"));
    };
    match lookup_property(properties, &text) {
        Some(Value::String(resolved)) => {
            tracing::debug!(field, reference = %text, resolved = %resolved, "resolved property reference");
            Ok(resolved.clone())
        }
        Some(_) => Err(ProfileError::malformed(
            field,
            format!("property `{}` is not a string", text),
        )),
        None => Ok(text),
    }
}

/// An integer literal, or the name of an integer entry in `properties`
fn resolve_integer(field: &str, value: &Value, properties: &Map<String, Value>) -> Result<u32> {
    match value {
        Value::Number(_) => as_u32(value)
            .ok_or_else(|| ProfileError::malformed(field, "must be a non-negative integer")),
        Value::String(reference) => {
            let resolved = lookup_property(properties, reference).ok_or_else(|| {
                ProfileError::malformed(field, format!("unresolved property reference `{}`", reference))
            })?;
            let level = as_u32(resolved).ok_or_else(|| {
                ProfileError::malformed(
                    field,
                    format!("property `{}` is not a non-negative integer", reference),
                )
            })?;
            tracing::debug!(field, reference = %reference, level, "resolved property reference");
            Ok(level)
        }
        _ => Err(ProfileError::malformed(
            field,
            "must be an integer or a property reference",
        )),
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

/// Exact key first, then the key as a dotted path through nested tables
fn lookup_property<'a>(properties: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = properties.get(key) {
        return Some(value);
    }
    let mut segments = key.split('.');
    let mut current = properties.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn dependency(field: &str, value: Value) -> Result<Dependency> {
    match value {
        Value::String(coordinate) => Dependency::from_coordinate(&coordinate).ok_or_else(|| {
            ProfileError::malformed(
                field,
                format!("`{}` is not a group:artifact:version coordinate", coordinate),
            )
        }),
        other => deserialize(field, other),
    }
}

fn deserialize<T: DeserializeOwned>(field: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ProfileError::malformed(field, e.to_string()))
}

/// A table being taken apart; whatever is left at the end is unknown
struct Document {
    fields: Map<String, Value>,
    prefix: Option<&'static str>,
}

impl Document {
    fn new(fields: Map<String, Value>, prefix: Option<&'static str>) -> Self {
        Self { fields, prefix }
    }

    fn path(&self, key: &str) -> String {
        match self.prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.to_string(),
        }
    }

    /// Remove `key` (or its first present alias); `null` counts as absent
    fn take_raw(&mut self, key: &str, aliases: &[&str]) -> Option<Value> {
        std::iter::once(key)
            .chain(aliases.iter().copied())
            .find_map(|k| self.fields.remove(k))
            .filter(|v| !v.is_null())
    }

    fn take<T: DeserializeOwned>(&mut self, key: &str, aliases: &[&str]) -> Result<Option<T>> {
        let field = self.path(key);
        self.take_raw(key, aliases)
            .map(|value| deserialize(&field, value))
            .transpose()
    }

    fn finish(self) -> Result<()> {
        match self.fields.keys().next() {
            Some(unknown) => Err(ProfileError::malformed(
                self.path(unknown),
                "is not a known field",
            )),
            None => Ok(()),
        }
    }
}
