//! Gradle integration
//!
//! Renders a profile as the `build.gradle.kts` the Android toolchain reads,
//! and hands a validated profile's build off to the Gradle wrapper.

use crate::error::{ProfileError, Result};
use crate::profile::BuildProfile;
use buildprofile_core::error::Error;
use buildprofile_core::process::run_command_streaming_in_dir;
use handlebars::Handlebars;
use serde::Serialize;
use std::path::{Path, PathBuf};

const TEMPLATE_NAME: &str = "build.gradle.kts";

const TEMPLATE: &str = r#"plugins {
{{#each plugins}}
    id("{{this}}")
{{/each}}
}

android {
    namespace = "{{namespace}}"
    compileSdk = {{compile_sdk}}
{{#if ndk_version}}
    ndkVersion = "{{ndk_version}}"
{{/if}}
{{#if java}}

    compileOptions {
        sourceCompatibility = JavaVersion.{{java.source}}
        targetCompatibility = JavaVersion.{{java.target}}
    }
{{#if java.jvm_target}}

    kotlinOptions {
        jvmTarget = JavaVersion.{{java.jvm_target}}.toString()
    }
{{/if}}
{{/if}}

    defaultConfig {
        applicationId = "{{application_id}}"
        minSdk = {{min_sdk}}
        targetSdk = {{target_sdk}}
{{#if version}}
        versionCode = {{version.code}}
        versionName = "{{version.name}}"
{{/if}}
{{#if multidex}}
        multiDexEnabled = true
{{/if}}
    }
{{#if build_types}}

    buildTypes {
{{#each build_types}}
{{#if custom}}
        create("{{name}}") {
{{else}}
        {{name}} {
{{/if}}
{{#if signing_config}}
            signingConfig = signingConfigs.getByName("{{signing_config}}")
{{/if}}
            isMinifyEnabled = {{minify}}
            isShrinkResources = {{shrink_resources}}
        }
{{/each}}
    }
{{/if}}
}
{{#if platform_source}}

flutter {
    source = "{{platform_source}}"
}
{{/if}}
{{#if dependencies}}

dependencies {
{{#each dependencies}}
    {{configuration}}("{{coordinate}}")
{{/each}}
}
{{/if}}
"#;

#[derive(Serialize)]
struct ScriptView<'a> {
    plugins: &'a [String],
    namespace: &'a str,
    application_id: &'a str,
    compile_sdk: u32,
    min_sdk: u32,
    target_sdk: u32,
    ndk_version: Option<&'a str>,
    java: Option<JavaView>,
    version: Option<VersionView<'a>>,
    multidex: bool,
    build_types: Vec<BuildTypeView<'a>>,
    platform_source: Option<&'a str>,
    dependencies: Vec<DependencyView<'a>>,
}

#[derive(Serialize)]
struct JavaView {
    source: String,
    target: String,
    jvm_target: Option<String>,
}

#[derive(Serialize)]
struct VersionView<'a> {
    code: u32,
    name: &'a str,
}

#[derive(Serialize)]
struct BuildTypeView<'a> {
    name: &'a str,
    /// `release` and `debug` have accessors; other build types are created
    custom: bool,
    signing_config: Option<&'a str>,
    minify: bool,
    shrink_resources: bool,
}

#[derive(Serialize)]
struct DependencyView<'a> {
    configuration: &'a str,
    coordinate: String,
}

impl<'a> ScriptView<'a> {
    fn new(profile: &'a BuildProfile) -> Self {
        Self {
            plugins: &profile.plugins,
            namespace: profile.namespace(),
            application_id: &profile.application_id,
            compile_sdk: profile.sdk.compile,
            min_sdk: profile.sdk.min,
            target_sdk: profile.sdk.target,
            ndk_version: profile.ndk_version.as_deref(),
            java: profile.language_level.as_ref().map(|level| JavaView {
                source: level.source.constant_name(),
                target: level.target.constant_name(),
                jvm_target: level.jvm_target.as_ref().map(|v| v.constant_name()),
            }),
            version: profile.version.as_ref().map(|v| VersionView {
                code: v.code,
                name: &v.name,
            }),
            multidex: profile.multidex,
            build_types: profile
                .variants
                .iter()
                .map(|(name, variant)| BuildTypeView {
                    name: name.as_str(),
                    custom: !matches!(name.as_str(), "release" | "debug"),
                    signing_config: variant.signing_config.as_deref(),
                    minify: variant.minify,
                    shrink_resources: variant.shrink_resources,
                })
                .collect(),
            platform_source: profile.platform_source.as_deref(),
            dependencies: profile
                .dependencies
                .iter()
                .map(|d| DependencyView {
                    configuration: &d.configuration,
                    coordinate: d.coordinate(),
                })
                .collect(),
        }
    }
}

/// Escape a value for a double-quoted Kotlin string literal
fn escape_kotlin(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str(r"\\"),
            '"' => escaped.push_str(r#"\""#),
            '$' => escaped.push_str(r"\$"),
            '\n' => escaped.push_str(r"\n"),
            '\r' => escaped.push_str(r"\r"),
            '\t' => escaped.push_str(r"\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Whether `name` can be emitted as a bare Kotlin call
#[must_use]
pub fn is_kotlin_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Render the profile as a Kotlin DSL build script
///
/// String values are escaped as Kotlin string literals. Dependency
/// configurations are emitted as calls, so they must be identifiers.
pub fn render_kts(profile: &BuildProfile) -> Result<String> {
    if let Some(dep) = profile
        .dependencies
        .iter()
        .find(|d| !is_kotlin_identifier(&d.configuration))
    {
        return Err(ProfileError::Render(format!(
            "dependency configuration `{}` is not a Kotlin identifier",
            dep.configuration
        )));
    }

    let mut registry = Handlebars::new();
    registry.register_escape_fn(escape_kotlin);
    registry
        .register_template_string(TEMPLATE_NAME, TEMPLATE)
        .map_err(|e| ProfileError::Render(e.to_string()))?;

    registry
        .render(TEMPLATE_NAME, &ScriptView::new(profile))
        .map_err(|e| ProfileError::Render(e.to_string()))
}

/// Gradle task producing `variant`, e.g. `assembleRelease` or `bundleRelease`
#[must_use]
pub fn assemble_task(variant: &str, bundle: bool) -> String {
    let mut chars = variant.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    let verb = if bundle { "bundle" } else { "assemble" };
    format!("{}{}", verb, capitalized)
}

/// Path of the Gradle wrapper script inside `project_dir`
#[must_use]
pub fn wrapper_path(project_dir: &Path) -> PathBuf {
    let wrapper = if cfg!(windows) { "gradlew.bat" } else { "gradlew" };
    project_dir.join(wrapper)
}

/// Run a Gradle task through the project's wrapper, streaming its output
///
/// Returns Gradle's exit code.
pub fn run_task(project_dir: &Path, task: &str) -> buildprofile_core::Result<i32> {
    let wrapper = wrapper_path(project_dir);
    let wrapper = std::fs::canonicalize(&wrapper).map_err(|e| {
        Error::gradle(format!("Gradle wrapper not found: {}", wrapper.display()))
            .with_source(e)
            .with_suggestion("Run `gradle wrapper` in the Android project or pass --project-dir")
    })?;

    tracing::info!(task, wrapper = %wrapper.display(), "handing off to Gradle");
    let program = wrapper.to_string_lossy();
    run_command_streaming_in_dir(&program, &[task], project_dir)
}
