//! Starter profile document written by `build-profile init`

/// Starter document mirroring a freshly generated Flutter Android app
///
/// SDK levels and the version reference the values the Flutter plugin
/// provides, so they stay in one place.
#[must_use]
pub fn starter_document(application_id: &str) -> String {
    format!(
        r#"# Android build profile, read by `build-profile` before every build.
plugins = [
    "com.android.application",
    "kotlin-android",
    # must stay last: it reads the state the Android and Kotlin plugins set up
    "dev.flutter.flutter-gradle-plugin",
]
application_id = "{application_id}"
ndk_version = "27.0.12077973"
multidex = true
platform_source = "../.."
signing_configs = []

[properties]
"flutter.compileSdkVersion" = 35
"flutter.targetSdkVersion" = 35
"flutter.versionCode" = 1
"flutter.versionName" = "1.0.0"

[sdk]
min = 23
target = "flutter.targetSdkVersion"
compile = "flutter.compileSdkVersion"

[language_level]
source = "11"
target = "11"
jvm_target = "11"

[version]
code = "flutter.versionCode"
name = "flutter.versionName"

[variants.release]
# replace with an upload key before publishing
signing_config = "debug"
minify = false
shrink_resources = false

[[dependencies]]
name = "androidx.multidex:multidex"
version = "2.0.1"
"#,
        application_id = application_id.replace('\\', "\\\\").replace('"', "\\\""),
    )
}
