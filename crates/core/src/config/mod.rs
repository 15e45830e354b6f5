//! Tool configuration loading and schema definitions
//!
//! Settings for the tool itself, as opposed to the build profile it checks.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
