//! A buildpack that stages a Java runtime for an application: it unpacks a JDK into the build
//! directory, optionally installs the Dynatrace agent library and writes a `.profile.d` script
//! that exports `JAVA_HOME`, `PATH` and `JAVA_OPTS` when the application container starts.
//!
//! The buildpack is shipped as a single executable that is linked as `bin/detect`, `bin/compile`
//! and `bin/release`. See [`runtime::java_buildpack_runtime`] for the entry point.

pub mod agent;
pub mod compile;
pub mod detect;
pub mod env;
pub mod error;
pub mod fetch;
pub mod java_opts;
pub mod java_version;
pub mod jdk;
pub mod log;
pub mod profile_script;
pub mod properties;
pub mod release;
pub mod runtime;
pub mod runtime_config;

mod cli;

pub use env::StagingEnv;
pub use error::JavaBuildpackError;
