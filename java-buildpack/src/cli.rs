use clap::Parser;
use std::path::PathBuf;

/// Detects whether the application contains compiled Java code
#[derive(Parser, Debug)]
#[command(name = "detect")]
pub(crate) struct DetectArgs {
    /// The application's build directory
    pub(crate) build_dir: PathBuf,
}

/// Installs the JDK and writes the Java runtime profile script
#[derive(Parser, Debug)]
#[command(name = "compile")]
pub(crate) struct CompileArgs {
    /// The application's build directory
    pub(crate) build_dir: PathBuf,
    /// Cache directory provided by the platform, currently unused
    pub(crate) cache_dir: PathBuf,
    /// Directory with one file per user-provided environment variable
    pub(crate) env_dir: Option<PathBuf>,
}

/// Prints the release descriptor
#[derive(Parser, Debug)]
#[command(name = "release")]
pub(crate) struct ReleaseArgs {
    /// The application's build directory
    pub(crate) build_dir: PathBuf,
}
