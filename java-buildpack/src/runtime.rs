use crate::cli::{CompileArgs, DetectArgs, ReleaseArgs};
use crate::compile::{compile, CompileContext};
use crate::detect::{detect, BUILDPACK_NAME};
use crate::error::{on_error, UNSPECIFIED_ERROR};
use crate::fetch::{DirectoryFetcher, HttpFetcher};
use crate::release::Release;
use crate::{JavaBuildpackError, StagingEnv};
use clap::Parser;
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::exit;

/// Directory, relative to the buildpack root, that holds the bundled JDK archive.
pub const RESOURCES_DIR: &str = "resources";

const DETECT_FAIL: i32 = 1;
const UNKNOWN_PHASE: i32 = 255;

/// Main entry point of the buildpack executable.
///
/// The platform invokes `bin/detect`, `bin/compile` and `bin/release` separately. A single
/// executable is built instead and linked under those names, the file name it is invoked by
/// determines the phase that runs.
pub fn java_buildpack_runtime() {
    // Using `std::env::args()` instead of `std::env::current_exe()` since the latter resolves
    // symlinks to their target on some platforms, whereas we need the original filename.
    let current_exe = env::args().next();
    let current_exe_file_name = current_exe
        .as_ref()
        .map(Path::new)
        .and_then(Path::file_name)
        .and_then(OsStr::to_str);

    let result = match current_exe_file_name {
        Some("detect") => Ok(run_detect()),
        Some("compile") => run_compile(current_exe.as_deref().map(Path::new)),
        Some("release") => run_release(),
        other => {
            eprintln!(
                "Error: Expected the name of this executable to be 'detect', 'compile' or 'release', but it was '{}'",
                other.unwrap_or("<unknown>")
            );
            eprintln!("The executable name is used to determine the current buildpack phase.");
            eprintln!("You might want to create 'bin/detect', 'bin/compile' and 'bin/release' links to this executable and run those instead.");
            exit(UNKNOWN_PHASE)
        }
    };

    match result {
        Ok(exit_code) => exit(exit_code),
        Err(error) => exit(on_error(&error)),
    }
}

fn run_detect() -> i32 {
    let args = parse_args_or_exit::<DetectArgs>();

    if detect(&args.build_dir) {
        println!("{BUILDPACK_NAME}");
        0
    } else {
        DETECT_FAIL
    }
}

fn run_compile(current_exe: Option<&Path>) -> Result<i32, JavaBuildpackError> {
    let args = parse_args_or_exit::<CompileArgs>();

    let mut env = StagingEnv::from_current();
    if let Some(env_dir) = args.env_dir.filter(|env_dir| env_dir.is_dir()) {
        env = env
            .overlay_env_dir(&env_dir)
            .map_err(|error| JavaBuildpackError::ReadEnvDir(env_dir.clone(), error))?;
    }

    let jdk_source = buildpack_dir(current_exe).join(RESOURCES_DIR);
    let agent_fetcher = HttpFetcher::new();

    compile(&CompileContext {
        build_dir: args.build_dir,
        env,
        jdk_fetcher: &DirectoryFetcher,
        jdk_source: jdk_source.to_string_lossy().into_owned(),
        agent_fetcher: &agent_fetcher,
    })?;

    Ok(0)
}

fn run_release() -> Result<i32, JavaBuildpackError> {
    let _args = parse_args_or_exit::<ReleaseArgs>();

    print!("{}", Release::default().to_yaml()?);
    Ok(0)
}

fn parse_args_or_exit<T: Parser>() -> T {
    T::try_parse().unwrap_or_else(|error| {
        // Printing help or version is not a failure, clap knows which exit code applies.
        if !error.use_stderr() {
            error.exit();
        }
        eprintln!("{error}");
        exit(UNSPECIFIED_ERROR)
    })
}

/// The buildpack root is the parent of the `bin` directory the executable was invoked from.
fn buildpack_dir(current_exe: Option<&Path>) -> PathBuf {
    current_exe
        .and_then(buildpack_dir_of)
        .or_else(|| {
            env::current_exe()
                .ok()
                .as_deref()
                .and_then(buildpack_dir_of)
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

fn buildpack_dir_of(executable: &Path) -> Option<PathBuf> {
    let buildpack_dir = executable.parent()?.parent()?;

    if buildpack_dir.as_os_str().is_empty() {
        Some(PathBuf::from("."))
    } else {
        Some(buildpack_dir.to_path_buf())
    }
}
