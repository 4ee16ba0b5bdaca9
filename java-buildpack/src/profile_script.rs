use crate::runtime_config::RuntimeConfig;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory, relative to the build directory, whose scripts the platform sources when the
/// application container starts.
pub const PROFILE_D_DIR: &str = ".profile.d";
pub const PROFILE_SCRIPT_FILE_NAME: &str = "java.sh";

const DEBUG_RUN_OPTS: &str =
    "-Xdebug -Xrunjdwp:transport=dt_socket,address=$VCAP_DEBUG_PORT,server=y,suspend=n";
const DEBUG_SUSPEND_OPTS: &str =
    "-Xdebug -Xrunjdwp:transport=dt_socket,address=$VCAP_DEBUG_PORT,server=y,suspend=y";

/// Renders the profile script for the given runtime configuration and JDK directory.
///
/// `JAVA_OPTS` is only set if the container does not define it already. Remote debugging is
/// decided by the shell at container start from `VCAP_DEBUG_MODE`: `run` attaches without
/// suspending, `suspend` waits for a debugger, any other value does nothing.
#[must_use]
pub fn render_profile_script(config: &RuntimeConfig, jdk_dir: &str) -> String {
    let java_opts = &config.java_opts;

    format!(
        r##"#!/bin/bash
export JAVA_HOME="$HOME/{jdk_dir}"
export PATH="$HOME/{jdk_dir}/bin:$PATH"
export JAVA_OPTS=${{JAVA_OPTS:-"{java_opts}"}}
export LANG="${{LANG:-en_US.UTF-8}}"
if [ -n "$VCAP_DEBUG_MODE" ]; then
  if [ "$VCAP_DEBUG_MODE" = "run" ]; then
    export JAVA_OPTS="$JAVA_OPTS {DEBUG_RUN_OPTS}"
  elif [ "$VCAP_DEBUG_MODE" = "suspend" ]; then
    export JAVA_OPTS="$JAVA_OPTS {DEBUG_SUSPEND_OPTS}"
  fi
fi
"##
    )
}

/// Appends the script to `<build_dir>/.profile.d/java.sh`.
///
/// Existing content is kept, so other buildpacks can contribute to the same file.
pub fn append_profile_script(
    build_dir: &Path,
    script: &str,
) -> Result<PathBuf, ProfileScriptError> {
    let profile_d_dir = build_dir.join(PROFILE_D_DIR);
    fs::create_dir_all(&profile_d_dir)
        .map_err(|error| ProfileScriptError::CreateDirectory(profile_d_dir.clone(), error))?;

    let path = profile_d_dir.join(PROFILE_SCRIPT_FILE_NAME);
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut file| file.write_all(script.as_bytes()))
        .map_err(|error| ProfileScriptError::Append(path.clone(), error))?;

    Ok(path)
}

#[derive(thiserror::Error, Debug)]
pub enum ProfileScriptError {
    #[error("Could not create directory {0}: {1}")]
    CreateDirectory(PathBuf, #[source] std::io::Error),

    #[error("Could not append to {0}: {1}")]
    Append(PathBuf, #[source] std::io::Error),
}
