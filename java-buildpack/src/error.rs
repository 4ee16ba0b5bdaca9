use crate::agent::AgentInstallError;
use crate::jdk::{JdkInstallError, JDK_DIR};
use crate::log::log_error;
use crate::profile_script::ProfileScriptError;
use crate::release::ReleaseError;
use std::path::PathBuf;

/// Exit code for every failed staging run.
pub const UNSPECIFIED_ERROR: i32 = 1;

/// An error that ends a staging run.
#[derive(thiserror::Error, Debug)]
pub enum JavaBuildpackError {
    #[error(transparent)]
    JdkInstall(#[from] JdkInstallError),

    #[error(transparent)]
    AgentInstall(#[from] AgentInstallError),

    #[error(transparent)]
    ProfileScript(#[from] ProfileScriptError),

    #[error(transparent)]
    Release(#[from] ReleaseError),

    #[error("Could not read environment directory {0}: {1}")]
    ReadEnvDir(PathBuf, #[source] std::io::Error),
}

/// Reports the error to the user and returns the exit code the process should terminate with.
pub fn on_error(error: &JavaBuildpackError) -> i32 {
    match error {
        JavaBuildpackError::JdkInstall(JdkInstallError::JavaExecutableMissing {
            jdk_dir,
            diagnostics,
        }) => {
            let mut body = format!(
                "The JDK archive did not contain bin/java, expected it at {}.",
                jdk_dir.join("bin").join("java").display()
            );
            if !diagnostics.is_empty() {
                body.push('\n');
                body.push_str(diagnostics);
            }
            log_error("Unable to retrieve the JDK", body);
        }
        JavaBuildpackError::JdkInstall(error) => {
            log_error(
                "Unable to retrieve the JDK",
                format!("Could not install the JDK into {JDK_DIR}.\nCause: {error}"),
            );
        }
        JavaBuildpackError::AgentInstall(error) => {
            log_error(
                "Unable to install the Dynatrace agent",
                format!(
                    "DYNATRACE_SERVER is set, but the agent library could not be installed.\nCause: {error}"
                ),
            );
        }
        JavaBuildpackError::ProfileScript(error) => {
            log_error("Unable to write the profile script", error.to_string());
        }
        JavaBuildpackError::Release(error) => {
            log_error("Unable to write the release descriptor", error.to_string());
        }
        error @ JavaBuildpackError::ReadEnvDir(..) => {
            log_error("Unable to read the application environment", error.to_string());
        }
    }

    UNSPECIFIED_ERROR
}
