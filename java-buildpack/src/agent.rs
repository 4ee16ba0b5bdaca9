//! Installation of the Dynatrace agent library.
//!
//! The agent is installed when, and only when, `DYNATRACE_SERVER` is set. Its value is not
//! inspected, an empty value still enables the agent.
use crate::fetch::{FetchError, PackageFetcher};
use crate::log::log_info;
use crate::StagingEnv;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DYNATRACE_SERVER_ENV_VAR: &str = "DYNATRACE_SERVER";
pub const DYNATRACE_AGENT_NAME_ENV_VAR: &str = "DYNATRACE_AGENT_NAME";
pub const VCAP_APPLICATION_ENV_VAR: &str = "VCAP_APPLICATION";

pub const DYNATRACE_AGENT_DOWNLOAD: &str = "http://download.test.cf.hybris.com/dynatrace";
pub const DYNATRACE_AGENT_LIB: &str = "libdtagent-6.0.0.so";

/// Directory, relative to the build directory, that receives the agent library.
pub const AGENT_LIB_DIR: &str = "lib";

const AGENT_PATH_PREFIX: &str = "-agentpath:";
const AGENT_TUNING: &str = "wait=45,transformationmaxavgwait=256,storage=.";

/// Whether the agent library is installed, and from where to where.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AgentDecision {
    pub install: bool,
    pub library: String,
    pub download_source: String,
    /// Path of the library at runtime, relative to the application's working directory.
    pub runtime_path: String,
}

impl AgentDecision {
    #[must_use]
    pub fn decide(env: &StagingEnv) -> Self {
        AgentDecision {
            install: env.contains_key(DYNATRACE_SERVER_ENV_VAR),
            library: String::from(DYNATRACE_AGENT_LIB),
            download_source: String::from(DYNATRACE_AGENT_DOWNLOAD),
            runtime_path: format!("./{AGENT_LIB_DIR}/{DYNATRACE_AGENT_LIB}"),
        }
    }

    /// The `-agentpath:` JVM option that loads the installed agent, as prefix and value.
    ///
    /// The agent reports under `DYNATRACE_AGENT_NAME`, falling back to the application name from
    /// `VCAP_APPLICATION`. Without either the name is left empty.
    #[must_use]
    pub fn java_opt(&self, env: &StagingEnv) -> Option<(&'static str, String)> {
        if !self.install {
            return None;
        }

        let name = env
            .get(DYNATRACE_AGENT_NAME_ENV_VAR)
            .map(String::from)
            .or_else(|| application_name(env))
            .unwrap_or_default();
        let server = env.get(DYNATRACE_SERVER_ENV_VAR).unwrap_or_default();

        Some((
            AGENT_PATH_PREFIX,
            format!(
                "{}=name={name},server={server},{AGENT_TUNING}",
                self.runtime_path
            ),
        ))
    }
}

/// Fetches the agent library into `<build_dir>/lib` if the decision says so.
///
/// Once installation was decided, a failed transfer is an error: silently continuing would
/// start the application without the agent it was configured for.
pub fn install_agent(
    decision: &AgentDecision,
    build_dir: &Path,
    fetcher: &dyn PackageFetcher,
) -> Result<Option<PathBuf>, AgentInstallError> {
    if !decision.install {
        log_info("DYNATRACE_SERVER is not set, skipping Dynatrace agent installation");
        return Ok(None);
    }

    let lib_dir = build_dir.join(AGENT_LIB_DIR);
    fs::create_dir_all(&lib_dir)
        .map_err(|error| AgentInstallError::CreateLibDirectory(lib_dir.clone(), error))?;

    log_info(format!(
        "Downloading Dynatrace agent lib: {}",
        decision.library
    ));

    let destination = lib_dir.join(&decision.library);
    fetcher.fetch_package(&decision.library, &decision.download_source, &destination)?;

    Ok(Some(destination))
}

#[derive(thiserror::Error, Debug)]
pub enum AgentInstallError {
    #[error("Could not create agent library directory {0}: {1}")]
    CreateLibDirectory(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Deserialize)]
struct VcapApplication {
    name: Option<String>,
    application_name: Option<String>,
}

fn application_name(env: &StagingEnv) -> Option<String> {
    let vcap_application: VcapApplication =
        serde_json::from_str(env.get(VCAP_APPLICATION_ENV_VAR)?).ok()?;

    vcap_application
        .name
        .or(vcap_application.application_name)
}
