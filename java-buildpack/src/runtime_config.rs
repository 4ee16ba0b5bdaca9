use crate::agent::AgentDecision;
use crate::java_opts::{resolve_java_opts, JavaOpts};
use crate::java_version::JavaVersion;
use crate::properties::Properties;
use crate::StagingEnv;

/// The Java version and JVM options resolved for one staging run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuntimeConfig {
    pub java_version: JavaVersion,
    pub java_opts: JavaOpts,
}

impl RuntimeConfig {
    /// Resolves the runtime configuration. Missing inputs lead to omitted options or defaults,
    /// this never fails.
    #[must_use]
    pub fn resolve(env: &StagingEnv, properties: &Properties, agent: &AgentDecision) -> Self {
        let java_version = JavaVersion::resolve(env, properties);
        let java_opts = resolve_java_opts(env, &java_version, agent);

        RuntimeConfig {
            java_version,
            java_opts,
        }
    }
}
