use crate::agent::{install_agent, AgentDecision};
use crate::fetch::PackageFetcher;
use crate::jdk::{install_jdk, JDK_DIR};
use crate::log::{log_header, log_info};
use crate::profile_script::{append_profile_script, render_profile_script};
use crate::properties::find_system_properties;
use crate::runtime_config::RuntimeConfig;
use crate::{JavaBuildpackError, StagingEnv};
use std::path::PathBuf;

/// Inputs of a staging run.
pub struct CompileContext<'a> {
    pub build_dir: PathBuf,
    pub env: StagingEnv,
    /// Fetcher and source for the JDK archive.
    pub jdk_fetcher: &'a dyn PackageFetcher,
    pub jdk_source: String,
    /// Fetcher for the Dynatrace agent library, the source is fixed.
    pub agent_fetcher: &'a dyn PackageFetcher,
}

/// Stages the Java runtime into the build directory: installs the JDK and, if configured, the
/// Dynatrace agent, then appends the profile script that sets up the runtime environment.
pub fn compile(context: &CompileContext<'_>) -> Result<RuntimeConfig, JavaBuildpackError> {
    log_header("Installing JDK");
    install_jdk(&context.build_dir, context.jdk_fetcher, &context.jdk_source)?;

    log_header("Installing Dynatrace agent");
    let agent = AgentDecision::decide(&context.env);
    install_agent(&agent, &context.build_dir, context.agent_fetcher)?;

    log_header("Configuring Java runtime");
    let properties = find_system_properties(&context.build_dir);
    let config = RuntimeConfig::resolve(&context.env, &properties, &agent);
    log_info(format!("Using Java version {}", config.java_version));

    let script = render_profile_script(&config, JDK_DIR);
    append_profile_script(&context.build_dir, &script)?;

    Ok(config)
}
