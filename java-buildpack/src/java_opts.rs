use crate::agent::AgentDecision;
use crate::java_version::JavaVersion;
use crate::StagingEnv;
use std::fmt::{Display, Formatter};

pub const MEMORY_LIMIT_ENV_VAR: &str = "MEMORY_LIMIT";
pub const JVM_MEM_XMS_ENV_VAR: &str = "JVM_MEM_XMS";
pub const JVM_MEM_XMX_ENV_VAR: &str = "JVM_MEM_XMX";
pub const JVM_MEM_PERM_ENV_VAR: &str = "JVM_MEM_PERM";
pub const JVM_MEM_PERMMAX_ENV_VAR: &str = "JVM_MEM_PERMMAX";
pub const JVM_MEM_METASPACE_ENV_VAR: &str = "JVM_MEM_METASPACE";
pub const JVM_MEM_METASPACEMAX_ENV_VAR: &str = "JVM_MEM_METASPACEMAX";

// The values below end up inside a double-quoted shell string, hence the escaped quotes.
const TMPDIR_VALUE: &str = r#"\"$TMPDIR\""#;
const ON_OUT_OF_MEMORY_VALUE: &str = r#"\"echo oome killing pid: %p && kill -9 %p\""#;

/// Ordered JVM options, each a flag prefix (e.g. `-Xmx`) and a value appended to it verbatim.
///
/// The order of insertion is the order on the command line. Inserting a prefix that is already
/// present replaces its value without moving it.
///
/// # Examples
/// ```
/// use java_buildpack::java_opts::JavaOpts;
///
/// let mut java_opts = JavaOpts::new();
/// java_opts
///     .insert("-Xmx", "512m")
///     .insert("-XX:+UseParNewGC", "")
///     .insert_if_present("-XX:PermSize=", None::<&str>);
///
/// assert_eq!(java_opts.to_string(), "-Xmx512m -XX:+UseParNewGC");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JavaOpts {
    opts: Vec<(String, String)>,
}

impl JavaOpts {
    #[must_use]
    pub fn new() -> Self {
        JavaOpts::default()
    }

    pub fn insert(&mut self, prefix: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let prefix = prefix.into();
        let value = value.into();

        match self.opts.iter_mut().find(|(existing, _)| *existing == prefix) {
            Some((_, existing_value)) => *existing_value = value,
            None => self.opts.push((prefix, value)),
        }

        self
    }

    /// Inserts the option only when a value is given. An absent value never results in a flag
    /// with an empty value.
    pub fn insert_if_present(
        &mut self,
        prefix: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.insert(prefix, value);
        }

        self
    }

    #[must_use]
    pub fn get(&self, prefix: impl AsRef<str>) -> Option<&str> {
        self.opts
            .iter()
            .find(|(existing, _)| existing == prefix.as_ref())
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn contains(&self, prefix: impl AsRef<str>) -> bool {
        self.get(prefix).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.opts
            .iter()
            .map(|(prefix, value)| (prefix.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.opts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opts.is_empty()
    }
}

impl Display for JavaOpts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, (prefix, value)) in self.opts.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{prefix}{value}")?;
        }
        Ok(())
    }
}

/// Derives the JVM options for an application from its environment.
///
/// Heap, GC and diagnostic options are always present (heap sizes only when a value is
/// configured). Java 1.8 gets metaspace sizes, every other version gets permanent generation
/// sizes and the legacy accessor/compressed-oops options. The agent option, if any, comes last.
#[must_use]
pub fn resolve_java_opts(
    env: &StagingEnv,
    java_version: &JavaVersion,
    agent: &AgentDecision,
) -> JavaOpts {
    let memory_limit = env.get(MEMORY_LIMIT_ENV_VAR);

    let mut java_opts = JavaOpts::new();
    java_opts
        .insert_if_present("-Xms", env.get(JVM_MEM_XMS_ENV_VAR).or(memory_limit))
        .insert_if_present("-Xmx", env.get(JVM_MEM_XMX_ENV_VAR).or(memory_limit))
        .insert("-XX:+UseConcMarkSweepGC", "")
        .insert("-XX:+UseParNewGC", "")
        .insert("-XX:+AggressiveOpts", "")
        .insert("-Djava.io.tmpdir=", TMPDIR_VALUE)
        .insert("-XX:OnOutOfMemoryError=", ON_OUT_OF_MEMORY_VALUE);

    if java_version.is_default() {
        java_opts
            .insert_if_present("-XX:MetaspaceSize=", env.get(JVM_MEM_METASPACE_ENV_VAR))
            .insert_if_present(
                "-XX:MaxMetaspaceSize=",
                env.get(JVM_MEM_METASPACEMAX_ENV_VAR),
            );
    } else {
        java_opts
            .insert_if_present("-XX:PermSize=", env.get(JVM_MEM_PERM_ENV_VAR))
            .insert_if_present("-XX:MaxPermSize=", env.get(JVM_MEM_PERMMAX_ENV_VAR))
            .insert("-XX:+UseFastAccessorMethods", "")
            .insert("-XX:+UseCompressedOops", "");
    }

    if let Some((prefix, value)) = agent.java_opt(env) {
        java_opts.insert(prefix, value);
    }

    java_opts
}
