use crate::properties::Properties;
use crate::StagingEnv;
use std::fmt::{Display, Formatter};

/// Java version used when neither the environment nor `system.properties` selects one.
pub const DEFAULT_JAVA_VERSION: &str = "1.8";

pub const JAVA_VERSION_ENV_VAR: &str = "JAVA_VERSION";

/// Key in `system.properties` that selects the Java version.
pub const JAVA_RUNTIME_VERSION_PROPERTY: &str = "java.runtime.version";

/// The Java version the JVM options are derived for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JavaVersion(String);

impl JavaVersion {
    /// Resolves the Java version, first match wins:
    ///
    /// 1. the `JAVA_VERSION` environment variable
    /// 2. `java.runtime.version` from `system.properties`
    /// 3. [`DEFAULT_JAVA_VERSION`]
    ///
    /// # Examples
    /// ```
    /// use java_buildpack::java_version::JavaVersion;
    /// use java_buildpack::properties::Properties;
    /// use java_buildpack::StagingEnv;
    ///
    /// let properties = Properties::parse("java.runtime.version=1.7");
    ///
    /// assert_eq!(JavaVersion::resolve(&StagingEnv::empty(), &properties).as_str(), "1.7");
    /// ```
    #[must_use]
    pub fn resolve(env: &StagingEnv, properties: &Properties) -> Self {
        let version = env
            .get(JAVA_VERSION_ENV_VAR)
            .map(String::from)
            .or_else(|| {
                properties
                    .get(JAVA_RUNTIME_VERSION_PROPERTY)
                    .map(ToString::to_string)
            })
            .unwrap_or_else(|| String::from(DEFAULT_JAVA_VERSION));

        JavaVersion(version)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is exactly the default version. Any other value, including `1.8.0`, selects
    /// the options for pre-metaspace JVMs.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_JAVA_VERSION
    }
}

impl From<&str> for JavaVersion {
    fn from(value: &str) -> Self {
        JavaVersion(value.to_string())
    }
}

impl Display for JavaVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
