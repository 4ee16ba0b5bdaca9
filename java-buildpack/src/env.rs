use std::collections::HashMap;
use std::path::Path;
use std::{env, fs, io};

/// Snapshot of the environment variables a staging run is resolved against.
///
/// All decision logic of this buildpack reads from a `StagingEnv` instead of the process
/// environment. This keeps resolution deterministic and allows tests to construct arbitrary
/// environments without mutating global process state.
///
/// An empty string is a present value. Only the absence of a key means "not configured".
///
/// # Examples
/// ```
/// use java_buildpack::StagingEnv;
///
/// let mut env = StagingEnv::empty();
/// env.insert("MEMORY_LIMIT", "512m");
///
/// assert_eq!(env.get("MEMORY_LIMIT"), Some("512m"));
/// assert_eq!(env.get("JVM_MEM_XMX"), None);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StagingEnv {
    inner: HashMap<String, String>,
}

impl StagingEnv {
    /// Creates a new `StagingEnv` from the environment variables of the current process.
    ///
    /// Variables whose name or value is not valid unicode are skipped, none of the variables
    /// this buildpack consumes can legitimately contain such values.
    #[must_use]
    pub fn from_current() -> Self {
        env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Creates an empty `StagingEnv`.
    #[must_use]
    pub fn empty() -> Self {
        StagingEnv {
            inner: HashMap::new(),
        }
    }

    /// Overlays the variables stored in an environment directory onto this environment.
    ///
    /// Platforms pass user-provided configuration to `bin/compile` as a directory that contains
    /// one file per variable: the file name is the variable name, the file contents its value.
    /// A single trailing newline is removed from each value. Values from the directory take
    /// precedence over values already present.
    pub fn overlay_env_dir(mut self, env_dir: impl AsRef<Path>) -> io::Result<Self> {
        for entry in fs::read_dir(env_dir.as_ref())? {
            let entry = entry?;

            if !entry.file_type()?.is_file() {
                continue;
            }

            if let Ok(key) = entry.file_name().into_string() {
                let contents = fs::read_to_string(entry.path())?;
                let value = contents.strip_suffix('\n').unwrap_or(&contents);
                self.inner.insert(key, value.to_string());
            }
        }

        Ok(self)
    }

    /// Inserts a key-value pair into the environment, overriding the value if `key` was already
    /// present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.inner.insert(key.into(), value.into());
        self
    }

    /// Returns the value for the given key, if present.
    #[must_use]
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        self.inner.get(key.as_ref()).map(String::as_str)
    }

    /// Returns true if the environment contains a value for the specified key.
    #[must_use]
    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.inner.contains_key(key.as_ref())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StagingEnv {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        StagingEnv {
            inner: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
