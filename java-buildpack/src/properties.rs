//! Best-effort reader for Java `.properties` style files.
//!
//! This is intentionally not a strict parser. Legacy `system.properties` files in the wild
//! contain comments, stray text and values with inline `//` remarks. Lines are scanned one by
//! one and every line that does not look like `key=value` is skipped without an error.
use crate::log::log_warning;
use glob::MatchOptions;
use regex::Regex;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::OnceLock;
use std::{fs, io};

/// Name of the properties file applications use to select a Java version.
pub const SYSTEM_PROPERTIES_FILE_NAME: &str = "system.properties";

/// A typed value of a properties entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PropertyValue {
    String(String),
    Bool(bool),
}

impl Display for PropertyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::String(value) => f.write_str(value),
            PropertyValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// Entries read from a properties file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Properties {
    entries: HashMap<String, PropertyValue>,
}

impl Properties {
    /// Scans the given text for `key=value` lines.
    ///
    /// The key is everything before the first `=`, with surrounding whitespace removed. When the
    /// rest of the line contains `//`, everything from the last `//` on is a comment and dropped.
    /// The remaining value is used verbatim, except that exactly `true` and `false` become
    /// booleans. Later lines override earlier lines with the same key.
    ///
    /// # Examples
    /// ```
    /// use java_buildpack::properties::{Properties, PropertyValue};
    ///
    /// let properties = Properties::parse("java.runtime.version=1.7\nfoo=true//enabled\nnoise");
    ///
    /// assert_eq!(
    ///     properties.get("java.runtime.version"),
    ///     Some(&PropertyValue::String(String::from("1.7")))
    /// );
    /// assert_eq!(properties.get("foo"), Some(&PropertyValue::Bool(true)));
    /// assert_eq!(properties.len(), 2);
    /// ```
    #[must_use]
    pub fn parse(contents: &str) -> Self {
        let entries = contents
            .lines()
            .filter_map(|line| {
                commented_line_regex()
                    .captures(line)
                    .or_else(|| line_regex().captures(line))
                    .map(|captures| {
                        (
                            captures[1].trim().to_string(),
                            typed_value(&captures[2]),
                        )
                    })
            })
            .collect();

        Properties { entries }
    }

    #[must_use]
    pub fn get(&self, key: impl AsRef<str>) -> Option<&PropertyValue> {
        self.entries.get(key.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads and parses a properties file.
///
/// A file that does not exist yields empty properties, callers fall back to their defaults.
pub fn read_properties_file(path: impl AsRef<Path>) -> io::Result<Properties> {
    match fs::read_to_string(path.as_ref()) {
        Ok(contents) => Ok(Properties::parse(&contents)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Properties::default()),
        Err(error) => Err(error),
    }
}

/// Finds the first `system.properties` file below `build_dir` and parses it.
///
/// Hidden directories are not searched. If no file exists, or the file cannot be read, empty
/// properties are returned.
pub fn find_system_properties(build_dir: impl AsRef<Path>) -> Properties {
    let Some(path) = find_first(build_dir.as_ref(), SYSTEM_PROPERTIES_FILE_NAME) else {
        return Properties::default();
    };

    read_properties_file(&path).unwrap_or_else(|error| {
        log_warning(
            "Could not read system.properties",
            format!(
                "Ignoring {} and using defaults instead.\nCause: {error}",
                path.display()
            ),
        );
        Properties::default()
    })
}

/// Returns the first path below `dir` whose file name matches the given glob pattern.
pub(crate) fn find_first(dir: &Path, file_name_pattern: &str) -> Option<std::path::PathBuf> {
    let pattern = format!(
        "{}/**/{file_name_pattern}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );

    glob::glob_with(&pattern, HIDDEN_EXCLUDING_MATCH_OPTIONS)
        .ok()?
        .find_map(Result::ok)
}

const HIDDEN_EXCLUDING_MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

fn typed_value(raw: &str) -> PropertyValue {
    match raw {
        "true" => PropertyValue::Bool(true),
        "false" => PropertyValue::Bool(false),
        other => PropertyValue::String(other.to_string()),
    }
}

// `(.*)//` is greedy, so the comment starts at the last `//` of the line.
fn commented_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| compile_regex(r"^([^=]*)=(.*)//(.*)"))
}

fn line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| compile_regex(r"^([^=]*)=(.*)"))
}

fn compile_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("properties line patterns should be valid regular expressions")
}
