use crate::properties::find_first;
use std::path::Path;

/// Name printed by `bin/detect` when the buildpack applies.
pub const BUILDPACK_NAME: &str = "Java";

/// The buildpack applies to any build directory that contains compiled Java code, i.e. a
/// `.jar` or `.class` file anywhere outside of hidden directories.
#[must_use]
pub fn detect(build_dir: impl AsRef<Path>) -> bool {
    ["*.jar", "*.class"]
        .iter()
        .any(|pattern| find_first(build_dir.as_ref(), pattern).is_some())
}
