use serde::Serialize;
use std::collections::BTreeMap;

/// The release descriptor printed by `bin/release`.
///
/// This buildpack neither provisions add-ons, sets config vars nor defines process types, those
/// are left to the application or later buildpacks.
#[derive(Debug, Default, Serialize, Eq, PartialEq)]
pub struct Release {
    pub addons: Vec<String>,
    pub config_vars: BTreeMap<String, String>,
    pub default_process_types: BTreeMap<String, String>,
}

impl Release {
    pub fn to_yaml(&self) -> Result<String, ReleaseError> {
        serde_yaml::to_string(self).map_err(ReleaseError)
    }
}

#[derive(thiserror::Error, Debug)]
#[error("Could not serialize release descriptor: {0}")]
pub struct ReleaseError(#[source] serde_yaml::Error);
