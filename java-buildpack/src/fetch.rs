use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};

/// Transfers a named package from a source to a local file.
///
/// Implementations own their transport policy (timeouts and the like). Callers treat every
/// error as fatal, there is no retry at this level.
pub trait PackageFetcher {
    /// Fetches `package` from `source` and writes it to `destination`, replacing any existing
    /// file at that path.
    fn fetch_package(&self, package: &str, source: &str, destination: &Path)
        -> Result<(), FetchError>;
}

/// Fetches packages over HTTP(S). `source` is a base URL, the package is requested from
/// `<source>/<package>`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    #[must_use]
    pub fn new() -> Self {
        HttpFetcher {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(Duration::from_secs(5))
                .timeout_read(Duration::from_secs(15))
                .build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        HttpFetcher::new()
    }
}

impl PackageFetcher for HttpFetcher {
    fn fetch_package(
        &self,
        package: &str,
        source: &str,
        destination: &Path,
    ) -> Result<(), FetchError> {
        let url = format!("{}/{package}", source.trim_end_matches('/'));

        let mut response_reader = self
            .agent
            .get(&url)
            .call()
            .map_err(|error| FetchError::Request {
                url: url.clone(),
                source: Box::new(error),
            })?
            .into_reader();

        let mut destination_file =
            fs::File::create(destination).map_err(|error| FetchError::CreateDestination {
                destination: destination.to_path_buf(),
                source: error,
            })?;

        io::copy(&mut response_reader, &mut destination_file).map_err(|error| {
            FetchError::WriteDestination {
                destination: destination.to_path_buf(),
                source: error,
            }
        })?;

        Ok(())
    }
}

/// Fetches packages from a local directory. `source` is the directory that contains the package.
///
/// Used for archives that ship inside the buildpack itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryFetcher;

impl PackageFetcher for DirectoryFetcher {
    fn fetch_package(
        &self,
        package: &str,
        source: &str,
        destination: &Path,
    ) -> Result<(), FetchError> {
        let package_path = Path::new(source).join(package);

        fs::copy(&package_path, destination)
            .map(|_| ())
            .map_err(|error| FetchError::Copy {
                package_path,
                destination: destination.to_path_buf(),
                source: error,
            })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    // Boxed to prevent `large_enum_variant` errors since `ureq::Error` is massive.
    #[error("HTTP request to {url} failed: {source}")]
    Request {
        url: String,
        source: Box<ureq::Error>,
    },

    #[error("Could not create {}: {source}", destination.display())]
    CreateDestination {
        destination: PathBuf,
        source: io::Error,
    },

    #[error("Could not write {}: {source}", destination.display())]
    WriteDestination {
        destination: PathBuf,
        source: io::Error,
    },

    #[error("Could not copy {} to {}: {source}", package_path.display(), destination.display())]
    Copy {
        package_path: PathBuf,
        destination: PathBuf,
        source: io::Error,
    },
}
