use crate::fetch::{FetchError, PackageFetcher};
use crate::log::{log_info, log_warning};
use flate2::read::GzDecoder;
use std::fs;
use std::path::{Path, PathBuf};
use tar::Archive;

/// Directory, relative to the build directory, that the JDK is unpacked into. At runtime it is
/// found relative to `$HOME`, which the platform points at the application directory.
pub const JDK_DIR: &str = ".jdk";

/// The JDK archive that ships with the buildpack.
pub const JDK_PACKAGE: &str = "openjdk-1.8.0_65.tar.gz";

const JDK_TARBALL: &str = "jdk.tar.gz";

/// Fetches the JDK archive from `source`, unpacks it into `<build_dir>/.jdk` and verifies the
/// result contains `bin/java`.
///
/// The downloaded archive is removed afterwards, whether unpacking succeeded or not. Errors
/// during unpacking are not returned directly, they are reported as part of
/// [`JdkInstallError::JavaExecutableMissing`] if the JDK turns out to be unusable.
pub fn install_jdk(
    build_dir: &Path,
    fetcher: &dyn PackageFetcher,
    source: &str,
) -> Result<PathBuf, JdkInstallError> {
    let jdk_dir = build_dir.join(JDK_DIR);
    fs::create_dir_all(&jdk_dir)
        .map_err(|error| JdkInstallError::CreateJdkDirectory(jdk_dir.clone(), error))?;

    let tarball = RemoveOnDrop(jdk_dir.join(JDK_TARBALL));

    log_info("Downloading JDK...");
    fetcher.fetch_package(JDK_PACKAGE, source, &tarball.0)?;

    log_info(format!("Unpacking JDK to {JDK_DIR}"));
    let unpack_result = unpack_tarball(&tarball.0, &jdk_dir);
    drop(tarball);

    let diagnostics = match unpack_result {
        Ok(()) => String::new(),
        Err(error) => error.to_string(),
    };

    if !jdk_dir.join("bin").join("java").is_file() {
        return Err(JdkInstallError::JavaExecutableMissing {
            jdk_dir,
            diagnostics,
        });
    }

    if !diagnostics.is_empty() {
        log_warning("Unpacking the JDK reported errors", diagnostics);
    }

    Ok(jdk_dir)
}

fn unpack_tarball(tarball: &Path, destination: &Path) -> std::io::Result<()> {
    let file = fs::File::open(tarball)?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive.set_preserve_permissions(true);
    archive.unpack(destination)
}

// Removes the file on drop, also when installation bails out early.
struct RemoveOnDrop(PathBuf);

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        // Drop implementations must not panic. A missing file is not an error here.
        let _result = fs::remove_file(&self.0);
    }
}

#[derive(thiserror::Error, Debug)]
pub enum JdkInstallError {
    #[error("Could not create JDK directory {0}: {1}")]
    CreateJdkDirectory(PathBuf, #[source] std::io::Error),

    #[error("Could not fetch the JDK: {0}")]
    Fetch(#[from] FetchError),

    #[error("No Java executable found in {} after unpacking the JDK", jdk_dir.display())]
    JavaExecutableMissing { jdk_dir: PathBuf, diagnostics: String },
}
