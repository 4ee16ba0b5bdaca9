//! Runs whole staging phases, through the library and through the buildpack executable linked
//! as `bin/detect`, `bin/compile` and `bin/release`.

// Required due to: https://github.com/rust-lang/rust/issues/95513
#![allow(unused_crate_dependencies)]

use flate2::write::GzEncoder;
use flate2::Compression;
use java_buildpack::compile::{compile, CompileContext};
use java_buildpack::fetch::{DirectoryFetcher, FetchError, PackageFetcher};
use java_buildpack::jdk::{JdkInstallError, JDK_PACKAGE};
use java_buildpack::{JavaBuildpackError, StagingEnv};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tar::{Builder, Header};
use tempfile::TempDir;

const BUILDPACK_BINARY_UNDER_TEST: &str = env!("CARGO_BIN_EXE_java-buildpack");

#[derive(Default)]
struct StubAgentFetcher {
    packages: RefCell<Vec<String>>,
}

impl PackageFetcher for StubAgentFetcher {
    fn fetch_package(
        &self,
        package: &str,
        source: &str,
        destination: &Path,
    ) -> Result<(), FetchError> {
        self.packages.borrow_mut().push(format!("{source}/{package}"));
        fs::write(destination, b"\x7fELF").map_err(|error| FetchError::WriteDestination {
            destination: destination.to_path_buf(),
            source: error,
        })
    }
}

#[test]
fn compile_stages_jdk_and_profile_script() {
    let resources_dir = jdk_resources(&[("bin/java", "#!/bin/sh\n", 0o755)]);
    let build_dir = build_dir_with_system_properties(Some("java.runtime.version=1.8\n"));
    let agent_fetcher = StubAgentFetcher::default();

    let config = compile(&CompileContext {
        build_dir: build_dir.path().to_path_buf(),
        env: StagingEnv::from_iter([("MEMORY_LIMIT", "512m")]),
        jdk_fetcher: &DirectoryFetcher,
        jdk_source: resources_dir.path().to_string_lossy().into_owned(),
        agent_fetcher: &agent_fetcher,
    })
    .unwrap();

    assert_eq!(config.java_version.as_str(), "1.8");
    assert!(build_dir.path().join(".jdk/bin/java").is_file());
    assert!(!build_dir.path().join(".jdk/jdk.tar.gz").exists());
    assert!(!build_dir.path().join("lib").exists());
    assert!(agent_fetcher.packages.into_inner().is_empty());

    let script = fs::read_to_string(build_dir.path().join(".profile.d/java.sh")).unwrap();
    assert!(script.starts_with("#!/bin/bash\n"));
    assert!(script.contains(r#"export JAVA_HOME="$HOME/.jdk""#));
    assert!(script.contains(r#"export JAVA_OPTS=${JAVA_OPTS:-"-Xms512m -Xmx512m "#));
    assert!(!script.contains("-agentpath:"));
}

#[test]
fn compile_twice_appends_profile_script_twice() {
    let resources_dir = jdk_resources(&[("bin/java", "#!/bin/sh\n", 0o755)]);
    let build_dir = build_dir_with_system_properties(None);
    let context = CompileContext {
        build_dir: build_dir.path().to_path_buf(),
        env: StagingEnv::empty(),
        jdk_fetcher: &DirectoryFetcher,
        jdk_source: resources_dir.path().to_string_lossy().into_owned(),
        agent_fetcher: &StubAgentFetcher::default(),
    };

    compile(&context).unwrap();
    compile(&context).unwrap();

    let script = fs::read_to_string(build_dir.path().join(".profile.d/java.sh")).unwrap();
    assert_eq!(script.matches("#!/bin/bash\n").count(), 2);
}

#[test]
fn compile_with_dynatrace_agent() {
    let resources_dir = jdk_resources(&[("bin/java", "#!/bin/sh\n", 0o755)]);
    let build_dir = build_dir_with_system_properties(Some("java.runtime.version=1.7\n"));
    let agent_fetcher = StubAgentFetcher::default();

    let config = compile(&CompileContext {
        build_dir: build_dir.path().to_path_buf(),
        env: StagingEnv::from_iter([
            ("DYNATRACE_SERVER", "dt.example.com:9998"),
            ("VCAP_APPLICATION", r#"{"name":"myapp"}"#),
            ("JVM_MEM_PERMMAX", "256m"),
        ]),
        jdk_fetcher: &DirectoryFetcher,
        jdk_source: resources_dir.path().to_string_lossy().into_owned(),
        agent_fetcher: &agent_fetcher,
    })
    .unwrap();

    assert_eq!(config.java_version.as_str(), "1.7");
    assert_eq!(
        agent_fetcher.packages.into_inner(),
        ["http://download.test.cf.hybris.com/dynatrace/libdtagent-6.0.0.so"]
    );
    assert!(build_dir.path().join("lib/libdtagent-6.0.0.so").is_file());

    let script = fs::read_to_string(build_dir.path().join(".profile.d/java.sh")).unwrap();
    assert!(script.contains(
        "-XX:MaxPermSize=256m -XX:+UseFastAccessorMethods -XX:+UseCompressedOops -agentpath:./lib/libdtagent-6.0.0.so=name=myapp,server=dt.example.com:9998,wait=45,transformationmaxavgwait=256,storage=.\"}"
    ));
}

#[test]
fn compile_fails_without_java_executable() {
    let resources_dir = jdk_resources(&[("README", "not a jdk", 0o644)]);
    let build_dir = build_dir_with_system_properties(None);

    let error = compile(&CompileContext {
        build_dir: build_dir.path().to_path_buf(),
        env: StagingEnv::empty(),
        jdk_fetcher: &DirectoryFetcher,
        jdk_source: resources_dir.path().to_string_lossy().into_owned(),
        agent_fetcher: &StubAgentFetcher::default(),
    })
    .unwrap_err();

    assert!(matches!(
        error,
        JavaBuildpackError::JdkInstall(JdkInstallError::JavaExecutableMissing { .. })
    ));
    assert!(!build_dir.path().join(".profile.d").exists());
}

#[test]
#[cfg(unix)]
fn detect_binary() {
    let buildpack_dir = buildpack_dir(None);
    let build_dir = tempfile::tempdir().unwrap();

    let output = run_phase(&buildpack_dir, "detect", &[build_dir.path()], &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    fs::write(build_dir.path().join("app.jar"), b"").unwrap();

    let output = run_phase(&buildpack_dir, "detect", &[build_dir.path()], &[]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Java\n");
}

#[test]
#[cfg(unix)]
fn release_binary() {
    let buildpack_dir = buildpack_dir(None);
    let build_dir = tempfile::tempdir().unwrap();

    let output = run_phase(&buildpack_dir, "release", &[build_dir.path()], &[]);

    assert_eq!(output.status.code(), Some(0));
    let release: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(release["addons"], serde_yaml::Value::Sequence(Vec::new()));
    assert!(release["config_vars"].as_mapping().unwrap().is_empty());
    assert!(release["default_process_types"]
        .as_mapping()
        .unwrap()
        .is_empty());
}

#[test]
#[cfg(unix)]
fn unknown_phase_binary() {
    let buildpack_dir = buildpack_dir(None);

    let output = run_phase(&buildpack_dir, "supply", &[], &[]);

    assert_eq!(output.status.code(), Some(255));
    assert!(String::from_utf8_lossy(&output.stderr).contains("but it was 'supply'"));
}

#[test]
#[cfg(unix)]
fn compile_binary_with_env_dir() {
    let buildpack_dir = buildpack_dir(Some(&[("bin/java", "#!/bin/sh\n", 0o755)]));
    let build_dir = build_dir_with_system_properties(Some("java.runtime.version=1.8\n"));
    let cache_dir = tempfile::tempdir().unwrap();
    let env_dir = tempfile::tempdir().unwrap();
    fs::write(env_dir.path().join("JVM_MEM_METASPACEMAX"), "256m\n").unwrap();

    let output = run_phase(
        &buildpack_dir,
        "compile",
        &[build_dir.path(), cache_dir.path(), env_dir.path()],
        &[("MEMORY_LIMIT", "1g")],
    );

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-----> Installing JDK"));
    assert!(stdout.contains("Using Java version 1.8"));

    assert!(build_dir.path().join(".jdk/bin/java").is_file());
    let script = fs::read_to_string(build_dir.path().join(".profile.d/java.sh")).unwrap();
    assert!(script.contains("-Xms1g -Xmx1g"));
    assert!(script.contains("-XX:MaxMetaspaceSize=256m\"}"));
}

#[test]
#[cfg(unix)]
fn compile_binary_without_java_executable() {
    let buildpack_dir = buildpack_dir(Some(&[("README", "not a jdk", 0o644)]));
    let build_dir = build_dir_with_system_properties(None);
    let cache_dir = tempfile::tempdir().unwrap();

    let output = run_phase(
        &buildpack_dir,
        "compile",
        &[build_dir.path(), cache_dir.path()],
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unable to retrieve the JDK"));
}

fn write_tarball(path: &Path, entries: &[(&str, &str, u32)]) {
    let mut builder = Builder::new(GzEncoder::new(
        fs::File::create(path).unwrap(),
        Compression::default(),
    ));

    for (entry_path, contents, mode) in entries {
        let mut header = Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(*mode);
        header.set_cksum();
        builder
            .append_data(&mut header, entry_path, contents.as_bytes())
            .unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap();
}

fn jdk_resources(entries: &[(&str, &str, u32)]) -> TempDir {
    let resources_dir = tempfile::tempdir().unwrap();
    write_tarball(&resources_dir.path().join(JDK_PACKAGE), entries);
    resources_dir
}

fn build_dir_with_system_properties(system_properties: Option<&str>) -> TempDir {
    let build_dir = tempfile::tempdir().unwrap();
    fs::write(build_dir.path().join("app.jar"), b"").unwrap();

    if let Some(system_properties) = system_properties {
        fs::create_dir_all(build_dir.path().join("config")).unwrap();
        fs::write(
            build_dir.path().join("config/system.properties"),
            system_properties,
        )
        .unwrap();
    }

    build_dir
}

// Lays out a buildpack the way the platform sees it: `bin/{detect,compile,release}` linked to
// the executable under test and, optionally, the bundled JDK archive in `resources/`.
#[cfg(unix)]
fn buildpack_dir(jdk_entries: Option<&[(&str, &str, u32)]>) -> TempDir {
    let buildpack_dir = tempfile::tempdir().unwrap();
    let bin_dir = buildpack_dir.path().join("bin");
    fs::create_dir_all(&bin_dir).unwrap();

    for phase in ["detect", "compile", "release", "supply"] {
        std::os::unix::fs::symlink(BUILDPACK_BINARY_UNDER_TEST, bin_dir.join(phase)).unwrap();
    }

    if let Some(jdk_entries) = jdk_entries {
        let resources_dir = buildpack_dir.path().join("resources");
        fs::create_dir_all(&resources_dir).unwrap();
        write_tarball(&resources_dir.join(JDK_PACKAGE), jdk_entries);
    }

    buildpack_dir
}

fn run_phase(
    buildpack_dir: &TempDir,
    phase: &str,
    args: &[&Path],
    env: &[(&str, &str)],
) -> Output {
    let executable: PathBuf = buildpack_dir.path().join("bin").join(phase);

    Command::new(&executable)
        .args(args)
        .env_clear()
        .envs(env.iter().copied())
        .output()
        .unwrap()
}
