#![cfg(unix)]

mod common;

use std::error::Error;
use std::path::Path;

use hotswap::cli::CliArgs;
use hotswap::config::{resolve, Config};
use hotswap::errors::HotswapError;
use hotswap::exec::{builder, Supervisor};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

/// A fake toolchain that honours the `build -o <out> [flags...] <source>`
/// calling convention and emits a silently sleeping child program.
const FAKE_BUILD: &str = r#"#!/bin/sh
out="$3"
printf '#!/bin/sh\nexec sleep 30\n' > "$out"
chmod +x "$out"
"#;

const FAILING_BUILD: &str = "#!/bin/sh\nexit 7\n";

/// Reports success but produces nothing, like a no-op build.
const EMPTY_BUILD: &str = "#!/bin/sh\nexit 0\n";

fn test_config(root: &Path, build_script: &Path) -> Config {
    resolve(&CliArgs {
        root: Some(root.to_path_buf()),
        build_cmd: Some(build_script.display().to_string()),
        program: Some("app".into()),
        kill_timeout: Some("2s".into()),
        ..Default::default()
    })
    .expect("config resolves")
}

#[tokio::test]
async fn compile_produces_the_temporary_artifact() -> TestResult {
    common::init_tracing();
    let dir = TempDir::new()?;
    let script = dir.path().join("fakebuild");
    common::write_script(&script, FAKE_BUILD);

    let root = dir.path().join("proj");
    std::fs::create_dir(&root)?;

    let cfg = test_config(&root, &script);
    let paths = cfg.artifact_paths();

    builder::compile(&cfg, &paths).await?;
    assert!(paths.tmp.exists());
    assert!(!paths.canonical.exists());

    Ok(())
}

#[tokio::test]
async fn failed_build_reports_the_exit_code() -> TestResult {
    common::init_tracing();
    let dir = TempDir::new()?;
    let script = dir.path().join("fakebuild");
    common::write_script(&script, FAILING_BUILD);

    let root = dir.path().join("proj");
    std::fs::create_dir(&root)?;

    let cfg = test_config(&root, &script);
    let paths = cfg.artifact_paths();

    match builder::compile(&cfg, &paths).await {
        Err(HotswapError::BuildFailed(code)) => assert_eq!(code, 7),
        other => panic!("expected BuildFailed, got {other:?}"),
    }
    assert!(!paths.canonical.exists());

    Ok(())
}

#[tokio::test]
async fn successful_exit_without_artifact_is_an_error() -> TestResult {
    common::init_tracing();
    let dir = TempDir::new()?;
    let script = dir.path().join("fakebuild");
    common::write_script(&script, EMPTY_BUILD);

    let root = dir.path().join("proj");
    std::fs::create_dir(&root)?;

    let cfg = test_config(&root, &script);
    let paths = cfg.artifact_paths();

    match builder::compile(&cfg, &paths).await {
        Err(HotswapError::MissingArtifact(path)) => assert_eq!(path, paths.tmp),
        other => panic!("expected MissingArtifact, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn stale_artifacts_are_removed_before_building() -> TestResult {
    common::init_tracing();
    let dir = TempDir::new()?;
    let root = dir.path().join("proj");
    std::fs::create_dir(&root)?;

    let script = dir.path().join("fakebuild");
    common::write_script(&script, FAKE_BUILD);
    let cfg = test_config(&root, &script);
    let paths = cfg.artifact_paths();

    std::fs::write(&paths.tmp, "stale leftovers")?;
    builder::remove_stale_artifact(&paths, true);
    assert!(!paths.tmp.exists());

    Ok(())
}

#[tokio::test]
async fn two_swaps_in_a_row_keep_exactly_one_child() -> TestResult {
    common::init_tracing();
    let dir = TempDir::new()?;
    let script = dir.path().join("fakebuild");
    common::write_script(&script, FAKE_BUILD);

    let root = dir.path().join("proj");
    std::fs::create_dir(&root)?;

    let cfg = test_config(&root, &script);
    let paths = cfg.artifact_paths();
    let mut supervisor = Supervisor::new(cfg.kill_timeout);

    // First cycle.
    builder::compile(&cfg, &paths).await?;
    supervisor.swap(&paths, &cfg).await?;
    assert!(supervisor.is_running());
    assert!(paths.canonical.exists());
    assert!(!paths.tmp.exists());
    let first_pid = supervisor.child_id().expect("first child pid");

    // Second cycle, immediately after.
    builder::compile(&cfg, &paths).await?;
    supervisor.swap(&paths, &cfg).await?;
    assert!(supervisor.is_running());
    assert!(!paths.tmp.exists());
    let second_pid = supervisor.child_id().expect("second child pid");

    assert_ne!(first_pid, second_pid);

    // The old child was killed and reaped during the swap.
    #[cfg(target_os = "linux")]
    assert!(!Path::new(&format!("/proc/{first_pid}")).exists());

    supervisor.terminate_current().await;
    assert!(!supervisor.is_running());

    Ok(())
}

#[tokio::test]
async fn failed_build_leaves_the_previous_child_untouched() -> TestResult {
    common::init_tracing();
    let dir = TempDir::new()?;
    let good = dir.path().join("fakebuild");
    common::write_script(&good, FAKE_BUILD);
    let bad = dir.path().join("failbuild");
    common::write_script(&bad, FAILING_BUILD);

    let root = dir.path().join("proj");
    std::fs::create_dir(&root)?;

    let cfg = test_config(&root, &good);
    let paths = cfg.artifact_paths();
    let mut supervisor = Supervisor::new(cfg.kill_timeout);

    builder::compile(&cfg, &paths).await?;
    supervisor.swap(&paths, &cfg).await?;
    let pid = supervisor.child_id().expect("child pid");
    let canonical_before = std::fs::metadata(&paths.canonical)?.modified()?;

    // The next edit hits a broken build; the supervisor is never reached,
    // which is exactly what the engine does on a compile error.
    let mut broken = cfg.clone();
    broken.build_cmd = bad.display().to_string();
    assert!(builder::compile(&broken, &paths).await.is_err());

    assert!(supervisor.is_running());
    assert_eq!(supervisor.child_id(), Some(pid));
    assert_eq!(
        std::fs::metadata(&paths.canonical)?.modified()?,
        canonical_before
    );
    #[cfg(target_os = "linux")]
    assert!(Path::new(&format!("/proc/{pid}")).exists());

    supervisor.terminate_current().await;
    Ok(())
}
