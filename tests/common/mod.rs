use std::sync::Once;

use tracing_subscriber::fmt;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
pub fn init_tracing() {
    INIT.call_once(|| {
        fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Write an executable shell script, for use as a fake toolchain or child
/// program.
#[cfg(unix)]
#[allow(dead_code)]
pub fn write_script(path: &std::path::Path, contents: &str) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, contents).expect("writing script");
    let mut perms = std::fs::metadata(path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).expect("marking script executable");
}
