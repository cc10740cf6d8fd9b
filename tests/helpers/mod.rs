//! Shared helpers for integration tests

/// Write an executable shell script stub standing in for an external
/// engine binary
#[cfg(unix)]
pub fn write_stub(path: &std::path::Path, script: &str) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::write(path, script).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}
