use std::env;
use std::fs;
use std::path::PathBuf;

/// Embeds the workspace `VERSION` file as `MEDIAGUARD_VERSION`.
fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let Some(workspace_root) = manifest_dir.ancestors().nth(2) else {
        panic!("mediaguard-app must live two levels below the workspace root");
    };
    let version_path = workspace_root.join("VERSION");
    println!("cargo:rerun-if-changed={}", version_path.display());

    let version = fs::read_to_string(&version_path)
        .unwrap_or_else(|error| panic!("read {}: {error}", version_path.display()));
    let version = version.trim();
    assert!(
        version.split('.').count() == 3 && version.split('.').all(|part| !part.is_empty()),
        "VERSION must be MAJOR.MINOR.PATCH, got '{version}'"
    );

    println!("cargo:rustc-env=MEDIAGUARD_VERSION={version}");
}
