//! Build script: embeds the deployer version string at compile time.

use std::process::Command;

fn main() {
    // Prefer DEPLOYER_VERSION if set by the release pipeline, otherwise fall
    // back to git describe for local builds.
    if let Ok(version) = std::env::var("DEPLOYER_VERSION") {
        println!("cargo:rustc-env=DEPLOYER_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=DEPLOYER_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=DEPLOYER_VERSION");
}
