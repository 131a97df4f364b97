#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `uninst` command.
//!
//! Round trips install then uninstall against the same product list, and
//! checks that removal is safe to repeat.

mod common;

use std::path::Path;

use common::*;
use revit_addin_deployer::commands::deploy::run_with;
use revit_addin_deployer::deploy::{Action, DeployOptions, DeployReport};
use revit_addin_deployer::error::{DeployerError, ResolveError};
use revit_addin_deployer::logging::StepStatus;
use revit_addin_deployer::products::{Architecture, FixedProductLister};

fn run(
    fixture: &InstallerFixture,
    action: Action,
    lister: &FixedProductLister,
    log: &RecordingLog,
) -> anyhow::Result<DeployReport> {
    run_with(
        action,
        Path::new("Setup.ini"),
        &fixture.base_dir(),
        lister,
        DeployOptions::default(),
        log,
    )
}

fn two_products(fixture: &InstallerFixture) -> FixedProductLister {
    InstallerFixture::lister(vec![
        fixture.product("2024", "2024", Architecture::X64),
        fixture.product("2024_Update1", "2024u1", Architecture::X86),
    ])
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

/// Installing then uninstalling leaves no manifest behind.
#[test]
fn uninstall_after_install_leaves_no_manifests() {
    let fixture = InstallerFixture::new();
    let lister = two_products(&fixture);
    let log = RecordingLog::default();

    run(&fixture, Action::Install, &lister, &log).unwrap();
    assert!(has_files(&fixture.addin_folder("2024")));

    let report = run(&fixture, Action::Uninstall, &lister, &log).unwrap();

    assert_eq!(report.manifests.changed, 2);
    assert!(!has_files(&fixture.addin_folder("2024")));
    assert!(!has_files(&fixture.addin_folder("2024u1")));
}

/// The resource file copied on install is removed on uninstall.
#[test]
fn uninstall_removes_resource_file() {
    let fixture = InstallerFixture::new();
    fixture.write_base_file("ProjectResource.dll", "resource");
    let lister = two_products(&fixture);
    let log = RecordingLog::default();

    run(&fixture, Action::Install, &lister, &log).unwrap();
    let copied = fixture.install_location("2024").join("ProjectResource.dll");
    assert!(copied.exists());

    let report = run(&fixture, Action::Uninstall, &lister, &log).unwrap();

    assert_eq!(report.resources.changed, 2);
    assert!(!copied.exists());
}

/// Uninstall does not need the assembly or resource file to be shipped.
#[test]
fn uninstall_ignores_installer_payload() {
    let fixture = InstallerFixture::empty();
    fixture.write_config("Setup.ini", SETUP_INI);
    let manifest = fixture.addin_folder("2024").join("Plugin.addin");
    std::fs::create_dir_all(manifest.parent().unwrap()).unwrap();
    std::fs::write(&manifest, "registered").unwrap();
    let lister = InstallerFixture::lister(vec![fixture.product("2024", "2024", Architecture::X64)]);
    let log = RecordingLog::default();

    run(&fixture, Action::Uninstall, &lister, &log).unwrap();

    assert!(!manifest.exists());
    assert!(log.messages("warn").is_empty());
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

/// A second uninstall finds nothing to remove and still succeeds.
#[test]
fn uninstall_twice_is_not_an_error() {
    let fixture = InstallerFixture::new();
    let lister = two_products(&fixture);
    let log = RecordingLog::default();

    run(&fixture, Action::Install, &lister, &log).unwrap();
    run(&fixture, Action::Uninstall, &lister, &log).unwrap();
    let second = RecordingLog::default();
    let report = run(&fixture, Action::Uninstall, &lister, &second).unwrap();

    assert_eq!(report.manifests.changed, 0);
    assert_eq!(report.manifests.already_ok, 2);
    assert_eq!(
        second.step_status("Remove add-in manifests"),
        Some(StepStatus::Ok)
    );
}

/// Uninstalling something never installed succeeds.
#[test]
fn uninstall_without_prior_install_succeeds() {
    let fixture = InstallerFixture::new();
    let lister = two_products(&fixture);

    let report = run(&fixture, Action::Uninstall, &lister, &RecordingLog::default()).unwrap();

    assert_eq!(report.manifests.changed, 0);
    assert_eq!(report.resources.changed, 0);
}

// ---------------------------------------------------------------------------
// Fatal errors
// ---------------------------------------------------------------------------

/// Resolution failures stop uninstall just as they stop install.
#[test]
fn uninstall_without_products_fails() {
    let fixture = InstallerFixture::new();

    let err = run(
        &fixture,
        Action::Uninstall,
        &InstallerFixture::lister(vec![]),
        &RecordingLog::default(),
    )
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DeployerError>(),
        Some(DeployerError::Resolve(ResolveError::NoProductsInstalled))
    ));
}

/// Products that do not match any configured version are left alone.
#[test]
fn uninstall_leaves_unmatched_products_alone() {
    let fixture = InstallerFixture::new();
    let other = fixture.addin_folder("2023").join("Plugin.addin");
    std::fs::create_dir_all(other.parent().unwrap()).unwrap();
    std::fs::write(&other, "registered").unwrap();
    let lister = InstallerFixture::lister(vec![
        fixture.product("2023", "2023", Architecture::X64),
        fixture.product("2024", "2024", Architecture::X64),
    ]);

    run(&fixture, Action::Uninstall, &lister, &RecordingLog::default()).unwrap();

    assert!(other.exists());
}
