// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed installer layout (INI file, assembly
// folders, fake Revit add-in tree) and a recording logger so each integration
// test can run the deployer end to end without touching the host.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use revit_addin_deployer::logging::{Log, StepStatus};
use revit_addin_deployer::products::{Architecture, FixedProductLister, InstalledProduct};

/// A single-version command add-in targeting Revit 2024.
pub const SETUP_INI: &str = "\
; sample add-in description
[AddInContent]
Type = cmd
Name = Plugin
AssemblyName = Plugin.dll
FullClassName = Plugin.Command
VendorId = ACME

[AddInFile]
FileName = Plugin.addin

[PlatForm]
VersionCount = 1
Version_0 = 2024
PathX86_0 = bin86
PathX64_0 = bin64
";

/// Logger that keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingLog {
    /// `(level, message)` pairs in emission order.
    pub lines: RefCell<Vec<(&'static str, String)>>,
    /// Recorded step results.
    pub steps: RefCell<Vec<(String, StepStatus)>>,
}

impl RecordingLog {
    /// Messages logged at `level`.
    pub fn messages(&self, level: &str) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Status recorded for the step called `name`.
    pub fn step_status(&self, name: &str) -> Option<StepStatus> {
        self.steps
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| *s)
    }

    fn push(&self, level: &'static str, msg: &str) {
        self.lines.borrow_mut().push((level, msg.to_string()));
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_step(&self, name: &str, status: StepStatus, _message: Option<&str>) {
        self.steps.borrow_mut().push((name.to_string(), status));
    }
}

/// An isolated installer directory backed by a [`tempfile::TempDir`].
///
/// Layout:
/// - `setup/`                      installer base directory
/// - `programdata/Addins/<year>/`  all-users add-in folders
/// - `programs/Revit <year>/`      install locations
#[derive(Debug)]
pub struct InstallerFixture {
    /// Temporary root holding the whole layout.
    pub root: tempfile::TempDir,
}

impl InstallerFixture {
    /// Create a fixture with [`SETUP_INI`] and its x64 assembly in place.
    pub fn new() -> Self {
        let fixture = Self::empty();
        fixture.write_config("Setup.ini", SETUP_INI);
        fixture.write_base_file("bin64/Plugin.dll", "assembly");
        fixture
    }

    /// Create a fixture with an empty installer directory.
    pub fn empty() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("setup")).expect("create setup dir");
        Self { root }
    }

    /// Installer base directory.
    pub fn base_dir(&self) -> PathBuf {
        self.root.path().join("setup")
    }

    /// Write `content` to `setup/<name>`.
    pub fn write_config(&self, name: &str, content: &str) -> PathBuf {
        self.write_base_file(name, content)
    }

    /// Write a file below the installer directory, creating parents.
    pub fn write_base_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.base_dir().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write installer file");
        path
    }

    /// An installed product named `version_name` with the given layout year.
    pub fn product(&self, version_name: &str, year: &str, arch: Architecture) -> InstalledProduct {
        InstalledProduct {
            version_name: version_name.to_string(),
            architecture: arch,
            all_users_addin_folder: self.addin_folder(year),
            current_user_addin_folder: None,
            install_location: self.install_location(year),
        }
    }

    /// A lister reporting `products`.
    pub fn lister(products: Vec<InstalledProduct>) -> FixedProductLister {
        FixedProductLister::new(products)
    }

    /// All-users add-in folder for `year`.
    pub fn addin_folder(&self, year: &str) -> PathBuf {
        self.root
            .path()
            .join("programdata")
            .join("Addins")
            .join(year)
    }

    /// Install location for `year`.
    pub fn install_location(&self, year: &str) -> PathBuf {
        self.root.path().join("programs").join(format!("Revit {year}"))
    }

    /// Write a TOML product inventory listing `products` and return its path.
    pub fn write_inventory(&self, products: &[InstalledProduct]) -> PathBuf {
        let mut toml = String::new();
        for p in products {
            toml.push_str("[[product]]\n");
            toml.push_str(&format!("version_name = '{}'\n", p.version_name));
            toml.push_str(&format!("architecture = '{}'\n", p.architecture));
            toml.push_str(&format!(
                "all_users_addin_folder = '{}'\n",
                p.all_users_addin_folder.display()
            ));
            toml.push_str(&format!(
                "install_location = '{}'\n\n",
                p.install_location.display()
            ));
        }
        let path = self.root.path().join("products.toml");
        std::fs::write(&path, toml).expect("write inventory");
        path
    }
}

/// Return `true` if `dir` contains at least one file.
pub fn has_files(dir: &Path) -> bool {
    std::fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_some())
}
