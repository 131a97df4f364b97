//! Add-in configuration loading.
//!
//! The installer is driven by a `Setup.ini` file:
//!
//! ```ini
//! [AddInContent]
//! Type = app
//! Name = TestApp
//! AssemblyName = TestApp.dll
//! FullClassName = TestApp.CsApp
//! VendorId = ACME
//!
//! [AddInFile]
//! FileName = TestApp.addin
//!
//! [PlatForm]
//! VersionCount = 1
//! Version_0 = 2024
//! PathX86_0 = 2024\x86
//! PathX64_0 = 2024\x64
//! ```
pub mod ini;

use std::fmt;
use std::path::Path;

use uuid::Uuid;

use crate::error::{ConfigError, ConfigErrors};
use ini::IniDocument;

/// Section holding the add-in registration content.
pub const SECTION_ADDIN_CONTENT: &str = "AddInContent";
/// Section holding the manifest file settings.
pub const SECTION_ADDIN_FILE: &str = "AddInFile";
/// Section listing the supported Revit versions.
pub const SECTION_PLATFORM: &str = "PlatForm";

const KEY_TYPE: &str = "Type";
const KEY_NAME: &str = "Name";
const KEY_ASSEMBLY_NAME: &str = "AssemblyName";
const KEY_FULL_CLASS_NAME: &str = "FullClassName";
const KEY_VENDOR_ID: &str = "VendorId";
const KEY_VENDOR_DESCRIPTION: &str = "VendorDescription";
const KEY_ADDIN_ID: &str = "AddInId";
const KEY_FILE_NAME: &str = "FileName";
const KEY_RESOURCE_FILE: &str = "ResourceFile";
const KEY_VERSION_COUNT: &str = "VersionCount";
const KEY_VERSION: &str = "Version";
const KEY_PATH_X86: &str = "PathX86";
const KEY_PATH_X64: &str = "PathX64";

/// Largest accepted `VersionCount`; three keys are read per version.
pub const MAX_VERSION_COUNT: usize = 1000;

/// Resource file copied into each Revit install directory when present.
pub const DEFAULT_RESOURCE_FILE: &str = "ProjectResource.dll";

/// Kind of Revit add-in being registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddInType {
    /// An external application (`IExternalApplication`).
    App,
    /// An external command (`IExternalCommand`).
    Cmd,
}

impl AddInType {
    /// Parse `app` / `cmd`, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("app") {
            Some(Self::App)
        } else if value.eq_ignore_ascii_case("cmd") {
            Some(Self::Cmd)
        } else {
            None
        }
    }
}

impl fmt::Display for AddInType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App => write!(f, "application"),
            Self::Cmd => write!(f, "command"),
        }
    }
}

/// Deployment settings for one supported Revit release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConfig {
    /// Version string matched against installed products (e.g., `"2024"`).
    pub app_version: String,
    /// Assembly directory for 32-bit Revit, relative to the base directory.
    pub path_x86: String,
    /// Assembly directory for 64-bit Revit, relative to the base directory.
    pub path_x64: String,
}

/// The parsed `Setup.ini` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddInConfig {
    /// Application or command.
    pub add_in_type: AddInType,
    /// Display name (application name, or command button text).
    pub add_in_name: String,
    /// Assembly file name (e.g., `"TestApp.dll"`).
    pub assembly_name: String,
    /// Fully-qualified entry class.
    pub full_class_name: String,
    /// Revit vendor id.
    pub vendor_id: String,
    /// Optional vendor description written to the manifest.
    pub vendor_description: Option<String>,
    /// Fixed registration id; a fresh one is generated per manifest when `None`.
    pub add_in_id: Option<Uuid>,
    /// File name of the `.addin` manifest.
    pub manifest_file_name: String,
    /// Auxiliary resource file name, relative to the base directory.
    pub resource_file: String,
    /// Supported Revit versions in file order.
    pub versions: Vec<VersionConfig>,
}

/// Load and validate an add-in configuration file.
///
/// Every missing or invalid key is reported; loading does not stop at the
/// first problem.
///
/// # Errors
///
/// Returns the full set of problems if the file is missing, unreadable,
/// malformed, or lacks any required key.
pub fn load(path: &Path) -> Result<AddInConfig, ConfigErrors> {
    let doc = IniDocument::load(path)?;
    from_document(&doc)
}

/// Build an [`AddInConfig`] from INI content held in memory.
///
/// # Errors
///
/// Same as [`load`], minus file access errors.
pub fn parse(content: &str) -> Result<AddInConfig, ConfigErrors> {
    let doc = IniDocument::parse(content)?;
    from_document(&doc)
}

/// Build an [`AddInConfig`] from a parsed INI document.
///
/// # Errors
///
/// Returns every missing or invalid key as one [`ConfigErrors`] set.
pub fn from_document(doc: &IniDocument) -> Result<AddInConfig, ConfigErrors> {
    let mut reader = KeyReader::new(doc);

    let type_value = reader.required(SECTION_ADDIN_CONTENT, KEY_TYPE);
    let add_in_name = reader.required(SECTION_ADDIN_CONTENT, KEY_NAME);
    let assembly_name = reader.required(SECTION_ADDIN_CONTENT, KEY_ASSEMBLY_NAME);
    let full_class_name = reader.required(SECTION_ADDIN_CONTENT, KEY_FULL_CLASS_NAME);
    let vendor_id = reader.required(SECTION_ADDIN_CONTENT, KEY_VENDOR_ID);
    let manifest_file_name = reader.required(SECTION_ADDIN_FILE, KEY_FILE_NAME);
    let count_value = reader.required(SECTION_PLATFORM, KEY_VERSION_COUNT);

    let add_in_type = type_value.as_deref().and_then(|value| {
        let parsed = AddInType::parse(value);
        if parsed.is_none() {
            reader.errors.push(ConfigError::InvalidAddInType(value.to_string()));
        }
        parsed
    });

    let add_in_id = doc
        .get_non_empty(SECTION_ADDIN_CONTENT, KEY_ADDIN_ID)
        .and_then(|value| match Uuid::parse_str(value) {
            Ok(id) => Some(id),
            Err(_) => {
                reader.errors.push(ConfigError::InvalidAddInId(value.to_string()));
                None
            }
        });

    let version_count = count_value.as_deref().and_then(|value| {
        let parsed = value
            .parse::<usize>()
            .ok()
            .filter(|count| *count <= MAX_VERSION_COUNT);
        if parsed.is_none() {
            reader.errors.push(ConfigError::InvalidFormat {
                key: KEY_VERSION_COUNT.to_string(),
                value: value.to_string(),
            });
        }
        parsed
    });

    let versions: Vec<VersionConfig> = (0..version_count.unwrap_or(0))
        .filter_map(|i| {
            let app_version = reader.required(SECTION_PLATFORM, &format!("{KEY_VERSION}_{i}"));
            let path_x86 = reader.required(SECTION_PLATFORM, &format!("{KEY_PATH_X86}_{i}"));
            let path_x64 = reader.required(SECTION_PLATFORM, &format!("{KEY_PATH_X64}_{i}"));
            Some(VersionConfig {
                app_version: app_version?,
                path_x86: path_x86?,
                path_x64: path_x64?,
            })
        })
        .collect();

    let vendor_description = doc
        .get_non_empty(SECTION_ADDIN_CONTENT, KEY_VENDOR_DESCRIPTION)
        .map(str::to_string);
    let resource_file = doc
        .get_non_empty(SECTION_ADDIN_FILE, KEY_RESOURCE_FILE)
        .unwrap_or(DEFAULT_RESOURCE_FILE)
        .to_string();

    let KeyReader { errors, .. } = reader;

    // Every `None` below has a matching entry in `errors`.
    match (
        add_in_type,
        add_in_name,
        assembly_name,
        full_class_name,
        vendor_id,
        manifest_file_name,
    ) {
        (
            Some(add_in_type),
            Some(add_in_name),
            Some(assembly_name),
            Some(full_class_name),
            Some(vendor_id),
            Some(manifest_file_name),
        ) if errors.is_empty() => Ok(AddInConfig {
            add_in_type,
            add_in_name,
            assembly_name,
            full_class_name,
            vendor_id,
            vendor_description,
            add_in_id,
            manifest_file_name,
            resource_file,
            versions,
        }),
        _ => Err(errors),
    }
}

/// Reads required keys, recording a [`ConfigError::MissingKey`] for each miss.
struct KeyReader<'a> {
    doc: &'a IniDocument,
    errors: ConfigErrors,
}

impl<'a> KeyReader<'a> {
    const fn new(doc: &'a IniDocument) -> Self {
        Self {
            doc,
            errors: ConfigErrors::new(),
        }
    }

    fn required(&mut self, section: &str, key: &str) -> Option<String> {
        let value = self.doc.get_non_empty(section, key).map(str::to_string);
        if value.is_none() {
            self.errors.push(ConfigError::MissingKey {
                section: section.to_string(),
                key: key.to_string(),
            });
        }
        value
    }
}
