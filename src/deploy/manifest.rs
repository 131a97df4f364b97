//! Revit `.addin` manifest construction and serialization.
use anyhow::{Context as _, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::{AddInConfig, AddInType};

/// An external application registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddInApplication {
    /// Application name.
    pub name: String,
    /// Path of the plugin assembly.
    pub assembly: PathBuf,
    /// Registration id.
    pub add_in_id: Uuid,
    /// Entry class implementing `IExternalApplication`.
    pub full_class_name: String,
    /// Vendor id.
    pub vendor_id: String,
    /// Optional vendor description.
    pub vendor_description: Option<String>,
}

/// An external command registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddInCommand {
    /// Path of the plugin assembly.
    pub assembly: PathBuf,
    /// Registration id.
    pub add_in_id: Uuid,
    /// Entry class implementing `IExternalCommand`.
    pub full_class_name: String,
    /// Button text shown in the Revit UI.
    pub text: String,
    /// Vendor id.
    pub vendor_id: String,
    /// Optional vendor description.
    pub vendor_description: Option<String>,
}

/// A `.addin` manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddInManifest {
    /// Application entries.
    pub applications: Vec<AddInApplication>,
    /// Command entries.
    pub commands: Vec<AddInCommand>,
}

impl AddInManifest {
    /// Build a single-entry manifest registering `assembly` as configured.
    #[must_use]
    pub fn for_config(config: &AddInConfig, assembly: &Path, add_in_id: Uuid) -> Self {
        let mut manifest = Self::default();
        match config.add_in_type {
            AddInType::App => manifest.applications.push(AddInApplication {
                name: config.add_in_name.clone(),
                assembly: assembly.to_path_buf(),
                add_in_id,
                full_class_name: config.full_class_name.clone(),
                vendor_id: config.vendor_id.clone(),
                vendor_description: config.vendor_description.clone(),
            }),
            AddInType::Cmd => manifest.commands.push(AddInCommand {
                assembly: assembly.to_path_buf(),
                add_in_id,
                full_class_name: config.full_class_name.clone(),
                text: config.add_in_name.clone(),
                vendor_id: config.vendor_id.clone(),
                vendor_description: config.vendor_description.clone(),
            }),
        }
        manifest
    }

    /// Serialize the manifest as a Revit add-in XML document.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut xml =
            String::from("<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"no\"?>\n");
        xml.push_str("<RevitAddIns>\n");
        for app in &self.applications {
            xml.push_str("  <AddIn Type=\"Application\">\n");
            push_element(&mut xml, "Name", &app.name);
            push_element(&mut xml, "Assembly", &app.assembly.display().to_string());
            push_element(&mut xml, "AddInId", &app.add_in_id.to_string());
            push_element(&mut xml, "FullClassName", &app.full_class_name);
            push_element(&mut xml, "VendorId", &app.vendor_id);
            if let Some(description) = &app.vendor_description {
                push_element(&mut xml, "VendorDescription", description);
            }
            xml.push_str("  </AddIn>\n");
        }
        for cmd in &self.commands {
            xml.push_str("  <AddIn Type=\"Command\">\n");
            push_element(&mut xml, "Assembly", &cmd.assembly.display().to_string());
            push_element(&mut xml, "AddInId", &cmd.add_in_id.to_string());
            push_element(&mut xml, "FullClassName", &cmd.full_class_name);
            push_element(&mut xml, "Text", &cmd.text);
            push_element(&mut xml, "VendorId", &cmd.vendor_id);
            if let Some(description) = &cmd.vendor_description {
                push_element(&mut xml, "VendorDescription", description);
            }
            xml.push_str("  </AddIn>\n");
        }
        xml.push_str("</RevitAddIns>\n");
        xml
    }

    /// Write the manifest to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// cannot be written.
    pub fn save_as(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create parent: {}", parent.display()))?;
        }
        std::fs::write(path, self.to_xml())
            .with_context(|| format!("write manifest: {}", path.display()))
    }
}

fn push_element(xml: &mut String, name: &str, value: &str) {
    let _ = writeln!(xml, "    <{name}>{}</{name}>", escape(value));
}

/// Escape XML special characters in text content.
///
/// # Examples
///
/// ```
/// use revit_addin_deployer::deploy::manifest::escape;
///
/// assert_eq!(escape("R&D <Tools>"), "R&amp;D &lt;Tools&gt;");
/// ```
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
