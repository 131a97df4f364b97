//! Key-value INI parsing with private-profile lookup semantics.
//!
//! Section and key lookups are case-insensitive and the first occurrence of a
//! key wins, matching how Windows installers read `Setup.ini` files. Values
//! keep their case, and only whole lines starting with `;` or `#` are
//! comments: `Name = Tool #1` reads as `Tool #1`.
use std::path::Path;

use crate::error::ConfigError;

/// A key-value section of an INI file.
///
/// # Examples
///
/// ```
/// use revit_addin_deployer::config::ini::KvSection;
///
/// let section = KvSection {
///     header: "AddInFile".to_string(),
///     entries: vec![("FileName".to_string(), "Plugin.addin".to_string())],
/// };
/// assert_eq!(section.header, "AddInFile");
/// assert_eq!(section.entries[0].1, "Plugin.addin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvSection {
    /// The section header as written (e.g., `"PlatForm"`).
    pub header: String,
    /// Key-value entries in file order.
    pub entries: Vec<(String, String)>,
}

/// A parsed INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<KvSection>,
}

impl IniDocument {
    /// Read and parse an INI file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist,
    /// [`ConfigError::Io`] if it cannot be read, or
    /// [`ConfigError::InvalidSyntax`] for a malformed line.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse INI content from a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use revit_addin_deployer::config::ini::IniDocument;
    ///
    /// let doc = IniDocument::parse("[PlatForm]\nVersionCount = 2\n").unwrap();
    /// assert_eq!(doc.get("platform", "versioncount"), Some("2"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSyntax`] if a line is not a header,
    /// comment, or `key = value` pair, or if an entry appears before the
    /// first section header.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut sections = Vec::new();
        let mut current: Option<KvSection> = None;

        for (line_num, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                continue;
            }

            if let Some(header) = parse_header(trimmed) {
                if let Some(section) = current.take() {
                    sections.push(section);
                }
                current = Some(KvSection {
                    header,
                    entries: Vec::new(),
                });
            } else if let Some(ref mut section) = current {
                let (key, value) =
                    parse_kv_line(trimmed).ok_or_else(|| ConfigError::InvalidSyntax {
                        line: line_num + 1,
                        content: trimmed.to_string(),
                    })?;
                section.entries.push((key, value));
            } else {
                return Err(ConfigError::InvalidSyntax {
                    line: line_num + 1,
                    content: trimmed.to_string(),
                });
            }
        }

        if let Some(section) = current {
            sections.push(section);
        }

        Ok(Self { sections })
    }

    /// Look up `key` in `section`, ignoring ASCII case in both names.
    ///
    /// When a section or key is repeated, the first occurrence wins.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .filter(|s| s.header.eq_ignore_ascii_case(section))
            .flat_map(|s| s.entries.iter())
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Look up a value, treating an empty string the same as a missing key.
    #[must_use]
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|v| !v.is_empty())
    }
}

/// Parse a `[header]` line, preserving case.
fn parse_header(line: &str) -> Option<String> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Parse a `key = value` line.
///
/// - `"Name = Plugin ; v2"` → `("Name", "Plugin ; v2")`
/// - `"PathX64_0 = \"bin 64\""` → `("PathX64_0", "bin 64")`
fn parse_kv_line(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = strip_quotes(value.trim());
    Some((key.to_string(), value.to_string()))
}

/// Remove one pair of surrounding double quotes.
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_section() {
        let doc = IniDocument::parse("[AddInFile]\nFileName = Plugin.addin\n")
            .expect("test data should parse");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].header, "AddInFile");
        assert_eq!(doc.get("AddInFile", "FileName"), Some("Plugin.addin"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let doc = IniDocument::parse("[PlatForm]\nVersionCount=1\n").unwrap();
        assert_eq!(doc.get("Platform", "VERSIONCOUNT"), Some("1"));
        assert_eq!(doc.get("platform", "versioncount"), Some("1"));
    }

    #[test]
    fn values_preserve_case() {
        let doc = IniDocument::parse("[AddInContent]\nFullClassName = TestApp.CsApp\n").unwrap();
        assert_eq!(
            doc.get("addincontent", "fullclassname"),
            Some("TestApp.CsApp")
        );
    }

    #[test]
    fn first_occurrence_wins() {
        let doc =
            IniDocument::parse("[A]\nkey = first\nkey = second\n[a]\nkey = third\n").unwrap();
        assert_eq!(doc.get("A", "key"), Some("first"));
    }

    #[test]
    fn repeated_section_is_searched() {
        let doc = IniDocument::parse("[A]\none = 1\n[B]\nx = y\n[A]\ntwo = 2\n").unwrap();
        assert_eq!(doc.get("A", "two"), Some("2"));
    }

    #[test]
    fn missing_key_and_section() {
        let doc = IniDocument::parse("[A]\nkey = v\n").unwrap();
        assert_eq!(doc.get("A", "other"), None);
        assert_eq!(doc.get("B", "key"), None);
    }

    #[test]
    fn empty_value_is_not_non_empty() {
        let doc = IniDocument::parse("[A]\nkey =\n").unwrap();
        assert_eq!(doc.get("A", "key"), Some(""));
        assert_eq!(doc.get_non_empty("A", "key"), None);
    }

    #[test]
    fn comments_and_blank_lines_ignored() {
        let doc = IniDocument::parse("; header comment\n\n[A]\n# note\nkey = v\n\n").unwrap();
        assert_eq!(doc.sections[0].entries.len(), 1);
    }

    #[test]
    fn comment_markers_inside_values_are_kept() {
        let doc = IniDocument::parse("[A]\nName = Tool #1\nVendorId = ACME ; Corp\nk = a;b\n")
            .unwrap();
        assert_eq!(doc.get("A", "Name"), Some("Tool #1"));
        assert_eq!(doc.get("A", "VendorId"), Some("ACME ; Corp"));
        assert_eq!(doc.get("A", "k"), Some("a;b"));
    }

    #[test]
    fn surrounding_quotes_stripped() {
        let doc = IniDocument::parse("[A]\npath = \"Program Files\\x64\"\n").unwrap();
        assert_eq!(doc.get("A", "path"), Some("Program Files\\x64"));
    }

    #[test]
    fn equals_in_value_kept() {
        let doc = IniDocument::parse("[A]\nkey = a=b\n").unwrap();
        assert_eq!(doc.get("A", "key"), Some("a=b"));
    }

    #[test]
    fn byte_order_mark_ignored() {
        let doc = IniDocument::parse("\u{feff}[A]\nkey = v\n").unwrap();
        assert_eq!(doc.get("A", "key"), Some("v"));
    }

    #[test]
    fn windows_line_endings() {
        let doc = IniDocument::parse("[A]\r\nkey = v\r\n").unwrap();
        assert_eq!(doc.get("A", "key"), Some("v"));
    }

    #[test]
    fn entry_outside_section_fails() {
        let err = IniDocument::parse("key = v\n[A]\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSyntax { line: 1, .. }));
    }

    #[test]
    fn line_without_equals_fails() {
        let err = IniDocument::parse("[A]\njust text\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSyntax { line: 2, .. }));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = IniDocument::load(&dir.path().join("Setup.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Setup.ini");
        std::fs::write(&path, "[AddInFile]\nFileName = x.addin\n").unwrap();
        let doc = IniDocument::load(&path).unwrap();
        assert_eq!(doc.get("AddInFile", "FileName"), Some("x.addin"));
    }

    #[test]
    fn empty_input_has_no_sections() {
        assert!(IniDocument::parse("").unwrap().sections.is_empty());
    }
}
