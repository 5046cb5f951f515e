//! JAR manifest parsing
//!
//! Provides [`Manifest`], the main attributes and named sections of a
//! `META-INF/MANIFEST.MF` file.
//!
//! # Format
//! - `Key: value` header lines
//! - a line starting with one space continues the previous value
//! - a blank line ends a section
//! - every section after the main one starts with `Name: <section>`
//!
//! Malformed input yields a [`Failure`] so that the comparison can report it
//! on the affected side.

use jardiff_core::Failure;
use std::collections::BTreeMap;

/// Attribute that names a section
pub const SECTION_NAME: &str = "Name";

/// Attributes of one section, by header name
pub type Attributes = BTreeMap<String, String>;

/// Parsed manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    main: Attributes,
    sections: BTreeMap<String, Attributes>,
}

impl Manifest {
    /// Parse manifest bytes
    ///
    /// # Errors
    /// Returns a [`Failure`] for invalid UTF-8, a header without `: `, a
    /// continuation line with no header before it, or a section without a
    /// `Name` attribute.
    pub fn parse(bytes: &[u8]) -> Result<Self, Failure> {
        let text = std::str::from_utf8(bytes)
            .map_err(|err| Failure::with_cause("manifest is not valid UTF-8", &err))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut parser = Parser::default();
        for (index, line) in text.lines().enumerate() {
            parser.line(index + 1, line)?;
        }
        parser.finish()
    }

    /// Main attributes
    #[inline]
    #[must_use]
    pub fn main(&self) -> &Attributes {
        &self.main
    }

    /// Named sections
    #[inline]
    #[must_use]
    pub fn sections(&self) -> &BTreeMap<String, Attributes> {
        &self.sections
    }

    /// Main attribute value
    #[must_use]
    pub fn main_attribute(&self, key: &str) -> Option<&str> {
        self.main.get(key).map(String::as_str)
    }

    /// Attributes of a named section
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Attributes> {
        self.sections.get(name)
    }
}

#[derive(Default)]
struct Parser {
    manifest: Manifest,
    main_done: bool,
    current: Attributes,
    last_key: Option<String>,
}

impl Parser {
    fn line(&mut self, number: usize, line: &str) -> Result<(), Failure> {
        if line.is_empty() {
            return self.end_section();
        }

        if let Some(continued) = line.strip_prefix(' ') {
            let value = self
                .last_key
                .as_ref()
                .and_then(|key| self.current.get_mut(key))
                .ok_or_else(|| {
                    Failure::new(format!("continuation line without header at line {number}"))
                })?;
            value.push_str(continued);
            return Ok(());
        }

        let (key, value) = header(line)
            .ok_or_else(|| Failure::new(format!("malformed header at line {number}")))?;
        self.current.insert(key.to_string(), value.to_string());
        self.last_key = Some(key.to_string());
        Ok(())
    }

    fn end_section(&mut self) -> Result<(), Failure> {
        self.last_key = None;
        let attributes = std::mem::take(&mut self.current);

        if !self.main_done {
            self.manifest.main = attributes;
            self.main_done = true;
            return Ok(());
        }
        if attributes.is_empty() {
            return Ok(());
        }

        let mut attributes = attributes;
        let name = attributes
            .remove(SECTION_NAME)
            .ok_or_else(|| Failure::new("section without Name"))?;
        self.manifest.sections.insert(name, attributes);
        Ok(())
    }

    fn finish(mut self) -> Result<Manifest, Failure> {
        self.end_section()?;
        Ok(self.manifest)
    }
}

fn header(line: &str) -> Option<(&str, &str)> {
    let (key, value) = match line.split_once(": ") {
        Some(split) => split,
        None => (line.strip_suffix(':')?, ""),
    };
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn manifest_main_attributes() {
        let manifest = Manifest::parse(b"Manifest-Version: 1.0\r\nClass-Path: .\r\n\r\n").unwrap();
        assert_eq!(manifest.main_attribute("Manifest-Version"), Some("1.0"));
        assert_eq!(manifest.main_attribute("Class-Path"), Some("."));
        assert!(manifest.sections().is_empty());
    }

    #[test]
    fn manifest_continuation_lines() {
        let manifest = Manifest::parse(b"Class-Path: lib/a.jar\n  lib/b.jar\n").unwrap();
        assert_eq!(manifest.main_attribute("Class-Path"), Some("lib/a.jar lib/b.jar"));
    }

    #[test]
    fn manifest_named_sections() {
        let text = "Manifest-Version: 1.0\n\nName: com/example/\nSealed: true\n\n\nName: a.class\nDigest: x\n";
        let manifest = Manifest::parse(text.as_bytes()).unwrap();
        assert_eq!(manifest.sections().len(), 2);
        assert_eq!(
            manifest.section("com/example/").and_then(|s| s.get("Sealed")).map(String::as_str),
            Some("true")
        );
        assert!(!manifest.section("a.class").unwrap().contains_key(SECTION_NAME));
    }

    #[test]
    fn manifest_without_trailing_newline() {
        let manifest = Manifest::parse(b"Created-By: jdk").unwrap();
        assert_eq!(manifest.main_attribute("Created-By"), Some("jdk"));
    }

    #[test]
    fn manifest_empty_value() {
        let manifest = Manifest::parse(b"Empty:\nBlank: \n").unwrap();
        assert_eq!(manifest.main_attribute("Empty"), Some(""));
        assert_eq!(manifest.main_attribute("Blank"), Some(""));
    }

    #[test]
    fn manifest_malformed_input_is_failure() {
        let no_colon = Manifest::parse(b"Manifest-Version 1.0\n").unwrap_err();
        assert_eq!(no_colon.hint(), "malformed header at line 1");

        let orphan = Manifest::parse(b" continued\n").unwrap_err();
        assert_eq!(orphan.hint(), "continuation line without header at line 1");

        let unnamed = Manifest::parse(b"A: 1\n\nSealed: true\n").unwrap_err();
        assert_eq!(unnamed.hint(), "section without Name");

        let binary = Manifest::parse(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert_eq!(binary.hint(), "manifest is not valid UTF-8");
    }
}
