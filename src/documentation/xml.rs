use std::{collections::HashMap, fs, path::Path};

use quick_xml::{events::Event, Reader};

use super::DocumentationProvider;
use crate::{LoadError, LoadResult};

/// Documentation read from an XML documentation file.
///
/// The file layout is the one compilers emit next to a compiled image:
///
/// ```xml
/// <doc>
///   <assembly><name>Lib</name></assembly>
///   <members>
///     <member name="T:Lib.Widget"><summary>A widget.</summary></member>
///   </members>
/// </doc>
/// ```
///
/// The inner XML of every `member` element is stored verbatim (trimmed), keyed by its `name`
/// attribute. When an id appears more than once, the first entry wins.
///
/// # Examples
///
/// ```rust
/// use metaref::documentation::{DocumentationProvider, XmlDocumentationProvider};
///
/// let provider = XmlDocumentationProvider::parse(
///     r#"<doc><members><member name="T:Lib.Widget"><summary>A widget.</summary></member></members></doc>"#,
/// )?;
/// assert_eq!(
///     provider.documentation("T:Lib.Widget"),
///     Some("<summary>A widget.</summary>")
/// );
/// # Ok::<(), metaref::LoadError>(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct XmlDocumentationProvider {
    members: HashMap<String, String>,
}

impl XmlDocumentationProvider {
    /// Parses the content of a documentation file.
    ///
    /// # Errors
    /// Returns [`LoadError::Malformed`] if the text is not well-formed XML or a `member` element
    /// lacks a readable `name` attribute.
    pub fn parse(text: &str) -> LoadResult<Self> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut members = HashMap::new();
        let mut depth = 0_usize;
        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) if start.local_name().as_ref() == b"member" => {
                    let id = member_id(&start)?;
                    let body = reader.read_text(start.name()).map_err(|error| {
                        malformed_error!("Invalid documentation for '{}' - {}", id, error)
                    })?;
                    members
                        .entry(id)
                        .or_insert_with(|| body.trim().to_string());
                }
                Ok(Event::Empty(start)) if start.local_name().as_ref() == b"member" => {
                    let id = member_id(&start)?;
                    members.entry(id).or_insert_with(String::new);
                }
                Ok(Event::Start(_)) => depth += 1,
                Ok(Event::End(_)) => depth = depth.saturating_sub(1),
                Ok(Event::Eof) if depth > 0 => {
                    return Err(malformed_error!("Documentation XML ends inside an element"))
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(error) => {
                    return Err(malformed_error!(
                        "Invalid documentation XML at position {} - {}",
                        reader.buffer_position(),
                        error
                    ))
                }
            }
        }

        Ok(XmlDocumentationProvider { members })
    }

    /// Parses raw documentation file bytes, which must be UTF-8.
    ///
    /// # Errors
    /// Returns [`LoadError::Malformed`] if the data is not UTF-8 or not valid documentation XML.
    pub fn from_bytes(data: &[u8]) -> LoadResult<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|error| malformed_error!("Documentation is not UTF-8 - {}", error))?;

        Self::parse(text.strip_prefix('\u{feff}').unwrap_or(text))
    }

    /// Reads and parses a documentation file.
    ///
    /// # Errors
    /// Returns [`LoadError::NotFound`] if the file does not exist, [`LoadError::Io`] if it can
    /// not be read, and [`LoadError::Malformed`] if its content is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|error| LoadError::from_io(error, Some(path)))?;

        Self::from_bytes(&data)
    }

    /// Number of documented members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Iterates over the documented ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}

impl DocumentationProvider for XmlDocumentationProvider {
    fn documentation(&self, documentation_id: &str) -> Option<&str> {
        self.members.get(documentation_id).map(String::as_str)
    }

    fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

fn member_id(start: &quick_xml::events::BytesStart<'_>) -> LoadResult<String> {
    let attribute = start
        .try_get_attribute("name")
        .map_err(|error| malformed_error!("Invalid member attribute - {}", error))?
        .ok_or_else(|| malformed_error!("Documentation member without a name"))?;

    let id = attribute
        .unescape_value()
        .map_err(|error| malformed_error!("Invalid member name - {}", error))?;

    Ok(id.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<doc>
    <assembly>
        <name>Lib</name>
    </assembly>
    <members>
        <member name="T:Lib.Widget">
            <summary>A widget.</summary>
        </member>
        <member name="M:Lib.Widget.Spin(System.Int32)">
            <summary>Spins the widget.</summary>
            <param name="turns">How often.</param>
        </member>
        <member name="F:Lib.Widget.Empty"/>
        <member name="T:Lib.Widget">
            <summary>Shadowed.</summary>
        </member>
    </members>
</doc>"#;

    #[test]
    fn test_parse_members() {
        let provider = XmlDocumentationProvider::parse(SAMPLE).unwrap();

        assert_eq!(provider.len(), 3);
        assert!(!provider.is_empty());
        assert_eq!(
            provider.documentation("T:Lib.Widget"),
            Some("<summary>A widget.</summary>")
        );
        let spin = provider
            .documentation("M:Lib.Widget.Spin(System.Int32)")
            .unwrap();
        assert!(spin.starts_with("<summary>Spins the widget.</summary>"));
        assert!(spin.contains(r#"<param name="turns">How often.</param>"#));
        assert_eq!(provider.documentation("F:Lib.Widget.Empty"), Some(""));
        assert!(provider.documentation("T:Lib.Missing").is_none());
    }

    #[test]
    fn test_escaped_member_name() {
        let provider = XmlDocumentationProvider::parse(
            r#"<doc><members><member name="M:Lib.Box`1.op_LessThan(Lib.Box{`0})&amp;"><summary/></member></members></doc>"#,
        )
        .unwrap();
        assert!(provider
            .documentation("M:Lib.Box`1.op_LessThan(Lib.Box{`0})&")
            .is_some());
    }

    #[test]
    fn test_member_without_name() {
        let result =
            XmlDocumentationProvider::parse("<doc><members><member>text</member></members></doc>");
        assert!(matches!(result, Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_malformed_xml() {
        let result = XmlDocumentationProvider::parse("<doc><members><member name=\"T:A\"></doc>");
        assert!(matches!(result, Err(LoadError::Malformed { .. })));

        let truncated = XmlDocumentationProvider::parse("<doc><members>");
        assert!(matches!(truncated, Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_from_bytes_with_bom() {
        let mut data = vec![0xEF, 0xBB, 0xBF];
        data.extend_from_slice(SAMPLE.as_bytes());
        let provider = XmlDocumentationProvider::from_bytes(&data).unwrap();
        assert_eq!(provider.len(), 3);

        assert!(matches!(
            XmlDocumentationProvider::from_bytes(&[0xFF, 0xFE, 0x00]),
            Err(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Lib.xml");
        fs::write(&path, SAMPLE).unwrap();

        let provider = XmlDocumentationProvider::from_file(&path).unwrap();
        assert_eq!(provider.ids().count(), 3);

        assert!(matches!(
            XmlDocumentationProvider::from_file(dir.path().join("Other.xml")),
            Err(LoadError::NotFound { .. })
        ));
    }
}
