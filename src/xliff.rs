//! Conversion between a [`MessageCatalogue`] and XLIFF 1.2 text.
//!
//! This speaks the dialect the Phrase API produces and consumes for its
//! `symfony_xliff` file format: a single `<file>` element per document,
//! one `<trans-unit>` per message addressed by the `resname` attribute,
//! plain-text content. Inline markup inside `<source>`/`<target>` is
//! flattened to its text content.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

use crate::catalogue::MessageCatalogue;

const XLIFF_VERSION: &str = "1.2";
const XLIFF_XMLNS: &str = "urn:oasis:names:tc:xliff:document:1.2";
const DEFAULT_SOURCE_LOCALE: &str = "en";

#[derive(Debug, Error)]
pub enum XliffError {
    #[error("XLIFF parse error: {0}")]
    Parse(String),

    #[error("XLIFF serialize error: {0}")]
    Serialize(String),
}

/// Options for [`catalogue_to_content`].
#[derive(Debug, Clone, Default)]
pub struct XliffOptions {
    /// Locale emitted as the document's `source-language`.
    /// Defaults to `"en"` when unset.
    pub default_locale: Option<String>,
}

/// Which element's text is currently being collected during parsing.
enum Capture {
    None,
    Source,
    Target,
}

/// Parse XLIFF text into a catalogue scoped to `locale`, placing every
/// translation unit under `domain`.
///
/// The unit key is its `resname` attribute, falling back to the `<source>`
/// text; the value is the `<target>` text, falling back to `<source>` when
/// the target is missing or empty (an untranslated unit). Units carrying
/// neither a resname nor source text are skipped.
pub fn content_to_catalogue(
    content: &str,
    locale: &str,
    domain: &str,
) -> Result<MessageCatalogue, XliffError> {
    let mut reader = Reader::from_str(content);

    let mut catalogue = MessageCatalogue::new(locale);
    let mut saw_root = false;

    // Per trans-unit state. Only the first <source>/<target> of a unit is
    // collected, so <alt-trans> blocks cannot shadow the actual content.
    let mut in_unit = false;
    let mut resname: Option<String> = None;
    let mut source: Option<String> = None;
    let mut target: Option<String> = None;
    let mut capture = Capture::None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| XliffError::Parse(e.to_string()))?;

        match event {
            Event::Start(start) => match start.local_name().as_ref() {
                b"xliff" => saw_root = true,
                b"trans-unit" => {
                    in_unit = true;
                    resname = attribute(&start, "resname")?;
                    source = None;
                    target = None;
                }
                b"source" if in_unit && source.is_none() => {
                    source = Some(String::new());
                    capture = Capture::Source;
                }
                b"target" if in_unit && target.is_none() => {
                    target = Some(String::new());
                    capture = Capture::Target;
                }
                _ => {}
            },
            Event::Empty(start) => match start.local_name().as_ref() {
                // <source/> and <target/> count as present but empty
                b"source" if in_unit && source.is_none() => source = Some(String::new()),
                b"target" if in_unit && target.is_none() => target = Some(String::new()),
                _ => {}
            },
            Event::Text(text) => {
                let buffer = match capture {
                    Capture::Source => source.as_mut(),
                    Capture::Target => target.as_mut(),
                    Capture::None => None,
                };
                if let Some(buffer) = buffer {
                    let decoded = text
                        .unescape()
                        .map_err(|e| XliffError::Parse(e.to_string()))?;
                    buffer.push_str(&decoded);
                }
            }
            Event::CData(cdata) => {
                let buffer = match capture {
                    Capture::Source => source.as_mut(),
                    Capture::Target => target.as_mut(),
                    Capture::None => None,
                };
                if let Some(buffer) = buffer {
                    let decoded = std::str::from_utf8(cdata.as_ref())
                        .map_err(|e| XliffError::Parse(e.to_string()))?;
                    buffer.push_str(decoded);
                }
            }
            Event::End(end) => match end.local_name().as_ref() {
                b"source" | b"target" => capture = Capture::None,
                b"trans-unit" => {
                    let source_text = source.take().unwrap_or_default();
                    let target_text = target.take().unwrap_or_default();

                    let key = match resname.take().filter(|name| !name.is_empty()) {
                        Some(name) => name,
                        None => source_text.clone(),
                    };
                    if !key.is_empty() {
                        let translation = if target_text.is_empty() {
                            source_text
                        } else {
                            target_text
                        };
                        catalogue.set(domain, &key, &translation);
                    }

                    in_unit = false;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(XliffError::Parse(
            "document has no <xliff> root element".to_string(),
        ));
    }

    Ok(catalogue)
}

/// Serialize the given domain's entries from `catalogue` into XLIFF text.
///
/// Units are written in key order with sequential ids, `<source>` set to
/// the key and `<target>` to the translation. A domain with no entries
/// still yields a complete, valid document with an empty `<body>`.
pub fn catalogue_to_content(
    catalogue: &MessageCatalogue,
    domain: &str,
    options: &XliffOptions,
) -> Result<String, XliffError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;

    let mut xliff = BytesStart::new("xliff");
    xliff.push_attribute(("xmlns", XLIFF_XMLNS));
    xliff.push_attribute(("version", XLIFF_VERSION));
    write(&mut writer, Event::Start(xliff))?;

    let source_language = options
        .default_locale
        .as_deref()
        .unwrap_or(DEFAULT_SOURCE_LOCALE);
    let mut file = BytesStart::new("file");
    file.push_attribute(("source-language", source_language));
    file.push_attribute(("target-language", catalogue.locale()));
    file.push_attribute(("datatype", "plaintext"));
    file.push_attribute(("original", "file.ext"));
    write(&mut writer, Event::Start(file))?;

    write(&mut writer, Event::Start(BytesStart::new("header")))?;
    let mut tool = BytesStart::new("tool");
    tool.push_attribute(("tool-id", "phrase-storage"));
    tool.push_attribute(("tool-name", "phrase-storage"));
    write(&mut writer, Event::Empty(tool))?;
    write(&mut writer, Event::End(BytesEnd::new("header")))?;

    write(&mut writer, Event::Start(BytesStart::new("body")))?;

    if let Some(messages) = catalogue.domain(domain) {
        for (id, (key, translation)) in messages.iter().enumerate() {
            let mut unit = BytesStart::new("trans-unit");
            unit.push_attribute(("id", (id + 1).to_string().as_str()));
            unit.push_attribute(("resname", key.as_str()));
            write(&mut writer, Event::Start(unit))?;

            write(&mut writer, Event::Start(BytesStart::new("source")))?;
            write(&mut writer, Event::Text(BytesText::new(key)))?;
            write(&mut writer, Event::End(BytesEnd::new("source")))?;

            write(&mut writer, Event::Start(BytesStart::new("target")))?;
            write(&mut writer, Event::Text(BytesText::new(translation)))?;
            write(&mut writer, Event::End(BytesEnd::new("target")))?;

            write(&mut writer, Event::End(BytesEnd::new("trans-unit")))?;
        }
    }

    write(&mut writer, Event::End(BytesEnd::new("body")))?;
    write(&mut writer, Event::End(BytesEnd::new("file")))?;
    write(&mut writer, Event::End(BytesEnd::new("xliff")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| XliffError::Serialize(e.to_string()))
}

fn attribute(start: &BytesStart<'_>, name: &str) -> Result<Option<String>, XliffError> {
    let attr = start
        .try_get_attribute(name)
        .map_err(|e| XliffError::Parse(e.to_string()))?;
    match attr {
        Some(attr) => {
            let value = attr
                .unescape_value()
                .map_err(|e| XliffError::Parse(e.to_string()))?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XliffError> {
    writer
        .write_event(event)
        .map_err(|e| XliffError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<xliff xmlns="urn:oasis:names:tc:xliff:document:1.2" version="1.2">
  <file source-language="en" target-language="de" datatype="plaintext" original="file.ext">
    <body>
      <trans-unit id="1" resname="messages::checkout.title">
        <source>messages::checkout.title</source>
        <target>Kasse</target>
      </trans-unit>
      <trans-unit id="2" resname="messages::greeting">
        <source>messages::greeting</source>
        <target>Hallo Welt</target>
      </trans-unit>
    </body>
  </file>
</xliff>"#;

    // ==================== Parsing Tests ====================

    #[test]
    fn test_parse_sample_document() {
        let catalogue = content_to_catalogue(SAMPLE, "de", "messages").expect("should parse");

        assert_eq!(catalogue.locale(), "de");
        assert_eq!(catalogue.len(), 2);
        assert_eq!(
            catalogue.get("messages", "messages::checkout.title"),
            Some("Kasse")
        );
        assert_eq!(
            catalogue.get("messages", "messages::greeting"),
            Some("Hallo Welt")
        );
    }

    #[test]
    fn test_parse_without_resname_falls_back_to_source() {
        let content = r#"<?xml version="1.0"?>
<xliff version="1.2">
  <file source-language="en" target-language="de">
    <body>
      <trans-unit id="1">
        <source>greeting</source>
        <target>Hallo</target>
      </trans-unit>
    </body>
  </file>
</xliff>"#;

        let catalogue = content_to_catalogue(content, "de", "messages").expect("should parse");
        assert_eq!(catalogue.get("messages", "greeting"), Some("Hallo"));
    }

    #[test]
    fn test_parse_without_target_falls_back_to_source() {
        let content = r#"<xliff version="1.2">
  <file>
    <body>
      <trans-unit id="1" resname="greeting">
        <source>Hello</source>
      </trans-unit>
    </body>
  </file>
</xliff>"#;

        let catalogue = content_to_catalogue(content, "de", "messages").expect("should parse");
        assert_eq!(catalogue.get("messages", "greeting"), Some("Hello"));
    }

    #[test]
    fn test_parse_empty_target_falls_back_to_source() {
        let content = r#"<xliff version="1.2">
  <file>
    <body>
      <trans-unit id="1" resname="greeting">
        <source>Hello</source>
        <target/>
      </trans-unit>
    </body>
  </file>
</xliff>"#;

        let catalogue = content_to_catalogue(content, "de", "messages").expect("should parse");
        assert_eq!(catalogue.get("messages", "greeting"), Some("Hello"));
    }

    #[test]
    fn test_parse_cdata_target() {
        let content = r#"<xliff version="1.2">
  <file>
    <body>
      <trans-unit id="1" resname="greeting">
        <source>Hello</source>
        <target><![CDATA[<b>Hallo</b>]]></target>
      </trans-unit>
    </body>
  </file>
</xliff>"#;

        let catalogue = content_to_catalogue(content, "de", "messages").expect("should parse");
        assert_eq!(catalogue.get("messages", "greeting"), Some("<b>Hallo</b>"));
    }

    #[test]
    fn test_parse_unescapes_entities() {
        let content = r#"<xliff version="1.2">
  <file>
    <body>
      <trans-unit id="1" resname="terms">
        <source>terms</source>
        <target>Katzen &amp; Hunde &lt;3</target>
      </trans-unit>
    </body>
  </file>
</xliff>"#;

        let catalogue = content_to_catalogue(content, "de", "messages").expect("should parse");
        assert_eq!(catalogue.get("messages", "terms"), Some("Katzen & Hunde <3"));
    }

    #[test]
    fn test_parse_preserves_inner_whitespace() {
        let content = "<xliff version=\"1.2\"><file><body><trans-unit id=\"1\" resname=\"padded\"><source>padded</source><target>  mit Rand  </target></trans-unit></body></file></xliff>";

        let catalogue = content_to_catalogue(content, "de", "messages").expect("should parse");
        assert_eq!(catalogue.get("messages", "padded"), Some("  mit Rand  "));
    }

    #[test]
    fn test_parse_skips_unit_without_key() {
        let content = r#"<xliff version="1.2">
  <file>
    <body>
      <trans-unit id="1">
        <source></source>
        <target>orphan</target>
      </trans-unit>
    </body>
  </file>
</xliff>"#;

        let catalogue = content_to_catalogue(content, "de", "messages").expect("should parse");
        assert!(catalogue.is_empty());
    }

    #[test]
    fn test_parse_document_without_units() {
        let content = r#"<xliff version="1.2"><file><body></body></file></xliff>"#;

        let catalogue = content_to_catalogue(content, "de", "messages").expect("should parse");
        assert!(catalogue.is_empty());
        assert!(catalogue.domain("messages").is_none());
    }

    #[test]
    fn test_parse_empty_content_fails() {
        let result = content_to_catalogue("", "de", "messages");

        assert!(matches!(result, Err(XliffError::Parse(_))));
    }

    #[test]
    fn test_parse_plain_text_fails() {
        let result = content_to_catalogue("this is not an xliff document", "de", "messages");

        assert!(matches!(result, Err(XliffError::Parse(_))));
    }

    #[test]
    fn test_parse_non_xliff_xml_fails() {
        let result = content_to_catalogue("<html><body>nope</body></html>", "de", "messages");

        assert!(matches!(result, Err(XliffError::Parse(_))));
    }

    #[test]
    fn test_parse_mismatched_tags_fails() {
        let content = "<xliff version=\"1.2\"><file><body></file></xliff>";
        let result = content_to_catalogue(content, "de", "messages");

        assert!(matches!(result, Err(XliffError::Parse(_))));
    }

    // ==================== Serialization Tests ====================

    fn sample_catalogue() -> MessageCatalogue {
        let mut catalogue = MessageCatalogue::new("de");
        catalogue.set("messages", "greeting", "Hallo Welt");
        catalogue.set("messages", "farewell", "Tschüss");
        catalogue
    }

    #[test]
    fn test_serialize_document_shape() {
        let content =
            catalogue_to_content(&sample_catalogue(), "messages", &XliffOptions::default())
                .expect("should serialize");

        assert!(content.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(content.contains("xmlns=\"urn:oasis:names:tc:xliff:document:1.2\""));
        assert!(content.contains("version=\"1.2\""));
        assert!(content.contains("source-language=\"en\""));
        assert!(content.contains("target-language=\"de\""));
        assert!(content.contains("datatype=\"plaintext\""));
        assert!(content.contains("resname=\"greeting\""));
        assert!(content.contains("<target>Hallo Welt</target>"));
    }

    #[test]
    fn test_serialize_units_in_key_order_with_sequential_ids() {
        let content =
            catalogue_to_content(&sample_catalogue(), "messages", &XliffOptions::default())
                .expect("should serialize");

        // "farewell" sorts before "greeting"
        let farewell = content.find("resname=\"farewell\"").expect("farewell unit");
        let greeting = content.find("resname=\"greeting\"").expect("greeting unit");
        assert!(farewell < greeting);
        assert!(content.contains("id=\"1\" resname=\"farewell\""));
        assert!(content.contains("id=\"2\" resname=\"greeting\""));
    }

    #[test]
    fn test_serialize_default_locale_option() {
        let options = XliffOptions {
            default_locale: Some("fr".to_string()),
        };
        let content = catalogue_to_content(&sample_catalogue(), "messages", &options)
            .expect("should serialize");

        assert!(content.contains("source-language=\"fr\""));
    }

    #[test]
    fn test_serialize_escapes_content() {
        let mut catalogue = MessageCatalogue::new("de");
        catalogue.set("messages", "terms", "Katzen & Hunde <3");

        let content = catalogue_to_content(&catalogue, "messages", &XliffOptions::default())
            .expect("should serialize");

        assert!(content.contains("Katzen &amp; Hunde &lt;3"));
    }

    #[test]
    fn test_serialize_empty_domain_is_valid_document() {
        let catalogue = MessageCatalogue::new("de");
        let content = catalogue_to_content(&catalogue, "messages", &XliffOptions::default())
            .expect("should serialize");

        assert!(content.contains("<body>"));
        assert!(!content.contains("trans-unit"));

        // The empty document parses back to an empty catalogue
        let parsed = content_to_catalogue(&content, "de", "messages").expect("should parse");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_serialize_only_requested_domain() {
        let mut catalogue = MessageCatalogue::new("de");
        catalogue.set("messages", "a", "1");
        catalogue.set("validators", "b", "2");

        let content = catalogue_to_content(&catalogue, "messages", &XliffOptions::default())
            .expect("should serialize");

        assert!(content.contains("resname=\"a\""));
        assert!(!content.contains("resname=\"b\""));
    }

    // ==================== Round-Trip Tests ====================

    #[test]
    fn test_roundtrip_preserves_entries() {
        let mut catalogue = MessageCatalogue::new("de");
        catalogue.set("messages", "checkout.title", "Kasse");
        catalogue.set("messages", "greeting", "Hallo \"Welt\" & Co <tag>");
        catalogue.set("messages", "padded", " mit Rand ");

        let content = catalogue_to_content(&catalogue, "messages", &XliffOptions::default())
            .expect("should serialize");
        let parsed = content_to_catalogue(&content, "de", "messages").expect("should parse");

        assert_eq!(parsed.domain("messages"), catalogue.domain("messages"));
    }

    proptest! {
        #[test]
        fn prop_roundtrip_preserves_entries(
            entries in proptest::collection::btree_map(
                "[a-z][a-z0-9_.]{0,16}",
                "[a-zA-Z0-9<>&\"'][a-zA-Z0-9 .,!?<>&\"'-]{0,40}",
                1..8,
            )
        ) {
            let mut catalogue = MessageCatalogue::new("de");
            for (key, translation) in &entries {
                catalogue.set("messages", key, translation);
            }

            let content = catalogue_to_content(&catalogue, "messages", &XliffOptions::default())
                .expect("should serialize");
            let parsed = content_to_catalogue(&content, "de", "messages")
                .expect("should parse");

            prop_assert_eq!(parsed.domain("messages"), catalogue.domain("messages"));
        }
    }
}
