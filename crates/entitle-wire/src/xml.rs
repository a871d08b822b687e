//! XML codec for the wire envelope.
//!
//! Reading skips unknown elements so that server-added document parts do
//! not break older clients. Writing is deterministic: no insignificant
//! whitespace, fixed attribute order, canonical second-precision ttl —
//! the canonicalization in [`crate::canonical`] relies on this.

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use entitle_core::Timestamp;

use crate::envelope::{Envelope, Item, List, Property, Reference, Signature, SignedInfo};
use crate::error::WireError;

impl Envelope {
    /// Parse an envelope document from XML text.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] on malformed XML, a missing root element, or
    /// missing required attributes; unknown elements are skipped, not
    /// rejected.
    pub fn from_xml(text: &str) -> Result<Self, WireError> {
        let mut reader = Reader::from_str(text);
        // Empty elements surface as Start+End so `<property name="x"/>`
        // and `<reference …/>` take the same code path as the long form.
        // Text is NOT trimmed: property values keep their exact bytes,
        // and whitespace between elements falls through the structural
        // loops untouched.
        reader.config_mut().expand_empty_elements = true;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    return if e.local_name().as_ref() == b"envelope" {
                        read_envelope(&mut reader, &e)
                    } else {
                        Err(WireError::Structure(format!(
                            "root element is not <envelope>: <{}>",
                            String::from_utf8_lossy(e.local_name().as_ref())
                        )))
                    };
                }
                Event::Eof => {
                    return Err(WireError::Structure(
                        "document contains no <envelope> element".to_string(),
                    ));
                }
                // XML declaration, comments, doctype, processing
                // instructions before the root.
                _ => {}
            }
        }
    }

    /// Parse an envelope document from raw bytes (UTF-8).
    pub fn from_xml_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        Self::from_xml(std::str::from_utf8(bytes)?)
    }

    /// Serialize the envelope, signatures included, as an XML string.
    pub fn to_xml(&self) -> Result<String, WireError> {
        let bytes = write_envelope(self, true)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

// -- Reading ------------------------------------------------------------------

type XmlReader<'a> = Reader<&'a [u8]>;

fn read_envelope<'a>(
    reader: &mut XmlReader<'a>,
    start: &BytesStart<'a>,
) -> Result<Envelope, WireError> {
    let mut envelope = Envelope::new();
    if let Some(raw) = attr(start, b"ttl")? {
        envelope.ttl = Some(Timestamp::parse(&raw)?);
    }

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"item" => envelope.items.push(read_item(reader, &e)?),
                b"signature" => envelope.signatures.push(read_signature(reader)?),
                _ => skip(reader, e)?,
            },
            Event::End(_) => return Ok(envelope),
            Event::Eof => {
                return Err(WireError::Structure(
                    "unexpected end of document inside <envelope>".to_string(),
                ));
            }
            _ => {}
        }
    }
}

fn read_item<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>) -> Result<Item, WireError> {
    let mut item = Item::new(required_attr(start, "type")?);

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"property" => item.properties.push(read_property(reader, &e)?),
                b"list" => item.lists.push(read_list(reader, &e)?),
                _ => skip(reader, e)?,
            },
            Event::End(_) => return Ok(item),
            Event::Eof => {
                return Err(WireError::Structure(
                    "unexpected end of document inside <item>".to_string(),
                ));
            }
            _ => {}
        }
    }
}

fn read_list<'a>(reader: &mut XmlReader<'a>, start: &BytesStart<'a>) -> Result<List, WireError> {
    let mut list = List::new(required_attr(start, "name")?);

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"property" => list.properties.push(read_property(reader, &e)?),
                b"list" => list.lists.push(read_list(reader, &e)?),
                _ => skip(reader, e)?,
            },
            Event::End(_) => return Ok(list),
            Event::Eof => {
                return Err(WireError::Structure(
                    "unexpected end of document inside <list>".to_string(),
                ));
            }
            _ => {}
        }
    }
}

fn read_property<'a>(
    reader: &mut XmlReader<'a>,
    start: &BytesStart<'a>,
) -> Result<Property, WireError> {
    let name = required_attr(start, "name")?;
    let value = read_scalar(reader, "property")?;
    Ok(Property { name, value })
}

/// Read the text content of a scalar element up to its end tag. Nested
/// markup inside a scalar is a structural error.
fn read_scalar(reader: &mut XmlReader<'_>, element: &str) -> Result<String, WireError> {
    let mut value = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => value.push_str(&t.unescape()?),
            Event::CData(c) => value.push_str(std::str::from_utf8(c.as_ref())?),
            Event::End(_) => return Ok(value),
            Event::Start(e) => {
                return Err(WireError::Structure(format!(
                    "unexpected element <{}> inside <{element}>",
                    String::from_utf8_lossy(e.local_name().as_ref())
                )));
            }
            Event::Eof => {
                return Err(WireError::Structure(format!(
                    "unexpected end of document inside <{element}>"
                )));
            }
            _ => {}
        }
    }
}

fn read_signature(reader: &mut XmlReader<'_>) -> Result<Signature, WireError> {
    let mut signed_info = None;
    let mut signature_value = None;
    let mut key_info = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"signedInfo" => signed_info = Some(read_signed_info(reader)?),
                b"signatureValue" => {
                    signature_value = Some(read_scalar(reader, "signatureValue")?.trim().to_string());
                }
                b"keyInfo" => {
                    key_info = Some(read_scalar(reader, "keyInfo")?.trim().to_string());
                }
                _ => skip(reader, e)?,
            },
            Event::End(_) => break,
            Event::Eof => {
                return Err(WireError::Structure(
                    "unexpected end of document inside <signature>".to_string(),
                ));
            }
            _ => {}
        }
    }

    Ok(Signature {
        signed_info: signed_info.ok_or_else(|| {
            WireError::Structure("signature block is missing <signedInfo>".to_string())
        })?,
        signature_value: signature_value.ok_or_else(|| {
            WireError::Structure("signature block is missing <signatureValue>".to_string())
        })?,
        key_info,
    })
}

fn read_signed_info(reader: &mut XmlReader<'_>) -> Result<SignedInfo, WireError> {
    let mut references = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"reference" => {
                    references.push(Reference {
                        uri: required_attr(&e, "uri")?,
                        digest: required_attr(&e, "digest")?,
                    });
                    skip(reader, e)?;
                }
                _ => skip(reader, e)?,
            },
            Event::End(_) => return Ok(SignedInfo { references }),
            Event::Eof => {
                return Err(WireError::Structure(
                    "unexpected end of document inside <signedInfo>".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// Consume everything up to and including the end tag matching `start`.
fn skip(reader: &mut XmlReader<'_>, start: BytesStart<'_>) -> Result<(), WireError> {
    let end = start.to_end().into_owned();
    reader.read_to_end(end.name())?;
    Ok(())
}

fn attr(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, WireError> {
    for attribute in element.attributes() {
        let attribute: Attribute<'_> = attribute?;
        if attribute.key.local_name().as_ref() == name {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required_attr(element: &BytesStart<'_>, name: &str) -> Result<String, WireError> {
    attr(element, name.as_bytes())?.ok_or_else(|| WireError::MissingAttribute {
        element: String::from_utf8_lossy(element.local_name().as_ref()).into_owned(),
        attribute: name.to_string(),
    })
}

// -- Writing ------------------------------------------------------------------

/// Serialize the envelope deterministically. `include_signatures = false`
/// produces the enveloped-signature-excluded form used by
/// [`crate::canonical::canonical_document`].
pub(crate) fn write_envelope(
    envelope: &Envelope,
    include_signatures: bool,
) -> Result<Vec<u8>, WireError> {
    let mut writer = Writer::new(Vec::new());
    let mut root = BytesStart::new("envelope");
    if let Some(ttl) = &envelope.ttl {
        root.push_attribute(("ttl", ttl.to_canonical_string().as_str()));
    }
    writer.write_event(Event::Start(root))?;
    for item in &envelope.items {
        write_item(&mut writer, item)?;
    }
    if include_signatures {
        for signature in &envelope.signatures {
            write_signature(&mut writer, signature)?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("envelope")))?;
    Ok(writer.into_inner())
}

pub(crate) fn write_item(writer: &mut Writer<Vec<u8>>, item: &Item) -> Result<(), WireError> {
    let mut element = BytesStart::new("item");
    element.push_attribute(("type", item.item_type.as_str()));
    writer.write_event(Event::Start(element))?;
    for property in &item.properties {
        write_property(writer, property)?;
    }
    for list in &item.lists {
        write_list(writer, list)?;
    }
    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

fn write_list(writer: &mut Writer<Vec<u8>>, list: &List) -> Result<(), WireError> {
    let mut element = BytesStart::new("list");
    element.push_attribute(("name", list.name.as_str()));
    writer.write_event(Event::Start(element))?;
    for property in &list.properties {
        write_property(writer, property)?;
    }
    for nested in &list.lists {
        write_list(writer, nested)?;
    }
    writer.write_event(Event::End(BytesEnd::new("list")))?;
    Ok(())
}

fn write_property(writer: &mut Writer<Vec<u8>>, property: &Property) -> Result<(), WireError> {
    let mut element = BytesStart::new("property");
    element.push_attribute(("name", property.name.as_str()));
    writer.write_event(Event::Start(element))?;
    writer.write_event(Event::Text(BytesText::new(&property.value)))?;
    writer.write_event(Event::End(BytesEnd::new("property")))?;
    Ok(())
}

fn write_signature(writer: &mut Writer<Vec<u8>>, signature: &Signature) -> Result<(), WireError> {
    writer.write_event(Event::Start(BytesStart::new("signature")))?;
    write_signed_info(writer, &signature.signed_info)?;

    writer.write_event(Event::Start(BytesStart::new("signatureValue")))?;
    writer.write_event(Event::Text(BytesText::new(&signature.signature_value)))?;
    writer.write_event(Event::End(BytesEnd::new("signatureValue")))?;

    if let Some(key) = &signature.key_info {
        writer.write_event(Event::Start(BytesStart::new("keyInfo")))?;
        writer.write_event(Event::Text(BytesText::new(key)))?;
        writer.write_event(Event::End(BytesEnd::new("keyInfo")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("signature")))?;
    Ok(())
}

pub(crate) fn write_signed_info(
    writer: &mut Writer<Vec<u8>>,
    signed_info: &SignedInfo,
) -> Result<(), WireError> {
    writer.write_event(Event::Start(BytesStart::new("signedInfo")))?;
    for reference in &signed_info.references {
        let mut element = BytesStart::new("reference");
        element.push_attribute(("uri", reference.uri.as_str()));
        element.push_attribute(("digest", reference.digest.as_str()));
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("signedInfo")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<envelope ttl="2026-08-05T13:00:00Z">
  <item type="ProductModuleValidation">
    <property name="productModuleNumber">PM001</property>
    <property name="valid">true</property>
    <list name="thresholds">
      <property name="red">3</property>
      <property name="yellow">10</property>
    </list>
  </item>
  <item type="Licensee">
    <property name="number">L001</property>
  </item>
</envelope>"#;

    #[test]
    fn parse_sample_document() {
        let env = Envelope::from_xml(SAMPLE).unwrap();
        assert_eq!(env.ttl.unwrap().to_canonical_string(), "2026-08-05T13:00:00Z");
        assert_eq!(env.items.len(), 2);

        let validation = &env.items[0];
        assert_eq!(validation.item_type, "ProductModuleValidation");
        assert_eq!(validation.property("productModuleNumber"), Some("PM001"));
        let thresholds = validation.list("thresholds").unwrap();
        assert_eq!(thresholds.property("yellow"), Some("10"));

        assert!(env.signatures.is_empty());
    }

    #[test]
    fn roundtrip_preserves_structure() {
        let env = Envelope::from_xml(SAMPLE).unwrap();
        let xml = env.to_xml().unwrap();
        let back = Envelope::from_xml(&xml).unwrap();
        assert_eq!(back, env);
    }

    #[test]
    fn unknown_elements_are_skipped() {
        let xml = r#"<envelope>
  <audit><entry seq="1">ignored</entry></audit>
  <item type="Product">
    <property name="number">P001</property>
    <future name="x"><nested/></future>
  </item>
</envelope>"#;
        let env = Envelope::from_xml(xml).unwrap();
        assert_eq!(env.items.len(), 1);
        assert_eq!(env.items[0].property("number"), Some("P001"));
        assert_eq!(env.items[0].properties.len(), 1);
    }

    #[test]
    fn item_without_type_is_structural_error() {
        let xml = r#"<envelope><item><property name="number">P001</property></item></envelope>"#;
        let err = Envelope::from_xml(xml).unwrap_err();
        assert!(matches!(err, WireError::MissingAttribute { .. }));
        assert!(format!("{err}").contains("type"));
    }

    #[test]
    fn wrong_root_is_rejected() {
        let err = Envelope::from_xml("<response></response>").unwrap_err();
        assert!(format!("{err}").contains("not <envelope>"));
    }

    #[test]
    fn bad_ttl_is_rejected_with_context() {
        let err = Envelope::from_xml(r#"<envelope ttl="soon"></envelope>"#).unwrap_err();
        assert!(format!("{err}").contains("soon"));
    }

    #[test]
    fn escaped_values_roundtrip() {
        let env = Envelope {
            ttl: None,
            items: vec![Item::new("Product")
                .with_property("description", "5 < 6 & \"quoted\" <tag>")],
            signatures: vec![],
        };
        let xml = env.to_xml().unwrap();
        let back = Envelope::from_xml(&xml).unwrap();
        assert_eq!(
            back.items[0].property("description"),
            Some("5 < 6 & \"quoted\" <tag>")
        );
    }

    #[test]
    fn signature_block_roundtrip() {
        let env = Envelope {
            ttl: None,
            items: vec![Item::new("Licensee").with_property("number", "L001")],
            signatures: vec![Signature {
                signed_info: SignedInfo {
                    references: vec![Reference {
                        uri: "#item/0".to_string(),
                        digest: "ab".repeat(32),
                    }],
                },
                signature_value: "c2ln".to_string(),
                key_info: Some("a2V5".to_string()),
            }],
        };
        let xml = env.to_xml().unwrap();
        let back = Envelope::from_xml(&xml).unwrap();
        assert_eq!(back, env);
        assert_eq!(back.signatures[0].signed_info.references[0].uri, "#item/0");
    }

    #[test]
    fn self_closing_property_is_empty_value() {
        let xml = r#"<envelope><item type="Product"><property name="note"/></item></envelope>"#;
        let env = Envelope::from_xml(xml).unwrap();
        assert_eq!(env.items[0].property("note"), Some(""));
    }

    #[test]
    fn bytes_entrypoint_rejects_invalid_utf8() {
        let err = Envelope::from_xml_bytes(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, WireError::Encoding(_)));
    }

    #[test]
    fn whitespace_in_values_is_preserved() {
        let env = Envelope {
            ttl: None,
            items: vec![Item::new("Product").with_property("note", "  two  words  ")],
            signatures: vec![],
        };
        let back = Envelope::from_xml(&env.to_xml().unwrap()).unwrap();
        assert_eq!(back.items[0].property("note"), Some("  two  words  "));
    }

    proptest::proptest! {
        #[test]
        fn printable_values_roundtrip(value in "[ -~]{0,64}", name in "[a-zA-Z][a-zA-Z0-9._-]{0,24}") {
            let env = Envelope {
                ttl: None,
                items: vec![Item::new("Product").with_property(name.as_str(), value.as_str())],
                signatures: vec![],
            };
            let back = Envelope::from_xml(&env.to_xml().unwrap()).unwrap();
            proptest::prop_assert_eq!(back, env);
        }
    }
}
