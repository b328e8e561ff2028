use crate::domain::model::{Code, ValueSetIndex};
use crate::domain::ports::ValueSetParser;
use crate::utils::error::{Result, VsacError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Parser for IHE SVS responses (`RetrieveValueSet` and
/// `RetrieveMultipleValueSets`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SvsParser;

struct OpenValueSet {
    id: String,
    version: String,
    codes: Vec<Code>,
}

impl ValueSetParser for SvsParser {
    fn parse_into(&self, oid: &str, payload: &str, index: &mut ValueSetIndex) -> Result<()> {
        let parse_error = |message: String| VsacError::ParseError {
            oid: oid.to_string(),
            message,
        };

        let mut reader = Reader::from_str(payload);
        reader.config_mut().trim_text(true);

        let mut current: Option<OpenValueSet> = None;
        let mut parsed: Vec<OpenValueSet> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if is_value_set(&e) => {
                    current = Some(open_value_set(oid, &e).map_err(parse_error)?);
                }
                Ok(Event::Empty(e)) if is_value_set(&e) => {
                    parsed.push(open_value_set(oid, &e).map_err(parse_error)?);
                }
                Ok(Event::Start(e)) | Ok(Event::Empty(e))
                    if e.local_name().as_ref() == b"Concept" =>
                {
                    if let Some(vs) = current.as_mut() {
                        vs.codes.push(concept(&e).map_err(parse_error)?);
                    }
                }
                Ok(Event::End(e))
                    if matches!(e.local_name().as_ref(), b"ValueSet" | b"DescribedValueSet") =>
                {
                    if let Some(vs) = current.take() {
                        parsed.push(vs);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(parse_error(format!(
                        "XML error at position {}: {}",
                        reader.error_position(),
                        e
                    )))
                }
            }
        }

        if parsed.is_empty() {
            return Err(parse_error("response contains no ValueSet element".to_string()));
        }

        // Nothing reaches the index until the whole document has parsed.
        let found = parsed.len();
        for vs in parsed {
            index.insert(&vs.id, &vs.version, vs.codes);
        }

        tracing::debug!(oid, value_sets = found, "Parsed value set response");
        Ok(())
    }
}

fn is_value_set(element: &BytesStart<'_>) -> bool {
    matches!(
        element.local_name().as_ref(),
        b"ValueSet" | b"DescribedValueSet"
    )
}

fn open_value_set(
    oid: &str,
    element: &BytesStart<'_>,
) -> std::result::Result<OpenValueSet, String> {
    Ok(OpenValueSet {
        id: attribute(element, b"ID")?.unwrap_or_else(|| oid.to_string()),
        version: attribute(element, b"version")?.unwrap_or_default(),
        codes: Vec::new(),
    })
}

fn concept(element: &BytesStart<'_>) -> std::result::Result<Code, String> {
    let code = attribute(element, b"code")?
        .ok_or_else(|| "Concept element without a code attribute".to_string())?;
    Ok(Code {
        code,
        system: attribute(element, b"codeSystem")?.unwrap_or_default(),
        version: attribute(element, b"codeSystemVersion")?.unwrap_or_default(),
    })
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> std::result::Result<Option<String>, String> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        if attr.key.local_name().as_ref() == name {
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
