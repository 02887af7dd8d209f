//! Identifying-field extraction from resource file content

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;

use super::Format;
use crate::error::{Result, SyncError};

/// Read the declared resource name from file content
///
/// The field is looked up at the top level for yaml and json; for xml the
/// first element whose local name matches (ignoring ASCII case) is used.
///
/// # Errors
///
/// Returns `SyncError::Validation` if the content cannot be parsed or the
/// field is missing or not a string.
pub fn declared_name(content: &str, format: Format, field: &str, resource: &str) -> Result<String> {
    let invalid = |message: String| SyncError::Validation {
        resource: resource.to_string(),
        message,
    };

    let found = match format {
        Format::Yaml => {
            let value: serde_yml::Value =
                serde_yml::from_str(content).map_err(|e| invalid(format!("unparsable yaml: {e}")))?;
            value.get(field).and_then(|v| v.as_str()).map(str::to_string)
        }
        Format::Json => {
            let value: serde_json::Value = serde_json::from_str(content)
                .map_err(|e| invalid(format!("unparsable json: {e}")))?;
            value.get(field).and_then(|v| v.as_str()).map(str::to_string)
        }
        Format::Xml => xml_field(content, field).map_err(|e| invalid(format!("unparsable xml: {e}")))?,
    };

    match found {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(invalid(format!("missing identifying field '{field}'"))),
    }
}

fn xml_field(content: &str, field: &str) -> std::result::Result<Option<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(content);

    // Text is split at entity references, so the value is collected until the
    // field closes. Trimming happens once on the whole value.
    let mut in_field = false;
    let mut value = String::new();
    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                in_field = e.local_name().as_ref().eq_ignore_ascii_case(field.as_bytes());
                value.clear();
            }
            Event::Text(e) if in_field => value.push_str(&e.decode()?),
            Event::CData(e) if in_field => value.push_str(&e.decode()?),
            Event::GeneralRef(e) if in_field => {
                if let Some(ch) = e.resolve_char_ref()? {
                    value.push(ch);
                } else {
                    let entity = e.decode()?;
                    match resolve_predefined_entity(&entity) {
                        Some(resolved) => value.push_str(resolved),
                        None => {
                            value.push('&');
                            value.push_str(&entity);
                            value.push(';');
                        }
                    }
                }
            }
            Event::End(_) if in_field => return Ok(Some(value.trim().to_string())),
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_declared_name() {
        let content = "applicationName: AppA\ndescription: test\n";
        let name = declared_name(content, Format::Yaml, "applicationName", "AppA").unwrap();
        assert_eq!(name, "AppA");
    }

    #[test]
    fn test_json_declared_name() {
        let content = r#"{"identityProviderName": "Google", "enable": true}"#;
        let name =
            declared_name(content, Format::Json, "identityProviderName", "Google").unwrap();
        assert_eq!(name, "Google");
    }

    #[test]
    fn test_xml_declared_name() {
        let content = "<ServiceProvider><ApplicationID>3</ApplicationID>\
                       <ApplicationName>AppX</ApplicationName></ServiceProvider>";
        let name = declared_name(content, Format::Xml, "applicationName", "AppX").unwrap();
        assert_eq!(name, "AppX");
    }

    #[test]
    fn test_xml_declared_name_with_entities() {
        let content = "<IdentityProvider>\n  <IdentityProviderName> R&amp;D &#71;oogle </IdentityProviderName>\n\
                       </IdentityProvider>";
        let name =
            declared_name(content, Format::Xml, "identityProviderName", "R&D Google").unwrap();
        assert_eq!(name, "R&D Google");
    }

    #[test]
    fn test_xml_empty_field_is_missing() {
        let content = "<UserStore><Name>  </Name></UserStore>";
        let err = declared_name(content, Format::Xml, "name", "Store").unwrap_err();
        assert!(err.to_string().contains("missing identifying field 'name'"));
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        let err = declared_name("description: x\n", Format::Yaml, "name", "Store").unwrap_err();
        assert!(matches!(err, SyncError::Validation { .. }));
        assert!(err.to_string().contains("missing identifying field 'name'"));
    }

    #[test]
    fn test_unparsable_content_is_validation_error() {
        let err = declared_name("{not json", Format::Json, "name", "Store").unwrap_err();
        assert!(matches!(err, SyncError::Validation { ref resource, .. } if resource == "Store"));
    }
}
