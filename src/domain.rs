use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RepositoryError, Result};

/// Separator between a location and a process model id inside a diagram uri.
pub const URI_SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    pub id: String,
    pub name: String,
    pub xml: String,
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub uri: String,
    pub diagrams: Vec<Diagram>,
}

/// Caller credentials carried on every remote call.
///
/// The repository only ever reads the access token out of it.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    access_token: String,
}

impl Identity {
    pub fn new<S: Into<String>>(access_token: S) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessModel {
    pub id: String,
    #[serde(default)]
    pub xml: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessModelList {
    #[serde(default)]
    pub process_models: Vec<ProcessModel>,
}

/// Body of an upsert; `overwrite_existing` is always set by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProcessDefinitionsRequest {
    pub xml: String,
    pub overwrite_existing: bool,
}

impl UpdateProcessDefinitionsRequest {
    pub fn overwrite<S: Into<String>>(xml: S) -> Self {
        Self {
            xml: xml.into(),
            overwrite_existing: true,
        }
    }
}

/// Strips exactly one trailing separator, so `foo/` and `foo` name the same location.
pub fn normalize_pathspec(pathspec: &str) -> &str {
    pathspec.strip_suffix(URI_SEPARATOR).unwrap_or(pathspec)
}

pub fn validate_process_model_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(RepositoryError::InvalidIdentifier {
            id: id.to_string(),
            reason: "identifier is empty",
        });
    }
    if id.contains(URI_SEPARATOR) {
        return Err(RepositoryError::InvalidIdentifier {
            id: id.to_string(),
            reason: "identifier contains the uri separator",
        });
    }
    Ok(())
}

pub fn construct_diagram_uri(location: &str, process_model_id: &str) -> Result<String> {
    validate_process_model_id(process_model_id)?;
    Ok(format!("{}{}{}", location, URI_SEPARATOR, process_model_id))
}

/// Splits a diagram uri at its last separator into `(location, process_model_id)`.
///
/// A uri without any separator is treated as a bare id with an empty location.
pub fn parse_diagram_uri(uri: &str) -> (&str, &str) {
    match uri.rfind(URI_SEPARATOR) {
        Some(idx) => (&uri[..idx], &uri[idx + 1..]),
        None => ("", uri),
    }
}

pub fn map_process_model_to_diagram(process_model: &ProcessModel, location: &str) -> Result<Diagram> {
    let uri = construct_diagram_uri(location, &process_model.id)?;
    Ok(Diagram {
        id: process_model.id.clone(),
        name: process_model.id.clone(),
        xml: process_model.xml.clone(),
        uri,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pathspec() {
        assert_eq!(normalize_pathspec("http://host/app/"), "http://host/app");
        assert_eq!(normalize_pathspec("http://host/app"), "http://host/app");
        // only one separator is stripped
        assert_eq!(normalize_pathspec("http://host/app//"), "http://host/app/");
    }

    #[test]
    fn test_uri_round_trip() {
        for id in ["invoice-flow", "onboarding", "a.b_c", "x"] {
            let uri = construct_diagram_uri("http://host/app", id).unwrap();
            assert_eq!(parse_diagram_uri(&uri), ("http://host/app", id));
        }
    }

    #[test]
    fn test_parse_without_separator() {
        assert_eq!(parse_diagram_uri("lonely"), ("", "lonely"));
        assert_eq!(parse_diagram_uri("http://host/"), ("http://host", ""));
    }

    #[test]
    fn test_rejects_ids_with_separator_or_empty() {
        let err = construct_diagram_uri("http://host", "a/b").unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidIdentifier { .. }));
        assert!(validate_process_model_id("").is_err());
        assert!(validate_process_model_id("ok").is_ok());
    }

    #[test]
    fn test_map_process_model() {
        let pm = ProcessModel {
            id: "invoice-flow".into(),
            xml: "<definitions/>".into(),
        };
        let d = map_process_model_to_diagram(&pm, "http://host/app").unwrap();
        assert_eq!(d.id, "invoice-flow");
        assert_eq!(d.name, "invoice-flow");
        assert_eq!(d.xml, "<definitions/>");
        assert_eq!(d.uri, "http://host/app/invoice-flow");
        assert_eq!(map_process_model_to_diagram(&pm, "http://host/app").unwrap(), d);
    }

    #[test]
    fn test_identity_debug_hides_token() {
        let id = Identity::new("secret-token");
        assert_eq!(id.access_token(), "secret-token");
        assert!(!format!("{:?}", id).contains("secret-token"));
    }

    #[test]
    fn test_wire_shapes() {
        let body = serde_json::to_value(UpdateProcessDefinitionsRequest::overwrite("<x/>")).unwrap();
        assert_eq!(body, serde_json::json!({"xml": "<x/>", "overwriteExisting": true}));
        let list: ProcessModelList =
            serde_json::from_str(r#"{"processModels":[{"id":"a","xml":"<a/>","startEvents":[]}]}"#)
                .unwrap();
        assert_eq!(list.process_models.len(), 1);
        assert_eq!(list.process_models[0].id, "a");
    }
}
