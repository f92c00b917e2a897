use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::Id;

/// The two parameter classes an endpoint can declare requirements for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementClass {
    Path,
    Header,
}

impl std::fmt::Display for RequirementClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequirementClass::Path => write!(f, "path"),
            RequirementClass::Header => write!(f, "header"),
        }
    }
}

/// Declared expectation for a single path or header parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementDescriptor {
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub is_required: bool,
}

impl RequirementDescriptor {
    pub fn required(name: &str, value: Value) -> Self {
        Self {
            name: name.to_string(),
            value,
            is_required: true,
        }
    }

    pub fn optional(name: &str, value: Value) -> Self {
        Self {
            name: name.to_string(),
            value,
            is_required: false,
        }
    }
}

/// A parameter value supplied by the caller of the sandbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuppliedParam {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl SuppliedParam {
    pub fn new(name: &str, value: Value) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// One documented operation that owns recorded example schemas.
///
/// Requirement lists are kept in their serialized form exactly as the admin
/// tooling stored them; they are only parsed when a request is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: Id,
    pub proxy_id: Id,
    pub name: String,
    pub method: String,
    pub path: String,
    pub path_params: Option<String>,
    pub header_param: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl Endpoint {
    /// Raw serialized requirements for the given parameter class
    pub fn raw_requirements(&self, class: RequirementClass) -> Option<&str> {
        match class {
            RequirementClass::Path => self.path_params.as_deref(),
            RequirementClass::Header => self.header_param.as_deref(),
        }
    }
}

/// Parse a serialized requirement list.
///
/// Absent, blank and `null` inputs mean "no requirements". Anything else must be a
/// JSON array of descriptors.
pub fn parse_requirements(raw: Option<&str>) -> serde_json::Result<Vec<RequirementDescriptor>> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(Vec::new());
    };

    let parsed: Option<Vec<RequirementDescriptor>> = serde_json::from_str(raw)?;
    Ok(parsed.unwrap_or_default())
}

/// Input model for creating an endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEndpoint {
    pub proxy_id: Id,
    pub name: String,
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub path_params: Vec<RequirementDescriptor>,
    #[serde(default)]
    pub header_param: Vec<RequirementDescriptor>,
}

impl NewEndpoint {
    /// Serialize a requirement list the way it is persisted (`None` when empty)
    pub fn serialize_requirements(
        requirements: &[RequirementDescriptor],
    ) -> serde_json::Result<Option<String>> {
        if requirements.is_empty() {
            return Ok(None);
        }
        serde_json::to_string(requirements).map(Some)
    }
}

/// Endpoint view with its requirement lists decoded
#[derive(Debug, Clone, Serialize)]
pub struct EndpointDetail {
    pub id: Id,
    pub proxy_id: Id,
    pub name: String,
    pub method: String,
    pub path: String,
    pub path_params: Vec<RequirementDescriptor>,
    pub header_param: Vec<RequirementDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_requirements_empty_inputs() {
        assert!(parse_requirements(None).unwrap().is_empty());
        assert!(parse_requirements(Some("")).unwrap().is_empty());
        assert!(parse_requirements(Some("  ")).unwrap().is_empty());
        assert!(parse_requirements(Some("null")).unwrap().is_empty());
        assert!(parse_requirements(Some("[]")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_requirements_descriptors() {
        let raw = r#"[{"name":"id","value":"5","is_required":true},{"name":"page","value":1}]"#;
        let parsed = parse_requirements(Some(raw)).unwrap();

        assert_eq!(
            parsed,
            vec![
                RequirementDescriptor::required("id", json!("5")),
                RequirementDescriptor::optional("page", json!(1)),
            ]
        );
    }

    #[test]
    fn test_parse_requirements_rejects_malformed() {
        assert!(parse_requirements(Some("{not json")).is_err());
        assert!(parse_requirements(Some(r#"{"name":"id"}"#)).is_err());
        assert!(parse_requirements(Some(r#"[{"value":"5"}]"#)).is_err());
    }

    #[test]
    fn test_serialize_requirements_round_trip() {
        let requirements = vec![RequirementDescriptor::required("id", json!("5"))];
        let raw = NewEndpoint::serialize_requirements(&requirements).unwrap();
        assert_eq!(parse_requirements(raw.as_deref()).unwrap(), requirements);
        assert_eq!(NewEndpoint::serialize_requirements(&[]).unwrap(), None);
    }
}
