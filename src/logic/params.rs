use crate::error::{SandboxError, SandboxResult};
use crate::model::{parse_requirements, RequirementClass, RequirementDescriptor, SuppliedParam};

/// Result of checking supplied parameters against declared requirements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamCheck {
    Satisfied,
    Missing { name: String },
    Mismatch { name: String },
}

impl ParamCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, ParamCheck::Satisfied)
    }
}

pub struct ParameterValidator;

impl ParameterValidator {
    /// Check supplied parameters against a serialized requirement list.
    ///
    /// A malformed list fails the whole call rather than being read as "no requirements".
    pub fn validate_raw(
        class: RequirementClass,
        raw_requirements: Option<&str>,
        supplied: Option<&[SuppliedParam]>,
    ) -> SandboxResult<ParamCheck> {
        let requirements = parse_requirements(raw_requirements)
            .map_err(|source| SandboxError::MalformedRequirements { class, source })?;
        Ok(Self::validate(&requirements, supplied))
    }

    /// Every required descriptor needs a supplied entry of the same name (the first one
    /// wins) whose value is exactly the declared value. Optional descriptors are ignored.
    pub fn validate(
        requirements: &[RequirementDescriptor],
        supplied: Option<&[SuppliedParam]>,
    ) -> ParamCheck {
        let supplied = supplied.unwrap_or_default();

        for requirement in requirements.iter().filter(|r| r.is_required) {
            let Some(param) = supplied.iter().find(|p| p.name == requirement.name) else {
                return ParamCheck::Missing {
                    name: requirement.name.clone(),
                };
            };

            if param.value != requirement.value {
                return ParamCheck::Mismatch {
                    name: requirement.name.clone(),
                };
            }
        }

        ParamCheck::Satisfied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn supplied(pairs: &[(&str, serde_json::Value)]) -> Vec<SuppliedParam> {
        pairs
            .iter()
            .map(|(name, value)| SuppliedParam::new(name, value.clone()))
            .collect()
    }

    #[test]
    fn test_no_requirements_always_passes() {
        assert!(ParameterValidator::validate(&[], None).is_ok());
        let params = supplied(&[("anything", json!("x"))]);
        assert!(ParameterValidator::validate(&[], Some(&params)).is_ok());
    }

    #[test]
    fn test_required_param_must_be_present() {
        let requirements = vec![RequirementDescriptor::required("id", json!("5"))];

        assert_eq!(
            ParameterValidator::validate(&requirements, None),
            ParamCheck::Missing {
                name: "id".to_string()
            }
        );
        let params = supplied(&[("other", json!("5"))]);
        assert!(!ParameterValidator::validate(&requirements, Some(&params)).is_ok());
    }

    #[test]
    fn test_required_param_value_is_exact() {
        let requirements = vec![RequirementDescriptor::required("id", json!("5"))];

        let exact = supplied(&[("id", json!("5"))]);
        assert!(ParameterValidator::validate(&requirements, Some(&exact)).is_ok());

        for value in [json!("6"), json!(5), json!(" 5"), json!(null)] {
            let params = supplied(&[("id", value)]);
            assert_eq!(
                ParameterValidator::validate(&requirements, Some(&params)),
                ParamCheck::Mismatch {
                    name: "id".to_string()
                }
            );
        }
    }

    #[test]
    fn test_header_values_are_case_sensitive() {
        let requirements = vec![RequirementDescriptor::required(
            "Authorization",
            json!("Bearer sandbox"),
        )];
        let params = supplied(&[("Authorization", json!("bearer sandbox"))]);
        assert!(!ParameterValidator::validate(&requirements, Some(&params)).is_ok());
    }

    #[test]
    fn test_first_matching_name_wins() {
        let requirements = vec![RequirementDescriptor::required("id", json!("5"))];
        let params = supplied(&[("id", json!("6")), ("id", json!("5"))]);
        assert!(!ParameterValidator::validate(&requirements, Some(&params)).is_ok());
    }

    #[test]
    fn test_optional_descriptors_never_affect_result() {
        let requirements = vec![
            RequirementDescriptor::required("id", json!("5")),
            RequirementDescriptor::optional("page", json!(1)),
        ];

        let variants = [
            supplied(&[("id", json!("5"))]),
            supplied(&[("id", json!("5")), ("page", json!(1))]),
            supplied(&[("id", json!("5")), ("page", json!(99))]),
            supplied(&[("id", json!("5")), ("page", json!(null))]),
        ];
        for params in &variants {
            assert!(ParameterValidator::validate(&requirements, Some(params)).is_ok());
        }

        let only_optional = vec![RequirementDescriptor::optional("page", json!(1))];
        assert!(ParameterValidator::validate(&only_optional, None).is_ok());
        let wrong = supplied(&[("page", json!("two"))]);
        assert!(ParameterValidator::validate(&only_optional, Some(&wrong)).is_ok());
    }

    #[test]
    fn test_validate_raw_parses_requirements() {
        let raw = r#"[{"name":"X-Api-Key","value":"abc","is_required":true}]"#;
        let params = supplied(&[("X-Api-Key", json!("abc"))]);

        let check =
            ParameterValidator::validate_raw(RequirementClass::Header, Some(raw), Some(&params))
                .unwrap();
        assert!(check.is_ok());

        let check = ParameterValidator::validate_raw(RequirementClass::Header, None, None).unwrap();
        assert!(check.is_ok());
    }

    #[test]
    fn test_validate_raw_rejects_malformed_requirements() {
        let result =
            ParameterValidator::validate_raw(RequirementClass::Path, Some("[{\"name\":"), None);

        match result {
            Err(SandboxError::MalformedRequirements { class, .. }) => {
                assert_eq!(class, RequirementClass::Path)
            }
            other => panic!("expected malformed requirements error, got {:?}", other),
        }
    }
}
