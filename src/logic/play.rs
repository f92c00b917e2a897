use serde_json::Value;

use crate::error::SandboxResult;
use crate::logic::{endpoint_is_visible, BodyMatcher, ParameterValidator, UnauthorizedFallback};
use crate::model::{Id, PlayRequest, RequirementClass, ResolvedResponse};
use crate::store::traits::Store;

/// Pipeline stages of a single resolution. Stages only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    EndpointLookup,
    PathValidation,
    HeaderValidation,
    BodyMatch,
    Default,
}

impl std::fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResolutionStage::EndpointLookup => "endpoint lookup",
            ResolutionStage::PathValidation => "path validation",
            ResolutionStage::HeaderValidation => "header validation",
            ResolutionStage::BodyMatch => "body match",
            ResolutionStage::Default => "default",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultReason {
    /// Endpoint missing, deleted, or hidden by its proxy
    EndpointUnavailable,
    NoMatch,
}

/// Which rule produced the returned envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    Recorded {
        schema_id: Id,
    },
    UnauthorizedFallback {
        schema_id: Id,
        failed: RequirementClass,
    },
    Default {
        reason: DefaultReason,
    },
}

impl ResolutionSource {
    /// Compact form used in the `x-sandbox-resolution` response header
    pub fn label(&self) -> String {
        match self {
            ResolutionSource::Recorded { schema_id } => format!("recorded;schema={}", schema_id),
            ResolutionSource::UnauthorizedFallback { schema_id, failed } => {
                format!("unauthorized;schema={};failed={}", schema_id, failed)
            }
            ResolutionSource::Default { reason } => match reason {
                DefaultReason::EndpointUnavailable => {
                    "default;reason=endpoint_unavailable".to_string()
                }
                DefaultReason::NoMatch => "default;reason=no_match".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub envelope: ResolvedResponse,
    pub source: ResolutionSource,
}

impl Resolution {
    fn default_envelope(reason: DefaultReason) -> Self {
        Self {
            envelope: ResolvedResponse::default_unauthorized(),
            source: ResolutionSource::Default { reason },
        }
    }
}

/// Picks the recorded example returned for a simulated request.
///
/// Order: endpoint lookup, path validation, header validation, body match, default.
/// A failed validation returns the endpoint's 401 example when one exists and
/// otherwise lets the pipeline continue.
pub struct SandboxPlayer;

impl SandboxPlayer {
    pub async fn play<S: Store>(store: &S, request: &PlayRequest) -> SandboxResult<Resolution> {
        match Self::resolve(store, request).await {
            Ok(resolution) => {
                log::debug!(
                    "Endpoint {} resolved to status {} ({})",
                    request.endpoint_id,
                    resolution.envelope.status,
                    resolution.source.label()
                );
                Ok(resolution)
            }
            Err(e) => {
                log::error!(
                    "Sandbox resolution failed for endpoint {}: {}",
                    request.endpoint_id,
                    e
                );
                Err(e)
            }
        }
    }

    async fn resolve<S: Store>(store: &S, request: &PlayRequest) -> SandboxResult<Resolution> {
        let endpoint_id = request.endpoint_id;

        Self::enter(endpoint_id, ResolutionStage::EndpointLookup);
        let endpoint = match store.get_endpoint(endpoint_id).await? {
            Some(endpoint) => endpoint,
            None => return Ok(Resolution::default_envelope(DefaultReason::EndpointUnavailable)),
        };
        if !endpoint_is_visible(store, &endpoint).await? {
            return Ok(Resolution::default_envelope(DefaultReason::EndpointUnavailable));
        }

        let validations = [
            (
                ResolutionStage::PathValidation,
                RequirementClass::Path,
                request.path_param.as_deref(),
            ),
            (
                ResolutionStage::HeaderValidation,
                RequirementClass::Header,
                request.header_param.as_deref(),
            ),
        ];

        for (stage, class, supplied) in validations {
            Self::enter(endpoint_id, stage);
            let requirements = endpoint.raw_requirements(class);
            let check = ParameterValidator::validate_raw(class, requirements, supplied)?;
            if check.is_ok() {
                continue;
            }

            log::debug!("Endpoint {} failed {}: {:?}", endpoint_id, stage, check);
            if let Some(schema) = UnauthorizedFallback::resolve(store, endpoint_id).await? {
                return Ok(Resolution {
                    envelope: schema.to_envelope(),
                    source: ResolutionSource::UnauthorizedFallback {
                        schema_id: schema.id,
                        failed: class,
                    },
                });
            }
        }

        Self::enter(endpoint_id, ResolutionStage::BodyMatch);
        let absent = Value::Null;
        let body = request.json_body.as_ref().unwrap_or(&absent);
        if let Some(schema) = BodyMatcher::find_match(store, endpoint_id, body).await? {
            return Ok(Resolution {
                envelope: schema.to_envelope(),
                source: ResolutionSource::Recorded {
                    schema_id: schema.id,
                },
            });
        }

        Self::enter(endpoint_id, ResolutionStage::Default);
        Ok(Resolution::default_envelope(DefaultReason::NoMatch))
    }

    fn enter(endpoint_id: Id, stage: ResolutionStage) {
        log::debug!("Endpoint {}: entering {}", endpoint_id, stage);
    }
}
