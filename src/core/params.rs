//! Normalization of loosely shaped caller parameters into wire bodies

use serde_json::{Map, Value};
use tracing::debug;

use crate::core::errors::{IntentoError, Result};
use crate::core::models::{
    AuthSpec, Capability, FulfillBody, FulfillContext, FulfillParams, FulfillService, ListParam,
    Processing, UsageBody, UsageFilter, UsageParams, UsageRange,
};

/// Normalize an optional list parameter, dropping it when it has no elements
pub fn string_to_list(value: Option<&ListParam>) -> Option<Vec<String>> {
    value.map(ListParam::to_list).filter(|list| !list.is_empty())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Build the per-provider auth object from own credentials
///
/// Any auth override needs at least one provider. Keyed auth then passes
/// through unchanged. A bare credential (or list of them) is attributed to
/// the single provider in `providers`; with several it is ambiguous and
/// rejected.
pub fn own_credentials(
    auth: Option<&AuthSpec>,
    providers: &[String],
) -> Result<Option<Map<String, Value>>> {
    let auth = match auth {
        None => return Ok(None),
        Some(AuthSpec::ByProvider(map)) if map.is_empty() => return Ok(None),
        Some(auth) => auth,
    };
    if providers.is_empty() {
        return Err(IntentoError::AmbiguousAuth {
            message: "auth requires a provider: specify one provider or key auth by provider id"
                .to_string(),
        });
    }

    let credentials = match auth {
        AuthSpec::ByProvider(map) => return Ok(Some(map.clone())),
        AuthSpec::Credential(credential) => vec![Value::Object(credential.clone())],
        AuthSpec::Credentials(list) => list.clone(),
        AuthSpec::Json(raw) => match parse_auth(raw)? {
            Value::Object(map) if is_keyed(&map, providers) => return Ok(Some(map)),
            Value::Object(credential) => vec![Value::Object(credential)],
            Value::Array(list) => list,
            _ => {
                return Err(IntentoError::invalid_input(
                    "auth must be a JSON object or a JSON list of objects",
                ))
            }
        },
    };

    match providers {
        [provider] => {
            let mut map = Map::new();
            map.insert(provider.clone(), Value::Array(credentials));
            Ok(Some(map))
        }
        _ => Err(IntentoError::AmbiguousAuth {
            message:
                "Unclear auth parameter: specify one provider or clarify provider inside auth object"
                    .to_string(),
        }),
    }
}

fn parse_auth(raw: &str) -> Result<Value> {
    let raw = raw.trim();
    if !raw.starts_with('{') && !raw.starts_with('[') {
        return Err(IntentoError::invalid_input(
            "auth must be a JSON object or a JSON list of objects",
        ));
    }
    serde_json::from_str(raw)
        .map_err(|e| IntentoError::invalid_input(format!("auth is not valid JSON: {}", e)))
}

fn is_keyed(map: &Map<String, Value>, providers: &[String]) -> bool {
    !map.is_empty() && map.keys().all(|k| providers.iter().any(|p| p == k))
}

/// Map fulfill parameters onto the `{context, service}` wire body
pub fn normalize_fulfill(capability: Capability, params: &FulfillParams) -> Result<FulfillBody> {
    let mut provider = string_to_list(params.provider.as_ref());

    if provider.is_none() {
        if let Some(default) = capability.default_provider() {
            debug!("No provider given for {}, using {}", capability, default);
            provider = Some(vec![default.to_string()]);
        } else if capability.requires_provider() {
            return Err(IntentoError::ProviderRequired {
                capability: capability.intent_id(),
            });
        }
    }

    let providers = provider.as_deref().unwrap_or_default();
    let auth = own_credentials(params.auth.as_ref(), providers)?;

    let pre = string_to_list(params.pre_processing.as_ref());
    let post = string_to_list(params.post_processing.as_ref());
    let processing = if pre.is_some() || post.is_some() {
        Some(Processing { pre, post })
    } else {
        None
    };

    Ok(FulfillBody {
        context: FulfillContext {
            text: params.text.clone(),
            from: non_empty(&params.from),
            to: non_empty(&params.to),
            lang: non_empty(&params.lang),
            category: non_empty(&params.category),
            format: non_empty(&params.format),
        },
        service: FulfillService {
            provider,
            auth,
            async_mode: params.async_mode,
            bidding: non_empty(&params.bidding),
            failover: params.failover,
            failover_list: string_to_list(params.failover_list.as_ref()),
            processing,
            multiple_translations: params.multiple_translations,
            input_format: non_empty(&params.input_format),
            output_format: non_empty(&params.output_format),
            pretty_print: params.pretty_print,
        },
    })
}

/// Map usage parameters onto the usage wire body
pub fn normalize_usage(params: &UsageParams) -> UsageBody {
    let range = UsageRange {
        from: params.from,
        to: params.to,
        bucket: non_empty(&params.bucket),
    };
    let filter = UsageFilter {
        provider: string_to_list(params.provider.as_ref()),
        intent: string_to_list(params.intent.as_ref()),
        status: string_to_list(params.status.as_ref()),
        client: string_to_list(params.client.as_ref()),
    };

    UsageBody {
        range: Some(range).filter(|r| *r != UsageRange::default()),
        filter: Some(filter).filter(|f| *f != UsageFilter::default()),
        group: string_to_list(params.group.as_ref()),
        fields: string_to_list(params.fields.as_ref()),
    }
}
