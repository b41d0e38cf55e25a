//! Core data models: capabilities, caller parameters and wire bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::IntentoError;

/// Provider used for dictionary requests when none is given
pub const DEFAULT_DICTIONARY_PROVIDER: &str = "ai.text.dictionary.yandex.dictionary_api.1-0";

/// AI capability (intent) served under `/ai/{domain}/{slug}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// `ai.text.translate`
    Translate,
    /// `ai.text.sentiment`
    Sentiment,
    /// `ai.text.dictionary`
    Dictionary,
    /// `ai.text.classify`
    Classify,
    /// `ai.text.transliterate`
    Transliterate,
    /// `ai.text.detect-intent`
    DetectIntent,
    /// `ai.image.tagging`
    ImageTagging,
    /// `ai.image.ocr`
    Ocr,
    /// `ai.speech.transcribe`
    Transcribe,
}

impl Capability {
    /// All capabilities in a stable order
    pub const ALL: [Capability; 9] = [
        Capability::Translate,
        Capability::Sentiment,
        Capability::Dictionary,
        Capability::Classify,
        Capability::Transliterate,
        Capability::DetectIntent,
        Capability::ImageTagging,
        Capability::Ocr,
        Capability::Transcribe,
    ];

    /// Content domain segment of the endpoint
    pub fn domain(&self) -> &'static str {
        match self {
            Capability::ImageTagging | Capability::Ocr => "image",
            Capability::Transcribe => "speech",
            _ => "text",
        }
    }

    /// Last path segment of the endpoint
    pub fn slug(&self) -> &'static str {
        match self {
            Capability::Translate => "translate",
            Capability::Sentiment => "sentiment",
            Capability::Dictionary => "dictionary",
            Capability::Classify => "classify",
            Capability::Transliterate => "transliterate",
            Capability::DetectIntent => "detect-intent",
            Capability::ImageTagging => "tagging",
            Capability::Ocr => "ocr",
            Capability::Transcribe => "transcribe",
        }
    }

    /// Endpoint path, e.g. `/ai/text/translate`
    pub fn path(&self) -> String {
        format!("/ai/{}/{}", self.domain(), self.slug())
    }

    /// Dotted intent id, e.g. `ai.text.translate`
    pub fn intent_id(&self) -> String {
        format!("ai.{}.{}", self.domain(), self.slug())
    }

    /// Provider filled in when the caller gives none
    pub fn default_provider(&self) -> Option<&'static str> {
        match self {
            Capability::Dictionary => Some(DEFAULT_DICTIONARY_PROVIDER),
            _ => None,
        }
    }

    /// Smart routing is unavailable and a provider must be named
    pub fn requires_provider(&self) -> bool {
        matches!(self, Capability::Sentiment)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.intent_id())
    }
}

impl FromStr for Capability {
    type Err = IntentoError;

    /// Accepts `translate`, `ai.text.translate` and `ai/text/translate` forms
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('/').replace('/', ".");
        Capability::ALL
            .iter()
            .copied()
            .find(|c| {
                name == c.slug()
                    || name == c.intent_id()
                    || (*c == Capability::ImageTagging && name == "image-tagging")
            })
            .ok_or_else(|| IntentoError::UnknownCapability { name: s.to_string() })
    }
}

/// List-valued parameter given as a comma-separated string or as items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListParam {
    /// Single id or comma-joined ids
    Joined(String),
    /// Ids as separate items
    Items(Vec<String>),
}

/// Provider id(s) for a request
pub type ProviderSpec = ListParam;

impl ListParam {
    /// Trimmed, non-empty elements
    pub fn to_list(&self) -> Vec<String> {
        let items: Box<dyn Iterator<Item = &str> + '_> = match self {
            ListParam::Joined(s) => Box::new(s.split(',')),
            ListParam::Items(items) => Box::new(items.iter().map(String::as_str)),
        };
        items
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl From<&str> for ListParam {
    fn from(value: &str) -> Self {
        ListParam::Joined(value.to_string())
    }
}

impl From<String> for ListParam {
    fn from(value: String) -> Self {
        ListParam::Joined(value)
    }
}

impl From<Vec<String>> for ListParam {
    fn from(value: Vec<String>) -> Self {
        ListParam::Items(value)
    }
}

impl From<Vec<&str>> for ListParam {
    fn from(value: Vec<&str>) -> Self {
        ListParam::Items(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ListParam {
    fn from(value: &[&str]) -> Self {
        ListParam::Items(value.iter().map(|s| s.to_string()).collect())
    }
}

/// Text to process: one segment or a bulk list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    /// One segment
    Single(String),
    /// Several segments in one request
    Bulk(Vec<String>),
}

impl From<&str> for TextInput {
    fn from(value: &str) -> Self {
        TextInput::Single(value.to_string())
    }
}

impl From<String> for TextInput {
    fn from(value: String) -> Self {
        TextInput::Single(value)
    }
}

impl From<Vec<String>> for TextInput {
    fn from(value: Vec<String>) -> Self {
        TextInput::Bulk(value)
    }
}

impl From<Vec<&str>> for TextInput {
    fn from(value: Vec<&str>) -> Self {
        TextInput::Bulk(value.into_iter().map(str::to_string).collect())
    }
}

/// Own provider credentials in any of the accepted caller forms
#[derive(Debug, Clone, PartialEq)]
pub enum AuthSpec {
    /// Already keyed by provider id: `{"provider-id": [{...}]}`
    ByProvider(Map<String, Value>),
    /// One credential object for the single specified provider
    Credential(Map<String, Value>),
    /// Several credential objects for the single specified provider
    Credentials(Vec<Value>),
    /// JSON encoding of one of the forms above
    Json(String),
}

impl From<&str> for AuthSpec {
    fn from(value: &str) -> Self {
        AuthSpec::Json(value.to_string())
    }
}

impl From<String> for AuthSpec {
    fn from(value: String) -> Self {
        AuthSpec::Json(value)
    }
}

/// Caller parameters for a fulfill request
#[derive(Debug, Clone, Default)]
pub struct FulfillParams {
    /// Text to process
    pub text: Option<TextInput>,
    /// Source language
    pub from: Option<String>,
    /// Target language
    pub to: Option<String>,
    /// Text language
    pub lang: Option<String>,
    /// Translation domain
    pub category: Option<String>,
    /// Content format
    pub format: Option<String>,
    /// Provider id(s)
    pub provider: Option<ProviderSpec>,
    /// Own provider credentials
    pub auth: Option<AuthSpec>,
    /// Ask for a deferred operation
    pub async_mode: Option<bool>,
    /// Poll a deferred operation until it is done
    pub await_async: bool,
    /// Smart routing strategy
    pub bidding: Option<String>,
    /// Fall back to other providers on failure
    pub failover: Option<bool>,
    /// Providers to fall back to
    pub failover_list: Option<ListParam>,
    /// Pre-processing steps
    pub pre_processing: Option<ListParam>,
    /// Post-processing steps
    pub post_processing: Option<ListParam>,
    /// Ask for alternative translations
    pub multiple_translations: Option<bool>,
    /// Input content format
    pub input_format: Option<String>,
    /// Output content format
    pub output_format: Option<String>,
    /// Pretty-print the response
    pub pretty_print: Option<bool>,
}

impl FulfillParams {
    /// Parameters for `text`
    pub fn new(text: impl Into<TextInput>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Set the source language
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set the target language
    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Set the text language
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Set the translation domain
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the content format
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the provider(s)
    pub fn with_provider(mut self, provider: impl Into<ProviderSpec>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Use own provider credentials
    pub fn with_auth(mut self, auth: impl Into<AuthSpec>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Request a deferred operation; `wait` polls it to completion
    pub fn with_async(mut self, wait: bool) -> Self {
        self.async_mode = Some(true);
        self.await_async = wait;
        self
    }

    /// Set the routing strategy
    pub fn with_bidding(mut self, bidding: impl Into<String>) -> Self {
        self.bidding = Some(bidding.into());
        self
    }

    /// Enable failover to these providers
    pub fn with_failover(mut self, failover_list: impl Into<ListParam>) -> Self {
        self.failover = Some(true);
        self.failover_list = Some(failover_list.into());
        self
    }

    /// Set the pre-processing steps
    pub fn with_pre_processing(mut self, steps: impl Into<ListParam>) -> Self {
        self.pre_processing = Some(steps.into());
        self
    }

    /// Set the post-processing steps
    pub fn with_post_processing(mut self, steps: impl Into<ListParam>) -> Self {
        self.post_processing = Some(steps.into());
        self
    }

    /// Ask for alternative translations
    pub fn with_multiple_translations(mut self, enabled: bool) -> Self {
        self.multiple_translations = Some(enabled);
        self
    }

    /// Set the input format
    pub fn with_input_format(mut self, format: impl Into<String>) -> Self {
        self.input_format = Some(format.into());
        self
    }

    /// Set the output format
    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    /// Pretty-print the response
    pub fn with_pretty_print(mut self, enabled: bool) -> Self {
        self.pretty_print = Some(enabled);
        self
    }
}

/// Wire body of `POST /ai/{domain}/{slug}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FulfillBody {
    /// Content
    pub context: FulfillContext,
    /// Routing and processing
    pub service: FulfillService,
}

/// Content-related part of the body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FulfillContext {
    /// Text to process
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextInput>,
    /// Source language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Target language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Text language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Translation domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Content format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Behaviour-related part of the body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FulfillService {
    /// Provider ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Vec<String>>,
    /// Own credentials keyed by provider id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Map<String, Value>>,
    /// Deferred operation
    #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
    pub async_mode: Option<bool>,
    /// Routing strategy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidding: Option<String>,
    /// Failover enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failover: Option<bool>,
    /// Failover providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failover_list: Option<Vec<String>>,
    /// Processing steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing: Option<Processing>,
    /// Alternative translations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_translations: Option<bool>,
    /// Input format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    /// Output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    /// Pretty print
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty_print: Option<bool>,
}

/// Content processing steps applied before and after the provider call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Processing {
    /// Steps before the provider call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre: Option<Vec<String>>,
    /// Steps after the provider call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Vec<String>>,
}

/// Deferred operation handle returned for async requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Operation id
    pub id: String,
    /// Whether the operation finished
    #[serde(default)]
    pub done: bool,
    /// Result once done
    #[serde(default)]
    pub response: Option<Value>,
    /// Operation metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    /// Failure details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl Operation {
    /// Parse an `{id, done}` acknowledgment, `None` for any other shape
    pub fn from_value(value: &Value) -> Option<Self> {
        value.get("id")?.as_str()?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// Filters for provider listings, sent as query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvidersQuery {
    /// Source language
    pub from: Option<String>,
    /// Target language
    pub to: Option<String>,
    /// Only providers with bulk support
    pub bulk: Option<bool>,
    /// Only providers with language detection
    pub lang_detect: Option<bool>,
    /// Content format
    pub format: Option<String>,
}

impl ProvidersQuery {
    /// Filter by source language
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Filter by target language
    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Filter by bulk support
    pub fn with_bulk(mut self, bulk: bool) -> Self {
        self.bulk = Some(bulk);
        self
    }

    /// Filter by language detection
    pub fn with_lang_detect(mut self, lang_detect: bool) -> Self {
        self.lang_detect = Some(lang_detect);
        self
    }

    /// Filter by content format
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Query pairs in a stable order
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_param(&mut params, "from", self.from.clone());
        push_param(&mut params, "to", self.to.clone());
        push_param(&mut params, "bulk", self.bulk.map(|b| b.to_string()));
        push_param(&mut params, "lang_detect", self.lang_detect.map(|b| b.to_string()));
        push_param(&mut params, "format", self.format.clone());
        params
    }
}

/// Locale for language names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguagesQuery {
    /// Locale, e.g. `de`
    pub locale: Option<String>,
}

impl LanguagesQuery {
    /// Query for `locale`
    pub fn locale(locale: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
        }
    }

    /// Query pairs
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_param(&mut params, "locale", self.locale.clone());
        params
    }
}

fn push_param(params: &mut Vec<(String, String)>, key: &str, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        params.push((key.to_string(), value));
    }
}

/// Usage statistics endpoint flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewpoint {
    /// Aggregated over the Intento account
    #[default]
    Intento,
    /// Split per provider
    Provider,
    /// Distinct field combinations
    Distinct,
}

impl Viewpoint {
    /// Endpoint path
    pub fn path(&self) -> &'static str {
        match self {
            Viewpoint::Intento => "/usage/intento",
            Viewpoint::Provider => "/usage/provider",
            Viewpoint::Distinct => "/usage/distinct",
        }
    }
}

impl FromStr for Viewpoint {
    type Err = IntentoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "intento" => Ok(Viewpoint::Intento),
            "provider" => Ok(Viewpoint::Provider),
            "distinct" => Ok(Viewpoint::Distinct),
            other => Err(IntentoError::invalid_input(format!(
                "unknown usage viewpoint `{}`, expected intento|provider|distinct",
                other
            ))),
        }
    }
}

/// Caller parameters for usage statistics
#[derive(Debug, Clone, Default)]
pub struct UsageParams {
    /// Range start, unix seconds
    pub from: Option<i64>,
    /// Range end, unix seconds
    pub to: Option<i64>,
    /// Bucket size, e.g. `1hour` or `1day`
    pub bucket: Option<String>,
    /// Provider ids
    pub provider: Option<ListParam>,
    /// Intent ids
    pub intent: Option<ListParam>,
    /// Response statuses
    pub status: Option<ListParam>,
    /// Client ids
    pub client: Option<ListParam>,
    /// Fields to group by
    pub group: Option<ListParam>,
    /// Field combinations for the distinct viewpoint
    pub fields: Option<ListParam>,
}

impl UsageParams {
    /// Set the range from two timestamps
    pub fn with_range(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from.timestamp());
        self.to = Some(to.timestamp());
        self
    }

    /// Set the bucket size
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Filter by provider
    pub fn with_provider(mut self, provider: impl Into<ListParam>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Filter by intent
    pub fn with_intent(mut self, intent: impl Into<ListParam>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    /// Filter by status
    pub fn with_status(mut self, status: impl Into<ListParam>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Filter by client
    pub fn with_client(mut self, client: impl Into<ListParam>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Group by these fields
    pub fn with_group(mut self, group: impl Into<ListParam>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Field combinations for the distinct viewpoint
    pub fn with_fields(mut self, fields: impl Into<ListParam>) -> Self {
        self.fields = Some(fields.into());
        self
    }
}

/// Wire body of `POST /usage/{viewpoint}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageBody {
    /// Time range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<UsageRange>,
    /// Filters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<UsageFilter>,
    /// Grouping fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Vec<String>>,
    /// Distinct fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// Time range in unix seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageRange {
    /// Start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    /// End
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
    /// Bucket size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

/// Usage filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageFilter {
    /// Provider ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Vec<String>>,
    /// Intent ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Vec<String>>,
    /// Statuses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<String>>,
    /// Client ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<Vec<String>>,
}

/// Delegated credential record to register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDelegatedCredential {
    /// Credential id
    pub credential_id: String,
    /// Credential type, e.g. `google_service_account`
    pub credential_type: String,
    /// Secret credential JSON
    pub secret_credentials: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_usage_range_from_datetimes() {
        let from = Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2017, 1, 2, 12, 30, 0).unwrap();
        let params = UsageParams::default().with_range(from, to);
        assert_eq!(params.from, Some(1_483_228_800));
        assert_eq!(params.to, Some(1_483_360_200));
    }

    #[test]
    fn test_capability_paths() {
        assert_eq!(Capability::Translate.path(), "/ai/text/translate");
        assert_eq!(Capability::DetectIntent.path(), "/ai/text/detect-intent");
        assert_eq!(Capability::ImageTagging.path(), "/ai/image/tagging");
        assert_eq!(Capability::Ocr.path(), "/ai/image/ocr");
        assert_eq!(Capability::Transcribe.path(), "/ai/speech/transcribe");
    }

    #[test]
    fn test_capability_lookup() {
        assert_eq!("translate".parse::<Capability>().unwrap(), Capability::Translate);
        assert_eq!(
            "ai.text.sentiment".parse::<Capability>().unwrap(),
            Capability::Sentiment
        );
        assert_eq!(
            "ai/image/ocr".parse::<Capability>().unwrap(),
            Capability::Ocr
        );
        assert_eq!(
            "/ai/speech/transcribe".parse::<Capability>().unwrap(),
            Capability::Transcribe
        );

        let err = "translate.providers.extra".parse::<Capability>().unwrap_err();
        assert!(matches!(err, IntentoError::UnknownCapability { .. }));
    }

    #[test]
    fn test_list_param_forms_match() {
        let joined = ListParam::from("a.b.c, d.e.f ,g");
        let items = ListParam::from(vec!["a.b.c", " d.e.f", "g "]);
        assert_eq!(joined.to_list(), vec!["a.b.c", "d.e.f", "g"]);
        assert_eq!(joined.to_list(), items.to_list());
        assert!(ListParam::from("").to_list().is_empty());
        assert_eq!(ListParam::from("a,,b").to_list(), vec!["a", "b"]);
    }

    #[test]
    fn test_providers_query_params() {
        let query = ProvidersQuery::default().with_to("es").with_bulk(true);
        assert_eq!(
            query.to_params(),
            vec![
                ("to".to_string(), "es".to_string()),
                ("bulk".to_string(), "true".to_string())
            ]
        );
        assert!(ProvidersQuery::default().to_params().is_empty());
    }

    #[test]
    fn test_operation_from_value() {
        let ack = serde_json::json!({"id": "op-1"});
        let op = Operation::from_value(&ack).unwrap();
        assert_eq!(op.id, "op-1");
        assert!(!op.done);
        assert!(op.response.is_none());

        assert!(Operation::from_value(&serde_json::json!({"results": []})).is_none());
    }

    #[test]
    fn test_viewpoint_parse() {
        assert_eq!("distinct".parse::<Viewpoint>().unwrap().path(), "/usage/distinct");
        assert!("nobody".parse::<Viewpoint>().is_err());
    }
}
