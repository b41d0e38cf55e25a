//! Async Intento API connector

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::core::config::{ClientOptions, ConnectorConfig, Credentials};
use crate::core::errors::{IntentoError, Result};
use crate::core::models::{
    Capability, FulfillParams, LanguagesQuery, NewDelegatedCredential, Operation, ProvidersQuery,
    UsageParams, Viewpoint,
};
use crate::core::params::{normalize_fulfill, normalize_usage};
use crate::core::transport::{
    base_url, classify_response, curl_command, user_agent, RequestDescriptor, ReqwestTransport,
    Transport, TransportRequest,
};

/// Client for the Intento API
///
/// Construction never fails. A client built without an API key records the
/// problem in [`IntentoConnector::error`] and rejects every call.
#[derive(Clone)]
pub struct IntentoConnector {
    credentials: Arc<Credentials>,
    options: Arc<ClientOptions>,
    transport: Option<Arc<dyn Transport>>,
    error: Option<String>,
}

impl fmt::Debug for IntentoConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentoConnector")
            .field("host", &self.credentials.host())
            .field("options", &self.options)
            .field("error", &self.error)
            .finish()
    }
}

impl IntentoConnector {
    /// Create a connector using the default `reqwest` transport
    pub fn new(credentials: impl Into<Credentials>, options: ClientOptions) -> Self {
        let timeout = options.timeout_ms.map(Duration::from_millis);
        match ReqwestTransport::new(timeout) {
            Ok(transport) => Self::with_transport(credentials, options, Arc::new(transport)),
            Err(e) => {
                error!("Failed to build HTTP client: {}", e);
                let mut client = Self::build(credentials.into(), options, None);
                client.error.get_or_insert_with(|| format!("HTTP client unavailable: {}", e));
                client
            }
        }
    }

    /// Create a connector sending requests through a custom transport
    pub fn with_transport(
        credentials: impl Into<Credentials>,
        options: ClientOptions,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self::build(credentials.into(), options, Some(transport))
    }

    /// Create from a loaded configuration
    pub fn from_config(config: ConnectorConfig) -> Self {
        let (credentials, options) = config.into_parts();
        Self::new(credentials, options)
    }

    fn build(
        credentials: Credentials,
        options: ClientOptions,
        transport: Option<Arc<dyn Transport>>,
    ) -> Self {
        let error = if credentials.api_key.trim().is_empty() {
            error!("Missing Intento API key");
            Some("No Intento API key provided".to_string())
        } else {
            None
        };

        Self {
            credentials: Arc::new(credentials),
            options: Arc::new(options),
            transport,
            error,
        }
    }

    /// Why the client is unusable, if it is
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether requests can be made
    pub fn is_ready(&self) -> bool {
        self.error.is_none()
    }

    /// Credentials in use
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Options in use
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Handle for one capability
    pub fn capability(&self, capability: Capability) -> CapabilityClient<'_> {
        CapabilityClient {
            client: self,
            capability,
        }
    }

    /// `ai.text.translate` handle
    pub fn translate(&self) -> CapabilityClient<'_> {
        self.capability(Capability::Translate)
    }

    /// `ai.text.sentiment` handle
    pub fn sentiment(&self) -> CapabilityClient<'_> {
        self.capability(Capability::Sentiment)
    }

    /// `ai.text.dictionary` handle
    pub fn dictionary(&self) -> CapabilityClient<'_> {
        self.capability(Capability::Dictionary)
    }

    /// Send a request and classify the response
    ///
    /// In dry-run mode nothing is sent: the result is the JSON body that would
    /// have been posted, or the path with query string for body-less requests.
    pub async fn make_request(&self, request: RequestDescriptor) -> Result<Value> {
        if self.credentials.api_key.trim().is_empty() {
            return Err(IntentoError::MissingApiKey);
        }

        let path = request.path_with_query();
        let body = request.body()?;
        let url = format!("{}{}", base_url(self.credentials.host()), path);

        if self.options.logs_requests() {
            debug!("API request: {} {}", request.method, url);
            if let Some(body) = &body {
                debug!("API request body: {}", body);
            }
        }

        if self.options.dry_run {
            return match body {
                Some(body) => Ok(serde_json::from_str(&body)?),
                None => Ok(Value::String(path)),
            };
        }

        let transport = self.transport.as_ref().ok_or_else(|| IntentoError::NetworkError {
            message: self.error.clone().unwrap_or_default(),
        })?;

        let transport_request = TransportRequest {
            method: request.method,
            url,
            headers: vec![
                ("apikey".to_string(), self.credentials.api_key.clone()),
                (
                    "User-Agent".to_string(),
                    user_agent(self.options.user_agent.as_deref()),
                ),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body,
        };

        if self.options.curl {
            info!("{}", curl_command(&transport_request));
        }

        let response = transport.send(transport_request).await?;
        if self.options.logs_requests() {
            debug!("API response {}: {}", response.status, response.body);
        }

        classify_response(response.status, &response.status_message, &response.body)
    }

    /// `POST /ai/{domain}/{slug}` with normalized parameters
    pub async fn fulfill(&self, capability: Capability, params: FulfillParams) -> Result<Value> {
        let body = match normalize_fulfill(capability, &params) {
            Ok(body) => body,
            Err(e @ IntentoError::ProviderRequired { .. }) => {
                self.suggest_providers(capability).await;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let request = RequestDescriptor::post(capability.path()).with_content(serde_json::to_value(&body)?);
        let response = self.make_request(request).await?;

        if params.await_async && params.async_mode == Some(true) && !self.options.dry_run {
            if let Some(operation) = Operation::from_value(&response).filter(|op| !op.done) {
                info!("Waiting for operation {} to complete", operation.id);
                return self.await_operation(&operation.id).await;
            }
        }

        Ok(response)
    }

    async fn suggest_providers(&self, capability: Capability) {
        error!(
            "Please specify a provider for {}. Provider ids are listed by `providers()`",
            capability
        );
        if self.options.dry_run || !self.is_ready() {
            return;
        }

        match self.providers(capability, &ProvidersQuery::default()).await {
            Ok(Value::Array(providers)) => {
                info!("Select one of the provider ids for {}", capability);
                for (i, provider) in providers.iter().enumerate() {
                    if let Some(id) = provider.get("id").and_then(Value::as_str) {
                        info!("  {}. {}", i + 1, id);
                    }
                }
            }
            Ok(_) => {}
            Err(e) => debug!("Could not list providers for {}: {}", capability, e),
        }
    }

    /// Poll `GET /operations/{id}` until the operation is done
    ///
    /// Polls run one at a time, each after a `poll_interval_ms` pause.
    pub async fn await_operation(&self, id: &str) -> Result<Value> {
        let delay = Duration::from_millis(self.options.poll_interval_ms);
        let mut attempts = 0u32;

        loop {
            if let Some(max) = self.options.max_poll_attempts {
                if attempts >= max {
                    return Err(IntentoError::PollingExhausted {
                        id: id.to_string(),
                        attempts,
                    });
                }
            }

            sleep(delay).await;
            attempts += 1;

            let result = self.operation(id).await?;
            let done = result.get("done").and_then(Value::as_bool).unwrap_or(false);
            debug!("Operation {} poll {}: done={}", id, attempts, done);
            if done {
                return Ok(result);
            }
        }
    }

    /// `GET /ai/{domain}/{slug}`, filtered server-side by `query`
    pub async fn providers(&self, capability: Capability, query: &ProvidersQuery) -> Result<Value> {
        self.make_request(RequestDescriptor::get(capability.path()).with_params(query.to_params()))
            .await
    }

    /// `GET /ai/{domain}/{slug}/{provider_id}`
    pub async fn provider(
        &self,
        capability: Capability,
        provider_id: &str,
        query: &ProvidersQuery,
    ) -> Result<Value> {
        let path = format!("{}/{}", capability.path(), urlencoding::encode(provider_id));
        self.make_request(RequestDescriptor::get(path).with_params(query.to_params()))
            .await
    }

    /// `GET /ai/{domain}/{slug}/languages`
    pub async fn languages(&self, capability: Capability, query: &LanguagesQuery) -> Result<Value> {
        let path = format!("{}/languages", capability.path());
        self.make_request(RequestDescriptor::get(path).with_params(query.to_params()))
            .await
    }

    /// `GET /ai/{domain}/{slug}/languages/{code}`
    pub async fn language(
        &self,
        capability: Capability,
        code: &str,
        query: &LanguagesQuery,
    ) -> Result<Value> {
        let path = format!("{}/languages/{}", capability.path(), urlencoding::encode(code));
        self.make_request(RequestDescriptor::get(path).with_params(query.to_params()))
            .await
    }

    /// Read (`None`) or update (`Some`) language settings of the API key
    pub async fn settings_languages(&self, settings: Option<Value>) -> Result<Value> {
        let request = match settings {
            Some(settings) => RequestDescriptor::post("/settings/languages").with_content(settings),
            None => RequestDescriptor::get("/settings/languages"),
        };
        self.make_request(request).await
    }

    /// `GET /settings/processing-rules`
    pub async fn processing_rules(&self) -> Result<Value> {
        self.make_request(RequestDescriptor::get("/settings/processing-rules"))
            .await
    }

    /// `GET /operations/{id}`
    pub async fn operation(&self, id: &str) -> Result<Value> {
        let path = format!("/operations/{}", urlencoding::encode(id));
        self.make_request(RequestDescriptor::get(path)).await
    }

    /// `POST /usage/{viewpoint}`
    pub async fn usage(&self, viewpoint: Viewpoint, params: &UsageParams) -> Result<Value> {
        let body = serde_json::to_value(normalize_usage(params))?;
        self.make_request(RequestDescriptor::post(viewpoint.path()).with_content(body))
            .await
    }

    /// `GET /delegated_credentials`
    pub async fn delegated_credentials(&self) -> Result<Value> {
        self.make_request(RequestDescriptor::get("/delegated_credentials"))
            .await
    }

    /// `POST /delegated_credentials`
    pub async fn add_delegated_credential(&self, credential: &NewDelegatedCredential) -> Result<Value> {
        let body = serde_json::to_value(credential)?;
        self.make_request(RequestDescriptor::post("/delegated_credentials").with_content(body))
            .await
    }

    /// `DELETE /delegated_credentials/{id}`
    pub async fn remove_delegated_credential(&self, credential_id: &str) -> Result<Value> {
        let path = format!("/delegated_credentials/{}", urlencoding::encode(credential_id));
        self.make_request(RequestDescriptor::delete(path)).await
    }
}

/// Operations bound to one capability
#[derive(Debug, Clone, Copy)]
pub struct CapabilityClient<'a> {
    client: &'a IntentoConnector,
    capability: Capability,
}

impl CapabilityClient<'_> {
    /// Capability this handle is bound to
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// See [`IntentoConnector::fulfill`]
    pub async fn fulfill(&self, params: FulfillParams) -> Result<Value> {
        self.client.fulfill(self.capability, params).await
    }

    /// See [`IntentoConnector::providers`]
    pub async fn providers(&self, query: &ProvidersQuery) -> Result<Value> {
        self.client.providers(self.capability, query).await
    }

    /// See [`IntentoConnector::provider`]
    pub async fn provider(&self, provider_id: &str, query: &ProvidersQuery) -> Result<Value> {
        self.client.provider(self.capability, provider_id, query).await
    }

    /// See [`IntentoConnector::languages`]
    pub async fn languages(&self, query: &LanguagesQuery) -> Result<Value> {
        self.client.languages(self.capability, query).await
    }

    /// See [`IntentoConnector::language`]
    pub async fn language(&self, code: &str, query: &LanguagesQuery) -> Result<Value> {
        self.client.language(self.capability, code, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{AuthSpec, DEFAULT_DICTIONARY_PROVIDER};
    use crate::core::transport::TransportResponse;
    use assert_json_diff::assert_json_eq;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Records requests and replays canned responses
    #[derive(Default)]
    struct RecordingTransport {
        calls: Mutex<Vec<TransportRequest>>,
        responses: Mutex<VecDeque<TransportResponse>>,
    }

    impl RecordingTransport {
        fn with_responses(responses: Vec<TransportResponse>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into()),
            })
        }

        fn calls(&self) -> Vec<TransportRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
            self.calls.lock().unwrap().push(request);
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| TransportResponse::new(200, "{}")))
        }
    }

    fn dry_run_client() -> (IntentoConnector, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let client =
            IntentoConnector::with_transport("test-key", ClientOptions::dry_run(), transport.clone());
        (client, transport)
    }

    fn live_client(responses: Vec<TransportResponse>) -> (IntentoConnector, Arc<RecordingTransport>) {
        let transport = RecordingTransport::with_responses(responses);
        let options = ClientOptions {
            poll_interval_ms: 10,
            ..Default::default()
        };
        let client = IntentoConnector::with_transport("test-key", options, transport.clone());
        (client, transport)
    }

    #[tokio::test]
    async fn test_missing_api_key_marks_client_unusable() {
        let transport = Arc::new(RecordingTransport::default());
        let client = IntentoConnector::with_transport("", ClientOptions::default(), transport.clone());

        assert!(!client.is_ready());
        assert_eq!(client.error(), Some("No Intento API key provided"));

        let err = client.processing_rules().await.unwrap_err();
        assert!(matches!(err, IntentoError::MissingApiKey));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_translate_body() {
        let (client, transport) = dry_run_client();
        let body = client
            .translate()
            .fulfill(FulfillParams::new("Hello").with_to("es"))
            .await
            .unwrap();

        assert_json_eq!(body, json!({"context": {"text": "Hello", "to": "es"}, "service": {}}));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_dictionary_default_provider() {
        let (client, _) = dry_run_client();
        let body = client
            .dictionary()
            .fulfill(FulfillParams::new("cat").with_from("en").with_to("es"))
            .await
            .unwrap();
        assert_eq!(body["service"]["provider"], json!([DEFAULT_DICTIONARY_PROVIDER]));
    }

    #[tokio::test]
    async fn test_sentiment_without_provider_fails_before_io() {
        let (client, transport) = dry_run_client();
        let err = client
            .sentiment()
            .fulfill(FulfillParams::new("I love it").with_lang("en"))
            .await
            .unwrap_err();

        assert!(matches!(err, IntentoError::ProviderRequired { .. }));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sentiment_error_does_not_send_fulfill() {
        let (client, transport) = live_client(vec![TransportResponse::new(200, "[]")]);
        let err = client
            .sentiment()
            .fulfill(FulfillParams::new("I love it"))
            .await
            .unwrap_err();
        assert!(matches!(err, IntentoError::ProviderRequired { .. }));
        assert!(transport
            .calls()
            .iter()
            .all(|call| call.method != reqwest::Method::POST));
    }

    #[test]
    fn test_sentiment_listing_finishes_before_error() {
        let (client, transport) = live_client(vec![TransportResponse::new(
            200,
            r#"[{"id": "ai.text.sentiment.ibm.natural_language_understanding"}]"#,
        )]);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let err = runtime
            .block_on(client.sentiment().fulfill(FulfillParams::new("I love it")))
            .unwrap_err();
        drop(runtime);

        assert!(matches!(err, IntentoError::ProviderRequired { .. }));
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, reqwest::Method::GET);
        assert!(calls[0].url.ends_with("/ai/text/sentiment"));
    }

    #[tokio::test]
    async fn test_sentiment_listing_skipped_without_key() {
        let transport = Arc::new(RecordingTransport::default());
        let client = IntentoConnector::with_transport("", ClientOptions::default(), transport.clone());
        let err = client
            .sentiment()
            .fulfill(FulfillParams::new("I love it"))
            .await
            .unwrap_err();
        assert!(matches!(err, IntentoError::ProviderRequired { .. }));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_own_keys_body() {
        let (client, _) = dry_run_client();
        let params = FulfillParams::default()
            .with_provider("some-provider")
            .with_auth(AuthSpec::from(r#"{"key":"value"}"#));

        let body = client.translate().fulfill(params).await.unwrap();
        assert_json_eq!(
            body,
            json!({
                "context": {},
                "service": {
                    "provider": ["some-provider"],
                    "auth": {"some-provider": [{"key": "value"}]}
                }
            })
        );
    }

    #[tokio::test]
    async fn test_own_keys_without_provider_fail() {
        let (client, _) = dry_run_client();
        let params = FulfillParams::default().with_auth(r#"{"key":"value"}"#);
        let err = client.translate().fulfill(params).await.unwrap_err();
        assert!(matches!(err, IntentoError::AmbiguousAuth { .. }));
    }

    #[tokio::test]
    async fn test_dry_run_paths() {
        let (client, transport) = dry_run_client();
        let provider_id = "ai.contentType.category.fake.provider";

        let providers = client
            .translate()
            .providers(&ProvidersQuery::default().with_to("es").with_bulk(true))
            .await
            .unwrap();
        assert_eq!(providers, json!("/ai/text/translate?to=es&bulk=true"));

        for capability in Capability::ALL {
            let path = client
                .provider(capability, provider_id, &ProvidersQuery::default())
                .await
                .unwrap();
            assert_eq!(path, json!(format!("{}/{}", capability.path(), provider_id)));
        }

        let filtered = client
            .translate()
            .provider("p1", &ProvidersQuery::default().with_from("en").with_to("es"))
            .await
            .unwrap();
        assert_eq!(filtered, json!("/ai/text/translate/p1?from=en&to=es"));

        let languages = client
            .capability(Capability::DetectIntent)
            .languages(&LanguagesQuery::default())
            .await
            .unwrap();
        assert_eq!(languages, json!("/ai/text/detect-intent/languages"));

        let language = client
            .translate()
            .language("ru", &LanguagesQuery::locale("de"))
            .await
            .unwrap();
        assert_eq!(language, json!("/ai/text/translate/languages/ru?locale=de"));

        assert_eq!(client.operation("op-1").await.unwrap(), json!("/operations/op-1"));
        assert_eq!(
            client.remove_delegated_credential("cred-1").await.unwrap(),
            json!("/delegated_credentials/cred-1")
        );
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_raw_data() {
        let (client, _) = dry_run_client();
        let result = client
            .make_request(RequestDescriptor::post("/ai/text/translate").with_data(r#"{"context":{"text":"x"}}"#))
            .await
            .unwrap();
        assert_eq!(result, json!({"context": {"text": "x"}}));

        let err = client
            .make_request(RequestDescriptor::post("/ai/text/translate").with_data("{"))
            .await
            .unwrap_err();
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn test_settings_method_follows_body() {
        let (client, transport) = live_client(vec![
            TransportResponse::new(200, r#"{"languages":{}}"#),
            TransportResponse::new(200, r#"{"languages":{"zh":"zh-Hant"}}"#),
        ]);
        client.settings_languages(None).await.unwrap();
        client
            .settings_languages(Some(json!({"languages": {"zh": "zh-Hant"}})))
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].method, reqwest::Method::GET);
        assert_eq!(calls[0].body, None);
        assert_eq!(calls[1].method, reqwest::Method::POST);
        assert_eq!(calls[1].body.as_deref(), Some(r#"{"languages":{"zh":"zh-Hant"}}"#));
    }

    #[tokio::test]
    async fn test_request_headers() {
        let (client, transport) = live_client(vec![]);
        client.processing_rules().await.unwrap();

        let call = &transport.calls()[0];
        assert_eq!(call.url, "https://api.inten.to/settings/processing-rules");
        let header = |name: &str| {
            call.headers
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(header("apikey").as_deref(), Some("test-key"));
        assert_eq!(header("content-type").as_deref(), Some("application/json"));
        assert!(header("User-Agent").unwrap().contains("intento-rust/"));
    }

    #[tokio::test]
    async fn test_await_async_polls_until_done() {
        let (client, transport) = live_client(vec![
            TransportResponse::new(200, r#"{"id":"op-42"}"#),
            TransportResponse::new(200, r#"{"id":"op-42","done":false,"response":null}"#),
            TransportResponse::new(
                200,
                r#"{"id":"op-42","done":true,"response":[{"results":["hola"]}]}"#,
            ),
        ]);

        let result = client
            .translate()
            .fulfill(
                FulfillParams::new("hello")
                    .with_to("es")
                    .with_provider("p1")
                    .with_async(true),
            )
            .await
            .unwrap();

        assert_eq!(result["done"], json!(true));
        assert_eq!(result["response"][0]["results"][0], json!("hola"));

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].body.as_deref().unwrap().contains(r#""async":true"#));
        assert!(calls[1].url.ends_with("/operations/op-42"));
        assert!(calls[2].url.ends_with("/operations/op-42"));
    }

    #[tokio::test]
    async fn test_async_without_await_returns_ack() {
        let (client, transport) = live_client(vec![TransportResponse::new(200, r#"{"id":"op-1"}"#)]);
        let ack = client
            .translate()
            .fulfill(FulfillParams::new("hello").with_to("es").with_async(false))
            .await
            .unwrap();
        assert_eq!(ack, json!({"id": "op-1"}));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_polling_respects_max_attempts() {
        let transport = RecordingTransport::with_responses(vec![
            TransportResponse::new(200, r#"{"id":"op-7","done":false}"#),
            TransportResponse::new(200, r#"{"id":"op-7","done":false}"#),
        ]);
        let options = ClientOptions {
            poll_interval_ms: 1,
            max_poll_attempts: Some(2),
            ..Default::default()
        };
        let client = IntentoConnector::with_transport("test-key", options, transport.clone());

        let err = client.await_operation("op-7").await.unwrap_err();
        assert!(matches!(err, IntentoError::PollingExhausted { attempts: 2, .. }));
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_api_error_is_surfaced() {
        let (client, _) = live_client(vec![TransportResponse::new(
            403,
            r#"{"error":{"code":403,"message":"Auth key is invalid"}}"#,
        )]);
        let err = client.delegated_credentials().await.unwrap_err();
        match err {
            IntentoError::Api { status, code, message, .. } => {
                assert_eq!(status, 403);
                assert_eq!(code, Some(403));
                assert_eq!(message, "Auth key is invalid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_usage_request() {
        let (client, transport) = live_client(vec![TransportResponse::new(200, r#"{"data":[]}"#)]);
        let params = UsageParams {
            from: Some(1_500_000_000),
            to: Some(1_500_003_600),
            ..Default::default()
        }
        .with_intent("ai.text.translate");
        client.usage(Viewpoint::Provider, &params).await.unwrap();

        let call = &transport.calls()[0];
        assert_eq!(call.method, reqwest::Method::POST);
        assert!(call.url.ends_with("/usage/provider"));
        let body: Value = serde_json::from_str(call.body.as_deref().unwrap()).unwrap();
        assert_json_eq!(
            body,
            json!({
                "range": {"from": 1_500_000_000i64, "to": 1_500_003_600i64},
                "filter": {"intent": ["ai.text.translate"]}
            })
        );
    }

    #[tokio::test]
    async fn test_add_delegated_credential() {
        let (client, transport) = live_client(vec![TransportResponse::new(200, r#"{"credential_id":"c1"}"#)]);
        let credential = NewDelegatedCredential {
            credential_id: "c1".to_string(),
            credential_type: "google_service_account".to_string(),
            secret_credentials: json!({"private_key": "..."}),
        };
        let result = client.add_delegated_credential(&credential).await.unwrap();
        assert_eq!(result["credential_id"], json!("c1"));

        let call = &transport.calls()[0];
        assert!(call.url.ends_with("/delegated_credentials"));
        assert!(call.body.as_deref().unwrap().starts_with(r#"{"credential_id":"c1""#));
    }
}
