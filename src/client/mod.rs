//! Client layer: orchestrates transport calls and maps HTTP outcomes to domain errors.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::domain::{ApiErrorDetail, ApiVersion, Credentials, SendRequest, ValidationError};

#[cfg(test)]
pub(crate) mod fake;

/// Public SMSAlert host used when no base URL override is configured.
pub const DEFAULT_BASE_URL: &str = "https://smsalert.mobi";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum HttpBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HttpRequest {
    pub(crate) url: String,
    pub(crate) authorization: Option<String>,
    pub(crate) body: HttpBody,
    pub(crate) timeout: Duration,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

#[derive(Debug)]
pub(crate) enum HttpFailure {
    Timeout,
    Network(Box<dyn StdError + Send + Sync>),
}

pub(crate) trait HttpTransport: Send + Sync {
    fn post(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, HttpFailure>>;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub(crate) fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn post(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, HttpFailure>> {
        Box::pin(async move {
            let mut builder = self.client.post(&request.url).timeout(request.timeout);
            if let Some(authorization) = request.authorization {
                builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
            }
            builder = match request.body {
                HttpBody::Json(value) => builder.json(&value),
                HttpBody::Form(params) => builder.form(&params),
            };

            let response = builder.send().await.map_err(classify_reqwest_error)?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(classify_reqwest_error)?;
            Ok(HttpResponse { status, body })
        })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> HttpFailure {
    if err.is_timeout() {
        HttpFailure::Timeout
    } else {
        HttpFailure::Network(Box::new(err))
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmsAlertClient`].
///
/// There are exactly three kinds, ordered by specificity:
/// - [`SmsAlertError::Validation`]: caller input rejected before any I/O,
/// - [`SmsAlertError::Auth`]: SMSAlert rejected the credentials (HTTP 401/403),
/// - [`SmsAlertError::Send`]: everything else after the request left the process.
pub enum SmsAlertError {
    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// SMSAlert answered with HTTP 401 or 403.
    #[error("authentication failed")]
    Auth { status: u16, body: Option<String> },

    /// Timeout, network failure, or a non-auth HTTP failure.
    #[error("send failed: {0}")]
    Send(#[from] SendError),
}

impl SmsAlertError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Send(SendError::Timeout))
    }

    /// HTTP status of the failed response, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Send(SendError::HttpStatus { status, .. }) => {
                Some(*status)
            }
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Failure detail for [`SmsAlertError::Send`].
pub enum SendError {
    /// The request did not complete within the configured timeout.
    #[error("timeout calling SMSAlert API")]
    Timeout,

    /// DNS, TLS, connection reset and other transport failures.
    #[error("network error calling SMSAlert API: {0}")]
    Network(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status other than 401/403.
    #[error("HTTP {status}")]
    HttpStatus {
        status: u16,
        body: Option<String>,
        detail: ApiErrorDetail,
    },
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmsAlertClientBuilder::build`].
pub enum BuildError {
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[source] reqwest::Error),
}

#[derive(Debug, Clone)]
/// Builder for [`SmsAlertClient`].
///
/// Use this when you need to customize the base URL, API version, timeout, user-agent, or
/// to share an existing `reqwest::Client` owned by the embedding application.
pub struct SmsAlertClientBuilder {
    credentials: Credentials,
    base_url: String,
    api_version: ApiVersion,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    http_client: Option<reqwest::Client>,
}

impl SmsAlertClientBuilder {
    /// Create a builder with the default base URL and the v2 API.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_version: ApiVersion::default(),
            timeout: None,
            user_agent: None,
            http_client: None,
        }
    }

    /// Override the SMSAlert base URL (scheme + host, optional path prefix).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Select the API generation. Defaults to [`ApiVersion::V2`].
    pub fn api_version(mut self, api_version: ApiVersion) -> Self {
        self.api_version = api_version;
        self
    }

    /// Override the per-request timeout (defaults to [`ApiVersion::default_timeout`]).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    ///
    /// Ignored when a shared client is supplied through [`Self::http_client`].
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Borrow an existing connection pool instead of creating a new one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build a [`SmsAlertClient`].
    pub fn build(self) -> Result<SmsAlertClient, BuildError> {
        let endpoint = endpoint_url(&self.base_url, self.api_version)?;

        let client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                builder.build().map_err(BuildError::Http)?
            }
        };

        Ok(SmsAlertClient::from_parts(
            self.credentials,
            self.api_version,
            endpoint,
            self.timeout
                .unwrap_or_else(|| self.api_version.default_timeout()),
            Arc::new(ReqwestTransport::new(client)),
        ))
    }
}

/// Join a validated base URL with the send path of `api_version`.
pub(crate) fn endpoint_url(
    base_url: &str,
    api_version: ApiVersion,
) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidBaseUrl {
        input: base_url.to_owned(),
    };
    let parsed = Url::parse(base_url.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid());
    }

    let base = parsed.as_str().trim_end_matches('/');
    Ok(format!("{base}{}", api_version.path()))
}

#[derive(Clone)]
/// High-level SMSAlert client.
///
/// One call to [`SmsAlertClient::send`] is exactly one HTTP POST: no retries and no
/// idempotency key, so repeating a call sends the SMS again.
pub struct SmsAlertClient {
    credentials: Credentials,
    api_version: ApiVersion,
    endpoint: String,
    timeout: Duration,
    http: Arc<dyn HttpTransport>,
}

impl SmsAlertClient {
    /// Create a v2 client against the default base URL.
    ///
    /// For more customization, use [`SmsAlertClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        let api_version = ApiVersion::default();
        Self::from_parts(
            credentials,
            api_version,
            format!("{DEFAULT_BASE_URL}{}", api_version.path()),
            api_version.default_timeout(),
            Arc::new(ReqwestTransport::new(reqwest::Client::new())),
        )
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> SmsAlertClientBuilder {
        SmsAlertClientBuilder::new(credentials)
    }

    pub(crate) fn from_parts(
        credentials: Credentials,
        api_version: ApiVersion,
        endpoint: String,
        timeout: Duration,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            credentials,
            api_version,
            endpoint,
            timeout,
            http,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Full URL every send is posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validate loosely-typed inputs and send one SMS.
    ///
    /// Errors:
    /// - [`SmsAlertError::Validation`] for a blank phone number or empty message (no I/O),
    /// - [`SmsAlertError::Auth`] for HTTP 401/403,
    /// - [`SmsAlertError::Send`] for timeouts, network failures and other non-2xx statuses.
    pub async fn send_sms(
        &self,
        phone_number: &str,
        message: &str,
        cleanup_utf8: bool,
    ) -> Result<(), SmsAlertError> {
        let request = SendRequest::parse(phone_number, message, cleanup_utf8)?;
        self.send(&request).await
    }

    /// Send one already validated SMS.
    pub async fn send(&self, request: &SendRequest) -> Result<(), SmsAlertError> {
        let http_request = self.encode(request);

        let response = self.http.post(http_request).await.map_err(|failure| {
            let err = match failure {
                HttpFailure::Timeout => SendError::Timeout,
                HttpFailure::Network(source) => SendError::Network(source),
            };
            tracing::error!(endpoint = %self.endpoint, error = %err, "SMSAlert request failed");
            err
        })?;

        if (200..=299).contains(&response.status) {
            tracing::debug!(status = response.status, body = %response.body, "SMSAlert response");
            return Ok(());
        }

        tracing::error!(status = response.status, body = %response.body, "SMSAlert API error");

        let status = response.status;
        let body = if response.body.trim().is_empty() {
            None
        } else {
            Some(response.body)
        };

        if matches!(status, 401 | 403) {
            return Err(SmsAlertError::Auth { status, body });
        }

        let detail = match (self.api_version, body.as_deref()) {
            (ApiVersion::LegacyBulk, Some(raw)) => {
                crate::transport::decode_send_bulk_error_json(raw).unwrap_or_else(|err| {
                    tracing::debug!(error = %err, "SMSAlert error body is not JSON");
                    ApiErrorDetail::default()
                })
            }
            _ => ApiErrorDetail::default(),
        };
        if !detail.is_empty() {
            tracing::error!(
                status,
                message = detail.message.as_deref().unwrap_or_default(),
                error_code = detail.error_code.as_deref().unwrap_or_default(),
                "SMSAlert rejected the message"
            );
        }

        Err(SendError::HttpStatus {
            status,
            body,
            detail,
        }
        .into())
    }

    fn encode(&self, request: &SendRequest) -> HttpRequest {
        match self.api_version {
            ApiVersion::V2 => HttpRequest {
                url: self.endpoint.clone(),
                authorization: Some(crate::transport::encode_basic_auth(&self.credentials)),
                body: HttpBody::Json(crate::transport::encode_send_v2_json(request)),
                timeout: self.timeout,
            },
            ApiVersion::LegacyBulk => HttpRequest {
                url: self.endpoint.clone(),
                authorization: None,
                body: HttpBody::Form(crate::transport::encode_send_bulk_form(
                    &self.credentials,
                    request,
                )),
                timeout: self.timeout,
            },
        }
    }
}
