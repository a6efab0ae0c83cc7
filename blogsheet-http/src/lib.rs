//! Small reqwest wrapper shared by the Sheets client, the OAuth token
//! exchange and the webhook notifier.
//!
//! Every request is sent once; there is no retry loop. Each request gets a
//! short id that ties its log events together. Bearer tokens and secret
//! query/form values never reach the logs. Set `BLOGSHEET_HTTP_RAW=1` to
//! also log (redacted) request and response bodies.
//!
//! ```no_run
//! # async fn demo() -> Result<(), blogsheet_http::HttpError> {
//! use blogsheet_http::{HttpClient, RequestOpts};
//!
//! let sheets = HttpClient::new("https://sheets.googleapis.com/")?;
//! let meta: serde_json::Value = sheets
//!     .get_json(
//!         "v4/spreadsheets/abc",
//!         RequestOpts { bearer: Some("ya29.token"), ..Default::default() },
//!     )
//!     .await?;
//! # Ok(()) }
//! ```

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

const RAW_ENV: &str = "BLOGSHEET_HTTP_RAW";
const SNIPPET_LEN: usize = 500;
const RAW_BODY_LEN: usize = 16 * 1024;

/// Query and form keys whose values are never logged.
const SECRET_KEYS: &[&str] = &[
    "access_token",
    "api_key",
    "assertion",
    "client_secret",
    "key",
    "refresh_token",
    "token",
];

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("cannot build request: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("cannot decode response: {message} (body: {snippet})")]
    Decode { message: String, snippet: String },
    #[error("HTTP {status}: {message} (request {request_id})")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    /// Status code of an `Api` error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Per-request settings.
///
/// ```
/// use blogsheet_http::RequestOpts;
///
/// let opts = RequestOpts {
///     bearer: Some("ya29.token"),
///     query: vec![("valueInputOption", "RAW")],
///     ..Default::default()
/// };
/// assert!(opts.timeout.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOpts<'a> {
    /// Sent as `Authorization: Bearer <token>`.
    pub bearer: Option<&'a str>,
    pub query: Vec<(&'a str, &'a str)>,
    /// Overrides the client's default timeout.
    pub timeout: Option<Duration>,
}

enum Payload<'a> {
    Empty,
    Json(Vec<u8>),
    Form(&'a [(&'a str, &'a str)]),
}

impl Payload<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "none",
            Self::Json(_) => "json",
            Self::Form(_) => "form",
        }
    }

    /// Body text for raw logging, with secret form fields masked.
    fn redacted(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Json(bytes) => snip(bytes, RAW_BODY_LEN),
            Self::Form(pairs) => pairs
                .iter()
                .map(|(k, v)| format!("{k}={}", mask(k, v)))
                .collect::<Vec<_>>()
                .join("&"),
        }
    }
}

/// HTTP client anchored at a base URL; request paths are joined onto it.
#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// ```
    /// let hook = blogsheet_http::HttpClient::new("https://hooks.example.com/done").unwrap();
    /// assert_eq!(hook.base().path(), "/done");
    /// assert!(blogsheet_http::HttpClient::new("not a url").is_err());
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(format!("{base}: {e}")))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let reply = self.send(Method::GET, path, Payload::Empty, opts).await?;
        reply.json()
    }

    /// POST a JSON body and decode a JSON reply.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let reply = self.send(Method::POST, path, json_payload(body)?, opts).await?;
        reply.json()
    }

    /// POST a JSON body and return the reply as text, whatever its content type.
    pub async fn post_json_text<B>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<String, HttpError>
    where
        B: Serialize + ?Sized,
    {
        let reply = self.send(Method::POST, path, json_payload(body)?, opts).await?;
        Ok(String::from_utf8_lossy(&reply.body).into_owned())
    }

    /// POST `application/x-www-form-urlencoded` fields and decode a JSON reply.
    pub async fn post_form<T>(
        &self,
        path: &str,
        form: &[(&str, &str)],
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let reply = self.send(Method::POST, path, Payload::Form(form), opts).await?;
        reply.json()
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Payload<'_>,
        opts: RequestOpts<'_>,
    ) -> Result<Reply, HttpError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| HttpError::Url(format!("{path}: {e}")))?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let req_id = format!("r{}", &uuid::Uuid::new_v4().simple().to_string()[..12]);

        let mut request = self
            .inner
            .request(method.clone(), url.clone())
            .timeout(timeout);
        if !opts.query.is_empty() {
            request = request.query(&opts.query);
        }
        if let Some(token) = opts.bearer {
            request = request.bearer_auth(clean_token(token)?);
        }
        request = match &payload {
            Payload::Empty => request,
            Payload::Json(bytes) => request
                .header(CONTENT_TYPE, "application/json")
                .body(bytes.clone()),
            Payload::Form(pairs) => request.form(pairs),
        };

        tracing::debug!(
            target: "http.request.start",
            req_id = %req_id,
            %method,
            url = %loggable_url(&url, &opts.query),
            body = payload.kind(),
            bearer = opts.bearer.is_some(),
            timeout_ms = timeout.as_millis() as u64,
            "sending"
        );
        if raw_logging() {
            tracing::debug!(
                target: "http.raw",
                req_id = %req_id,
                body = %payload.redacted(),
                "request body"
            );
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|e| network_error(&req_id, e))?;
        let status = response.status();
        let remote_id = response
            .headers()
            .get("x-request-id")
            .or_else(|| response.headers().get("x-goog-request-id"))
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(|e| network_error(&req_id, e))?.to_vec();

        tracing::debug!(
            target: "http.request.done",
            req_id = %req_id,
            %status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = body.len(),
            "received"
        );
        if raw_logging() {
            tracing::debug!(
                target: "http.raw",
                req_id = %req_id,
                body = %snip(&body, RAW_BODY_LEN),
                "response body"
            );
        }

        if status.is_success() {
            return Ok(Reply { req_id, body });
        }
        let message = error_message(&body);
        tracing::warn!(
            target: "http.request.failed",
            req_id = %req_id,
            %status,
            %message,
            "server rejected request"
        );
        Err(HttpError::Api {
            status,
            message,
            request_id: remote_id.unwrap_or(req_id),
        })
    }
}

struct Reply {
    req_id: String,
    body: Vec<u8>,
}

impl Reply {
    fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            let snippet = snip(&self.body, SNIPPET_LEN);
            tracing::warn!(
                target: "http.request.failed",
                req_id = %self.req_id,
                error = %e,
                "undecodable reply"
            );
            HttpError::Decode {
                message: e.to_string(),
                snippet,
            }
        })
    }
}

fn json_payload<B: Serialize + ?Sized>(body: &B) -> Result<Payload<'static>, HttpError> {
    serde_json::to_vec(body)
        .map(Payload::Json)
        .map_err(|e| HttpError::Build(format!("cannot serialize body: {e}")))
}

fn network_error(req_id: &str, e: reqwest::Error) -> HttpError {
    let message = if e.is_timeout() {
        format!("timed out: {e}")
    } else {
        e.to_string()
    };
    tracing::warn!(target: "http.request.failed", req_id, %message, "network failure");
    HttpError::Network(message)
}

fn raw_logging() -> bool {
    matches!(
        std::env::var(RAW_ENV).as_deref(),
        Ok("1" | "true" | "yes")
    )
}

fn mask<'a>(key: &str, value: &'a str) -> &'a str {
    if SECRET_KEYS.iter().any(|s| s.eq_ignore_ascii_case(key)) {
        "<redacted>"
    } else {
        value
    }
}

/// Host and path plus query, with secret values masked.
fn loggable_url(url: &Url, query: &[(&str, &str)]) -> String {
    let mut out = format!("{}{}", url.host_str().unwrap_or("-"), url.path());
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .chain(query.iter().map(|(k, v)| (k.to_string(), v.to_string())))
        .collect();
    for (i, (k, v)) in pairs.iter().enumerate() {
        out.push(if i == 0 { '?' } else { '&' });
        out.push_str(&format!("{k}={}", mask(k, v)));
    }
    out
}

/// Strip quotes and whitespace pasted around a token, and reject bytes a header cannot carry.
fn clean_token(raw: &str) -> Result<String, HttpError> {
    let token: String = raw
        .trim()
        .trim_matches(['"', '\''])
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| HttpError::Build("bearer token contains invalid characters".into()))?;
    if !token.is_ascii() {
        return Err(HttpError::Build("bearer token contains invalid characters".into()));
    }
    Ok(token)
}

/// Best human-readable message in an error body.
fn error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorBody {
        // {"error":{"code":403,"message":"...","status":"PERMISSION_DENIED"}}
        Google { error: GoogleError },
        // {"error":"invalid_grant","error_description":"..."}
        OAuth {
            error: String,
            #[serde(default)]
            error_description: Option<String>,
        },
        Plain { message: String },
    }
    #[derive(Deserialize)]
    struct GoogleError {
        message: String,
    }

    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody::Google { error }) => error.message,
        Ok(ErrorBody::OAuth {
            error,
            error_description: Some(description),
        }) if !description.is_empty() => format!("{error}: {description}"),
        Ok(ErrorBody::OAuth { error, .. }) => error,
        Ok(ErrorBody::Plain { message }) => message,
        Err(_) => snip(body, SNIPPET_LEN),
    }
}

fn snip(body: &[u8], max: usize) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= max {
        return text.into_owned();
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &text[..cut])
}
