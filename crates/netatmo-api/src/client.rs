// Netatmo API HTTP client
//
// Wraps `reqwest::Client` with base-URL handling, form-encoded POSTs and
// unwrapping of the `{ status, body }` envelope. Endpoint calls live next
// to the types they produce (auth.rs, home_data.rs) so this module stays
// focused on transport mechanics.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.netatmo.com/";

// ── Response shapes ──────────────────────────────────────────────────

/// Standard API envelope: `{"status": "ok", "body": {...}, "time_server": N}`.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    status: String,
    body: T,
}

/// Error bodies come in two shapes: the API's
/// `{"error": {"code": 2, "message": "Invalid access_token"}}` and the
/// OAuth endpoint's `{"error": "invalid_grant", "error_description": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Api { code: i64, message: String },
    OAuth(String),
}

/// API error codes that mean the access token itself is the problem
/// (missing, invalid, expired).
const TOKEN_ERROR_CODES: [i64; 3] = [1, 2, 3];

// ── Client ───────────────────────────────────────────────────────────

/// Raw HTTP client for the Netatmo API.
///
/// All requests are `POST` with form-encoded parameters. Responses from
/// `api/*` endpoints are unwrapped from their envelope before the caller
/// sees them.
#[derive(Debug, Clone)]
pub struct NetatmoClient {
    http: reqwest::Client,
    base_url: Url,
}

impl NetatmoClient {
    /// Create a client for `base_url` from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    /// The API root every endpoint path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// POST form parameters and decode the whole JSON response as `T`.
    ///
    /// Used by the OAuth endpoint, which has no envelope.
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let body = self.send(path, params).await?;
        decode(&body)
    }

    /// POST form parameters to an `api/*` endpoint and return the
    /// envelope's `body`.
    pub(crate) async fn post_api<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let body = self.send(path, params).await?;

        // Some failures come back as HTTP 200 with an error object.
        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&body) {
            return Err(err.into());
        }

        let envelope: ApiResponse<T> = decode(&body)?;
        match envelope.status.as_str() {
            "ok" => Ok(envelope.body),
            other => Err(Error::Api {
                code: 0,
                message: format!("unexpected status {other:?}"),
            }),
        }
    }

    async fn send(&self, path: &str, params: &[(&str, &str)]) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);

        let resp = self.http.post(url).form(params).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        trace!(%status, len = body.len(), "response received");

        if status.is_success() {
            return Ok(body);
        }

        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => Err(err.into()),
            Err(_) => Err(Error::Http {
                status: status.as_u16(),
                body: preview(&body).to_owned(),
            }),
        }
    }
}

impl From<ErrorResponse> for Error {
    fn from(resp: ErrorResponse) -> Self {
        match resp.error {
            ErrorDetail::Api { code, message } if TOKEN_ERROR_CODES.contains(&code) => {
                Error::Authentication { message }
            }
            ErrorDetail::Api { code, message } => Error::Api { code, message },
            ErrorDetail::OAuth(kind) => Error::Authentication {
                message: resp
                    .error_description
                    .map_or_else(|| kind.clone(), |desc| format!("{kind}: {desc}")),
            },
        }
    }
}

/// Joining relative paths only works when the base path ends in `/`.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
