// OAuth2 session
//
// Password-grant login against `oauth2/token`, plus transparent refresh
// of the access token once it expires. A `ClientAuth` is the session handle
// every other call borrows its access token from.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info};

use crate::client::NetatmoClient;
use crate::error::Error;

const TOKEN_PATH: &str = "oauth2/token";

/// Application and account credentials for the password grant.
///
/// `client_id` / `client_secret` are the app's API key and secret key.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub username: String,
    pub password: SecretString,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(alias = "expire_in")]
    expires_in: i64,
    #[serde(default)]
    scope: Option<Scope>,
}

/// The token endpoint reports the granted scope either as a list or as a
/// space-separated string depending on the grant.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scope {
    List(Vec<String>),
    Joined(String),
}

impl Scope {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::List(v) => v,
            Self::Joined(s) => s.split_whitespace().map(str::to_owned).collect(),
        }
    }
}

#[derive(Debug)]
struct Tokens {
    access: SecretString,
    refresh: SecretString,
    expires_at: DateTime<Utc>,
    scope: Vec<String>,
}

impl Tokens {
    fn from_response(resp: TokenResponse, requested_scope: &str) -> Result<Self, Error> {
        let expires_at = Duration::try_seconds(resp.expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| Error::Deserialization {
                message: format!("token lifetime out of range: {}s", resp.expires_in),
                body: String::new(),
            })?;
        let scope = resp.scope.map_or_else(
            || Scope::Joined(requested_scope.to_owned()).into_vec(),
            Scope::into_vec,
        );
        Ok(Self {
            access: SecretString::from(resp.access_token),
            refresh: SecretString::from(resp.refresh_token),
            expires_at,
            scope,
        })
    }
}

/// An authenticated session with the Netatmo API.
///
/// Cheap to share behind an `Arc`; token state sits behind a lock so
/// refreshes are visible to every holder.
pub struct ClientAuth {
    client: NetatmoClient,
    credentials: Credentials,
    tokens: RwLock<Tokens>,
}

impl std::fmt::Debug for ClientAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientAuth")
            .field("base_url", &self.client.base_url().as_str())
            .field("client_id", &self.credentials.client_id)
            .field("username", &self.credentials.username)
            .finish_non_exhaustive()
    }
}

impl ClientAuth {
    /// Log in with the password grant and the requested `scope`.
    ///
    /// `POST oauth2/token` with `grant_type=password`.
    pub async fn authenticate(
        client: NetatmoClient,
        credentials: Credentials,
        scope: &str,
    ) -> Result<Self, Error> {
        debug!(username = %credentials.username, "requesting access token");

        let resp: TokenResponse = client
            .post_form(
                TOKEN_PATH,
                &[
                    ("grant_type", "password"),
                    ("client_id", &credentials.client_id),
                    ("client_secret", credentials.client_secret.expose_secret()),
                    ("username", &credentials.username),
                    ("password", credentials.password.expose_secret()),
                    ("scope", scope),
                ],
            )
            .await?;

        let tokens = Tokens::from_response(resp, scope)?;
        info!(scope = ?tokens.scope, "authenticated with Netatmo API");

        Ok(Self {
            client,
            credentials,
            tokens: RwLock::new(tokens),
        })
    }

    /// The HTTP client this session talks through.
    pub fn client(&self) -> &NetatmoClient {
        &self.client
    }

    /// Scopes granted by the token endpoint.
    pub fn scope(&self) -> Vec<String> {
        self.read_tokens(|t| t.scope.clone())
    }

    /// When the current access token stops being valid.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.read_tokens(|t| t.expires_at)
    }

    /// A valid access token, refreshing it first if it has expired.
    pub async fn access_token(&self) -> Result<SecretString, Error> {
        let (token, expires_at) = self.read_tokens(|t| (t.access.clone(), t.expires_at));
        if Utc::now() < expires_at {
            return Ok(token);
        }
        self.refresh().await
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// `POST oauth2/token` with `grant_type=refresh_token`.
    pub async fn refresh(&self) -> Result<SecretString, Error> {
        debug!("access token expired, refreshing");
        let refresh = self.read_tokens(|t| t.refresh.clone());
        let previous_scope = self.scope().join(" ");

        let resp: TokenResponse = self
            .client
            .post_form(
                TOKEN_PATH,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh.expose_secret()),
                    ("client_id", &self.credentials.client_id),
                    (
                        "client_secret",
                        self.credentials.client_secret.expose_secret(),
                    ),
                ],
            )
            .await?;

        let tokens = Tokens::from_response(resp, &previous_scope)?;
        let access = tokens.access.clone();
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = tokens;
        Ok(access)
    }

    fn read_tokens<R>(&self, f: impl FnOnce(&Tokens) -> R) -> R {
        let guard = self.tokens.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}
