//! Authenticated API client with one-shot token refresh and retry

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::request::ApiRequest;
use crate::token::is_token_valid_at;
use crate::token_store::{SessionStore, TokenStore};
use crate::transport::{HttpRequest, ReqwestTransport, Transport};
use crate::types::{RefreshRequest, RefreshResponse};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Refresh endpoint (called without a bearer token)
pub const REFRESH_PATH: &str = "/refresh/token";

const API_KEY_HEADER: &str = "x-api-key";

/// Retries allowed after a successful refresh
const MAX_REFRESH_RETRIES: u32 = 1;

/// Why a refresh did not produce a new access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshFailure {
    /// Refresh endpoint answered non-2xx; the session was cleared
    Rejected { status: u16 },
    /// 2xx without an `accessToken`; the session was left as is
    MissingAccessToken,
    /// Transport failure or unreadable 2xx body; the session was left as is
    Unavailable,
}

/// Result of the refresh procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new access token was stored
    Refreshed,
    /// No refresh token stored, nothing was sent
    NoRefreshToken,
    Failed(RefreshFailure),
}

impl RefreshOutcome {
    /// True when a new access token was stored
    pub fn is_refreshed(&self) -> bool {
        matches!(self, RefreshOutcome::Refreshed)
    }
}

/// Client-side session validity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing stored, or the stored access token has expired
    NoSession,
    Authenticated,
}

/// API client that attaches the API key and bearer token to every call
///
/// On a 401 it refreshes the access token once and retries the call once.
/// Concurrent calls are not coordinated: each call that sees a 401 runs its
/// own refresh and the last write to storage wins. If the server only accepts
/// a refresh token once, the losing refresh is rejected and clears the session.
pub struct AuthenticatedHttpClient<S, T> {
    config: ClientConfig,
    tokens: TokenStore<S>,
    transport: T,
}

impl<S: SessionStore> AuthenticatedHttpClient<S, ReqwestTransport> {
    /// Create a client that talks to the network through reqwest
    pub fn connect(config: ClientConfig, store: S) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::new(config, store, transport))
    }
}

impl<S: SessionStore, T: Transport> AuthenticatedHttpClient<S, T> {
    /// Create a client over an explicit transport
    pub fn new(config: ClientConfig, store: S, transport: T) -> Self {
        Self {
            config,
            tokens: TokenStore::new(store),
            transport,
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session token storage
    pub fn tokens(&self) -> &TokenStore<S> {
        &self.tokens
    }

    /// Perform one logical API call and decode the JSON reply
    pub async fn call<R: DeserializeOwned>(&self, request: &ApiRequest) -> Result<R> {
        let mut retries = 0;

        let response = loop {
            let http_request = self.build_request(request)?;
            debug!(
                method = %request.method,
                path = %request.path,
                retry = retries,
                "Sending request"
            );

            let response = self.transport.send(http_request).await?;

            if response.status == StatusCode::UNAUTHORIZED
                && retries < MAX_REFRESH_RETRIES
                && !request.skip_auth
                && self.tokens.refresh_token().is_some()
                && self.refresh_session().await.is_refreshed()
            {
                retries += 1;
                continue;
            }

            break response;
        };

        if !response.status.is_success() {
            debug!(
                method = %request.method,
                path = %request.path,
                status = %response.status,
                "Request failed"
            );
            return Err(ClientError::http(response.status.as_u16(), response.body));
        }

        Ok(serde_json::from_str(&response.body)?)
    }

    /// Rotate the access token using the stored refresh token
    ///
    /// Never fails; the outcome says why nothing was refreshed. Only a rejected
    /// refresh clears the session. The refresh token itself is never replaced.
    pub async fn refresh_session(&self) -> RefreshOutcome {
        let Some(refresh_token) = self.tokens.refresh_token() else {
            debug!("No refresh token stored, skipping refresh");
            return RefreshOutcome::NoRefreshToken;
        };

        let request = ApiRequest::post(REFRESH_PATH)
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })
            .map(ApiRequest::skip_auth)
            .and_then(|request| self.build_request(&request));
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Could not build refresh request");
                return RefreshOutcome::Failed(RefreshFailure::Unavailable);
            }
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Token refresh request failed");
                return RefreshOutcome::Failed(RefreshFailure::Unavailable);
            }
        };

        if !response.status.is_success() {
            warn!(status = %response.status, "Refresh token rejected, clearing session");
            self.tokens.clear();
            return RefreshOutcome::Failed(RefreshFailure::Rejected {
                status: response.status.as_u16(),
            });
        }

        match serde_json::from_str::<RefreshResponse>(&response.body) {
            Ok(RefreshResponse {
                access_token: Some(access_token),
            }) if !access_token.is_empty() => {
                self.tokens.set_access_token(&access_token);
                info!("Access token refreshed successfully");
                RefreshOutcome::Refreshed
            }
            Ok(_) => {
                warn!("Refresh response carried no access token");
                RefreshOutcome::Failed(RefreshFailure::MissingAccessToken)
            }
            Err(e) => {
                warn!(error = %e, "Unreadable refresh response");
                RefreshOutcome::Failed(RefreshFailure::Unavailable)
            }
        }
    }

    /// Boolean form of [`refresh_session`](Self::refresh_session)
    pub async fn refresh_access_token(&self) -> bool {
        self.refresh_session().await.is_refreshed()
    }

    /// Current session validity; an expired stored token ends the session
    pub fn session_state(&self) -> SessionState {
        self.session_state_at(chrono::Utc::now().timestamp_millis())
    }

    /// [`session_state`](Self::session_state) against a given clock (ms since epoch)
    pub fn session_state_at(&self, now_ms: i64) -> SessionState {
        match self.tokens.access_token() {
            None => SessionState::NoSession,
            Some(token) if is_token_valid_at(&token, now_ms) => SessionState::Authenticated,
            Some(_) => {
                info!("Stored access token is expired or invalid, clearing session");
                self.tokens.clear();
                SessionState::NoSession
            }
        }
    }

    /// Drop the stored session
    pub fn logout(&self) {
        self.tokens.clear();
        info!("Logged out");
    }

    fn build_request(&self, request: &ApiRequest) -> Result<HttpRequest> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            header_value(API_KEY_HEADER, &self.config.api_key)?,
        );

        for (name, value) in &request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::Validation(format!("Invalid header name {name:?}: {e}")))?;
            headers.insert(header_name, header_value(name, value)?);
        }

        if !request.skip_auth {
            if let Some(token) = self.tokens.access_token() {
                let value = header_value("authorization", &format!("Bearer {token}"))?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        Ok(HttpRequest {
            method: request.method.clone(),
            url: self.config.url(&request.path),
            headers,
            body: request.body.clone(),
        })
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ClientError::Validation(format!("Invalid value for header {name}: {e}")))
}
