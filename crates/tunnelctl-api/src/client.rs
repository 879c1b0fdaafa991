// Hand-crafted async HTTP client for the tunnel control-plane API.
//
// Account-scoped tunnel endpoints live under `accounts/{account}/tunnels`,
// routing under `zones/{zone}/tunnels/{id}/routes`.
// Auth: `Authorization: Bearer <token>`

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::types::{self, Envelope};
use crate::{Error, TransportConfig};

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the control-plane API.
///
/// Tunnel calls are scoped to one account; route calls additionally
/// need a zone.
pub struct TunnelClient {
    http: reqwest::Client,
    base_url: Url,
    account_id: String,
    zone_id: Option<String>,
    /// Request timeout, reported when a call exceeds it.
    timeout: Duration,
}

impl TunnelClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API token and transport config.
    ///
    /// Injects `Authorization: Bearer …` as a default header on every request.
    pub fn from_token(
        base_url: &str,
        account_id: impl Into<String>,
        zone_id: Option<String>,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid API token header value: {e}"),
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self::from_reqwest(base_url, http, account_id, zone_id)?.with_timeout(transport.timeout))
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        account_id: impl Into<String>,
        zone_id: Option<String>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            account_id: account_id.into(),
            zone_id,
            timeout: TransportConfig::default().timeout,
        })
    }

    /// Record the timeout `http` was built with, for error reporting.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ensure the base URL ends with `/` so relative joins append.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    fn tunnels_path(&self) -> String {
        format!("accounts/{}/tunnels", self.account_id)
    }

    fn tunnel_path(&self, tunnel_id: &Uuid) -> String {
        format!("accounts/{}/tunnels/{tunnel_id}", self.account_id)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .http
            .get(url).query(params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url).json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self
            .http
            .put(url).json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_response(resp).await
    }

    async fn delete_with_params(&self, path: &str, params: &[(&str, String)]) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url} params={params:?}");

        let resp = self
            .http
            .delete(url).query(params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        let envelope: Envelope<T> = decode(&body)?;
        if !envelope.success {
            return Err(envelope_error(status.as_u16(), &envelope.errors));
        }
        envelope.result.ok_or_else(|| Error::Deserialization {
            message: "response envelope has no result".into(),
            body,
        })
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        if body.trim().is_empty() {
            return Ok(());
        }
        let envelope: Envelope<serde_json::Value> = decode(&body)?;
        if envelope.success {
            Ok(())
        } else {
            Err(envelope_error(status.as_u16(), &envelope.errors))
        }
    }

    /// Timeouts carry the configured limit; everything else stays a
    /// transport error.
    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Error::RateLimited { retry_after_secs };
        }

        let raw = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<Envelope<serde_json::Value>>(&raw).ok();
        let message = parsed
            .as_ref()
            .and_then(|env| env.errors.first())
            .map(|e| e.message.clone())
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.clone()
                }
            });

        if matches!(
            status,
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN
        ) {
            return Error::Authentication { message };
        }

        Error::Api {
            message,
            code: parsed.and_then(|env| env.errors.first().and_then(|e| e.code)),
            status: status.as_u16(),
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Tunnels ──────────────────────────────────────────────────────

    pub async fn create_tunnel(
        &self,
        request: &types::CreateTunnelRequest,
    ) -> Result<types::TunnelResponse, Error> {
        self.post(&self.tunnels_path(), request).await
    }

    /// List tunnels. `params` are the filter's query pairs, passed through verbatim.
    pub async fn list_tunnels(
        &self,
        params: &[(&str, String)],
    ) -> Result<Vec<types::TunnelResponse>, Error> {
        self.get_with_params(&self.tunnels_path(), params).await
    }

    pub async fn delete_tunnel(&self, tunnel_id: &Uuid) -> Result<(), Error> {
        self.delete_with_params(&self.tunnel_path(tunnel_id), &[])
            .await
    }

    // ── Connections ──────────────────────────────────────────────────

    pub async fn list_active_clients(
        &self,
        tunnel_id: &Uuid,
    ) -> Result<Vec<types::ActiveClientResponse>, Error> {
        self.get_with_params(&format!("{}/connections", self.tunnel_path(tunnel_id)), &[])
            .await
    }

    /// Delete stale connections, optionally only those of one connector.
    pub async fn cleanup_connections(
        &self,
        tunnel_id: &Uuid,
        client_id: Option<&Uuid>,
    ) -> Result<(), Error> {
        let params: Vec<(&str, String)> = client_id
            .map(|id| vec![("client_id", id.to_string())])
            .unwrap_or_default();
        self.delete_with_params(
            &format!("{}/connections", self.tunnel_path(tunnel_id)),
            &params,
        )
        .await
    }

    // ── Routes ───────────────────────────────────────────────────────

    pub async fn route_tunnel(
        &self,
        tunnel_id: &Uuid,
        route: &types::RouteRequest,
    ) -> Result<types::RouteResultResponse, Error> {
        let zone = self.zone_id.as_deref().ok_or(Error::MissingZone)?;
        self.put(&format!("zones/{zone}/tunnels/{tunnel_id}/routes"), route)
            .await
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

fn envelope_error(status: u16, errors: &[types::ApiMessage]) -> Error {
    let first = errors.first();
    Error::Api {
        message: first.map_or_else(|| "request was not successful".into(), |e| e.message.clone()),
        code: first.and_then(|e| e.code),
        status,
    }
}
