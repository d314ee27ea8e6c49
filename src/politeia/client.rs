//! HTTP client for a politeiawww server
//!
//! Handles the version handshake (CSRF token + session cookie), status
//! decoding and structured error replies.

use super::error_codes::ErrorReply;
use super::types::*;
use super::RemoteGateway;
use crate::config::PoliteiaConfig;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const API_PATH: &str = "/api/v1";
const VERSION_PATH: &str = "/version";
const POLICY_PATH: &str = "/policy";
const TOKEN_INVENTORY_PATH: &str = "/proposals/tokeninventory";
const BATCH_PROPOSALS_PATH: &str = "/proposals/batch";
const BATCH_VOTE_SUMMARY_PATH: &str = "/proposals/batchvotesummary";

pub const CSRF_TOKEN_HEADER: &str = "X-CSRF-TOKEN";
pub const SESSION_COOKIE_NAME: &str = "_gorilla_csrf";

/// Anti-forgery credentials issued by the version route.
#[derive(Debug, Clone)]
struct CsrfSession {
    token: String,
    /// `name=value` of the session cookie, when the server set one
    cookie: Option<String>,
}

/// politeiawww client (one per session)
pub struct PoliteiaClient {
    base_url: String,
    http: Client,
    session: RwLock<Option<CsrfSession>>,
}

impl PoliteiaClient {
    /// Create a client; the request timeout is fixed for its lifetime.
    pub fn new(config: &PoliteiaConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            session: RwLock::new(None),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PATH, path)
    }

    /// Whether the version handshake has produced a CSRF token.
    pub async fn has_session(&self) -> bool {
        self.session.read().await.is_some()
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = self.api_url(path);
        debug!("GET {}", url);

        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| request_error(path, e))?;

        handle_response(path, resp).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let session = self
            .session
            .read()
            .await
            .clone()
            .ok_or(AppError::HandshakeRequired)?;

        let url = self.api_url(path);
        debug!("POST {}", url);

        let mut req = self
            .http
            .post(&url)
            .header(CSRF_TOKEN_HEADER, &session.token)
            .json(body);
        if let Some(cookie) = &session.cookie {
            req = req.header(header::COOKIE, cookie);
        }

        let resp = req.send().await.map_err(|e| request_error(path, e))?;
        handle_response(path, resp).await
    }
}

fn request_error(path: &str, e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::RemoteUnavailable(format!("request to {} timed out", path))
    } else {
        AppError::RemoteUnavailable(format!("error requesting {}: {}", path, e))
    }
}

async fn handle_response<T: DeserializeOwned>(path: &str, resp: Response) -> Result<T, AppError> {
    let status = resp.status().as_u16();
    let body = resp.bytes().await.map_err(|e| {
        AppError::RemoteUnavailable(format!("error reading {} response body: {}", path, e))
    })?;
    decode_response(path, status, &body)
}

/// Map a finished exchange onto a typed reply or error.
fn decode_response<T: DeserializeOwned>(path: &str, status: u16, body: &[u8]) -> Result<T, AppError> {
    match status {
        200 => serde_json::from_slice(body).map_err(|e| {
            AppError::MalformedResponse(format!("error decoding {} response: {}", path, e))
        }),
        404 => Err(AppError::NotFound(format!("resource not found: {}", path))),
        400 | 500 => match serde_json::from_slice::<ErrorReply>(body) {
            Ok(reply) => Err(AppError::Server {
                http_status: status,
                code: reply.code,
                context: reply.context,
            }),
            Err(_) => Err(AppError::RemoteUnavailable(format!(
                "{} failed with HTTP {}",
                path, status
            ))),
        },
        other => Err(AppError::RemoteUnavailable(format!(
            "{} failed with unexpected HTTP {}",
            path, other
        ))),
    }
}

#[async_trait]
impl RemoteGateway for PoliteiaClient {
    async fn fetch_version(&self) -> Result<ServerVersion, AppError> {
        let url = self.api_url(VERSION_PATH);
        debug!("GET {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| request_error(VERSION_PATH, e))?;

        let csrf_token = resp
            .headers()
            .get(CSRF_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let cookie = resp
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE_NAME)
            .map(|c| format!("{}={}", c.name(), c.value()));

        let version: ServerVersion = handle_response(VERSION_PATH, resp).await?;

        // Without the token every batch POST would be refused
        let token = csrf_token.ok_or_else(|| {
            warn!("Version reply carried no {} header", CSRF_TOKEN_HEADER);
            AppError::MalformedResponse(format!(
                "{} reply carried no {} header",
                VERSION_PATH, CSRF_TOKEN_HEADER
            ))
        })?;
        *self.session.write().await = Some(CsrfSession { token, cookie });
        info!("Politeia session established (API v{})", version.version);

        Ok(version)
    }

    async fn fetch_policy(&self) -> Result<ServerPolicy, AppError> {
        self.get(POLICY_PATH, &[]).await
    }

    async fn fetch_inventory(&self) -> Result<TokenInventory, AppError> {
        self.get(TOKEN_INVENTORY_PATH, &[]).await
    }

    async fn fetch_proposal_batch(&self, tokens: &[String]) -> Result<Vec<Proposal>, AppError> {
        let reply: ProposalsReply = self
            .post(BATCH_PROPOSALS_PATH, &BatchTokensRequest { tokens })
            .await?;
        Ok(reply.proposals)
    }

    async fn fetch_vote_summary_batch(
        &self,
        tokens: &[String],
    ) -> Result<BatchVoteSummaryReply, AppError> {
        self.post(BATCH_VOTE_SUMMARY_PATH, &BatchTokensRequest { tokens })
            .await
    }

    async fn fetch_proposal_details(
        &self,
        token: &str,
        version: Option<&str>,
    ) -> Result<Proposal, AppError> {
        let path = format!("/proposals/{}", token);
        let query: Vec<(&str, &str)> = version.map(|v| vec![("version", v)]).unwrap_or_default();
        let reply: ProposalDetailsReply = self.get(&path, &query).await?;
        Ok(reply.proposal)
    }

    async fn fetch_comments(&self, token: &str) -> Result<CommentsReply, AppError> {
        self.get(&format!("/proposals/{}/comments", token), &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::politeia::ErrorStatusCode;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::time::Duration;

    fn test_client() -> PoliteiaClient {
        PoliteiaClient::new(&PoliteiaConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            timeout: Duration::from_millis(200),
        })
        .unwrap()
    }

    #[test]
    fn test_api_url_strips_trailing_slash() {
        let client = test_client();
        assert_eq!(
            client.api_url(TOKEN_INVENTORY_PATH),
            "http://127.0.0.1:9/api/v1/proposals/tokeninventory"
        );
    }

    #[tokio::test]
    async fn test_post_before_version_fails_locally() {
        let client = test_client();
        assert!(!client.has_session().await);

        let err = client
            .fetch_proposal_batch(&["abc".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::HandshakeRequired));

        let err = client
            .fetch_vote_summary_batch(&["abc".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::HandshakeRequired));
    }

    #[test]
    fn test_decode_ok_body() {
        let inv: TokenInventory =
            decode_response(TOKEN_INVENTORY_PATH, 200, br#"{"active":["a"]}"#).unwrap();
        assert_eq!(inv.active, vec!["a".to_string()]);
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode_response::<TokenInventory>(TOKEN_INVENTORY_PATH, 200, b"<html>")
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_decode_structured_server_error() {
        let err = decode_response::<ProposalsReply>(
            BATCH_PROPOSALS_PATH,
            400,
            br#"{"errorcode":57,"errorcontext":["zz"]}"#,
        )
        .unwrap_err();
        match err {
            AppError::Server { http_status, code, context } => {
                assert_eq!(http_status, 400);
                assert_eq!(code, ErrorStatusCode::INVALID_CENSORSHIP_TOKEN);
                assert_eq!(context, vec!["zz".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_unstructured_failures() {
        let err = decode_response::<ServerPolicy>(POLICY_PATH, 500, b"oops").unwrap_err();
        assert!(matches!(err, AppError::RemoteUnavailable(_)));

        let err = decode_response::<ServerPolicy>(POLICY_PATH, 404, b"").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = decode_response::<ServerPolicy>(POLICY_PATH, 503, b"").unwrap_err();
        assert!(matches!(err, AppError::RemoteUnavailable(_)));
    }

    /// Serve `router` on an ephemeral local port; returns its base URL.
    async fn serve(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> PoliteiaClient {
        PoliteiaClient::new(&PoliteiaConfig {
            base_url,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    async fn version_reply() -> Json<Value> {
        Json(json!({"version": 1, "route": "/v1", "testnet": true}))
    }

    #[tokio::test]
    async fn test_version_without_csrf_header_is_rejected() {
        let base_url = serve(Router::new().route("/api/v1/version", get(version_reply))).await;
        let client = client_for(base_url);

        let err = client.fetch_version().await.unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
        assert!(!client.has_session().await);
    }

    #[tokio::test]
    async fn test_handshake_credentials_sent_on_batch_posts() {
        let router = Router::new()
            .route(
                "/api/v1/version",
                get(|| async {
                    (
                        [
                            (CSRF_TOKEN_HEADER, "csrf-123"),
                            ("set-cookie", "_gorilla_csrf=cookie-456; Path=/"),
                        ],
                        version_reply().await,
                    )
                }),
            )
            .route(
                "/api/v1/proposals/batch",
                post(|headers: HeaderMap| async move {
                    let token = headers.get(CSRF_TOKEN_HEADER).and_then(|v| v.to_str().ok());
                    let cookie = headers.get("cookie").and_then(|v| v.to_str().ok());
                    if token == Some("csrf-123") && cookie == Some("_gorilla_csrf=cookie-456") {
                        (StatusCode::OK, Json(json!({"proposals": null})))
                    } else {
                        (StatusCode::FORBIDDEN, Json(json!({})))
                    }
                }),
            );
        let client = client_for(serve(router).await);

        let version = client.fetch_version().await.unwrap();
        assert!(version.test_net);
        assert!(client.has_session().await);

        let proposals = client
            .fetch_proposal_batch(&["abc".to_string()])
            .await
            .unwrap();
        assert!(proposals.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_remote_unavailable() {
        let client = test_client();
        let err = client.fetch_inventory().await.unwrap_err();
        assert!(matches!(err, AppError::RemoteUnavailable(_)));
    }
}
