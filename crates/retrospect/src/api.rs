//! The backend API client.
//!
//! The client is built from zero-argument accessor closures rather than
//! captured values: the base URL and auth token sources are consulted on
//! every request, so runtime config arriving after construction (it is
//! fetched through this very client) never requires rebuilding the client.

use std::rc::Rc;

use gloo_net::http::{Request, Response};

use crate::data::{Config, Session};
use crate::id::SessionId;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Internal Server Error")]
    InternalServerError,
    #[error("Unauthorized Access")]
    UnauthorizedAccess,
    #[error("Forbidden Access")]
    ForbiddenAccess,
    #[error("Network error: {0}")]
    NetworkError(gloo_net::Error),
    #[error("Parse error: {0}")]
    ParseError(gloo_net::Error),
    #[error("Unexpected response status code: {0}")]
    UnexpectedStatusCode(u16),
}

pub type ApiResult<T> = Result<T, ApiError>;

// Reusable response handling functions
async fn handle_response_status(response: Response, endpoint: &str) -> ApiResult<Response> {
    match response.status() {
        200..=299 => Ok(response),
        400 => Err(ApiError::BadRequest(format!("Bad request to {}", endpoint))),
        401 => Err(ApiError::UnauthorizedAccess),
        403 => Err(ApiError::ForbiddenAccess),
        404 => Err(ApiError::NotFound(format!("{} not found", endpoint))),
        500..=599 => Err(ApiError::InternalServerError),
        status => Err(ApiError::UnexpectedStatusCode(status)),
    }
}

async fn parse_json_response<T>(response: Response) -> ApiResult<T>
where
    T: serde::de::DeserializeOwned,
{
    response.json::<T>().await.map_err(ApiError::ParseError)
}

// Combined function for the common pattern
async fn handle_json_response<T>(response: Response, endpoint: &str) -> ApiResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let validated_response = handle_response_status(response, endpoint).await?;
    parse_json_response(validated_response).await
}

/// The backend surface the store's api handler group talks to.
///
/// A trait seam so tests and previews can substitute a canned backend.
#[async_trait::async_trait(?Send)]
pub trait RetroApi {
    async fn fetch_config(&self) -> ApiResult<Config>;
    async fn fetch_session(&self, id: &SessionId) -> ApiResult<Session>;
}

/// HTTP client for the Retrospect backend.
pub struct RetroClient {
    base_url: Rc<dyn Fn() -> String>,
    auth_token: Rc<dyn Fn() -> Option<String>>,
    not_found: Rc<dyn Fn()>,
}

impl RetroClient {
    /// Builds a client from its three accessors.
    ///
    /// `not_found` fires when the server is unreachable at the network
    /// level; it decouples the client from whatever the UI does with that
    /// fact (the bootstrap wires it to an `ApiServerNotFound` dispatch).
    pub fn new(
        base_url: impl Fn() -> String + 'static,
        auth_token: impl Fn() -> Option<String> + 'static,
        not_found: impl Fn() + 'static,
    ) -> Self {
        Self {
            base_url: Rc::new(base_url),
            auth_token: Rc::new(auth_token),
            not_found: Rc::new(not_found),
        }
    }

    async fn get<T>(&self, endpoint: &str) -> ApiResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", (self.base_url)(), endpoint);

        let mut request = Request::get(&url);
        if let Some(token) = (self.auth_token)() {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                // Server unreachable, not an HTTP-level failure
                (self.not_found)();
                return Err(ApiError::NetworkError(err));
            }
        };

        handle_json_response(response, endpoint).await
    }
}

#[async_trait::async_trait(?Send)]
impl RetroApi for RetroClient {
    async fn fetch_config(&self) -> ApiResult<Config> {
        self.get("/config").await
    }

    async fn fetch_session(&self, id: &SessionId) -> ApiResult<Session> {
        self.get(&format!("/sessions/{}", id)).await
    }
}
