use crate::app::{Application, Authentication, Connection};
use crate::context::{CancelToken, Scope};
use crate::framework::{FrameworkError, HttpError};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use tracing::{debug, warn};
use url::Url;

/// Request decoration applied to every outgoing request.
#[derive(Clone)]
enum Authorizer {
    Anonymous,
    Bearer(String),
}

impl Authorizer {
    fn from_authentication(authentication: &Authentication) -> Result<Self, FrameworkError> {
        match authentication {
            Authentication::None => Ok(Authorizer::Anonymous),
            Authentication::Bearer { token } => Ok(Authorizer::Bearer(token.clone())),
            Authentication::Interactive => Err(FrameworkError::UnsupportedAuthentication(
                "interactive login is not supported by the REST client".to_string(),
            )),
        }
    }

    fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Authorizer::Anonymous => request,
            Authorizer::Bearer(token) => request.bearer_auth(token),
        }
    }
}

/// Everything a REST client needs to issue requests against one resource:
/// the base URL, the HTTP client, the authorizer and the cancellation token.
///
/// Cheap to clone; the underlying [`reqwest::Client`] is reference counted.
#[derive(Clone)]
pub struct Endpoint {
    base: Url,
    client: Client,
    authorizer: Authorizer,
    cancel: CancelToken,
}

impl Endpoint {
    /// Builds `scheme://host:port/resource`. One leading `/` of `resource` is ignored.
    pub fn new(
        connection: &Connection,
        authentication: &Authentication,
        resource: &str,
    ) -> Result<Self, FrameworkError> {
        let authorizer = Authorizer::from_authentication(authentication)?;
        let resource = resource.strip_prefix('/').unwrap_or(resource);
        let raw = format!("{}/{}", connection.origin(), resource);
        let base = Url::parse(&raw).map_err(|source| FrameworkError::InvalidUrl { url: raw.clone(), source })?;
        if base.cannot_be_a_base() {
            return Err(FrameworkError::InvalidUrl {
                url: raw,
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }

        Ok(Self {
            base,
            client: Client::new(),
            authorizer,
            cancel: CancelToken::new(),
        })
    }

    /// Builds an endpoint from the [`Application`] attached to `scope`.
    ///
    /// Uses the scope's [`reqwest::Client`] when one is attached and binds
    /// requests to the scope's cancellation token.
    pub fn from_scope(scope: &Scope, resource: &str) -> Result<Self, FrameworkError> {
        let application = scope.try_value::<Application>()?;
        let mut endpoint = Self::new(&application.connection, &application.authentication, resource)?;
        if let Some(client) = scope.get::<Client>() {
            endpoint.client = Client::clone(&client);
        }
        endpoint.cancel = scope.cancel_token().clone();
        debug!(url = %endpoint.base, "rest endpoint");
        Ok(endpoint)
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `base/{id}`, with `id` pushed as a single percent-encoded segment.
    ///
    /// A `/` inside `id` is encoded as `%2F` and never splits the path.
    /// Callers validate `id` first: the `url` crate silently skips `.` and `..`.
    pub fn member(&self, id: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    /// Sends one request and returns the response body.
    ///
    /// Fails with [`FrameworkError::Cancelled`] if the token fires before or
    /// during the exchange; the in-flight request is dropped in that case.
    pub async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
        accepted: &[u16],
    ) -> Result<Vec<u8>, FrameworkError> {
        if self.cancel.is_cancelled() {
            return Err(FrameworkError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!(%method, %url, "request cancelled");
                Err(FrameworkError::Cancelled)
            }
            result = self.exchange(method.clone(), url.clone(), body, accepted) => result,
        }
    }

    async fn exchange(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
        accepted: &[u16],
    ) -> Result<Vec<u8>, FrameworkError> {
        let mut request = self.authorizer.apply(self.client.request(method.clone(), url.clone()));
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await.inspect_err(|e| {
            warn!(%method, %url, error = %e, "transport failure");
        })?;

        let status = response.status().as_u16();
        if !accepted.contains(&status) {
            debug!(%method, %url, status, "unexpected status");
            return Err(HttpError::new(status).into());
        }

        let bytes = response.bytes().await?;
        debug!(%method, %url, status, size = bytes.len(), "ok");
        Ok(bytes.to_vec())
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint").field("base", &self.base.as_str()).finish_non_exhaustive()
    }
}
