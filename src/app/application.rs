use crate::app::spec::{RepositorySpec, ResourceSpec};
use crate::context::Scope;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Default for Connection {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: 8080,
        }
    }
}

impl Connection {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// `scheme://host:port`
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// How requests authenticate. Exactly one variant per application.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Authentication {
    /// No `Authorization` header.
    #[default]
    None,
    /// The user enters a token through a login prompt rendered by the backend.
    Interactive,
    /// A fixed bearer token sent with every request.
    Bearer { token: String },
}

impl Authentication {
    pub fn bearer(token: impl Into<String>) -> Self {
        Authentication::Bearer { token: token.into() }
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authentication::None => f.write_str("None"),
            Authentication::Interactive => f.write_str("Interactive"),
            Authentication::Bearer { .. } => f.write_str("Bearer { token: \"***\" }"),
        }
    }
}

/// The root configuration value. Read-only once composed.
#[derive(Clone)]
pub struct Application {
    pub title: String,
    pub activities: Vec<Arc<dyn ActivityComposer>>,
    pub authentication: Authentication,
    pub connection: Connection,
}

impl Application {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            activities: Vec::new(),
            authentication: Authentication::default(),
            connection: Connection::default(),
        }
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connection = connection;
        self
    }

    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = authentication;
        self
    }

    pub fn with_activity(mut self, activity: impl ActivityComposer + 'static) -> Self {
        self.activities.push(Arc::new(activity));
        self
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("title", &self.title)
            .field("activities", &self.activities.len())
            .field("authentication", &self.authentication)
            .field("connection", &self.connection)
            .finish()
    }
}

/// Builds the [`Application`].
///
/// The scope is the root scope created by the launcher; it carries the
/// configuration and the shared HTTP client but not yet the application.
pub trait ApplicationComposer: Send + Sync {
    fn compose(&self, scope: &Scope) -> Application;
}

impl<F> ApplicationComposer for F
where
    F: Fn(&Scope) -> Application + Send + Sync,
{
    fn compose(&self, scope: &Scope) -> Application {
        self(scope)
    }
}

/// Builds one [`Activity`]. Called with a scope that resolves [`Application`].
pub trait ActivityComposer: Send + Sync {
    fn compose(&self, scope: &Scope) -> Activity;
}

impl<F> ActivityComposer for F
where
    F: Fn(&Scope) -> Activity + Send + Sync,
{
    fn compose(&self, scope: &Scope) -> Activity {
        self(scope)
    }
}

/// A data binding of an activity.
#[derive(Clone)]
pub enum Binding {
    Repository(Arc<dyn RepositorySpec>),
    Resource(Arc<dyn ResourceSpec>),
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Repository(_) => f.write_str("Repository"),
            Binding::Resource(_) => f.write_str("Resource"),
        }
    }
}

/// A top-level screen: a title, a visibility flag and its data bindings.
#[derive(Clone, Debug)]
pub struct Activity {
    pub title: String,
    pub visible: bool,
    pub bindings: Vec<Binding>,
}

impl Activity {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            visible: true,
            bindings: Vec::new(),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_repository(mut self, spec: impl RepositorySpec + 'static) -> Self {
        self.bindings.push(Binding::Repository(Arc::new(spec)));
        self
    }

    pub fn with_resource(mut self, spec: impl ResourceSpec + 'static) -> Self {
        self.bindings.push(Binding::Resource(Arc::new(spec)));
        self
    }
}
