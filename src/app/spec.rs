//! Binding descriptors: the typed values an activity binds to.
//!
//! A node knows its entity type; the runtime does not. The runtime only calls
//! [`RepositorySpec::new_stencil`] and gets back a type-erased stencil.

use crate::context::Scope;
use crate::framework::{Entity, FrameworkError, Opaque, RepositoryStencil, ResourceStencil};
use crate::rest::{RestRepository, RestResource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// A repository node.
pub trait RepositorySpec: Send + Sync {
    /// Creates the stencil, pulling connection details from `scope`.
    fn new_stencil(&self, scope: &Scope) -> Result<Arc<dyn RepositoryStencil>, FrameworkError>;

    /// A fresh default entity, e.g. to prefill a "new item" form.
    fn default_value(&self) -> Opaque;
}

/// A singleton resource node.
pub trait ResourceSpec: Send + Sync {
    fn new_stencil(&self, scope: &Scope) -> Result<Arc<dyn ResourceStencil>, FrameworkError>;

    fn default_value(&self) -> Opaque;
}

/// A repository served by the REST backend at `path`.
pub struct RestRepositorySpec<T> {
    path: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> RestRepositorySpec<T> {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            _entity: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<T: Entity + Default> RepositorySpec for RestRepositorySpec<T> {
    fn new_stencil(&self, scope: &Scope) -> Result<Arc<dyn RepositoryStencil>, FrameworkError> {
        let repository = RestRepository::<T>::from_scope(scope, &self.path)?;
        Ok(Arc::new(repository.into_stencil()))
    }

    fn default_value(&self) -> Opaque {
        Box::new(T::default())
    }
}

/// A singleton resource served by the REST backend at `path`.
pub struct RestResourceSpec<T> {
    path: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> RestResourceSpec<T> {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            _entity: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<T> ResourceSpec for RestResourceSpec<T>
where
    T: Serialize + DeserializeOwned + Default + Send + Sync + 'static,
{
    fn new_stencil(&self, scope: &Scope) -> Result<Arc<dyn ResourceStencil>, FrameworkError> {
        let resource = RestResource::<T>::from_scope(scope, &self.path)?;
        Ok(Arc::new(resource.into_stencil()))
    }

    fn default_value(&self) -> Opaque {
        Box::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Application, Authentication};
    use crate::framework::unbox;
    use crate::model::Movie;

    #[test]
    fn default_value_is_an_opaque_entity() {
        let spec = RestRepositorySpec::<Movie>::new("movies");
        let movie = unbox::<Movie>(spec.default_value()).unwrap();
        assert_eq!(movie, Movie::default());
    }

    #[tokio::test]
    async fn stencil_reports_entity_type() {
        let scope = Scope::new().with_value(Application::new("Movies"));
        let stencil = RestRepositorySpec::<Movie>::new("movies").new_stencil(&scope).unwrap();
        assert_eq!(stencil.entity_type(), "Movie");
    }

    #[test]
    fn stencil_without_application_is_a_programming_error() {
        let err = RestRepositorySpec::<Movie>::new("movies")
            .new_stencil(&Scope::new())
            .err()
            .unwrap();
        assert!(matches!(err, FrameworkError::MissingContext(_)));
    }

    #[test]
    fn interactive_authentication_is_rejected() {
        let app = Application::new("Movies").with_authentication(Authentication::Interactive);
        let scope = Scope::new().with_value(app);
        let err = RestRepositorySpec::<Movie>::new("movies")
            .new_stencil(&scope)
            .err()
            .unwrap();
        assert!(err.is_programming_error());
    }
}
