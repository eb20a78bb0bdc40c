use crate::context::Scope;
use crate::framework::entity::short_type_name;
use crate::framework::{check_identity, identity_of, Entity, FrameworkError, Repository, Stencil};
use crate::rest::{decode, encode, Endpoint, DELETE_OK, LIST_OK, LOAD_OK, SAVE_OK};
use async_trait::async_trait;
use reqwest::Method;
use std::marker::PhantomData;
use tracing::{debug, info, instrument};

/// A REST backed CRUD repository. It makes strong assumptions about the verbs,
/// see the [module docs](crate::rest).
pub struct RestRepository<T> {
    endpoint: Endpoint,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for RestRepository<T> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> RestRepository<T> {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            _entity: PhantomData,
        }
    }

    /// A repository for `resource` (like `/api/movies`) on the application's backend.
    pub fn from_scope(scope: &Scope, resource: &str) -> Result<Self, FrameworkError> {
        let endpoint = Endpoint::from_scope(scope, resource)?;
        info!(entity_type = short_type_name::<T>(), url = %endpoint.base(), "rest repository");
        Ok(Self::new(endpoint))
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn into_stencil(self) -> Stencil<T, Self> {
        Stencil::new(self)
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for RestRepository<T> {
    /// `GET /resource`, expects a JSON array.
    #[instrument(skip(self), fields(entity_type = short_type_name::<T>()))]
    async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        let body = self.endpoint.execute(Method::GET, self.endpoint.base().clone(), None, LIST_OK).await?;
        let items: Vec<T> = decode(&body)?;
        debug!(size = items.len(), "listed");
        Ok(items)
    }

    /// `GET /resource/{id}`
    #[instrument(skip(self), fields(entity_type = short_type_name::<T>()))]
    async fn load(&self, id: &str) -> Result<T, FrameworkError> {
        check_identity::<T>(id)?;
        let body = self.endpoint.execute(Method::GET, self.endpoint.member(id), None, LOAD_OK).await?;
        decode(&body)
    }

    /// `PUT /resource/{id}` with the JSON encoded entity.
    #[instrument(skip(self, entity), fields(entity_type = short_type_name::<T>()))]
    async fn save(&self, entity: T) -> Result<(), FrameworkError> {
        let id = identity_of(&entity)?;
        let body = encode(&entity)?;
        self.endpoint.execute(Method::PUT, self.endpoint.member(&id), Some(body), SAVE_OK).await?;
        info!(id, "saved");
        Ok(())
    }

    /// `DELETE /resource/{id}`
    #[instrument(skip(self), fields(entity_type = short_type_name::<T>()))]
    async fn delete(&self, id: &str) -> Result<(), FrameworkError> {
        check_identity::<T>(id)?;
        self.endpoint.execute(Method::DELETE, self.endpoint.member(id), None, DELETE_OK).await?;
        info!(id, "deleted");
        Ok(())
    }
}
