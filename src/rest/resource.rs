use crate::context::Scope;
use crate::framework::entity::short_type_name;
use crate::framework::{FrameworkError, ResourceRepository, ResourceStencilAdapter};
use crate::rest::{decode, encode, Endpoint, DELETE_OK, LOAD_OK, SAVE_OK};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{info, instrument};

/// A REST backed singleton, like `/api/profile`. Same verbs as
/// [`RestRepository`](crate::rest::RestRepository), addressed without an id.
pub struct RestResource<T> {
    endpoint: Endpoint,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for RestResource<T> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> RestResource<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            _entity: PhantomData,
        }
    }

    pub fn from_scope(scope: &Scope, resource: &str) -> Result<Self, FrameworkError> {
        let endpoint = Endpoint::from_scope(scope, resource)?;
        info!(entity_type = short_type_name::<T>(), url = %endpoint.base(), "rest resource");
        Ok(Self::new(endpoint))
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn into_stencil(self) -> ResourceStencilAdapter<T, Self> {
        ResourceStencilAdapter::new(self)
    }
}

#[async_trait]
impl<T> ResourceRepository<T> for RestResource<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    #[instrument(skip(self), fields(entity_type = short_type_name::<T>()))]
    async fn load(&self) -> Result<T, FrameworkError> {
        let body = self.endpoint.execute(Method::GET, self.endpoint.base().clone(), None, LOAD_OK).await?;
        decode(&body)
    }

    #[instrument(skip(self, entity), fields(entity_type = short_type_name::<T>()))]
    async fn save(&self, entity: T) -> Result<(), FrameworkError> {
        let body = encode(&entity)?;
        self.endpoint.execute(Method::PUT, self.endpoint.base().clone(), Some(body), SAVE_OK).await?;
        info!("saved");
        Ok(())
    }

    #[instrument(skip(self), fields(entity_type = short_type_name::<T>()))]
    async fn delete(&self) -> Result<(), FrameworkError> {
        self.endpoint.execute(Method::DELETE, self.endpoint.base().clone(), None, DELETE_OK).await?;
        info!("deleted");
        Ok(())
    }
}
