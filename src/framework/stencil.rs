//! # Stencils (Type-Erased Repositories)
//!
//! The runtime drives a heterogeneous collection of repositories: one for
//! movies, one for users, one singleton settings resource, and so on. It cannot
//! be generic over every entity type, so each typed repository is wrapped in a
//! *stencil* that speaks [`Opaque`] values instead of `T`.
//!
//! ## Two Flavors
//!
//! - [`RepositoryStencil`] over a [`Repository<T>`]: List / Load-by-id / Save / Delete-by-id.
//! - [`ResourceStencil`] over a [`ResourceRepository<T>`]: Load / Save / Delete of a singleton.
//!
//! ## Boxing Rules
//!
//! Each call boxes or unboxes exactly once at the boundary and then delegates.
//! [`RepositoryStencil::save`] performs a checked downcast: a value of the wrong
//! type fails with [`FrameworkError::TypeMismatch`] and the inner repository is
//! never called.

use crate::framework::entity::short_type_name;
use crate::framework::error::FrameworkError;
use async_trait::async_trait;
use std::any::Any;
use std::marker::PhantomData;

/// A boxed entity whose concrete type is only known to the stencil that produced it.
pub type Opaque = Box<dyn Any + Send + Sync>;

/// CRUD operations on an entity based resource set.
#[async_trait]
pub trait Repository<T: Send + 'static>: Send + Sync {
    async fn list(&self) -> Result<Vec<T>, FrameworkError>;

    async fn load(&self, id: &str) -> Result<T, FrameworkError>;

    /// Updates or creates the entity.
    async fn save(&self, entity: T) -> Result<(), FrameworkError>;

    /// Removes the entity. Removing an already deleted entity is not an error.
    async fn delete(&self, id: &str) -> Result<(), FrameworkError>;
}

/// An aggregate which exists at most once, so it is addressed without an id.
#[async_trait]
pub trait ResourceRepository<T: Send + 'static>: Send + Sync {
    async fn load(&self) -> Result<T, FrameworkError>;

    async fn save(&self, entity: T) -> Result<(), FrameworkError>;

    async fn delete(&self) -> Result<(), FrameworkError>;
}

/// Non-generic view of a [`Repository<T>`].
#[async_trait]
pub trait RepositoryStencil: Send + Sync {
    /// Short name of the underlying entity type, for logs.
    fn entity_type(&self) -> &'static str;

    async fn list(&self) -> Result<Vec<Opaque>, FrameworkError>;

    async fn load(&self, id: &str) -> Result<Opaque, FrameworkError>;

    async fn save(&self, entity: Opaque) -> Result<(), FrameworkError>;

    async fn delete(&self, id: &str) -> Result<(), FrameworkError>;
}

/// Non-generic view of a [`ResourceRepository<T>`].
#[async_trait]
pub trait ResourceStencil: Send + Sync {
    fn entity_type(&self) -> &'static str;

    async fn load(&self) -> Result<Opaque, FrameworkError>;

    async fn save(&self, entity: Opaque) -> Result<(), FrameworkError>;

    async fn delete(&self) -> Result<(), FrameworkError>;
}

/// Narrows an opaque value back to `T`.
pub fn unbox<T: Any>(value: Opaque) -> Result<T, FrameworkError> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| FrameworkError::TypeMismatch {
            expected: std::any::type_name::<T>(),
        })
}

/// Adapts a [`Repository<T>`] to [`RepositoryStencil`].
pub struct Stencil<T, R> {
    inner: R,
    _entity: PhantomData<fn() -> T>,
}

impl<T, R> Stencil<T, R>
where
    T: Send + Sync + 'static,
    R: Repository<T>,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            _entity: PhantomData,
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<T, R> RepositoryStencil for Stencil<T, R>
where
    T: Send + Sync + 'static,
    R: Repository<T>,
{
    fn entity_type(&self) -> &'static str {
        short_type_name::<T>()
    }

    async fn list(&self) -> Result<Vec<Opaque>, FrameworkError> {
        let items = self.inner.list().await?;
        Ok(items.into_iter().map(|item| Box::new(item) as Opaque).collect())
    }

    async fn load(&self, id: &str) -> Result<Opaque, FrameworkError> {
        let item = self.inner.load(id).await?;
        Ok(Box::new(item))
    }

    async fn save(&self, entity: Opaque) -> Result<(), FrameworkError> {
        let entity = unbox::<T>(entity)?;
        self.inner.save(entity).await
    }

    async fn delete(&self, id: &str) -> Result<(), FrameworkError> {
        self.inner.delete(id).await
    }
}

/// Adapts a [`ResourceRepository<T>`] to [`ResourceStencil`].
pub struct ResourceStencilAdapter<T, R> {
    inner: R,
    _entity: PhantomData<fn() -> T>,
}

impl<T, R> ResourceStencilAdapter<T, R>
where
    T: Send + Sync + 'static,
    R: ResourceRepository<T>,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            _entity: PhantomData,
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<T, R> ResourceStencil for ResourceStencilAdapter<T, R>
where
    T: Send + Sync + 'static,
    R: ResourceRepository<T>,
{
    fn entity_type(&self) -> &'static str {
        short_type_name::<T>()
    }

    async fn load(&self) -> Result<Opaque, FrameworkError> {
        let item = self.inner.load().await?;
        Ok(Box::new(item))
    }

    async fn save(&self, entity: Opaque) -> Result<(), FrameworkError> {
        let entity = unbox::<T>(entity)?;
        self.inner.save(entity).await
    }

    async fn delete(&self) -> Result<(), FrameworkError> {
        self.inner.delete().await
    }
}
