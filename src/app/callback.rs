//! Repositories backed by plain closures instead of a server.
//!
//! Handy for local data, computed lists or tests. Any operation without a
//! handler fails with [`FrameworkError::NotImplemented`].

use crate::app::spec::RepositorySpec;
use crate::context::Scope;
use crate::framework::{FrameworkError, Opaque, Repository, RepositoryStencil, Stencil};
use async_trait::async_trait;
use std::sync::Arc;

type ListFn<T> = Arc<dyn Fn() -> Result<Vec<T>, FrameworkError> + Send + Sync>;
type LoadFn<T> = Arc<dyn Fn(&str) -> Result<T, FrameworkError> + Send + Sync>;
type SaveFn<T> = Arc<dyn Fn(T) -> Result<(), FrameworkError> + Send + Sync>;
type DeleteFn = Arc<dyn Fn(&str) -> Result<(), FrameworkError> + Send + Sync>;

pub struct CallbackRepository<T> {
    on_list: Option<ListFn<T>>,
    on_load: Option<LoadFn<T>>,
    on_save: Option<SaveFn<T>>,
    on_delete: Option<DeleteFn>,
}

impl<T> Clone for CallbackRepository<T> {
    fn clone(&self) -> Self {
        Self {
            on_list: self.on_list.clone(),
            on_load: self.on_load.clone(),
            on_save: self.on_save.clone(),
            on_delete: self.on_delete.clone(),
        }
    }
}

impl<T> Default for CallbackRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CallbackRepository<T> {
    pub fn new() -> Self {
        Self {
            on_list: None,
            on_load: None,
            on_save: None,
            on_delete: None,
        }
    }

    pub fn on_list(mut self, f: impl Fn() -> Result<Vec<T>, FrameworkError> + Send + Sync + 'static) -> Self {
        self.on_list = Some(Arc::new(f));
        self
    }

    pub fn on_load(mut self, f: impl Fn(&str) -> Result<T, FrameworkError> + Send + Sync + 'static) -> Self {
        self.on_load = Some(Arc::new(f));
        self
    }

    pub fn on_save(mut self, f: impl Fn(T) -> Result<(), FrameworkError> + Send + Sync + 'static) -> Self {
        self.on_save = Some(Arc::new(f));
        self
    }

    pub fn on_delete(mut self, f: impl Fn(&str) -> Result<(), FrameworkError> + Send + Sync + 'static) -> Self {
        self.on_delete = Some(Arc::new(f));
        self
    }
}

#[async_trait]
impl<T: Send + 'static> Repository<T> for CallbackRepository<T> {
    async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        match &self.on_list {
            Some(f) => f(),
            None => Err(FrameworkError::NotImplemented("list")),
        }
    }

    async fn load(&self, id: &str) -> Result<T, FrameworkError> {
        match &self.on_load {
            Some(f) => f(id),
            None => Err(FrameworkError::NotImplemented("load")),
        }
    }

    async fn save(&self, entity: T) -> Result<(), FrameworkError> {
        match &self.on_save {
            Some(f) => f(entity),
            None => Err(FrameworkError::NotImplemented("save")),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), FrameworkError> {
        match &self.on_delete {
            Some(f) => f(id),
            None => Err(FrameworkError::NotImplemented("delete")),
        }
    }
}

impl<T> RepositorySpec for CallbackRepository<T>
where
    T: Default + Send + Sync + 'static,
{
    fn new_stencil(&self, _scope: &Scope) -> Result<Arc<dyn RepositoryStencil>, FrameworkError> {
        Ok(Arc::new(Stencil::new(self.clone())))
    }

    fn default_value(&self) -> Opaque {
        Box::new(T::default())
    }
}
