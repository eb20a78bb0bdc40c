//! # Context (Type-Keyed Scope)
//!
//! A [`Scope`] threads configuration through the composition tree without a
//! global variable. Values are keyed by their [`TypeId`]: you ask for a
//! `Connection`, you get the most recently attached `Connection`.
//!
//! ## Shadowing
//!
//! [`Scope::with_value`] returns a *derived* scope. The parent is untouched, so
//! attaching a second `Connection` for one activity shadows the outer value for
//! that activity and its descendants only.
//!
//! ```rust
//! use fusion_recipe::context::Scope;
//!
//! #[derive(Debug, PartialEq)]
//! struct Locale(&'static str);
//!
//! let root = Scope::new().with_value(Locale("en"));
//! let nested = root.with_value(Locale("de"));
//!
//! assert_eq!(*root.value::<Locale>(), Locale("en"));
//! assert_eq!(*nested.value::<Locale>(), Locale("de"));
//! ```
//!
//! ## Concurrency
//!
//! Nodes are immutable and shared through `Arc`, so a scope is `Send + Sync`
//! and can be cloned into any number of tasks without locking.

mod cancel;

pub use cancel::CancelToken;

use crate::app::Application;
use crate::framework::FrameworkError;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

struct Entry {
    key: TypeId,
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Entry>>,
}

/// An immutable, append-only registry of typed values plus a cancellation token.
#[derive(Clone, Default)]
pub struct Scope {
    head: Option<Arc<Entry>>,
    cancel: CancelToken,
}

impl Scope {
    /// An empty root scope with a fresh token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives a scope in which `T` resolves to `value`.
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Self {
        self.with_arc(Arc::new(value))
    }

    /// Like [`with_value`](Scope::with_value) for a value that is already shared.
    pub fn with_arc<T: Any + Send + Sync>(&self, value: Arc<T>) -> Self {
        Self {
            head: Some(Arc::new(Entry {
                key: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                value,
                parent: self.head.clone(),
            })),
            cancel: self.cancel.clone(),
        }
    }

    /// The most recently attached `T`, if any.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let key = TypeId::of::<T>();
        let mut node = self.head.as_ref();
        while let Some(entry) = node {
            if entry.key == key {
                return entry.value.clone().downcast::<T>().ok();
            }
            node = entry.parent.as_ref();
        }
        None
    }

    /// The most recently attached `T`.
    ///
    /// # Panics
    ///
    /// Panics if no `T` was attached. A missing value is a composition bug, not
    /// something an end user can fix.
    pub fn value<T: Any + Send + Sync>(&self) -> Arc<T> {
        match self.get::<T>() {
            Some(value) => value,
            None => panic!(
                "no value of type {} attached to the scope",
                std::any::type_name::<T>()
            ),
        }
    }

    /// The most recently attached `T`, or [`FrameworkError::MissingContext`].
    pub fn try_value<T: Any + Send + Sync>(&self) -> Result<Arc<T>, FrameworkError> {
        self.get::<T>()
            .ok_or(FrameworkError::MissingContext(std::any::type_name::<T>()))
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// The application this scope belongs to. Panics outside a started runtime.
    pub fn application(&self) -> Arc<Application> {
        self.value::<Application>()
    }

    /// Derives a scope that is also cancelled through `token`.
    ///
    /// The scope's token becomes a child of both the current token and
    /// `token`; cancelling either one cancels the derived scope, and neither
    /// the parent scope nor `token` is affected by cancelling the result.
    pub fn with_cancel(&self, token: CancelToken) -> Self {
        self.rebind(self.cancel.linked(&token))
    }

    /// Derives a scope whose token also expires after `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.rebind(self.cancel.with_timeout(timeout))
    }

    fn rebind(&self, cancel: CancelToken) -> Self {
        Self {
            head: self.head.clone(),
            cancel,
        }
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        let mut node = self.head.as_ref();
        while let Some(entry) = node {
            names.push(entry.type_name);
            node = entry.parent.as_ref();
        }
        f.debug_struct("Scope")
            .field("values", &names)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Port(u16);

    #[derive(Debug, PartialEq)]
    struct Theme(&'static str);

    #[test]
    fn values_are_keyed_by_type() {
        let scope = Scope::new().with_value(Port(8080)).with_value(Theme("dark"));
        assert_eq!(*scope.value::<Port>(), Port(8080));
        assert_eq!(*scope.value::<Theme>(), Theme("dark"));
        assert!(scope.get::<String>().is_none());
    }

    #[test]
    fn nested_value_shadows_only_descendants() {
        let root = Scope::new().with_value(Port(80));
        let child = root.with_value(Port(8443));
        let grandchild = child.with_value(Theme("light"));

        assert_eq!(*root.value::<Port>(), Port(80));
        assert_eq!(*child.value::<Port>(), Port(8443));
        assert_eq!(*grandchild.value::<Port>(), Port(8443));
        assert!(!root.contains::<Theme>());
    }

    #[test]
    #[should_panic(expected = "Port")]
    fn missing_value_panics_with_type_name() {
        Scope::new().value::<Port>();
    }

    #[test]
    fn try_value_reports_missing_context() {
        match Scope::new().try_value::<Port>() {
            Err(FrameworkError::MissingContext(name)) => assert!(name.ends_with("Port")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn derived_scopes_share_the_token() {
        let root = Scope::new();
        let child = root.with_value(Port(1));
        root.cancel_token().cancel();
        assert!(child.cancel_token().is_cancelled());
    }

    #[test]
    fn with_cancel_rebinds_without_touching_parent() {
        let root = Scope::new();
        let token = CancelToken::new();
        let child = root.with_cancel(token.clone());
        token.cancel();
        assert!(child.cancel_token().is_cancelled());
        assert!(!root.cancel_token().is_cancelled());
    }

    #[test]
    fn rebound_scope_still_sees_parent_cancel() {
        let parent = CancelToken::new();
        let scope = Scope::new().with_cancel(parent.clone()).with_cancel(CancelToken::new());
        parent.cancel();
        assert!(scope.cancel_token().is_cancelled());
    }

    #[test]
    fn cancelling_a_nested_scope_leaves_its_parent_running() {
        let root = Scope::new();
        let request = root.with_timeout(Duration::from_secs(60));
        let sibling = root.with_value(Port(1)).with_timeout(Duration::from_secs(60));

        request.cancel_token().cancel();
        assert!(request.cancel_token().is_cancelled());
        assert!(!root.cancel_token().is_cancelled());
        assert!(!sibling.cancel_token().is_cancelled());
    }

    #[test]
    fn debug_lists_type_names() {
        let scope = Scope::new().with_value(Port(1));
        assert!(format!("{scope:?}").contains("Port"));
    }
}
