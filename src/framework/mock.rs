//! # Mock Framework
//!
//! Utilities for testing stencils, runtimes and composers without a server.
//!
//! [`MockRepository`] replays a queue of expectations in order. Each call pops
//! the next expectation and panics if the operation (or id) does not match.
//!
//! # Example
//! ```
//! # use fusion_recipe::framework::{MockRepository, Repository};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut mock = MockRepository::<String>::new();
//! mock.expect_load("42").return_ok("Dune".to_string());
//! mock.expect_delete("42").return_ok(());
//!
//! assert_eq!(mock.load("42").await.unwrap(), "Dune");
//! mock.delete("42").await.unwrap();
//! mock.verify(); // Ensures all expectations were met
//! # }
//! ```

use crate::framework::error::FrameworkError;
use crate::framework::stencil::Repository;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation<T> {
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Load {
        id: String,
        response: Result<T, FrameworkError>,
    },
    Save {
        response: Result<(), FrameworkError>,
    },
    Delete {
        id: String,
        response: Result<(), FrameworkError>,
    },
}

struct State<T> {
    expectations: VecDeque<Expectation<T>>,
    saved: Vec<T>,
    calls: usize,
}

/// A repository with expectation tracking for fluent testing.
///
/// Clones share the same queue, so a test can keep one handle for
/// [`verify`](MockRepository::verify) while the other is moved into a stencil.
pub struct MockRepository<T> {
    state: Arc<Mutex<State<T>>>,
}

impl<T> Clone for MockRepository<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T> Default for MockRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MockRepository<T> {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                expectations: VecDeque::new(),
                saved: Vec::new(),
                calls: 0,
            })),
        }
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(self.state.clone(), |response| Expectation::List { response })
    }

    pub fn expect_load(&mut self, id: impl Into<String>) -> ExpectationBuilder<T, T> {
        let id = id.into();
        ExpectationBuilder::new(self.state.clone(), move |response| Expectation::Load { id, response })
    }

    pub fn expect_save(&mut self) -> ExpectationBuilder<T, ()> {
        ExpectationBuilder::new(self.state.clone(), |response| Expectation::Save { response })
    }

    pub fn expect_delete(&mut self, id: impl Into<String>) -> ExpectationBuilder<T, ()> {
        let id = id.into();
        ExpectationBuilder::new(self.state.clone(), move |response| Expectation::Delete { id, response })
    }

    /// Number of repository calls received so far.
    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.expectations.is_empty() {
            panic!("Not all expectations were met. {} remaining", state.expectations.len());
        }
    }

    fn next(&self, operation: &str) -> Expectation<T> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        match state.expectations.pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected {operation}: no expectation left"),
        }
    }
}

impl<T: Clone> MockRepository<T> {
    /// Every entity passed to a successful `save`, in call order.
    pub fn saved(&self) -> Vec<T> {
        self.state.lock().unwrap().saved.clone()
    }
}

/// Builder for a single expectation. Consumed by `return_ok` / `return_err`.
pub struct ExpectationBuilder<T, R> {
    state: Arc<Mutex<State<T>>>,
    make: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T, R> ExpectationBuilder<T, R> {
    fn new(
        state: Arc<Mutex<State<T>>>,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            state,
            make: Box::new(make),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.make)(response);
        self.state.lock().unwrap().expectations.push_back(expectation);
    }
}

#[async_trait]
impl<T> Repository<T> for MockRepository<T>
where
    T: Clone + Send + 'static,
{
    async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        match self.next("list") {
            Expectation::List { response } => response,
            _ => panic!("Unexpected list: expectation mismatch"),
        }
    }

    async fn load(&self, id: &str) -> Result<T, FrameworkError> {
        match self.next("load") {
            Expectation::Load { id: expected, response } => {
                assert_eq!(expected, id, "load called with unexpected id");
                response
            }
            _ => panic!("Unexpected load({id}): expectation mismatch"),
        }
    }

    async fn save(&self, entity: T) -> Result<(), FrameworkError> {
        match self.next("save") {
            Expectation::Save { response } => {
                if response.is_ok() {
                    self.state.lock().unwrap().saved.push(entity);
                }
                response
            }
            _ => panic!("Unexpected save: expectation mismatch"),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), FrameworkError> {
        match self.next("delete") {
            Expectation::Delete { id: expected, response } => {
                assert_eq!(expected, id, "delete called with unexpected id");
                response
            }
            _ => panic!("Unexpected delete({id}): expectation mismatch"),
        }
    }
}
