//! Cooperative cancellation for CRUD calls.
//!
//! Tokens form a tree. A token is cancelled when it, or any token it was
//! derived from, is cancelled or past its deadline. Cancelling a token never
//! reaches upwards: the parent and its other children keep running.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

struct Node {
    signal: watch::Sender<bool>,
    deadline: Option<Instant>,
    parents: Vec<Arc<Node>>,
}

impl Node {
    fn new(deadline: Option<Instant>, parents: Vec<Arc<Node>>) -> Arc<Self> {
        let (signal, _) = watch::channel(false);
        Arc::new(Self {
            signal,
            deadline,
            parents,
        })
    }

    fn is_cancelled(&self, now: Instant) -> bool {
        *self.signal.borrow()
            || self.deadline.is_some_and(|d| now >= d)
            || self.parents.iter().any(|parent| parent.is_cancelled(now))
    }

    fn earliest_deadline(&self) -> Option<Instant> {
        self.parents
            .iter()
            .filter_map(|parent| parent.earliest_deadline())
            .chain(self.deadline)
            .min()
    }
}

type Waiting = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Completes once `node`'s own signal fires or any ancestor's does.
fn wait_node(node: Arc<Node>) -> Waiting {
    Box::pin(async move {
        let mut receiver = node.signal.subscribe();
        let parents = node.parents.clone();
        let own = async move {
            // The sender lives in `node`, which this future owns.
            let _ = receiver.wait_for(|cancelled| *cancelled).await;
        };
        tokio::select! {
            _ = own => {}
            _ = wait_any(parents) => {}
        }
    })
}

fn wait_any(mut nodes: Vec<Arc<Node>>) -> Waiting {
    match nodes.len() {
        0 => Box::pin(std::future::pending::<()>()),
        1 => wait_node(nodes.remove(0)),
        _ => {
            let first = nodes.remove(0);
            Box::pin(async move {
                tokio::select! {
                    _ = wait_node(first) => {}
                    _ = wait_any(nodes) => {}
                }
            })
        }
    }
}

/// A cancellation signal bound to a scope and every request issued under it.
///
/// Cloning yields a handle to the same token. [`child`](CancelToken::child),
/// [`with_timeout`](CancelToken::with_timeout) and [`linked`](CancelToken::linked)
/// derive new tokens that observe this one without being able to cancel it.
#[derive(Clone)]
pub struct CancelToken {
    node: Arc<Node>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .field("deadline", &self.deadline())
            .finish()
    }
}

impl CancelToken {
    /// A root token.
    pub fn new() -> Self {
        Self {
            node: Node::new(None, Vec::new()),
        }
    }

    /// Cancels this token, its clones and every token derived from it.
    pub fn cancel(&self) {
        self.node.signal.send_replace(true);
    }

    /// A token cancelled with this one, which can also be cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            node: Node::new(None, vec![self.node.clone()]),
        }
    }

    /// A child token that is additionally cancelled once `timeout` has elapsed.
    ///
    /// An earlier deadline inherited from an ancestor still applies.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            node: Node::new(Some(Instant::now() + timeout), vec![self.node.clone()]),
        }
    }

    /// A child of both this token and `other`: cancelled when either is.
    pub fn linked(&self, other: &CancelToken) -> Self {
        Self {
            node: Node::new(None, vec![self.node.clone(), other.node.clone()]),
        }
    }

    /// The earliest deadline on this token or any ancestor.
    pub fn deadline(&self) -> Option<Instant> {
        self.node.earliest_deadline()
    }

    pub fn is_cancelled(&self) -> bool {
        self.node.is_cancelled(Instant::now())
    }

    /// Completes once the token or an ancestor is cancelled, or a deadline passes.
    pub async fn cancelled(&self) {
        let signals = wait_node(self.node.clone());
        match self.deadline() {
            Some(deadline) => {
                tokio::select! {
                    _ = signals => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => signals.await,
        }
    }
}
