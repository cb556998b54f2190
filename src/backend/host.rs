// Application Host: lazy, at-most-once construction of the inner Backend

//! # Application Host
//!
//! ```text
//! Uninitialized ──first get_app()──► Initializing(attempt, shared build) ──ok──► Ready(backend)
//!       ▲                                      │
//!       └──────────────── err ─────────────────┘
//! ```
//!
//! The `Initializing` state stores a [`Shared`] future. Every caller that finds the
//! host in that state clones and awaits the same future, so a burst of first
//! requests triggers exactly one construction and all of them receive the same
//! `Arc<Backend>`.
//!
//! A failed attempt hands its error to every caller that awaited it and puts the
//! host back into `Uninitialized`; the next caller starts a new attempt. There is
//! no backoff.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, error, info};

use super::app::{Backend, BackendConfig};
use crate::{BridgeError, Result};

/// Builds a fresh backend. Called at most once per construction attempt.
pub type BackendFactory = Arc<dyn Fn() -> BoxFuture<'static, Result<Backend>> + Send + Sync>;

type PendingBuild = Shared<BoxFuture<'static, Result<Arc<Backend>>>>;

enum HostState {
    Uninitialized,
    Initializing { attempt: u64, build: PendingBuild },
    Ready(Arc<Backend>),
}

/// Observable lifecycle state of an [`ApplicationHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStatus {
    Uninitialized,
    Initializing,
    Ready,
}

impl HostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostStatus::Uninitialized => "uninitialized",
            HostStatus::Initializing => "initializing",
            HostStatus::Ready => "ready",
        }
    }
}

impl std::fmt::Display for HostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ApplicationHost {
    factory: BackendFactory,
    state: Mutex<HostState>,
    attempts: AtomicU64,
}

impl ApplicationHost {
    pub fn new(factory: BackendFactory) -> Self {
        Self {
            factory,
            state: Mutex::new(HostState::Uninitialized),
            attempts: AtomicU64::new(0),
        }
    }

    /// Host whose factory calls [`Backend::create`] with `config`
    pub fn with_config(config: BackendConfig) -> Self {
        Self::new(Arc::new(move || Backend::create(config.clone()).boxed()))
    }

    /// Return the backend, constructing it first if no attempt has succeeded yet.
    ///
    /// Never holds the state lock across an await point.
    pub async fn get_app(&self) -> Result<Arc<Backend>> {
        let (attempt, build) = {
            let mut state = self.lock_state();
            match &*state {
                HostState::Ready(backend) => return Ok(backend.clone()),
                HostState::Initializing { attempt, build } => {
                    debug!("Awaiting in-flight backend construction (attempt {})", attempt);
                    (*attempt, build.clone())
                }
                HostState::Uninitialized => {
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    info!("Starting backend construction (attempt {})", attempt);
                    let build = self.start_build();
                    *state = HostState::Initializing {
                        attempt,
                        build: build.clone(),
                    };
                    (attempt, build)
                }
            }
        };

        let outcome = build.await;
        self.settle(attempt, &outcome);
        outcome
    }

    pub fn status(&self) -> HostStatus {
        match &*self.lock_state() {
            HostState::Uninitialized => HostStatus::Uninitialized,
            HostState::Initializing { .. } => HostStatus::Initializing,
            HostState::Ready(_) => HostStatus::Ready,
        }
    }

    /// Number of construction attempts started so far
    pub fn construction_attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    fn start_build(&self) -> PendingBuild {
        let build = (self.factory)();
        // A panic inside the factory must not poison the shared future
        async move {
            match AssertUnwindSafe(build).catch_unwind().await {
                Ok(Ok(backend)) => Ok(Arc::new(backend)),
                Ok(Err(BridgeError::Construction(message))) => Err(BridgeError::Construction(message)),
                Ok(Err(other)) => Err(BridgeError::Construction(other.to_string())),
                Err(panic) => Err(BridgeError::Construction(format!(
                    "backend factory panicked: {}",
                    panic_message(panic.as_ref())
                ))),
            }
        }
        .boxed()
        .shared()
    }

    // First waiter to finish moves the state on; later waiters of the same attempt find it already moved.
    fn settle(&self, attempt: u64, outcome: &Result<Arc<Backend>>) {
        let mut state = self.lock_state();
        let current = match &*state {
            HostState::Initializing { attempt: current, .. } => *current,
            _ => return,
        };
        if current != attempt {
            return;
        }

        *state = match outcome {
            Ok(backend) => {
                info!("✅ Backend {} ready (attempt {})", backend.instance_id(), attempt);
                HostState::Ready(backend.clone())
            }
            Err(e) => {
                error!("❌ Backend construction failed (attempt {}): {}", attempt, e);
                HostState::Uninitialized
            }
        };
    }

    fn lock_state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}

impl std::fmt::Debug for ApplicationHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationHost")
            .field("status", &self.status())
            .field("attempts", &self.construction_attempts())
            .finish()
    }
}
