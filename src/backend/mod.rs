// Inner application and its process-wide host

//! # Backend Module
//!
//! - [`app`]: the inner application (controller, catalog schema, `/api` router)
//! - [`host`]: the [`ApplicationHost`] lazy singleton state machine
//!
//! The process-wide host lives in a `lazy_static`. Only the host *object* is
//! created eagerly on first access; the backend inside it is still built on the
//! first [`get_app`] call.

pub mod app;
pub mod host;

use std::sync::Arc;

use lazy_static::lazy_static;

pub use app::{AppController, Backend, BackendConfig, GLOBAL_PREFIX};
pub use host::{ApplicationHost, BackendFactory, HostStatus};

use crate::Result;

lazy_static! {
    static ref GLOBAL_HOST: Arc<ApplicationHost> =
        Arc::new(ApplicationHost::with_config(BackendConfig::default()));
}

/// The process-wide application host
pub fn global_host() -> Arc<ApplicationHost> {
    GLOBAL_HOST.clone()
}

/// The process-wide backend, constructed on first call
pub async fn get_app() -> Result<Arc<Backend>> {
    GLOBAL_HOST.get_app().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_global_host_is_shared() {
        assert!(Arc::ptr_eq(&global_host(), &global_host()));

        let (a, b) = tokio::join!(get_app(), get_app());
        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(global_host().status(), HostStatus::Ready);
    }
}
