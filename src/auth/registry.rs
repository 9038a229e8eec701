//! DashMap-based registry of per-application authenticators.
//!
//! Each application started on the vhost owns exactly one
//! [`ConnectionAuthenticator`] (and so one credential store) for as long as
//! it runs. Starting an application again replaces its previous instance.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use super::authenticator::ConnectionAuthenticator;
use super::config::{AppContext, AuthPolicy};

pub struct AuthRegistry {
    vhost_home: PathBuf,
    policy: AuthPolicy,
    apps: DashMap<String, Arc<ConnectionAuthenticator>>,
}

impl AuthRegistry {
    pub fn new(vhost_home: impl Into<PathBuf>, policy: AuthPolicy) -> Self {
        Self {
            vhost_home: vhost_home.into(),
            policy,
            apps: DashMap::new(),
        }
    }

    pub fn vhost_home(&self) -> &Path {
        &self.vhost_home
    }

    /// Start `app_name` with the registry's default policy.
    pub fn start_app(&self, app_name: &str) -> Arc<ConnectionAuthenticator> {
        self.start_app_with_policy(app_name, self.policy.clone())
    }

    pub fn start_app_with_policy(
        &self,
        app_name: &str,
        policy: AuthPolicy,
    ) -> Arc<ConnectionAuthenticator> {
        let context = AppContext::new(self.vhost_home.clone(), app_name);
        let authenticator = Arc::new(ConnectionAuthenticator::start(context, policy));

        if let Some(previous) = self
            .apps
            .insert(app_name.to_string(), authenticator.clone())
        {
            info!("Application {} restarted, replacing previous instance", app_name);
            previous.stop();
        }
        authenticator
    }

    /// Stop an application and drop its credentials. Returns false if it was not running.
    pub fn stop_app(&self, app_name: &str) -> bool {
        match self.apps.remove(app_name) {
            Some((_, authenticator)) => {
                authenticator.stop();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, app_name: &str) -> Option<Arc<ConnectionAuthenticator>> {
        self.apps.get(app_name).map(|entry| entry.value().clone())
    }

    /// Running application names, sorted.
    pub fn app_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.apps.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}
