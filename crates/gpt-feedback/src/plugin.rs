//! Plugin facade.
//!
//! [`PluginBuilder`] wires the persisted stores and the host-provided
//! collaborators into a ready [`Plugin`]. The host hands each feedback
//! event to [`Plugin::handle_event`] and gets a [`SyncOutcome`] back;
//! everything else (settings, state, retries) happens inside.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use feedback_completion::{CompletionBackend, CompletionClient, ReplyGenerator, RetryPolicy};
use feedback_models::{FeedbackEvent, PLUGIN_NAME, PLUGIN_VERSION};
use feedback_persistence::{paths, ConfigStore, ReviewStateStore};
use feedback_sync::{
    FeedbackSynchronizer, OperatorNotifier, OrderStore, PluginHost, ReviewChannel, SyncOutcome,
};

use crate::error::{PluginError, Result};

/// Builder collecting everything the plugin needs before it can run.
///
/// The marketplace-facing collaborators are required up front; the
/// completion backend, retry policy, storage directory, and host
/// capability have working defaults.
pub struct PluginBuilder {
    storage_dir: PathBuf,
    orders: Arc<dyn OrderStore>,
    replies: Arc<dyn ReviewChannel>,
    notifier: Arc<dyn OperatorNotifier>,
    backend: Option<Arc<dyn CompletionBackend>>,
    retry: RetryPolicy,
    host: Option<Arc<dyn PluginHost>>,
}

impl PluginBuilder {
    /// Starts a builder over the default storage directory.
    pub fn new(
        orders: Arc<dyn OrderStore>,
        replies: Arc<dyn ReviewChannel>,
        notifier: Arc<dyn OperatorNotifier>,
    ) -> Self {
        Self {
            storage_dir: paths::storage_dir(),
            orders,
            replies,
            notifier,
            backend: None,
            retry: RetryPolicy::default(),
            host: None,
        }
    }

    /// Overrides the storage directory.
    pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// Replaces the bundled HTTP completion client.
    pub fn backend(mut self, backend: Arc<dyn CompletionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Overrides the generation retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Provides the host's uninstall capability, enabling the settings
    /// UI's delete-plugin flow.
    pub fn host(mut self, host: Arc<dyn PluginHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Opens the stores and wires the synchronizer.
    pub fn build(self) -> Result<Plugin> {
        if !self.storage_dir.exists() {
            std::fs::create_dir_all(&self.storage_dir).map_err(|e| PluginError::StorageDir {
                path: self.storage_dir.clone(),
                source: e,
            })?;
        }

        let config = ConfigStore::open(&self.storage_dir);
        let state = ReviewStateStore::open(&self.storage_dir)?;

        let backend = match self.backend {
            Some(backend) => backend,
            None => Arc::new(CompletionClient::new()?),
        };
        let generator = ReplyGenerator::with_policy(backend, self.retry);

        let synchronizer = FeedbackSynchronizer::new(
            config.clone(),
            state,
            self.orders,
            self.replies,
            self.notifier,
            generator,
        );

        info!(
            name = PLUGIN_NAME,
            version = PLUGIN_VERSION,
            dir = %self.storage_dir.display(),
            "Plugin initialized"
        );

        Ok(Plugin {
            synchronizer,
            config,
            storage_dir: self.storage_dir,
            host: self.host,
        })
    }
}

/// The assembled plugin.
#[derive(Clone)]
pub struct Plugin {
    synchronizer: FeedbackSynchronizer,
    config: ConfigStore,
    storage_dir: PathBuf,
    host: Option<Arc<dyn PluginHost>>,
}

impl Plugin {
    /// Starts a [`PluginBuilder`] with the required collaborators.
    pub fn builder(
        orders: Arc<dyn OrderStore>,
        replies: Arc<dyn ReviewChannel>,
        notifier: Arc<dyn OperatorNotifier>,
    ) -> PluginBuilder {
        PluginBuilder::new(orders, replies, notifier)
    }

    /// Handles one feedback event end to end.
    pub async fn handle_event(&self, event: &FeedbackEvent) -> SyncOutcome {
        self.synchronizer.handle_event(event).await
    }

    /// Handle on the configuration store, for wiring a settings UI over
    /// the same file.
    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// The directory holding the plugin's persisted files.
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// The host capability passed at construction, if any.
    pub fn host(&self) -> Option<Arc<dyn PluginHost>> {
        self.host.clone()
    }
}
