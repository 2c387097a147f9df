//! Subcommand implementations

pub mod call;
pub mod create;
pub mod describe;
pub mod list;
pub mod resources;
pub mod tools;
pub mod validate;

use blockwright_kube::{ClusterClient, KubeClusterClient, ToolRouter};
use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;

/// Connected router plus output preferences, shared by cluster commands
pub struct Context<C: ClusterClient> {
    pub router: ToolRouter<C>,
    pub json: bool,
}

impl<C: ClusterClient> Context<C> {
    pub fn new(client: Arc<C>, settings: &Settings) -> Self {
        Self {
            router: ToolRouter::new(client, settings.sanitizer()),
            json: settings.json,
        }
    }
}

impl Context<KubeClusterClient> {
    /// Connect to the cluster named by the settings
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let client = KubeClusterClient::connect(&settings.cluster).await?;
        tracing::debug!(context = %client.current_context(), "Connected to cluster");
        Ok(Self::new(Arc::new(client), settings))
    }
}
