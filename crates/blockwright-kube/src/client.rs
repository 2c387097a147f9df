//! Cluster resource client
//!
//! All cluster access goes through [`ClusterClient`], which works on untyped
//! JSON documents addressed by group/version/resource. The production
//! implementation wraps a `kube::Client` with the dynamic API; tests use
//! [`MockClusterClient`](crate::mock::MockClusterClient).

use async_trait::async_trait;
use blockwright_core::{ClusterInfo, GroupVersionResource};
use humantime_serde::re::humantime;
use kube::Client;
use kube::api::{Api, DynamicObject, ListParams, PostParams};
use kube::config::{Config, KubeConfigOptions, Kubeconfig};
use kube::discovery::ApiResource;
use serde_json::Value as JsonValue;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{KubeError, Result};

/// Default timeout for a single API request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Async access to cluster resources
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// List resources, across all namespaces when `namespace` is `None`
    async fn list(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
    ) -> Result<Vec<JsonValue>>;

    /// Get a single resource; `namespace` is `None` for cluster-scoped kinds
    async fn get(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<JsonValue>;

    /// Create a resource and return the stored document
    async fn create(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
        document: &JsonValue,
    ) -> Result<JsonValue>;

    /// Connection details for response metadata
    fn cluster_info(&self) -> ClusterInfo;

    /// Name of the active kubeconfig context
    fn current_context(&self) -> String;
}

/// How to reach the cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSettings {
    /// Explicit kubeconfig path; default discovery when `None`
    pub kubeconfig: Option<PathBuf>,

    /// Context override
    pub context: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            context: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// [`ClusterClient`] backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeClusterClient {
    client: Client,
    context: String,
    server: String,
    timeout: Duration,
}

impl KubeClusterClient {
    /// Connect using a kubeconfig, falling back to in-cluster configuration
    ///
    /// The in-cluster fallback only applies when no kubeconfig path was given
    /// and none could be discovered.
    pub async fn connect(settings: &ClusterSettings) -> Result<Self> {
        let options = KubeConfigOptions {
            context: settings.context.clone(),
            ..Default::default()
        };

        let kubeconfig = match &settings.kubeconfig {
            Some(path) => Some(Kubeconfig::read_from(path).map_err(|e| {
                KubeError::InvalidConfig(format!(
                    "failed to read kubeconfig {}: {}",
                    path.display(),
                    e
                ))
            })?),
            None => match Kubeconfig::read() {
                Ok(kubeconfig) => Some(kubeconfig),
                Err(e) => {
                    tracing::debug!(error = %e, "No kubeconfig found, trying in-cluster configuration");
                    None
                }
            },
        };

        let (mut config, context) = match kubeconfig {
            Some(kubeconfig) => {
                let context = settings
                    .context
                    .clone()
                    .or_else(|| kubeconfig.current_context.clone())
                    .unwrap_or_default();
                let config = Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| KubeError::InvalidConfig(e.to_string()))?;
                (config, context)
            }
            None => {
                let config = Config::incluster().map_err(|e| {
                    KubeError::InvalidConfig(format!(
                        "no kubeconfig available and not running in a cluster: {}",
                        e
                    ))
                })?;
                (config, "in-cluster".to_string())
            }
        };

        config.read_timeout = Some(settings.timeout);
        config.connect_timeout = Some(settings.timeout);
        let server = config.cluster_url.to_string();

        let client = Client::try_from(config)?;

        tracing::info!(context = %context, server = %server, "Connected to cluster");

        Ok(Self {
            client,
            context,
            server,
            timeout: settings.timeout,
        })
    }

    /// Create with an existing Kubernetes client
    pub fn with_client(
        client: Client,
        context: impl Into<String>,
        server: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            context: context.into(),
            server: server.into(),
            timeout,
        }
    }

    /// Get the underlying Kubernetes client
    pub fn kube_client(&self) -> &Client {
        &self.client
    }

    fn api(&self, gvr: &GroupVersionResource, namespace: Option<&str>) -> Api<DynamicObject> {
        let resource = api_resource(gvr);
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &resource),
            None => Api::all_with(self.client.clone(), &resource),
        }
    }

    /// Run a request under the configured timeout
    async fn bounded<T, F>(&self, request: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, kube::Error>>,
    {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result.map_err(KubeError::Api),
            Err(_) => Err(KubeError::Timeout(
                humantime::format_duration(self.timeout).to_string(),
            )),
        }
    }
}

/// Dynamic API resource for a GVR
///
/// The kind is left empty; the API path only needs the plural.
fn api_resource(gvr: &GroupVersionResource) -> ApiResource {
    ApiResource {
        group: gvr.group.clone(),
        version: gvr.version.clone(),
        api_version: gvr.api_version(),
        kind: String::new(),
        plural: gvr.resource.clone(),
    }
}

/// Typed view of a rendered resource document
fn dynamic_object(document: &JsonValue) -> Result<DynamicObject> {
    Ok(serde_json::from_value(document.clone())?)
}

fn classify(err: KubeError, gvr: &GroupVersionResource, name: &str, namespace: Option<&str>) -> KubeError {
    match err {
        KubeError::Api(api) => KubeError::from_api(api, gvr.resource.clone(), name, namespace),
        other => other,
    }
}

#[async_trait]
impl ClusterClient for KubeClusterClient {
    async fn list(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
    ) -> Result<Vec<JsonValue>> {
        tracing::debug!(gvr = %gvr, namespace = ?namespace, "Listing resources");

        let api = self.api(gvr, namespace);
        let list = self
            .bounded(api.list(&ListParams::default()))
            .await
            .map_err(|e| classify(e, gvr, "", namespace))?;

        list.items
            .into_iter()
            .map(|obj| serde_json::to_value(obj).map_err(KubeError::from))
            .collect()
    }

    async fn get(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<JsonValue> {
        tracing::debug!(gvr = %gvr, namespace = ?namespace, name = %name, "Getting resource");

        let api = self.api(gvr, namespace);
        let obj = self
            .bounded(api.get(name))
            .await
            .map_err(|e| classify(e, gvr, name, namespace))?;

        Ok(serde_json::to_value(obj)?)
    }

    async fn create(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
        document: &JsonValue,
    ) -> Result<JsonValue> {
        let obj = dynamic_object(document)?;
        let name = obj.metadata.name.clone().unwrap_or_default();

        tracing::debug!(gvr = %gvr, namespace = ?namespace, name = %name, "Creating resource");

        let api = self.api(gvr, namespace);
        let created = self
            .bounded(api.create(&PostParams::default(), &obj))
            .await
            .map_err(|e| classify(e, gvr, &name, namespace))?;

        Ok(serde_json::to_value(created)?)
    }

    fn cluster_info(&self) -> ClusterInfo {
        ClusterInfo {
            context: self.context.clone(),
            server: self.server.clone(),
            timeout: humantime::format_duration(self.timeout).to_string(),
        }
    }

    fn current_context(&self) -> String {
        self.context.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_resource_from_gvr() {
        let gvr = GroupVersionResource::new("platform.kratix.io", "v1alpha1", "promises");
        let resource = api_resource(&gvr);

        assert_eq!(resource.api_version, "platform.kratix.io/v1alpha1");
        assert_eq!(resource.plural, "promises");
        assert!(resource.kind.is_empty());
    }

    #[test]
    fn test_default_settings() {
        let settings = ClusterSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.kubeconfig.is_none());
        assert!(settings.context.is_none());
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let config = Config::new("http://127.0.0.1:9".parse().unwrap());
        let client = Client::try_from(config).unwrap();
        let cluster =
            KubeClusterClient::with_client(client, "test", "http://127.0.0.1:9", Duration::from_millis(20));

        let err = cluster
            .bounded(std::future::pending::<std::result::Result<(), kube::Error>>())
            .await
            .unwrap_err();
        assert!(matches!(err, KubeError::Timeout(_)));
        assert_eq!(err.to_string(), "operation timed out after 20ms");
    }

    #[test]
    fn test_dynamic_object_keeps_document() {
        let document = serde_json::json!({
            "apiVersion": "promise.platform.giantswarm.io/v1beta1",
            "kind": "GitHubRepo",
            "metadata": { "name": "payments", "namespace": "team-a" },
            "spec": {
                "owner": "giantswarm",
                "visibility": "private",
                "topics": ["payments", "backend"]
            }
        });

        let obj = dynamic_object(&document).unwrap();
        assert_eq!(obj.metadata.name.as_deref(), Some("payments"));
        assert_eq!(obj.metadata.namespace.as_deref(), Some("team-a"));

        let sent = serde_json::to_value(&obj).unwrap();
        assert_eq!(sent["apiVersion"], document["apiVersion"]);
        assert_eq!(sent["kind"], document["kind"]);
        assert_eq!(sent["spec"], document["spec"]);
    }

    #[tokio::test]
    async fn test_connect_missing_kubeconfig() {
        let settings = ClusterSettings {
            kubeconfig: Some(PathBuf::from("/nonexistent/blockwright/kubeconfig")),
            ..Default::default()
        };

        let err = KubeClusterClient::connect(&settings).await.err().unwrap();
        assert!(matches!(err, KubeError::InvalidConfig(_)));
        assert!(err.to_string().contains("/nonexistent/blockwright/kubeconfig"));
    }
}
