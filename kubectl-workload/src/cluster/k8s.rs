use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{
    Client, Config,
    api::{Api, ListParams, PostParams},
    config::KubeConfigOptions,
};
use tracing::{debug, instrument};

use super::Cluster;
use crate::error::ApiError;
use crate::workload::{Workload, WorkloadKind};

/// [`Cluster`] backed by a live Kubernetes API server.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the kubeconfig (or in-cluster env), optionally
    /// pinned to a named kubeconfig context.
    pub async fn connect(context: Option<&str>) -> anyhow::Result<Self> {
        let client = match context {
            Some(ctx) => {
                let options = KubeConfigOptions {
                    context: Some(ctx.to_string()),
                    ..Default::default()
                };
                let config = Config::from_kubeconfig(&options).await?;
                Client::try_from(config)?
            }
            None => Client::try_default().await?,
        };
        Ok(Self::new(client))
    }

    fn deployments(&self, ns: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), ns)
    }

    fn statefulsets(&self, ns: &str) -> Api<StatefulSet> {
        Api::namespaced(self.client.clone(), ns)
    }

    fn config_maps(&self, ns: &str) -> Api<ConfigMap> {
        Api::namespaced(self.client.clone(), ns)
    }
}

fn map_create_err(kind: &str, name: &str, e: kube::Error) -> ApiError {
    if let kube::Error::Api(ae) = &e {
        if ae.code == 409 {
            return ApiError::already_exists(kind, name);
        }
    }
    ApiError::Kube(e)
}

#[async_trait]
impl Cluster for KubeCluster {
    #[instrument(level = "debug", skip(self))]
    async fn list_workloads(
        &self,
        ns: &str,
        kind: WorkloadKind,
    ) -> Result<Vec<Workload>, ApiError> {
        let lp = ListParams::default();
        let items: Vec<Workload> = match kind {
            WorkloadKind::Deployment => self
                .deployments(ns)
                .list(&lp)
                .await?
                .items
                .into_iter()
                .map(Workload::from)
                .collect(),
            WorkloadKind::StatefulSet => self
                .statefulsets(ns)
                .list(&lp)
                .await?
                .items
                .into_iter()
                .map(Workload::from)
                .collect(),
        };
        debug!(count = items.len(), "listed workloads");
        Ok(items)
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_workload(
        &self,
        ns: &str,
        kind: WorkloadKind,
        name: &str,
    ) -> Result<Workload, ApiError> {
        let found = match kind {
            WorkloadKind::Deployment => {
                self.deployments(ns).get_opt(name).await?.map(Workload::from)
            }
            WorkloadKind::StatefulSet => {
                self.statefulsets(ns).get_opt(name).await?.map(Workload::from)
            }
        };
        found.ok_or_else(|| ApiError::not_found(kind.as_str(), name))
    }

    #[instrument(level = "debug", skip(self, workload), fields(kind = %workload.kind(), name = %workload.name()))]
    async fn update_workload(
        &self,
        ns: &str,
        workload: &Workload,
    ) -> Result<Workload, ApiError> {
        let pp = PostParams::default();
        let name = workload.name();
        // unconditional update: the last writer wins
        let updated: Workload = match workload.clone() {
            Workload::Deployment(mut d) => {
                d.metadata.resource_version = None;
                self.deployments(ns).replace(&name, &pp, &d).await?.into()
            }
            Workload::StatefulSet(mut s) => {
                s.metadata.resource_version = None;
                self.statefulsets(ns).replace(&name, &pp, &s).await?.into()
            }
        };
        Ok(updated)
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_config_map(
        &self,
        ns: &str,
        name: &str,
    ) -> Result<Option<ConfigMap>, ApiError> {
        Ok(self.config_maps(ns).get_opt(name).await?)
    }

    #[instrument(level = "debug", skip(self, cm), fields(name = ?cm.metadata.name))]
    async fn create_config_map(
        &self,
        ns: &str,
        cm: &ConfigMap,
    ) -> Result<ConfigMap, ApiError> {
        let name = cm.metadata.name.clone().unwrap_or_default();
        self.config_maps(ns)
            .create(&PostParams::default(), cm)
            .await
            .map_err(|e| map_create_err("configmap", &name, e))
    }

    #[instrument(level = "debug", skip(self, cm), fields(name = ?cm.metadata.name))]
    async fn replace_config_map(
        &self,
        ns: &str,
        cm: &ConfigMap,
    ) -> Result<ConfigMap, ApiError> {
        let name = cm.metadata.name.clone().unwrap_or_default();
        let mut cm = cm.clone();
        cm.metadata.resource_version = None;
        let replaced = self
            .config_maps(ns)
            .replace(&name, &PostParams::default(), &cm)
            .await?;
        Ok(replaced)
    }
}
