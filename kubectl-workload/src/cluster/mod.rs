mod k8s;

pub use k8s::KubeCluster;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::ConfigMap;

use crate::error::ApiError;
use crate::workload::{Workload, WorkloadKind};

/// The slice of the orchestration API the plugin depends on.
///
/// Every call is awaited to completion before the next one is issued.
#[async_trait]
pub trait Cluster: Send + Sync {
    /// Workloads of `kind` in `ns`, in API list order.
    async fn list_workloads(
        &self,
        ns: &str,
        kind: WorkloadKind,
    ) -> Result<Vec<Workload>, ApiError>;

    async fn get_workload(
        &self,
        ns: &str,
        kind: WorkloadKind,
        name: &str,
    ) -> Result<Workload, ApiError>;

    /// Write back a previously fetched workload.
    async fn update_workload(
        &self,
        ns: &str,
        workload: &Workload,
    ) -> Result<Workload, ApiError>;

    async fn get_config_map(
        &self,
        ns: &str,
        name: &str,
    ) -> Result<Option<ConfigMap>, ApiError>;

    async fn create_config_map(
        &self,
        ns: &str,
        cm: &ConfigMap,
    ) -> Result<ConfigMap, ApiError>;

    async fn replace_config_map(
        &self,
        ns: &str,
        cm: &ConfigMap,
    ) -> Result<ConfigMap, ApiError>;
}
