use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::ConfigMap;
use kube::core::ObjectMeta;
use tracing::{debug, info};

use crate::cluster::Cluster;
use crate::error::{ApiError, Result, WorkloadError};
use crate::workload::{WorkloadDescriptor, WorkloadKind};

/// Name of the per-namespace ConfigMap holding saved scales.
pub const SNAPSHOT_RECORD_NAME: &str = "snap-backup";

pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";
pub const MANAGED_BY_VALUE: &str = "kubectl-workload";

/// Composite key of a workload inside the snapshot record.
pub fn snapshot_key(kind: WorkloadKind, name: &str) -> String {
    format!("{}-{}", kind.as_str(), name)
}

/// Encode descriptors as snapshot record entries.
pub fn encode_entries(
    descriptors: &[WorkloadDescriptor],
) -> Result<BTreeMap<String, String>> {
    let mut entries = BTreeMap::new();
    for d in descriptors {
        let key = snapshot_key(d.kind, &d.name);
        let value = serde_json::to_string(d).map_err(|source| {
            WorkloadError::CorruptSnapshot {
                key: key.clone(),
                source,
            }
        })?;
        entries.insert(key, value);
    }
    Ok(entries)
}

fn empty_record() -> ConfigMap {
    ConfigMap {
        metadata: ObjectMeta {
            name: Some(SNAPSHOT_RECORD_NAME.to_string()),
            labels: Some(BTreeMap::from([(
                MANAGED_BY_LABEL.to_string(),
                MANAGED_BY_VALUE.to_string(),
            )])),
            ..Default::default()
        },
        data: Some(BTreeMap::new()),
        ..Default::default()
    }
}

/// Accessor for the snapshot record of one namespace.
///
/// Reads and merges are plain read-modify-write round-trips; two concurrent
/// invocations may lose one side's entries.
pub struct SnapshotStore<'a, C: ?Sized> {
    cluster: &'a C,
    namespace: &'a str,
}

impl<'a, C> SnapshotStore<'a, C>
where
    C: Cluster + ?Sized,
{
    pub fn new(cluster: &'a C, namespace: &'a str) -> Self {
        Self { cluster, namespace }
    }

    fn api_err(&self, source: ApiError) -> WorkloadError {
        WorkloadError::Snapshot {
            namespace: self.namespace.to_string(),
            source,
        }
    }

    /// Fetch the record, creating an empty one when absent.
    async fn load(&self) -> Result<ConfigMap> {
        let existing = self
            .cluster
            .get_config_map(self.namespace, SNAPSHOT_RECORD_NAME)
            .await
            .map_err(|e| self.api_err(e))?;
        if let Some(cm) = existing {
            return Ok(cm);
        }

        debug!(ns = %self.namespace, "creating snapshot record");
        match self
            .cluster
            .create_config_map(self.namespace, &empty_record())
            .await
        {
            Ok(cm) => Ok(cm),
            Err(ApiError::AlreadyExists { .. }) => self
                .cluster
                .get_config_map(self.namespace, SNAPSHOT_RECORD_NAME)
                .await
                .map_err(|e| self.api_err(e))?
                .ok_or_else(|| {
                    self.api_err(ApiError::not_found(
                        "configmap",
                        SNAPSHOT_RECORD_NAME,
                    ))
                }),
            Err(e) => Err(self.api_err(e)),
        }
    }

    /// Current entries of the record. A missing record reads as empty.
    pub async fn get(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.load().await?.data.unwrap_or_default())
    }

    /// Overlay `updates` onto the stored entries and write the result back.
    pub async fn merge(&self, updates: BTreeMap<String, String>) -> Result<()> {
        let mut cm = self.load().await?;
        let count = updates.len();
        cm.data.get_or_insert_with(BTreeMap::new).extend(updates);
        self.cluster
            .replace_config_map(self.namespace, &cm)
            .await
            .map_err(|e| self.api_err(e))?;
        info!(ns = %self.namespace, entries = count, "snapshot record updated");
        Ok(())
    }
}

/// Saved scale of the `(kind, name)` workload within fetched record entries.
///
/// The scale must fit a replica count, `0..=i32::MAX`.
pub fn saved_scale(
    entries: &BTreeMap<String, String>,
    kind: WorkloadKind,
    name: &str,
) -> Result<i64> {
    let key = snapshot_key(kind, name);
    let raw = entries
        .get(&key)
        .ok_or_else(|| WorkloadError::MissingSnapshot {
            kind,
            name: name.to_string(),
        })?;
    let saved: WorkloadDescriptor =
        serde_json::from_str(raw).map_err(|source| {
            WorkloadError::CorruptSnapshot {
                key: key.clone(),
                source,
            }
        })?;
    if !(0..=i64::from(i32::MAX)).contains(&saved.scale) {
        return Err(WorkloadError::InvalidScale {
            key,
            scale: saved.scale,
        });
    }
    Ok(saved.scale)
}
