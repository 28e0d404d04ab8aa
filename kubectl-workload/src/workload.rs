use std::fmt;
use std::str::FromStr;

use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use kube::ResourceExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Replica count the API server assumes when `spec.replicas` is unset.
pub const DEFAULT_REPLICAS: i32 = 1;

/// The closed set of scalable resource kinds handled by the plugin.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
}

impl WorkloadKind {
    pub const ALL: [WorkloadKind; 2] =
        [WorkloadKind::Deployment, WorkloadKind::StatefulSet];

    /// Canonical lower-case token, also used in snapshot keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "deployment",
            WorkloadKind::StatefulSet => "statefulset",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unsupported kind '{}'. Supported kinds are deployment and statefulset",
            self.0
        )
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for WorkloadKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deployment" | "deploy" => Ok(WorkloadKind::Deployment),
            "statefulset" | "sts" => Ok(WorkloadKind::StatefulSet),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

/// Observed or desired replica count of one workload.
///
/// Serialized as `{"name": .., "scale": .., "kind": ..}` inside the snapshot
/// record.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WorkloadDescriptor {
    pub name: String,
    pub scale: i64,
    pub kind: WorkloadKind,
}

impl WorkloadDescriptor {
    pub fn new(
        kind: WorkloadKind,
        name: impl Into<String>,
        scale: i64,
    ) -> Self {
        Self {
            name: name.into(),
            scale,
            kind,
        }
    }
}

/// Uniform replica accessor for the typed resources behind [`Workload`].
pub trait Scalable {
    fn workload_name(&self) -> String;
    /// `None` when `spec` or `spec.replicas` is not set.
    fn replicas(&self) -> Option<i32>;
    fn set_replicas(&mut self, replicas: i32);
}

impl Scalable for Deployment {
    fn workload_name(&self) -> String {
        self.name_any()
    }

    fn replicas(&self) -> Option<i32> {
        self.spec.as_ref().and_then(|s| s.replicas)
    }

    fn set_replicas(&mut self, replicas: i32) {
        self.spec.get_or_insert_with(Default::default).replicas =
            Some(replicas);
    }
}

impl Scalable for StatefulSet {
    fn workload_name(&self) -> String {
        self.name_any()
    }

    fn replicas(&self) -> Option<i32> {
        self.spec.as_ref().and_then(|s| s.replicas)
    }

    fn set_replicas(&mut self, replicas: i32) {
        self.spec.get_or_insert_with(Default::default).replicas =
            Some(replicas);
    }
}

/// A live workload object as returned by the orchestration API.
#[derive(Clone, Debug)]
pub enum Workload {
    Deployment(Deployment),
    StatefulSet(StatefulSet),
}

impl Workload {
    pub fn kind(&self) -> WorkloadKind {
        match self {
            Workload::Deployment(_) => WorkloadKind::Deployment,
            Workload::StatefulSet(_) => WorkloadKind::StatefulSet,
        }
    }

    fn scalable(&self) -> &dyn Scalable {
        match self {
            Workload::Deployment(d) => d,
            Workload::StatefulSet(s) => s,
        }
    }

    fn scalable_mut(&mut self) -> &mut dyn Scalable {
        match self {
            Workload::Deployment(d) => d,
            Workload::StatefulSet(s) => s,
        }
    }

    pub fn name(&self) -> String {
        self.scalable().workload_name()
    }

    pub fn replicas(&self) -> Option<i32> {
        self.scalable().replicas()
    }

    pub fn set_replicas(&mut self, replicas: i32) {
        self.scalable_mut().set_replicas(replicas)
    }

    /// Snapshot of the current live state.
    pub fn descriptor(&self) -> WorkloadDescriptor {
        let name = self.name();
        let scale = match self.replicas() {
            Some(r) => r,
            None => {
                debug!(
                    kind = %self.kind(),
                    %name,
                    "spec.replicas not set, assuming default"
                );
                DEFAULT_REPLICAS
            }
        };
        WorkloadDescriptor::new(self.kind(), name, scale as i64)
    }
}

impl From<Deployment> for Workload {
    fn from(d: Deployment) -> Self {
        Workload::Deployment(d)
    }
}

impl From<StatefulSet> for Workload {
    fn from(s: StatefulSet) -> Self {
        Workload::StatefulSet(s)
    }
}
