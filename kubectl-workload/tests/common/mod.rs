#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{
    Deployment, DeploymentSpec, StatefulSet, StatefulSetSpec,
};
use k8s_openapi::api::core::v1::ConfigMap;
use kube::core::ObjectMeta;

use kubectl_workload::cluster::Cluster;
use kubectl_workload::context::{Action, Selection, WorkloadContext};
use kubectl_workload::error::ApiError;
use kubectl_workload::snapshot::SNAPSHOT_RECORD_NAME;
use kubectl_workload::workload::{Workload, WorkloadKind};

pub const NS: &str = "default";

/// Every call a [`FakeCluster`] received, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    List(WorkloadKind),
    Get(WorkloadKind, String),
    Update(WorkloadKind, String),
    GetConfigMap(String),
    CreateConfigMap(String),
    ReplaceConfigMap(String),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::Update(..) | Call::CreateConfigMap(_) | Call::ReplaceConfigMap(_)
        )
    }
}

/// Injected failures.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Fault {
    List(WorkloadKind),
    Get(WorkloadKind, String),
    Update(WorkloadKind, String),
    ReadConfigMap,
    CreateConfigMap,
    ReplaceConfigMap,
    /// Create reports AlreadyExists after another writer created the record.
    CreateRace,
}

#[derive(Default)]
struct State {
    workloads: Vec<(String, Workload)>,
    config_maps: BTreeMap<(String, String), ConfigMap>,
    calls: Vec<Call>,
    faults: HashSet<Fault>,
}

/// In-memory cluster keeping objects in insertion (list) order.
#[derive(Default)]
pub struct FakeCluster {
    state: Mutex<State>,
}

fn meta(ns: &str, name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(ns.to_string()),
        resource_version: Some("1".to_string()),
        ..Default::default()
    }
}

pub fn deployment(ns: &str, name: &str, replicas: Option<i32>) -> Workload {
    Workload::Deployment(Deployment {
        metadata: meta(ns, name),
        spec: Some(DeploymentSpec {
            replicas,
            ..Default::default()
        }),
        ..Default::default()
    })
}

pub fn statefulset(ns: &str, name: &str, replicas: Option<i32>) -> Workload {
    Workload::StatefulSet(StatefulSet {
        metadata: meta(ns, name),
        spec: Some(StatefulSetSpec {
            replicas,
            ..Default::default()
        }),
        ..Default::default()
    })
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workload(self, ns: &str, workload: Workload) -> Self {
        self.state
            .lock()
            .unwrap()
            .workloads
            .push((ns.to_string(), workload));
        self
    }

    pub fn with_deployment(self, name: &str, replicas: i32) -> Self {
        self.with_workload(NS, deployment(NS, name, Some(replicas)))
    }

    pub fn with_statefulset(self, name: &str, replicas: i32) -> Self {
        self.with_workload(NS, statefulset(NS, name, Some(replicas)))
    }

    pub fn with_snapshot(self, ns: &str, entries: &[(&str, &str)]) -> Self {
        let data = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.state.lock().unwrap().config_maps.insert(
            (ns.to_string(), SNAPSHOT_RECORD_NAME.to_string()),
            ConfigMap {
                metadata: meta(ns, SNAPSHOT_RECORD_NAME),
                data: Some(data),
                ..Default::default()
            },
        );
        self
    }

    pub fn fail(&self, fault: Fault) {
        self.state.lock().unwrap().faults.insert(fault);
    }

    pub fn heal(&self, fault: &Fault) {
        self.state.lock().unwrap().faults.remove(fault);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn replicas(&self, kind: WorkloadKind, name: &str) -> Option<i32> {
        self.replicas_in(NS, kind, name)
    }

    pub fn replicas_in(
        &self,
        ns: &str,
        kind: WorkloadKind,
        name: &str,
    ) -> Option<i32> {
        let state = self.state.lock().unwrap();
        state
            .workloads
            .iter()
            .find(|(n, w)| n == ns && w.kind() == kind && w.name() == name)
            .and_then(|(_, w)| w.replicas())
    }

    /// Entries of the snapshot record, `None` when it does not exist.
    pub fn snapshot(&self) -> Option<BTreeMap<String, String>> {
        self.snapshot_in(NS)
    }

    pub fn snapshot_in(&self, ns: &str) -> Option<BTreeMap<String, String>> {
        self.state
            .lock()
            .unwrap()
            .config_maps
            .get(&(ns.to_string(), SNAPSHOT_RECORD_NAME.to_string()))
            .map(|cm| cm.data.clone().unwrap_or_default())
    }

    pub fn snapshot_record(&self) -> Option<ConfigMap> {
        self.state
            .lock()
            .unwrap()
            .config_maps
            .get(&(NS.to_string(), SNAPSHOT_RECORD_NAME.to_string()))
            .cloned()
    }

    pub fn context(
        self,
        action: Action,
        selection: Selection,
    ) -> WorkloadContext<FakeCluster> {
        WorkloadContext::new(self, NS, action, selection)
    }
}

fn injected(what: &str) -> ApiError {
    ApiError::other(format!("injected failure: {what}"))
}

#[async_trait]
impl Cluster for FakeCluster {
    async fn list_workloads(
        &self,
        ns: &str,
        kind: WorkloadKind,
    ) -> Result<Vec<Workload>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List(kind));
        if state.faults.contains(&Fault::List(kind)) {
            return Err(injected("list"));
        }
        Ok(state
            .workloads
            .iter()
            .filter(|(n, w)| n == ns && w.kind() == kind)
            .map(|(_, w)| w.clone())
            .collect())
    }

    async fn get_workload(
        &self,
        ns: &str,
        kind: WorkloadKind,
        name: &str,
    ) -> Result<Workload, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Get(kind, name.to_string()));
        if state.faults.contains(&Fault::Get(kind, name.to_string())) {
            return Err(injected("get"));
        }
        state
            .workloads
            .iter()
            .find(|(n, w)| n == ns && w.kind() == kind && w.name() == name)
            .map(|(_, w)| w.clone())
            .ok_or_else(|| ApiError::not_found(kind.as_str(), name))
    }

    async fn update_workload(
        &self,
        ns: &str,
        workload: &Workload,
    ) -> Result<Workload, ApiError> {
        let kind = workload.kind();
        let name = workload.name();
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Update(kind, name.clone()));
        if state.faults.contains(&Fault::Update(kind, name.clone())) {
            return Err(injected("update"));
        }
        let slot = state
            .workloads
            .iter_mut()
            .find(|(n, w)| n == ns && w.kind() == kind && w.name() == name)
            .ok_or_else(|| ApiError::not_found(kind.as_str(), &name))?;
        slot.1 = workload.clone();
        Ok(workload.clone())
    }

    async fn get_config_map(
        &self,
        ns: &str,
        name: &str,
    ) -> Result<Option<ConfigMap>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetConfigMap(name.to_string()));
        if state.faults.contains(&Fault::ReadConfigMap) {
            return Err(injected("get configmap"));
        }
        Ok(state
            .config_maps
            .get(&(ns.to_string(), name.to_string()))
            .cloned())
    }

    async fn create_config_map(
        &self,
        ns: &str,
        cm: &ConfigMap,
    ) -> Result<ConfigMap, ApiError> {
        let name = cm.metadata.name.clone().unwrap_or_default();
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateConfigMap(name.clone()));
        if state.faults.contains(&Fault::CreateConfigMap) {
            return Err(injected("create configmap"));
        }
        let key = (ns.to_string(), name.clone());
        if state.faults.remove(&Fault::CreateRace) {
            let mut other = cm.clone();
            other.data = Some(BTreeMap::from([(
                "deployment-other".to_string(),
                r#"{"name":"other","scale":7,"kind":"deployment"}"#.to_string(),
            )]));
            state.config_maps.insert(key, other);
            return Err(ApiError::already_exists("configmap", name));
        }
        if state.config_maps.contains_key(&key) {
            return Err(ApiError::already_exists("configmap", name));
        }
        state.config_maps.insert(key, cm.clone());
        Ok(cm.clone())
    }

    async fn replace_config_map(
        &self,
        ns: &str,
        cm: &ConfigMap,
    ) -> Result<ConfigMap, ApiError> {
        let name = cm.metadata.name.clone().unwrap_or_default();
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ReplaceConfigMap(name.clone()));
        if state.faults.contains(&Fault::ReplaceConfigMap) {
            return Err(injected("replace configmap"));
        }
        let key = (ns.to_string(), name.clone());
        if !state.config_maps.contains_key(&key) {
            return Err(ApiError::not_found("configmap", name));
        }
        state.config_maps.insert(key, cm.clone());
        Ok(cm.clone())
    }
}
