use tracing::debug;

use crate::cluster::Cluster;
use crate::context::Selection;
use crate::error::{FetchFailure, Result, WorkloadError};
use crate::workload::{WorkloadDescriptor, WorkloadKind};

/// Resolve `selection` to descriptors of the current live state.
///
/// Explicit names are all fetched before failing, so every missing or
/// unreadable workload is reported at once. A listing failure aborts
/// immediately.
pub async fn select<C>(
    cluster: &C,
    namespace: &str,
    selection: &Selection,
) -> Result<Vec<WorkloadDescriptor>>
where
    C: Cluster + ?Sized,
{
    match selection {
        Selection::Named { kind, names } => {
            fetch_named(cluster, namespace, *kind, names).await
        }
        Selection::AllKinds => list_all(cluster, namespace).await,
    }
}

async fn fetch_named<C>(
    cluster: &C,
    namespace: &str,
    kind: WorkloadKind,
    names: &[String],
) -> Result<Vec<WorkloadDescriptor>>
where
    C: Cluster + ?Sized,
{
    let mut found = Vec::with_capacity(names.len());
    let mut failures = Vec::new();
    for name in names {
        match cluster.get_workload(namespace, kind, name).await {
            Ok(w) => found.push(w.descriptor()),
            Err(source) => failures.push(FetchFailure {
                kind,
                name: name.clone(),
                source,
            }),
        }
    }
    if !failures.is_empty() {
        return Err(WorkloadError::Fetch(failures));
    }
    Ok(found)
}

async fn list_all<C>(
    cluster: &C,
    namespace: &str,
) -> Result<Vec<WorkloadDescriptor>>
where
    C: Cluster + ?Sized,
{
    let mut found = Vec::new();
    for kind in WorkloadKind::ALL {
        let items = cluster
            .list_workloads(namespace, kind)
            .await
            .map_err(|source| WorkloadError::List { kind, source })?;
        debug!(%kind, count = items.len(), "selected all");
        found.extend(items.iter().map(|w| w.descriptor()));
    }
    Ok(found)
}
