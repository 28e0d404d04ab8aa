use serde::Serialize;
use tracing::{info, instrument};

use crate::cluster::Cluster;
use crate::context::{Action, WorkloadContext};
use crate::error::{ApiError, Result, WorkloadError};
use crate::selector::select;
use crate::snapshot::{SnapshotStore, encode_entries, saved_scale};
use crate::workload::{WorkloadDescriptor, WorkloadKind};

/// Replica change applied to one live workload.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ScaleChange {
    pub name: String,
    pub kind: WorkloadKind,
    pub from: Option<i64>,
    pub to: i64,
}

/// Result of a completed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Listed(Vec<WorkloadDescriptor>),
    Stopped(Vec<ScaleChange>),
    Started(Vec<ScaleChange>),
}

/// Select the targets of `ctx` and apply its action to them.
pub async fn execute<C>(ctx: &WorkloadContext<C>) -> Result<Outcome>
where
    C: Cluster,
{
    let targets = select(&ctx.cluster, &ctx.namespace, &ctx.selection).await?;
    dispatch(ctx, targets).await
}

pub async fn dispatch<C>(
    ctx: &WorkloadContext<C>,
    targets: Vec<WorkloadDescriptor>,
) -> Result<Outcome>
where
    C: Cluster,
{
    match ctx.action {
        Action::List => Ok(Outcome::Listed(targets)),
        Action::Stop => stop(ctx, &targets).await.map(Outcome::Stopped),
        Action::Start => start(ctx, &targets).await.map(Outcome::Started),
    }
}

/// Record the current scales, then zero every target.
///
/// Nothing is scaled unless the snapshot write succeeded.
#[instrument(level = "debug", skip_all, fields(ns = %ctx.namespace, count = targets.len()))]
async fn stop<C>(
    ctx: &WorkloadContext<C>,
    targets: &[WorkloadDescriptor],
) -> Result<Vec<ScaleChange>>
where
    C: Cluster,
{
    if targets.is_empty() {
        return Ok(Vec::new());
    }
    let store = SnapshotStore::new(&ctx.cluster, &ctx.namespace);
    store.merge(encode_entries(targets)?).await?;

    let mut changes = Vec::with_capacity(targets.len());
    for t in targets {
        changes.push(apply_scale(ctx, t.kind, &t.name, 0).await?);
    }
    Ok(changes)
}

/// Restore the saved scale of every target.
///
/// All saved scales are resolved and range-checked before the first workload
/// is touched, so a single bad entry leaves every live object unchanged.
#[instrument(level = "debug", skip_all, fields(ns = %ctx.namespace, count = targets.len()))]
async fn start<C>(
    ctx: &WorkloadContext<C>,
    targets: &[WorkloadDescriptor],
) -> Result<Vec<ScaleChange>>
where
    C: Cluster,
{
    if targets.is_empty() {
        return Ok(Vec::new());
    }
    let entries = SnapshotStore::new(&ctx.cluster, &ctx.namespace).get().await?;
    let plan = targets
        .iter()
        .map(|t| saved_scale(&entries, t.kind, &t.name).map(|s| (t, s)))
        .collect::<Result<Vec<_>>>()?;

    let mut changes = Vec::with_capacity(plan.len());
    for (t, scale) in plan {
        changes.push(apply_scale(ctx, t.kind, &t.name, scale).await?);
    }
    Ok(changes)
}

/// Read-modify-write of `spec.replicas` on one live workload.
async fn apply_scale<C>(
    ctx: &WorkloadContext<C>,
    kind: WorkloadKind,
    name: &str,
    scale: i64,
) -> Result<ScaleChange>
where
    C: Cluster,
{
    let scale_err = |source: ApiError| WorkloadError::Scale {
        kind,
        name: name.to_string(),
        source,
    };
    let replicas = i32::try_from(scale).map_err(|_| {
        scale_err(ApiError::other(format!("scale {scale} is out of range")))
    })?;

    let mut live = ctx
        .cluster
        .get_workload(&ctx.namespace, kind, name)
        .await
        .map_err(scale_err)?;
    let from = live.replicas().map(i64::from);
    live.set_replicas(replicas);
    ctx.cluster
        .update_workload(&ctx.namespace, &live)
        .await
        .map_err(scale_err)?;

    info!(ns = %ctx.namespace, %kind, %name, ?from, to = scale, "scaled");
    Ok(ScaleChange {
        name: name.to_string(),
        kind,
        from,
        to: scale,
    })
}
