pub mod cluster;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod selector;
pub mod snapshot;
pub mod types;
pub mod workload;

use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

pub use cluster::{Cluster, KubeCluster};
pub use config::PluginEnv;
pub use context::{Action, Selection, WorkloadContext, WorkloadRequest};
pub use dispatch::{Outcome, ScaleChange, execute};
pub use error::{ApiError, WorkloadError};
pub use output::print_outcome;
pub use types::{OutputFormat, WorkloadCli};
pub use workload::{WorkloadDescriptor, WorkloadKind};

pub fn init_tracing(directives: &str) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives);

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Validate the command line, connect to the cluster and run the command.
pub async fn run(cli: WorkloadCli, env: PluginEnv) -> anyhow::Result<()> {
    // usage errors surface before any client is built
    let request = WorkloadRequest::new(
        &cli.namespace,
        cli.all_kinds,
        cli.stop,
        cli.start,
        &cli.targets,
    )?;
    debug!(?request, "validated request");

    let cluster =
        KubeCluster::connect(env.resolve_context(cli.context.as_deref()))
            .await?;
    let ctx = request.into_context(cluster);
    let outcome = execute(&ctx).await?;
    print_outcome(&outcome, &cli.output)?;
    Ok(())
}
