const LONG_ABOUT: &str = "\
The plugin interacts with the k8s api to generate a list of workloads in the
specified namespace. k8s has no concept of stopping / starting workloads.
A stop saves the current scale of each workload in the snap-backup configmap
before scaling it to 0; a start restores the saved scale.";

/// Main CLI structure
#[derive(clap::Parser, Clone, Debug)]
#[clap(
    name = "kubectl-workload",
    author,
    version,
    about = "kubectl plugin to stop / start workloads",
    long_about = LONG_ABOUT
)]
pub struct WorkloadCli {
    /// Workload kind (deployment|deploy, statefulset|sts) followed by names
    #[arg(value_name = "KIND NAME")]
    pub targets: Vec<String>,

    /// Operate on all deployments and statefulsets
    #[arg(short = 'a', long, default_value_t = false)]
    pub all_kinds: bool,

    /// Namespace of the workloads
    #[arg(short = 'n', long, default_value = "default")]
    pub namespace: String,

    /// Scale down specified workloads, saving their current scale
    #[arg(long, default_value_t = false)]
    pub stop: bool,

    /// Scale up specified workloads to their saved scale
    #[arg(long, default_value_t = false)]
    pub start: bool,

    /// Kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format options
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}
