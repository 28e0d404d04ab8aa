use envconfig::Envconfig;

/// Environment configuration of the plugin.
#[derive(Envconfig, Clone, Debug)]
pub struct PluginEnv {
    /// Tracing filter directive (e.g. "debug" or "kubectl_workload=trace").
    /// Env: KUBECTL_WORKLOAD_LOG
    #[envconfig(from = "KUBECTL_WORKLOAD_LOG", default = "warn")]
    pub log_filter: String,

    /// Kubeconfig context used when `--context` is not given.
    /// Env: KUBECTL_WORKLOAD_CONTEXT
    #[envconfig(from = "KUBECTL_WORKLOAD_CONTEXT")]
    pub context: Option<String>,
}

impl PluginEnv {
    /// `--context` wins over the environment.
    pub fn resolve_context<'a>(
        &'a self,
        flag: Option<&'a str>,
    ) -> Option<&'a str> {
        flag.or(self.context.as_deref())
    }
}
