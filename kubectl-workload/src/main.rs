use std::process;

use clap::Parser;
use envconfig::Envconfig;

use kubectl_workload::{PluginEnv, WorkloadCli, WorkloadError, init_tracing};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let env = match PluginEnv::init_from_env() {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    init_tracing(&env.log_filter);

    let cli = match WorkloadCli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help / --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    if let Err(e) = kubectl_workload::run(cli, env).await {
        eprintln!("Error: {}", e);
        let code = e
            .downcast_ref::<WorkloadError>()
            .map(WorkloadError::exit_code)
            .unwrap_or(1);
        process::exit(code);
    }
}
