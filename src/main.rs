use std::process::ExitCode;

use clap::FromArgMatches;
use kubectl_cost::{GlobalArgs, build_root_command, dispatch, init_logger};
use log::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = build_root_command().get_matches();
    let globals = GlobalArgs::from_arg_matches(&matches).unwrap_or_default();

    init_logger(globals.verbose, globals.quiet);

    // kube and reqwest both pull in rustls; pin one process-wide provider
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let mut stdout = std::io::stdout().lock();
    match dispatch(&matches, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
