use clap::ArgMatches;
use cpt_cli::cli::command;
use cpt_cli::run::{run, Invocation};
use cpt_store::StoreError;
use cpt_trace::Severity;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let matches = command().get_matches();
    init_tracing(&matches);

    let result = Invocation::from_matches(&matches).and_then(|invocation| run(&invocation));
    match result {
        Ok(outcome) => {
            for diagnostic in outcome.diagnostics.iter() {
                eprintln!("{diagnostic}");
            }
            if outcome.success() {
                ExitCode::SUCCESS
            } else {
                eprintln!(
                    "{} error(s), {} warning(s), {} untraced record(s)",
                    outcome.diagnostics.count(Severity::Error),
                    outcome.diagnostics.count(Severity::Warning),
                    outcome.violations,
                );
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            for store in err.chain().filter_map(|cause| cause.downcast_ref::<StoreError>()) {
                for violation in store.violations() {
                    eprintln!("  {violation}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Log to standard error so rendered documents on standard output stay clean
fn init_tracing(matches: &ArgMatches) {
    let level = match matches.get_count("verbose") {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if matches.get_one::<String>("log-format").map(String::as_str) == Some("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}
