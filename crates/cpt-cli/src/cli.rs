//! Command line definition

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

/// The `cpt` command
#[must_use]
pub fn command() -> Command {
    Command::new("cpt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Traceability checks and document generation for a certification process handbook")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Log progress (-v info, -vv debug); RUST_LOG overrides"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_parser(["text", "json"])
                .default_value("text")
                .global(true)
                .help("Log line format"),
        )
        .subcommand(records(
            Command::new("check").about("Validate records, names and traceability only"),
        ))
        .subcommand(
            rendering(Command::new("checklist").about("Render checklist items")).arg(out()),
        )
        .subcommand(
            rendering(Command::new("worklist").about("Render numbered worklist items")).arg(out()),
        )
        .subcommand(
            rendering(
                Command::new("template")
                    .about("Render the fill-in checklist template (Markdown by default)"),
            )
            .arg(out()),
        )
        .subcommand(
            rendering(Command::new("assumptions").about("Render assumption tracing, one file per kind"))
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .value_parser(value_parser!(PathBuf))
                        .default_value(".")
                        .help("Directory receiving tracing-<kind> files"),
                ),
        )
        .subcommand(
            rendering(Command::new("clauses").about("Render standard-clause tracing"))
                .arg(out().required(true))
                .arg(
                    Arg::new("no-steps")
                        .long("no-steps")
                        .action(ArgAction::SetTrue)
                        .help("Omit step references (intended for guidelines)"),
                ),
        )
        .subcommand(
            rendering(Command::new("constraints").about("Render switch and rule constraints"))
                .arg(out()),
        )
}

/// Record files and configuration, shared by every subcommand
fn records(command: Command) -> Command {
    command
        .arg(
            Arg::new("files")
                .num_args(1..)
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Record files, loaded in order"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
}

/// Options of subcommands producing documents
fn rendering(command: Command) -> Command {
    records(command)
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["rst", "md", "markdown"])
                .help("Output markup"),
        )
        .arg(
            Arg::new("min-priority")
                .long("min-priority")
                .value_parser(["all", "low", "medium", "high"])
                .ignore_case(true)
                .default_value("all")
                .help("Emit only items with at least this priority"),
        )
        .arg(
            Arg::new("scope")
                .long("scope")
                .help("Emit only items of this scope (All, Not_Platinum, Ada, Automated)"),
        )
}

fn out() -> Arg {
    Arg::new("out")
        .long("out")
        .value_parser(value_parser!(PathBuf))
        .help("Output file; standard output when omitted")
}
