//! Command-line entry point for the Revit add-in deployer.
use std::io::Write as _;
use std::process::ExitCode;

use clap::Parser;
use revit_addin_deployer::error::DeployerError;
use revit_addin_deployer::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = match cli::Cli::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            writeln!(std::io::stdout(), "{}", e.render()).ok();
            return ExitCode::FAILURE;
        }
        Err(e) => {
            e.print().ok();
            return ExitCode::SUCCESS;
        }
    };

    let command = args.log_name();
    logging::init_subscriber(args.verbose, command);
    let log = logging::Logger::new(command);

    match commands::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<DeployerError>() {
                Some(err) => {
                    for msg in err.messages() {
                        log.error(&msg);
                    }
                    if matches!(err, DeployerError::Usage(_)) {
                        log.info("usage: revit-addin-deployer [<setup|uninst> <config>]");
                    }
                }
                None => log.error(&format!("{e:#}")),
            }
            ExitCode::FAILURE
        }
    }
}
