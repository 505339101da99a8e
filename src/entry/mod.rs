mod plan;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::TesterArgs;
use crate::error::AppResult;
use plan::{build_plan, execute_plan};

pub(crate) use plan::RunPlan;

/// Parses the command line, resolves the run plan, and drives it to a verdict.
///
/// # Errors
///
/// Returns an error when arguments or configuration are invalid, the runtime
/// cannot be built, or the run breaches one of its thresholds.
pub fn run() -> AppResult<()> {
    let (args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose);

    let plan = build_plan(args, &matches)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(execute_plan(plan))
}

fn parse_args() -> AppResult<(TesterArgs, ArgMatches)> {
    let matches = TesterArgs::command().get_matches();
    let args = TesterArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}
