use clap::Parser;

use crate::error::{AppError, AppResult};

use super::TesterArgs;

/// Parses `args` as if passed after the binary name.
pub(crate) fn parse_test_args(args: &[&str]) -> AppResult<TesterArgs> {
    let argv = std::iter::once("scrapeprobe").chain(args.iter().copied());
    TesterArgs::try_parse_from(argv).map_err(AppError::from)
}
