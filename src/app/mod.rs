mod export;
mod runner;
mod summary;


pub(crate) use export::export_summary_json;
pub(crate) use runner::run_local;
pub(crate) use summary::print_report;
