//! Load profile driver: staged ramp schedule and the virtual worker pool.
mod driver;
mod profile;


pub use driver::{DriverReport, DriverSettings, LoadDriver, WorkerTask};
pub use profile::{LoadProfile, ProfilePoint, StageSpec};
