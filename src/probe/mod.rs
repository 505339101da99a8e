//! Probe executor: one HTTP GET per target, failures reported as data.
mod executor;
mod result;
mod target;


pub use executor::{HttpProbe, Probe, ProbeSettings};
pub use result::{NETWORK_FAILURE_STATUS, ProbeFailure, ProbeResult};
pub use target::ProbeTarget;
