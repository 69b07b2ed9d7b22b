//! Normalization of raw gridpoint streams into a dense hourly series
//!
//! - `period`: `P[nD][T[nH]]` durations to whole hours
//! - `alignment`: interval start instants to window slots
//! - `units`: metric source units to the reported units
//! - `assembler`: merge, fill and trim into a [`crate::WeatherDataset`]

pub mod alignment;
pub mod assembler;
pub mod period;
pub mod units;

pub use alignment::{parse_time_zone, resolve_start_slot};
pub use assembler::{DatasetAssembler, assemble};
pub use period::decode_period;
pub use units::Unit;
