//! Candora-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod record;
mod reports;
mod window;

pub use config::DispatchPolicy;
pub use error::CandoraError;
pub use record::CandleRecord;
pub use reports::RangeReport;
pub use window::RequestWindow;
