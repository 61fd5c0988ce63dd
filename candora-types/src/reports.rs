//! Report envelopes produced by range acquisitions.

use serde::{Deserialize, Serialize};

use crate::error::CandoraError;
use crate::record::CandleRecord;

/// Summary of one `range` acquisition.
///
/// `records` is empty when the acquisition streamed its pages to a sink.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeReport {
    /// Normalized records collected in buffered mode.
    pub records: Vec<CandleRecord>,
    /// Number of requests issued.
    pub requests: usize,
    /// Non-fatal issues encountered while fetching.
    pub warnings: Vec<CandoraError>,
}
