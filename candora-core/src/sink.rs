use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::types::{CandleRecord, CandoraError};

/// Destination for the normalized records of each fetched page.
///
/// The dispatcher calls `accept` once per page, in window order, before the
/// next request is issued.
#[async_trait]
pub trait PageSink: Send {
    /// Take ownership of one page worth of records.
    async fn accept(&mut self, records: Vec<CandleRecord>) -> Result<(), CandoraError>;
}

#[async_trait]
impl<S: PageSink + ?Sized> PageSink for &mut S {
    async fn accept(&mut self, records: Vec<CandleRecord>) -> Result<(), CandoraError> {
        (**self).accept(records).await
    }
}

/// Accumulates every page in memory; drained once the acquisition ends.
#[derive(Debug, Default)]
pub struct BufferSink {
    records: Vec<CandleRecord>,
}

impl BufferSink {
    /// Empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Records collected so far.
    #[must_use]
    pub fn records(&self) -> &[CandleRecord] {
        &self.records
    }

    /// Consume the buffer and return its records.
    #[must_use]
    pub fn into_records(self) -> Vec<CandleRecord> {
        self.records
    }
}

#[async_trait]
impl PageSink for BufferSink {
    async fn accept(&mut self, mut records: Vec<CandleRecord>) -> Result<(), CandoraError> {
        self.records.append(&mut records);
        Ok(())
    }
}

/// Forwards each page to a callback as soon as it is normalized.
pub struct FnSink<F>(pub F);

#[async_trait]
impl<F> PageSink for FnSink<F>
where
    F: FnMut(Vec<CandleRecord>) + Send,
{
    async fn accept(&mut self, records: Vec<CandleRecord>) -> Result<(), CandoraError> {
        (self.0)(records);
        Ok(())
    }
}

/// Forwards each page into a bounded channel.
///
/// Back-pressure from a slow receiver delays the next request. A dropped
/// receiver stops the acquisition with `SinkClosed`.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Result<Vec<CandleRecord>, CandoraError>>,
}

impl ChannelSink {
    /// Wrap the sending half of a channel.
    #[must_use]
    pub const fn new(tx: mpsc::Sender<Result<Vec<CandleRecord>, CandoraError>>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl PageSink for ChannelSink {
    async fn accept(&mut self, records: Vec<CandleRecord>) -> Result<(), CandoraError> {
        self.tx
            .send(Ok(records))
            .await
            .map_err(|_| CandoraError::SinkClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(ts: i64) -> CandleRecord {
        CandleRecord {
            exchange: "x".into(),
            symbol: "s".into(),
            interval: "1m".into(),
            timestamp: ts,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 1.0,
        }
    }

    #[tokio::test]
    async fn buffer_appends_in_order() {
        let mut sink = BufferSink::new();
        sink.accept(vec![rec(1), rec(2)]).await.unwrap();
        sink.accept(vec![]).await.unwrap();
        sink.accept(vec![rec(3)]).await.unwrap();
        let ts: Vec<i64> = sink.into_records().iter().map(|r| r.timestamp).collect();
        assert_eq!(ts, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn fn_sink_sees_every_page() {
        let mut pages = Vec::new();
        {
            let mut sink = FnSink(|recs: Vec<CandleRecord>| pages.push(recs.len()));
            sink.accept(vec![rec(1)]).await.unwrap();
            sink.accept(vec![]).await.unwrap();
        }
        assert_eq!(pages, vec![1, 0]);
    }

    #[tokio::test]
    async fn channel_sink_reports_closed_receiver() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut sink = ChannelSink::new(tx);
        let err = sink.accept(vec![rec(1)]).await.unwrap_err();
        assert_eq!(err, CandoraError::SinkClosed);
    }
}
