//! Transport collaborator: the link to the physical display.
//!
//! The engine only needs a handful of operations, each of which may fail. The
//! session serializes every call through one lock, so implementations never
//! see concurrent use.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::{Error, Result};

/// Operations the display link must provide.
pub trait Transport: Send {
    /// Transmit one PNG-encoded, already rendered frame.
    fn send_frame<'a>(&'a mut self, png: &'a [u8]) -> BoxFuture<'a, Result<()>>;
    fn set_power(&mut self, on: bool) -> BoxFuture<'_, Result<()>>;
    fn set_mode(&mut self, mode: u8) -> BoxFuture<'_, Result<()>>;
    fn clear(&mut self) -> BoxFuture<'_, Result<()>>;
    fn sync_time(&mut self) -> BoxFuture<'_, Result<()>>;
}

/// One call observed by a [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Frame(Vec<u8>),
    Power(bool),
    Mode(u8),
    Clear,
    SyncTime,
}

#[derive(Debug, Default)]
struct MemoryState {
    calls: Vec<TransportCall>,
    failing: bool,
}

/// In-memory transport that records every call.
///
/// Clones share the same log, so a test can keep one handle while the session
/// owns another. With [`MemoryTransport::set_failing`] every call errors.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.lock().calls.clone()
    }

    /// PNG payloads of every frame transmitted so far.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                TransportCall::Frame(png) => Some(png.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn frame_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, TransportCall::Frame(_)))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: TransportCall) -> Result<()> {
        let mut state = self.lock();
        if state.failing {
            return Err(Error::TransportError("link down".to_string()));
        }
        state.calls.push(call);
        Ok(())
    }
}

impl Transport for MemoryTransport {
    fn send_frame<'a>(&'a mut self, png: &'a [u8]) -> BoxFuture<'a, Result<()>> {
        let res = self.record(TransportCall::Frame(png.to_vec()));
        async move { res }.boxed()
    }

    fn set_power(&mut self, on: bool) -> BoxFuture<'_, Result<()>> {
        let res = self.record(TransportCall::Power(on));
        async move { res }.boxed()
    }

    fn set_mode(&mut self, mode: u8) -> BoxFuture<'_, Result<()>> {
        let res = self.record(TransportCall::Mode(mode));
        async move { res }.boxed()
    }

    fn clear(&mut self) -> BoxFuture<'_, Result<()>> {
        let res = self.record(TransportCall::Clear);
        async move { res }.boxed()
    }

    fn sync_time(&mut self) -> BoxFuture<'_, Result<()>> {
        let res = self.record(TransportCall::SyncTime);
        async move { res }.boxed()
    }
}

/// Writes every transmitted frame to `dir` as `frame-00000.png`, `frame-00001.png`, ...
///
/// Control operations succeed without side effects.
pub struct DirectoryTransport {
    dir: PathBuf,
    next: u32,
}

impl DirectoryTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, next: 0 })
    }

    pub fn written(&self) -> u32 {
        self.next
    }
}

impl Transport for DirectoryTransport {
    fn send_frame<'a>(&'a mut self, png: &'a [u8]) -> BoxFuture<'a, Result<()>> {
        async move {
            let path = self.dir.join(format!("frame-{:05}.png", self.next));
            tokio::fs::write(&path, png).await?;
            self.next += 1;
            Ok(())
        }
        .boxed()
    }

    fn set_power(&mut self, _on: bool) -> BoxFuture<'_, Result<()>> {
        async { Ok(()) }.boxed()
    }

    fn set_mode(&mut self, _mode: u8) -> BoxFuture<'_, Result<()>> {
        async { Ok(()) }.boxed()
    }

    fn clear(&mut self) -> BoxFuture<'_, Result<()>> {
        async { Ok(()) }.boxed()
    }

    fn sync_time(&mut self) -> BoxFuture<'_, Result<()>> {
        async { Ok(()) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_transport_shares_log_between_clones() {
        let device = MemoryTransport::new();
        let mut t = device.clone();
        t.set_power(true).await.unwrap();
        t.send_frame(b"abc").await.unwrap();
        assert_eq!(device.frame_count(), 1);
        assert_eq!(device.calls()[0], TransportCall::Power(true));

        device.set_failing(true);
        assert!(matches!(t.clear().await, Err(Error::TransportError(_))));
        assert_eq!(device.calls().len(), 2);
    }

    #[tokio::test]
    async fn directory_transport_numbers_frames() {
        let dir = std::env::temp_dir().join("pixmatrix-dir-transport");
        let _ = std::fs::remove_dir_all(&dir);
        let mut t = DirectoryTransport::new(&dir).unwrap();
        t.send_frame(b"one").await.unwrap();
        t.send_frame(b"two").await.unwrap();
        assert_eq!(t.written(), 2);
        assert_eq!(std::fs::read(dir.join("frame-00001.png")).unwrap(), b"two");
    }
}
