//! In-memory PCM container
//!
//! Serves raw interleaved PCM bytes held in memory through the same container
//! interface as the file readers. Each open handle shares the byte buffer and
//! keeps its own read position.

use super::{AudioContainer, ContainerSource};
use crate::audio::types::{ContainerKind, ContainerParams, Endianness};
use crate::error::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Source of [`MemoryContainer`] handles
///
/// Counts how many handles were opened and closed, which lets callers check
/// that a decoder releases its container on every exit path.
#[derive(Debug, Clone)]
pub struct MemorySource {
    kind: ContainerKind,
    params: ContainerParams,
    endianness: Endianness,
    data: Arc<[u8]>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl MemorySource {
    /// Serve `data` as sound data described by `params`.
    ///
    /// `data` may be shorter than `params.frame_count` frames; reads then come
    /// back short, as they would for a truncated file.
    pub fn new(kind: ContainerKind, params: ContainerParams, data: Vec<u8>) -> Self {
        Self {
            kind,
            endianness: kind.default_endianness(),
            params,
            data: data.into(),
            opened: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sound data made of `params.frame_count` frames of one repeated byte
    pub fn filled(kind: ContainerKind, params: ContainerParams, byte: u8) -> Self {
        let len = params.frame_count as usize * params.frame_bytes();
        Self::new(kind, params, vec![byte; len])
    }

    /// Override the byte order reported by opened handles
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Number of handles opened so far
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of handles closed so far
    pub fn close_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl ContainerSource for MemorySource {
    fn open(&self) -> Result<Box<dyn AudioContainer>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryContainer {
            kind: self.kind,
            params: self.params.clone(),
            endianness: self.endianness,
            data: Arc::clone(&self.data),
            position: 0,
            closed: Arc::clone(&self.closed),
        }))
    }

    fn describe(&self) -> String {
        format!("<memory {} {} bytes>", self.kind, self.data.len())
    }
}

/// An open handle onto in-memory PCM data
#[derive(Debug)]
pub struct MemoryContainer {
    kind: ContainerKind,
    params: ContainerParams,
    endianness: Endianness,
    data: Arc<[u8]>,
    position: usize,
    closed: Arc<AtomicUsize>,
}

impl AudioContainer for MemoryContainer {
    fn kind(&self) -> ContainerKind {
        self.kind
    }

    fn params(&self) -> &ContainerParams {
        &self.params
    }

    fn endianness(&self) -> Endianness {
        self.endianness
    }

    fn read_frames(&mut self, frames: usize) -> Result<Vec<u8>> {
        let wanted = frames.saturating_mul(self.params.frame_bytes());
        let end = self.position.saturating_add(wanted).min(self.data.len());
        let bytes = self.data[self.position..end].to_vec();
        self.position = end;
        Ok(bytes)
    }

    fn close(&mut self) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
