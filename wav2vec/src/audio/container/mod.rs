//! Audio container handles
//!
//! The decoder reads from an abstract container handle so WAV, AIFF and
//! in-memory PCM can be used interchangeably:
//!
//! - [`ContainerSource`] opens a fresh handle (one per decoder `open()`)
//! - [`AudioContainer`] reports header parameters and hands out raw frames
//!
//! Callers pick the concrete implementation from the sniffed file type before
//! constructing the decoder (see [`FileSource::detect`]).

pub mod aiff;
pub mod memory;
pub mod wav;

use super::types::{ContainerKind, ContainerParams, Endianness};
use crate::error::{Error, Result};
use byteorder::{ByteOrder, ReadBytesExt};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

pub use aiff::AiffReader;
pub use memory::{MemoryContainer, MemorySource};
pub use wav::WavReader;

/// An open audio container
pub trait AudioContainer {
    /// Container family, which fixes the default sample conventions
    fn kind(&self) -> ContainerKind;

    /// Header parameters
    fn params(&self) -> &ContainerParams;

    /// Byte order of the stored samples
    fn endianness(&self) -> Endianness {
        self.kind().default_endianness()
    }

    /// Read up to `frames` frames of raw interleaved sample bytes.
    ///
    /// Returns fewer bytes than requested only when the sound data ends early.
    fn read_frames(&mut self, frames: usize) -> Result<Vec<u8>>;

    /// Release the underlying resource
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Opens container handles for a decoder
pub trait ContainerSource {
    /// Open a new handle positioned at the first frame
    fn open(&self) -> Result<Box<dyn AudioContainer>>;

    /// Name used in log output (usually the file path)
    fn describe(&self) -> String;
}

/// A WAV or AIFF file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    kind: ContainerKind,
}

impl FileSource {
    /// Use `path` as a container of the given family
    pub fn new<P: AsRef<Path>>(path: P, kind: ContainerKind) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            kind,
        }
    }

    /// Sniff the header of `path` to pick the container family
    ///
    /// # Errors
    /// - `Io` if the file cannot be opened
    /// - `UnsupportedContainer` if the header is neither WAV nor AIFF
    pub fn detect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let kind = sniff_container(&mut file).map_err(|e| match e {
            Error::UnsupportedContainer(msg) => {
                Error::UnsupportedContainer(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        debug!(path = %path.display(), kind = %kind, "Detected container type");
        Ok(Self::new(path, kind))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }
}

impl ContainerSource for FileSource {
    fn open(&self) -> Result<Box<dyn AudioContainer>> {
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(match self.kind {
            ContainerKind::Wav => Box::new(WavReader::new(reader)?),
            ContainerKind::Aiff => Box::new(AiffReader::new(reader)?),
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Identify the container family from the first 12 header bytes.
///
/// - `RIFF....WAVE` → WAV
/// - `FORM....AIFF` / `FORM....AIFC` → AIFF
pub fn sniff_container<R: Read>(reader: &mut R) -> Result<ContainerKind> {
    let mut header = [0u8; 12];
    reader.read_exact(&mut header).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            Error::UnsupportedContainer("file too short for a WAV or AIFF header".to_string())
        }
        _ => Error::Io(e),
    })?;

    match (&header[0..4], &header[8..12]) {
        (b"RIFF", b"WAVE") => Ok(ContainerKind::Wav),
        (b"FORM", b"AIFF") | (b"FORM", b"AIFC") => Ok(ContainerKind::Aiff),
        _ => Err(Error::UnsupportedContainer(
            "unknown file type (should be either WAV or AIFF)".to_string(),
        )),
    }
}

/// IFF-style chunk header shared by RIFF and AIFF
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChunkHeader {
    pub id: [u8; 4],
    pub size: u32,
}

impl ChunkHeader {
    /// Bytes occupied by the chunk body including its pad byte
    pub fn padded_size(&self) -> u64 {
        self.size as u64 + (self.size as u64 & 1)
    }
}

/// Read the next chunk header, or `None` at a clean end of file.
pub(crate) fn read_chunk_header<B: ByteOrder, R: Read>(reader: &mut R) -> Result<Option<ChunkHeader>> {
    let mut id = [0u8; 4];
    match reader.read_exact(&mut id) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }
    let size = match reader.read_u32::<B>() {
        Ok(size) => size,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(ChunkHeader { id, size }))
}

/// Skip `count` bytes forward.
pub(crate) fn skip_bytes<R: Seek>(reader: &mut R, count: u64) -> Result<()> {
    if count > 0 {
        reader.seek(SeekFrom::Current(count as i64))?;
    }
    Ok(())
}

/// Sound data location and frame cursor shared by the file readers
#[derive(Debug)]
pub(crate) struct FrameCursor {
    /// Bytes of sound data declared by the header
    pub data_len: u64,
    /// Bytes already handed out
    pub consumed: u64,
    pub frame_bytes: usize,
}

impl FrameCursor {
    /// Read up to `frames` whole frames, never past the sound data.
    pub fn read<R: Read>(&mut self, reader: &mut R, frames: usize) -> Result<Vec<u8>> {
        let remaining = self.data_len.saturating_sub(self.consumed);
        let wanted = (frames as u64)
            .saturating_mul(self.frame_bytes as u64)
            .min(remaining);
        let mut buf = Vec::with_capacity(wanted as usize);
        reader.by_ref().take(wanted).read_to_end(&mut buf)?;
        self.consumed += buf.len() as u64;
        Ok(buf)
    }
}
