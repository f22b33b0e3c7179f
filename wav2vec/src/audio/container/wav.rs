//! RIFF/WAVE container reader
//!
//! Parses the `fmt ` and `data` chunks (in any order, skipping everything
//! else) and streams raw frames out of the `data` chunk. Only integer PCM is
//! accepted: format tag 1, or WAVE_FORMAT_EXTENSIBLE with a PCM sub-format.

use super::{read_chunk_header, skip_bytes, AudioContainer, FrameCursor};
use crate::audio::types::{ContainerKind, ContainerParams};
use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

const WAVE_FORMAT_PCM: u16 = 0x0001;
const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;
const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Size of the basic `fmt ` body (PCMWAVEFORMAT)
const FMT_PCM_SIZE: u32 = 16;
/// Size of the WAVE_FORMAT_EXTENSIBLE `fmt ` body
const FMT_EXTENSIBLE_SIZE: u32 = 40;

/// Fields of the `fmt ` chunk that matter for decoding
#[derive(Debug, Clone, Copy)]
struct FormatChunk {
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

/// Streaming reader over a RIFF/WAVE container
pub struct WavReader<R> {
    reader: R,
    params: ContainerParams,
    cursor: FrameCursor,
}

impl WavReader<BufReader<File>> {
    /// Open a WAV file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> WavReader<R> {
    /// Parse the RIFF header and position the reader at the first frame.
    ///
    /// # Errors
    /// - `UnsupportedContainer` for non-RIFF input, non-PCM formats, or a
    ///   missing `fmt `/`data` chunk
    pub fn new(mut reader: R) -> Result<Self> {
        let mut riff = [0u8; 4];
        reader.read_exact(&mut riff)?;
        let _riff_size = reader.read_u32::<LittleEndian>()?;
        let mut wave = [0u8; 4];
        reader.read_exact(&mut wave)?;
        if &riff != b"RIFF" || &wave != b"WAVE" {
            return Err(Error::UnsupportedContainer(
                "not a RIFF/WAVE file".to_string(),
            ));
        }

        let mut format: Option<FormatChunk> = None;
        let mut data: Option<(u64, u64)> = None;

        while let Some(chunk) = read_chunk_header::<LittleEndian, _>(&mut reader)? {
            match &chunk.id {
                b"fmt " => {
                    format = Some(read_format_chunk(&mut reader, chunk.size)?);
                    skip_bytes(&mut reader, chunk.size as u64 & 1)?;
                }
                b"data" => {
                    let start = reader.stream_position()?;
                    data = Some((start, chunk.size as u64));
                    if format.is_some() {
                        break;
                    }
                    skip_bytes(&mut reader, chunk.padded_size())?;
                }
                other => {
                    debug!(chunk = %String::from_utf8_lossy(other), size = chunk.size, "Skipping WAV chunk");
                    skip_bytes(&mut reader, chunk.padded_size())?;
                }
            }
        }

        let format = format
            .ok_or_else(|| Error::UnsupportedContainer("WAV file has no fmt chunk".to_string()))?;
        let (data_start, data_len) = data
            .ok_or_else(|| Error::UnsupportedContainer("WAV file has no data chunk".to_string()))?;

        if format.channels == 0 {
            return Err(Error::UnsupportedContainer(
                "WAV file declares zero channels".to_string(),
            ));
        }

        let sample_width = format.bits_per_sample.div_ceil(8);
        let frame_bytes = format.channels as usize * sample_width as usize;
        let frame_count = if frame_bytes == 0 {
            0
        } else {
            data_len / frame_bytes as u64
        };

        let params = ContainerParams::pcm(format.channels, sample_width, format.sample_rate, frame_count);

        reader.seek(SeekFrom::Start(data_start))?;

        debug!(
            channels = params.channel_count,
            sample_width = params.sample_width,
            frame_rate = params.frame_rate,
            frames = params.frame_count,
            "Parsed WAV header"
        );

        Ok(Self {
            reader,
            params,
            cursor: FrameCursor {
                data_len,
                consumed: 0,
                frame_bytes,
            },
        })
    }
}

fn read_format_chunk<R: Read + Seek>(reader: &mut R, size: u32) -> Result<FormatChunk> {
    if size < FMT_PCM_SIZE {
        return Err(Error::UnsupportedContainer(format!(
            "fmt chunk too small ({} bytes)",
            size
        )));
    }

    let mut format_tag = reader.read_u16::<LittleEndian>()?;
    let channels = reader.read_u16::<LittleEndian>()?;
    let sample_rate = reader.read_u32::<LittleEndian>()?;
    let _byte_rate = reader.read_u32::<LittleEndian>()?;
    let _block_align = reader.read_u16::<LittleEndian>()?;
    let bits_per_sample = reader.read_u16::<LittleEndian>()?;
    let mut consumed = FMT_PCM_SIZE;

    if format_tag == WAVE_FORMAT_EXTENSIBLE {
        if size < FMT_EXTENSIBLE_SIZE {
            return Err(Error::UnsupportedContainer(
                "extensible fmt chunk too small".to_string(),
            ));
        }
        let _cb_size = reader.read_u16::<LittleEndian>()?;
        let _valid_bits = reader.read_u16::<LittleEndian>()?;
        let _channel_mask = reader.read_u32::<LittleEndian>()?;
        // Sub-format GUID: the first two bytes carry the plain format tag
        let mut guid = [0u8; 16];
        reader.read_exact(&mut guid)?;
        format_tag = u16::from_le_bytes([guid[0], guid[1]]);
        consumed = FMT_EXTENSIBLE_SIZE;
    }

    match format_tag {
        WAVE_FORMAT_PCM => {}
        WAVE_FORMAT_IEEE_FLOAT => {
            return Err(Error::UnsupportedContainer(
                "IEEE float WAV data is not PCM".to_string(),
            ))
        }
        tag => {
            return Err(Error::UnsupportedContainer(format!(
                "compressed WAV format tag 0x{:04X}",
                tag
            )))
        }
    }

    skip_bytes(reader, (size - consumed) as u64)?;

    Ok(FormatChunk {
        channels,
        sample_rate,
        bits_per_sample,
    })
}

impl<R: Read + Seek> AudioContainer for WavReader<R> {
    fn kind(&self) -> ContainerKind {
        ContainerKind::Wav
    }

    fn params(&self) -> &ContainerParams {
        &self.params
    }

    fn read_frames(&mut self, frames: usize) -> Result<Vec<u8>> {
        self.cursor.read(&mut self.reader, frames)
    }
}
