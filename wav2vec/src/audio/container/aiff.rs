//! AIFF/AIFF-C container reader
//!
//! Parses the `COMM` (common) and `SSND` (sound data) chunks of a FORM
//! container. Supports:
//! - AIFF: big-endian PCM
//! - AIFF-C with compression type `NONE` or `twos` (big-endian PCM) or
//!   `sowt` (little-endian PCM)
//! - IEEE 754 80-bit extended precision sample rates
//!
//! Any other AIFF-C compression type is rejected as unsupported.

use super::{read_chunk_header, skip_bytes, AudioContainer, FrameCursor};
use crate::audio::types::{ContainerKind, ContainerParams, Endianness};
use crate::error::{Error, Result};
use byteorder::{BigEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Minimum `COMM` body size for plain AIFF
const AIFF_COMM_SIZE: u32 = 18;
/// `COMM` body size up to and including the AIFF-C compression type
const AIFC_COMM_MIN_SIZE: u32 = 22;
/// `SSND` offset + block size fields
const SSND_HEADER_SIZE: u32 = 8;

/// COMM chunk data from the AIFF header
#[derive(Debug, Clone)]
struct CommonChunk {
    channels: u16,
    sample_frames: u32,
    sample_size: u16,
    sample_rate: f64,
    compression_type: String,
    compression_name: String,
}

/// Streaming reader over an AIFF or AIFF-C container
pub struct AiffReader<R> {
    reader: R,
    params: ContainerParams,
    endianness: Endianness,
    cursor: FrameCursor,
}

impl AiffReader<BufReader<File>> {
    /// Open an AIFF file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> AiffReader<R> {
    /// Parse the FORM header and position the reader at the first frame.
    ///
    /// # Errors
    /// - `UnsupportedContainer` for non-FORM input, compressed AIFF-C data, or a
    ///   missing `COMM`/`SSND` chunk
    pub fn new(mut reader: R) -> Result<Self> {
        let mut form = [0u8; 4];
        reader.read_exact(&mut form)?;
        let _form_size = reader.read_u32::<BigEndian>()?;
        let mut form_type = [0u8; 4];
        reader.read_exact(&mut form_type)?;

        let is_aifc = match (&form, &form_type) {
            (b"FORM", b"AIFF") => false,
            (b"FORM", b"AIFC") => true,
            _ => {
                return Err(Error::UnsupportedContainer(
                    "not a FORM AIFF/AIFC file".to_string(),
                ))
            }
        };

        let mut common: Option<CommonChunk> = None;
        let mut sound: Option<(u64, u64)> = None;

        while let Some(chunk) = read_chunk_header::<BigEndian, _>(&mut reader)? {
            match &chunk.id {
                b"COMM" => {
                    common = Some(read_common_chunk(&mut reader, chunk.size, is_aifc)?);
                    skip_bytes(&mut reader, chunk.size as u64 & 1)?;
                }
                b"SSND" => {
                    if chunk.size < SSND_HEADER_SIZE {
                        return Err(Error::UnsupportedContainer(
                            "SSND chunk too small".to_string(),
                        ));
                    }
                    let offset = reader.read_u32::<BigEndian>()?;
                    let _block_size = reader.read_u32::<BigEndian>()?;
                    let start = reader.stream_position()? + offset as u64;
                    let len = (chunk.size - SSND_HEADER_SIZE).saturating_sub(offset) as u64;
                    sound = Some((start, len));
                    skip_bytes(&mut reader, chunk.padded_size() - SSND_HEADER_SIZE as u64)?;
                }
                other => {
                    debug!(chunk = %String::from_utf8_lossy(other), size = chunk.size, "Skipping AIFF chunk");
                    skip_bytes(&mut reader, chunk.padded_size())?;
                }
            }
        }

        let common = common
            .ok_or_else(|| Error::UnsupportedContainer("AIFF file has no COMM chunk".to_string()))?;
        let (data_start, data_len) = sound
            .ok_or_else(|| Error::UnsupportedContainer("AIFF file has no SSND chunk".to_string()))?;

        let endianness = match common.compression_type.as_str() {
            "NONE" | "twos" => Endianness::Big,
            "sowt" => Endianness::Little,
            other => {
                return Err(Error::UnsupportedContainer(format!(
                    "compressed AIFF-C data ({} '{}')",
                    other, common.compression_name
                )))
            }
        };

        if common.channels == 0 {
            return Err(Error::UnsupportedContainer(
                "AIFF file declares zero channels".to_string(),
            ));
        }

        let sample_width = common.sample_size.div_ceil(8);
        let frame_bytes = common.channels as usize * sample_width as usize;
        let frame_rate = if common.sample_rate.is_finite() && common.sample_rate > 0.0 {
            common.sample_rate.round() as u32
        } else {
            0
        };

        let params = ContainerParams {
            channel_count: common.channels,
            sample_width,
            frame_rate,
            frame_count: common.sample_frames as u64,
            compression_type: common.compression_type,
            compression_name: common.compression_name,
        };

        reader.seek(SeekFrom::Start(data_start))?;

        debug!(
            channels = params.channel_count,
            sample_width = params.sample_width,
            frame_rate = params.frame_rate,
            frames = params.frame_count,
            aifc = is_aifc,
            "Parsed AIFF header"
        );

        Ok(Self {
            reader,
            params,
            endianness,
            cursor: FrameCursor {
                data_len,
                consumed: 0,
                frame_bytes,
            },
        })
    }
}

fn read_common_chunk<R: Read + Seek>(reader: &mut R, size: u32, is_aifc: bool) -> Result<CommonChunk> {
    let min_size = if is_aifc { AIFC_COMM_MIN_SIZE } else { AIFF_COMM_SIZE };
    if size < min_size {
        return Err(Error::UnsupportedContainer(format!(
            "COMM chunk too small ({} bytes)",
            size
        )));
    }

    let channels = reader.read_u16::<BigEndian>()?;
    let sample_frames = reader.read_u32::<BigEndian>()?;
    let sample_size = reader.read_u16::<BigEndian>()?;
    let sample_rate = read_extended(reader)?;
    let mut consumed = AIFF_COMM_SIZE;

    let (compression_type, compression_name) = if is_aifc {
        let mut id = [0u8; 4];
        reader.read_exact(&mut id)?;
        consumed += 4;
        let mut name = String::new();
        if size > consumed {
            // Pascal string: length byte, text, pad to an even total
            let len = reader.read_u8()? as u32;
            let mut text = vec![0u8; len.min(size - consumed - 1) as usize];
            reader.read_exact(&mut text)?;
            consumed += 1 + text.len() as u32;
            name = String::from_utf8_lossy(&text).into_owned();
        }
        (String::from_utf8_lossy(&id).into_owned(), name)
    } else {
        ("NONE".to_string(), "not compressed".to_string())
    };

    skip_bytes(reader, (size - consumed) as u64)?;

    Ok(CommonChunk {
        channels,
        sample_frames,
        sample_size,
        sample_rate,
        compression_type,
        compression_name,
    })
}

/// Read an IEEE 754 80-bit extended precision float (big-endian).
///
/// Layout: sign (1 bit) | biased exponent (15 bits) | significand (64 bits,
/// explicit integer bit).
fn read_extended<R: Read>(reader: &mut R) -> Result<f64> {
    let sign_exponent = reader.read_u16::<BigEndian>()?;
    let significand = reader.read_u64::<BigEndian>()?;

    let biased_exponent = (sign_exponent & 0x7FFF) as i32;
    if biased_exponent == 0 && significand == 0 {
        return Ok(0.0);
    }
    if biased_exponent == 0x7FFF {
        return Ok(f64::NAN);
    }

    let magnitude = significand as f64 * 2f64.powi(biased_exponent - 16383 - 63);
    if sign_exponent & 0x8000 != 0 {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}

impl<R: Read + Seek> AudioContainer for AiffReader<R> {
    fn kind(&self) -> ContainerKind {
        ContainerKind::Aiff
    }

    fn params(&self) -> &ContainerParams {
        &self.params
    }

    fn endianness(&self) -> Endianness {
        self.endianness
    }

    fn read_frames(&mut self, frames: usize) -> Result<Vec<u8>> {
        self.cursor.read(&mut self.reader, frames)
    }
}
