//! Audio decoding: containers, sample codec, scaling decoder

pub mod codec;
pub mod container;
pub mod decoder;
pub mod points;
pub mod types;

pub use decoder::{DecoderOptions, DecoderSession, WaveformDecoder};
pub use points::{Point, PointBatch};
pub use types::{ContainerKind, ContainerParams, Endianness};
