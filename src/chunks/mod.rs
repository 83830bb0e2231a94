use std::borrow::Cow;

use nom::{
    bytes::complete::{tag, take},
    combinator::map,
    number::complete::be_u32,
    sequence::tuple,
    IResult,
};

use crate::{
    crc::chunk_crc,
    error::{CropError, Result},
};

pub mod idat;
pub mod iend;
pub mod ihdr;

pub const SIGNATURE: &[u8; 8] = b"\x89PNG\x0d\x0a\x1a\x0a";

/// Length, type and CRC fields around every chunk payload.
const FRAMING_LENGTH: usize = 12;

pub type ChunkType = [u8; 4];

/// One chunk of a PNG stream. Decoded chunks borrow their payload from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub chunk_type: ChunkType,
    pub data: Cow<'a, [u8]>,
}

impl<'a> Chunk<'a> {
    pub fn new(chunk_type: ChunkType, data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            chunk_type,
            data: data.into(),
        }
    }

    pub fn is(&self, header: &ChunkType) -> bool {
        &self.chunk_type == header
    }

    pub fn type_name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.chunk_type)
    }

    /// Appends the length prefix, type, payload and CRC of this chunk to `out`.
    ///
    /// # Panics
    ///
    /// If the payload is longer than `u32::MAX` bytes.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.reserve(FRAMING_LENGTH + self.data.len());
        out.extend(length_prefix(self.data.len()).to_be_bytes());
        out.extend(self.chunk_type);
        out.extend_from_slice(&self.data);
        out.extend(chunk_crc(&self.chunk_type, &self.data).to_be_bytes());
    }
}

/// A chunk whose payload has a known structure.
pub trait ParseableChunk<'a>: Sized {
    const HEADER: &'static ChunkType;

    fn from_bytes(chunk_data: &'a [u8]) -> Result<Self>;
    /// The returned chunk lives as long as the parsed input, not as long as `self`.
    fn to_chunk(&self) -> Chunk<'a>;
}

/// Checks the signature and returns an iterator over the chunks that follow it.
pub fn iter_chunks(input: &[u8]) -> Result<ChunkIter<'_>> {
    let (source, _) = parse_signature(input).map_err(|_| CropError::InvalidSignature)?;
    Ok(ChunkIter {
        source,
        offset: SIGNATURE.len(),
        finished: false,
    })
}

/// Decodes a whole PNG stream into its chunks, up to and including `IEND`.
///
/// Anything after `IEND` is ignored. A stream that simply ends without `IEND` is accepted.
pub fn decode_chunks(input: &[u8]) -> Result<Vec<Chunk<'_>>> {
    let chunks = iter_chunks(input)?.collect::<Result<Vec<_>>>()?;
    match chunks.first() {
        Some(first) if first.is(ihdr::IHDRChunk::HEADER) => Ok(chunks),
        _ => Err(CropError::MissingHeader),
    }
}

/// Serializes chunks in the given order behind the PNG signature. No ordering rules are checked.
///
/// # Panics
///
/// If any payload is longer than `u32::MAX` bytes, the most a length prefix can hold.
pub fn encode_chunks(chunks: &[Chunk<'_>]) -> Vec<u8> {
    let capacity = SIGNATURE.len()
        + chunks
            .iter()
            .map(|chunk| FRAMING_LENGTH + chunk.data.len())
            .sum::<usize>();
    let mut bytes = Vec::with_capacity(capacity);
    bytes.extend(SIGNATURE);
    for chunk in chunks {
        chunk.write_to(&mut bytes);
    }
    bytes
}

pub struct ChunkIter<'a> {
    source: &'a [u8],
    offset: usize,
    finished: bool,
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<Chunk<'a>>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.source.is_empty() {
            return None;
        }
        match chunk_frame(self.source) {
            Ok((rest, (chunk_type, data, crc))) => {
                let chunk = Chunk::new(chunk_type, data);
                log::debug!(
                    "{} chunk at offset {} ({} bytes)",
                    chunk.type_name(),
                    self.offset,
                    data.len()
                );
                if crc != chunk_crc(&chunk_type, data) {
                    log::warn!(
                        "CRC mismatch in {} chunk at offset {}",
                        chunk.type_name(),
                        self.offset
                    );
                }
                self.offset += self.source.len() - rest.len();
                self.source = rest;
                if chunk.is(iend::IENDChunk::HEADER) {
                    self.finished = true;
                }
                Some(Ok(chunk))
            }
            Err(_) => {
                self.finished = true;
                Some(Err(CropError::TruncatedStream {
                    offset: self.offset,
                }))
            }
        }
    }
}

fn length_prefix(data_len: usize) -> u32 {
    u32::try_from(data_len).expect("chunk payload longer than u32::MAX bytes")
}

fn parse_signature(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(&SIGNATURE[..])(input)
}

fn chunk_frame(input: &[u8]) -> IResult<&[u8], (ChunkType, &[u8], u32)> {
    let (input, length) = be_u32(input)?;
    tuple((
        map(be_u32, u32::to_be_bytes),
        take(length as usize),
        be_u32,
    ))(input)
}
