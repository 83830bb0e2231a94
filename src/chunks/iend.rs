use std::borrow::Cow;

use super::{Chunk, ParseableChunk};
use crate::error::Result;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug)]
pub struct IENDChunk;

impl<'a> ParseableChunk<'a> for IENDChunk {
    const HEADER: &'static [u8; 4] = b"IEND";

    fn from_bytes(chunk_data: &'a [u8]) -> Result<Self> {
        if !chunk_data.is_empty() {
            log::warn!("IEND chunk carries {} bytes of data", chunk_data.len());
        }
        Ok(Self)
    }

    fn to_chunk(&self) -> Chunk<'a> {
        Chunk::new(*Self::HEADER, Cow::Borrowed(&[][..]))
    }
}
