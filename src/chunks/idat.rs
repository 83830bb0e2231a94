use std::borrow::Cow;

use super::{Chunk, ParseableChunk};
use crate::error::Result;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug)]
pub struct IDATChunk<'a> {
    pub data: Cow<'a, [u8]>,
}

impl IDATChunk<'_> {
    /// Joins the payloads of every IDAT chunk in stream order, or `None` if there are none.
    pub fn concat(chunks: &[Chunk<'_>]) -> Option<Vec<u8>> {
        let mut idats = chunks.iter().filter(|c| c.is(Self::HEADER)).peekable();
        idats.peek()?;
        let mut data = Vec::new();
        for chunk in idats {
            data.extend_from_slice(&chunk.data);
        }
        Some(data)
    }
}

impl<'a> IDATChunk<'a> {
    /// Like [`ParseableChunk::to_chunk`], without copying an owned payload.
    pub fn into_chunk(self) -> Chunk<'a> {
        Chunk::new(*Self::HEADER, self.data)
    }
}

impl<'a> ParseableChunk<'a> for IDATChunk<'a> {
    const HEADER: &'static [u8; 4] = b"IDAT";

    fn from_bytes(chunk_data: &'a [u8]) -> Result<Self> {
        Ok(IDATChunk {
            data: Cow::Borrowed(chunk_data),
        })
    }

    fn to_chunk(&self) -> Chunk<'a> {
        Chunk::new(*Self::HEADER, self.data.clone())
    }
}
