use std::borrow::Cow;

use crate::{
    chunks::{
        decode_chunks, encode_chunks, idat::IDATChunk, iend::IENDChunk, ihdr::IHDRChunk,
        ParseableChunk,
    },
    cropper::{raster_len, validate_and_crop_with, validate_raster, HeightPolicy},
    error::{CropError, Result},
    image_data::{compress_data, decompress_data},
};

/// A decoded 8-bit RGBA PNG: its header and its inflated, still filtered, scanlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PNG {
    header: IHDRChunk,
    image_data: Vec<u8>,
}

impl PNG {
    /// Decodes the chunk stream, joins and inflates all IDAT chunks and checks the raster size.
    ///
    /// Ancillary chunks are dropped; they won't be written back by [`PNG::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let chunks = decode_chunks(bytes)?;
        let (first, rest) = chunks.split_first().ok_or(CropError::MissingHeader)?;
        let header = IHDRChunk::from_bytes(&first.data)?;
        header.ensure_supported()?;

        for chunk in rest {
            if chunk.is(IENDChunk::HEADER) {
                IENDChunk::from_bytes(&chunk.data)?;
            } else if !chunk.is(IDATChunk::HEADER) {
                log::warn!("Dropping {} chunk", chunk.type_name());
            }
        }
        let compressed = IDATChunk::concat(rest).ok_or(CropError::MissingImageData)?;
        let image_data = decompress_data(&compressed, raster_len(&header))?;
        validate_raster(&header, &image_data)?;

        Ok(Self { header, image_data })
    }

    pub fn header(&self) -> &IHDRChunk {
        &self.header
    }

    /// Scanlines as stored, each led by its filter byte.
    pub fn image_data(&self) -> &[u8] {
        &self.image_data
    }

    pub fn crop_bottom(self, rows: u32) -> Result<Self> {
        self.crop_bottom_with(rows, HeightPolicy::default())
    }

    pub fn crop_bottom_with(mut self, rows: u32, policy: HeightPolicy) -> Result<Self> {
        let (header, kept) = validate_and_crop_with(&self.header, &self.image_data, rows, policy)?;
        let kept = kept.len();
        self.image_data.truncate(kept);
        self.header = header;
        Ok(self)
    }

    /// Writes IHDR, a single IDAT holding the whole recompressed raster, and IEND.
    pub fn encode(&self) -> Vec<u8> {
        let idat = IDATChunk {
            data: Cow::Owned(compress_data(&self.image_data)),
        };
        encode_chunks(&[self.header.to_chunk(), idat.into_chunk(), IENDChunk.to_chunk()])
    }
}

/// Removes `rows` rows from the bottom of the PNG in `bytes` and returns the re-encoded file.
pub fn crop_bottom(bytes: &[u8], rows: u32) -> Result<Vec<u8>> {
    Ok(PNG::decode(bytes)?.crop_bottom(rows)?.encode())
}
