use miniz_oxide::{
    deflate::compress_to_vec_zlib,
    inflate::{decompress_to_vec_zlib_with_limit, TINFLStatus},
};

use crate::error::{CropError, Result};

/// Fixed so the same raster always compresses to the same bytes.
const COMPRESSION_LEVEL: u8 = 9;

pub(crate) fn compress_data(data: &[u8]) -> Vec<u8> {
    compress_to_vec_zlib(data, COMPRESSION_LEVEL)
}

/// Inflates at most one byte more than `expected_len`, so an oversized stream is reported as a
/// size mismatch without being inflated in full.
pub(crate) fn decompress_data(compressed_data: &[u8], expected_len: u64) -> Result<Vec<u8>> {
    let limit = usize::try_from(expected_len.saturating_add(1)).unwrap_or(usize::MAX);
    decompress_to_vec_zlib_with_limit(compressed_data, limit).map_err(|e| match e.status {
        TINFLStatus::HasMoreOutput => CropError::SizeMismatch {
            expected: expected_len,
            actual: e.output.len() as u64,
        },
        status => CropError::Decompress(format!("{status:?}")),
    })
}
