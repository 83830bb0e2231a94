//! Removing rows from the bottom of a decompressed RGBA raster.
//!
//! The raster is stored top row first, one filter byte leading each scanline, so dropping the
//! bottom rows is a truncation of the buffer. Filters only reference the row above, which means
//! the rows that remain decode exactly as before.

use crate::{
    chunks::ihdr::IHDRChunk,
    error::{CropError, Result},
};

const BYTES_PER_PIXEL: u64 = 4;

/// Whether a crop may leave an image with no rows.
///
/// PNG doesn't allow a zero height, so only use `AllowEmpty` when the raster is the end product.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HeightPolicy {
    #[default]
    RequirePositive,
    AllowEmpty,
}

/// Bytes per scanline, filter byte included.
pub fn row_bytes(header: &IHDRChunk) -> u64 {
    u64::from(header.width) * BYTES_PER_PIXEL + 1
}

/// Length of the whole decompressed raster the header describes.
pub fn raster_len(header: &IHDRChunk) -> u64 {
    // Saturates only for headers no PNG can carry, and no buffer is that long.
    row_bytes(header).saturating_mul(u64::from(header.height))
}

/// Checks that the header describes a supported format and that `raster` holds exactly
/// `height` scanlines.
pub fn validate_raster(header: &IHDRChunk, raster: &[u8]) -> Result<()> {
    header.ensure_supported()?;
    let expected = raster_len(header);
    let actual = raster.len() as u64;
    if actual != expected {
        return Err(CropError::SizeMismatch { expected, actual });
    }
    Ok(())
}

pub fn validate_and_crop<'r>(
    header: &IHDRChunk,
    raster: &'r [u8],
    rows: u32,
) -> Result<(IHDRChunk, &'r [u8])> {
    validate_and_crop_with(header, raster, rows, HeightPolicy::default())
}

/// Drops the bottom `rows` scanlines, returning the adjusted header and the kept prefix of
/// `raster`.
pub fn validate_and_crop_with<'r>(
    header: &IHDRChunk,
    raster: &'r [u8],
    rows: u32,
    policy: HeightPolicy,
) -> Result<(IHDRChunk, &'r [u8])> {
    validate_raster(header, raster)?;
    let new_height = match header.height.checked_sub(rows) {
        Some(0) if policy == HeightPolicy::RequirePositive => None,
        other => other,
    }
    .ok_or(CropError::InvalidCrop {
        rows,
        height: header.height,
    })?;
    // Never longer than `raster`, which was just checked against the full height.
    let kept = (row_bytes(header) * u64::from(new_height)) as usize;
    log::info!(
        "Cropping {rows} rows: {}x{} -> {}x{}",
        header.width,
        header.height,
        header.width,
        new_height
    );
    Ok((
        IHDRChunk {
            height: new_height,
            ..*header
        },
        &raster[..kept],
    ))
}
