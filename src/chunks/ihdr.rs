use nom::{
    number::complete::{be_u32, u8},
    sequence::tuple,
    IResult,
};

use super::{Chunk, ParseableChunk};
use crate::error::{CropError, Result};

pub const DATA_LENGTH: usize = 13;

const MAX_DIMENSION: u32 = (1 << 31) - 1;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IHDRChunk {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression_method: u8,
    pub filter_method: u8,
    pub interlace_method: u8,
}

impl IHDRChunk {
    /// Header for an 8-bit, non-interlaced RGBA image.
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bit_depth: 8,
            color_type: ColorType::TruecolorWithAlpha as u8,
            compression_method: 0,
            filter_method: 0,
            interlace_method: 0,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.bit_depth == 8
            && ColorType::try_from(self.color_type) == Ok(ColorType::TruecolorWithAlpha)
            && self.interlace_method == 0
    }

    pub fn ensure_supported(&self) -> Result<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(CropError::UnsupportedFormat {
                bit_depth: self.bit_depth,
                color_type: self.color_type,
                interlace_method: self.interlace_method,
            })
        }
    }
}

impl<'a> ParseableChunk<'a> for IHDRChunk {
    const HEADER: &'static [u8; 4] = b"IHDR";

    fn from_bytes(chunk_data: &'a [u8]) -> Result<Self> {
        if chunk_data.len() != DATA_LENGTH {
            return Err(CropError::MalformedHeader("IHDR data must be 13 bytes"));
        }
        let (_, header) = parse_fields(chunk_data)
            .map_err(|_| CropError::MalformedHeader("IHDR data must be 13 bytes"))?;
        if [header.width, header.height]
            .iter()
            .any(|&dim| dim == 0 || dim > MAX_DIMENSION)
        {
            return Err(CropError::MalformedHeader(
                "image dimensions must be between 1 and 2^31 - 1",
            ));
        }
        Ok(header)
    }

    fn to_chunk(&self) -> Chunk<'a> {
        let mut data = Vec::with_capacity(DATA_LENGTH);
        data.extend(self.width.to_be_bytes());
        data.extend(self.height.to_be_bytes());
        data.extend([
            self.bit_depth,
            self.color_type,
            self.compression_method,
            self.filter_method,
            self.interlace_method,
        ]);
        Chunk::new(*Self::HEADER, data)
    }
}

fn parse_fields(chunk_data: &[u8]) -> IResult<&[u8], IHDRChunk> {
    let (
        rest,
        (width, height, bit_depth, color_type, compression_method, filter_method, interlace_method),
    ) = tuple((be_u32, be_u32, u8, u8, u8, u8, u8))(chunk_data)?;
    Ok((
        rest,
        IHDRChunk {
            width,
            height,
            bit_depth,
            color_type,
            compression_method,
            filter_method,
            interlace_method,
        },
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    Greyscale = 0,
    Truecolor = 2,
    IndexedColor = 3,
    GreyscaleWithAlpha = 4,
    TruecolorWithAlpha = 6,
}
impl TryFrom<u8> for ColorType {
    type Error = u8;
    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Greyscale),
            2 => Ok(Self::Truecolor),
            3 => Ok(Self::IndexedColor),
            4 => Ok(Self::GreyscaleWithAlpha),
            6 => Ok(Self::TruecolorWithAlpha),
            other => Err(other),
        }
    }
}
