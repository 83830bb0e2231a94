use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CropError {
    #[error("input doesn't start with the PNG signature")]
    InvalidSignature,

    #[error("chunk at byte offset {offset} runs past the end of the input")]
    TruncatedStream { offset: usize },

    #[error("first chunk is not an IHDR chunk")]
    MissingHeader,

    #[error("malformed IHDR chunk: {0}")]
    MalformedHeader(&'static str),

    #[error(
        "unsupported image format (bit depth {bit_depth}, color type {color_type}, \
         interlace method {interlace_method}); only 8-bit non-interlaced RGBA is supported"
    )]
    UnsupportedFormat {
        bit_depth: u8,
        color_type: u8,
        interlace_method: u8,
    },

    #[error("no IDAT chunk found")]
    MissingImageData,

    #[error("failed to decompress image data: {0}")]
    Decompress(String),

    /// When the data runs long, inflation stops early and `actual` is where it stopped.
    #[error("decompressed image data is {actual} bytes, expected {expected}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("can't crop {rows} rows from an image {height} rows tall")]
    InvalidCrop { rows: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, CropError>;
