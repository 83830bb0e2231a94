use miniz_oxide::deflate::compress_to_vec_zlib;
use png_crop::{
    chunks::{self, ihdr::IHDRChunk, Chunk, ParseableChunk},
    crop_bottom, CropError, PNG,
};

/// Rows of RGBA pixels, each led by filter type 0.
fn raw_image(width: u32, height: u32) -> Vec<u8> {
    let mut raw = Vec::new();
    for y in 0..height {
        raw.push(0);
        for x in 0..width {
            raw.extend([x as u8, y as u8, (x ^ y) as u8, 255]);
        }
    }
    raw
}

fn encode_png(width: u32, height: u32, raw: &[u8], idat_count: usize) -> Vec<u8> {
    let compressed = compress_to_vec_zlib(raw, 6);
    let mut chunk_list = vec![
        IHDRChunk::rgba8(width, height).to_chunk(),
        Chunk::new(*b"tEXt", b"Software\0test".to_vec()),
    ];
    let split = compressed.len().div_ceil(idat_count);
    for part in compressed.chunks(split) {
        chunk_list.push(Chunk::new(*b"IDAT", part));
    }
    chunk_list.push(Chunk::new(*b"IEND", Vec::new()));
    chunks::encode_chunks(&chunk_list)
}

#[test]
fn ten_by_ten_cropped_by_three() {
    let raw = raw_image(10, 10);
    assert_eq!(raw.len(), 410);
    let input = encode_png(10, 10, &raw, 1);

    let output = crop_bottom(&input, 3).unwrap();
    let png = PNG::decode(&output).unwrap();
    assert_eq!(png.image_data().len(), 287);
    assert_eq!(png.image_data(), &raw[..287]);
    insta::assert_debug_snapshot!(png.header(), @r###"
    IHDRChunk {
        width: 10,
        height: 7,
        bit_depth: 8,
        color_type: 6,
        compression_method: 0,
        filter_method: 0,
        interlace_method: 0,
    }
    "###);
}

#[test]
fn split_image_data_collapses_to_one_idat() {
    let raw = raw_image(40, 48);
    let input = encode_png(40, 48, &raw, 4);
    let original = chunks::decode_chunks(&input).unwrap();
    assert_eq!(original.iter().filter(|c| c.is(b"IDAT")).count(), 4);

    let output = crop_bottom(&input, 32).unwrap();
    let decoded = chunks::decode_chunks(&output).unwrap();
    let names: Vec<_> = decoded.iter().map(|c| c.type_name().into_owned()).collect();
    assert_eq!(names, ["IHDR", "IDAT", "IEND"]);

    let header = IHDRChunk::from_bytes(&decoded[0].data).unwrap();
    assert_eq!(header.height, 16);
    let png = PNG::decode(&output).unwrap();
    assert_eq!(png.image_data(), &raw[..(40 * 4 + 1) * 16]);
}

#[test]
fn cropping_twice_matches_cropping_once() {
    let raw = raw_image(7, 20);
    let input = encode_png(7, 20, &raw, 2);
    let twice = crop_bottom(&crop_bottom(&input, 5).unwrap(), 6).unwrap();
    let once = crop_bottom(&input, 11).unwrap();
    assert_eq!(twice, once);
}

#[test]
fn short_raster_is_rejected() {
    let mut raw = raw_image(10, 10);
    raw.pop();
    let input = encode_png(10, 10, &raw, 1);
    let err = crop_bottom(&input, 3).unwrap_err();
    assert_eq!(
        err,
        CropError::SizeMismatch {
            expected: 410,
            actual: 409
        }
    );
    insta::assert_snapshot!(err.to_string(), @"decompressed image data is 409 bytes, expected 410");
}

#[test]
fn error_messages() {
    let not_png = crop_bottom(b"GIF89a", 1).unwrap_err();
    insta::assert_snapshot!(not_png.to_string(), @"input doesn't start with the PNG signature");

    let input = encode_png(2, 2, &raw_image(2, 2), 1);
    let truncated = crop_bottom(&input[..input.len() - 20], 1).unwrap_err();
    insta::assert_snapshot!(
        truncated.to_string(),
        @"chunk at byte offset 58 runs past the end of the input"
    );

    let too_many = crop_bottom(&input, 2).unwrap_err();
    insta::assert_snapshot!(too_many.to_string(), @"can't crop 2 rows from an image 2 rows tall");
}
