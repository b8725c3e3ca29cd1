use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use png::{ColorType, Transformations};
use thiserror::Error;

/// Pixels decoded from an image file, always expanded to RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Channel count of the decoded data before RGBA expansion.
    pub channels: u8,
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Could not open image: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not decode image: {0}")]
    Decoding(#[from] png::DecodingError),
    #[error("Unsupported color type {0:?}")]
    UnsupportedColor(ColorType),
}

pub fn decode_file(
    path: impl AsRef<Path>,
    flip_vertically: bool,
) -> Result<DecodedImage, ImageError> {
    let file = File::open(path)?;
    decode(BufReader::new(file), flip_vertically)
}

/// Decodes a PNG stream. With `flip_vertically` the first row of the result is
/// the bottom row of the image, which is what `glTexImage2D` expects.
pub fn decode<R: Read>(reader: R, flip_vertically: bool) -> Result<DecodedImage, ImageError> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let channels = info.color_type.samples() as u8;
    let mut pixels = to_rgba(buf, info.color_type)?;

    if flip_vertically {
        flip_rows(&mut pixels, info.width as usize * 4);
    }

    Ok(DecodedImage {
        pixels,
        width: info.width,
        height: info.height,
        channels,
    })
}

fn to_rgba(buf: Vec<u8>, color_type: ColorType) -> Result<Vec<u8>, ImageError> {
    let pixels = match color_type {
        ColorType::Rgba => buf,
        ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        // EXPAND turns palettes into RGB(A)
        ColorType::Indexed => return Err(ImageError::UnsupportedColor(color_type)),
    };

    Ok(pixels)
}

fn flip_rows(pixels: &mut [u8], row_len: usize) {
    if row_len == 0 {
        return;
    }

    let rows = pixels.len() / row_len;
    for top in 0..rows / 2 {
        let bottom = rows - 1 - top;
        let (upper, lower) = pixels.split_at_mut(bottom * row_len);
        upper[top * row_len..(top + 1) * row_len].swap_with_slice(&mut lower[..row_len]);
    }
}
