//! PNG image format support
//!
//! Decoding expands palettes and sub-byte depths and strips 16-bit samples
//! to 8 bits, so every PNG lands in a [`PixelBuffer`] with 1, 3 or 4
//! channels. Gray+alpha is reduced to gray.

use crate::{IoError, IoResult};
use docbin_core::PixelBuffer;
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<PixelBuffer> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG output depth: {:?}",
            bit_depth
        )));
    }

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let width = output_info.width;
    let height = output_info.height;
    let line_size = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    let (channels, samples) = match color_type {
        ColorType::Grayscale => (1u32, 1usize),
        ColorType::GrayscaleAlpha => (1, 2),
        ColorType::Rgb => (3, 3),
        ColorType::Rgba => (4, 4),
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "indexed PNG was not expanded".to_string(),
            ));
        }
    };

    // Rows may be padded past width * samples; copy the payload only
    let row_bytes = width as usize * samples;
    let mut pixels = Vec::with_capacity(width as usize * height as usize * channels as usize);
    for row in data.chunks(line_size).take(height as usize) {
        let row = row.get(..row_bytes).ok_or_else(|| {
            IoError::InvalidData(format!("short PNG row: {} < {}", row.len(), row_bytes))
        })?;
        if color_type == ColorType::GrayscaleAlpha {
            pixels.extend(row.chunks_exact(2).map(|ga| ga[0]));
        } else {
            pixels.extend_from_slice(row);
        }
    }

    Ok(PixelBuffer::new(width, height, channels, pixels)?)
}

/// Write a PNG image
///
/// 1-channel buffers are written as 8-bit grayscale, 3 as RGB and 4 as
/// RGBA.
pub fn write_png<W: Write>(buffer: &PixelBuffer, writer: W) -> IoResult<()> {
    let color_type = match buffer.channels() {
        1 => ColorType::Grayscale,
        3 => ColorType::Rgb,
        4 => ColorType::Rgba,
        n => {
            return Err(IoError::UnsupportedFormat(format!(
                "cannot write {} channels as PNG",
                n
            )));
        }
    };

    let mut encoder = Encoder::new(writer, buffer.width(), buffer.height());
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(buffer.data())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}
