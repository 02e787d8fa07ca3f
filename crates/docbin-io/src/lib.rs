//! docbin-io - Image I/O for docbin
//!
//! Reads PNG and binary PNM files into [`PixelBuffer`]s and writes them
//! back. The format of an input file is detected from its magic bytes,
//! not its extension.
//!
//! # Examples
//!
//! ```no_run
//! use docbin_io::{ImageFormat, read_image, write_image};
//!
//! let page = read_image("scan.png").unwrap();
//! write_image(&page, "copy.pgm", ImageFormat::Pnm).unwrap();
//! ```

mod error;
pub mod format;
pub mod png;
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format_from_bytes};

use docbin_core::PixelBuffer;
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;
use tracing::debug;

/// Decode an in-memory image file
pub fn read_image_from_bytes(bytes: &[u8]) -> IoResult<PixelBuffer> {
    match detect_format_from_bytes(bytes)? {
        ImageFormat::Png => png::read_png(Cursor::new(bytes)),
        ImageFormat::Pnm => pnm::read_pnm(Cursor::new(bytes)),
    }
}

/// Read an image file, detecting its format from the header
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let buffer = read_image_from_bytes(&bytes)?;
    debug!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        channels = buffer.channels(),
        "read image"
    );
    Ok(buffer)
}

/// Encode an image into any writer
pub fn write_image_to<W: Write>(
    buffer: &PixelBuffer,
    writer: W,
    format: ImageFormat,
) -> IoResult<()> {
    match format {
        ImageFormat::Png => png::write_png(buffer, writer),
        ImageFormat::Pnm => pnm::write_pnm(buffer, writer),
    }
}

/// Write an image file in the given format
pub fn write_image<P: AsRef<Path>>(
    buffer: &PixelBuffer,
    path: P,
    format: ImageFormat,
) -> IoResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_image_to(buffer, &mut writer, format)?;
    writer.flush()?;
    debug!(path = %path.display(), ?format, "wrote image");
    Ok(())
}
