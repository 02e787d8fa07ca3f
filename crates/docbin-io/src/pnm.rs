//! PNM (Portable Any Map) format support
//!
//! Reads and writes binary PGM (P5, 1 channel) and PPM (P6, 3 channels)
//! with a maximum sample value of 255. Header comments (`#` to end of
//! line) are skipped. Samples with a smaller maxval are rescaled to the
//! full 8-bit range.

use crate::{IoError, IoResult};
use docbin_core::PixelBuffer;
use std::io::{BufRead, Read, Write};

/// Read one whitespace-delimited header token, skipping comments
fn read_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = String::new();
    let mut in_comment = false;
    loop {
        let mut byte = [0u8; 1];
        if reader.read(&mut byte)? == 0 {
            if token.is_empty() {
                return Err(IoError::InvalidData("truncated PNM header".to_string()));
            }
            return Ok(token);
        }
        let c = byte[0];
        if in_comment {
            in_comment = c != b'\n' && c != b'\r';
            continue;
        }
        match c {
            b'#' if token.is_empty() => in_comment = true,
            c if c.is_ascii_whitespace() => {
                if !token.is_empty() {
                    // Exactly one whitespace byte ends the final header token
                    return Ok(token);
                }
            }
            c => token.push(c as char),
        }
    }
}

fn read_number<R: BufRead>(reader: &mut R, what: &str) -> IoResult<u32> {
    let token = read_token(reader)?;
    token
        .parse()
        .map_err(|_| IoError::InvalidData(format!("invalid PNM {}: {:?}", what, token)))
}

/// Read a binary PNM image (P5/P6)
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<PixelBuffer> {
    let magic = read_token(&mut reader)?;
    let channels = match magic.as_str() {
        "P5" => 1u32,
        "P6" => 3,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNM type {:?}",
                other
            )));
        }
    };

    let width = read_number(&mut reader, "width")?;
    let height = read_number(&mut reader, "height")?;
    let maxval = read_number(&mut reader, "maxval")?;
    if maxval == 0 || maxval > 255 {
        return Err(IoError::UnsupportedFormat(format!(
            "PNM maxval {} not in 1..=255",
            maxval
        )));
    }

    let size = (width as u64)
        .checked_mul(height as u64)
        .and_then(|n| n.checked_mul(channels as u64))
        .ok_or_else(|| {
            IoError::InvalidData(format!("PNM dimensions {}x{} overflow", width, height))
        })?;

    // Header sizes are untrusted; grow with the bytes actually present
    let mut data = Vec::new();
    Read::take(&mut reader, size).read_to_end(&mut data)?;
    if (data.len() as u64) < size {
        return Err(IoError::InvalidData(format!(
            "truncated PNM data: expected {} bytes, got {}",
            size,
            data.len()
        )));
    }

    if maxval != 255 {
        for v in &mut data {
            *v = ((*v as u32).min(maxval) * 255 / maxval) as u8;
        }
    }

    Ok(PixelBuffer::new(width, height, channels, data)?)
}

/// Write a buffer as binary PNM
///
/// 1-channel buffers become P5 and 3-channel buffers P6. Alpha is not
/// representable, so 4-channel buffers are rejected.
pub fn write_pnm<W: Write>(buffer: &PixelBuffer, mut writer: W) -> IoResult<()> {
    let magic = match buffer.channels() {
        1 => "P5",
        3 => "P6",
        n => {
            return Err(IoError::UnsupportedFormat(format!(
                "cannot write {} channels as PNM",
                n
            )));
        }
    };
    write!(
        writer,
        "{}\n{} {}\n255\n",
        magic,
        buffer.width(),
        buffer.height()
    )?;
    writer.write_all(buffer.data())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_with_comments() {
        let mut bytes = b"P5\n# scanned page\n3 2\n255\n".to_vec();
        bytes.extend_from_slice(&[0, 10, 20, 30, 40, 255]);
        let buf = read_pnm(Cursor::new(bytes)).unwrap();
        assert_eq!((buf.width(), buf.height(), buf.channels()), (3, 2, 1));
        assert_eq!(buf.data(), &[0, 10, 20, 30, 40, 255]);
    }

    #[test]
    fn test_small_maxval_rescaled() {
        let mut bytes = b"P5 2 1 15\n".to_vec();
        bytes.extend_from_slice(&[0, 15]);
        let buf = read_pnm(Cursor::new(bytes)).unwrap();
        assert_eq!(buf.data(), &[0, 255]);
    }

    #[test]
    fn test_write_then_read_ppm() {
        let buffer = PixelBuffer::new(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let mut out = Vec::new();
        write_pnm(&buffer, &mut out).unwrap();
        assert!(out.starts_with(b"P6\n2 1\n255\n"));
        assert_eq!(read_pnm(Cursor::new(out)).unwrap(), buffer);
    }

    #[test]
    fn test_oversized_header_is_truncation_error() {
        let bytes = b"P5 100000 100000 255\n\x00\x01".to_vec();
        match read_pnm(Cursor::new(bytes)) {
            Err(IoError::InvalidData(msg)) => assert!(msg.contains("truncated"), "{msg}"),
            other => panic!("expected truncation error, got {other:?}"),
        }
        let bytes = b"P6 4294967295 4294967295 255\n".to_vec();
        assert!(matches!(
            read_pnm(Cursor::new(bytes)),
            Err(IoError::InvalidData(_))
        ));
    }

    #[test]
    fn test_errors() {
        assert!(read_pnm(Cursor::new(b"P2\n1 1\n255\n0".to_vec())).is_err());
        assert!(read_pnm(Cursor::new(b"P5\n4 4\n255\n\x00".to_vec())).is_err());
        assert!(read_pnm(Cursor::new(b"P5\n1 1\n65535\n\x00\x00".to_vec())).is_err());
        let rgba = PixelBuffer::new(1, 1, 4, vec![0; 4]).unwrap();
        assert!(write_pnm(&rgba, Vec::new()).is_err());
    }
}
