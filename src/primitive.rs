//! Typed reads of the primitive wire values shapefiles are built from.
//!
//! These are stateless helpers over a [`ByteSource`]; none of them can fail
//! independently of the underlying stream (see spec §4.2). Mixed endianness
//! is the defining quirk of the format (record headers are big-endian,
//! everything else little-endian) so, following `geozero-shp/src/header.rs`,
//! we keep two explicitly-named readers rather than threading an
//! `Endianness` flag through one.

use crate::error::Result;
use crate::ByteSource;
use byteorder::{BigEndian, ByteOrder, LittleEndian};

pub fn read_u8(src: &mut dyn ByteSource) -> Result<u8> {
    let buf = src.read(1)?;
    Ok(buf[0])
}

pub fn read_u16_le(src: &mut dyn ByteSource) -> Result<u16> {
    let buf = src.read(2)?;
    Ok(LittleEndian::read_u16(&buf))
}

pub fn read_u32_le(src: &mut dyn ByteSource) -> Result<u32> {
    let buf = src.read(4)?;
    Ok(LittleEndian::read_u32(&buf))
}

pub fn read_u32_be(src: &mut dyn ByteSource) -> Result<u32> {
    let buf = src.read(4)?;
    Ok(BigEndian::read_u32(&buf))
}

pub fn read_i32_be(src: &mut dyn ByteSource) -> Result<i32> {
    let buf = src.read(4)?;
    Ok(BigEndian::read_i32(&buf))
}

pub fn read_i32_le(src: &mut dyn ByteSource) -> Result<i32> {
    let buf = src.read(4)?;
    Ok(LittleEndian::read_i32(&buf))
}

pub fn read_f64_le(src: &mut dyn ByteSource) -> Result<f64> {
    let buf = src.read(8)?;
    Ok(LittleEndian::read_f64(&buf))
}

/// Reads `n` bytes, transcodes them from ISO-8859-1 to UTF-8 (every Latin-1
/// byte maps directly onto the Unicode scalar value of the same ordinal, so
/// this can never fail), then strips trailing NULs and ASCII whitespace.
pub fn read_fixed_string(src: &mut dyn ByteSource, n: usize) -> Result<String> {
    let buf = src.read(n)?;
    Ok(latin1_to_trimmed_utf8(&buf))
}

pub fn latin1_to_trimmed_utf8(buf: &[u8]) -> String {
    let s: String = buf.iter().map(|&b| b as char).collect();
    s.trim_end_matches(['\0', ' ', '\t', '\r', '\n']).to_string()
}
