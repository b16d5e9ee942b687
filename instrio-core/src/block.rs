//! IEEE 488.2 style binary blocks and ASCII numeric replies.
//!
//! A definite-length block looks like `#<L><N><payload>` where `L` is one ASCII
//! digit giving the number of digits in `N`, and `N` is the payload size in
//! bytes. `#0<payload>` is the indefinite form: the payload runs to the end of
//! the buffer.

pub mod ascii;
pub mod ieee;
pub mod legacy;

use crate::error::{Error, Result};
use byteorder::{ReadBytesExt, WriteBytesExt, BE, LE};
use std::fmt;
use std::io::Cursor;

pub use ascii::parse_ascii;
pub use ieee::{block_header, from_ieee_block, to_ieee_block};
pub use legacy::parse_binary;

/// Start-of-block marker.
pub const BLOCK_MARKER: u8 = b'#';

/// Packed width and type of each element in a block payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementFormat {
    /// 4-byte IEEE-754 single precision.
    Single,
    /// 8-byte IEEE-754 double precision.
    Double,
}

impl ElementFormat {
    /// Size of one packed element in bytes.
    pub fn size(self) -> usize {
        match self {
            ElementFormat::Single => 4,
            ElementFormat::Double => 8,
        }
    }
}

impl std::str::FromStr for ElementFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f" | "f32" | "single" | "float" => Ok(ElementFormat::Single),
            "d" | "f64" | "double" => Ok(ElementFormat::Double),
            _ => Err(format!("Unknown element format: {}", s)),
        }
    }
}

impl fmt::Display for ElementFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementFormat::Single => "single",
            ElementFormat::Double => "double",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    pub fn from_big_endian(is_big_endian: bool) -> Self {
        if is_big_endian {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }
}

/// Position of the first `#` in `block`.
pub(crate) fn find_marker(block: &[u8]) -> Result<usize> {
    block
        .iter()
        .position(|&b| b == BLOCK_MARKER)
        .ok_or_else(|| {
            Error::MalformedBlock("could not find hash sign (#) marking the block start".into())
        })
}

/// Parses the ASCII decimal payload length that follows the header digit.
pub(crate) fn parse_declared_length(digits: &[u8]) -> Result<usize> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(Error::MalformedBlock(format!(
            "invalid length field {:?}",
            String::from_utf8_lossy(digits)
        )));
    }

    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| Error::MalformedBlock("length field out of range".into()))
}

/// Returns the `len`-byte slice of `block` starting at `start`, or
/// `MalformedBlock` when the buffer is too short.
pub(crate) fn take_payload(block: &[u8], start: usize, len: usize) -> Result<&[u8]> {
    start
        .checked_add(len)
        .and_then(|end| block.get(start..end))
        .ok_or_else(|| {
            Error::MalformedBlock(format!(
                "declared {} payload bytes but only {} available",
                len,
                block.len().saturating_sub(start)
            ))
        })
}

/// Appends `values` to `out`, each packed as `format` in `endianness` order.
pub(crate) fn pack(
    values: &[f64],
    format: ElementFormat,
    endianness: Endianness,
    out: &mut Vec<u8>,
) -> Result<()> {
    for &value in values {
        let single = value as f32;
        if format == ElementFormat::Single && value.is_finite() && single.is_infinite() {
            return Err(Error::MalformedBlock(format!(
                "{} is out of range for single precision",
                value
            )));
        }

        match (format, endianness) {
            (ElementFormat::Single, Endianness::Little) => out.write_f32::<LE>(single)?,
            (ElementFormat::Single, Endianness::Big) => out.write_f32::<BE>(single)?,
            (ElementFormat::Double, Endianness::Little) => out.write_f64::<LE>(value)?,
            (ElementFormat::Double, Endianness::Big) => out.write_f64::<BE>(value)?,
        }
    }
    Ok(())
}

/// Unpacks a whole payload. The payload length must be a multiple of the
/// element size.
pub(crate) fn unpack(
    payload: &[u8],
    format: ElementFormat,
    endianness: Endianness,
) -> Result<Vec<f64>> {
    let size = format.size();
    if payload.len() % size != 0 {
        return Err(Error::MalformedBlock(format!(
            "payload of {} bytes is not a multiple of the {}-byte {} element",
            payload.len(),
            size,
            format
        )));
    }

    let count = payload.len() / size;
    let mut values = Vec::with_capacity(count);
    let mut reader = Cursor::new(payload);

    for _ in 0..count {
        let value = match (format, endianness) {
            (ElementFormat::Single, Endianness::Little) => reader.read_f32::<LE>()? as f64,
            (ElementFormat::Single, Endianness::Big) => reader.read_f32::<BE>()? as f64,
            (ElementFormat::Double, Endianness::Little) => reader.read_f64::<LE>()?,
            (ElementFormat::Double, Endianness::Big) => reader.read_f64::<BE>()?,
        };
        values.push(value);
    }
    Ok(values)
}
