use super::{
    find_marker, pack, parse_declared_length, take_payload, unpack, ElementFormat, Endianness,
};
use crate::error::{Error, Result};

/// The header-length field is a single ASCII digit.
pub const MAX_LENGTH_DIGITS: usize = 9;

/// Builds `#<L><N>` for a payload of `payload_len` bytes.
pub fn block_header(payload_len: usize) -> Result<Vec<u8>> {
    let length = payload_len.to_string();
    if length.len() > MAX_LENGTH_DIGITS {
        return Err(Error::SizeOverflow { payload_len });
    }
    Ok(format!("#{}{}", length.len(), length).into_bytes())
}

/// Encodes `values` as a definite-length block.
///
/// With `ElementFormat::Single`, a finite value too large for `f32` is
/// `MalformedBlock`. Infinities and NaN pass through.
pub fn to_ieee_block(
    values: &[f64],
    format: ElementFormat,
    endianness: Endianness,
) -> Result<Vec<u8>> {
    let payload_len = values
        .len()
        .checked_mul(format.size())
        .ok_or(Error::SizeOverflow {
            payload_len: usize::MAX,
        })?;

    let mut block = block_header(payload_len)?;
    block.reserve_exact(payload_len);
    pack(values, format, endianness, &mut block)?;

    log::debug!(
        "Encoded {} {} values into a {}-byte block",
        values.len(),
        format,
        block.len()
    );
    Ok(block)
}

/// Decodes a definite or indefinite-length block.
///
/// Bytes before the first `#` are skipped, as are bytes after a definite
/// payload (typically a line terminator). In the indefinite form every byte
/// after `#0` is payload, and a trailing partial element is dropped.
pub fn from_ieee_block(
    block: &[u8],
    format: ElementFormat,
    endianness: Endianness,
) -> Result<Vec<f64>> {
    let begin = find_marker(block)?;
    let header_length = match block.get(begin + 1) {
        Some(digit) if digit.is_ascii_digit() => (digit - b'0') as usize,
        Some(other) => {
            return Err(Error::MalformedBlock(format!(
                "expected header digit after '#', found {:#04x}",
                other
            )))
        }
        None => return Err(Error::MalformedBlock("block ends after '#'".into())),
    };

    let offset = begin + 2;
    if header_length == 0 {
        let size = format.size();
        let count = (block.len() - offset) / size;
        log::debug!("Indefinite-length block with {} elements", count);
        return unpack(&block[offset..offset + count * size], format, endianness);
    }

    let digits = take_payload(block, offset, header_length)?;
    let data_length = parse_declared_length(digits)?;
    let payload = take_payload(block, offset + header_length, data_length)?;

    unpack(payload, format, endianness)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubles_le(values: &[f64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn header_counts_payload_bytes() {
        let block = to_ieee_block(&[1.0, 2.0, 3.0], ElementFormat::Double, Endianness::Little)
            .unwrap();
        assert_eq!(&block[..4], b"#224");
        assert_eq!(block.len(), 4 + 24);
    }

    #[test]
    fn encoded_length_matches_header_arithmetic() {
        for n in [0usize, 1, 2, 13, 250, 1300] {
            let values: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();
            for format in [ElementFormat::Single, ElementFormat::Double] {
                let payload_len = n * format.size();
                let block = to_ieee_block(&values, format, Endianness::Big).unwrap();
                assert_eq!(block.len(), 2 + payload_len.to_string().len() + payload_len);
            }
        }
    }

    #[test]
    fn round_trip_double_and_single() {
        let values = vec![0.0, -1.25, 3.5e10, f64::MIN_POSITIVE, 42.0];
        for endianness in [Endianness::Little, Endianness::Big] {
            let block = to_ieee_block(&values, ElementFormat::Double, endianness).unwrap();
            assert_eq!(
                from_ieee_block(&block, ElementFormat::Double, endianness).unwrap(),
                values
            );

            let block = to_ieee_block(&values, ElementFormat::Single, endianness).unwrap();
            let decoded = from_ieee_block(&block, ElementFormat::Single, endianness).unwrap();
            for (got, want) in decoded.iter().zip(&values) {
                assert_eq!(*got, *want as f32 as f64);
            }
        }
    }

    #[test]
    fn header_overflow_is_rejected() {
        assert_eq!(block_header(999_999_999).unwrap(), b"#9999999999".to_vec());
        assert!(matches!(
            block_header(1_000_000_000),
            Err(Error::SizeOverflow {
                payload_len: 1_000_000_000
            })
        ));
    }

    #[test]
    fn skips_leading_bytes_and_trailing_terminator() {
        let mut block = b"junk#216".to_vec();
        block.extend(doubles_le(&[1.0, 2.0]));
        block.extend(b"\r\n");
        assert_eq!(
            from_ieee_block(&block, ElementFormat::Double, Endianness::Little).unwrap(),
            vec![1.0, 2.0]
        );
    }

    #[test]
    fn indefinite_block_uses_whole_buffer() {
        for k in [0usize, 1, 7, 64] {
            let values: Vec<f64> = (0..k).map(|i| i as f64).collect();
            let mut block = b"#0".to_vec();
            block.extend(doubles_le(&values));
            let decoded =
                from_ieee_block(&block, ElementFormat::Double, Endianness::Little).unwrap();
            assert_eq!(decoded.len(), k);
            assert_eq!(decoded, values);
        }
    }

    #[test]
    fn indefinite_block_drops_partial_element() {
        let mut block = b"#0".to_vec();
        block.extend(doubles_le(&[5.0]));
        block.push(b'\n');
        assert_eq!(
            from_ieee_block(&block, ElementFormat::Double, Endianness::Little).unwrap(),
            vec![5.0]
        );
    }

    #[test]
    fn truncated_payload_is_malformed() {
        let mut block = b"#216".to_vec();
        block.extend(doubles_le(&[1.0]));
        assert!(matches!(
            from_ieee_block(&block, ElementFormat::Double, Endianness::Little),
            Err(Error::MalformedBlock(_))
        ));
    }

    #[test]
    fn unaligned_declared_length_is_malformed() {
        let mut block = b"#17".to_vec();
        block.extend([0u8; 7]);
        assert!(matches!(
            from_ieee_block(&block, ElementFormat::Double, Endianness::Little),
            Err(Error::MalformedBlock(_))
        ));
    }

    // A non-digit header byte is rejected here, unlike the legacy decoder
    // which reads it as the indefinite form.
    #[test]
    fn missing_marker_or_header_is_malformed() {
        for block in [&b"1234"[..], b"#", b"#x12", b"#3", b"#21"] {
            assert!(
                matches!(
                    from_ieee_block(block, ElementFormat::Single, Endianness::Little),
                    Err(Error::MalformedBlock(_))
                ),
                "{:?}",
                block
            );
        }
    }
}
