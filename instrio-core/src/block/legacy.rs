use super::{find_marker, parse_declared_length, take_payload, unpack, ElementFormat, Endianness};
use crate::error::Result;

/// Older block decoder, kept for callers that rely on its terminator handling.
///
/// Differs from [`super::from_ieee_block`] in three ways:
/// - any header byte that is not a digit `1..=9` selects the indefinite form;
/// - in the indefinite form a single trailing `\n` is stripped, and only there;
/// - an indefinite payload that is not a whole number of elements is rejected
///   instead of truncated.
pub fn parse_binary(bytes_data: &[u8], is_big_endian: bool, is_single: bool) -> Result<Vec<f64>> {
    let format = if is_single {
        ElementFormat::Single
    } else {
        ElementFormat::Double
    };
    let endianness = Endianness::from_big_endian(is_big_endian);

    let data = &bytes_data[find_marker(bytes_data)?..];

    let payload = match data.get(1).copied() {
        Some(digit @ b'1'..=b'9') => {
            let number_of_digits = (digit - b'0') as usize;
            let digits = take_payload(data, 2, number_of_digits)?;
            let data_length = parse_declared_length(digits)?;
            take_payload(data, 2 + number_of_digits, data_length)?
        }
        _ => {
            let payload = data.get(2..).unwrap_or_default();
            payload.strip_suffix(b"\n").unwrap_or(payload)
        }
    };

    unpack(payload, format, endianness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn definite_block() {
        let mut block = b"#18".to_vec();
        block.extend(2.5f64.to_be_bytes());
        assert_eq!(parse_binary(&block, true, false).unwrap(), vec![2.5]);
    }

    #[test]
    fn indefinite_block_strips_one_newline() {
        let mut block = b"#0".to_vec();
        block.extend(1.5f32.to_le_bytes());
        block.extend(2.5f32.to_le_bytes());
        block.push(b'\n');
        assert_eq!(parse_binary(&block, false, true).unwrap(), vec![1.5, 2.5]);
    }

    #[test]
    fn indefinite_block_rejects_partial_element() {
        let mut block = b"#0".to_vec();
        block.extend(1.5f32.to_le_bytes());
        block.extend(b"\r\n");
        assert!(matches!(
            parse_binary(&block, false, true),
            Err(Error::MalformedBlock(_))
        ));
    }

    // The newline is only stripped in the indefinite form. A definite block
    // ignores whatever follows its payload, so the asymmetry is only visible
    // when the declared length itself covers the terminator.
    #[test]
    fn definite_block_keeps_newline_inside_declared_length() {
        let mut block = b"#15".to_vec();
        block.extend(1.5f32.to_le_bytes());
        block.push(b'\n');
        assert!(matches!(
            parse_binary(&block, false, true),
            Err(Error::MalformedBlock(_))
        ));
    }

    #[test]
    fn non_digit_header_is_indefinite() {
        let mut block = b"#x".to_vec();
        block.extend(7.0f64.to_le_bytes());
        assert_eq!(parse_binary(&block, false, false).unwrap(), vec![7.0]);
    }

    #[test]
    fn bare_marker_is_empty() {
        assert!(parse_binary(b"#", false, false).unwrap().is_empty());
    }

    #[test]
    fn missing_marker_is_malformed() {
        assert!(matches!(
            parse_binary(b"no block here", false, false),
            Err(Error::MalformedBlock(_))
        ));
    }

    #[test]
    fn truncated_definite_block_is_malformed() {
        let mut block = b"#216".to_vec();
        block.extend(1.0f64.to_le_bytes());
        assert!(matches!(
            parse_binary(&block, false, false),
            Err(Error::MalformedBlock(_))
        ));
    }
}
