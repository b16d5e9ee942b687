use instrio_core::{
    from_ieee_block, parse_ascii, parse_binary, to_ieee_block, ElementFormat, Endianness, Error,
};

fn waveform(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 * 0.37).sin() * 2.5).collect()
}

#[test]
fn test_round_trip_all_formats() {
    for n in [0, 1, 9, 10, 100, 2048] {
        let values = waveform(n);
        for endianness in [Endianness::Little, Endianness::Big] {
            let block = to_ieee_block(&values, ElementFormat::Double, endianness).unwrap();
            assert_eq!(
                from_ieee_block(&block, ElementFormat::Double, endianness).unwrap(),
                values
            );

            let block = to_ieee_block(&values, ElementFormat::Single, endianness).unwrap();
            let decoded = from_ieee_block(&block, ElementFormat::Single, endianness).unwrap();
            assert_eq!(decoded.len(), values.len());
            for (got, want) in decoded.iter().zip(&values) {
                assert!((got - want).abs() <= want.abs() * f32::EPSILON as f64);
            }
        }
    }
}

#[test]
fn test_legacy_decoder_reads_primary_blocks() {
    let values = waveform(12);
    let block = to_ieee_block(&values, ElementFormat::Single, Endianness::Big).unwrap();
    let primary = from_ieee_block(&block, ElementFormat::Single, Endianness::Big).unwrap();
    let legacy = parse_binary(&block, true, true).unwrap();
    assert_eq!(primary, legacy);
}

#[test]
fn test_instrument_reply_with_terminator() {
    let mut reply = to_ieee_block(&[1.0, -1.0], ElementFormat::Double, Endianness::Little).unwrap();
    reply.push(b'\n');
    assert_eq!(
        from_ieee_block(&reply, ElementFormat::Double, Endianness::Little).unwrap(),
        vec![1.0, -1.0]
    );
    assert_eq!(parse_binary(&reply, false, false).unwrap(), vec![1.0, -1.0]);
}

#[test]
fn test_indefinite_terminator_handling_differs() {
    let mut reply = b"#0".to_vec();
    reply.extend(3.0f32.to_le_bytes());
    reply.extend(b"\r\n");

    // Primary decode drops the partial trailing element.
    assert_eq!(
        from_ieee_block(&reply, ElementFormat::Single, Endianness::Little).unwrap(),
        vec![3.0]
    );
    // Legacy decode strips only `\n`, leaving a stray `\r`.
    assert!(matches!(
        parse_binary(&reply, false, true),
        Err(Error::MalformedBlock(_))
    ));
}

#[test]
fn test_truncated_transfer() {
    let block = to_ieee_block(&waveform(8), ElementFormat::Double, Endianness::Little).unwrap();
    let cut = &block[..block.len() - 3];
    assert!(matches!(
        from_ieee_block(cut, ElementFormat::Double, Endianness::Little),
        Err(Error::MalformedBlock(_))
    ));
    assert!(matches!(
        parse_binary(cut, false, false),
        Err(Error::MalformedBlock(_))
    ));
}

#[test]
fn test_ascii_reply() {
    assert_eq!(parse_ascii("1.5, -2, +3.2e1 abc"), vec![1.5, -2.0, 32.0]);
    assert_eq!(
        parse_ascii("CURV 1.0E-3,2.0E-3,3.0E-3\n"),
        vec![1.0e-3, 2.0e-3, 3.0e-3]
    );
}
