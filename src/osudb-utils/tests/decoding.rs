use osudb_utils::binary::{self, BinaryError, BinaryReader};

#[test]
fn uleb128_vectors() -> Result<(), BinaryError> {
    let vectors: &[(&[u8], u64)] = &[
        (&[0x00], 0),
        (&[0x7F], 127),
        (&[0x80, 0x01], 128),
        (&[0xFF, 0xFF, 0x03], 65535),
        (&[0xE5, 0x8E, 0x26], 624485),
    ];

    for &(bytes, expected) in vectors {
        let mut cursor = 0;
        assert_eq!(binary::uleb128(bytes, &mut cursor)?, expected);
        assert_eq!(cursor, bytes.len());
    }

    Ok(())
}

#[test]
fn uleb128_stops_at_terminator() -> Result<(), BinaryError> {
    let buf = [0x80, 0x01, 0xAA];
    let mut cursor = 0;

    assert_eq!(binary::uleb128(&buf, &mut cursor)?, 128);
    assert_eq!(cursor, 2);

    Ok(())
}

#[test]
fn uleb128_discards_overflowing_bits() -> Result<(), BinaryError> {
    // Eleven bytes carry 77 payload bits; only the low 64 survive.
    let mut buf = vec![0xFF; 10];
    buf.push(0x7F);

    let mut cursor = 0;
    assert_eq!(binary::uleb128(&buf, &mut cursor)?, u64::MAX);
    assert_eq!(cursor, 11);

    Ok(())
}

#[test]
fn uleb128_unterminated() {
    let buf = [0x80, 0x80];
    let mut cursor = 0;

    assert_eq!(
        binary::uleb128(&buf, &mut cursor),
        Err(BinaryError::OutOfBounds {
            offset: 2,
            needed: 1,
            len: 2
        })
    );
    assert_eq!(cursor, 0);
}

#[test]
fn absent_string() -> Result<(), BinaryError> {
    let buf = [0x00];
    let mut cursor = 0;

    assert_eq!(binary::prefixed_string(&buf, &mut cursor)?, "");
    assert_eq!(cursor, 1);

    Ok(())
}

#[test]
fn present_string() -> Result<(), BinaryError> {
    let buf = [0x01, 0x03, b'a', b'b', b'c'];
    let mut cursor = 0;

    assert_eq!(binary::prefixed_string(&buf, &mut cursor)?, "abc");
    assert_eq!(cursor, 5);

    Ok(())
}

#[test]
fn string_with_multibyte_length() -> Result<(), BinaryError> {
    let mut buf = vec![0x0B, 0x80, 0x01];
    buf.extend(std::iter::repeat(b'x').take(128));
    let mut cursor = 0;

    let s = binary::prefixed_string(&buf, &mut cursor)?;
    assert_eq!(s.len(), 128);
    assert_eq!(cursor, 131);

    Ok(())
}

#[test]
fn string_bytes_are_not_validated() -> Result<(), BinaryError> {
    let buf = [0x0B, 0x02, 0xFF, 0xFE];
    let mut cursor = 0;

    assert_eq!(binary::prefixed_bytes(&buf, &mut cursor)?, &[0xFF, 0xFE]);
    assert_eq!(cursor, 4);

    cursor = 0;
    assert_eq!(binary::prefixed_string(&buf, &mut cursor)?, "\u{FFFD}\u{FFFD}");

    Ok(())
}

#[test]
fn truncated_string() {
    let buf = [0x0B, 0x05, b'a', b'b'];
    let mut cursor = 0;

    assert!(matches!(
        binary::prefixed_string(&buf, &mut cursor),
        Err(BinaryError::OutOfBounds { offset: 2, needed: 5, len: 4 })
    ));
    assert_eq!(cursor, 0);
}

#[test]
fn sequential_int32() -> Result<(), BinaryError> {
    let buf = [0x14, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF];
    let mut cursor = 0;

    assert_eq!(binary::read::<i32>(&buf, &mut cursor)?, 20);
    assert_eq!(binary::read::<i32>(&buf, &mut cursor)?, -1);
    assert_eq!(cursor, 8);

    Ok(())
}

#[test]
fn fixed_width_is_little_endian() -> Result<(), BinaryError> {
    // The format is defined by what the game client writes, which is
    // little endian. Decoding must not depend on the host byte order.
    let buf = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    let mut cursor = 0;
    assert_eq!(binary::read::<u32>(&buf, &mut cursor)?, 0x0403_0201);

    cursor = 0;
    assert_eq!(binary::read::<u64>(&buf, &mut cursor)?, 0x0807_0605_0403_0201);

    cursor = 0;
    assert_eq!(binary::read::<u16>(&buf, &mut cursor)?, 0x0201);

    Ok(())
}

#[test]
fn booleans_and_bytes() -> Result<(), BinaryError> {
    let buf = [0x00, 0x01, 0x2A, 0xFF];
    let mut cursor = 0;

    assert!(!binary::read::<bool>(&buf, &mut cursor)?);
    assert!(binary::read::<bool>(&buf, &mut cursor)?);
    assert!(binary::read::<bool>(&buf, &mut cursor)?);
    assert_eq!(binary::read::<i8>(&buf, &mut cursor)?, -1);
    assert_eq!(cursor, 4);

    Ok(())
}

#[test]
fn read_past_end() {
    let buf = [0x01, 0x02, 0x03];
    let mut cursor = 0;

    assert_eq!(
        binary::read::<u32>(&buf, &mut cursor),
        Err(BinaryError::OutOfBounds {
            offset: 0,
            needed: 4,
            len: 3
        })
    );
    assert_eq!(cursor, 0);

    cursor = 3;
    assert!(binary::read::<u8>(&buf, &mut cursor).is_err());
    assert_eq!(cursor, 3);
}

#[test]
fn written_values_read_back() -> Result<(), Box<dyn std::error::Error>> {
    let mut out = Vec::new();
    binary::write(&mut out, 20_250_101i32)?;
    binary::write(&mut out, true)?;
    binary::write_uleb128(&mut out, 300)?;
    binary::write_prefixed_string(&mut out, "peppy")?;
    binary::write_prefixed_string(&mut out, "")?;

    assert_eq!(&out[5..7], &[0xAC, 0x02]);

    let mut reader = BinaryReader::new(out.as_slice());
    assert_eq!(reader.read::<i32>()?, 20_250_101);
    assert!(reader.read::<bool>()?);
    assert_eq!(reader.uleb128()?, 300);
    assert_eq!(reader.prefixed_string()?, "peppy");
    assert_eq!(reader.prefixed_string()?, "");
    assert_eq!(reader.remaining(), 0);
    assert_eq!(reader.position(), out.len());

    Ok(())
}
