use pbm_rotate::{Bitmap, Pbm, PbmDecoder, PbmError, PbmReader};
use proptest::prelude::*;

const PBM_RAW: &str = "P1
# test.pbm
7 5
0 0 0 0 0 0 0
0 0 1 1 1 0 0
0 0 0 1 0 0 0
0 0 0 1 0 0 0
0 0 0 0 0 0 0
";

fn bitmap_strategy() -> impl Strategy<Value = Bitmap> {
    (1usize..12, 1usize..12).prop_flat_map(|(width, height)| {
        prop::collection::vec(0u8..2, width * height).prop_map(move |data| {
            let rows: Vec<&[u8]> = data.chunks(width).collect();
            Bitmap::from_rows(&rows).expect("valid rows")
        })
    })
}

fn pbm_strategy() -> impl Strategy<Value = Pbm> {
    (
        bitmap_strategy(),
        prop::collection::vec("[ -~]{0,24}", 0..4),
    )
        .prop_map(|(bitmap, comments)| Pbm::new(bitmap, comments))
}

#[test]
fn test_decode() {
    let pbm = Pbm::decode(PBM_RAW.as_bytes()).expect("decode");

    assert_eq!(pbm.comments(), &["test.pbm".to_string()]);
    assert_eq!(pbm.width(), 7);
    assert_eq!(pbm.height(), 5);
    assert_eq!(pbm.bitmap().width(), 7);
    assert_eq!(pbm.bitmap().height(), 5);
    assert_eq!(pbm.bitmap().row(1), &[0, 0, 1, 1, 1, 0, 0]);
    assert_eq!(pbm.bitmap().count_ones(), 5);
}

#[test]
fn test_encode() {
    let pbm = Pbm::decode(PBM_RAW.as_bytes()).expect("decode");
    let mut out = Vec::new();
    pbm.encode(&mut out).expect("encode");

    let expected = "P1
# test.pbm
7 5
0 0 0 0 0 0 0 
0 0 1 1 1 0 0 
0 0 0 1 0 0 0 
0 0 0 1 0 0 0 
0 0 0 0 0 0 0 
";
    assert_eq!(String::from_utf8(out).expect("utf8"), expected);
}

#[test]
fn test_repeat_decode_encode() {
    let first = Pbm::decode(PBM_RAW.as_bytes())
        .expect("decode")
        .encode_to_vec();
    let second = Pbm::decode(first.as_slice())
        .expect("decode")
        .encode_to_vec();
    assert_eq!(first, second);
}

#[test]
fn test_comments_in_order_with_crlf() {
    let input = b"P1\r\n# one\r\n#two\r\n3 # three\r\n1\r\n1 0 1\r\n";
    let pbm = Pbm::decode(&input[..]).expect("decode");
    assert_eq!(
        pbm.comments(),
        &["one".to_string(), "two".to_string(), "three".to_string()]
    );
    assert_eq!(pbm.bitmap().row(0), &[1, 0, 1]);
}

#[test]
fn test_invalid_format_tag() {
    let err = Pbm::decode(&b"P2\n7 5\n"[..]).unwrap_err();
    assert!(matches!(err, PbmError::InvalidFormatTag { .. }));
}

#[test]
fn test_invalid_pixel_token() {
    let input = PBM_RAW.replacen("0 0 1 1 1", "0 0 1 x 1", 1);
    let err = Pbm::decode(input.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        PbmError::InvalidPixelToken {
            byte: b'x',
            row: 1,
            col: 3
        }
    ));
}

#[test]
fn test_header_errors() {
    assert!(matches!(
        Pbm::decode(&b"P1\n7"[..]),
        Err(PbmError::UnexpectedEndOfHeader)
    ));
    assert!(matches!(
        Pbm::decode(&b"P1\n# never ends"[..]),
        Err(PbmError::UnexpectedEndOfHeader)
    ));
    assert!(matches!(
        Pbm::decode(&b"P1\n7 -5\n"[..]),
        Err(PbmError::UnexpectedCharacterInHeader { byte: b'-' })
    ));
    assert!(matches!(
        Pbm::decode(&b"P1\n0x7 5\n"[..]),
        Err(PbmError::UnexpectedCharacterInHeader { byte: b'x' })
    ));
    assert!(matches!(
        Pbm::decode(&b"P1\n7.0 5\n"[..]),
        Err(PbmError::UnexpectedCharacterInHeader { byte: b'.' })
    ));
}

#[test]
fn test_comment_after_dimensions_is_not_header() {
    let err = Pbm::decode(&b"P1\n1 1\n# late\n1\n"[..]).unwrap_err();
    assert!(matches!(err, PbmError::InvalidPixelToken { byte: b'#', .. }));
}

#[test]
fn test_reader_reports_first_error_once_decode_fails() {
    let mut reader = PbmReader::new(&b"P1\n2 2\n1 0\n"[..]);
    let err = PbmDecoder::new().decode_from(&mut reader).unwrap_err();
    assert!(matches!(
        err,
        PbmError::MalformedBitmap {
            expected: 4,
            actual: 2
        }
    ));
    assert!(matches!(
        reader.next_byte(),
        Err(PbmError::MalformedBitmap { .. })
    ));
}

#[test]
fn test_thin_bitmaps_decode() {
    let pbm = Pbm::decode(&b"P1\n1 1\n0\n"[..]).expect("1x1");
    assert_eq!(pbm.bitmap().as_slice(), &[0]);

    let pbm = Pbm::decode(&b"P1\n5 1\n1 1 0 0 1\n"[..]).expect("5x1");
    assert_eq!(pbm.bitmap().as_slice(), &[1, 1, 0, 0, 1]);

    let pbm = Pbm::decode(&b"P1\n1 5\n1\n1\n0\n0\n1\n"[..]).expect("1x5");
    assert_eq!(pbm.bitmap().as_slice(), &[1, 1, 0, 0, 1]);
}

#[test]
fn test_zero_dimension_image_does_not_round_trip() {
    let pbm = Pbm::new(Bitmap::new(0, 3), ["no columns"]);
    let encoded = pbm.encode_to_vec();
    assert_eq!(encoded, b"P1\n# no columns\n0 3\n");
    assert!(matches!(
        Pbm::decode(encoded.as_slice()),
        Err(PbmError::InvalidDimensions {
            width: 0,
            height: 3
        })
    ));
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(pbm in pbm_strategy()) {
        let encoded = pbm.encode_to_vec();
        let decoded = Pbm::decode(encoded.as_slice()).expect("decode");
        prop_assert_eq!(&decoded, &pbm);
        prop_assert_eq!(decoded.encode_to_vec(), encoded);
    }

    #[test]
    fn prop_dimensions_match_grid(pbm in pbm_strategy()) {
        let decoded = Pbm::decode(pbm.encode_to_vec().as_slice()).expect("decode");
        let bitmap = decoded.bitmap();
        prop_assert_eq!(bitmap.height(), decoded.height());
        prop_assert_eq!(bitmap.rows().count(), decoded.height());
        for row in bitmap.rows() {
            prop_assert_eq!(row.len(), decoded.width());
        }
    }

    #[test]
    fn prop_whitespace_layout_is_irrelevant(
        bitmap in bitmap_strategy(),
        separators in prop::collection::vec(prop::sample::select(vec![" ", "", "\n", "\t", "\r\n"]), 1..8),
    ) {
        let mut blob = format!("P1\n{} {}\n", bitmap.width(), bitmap.height());
        for (index, value) in bitmap.as_slice().iter().enumerate() {
            blob.push_str(&value.to_string());
            blob.push_str(separators[index % separators.len()]);
        }
        let decoded = Pbm::decode(blob.as_bytes()).expect("decode");
        prop_assert_eq!(decoded.bitmap(), &bitmap);
    }
}
