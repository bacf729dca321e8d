//! End-to-end tests over the public API.

use std::fs::{self, File};
use std::io::{BufReader, Cursor, Seek, SeekFrom, Write};

use huffzip::header::{read_header, write_header};
use huffzip::{
    CodeTable, Error, FrequencyTable, PrefixTree, Symbol, decode, decode_bytes, encode,
    encode_bytes,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn text_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("poem.txt");
    let packed = dir.path().join("poem.huff");
    let restored = dir.path().join("poem.out");

    let text = "Tyger Tyger, burning bright,\nIn the forests of the night;\n".repeat(50);
    fs::write(&plain, &text).unwrap();

    let stats = encode(File::open(&plain).unwrap(), File::create(&packed).unwrap()).unwrap();
    assert!(stats.output_bytes() < text.len() as u64);
    assert_eq!(fs::metadata(&packed).unwrap().len(), stats.output_bytes());

    let packed = BufReader::new(File::open(&packed).unwrap());
    decode(packed, File::create(&restored).unwrap()).unwrap();
    assert_eq!(fs::read_to_string(&restored).unwrap(), text);
}

#[test]
fn tempfile_handles_are_enough() {
    let mut input = tempfile::tempfile().unwrap();
    input.write_all(b"handles, not paths").unwrap();
    input.seek(SeekFrom::Start(0)).unwrap();

    let mut packed = tempfile::tempfile().unwrap();
    encode(&mut input, &mut packed).unwrap();
    packed.seek(SeekFrom::Start(0)).unwrap();

    let mut out = Vec::new();
    decode(BufReader::new(&mut packed), &mut out).unwrap();
    assert_eq!(out, b"handles, not paths");
}

#[test]
fn skewed_random_corpus_round_trips() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    // Geometric-ish distribution so code lengths vary widely
    let data: Vec<u8> = (0..50_000)
        .map(|_| {
            let mut b = 0u8;
            while b < 255 && rng.gen_bool(0.5) {
                b += 1;
            }
            b
        })
        .collect();

    let encoded = encode_bytes(&data).unwrap();
    assert!(encoded.len() < data.len());
    assert_eq!(decode_bytes(&encoded).unwrap(), data);
}

#[test]
fn all_byte_values_round_trip() {
    let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    assert_eq!(decode_bytes(&encode_bytes(&data).unwrap()).unwrap(), data);
}

#[test]
fn decode_ignores_bytes_after_sentinel() {
    let mut stream = encode_bytes(b"payload").unwrap();
    let end = stream.len() as u64;
    stream.extend_from_slice(b"TRAILER");

    let mut cursor = Cursor::new(stream);
    let mut out = Vec::new();
    let stats = decode(&mut cursor, &mut out).unwrap();
    assert_eq!(out, b"payload");
    assert_eq!(stats.header_bytes + stats.payload_bytes, end);
    assert_eq!(cursor.position(), end);
}

#[test]
fn header_and_payload_are_distinct_failures() {
    let encoded = encode_bytes(b"distinct failure kinds").unwrap();

    let err = decode_bytes(&encoded[..6]).unwrap_err();
    assert!(matches!(err, Error::MalformedHeader(_)), "{err}");

    let (_, header_len) = read_header(&mut Cursor::new(&encoded)).unwrap();
    let err = decode_bytes(&encoded[..header_len as usize]).unwrap_err();
    assert!(matches!(err, Error::TruncatedPayload { bits_read: 0 }), "{err}");
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn table_for(data: &[u8]) -> CodeTable {
        CodeTable::from_tree(&PrefixTree::build(&FrequencyTable::from_bytes(data)))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        #[test]
        fn prop_round_trip(data in prop::collection::vec(any::<u8>(), 0..2048)) {
            let encoded = encode_bytes(&data).unwrap();
            prop_assert_eq!(decode_bytes(&encoded).unwrap(), data);
        }

        #[test]
        fn prop_narrow_alphabet_round_trip(data in prop::collection::vec(0u8..4, 0..512)) {
            let encoded = encode_bytes(&data).unwrap();
            prop_assert_eq!(decode_bytes(&encoded).unwrap(), data);
        }

        #[test]
        fn prop_encoding_is_deterministic(data in prop::collection::vec(any::<u8>(), 0..1024)) {
            prop_assert_eq!(encode_bytes(&data).unwrap(), encode_bytes(&data).unwrap());
        }

        #[test]
        fn prop_codes_are_prefix_free(data in prop::collection::vec(any::<u8>(), 0..1024)) {
            let table = table_for(&data);
            let codes: Vec<_> = table.iter().collect();
            for (i, (sa, a)) in codes.iter().enumerate() {
                for (sb, b) in codes.iter().skip(i + 1) {
                    prop_assert!(!a.starts_with(b), "{} ({}) starts with {} ({})", a, sa, b, sb);
                    prop_assert!(!b.starts_with(a), "{} ({}) starts with {} ({})", b, sb, a, sa);
                }
            }
        }

        #[test]
        fn prop_every_symbol_has_a_code(data in prop::collection::vec(any::<u8>(), 0..1024)) {
            let table = table_for(&data);
            for &b in &data {
                prop_assert!(table.get(Symbol::Byte(b)).is_some());
            }
            prop_assert!(table.end_of_stream().is_some());
        }

        #[test]
        fn prop_header_describes_itself(data in prop::collection::vec(any::<u8>(), 0..1024)) {
            let table = table_for(&data);
            let mut bytes = Vec::new();
            let written = write_header(&table, &mut bytes).unwrap();
            let (decoded, read) = read_header(&mut Cursor::new(&bytes)).unwrap();
            prop_assert_eq!(written, read);
            prop_assert_eq!(decoded.invert(), table);
        }

        #[test]
        fn prop_trailing_garbage_is_ignored(
            data in prop::collection::vec(any::<u8>(), 0..512),
            garbage in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let mut encoded = encode_bytes(&data).unwrap();
            encoded.extend_from_slice(&garbage);
            prop_assert_eq!(decode_bytes(&encoded).unwrap(), data);
        }

        #[test]
        fn prop_payload_size_matches_bit_count(data in prop::collection::vec(any::<u8>(), 0..512)) {
            let table = table_for(&data);
            let bits: u64 = data
                .iter()
                .map(|&b| table.get(Symbol::Byte(b)).unwrap().len() as u64)
                .sum::<u64>()
                + table.end_of_stream().unwrap().len() as u64;

            let mut out = Vec::new();
            let stats = encode(Cursor::new(&data), &mut out).unwrap();
            prop_assert_eq!(stats.payload_bytes, bits.div_ceil(8));
        }
    }
}
