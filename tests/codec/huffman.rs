// Tests for canonical Huffman tables over hop symbols.

use lhe::bits::{BitReader, BitWriter};
use lhe::hop::Hop;
use lhe::huffman::{HopHistogram, HuffmanEntry, HuffmanTable, UNUSED_LENGTH};
use lhe::LheError;

fn histogram(counts: &[(Hop, u64)]) -> HopHistogram {
    let mut h = HopHistogram::new();
    for &(hop, n) in counts {
        for _ in 0..n {
            h.add(hop);
        }
    }
    h
}

fn typical() -> HopHistogram {
    histogram(&[
        (Hop::Null, 500),
        (Hop::Pos1, 120),
        (Hop::Neg1, 110),
        (Hop::Pos2, 40),
        (Hop::Neg2, 35),
        (Hop::Pos3, 9),
        (Hop::Neg3, 7),
        (Hop::Pos4, 2),
        (Hop::Neg4, 1),
    ])
}

#[test]
fn identical_codes_rejected_before_any_symbol() {
    let entries = [
        HuffmanEntry { symbol: Hop::Null, length: 2, code: 0b01, count: 0 },
        HuffmanEntry { symbol: Hop::Pos1, length: 2, code: 0b01, count: 0 },
        HuffmanEntry { symbol: Hop::Neg1, length: 1, code: 0b1, count: 0 },
    ];
    let err = HuffmanTable::from_entries(&entries).unwrap_err();
    assert!(matches!(err, LheError::InvalidHuffmanTable(_)), "{err:?}");
}

#[test]
fn repeated_symbol_rejected() {
    let entries = [
        HuffmanEntry { symbol: Hop::Null, length: 1, code: 0, count: 0 },
        HuffmanEntry { symbol: Hop::Null, length: 1, code: 1, count: 0 },
    ];
    assert!(matches!(
        HuffmanTable::from_entries(&entries),
        Err(LheError::InvalidHuffmanTable(_))
    ));
}

#[test]
fn prefix_codes_rejected() {
    let entries = [
        HuffmanEntry { symbol: Hop::Null, length: 1, code: 0, count: 0 },
        HuffmanEntry { symbol: Hop::Pos1, length: 3, code: 0b010, count: 0 },
    ];
    assert!(matches!(
        HuffmanTable::from_entries(&entries),
        Err(LheError::InvalidHuffmanTable(_))
    ));
}

#[test]
fn histogram_codes_are_prefix_free_and_complete() {
    let t = HuffmanTable::from_histogram(&typical()).unwrap();
    let used: Vec<&HuffmanEntry> = t.entries().iter().filter(|e| e.is_used()).collect();
    assert_eq!(used.len(), 9);
    for (i, a) in used.iter().enumerate() {
        for b in &used[i + 1..] {
            let (s, l) = if a.length <= b.length { (a, b) } else { (b, a) };
            assert_ne!(l.code >> (l.length - s.length), s.code, "{a:?} prefixes {b:?}");
        }
    }
    let kraft: f64 = used.iter().map(|e| 0.5f64.powi(e.length as i32)).sum();
    assert!((kraft - 1.0).abs() < 1e-12);
}

#[test]
fn frequent_symbols_get_short_codes() {
    let t = HuffmanTable::from_histogram(&typical()).unwrap();
    assert_eq!(t.entry(Hop::Null).length, 1);
    assert!(t.entry(Hop::Pos1).length <= t.entry(Hop::Pos3).length);
    assert!(t.entry(Hop::Neg4).length >= t.entry(Hop::Neg2).length);
}

#[test]
fn canonical_order_follows_priority_on_equal_lengths() {
    // Four symbols of length 2: codes go 00, 01, 10, 11 in priority order.
    let mut lengths = [UNUSED_LENGTH; 9];
    for hop in [Hop::Neg1, Hop::Pos2, Hop::Null, Hop::Pos1] {
        lengths[hop.index()] = 2;
    }
    let t = HuffmanTable::from_lengths(&lengths).unwrap();
    assert_eq!(t.entry(Hop::Null).code, 0b00);
    assert_eq!(t.entry(Hop::Pos1).code, 0b01);
    assert_eq!(t.entry(Hop::Neg1).code, 0b10);
    assert_eq!(t.entry(Hop::Pos2).code, 0b11);
}

#[test]
fn symbols_survive_the_bitstream() {
    let t = HuffmanTable::from_histogram(&typical()).unwrap();
    let symbols: Vec<Hop> = (0..300).map(|i| Hop::ALL[(i * 7 + i / 3) % 9]).collect();
    let mut w = BitWriter::new();
    t.write_header(&mut w);
    for &s in &symbols {
        t.encode_symbol(&mut w, s).unwrap();
    }
    let bytes = w.finish();

    let mut r = BitReader::new(&bytes);
    let parsed = HuffmanTable::read_header(&mut r).unwrap();
    assert_eq!(parsed.lengths(), t.lengths());
    let mut out = Vec::new();
    parsed.decode_into(&mut r, symbols.len(), &mut out).unwrap();
    assert_eq!(out, symbols);
}

#[test]
fn single_used_symbol_costs_one_bit() {
    let h = histogram(&[(Hop::Pos2, 40)]);
    let t = HuffmanTable::from_histogram(&h).unwrap();
    assert_eq!(t.encoded_bits(&h), 40);
    // The other one-bit pattern decodes to nothing.
    let mut r = BitReader::new(&[0xFF]);
    assert!(matches!(t.decode_symbol(&mut r), Err(LheError::InvalidHuffmanTable(_))));
}

#[test]
fn unusable_length_sets_rejected() {
    assert!(HuffmanTable::from_lengths(&[UNUSED_LENGTH; 9]).is_err());
    assert!(HuffmanTable::from_lengths(&[1; 9]).is_err());
    let mut zero = [UNUSED_LENGTH; 9];
    zero[4] = 0;
    assert!(HuffmanTable::from_lengths(&zero).is_err());
    assert!(HuffmanTable::from_histogram(&HopHistogram::new()).is_err());
}

#[test]
fn symbol_outside_table_cannot_be_encoded() {
    let t = HuffmanTable::from_histogram(&histogram(&[(Hop::Null, 3), (Hop::Pos1, 1)])).unwrap();
    let mut w = BitWriter::new();
    assert!(t.encode_symbol(&mut w, Hop::Neg4).is_err());
}

#[test]
fn truncated_symbol_stream() {
    let t = HuffmanTable::from_histogram(&typical()).unwrap();
    let mut r = BitReader::new(&[]);
    assert!(matches!(t.decode_symbol(&mut r), Err(LheError::TruncatedBitstream)));
}
