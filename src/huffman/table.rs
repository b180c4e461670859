//! Canonical Huffman tables for hop symbols.
//!
//! A table is transmitted as 9 four-bit code lengths in hop index order
//! (15 = unused). Codes are assigned canonically: used symbols sorted by
//! (length, priority rank), consecutive code values, shifted left whenever the
//! length grows.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::bits::{BitReader, BitWriter};
use crate::error::{LheError, Result};
use crate::hop::types::{Hop, NUM_HOPS};
use crate::huffman::types::{
    HopHistogram, HuffmanEntry, LENGTH_BITS, MAX_CODE_LENGTH, UNUSED_LENGTH,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTable {
    /// Indexed by hop index.
    entries: [HuffmanEntry; NUM_HOPS],
    /// `decode_slots[len]` holds the `(code, symbol)` pairs of that length, sorted by code.
    decode_slots: Vec<Vec<(u32, Hop)>>,
    max_length: u8,
}

impl HuffmanTable {
    /// Validate an explicit list of entries and build the decode slots.
    ///
    /// Symbols missing from `entries` are unused. Fails on a repeated symbol,
    /// an out-of-range length or code, two identical codes, a code that
    /// prefixes another, or when no symbol is used.
    pub fn from_entries(entries: &[HuffmanEntry]) -> Result<Self> {
        let mut table = [HuffmanEntry::unused(Hop::Null); NUM_HOPS];
        for (i, slot) in table.iter_mut().enumerate() {
            if let Some(hop) = Hop::from_index(i) {
                *slot = HuffmanEntry::unused(hop);
            }
        }
        let mut seen = [false; NUM_HOPS];
        for e in entries {
            let i = e.symbol.index();
            if seen[i] {
                return Err(LheError::InvalidHuffmanTable("symbol listed twice"));
            }
            seen[i] = true;
            if e.is_used() {
                if e.length == 0 || e.length > MAX_CODE_LENGTH {
                    return Err(LheError::InvalidHuffmanTable("code length out of range"));
                }
                if e.code >> e.length != 0 {
                    return Err(LheError::InvalidHuffmanTable("code wider than its length"));
                }
            }
            table[i] = *e;
        }

        let used: Vec<&HuffmanEntry> = table.iter().filter(|e| e.is_used()).collect();
        if used.is_empty() {
            return Err(LheError::InvalidHuffmanTable("no used symbol"));
        }
        for (n, a) in used.iter().enumerate() {
            for b in &used[n + 1..] {
                let (short, long) = if a.length <= b.length { (a, b) } else { (b, a) };
                if long.code >> (long.length - short.length) == short.code {
                    return Err(LheError::InvalidHuffmanTable(if short.length == long.length {
                        "duplicate code"
                    } else {
                        "code is a prefix of another"
                    }));
                }
            }
        }

        let max_length = used.iter().map(|e| e.length).max().unwrap_or(1);
        let mut decode_slots = vec![Vec::new(); MAX_CODE_LENGTH as usize + 1];
        for e in &used {
            decode_slots[e.length as usize].push((e.code, e.symbol));
        }
        for slot in &mut decode_slots {
            slot.sort_unstable_by_key(|&(code, _)| code);
        }

        Ok(Self {
            entries: table,
            decode_slots,
            max_length,
        })
    }

    /// Assign canonical codes to per-symbol lengths (hop index order).
    pub fn from_lengths(lengths: &[u8; NUM_HOPS]) -> Result<Self> {
        Self::canonical(lengths, &[0; NUM_HOPS])
    }

    fn canonical(lengths: &[u8; NUM_HOPS], counts: &[u64; NUM_HOPS]) -> Result<Self> {
        let mut used: Vec<HuffmanEntry> = Vec::with_capacity(NUM_HOPS);
        for hop in Hop::ALL {
            let length = lengths[hop.index()];
            if length == UNUSED_LENGTH {
                continue;
            }
            if length == 0 || length > MAX_CODE_LENGTH {
                return Err(LheError::InvalidHuffmanTable("code length out of range"));
            }
            used.push(HuffmanEntry {
                symbol: hop,
                length,
                code: 0,
                count: counts[hop.index()],
            });
        }
        used.sort_by_key(|e| (e.length, e.symbol.priority_rank()));

        let mut code = 0u32;
        let mut prev_length = used.first().map_or(0, |e| e.length);
        for e in &mut used {
            code <<= e.length - prev_length;
            prev_length = e.length;
            if code >> e.length != 0 {
                return Err(LheError::InvalidHuffmanTable("over-subscribed code lengths"));
            }
            e.code = code;
            code += 1;
        }
        Self::from_entries(&used)
    }

    /// Build the code for a plane from its hop histogram.
    ///
    /// Classic pairwise merge over the used symbols; a lone used symbol gets
    /// a 1-bit code.
    pub fn from_histogram(histogram: &HopHistogram) -> Result<Self> {
        let counts = histogram.counts();
        let mut lengths = [UNUSED_LENGTH; NUM_HOPS];
        let used: Vec<usize> = (0..NUM_HOPS).filter(|&i| counts[i] > 0).collect();
        match used.len() {
            0 => return Err(LheError::InvalidHuffmanTable("no used symbol")),
            1 => lengths[used[0]] = 1,
            _ => {
                // Nodes 0..used.len() are leaves; merged nodes follow.
                let mut parent: Vec<usize> = vec![usize::MAX; used.len()];
                let mut heap: BinaryHeap<Reverse<(u64, usize)>> = used
                    .iter()
                    .enumerate()
                    .map(|(node, &sym)| Reverse((counts[sym], node)))
                    .collect();
                while heap.len() > 1 {
                    let (Some(Reverse((wa, a))), Some(Reverse((wb, b)))) = (heap.pop(), heap.pop())
                    else {
                        break;
                    };
                    let node = parent.len();
                    parent.push(usize::MAX);
                    parent[a] = node;
                    parent[b] = node;
                    heap.push(Reverse((wa + wb, node)));
                }
                for (leaf, &sym) in used.iter().enumerate() {
                    let mut depth = 0u8;
                    let mut n = leaf;
                    while parent[n] != usize::MAX {
                        n = parent[n];
                        depth += 1;
                    }
                    lengths[sym] = depth;
                }
            }
        }
        Self::canonical(&lengths, counts)
    }

    /// Parse the 9 transmitted lengths and rebuild the canonical code.
    pub fn read_header(reader: &mut BitReader<'_>) -> Result<Self> {
        let mut lengths = [0u8; NUM_HOPS];
        for l in &mut lengths {
            *l = reader.read_bits(LENGTH_BITS)? as u8;
        }
        Self::from_lengths(&lengths)
    }

    pub fn write_header(&self, writer: &mut BitWriter) {
        for e in &self.entries {
            writer.write_bits(e.length as u32, LENGTH_BITS);
        }
    }

    pub fn encode_symbol(&self, writer: &mut BitWriter, hop: Hop) -> Result<()> {
        let e = &self.entries[hop.index()];
        if !e.is_used() {
            return Err(LheError::InvalidArgument("hop absent from Huffman table"));
        }
        writer.write_bits(e.code, e.length as u32);
        Ok(())
    }

    /// Read one symbol bit by bit, matching against codes of the current length.
    pub fn decode_symbol(&self, reader: &mut BitReader<'_>) -> Result<Hop> {
        let mut code = 0u32;
        for length in 1..=self.max_length as usize {
            code = (code << 1) | reader.read_bit()?;
            let slot = &self.decode_slots[length];
            if let Ok(i) = slot.binary_search_by_key(&code, |&(c, _)| c) {
                return Ok(slot[i].1);
            }
        }
        Err(LheError::InvalidHuffmanTable("bit pattern matches no code"))
    }

    /// Decode `count` symbols, appending them to `out`.
    pub fn decode_into(&self, reader: &mut BitReader<'_>, count: usize, out: &mut Vec<Hop>) -> Result<()> {
        out.try_reserve_exact(count)
            .map_err(|_| LheError::AllocationFailed(count))?;
        for _ in 0..count {
            out.push(self.decode_symbol(reader)?);
        }
        Ok(())
    }

    pub fn entry(&self, hop: Hop) -> &HuffmanEntry {
        &self.entries[hop.index()]
    }

    pub fn entries(&self) -> &[HuffmanEntry; NUM_HOPS] {
        &self.entries
    }

    /// Code lengths in hop index order, as transmitted.
    pub fn lengths(&self) -> [u8; NUM_HOPS] {
        let mut out = [UNUSED_LENGTH; NUM_HOPS];
        for (o, e) in out.iter_mut().zip(self.entries.iter()) {
            *o = e.length;
        }
        out
    }

    /// Size in bits of coding `histogram` with this table (unused symbols ignored).
    pub fn encoded_bits(&self, histogram: &HopHistogram) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.is_used())
            .map(|e| e.length as u64 * histogram.count(e.symbol))
            .sum()
    }
}
