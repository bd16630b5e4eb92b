//! Encoder/decoder drivers: assemble and parse the full `HEADER ‖ DATA ‖ PAD`
//! wire format described in `SPEC_FULL.md` §6, stitching together the suffix
//! tree, BWT, RLE, Huffman, and Elias gamma stages.

use bit_vec::BitVec;

use crate::alphabet;
use crate::bits::{BitReader, BitWriter};
use crate::bwt;
use crate::elias;
use crate::huffman::{DecodeTrie, HuffmanTable};
use crate::rle::{self, Run};
use crate::Error;

/// Compress `s`, a non-empty byte string drawn from `[36, 126]`. A trailing
/// sentinel `$` is appended automatically if `s` does not already end with
/// one.
pub fn encode(s: &[u8]) -> Result<Vec<u8>, Error> {
    if s.is_empty() {
        return Err(Error::EmptyInput);
    }
    for &c in s {
        if !alphabet::is_valid(c) {
            log::warn!("rejecting input: byte {c:#04x} outside the printable ASCII alphabet");
            return Err(Error::InvalidSymbol(c));
        }
    }

    let mut owned;
    let s = if s.last() == Some(&alphabet::SENTINEL) {
        s
    } else {
        owned = s.to_vec();
        owned.push(alphabet::SENTINEL);
        &owned
    };

    let l = bwt::forward(s)?;
    let n = l.len();
    let table = HuffmanTable::build(&l);
    let runs = rle::encode(&l);

    let mut out = BitWriter::new();
    write_header(&mut out, n as u64, &table);
    write_data(&mut out, &runs, &table);

    let bytes = out.into_bytes();
    log::debug!(
        "encode: input_len={} n={} u={} runs={} output_bytes={}",
        s.len(),
        n,
        table.len(),
        runs.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Decompress a stream produced by [`encode`], recovering the original
/// sentinel-terminated string.
pub fn decode(bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let mut reader = BitReader::new(bytes);

    let n = elias::decode(&mut reader)? as usize;
    if n == 0 {
        return Err(Error::MalformedHeader("declared length n must be at least 1"));
    }
    let u = elias::decode(&mut reader)? as usize;
    if u == 0 || u > n {
        return Err(Error::MalformedHeader("declared distinct-symbol count u is out of range"));
    }

    let trie = read_header_table(&mut reader, u)?;

    let l = read_data(&mut reader, &trie, n)?;

    let s = bwt::inverse(&l)?;
    log::debug!("decode: output_bytes={} n={} u={}", bytes.len(), n, u);
    Ok(s)
}

fn write_header(out: &mut BitWriter, n: u64, table: &HuffmanTable) {
    elias::encode_into(n, out);
    elias::encode_into(table.len() as u64, out);
    for (symbol, codeword) in table.entries() {
        out.push_bits(symbol as u64, 7);
        elias::encode_into(codeword.len() as u64, out);
        out.push_bitvec(codeword);
    }
}

fn write_data(out: &mut BitWriter, runs: &[Run], table: &HuffmanTable) {
    for run in runs {
        let codeword =
            table.codeword(run.symbol).expect("every run symbol was tallied into the table");
        out.push_bitvec(codeword);
        elias::encode_into(run.run_length, out);
    }
}

fn read_header_table(reader: &mut BitReader, u: usize) -> Result<DecodeTrie, Error> {
    let mut trie = DecodeTrie::new();
    let mut seen = [false; alphabet::SIZE];
    for _ in 0..u {
        let ascii = reader.read_bits(7)? as u8;
        if !alphabet::is_valid(ascii) {
            return Err(Error::MalformedHeader(
                "header declares a symbol outside the printable ASCII alphabet",
            ));
        }
        let idx = alphabet::index(ascii);
        if seen[idx] {
            return Err(Error::DuplicateSymbolInHeader(ascii));
        }
        seen[idx] = true;

        let cwlen = elias::decode(reader)? as usize;
        if cwlen == 0 {
            return Err(Error::MalformedHeader("header declares a zero-length codeword"));
        }
        let mut codeword = BitVec::new();
        for _ in 0..cwlen {
            codeword.push(reader.read_bit()?);
        }
        trie.insert(ascii, &codeword)?;
    }
    Ok(trie)
}

fn read_data(reader: &mut BitReader, trie: &DecodeTrie, n: usize) -> Result<Vec<u8>, Error> {
    let mut l = Vec::with_capacity(n);
    while l.len() < n {
        let mut node = trie.root();
        let symbol = loop {
            let bit = reader.read_bit()?;
            node = trie.step(node, bit)?;
            if let Some(symbol) = trie.symbol_at(node) {
                break symbol;
            }
        };
        let run_length = elias::decode(reader)? as usize;
        let remaining = n - l.len();
        if run_length == 0 || run_length > remaining {
            return Err(Error::MalformedHeader("rle run length overruns the declared length n"));
        }
        l.extend(std::iter::repeat(symbol).take(run_length));
    }
    Ok(l)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(s: &[u8]) {
        let compressed = encode(s).unwrap();
        let expanded = decode(&compressed).unwrap();
        assert_eq!(expanded, s, "round trip failed for {s:?}");
    }

    #[test]
    fn banana_end_to_end() {
        roundtrip(b"banana$");
    }

    #[test]
    fn mississippi_end_to_end() {
        roundtrip(b"mississippi$");
    }

    #[test]
    fn sentinel_only() {
        roundtrip(b"$");
    }

    #[test]
    fn ten_as_and_sentinel() {
        roundtrip(b"aaaaaaaaaa$");
    }

    #[test]
    fn abracadabra() {
        roundtrip(b"abracadabra$");
    }

    #[test]
    fn sentinel_is_appended_when_missing() {
        let compressed = encode(b"banana").unwrap();
        let expanded = decode(&compressed).unwrap();
        assert_eq!(expanded, b"banana$");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(encode(b""), Err(Error::EmptyInput));
    }

    #[test]
    fn out_of_alphabet_byte_is_rejected() {
        assert_eq!(encode(b"caf\xc3\xa9$"), Err(Error::InvalidSymbol(0xc3)));
    }

    #[test]
    fn truncated_stream_is_reported_not_panicked() {
        let compressed = encode(b"banana$").unwrap();
        for cut in 1..compressed.len() {
            let _ = decode(&compressed[..cut]);
        }
        assert_eq!(decode(&[]).unwrap_err(), Error::TruncatedStream);
    }

    #[test]
    fn byte_length_matches_ceil_of_bits() {
        let compressed = encode(b"banana$").unwrap();
        // Re-derive the bit count independently and check byte packing.
        let l = bwt::forward(b"banana$").unwrap();
        let table = HuffmanTable::build(&l);
        let runs = rle::encode(&l);
        let mut w = BitWriter::new();
        write_header(&mut w, l.len() as u64, &table);
        write_data(&mut w, &runs, &table);
        let bits = w.len();
        assert_eq!(compressed.len(), (bits + 7) / 8);
    }

    #[test]
    fn round_trip_over_varied_samples() {
        for s in [
            &b"banana$"[..],
            b"mississippi$",
            b"abracadabra$",
            b"aaaaaaaaaa$",
            b"zyxwvutsrqponmlkjihgfedcba$",
            b"the quick brown fox jumps over the lazy dog$",
            b"a$",
        ] {
            roundtrip(s);
        }
    }
}
