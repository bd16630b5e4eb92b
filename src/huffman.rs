//! Huffman coding over the alphabet actually present in the BWT output.
//!
//! The table is built with a classic min-heap merge (ties broken by
//! insertion order, so encoder output is reproducible) and is
//! self-describing: every codeword is shipped in the stream header, so the
//! decoder never needs the same tie-break to agree, only a prefix-free
//! table to rebuild into a trie.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bit_vec::BitVec;

use crate::alphabet;
use crate::Error;

enum HuffNode {
    Leaf(u8),
    Internal(usize, usize),
}

struct HeapEntry {
    freq: u64,
    seq: u64,
    node: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.seq == other.seq
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    // Reversed so `BinaryHeap` (a max-heap) pops the smallest
    // (frequency, insertion order) pair first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.freq.cmp(&self.freq).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A Huffman table defined on exactly the symbols present in some string.
pub struct HuffmanTable {
    codewords: Vec<Option<BitVec>>,
}

impl HuffmanTable {
    /// Tally symbol frequencies over `l` and build a prefix-free table.
    pub fn build(l: &[u8]) -> Self {
        let mut freq = [0u64; alphabet::SIZE];
        for &c in l {
            freq[alphabet::index(c)] += 1;
        }

        let mut arena: Vec<HuffNode> = Vec::new();
        let mut heap = BinaryHeap::new();
        let mut seq: u64 = 0;
        for idx in 0..alphabet::SIZE {
            if freq[idx] > 0 {
                let node = arena.len();
                arena.push(HuffNode::Leaf(alphabet::symbol(idx)));
                heap.push(HeapEntry { freq: freq[idx], seq, node });
                seq += 1;
            }
        }

        let mut codewords = vec![None; alphabet::SIZE];

        if heap.len() == 1 {
            // A single distinct symbol would otherwise get a zero-length
            // codeword; assign it the one-bit codeword `0` instead.
            let entry = heap.pop().expect("checked len == 1");
            let HuffNode::Leaf(symbol) = arena[entry.node] else {
                unreachable!("only leaves are pushed before any merge")
            };
            let mut cw = BitVec::new();
            cw.push(false);
            codewords[alphabet::index(symbol)] = Some(cw);
            return Self { codewords };
        }

        while heap.len() > 1 {
            let left = heap.pop().expect("len > 1");
            let right = heap.pop().expect("len > 1");
            let node = arena.len();
            arena.push(HuffNode::Internal(left.node, right.node));
            heap.push(HeapEntry { freq: left.freq + right.freq, seq, node });
            seq += 1;
        }

        if let Some(root_entry) = heap.pop() {
            let mut stack: Vec<(usize, BitVec)> = vec![(root_entry.node, BitVec::new())];
            while let Some((node, bits)) = stack.pop() {
                match arena[node] {
                    HuffNode::Leaf(symbol) => {
                        codewords[alphabet::index(symbol)] = Some(bits);
                    }
                    HuffNode::Internal(left, right) => {
                        let mut left_bits = bits.clone();
                        left_bits.push(false);
                        stack.push((left, left_bits));
                        let mut right_bits = bits;
                        right_bits.push(true);
                        stack.push((right, right_bits));
                    }
                }
            }
        }

        Self { codewords }
    }

    pub fn codeword(&self, symbol: u8) -> Option<&BitVec> {
        self.codewords[alphabet::index(symbol)].as_ref()
    }

    /// Present symbols and their codewords, in ascending alphabet-index
    /// order, matching the header's required serialization order.
    pub fn entries(&self) -> impl Iterator<Item = (u8, &BitVec)> {
        self.codewords.iter().enumerate().filter_map(|(idx, cw)| {
            cw.as_ref().map(|bits| (alphabet::symbol(idx), bits))
        })
    }

    pub fn len(&self) -> usize {
        self.codewords.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

enum TrieNode {
    Branch { left: Option<usize>, right: Option<usize> },
    Leaf(u8),
}

/// A binary trie rebuilt from the header's `(symbol, codeword)` pairs, used
/// to decode the data section bit by bit.
pub struct DecodeTrie {
    nodes: Vec<TrieNode>,
}

impl DecodeTrie {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::Branch { left: None, right: None }] }
    }

    pub fn root(&self) -> usize {
        0
    }

    /// Insert `symbol`'s codeword into the trie. Fails if the codeword is a
    /// prefix of an already-inserted one, or vice versa.
    pub fn insert(&mut self, symbol: u8, codeword: &BitVec) -> Result<(), Error> {
        let mut cur = self.root();
        let len = codeword.len();
        for (i, bit) in codeword.iter().enumerate() {
            match self.nodes[cur] {
                TrieNode::Leaf(_) => return Err(Error::CodewordCollision),
                TrieNode::Branch { .. } => {}
            }
            let child_slot = match &mut self.nodes[cur] {
                TrieNode::Branch { left, right } => {
                    if bit {
                        right
                    } else {
                        left
                    }
                }
                TrieNode::Leaf(_) => unreachable!("checked above"),
            };
            cur = match *child_slot {
                Some(idx) => idx,
                None => {
                    let idx = self.nodes.len();
                    self.nodes.push(TrieNode::Branch { left: None, right: None });
                    *child_slot = Some(idx);
                    idx
                }
            };
            if i + 1 == len {
                match self.nodes[cur] {
                    TrieNode::Leaf(_) => return Err(Error::CodewordCollision),
                    TrieNode::Branch { left, right } if left.is_some() || right.is_some() => {
                        return Err(Error::CodewordCollision);
                    }
                    TrieNode::Branch { .. } => {}
                }
                self.nodes[cur] = TrieNode::Leaf(symbol);
            }
        }
        Ok(())
    }

    /// Advance from `node` by one bit. Returns the reached node.
    pub fn step(&self, node: usize, bit: bool) -> Result<usize, Error> {
        match &self.nodes[node] {
            TrieNode::Branch { left, right } => {
                let next = if bit { *right } else { *left };
                next.ok_or(Error::MalformedHeader(
                    "data bits do not match any declared codeword",
                ))
            }
            TrieNode::Leaf(_) => {
                Err(Error::MalformedHeader("data bits ran past a leaf codeword"))
            }
        }
    }

    pub fn symbol_at(&self, node: usize) -> Option<u8> {
        match self.nodes[node] {
            TrieNode::Leaf(symbol) => Some(symbol),
            TrieNode::Branch { .. } => None,
        }
    }
}

impl Default for DecodeTrie {
    fn default() -> Self {
        Self::new()
    }
}
