use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use crate::frequency::FrequencyTable;

/// Unit of encoding: an input byte or the end-of-stream marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Byte(u8),
    EndOfStream,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Byte(b) if b.is_ascii_graphic() => write!(f, "'{}'", *b as char),
            Symbol::Byte(b) => write!(f, "0x{b:02x}"),
            Symbol::EndOfStream => f.write_str("EOS"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: Symbol, count: u64 },
    Internal { count: u64, left: Box<Node>, right: Box<Node> },
}

impl Node {
    pub fn count(&self) -> u64 {
        match self {
            Node::Leaf { count, .. } | Node::Internal { count, .. } => *count,
        }
    }

    fn merge(left: Node, right: Node) -> Node {
        Node::Internal {
            count: left.count() + right.count(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

// Min-heap entry. Equal counts pop in insertion order.
#[derive(Debug)]
struct QueueEntry {
    count: u64,
    seq: u64,
    node: Node,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the smallest (count, seq) first
        (other.count, other.seq).cmp(&(self.count, self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Huffman prefix tree over the counted bytes plus the end-of-stream symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTree {
    root: Node,
}

impl PrefixTree {
    /// Build the tree by repeatedly merging the two lightest nodes.
    ///
    /// The queue is seeded with the end-of-stream leaf (count 0) first, then
    /// byte leaves in ascending byte order. Ties on count go to the node that
    /// entered the queue first, and merged nodes enter at the back. The first
    /// node popped becomes the left child.
    pub fn build(freqs: &FrequencyTable) -> Self {
        let mut heap = BinaryHeap::with_capacity(freqs.len() + 1);
        let mut seq = 0u64;
        let mut push = |heap: &mut BinaryHeap<QueueEntry>, node: Node| {
            heap.push(QueueEntry { count: node.count(), seq, node });
            seq += 1;
        };

        push(&mut heap, Node::Leaf { symbol: Symbol::EndOfStream, count: 0 });
        for (byte, count) in freqs.iter() {
            push(&mut heap, Node::Leaf { symbol: Symbol::Byte(byte), count });
        }

        loop {
            match (heap.pop(), heap.pop()) {
                (Some(left), Some(right)) => push(&mut heap, Node::merge(left.node, right.node)),
                (Some(root), None) => return Self { root: root.node },
                // The end-of-stream leaf is always queued
                (None, _) => unreachable!("prefix tree queue is never empty"),
            }
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        let mut leaves = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf { .. } => leaves += 1,
                Node::Internal { left, right, .. } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        leaves
    }
}
