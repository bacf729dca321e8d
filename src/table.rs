//! Code tables in both directions.
//!
//! The encode direction is derived from a [`PrefixTree`]; the decode direction
//! is rebuilt straight from a file header and never sees a tree.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::tree::{Node, PrefixTree, Symbol};

/// A bit string, first bit first. `false` is a left edge, `true` a right edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn starts_with(&self, other: &Code) -> bool {
        self.0.starts_with(&other.0)
    }

    /// Parse the header's textual form: one ASCII `0` or `1` per bit.
    pub fn from_ascii(text: &[u8]) -> Option<Self> {
        text.iter()
            .map(|&c| match c {
                b'0' => Some(false),
                b'1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Code)
    }

    pub fn to_ascii(&self) -> Vec<u8> {
        self.0.iter().map(|&bit| if bit { b'1' } else { b'0' }).collect()
    }

    fn with(&self, bit: bool) -> Self {
        let mut next = self.clone();
        next.push(bit);
        next
    }
}

#[cfg(test)]
impl From<&str> for Code {
    fn from(text: &str) -> Self {
        Code::from_ascii(text.as_bytes()).expect("code text is only '0' and '1'")
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code, used while encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Code>,
}

impl CodeTable {
    /// Walk the tree with an explicit stack and record each leaf's path.
    ///
    /// A tree that is a single leaf (nothing but end-of-stream) gives that
    /// leaf the code `0` so it still occupies a bit in the payload.
    pub fn from_tree(tree: &PrefixTree) -> Self {
        let mut codes = BTreeMap::new();
        let mut stack = vec![(tree.root(), Code::new())];
        while let Some((node, code)) = stack.pop() {
            match node {
                Node::Leaf { symbol, .. } => {
                    let code = if code.is_empty() { Code(vec![false]) } else { code };
                    codes.insert(*symbol, code);
                }
                Node::Internal { left, right, .. } => {
                    stack.push((right, code.with(true)));
                    stack.push((left, code.with(false)));
                }
            }
        }
        Self { codes }
    }

    /// Assemble a table from explicit entries. Used when a header is parsed
    /// back for inspection.
    pub fn from_entries(entries: impl IntoIterator<Item = (Symbol, Code)>) -> Self {
        Self { codes: entries.into_iter().collect() }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn end_of_stream(&self) -> Option<&Code> {
        self.get(Symbol::EndOfStream)
    }

    /// Byte entries in ascending byte order; the end-of-stream entry is excluded.
    pub fn byte_entries(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().filter_map(|(symbol, code)| match symbol {
            Symbol::Byte(b) => Some((*b, code)),
            Symbol::EndOfStream => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes.iter().map(|(s, c)| (*s, c))
    }

    /// Number of entries, end-of-stream included.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn invert(&self) -> DecodeTable {
        let mut table = DecodeTable::default();
        for (symbol, code) in &self.codes {
            table.insert(code.clone(), *symbol);
        }
        table
    }
}

/// Code to symbol, used while decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeTable {
    symbols: HashMap<Code, Symbol>,
    max_len: usize,
}

impl DecodeTable {
    /// Returns the symbol previously stored under `code`, if any.
    pub fn insert(&mut self, code: Code, symbol: Symbol) -> Option<Symbol> {
        self.max_len = self.max_len.max(code.len());
        self.symbols.insert(code, symbol)
    }

    pub fn get(&self, code: &Code) -> Option<Symbol> {
        self.symbols.get(code).copied()
    }

    /// Length of the longest code. A candidate longer than this never matches.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// True when no code is a proper prefix of another.
    ///
    /// In sorted order a code's extensions follow it directly, so checking
    /// neighbours is enough.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.symbols.keys().collect();
        codes.sort();
        codes.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
    }

    pub fn invert(&self) -> CodeTable {
        CodeTable::from_entries(self.symbols.iter().map(|(c, s)| (*s, c.clone())))
    }
}
