//! # huffzip
//!
//! Lossless Huffman coding of single files.
//!
//! An encoded file is a header holding the code table followed by the packed
//! payload, which ends with an end-of-stream code and zero padding.
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let input = File::open("notes.txt")?;
//! let output = File::create("notes.huff")?;
//! huffzip::encode(input, output)?;
//!
//! let input = BufReader::new(File::open("notes.huff")?);
//! let output = File::create("notes.out")?;
//! huffzip::decode(input, output)?;
//! # Ok::<(), huffzip::Error>(())
//! ```

pub mod bits;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod header;
pub mod table;
pub mod tree;

pub use codec::{DecodeStats, EncodeStats, decode, decode_bytes, encode, encode_bytes};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use table::{Code, CodeTable, DecodeTable};
pub use tree::{PrefixTree, Symbol};
