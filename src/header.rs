//! Binary header that makes an encoded file self-describing.
//!
//! Layout, all integers big-endian:
//!
//! ```text
//! entry_count: u32
//! entry_count times:
//!     symbol:   u8
//!     code_len: u32
//!     code:     code_len bytes of ASCII '0' / '1'
//! placeholder: i32 = -1
//! eos_len:     u8
//! eos_code:    eos_len bytes of ASCII '0' / '1'
//! ```
//!
//! Byte entries are written in ascending byte order.

use std::collections::HashSet;
use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::error::{Error, Result};
use crate::table::{Code, CodeTable, DecodeTable};
use crate::tree::Symbol;

/// Placeholder written where the end-of-stream entry's symbol would go.
pub const EOS_PLACEHOLDER: i32 = -1;

// 256 byte leaves plus end-of-stream bound the tree depth.
const MAX_ENTRIES: u32 = 256;
const MAX_CODE_LEN: u32 = 256;

/// Write `table` as a header. Returns the number of bytes written.
pub fn write_header<W: Write>(table: &CodeTable, out: &mut W) -> Result<u64> {
    let eos = table
        .end_of_stream()
        .ok_or_else(|| Error::malformed("code table has no end-of-stream code"))?;
    let eos_len = u8::try_from(eos.len()).map_err(|_| Error::CodeTooLong { len: eos.len() })?;

    let entries: Vec<(u8, &Code)> = table.byte_entries().collect();
    out.write_u32::<BigEndian>(entries.len() as u32)?;
    let mut written = 4u64;

    for (byte, code) in entries {
        out.write_u8(byte)?;
        out.write_u32::<BigEndian>(code.len() as u32)?;
        out.write_all(&code.to_ascii())?;
        written += 5 + code.len() as u64;
    }

    out.write_i32::<BigEndian>(EOS_PLACEHOLDER)?;
    out.write_u8(eos_len)?;
    out.write_all(&eos.to_ascii())?;
    written += 5 + eos.len() as u64;

    debug!(entries = table.len(), bytes = written, "wrote header");
    Ok(written)
}

/// Parse a header into a decode table, leaving `input` at the first payload
/// byte. Returns the table and the number of header bytes consumed.
pub fn read_header<R: Read>(input: &mut R) -> Result<(DecodeTable, u64)> {
    let count = input
        .read_u32::<BigEndian>()
        .map_err(|e| Error::header_io(e, "entry count"))?;
    if count > MAX_ENTRIES {
        return Err(Error::malformed(format!(
            "entry count {count} exceeds {MAX_ENTRIES}"
        )));
    }

    let mut table = DecodeTable::default();
    let mut seen = HashSet::with_capacity(count as usize);
    let mut consumed = 4u64;

    for index in 0..count {
        let byte = input
            .read_u8()
            .map_err(|e| Error::header_io(e, "entry symbol"))?;
        let len = input
            .read_u32::<BigEndian>()
            .map_err(|e| Error::header_io(e, "entry code length"))?;
        if !seen.insert(byte) {
            return Err(Error::malformed(format!(
                "entry {index} repeats byte 0x{byte:02x}"
            )));
        }
        let code = read_code(input, len, "entry code")?;
        if table.insert(code, Symbol::Byte(byte)).is_some() {
            return Err(Error::malformed(format!("entry {index} repeats a code")));
        }
        consumed += 5 + len as u64;
    }

    let placeholder = input
        .read_i32::<BigEndian>()
        .map_err(|e| Error::header_io(e, "end-of-stream placeholder"))?;
    if placeholder != EOS_PLACEHOLDER {
        return Err(Error::malformed(format!(
            "expected end-of-stream placeholder {EOS_PLACEHOLDER}, found {placeholder}"
        )));
    }
    let eos_len = input
        .read_u8()
        .map_err(|e| Error::header_io(e, "end-of-stream code length"))?;
    let eos = read_code(input, eos_len as u32, "end-of-stream code")?;
    if table.insert(eos, Symbol::EndOfStream).is_some() {
        return Err(Error::malformed("end-of-stream code repeats a byte code"));
    }
    consumed += 5 + eos_len as u64;

    if !table.is_prefix_free() {
        return Err(Error::malformed("codes are not prefix-free"));
    }

    debug!(entries = table.len(), bytes = consumed, "read header");
    Ok((table, consumed))
}

fn read_code<R: Read>(input: &mut R, len: u32, what: &str) -> Result<Code> {
    if len == 0 || len > MAX_CODE_LEN {
        return Err(Error::malformed(format!("{what} has invalid length {len}")));
    }
    let mut text = Vec::with_capacity(len as usize);
    input.by_ref().take(len as u64).read_to_end(&mut text)?;
    if text.len() != len as usize {
        return Err(Error::malformed(format!(
            "{what} declares {len} bits but only {} bytes remain",
            text.len()
        )));
    }
    Code::from_ascii(&text)
        .ok_or_else(|| Error::malformed(format!("{what} contains a byte other than '0' or '1'")))
}
