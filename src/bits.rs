//! Bit-level packing of codes into bytes and the decoding state machine.
//!
//! Bits are packed most significant first. The final partial byte is padded
//! with zeros, so the decoder must stop on the end-of-stream code and never on
//! running out of bytes.

use std::io::{self, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::error::{Error, Result};
use crate::table::{Code, DecodeTable};
use crate::tree::Symbol;

/// Appends codes to a bitstream, emitting a byte every 8 bits.
pub struct BitPacker<W: Write> {
    writer: BitWriter<W, BigEndian>,
    bits: u64,
}

impl<W: Write> BitPacker<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: BitWriter::endian(out, BigEndian),
            bits: 0,
        }
    }

    pub fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for &bit in code.bits() {
            self.writer.write_bit(bit)?;
        }
        self.bits += code.len() as u64;
        Ok(())
    }

    /// Bits written so far, padding excluded.
    pub fn bits_written(&self) -> u64 {
        self.bits
    }

    /// Zero-pad the last partial byte and hand back the writer along with the
    /// number of payload bytes produced.
    pub fn finish(mut self) -> io::Result<(W, u64)> {
        self.writer.byte_align()?;
        Ok((self.writer.into_writer(), self.bits.div_ceil(8)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpackState {
    Accumulating,
    Done,
}

/// Reads bits one at a time and matches the growing candidate against the
/// decode table.
pub struct BitUnpacker<'t, R: Read> {
    reader: BitReader<R, BigEndian>,
    table: &'t DecodeTable,
    candidate: Code,
    bits_read: u64,
    state: UnpackState,
}

impl<'t, R: Read> BitUnpacker<'t, R> {
    pub fn new(input: R, table: &'t DecodeTable) -> Self {
        Self {
            reader: BitReader::endian(input, BigEndian),
            table,
            candidate: Code::new(),
            bits_read: 0,
            state: UnpackState::Accumulating,
        }
    }

    pub fn state(&self) -> UnpackState {
        self.state
    }

    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Next decoded byte, or `None` once the end-of-stream code has matched.
    /// After that no further input is consumed.
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        if self.state == UnpackState::Done {
            return Ok(None);
        }
        loop {
            let bit = match self.reader.read_bit() {
                Ok(bit) => bit,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(Error::TruncatedPayload { bits_read: self.bits_read });
                }
                Err(e) => return Err(e.into()),
            };
            self.bits_read += 1;
            self.candidate.push(bit);

            match self.table.get(&self.candidate) {
                Some(Symbol::Byte(b)) => {
                    self.candidate.clear();
                    return Ok(Some(b));
                }
                Some(Symbol::EndOfStream) => {
                    self.candidate.clear();
                    self.state = UnpackState::Done;
                    return Ok(None);
                }
                None if self.candidate.len() >= self.table.max_len() => {
                    return Err(Error::InvalidCode { bits: self.candidate.len() });
                }
                None => {}
            }
        }
    }

    /// Decode until end-of-stream, writing bytes to `out`. Returns the number
    /// of bytes written.
    pub fn unpack_to<W: Write>(&mut self, out: &mut W) -> Result<u64> {
        let mut written = 0u64;
        while let Some(b) = self.next_byte()? {
            out.write_all(&[b])?;
            written += 1;
        }
        Ok(written)
    }
}
