use std::io::{BufRead, BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};

use tracing::{debug, info};

use crate::bits::{BitPacker, BitUnpacker};
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::header::{read_header, write_header};
use crate::table::CodeTable;
use crate::tree::{PrefixTree, Symbol};

/// Sizes observed while encoding one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStats {
    pub input_bytes: u64,
    pub header_bytes: u64,
    pub payload_bytes: u64,
    /// Distinct input bytes, end-of-stream not included.
    pub distinct_symbols: usize,
}

impl EncodeStats {
    pub fn output_bytes(&self) -> u64 {
        self.header_bytes + self.payload_bytes
    }

    /// Output size over input size. `None` for empty input.
    pub fn ratio(&self) -> Option<f64> {
        (self.input_bytes > 0).then(|| self.output_bytes() as f64 / self.input_bytes as f64)
    }
}

/// Sizes observed while decoding one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    pub header_bytes: u64,
    /// Payload bytes consumed up to and including the one holding the end-of-stream code.
    pub payload_bytes: u64,
    pub output_bytes: u64,
}

/// Build the code table for everything `input` yields.
pub fn fit_encoder<R: Read>(input: R) -> Result<(CodeTable, FrequencyTable, u64)> {
    let (freqs, total) = FrequencyTable::from_reader(BufReader::new(input))?;
    let tree = PrefixTree::build(&freqs);
    debug!(
        distinct = freqs.len(),
        leaves = tree.leaf_count(),
        bytes = total,
        "built prefix tree"
    );
    Ok((CodeTable::from_tree(&tree), freqs, total))
}

/// Encode `input` into `output`: header, then the packed payload.
///
/// The input is read twice from its current position, once to count bytes
/// and once to emit codes, so it has to be seekable.
pub fn encode<R: Read + Seek, W: Write>(mut input: R, output: W) -> Result<EncodeStats> {
    let start = input.stream_position()?;
    let (table, freqs, input_bytes) = fit_encoder(&mut input)?;
    let eos = table
        .end_of_stream()
        .ok_or_else(|| Error::malformed("code table has no end-of-stream code"))?;
    input.seek(SeekFrom::Start(start))?;

    let mut out = BufWriter::new(output);
    let header_bytes = write_header(&table, &mut out)?;

    let mut packer = BitPacker::new(out);
    let mut reader = BufReader::new(input);
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        for &b in chunk {
            let code = table.get(Symbol::Byte(b)).ok_or(Error::UnknownSymbol(b))?;
            packer.write_code(code)?;
        }
        let len = chunk.len();
        reader.consume(len);
    }
    packer.write_code(eos)?;

    let (mut out, payload_bytes) = packer.finish()?;
    out.flush()?;

    let stats = EncodeStats {
        input_bytes,
        header_bytes,
        payload_bytes,
        distinct_symbols: freqs.len(),
    };
    info!(
        input = stats.input_bytes,
        header = stats.header_bytes,
        payload = stats.payload_bytes,
        distinct = stats.distinct_symbols,
        "encoded"
    );
    Ok(stats)
}

/// Decode an encoded stream from `input` into `output`.
///
/// Input is consumed a byte at a time and reading stops at the byte holding
/// the end-of-stream code, so whatever follows stays in `input` for the
/// caller. Wrap unbuffered sources such as `File` in a `BufReader`.
pub fn decode<R: BufRead, W: Write>(mut input: R, output: W) -> Result<DecodeStats> {
    let (table, header_bytes) = read_header(&mut input)?;

    let mut out = BufWriter::new(output);
    let mut unpacker = BitUnpacker::new(&mut input, &table);
    let output_bytes = unpacker.unpack_to(&mut out)?;
    let payload_bytes = unpacker.bits_read().div_ceil(8);
    out.flush()?;

    let stats = DecodeStats {
        header_bytes,
        payload_bytes,
        output_bytes,
    };
    info!(
        header = stats.header_bytes,
        payload = stats.payload_bytes,
        output = stats.output_bytes,
        "decoded"
    );
    Ok(stats)
}

/// Encode an in-memory buffer.
pub fn encode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode(Cursor::new(data), &mut out)?;
    Ok(out)
}

/// Decode an in-memory buffer.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decode(data, &mut out)?;
    Ok(out)
}
