use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use hashbrown::HashMap;

use crate::chunk::ByteRange;
use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::options::Strategy;
use crate::stats::Accumulator;

/// One worker's complete accumulator mapping for its chunk. Owned by the
/// worker until it returns; handed to the merger by value.
pub type PartialResult = HashMap<Box<[u8]>, Accumulator>;

const PREVIEW_LEN: usize = 64;

/// Parse one byte range into a partial result.
///
/// Every complete record whose first byte lies in the range is folded exactly
/// once. The range is assumed line-aligned (see `chunk::plan`); only the last
/// range of the file may end without a terminator.
///
/// # Errors
///
/// Any I/O fault or malformed record aborts the chunk; the caller must then
/// abort the whole run rather than merge an incomplete set of partials.
pub fn process_chunk(path: &Path, range: ByteRange, config: &Config) -> Result<PartialResult> {
    match config.strategy {
        Strategy::ByteScan => scan_buffered(path, range, config.buffer_size),
        Strategy::LineIter => scan_lines(path, range),
    }
}

/// Byte-scan strategy: read the range through a fixed buffer, carrying the
/// unconsumed tail of each read to the front of the next one.
fn scan_buffered(path: &Path, range: ByteRange, buffer_size: usize) -> Result<PartialResult> {
    let mut file = File::open(path).map_err(|source| EngineError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    file.seek(SeekFrom::Start(range.start))
        .map_err(|source| EngineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    let mut map = PartialResult::default();
    let mut buf = vec![0u8; buffer_size];
    // Bytes carried over from the previous read, already at the buffer front.
    let mut tail = 0usize;
    // Absolute file offset of buf[0].
    let mut base = range.start;
    let mut remaining = range.len() as usize;

    while remaining > 0 {
        if tail == buf.len() {
            return Err(EngineError::RecordTooLong {
                offset: base,
                capacity: buf.len(),
            });
        }
        let want = (buf.len() - tail).min(remaining);
        let got = file
            .read(&mut buf[tail..tail + want])
            .map_err(|source| EngineError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        if got == 0 {
            return Err(EngineError::UnexpectedEof {
                path: path.to_path_buf(),
                offset: base + tail as u64,
            });
        }
        remaining -= got;
        let filled = tail + got;

        let mut cursor = 0usize;
        while let Some(nl) = memchr::memchr(b'\n', &buf[cursor..filled]) {
            fold_record(&mut map, &buf[cursor..cursor + nl], base + cursor as u64)?;
            cursor += nl + 1;
        }

        // Defer the unterminated remainder to the next read.
        buf.copy_within(cursor..filled, 0);
        tail = filled - cursor;
        base += cursor as u64;
    }

    // The final record of the file may omit its trailing terminator.
    if tail > 0 {
        fold_record(&mut map, &buf[..tail], base)?;
    }

    Ok(map)
}

/// Line-iterator strategy: the simpler reference path over the same contract.
fn scan_lines(path: &Path, range: ByteRange) -> Result<PartialResult> {
    let file = File::open(path).map_err(|source| EngineError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    reader
        .seek(SeekFrom::Start(range.start))
        .map_err(|source| EngineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    let mut reader = reader.take(range.len());

    let mut map = PartialResult::default();
    let mut line = Vec::new();
    let mut offset = range.start;
    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .map_err(|source| EngineError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        if n == 0 {
            break;
        }
        let record = if line.last() == Some(&b'\n') {
            &line[..line.len() - 1]
        } else {
            &line[..]
        };
        fold_record(&mut map, record, offset)?;
        offset += n as u64;
    }
    Ok(map)
}

fn fold_record(map: &mut PartialResult, record: &[u8], offset: u64) -> Result<()> {
    let semi = memchr::memchr(b';', record).ok_or_else(|| EngineError::MissingDelimiter {
        offset,
        record: preview(record),
    })?;
    let (station, rest) = record.split_at(semi);
    if station.is_empty() {
        return Err(EngineError::EmptyStation { offset });
    }
    let value = parse_tenths(&rest[1..]).ok_or_else(|| EngineError::InvalidMeasurement {
        offset,
        value: preview(&rest[1..]),
    })?;

    match map.get_mut(station) {
        Some(acc) => acc.add(value),
        None => {
            map.insert(station.into(), Accumulator::new(value));
        }
    }
    Ok(())
}

/// Parse a measurement with an optional sign, one or more integer digits and
/// exactly one fractional digit, as an integer scaled by 10.
fn parse_tenths(bytes: &[u8]) -> Option<i64> {
    let (negative, digits) = match bytes.first()? {
        b'-' => (true, &bytes[1..]),
        b'+' => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    let dot = digits.len().checked_sub(2)?;
    if dot == 0 || digits[dot] != b'.' {
        return None;
    }

    let mut value: i64 = 0;
    for &b in &digits[..dot] {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
    }
    let frac = digits[dot + 1];
    if !frac.is_ascii_digit() {
        return None;
    }
    value = value.checked_mul(10)?.checked_add(i64::from(frac - b'0'))?;

    Some(if negative { -value } else { value })
}

fn preview(bytes: &[u8]) -> String {
    let cut = bytes.len().min(PREVIEW_LEN);
    let mut s = String::from_utf8_lossy(&bytes[..cut]).into_owned();
    if bytes.len() > cut {
        s.push_str("...");
    }
    s
}
