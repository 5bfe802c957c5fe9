use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{EngineError, Result};

/// A contiguous, line-aligned slice `[start, end)` of the input file,
/// assigned to exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Partition the file into at most `parallelism` line-aligned byte ranges.
///
/// Every interior boundary is snapped backward to the byte after the nearest
/// line terminator so no record is split across two ranges. The backward scan
/// is bounded by `align_window`; a window smaller than the longest record is
/// a configuration fault, reported before any work is dispatched.
///
/// # Errors
///
/// Returns `FileRead` if the file cannot be opened or read, and
/// `AlignmentWindowExceeded` if a boundary has no line terminator within the
/// window.
pub fn plan(path: &Path, parallelism: usize, align_window: usize) -> Result<Vec<ByteRange>> {
    let mut file = File::open(path).map_err(|source| EngineError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let size = file
        .metadata()
        .map_err(|source| EngineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    if size == 0 {
        return Ok(Vec::new());
    }

    let workers = parallelism.max(1) as u64;
    let stride = size.div_ceil(workers);
    log::debug!("partitioning {size} bytes into ~{workers} ranges (stride {stride})");

    let mut cuts: Vec<u64> = Vec::with_capacity(parallelism + 1);
    cuts.push(0);
    let mut prev = 0u64;
    for i in 1..workers {
        let naive = i * stride;
        if naive >= size {
            break;
        }
        let mut cut = align_backward(&mut file, path, naive, align_window)?;
        if cut <= prev {
            // Pathologically large stride relative to the line length: widen
            // the previous range to the next line boundary instead of
            // emitting an empty or out-of-order range.
            cut = next_line_start(&mut file, path, naive, size)?;
        }
        if cut <= prev || cut >= size {
            continue;
        }
        cuts.push(cut);
        prev = cut;
    }
    cuts.push(size);

    Ok(cuts
        .windows(2)
        .map(|pair| ByteRange {
            start: pair[0],
            end: pair[1],
        })
        .collect())
}

/// Snap `naive` back to the first byte after the nearest preceding `\n`,
/// scanning at most `window` bytes.
fn align_backward(file: &mut File, path: &Path, naive: u64, window: usize) -> Result<u64> {
    let span = naive.min(window as u64) as usize;
    let mut buf = vec![0u8; span];
    file.seek(SeekFrom::Start(naive - span as u64))
        .map_err(|source| EngineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    file.read_exact(&mut buf)
        .map_err(|source| EngineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    match memchr::memrchr(b'\n', &buf) {
        Some(i) => Ok(naive - span as u64 + i as u64 + 1),
        // The window reaches byte 0: the boundary collapses onto the file
        // start and the caller widens it forward.
        None if span as u64 == naive => Ok(0),
        None => Err(EngineError::AlignmentWindowExceeded {
            offset: naive,
            window,
        }),
    }
}

/// First offset after the next `\n` at or beyond `from`, or `size` if the
/// rest of the file has no terminator.
fn next_line_start(file: &mut File, path: &Path, from: u64, size: u64) -> Result<u64> {
    const SCAN_BUF: usize = 64 * 1024;

    file.seek(SeekFrom::Start(from))
        .map_err(|source| EngineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    let mut buf = vec![0u8; SCAN_BUF];
    let mut pos = from;
    while pos < size {
        let n = file.read(&mut buf).map_err(|source| EngineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        if let Some(i) = memchr::memchr(b'\n', &buf[..n]) {
            return Ok((pos + i as u64 + 1).min(size));
        }
        pos += n as u64;
    }
    Ok(size)
}
