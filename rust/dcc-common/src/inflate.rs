// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Bounded deflate decompression.
//!
//! Issuers emit zlib-wrapped deflate (RFC 1950), but raw deflate (RFC 1951)
//! is also accepted. The stream is driven through `flate2::Decompress` one
//! buffer extension at a time so the output ceiling is enforced before any
//! memory beyond it is reserved.

use flate2::{Decompress, FlushDecompress, Status};

/// Default output ceiling. A QR code carries at most a few KiB of compressed
/// data; 256 KiB leaves ample room for legitimate certificates.
pub const DEFAULT_MAX_INFLATED_LEN: usize = 256 * 1024;

const MIN_GROWTH: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InflateError {
    #[error("invalid deflate stream: {0}")]
    Decompression(String),

    #[error("deflate stream ended before the final block")]
    UnexpectedEnd,

    #[error("decompressed output exceeds the limit of {limit} bytes")]
    OutputTooLarge { limit: usize },
}

/// True if `input` starts with a valid zlib CMF/FLG pair (deflate, no preset dictionary).
pub fn has_zlib_header(input: &[u8]) -> bool {
    match input {
        [cmf, flg, ..] => {
            let method_is_deflate = cmf & 0x0F == 8;
            let window_ok = cmf >> 4 <= 7;
            let check_ok = ((u16::from(*cmf) << 8) | u16::from(*flg)) % 31 == 0;
            let no_dictionary = flg & 0x20 == 0;
            method_is_deflate && window_ok && check_ok && no_dictionary
        }
        _ => false,
    }
}

/// Decompress `input`, failing once more than `max_len` bytes would be produced.
pub fn inflate(input: &[u8], max_len: usize) -> Result<Vec<u8>, InflateError> {
    let zlib = has_zlib_header(input);
    let mut decompress = Decompress::new(zlib);

    let hard_cap = max_len.saturating_add(1);
    let mut out: Vec<u8> = Vec::with_capacity(input.len().saturating_mul(4).max(MIN_GROWTH).min(hard_cap));

    loop {
        if out.len() == out.capacity() {
            let room = hard_cap.saturating_sub(out.len());
            if room == 0 {
                return Err(InflateError::OutputTooLarge { limit: max_len });
            }
            out.reserve_exact(out.len().max(MIN_GROWTH).min(room));
        }

        let in_before = decompress.total_in();
        let out_before = decompress.total_out();
        let consumed = usize::try_from(in_before).unwrap_or(input.len()).min(input.len());

        let status = decompress
            .decompress_vec(&input[consumed..], &mut out, FlushDecompress::Finish)
            .map_err(|e| InflateError::Decompression(e.to_string()))?;

        if out.len() > max_len {
            return Err(InflateError::OutputTooLarge { limit: max_len });
        }

        match status {
            Status::StreamEnd => {
                let trailing = input.len().saturating_sub(decompress.total_in() as usize);
                if trailing > 0 {
                    tracing::trace!(trailing, "ignoring bytes after the end of the deflate stream");
                }
                tracing::trace!(zlib, compressed = input.len(), inflated = out.len(), "inflated");
                return Ok(out);
            }
            Status::Ok | Status::BufError => {
                let progressed = decompress.total_in() != in_before || decompress.total_out() != out_before;
                if !progressed && out.len() < out.capacity() {
                    return Err(InflateError::UnexpectedEnd);
                }
            }
        }
    }
}
