//! Hand-rolled `multipart/form-data` body parsing.
//!
//! The relay accepts exactly one file field per upload, so instead of a
//! general multipart tree this walks the raw body for the handful of
//! markers that matter. All marker scans run on the byte buffer itself,
//! never on a lossy text conversion, so payload bytes come back verbatim.

use thiserror::Error;

const FILENAME_MARKER: &[u8] = b"fileName=\"";
const CONTENT_TYPE_MARKER: &[u8] = b"Content-Type: ";
const HEADER_END_MARKER: &[u8] = b"\r\n\r\n";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no filename field in multipart body")]
    MissingFilename,
    #[error("multipart part headers never terminate")]
    MissingHeaderTerminator,
    #[error("boundary marker not found in multipart body")]
    MissingBoundary,
}

/// One parsed file field. `content` is the exact byte run between the
/// header terminator and the closing boundary, with no decoding applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// Extract the single file field from `data`, delimited by `boundary`
/// (the token from the request's `Content-Type` header, without the
/// leading dashes).
pub fn parse(data: &[u8], boundary: &str) -> Result<ParseResult, ParseError> {
    let filename_start = find_sequence(data, FILENAME_MARKER, 0)
        .ok_or(ParseError::MissingFilename)?
        + FILENAME_MARKER.len();
    let filename_end =
        find_sequence(data, b"\"", filename_start).ok_or(ParseError::MissingFilename)?;
    let file_name = String::from_utf8_lossy(&data[filename_start..filename_end]).into_owned();

    let content_type = match find_sequence(data, CONTENT_TYPE_MARKER, filename_end) {
        Some(marker) => {
            let value_start = marker + CONTENT_TYPE_MARKER.len();
            let value_end = find_sequence(data, b"\r\n", value_start)
                .ok_or(ParseError::MissingHeaderTerminator)?;
            String::from_utf8_lossy(&data[value_start..value_end]).into_owned()
        }
        None => DEFAULT_CONTENT_TYPE.to_string(),
    };

    let header_end =
        find_sequence(data, HEADER_END_MARKER, 0).ok_or(ParseError::MissingHeaderTerminator)?;
    let content_start = header_end + HEADER_END_MARKER.len();

    let closing_delimiter = format!("\r\n--{boundary}--");
    let content_end = find_sequence(data, closing_delimiter.as_bytes(), content_start)
        .or_else(|| {
            // not the last part; fall back to the bare delimiter
            let delimiter = format!("\r\n--{boundary}");
            find_sequence(data, delimiter.as_bytes(), content_start)
        })
        .ok_or(ParseError::MissingBoundary)?;

    Ok(ParseResult {
        file_name,
        content_type,
        content: data[content_start..content_end].to_vec(),
    })
}

/// Naive O(n*m) subsequence scan. Upload bodies are interactive-sized,
/// so this stays well clear of needing anything cleverer.
fn find_sequence(data: &[u8], sequence: &[u8], start: usize) -> Option<usize> {
    if sequence.is_empty() || data.len() < sequence.len() {
        return None;
    }
    (start..=data.len() - sequence.len()).find(|&i| &data[i..i + sequence.len()] == sequence)
}
