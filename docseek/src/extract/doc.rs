use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use super::Extractor;
use crate::errors::{SearchError, SearchResult};

/// Compound File Binary (OLE2) magic bytes: `D0 CF 11 E0 A1 B1 1A E1`
const CFB_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Stream holding the main text of a Word 97-2003 document
const MAIN_STREAM: &str = "WordDocument";

/// Best-effort reader for legacy `.doc` files.
///
/// This is a lossy heuristic, not a Word parser: it reads the `WordDocument`
/// stream and keeps the low byte of every UTF-16LE-looking pair. Formatting
/// runs, 8-bit compressed text and non-Latin-1 characters are lost.
#[derive(Debug, Clone, Copy, Default)]
pub struct LossyHeuristicExtractor;

impl Extractor for LossyHeuristicExtractor {
    fn name(&self) -> &'static str {
        "lossy-heuristic"
    }

    fn extract(&self, path: &Path) -> SearchResult<String> {
        if !has_cfb_signature(path)? {
            debug!("{} is not a compound binary file", path.display());
            return Ok(String::new());
        }

        let mut comp = cfb::open(path).map_err(|e| SearchError::extraction_failure(path, e))?;
        if !comp.is_stream(MAIN_STREAM) {
            debug!("{} has no {} stream", path.display(), MAIN_STREAM);
            return Ok(String::new());
        }

        let mut stream = comp
            .open_stream(MAIN_STREAM)
            .map_err(|e| SearchError::extraction_failure(path, e))?;
        let mut bytes = Vec::new();
        stream
            .read_to_end(&mut bytes)
            .map_err(|e| SearchError::extraction_failure(path, e))?;

        Ok(decode_word_stream(&bytes))
    }
}

fn has_cfb_signature(path: &Path) -> SearchResult<bool> {
    let mut file = File::open(path).map_err(|e| SearchError::from_io(path, e))?;
    let mut magic = [0u8; 8];
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(magic == CFB_SIGNATURE),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(SearchError::from_io(path, e)),
    }
}

/// Decodes a `WordDocument` stream with the byte-pair heuristic.
///
/// Pairs whose high byte is non-zero are dropped, as are low bytes that are
/// neither printable nor whitespace. A trailing odd byte is ignored.
pub fn decode_word_stream(bytes: &[u8]) -> String {
    bytes
        .chunks_exact(2)
        .filter(|pair| pair[1] == 0 && is_printable_or_space(pair[0]))
        .map(|pair| char::from(pair[0]))
        .collect()
}

/// Latin-1 code points that are printable or whitespace
fn is_printable_or_space(b: u8) -> bool {
    // 0xAD is a soft hyphen (format character), everything else above 0xA0 prints
    matches!(b, 0x09..=0x0D | 0x1C..=0x7E | 0x85 | 0xA0..=0xAC | 0xAE..=0xFF)
}
