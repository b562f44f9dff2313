use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use zip::ZipArchive;

use super::Extractor;
use crate::errors::{SearchError, SearchResult};

const DOCUMENT_PART: &str = "word/document.xml";

/// Pulls run text out of the XML parts of a `.docx` package.
///
/// Headers come first, then the main document, then footers. Each paragraph
/// ends with a newline, `w:tab` becomes a tab and `w:br`/`w:cr` a newline.
/// Paragraphs are not separated by blank lines, so paragraph N is line N.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZippedXmlExtractor;

impl Extractor for ZippedXmlExtractor {
    fn name(&self) -> &'static str {
        "zipped-xml"
    }

    fn extract(&self, path: &Path) -> SearchResult<String> {
        let file = File::open(path).map_err(|e| SearchError::from_io(path, e))?;
        let mut archive =
            ZipArchive::new(file).map_err(|e| SearchError::extraction_failure(path, e))?;

        let mut parts: Vec<String> = archive.file_names().map(str::to_string).collect();
        if !parts.iter().any(|name| name == DOCUMENT_PART) {
            return Err(SearchError::extraction_failure(
                path,
                format!("missing {}", DOCUMENT_PART),
            ));
        }
        parts.sort_unstable();
        let headers = parts.iter().filter(|name| is_part(name, "word/header")).cloned();
        let footers = parts.iter().filter(|name| is_part(name, "word/footer")).cloned();
        let ordered: Vec<String> = headers
            .chain(std::iter::once(DOCUMENT_PART.to_string()))
            .chain(footers)
            .collect();

        let mut text = String::new();
        for name in ordered {
            let part = archive
                .by_name(&name)
                .map_err(|e| SearchError::extraction_failure(path, e))?;
            pull_text(BufReader::new(part), &mut text)
                .map_err(|e| SearchError::extraction_failure(path, format!("{}: {}", name, e)))?;
        }
        Ok(text)
    }
}

fn is_part(name: &str, prefix: &str) -> bool {
    name.starts_with(prefix) && name.ends_with(".xml")
}

/// Appends the text content of one WordprocessingML part to `out`
fn pull_text<R: BufRead>(source: R, out: &mut String) -> Result<(), quick_xml::Error> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::new();
    let mut in_text = false;
    // tab stop definitions live under w:tabs and are not content
    let mut in_tab_stops = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                b"tabs" => in_tab_stops = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" if !in_tab_stops => out.push('\t'),
                b"br" | b"cr" | b"p" => out.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_text => out.push_str(&e.unescape()?),
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"tabs" => in_tab_stops = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}
