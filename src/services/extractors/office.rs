use std::{
    io::{Cursor, Read},
    path::Path,
};

use once_cell::sync::Lazy;
use quick_xml::{events::Event, Reader};
use regex::Regex;
use zip::ZipArchive;

use super::{read_file, ContentExtractor, ExtractedContent};
use crate::{
    errors::{AppError, AppResult},
    models::domain::ExtractionMetadata,
};

static SLIDE_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ppt/slides/slide(\d+)\.xml$").expect("SLIDE_ENTRY is a valid regex pattern")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

#[derive(Debug, Clone, Copy, Default)]
pub struct PptxExtractor;

impl ContentExtractor for DocxExtractor {
    fn extract(&self, path: &Path) -> AppResult<ExtractedContent> {
        let bytes = read_file(path)?;
        let mut archive = open_archive(&bytes, "DOCX")?;
        let xml = read_entry(&mut archive, "word/document.xml")?;
        let paragraphs = paragraphs(&xml)?;

        Ok(ExtractedContent {
            text: paragraphs.join("\n"),
            metadata: ExtractionMetadata {
                file_size: bytes.len() as u64,
                paragraph_count: Some(paragraphs.len()),
                ..Default::default()
            },
        })
    }
}

impl ContentExtractor for PptxExtractor {
    fn extract(&self, path: &Path) -> AppResult<ExtractedContent> {
        let bytes = read_file(path)?;
        let mut archive = open_archive(&bytes, "PPTX")?;

        let mut slides: Vec<(u32, String)> = archive
            .file_names()
            .filter_map(|name| {
                let number = SLIDE_ENTRY.captures(name)?.get(1)?.as_str().parse().ok()?;
                Some((number, name.to_string()))
            })
            .collect();
        slides.sort_by_key(|(number, _)| *number);

        let mut rendered = Vec::with_capacity(slides.len());
        for (number, entry) in &slides {
            let xml = read_entry(&mut archive, entry)?;
            let lines = paragraphs(&xml)?;
            let Some(title) = lines.first() else {
                continue;
            };
            rendered.push(format!("Slide {}: {}\n{}", number, title, lines.join("\n")));
        }

        Ok(ExtractedContent {
            text: rendered.join("\n\n"),
            metadata: ExtractionMetadata {
                file_size: bytes.len() as u64,
                slide_count: Some(slides.len()),
                ..Default::default()
            },
        })
    }
}

fn open_archive<'a>(bytes: &'a [u8], kind: &str) -> AppResult<ZipArchive<Cursor<&'a [u8]>>> {
    ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::ExtractionError(format!("Failed to open {} archive: {}", kind, e)))
}

fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> AppResult<String> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| AppError::ExtractionError(format!("Missing {} in document: {}", name, e)))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| AppError::ExtractionError(format!("Failed to read {}: {}", name, e)))?;
    Ok(xml)
}

/// Non-empty paragraphs of WordprocessingML or DrawingML. Both put text in
/// `t` elements inside `r` runs inside `p` paragraphs, only the namespace
/// prefix differs.
fn paragraphs(xml: &str) -> AppResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut in_run = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| AppError::ExtractionError(format!("Malformed document XML: {}", e)))?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                b"r" => in_run = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" => in_run = false,
                b"p" => {
                    let paragraph = current.trim();
                    if !paragraph.is_empty() {
                        paragraphs.push(paragraph.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" if in_run => current.push('\t'),
                b"br" => current.push(' '),
                _ => {}
            },
            Event::Text(text) if in_text => {
                let text = text
                    .unescape()
                    .map_err(|e| AppError::ExtractionError(format!("Bad XML text: {}", e)))?;
                current.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
