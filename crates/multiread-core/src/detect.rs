//! Magic-byte content detection
//!
//! A small signature table in the spirit of web content sniffing: exact
//! prefixes for common binary formats, HTML/XML after leading whitespace, and
//! a text-versus-binary fallback for everything else.

use crate::traits::ContentDetector;
use content_inspector::ContentType;

/// Generic binary label
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Generic UTF-8 text label
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Exact-prefix signatures, checked in order
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"%!PS-Adobe-", "application/postscript"),
    (b"\xFF\xFE\x00\x00", "text/plain; charset=utf-32le"),
    (b"\x00\x00\xFE\xFF", "text/plain; charset=utf-32be"),
    (b"\xFE\xFF", "text/plain; charset=utf-16be"),
    (b"\xFF\xFE", "text/plain; charset=utf-16le"),
    (b"\xEF\xBB\xBF", TEXT_PLAIN_UTF8),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"BM", "image/bmp"),
    (b"\x00\x00\x01\x00", "image/x-icon"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1F\x8B\x08", "application/x-gzip"),
    (b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    (b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    (b"\x00asm", "application/wasm"),
    (b"OggS\x00", "application/ogg"),
    (b"ID3", "audio/mpeg"),
];

/// Markup openers matched case-insensitively after leading whitespace
const MARKUP: &[(&[u8], &str)] = &[
    (b"<!DOCTYPE HTML", "text/html; charset=utf-8"),
    (b"<HTML", "text/html; charset=utf-8"),
    (b"<HEAD", "text/html; charset=utf-8"),
    (b"<BODY", "text/html; charset=utf-8"),
    (b"<?XML", "text/xml; charset=utf-8"),
];

/// Built-in detector backed by the signature table
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicDetector;

impl ContentDetector for MagicDetector {
    fn detect(&self, prefix: &[u8]) -> String {
        detect_content_type(prefix).to_string()
    }
}

/// Classify a byte prefix
pub fn detect_content_type(prefix: &[u8]) -> &'static str {
    if let Some((_, label)) = SIGNATURES.iter().find(|(magic, _)| prefix.starts_with(magic)) {
        return *label;
    }

    // RIFF container with a WEBPVP chunk at offset 8
    if prefix.len() >= 14 && &prefix[0..4] == b"RIFF" && &prefix[8..14] == b"WEBPVP" {
        return "image/webp";
    }

    let trimmed = trim_leading_whitespace(prefix);
    for &(opener, label) in MARKUP {
        if starts_with_ignore_case(trimmed, opener) && tag_terminated(trimmed, opener.len()) {
            return label;
        }
    }

    match content_inspector::inspect(prefix) {
        ContentType::BINARY => OCTET_STREAM,
        ContentType::UTF_16LE => "text/plain; charset=utf-16le",
        ContentType::UTF_16BE => "text/plain; charset=utf-16be",
        ContentType::UTF_32LE => "text/plain; charset=utf-32le",
        ContentType::UTF_32BE => "text/plain; charset=utf-32be",
        ContentType::UTF_8 | ContentType::UTF_8_BOM => TEXT_PLAIN_UTF8,
    }
}

/// The media type without parameters, lowercased (`Text/Plain; x=y` -> `text/plain`)
pub fn media_type_essence(label: &str) -> String {
    label
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Does `label` match any of `expected` by media type essence?
pub fn matches_expected(label: &str, expected: &[String]) -> bool {
    let essence = media_type_essence(label);
    expected.iter().any(|e| media_type_essence(e) == essence)
}

fn trim_leading_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' '))
        .unwrap_or(bytes.len());
    &bytes[start..]
}

fn starts_with_ignore_case(bytes: &[u8], pattern: &[u8]) -> bool {
    bytes.len() >= pattern.len() && bytes[..pattern.len()].eq_ignore_ascii_case(pattern)
}

// A tag name must end at a space or '>' so "<htmlfoo" is not HTML.
// "<?xml" is matched on its own.
fn tag_terminated(bytes: &[u8], at: usize) -> bool {
    if bytes[..at].eq_ignore_ascii_case(b"<?XML") {
        return true;
    }
    matches!(bytes.get(at), Some(b' ') | Some(b'>'))
}
