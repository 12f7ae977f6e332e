//! Static pattern tables for the sniffing algorithm.
//!
//! <https://mimesniff.spec.whatwg.org/#matching-an-image-type-pattern>
//! <https://mimesniff.spec.whatwg.org/#matching-an-audio-or-video-type-pattern>
//! <https://mimesniff.spec.whatwg.org/#matching-a-font-type-pattern>
//! <https://mimesniff.spec.whatwg.org/#matching-an-archive-type-pattern>
//!
//! Every entry's `result` is built with [`MIMEType::new_static`], so a
//! successful lookup is a plain `Clone` of borrowed statics rather than a
//! parse of a string literal on the hot path.

use crate::mime_type::MIMEType;
use crate::pattern::Pattern;

/// <https://mimesniff.spec.whatwg.org/#matching-an-image-type-pattern>
pub static IMAGE_PATTERNS: &[Pattern] = &[
    // Windows ICO
    Pattern {
        pattern: &[0x00, 0x00, 0x01, 0x00],
        mask: &[0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"image", b"x-icon"),
    },
    // Windows CUR
    Pattern {
        pattern: &[0x00, 0x00, 0x02, 0x00],
        mask: &[0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"image", b"x-icon"),
    },
    // BMP
    Pattern {
        pattern: b"BM",
        mask: &[0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"image", b"bmp"),
    },
    // GIF87a
    Pattern {
        pattern: b"GIF87a",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"image", b"gif"),
    },
    // GIF89a
    Pattern {
        pattern: b"GIF89a",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"image", b"gif"),
    },
    // WebP: "RIFF" ???? "WEBPVP"
    Pattern {
        pattern: b"RIFF\x00\x00\x00\x00WEBPVP",
        mask: &[
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        ],
        ignored: &[],
        result: MIMEType::new_static(b"image", b"webp"),
    },
    // PNG
    Pattern {
        pattern: &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"image", b"png"),
    },
    // JPEG
    Pattern {
        pattern: &[0xFF, 0xD8, 0xFF],
        mask: &[0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"image", b"jpeg"),
    },
];

/// <https://mimesniff.spec.whatwg.org/#matching-an-audio-or-video-type-pattern>
pub static AUDIO_OR_VIDEO_PATTERNS: &[Pattern] = &[
    // AIFF: "FORM" ???? "AIFF"
    Pattern {
        pattern: b"FORM\x00\x00\x00\x00AIFF",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"audio", b"aiff"),
    },
    // MP3 with ID3 tag
    Pattern {
        pattern: b"ID3",
        mask: &[0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"audio", b"mpeg"),
    },
    // Ogg
    Pattern {
        pattern: &[b'O', b'g', b'g', b'S', 0x00],
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"application", b"ogg"),
    },
    // MIDI
    Pattern {
        pattern: &[b'M', b'T', b'h', b'd', 0x00, 0x00, 0x00, 0x06],
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"audio", b"midi"),
    },
    // AVI: "RIFF" ???? "AVI "
    Pattern {
        pattern: b"RIFF\x00\x00\x00\x00AVI ",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"video", b"avi"),
    },
    // WAVE: "RIFF" ???? "WAVE"
    Pattern {
        pattern: b"RIFF\x00\x00\x00\x00WAVE",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"audio", b"wave"),
    },
];

/// <https://mimesniff.spec.whatwg.org/#matching-a-font-type-pattern>
pub static FONT_PATTERNS: &[Pattern] = &[
    // EOT: 34 zero bytes, then "LP"
    Pattern {
        pattern: &[
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, b'L', b'P',
        ],
        mask: &[0xFF; 36],
        ignored: &[],
        result: MIMEType::new_static(b"application", b"vnd.ms-fontobject"),
    },
    // TrueType
    Pattern {
        pattern: &[0x00, 0x01, 0x00, 0x00],
        mask: &[0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"application", b"font-sfnt"),
    },
    // OpenType
    Pattern {
        pattern: b"OTTO",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"application", b"font-sfnt"),
    },
    // TrueType Collection
    Pattern {
        pattern: b"ttcf",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"application", b"font-sfnt"),
    },
    // WOFF
    Pattern {
        pattern: b"wOFF",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"application", b"font-woff"),
    },
    // WOFF2
    Pattern {
        pattern: b"wOF2",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"application", b"font-woff"),
    },
];

/// <https://mimesniff.spec.whatwg.org/#matching-an-archive-type-pattern>
pub static ARCHIVE_PATTERNS: &[Pattern] = &[
    // GZIP
    Pattern {
        pattern: &[0x1F, 0x8B, 0x08],
        mask: &[0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"application", b"x-gzip"),
    },
    // ZIP
    Pattern {
        pattern: &[b'P', b'K', 0x03, 0x04],
        mask: &[0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"application", b"zip"),
    },
    // RAR
    Pattern {
        pattern: &[b'R', b'a', b'r', b'!', 0x1A, 0x07, 0x00],
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"application", b"x-rar-compressed"),
    },
];

/// <https://mimesniff.spec.whatwg.org/#identifying-an-unknown-mime-type> step
/// 3: UTF BOM patterns, all of which identify as `text/plain`.
pub static BOM_PATTERNS: &[Pattern] = &[
    Pattern {
        pattern: &[0xFE, 0xFF],
        mask: &[0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"text", b"plain"),
    },
    Pattern {
        pattern: &[0xFF, 0xFE],
        mask: &[0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"text", b"plain"),
    },
    Pattern {
        pattern: &[0xEF, 0xBB, 0xBF],
        mask: &[0xFF, 0xFF, 0xFF],
        ignored: &[],
        result: MIMEType::new_static(b"text", b"plain"),
    },
];

const HTTP_WHITESPACE: &[u8] = &[0x09, 0x0A, 0x0C, 0x0D, 0x20];

/// ASCII-case-insensitive letter mask used throughout the HTML patterns.
const CI: u8 = 0xDF;

/// One of the 17 HTML patterns from
/// <https://mimesniff.spec.whatwg.org/#identifying-an-unknown-mime-type>.
///
/// Each tag-name pattern is immediately followed by a tag-terminating byte
/// slot, which can be either a space or `>`, an alternative a single masked
/// byte cannot express, so [`matches_html_pattern`] checks it directly
/// instead of delegating to [`crate::pattern::pattern_match`].
pub struct HtmlTagPattern {
    pub tag: &'static [u8],
}

pub static HTML_TAG_PATTERNS: &[HtmlTagPattern] = &[
    HtmlTagPattern { tag: b"<!DOCTYPE HTML" },
    HtmlTagPattern { tag: b"<HTML" },
    HtmlTagPattern { tag: b"<HEAD" },
    HtmlTagPattern { tag: b"<SCRIPT" },
    HtmlTagPattern { tag: b"<IFRAME" },
    HtmlTagPattern { tag: b"<H1" },
    HtmlTagPattern { tag: b"<DIV" },
    HtmlTagPattern { tag: b"<FONT" },
    HtmlTagPattern { tag: b"<TABLE" },
    HtmlTagPattern { tag: b"<A" },
    HtmlTagPattern { tag: b"<STYLE" },
    HtmlTagPattern { tag: b"<TITLE" },
    HtmlTagPattern { tag: b"<B" },
    HtmlTagPattern { tag: b"<BODY" },
    HtmlTagPattern { tag: b"<BR" },
    HtmlTagPattern { tag: b"<P" },
    HtmlTagPattern { tag: b"<!--" },
];

/// Matches `pattern.tag` case-insensitively (via mask `0xDF`), followed by a
/// tag-terminating byte, after skipping any amount of leading HTTP
/// whitespace.
pub fn matches_html_pattern(pattern: &HtmlTagPattern, input: &[u8]) -> bool {
    let start = input
        .iter()
        .position(|b| !HTTP_WHITESPACE.contains(b))
        .unwrap_or(input.len());
    let input = &input[start..];

    if input.len() < pattern.tag.len() + 1 {
        return false;
    }

    // Only letters are case-folded; a literal space (as in "<!DOCTYPE HTML")
    // or punctuation must match exactly.
    let tag_matches = pattern.tag.iter().zip(input.iter()).all(|(&p, &b)| {
        if p.is_ascii_alphabetic() {
            (b & CI) == (p & CI)
        } else {
            b == p
        }
    });
    tag_matches && crate::classify::is_tag_terminating_byte(input[pattern.tag.len()])
}

/// `"<?xml"`, whitespace-tolerant, per step 1 of `identify_unknown`.
pub const XML_PATTERN: &[u8] = b"<?xml";
/// `"%PDF-"`, matched at offset 0 with no ignored prefix, per step 1 of
/// `identify_unknown`.
pub const PDF_PATTERN: &[u8] = b"%PDF-";
/// `"%!PS-Adobe-"`, matched at offset 0 with no ignored prefix, per step 2 of
/// `identify_unknown`.
pub const POSTSCRIPT_PATTERN: &[u8] = b"%!PS-Adobe-";

/// Matches `literal` exactly, tolerating any amount of leading HTTP
/// whitespace.
pub fn matches_whitespace_tolerant(literal: &[u8], input: &[u8]) -> bool {
    let mask = vec![0xFFu8; literal.len()];
    crate::pattern::pattern_match(input, literal, &mask, HTTP_WHITESPACE)
}

/// Matches `literal` at offset 0, with no ignored prefix.
pub fn matches_exact(literal: &[u8], input: &[u8]) -> bool {
    let mask = vec![0xFFu8; literal.len()];
    crate::pattern::pattern_match(input, literal, &mask, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::first_match;

    #[test]
    fn image_png() {
        let input = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
        let result = first_match(IMAGE_PATTERNS, &input).unwrap();
        assert_eq!(result.essence(), "image/png");
    }

    #[test]
    fn image_webp_wildcards_riff_size() {
        let mut input = b"RIFF".to_vec();
        input.extend_from_slice(&[0x12, 0x34, 0x56, 0x78]);
        input.extend_from_slice(b"WEBPVP8 ");
        let result = first_match(IMAGE_PATTERNS, &input).unwrap();
        assert_eq!(result.essence(), "image/webp");
    }

    #[test]
    fn archive_rar_uses_correct_essence() {
        let input = [b'R', b'a', b'r', b'!', 0x1A, 0x07, 0x00, 0x01];
        let result = first_match(ARCHIVE_PATTERNS, &input).unwrap();
        assert_eq!(result.essence(), "application/x-rar-compressed");
    }

    #[test]
    fn archive_zip() {
        let input = [b'P', b'K', 0x03, 0x04];
        let result = first_match(ARCHIVE_PATTERNS, &input).unwrap();
        assert_eq!(result.essence(), "application/zip");
    }

    #[test]
    fn font_woff2() {
        let result = first_match(FONT_PATTERNS, b"wOF2\x00\x00\x00\x00").unwrap();
        assert_eq!(result.essence(), "application/font-woff");
    }

    #[test]
    fn html_tag_pattern_with_leading_whitespace_and_gt() {
        let pattern = &HTML_TAG_PATTERNS[1]; // <HTML
        assert!(matches_html_pattern(pattern, b"   <html>"));
        assert!(matches_html_pattern(pattern, b"<HTML "));
        assert!(!matches_html_pattern(pattern, b"<HTMLX"));
    }

    #[test]
    fn html_doctype_pattern_requires_literal_space() {
        let pattern = &HTML_TAG_PATTERNS[0]; // <!DOCTYPE HTML
        assert!(matches_html_pattern(pattern, b"<!doctype html>"));
        assert!(!matches_html_pattern(pattern, b"<!DOCTYPE\x00HTML>"));
    }

    #[test]
    fn xml_declaration_is_whitespace_tolerant() {
        assert!(matches_whitespace_tolerant(XML_PATTERN, b"  <?xml version"));
        assert!(!matches_whitespace_tolerant(XML_PATTERN, b"x<?xml"));
    }

    #[test]
    fn pdf_and_postscript_signatures_require_exact_offset_zero_match() {
        assert!(matches_exact(PDF_PATTERN, b"%PDF-1.4"));
        assert!(!matches_exact(PDF_PATTERN, b"  %PDF-1.4"));
        assert!(matches_exact(POSTSCRIPT_PATTERN, b"%!PS-Adobe-3.0"));
        assert!(!matches_exact(POSTSCRIPT_PATTERN, b" %!PS-Adobe-3.0"));
    }

    #[test]
    fn bom_patterns() {
        let result = first_match(BOM_PATTERNS, &[0xEF, 0xBB, 0xBF, b'h']).unwrap();
        assert_eq!(result.essence(), "text/plain");
    }
}
