//! The sniffing algorithm: combines a [`Resource`]'s supplied type and
//! flags with the resource header and the pattern engine to arrive at a
//! computed media type.
//!
//! <https://mimesniff.spec.whatwg.org/#mime-sniffing-algorithm>

use crate::containers::{matches_mp3_signature, matches_mp4_signature, matches_webm_signature};
use crate::mime_type::MIMEType;
use crate::pattern::first_match;
use crate::resource::Resource;
use crate::sniff_tables::{
    self, ARCHIVE_PATTERNS, AUDIO_OR_VIDEO_PATTERNS, BOM_PATTERNS, FONT_PATTERNS, HTML_TAG_PATTERNS,
    IMAGE_PATTERNS, PDF_PATTERN, POSTSCRIPT_PATTERN, XML_PATTERN,
};

/// <https://mimesniff.spec.whatwg.org/#matching-an-audio-or-video-type-pattern>
///
/// Tries the six simple masked patterns first, then the three structured
/// container probes (MP4, WebM, MP3) that the masked matcher can't express.
fn match_audio_or_video(header: &[u8]) -> Option<MIMEType> {
    if let Some(matched) = first_match(AUDIO_OR_VIDEO_PATTERNS, header) {
        return Some(matched);
    }
    if matches_mp4_signature(header) {
        return Some(MIMEType::new("video", "mp4"));
    }
    if matches_webm_signature(header) {
        return Some(MIMEType::new("video", "webm"));
    }
    if matches_mp3_signature(header) {
        return Some(MIMEType::new("audio", "mpeg"));
    }
    None
}

/// <https://mimesniff.spec.whatwg.org/#mime-sniffing-algorithm>
pub fn sniff_mime_type(resource: &Resource, header: &[u8]) -> Option<MIMEType> {
    // 1. Never upgrade a supplied HTML/XML type via sniffing.
    if let Some(supplied) = &resource.supplied_mime_type {
        if supplied.is_xml() || supplied.is_html() {
            return Some(supplied.clone());
        }
    }

    // 2. No supplied type, or a generic placeholder essence: identify unknown.
    let is_unknown_placeholder = resource
        .supplied_mime_type
        .as_ref()
        .map(|supplied| {
            supplied.essence_equals("unknown", "unknown")
                || supplied.essence_equals("application", "unknown")
                || supplied.essence_equals("*", "*")
        })
        .unwrap_or(true);

    if is_unknown_placeholder {
        let sniff_scriptable = !resource.no_sniff;
        log::trace!("no usable supplied type; identifying unknown resource");
        return Some(identify_unknown_mime_type(header, sniff_scriptable));
    }

    let supplied = resource
        .supplied_mime_type
        .clone()
        .expect("is_unknown_placeholder is false only when a supplied type is present");

    // 3. Honor the no-sniff policy unconditionally.
    if resource.no_sniff {
        log::warn!("no_sniff set: trusting supplied type {supplied} without inspecting header");
        return Some(supplied);
    }

    // 4. The Apache text/plain misconfiguration check overrides everything else.
    if resource.check_for_apache_bug {
        log::warn!("check_for_apache_bug set: distinguishing text from binary");
        return Some(distinguish_text_or_binary(header));
    }

    // 5-6. Supplied image / audio-video types may be refined, never replaced
    // with something outside their own class.
    if supplied.is_image() {
        if let Some(matched) = first_match(IMAGE_PATTERNS, header) {
            return Some(matched);
        }
    } else if supplied.is_audio_or_video() {
        if let Some(matched) = match_audio_or_video(header) {
            return Some(matched);
        }
    }

    // 7. Nothing refined the type: return the supplied type unchanged.
    Some(supplied)
}

/// <https://mimesniff.spec.whatwg.org/#identifying-an-unknown-mime-type>
///
/// Total: every input resolves to either a pattern match or one of the two
/// terminal cases (`text/plain`, `application/octet-stream`).
pub fn identify_unknown_mime_type(header: &[u8], sniff_scriptable: bool) -> MIMEType {
    if sniff_scriptable {
        if let Some(pattern) = HTML_TAG_PATTERNS.iter().find(|pattern| sniff_tables::matches_html_pattern(pattern, header)) {
            log::trace!("identified as text/html via tag pattern {:?}", String::from_utf8_lossy(pattern.tag));
            return MIMEType::new("text", "html");
        }
        if sniff_tables::matches_whitespace_tolerant(XML_PATTERN, header) {
            return MIMEType::new("text", "xml");
        }
        if sniff_tables::matches_exact(PDF_PATTERN, header) {
            return MIMEType::new("application", "pdf");
        }
    }

    if sniff_tables::matches_exact(POSTSCRIPT_PATTERN, header) {
        return MIMEType::new("application", "postscript");
    }

    if let Some(matched) = first_match(BOM_PATTERNS, header) {
        return matched;
    }

    if let Some(matched) = first_match(IMAGE_PATTERNS, header) {
        return matched;
    }
    if let Some(matched) = match_audio_or_video(header) {
        return matched;
    }
    if let Some(matched) = first_match(ARCHIVE_PATTERNS, header) {
        return matched;
    }

    if !header.iter().copied().any(crate::classify::is_binary_data_byte) {
        MIMEType::new("text", "plain")
    } else {
        MIMEType::new("application", "octet-stream")
    }
}

/// <https://mimesniff.spec.whatwg.org/#distinguishing-a-mime-type>
pub fn distinguish_text_or_binary(header: &[u8]) -> MIMEType {
    if first_match(BOM_PATTERNS, header).is_some() {
        return MIMEType::new("text", "plain");
    }

    if header.iter().copied().any(crate::classify::is_binary_data_byte) {
        MIMEType::new("application", "octet-stream")
    } else {
        MIMEType::new("text", "plain")
    }
}

/// <https://mimesniff.spec.whatwg.org/#context-specific-sniffing-algorithm>
pub fn sniff_in_browsing_context(resource: &Resource, header: &[u8]) -> Option<MIMEType> {
    sniff_mime_type(resource, header)
}

/// <https://mimesniff.spec.whatwg.org/#sniffing-in-an-image-context>
pub fn sniff_in_image_context(supplied: Option<&MIMEType>, header: &[u8]) -> Option<MIMEType> {
    if let Some(supplied) = supplied {
        if supplied.is_xml() {
            return Some(supplied.clone());
        }
    }

    first_match(IMAGE_PATTERNS, header).or_else(|| supplied.cloned())
}

/// <https://mimesniff.spec.whatwg.org/#sniffing-in-an-audio-or-video-context>
pub fn sniff_in_audio_or_video_context(supplied: Option<&MIMEType>, header: &[u8]) -> Option<MIMEType> {
    if let Some(supplied) = supplied {
        if supplied.is_xml() {
            return Some(supplied.clone());
        }
    }

    match_audio_or_video(header).or_else(|| supplied.cloned())
}

/// <https://mimesniff.spec.whatwg.org/#sniffing-in-a-font-context>
pub fn sniff_in_font_context(supplied: Option<&MIMEType>, header: &[u8]) -> Option<MIMEType> {
    if let Some(supplied) = supplied {
        if supplied.is_xml() {
            return Some(supplied.clone());
        }
    }

    first_match(FONT_PATTERNS, header).or_else(|| supplied.cloned())
}

/// <https://mimesniff.spec.whatwg.org/#sniffing-in-a-plugin-context>
pub fn sniff_in_plugin_context(supplied: Option<&MIMEType>) -> Option<MIMEType> {
    match supplied {
        Some(supplied) => Some(supplied.clone()),
        None => Some(MIMEType::new("application", "octet-stream")),
    }
}

/// <https://mimesniff.spec.whatwg.org/#sniffing-in-a-style-context>
pub fn sniff_in_style_context(supplied: Option<&MIMEType>) -> Option<MIMEType> {
    supplied.cloned()
}

/// <https://mimesniff.spec.whatwg.org/#sniffing-in-a-script-context>
pub fn sniff_in_script_context(supplied: Option<&MIMEType>) -> Option<MIMEType> {
    supplied.cloned()
}

/// <https://mimesniff.spec.whatwg.org/#sniffing-in-a-text-track-context>
pub fn sniff_in_text_track_context() -> MIMEType {
    MIMEType::new("text", "vtt")
}

/// <https://mimesniff.spec.whatwg.org/#sniffing-in-a-cache-manifest-context>
pub fn sniff_in_cache_manifest_context() -> MIMEType {
    MIMEType::new("text", "cache-manifest")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0];

    #[test]
    fn png_sniff_with_no_supplied_type() {
        let resource = Resource::new(None);
        let result = sniff_mime_type(&resource, PNG_HEADER).unwrap();
        assert_eq!(result.essence(), "image/png");
    }

    #[test]
    fn html_with_leading_whitespace() {
        let result = identify_unknown_mime_type(b"  \t\n<html >rest", true);
        assert_eq!(result.essence(), "text/html");
    }

    #[test]
    fn pdf_signature_with_leading_whitespace_is_not_sniffed() {
        let result = identify_unknown_mime_type(b"  %PDF-1.4", true);
        assert_eq!(result.essence(), "text/plain");
    }

    #[test]
    fn apache_bug_path_returns_octet_stream_for_binary_header() {
        let resource = Resource::new(MIMEType::parse(b"text/plain; charset=ISO-8859-1"))
            .with_check_for_apache_bug(true);
        let result = sniff_mime_type(&resource, PNG_HEADER).unwrap();
        assert_eq!(result.essence(), "application/octet-stream");
    }

    #[test]
    fn no_sniff_trusts_supplied_type_over_binary_header() {
        let resource = Resource::new(MIMEType::parse(b"text/plain")).with_no_sniff(true);
        let result = sniff_mime_type(&resource, PNG_HEADER).unwrap();
        assert_eq!(result.essence(), "text/plain");
    }

    #[test]
    fn xml_supplied_type_is_never_overridden_by_header() {
        let resource = Resource::new(MIMEType::parse(b"application/xml"));
        let result = sniff_mime_type(&resource, PNG_HEADER).unwrap();
        assert_eq!(result.essence(), "application/xml");
    }

    #[test]
    fn distinguish_text_or_binary_respects_bom() {
        assert_eq!(distinguish_text_or_binary(&[0xEF, 0xBB, 0xBF]).essence(), "text/plain");
        assert_eq!(distinguish_text_or_binary(&[0x00, 0x01]).essence(), "application/octet-stream");
        assert_eq!(distinguish_text_or_binary(b"hello").essence(), "text/plain");
    }

    #[test]
    fn context_specific_plugin_defaults_to_octet_stream() {
        assert_eq!(sniff_in_plugin_context(None).unwrap().essence(), "application/octet-stream");
    }

    #[test]
    fn context_specific_text_track_and_cache_manifest_are_fixed() {
        assert_eq!(sniff_in_text_track_context().essence(), "text/vtt");
        assert_eq!(sniff_in_cache_manifest_context().essence(), "text/cache-manifest");
    }
}
