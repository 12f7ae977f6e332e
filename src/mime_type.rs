//! <https://mimesniff.spec.whatwg.org/#mime-type>

use std::borrow::Cow;
use std::fmt;

use crate::parameters::Parameters;

/// <https://mimesniff.spec.whatwg.org/#mime-type>
///
/// `type` and `subtype` are always ASCII-lowercase HTTP tokens, so they are
/// cheap to expose as `&str`. Parameter values are not restricted to ASCII
/// (the quoted-string grammar allows bytes 0x80..=0xFF) and are therefore
/// kept as raw bytes throughout; see [`crate::parameters::Parameters`].
///
/// A value is either borrowed from a `'static` pattern-table constant or
/// owned by the parser. Both flavors are represented by `Cow`, so cloning a
/// borrowed value never touches the allocator and equality between the two
/// flavors falls out of the derived `PartialEq`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MIMEType {
    mime_type: Cow<'static, [u8]>,
    mime_subtype: Cow<'static, [u8]>,
    parameters: Parameters,
}

impl MIMEType {
    /// Builds an owned MIME type with no parameters. `mime_type` and
    /// `mime_subtype` are expected to already be ASCII-lowercase HTTP
    /// tokens; this is only checked with `debug_assert!`, since the public
    /// way to build a [`MIMEType`] from untrusted input is [`MIMEType::parse`].
    pub fn new(mime_type: impl Into<Vec<u8>>, mime_subtype: impl Into<Vec<u8>>) -> Self {
        let mime_type = mime_type.into();
        let mime_subtype = mime_subtype.into();
        debug_assert!(
            !mime_type.is_empty()
                && mime_type.iter().copied().all(crate::classify::is_http_token_code_point)
        );
        debug_assert!(
            !mime_subtype.is_empty()
                && mime_subtype
                    .iter()
                    .copied()
                    .all(crate::classify::is_http_token_code_point)
        );

        Self {
            mime_type: Cow::Owned(mime_type),
            mime_subtype: Cow::Owned(mime_subtype),
            parameters: Parameters::new(),
        }
    }

    /// Builds a zero-allocation MIME type from `'static` byte strings. Used
    /// by the pattern-engine tables to avoid parsing (and allocating) a
    /// string literal on every successful match.
    pub(crate) const fn new_static(mime_type: &'static [u8], mime_subtype: &'static [u8]) -> Self {
        Self {
            mime_type: Cow::Borrowed(mime_type),
            mime_subtype: Cow::Borrowed(mime_subtype),
            parameters: Parameters::new(),
        }
    }

    pub fn mime_type(&self) -> &[u8] {
        &self.mime_type
    }

    pub fn mime_subtype(&self) -> &[u8] {
        &self.mime_subtype
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub(crate) fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    /// The type, as a string. Always valid ASCII since it is restricted to
    /// HTTP token code points.
    pub fn type_str(&self) -> &str {
        std::str::from_utf8(&self.mime_type).expect("type is always an HTTP token")
    }

    /// The subtype, as a string. Always valid ASCII for the same reason.
    pub fn subtype_str(&self) -> &str {
        std::str::from_utf8(&self.mime_subtype).expect("subtype is always an HTTP token")
    }

    /// `type + "/" + subtype`.
    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_str(), self.subtype_str())
    }

    /// Compares the essence against `type_/subtype` without allocating.
    pub fn essence_equals(&self, type_: &str, subtype: &str) -> bool {
        self.mime_type.as_ref() == type_.as_bytes() && self.mime_subtype.as_ref() == subtype.as_bytes()
    }

    /// Whether the subtype ends with `suffix` (e.g. `"+xml"`).
    pub fn subtype_ends_with(&self, suffix: &str) -> bool {
        self.mime_subtype.ends_with(suffix.as_bytes())
    }

    /// <https://mimesniff.spec.whatwg.org/#image-mime-type>
    pub fn is_image(&self) -> bool {
        self.mime_type.as_ref() == b"image"
    }

    /// <https://mimesniff.spec.whatwg.org/#audio-or-video-mime-type>
    pub fn is_audio_or_video(&self) -> bool {
        matches!(self.mime_type.as_ref(), b"audio" | b"video") || self.essence_equals("application", "ogg")
    }

    /// <https://mimesniff.spec.whatwg.org/#font-mime-type>
    pub fn is_font(&self) -> bool {
        self.mime_type.as_ref() == b"font"
            || FONT_ESSENCES.iter().any(|(t, s)| self.essence_equals(t, s))
    }

    /// <https://mimesniff.spec.whatwg.org/#zip-based-mime-type>
    pub fn is_zip_based(&self) -> bool {
        self.subtype_ends_with("+zip") || self.essence_equals("application", "zip")
    }

    /// <https://mimesniff.spec.whatwg.org/#archive-mime-type>
    pub fn is_archive(&self) -> bool {
        self.essence_equals("application", "x-rar-compressed")
            || self.essence_equals("application", "zip")
            || self.essence_equals("application", "x-gzip")
    }

    /// <https://mimesniff.spec.whatwg.org/#xml-mime-type>
    pub fn is_xml(&self) -> bool {
        self.subtype_ends_with("+xml")
            || self.essence_equals("text", "xml")
            || self.essence_equals("application", "xml")
    }

    /// <https://mimesniff.spec.whatwg.org/#html-mime-type>
    pub fn is_html(&self) -> bool {
        self.essence_equals("text", "html")
    }

    /// <https://mimesniff.spec.whatwg.org/#scriptable-mime-type>
    pub fn is_scriptable(&self) -> bool {
        self.is_xml() || self.is_html() || self.essence_equals("application", "pdf")
    }

    /// <https://mimesniff.spec.whatwg.org/#javascript-mime-type>
    pub fn is_javascript(&self) -> bool {
        let essence = self.essence();
        JAVASCRIPT_ESSENCES
            .iter()
            .any(|candidate| essence.eq_ignore_ascii_case(candidate))
    }

    /// <https://mimesniff.spec.whatwg.org/#json-mime-type>
    pub fn is_json(&self) -> bool {
        self.subtype_ends_with("+json")
            || self.essence_equals("application", "json")
            || self.essence_equals("text", "json")
    }
}

const FONT_ESSENCES: &[(&str, &str)] = &[
    ("application", "font-cff"),
    ("application", "font-off"),
    ("application", "font-sfnt"),
    ("application", "font-ttf"),
    ("application", "font-woff"),
    ("application", "vnd.ms-fontobject"),
    ("application", "vnd.ms-opentype"),
];

const JAVASCRIPT_ESSENCES: &[&str] = &[
    "application/ecmascript",
    "application/javascript",
    "application/x-ecmascript",
    "application/x-javascript",
    "text/ecmascript",
    "text/javascript",
    "text/javascript1.0",
    "text/javascript1.1",
    "text/javascript1.2",
    "text/javascript1.3",
    "text/javascript1.4",
    "text/javascript1.5",
    "text/jscript",
    "text/x-ecmascript",
    "text/x-javascript",
];

impl fmt::Display for MIMEType {
    /// A lossy, diagnostics-only rendering. Use [`crate::parse::serialize`]
    /// for the spec-conformant byte-sequence serialization.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            String::from_utf8_lossy(&self.mime_type),
            String::from_utf8_lossy(&self.mime_subtype)
        )
    }
}
