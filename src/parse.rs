//! Parsing, serializing and the conformance helpers built on top of them.
//!
//! <https://mimesniff.spec.whatwg.org/#parsing-a-mime-type>
//! <https://mimesniff.spec.whatwg.org/#serializing-a-mime-type>

use std::borrow::Cow;
use std::fmt;

use crate::classify::{is_http_quoted_string_token_code_point, is_http_token_code_point, is_http_whitespace};
use crate::mime_type::MIMEType;

/// Errors that can occur while parsing a [`MIMEType`].
///
/// Parameter-level grammar violations are not represented here: a malformed
/// parameter is silently dropped rather than failing the whole parse (see
/// §4.3 / §7 of the spec), so only failures in the `type/subtype` prefix can
/// ever surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MIMEParseError {
    /// The input was empty, or became empty after trimming whitespace.
    EmptyInput,
    /// No `/` separating type and subtype was found.
    NoSubtype,
    /// The type was the empty string.
    EmptyType,
    /// The type contained a code point that is not an HTTP token.
    TypeContainsNonHttpCodePoint,
    /// The subtype was the empty string.
    EmptySubtype,
    /// The subtype contained a code point that is not an HTTP token.
    SubtypeContainsNonHttpCodePoint,
}

impl fmt::Display for MIMEParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::EmptyInput => "input was empty after trimming whitespace",
            Self::NoSubtype => "no '/' separating type and subtype",
            Self::EmptyType => "type was empty",
            Self::TypeContainsNonHttpCodePoint => "type contained a non-HTTP-token code point",
            Self::EmptySubtype => "subtype was empty",
            Self::SubtypeContainsNonHttpCodePoint => "subtype contained a non-HTTP-token code point",
        };
        f.write_str(message)
    }
}

impl std::error::Error for MIMEParseError {}

impl MIMEType {
    /// <https://mimesniff.spec.whatwg.org/#parse-a-mime-type>
    ///
    /// The spec-named entry point. Returns `None` on any parse failure; use
    /// [`MIMEType::try_parse`] if the failure reason matters.
    pub fn parse(input: &[u8]) -> Option<Self> {
        Self::try_parse(input).ok()
    }

    /// Like [`MIMEType::parse`], but keeps the failure reason.
    pub fn try_parse(input: &[u8]) -> Result<Self, MIMEParseError> {
        // 1. Remove any leading and trailing HTTP whitespace from input.
        let input = trim_http_whitespace(input);
        if input.is_empty() {
            log::trace!("mime parse failed: empty input");
            return Err(MIMEParseError::EmptyInput);
        }

        // 2-3. Collect a sequence of code points that are not '/' as type.
        let slash = input.iter().position(|&b| b == b'/').ok_or_else(|| {
            log::trace!("mime parse failed: no '/' in {:?}", String::from_utf8_lossy(input));
            MIMEParseError::NoSubtype
        })?;
        let mime_type = &input[..slash];

        // 4. If type is empty or not solely HTTP token code points, fail.
        if mime_type.is_empty() {
            return Err(MIMEParseError::EmptyType);
        }
        if !mime_type.iter().copied().all(is_http_token_code_point) {
            return Err(MIMEParseError::TypeContainsNonHttpCodePoint);
        }

        // 6-7. Advance past '/'; collect up to ';' (or end) as subtype.
        let rest = &input[slash + 1..];
        let (mime_subtype, params_input) = match rest.iter().position(|&b| b == b';') {
            Some(semicolon) => (&rest[..semicolon], Some(&rest[semicolon + 1..])),
            None => (rest, None),
        };

        // 8. Remove any trailing HTTP whitespace from subtype.
        let mime_subtype = trim_trailing_http_whitespace(mime_subtype);

        // 9. If subtype is empty or not solely HTTP token code points, fail.
        if mime_subtype.is_empty() {
            return Err(MIMEParseError::EmptySubtype);
        }
        if !mime_subtype.iter().copied().all(is_http_token_code_point) {
            return Err(MIMEParseError::SubtypeContainsNonHttpCodePoint);
        }

        // 10. Construct the value, ASCII-lowercased.
        let mut mime = MIMEType::new(mime_type.to_ascii_lowercase(), mime_subtype.to_ascii_lowercase());

        // 11. Parse parameters from the remainder, if any.
        if let Some(mut remaining) = params_input {
            while !remaining.is_empty() {
                remaining = parse_one_parameter(remaining, &mut mime);
            }
        }

        Ok(mime)
    }
}

/// Parses a single `;name=value` parameter (the leading `;` has already
/// been consumed by the caller) and returns what's left of the input.
/// Malformed parameters are skipped per §4.3 step 11, never fail the parse.
fn parse_one_parameter<'a>(input: &'a [u8], mime: &mut MIMEType) -> &'a [u8] {
    // b. Skip HTTP whitespace.
    let input = skip_leading_http_whitespace(input);

    // c. Collect code points that are not ';' or '=' as parameterName.
    let name_end = input.iter().position(|&b| b == b';' || b == b'=');

    let Some(name_end) = name_end else {
        // d. Position is past the end of input: stop.
        return &[];
    };

    if input[name_end] == b';' {
        // This parameter contributes nothing; continue at the next ';'.
        return &input[name_end + 1..];
    }

    let parameter_name = &input[..name_end];
    // e. Advance past '='.
    let after_equals = &input[name_end + 1..];

    let (parameter_value, remaining): (Cow<'_, [u8]>, &[u8]) = if after_equals.first() == Some(&b'"') {
        // f. Parse an HTTP quoted string, then skip to the next ';'.
        let (value, rest) = parse_quoted_string(after_equals);
        let rest = match rest.iter().position(|&b| b == b';') {
            Some(semicolon) => &rest[semicolon + 1..],
            None => &[],
        };
        (Cow::Owned(value), rest)
    } else {
        // g. Collect up to ';' or end; strip trailing whitespace.
        let (raw_value, rest) = match after_equals.iter().position(|&b| b == b';') {
            Some(semicolon) => (&after_equals[..semicolon], &after_equals[semicolon + 1..]),
            None => (after_equals, &[][..]),
        };
        (Cow::Borrowed(trim_trailing_http_whitespace(raw_value)), rest)
    };

    // h. Insert only if all the grammar constraints hold; first write wins.
    let lowercase_name = parameter_name.to_ascii_lowercase();
    if !parameter_name.is_empty()
        && parameter_name.iter().copied().all(is_http_token_code_point)
        && !parameter_value.is_empty()
        && parameter_value.iter().copied().all(is_http_quoted_string_token_code_point)
    {
        mime.parameters_mut()
            .insert_if_absent(lowercase_name, parameter_value.into_owned());
    }

    remaining
}

/// <https://mimesniff.spec.whatwg.org/#collect-an-http-quoted-string>
///
/// Position is at the opening `"`. Returns the unescaped value and
/// whatever input remains after the (possibly absent) closing `"`.
fn parse_quoted_string(input: &[u8]) -> (Vec<u8>, &[u8]) {
    debug_assert_eq!(input.first(), Some(&b'"'));
    let mut value = Vec::new();
    let mut rest = &input[1..];

    loop {
        match rest.iter().position(|&b| b == b'"' || b == b'\\') {
            Some(index) => {
                value.extend_from_slice(&rest[..index]);
                match rest[index] {
                    b'"' => {
                        rest = &rest[index + 1..];
                        break;
                    },
                    b'\\' => {
                        if let Some(&escaped) = rest.get(index + 1) {
                            value.push(escaped);
                            rest = &rest[index + 2..];
                        } else {
                            // Trailing backslash with nothing to escape: end of input.
                            rest = &[];
                            break;
                        }
                    },
                    _ => unreachable!(),
                }
            },
            None => {
                // No closing quote: the rest of the input is the value.
                value.extend_from_slice(rest);
                rest = &[];
                break;
            },
        }
    }

    (value, rest)
}

/// <https://mimesniff.spec.whatwg.org/#serializing-a-mime-type>
pub fn serialize(mime: &MIMEType) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(mime.mime_type());
    out.push(b'/');
    out.extend_from_slice(mime.mime_subtype());

    for (name, value) in mime.parameters().iter() {
        out.push(b';');
        out.extend_from_slice(name);
        out.push(b'=');

        if !value.is_empty() && value.iter().copied().all(is_http_token_code_point) {
            out.extend_from_slice(value);
        } else {
            out.push(b'"');
            for &byte in value {
                if byte == b'"' || byte == b'\\' {
                    out.push(b'\\');
                }
                out.push(byte);
            }
            out.push(b'"');
        }
    }

    out
}

/// <https://mimesniff.spec.whatwg.org/#valid-mime-type-string>
pub fn is_valid_mime_type_string(input: &[u8]) -> bool {
    MIMEType::parse(input).is_some()
}

/// A valid MIME type string with no parameters.
pub fn is_valid_mime_type_with_no_parameters(input: &[u8]) -> bool {
    !input.contains(&b';') && is_valid_mime_type_string(input)
}

/// <https://mimesniff.spec.whatwg.org/#minimise-a-supported-mime-type>
pub fn minimize(mime: &MIMEType) -> Vec<u8> {
    if mime.is_javascript() {
        b"text/javascript".to_vec()
    } else if mime.is_json() {
        b"application/json".to_vec()
    } else if mime.essence_equals("image", "svg+xml") {
        b"image/svg+xml".to_vec()
    } else if mime.is_xml() {
        b"application/xml".to_vec()
    } else {
        // Open question §9.2: "not otherwise supported" is unreachable under
        // the default "supported" policy, so this never needs to be empty.
        mime.essence().into_bytes()
    }
}

fn trim_http_whitespace(input: &[u8]) -> &[u8] {
    trim_trailing_http_whitespace(skip_leading_http_whitespace(input))
}

fn skip_leading_http_whitespace(input: &[u8]) -> &[u8] {
    let start = input.iter().position(|&b| !is_http_whitespace(b)).unwrap_or(input.len());
    &input[start..]
}

fn trim_trailing_http_whitespace(input: &[u8]) -> &[u8] {
    let end = input
        .iter()
        .rposition(|&b| !is_http_whitespace(b))
        .map_or(0, |index| index + 1);
    &input[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_mime_type() {
        assert_eq!(MIMEType::try_parse(b"foo"), Err(MIMEParseError::NoSubtype));
        assert_eq!(MIMEType::try_parse(b"/foo"), Err(MIMEParseError::EmptyType));
        assert_eq!(MIMEType::try_parse(b"foo/"), Err(MIMEParseError::EmptySubtype));
        assert_eq!(
            MIMEType::try_parse(b"foo@bar/foo"),
            Err(MIMEParseError::TypeContainsNonHttpCodePoint)
        );
        assert_eq!(
            MIMEType::try_parse(b"foo/foo@bar"),
            Err(MIMEParseError::SubtypeContainsNonHttpCodePoint)
        );
        assert_eq!(MIMEType::try_parse(b"   "), Err(MIMEParseError::EmptyInput));
    }

    #[test]
    fn valid_mime_type() {
        assert_eq!(MIMEType::try_parse(b"foo/bar"), Ok(MIMEType::new("foo", "bar")));
        assert_eq!(MIMEType::try_parse(b"  foo/bar  "), Ok(MIMEType::new("foo", "bar")));
        assert_eq!(MIMEType::try_parse(b"FOO/BAR"), Ok(MIMEType::new("foo", "bar")));
    }

    #[test]
    fn parse_with_one_parameter() {
        let mime = MIMEType::parse(b"text/html; charset=utf-8").unwrap();
        assert_eq!(mime.essence(), "text/html");
        assert_eq!(mime.parameters().get(b"charset"), Some(&b"utf-8"[..]));
        assert_eq!(serialize(&mime), b"text/html;charset=utf-8");
    }

    #[test]
    fn parse_preserves_insertion_order_and_value_case() {
        let mime = MIMEType::parse(b"text/swiftui+vml;target=ios;charset=UTF-8").unwrap();
        assert_eq!(mime.subtype_str(), "swiftui+vml");
        let params: Vec<_> = mime.parameters().iter().collect();
        assert_eq!(
            params,
            vec![(&b"target"[..], &b"ios"[..]), (&b"charset"[..], &b"UTF-8"[..])]
        );
        assert_eq!(serialize(&mime), b"text/swiftui+vml;target=ios;charset=UTF-8");
    }

    #[test]
    fn duplicate_parameter_names_first_write_wins() {
        let mime = MIMEType::parse(b"text/plain;charset=utf-8;charset=iso-8859-1").unwrap();
        assert_eq!(mime.parameters().get(b"charset"), Some(&b"utf-8"[..]));
        assert_eq!(mime.parameters().len(), 1);
    }

    #[test]
    fn quoted_value_with_escapes_and_embedded_semicolon() {
        let mime = MIMEType::parse(br#"text/plain;name="a\"b;c""#).unwrap();
        assert_eq!(mime.parameters().get(b"name"), Some(&b"a\"b;c"[..]));
    }

    #[test]
    fn quoted_value_without_closing_quote() {
        let mime = MIMEType::parse(br#"text/plain;name="unterminated"#).unwrap();
        assert_eq!(mime.parameters().get(b"name"), Some(&b"unterminated"[..]));
    }

    #[test]
    fn empty_parameter_value_is_dropped() {
        let mime = MIMEType::parse(b"text/plain;charset=;other=ok").unwrap();
        assert!(!mime.parameters().contains(b"charset"));
        assert_eq!(mime.parameters().get(b"other"), Some(&b"ok"[..]));
    }

    #[test]
    fn non_ascii_quoted_value_round_trips() {
        let mime = MIMEType::parse(b"text/plain;name=\"caf\xE9\"").unwrap();
        assert_eq!(mime.parameters().get(b"name"), Some(&b"caf\xE9"[..]));
        assert_eq!(serialize(&mime), b"text/plain;name=\"caf\xE9\"");
    }

    #[test]
    fn trailing_semicolon_with_no_parameter_is_valid() {
        assert!(is_valid_mime_type_string(b"text/plain;"));
    }

    #[test]
    fn no_parameters_helper() {
        assert!(is_valid_mime_type_with_no_parameters(b"text/plain"));
        assert!(!is_valid_mime_type_with_no_parameters(b"text/plain;charset=utf-8"));
        assert!(!is_valid_mime_type_with_no_parameters(b"not a mime type"));
    }

    #[test]
    fn minimize_known_groups() {
        assert_eq!(minimize(&MIMEType::new("text", "javascript")), b"text/javascript");
        assert_eq!(minimize(&MIMEType::new("application", "json")), b"application/json");
        assert_eq!(minimize(&MIMEType::new("image", "svg+xml")), b"image/svg+xml");
        assert_eq!(minimize(&MIMEType::new("text", "xml")), b"application/xml");
        assert_eq!(minimize(&MIMEType::new("image", "png")), b"image/png");
    }

    #[test]
    fn round_trip_idempotence() {
        let inputs: &[&[u8]] = &[
            b"text/html; charset=utf-8",
            b"text/swiftui+vml;target=ios;charset=UTF-8",
            br#"text/plain;name="quoted value""#,
        ];
        for input in inputs {
            let first = MIMEType::parse(input).unwrap();
            let serialized = serialize(&first);
            let second = MIMEType::parse(&serialized).unwrap();
            assert_eq!(first, second);
        }
    }
}
