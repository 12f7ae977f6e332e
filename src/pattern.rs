//! <https://mimesniff.spec.whatwg.org/#matching-a-mime-type-pattern>

use crate::mime_type::MIMEType;

/// A masked byte-pattern entry from one of the static sniffing tables.
///
/// `pattern` and `mask` always have equal length. `result` is a
/// `const`-constructed [`MIMEType`], never parsed from a string literal at
/// match time, so a successful lookup is a plain clone of a borrowed
/// constant (zero allocations, per §5).
#[derive(Debug)]
pub struct Pattern {
    pub pattern: &'static [u8],
    pub mask: &'static [u8],
    pub ignored: &'static [u8],
    pub result: MIMEType,
}

impl Pattern {
    /// <https://mimesniff.spec.whatwg.org/#pattern-matching-algorithm>
    pub fn matches(&self, input: &[u8]) -> bool {
        pattern_match(input, self.pattern, self.mask, self.ignored)
    }
}

/// <https://mimesniff.spec.whatwg.org/#pattern-matching-algorithm>
pub fn pattern_match(input: &[u8], pattern: &[u8], mask: &[u8], ignored: &[u8]) -> bool {
    assert_eq!(pattern.len(), mask.len());

    // Skip the longest prefix of `input` whose bytes are all `ignored`.
    let start = input.iter().position(|b| !ignored.contains(b)).unwrap_or(input.len());
    let input = &input[start..];

    if input.len() < pattern.len() {
        return false;
    }

    pattern
        .iter()
        .zip(mask.iter())
        .zip(input.iter())
        .all(|((&p, &m), &b)| (b & m) == p)
}

/// Scans `patterns` in declaration order and returns the first match,
/// cloned. Declaration order is significant: it is the tie-break the spec
/// relies on when more than one pattern could plausibly match.
pub fn first_match(patterns: &[Pattern], input: &[u8]) -> Option<MIMEType> {
    patterns.iter().find(|pattern| pattern.matches(input)).map(|pattern| pattern.result.clone())
}
