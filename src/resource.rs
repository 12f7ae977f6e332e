//! <https://mimesniff.spec.whatwg.org/#reading-the-resource-header>
//!
//! A [`Resource`] bundles the sniff-time inputs the top-level algorithm
//! needs: the `Content-Type`-derived supplied type and the two security
//! flags that gate sniffing. Construction is entirely pure, no I/O and no
//! network fetch, matching the scope cut in §1 of the standard: the core
//! only consumes bytes the caller already has in hand.

use crate::mime_type::MIMEType;

/// Resource headers are capped at this many bytes.
///
/// <https://mimesniff.spec.whatwg.org/#reading-the-resource-header>
pub const MAX_RESOURCE_HEADER_LEN: usize = 1445;

/// The four exact `Content-Type` byte sequences that trigger the Apache
/// text/plain misconfiguration check.
///
/// <https://mimesniff.spec.whatwg.org/#supplied-mime-type-detection-algorithm>
const APACHE_BUG_CONTENT_TYPES: &[&[u8]] = &[
    b"text/plain",
    b"text/plain; charset=ISO-8859-1",
    b"text/plain; charset=iso-8859-1",
    b"text/plain; charset=UTF-8",
];

/// The sniff-time inputs bundled for a single `sniff_mime_type` call.
///
/// A `Resource` is created from caller-supplied inputs, handed to the
/// sniffing algorithm, and then dropped. It does not outlive a single
/// sniff request and carries no resource bytes of its own (those are
/// passed alongside, as `header`, to keep the pattern engine's hot path
/// free of any ownership over resource content).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resource {
    /// The type supplied by the caller (e.g. from a `Content-Type` header),
    /// if any, and if it parsed successfully.
    pub supplied_mime_type: Option<MIMEType>,
    /// Set when the unparsed `Content-Type` text exactly matched one of the
    /// [`APACHE_BUG_CONTENT_TYPES`] sequences, independent of whether
    /// parsing that text succeeded.
    pub check_for_apache_bug: bool,
    /// Set per caller policy; when set, sniffing is skipped entirely and
    /// the supplied type (or its absence) is returned unchanged.
    pub no_sniff: bool,
}

impl Resource {
    pub fn new(supplied_mime_type: Option<MIMEType>) -> Self {
        Self {
            supplied_mime_type,
            check_for_apache_bug: false,
            no_sniff: false,
        }
    }

    pub fn with_check_for_apache_bug(mut self, value: bool) -> Self {
        self.check_for_apache_bug = value;
        self
    }

    pub fn with_no_sniff(mut self, value: bool) -> Self {
        self.no_sniff = value;
        self
    }
}

/// <https://mimesniff.spec.whatwg.org/#supplied-mime-type-detection-algorithm>
///
/// Builds a [`Resource`] from the raw `Content-Type` header value, if any.
/// A caller with multiple `Content-Type` headers associated with the same
/// resource is expected to have already picked the last one, per HTTP
/// header-combination semantics, before calling this function.
pub fn determine_supplied_mime_type(content_type: Option<&[u8]>) -> Resource {
    let Some(content_type) = content_type else {
        return Resource::default();
    };

    let check_for_apache_bug = APACHE_BUG_CONTENT_TYPES
        .iter()
        .any(|candidate| *candidate == content_type);

    let supplied_mime_type = MIMEType::parse(content_type);
    if supplied_mime_type.is_none() {
        log::warn!("supplied Content-Type failed to parse, treating as absent");
    }

    Resource {
        supplied_mime_type,
        check_for_apache_bug,
        no_sniff: false,
    }
}

/// <https://mimesniff.spec.whatwg.org/#reading-the-resource-header>
///
/// Returns a prefix of `resource` no longer than [`MAX_RESOURCE_HEADER_LEN`]
/// bytes. Callers that stream data should buffer at least this much before
/// invoking the sniffing algorithm.
pub fn read_resource_header(resource: &[u8]) -> &[u8] {
    let len = resource.len().min(MAX_RESOURCE_HEADER_LEN);
    &resource[..len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_content_type_yields_default_resource() {
        let resource = determine_supplied_mime_type(None);
        assert_eq!(resource, Resource::default());
        assert!(resource.supplied_mime_type.is_none());
        assert!(!resource.check_for_apache_bug);
    }

    #[test]
    fn apache_bug_flag_set_on_exact_match() {
        let resource = determine_supplied_mime_type(Some(b"text/plain"));
        assert!(resource.check_for_apache_bug);
        assert!(resource.supplied_mime_type.is_some());

        let resource = determine_supplied_mime_type(Some(b"text/plain; charset=UTF-8"));
        assert!(resource.check_for_apache_bug);
    }

    #[test]
    fn apache_bug_flag_not_set_for_other_types() {
        let resource = determine_supplied_mime_type(Some(b"text/html"));
        assert!(!resource.check_for_apache_bug);
    }

    #[test]
    fn unparseable_content_type_leaves_supplied_type_absent() {
        let resource = determine_supplied_mime_type(Some(b"not a mime type"));
        assert!(resource.supplied_mime_type.is_none());
    }

    #[test]
    fn resource_header_is_capped() {
        let big = vec![0u8; MAX_RESOURCE_HEADER_LEN + 100];
        assert_eq!(read_resource_header(&big).len(), MAX_RESOURCE_HEADER_LEN);

        let small = vec![0u8; 10];
        assert_eq!(read_resource_header(&small).len(), 10);
    }
}
