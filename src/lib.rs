//! An implementation of the [WHATWG MIME Sniffing Standard](https://mimesniff.spec.whatwg.org/).
//!
//! Two tightly coupled responsibilities live here: parsing/serializing MIME
//! type values as used in HTTP `Content-Type` headers, and content sniffing,
//! examining the leading bytes of a resource to arrive at a computed media
//! type.
//!
//! Parsing allocates proportionally to the input. The sniffing hot path
//! (pattern matching, `identify_unknown_mime_type`'s terminal cases) makes
//! zero allocations: matches are clones of `'static` constants.

mod classify;
mod containers;
mod mime_type;
mod parameters;
mod parse;
mod pattern;
mod resource;
mod sniff;
mod sniff_tables;

pub use classify::{
    is_binary_data_byte, is_http_quoted_string_token_code_point, is_http_token_code_point,
    is_http_whitespace, is_tag_terminating_byte,
};
pub use mime_type::MIMEType;
pub use parameters::Parameters;
pub use parse::{is_valid_mime_type_string, is_valid_mime_type_with_no_parameters, minimize, serialize, MIMEParseError};
pub use resource::{determine_supplied_mime_type, read_resource_header, Resource, MAX_RESOURCE_HEADER_LEN};
pub use sniff::{
    distinguish_text_or_binary, identify_unknown_mime_type, sniff_in_audio_or_video_context,
    sniff_in_browsing_context, sniff_in_cache_manifest_context, sniff_in_font_context,
    sniff_in_image_context, sniff_in_plugin_context, sniff_in_script_context, sniff_in_style_context,
    sniff_in_text_track_context, sniff_mime_type,
};
