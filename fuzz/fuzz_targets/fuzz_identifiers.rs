#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_graph::matching::{purl_type, strip_qualifiers};
use sbom_graph::model::sanitize_slug;
use sbom_graph::Format;

/// Fuzz the string-level parsers: purls, media types and id slugs.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = purl_type(s);
        let stripped = strip_qualifiers(s);
        assert!(stripped.len() <= s.len());

        let format = Format::from(s);
        let _ = (format.major(), format.minor(), format.encoding(), format.kind());

        let slug = sanitize_slug(s);
        assert!(slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.'));
    }
});
