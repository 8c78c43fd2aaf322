//! Package URL helpers.

use packageurl::PackageUrl;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

/// Everything from the first `?` on: qualifiers and subpath.
static QUALIFIERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?.*").expect("static regex"));

/// Ecosystem type of a package URL (`npm` for `pkg:npm/left-pad@1.3.0`).
///
/// Also accepts the historical `pkg:/<type>/...` form produced by some
/// parsers. Returns `None` when the string is not a package URL.
#[must_use]
pub fn purl_type(purl: &str) -> Option<String> {
    if let Ok(parsed) = PackageUrl::from_str(purl) {
        if !parsed.ty().is_empty() {
            return Some(parsed.ty().to_lowercase());
        }
    }

    let rest = purl.strip_prefix("pkg:")?.trim_start_matches('/');
    let ty = rest.split('/').next()?;
    if ty.is_empty() || ty == rest {
        return None;
    }
    Some(ty.to_lowercase())
}

/// True when `purl` is of ecosystem type `kind` (case-insensitive)
#[must_use]
pub fn purl_has_type(purl: &str, kind: &str) -> bool {
    purl_type(purl).is_some_and(|ty| ty.eq_ignore_ascii_case(kind))
}

/// Drop qualifiers and subpath from a package URL.
///
/// `pkg:deb/debian/curl@7.0?arch=amd64` becomes `pkg:deb/debian/curl@7.0`.
/// Strings without `?` are returned unchanged.
#[must_use]
pub fn strip_qualifiers(purl: &str) -> String {
    QUALIFIERS.replace(purl, "").into_owned()
}
