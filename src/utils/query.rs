//! Query-string and path helpers shared by the resource calls.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::form_urlencoded;

// Everything but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Builds a query string from `(key, value)` pairs, skipping absent and
/// empty values. Pair order is preserved.
pub fn build_search_params<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<String>)>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        match value {
            Some(v) if !v.is_empty() => {
                serializer.append_pair(key, &v);
            }
            _ => {}
        }
    }
    serializer.finish()
}

/// Appends `?query` to `path` unless the query is empty.
pub fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

/// Percent-encodes a single path segment such as a resource id. Spaces
/// become `%20`, never `+`.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_empty_and_missing_values() {
        let qs = build_search_params([
            ("sort", Some("desc".to_string())),
            ("projectId", None),
            ("search", Some(String::new())),
            ("limit", Some("20".to_string())),
        ]);
        assert_eq!(qs, "sort=desc&limit=20");
    }

    #[test]
    fn test_values_are_encoded() {
        let qs = build_search_params([("search", Some("undefined index & more".to_string()))]);
        assert_eq!(qs, "search=undefined+index+%26+more");
    }

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("/logs", ""), "/logs");
        assert_eq!(with_query("/logs", "limit=5"), "/logs?limit=5");
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("a08929b5-d4f0"), "a08929b5-d4f0");
        assert_eq!(encode_segment("../etc"), "..%2Fetc");
    }

    #[test]
    fn test_encode_segment_space_and_plus() {
        assert_eq!(encode_segment("a b+c"), "a%20b%2Bc");
        assert_eq!(encode_segment("ошибка"), "%D0%BE%D1%88%D0%B8%D0%B1%D0%BA%D0%B0");
    }
}
