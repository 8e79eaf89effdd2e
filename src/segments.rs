//! URL segment parsing for path strings and full URLs.
//!
//! Ad-hoc path strings (`/a/b?x=1`) and full URLs
//! (`https://host/base/endpoint?x=1`) both decompose into the same four URL
//! parts plus a query-parameter map. The split rule: a path with a single
//! segment is entirely the endpoint; with more segments, the first becomes
//! the base path and the rest (rejoined) the endpoint.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use url::Url;

use crate::ConfigError;

/// The decomposed form of a path or URL string.
///
/// `scheme` and `host` are empty for bare paths; `base_path` and `endpoint`
/// default to `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    pub scheme: String,
    pub host: String,
    pub base_path: String,
    pub endpoint: String,
    pub params: BTreeMap<String, String>,
}

/// Parses a path or URL string into its [`Segments`].
///
/// Multi-valued query keys are flattened into comma-joined strings. This is
/// lossy for values containing encoded commas, but it is the wire format
/// existing callers depend on.
///
/// # Examples
///
/// ```
/// use herald::segments;
///
/// let seg = segments::parse("https://example.com/api/v1/users?page=2").unwrap();
/// assert_eq!(seg.scheme, "https");
/// assert_eq!(seg.host, "example.com");
/// assert_eq!(seg.base_path, "/api");
/// assert_eq!(seg.endpoint, "/v1/users");
/// assert_eq!(seg.params["page"], "2");
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] for syntactically malformed URLs.
/// This is a configuration fault to be checked at the call site, not a
/// per-request runtime condition.
pub fn parse(input: &str) -> Result<Segments, ConfigError> {
    match Url::parse(input) {
        Ok(url) => {
            let host = match url.host_str() {
                Some(h) => match url.port() {
                    Some(p) => format!("{h}:{p}"),
                    None => h.to_string(),
                },
                None => String::new(),
            };
            let (base_path, endpoint) = split_path(url.path());
            Ok(Segments {
                scheme: url.scheme().to_string(),
                host,
                base_path,
                endpoint,
                params: flatten_query(url.query().unwrap_or("")),
            })
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            // Bare path string: split query off manually.
            let trimmed = input.split('#').next().unwrap_or("");
            let (path, query) = match trimmed.split_once('?') {
                Some((p, q)) => (p, q),
                None => (trimmed, ""),
            };
            let (base_path, endpoint) = split_path(path);
            Ok(Segments {
                scheme: String::new(),
                host: String::new(),
                base_path,
                endpoint,
                params: flatten_query(query),
            })
        }
        Err(e) => Err(ConfigError::InvalidUrl(e)),
    }
}

/// Splits a path into `(base_path, endpoint)`.
///
/// One segment after the root keeps the whole path as the endpoint; two or
/// more make the first segment the base path and rejoin the remainder.
fn split_path(path: &str) -> (String, String) {
    let pieces: Vec<&str> = path.split('/').collect();
    match pieces.len() {
        0 | 1 => ("/".to_string(), "/".to_string()),
        2 => ("/".to_string(), path.to_string()),
        _ => (
            format!("/{}", pieces[1]),
            format!("/{}", pieces[2..].join("/")),
        ),
    }
}

fn flatten_query(query: &str) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match out.entry(key.into_owned()) {
            Entry::Occupied(mut slot) => {
                let joined = slot.get_mut();
                joined.push(',');
                joined.push_str(&value);
            }
            Entry::Vacant(slot) => {
                slot.insert(value.into_owned());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment_is_all_endpoint() {
        let seg = parse("/users").unwrap();
        assert_eq!(seg.scheme, "");
        assert_eq!(seg.host, "");
        assert_eq!(seg.base_path, "/");
        assert_eq!(seg.endpoint, "/users");
    }

    #[test]
    fn multi_segment_splits_base_and_endpoint() {
        let seg = parse("/api/v1/users").unwrap();
        assert_eq!(seg.base_path, "/api");
        assert_eq!(seg.endpoint, "/v1/users");
    }

    #[test]
    fn root_path_defaults() {
        let seg = parse("/").unwrap();
        assert_eq!(seg.base_path, "/");
        assert_eq!(seg.endpoint, "/");
        assert!(seg.params.is_empty());
    }

    #[test]
    fn full_url_keeps_scheme_host_and_port() {
        let seg = parse("http://localhost:8080/api/users?q=rust").unwrap();
        assert_eq!(seg.scheme, "http");
        assert_eq!(seg.host, "localhost:8080");
        assert_eq!(seg.base_path, "/api");
        assert_eq!(seg.endpoint, "/users");
        assert_eq!(seg.params["q"], "rust");
    }

    #[test]
    fn multi_valued_query_flattens_to_commas() {
        let seg = parse("/search?tag=a&tag=b&tag=c").unwrap();
        assert_eq!(seg.params["tag"], "a,b,c");
    }

    #[test]
    fn bare_query_on_path() {
        let seg = parse("/users?page=1&limit=10").unwrap();
        assert_eq!(seg.endpoint, "/users");
        assert_eq!(seg.params["page"], "1");
        assert_eq!(seg.params["limit"], "10");
    }

    #[test]
    fn malformed_url_is_a_config_error() {
        assert!(parse("http://exa mple.com/x").is_err());
    }

    #[test]
    fn round_trips_built_urls() {
        // Building a URL from parts then parsing it back yields the parts.
        let cases = [
            ("https", "example.com", "/api", "/v1/users"),
            ("http", "127.0.0.1:8080", "/base", "/endpoint"),
        ];
        for (scheme, host, base, endpoint) in cases {
            let built = format!("{scheme}://{host}{base}{endpoint}");
            let seg = parse(&built).unwrap();
            assert_eq!(seg.scheme, scheme);
            assert_eq!(seg.host, host);
            assert_eq!(seg.base_path, base);
            assert_eq!(seg.endpoint, endpoint);
        }
    }
}
