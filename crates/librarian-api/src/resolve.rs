// Request URL construction
//
// Every backend route lives under a fixed `api/` namespace. Callers pass
// logical paths (`/invite/config`, `auth/test`, `api/invite`) and get back
// either an absolute URL under the configured base host or a same-origin
// path. Resolution is pure; joining a same-origin path onto the origin the
// client talks to happens in `endpoint_url`.

use url::Url;

use crate::error::Error;

/// Namespace segment every backend route is mounted under.
pub const API_PREFIX: &str = "api/";

/// Maps logical API paths to request URLs.
///
/// The base host is fixed at construction and never mutated afterwards.
/// An empty base host is treated the same as no base host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlResolver {
    base_host: Option<String>,
}

impl UrlResolver {
    pub fn new(base_host: Option<String>) -> Self {
        Self {
            base_host: base_host.filter(|h| !h.is_empty()),
        }
    }

    /// A resolver without a base host; every path resolves same-origin.
    pub fn same_origin() -> Self {
        Self::default()
    }

    pub fn base_host(&self) -> Option<&str> {
        self.base_host.as_deref()
    }

    /// Resolve a logical path to a request URL string.
    ///
    /// - `"/invite/config"` -> `"/api/invite/config"` (no base host)
    /// - `"api/auth/test"` under `"https://lib.example"` -> `"https://lib.example/api/auth/test"`
    pub fn resolve(&self, path: &str) -> String {
        let path = normalize_path(path);

        match self.base_host.as_deref() {
            Some(host) => format!("{}/{path}", host.trim_end_matches('/')),
            None => format!("/{path}"),
        }
    }

    /// Resolve a logical path and turn it into an absolute [`Url`].
    ///
    /// Absolute results (a base host is configured) are parsed as-is;
    /// same-origin results are joined onto `origin`.
    pub fn endpoint_url(&self, path: &str, origin: Option<&Url>) -> Result<Url, Error> {
        let resolved = self.resolve(path);

        match Url::parse(&resolved) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let origin = origin.ok_or(Error::InvalidUrl(
                    url::ParseError::RelativeUrlWithoutBase,
                ))?;
                Ok(origin.join(&resolved)?)
            }
            Err(e) => Err(Error::InvalidUrl(e)),
        }
    }
}

/// Strip one leading `/` and make sure the path sits under [`API_PREFIX`].
pub fn normalize_path(path: &str) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);

    if path.starts_with(API_PREFIX) {
        path.to_owned()
    } else {
        format!("{API_PREFIX}{path}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn same_origin_prefixes_api_once() {
        let resolver = UrlResolver::same_origin();
        assert_eq!(resolver.resolve("invite/config"), "/api/invite/config");
        assert_eq!(resolver.resolve("/invite/config"), "/api/invite/config");
        assert_eq!(resolver.resolve("api/invite/config"), "/api/invite/config");
        assert_eq!(resolver.resolve("/api/auth/test"), "/api/auth/test");
    }

    #[test]
    fn base_host_gets_exactly_one_separator() {
        for host in ["https://lib.example", "https://lib.example/"] {
            let resolver = UrlResolver::new(Some(host.into()));
            assert_eq!(
                resolver.resolve("/invite"),
                "https://lib.example/api/invite",
                "host {host:?}"
            );
            assert_eq!(
                resolver.resolve("api/auth/login"),
                "https://lib.example/api/auth/login"
            );
        }
    }

    #[test]
    fn base_host_with_path_keeps_its_path() {
        let resolver = UrlResolver::new(Some("https://lib.example/librarian/".into()));
        assert_eq!(
            resolver.resolve("auth/test"),
            "https://lib.example/librarian/api/auth/test"
        );
    }

    #[test]
    fn empty_base_host_is_same_origin() {
        let resolver = UrlResolver::new(Some(String::new()));
        assert_eq!(resolver.base_host(), None);
        assert_eq!(resolver.resolve("auth/test"), "/api/auth/test");
    }

    #[test]
    fn only_a_single_leading_slash_is_stripped() {
        assert_eq!(normalize_path("//x"), "api//x");
        assert_eq!(normalize_path(""), "api/");
    }

    #[test]
    fn endpoint_url_joins_same_origin_paths() {
        let origin = Url::parse("http://127.0.0.1:8080/some/page").unwrap();
        let url = UrlResolver::same_origin()
            .endpoint_url("invite/config", Some(&origin))
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/invite/config");
    }

    #[test]
    fn endpoint_url_prefers_base_host_over_origin() {
        let origin = Url::parse("http://127.0.0.1:8080").unwrap();
        let url = UrlResolver::new(Some("https://api.example".into()))
            .endpoint_url("auth/test", Some(&origin))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example/api/auth/test");
    }

    #[test]
    fn endpoint_url_without_any_origin_is_an_error() {
        let err = UrlResolver::same_origin()
            .endpoint_url("auth/test", None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
