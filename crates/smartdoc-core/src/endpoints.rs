//! API endpoint resolution.
//!
//! Derives the legacy and versioned API roots from the origin the client is
//! running against. A recognized local-development origin talks directly to
//! the local API port; anything else uses relative roots and delegates host
//! routing to the reverse proxy in front of the backend.

use serde::{Deserialize, Serialize};

/// Port the development front-end is served from.
pub const LOCAL_DEV_PORT: u16 = 3000;

/// Direct address of the API server in local development.
const LOCAL_API_ROOT: &str = "http://localhost:8000";

const V1_PREFIX: &str = "/api/v1";

/// Resolved API roots plus the gateway behavior flags.
///
/// Resolution is a pure function of the origin input: no side effects, fully
/// deterministic, re-derivable at any time. Flag overrides are applied by
/// the builder methods, never by mutating a shared resolved value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Legacy (unversioned) API root.
    pub api_base_url: String,
    /// Versioned API root.
    pub v1_base_url: String,
    /// When false, the gateway skips versioned endpoints entirely and calls
    /// legacy routes directly.
    pub prefer_v1: bool,
    /// Gates request/response logging in the gateway.
    pub debug: bool,
}

impl Endpoints {
    /// Resolves endpoint roots for the given origin.
    ///
    /// `localhost`/`127.0.0.1` on port 3000 is the recognized development
    /// origin and resolves to absolute URLs against the local API server.
    /// Every other origin resolves to relative roots, leaving host routing
    /// to the reverse proxy.
    pub fn resolve(hostname: &str, port: Option<u16>) -> Self {
        let is_local_development =
            matches!(hostname, "localhost" | "127.0.0.1") && port == Some(LOCAL_DEV_PORT);

        if is_local_development {
            Self {
                api_base_url: LOCAL_API_ROOT.to_string(),
                v1_base_url: format!("{LOCAL_API_ROOT}{V1_PREFIX}"),
                prefer_v1: true,
                debug: false,
            }
        } else {
            Self {
                api_base_url: String::new(),
                v1_base_url: V1_PREFIX.to_string(),
                prefer_v1: true,
                debug: false,
            }
        }
    }

    /// Rebases both roots onto an explicit origin, e.g. from a config
    /// override when the client has no document origin of its own.
    pub fn with_api_base(mut self, origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        self.api_base_url = origin.to_string();
        self.v1_base_url = format!("{origin}{V1_PREFIX}");
        self
    }

    /// Overrides the prefer-versioned flag.
    pub fn with_prefer_v1(mut self, prefer_v1: bool) -> Self {
        self.prefer_v1 = prefer_v1;
        self
    }

    /// Overrides the debug-logging flag.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Joins a path onto the legacy root.
    pub fn legacy_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    /// Joins a path onto the versioned root.
    pub fn v1_url(&self, path: &str) -> String {
        format!("{}{}", self.v1_base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_development_origin_resolves_to_local_api() {
        for host in ["localhost", "127.0.0.1"] {
            let endpoints = Endpoints::resolve(host, Some(3000));
            assert_eq!(endpoints.api_base_url, "http://localhost:8000");
            assert_eq!(endpoints.v1_base_url, "http://localhost:8000/api/v1");
        }
    }

    #[test]
    fn test_other_origins_resolve_to_relative_roots() {
        let endpoints = Endpoints::resolve("smartdoc.example.org", Some(443));
        assert_eq!(endpoints.api_base_url, "");
        assert_eq!(endpoints.v1_base_url, "/api/v1");

        // localhost on any other port is not the dev origin
        let endpoints = Endpoints::resolve("localhost", Some(8080));
        assert_eq!(endpoints.api_base_url, "");

        let endpoints = Endpoints::resolve("localhost", None);
        assert_eq!(endpoints.api_base_url, "");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        assert_eq!(
            Endpoints::resolve("localhost", Some(3000)),
            Endpoints::resolve("localhost", Some(3000))
        );
    }

    #[test]
    fn test_with_api_base_rebases_both_roots() {
        let endpoints = Endpoints::resolve("example.org", None)
            .with_api_base("https://smartdoc.example.org/");
        assert_eq!(endpoints.api_base_url, "https://smartdoc.example.org");
        assert_eq!(endpoints.v1_base_url, "https://smartdoc.example.org/api/v1");
        assert_eq!(
            endpoints.legacy_url("/health"),
            "https://smartdoc.example.org/health"
        );
        assert_eq!(
            endpoints.v1_url("/chat"),
            "https://smartdoc.example.org/api/v1/chat"
        );
    }
}
