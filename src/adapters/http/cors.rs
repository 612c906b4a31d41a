//! Cross-origin headers shared by both hosting adapters.

use http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, VARY,
};

use crate::config::ServerConfig;

/// A configured CORS header value is not a valid HTTP header value.
#[derive(Debug, thiserror::Error)]
#[error("invalid CORS setting {setting}: {value:?}")]
pub struct CorsConfigError {
    pub setting: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

/// Decides the CORS headers attached to every response.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origins: AllowedOrigins,
    allow_headers: HeaderValue,
    allow_methods: HeaderValue,
}

impl CorsPolicy {
    /// An empty origin list, or one containing `*`, allows any origin.
    pub fn new<I, S>(
        origins: I,
        allow_headers: &str,
        allow_methods: &str,
    ) -> Result<Self, CorsConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let origins: Vec<String> = origins.into_iter().map(Into::into).collect();
        let origins = if origins.is_empty() || origins.iter().any(|o| o == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        };

        Ok(Self {
            origins,
            allow_headers: header_value("cors_allow_headers", allow_headers)?,
            allow_methods: header_value("cors_allow_methods", allow_methods)?,
        })
    }

    /// Any origin, any header, `POST,OPTIONS`.
    pub fn permissive() -> Self {
        Self {
            origins: AllowedOrigins::Any,
            allow_headers: HeaderValue::from_static("*"),
            allow_methods: HeaderValue::from_static("POST,OPTIONS"),
        }
    }

    pub fn from_server_config(config: &ServerConfig) -> Result<Self, CorsConfigError> {
        Self::new(
            config.cors_origins_list(),
            &config.cors_allow_headers,
            &config.cors_allow_methods,
        )
    }

    pub fn allows_any_origin(&self) -> bool {
        self.origins == AllowedOrigins::Any
    }

    /// Adds the CORS headers for a request from `origin` to `headers`.
    pub fn apply(&self, origin: Option<&HeaderValue>, headers: &mut HeaderMap) {
        match &self.origins {
            AllowedOrigins::Any => {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
            }
            AllowedOrigins::List(allowed) => {
                let listed = origin.filter(|value| {
                    value
                        .to_str()
                        .is_ok_and(|o| allowed.iter().any(|a| a == o))
                });
                if let Some(origin) = listed {
                    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
                }
                headers.append(VARY, HeaderValue::from_static("Origin"));
            }
        }
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
    }

    /// The CORS headers for a request from `origin`.
    pub fn headers(&self, origin: Option<&HeaderValue>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.apply(origin, &mut headers);
        headers
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

fn header_value(setting: &'static str, value: &str) -> Result<HeaderValue, CorsConfigError> {
    HeaderValue::from_str(value).map_err(|_| CorsConfigError {
        setting,
        value: value.to_string(),
    })
}
