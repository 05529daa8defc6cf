//! Document sources
//!
//! The extraction core never performs I/O; callers hand it markup obtained
//! through a [`DocumentSource`].

use crate::config::{FetchConfig, Limits};
use crate::error::{FetchError, Result};
use crate::pipeline::generate;
use serde_json::Value;
use ureq::ResponseExt;

/// Markup and the address it was finally served from
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedDocument {
    pub final_url: String,
    pub markup: String,
}

pub trait DocumentSource {
    fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError>;
}

/// Blocking HTTP source following redirects
pub struct HttpSource {
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(config: &FetchConfig) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(config.timeout()))
                .user_agent(&config.user_agent)
                .build(),
        );
        Self { agent }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new(&FetchConfig::default())
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        let parsed = url::Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let response = self.agent.get(parsed.as_str()).call().map_err(|e| match e {
            ureq::Error::StatusCode(status) => FetchError::Status {
                url: url.to_string(),
                status,
            },
            other => FetchError::Transport {
                url: url.to_string(),
                message: other.to_string(),
            },
        })?;

        let final_url = response.get_uri().to_string();
        let markup = response
            .into_body()
            .read_to_string()
            .map_err(|e| FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            target: "schema_synth::extract",
            url,
            final_url = %final_url,
            bytes = markup.len(),
            "document fetched"
        );

        Ok(FetchedDocument { final_url, markup })
    }
}

/// Fetch a document and synthesize its JSON-LD, resolving against the final URL
pub fn generate_from_source(source: &dyn DocumentSource, url: &str, limits: &Limits) -> Result<Vec<Value>> {
    let document = source.fetch(url)?;
    generate(&document.markup, &document.final_url, limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct StaticSource {
        final_url: &'static str,
        markup: &'static str,
    }

    impl DocumentSource for StaticSource {
        fn fetch(&self, _url: &str) -> Result<FetchedDocument, FetchError> {
            Ok(FetchedDocument {
                final_url: self.final_url.to_string(),
                markup: self.markup.to_string(),
            })
        }
    }

    struct FailingSource;

    impl DocumentSource for FailingSource {
        fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError> {
            Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[test]
    fn test_generate_resolves_against_final_url() {
        let source = StaticSource {
            final_url: "https://www.example.com/blog/moved",
            markup: r#"<html><head><title>Moved post</title></head>
                <body><article><p>Text</p></article></body></html>"#,
        };
        let docs = generate_from_source(&source, "http://example.com/old", &Limits::default()).unwrap();

        assert_eq!(docs[0]["@type"], "BlogPosting");
        assert_eq!(docs[0]["mainEntityOfPage"], "https://www.example.com/blog/moved");
    }

    #[test]
    fn test_fetch_failure_is_an_error() {
        let err = generate_from_source(&FailingSource, "https://example.com/missing", &Limits::default()).unwrap_err();
        assert!(matches!(err, Error::Fetch(FetchError::Status { status: 404, .. })));
    }

    #[test]
    fn test_http_source_rejects_bad_urls() {
        let source = HttpSource::default();
        assert!(matches!(source.fetch("not a url"), Err(FetchError::InvalidUrl(_))));
        assert!(matches!(source.fetch("ftp://example.com/file"), Err(FetchError::InvalidUrl(_))));
    }
}
