//! Runtime configuration for the run pipeline.

/// Configuration for submitting runs and rendering previews.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// The fixed run endpoint requests are POSTed to.
    pub endpoint: String,
    /// Upper bound on projected preview text, in characters.
    pub preview_max_chars: usize,
}

impl RunConfig {
    pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/run";
    pub const DEFAULT_PREVIEW_MAX_CHARS: usize = 120;

    fn resolve_endpoint(provided: Option<String>) -> String {
        if let Some(endpoint) = provided {
            return endpoint;
        }
        dotenvy::dotenv().ok();
        std::env::var("FLOWLOOM_RUN_ENDPOINT")
            .unwrap_or_else(|_| Self::DEFAULT_ENDPOINT.to_string())
    }

    /// Build a config, resolving the endpoint from the environment
    /// (`FLOWLOOM_RUN_ENDPOINT`) when not provided.
    #[must_use]
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint: Self::resolve_endpoint(endpoint),
            preview_max_chars: Self::DEFAULT_PREVIEW_MAX_CHARS,
        }
    }

    #[must_use]
    pub fn with_preview_max_chars(mut self, limit: usize) -> Self {
        self.preview_max_chars = limit;
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(None)
    }
}
