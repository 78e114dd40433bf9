//! Configuration for Waymark
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;

/// Waymark - goal-progress migration for journal entries
///
/// Classifies every unlinked journal entry against its owner's goal tree
/// and backfills the goal link plus a derived progress record.
#[derive(Parser, Debug, Clone)]
#[command(name = "waymark")]
#[command(about = "Backfills goal links and progress records for journal entries")]
pub struct Args {
    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "waymark")]
    pub mongodb_db: String,

    /// API key for the classification service
    /// When unset the run still completes: every entry resolves to "no match"
    /// without any HTTP traffic
    #[arg(long, env = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible classification endpoint
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// Model used for classification
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub openai_model: String,

    /// Pause after each entry in milliseconds (classification-service rate ceiling)
    #[arg(long, env = "REQUEST_DELAY_MS", default_value = "1000")]
    pub request_delay_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Base URL without a trailing slash, so path joins stay predictable
    pub fn base_url(&self) -> &str {
        self.openai_base_url.trim_end_matches('/')
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.openai_base_url.starts_with("http://") && !self.openai_base_url.starts_with("https://") {
            return Err(format!(
                "OPENAI_BASE_URL must be an http(s) URL, got '{}'",
                self.openai_base_url
            ));
        }

        if self.mongodb_uri.is_empty() {
            return Err("MONGODB_URI must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with_base_url(url: &str) -> Args {
        Args::parse_from(["waymark", "--openai-base-url", url])
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let args = args_with_base_url("https://api.openai.com/v1/");
        assert_eq!(args.base_url(), "https://api.openai.com/v1");
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let args = args_with_base_url("ftp://example.com");
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        let args = Args::parse_from(["waymark"]);
        assert!(args.validate().is_ok());
        assert_eq!(args.request_delay_ms, 1000);
    }
}
