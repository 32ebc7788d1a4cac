use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static DEFAULT_SCRUBBER: LazyLock<SecretScrubber> = LazyLock::new(SecretScrubber::new);

/// Scrub `message` with the process-wide scrubber.
pub fn scrub(message: &str) -> String {
    DEFAULT_SCRUBBER.scrub_message(message)
}

/// Removes credentials from text before it is logged or printed.
///
/// Error bodies returned by GitHub and Asana can echo request headers, and
/// configuration errors can echo token values.
#[derive(Clone)]
pub struct SecretScrubber {
    github_token_pattern: Regex,
    asana_token_pattern: Regex,
    bearer_pattern: Regex,
    field_pattern: Regex,
}

impl SecretScrubber {
    /// Create a new secret scrubber
    #[allow(clippy::missing_panics_doc)]
    pub fn new() -> Self {
        Self {
            // Classic (ghp_, gho_, ...) and fine-grained (github_pat_) tokens
            github_token_pattern: Regex::new(
                r"\b(?:gh[pousr]_[A-Za-z0-9]{20,}|github_pat_[A-Za-z0-9_]{20,})",
            )
            .expect("github token pattern is valid"),
            // Asana personal access tokens: 1/<gid>:<secret> or 2/<gid>/<gid>:<secret>
            asana_token_pattern: Regex::new(r"\b[0-9]/[0-9]{6,}(?:/[0-9]{6,})?:[A-Za-z0-9]{16,}")
                .expect("asana token pattern is valid"),
            bearer_pattern: Regex::new(r"Bearer\s+[A-Za-z0-9\-_./:]+")
                .expect("bearer pattern is valid"),
            field_pattern: Regex::new(
                r#"(["']?(?:api_key|apikey|token|secret|password)["']?\s*[:=]\s*)["']?[^"'\s,}&]+["']?"#,
            )
            .expect("field pattern is valid"),
        }
    }

    /// Scrub a message of sensitive data
    pub fn scrub_message(&self, message: &str) -> String {
        let scrubbed = self
            .bearer_pattern
            .replace_all(message, "Bearer [TOKEN_REDACTED]");
        let scrubbed = self
            .github_token_pattern
            .replace_all(&scrubbed, "[TOKEN_REDACTED]");
        let scrubbed = self
            .asana_token_pattern
            .replace_all(&scrubbed, "[TOKEN_REDACTED]");
        self.field_pattern
            .replace_all(&scrubbed, "${1}[REDACTED]")
            .into_owned()
    }
}

impl Default for SecretScrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}
