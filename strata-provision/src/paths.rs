//! Request-path classification.

/// Allow-list of path prefixes that never require tenant context.
///
/// Requests matching a prefix (login, static assets, admin) are served
/// with the default connection and never touch session state.
#[derive(Debug, Clone)]
pub struct PathPolicy {
    prefixes: Vec<String>,
}

impl PathPolicy {
    /// Create a policy with no exempt paths.
    pub fn empty() -> Self {
        Self {
            prefixes: Vec::new(),
        }
    }

    /// The default allow-list of the business administration backend.
    pub fn business_defaults() -> Self {
        Self {
            prefixes: vec![
                "/login/".to_string(),
                "/static/".to_string(),
                "/media/".to_string(),
                "/favicon.ico".to_string(),
                "/admin/".to_string(),
            ],
        }
    }

    /// Add an exempt path prefix.
    pub fn exempt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Whether `path` is exempt from session/tenant provisioning.
    pub fn bypasses_session(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path.starts_with(p))
    }

    /// The configured prefixes.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self::business_defaults()
    }
}
