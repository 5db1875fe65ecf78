/// Shared-secret capability check for the ingest webhook.
///
/// Plain string equality, as the stored deployments expect. The type is a
/// named seam so a real credential scheme can replace it without touching
/// endpoint logic.
#[derive(Clone)]
pub struct Authenticator {
    expected: Option<String>,
}

impl Authenticator {
    #[must_use]
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected.filter(|s| !s.is_empty()),
        }
    }

    /// True only when a secret is configured and the presented value
    /// matches it exactly. An unconfigured secret rejects every caller.
    #[must_use]
    pub fn verify(&self, presented: Option<&str>) -> bool {
        match (&self.expected, presented) {
            (Some(expected), Some(presented)) => expected == presented,
            _ => false,
        }
    }
}
