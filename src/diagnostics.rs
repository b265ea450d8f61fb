// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects problems that happen after a cutover has already succeeded.

/// Collects non-fatal warnings during push and rollback.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create an archive pruning warning.
    pub fn prune(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Prune,
            message: message.into(),
        }
    }

    /// Create a route release warning.
    pub fn release(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Release,
            message: message.into(),
        }
    }

    /// Create an application listing warning.
    pub fn listing(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Listing,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The archived application still holds the production routes.
    Release,
    /// Old archives could not be listed or deleted; they remain on the platform.
    Prune,
    /// The final application listing failed.
    Listing,
}
