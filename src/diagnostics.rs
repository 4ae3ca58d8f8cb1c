// ABOUTME: Diagnostics accumulator for non-fatal warnings during provisioning.
// ABOUTME: Collects warnings that shouldn't fail a provisioning attempt but should be shown to users.

/// Collects non-fatal warnings during provisioning.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during provisioning.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a disk resize warning.
    pub fn storage_resize(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::StorageResize,
            message: message.into(),
        }
    }

    /// Create an SSH disconnect warning.
    pub fn ssh_disconnect(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::SshDisconnect,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Root disk resize was rejected; the instance keeps its image's disk size.
    StorageResize,
    /// Failed to cleanly disconnect SSH session.
    SshDisconnect,
}
