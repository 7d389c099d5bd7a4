use crate::model::correction::CorrectionFactor;
use crate::model::options::DisplayOptions;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("access denied: access key does not match")]
    Denied,
    #[error("access key required for this session")]
    Required,
}

/// Shared-secret gate. An absent or empty secret leaves the gate open.
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    secret: Option<String>,
}

impl AccessGate {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.secret.is_none()
    }

    /// Checks `key` and records the outcome on the session. Failed attempts
    /// leave the session unauthorized and may be retried immediately.
    pub fn attempt(&self, session: &mut SessionContext, key: &str) -> Result<(), AccessError> {
        let granted = match &self.secret {
            None => true,
            Some(secret) => secret == key,
        };
        session.authorized = granted;
        if granted {
            tracing::debug!("access granted");
            Ok(())
        } else {
            tracing::warn!("access denied");
            Err(AccessError::Denied)
        }
    }
}

/// Per-invocation state handed to the pipeline. Created by `start`,
/// consumed by `end`.
#[derive(Debug, Clone)]
pub struct SessionContext {
    authorized: bool,
    pub registration: String,
    pub correction: &'static CorrectionFactor,
    pub options: DisplayOptions,
}

impl SessionContext {
    pub fn start(
        gate: &AccessGate,
        registration: String,
        correction: &'static CorrectionFactor,
        options: DisplayOptions,
    ) -> Self {
        Self {
            authorized: gate.is_open(),
            registration,
            correction,
            options,
        }
    }

    pub fn require_access(&self) -> Result<(), AccessError> {
        if self.authorized {
            Ok(())
        } else {
            Err(AccessError::Required)
        }
    }

    pub fn end(self) {
        tracing::debug!("session ended: registration={}", self.registration);
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/session.rs"]
mod tests;
