//! Connection context shared by the online shim and its consumers
//!
//! Holds the settings in effect and the service status observed from the
//! backend. Consumers are handed the context (or a [`ServiceStatus`] copy)
//! instead of reading process-wide flags.

use crate::ids::{RandomSource, SessionId, ThreadRandom};
use crate::value_objects::OnlineSettings;

/// Backend and client disagree on the API version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMismatch {
    pub local: String,
    pub remote: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceStatus {
    version_mismatch: Option<VersionMismatch>,
}

impl ServiceStatus {
    pub fn version_mismatch(&self) -> Option<&VersionMismatch> {
        self.version_mismatch.as_ref()
    }

    pub fn has_version_mismatch(&self) -> bool {
        self.version_mismatch.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OnlineContext {
    settings: OnlineSettings,
    status: ServiceStatus,
}

impl OnlineContext {
    pub fn new(settings: OnlineSettings) -> Self {
        Self {
            settings,
            status: ServiceStatus::default(),
        }
    }

    pub fn settings(&self) -> &OnlineSettings {
        &self.settings
    }

    pub fn status(&self) -> &ServiceStatus {
        &self.status
    }

    /// Compare the backend's reported version against ours.
    ///
    /// Sets the mismatch indicator on disagreement and returns whether the
    /// versions match. A match does not clear an earlier mismatch; that
    /// takes [`OnlineContext::acknowledge_mismatch`].
    pub fn observe_service_version(&mut self, local: &str, remote: &str) -> bool {
        if local.trim() == remote.trim() {
            return true;
        }
        tracing::warn!(local, remote, "online service version mismatch");
        self.status.version_mismatch = Some(VersionMismatch {
            local: local.to_string(),
            remote: remote.to_string(),
        });
        false
    }

    /// Clear the mismatch indicator once the user has dealt with it.
    pub fn acknowledge_mismatch(&mut self) -> Option<VersionMismatch> {
        self.status.version_mismatch.take()
    }

    /// New session id tagged for the configured network mode.
    pub fn generate_session_id(&self) -> SessionId {
        self.generate_session_id_with(&ThreadRandom)
    }

    pub fn generate_session_id_with(&self, source: &dyn RandomSource) -> SessionId {
        SessionId::generate_with(self.settings.network_mode.session_tag(), source)
    }
}
