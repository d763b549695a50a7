//! Installation Licensing
//!
//! The entitlement authority is an external collaborator: this module only
//! generates a device-local installation id, defines the activation seam
//! and persists the grant the server returns. There is no client-side
//! secret to compare against.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LicenseError {
    #[error("Activation request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Activation rejected: {0}")]
    Rejected(String),
    #[error("Activation server error: {status}")]
    ServerError { status: u16 },
}

/// Device-local installation identifier, `VC-XXXXXXXX-XXXX`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallId(String);

impl InstallId {
    /// Generate a fresh id from a v4 uuid. Generated once per install and
    /// persisted; the server binds licenses to it.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string().to_uppercase();
        InstallId(format!("VC-{}-{}", &hex[..8], &hex[8..12]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the authority granted, persisted as `activation.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationState {
    pub install_id: InstallId,
    pub license_key: String,
    pub activated_at: DateTime<Utc>,
}

/// External entitlement authority. The real implementation talks to the
/// licensing server; tests substitute their own.
#[async_trait]
pub trait ActivationAuthority: Send + Sync {
    async fn activate(
        &self,
        install_id: &InstallId,
        license_key: &str,
    ) -> Result<ActivationState, LicenseError>;
}

#[derive(Debug, Serialize)]
struct ActivationRequest<'a> {
    install_id: &'a str,
    license_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct ActivationResponse {
    granted: bool,
    #[serde(default)]
    reason: String,
}

/// HTTP-backed authority: POSTs the id/key pair to `{base_url}/activate`.
pub struct HttpActivationAuthority {
    client: reqwest::Client,
    base_url: String,
}

impl HttpActivationAuthority {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpActivationAuthority {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ActivationAuthority for HttpActivationAuthority {
    async fn activate(
        &self,
        install_id: &InstallId,
        license_key: &str,
    ) -> Result<ActivationState, LicenseError> {
        let url = format!("{}/activate", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&ActivationRequest {
                install_id: install_id.as_str(),
                license_key,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LicenseError::ServerError {
                status: status.as_u16(),
            });
        }

        let body: ActivationResponse = response.json().await?;
        if !body.granted {
            tracing::info!(%install_id, "activation rejected by authority");
            return Err(LicenseError::Rejected(body.reason));
        }

        Ok(ActivationState {
            install_id: install_id.clone(),
            license_key: license_key.to_string(),
            activated_at: Utc::now(),
        })
    }
}
