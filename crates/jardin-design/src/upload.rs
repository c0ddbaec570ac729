use std::time::Duration;

use jardin_scene::ObjectStore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::payload::{DesignSubmission, inventory_from_scene};
use crate::{Error, Result};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub api_base_url: String,
    pub auth_token: String,
}

impl BackendConfig {
    pub fn new(api_base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            auth_token: auth_token.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(Error::MissingConfiguration("api_base_url is empty".to_string()));
        }
        if self.auth_token.trim().is_empty() {
            return Err(Error::MissingConfiguration("auth_token is empty".to_string()));
        }
        Ok(())
    }

    pub fn designs_endpoint(&self) -> String {
        format!("{}/designs/", self.api_base_url.trim_end_matches('/'))
    }
}

/// One part of a multipart form body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Transport-independent description of the design POST.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub parts: Vec<FormPart>,
    pub timeout: Duration,
}

impl UploadRequest {
    pub fn build(config: &BackendConfig, submission: &DesignSubmission) -> Result<Self> {
        config.validate()?;
        let mut parts = vec![FormPart {
            name: "design_data".to_string(),
            file_name: None,
            content_type: "application/json".to_string(),
            body: submission.data.to_json_string()?.into_bytes(),
        }];
        if let Some(png) = &submission.screenshot {
            parts.push(FormPart {
                name: "screenshot_file".to_string(),
                file_name: Some("screenshot.png".to_string()),
                content_type: "image/png".to_string(),
                body: png.clone(),
            });
        }
        Ok(Self {
            url: config.designs_endpoint(),
            headers: vec![(
                "Authorization".to_string(),
                format!("Bearer {}", config.auth_token),
            )],
            parts,
            timeout: REQUEST_TIMEOUT,
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn part(&self, name: &str) -> Option<&FormPart> {
        self.parts.iter().find(|part| part.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { status: u16, body: String },
    Failed { reason: String },
}

/// Sends a prepared request to the design backend.
pub trait DesignUploader {
    fn save_design(&mut self, request: UploadRequest) -> SaveOutcome;
}

/// Collects the scene inventory under `name` and hands it to `uploader`.
pub fn submit_design<U, S>(
    uploader: &mut U,
    config: &BackendConfig,
    name: &str,
    store: &S,
    screenshot: Option<Vec<u8>>,
) -> Result<SaveOutcome>
where
    U: DesignUploader + ?Sized,
    S: ObjectStore + ?Sized,
{
    let submission = DesignSubmission::new(name, inventory_from_scene(store), screenshot)?;
    let request = UploadRequest::build(config, &submission)?;
    info!(
        url = %request.url,
        name = %submission.data.name,
        items = submission.data.items.len(),
        "submitting design"
    );
    let outcome = uploader.save_design(request);
    match &outcome {
        SaveOutcome::Saved { status, .. } => info!(status, "design saved"),
        SaveOutcome::Failed { reason } => warn!(%reason, "design upload failed"),
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trims_trailing_slash() {
        let config = BackendConfig::new("https://api.example.org/v1/", "token");
        assert_eq!(config.designs_endpoint(), "https://api.example.org/v1/designs/");
    }

    #[test]
    fn missing_token_is_reported() {
        let config = BackendConfig::new("https://api.example.org", " ");
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfiguration(_))
        ));
    }
}
