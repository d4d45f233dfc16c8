//! HTTP client for the media host API.

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::config::MediaConfig;

use super::{MediaError, validate_upload};

/// The media host's record of a successful upload.
///
/// Both fields are persisted: `url` is what pages render, `public_id` is
/// the key later passed to [`MediaClient::delete`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct UploadedMedia {
    /// Public CDN URL of the stored image.
    pub url: String,
    /// Host-assigned identifier used for deletion.
    pub public_id: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
    public_id: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    result: Option<String>,
    error: Option<String>,
}

/// Client for the media host's upload and delete endpoints.
#[derive(Clone)]
pub struct MediaClient {
    client: Client,
    base_url: String,
    api_key: String,
    api_secret: SecretString,
    default_folder: String,
}

impl std::fmt::Debug for MediaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("default_folder", &self.default_folder)
            .finish_non_exhaustive()
    }
}

impl MediaClient {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            default_folder: config.upload_folder.clone(),
        }
    }

    /// The folder used when callers pass no explicit one.
    #[must_use]
    pub fn default_folder(&self) -> &str {
        &self.default_folder
    }

    /// Upload an image and return its URL and deletion key.
    ///
    /// Enforces the MIME allow-list and the 2 MiB ceiling locally before
    /// sending anything.
    ///
    /// # Errors
    ///
    /// Returns `MediaError` for constraint violations, transport failures,
    /// or host-reported errors.
    #[instrument(skip(self, bytes), fields(filename = %filename, size = bytes.len()))]
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
        folder: &str,
    ) -> Result<UploadedMedia, MediaError> {
        validate_upload(content_type, bytes.len())?;

        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign(&format!("folder={folder}&timestamp={timestamp}"));

        let part = Part::bytes(bytes)
            .file_name(filename.to_owned())
            .mime_str(content_type)
            .map_err(|e| MediaError::Request(e.to_string()))?;

        let form = Form::new()
            .part("file", part)
            .text("folder", folder.to_owned())
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature);

        let response = self
            .client
            .post(format!("{}/image/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        let result: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Response(e.to_string()))?;

        if let Some(error) = result.error {
            return Err(MediaError::Api(error));
        }

        match (result.url, result.public_id) {
            (Some(url), Some(public_id)) => {
                debug!(public_id = %public_id, "Image uploaded");
                Ok(UploadedMedia { url, public_id })
            }
            _ => Err(MediaError::Response(
                "upload response missing url or public_id".to_owned(),
            )),
        }
    }

    /// Delete an uploaded image by its `public_id`.
    ///
    /// # Errors
    ///
    /// Returns `MediaError` for transport failures or host-reported errors.
    #[instrument(skip(self))]
    pub async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign(&format!("public_id={public_id}&timestamp={timestamp}"));

        let response = self
            .client
            .post(format!("{}/image/destroy", self.base_url))
            .form(&[
                ("public_id", public_id),
                ("api_key", &self.api_key),
                ("timestamp", &timestamp.to_string()),
                ("signature", &signature),
            ])
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        let result: DeleteResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Response(e.to_string()))?;

        if let Some(error) = result.error {
            return Err(MediaError::Api(error));
        }
        match result.result.as_deref() {
            Some("ok" | "not found") => {
                debug!("Image deleted");
                Ok(())
            }
            other => Err(MediaError::Api(format!(
                "unexpected delete result: {}",
                other.unwrap_or("<missing>")
            ))),
        }
    }

    /// Hex-encoded SHA-256 digest over the sorted parameter string plus
    /// the API secret, as the host requires for authenticated requests.
    fn sign(&self, params: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(params.as_bytes());
        hasher.update(self.api_secret.expose_secret().as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> MediaClient {
        MediaClient::new(&MediaConfig {
            base_url: "https://media.example.test/v1/acme/".to_owned(),
            api_key: "key_1234".to_owned(),
            api_secret: SecretString::from("s3cr3t-t0ken-9f8e7d"),
            upload_folder: "tangelo".to_owned(),
        })
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client().base_url, "https://media.example.test/v1/acme");
    }

    #[test]
    fn test_signature_is_deterministic_and_secret_dependent() {
        let a = client().sign("public_id=x&timestamp=100");
        let b = client().sign("public_id=x&timestamp=100");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let c = client().sign("public_id=x&timestamp=101");
        assert_ne!(a, c);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let output = format!("{:?}", client());
        assert!(!output.contains("s3cr3t-t0ken-9f8e7d"));
        assert!(output.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_type_before_any_request() {
        // Points at a non-routable host: if validation didn't short-circuit,
        // this would fail with a transport error instead.
        let err = client()
            .upload(vec![0u8; 16], "doc.pdf", "application/pdf", "tangelo")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::UnsupportedType(_)));
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_before_any_request() {
        let err = client()
            .upload(
                vec![0u8; super::super::MAX_IMAGE_BYTES + 1],
                "big.png",
                "image/png",
                "tangelo",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::TooLarge { .. }));
    }
}
