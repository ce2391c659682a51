use std::{collections::BTreeMap, fmt, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use zeroize::Zeroizing;

use crate::{
    entities::upload::{ResourceKind, StoreUpload, StoredAsset, StoredRendition},
    errors::StoreError,
    repositories::asset_store::AssetStore,
    settings::MediaConfig,
};

/// Signed-upload client for a Cloudinary-compatible media API.
pub struct CloudinaryStore {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: Zeroizing<String>,
    api_base_url: String,
    delivery_base_url: String,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    #[serde(default)]
    bytes: i64,
    duration: Option<f64>,
    #[serde(default)]
    eager: Vec<EagerResponse>,
}

#[derive(Debug, Deserialize)]
struct EagerResponse {
    secure_url: String,
    transformation: Option<String>,
    bytes: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl UploadResponse {
    fn into_asset(self) -> StoredAsset {
        StoredAsset {
            asset_id: self.public_id,
            url: self.secure_url,
            bytes: self.bytes,
            duration: self.duration,
            renditions: self
                .eager
                .into_iter()
                .map(|e| StoredRendition {
                    url: e.secure_url,
                    transformation: e.transformation,
                    bytes: e.bytes,
                })
                .collect(),
        }
    }
}

impl CloudinaryStore {
    pub fn new(config: &MediaConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(CloudinaryStore {
            client,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: Zeroizing::new(config.api_secret.clone()),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            delivery_base_url: config.delivery_base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.upstream_timeout_secs,
        })
    }

    fn upload_url(&self, kind: ResourceKind) -> String {
        format!("{}/{}/{}/upload", self.api_base_url, self.cloud_name, kind)
    }

    /// Parameters covered by the signature. `file`, `api_key` and the
    /// signature itself are never part of it.
    fn signed_params(upload: &StoreUpload, timestamp: i64) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        params.insert("timestamp", timestamp.to_string());
        if !upload.folder.is_empty() {
            params.insert("folder", upload.folder.clone());
        }
        if !upload.eager.is_empty() {
            params.insert("eager", upload.eager.join("|"));
        }
        if !upload.tags.is_empty() {
            params.insert("tags", upload.tags.join(","));
        }
        params
    }

    fn map_send_error(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout(self.timeout_secs)
        } else {
            StoreError::from(err)
        }
    }
}

/// SHA-1 hex digest of the sorted `key=value` pairs joined by `&`, with the
/// API secret appended.
pub fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Encodes each path segment of a public id, keeping folder separators.
fn encode_public_id(asset_id: &str) -> String {
    asset_id
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl AssetStore for CloudinaryStore {
    async fn upload(&self, upload: StoreUpload) -> Result<StoredAsset, StoreError> {
        let timestamp = Utc::now().timestamp();
        let params = Self::signed_params(&upload, timestamp);
        let signature = sign_params(&params, &self.api_secret);

        let file_name = upload
            .file_name
            .clone()
            .unwrap_or_else(|| format!("upload.{}", upload.kind.delivery_format()));
        let file_part = Part::bytes(upload.payload).file_name(file_name);

        let mut form = Form::new()
            .part("file", file_part)
            .text("api_key", self.api_key.clone())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key, value);
        }

        tracing::debug!(kind = %upload.kind, eager = upload.eager.len(), "Sending upload to media store");

        let response = self.client
            .post(self.upload_url(upload.kind))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
            };
            return Err(StoreError::Rejected { status: status.as_u16(), message });
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        Ok(body.into_asset())
    }

    fn delivery_url(&self, kind: ResourceKind, asset_id: &str) -> String {
        format!(
            "{}/{}/{}/upload/{}.{}",
            self.delivery_base_url,
            self.cloud_name,
            kind,
            encode_public_id(asset_id),
            kind.delivery_format()
        )
    }
}

impl fmt::Debug for CloudinaryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryStore")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CloudinaryStore {
        let config = MediaConfig {
            cloud_name: "demo".into(),
            api_key: "1234".into(),
            api_secret: "abcd".into(),
            ..MediaConfig::default()
        };
        CloudinaryStore::new(&config).unwrap()
    }

    fn upload() -> StoreUpload {
        StoreUpload {
            kind: ResourceKind::Image,
            payload: vec![1, 2, 3],
            file_name: Some("cat.png".into()),
            folder: "next-cloudinary-uploads".into(),
            tags: vec!["auto-delete-10min".into(), "social".into()],
            eager: vec!["c_fill,w_10".into(), "c_fill,w_20".into()],
        }
    }

    #[test]
    fn signature_is_sha1_hex_and_ignores_insertion_order() {
        let mut a = BTreeMap::new();
        a.insert("timestamp", "1315060510".to_string());
        a.insert("folder", "uploads".to_string());

        let mut b = BTreeMap::new();
        b.insert("folder", "uploads".to_string());
        b.insert("timestamp", "1315060510".to_string());

        let sig = sign_params(&a, "abcd");
        assert_eq!(sig.len(), 40);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(sig, sign_params(&b, "abcd"));
        assert_ne!(sig, sign_params(&a, "other-secret"));
    }

    #[test]
    fn signature_matches_manual_digest() {
        let mut params = BTreeMap::new();
        params.insert("timestamp", "100".to_string());
        params.insert("folder", "f".to_string());

        let mut hasher = Sha1::new();
        hasher.update(b"folder=f&timestamp=100secret");
        assert_eq!(sign_params(&params, "secret"), hex::encode(hasher.finalize()));
    }

    #[test]
    fn signed_params_join_eager_and_tags() {
        let params = CloudinaryStore::signed_params(&upload(), 42);
        assert_eq!(params["eager"], "c_fill,w_10|c_fill,w_20");
        assert_eq!(params["tags"], "auto-delete-10min,social");
        assert_eq!(params["timestamp"], "42");
        assert!(!params.contains_key("api_key"));
        assert!(!params.contains_key("file"));
    }

    #[test]
    fn signed_params_skip_empty_options() {
        let mut up = upload();
        up.tags.clear();
        up.eager.clear();
        let params = CloudinaryStore::signed_params(&up, 42);
        assert!(!params.contains_key("tags"));
        assert!(!params.contains_key("eager"));
    }

    #[test]
    fn delivery_url_is_derived_from_the_id() {
        let store = store();
        assert_eq!(
            store.delivery_url(ResourceKind::Video, "uploads/my clip"),
            "https://res.cloudinary.com/demo/video/upload/uploads/my%20clip.mp4"
        );
        assert_eq!(store.upload_url(ResourceKind::Image), "https://api.cloudinary.com/v1_1/demo/image/upload");
    }

    #[test]
    fn upload_response_keeps_eager_order() {
        let json = serde_json::json!({
            "public_id": "uploads/abc",
            "secure_url": "https://cdn/abc.mp4",
            "bytes": 2048,
            "duration": 12.5,
            "eager": [
                {"secure_url": "https://cdn/e1", "transformation": "c_fill,w_10", "bytes": 100},
                {"secure_url": "https://cdn/e2"}
            ]
        });
        let res: UploadResponse = serde_json::from_value(json).unwrap();
        let asset = res.into_asset();

        assert_eq!(asset.asset_id, "uploads/abc");
        assert_eq!(asset.duration, Some(12.5));
        assert_eq!(asset.renditions[0].url, "https://cdn/e1");
        assert_eq!(asset.renditions[0].bytes, Some(100));
        assert_eq!(asset.renditions[1].transformation, None);
    }

    #[test]
    fn debug_hides_credentials() {
        let rendered = format!("{:?}", store());
        assert!(!rendered.contains("abcd"));
    }
}
