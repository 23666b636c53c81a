use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;

pub const ENTITY_NAME: &str = "image";

static UNSAFE_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ ;:,/\\]").unwrap());

/// Blob storage keyed by generated file name.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn put(&self, name: &str, data: Bytes) -> Result<(), ServiceError>;

    /// `Ok(None)` when nothing is stored under `name`.
    async fn get(&self, name: &str) -> Result<Option<Bytes>, ServiceError>;

    /// Removing a missing blob is not an error.
    async fn delete(&self, name: &str) -> Result<(), ServiceError>;
}

/// Stores images as files under one directory.
#[derive(Debug, Clone)]
pub struct FileSystemImageStore {
    root: PathBuf,
}

impl FileSystemImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ImageStore for FileSystemImageStore {
    async fn put(&self, name: &str, data: Bytes) -> Result<(), ServiceError> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(name), &data).await?;
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Bytes>, ServiceError> {
        match tokio::fs::read(self.root.join(name)).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        match tokio::fs::remove_file(self.root.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(file = name, "Image already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Generated name of an upload: `dd-MM-yyyy_HH-mm-ss_<original>` with
/// separators and path characters replaced by `_`.
pub fn generated_name(original: &str, at: DateTime<Utc>) -> String {
    let raw = format!("{}_{}", at.format("%d-%m-%Y_%H-%M-%S"), original);
    UNSAFE_NAME_CHARS.replace_all(&raw, "_").into_owned()
}

/// Rejects names that could escape the storage directory.
pub fn validate_name(name: &str) -> Result<(), ServiceError> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(ServiceError::bad_request_alert(
            format!("Invalid file name '{}'", name),
            ENTITY_NAME,
            "invalidfilename",
        ));
    }
    Ok(())
}

/// Content type served for a stored image, by extension.
pub fn content_type(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[derive(Clone)]
pub struct ImageService {
    store: Arc<dyn ImageStore>,
    public_prefix: String,
}

impl ImageService {
    pub fn new(store: Arc<dyn ImageStore>, public_prefix: impl Into<String>) -> Self {
        Self {
            store,
            public_prefix: public_prefix.into(),
        }
    }

    /// Stores the upload and returns its public URL path.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload(&self, original_name: &str, data: Bytes) -> Result<String, ServiceError> {
        let name = generated_name(original_name, Utc::now());
        self.store.put(&name, data).await?;
        info!(file = %name, "Stored image");
        Ok(format!("{}{}", self.public_prefix, name))
    }

    #[instrument(skip(self))]
    pub async fn load(&self, name: &str) -> Result<Bytes, ServiceError> {
        validate_name(name)?;
        self.store
            .get(name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Image {} not found", name)))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        validate_name(name)?;
        self.store.delete(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn generated_names_carry_timestamp_and_sanitized_original() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(
            generated_name("lab photo;v2:final,1.png", at),
            "05-03-2024_14-07-09_lab_photo_v2_final_1.png"
        );
        assert_eq!(generated_name("a/b\\c.jpg", at), "05-03-2024_14-07-09_a_b_c.jpg");
    }

    #[rstest]
    #[case("logo.svg", "image/svg+xml")]
    #[case("photo.PNG", "image/png")]
    #[case("photo.jpeg", "image/jpeg")]
    #[case("photo.jpg", "image/jpeg")]
    #[case("notes.txt", "application/octet-stream")]
    #[case("README", "application/octet-stream")]
    fn content_type_by_extension(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(content_type(name), expected);
    }

    #[rstest]
    #[case("../secret")]
    #[case("a/b.png")]
    #[case("a\\b.png")]
    #[case("")]
    fn traversal_names_are_rejected(#[case] name: &str) {
        assert_matches!(
            validate_name(name),
            Err(ServiceError::BadRequestAlert { error_key, .. }) if error_key == "invalidfilename"
        );
    }

    #[tokio::test]
    async fn file_store_round_trip_and_idempotent_delete() {
        let dir = tempfile::tempdir().unwrap();
        let service = ImageService::new(
            Arc::new(FileSystemImageStore::new(dir.path().join("upload"))),
            "/api/public-images/",
        );

        let url = service
            .upload("cell.png", Bytes::from_static(b"\x89PNG"))
            .await
            .unwrap();
        let name = url.strip_prefix("/api/public-images/").unwrap();
        assert!(name.ends_with("_cell.png"));

        assert_eq!(service.load(name).await.unwrap(), Bytes::from_static(b"\x89PNG"));
        service.delete(name).await.unwrap();
        service.delete(name).await.unwrap();
        assert_matches!(service.load(name).await, Err(ServiceError::NotFound(_)));
    }
}
