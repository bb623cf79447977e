//! Event banner storage
//!
//! Uploaded banners are written under `<base>/img/` and referenced from the
//! event row by the relative path `img/<name>`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Folder under the base path holding banner files
pub const BANNER_DIR: &str = "img";

/// Accepted image extensions, compared case-insensitively
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// A banner file as received from the client
#[derive(Debug, Clone, Default)]
pub struct BannerUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl BannerUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// A file input left empty still submits a part; treat it as no upload
    pub fn is_empty(&self) -> bool {
        self.filename.trim().is_empty() || self.bytes.is_empty()
    }
}

/// Where uploaded banners are kept
pub trait BannerStore: Send + Sync {
    /// Persist an upload and return the reference stored on the event
    fn save(&self, upload: &BannerUpload) -> Result<String>;

    /// Delete a banner written by `save`. A missing file is not an error.
    fn remove(&self, reference: &str) -> Result<()>;
}

/// Check the extension of an uploaded file name
pub fn has_allowed_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Reduce a client-supplied name to a safe single path component.
///
/// Directory parts are dropped and anything outside `[A-Za-z0-9._-]` becomes
/// `_`. Leading dots are stripped so the result is never hidden.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    cleaned.trim_start_matches('.').to_string()
}

/// Pick the banner for an event form submission.
///
/// An upload wins over a URL. With neither, `current` is kept, which is
/// `None` on create.
pub fn resolve_banner(
    store: &dyn BannerStore,
    upload: Option<&BannerUpload>,
    url: Option<String>,
    current: Option<String>,
) -> Result<Option<String>> {
    if let Some(upload) = upload.filter(|u| !u.is_empty()) {
        return store.save(upload).map(Some);
    }
    if url.is_some() {
        return Ok(url);
    }
    Ok(current)
}

/// Banner store on the local filesystem
pub struct DiskBannerStore {
    base_path: PathBuf,
}

impl DiskBannerStore {
    /// Create with a base path; the `img` folder is created eagerly
    pub fn with_base_path(base_path: PathBuf) -> Result<Self> {
        fs::create_dir_all(base_path.join(BANNER_DIR))?;
        Ok(Self { base_path })
    }

    /// Folder that the `img/...` references resolve against
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Absolute location of a stored reference
    pub fn path_of(&self, reference: &str) -> PathBuf {
        self.base_path.join(reference)
    }
}

impl BannerStore for DiskBannerStore {
    #[instrument(skip(self, upload), fields(filename = %upload.filename, size = upload.bytes.len()))]
    fn save(&self, upload: &BannerUpload) -> Result<String> {
        if !has_allowed_extension(&upload.filename) {
            return Err(Error::invalid("banner_upload", "images only (jpg, jpeg, png)"));
        }

        let safe = sanitize_filename(&upload.filename);
        // Prefix keeps two uploads with the same name apart
        let name = format!("{}_{}", Uuid::new_v4().simple(), safe);
        let reference = format!("{}/{}", BANNER_DIR, name);

        fs::write(self.path_of(&reference), &upload.bytes)?;
        debug!(reference = %reference, "Stored banner");

        Ok(reference)
    }

    #[instrument(skip(self))]
    fn remove(&self, reference: &str) -> Result<()> {
        // Only files this store wrote
        let Some(name) = reference.strip_prefix(BANNER_DIR).and_then(|r| r.strip_prefix('/')) else {
            return Ok(());
        };
        if name.is_empty() || name != sanitize_filename(name) {
            return Ok(());
        }

        match fs::remove_file(self.base_path.join(BANNER_DIR).join(name)) {
            Ok(()) => {
                debug!("Removed banner");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_allowed_extensions() {
        assert!(has_allowed_extension("banner.png"));
        assert!(has_allowed_extension("BANNER.JPG"));
        assert!(has_allowed_extension("photo.Jpeg"));
        assert!(!has_allowed_extension("banner.gif"));
        assert!(!has_allowed_extension("banner"));
        assert!(!has_allowed_extension("png"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize_filename("C:\\Users\\me\\my banner.jpg"), "my_banner.jpg");
        assert_eq!(sanitize_filename(".hidden.png"), "hidden.png");
        assert_eq!(sanitize_filename("cup-2025_final.PNG"), "cup-2025_final.PNG");
    }

    #[test]
    fn test_save_writes_under_img() {
        let dir = tempdir().unwrap();
        let store = DiskBannerStore::with_base_path(dir.path().to_path_buf()).unwrap();

        let reference = store
            .save(&BannerUpload::new("../cup banner.PNG", vec![1, 2, 3]))
            .unwrap();

        assert!(reference.starts_with("img/"));
        assert!(reference.ends_with("_cup_banner.PNG"));
        assert_eq!(fs::read(store.path_of(&reference)).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_save_rejects_other_types() {
        let dir = tempdir().unwrap();
        let store = DiskBannerStore::with_base_path(dir.path().to_path_buf()).unwrap();

        let err = store
            .save(&BannerUpload::new("script.svg", vec![1]))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ref e) if e.has_field("banner_upload")));
        assert_eq!(fs::read_dir(dir.path().join(BANNER_DIR)).unwrap().count(), 0);
    }

    #[test]
    fn test_remove_only_touches_stored_banners() {
        let dir = tempdir().unwrap();
        let store = DiskBannerStore::with_base_path(dir.path().to_path_buf()).unwrap();
        let outside = dir.path().join("keep.png");
        fs::write(&outside, [1]).unwrap();

        let reference = store.save(&BannerUpload::new("cup.png", vec![1])).unwrap();
        store.remove(&reference).unwrap();
        assert!(!store.path_of(&reference).exists());

        // Already gone, a URL, and a path escaping the folder are all no-ops
        store.remove(&reference).unwrap();
        store.remove("https://cdn.example.com/cup.png").unwrap();
        store.remove("img/../keep.png").unwrap();
        assert!(outside.exists());
    }

    #[test]
    fn test_resolve_precedence() {
        let dir = tempdir().unwrap();
        let store = DiskBannerStore::with_base_path(dir.path().to_path_buf()).unwrap();
        let url = Some("https://cdn.example.com/cup.png".to_string());
        let current = Some("img/old.png".to_string());

        let upload = BannerUpload::new("new.png", vec![9]);
        let chosen = resolve_banner(&store, Some(&upload), url.clone(), current.clone()).unwrap();
        assert!(chosen.unwrap().starts_with("img/"));

        let chosen = resolve_banner(&store, None, url.clone(), current.clone()).unwrap();
        assert_eq!(chosen, url);

        let empty = BannerUpload::new("", Vec::new());
        let chosen = resolve_banner(&store, Some(&empty), None, current.clone()).unwrap();
        assert_eq!(chosen, current);

        assert_eq!(resolve_banner(&store, None, None, None).unwrap(), None);
    }
}
