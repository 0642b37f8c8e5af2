//! File ingestion: size ceiling, base64 encoding and preview classification.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::error::{VerifyError, VerifyResult};

/// Upload ceiling (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
const DATA_URL_MARKER: &str = ";base64,";

/// Where the selected file's bytes live.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A user-selected file, before it is read.
#[derive(Debug, Clone)]
pub struct FileHandle {
    name: String,
    mime_type: String,
    size: u64,
    source: FileSource,
}

impl FileHandle {
    /// Open a file on disk. Name and size are captured now; content is read on ingest.
    pub async fn open(path: impl AsRef<Path>) -> VerifyResult<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(VerifyError::Io {
                message: format!("{} is not a regular file", path.display()),
            });
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            mime_type: mime_from_name(&name).to_string(),
            name,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// In-memory file with a declared MIME type.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            source: FileSource::Bytes(bytes),
        }
    }

    /// Override the declared MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    async fn read(&self) -> VerifyResult<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => Ok(tokio::fs::read(path).await?),
            FileSource::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

/// How the staged file is previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// Rendered inline from the data URL.
    Image,
    /// Generic document icon.
    Icon,
}

/// A selected file, read and encoded, waiting to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    /// Base64 content without the data-URL prefix.
    pub encoded_payload: String,
    /// Full `data:` URL, used for image previews.
    pub data_url: String,
    pub preview: PreviewKind,
}

impl StagedFile {
    pub fn is_previewable_image(&self) -> bool {
        self.preview == PreviewKind::Image
    }
}

/// Reject files over the upload ceiling.
pub fn check_size(handle: &FileHandle) -> VerifyResult<()> {
    if handle.size > MAX_FILE_SIZE {
        return Err(VerifyError::file_too_large(handle.size));
    }
    Ok(())
}

/// Read and encode a file.
pub async fn ingest(handle: &FileHandle) -> VerifyResult<StagedFile> {
    check_size(handle)?;

    let bytes = handle.read().await?;
    let size = bytes.len() as u64;
    // The file may have grown between selection and read.
    if size > MAX_FILE_SIZE {
        return Err(VerifyError::file_too_large(size));
    }

    let mime_type = if handle.mime_type.is_empty() {
        DEFAULT_MIME_TYPE.to_string()
    } else {
        handle.mime_type.clone()
    };

    let encoded_payload = STANDARD.encode(&bytes);
    let data_url = data_url(&mime_type, &encoded_payload);

    let preview = if is_previewable_image(&mime_type) {
        PreviewKind::Image
    } else {
        PreviewKind::Icon
    };

    debug!(
        file = %handle.name,
        mime = %mime_type,
        size,
        preview = ?preview,
        "file ingested"
    );

    Ok(StagedFile {
        file_name: handle.name.clone(),
        mime_type,
        size,
        encoded_payload,
        data_url,
        preview,
    })
}

/// `image/*` renders inline, except HEIC/HEIF which most viewers cannot draw.
pub fn is_previewable_image(mime_type: &str) -> bool {
    let mime = mime_type.to_ascii_lowercase();
    mime.starts_with("image/") && !mime.contains("heic")
}

/// Build a `data:<mime>;base64,<payload>` URL.
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    data_url(mime_type, &STANDARD.encode(bytes))
}

fn data_url(mime_type: &str, encoded: &str) -> String {
    format!("data:{}{}{}", mime_type, DATA_URL_MARKER, encoded)
}

/// Strip the `data:<mime>;base64,` prefix, whatever the MIME type's length.
pub fn strip_data_url_prefix(data_url: &str) -> Option<&str> {
    let rest = data_url.strip_prefix("data:")?;
    rest.split_once(DATA_URL_MARKER).map(|(_, payload)| payload)
}

/// MIME type a browser would report for a file name.
pub fn mime_from_name(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "rtf" => "application/rtf",
        "txt" => "text/plain",
        _ => DEFAULT_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_classification() {
        assert!(is_previewable_image("image/png"));
        assert!(is_previewable_image("image/jpeg"));
        assert!(!is_previewable_image("image/heic"));
        assert!(!is_previewable_image("image/HEIC"));
        assert!(!is_previewable_image("image/heic-sequence"));
        assert!(!is_previewable_image("application/pdf"));
        assert!(!is_previewable_image(""));
    }

    #[test]
    fn test_strip_prefix_varies_with_mime() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,AAAA"), Some("AAAA"));
        assert_eq!(
            strip_data_url_prefix(
                "data:application/vnd.openxmlformats-officedocument.wordprocessingml.document;base64,QQ=="
            ),
            Some("QQ==")
        );
        assert_eq!(strip_data_url_prefix("data:;base64,"), Some(""));
        assert_eq!(strip_data_url_prefix("AAAA"), None);
        assert_eq!(strip_data_url_prefix("data:text/plain,hello"), None);
    }

    #[test]
    fn test_mime_from_name() {
        assert_eq!(mime_from_name("paystub.PDF"), "application/pdf");
        assert_eq!(mime_from_name("photo.jpeg"), "image/jpeg");
        assert_eq!(mime_from_name("IMG_0001.HEIC"), "image/heic");
        assert_eq!(mime_from_name("README"), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_check_size_boundary() {
        let at_limit = FileHandle::from_bytes("a.bin", "", vec![0; MAX_FILE_SIZE as usize]);
        assert!(check_size(&at_limit).is_ok());

        let over = FileHandle::from_bytes("b.bin", "", vec![0; MAX_FILE_SIZE as usize + 1]);
        match check_size(&over) {
            Err(VerifyError::FileTooLarge { size, limit }) => {
                assert_eq!(size, MAX_FILE_SIZE + 1);
                assert_eq!(limit, MAX_FILE_SIZE);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ingest_bytes() {
        let handle = FileHandle::from_bytes("pay,stub.png", "image/png", b"\x89PNG,\x00\xff".to_vec());
        let staged = ingest(&handle).await.unwrap();

        assert_eq!(staged.file_name, "pay,stub.png");
        assert_eq!(staged.mime_type, "image/png");
        assert_eq!(staged.size, 7);
        assert!(staged.is_previewable_image());
        assert!(staged.data_url.starts_with("data:image/png;base64,"));
        assert_eq!(
            strip_data_url_prefix(&staged.data_url),
            Some(staged.encoded_payload.as_str())
        );
        assert_eq!(
            STANDARD.decode(&staged.encoded_payload).unwrap(),
            b"\x89PNG,\x00\xff".to_vec()
        );
    }

    #[tokio::test]
    async fn test_ingest_empty_file_without_mime() {
        let handle = FileHandle::from_bytes("empty", "", Vec::new());
        let staged = ingest(&handle).await.unwrap();
        assert_eq!(staged.encoded_payload, "");
        assert_eq!(staged.mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(staged.preview, PreviewKind::Icon);
    }

    #[tokio::test]
    async fn test_open_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letter.pdf");
        tokio::fs::write(&path, b"%PDF-1.7").await.unwrap();

        let handle = FileHandle::open(&path).await.unwrap();
        assert_eq!(handle.name(), "letter.pdf");
        assert_eq!(handle.mime_type(), "application/pdf");
        assert_eq!(handle.size(), 8);

        let staged = ingest(&handle).await.unwrap();
        assert!(!staged.is_previewable_image());
        assert_eq!(STANDARD.decode(&staged.encoded_payload).unwrap(), b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_open_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileHandle::open(dir.path()).await;
        assert!(matches!(result, Err(VerifyError::Io { .. })));
    }

    proptest::proptest! {
        #[test]
        fn encoded_payload_decodes_to_original(
            bytes in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..2048),
            mime in proptest::sample::select(vec!["image/png", "application/pdf", "text/plain;charset=utf-8", ""]),
        ) {
            let data_url = encode_data_url(mime, &bytes);
            let payload = strip_data_url_prefix(&data_url).unwrap();
            proptest::prop_assert_eq!(STANDARD.decode(payload).unwrap(), bytes);
        }
    }
}
