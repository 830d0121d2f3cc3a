use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::data::loader::FileKind;

/// Largest upload accepted by any panel, in decoded bytes.
pub const MAX_PAYLOAD_BYTES: usize = 750_000;

#[derive(thiserror::Error, Debug)]
pub enum PayloadError {
    #[error("not a base64 data URI")]
    NotDataUri,
    #[error("invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("upload is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),
}

/// An uploaded file held entirely in memory.
#[derive(Debug, Clone)]
pub struct Payload {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub mime: Option<String>,
}

impl Payload {
    pub fn from_bytes(bytes: Vec<u8>, file_name: Option<String>) -> Result<Self, PayloadError> {
        check_size(bytes.len())?;
        Ok(Self { bytes, file_name, mime: None })
    }

    /// Read a file from disk into memory.
    pub fn from_path(path: &Path) -> Result<Self, PayloadError> {
        let size = std::fs::metadata(path)?.len() as usize;
        check_size(size)?;
        let bytes = std::fs::read(path)?;
        let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        Self::from_bytes(bytes, file_name)
    }

    /// Decode a `data:<mime>;base64,<content>` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self, PayloadError> {
        let (header, content) = uri.trim().split_once(',').ok_or(PayloadError::NotDataUri)?;
        let mime = header
            .strip_prefix("data:")
            .and_then(|h| h.strip_suffix(";base64"))
            .ok_or(PayloadError::NotDataUri)?;

        let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        // Reject before decoding: base64 expands by 4/3.
        check_size(compact.len() / 4 * 3)?;
        let bytes = STANDARD.decode(compact.as_bytes())?;
        check_size(bytes.len())?;

        let mime = (!mime.is_empty()).then(|| mime.to_string());
        Ok(Self { bytes, file_name: None, mime })
    }

    /// Best guess of the file kind from the MIME type, then the file name.
    pub fn suggested_kind(&self) -> Option<FileKind> {
        self.mime
            .as_deref()
            .and_then(FileKind::from_mime)
            .or_else(|| {
                let name = self.file_name.as_deref()?;
                let ext = Path::new(name).extension()?.to_str()?;
                FileKind::from_extension(ext)
            })
    }
}

fn check_size(size: usize) -> Result<(), PayloadError> {
    if size > MAX_PAYLOAD_BYTES {
        Err(PayloadError::TooLarge { size, limit: MAX_PAYLOAD_BYTES })
    } else {
        Ok(())
    }
}
