use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use access_core::DocumentHandle;

/// Extensions the document picker offers.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "txt"];

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("unsupported document '{path}' (use .pdf or .txt)")]
    Unsupported { path: PathBuf },
    #[error("failed to read '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Reads a PDF or plain-text document into a handle ready for upload.
pub fn load_document(path: &Path) -> Result<DocumentHandle, DocumentError> {
    let accepted = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        });
    let filename = path.file_name().and_then(|name| name.to_str());
    let (true, Some(filename)) = (accepted, filename) else {
        return Err(DocumentError::Unsupported {
            path: path.to_path_buf(),
        });
    };

    let content = fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DocumentHandle::new(filename, content))
}
