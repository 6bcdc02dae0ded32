#[cfg(test)]
#[path = "attachment_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tokio::fs;

use super::AttachmentTag;
use super::ContentPiece;

pub const ATTACHMENT_SIZE_LIMIT: u64 = 2 * 1024 * 1024;

/// A file staged for the next outgoing turn. Held in memory only; once the
/// turn is sent the bytes are dropped and the tag is all that remains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedAttachment {
    pub name: String,
    pub mime_type: String,
    data: String,
}

impl StagedAttachment {
    pub async fn from_path(file_path: &path::Path) -> Result<StagedAttachment> {
        let metadata = match fs::metadata(file_path).await {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::warn!(path = %file_path.display(), error = ?err, "unreadable attachment");
                bail!("Could not process the file. Please try another.");
            }
        };
        if !metadata.is_file() {
            bail!(format!("{} is not a file.", file_path.display()));
        }
        if metadata.len() > ATTACHMENT_SIZE_LIMIT {
            bail!("File size should not exceed 2MB.");
        }

        let name = file_path
            .file_name()
            .map(|e| return e.to_string_lossy().to_string())
            .unwrap_or_else(|| return file_path.display().to_string());

        let mime_type = mime_guess::from_path(file_path)
            .first_or_octet_stream()
            .to_string();

        let bytes = fs::read(file_path).await?;

        return Ok(StagedAttachment {
            name,
            mime_type,
            data: BASE64.encode(bytes),
        });
    }

    pub fn tag(&self) -> AttachmentTag {
        return AttachmentTag {
            name: self.name.to_string(),
            mime_type: self.mime_type.to_string(),
        };
    }

    pub fn piece(&self) -> ContentPiece {
        return ContentPiece::InlineData {
            mime_type: self.mime_type.to_string(),
            data: self.data.to_string(),
        };
    }
}
