use anyhow::Result;

use super::ContentPiece;
use super::StagedAttachment;
use super::ATTACHMENT_SIZE_LIMIT;

#[tokio::test]
async fn it_stages_a_file_at_the_size_ceiling() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("notes.txt");
    tokio::fs::write(&file_path, vec![b'a'; ATTACHMENT_SIZE_LIMIT as usize]).await?;

    let staged = StagedAttachment::from_path(&file_path).await?;
    assert_eq!(staged.name, "notes.txt");
    assert_eq!(staged.mime_type, "text/plain");
    return Ok(());
}

#[tokio::test]
async fn it_rejects_a_file_one_byte_over_the_ceiling() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("notes.txt");
    tokio::fs::write(&file_path, vec![b'a'; ATTACHMENT_SIZE_LIMIT as usize + 1]).await?;

    let res = StagedAttachment::from_path(&file_path).await;
    assert!(res.is_err());
    assert_eq!(
        res.unwrap_err().to_string(),
        "File size should not exceed 2MB."
    );
    return Ok(());
}

#[tokio::test]
async fn it_rejects_a_missing_file() {
    let res = StagedAttachment::from_path(std::path::Path::new("/definitely/not/here.txt")).await;
    assert!(res.is_err());
}

#[tokio::test]
async fn it_encodes_bytes_for_the_prompt() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("hello.md");
    tokio::fs::write(&file_path, "hello").await?;

    let staged = StagedAttachment::from_path(&file_path).await?;
    match staged.piece() {
        ContentPiece::InlineData { mime_type, data } => {
            assert_eq!(mime_type, "text/markdown");
            assert_eq!(data, "aGVsbG8=");
        }
        _ => panic!("expected an inline data piece"),
    }

    let tag = staged.tag();
    assert_eq!(tag.name, "hello.md");
    assert_eq!(tag.mime_type, "text/markdown");
    return Ok(());
}
