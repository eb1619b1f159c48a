use crate::{ToolError, ToolOutput};
use serde_json::json;
use std::path::Path;
use tracing::info;

pub fn open_file(path: &Path) -> Result<ToolOutput, ToolError> {
    open::that(path)?;
    Ok(json!({ "opened": path }))
}

pub async fn rename_file(src: &Path, dst: &Path) -> Result<ToolOutput, ToolError> {
    tokio::fs::rename(src, dst).await?;
    Ok(json!({ "renamed": src, "to": dst }))
}

pub async fn move_file(src: &Path, dst: &Path) -> Result<ToolOutput, ToolError> {
    relocate(src, dst).await?;
    Ok(json!({ "moved": src, "to": dst }))
}

/// Soft delete: the file is moved into the trash directory under a
/// timestamped name, never removed from disk.
pub async fn delete_file(path: &Path, trash_dir: &Path) -> Result<ToolOutput, ToolError> {
    tokio::fs::create_dir_all(trash_dir).await?;

    let base = path
        .file_name()
        .ok_or_else(|| ToolError::Validation(format!("Not a deletable path: {}", path.display())))?
        .to_string_lossy()
        .to_string();
    let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
    let target = trash_dir.join(format!("{base}.{stamp}"));

    relocate(path, &target).await?;
    info!(path = %path.display(), trashed = %target.display(), "file moved to trash");
    Ok(json!({ "deleted": path, "trashed": target }))
}

pub async fn create_folder(path: &Path) -> Result<ToolOutput, ToolError> {
    tokio::fs::create_dir_all(path).await?;
    Ok(json!({ "created": path }))
}

/// Rename with a copy-and-remove fallback for cross-device moves.
async fn relocate(src: &Path, dst: &Path) -> Result<(), ToolError> {
    match tokio::fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(_) if src.is_file() => {
            tokio::fs::copy(src, dst).await?;
            tokio::fs::remove_file(src).await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn delete_moves_into_timestamped_trash() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("report.txt");
        tokio::fs::write(&file, "data").await.unwrap();
        let trash = temp.path().join(".trash");

        let output = delete_file(&file, &trash).await.unwrap();

        assert!(!file.exists());
        let trashed = output["trashed"].as_str().unwrap();
        assert!(trashed.starts_with(trash.to_str().unwrap()));
        assert!(trashed.contains("report.txt."));
        assert_eq!(
            tokio::fs::read_to_string(trashed).await.unwrap(),
            "data"
        );
    }

    #[tokio::test]
    async fn delete_of_root_like_path_is_rejected() {
        let temp = TempDir::new().unwrap();
        let result = delete_file(Path::new("/"), temp.path()).await;
        assert!(matches!(result, Err(ToolError::Validation(_))));
    }

    #[tokio::test]
    async fn rename_and_move_relocate_files() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        let b = temp.path().join("b.txt");
        tokio::fs::write(&a, "x").await.unwrap();

        rename_file(&a, &b).await.unwrap();
        assert!(b.exists() && !a.exists());

        let sub = temp.path().join("sub");
        create_folder(&sub).await.unwrap();
        move_file(&b, &sub.join("b.txt")).await.unwrap();
        assert!(sub.join("b.txt").exists());
    }

    #[tokio::test]
    async fn create_folder_is_recursive_and_idempotent() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("x").join("y");
        create_folder(&nested).await.unwrap();
        create_folder(&nested).await.unwrap();
        assert!(nested.is_dir());
    }
}
