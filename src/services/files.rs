//! Project file tools.
//!
//! Relative paths resolve against the workspace root, like the project paths
//! of the sync tools. Absolute paths and `..` are used as given, so nothing
//! stops a caller from leaving the workspace. The tools exist for an agent
//! that is trusted with the file system.

use crate::error::{FileError, FileResult};
use std::path::{Path, PathBuf};

/// Create/read/list/update helpers rooted at the workspace
#[derive(Debug, Clone)]
pub struct FileTools {
    root: PathBuf,
}

fn required<'a>(value: &'a str, what: &'static str) -> FileResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FileError::EmptyPath(what));
    }
    Ok(trimmed)
}

impl FileTools {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, value: &str, what: &'static str) -> FileResult<PathBuf> {
        Ok(self.root.join(required(value, what)?))
    }

    /// Create `file_name` inside `directory`, creating missing parents.
    /// Existing files are left untouched.
    pub async fn new_file(
        &self,
        directory: &str,
        file_name: &str,
        content: &str,
    ) -> FileResult<String> {
        let directory = self.resolve(directory, "File path")?;
        let path = directory.join(required(file_name, "File name")?);

        if tokio::fs::symlink_metadata(&path).await.is_ok() {
            return Err(FileError::AlreadyExists(path));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FileError::io(parent, e))?;
        }

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| FileError::io(&path, e))?;

        tracing::info!("Created file: {:?}", path);
        Ok(format!("Successfully created file: {}", path.display()))
    }

    /// UTF-8 content of a regular file
    pub async fn read_file(&self, file_path: &str) -> FileResult<String> {
        let path = self.resolve(file_path, "File path")?;
        ensure_file(&path).await?;

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| FileError::io(&path, e))?;

        tracing::info!("Read file: {:?}", path);
        Ok(content)
    }

    /// Entries of a directory as sorted `[DIR] name` / `[FILE] name` lines
    pub async fn list_files(&self, directory_path: &str) -> FileResult<Vec<String>> {
        let path = self.resolve(directory_path, "Directory path")?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| FileError::io(&path, e))?;
        if !metadata.is_dir() {
            return Err(FileError::NotADirectory(path));
        }

        let mut entries = tokio::fs::read_dir(&path)
            .await
            .map_err(|e| FileError::io(&path, e))?;
        let mut items = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FileError::io(&path, e))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            // Follows symlinks, so a link to a directory lists as [DIR].
            let is_dir = tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            items.push(if is_dir {
                format!("[DIR] {}", name)
            } else {
                format!("[FILE] {}", name)
            });
        }
        items.sort();

        tracing::info!("Listed directory: {:?} ({} entries)", path, items.len());
        Ok(items)
    }

    /// Overwrite an existing regular file
    pub async fn update_file(&self, file_path: &str, new_content: &str) -> FileResult<String> {
        let path = self.resolve(file_path, "File path")?;
        ensure_file(&path).await?;

        tokio::fs::write(&path, new_content)
            .await
            .map_err(|e| FileError::io(&path, e))?;

        tracing::info!("Updated file: {:?}", path);
        Ok(format!("Successfully updated file: {}", path.display()))
    }
}

async fn ensure_file(path: &Path) -> FileResult<()> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| FileError::io(path, e))?;
    if !metadata.is_file() {
        return Err(FileError::NotAFile(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    fn tools(temp: &TempDir) -> FileTools {
        FileTools::new(temp.path())
    }

    fn dir_str(temp: &TempDir) -> String {
        temp.path().to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_new_file_creates_parents() {
        let temp = TempDir::new().unwrap();
        let directory = temp.path().join("src").join("components");

        let message = assert_ok!(
            tools(&temp)
                .new_file(directory.to_str().unwrap(), "Header.jsx", "export {}")
                .await
        );

        assert!(message.starts_with("Successfully created file"));
        assert_eq!(
            std::fs::read_to_string(directory.join("Header.jsx")).unwrap(),
            "export {}"
        );
    }

    #[tokio::test]
    async fn test_new_file_refuses_existing() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.txt"), "keep").unwrap();

        let err = tools(&temp)
            .new_file(&dir_str(&temp), "a.txt", "overwrite")
            .await
            .unwrap_err();

        assert!(matches!(err, FileError::AlreadyExists(_)));
        assert_eq!(std::fs::read_to_string(temp.path().join("a.txt")).unwrap(), "keep");
    }

    #[tokio::test]
    async fn test_relative_paths_resolve_under_root() {
        let temp = TempDir::new().unwrap();
        let tools = tools(&temp);

        assert_ok!(tools.new_file("demo-site/src", "App.jsx", "v1").await);
        assert_eq!(
            std::fs::read_to_string(temp.path().join("demo-site/src/App.jsx")).unwrap(),
            "v1"
        );

        assert_ok!(tools.update_file("demo-site/src/App.jsx", "v2").await);
        assert_eq!(tools.read_file(" demo-site/src/App.jsx ").await.unwrap(), "v2");
        assert_eq!(
            tools.list_files("demo-site").await.unwrap(),
            vec!["[DIR] src".to_string()]
        );
    }

    #[tokio::test]
    async fn test_read_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test_read.txt");
        std::fs::write(&path, "Test content for reading").unwrap();

        let content = tools(&temp)
            .read_file(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(content, "Test content for reading");
    }

    #[tokio::test]
    async fn test_read_errors() {
        let temp = TempDir::new().unwrap();
        let tools = tools(&temp);

        let missing = temp.path().join("nope.txt");
        let err = tools.read_file(missing.to_str().unwrap()).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let err = tools.read_file(&dir_str(&temp)).await.unwrap_err();
        assert!(matches!(err, FileError::NotAFile(_)));

        let err = tools.read_file("   ").await.unwrap_err();
        assert_eq!(err.to_string(), "File path is required and cannot be empty.");

        let binary = temp.path().join("blob.bin");
        std::fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();
        let err = tools.read_file(binary.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, FileError::NotUtf8(_)));
    }

    #[tokio::test]
    async fn test_list_files_sorted() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("test.txt"), "test").unwrap();
        std::fs::write(temp.path().join("README.md"), "# hi").unwrap();
        std::fs::create_dir(temp.path().join("test_dir")).unwrap();
        std::fs::create_dir(temp.path().join("assets")).unwrap();

        let items = tools(&temp).list_files(&dir_str(&temp)).await.unwrap();

        insta::assert_snapshot!(items.join("\n"), @r###"
        [DIR] assets
        [DIR] test_dir
        [FILE] README.md
        [FILE] test.txt
        "###);
    }

    #[tokio::test]
    async fn test_list_files_on_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("x.txt");
        std::fs::write(&path, "").unwrap();

        let err = tools(&temp)
            .list_files(path.to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::NotADirectory(_)));
    }

    #[tokio::test]
    async fn test_update_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test_update.txt");
        std::fs::write(&path, "Original content").unwrap();

        let message = tools(&temp)
            .update_file(path.to_str().unwrap(), "Updated content")
            .await
            .unwrap();

        assert!(message.contains("Successfully updated file"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Updated content");
    }

    #[tokio::test]
    async fn test_update_missing_file_does_not_create() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ghost.txt");

        let err = tools(&temp)
            .update_file(path.to_str().unwrap(), "boo")
            .await
            .unwrap_err();

        assert!(matches!(err, FileError::NotFound(_)));
        assert!(!path.exists());
    }
}
