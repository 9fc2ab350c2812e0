use std::path::{Path, PathBuf};

use eyre::Result;

use crate::source_path;

/// A generated compilation unit for one top-level class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    class_name: String,
    content: String,
}

impl SourceFile {
    /// Create a source file for the given qualified class name
    pub fn new(class_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            content: content.into(),
        }
    }

    /// Qualified name of the class this file declares
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The file content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Path relative to a source root (package directories + `<Simple>.java`)
    pub fn relative_path(&self) -> PathBuf {
        source_path(&self.class_name)
    }

    /// Write the file under `base`, skipping the write when the content on disk
    /// is already identical
    pub fn write(&self, base: &Path) -> Result<WriteResult> {
        let path = base.join(self.relative_path());
        if let Ok(existing) = std::fs::read_to_string(&path)
            && existing == self.content
        {
            return Ok(WriteResult::Unchanged);
        }
        write_file(&path, &self.content)?;
        Ok(WriteResult::Written)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File already had the same content
    Unchanged,
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("c").join("Test.java");

        write_file(&path, "nested").unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "nested");
    }

    #[test]
    fn test_write_uses_package_dirs() {
        let temp = TempDir::new().unwrap();
        let file = SourceFile::new("me.builder.ThingBuilder", "class ThingBuilder {}");

        let result = file.write(temp.path()).unwrap();

        assert_eq!(result, WriteResult::Written);
        let path = temp.path().join("me").join("builder").join("ThingBuilder.java");
        assert_eq!(fs::read_to_string(path).unwrap(), "class ThingBuilder {}");
    }

    #[test]
    fn test_write_unchanged_content_is_skipped() {
        let temp = TempDir::new().unwrap();
        let file = SourceFile::new("me.Thing", "same");

        assert_eq!(file.write(temp.path()).unwrap(), WriteResult::Written);
        assert_eq!(file.write(temp.path()).unwrap(), WriteResult::Unchanged);
    }

    #[test]
    fn test_write_overwrites_changed_content() {
        let temp = TempDir::new().unwrap();
        SourceFile::new("me.Thing", "first").write(temp.path()).unwrap();

        let result = SourceFile::new("me.Thing", "second")
            .write(temp.path())
            .unwrap();

        assert_eq!(result, WriteResult::Written);
        let path = temp.path().join("me").join("Thing.java");
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }
}
