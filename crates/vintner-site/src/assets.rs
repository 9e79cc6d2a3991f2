//! Output-tree preparation and static asset copying.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Errors that can occur while preparing the output tree.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to reset output directory {path}: {source}")]
    Reset {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to copy {path}: {source}")]
    Copy {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Remove and recreate the output directory.
///
/// The output tree is regenerated whole on every build; stale pages from
/// earlier builds never survive.
pub fn reset_output_dir(output_dir: &Path) -> Result<(), AssetError> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir).map_err(|source| AssetError::Reset {
            path: output_dir.to_path_buf(),
            source,
        })?;
    }
    fs::create_dir_all(output_dir).map_err(|source| AssetError::Reset {
        path: output_dir.to_path_buf(),
        source,
    })
}

/// Copy every file under the static directory into the output directory,
/// preserving relative structure. Returns the number of files copied.
pub fn copy_static(static_dir: &Path, output_dir: &Path) -> Result<usize, AssetError> {
    let mut copied = 0;

    for entry in WalkDir::new(static_dir).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| static_dir.to_path_buf());
            AssetError::Copy {
                path,
                source: e.into(),
            }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(static_dir).unwrap_or(path);
        let destination = output_dir.join(relative);

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|source| AssetError::Copy {
                path: destination.clone(),
                source,
            })?;
        }
        fs::copy(path, &destination).map_err(|source| AssetError::Copy {
            path: path.to_path_buf(),
            source,
        })?;
        copied += 1;
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn reset_wipes_previous_contents() {
        let temp = tempdir().unwrap();
        let output = temp.path().join("public");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("stale.html"), "old").unwrap();

        reset_output_dir(&output).unwrap();

        assert!(output.exists());
        assert!(!output.join("stale.html").exists());
    }

    #[test]
    fn reset_creates_missing_directory() {
        let temp = tempdir().unwrap();
        let output = temp.path().join("public");

        reset_output_dir(&output).unwrap();

        assert!(output.is_dir());
    }

    #[test]
    fn copies_files_preserving_structure() {
        let temp = tempdir().unwrap();
        let static_dir = temp.path().join("static");
        let output = temp.path().join("public");
        fs::create_dir_all(static_dir.join("css")).unwrap();
        fs::write(static_dir.join("main.js"), "js").unwrap();
        fs::write(static_dir.join("css").join("style.css"), "css").unwrap();
        fs::create_dir_all(&output).unwrap();

        let copied = copy_static(&static_dir, &output).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(output.join("main.js")).unwrap(), "js");
        assert_eq!(
            fs::read_to_string(output.join("css").join("style.css")).unwrap(),
            "css"
        );
    }

    #[test]
    fn copies_bytes_verbatim() {
        let temp = tempdir().unwrap();
        let static_dir = temp.path().join("static");
        let output = temp.path().join("public");
        fs::create_dir_all(&static_dir).unwrap();
        fs::create_dir_all(&output).unwrap();
        let bytes: Vec<u8> = (0u8..=255).collect();
        fs::write(static_dir.join("blob.bin"), &bytes).unwrap();

        copy_static(&static_dir, &output).unwrap();

        assert_eq!(fs::read(output.join("blob.bin")).unwrap(), bytes);
    }
}
