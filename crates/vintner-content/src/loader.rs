//! Directory loading: one content item per markdown file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::markdown::render_markdown;
use crate::metadata::{extract_metadata, Metadata, MetadataError};

/// Files in the content directory must carry this extension.
pub const CONTENT_EXTENSION: &str = "md";

/// Metadata key that names a content item.
pub const TITLE_KEY: &str = "title";

/// One markdown source file with its parsed metadata and rendered fragment.
///
/// The identifier is the `title` metadata value; it names both the item's
/// template and its output page, so an item without one cannot bind.
#[derive(Debug, Clone)]
pub struct ContentItem {
    pub source_path: PathBuf,
    pub metadata: Metadata,
    pub identifier: String,
    pub fragment: String,
}

/// Errors that can occur while loading content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("all files in the content directory must be markdown, found {path}")]
    NotMarkdown { path: PathBuf },

    #[error("{path}: missing required `{TITLE_KEY}` metadata key")]
    MissingTitle { path: PathBuf },

    #[error("{path}: {source}")]
    Metadata {
        path: PathBuf,
        source: MetadataError,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Load every markdown file directly inside `dir`, in file-name order.
///
/// Any directory entry that is not a `.md` file fails the whole load.
/// Item-level faults (missing title, malformed metadata) are returned
/// per file so the caller can decide whether they abort the build.
pub fn load_dir(dir: &Path) -> Result<Vec<Result<ContentItem, ContentError>>, ContentError> {
    let entries = fs::read_dir(dir).map_err(|source| ContentError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ContentError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        paths.push(entry.path());
    }
    paths.sort();

    let mut results = Vec::new();
    for path in paths {
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(CONTENT_EXTENSION)
        {
            return Err(ContentError::NotMarkdown { path });
        }
        results.push(load_file(&path));
    }

    Ok(results)
}

/// Load a single content file.
pub fn load_file(path: &Path) -> Result<ContentItem, ContentError> {
    let source = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (metadata, body) = extract_metadata(&source).map_err(|source| ContentError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;

    let identifier = metadata
        .get(TITLE_KEY)
        .map(|title| title.trim().to_string())
        .unwrap_or_default();
    if identifier.is_empty() {
        return Err(ContentError::MissingTitle {
            path: path.to_path_buf(),
        });
    }

    let fragment = render_markdown(body);

    Ok(ContentItem {
        source_path: path.to_path_buf(),
        metadata,
        identifier,
        fragment,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn loads_items_in_file_name_order() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("b.md"),
            "---\ntitle: second\n---\ncontent b",
        )
        .unwrap();
        fs::write(temp.path().join("a.md"), "---\ntitle: first\n---\ncontent a").unwrap();

        let items: Vec<_> = load_dir(temp.path())
            .unwrap()
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].identifier, "first");
        assert_eq!(items[1].identifier, "second");
    }

    #[test]
    fn renders_body_to_fragment() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("index.md");
        fs::write(&path, "---\ntitle: index\n---\n# Hi\n").unwrap();

        let item = load_file(&path).unwrap();

        assert_eq!(item.identifier, "index");
        assert!(item.fragment.contains("<h1>Hi</h1>"));
        assert_eq!(item.metadata.get("title").map(String::as_str), Some("index"));
    }

    #[test]
    fn non_markdown_file_fails_the_load() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("page.md"), "---\ntitle: page\n---\nok").unwrap();
        fs::write(temp.path().join("notes.txt"), "not markdown").unwrap();

        let result = load_dir(temp.path());

        assert!(matches!(result, Err(ContentError::NotMarkdown { .. })));
    }

    #[test]
    fn subdirectory_fails_the_load() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("drafts")).unwrap();

        let result = load_dir(temp.path());

        assert!(matches!(result, Err(ContentError::NotMarkdown { .. })));
    }

    #[test]
    fn missing_title_is_a_per_file_fault() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("bad.md"), "no metadata at all").unwrap();
        fs::write(temp.path().join("good.md"), "---\ntitle: good\n---\nok").unwrap();

        let results = load_dir(temp.path()).unwrap();

        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[0],
            Err(ContentError::MissingTitle { .. })
        ));
        assert_eq!(results[1].as_ref().unwrap().identifier, "good");
    }

    #[test]
    fn blank_title_counts_as_missing() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("blank.md");
        fs::write(&path, "---\ntitle: \"  \"\n---\nbody").unwrap();

        let result = load_file(&path);

        assert!(matches!(result, Err(ContentError::MissingTitle { .. })));
    }

    #[test]
    fn empty_directory_loads_nothing() {
        let temp = tempdir().unwrap();

        let results = load_dir(temp.path()).unwrap();

        assert!(results.is_empty());
    }
}
