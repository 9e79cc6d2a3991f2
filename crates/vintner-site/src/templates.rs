//! Named-template resolution and rendering.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment, UndefinedBehavior};

/// Template files must carry this extension.
pub const TEMPLATE_EXTENSION: &str = "html";

/// The variable namespace shared by every template during one build pass:
/// content identifier to rendered HTML fragment.
pub type RenderNamespace = BTreeMap<String, String>;

/// Errors that can occur while loading templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Every template from the template directory, loaded once per build pass.
///
/// Resolution is by file presence: a content item binds to the template
/// named `{identifier}.html`. Rendering compiles the template source on
/// demand so a malformed template fails only its own page.
pub struct TemplateStore {
    env: Environment<'static>,
    sources: BTreeMap<String, String>,
}

impl TemplateStore {
    /// Read every `.html` file directly inside the template directory.
    /// Other files are ignored.
    pub fn load(template_dir: &Path) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        // Namespace values are already rendered HTML fragments.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        // Referencing an identifier absent from the namespace is a render
        // error, not an empty substitution.
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        let entries = fs::read_dir(template_dir).map_err(|source| TemplateError::Read {
            path: template_dir.to_path_buf(),
            source,
        })?;

        let mut sources = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| TemplateError::Read {
                path: template_dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION)
            {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let source = fs::read_to_string(&path).map_err(|source| TemplateError::Read {
                path: path.clone(),
                source,
            })?;
            sources.insert(name.to_string(), source);
        }

        Ok(Self { env, sources })
    }

    /// Resolve the template bound to `identifier`, if one exists.
    pub fn resolve(&self, identifier: &str) -> Option<&str> {
        self.sources.get(&template_name(identifier)).map(String::as_str)
    }

    /// Number of loaded templates.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Render a template source against the shared namespace.
    pub fn render(
        &self,
        source: &str,
        namespace: &RenderNamespace,
    ) -> Result<String, minijinja::Error> {
        self.env.render_str(source, namespace)
    }
}

/// File name of the template bound to a content identifier.
pub fn template_name(identifier: &str) -> String {
    format!("{identifier}.{TEMPLATE_EXTENSION}")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn namespace(pairs: &[(&str, &str)]) -> RenderNamespace {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolves_templates_by_identifier() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("index.html"), "<div>{{index}}</div>").unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let store = TemplateStore::load(temp.path()).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.resolve("index").is_some());
        assert!(store.resolve("about").is_none());
    }

    #[test]
    fn substitutes_fragments_unescaped() {
        let temp = tempdir().unwrap();
        let store = TemplateStore::load(temp.path()).unwrap();

        let html = store
            .render(
                "<div>{{index}}</div>",
                &namespace(&[("index", "<h1>Hi</h1>")]),
            )
            .unwrap();

        assert_eq!(html, "<div><h1>Hi</h1></div>");
    }

    #[test]
    fn undefined_identifier_is_a_render_error() {
        let temp = tempdir().unwrap();
        let store = TemplateStore::load(temp.path()).unwrap();

        let result = store.render("<div>{{missing}}</div>", &namespace(&[]));

        assert!(result.is_err());
    }

    #[test]
    fn malformed_template_is_a_render_error() {
        let temp = tempdir().unwrap();
        let store = TemplateStore::load(temp.path()).unwrap();

        let result = store.render("{% broken", &namespace(&[("index", "x")]));

        assert!(result.is_err());
    }

    #[test]
    fn any_template_may_reference_any_identifier() {
        let temp = tempdir().unwrap();
        let store = TemplateStore::load(temp.path()).unwrap();

        let html = store
            .render(
                "{{header}} and {{footer}}",
                &namespace(&[("header", "<b>top</b>"), ("footer", "<i>bottom</i>")]),
            )
            .unwrap();

        assert_eq!(html, "<b>top</b> and <i>bottom</i>");
    }
}
