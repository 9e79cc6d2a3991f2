//! Project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use vintner_site::{CONTENT_DIR, STATIC_DIR, TEMPLATE_DIR};

/// Create the conventional source directories with a minimal example site.
/// Existing source directories are wiped and recreated.
pub fn run() -> Result<()> {
    for dir in [CONTENT_DIR, STATIC_DIR, TEMPLATE_DIR] {
        reset_dir(Path::new(dir))?;
    }

    let index_page = Path::new(CONTENT_DIR).join("index.md");
    fs::write(&index_page, EXAMPLE_PAGE)
        .with_context(|| format!("failed to write {}", index_page.display()))?;
    tracing::info!("created {}", index_page.display());

    let index_template = Path::new(TEMPLATE_DIR).join("index.html");
    fs::write(&index_template, EXAMPLE_TEMPLATE)
        .with_context(|| format!("failed to write {}", index_template.display()))?;
    tracing::info!("created {}", index_template.display());

    for (name, contents) in [("main.js", EXAMPLE_SCRIPT), ("style.css", EXAMPLE_STYLE)] {
        let path = Path::new(STATIC_DIR).join(name);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("created {}", path.display());
    }

    tracing::info!("initialized; run `vintner develop` to start the dev server");

    Ok(())
}

fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .with_context(|| format!("failed to clear {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))
}

const EXAMPLE_PAGE: &str = r#"---
title: index
---

# Hello World

Welcome to your new site. Edit `pages/index.md` and the dev server will
rebuild on save.
"#;

const EXAMPLE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>vintner site</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  <div>{{index}}</div>
  <script src="/main.js"></script>
</body>
</html>
"#;

const EXAMPLE_SCRIPT: &str = "console.log(\"hello from vintner\");\n";

const EXAMPLE_STYLE: &str =
    "body { font-family: system-ui, sans-serif; max-width: 640px; margin: 2rem auto; }\n";
