/*!
 * Common test utilities for the texbuild test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use texbuild::app_config::Config;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content, creating parent directories as needed
pub fn create_test_file(dir: &Path, relative_path: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(relative_path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a minimal LaTeX document declaring the given title
pub fn create_titled_tex(dir: &Path, relative_path: &str, title: &str) -> Result<PathBuf> {
    let content = format!(
        r"\documentclass{{article}}
\usepackage{{hyperref}}
\hypersetup{{
  pdfauthor={{Test Author}},
  pdftitle={{{}}},
}}
\begin{{document}}
Hello.
\end{{document}}
",
        title
    );
    create_test_file(dir, relative_path, &content)
}

/// Creates a LaTeX document without any pdftitle
pub fn create_untitled_tex(dir: &Path, relative_path: &str) -> Result<PathBuf> {
    let content = r"\documentclass{article}
\begin{document}
Draft.
\end{document}
";
    create_test_file(dir, relative_path, content)
}

/// Configuration rooted at a test project directory
pub fn test_config(project_dir: &Path) -> Config {
    Config {
        project_dir: project_dir.to_path_buf(),
        ..Config::default()
    }
}
