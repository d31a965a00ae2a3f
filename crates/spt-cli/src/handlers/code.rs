//! Commands that send code: `eval`, `eval-stdin`, `eval-file` and `run-file`.

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tokio::io::AsyncReadExt;

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn eval(ctx: &CliContext, code: &str) -> Result<i32, CliError> {
    ctx.control().run_code(code).await?;
    Ok(0)
}

pub async fn eval_stdin(ctx: &CliContext) -> Result<i32, CliError> {
    let mut code = String::new();
    tokio::io::stdin()
        .read_to_string(&mut code)
        .await
        .context("Failed to read code from stdin")
        .map_err(CliError::Input)?;
    eval(ctx, &code).await
}

pub async fn eval_file(ctx: &CliContext, path: &Path) -> Result<i32, CliError> {
    let code = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
        .map_err(CliError::Input)?;
    eval(ctx, &code).await
}

/// Ask the server to load the file itself, which avoids packet size limits.
pub async fn run_file(ctx: &CliContext, path: &Path) -> Result<i32, CliError> {
    let absolute = absolute_existing(path).map_err(CliError::Input)?;
    eval(ctx, &run_file_statement(&absolute)).await
}

fn absolute_existing(path: &Path) -> anyhow::Result<PathBuf> {
    if !path.exists() {
        return Err(anyhow!("Path '{}' does not exist", path.display()));
    }
    std::path::absolute(path).with_context(|| format!("Failed to resolve {}", path.display()))
}

/// `run_file "<path>"` with backslashes and quotes escaped.
pub fn run_file_statement(path: &Path) -> String {
    let escaped = path
        .to_string_lossy()
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    format!("run_file \"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_file_statement_escapes() {
        assert_eq!(
            run_file_statement(Path::new("/music/song.rb")),
            "run_file \"/music/song.rb\""
        );
        assert_eq!(
            run_file_statement(Path::new(r#"C:\songs\"live".rb"#)),
            r#"run_file "C:\\songs\\\"live\".rb""#
        );
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = absolute_existing(&dir.path().join("nope.rb")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn relative_paths_become_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("song.rb");
        std::fs::write(&file, "play 60").unwrap();
        let resolved = absolute_existing(&file).unwrap();
        assert!(resolved.is_absolute());
    }
}
