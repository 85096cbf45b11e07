use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::fs;
use tracing::info;

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replaces the command file at `path` with `text`.
///
/// The text is written to a sibling `.tmp` file first and renamed into place,
/// so a reader sees either the previous file or the complete new one.
pub async fn write_commands(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let staging = staging_path(path);
    fs::write(&staging, text)
        .await
        .with_context(|| format!("Failed to write {}", staging.display()))?;
    fs::rename(&staging, path)
        .await
        .with_context(|| format!("Failed to move commands into {}", path.display()))?;

    info!("Wrote {} command lines to {}", text.lines().count(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gridway-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_staging_path_is_a_sibling() {
        assert_eq!(
            staging_path(Path::new("out/commands.txt")),
            PathBuf::from("out/commands.txt.tmp")
        );
    }

    #[tokio::test]
    async fn test_write_creates_parent_and_replaces() {
        let dir = scratch_dir("output");
        let path = dir.join("nested").join("commands.txt");

        write_commands(&path, "CC,RED,(1 0 N),\n").await.unwrap();
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "CC,RED,(1 0 N),\n");

        write_commands(&path, "IR,90,clockwise,(1 0 E),\n").await.unwrap();
        assert_eq!(
            fs::read_to_string(&path).await.unwrap(),
            "IR,90,clockwise,(1 0 E),\n"
        );
        assert!(!staging_path(&path).exists());

        fs::remove_dir_all(&dir).await.unwrap();
    }
}
