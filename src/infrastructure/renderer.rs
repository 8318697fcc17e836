// src/infrastructure/renderer.rs
use crate::constants::BROWSER_LAUNCH_DELAY_MS;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempDir};
use tracing::{debug, instrument};

/// Writes rendered pages to a temporary directory and opens them in the browser
#[derive(Debug, Default)]
pub struct BrowserRenderer {
    // the page is deleted when this is dropped
    temp_dir: Option<TempDir>,
}

impl BrowserRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_page(&mut self, html: &str) -> Result<PathBuf> {
        let temp_dir = Builder::new()
            .prefix("notesapp-")
            .rand_bytes(5)
            .tempdir()
            .context("Failed to create temporary directory")?;

        let file_path = temp_dir.path().join("notes.html");

        File::create(&file_path)
            .with_context(|| format!("Failed to create page at {}", file_path.display()))?
            .write_all(html.as_bytes())
            .context("Failed to write page")?;

        debug!(?file_path, "Wrote page");
        self.temp_dir = Some(temp_dir);
        Ok(file_path)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn open_in_browser(&self, path: &Path) -> Result<()> {
        let path_str = path.to_str().context("Failed to convert path to string")?;

        #[cfg(target_os = "macos")]
        {
            std::process::Command::new("open")
                .arg(path_str)
                .spawn()
                .context("Failed to open browser")?;
        }
        #[cfg(target_os = "windows")]
        {
            std::process::Command::new("cmd")
                .args(["/C", "start", path_str])
                .spawn()
                .context("Failed to open browser")?;
        }
        #[cfg(target_os = "linux")]
        {
            std::process::Command::new("xdg-open")
                .arg(path_str)
                .spawn()
                .context("Failed to open browser")?;
        }

        // give the browser time to read the page before the temp dir goes away
        std::thread::sleep(std::time::Duration::from_millis(BROWSER_LAUNCH_DELAY_MS));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_html_when_writing_page_then_file_contains_it() {
        let mut renderer = BrowserRenderer::new();

        let path = renderer.write_page("<h1>Notes</h1>").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<h1>Notes</h1>");
    }

    #[test]
    fn given_second_page_when_writing_then_previous_page_is_removed() {
        let mut renderer = BrowserRenderer::new();
        let first = renderer.write_page("one").unwrap();

        let second = renderer.write_page("two").unwrap();

        assert!(!first.exists());
        assert!(second.exists());
    }
}
