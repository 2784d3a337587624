use super::types::{Gradebook, STATE_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Fixed key the category list is stored under
pub const STORAGE_KEY: &str = "gradebook-data";

/// Get the default state file path (~/.config/gradebook/gradebook-data.json)
pub fn get_storage_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join(format!("{}.json", STORAGE_KEY)))
}

/// Load the gradebook from a JSON file
///
/// If the file doesn't exist, returns a new empty gradebook.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_gradebook(path: &Path) -> Result<Gradebook> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no state file, starting empty");
        return Ok(Gradebook::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open state file at {}", path.display()))?;

    let book: Gradebook = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load gradebook from {}", path.display()))?;

    if book.version != STATE_VERSION {
        anyhow::bail!("Unsupported gradebook state version: {}", book.version);
    }

    tracing::debug!(
        path = %path.display(),
        categories = book.categories.len(),
        "loaded gradebook"
    );
    Ok(book)
}

/// Save the gradebook to a JSON file atomically
///
/// The file is never left half-written. Creates the parent directory if it
/// doesn't exist.
pub fn save_gradebook(path: &Path, book: &Gradebook) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, book).context("Failed to serialize gradebook")?;

    file.commit().context("Failed to save gradebook")?;

    tracing::debug!(path = %path.display(), "saved gradebook");
    Ok(())
}
