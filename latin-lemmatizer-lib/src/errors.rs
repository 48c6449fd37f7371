use std::path::PathBuf;

/// Result type for analyzer construction, defaulting to [`LoadError`].
pub type Result<T, E = LoadError> = std::result::Result<T, E>;

/// Error raised when the analyzer's data cannot be loaded.
///
/// Only missing or unreadable required files are errors; malformed lines
/// inside a readable file are skipped so that partial corruption of the
/// hand-curated data never takes the analyzer offline.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A required data file is missing or unreadable.
    #[error("failed to load data: {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
