//! Utility functions for file handling and common operations

use crate::{GenorankError, GenorankResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Check if a file is gzip compressed
pub fn is_gzipped<P: AsRef<Path>>(path: P) -> GenorankResult<bool> {
    let mut file = File::open(path)?;
    let mut buffer = [0; 2];

    match file.read_exact(&mut buffer) {
        Ok(()) => Ok(buffer == [0x1f, 0x8b]),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(GenorankError::Io(e)),
    }
}

/// Get the number of CPU cores, with a fallback default
pub fn get_num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}

pub fn validate_file_exists<P: AsRef<Path>>(path: P) -> GenorankResult<()> {
    if !path.as_ref().exists() {
        return Err(GenorankError::FileNotFound(
            path.as_ref().to_string_lossy().to_string(),
        ));
    }
    Ok(())
}

/// Validate that an input table exists and can be opened
pub fn validate_file_readable<P: AsRef<Path>>(path: P) -> GenorankResult<()> {
    validate_file_exists(&path)?;

    File::open(&path)
        .map_err(|_| GenorankError::FileNotFound(path.as_ref().to_string_lossy().to_string()))?;

    Ok(())
}

/// Create parent directories if they don't exist
pub fn ensure_parent_dirs<P: AsRef<Path>>(path: P) -> GenorankResult<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Logs the wall time of a named phase when dropped
pub struct Timer {
    start: std::time::Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::info!("Starting: {}", name);
        Timer {
            start: std::time::Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!("{} took {:.2?}", self.name, self.elapsed());
    }
}
