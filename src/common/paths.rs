//! Configuration and output paths
//!
//! The configuration file lives in the platform config directory:
//! - Linux: `~/.config/matrix-bench/config.toml`
//! - macOS: `~/Library/Application Support/matrix-bench/config.toml`
//! - Windows: `%APPDATA%\matrix-bench\config.toml`

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "matrix-bench";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Build `<dir>/<prefix>_<timestamp>.<ext>`
pub fn output_file(dir: &Path, prefix: &str, timestamp: &str, ext: &str) -> PathBuf {
    dir.join(format!("{}_{}.{}", prefix, timestamp, ext))
}

/// Create `<dir>/<prefix>_<timestamp>.<ext>` without touching existing files
///
/// When the name is taken, `_1`, `_2`, ... is appended to the timestamp.
pub fn create_output_file(
    dir: &Path,
    prefix: &str,
    timestamp: &str,
    ext: &str,
) -> io::Result<(PathBuf, File)> {
    let mut attempt = 0u32;
    loop {
        let stamp = match attempt {
            0 => timestamp.to_string(),
            n => format!("{}_{}", timestamp, n),
        };
        let path = output_file(dir, prefix, &stamp, ext);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

/// Ensure the output directory exists
pub fn ensure_output_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Resolve `path` against `base` when it is relative
pub fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_embeds_prefix_and_timestamp() {
        let path = output_file(Path::new("out"), "bench", "2024-01-02_03-04-05", "tsv");
        assert_eq!(path, PathBuf::from("out/bench_2024-01-02_03-04-05.tsv"));
    }

    #[test]
    fn test_create_output_file_never_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let ts = "2024-01-02_03-04-05";

        let (first, _) = create_output_file(tmp.path(), "bench", ts, "tsv").unwrap();
        std::fs::write(&first, "first run").unwrap();
        let (second, _) = create_output_file(tmp.path(), "bench", ts, "tsv").unwrap();
        let (third, _) = create_output_file(tmp.path(), "bench", ts, "tsv").unwrap();

        assert_eq!(first, tmp.path().join("bench_2024-01-02_03-04-05.tsv"));
        assert_eq!(second, tmp.path().join("bench_2024-01-02_03-04-05_1.tsv"));
        assert_eq!(third, tmp.path().join("bench_2024-01-02_03-04-05_2.tsv"));
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "first run");
    }

    #[test]
    fn test_create_output_file_missing_dir_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing");
        let err = create_output_file(&missing, "bench", "ts", "log").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_resolve_relative() {
        let base = Path::new("/scenarios");
        assert_eq!(
            resolve_relative(base, Path::new("radix-engine")),
            PathBuf::from("/scenarios/radix-engine")
        );
        assert_eq!(
            resolve_relative(base, Path::new("/abs/dir")),
            PathBuf::from("/abs/dir")
        );
    }

    #[test]
    fn test_ensure_output_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        ensure_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }
}
