//! Per-file detection

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

use chardetect::{DetectionResult, DetectorConfig, UniversalDetector};

/// Outcome of inspecting one file
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Result<DetectionResult>,
}

pub fn scan_path(path: &Path, config: &DetectorConfig, stream: bool) -> FileReport {
    let outcome = if stream {
        detect_streaming(path, config)
    } else {
        detect_whole(path, config)
    };
    FileReport {
        path: path.to_path_buf(),
        outcome,
    }
}

fn detect_whole(path: &Path, config: &DetectorConfig) -> Result<DetectionResult> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let result = chardetect::detect_with_config(&bytes, config);
    debug!("{}: {} bytes -> {}", path.display(), bytes.len(), result);
    Ok(result)
}

/// Line-by-line feed that stops reading once the detector is settled
fn detect_streaming(path: &Path, config: &DetectorConfig) -> Result<DetectionResult> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut detector = UniversalDetector::with_config(config.clone());
    let mut line = Vec::new();
    let mut consumed = 0usize;

    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if n == 0 {
            break;
        }
        consumed += n;
        detector.feed(&line);
        if detector.done() {
            debug!("{}: settled after {} bytes", path.display(), consumed);
            break;
        }
    }

    Ok(detector.close().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stream_and_whole_agree() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ru.txt");
        let text = "Съешь же ещё этих мягких французских булок, да выпей чаю.\n".repeat(20);
        std::fs::write(&path, text.as_bytes()).unwrap();

        let config = DetectorConfig::default();
        let whole = scan_path(&path, &config, false).outcome.unwrap();
        let streamed = scan_path(&path, &config, true).outcome.unwrap();
        assert_eq!(whole, streamed);
        assert_eq!(whole.encoding.as_deref(), Some("UTF-8"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let report = scan_path(&dir.path().join("absent.txt"), &DetectorConfig::default(), false);
        let err = report.outcome.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read"));
    }
}
