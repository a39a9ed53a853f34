//! Incremental feeding must not change the answer
//!
//! Feeds each sample line by line, byte by byte and in one piece, and
//! checks that the detector lands on the same result every time.

use std::path::PathBuf;

use chardetect::{detect, DetectionResult, UniversalDetector};

fn samples() -> Vec<PathBuf> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/testdata");
    let mut files = Vec::new();
    for lang in std::fs::read_dir(&root).unwrap() {
        let lang = lang.unwrap().path();
        if !lang.is_dir() {
            continue;
        }
        for file in std::fs::read_dir(&lang).unwrap() {
            files.push(file.unwrap().path());
        }
    }
    files.sort();
    files
}

fn feed_lines(bytes: &[u8]) -> DetectionResult {
    let mut detector = UniversalDetector::new();
    for line in bytes.split_inclusive(|&b| b == b'\n') {
        detector.feed(line);
        if detector.done() {
            break;
        }
    }
    detector.close().clone()
}

fn feed_bytes(bytes: &[u8]) -> DetectionResult {
    let mut detector = UniversalDetector::new();
    for byte in bytes {
        detector.feed(std::slice::from_ref(byte));
    }
    detector.close().clone()
}

#[test]
fn test_line_feeding_matches_one_shot() {
    for path in samples() {
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(feed_lines(&bytes), detect(&bytes), "{}", path.display());
    }
}

#[test]
fn test_byte_feeding_matches_one_shot() {
    for path in samples() {
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(feed_bytes(&bytes), detect(&bytes), "{}", path.display());
    }
}

#[test]
fn test_close_is_idempotent() {
    let mut detector = UniversalDetector::new();
    detector.feed("Привет".as_bytes());
    let first = detector.close().clone();
    let second = detector.close().clone();
    assert_eq!(first, second);
    assert!(detector.done());
}

#[test]
fn test_large_input_stops_early() {
    let line = "日本語の文章を少しだけ書いてみました。これは試験です。\n";
    let bytes: Vec<u8> = line.repeat(200).into_bytes();

    let mut detector = UniversalDetector::new();
    let mut fed = 0usize;
    for chunk in bytes.chunks(100) {
        detector.feed(chunk);
        fed += chunk.len();
        if detector.done() {
            break;
        }
    }
    assert!(fed < bytes.len(), "detector never settled");
    let result = detector.close();
    assert_eq!(result.encoding.as_deref(), Some("UTF-8"));
}
