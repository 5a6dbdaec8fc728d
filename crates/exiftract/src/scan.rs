//! Zero-byte precondition scan.
//!
//! ExifTool hangs on some degenerate all-zero inputs and errors unhelpfully
//! on others, so the all-zeros case is detected up front and reported as
//! MALFORMED without ever invoking the tool.

use crate::error::Result;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const SCAN_CHUNK_SIZE: usize = 8192;

/// True iff every byte of the file is zero. Empty files count as all-zero.
///
/// Streams the file in chunks; the input is never held in memory whole.
pub async fn is_file_all_zeros(path: &Path) -> Result<bool> {
    let mut file = File::open(path).await?;
    let mut buf = [0u8; SCAN_CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            return Ok(true);
        }
        if buf[..n].iter().any(|&b| b != 0) {
            return Ok(false);
        }
    }
}

/// Slice variant for callers that already hold the bytes.
pub fn is_all_zeros(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_with(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_empty_file_is_all_zeros() {
        let file = temp_with(b"");
        assert!(is_file_all_zeros(file.path()).await.unwrap());
    }

    #[tokio::test]
    async fn test_zero_file_is_all_zeros() {
        let file = temp_with(&[0u8; 4096]);
        assert!(is_file_all_zeros(file.path()).await.unwrap());
    }

    #[tokio::test]
    async fn test_multi_chunk_zero_file() {
        // Larger than one scan chunk so the loop has to iterate
        let file = temp_with(&vec![0u8; SCAN_CHUNK_SIZE * 3 + 17]);
        assert!(is_file_all_zeros(file.path()).await.unwrap());
    }

    #[tokio::test]
    async fn test_late_nonzero_byte_detected() {
        let mut content = vec![0u8; SCAN_CHUNK_SIZE * 2];
        content.push(1);
        let file = temp_with(&content);
        assert!(!is_file_all_zeros(file.path()).await.unwrap());
    }

    #[tokio::test]
    async fn test_leading_nonzero_byte_detected() {
        let file = temp_with(b"\x01\x00\x00");
        assert!(!is_file_all_zeros(file.path()).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = is_file_all_zeros(Path::new("/nonexistent/exiftract-scan.bin")).await;
        assert!(matches!(result.unwrap_err(), crate::ExiftractError::Io(_)));
    }

    #[test]
    fn test_slice_variant() {
        assert!(is_all_zeros(b""));
        assert!(is_all_zeros(&[0, 0, 0]));
        assert!(!is_all_zeros(&[0, 0, 7]));
    }
}
