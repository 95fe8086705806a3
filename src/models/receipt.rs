//! Receipt images
//!
//! A receipt is a JPEG stored in the blob store under a key derived from
//! the expense identifier.

use std::fmt;
use std::path::Path;

use super::ids::ExpenseId;
use crate::error::GastosError;

/// Content type of every receipt upload
pub const RECEIPT_CONTENT_TYPE: &str = "image/jpeg";

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// Blob-store key of a receipt, `receipt-<expense id>.jpg`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiptKey(String);

impl ReceiptKey {
    pub fn for_expense(id: &ExpenseId) -> Self {
        Self(format!("receipt-{}.jpg", id.as_uuid()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// JPEG bytes ready for upload
#[derive(Clone, PartialEq, Eq)]
pub struct ReceiptImage {
    bytes: Vec<u8>,
}

impl ReceiptImage {
    /// Wrap JPEG bytes, rejecting anything without the SOI marker
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, GastosError> {
        if bytes.len() < JPEG_SOI.len() || bytes[..2] != JPEG_SOI {
            return Err(GastosError::Receipt(
                "Receipt must be a JPEG image".into(),
            ));
        }
        Ok(Self { bytes })
    }

    /// Load a JPEG from disk
    pub fn load(path: &Path) -> Result<Self, GastosError> {
        let bytes = std::fs::read(path).map_err(|e| {
            GastosError::Receipt(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ReceiptImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiptImage")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Suggested file name when saving a receipt, `<description>.jpg`
pub fn download_file_name(description: &str) -> String {
    let stem: String = description
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim();
    if stem.is_empty() {
        "receipt.jpg".to_string()
    } else {
        format!("{}.jpg", stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_jpeg() -> Vec<u8> {
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9]
    }

    #[test]
    fn test_key_format() {
        let id = ExpenseId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            ReceiptKey::for_expense(&id).as_str(),
            "receipt-550e8400-e29b-41d4-a716-446655440000.jpg"
        );
    }

    #[test]
    fn test_image_requires_jpeg_marker() {
        assert!(ReceiptImage::from_bytes(sample_jpeg()).is_ok());
        assert!(ReceiptImage::from_bytes(b"\x89PNG".to_vec()).is_err());
        assert!(ReceiptImage::from_bytes(Vec::new()).is_err());
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(download_file_name("Taxi"), "Taxi.jpg");
        assert_eq!(download_file_name("Almuerzo/cena"), "Almuerzo_cena.jpg");
        assert_eq!(download_file_name("  "), "receipt.jpg");
    }
}
