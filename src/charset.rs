use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::dataset::error::DatasetError;

/// Ordered, duplicate-free set of 2-byte character tag-codes. Class indices
/// are positional, so training and evaluation must build from the same
/// source file.
pub struct Charset {
    tagcodes: Vec<u16>,
    index: HashMap<u16, usize>,
}

impl Charset {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Parses a flat sequence of big-endian 2-byte tag-codes, keeping
    /// first-appearance order and dropping duplicates.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DatasetError> {
        if bytes.is_empty() {
            return Err(DatasetError::EmptyCharset);
        }
        if bytes.len() % 2 != 0 {
            return Err(DatasetError::MalformedCharset(bytes.len()));
        }

        let mut tagcodes = Vec::with_capacity(bytes.len() / 2);
        let mut index = HashMap::with_capacity(bytes.len() / 2);
        for chunk in bytes.chunks_exact(2) {
            let tag = u16::from_be_bytes([chunk[0], chunk[1]]);
            if !index.contains_key(&tag) {
                index.insert(tag, tagcodes.len());
                tagcodes.push(tag);
            }
        }

        Ok(Charset { tagcodes, index })
    }

    pub fn num_classes(&self) -> usize {
        self.tagcodes.len()
    }

    pub fn index_of(&self, tag: u16) -> Option<usize> {
        self.index.get(&tag).copied()
    }

    pub fn tagcodes(&self) -> &[u16] {
        &self.tagcodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_unique_tagcodes() {
        // 0xB0A1, 0xB0A2, 0xB0A1 again, 0x0001
        let bytes = [0xB0, 0xA1, 0xB0, 0xA2, 0xB0, 0xA1, 0x00, 0x01];
        let charset = Charset::from_bytes(&bytes).unwrap();
        assert_eq!(charset.num_classes(), 3);
        assert_eq!(charset.tagcodes(), &[0xB0A1, 0xB0A2, 0x0001]);
        assert_eq!(charset.index_of(0xB0A2), Some(1));
        assert_eq!(charset.index_of(0x0001), Some(2));
        assert_eq!(charset.index_of(0xFFFF), None);
    }

    #[test]
    fn empty_source_is_rejected() {
        assert!(matches!(
            Charset::from_bytes(&[]),
            Err(DatasetError::EmptyCharset)
        ));
    }

    #[test]
    fn odd_length_source_is_rejected() {
        assert!(matches!(
            Charset::from_bytes(&[0xB0, 0xA1, 0xB0]),
            Err(DatasetError::MalformedCharset(3))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            Charset::from_file("/nonexistent/charset.bin"),
            Err(DatasetError::Io(_))
        ));
    }
}
