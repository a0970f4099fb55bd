use std::path::PathBuf;

use crate::record::layout::RecordLayout;

use super::error::DatasetError;

/// What to do when a record's tag-code is not in the charset.
///
/// `ZeroLabel` silently emits an all-zero one-hot, which corrupts the
/// training signal, so failing is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownTagcode {
    Fail,
    ZeroLabel,
}

pub struct StreamConfig {
    pub batch_size: usize,
    pub num_epochs: usize,
    pub shuffle: bool,
    pub shuffle_buffer: usize,
    pub shuffle_seed: Option<u64>,
    pub prefetch_batches: usize,
    pub decode_threads: usize,
    pub drop_last: bool,
    /// Augmentation hook flag, forwarded to `record::preprocess`.
    pub training: bool,
    pub unknown_tagcode: UnknownTagcode,
    pub layout: RecordLayout,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            num_epochs: 1,
            shuffle: true,
            shuffle_buffer: 50_000,
            shuffle_seed: None,
            prefetch_batches: 2,
            decode_threads: num_cpus::get(),
            drop_last: true,
            training: true,
            unknown_tagcode: UnknownTagcode::Fail,
            layout: RecordLayout::default(),
        }
    }
}

impl StreamConfig {
    pub fn build(self) -> Result<Self, DatasetError> {
        if self.batch_size == 0 {
            return Err(DatasetError::InvalidConfig("batch_size must be > 0".into()));
        }
        if self.num_epochs == 0 {
            return Err(DatasetError::InvalidConfig("num_epochs must be > 0".into()));
        }
        if self.shuffle && self.shuffle_buffer == 0 {
            return Err(DatasetError::InvalidConfig(
                "shuffle_buffer must be > 0 when shuffling".into(),
            ));
        }
        if self.prefetch_batches == 0 {
            return Err(DatasetError::InvalidConfig(
                "prefetch_batches must be > 0".into(),
            ));
        }
        if self.decode_threads == 0 {
            return Err(DatasetError::InvalidConfig(
                "decode_threads must be > 0".into(),
            ));
        }
        let layout = &self.layout;
        if layout.image_width == 0 || layout.image_height == 0 || layout.image_depth == 0 {
            return Err(DatasetError::InvalidConfig(
                "image dimensions must be > 0".into(),
            ));
        }
        if layout.label_bytes == 0 || layout.label_bytes > 2 {
            return Err(DatasetError::InvalidConfig(
                "label_bytes must be 1 or 2 (tag-codes are 2-byte)".into(),
            ));
        }

        Ok(self)
    }
}

/// File set for one dataset: train/test splits plus the charset that fixes
/// class indices for both.
pub struct DatasetPaths {
    pub train_file: PathBuf,
    pub test_file: PathBuf,
    pub charset_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        assert!(StreamConfig::default().build().is_ok());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = StreamConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.build(),
            Err(DatasetError::InvalidConfig(_))
        ));
    }

    #[test]
    fn oversized_label_field_is_rejected() {
        let config = StreamConfig {
            layout: RecordLayout {
                label_bytes: 4,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.build(),
            Err(DatasetError::InvalidConfig(_))
        ));
    }

    #[test]
    fn shuffle_buffer_only_checked_when_shuffling() {
        let config = StreamConfig {
            shuffle: false,
            shuffle_buffer: 0,
            ..Default::default()
        };
        assert!(config.build().is_ok());
    }
}
