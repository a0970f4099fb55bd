use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("charset source is empty")]
    EmptyCharset,

    #[error("charset source length {0} is not a multiple of 2")]
    MalformedCharset(usize),

    #[error("invalid stream config: {0}")]
    InvalidConfig(String),

    #[error("no records found in the dataset")]
    EmptyDataset,

    #[error("{path}: length {len} is not a non-zero multiple of record size {record_bytes}")]
    TruncatedFile {
        path: PathBuf,
        len: u64,
        record_bytes: usize,
    },

    #[error("record has {got} bytes, expected {expected}")]
    ShortRecord { got: usize, expected: usize },

    #[error("tag-code {tag:#06x} not present in charset")]
    UnknownTagcode { tag: u16 },
}
