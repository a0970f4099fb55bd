pub mod batch;
pub mod config;
pub mod error;
pub mod reader;
pub mod shuffle;
pub mod stream;

pub use batch::SampleBatch;
pub use config::{DatasetPaths, StreamConfig, UnknownTagcode};
pub use error::DatasetError;
pub use stream::{input_stream, DatasetSplit, DatasetStream};
