pub mod charset;
pub mod dataset;
pub mod record;

pub use charset::Charset;
pub use dataset::batch::SampleBatch;
pub use dataset::config::{DatasetPaths, StreamConfig, UnknownTagcode};
pub use dataset::error::DatasetError;
pub use dataset::stream::{input_stream, DatasetSplit, DatasetStream};
pub use record::layout::RecordLayout;
