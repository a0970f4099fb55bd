use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use potstream::{Charset, DatasetStream, StreamConfig};

// Streams one pass over a record file and logs batch stats. The actual
// training loop lives outside this crate and consumes the same iterator.
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (data, charset) = match (args.next(), args.next()) {
        (Some(data), Some(charset)) => (PathBuf::from(data), PathBuf::from(charset)),
        _ => {
            eprintln!("usage: potstream <data.bin> <charset.bin>");
            std::process::exit(2);
        }
    };

    let charset = Arc::new(Charset::from_file(&charset).expect("failed to read charset"));
    info!("charset: {} classes", charset.num_classes());

    let config = StreamConfig {
        shuffle_seed: Some(727),
        ..Default::default()
    };
    let stream = DatasetStream::open(vec![data], charset, config).expect("failed to open stream");
    info!("expecting {} batches", stream.total_batches());

    let mut batches = 0usize;
    let mut samples = 0usize;
    for batch in stream {
        let batch = batch.expect("stream failed");
        let mean = batch.images.iter().sum::<f32>() / batch.images.len() as f32;
        info!(
            "batch {}: {} samples, pixel mean {:.4}",
            batch.batch_number, batch.samples, mean
        );
        batches += 1;
        samples += batch.samples;
    }
    info!("done: {} batches, {} samples", batches, samples);
}
