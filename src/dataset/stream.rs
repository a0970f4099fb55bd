use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;

use crate::charset::Charset;
use crate::record::decoder::{decode_into, preprocess};

use super::batch::SampleBatch;
use super::config::{DatasetPaths, StreamConfig};
use super::error::DatasetError;
use super::reader::{self, FixedRecordReader};
use super::shuffle::ShuffleBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSplit {
    Train,
    Test,
}

/// Lazy, finite stream of decoded batches, produced by a background thread
/// and handed over a bounded channel. The channel capacity is the prefetch
/// depth: the producer decodes ahead while the consumer works, and blocks
/// once `prefetch_batches` batches are waiting.
pub struct DatasetStream {
    receiver: Receiver<Result<SampleBatch, DatasetError>>,
    total_batches: usize,
}

impl DatasetStream {
    pub fn open(
        files: Vec<PathBuf>,
        charset: Arc<Charset>,
        config: StreamConfig,
    ) -> Result<Self, DatasetError> {
        let config = config.build()?;
        let record_bytes = config.layout.record_bytes();

        // Fail on missing or truncated files here, before any batch exists
        let total_records = reader::probe(&files, record_bytes)?;
        let per_epoch = if config.drop_last {
            total_records / config.batch_size as u64
        } else {
            (total_records + config.batch_size as u64 - 1) / config.batch_size as u64
        };
        let total_batches = config.num_epochs * per_epoch as usize;

        let seed = config
            .shuffle_seed
            .unwrap_or_else(|| rand::thread_rng().gen());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.decode_threads)
            .build()
            .map_err(|e| DatasetError::InvalidConfig(e.to_string()))?;

        info!(
            "streaming {} records from {} file(s): {} batches of {} over {} epoch(s), shuffle={}",
            total_records,
            files.len(),
            total_batches,
            config.batch_size,
            config.num_epochs,
            config.shuffle,
        );

        let (sender, receiver) = bounded(config.prefetch_batches);
        thread::spawn(move || {
            match produce(&files, &charset, &config, seed, &pool, &sender) {
                Ok(()) | Err(StreamEnd::Disconnected) => {}
                Err(StreamEnd::Failed(e)) => {
                    let _ = sender.send(Err(e));
                }
            }
        });

        Ok(DatasetStream {
            receiver,
            total_batches,
        })
    }

    /// Number of batches this stream will yield if no error occurs.
    pub fn total_batches(&self) -> usize {
        self.total_batches
    }
}

impl Iterator for DatasetStream {
    type Item = Result<SampleBatch, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.recv().ok()
    }
}

/// Train/eval entry point over a `DatasetPaths` file set. Evaluation never
/// shuffles, so metric runs see records in exact file order.
pub fn input_stream(
    paths: &DatasetPaths,
    split: DatasetSplit,
    charset: Arc<Charset>,
    mut config: StreamConfig,
) -> Result<DatasetStream, DatasetError> {
    let file = match split {
        DatasetSplit::Train => paths.train_file.clone(),
        DatasetSplit::Test => paths.test_file.clone(),
    };
    config.shuffle = split == DatasetSplit::Train;
    config.training = split == DatasetSplit::Train;
    DatasetStream::open(vec![file], charset, config)
}

enum StreamEnd {
    Failed(DatasetError),
    Disconnected,
}

impl From<DatasetError> for StreamEnd {
    fn from(e: DatasetError) -> Self {
        StreamEnd::Failed(e)
    }
}

fn produce(
    files: &[PathBuf],
    charset: &Charset,
    config: &StreamConfig,
    seed: u64,
    pool: &rayon::ThreadPool,
    sender: &Sender<Result<SampleBatch, DatasetError>>,
) -> Result<(), StreamEnd> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut batch_number = 0usize;

    for epoch in 0..config.num_epochs {
        let mut reader = FixedRecordReader::open(files, config.layout.record_bytes())?;
        debug!(
            "epoch {}/{}: {} records",
            epoch + 1,
            config.num_epochs,
            reader.total_records()
        );

        let mut pending: Vec<Vec<u8>> = Vec::with_capacity(config.batch_size);
        let emit = |pending: &mut Vec<Vec<u8>>, batch_number: &mut usize| -> Result<(), StreamEnd> {
            let batch = encode_batch(pending, charset, config, pool, *batch_number)?;
            pending.clear();
            sender.send(Ok(batch)).map_err(|_| StreamEnd::Disconnected)?;
            *batch_number += 1;
            Ok(())
        };

        if config.shuffle {
            // Fresh permutation every epoch, derived from the stream RNG
            let epoch_rng = StdRng::seed_from_u64(rng.gen());
            let mut buffer = ShuffleBuffer::new(config.shuffle_buffer, epoch_rng);
            while let Some(record) = reader.next_record()? {
                if let Some(evicted) = buffer.push(record) {
                    pending.push(evicted);
                    if pending.len() == config.batch_size {
                        emit(&mut pending, &mut batch_number)?;
                    }
                }
            }
            for record in buffer.drain() {
                pending.push(record);
                if pending.len() == config.batch_size {
                    emit(&mut pending, &mut batch_number)?;
                }
            }
        } else {
            while let Some(record) = reader.next_record()? {
                pending.push(record);
                if pending.len() == config.batch_size {
                    emit(&mut pending, &mut batch_number)?;
                }
            }
        }

        if !pending.is_empty() && !config.drop_last {
            emit(&mut pending, &mut batch_number)?;
        }
    }

    Ok(())
}

fn encode_batch(
    records: &[Vec<u8>],
    charset: &Charset,
    config: &StreamConfig,
    pool: &rayon::ThreadPool,
    batch_number: usize,
) -> Result<SampleBatch, DatasetError> {
    let layout = config.layout;
    let pixels = layout.image_bytes();
    let classes = charset.num_classes();
    let policy = config.unknown_tagcode;
    let training = config.training;

    let mut images = vec![0f32; records.len() * pixels].into_boxed_slice();
    let mut labels = vec![0i32; records.len() * classes].into_boxed_slice();

    // Index-aligned chunks keep output order equal to record order, so
    // non-shuffled streams stay in file order under parallel decode
    pool.install(|| {
        images
            .par_chunks_exact_mut(pixels)
            .zip(labels.par_chunks_exact_mut(classes))
            .zip(records.par_iter())
            .try_for_each(|((image, label), raw)| -> Result<(), DatasetError> {
                decode_into(raw, &layout, charset, policy, image, label)?;
                preprocess(image, training);
                Ok(())
            })
    })?;

    Ok(SampleBatch {
        images,
        labels,
        samples: records.len(),
        image_shape: layout.image_shape(),
        num_classes: classes,
        batch_number,
    })
}
