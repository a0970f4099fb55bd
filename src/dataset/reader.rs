use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use log::debug;

use super::error::DatasetError;

/// Sequential scan over one or more flat binary files of fixed-length
/// records. Files are validated up front: every file must be a non-zero
/// multiple of the record size, so corruption surfaces before the first
/// record is yielded and epoch accounting never drifts.
pub struct FixedRecordReader {
    files: Vec<PathBuf>,
    record_bytes: usize,
    total_records: u64,
    current: Option<BufReader<File>>,
    next_file: usize,
}

impl FixedRecordReader {
    pub fn open<P: AsRef<Path>>(files: &[P], record_bytes: usize) -> Result<Self, DatasetError> {
        let files: Vec<PathBuf> = files.iter().map(|p| p.as_ref().to_owned()).collect();
        let total_records = probe(&files, record_bytes)?;

        Ok(FixedRecordReader {
            files,
            record_bytes,
            total_records,
            current: None,
            next_file: 0,
        })
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    /// Next record in file order, None when all files are exhausted.
    pub fn next_record(&mut self) -> Result<Option<Vec<u8>>, DatasetError> {
        loop {
            if self.current.is_none() {
                if self.next_file == self.files.len() {
                    return Ok(None);
                }
                let path = &self.files[self.next_file];
                debug!("scanning {}", path.display());
                self.current = Some(BufReader::new(File::open(path)?));
                self.next_file += 1;
            }

            let reader = self.current.as_mut().unwrap();
            let mut record = vec![0u8; self.record_bytes];
            match read_full(reader, &mut record)? {
                0 => {
                    // file exhausted, move on
                    self.current = None;
                }
                n if n == self.record_bytes => return Ok(Some(record)),
                n => {
                    // size was validated at open; the file shrank underneath us
                    return Err(DatasetError::ShortRecord {
                        got: n,
                        expected: self.record_bytes,
                    });
                }
            }
        }
    }
}

/// Validates file sizes against the record size and returns the total
/// record count across all files.
pub fn probe(files: &[PathBuf], record_bytes: usize) -> Result<u64, DatasetError> {
    let mut total = 0u64;
    for path in files {
        let len = std::fs::metadata(path)?.len();
        if len == 0 || len % record_bytes as u64 != 0 {
            return Err(DatasetError::TruncatedFile {
                path: path.clone(),
                len,
                record_bytes,
            });
        }
        total += len / record_bytes as u64;
    }
    if total == 0 {
        return Err(DatasetError::EmptyDataset);
    }
    Ok(total)
}

fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, DatasetError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_records(dir: &Path, name: &str, records: &[&[u8]]) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        for r in records {
            f.write_all(r).unwrap();
        }
        path
    }

    #[test]
    fn reads_records_across_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_records(dir.path(), "a.bin", &[&[1u8; 4], &[2u8; 4]]);
        let b = write_records(dir.path(), "b.bin", &[&[3u8; 4]]);

        let mut reader = FixedRecordReader::open(&[a, b], 4).unwrap();
        assert_eq!(reader.total_records(), 3);

        let mut seen = Vec::new();
        while let Some(record) = reader.next_record().unwrap() {
            seen.push(record[0]);
        }
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_non_multiple_file_length_at_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_records(dir.path(), "bad.bin", &[&[1u8; 4], &[2u8; 3]]);

        assert!(matches!(
            FixedRecordReader::open(&[path], 4),
            Err(DatasetError::TruncatedFile { len: 7, .. })
        ));
    }

    #[test]
    fn rejects_empty_file_at_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_records(dir.path(), "empty.bin", &[]);

        assert!(matches!(
            FixedRecordReader::open(&[path], 4),
            Err(DatasetError::TruncatedFile { len: 0, .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let missing = PathBuf::from("/nonexistent/data.bin");
        assert!(matches!(
            FixedRecordReader::open(&[missing], 4),
            Err(DatasetError::Io(_))
        ));
    }
}
