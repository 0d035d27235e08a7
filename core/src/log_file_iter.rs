use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// iterates over the lines of a log dump.
///
/// lines are decoded lossily so a stray non-utf8 byte in a dump doesn't
/// abort the whole scan.
pub struct LogFileIterator {
    buf: Vec<u8>,
    reader: BufReader<File>,
}

impl LogFileIterator {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::options()
            .read(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;

        Ok(Self {
            buf: Vec::with_capacity(256),
            reader: BufReader::new(file),
        })
    }
}

impl Iterator for LogFileIterator {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();

        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = String::from_utf8_lossy(&self.buf);
                Some(Ok(line.trim_end_matches(['\n', '\r']).to_owned()))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}
