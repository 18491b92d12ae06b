//! JSONL writer for match summaries.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::simulator::MatchSummary;

pub struct OutputWriter {
    writer: Box<dyn Write + Send>,
    path: PathBuf,
    written: u32,
}

impl OutputWriter {
    pub fn new(output_dir: &Path, compress: bool) -> Result<Self, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(output_dir)?;

        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| "unknown".to_string())
            .replace(':', "-");
        let filename = format!("matches_{timestamp}.jsonl");

        let (writer, path): (Box<dyn Write + Send>, PathBuf) = if compress {
            let path = output_dir.join(format!("{filename}.gz"));
            let encoder = GzEncoder::new(File::create(&path)?, Compression::default());
            (Box::new(BufWriter::new(encoder)), path)
        } else {
            let path = output_dir.join(filename);
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)?;
            (Box::new(BufWriter::new(file)), path)
        };

        Ok(Self {
            writer,
            path,
            written: 0,
        })
    }

    pub fn write_match(&mut self, summary: &MatchSummary) -> Result<(), Box<dyn std::error::Error>> {
        let line = serde_json::to_string(summary)?;
        writeln!(self.writer, "{line}")?;
        self.written += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<(PathBuf, u32), Box<dyn std::error::Error>> {
        self.writer.flush()?;
        Ok((self.path, self.written))
    }
}
