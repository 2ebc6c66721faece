// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::PoisonError;

use log::Record;

use crate::Error;
use crate::ErrorKind;
use crate::Layout;
use crate::append::Append;
use crate::layout::TextLayout;

/// A builder to configure and create a [`FileSink`] appender.
#[derive(Debug)]
pub struct FileSinkBuilder {
    filepath: PathBuf,
    layout: Box<dyn Layout>,
}

impl FileSinkBuilder {
    /// Create a new builder.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
            layout: Box::new(TextLayout::default().no_color()),
        }
    }

    /// Build the [`FileSink`] appender.
    ///
    /// Missing parent directories are created. The file is opened in append mode and created if
    /// it does not exist; existing content is never truncated.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::Unwritable`] error if the log directory or the log file cannot be
    /// created.
    pub fn build(self) -> Result<FileSink, Error> {
        let FileSinkBuilder { filepath, layout } = self;

        if let Some(dir) = filepath.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| {
                Error::new(ErrorKind::Unwritable, "failed to create log directory")
                    .with_context("path", dir.display())
                    .with_source(err)
            })?;
        }

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&filepath)
            .map_err(|err| {
                Error::from_open_error(err).with_context("path", filepath.display())
            })?;

        Ok(FileSink {
            path: filepath,
            layout,
            writer: Mutex::new(file),
        })
    }
}

/// An appender that writes log records to a single append-only file.
///
/// The file handle stays open for the lifetime of the appender. Each record is written with a
/// single `write_all` under a lock, so lines from concurrent callers never interleave.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    layout: Box<dyn Layout>,
    writer: Mutex<File>,
}

impl FileSink {
    /// The path this sink appends to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Append for FileSink {
    fn append(&self, record: &Record) -> Result<(), Error> {
        let mut bytes = self.layout.format(record)?;
        bytes.push(b'\n');

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(&bytes).map_err(|err| {
            Error::from_io_error(err).with_context("path", self.path.display())
        })?;
        Ok(())
    }

    /// Flushes the file and waits until its content reaches durable storage.
    fn flush(&self) -> Result<(), Error> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer
            .flush()
            .and_then(|()| writer.sync_data())
            .map_err(|err| Error::from_io_error(err).with_context("path", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use log::Level;
    use rand::Rng;
    use rand::distr::Alphanumeric;
    use tempfile::TempDir;

    use super::*;

    fn generate_random_string() -> String {
        let mut rng = rand::rng();
        let len = rng.random_range(50..=100);
        let random_string: String = std::iter::repeat(())
            .map(|()| rng.sample(Alphanumeric))
            .map(char::from)
            .take(len)
            .collect();

        random_string
    }

    fn append_message(sink: &FileSink, message: &str) {
        sink.append(
            &Record::builder()
                .args(format_args!("{message}"))
                .level(Level::Info)
                .target("test_sink")
                .build(),
        )
        .unwrap();
    }

    #[test]
    fn test_file_sink_appends_lines() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("nested").join("sink.txt");

        let sink = FileSinkBuilder::new(&path).build().unwrap();
        assert_eq!(sink.path(), path.as_path());

        let first = generate_random_string();
        let second = generate_random_string();
        append_message(&sink, &first);
        append_message(&sink, &second);
        sink.flush().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(&format!("[test_sink] [info] {first}")));
        assert!(lines[1].ends_with(&format!("[test_sink] [info] {second}")));
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_file_sink_never_truncates() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("sink.txt");
        fs::write(&path, "existing line\n").unwrap();

        let sink = FileSinkBuilder::new(&path).build().unwrap();
        append_message(&sink, "appended");
        sink.flush().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("existing line\n"));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_file_sink_unwritable_directory() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let blocker = temp_dir.path().join("not_a_dir");
        fs::write(&blocker, "").unwrap();

        let err = FileSinkBuilder::new(blocker.join("sink.txt"))
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unwritable);
        assert!(!blocker.join("sink.txt").exists());
    }
}
