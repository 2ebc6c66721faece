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

//! A logger that opens, appends to and closes a fixed file on every call.
//!
//! Lines look like:
//!
//! ```text
//! 2024-08-11 22:44:57 - Hello info!
//! 2024-08-11 22:44:57エラー: Hello error!
//! ```
//!
//! Nothing is retained between calls. Each call performs one open in append mode, one write and
//! one close, with no explicit sync to disk. Concurrent writers against the same file rely on the
//! file system's append semantics.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use jiff::Zoned;

use crate::Error;
use crate::ErrorKind;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// File name of the info log.
pub const LOG_FILE: &str = "log.txt";
/// File name of the error log.
pub const ERROR_LOG_FILE: &str = "error_log.txt";
/// Marker placed between the timestamp and the message of error lines.
pub const ERROR_MARKER: &str = "エラー: ";
/// Local wall-clock timestamp format, one-second resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Appends timestamped lines to [`LOG_FILE`] and [`ERROR_LOG_FILE`].
#[derive(Debug)]
pub struct DirectFileLogger {
    dir: PathBuf,
    trap: Box<dyn Trap>,
    #[cfg(test)]
    now: Option<Zoned>,
}

impl Default for DirectFileLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectFileLogger {
    /// Create a logger writing to the fixed file names in the working directory.
    pub fn new() -> Self {
        Self::in_dir(PathBuf::new())
    }

    /// Create a logger writing to the fixed file names inside `dir`.
    ///
    /// The directory is not created; if it is missing every call fails as unwritable.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            trap: Box::new(DefaultTrap::default()),
            #[cfg(test)]
            now: None,
        }
    }

    /// Replace the policy that reports failed writes.
    ///
    /// Default to [`DefaultTrap`], which prints the error to stderr.
    pub fn with_trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Path of the info log.
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    /// Path of the error log.
    pub fn error_log_path(&self) -> PathBuf {
        self.dir.join(ERROR_LOG_FILE)
    }

    /// Append `"<timestamp> - <message>"` to the info log.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Unwritable`] if the file cannot be opened, in which case nothing is
    /// written and the file is not created. Every error is also passed to the trap.
    pub fn write_log(&self, message: &str) -> Result<(), Error> {
        let line = format!("{} - {message}\n", self.timestamp());
        self.append_line(&self.log_path(), "failed to open log file", &line)
    }

    /// Append `"<timestamp>エラー: <message>"` to the error log.
    ///
    /// # Errors
    ///
    /// Same as [`DirectFileLogger::write_log`].
    pub fn write_error_log(&self, message: &str) -> Result<(), Error> {
        let line = format!("{}{ERROR_MARKER}{message}\n", self.timestamp());
        self.append_line(&self.error_log_path(), "failed to open error log file", &line)
    }

    fn timestamp(&self) -> String {
        self.now().strftime(TIMESTAMP_FORMAT).to_string()
    }

    #[cfg(not(test))]
    fn now(&self) -> Zoned {
        Zoned::now()
    }

    #[cfg(test)]
    fn now(&self) -> Zoned {
        self.now.clone().unwrap_or_else(Zoned::now)
    }

    fn append_line(&self, path: &Path, open_failure: &str, line: &str) -> Result<(), Error> {
        let result = write_line(path, open_failure, line);
        if let Err(err) = &result {
            self.trap.trap(err);
        }
        result
    }

    #[cfg(test)]
    fn with_now(mut self, now: &str) -> Self {
        self.now = Some(now.parse().unwrap());
        self
    }
}

fn write_line(path: &Path, open_failure: &str, line: &str) -> Result<(), Error> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|err| {
            Error::new(ErrorKind::Unwritable, open_failure)
                .with_context("path", path.display())
                .with_source(err)
        })?;

    // one write per line; the handle closes on drop
    file.write_all(line.as_bytes())
        .map_err(|err| Error::from_io_error(err).with_context("path", path.display()))
}

/// Append a line to `log.txt` in the working directory.
///
/// Failures are reported to stderr and otherwise ignored; use [`DirectFileLogger`] to observe
/// them.
pub fn write_log(message: &str) {
    let _ = DirectFileLogger::new().write_log(message);
}

/// Append an error line to `error_log.txt` in the working directory.
///
/// Failures are reported to stderr and otherwise ignored; use [`DirectFileLogger`] to observe
/// them.
pub fn write_error_log(message: &str) {
    let _ = DirectFileLogger::new().write_error_log(message);
}
