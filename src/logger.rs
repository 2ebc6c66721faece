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

use std::fmt;

use log::Level;
use log::Record;

use crate::Append;
use crate::Error;

/// A named logger that fans a record out to its appenders.
///
/// The name becomes the target of every record the logger emits, so layouts can print which
/// logger a line came from.
///
/// # Examples
///
/// ```
/// use twinlog::Logger;
/// use twinlog::append::Stdout;
///
/// let logger = Logger::new("console").append(Stdout::default());
/// logger.info("Hello info!").unwrap();
/// ```
#[derive(Debug)]
pub struct Logger {
    name: String,
    appends: Vec<Box<dyn Append>>,
}

impl Logger {
    /// Create a new [`Logger`] without any appender.
    #[must_use = "call `append` to add an appender to the logger"]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            appends: vec![],
        }
    }

    /// Add an [`Append`] to the [`Logger`].
    #[must_use]
    pub fn append(mut self, append: impl Into<Box<dyn Append>>) -> Self {
        self.appends.push(append.into());
        self
    }

    /// The name of this logger.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Emit a record at `level` to every appender, in insertion order.
    ///
    /// Stops at the first appender that fails and returns its error.
    pub fn log(&self, level: Level, args: fmt::Arguments) -> Result<(), Error> {
        let record = Record::builder()
            .args(args)
            .level(level)
            .target(&self.name)
            .build();

        for append in &self.appends {
            append.append(&record)?;
        }
        Ok(())
    }

    /// Emit `message` at info level.
    pub fn info(&self, message: &str) -> Result<(), Error> {
        self.log(Level::Info, format_args!("{message}"))
    }

    /// Emit `message` at error level.
    pub fn error(&self, message: &str) -> Result<(), Error> {
        self.log(Level::Error, format_args!("{message}"))
    }

    /// Flush every appender.
    pub fn flush(&self) -> Result<(), Error> {
        for append in &self.appends {
            append.flush()?;
        }
        Ok(())
    }
}
