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

//! A logger backed by named file sinks that are opened once and kept open.
//!
//! Every call echoes the message to a console logger, appends it to the matching file sink, and
//! flushes that sink to durable storage before returning. Lines look like:
//!
//! ```text
//! [2024-08-11 22:44:57.172] [basic_logger] [info] Hello info!
//! [2024-08-11 22:44:57.172] [error_logger] [error] Hello error!
//! ```

use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::sync::PoisonError;
#[cfg(test)]
use std::sync::atomic::AtomicUsize;
#[cfg(test)]
use std::sync::atomic::Ordering;

use log::Level;

use crate::Error;
use crate::Logger;
use crate::append::FileSinkBuilder;
use crate::append::Stdout;
use crate::layout::TextLayout;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// File name of the info sink.
pub const INFO_LOG_FILE: &str = "spdlog.txt";
/// File name of the error sink.
pub const ERROR_LOG_FILE: &str = "spderror_log.txt";
/// Name of the logger owning the info sink.
pub const INFO_LOGGER_NAME: &str = "basic_logger";
/// Name of the logger owning the error sink.
pub const ERROR_LOGGER_NAME: &str = "error_logger";

/// Configuration of a [`StructuredLogger`].
///
/// # Examples
///
/// ```
/// use twinlog::structured::StructuredConfig;
///
/// let dir = tempfile::tempdir().unwrap();
/// let logger = StructuredConfig::in_dir(dir.path()).console(false).build();
///
/// logger.write_log("Hello info!").unwrap();
/// assert!(logger.is_initialized());
/// ```
#[derive(Clone)]
pub struct StructuredConfig {
    info_path: PathBuf,
    error_path: PathBuf,
    console: Option<Arc<Logger>>,
    trap: Arc<dyn Trap>,
}

impl fmt::Debug for StructuredConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredConfig")
            .field("info_path", &self.info_path)
            .field("error_path", &self.error_path)
            .field("console", &self.console.as_ref().map(|logger| logger.name()))
            .field("trap", &self.trap)
            .finish()
    }
}

impl Default for StructuredConfig {
    fn default() -> Self {
        Self::in_dir(PathBuf::new())
    }
}

impl StructuredConfig {
    /// Place both sinks under `dir`, keeping their fixed file names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            info_path: dir.join(INFO_LOG_FILE),
            error_path: dir.join(ERROR_LOG_FILE),
            console: Some(console()),
            trap: Arc::new(DefaultTrap::default()),
        }
    }

    /// Whether messages are also echoed to the process-wide console logger.
    ///
    /// Default to `true`.
    pub fn console(mut self, enabled: bool) -> Self {
        self.console = enabled.then(console);
        self
    }

    /// Echo messages to `logger` instead of the process-wide console logger.
    pub fn console_logger(mut self, logger: Logger) -> Self {
        self.console = Some(Arc::new(logger));
        self
    }

    /// Replace the policy that reports failed console echoes.
    ///
    /// Default to [`DefaultTrap`], which prints the error to stderr.
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Arc::new(trap);
        self
    }

    /// Path of the info sink.
    pub fn info_path(&self) -> &Path {
        &self.info_path
    }

    /// Path of the error sink.
    pub fn error_path(&self) -> &Path {
        &self.error_path
    }

    /// Build a [`StructuredLogger`]. No file is touched until the first write.
    pub fn build(self) -> StructuredLogger {
        StructuredLogger {
            config: self,
            sinks: OnceLock::new(),
            init_lock: Mutex::new(()),
            #[cfg(test)]
            constructions: AtomicUsize::new(0),
        }
    }
}

#[derive(Debug)]
struct Sinks {
    info: Logger,
    error: Logger,
}

impl Sinks {
    fn open(config: &StructuredConfig) -> Result<Sinks, Error> {
        let info = FileSinkBuilder::new(&config.info_path).build()?;
        let error = FileSinkBuilder::new(&config.error_path).build()?;
        Ok(Sinks {
            info: Logger::new(INFO_LOGGER_NAME).append(info),
            error: Logger::new(ERROR_LOGGER_NAME).append(error),
        })
    }
}

/// A logger that writes each message to the console and to a dedicated file sink.
///
/// Both file sinks are opened together on the first write, at most once per logger, no matter
/// how many threads race on that first write. Later writes read the published sinks without
/// taking any lock; the sinks serialize their own writes.
///
/// A failed construction leaves the logger uninitialized, and the next write tries again.
///
/// The console echo never stands in the way of the file sink: a failed echo is passed to the
/// configured trap and the file line is still written and flushed.
#[derive(Debug)]
pub struct StructuredLogger {
    config: StructuredConfig,
    sinks: OnceLock<Sinks>,
    // guards the construction path only
    init_lock: Mutex<()>,
    #[cfg(test)]
    constructions: AtomicUsize,
}

impl StructuredLogger {
    /// The configuration this logger was built from.
    pub fn config(&self) -> &StructuredConfig {
        &self.config
    }

    /// Whether the file sinks have been opened.
    pub fn is_initialized(&self) -> bool {
        self.sinks.get().is_some()
    }

    /// Emit `message` at info level and flush the info sink.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Unwritable`](crate::ErrorKind::Unwritable) if the sinks cannot be
    /// opened, or [`ErrorKind::Unexpected`](crate::ErrorKind::Unexpected) if writing or flushing
    /// the file sink fails.
    pub fn write_log(&self, message: &str) -> Result<(), Error> {
        let sinks = self.sinks()?;
        self.echo(Level::Info, message);
        sinks.info.info(message)?;
        sinks.info.flush()
    }

    /// Emit `message` at error level and flush the error sink.
    ///
    /// # Errors
    ///
    /// Same as [`StructuredLogger::write_log`].
    pub fn write_error_log(&self, message: &str) -> Result<(), Error> {
        let sinks = self.sinks()?;
        self.echo(Level::Error, message);
        sinks.error.error(message)?;
        sinks.error.flush()
    }

    fn echo(&self, level: Level, message: &str) {
        if let Some(console) = &self.config.console {
            if let Err(err) = console.log(level, format_args!("{message}")) {
                self.config.trap.trap(&err);
            }
        }
    }

    fn sinks(&self) -> Result<&Sinks, Error> {
        if let Some(sinks) = self.sinks.get() {
            return Ok(sinks);
        }

        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sinks) = self.sinks.get() {
            return Ok(sinks);
        }

        let sinks = Sinks::open(&self.config)?;
        #[cfg(test)]
        self.constructions.fetch_add(1, Ordering::SeqCst);
        Ok(self.sinks.get_or_init(|| sinks))
    }
}

/// The process-wide console logger shared by every [`StructuredLogger`] by default.
fn console() -> Arc<Logger> {
    static CONSOLE: LazyLock<Arc<Logger>> = LazyLock::new(|| {
        Arc::new(Logger::new("").append(Stdout::default().with_layout(TextLayout::default())))
    });
    CONSOLE.clone()
}

fn global() -> &'static StructuredLogger {
    static GLOBAL: LazyLock<StructuredLogger> =
        LazyLock::new(|| StructuredConfig::default().build());
    &GLOBAL
}

/// Emit `message` at info level through the process-wide [`StructuredLogger`].
///
/// The logger writes [`INFO_LOG_FILE`] and [`ERROR_LOG_FILE`] in the working directory. Failures
/// are reported to stderr and otherwise ignored.
pub fn write_log(message: &str) {
    if let Err(err) = global().write_log(message) {
        DefaultTrap::default().trap(&err);
    }
}

/// Emit `message` at error level through the process-wide [`StructuredLogger`].
///
/// Failures are reported to stderr and otherwise ignored.
pub fn write_error_log(message: &str) {
    if let Err(err) = global().write_error_log(message) {
        DefaultTrap::default().trap(&err);
    }
}
