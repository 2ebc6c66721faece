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

//! Twinlog offers two alternative ways to append timestamped lines to text files.
//!
//! # Overview
//!
//! * [`direct`] opens a fixed file in append mode on every call, writes one line and closes it.
//!   Nothing is kept between calls.
//! * [`structured`] opens a pair of named file sinks once, echoes every message to the console
//!   and flushes the file sink to disk before returning.
//!
//! Both expose the same two operations, `write_log` and `write_error_log`, as fire-and-forget
//! free functions and as methods returning [`Result`].
//!
//! # Examples
//!
//! Fire-and-forget, writing to the working directory:
//!
//! ```no_run
//! twinlog::direct::write_log("TestLog");
//! twinlog::direct::write_error_log("TestErrorLog");
//!
//! twinlog::structured::write_log("StructuredLog");
//! twinlog::structured::write_error_log("StructuredErrorLog");
//! ```
//!
//! Observing failures:
//!
//! ```
//! use twinlog::ErrorKind;
//! use twinlog::direct::DirectFileLogger;
//!
//! let logger = DirectFileLogger::in_dir("/nonexistent/directory");
//! let err = logger.write_log("lost").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Unwritable);
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod direct;
pub mod layout;
pub mod structured;
pub mod trap;

pub use append::Append;
pub use layout::Layout;
pub use trap::Trap;

mod error;
pub use error::Error;
pub use error::ErrorKind;

mod logger;
pub use logger::Logger;
