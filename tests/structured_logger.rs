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
use std::sync::Arc;
use std::thread;

use tempfile::TempDir;
use twinlog::structured::ERROR_LOGGER_NAME;
use twinlog::structured::INFO_LOGGER_NAME;
use twinlog::structured::StructuredConfig;

#[test]
fn test_line_is_on_disk_when_call_returns() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = StructuredConfig::in_dir(temp_dir.path()).console(false).build();

    for i in 0..5 {
        let message = format!("durable {i}");
        logger.write_log(&message).unwrap();

        let content = fs::read_to_string(logger.config().info_path()).unwrap();
        assert_eq!(content.lines().count(), i + 1);
        assert!(content.ends_with(&format!("[{INFO_LOGGER_NAME}] [info] {message}\n")));
    }
}

#[test]
fn test_first_write_opens_both_sinks() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = StructuredConfig::in_dir(temp_dir.path()).console(false).build();
    assert!(!logger.is_initialized());
    assert!(!logger.config().info_path().exists());

    logger.write_error_log("first error").unwrap();

    assert!(logger.is_initialized());
    assert_eq!(fs::read_to_string(logger.config().info_path()).unwrap(), "");
    let error = fs::read_to_string(logger.config().error_path()).unwrap();
    assert!(error.ends_with(&format!("[{ERROR_LOGGER_NAME}] [error] first error\n")));
}

#[test]
fn test_sinks_do_not_mix_levels() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = StructuredConfig::in_dir(temp_dir.path()).console(false).build();

    logger.write_log("info only").unwrap();
    logger.write_error_log("error only").unwrap();

    let info = fs::read_to_string(logger.config().info_path()).unwrap();
    let error = fs::read_to_string(logger.config().error_path()).unwrap();
    assert!(info.contains("info only") && !info.contains("error only"));
    assert!(error.contains("error only") && !error.contains("info only"));
}

#[test]
fn test_console_echo_does_not_affect_files() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = StructuredConfig::in_dir(temp_dir.path()).build();

    logger.write_log("echoed").unwrap();
    logger.write_error_log("echoed error").unwrap();

    let info = fs::read_to_string(logger.config().info_path()).unwrap();
    let error = fs::read_to_string(logger.config().error_path()).unwrap();
    assert_eq!(info.lines().count(), 1);
    assert_eq!(error.lines().count(), 1);
}

#[test]
fn test_reopening_appends_to_existing_files() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");

    let first = StructuredConfig::in_dir(temp_dir.path()).console(false).build();
    first.write_log("from first").unwrap();
    drop(first);

    let second = StructuredConfig::in_dir(temp_dir.path()).console(false).build();
    second.write_log("from second").unwrap();

    let info = fs::read_to_string(second.config().info_path()).unwrap();
    let lines = info.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("from first"));
    assert!(lines[1].ends_with("from second"));
}

#[test]
fn test_concurrent_writes_share_one_sink() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = Arc::new(StructuredConfig::in_dir(temp_dir.path()).console(false).build());

    let handles = (0..8)
        .map(|i| {
            let logger = logger.clone();
            thread::spawn(move || {
                for j in 0..10 {
                    logger.write_log(&format!("thread {i} line {j}")).unwrap();
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    let info = fs::read_to_string(logger.config().info_path()).unwrap();
    assert_eq!(info.lines().count(), 80);
    assert!(
        info.lines()
            .all(|line| line.contains(&format!("[{INFO_LOGGER_NAME}] [info] thread ")))
    );
}
