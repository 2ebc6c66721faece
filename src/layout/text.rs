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

#[cfg(feature = "colored")]
use colored::Color;
#[cfg(feature = "colored")]
use colored::Colorize;
use jiff::Zoned;
use jiff::tz::TimeZone;
use log::Level;
use log::Record;

use crate::Error;
use crate::layout::Layout;

/// A layout that formats log record as text.
///
/// Output format:
///
/// ```text
/// [2024-08-11 22:44:57.172] [basic_logger] [info] Hello info!
/// [2024-08-11 22:44:57.172] [error_logger] [error] Hello error!
/// ```
///
/// The bracketed name is the record target, which [`Logger`](crate::Logger) sets to its own
/// name. An empty target is left out.
///
/// By default, log levels are colored when the `colored` feature is enabled: errors in red,
/// warnings in yellow, info in green, debug in blue and trace in magenta. Call
/// [`TextLayout::no_color`] for sinks that are not terminals.
///
/// You can customize the timezone of the timestamp with [`TextLayout::timezone`]. Otherwise,
/// the system timezone is used.
#[derive(Default, Debug, Clone)]
pub struct TextLayout {
    #[cfg(feature = "colored")]
    no_color: bool,
    tz: Option<TimeZone>,
}

impl TextLayout {
    /// Disables level coloring.
    #[cfg(feature = "colored")]
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Disables level coloring.
    ///
    /// Levels are never colored without the `colored` feature.
    #[cfg(not(feature = "colored"))]
    pub fn no_color(self) -> Self {
        self
    }

    /// Sets the timezone of the timestamp.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    #[cfg(feature = "colored")]
    fn paint_level(&self, level: Level) -> String {
        let name = level_name(level);
        if self.no_color {
            return name.to_string();
        }

        let color = match level {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug => Color::Blue,
            Level::Trace => Color::Magenta,
        };
        name.color(color).to_string()
    }

    #[cfg(not(feature = "colored"))]
    fn paint_level(&self, level: Level) -> String {
        level_name(level).to_string()
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "error",
        Level::Warn => "warning",
        Level::Info => "info",
        Level::Debug => "debug",
        Level::Trace => "trace",
    }
}

impl Layout for TextLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let time = match self.tz.clone() {
            Some(tz) => Zoned::now().with_time_zone(tz),
            None => Zoned::now(),
        }
        .strftime("%Y-%m-%d %H:%M:%S.%3f");
        let name = record.target();
        let level = self.paint_level(record.level());
        let message = record.args();

        let text = if name.is_empty() {
            format!("[{time}] [{level}] {message}")
        } else {
            format!("[{time}] [{name}] [{level}] {message}")
        };
        Ok(text.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_with_target(
        layout: &TextLayout,
        target: &str,
        level: Level,
        message: &str,
    ) -> String {
        let bytes = layout
            .format(
                &Record::builder()
                    .args(format_args!("{message}"))
                    .level(level)
                    .target(target)
                    .build(),
            )
            .unwrap();
        String::from_utf8(bytes).unwrap()
    }

    fn render(layout: &TextLayout, level: Level, message: &str) -> String {
        render_with_target(layout, "basic_logger", level, message)
    }

    #[test]
    fn test_plain_line_shape() {
        let layout = TextLayout::default().no_color().timezone(TimeZone::UTC);
        let line = render(&layout, Level::Info, "Hello info!");

        // [YYYY-MM-DD HH:MM:SS.mmm] is 25 bytes wide
        assert_eq!(&line[0..1], "[");
        assert_eq!(&line[24..25], "]");
        assert_eq!(&line[25..], " [basic_logger] [info] Hello info!");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_level_names() {
        let layout = TextLayout::default().no_color();
        assert!(render(&layout, Level::Error, "x").contains("[error] x"));
        assert!(render(&layout, Level::Warn, "x").contains("[warning] x"));
        assert!(render(&layout, Level::Trace, "x").contains("[trace] x"));
    }

    #[test]
    fn test_empty_target_is_omitted() {
        let layout = TextLayout::default().no_color();
        let line = render_with_target(&layout, "", Level::Info, "anonymous");
        assert!(line.ends_with("] [info] anonymous"), "{line}");
        assert!(!line.contains("[]"));
    }

    #[cfg(feature = "colored")]
    #[test]
    fn test_colored_level_keeps_name() {
        colored::control::set_override(true);
        let line = render(&TextLayout::default(), Level::Error, "red");
        colored::control::unset_override();

        assert!(line.contains("\u{1b}["), "{line:?}");
        assert!(line.contains("error"));
        assert!(line.ends_with("] red"));
    }
}
