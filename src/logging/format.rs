// SPDX-License-Identifier: Apache-2.0 OR MIT
// Line rendering: timestamp, level tag, optional ANSI color

use super::Severity;
use std::fmt::{self, Write};
use std::time::Duration;

/// ANSI reset, emitted after every colored span
pub const RESET: &str = "\x1b[0m";

/// Color policy applied to a rendered line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Emit ANSI color codes at all
    pub color: bool,
    /// Color the whole line instead of only the level tag
    pub color_whole_message: bool,
}

impl Style {
    const COLOR: u8 = 0b01;
    const WHOLE: u8 = 0b10;

    /// Pack into one word so the logger can swap it atomically
    pub(crate) const fn to_bits(self) -> u8 {
        let mut bits = 0;
        if self.color {
            bits |= Self::COLOR;
        }
        if self.color_whole_message {
            bits |= Self::WHOLE;
        }
        bits
    }

    pub(crate) const fn from_bits(bits: u8) -> Self {
        Self {
            color: bits & Self::COLOR != 0,
            color_whole_message: bits & Self::WHOLE != 0,
        }
    }

    fn whole_line(self) -> bool {
        self.color && self.color_whole_message
    }

    fn tag_only(self) -> bool {
        self.color && !self.color_whole_message
    }
}

/// Render one log line
///
/// Layout: `<secs>.<millis:03> : [<TAG>] <message>\n`
pub fn format_line(
    level: Severity,
    elapsed: Duration,
    message: fmt::Arguments<'_>,
    style: Style,
) -> String {
    let mut line = String::with_capacity(64);

    if style.whole_line() {
        line.push_str(level.color_code());
    }

    let _ = write!(
        line,
        "{}.{:03} : [",
        elapsed.as_secs(),
        elapsed.subsec_millis()
    );

    if style.tag_only() {
        line.push_str(level.color_code());
        line.push_str(level.as_str());
        line.push_str(RESET);
    } else {
        line.push_str(level.as_str());
    }

    line.push_str("] ");
    let _ = line.write_fmt(message);

    if style.whole_line() {
        line.push_str(RESET);
    }
    line.push('\n');
    line
}
