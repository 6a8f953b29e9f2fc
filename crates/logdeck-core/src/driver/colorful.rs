//! Console driver with per-level ANSI colors.

use std::collections::HashMap;
use std::io::Write;

use parking_lot::RwLock;

use super::{Completion, Driver};
use crate::error::LogError;
use crate::Timestamp;

const FORE_COLOR_ENDING: &str = "\x1B[39m";
const BG_COLOR_ENDING: &str = "\x1B[49m";

/// Terminal colors usable as foreground or background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Grey,
}

impl Color {
    fn fore_code(self) -> &'static str {
        match self {
            Color::Default => "",
            Color::Black => "\x1B[30m",
            Color::Red => "\x1B[31m",
            Color::Green => "\x1B[32m",
            Color::Yellow => "\x1B[33m",
            Color::Blue => "\x1B[34m",
            Color::Magenta => "\x1B[35m",
            Color::Cyan => "\x1B[36m",
            Color::White => "\x1B[37m",
            Color::Grey => "\x1B[90m",
        }
    }

    fn bg_code(self) -> &'static str {
        match self {
            Color::Default => "",
            Color::Black => "\x1B[40m",
            Color::Red => "\x1B[41m",
            Color::Green => "\x1B[42m",
            Color::Yellow => "\x1B[43m",
            Color::Blue => "\x1B[44m",
            Color::Magenta => "\x1B[45m",
            Color::Cyan => "\x1B[46m",
            Color::White => "\x1B[47m",
            Color::Grey => "\x1B[100m",
        }
    }
}

/// Start and end escape sequences wrapped around each output line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Style {
    fore: Option<Color>,
    bg: Option<Color>,
    start: String,
    end: String,
}

impl Style {
    fn rebuild(&mut self) {
        let mut start = String::new();
        let mut end = String::new();

        if let Some(fore) = self.fore.filter(|c| *c != Color::Default) {
            start.push_str(fore.fore_code());
            end.insert_str(0, FORE_COLOR_ENDING);
        }

        if let Some(bg) = self.bg.filter(|c| *c != Color::Default) {
            start.push_str(bg.bg_code());
            end.insert_str(0, BG_COLOR_ENDING);
        }

        self.start = start;
        self.end = end;
    }
}

/// Writes records to stdout, decorating every line with the level's colors.
///
/// Levels without their own style fall back to the default style, which is
/// set by passing `None` as the level.
#[derive(Debug, Default)]
pub struct ColorfulConsoleDriver {
    default_style: RwLock<Style>,
    levels: RwLock<HashMap<String, Style>>,
}

impl ColorfulConsoleDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the foreground color of one level, or the default when `level` is `None`.
    pub fn fore_color(&self, color: Color, level: Option<&str>) -> &Self {
        self.update_style(level, |style| style.fore = Some(color));
        self
    }

    /// Set the background color of one level, or the default when `level` is `None`.
    pub fn bg_color(&self, color: Color, level: Option<&str>) -> &Self {
        self.update_style(level, |style| style.bg = Some(color));
        self
    }

    /// Apply the style of `level` to every line of `text`.
    pub fn decorate(&self, text: &str, level: &str) -> String {
        let levels = self.levels.read();
        let default_style = self.default_style.read();
        let style = levels.get(level).unwrap_or(&*default_style);

        if style.start.is_empty() {
            return text.to_string();
        }

        text.split('\n')
            .map(|line| format!("{}{}{}", style.start, line, style.end))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn update_style(&self, level: Option<&str>, f: impl FnOnce(&mut Style)) {
        match level {
            Some(level) => {
                let mut levels = self.levels.write();
                let style = levels.entry(level.to_string()).or_default();
                f(style);
                style.rebuild();
            }
            None => {
                let mut style = self.default_style.write();
                f(&mut style);
                style.rebuild();
            }
        }
    }
}

impl Driver for ColorfulConsoleDriver {
    fn write(&self, text: &str, _subject: &str, level: &str, _time: Timestamp) -> Result<(), LogError> {
        let decorated = self.decorate(text, level);
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", decorated)?;
        Ok(())
    }

    fn flush(&self) -> Completion {
        std::io::stdout().flush().map_err(LogError::from).into()
    }

    fn close(&self) -> Completion {
        self.flush()
    }
}
