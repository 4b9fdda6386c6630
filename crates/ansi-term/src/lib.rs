//! Minimal ANSI SGR styling for terminal output.
//!
//! Wrapping a value in [`WithFg`] renders it bold in the given foreground
//! color. Styling can be switched off per value so callers honour a
//! `--no-color` flag without duplicating their formatting code.

#![no_std]

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    DarkGray,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
}

impl Color {
    fn fg(self) -> u8 {
        match self {
            Self::DarkGray => 90,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
        }
    }
}

/// A value rendered with a bold foreground color.
pub struct WithFg<T> {
    color: Color,
    value: T,
    enabled: bool,
}

impl<T> fmt::Display for WithFg<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = &self.value;
        if !self.enabled {
            return write!(f, "{value}");
        }
        let fg = self.color.fg();
        write!(f, "\x1B[{fg};1m{value}\x1B[0m")
    }
}

impl<T> WithFg<T> {
    pub fn new(color: Color, value: T) -> Self {
        Self {
            color,
            value,
            enabled: true,
        }
    }

    /// Turns the escape sequences on or off.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::format;

    use super::*;

    #[test]
    fn test_colored() {
        let s = format!("{}", WithFg::new(Color::Green, '.'));
        assert_eq!(s, "\x1B[32;1m.\x1B[0m");
    }

    #[test]
    fn test_disabled() {
        let s = format!("{}", WithFg::new(Color::Red, "#").enabled(false));
        assert_eq!(s, "#");
    }
}
