//! Error helpers shared by the simulator crates.
//!
//! [`Location`] is captured implicitly by `snafu` error variants,
//! [`GenericError`] is the catch-all error used by binaries, and [`Report`]
//! renders an error together with its chain of causes.

use std::{error::Error, fmt, panic};

use ansi_term::{Color, WithFg};
use snafu::{GenerateImplicitData, Snafu};

/// Source location where an error was constructed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location(&'static panic::Location<'static>);

impl Default for Location {
    #[track_caller]
    fn default() -> Self {
        Self(panic::Location::caller())
    }
}

impl GenerateImplicitData for Location {
    #[track_caller]
    fn generate() -> Self {
        Self::default()
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Snafu)]
#[snafu(whatever, display("{message}"))]
pub struct GenericError {
    message: String,
    #[snafu(implicit)]
    location: Location,
    #[snafu(source(from(Box<dyn Error>, Some)))]
    source: Option<Box<dyn Error>>,
}

impl GenericError {
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }
}

/// Human readable rendering of an error and its causes.
///
/// Locations are printed for every [`GenericError`] in the chain.
pub struct Report<E> {
    error: E,
    color: bool,
}

impl<E> fmt::Debug for Report<E>
where
    E: Error + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<E> fmt::Display for Report<E>
where
    E: Error + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let err: &(dyn Error + 'static) = &self.error;
        writeln!(f, "Error: {}", self.paint(Color::Red, err))?;
        if let Some(loc) = location_of(err) {
            writeln!(f, "  at {}", self.paint(Color::DarkGray, loc))?;
        }
        let mut source = err.source();
        if source.is_some() {
            writeln!(f)?;
            writeln!(f, "Caused by:")?;
        }
        let mut index = 0;
        while let Some(s) = source {
            writeln!(f, "{index:4}: {}", self.paint(Color::Red, s))?;
            if let Some(loc) = location_of(s) {
                writeln!(f, "      at {}", self.paint(Color::DarkGray, loc))?;
            }
            source = s.source();
            index += 1;
        }
        Ok(())
    }
}

impl<E> Report<E> {
    pub fn new(error: E) -> Self {
        Self { error, color: true }
    }

    /// Disables ANSI colors in the rendered report.
    #[must_use]
    pub fn plain(mut self) -> Self {
        self.color = false;
        self
    }

    fn paint<T>(&self, color: Color, value: T) -> WithFg<T> {
        WithFg::new(color, value).enabled(self.color)
    }
}

fn location_of(err: &(dyn Error + 'static)) -> Option<Location> {
    err.downcast_ref::<GenericError>().map(GenericError::location)
}
