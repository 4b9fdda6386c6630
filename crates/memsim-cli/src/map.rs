//! One-line occupancy maps.
//!
//! A snapshot is split into at most `width` groups of equal size (the last
//! group may be shorter). Each group becomes one glyph:
//!
//! ```text
//! [###~.......]
//! . = free | # = occupied | ~ = mixed
//! ```

use std::num::NonZeroUsize;

use ansi_term::{Color, WithFg};

pub const LEGEND: &str = ". = free | # = occupied | ~ = mixed";

/// Occupancy of a group of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Occupancy {
    Free,
    Occupied,
    Mixed,
}

impl Occupancy {
    pub fn classify<T>(group: &[Option<T>]) -> Self {
        let used = group.iter().filter(|cell| cell.is_some()).count();
        if used == 0 {
            Self::Free
        } else if used == group.len() {
            Self::Occupied
        } else {
            Self::Mixed
        }
    }

    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Self::Free => '.',
            Self::Occupied => '#',
            Self::Mixed => '~',
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Free => Color::Green,
            Self::Occupied => Color::Red,
            Self::Mixed => Color::Yellow,
        }
    }
}

/// Renders `cells` as a bracketed map line without the legend.
pub fn render<T>(cells: &[Option<T>], width: NonZeroUsize, color: bool) -> String {
    let group_size = usize::max(1, cells.len().div_ceil(width.get()));
    let mut line = String::from("[");
    for group in cells.chunks(group_size) {
        let occupancy = Occupancy::classify(group);
        let glyph = WithFg::new(occupancy.color(), occupancy.glyph()).enabled(color);
        line.push_str(&glyph.to_string());
    }
    line.push(']');
    line
}
