//! Background themes and the score-driven theme cycle.

use std::fmt;

/// A background map. Variants are listed in cycle order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Theme {
    Day,
    Map1,
    Map2,
    Windowex,
    Error,
    Map3,
    Map4,
    Map5,
    Map6,
    Impossible,
}

impl Theme {
    pub const CYCLE: [Theme; 10] = [
        Theme::Day,
        Theme::Map1,
        Theme::Map2,
        Theme::Windowex,
        Theme::Error,
        Theme::Map3,
        Theme::Map4,
        Theme::Map5,
        Theme::Map6,
        Theme::Impossible,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Day => "day",
            Theme::Map1 => "map1",
            Theme::Map2 => "map2",
            Theme::Windowex => "windowex",
            Theme::Error => "error",
            Theme::Map3 => "map3",
            Theme::Map4 => "map4",
            Theme::Map5 => "map5",
            Theme::Map6 => "map6",
            Theme::Impossible => "impossible",
        }
    }

    /// Position of this theme in [`Theme::CYCLE`].
    pub fn index(self) -> usize {
        Self::CYCLE
            .iter()
            .position(|&t| t == self)
            .unwrap_or_default()
    }

    /// Theme for a score: one step every `step` points, wrapping after the last entry.
    pub fn for_score(score: u32, step: u32) -> Theme {
        let step = step.max(1);
        Self::CYCLE[(score / step) as usize % Self::CYCLE.len()]
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
