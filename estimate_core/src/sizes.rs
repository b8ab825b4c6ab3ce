//! # Room Size Parsing
//!
//! Room, bathroom and kitchen dimensions arrive as free-form text such as
//! `"12x12, 10 X 14"`. Parsing is lenient: a malformed token is skipped and
//! counted, never an error. Callers decide what an empty list means.
//!
//! ```rust
//! use estimate_core::sizes::parse_sizes;
//!
//! let parsed = parse_sizes("12x12, 10 X 14, bogus, 9x");
//! assert_eq!(parsed.sizes.len(), 2);
//! assert_eq!(parsed.dropped, 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::units::{Feet, SqFt};

/// Wall height used for every wall-area takeoff (ft)
pub const WALL_HEIGHT_FT: f64 = 9.0;

/// A rectangular space in plan, dimensions in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomSize {
    pub length_ft: f64,
    pub width_ft: f64,
}

impl RoomSize {
    pub const fn new(length_ft: f64, width_ft: f64) -> Self {
        RoomSize { length_ft, width_ft }
    }

    /// Perimeter 2(L + W)
    pub fn perimeter_ft(&self) -> Feet {
        Feet(2.0 * (self.length_ft + self.width_ft))
    }

    /// Plan area L × W
    pub fn area(&self) -> SqFt {
        Feet(self.length_ft) * Feet(self.width_ft)
    }

    /// Wall area for one storey: perimeter × 9 ft
    pub fn wall_area(&self) -> SqFt {
        self.perimeter_ft() * Feet(WALL_HEIGHT_FT)
    }
}

/// Output of [`parse_sizes`]: the parsed rectangles plus how many
/// non-empty tokens were rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSizes {
    pub sizes: Vec<RoomSize>,
    pub dropped: usize,
}

impl ParsedSizes {
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// `count` spaces of `size` when nothing parsed.
    pub fn or_repeat(self, size: RoomSize, count: u32) -> SpaceList {
        if self.sizes.is_empty() {
            SpaceList::Repeated { size, count }
        } else {
            SpaceList::Listed(self.sizes)
        }
    }
}

/// Spaces of one kind for a takeoff: the parsed list, or a default size
/// repeated. Repeats are summed arithmetically, never expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceList {
    Listed(Vec<RoomSize>),
    Repeated { size: RoomSize, count: u32 },
}

impl SpaceList {
    pub fn len(&self) -> u64 {
        match self {
            SpaceList::Listed(sizes) => sizes.len() as u64,
            SpaceList::Repeated { count, .. } => u64::from(*count),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Σ wall area, one storey
    pub fn wall_area(&self) -> SqFt {
        match self {
            SpaceList::Listed(sizes) => total_wall_area(sizes),
            SpaceList::Repeated { size, count } => size.wall_area() * f64::from(*count),
        }
    }

    /// Σ plan area, one storey
    pub fn area(&self) -> SqFt {
        match self {
            SpaceList::Listed(sizes) => total_area(sizes),
            SpaceList::Repeated { size, count } => size.area() * f64::from(*count),
        }
    }
}

fn parse_token(token: &str) -> Option<RoomSize> {
    let mut parts = token.split('x');
    let length = parts.next()?.parse::<f64>().ok()?;
    let width = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(RoomSize::new(length, width))
}

/// Parse a comma-separated list of `LxW` dimensions in feet.
///
/// Tokens are lower-cased and stripped of all whitespace before parsing, so
/// `"10 X 14"` reads as `10x14`. Empty tokens are ignored outright; anything
/// else that fails to parse is counted in [`ParsedSizes::dropped`].
pub fn parse_sizes(input: &str) -> ParsedSizes {
    let mut parsed = ParsedSizes::default();
    for raw in input.split(',') {
        let token: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        if token.is_empty() {
            continue;
        }
        match parse_token(&token) {
            Some(size) => parsed.sizes.push(size),
            None => parsed.dropped += 1,
        }
    }
    if parsed.dropped > 0 {
        tracing::debug!(input = %input, dropped = parsed.dropped, "skipped malformed size tokens");
    }
    parsed
}

/// Count non-empty comma-separated entries without parsing them.
///
/// Plumbing, electrical and doors/windows derive their bathroom and kitchen
/// counts this way, so a malformed entry still counts as a space.
pub fn count_entries(input: &str) -> u32 {
    input.split(',').filter(|t| !t.trim().is_empty()).count() as u32
}

/// Σ wall area over a set of rectangles, one storey.
pub fn total_wall_area(sizes: &[RoomSize]) -> SqFt {
    sizes.iter().fold(SqFt(0.0), |acc, s| acc + s.wall_area())
}

/// Σ plan area over a set of rectangles, one storey.
pub fn total_area(sizes: &[RoomSize]) -> SqFt {
    sizes.iter().fold(SqFt(0.0), |acc, s| acc + s.area())
}
