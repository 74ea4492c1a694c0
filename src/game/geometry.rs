//! Compass directions and grid points.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A cell coordinate on the board.
///
/// Coordinates are signed so that neighbours of edge cells can be expressed
/// and then rejected by a board lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row).
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance to another point.
    #[must_use]
    pub fn distance(self, other: Point) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// The adjacent point in the given direction.
    #[must_use]
    pub const fn neighbor(self, direction: Direction) -> Point {
        let (dx, dy) = direction.delta();
        Point::new(self.x + dx, self.y + dy)
    }

    /// Reflect across the vertical axis of a square of the given size.
    #[must_use]
    pub const fn mirrored(self, size: i32) -> Point {
        Point::new(size - 1 - self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// One of the eight compass directions.
///
/// North is towards row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// North-west.
    NW,
    /// North.
    N,
    /// North-east.
    NE,
    /// West.
    W,
    /// East.
    E,
    /// South-west.
    SW,
    /// South.
    S,
    /// South-east.
    SE,
}

/// Offsets indexed by `Direction as usize`.
const DELTAS: [(i32, i32); 8] = [
    (-1, -1), // NW
    (0, -1),  // N
    (1, -1),  // NE
    (-1, 0),  // W
    (1, 0),   // E
    (-1, 1),  // SW
    (0, 1),   // S
    (1, 1),   // SE
];

impl Direction {
    /// All directions in declaration order.
    pub const ALL: [Direction; 8] = [
        Direction::NW,
        Direction::N,
        Direction::NE,
        Direction::W,
        Direction::E,
        Direction::SW,
        Direction::S,
        Direction::SE,
    ];

    /// The `(dx, dy)` offset of this direction.
    #[must_use]
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        DELTAS[self as usize]
    }

    /// Wire token for this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::NW => "NW",
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::W => "W",
            Direction::E => "E",
            Direction::SW => "SW",
            Direction::S => "S",
            Direction::SE => "SE",
        }
    }

    /// Whether a unit pushed in `self` may land in `land`.
    ///
    /// A diagonal push lands on itself or one of its two orthogonal parts.
    /// An orthogonal push lands on any direction containing it.
    #[must_use]
    pub const fn can_land(self, land: Direction) -> bool {
        let (px, py) = self.delta();
        let (lx, ly) = land.delta();
        if px != 0 && py != 0 {
            (lx == px || lx == 0) && (ly == py || ly == 0)
        } else if px == 0 {
            ly == py
        } else {
            lx == px
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a direction token is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction: {0}")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    /// Parse a direction token, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDirection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_chebyshev() {
        let a = Point::new(1, 1);
        assert_eq!(a.distance(Point::new(1, 1)), 0);
        assert_eq!(a.distance(Point::new(2, 2)), 1);
        assert_eq!(a.distance(Point::new(4, 2)), 3);
        assert_eq!(a.distance(Point::new(0, -3)), 4);
    }

    #[test]
    fn test_neighbor_offsets() {
        let p = Point::new(3, 3);
        assert_eq!(p.neighbor(Direction::N), Point::new(3, 2));
        assert_eq!(p.neighbor(Direction::S), Point::new(3, 4));
        assert_eq!(p.neighbor(Direction::E), Point::new(4, 3));
        assert_eq!(p.neighbor(Direction::W), Point::new(2, 3));
        assert_eq!(p.neighbor(Direction::NE), Point::new(4, 2));
        assert_eq!(p.neighbor(Direction::SW), Point::new(2, 4));
        for d in Direction::ALL {
            assert_eq!(p.distance(p.neighbor(d)), 1);
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("ne".parse::<Direction>(), Ok(Direction::NE));
        assert_eq!("Sw".parse::<Direction>(), Ok(Direction::SW));
        assert_eq!("N".parse::<Direction>(), Ok(Direction::N));
        assert!("NN".parse::<Direction>().is_err());
        assert!("".parse::<Direction>().is_err());
    }

    #[test]
    fn test_mirror() {
        assert_eq!(Point::new(0, 2).mirrored(5), Point::new(4, 2));
        assert_eq!(Point::new(2, 2).mirrored(5), Point::new(2, 2));
    }

    #[test]
    fn test_push_landing_orthogonal() {
        use Direction::*;
        let allowed: Vec<Direction> = Direction::ALL.into_iter().filter(|&l| N.can_land(l)).collect();
        assert_eq!(allowed, vec![NW, N, NE]);
        let allowed: Vec<Direction> = Direction::ALL.into_iter().filter(|&l| E.can_land(l)).collect();
        assert_eq!(allowed, vec![NE, E, SE]);
        let allowed: Vec<Direction> = Direction::ALL.into_iter().filter(|&l| S.can_land(l)).collect();
        assert_eq!(allowed, vec![SW, S, SE]);
        let allowed: Vec<Direction> = Direction::ALL.into_iter().filter(|&l| W.can_land(l)).collect();
        assert_eq!(allowed, vec![NW, W, SW]);
    }

    #[test]
    fn test_push_landing_diagonal() {
        use Direction::*;
        let allowed: Vec<Direction> = Direction::ALL.into_iter().filter(|&l| NE.can_land(l)).collect();
        assert_eq!(allowed, vec![N, NE, E]);
        let allowed: Vec<Direction> = Direction::ALL.into_iter().filter(|&l| SW.can_land(l)).collect();
        assert_eq!(allowed, vec![W, SW, S]);
        assert!(!NE.can_land(NW));
        assert!(!NE.can_land(SW));
    }

    #[test]
    fn test_push_never_lands_backwards() {
        for push in Direction::ALL {
            let (px, py) = push.delta();
            for land in Direction::ALL {
                let (lx, ly) = land.delta();
                if push.can_land(land) {
                    assert!(px * lx + py * ly > 0, "{push} -> {land}");
                }
            }
        }
    }
}
