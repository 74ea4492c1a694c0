//! Sparse height map.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::game::{Direction, Point};

/// Height at which a cell is complete; nobody may stand or build on it.
pub const FINAL_HEIGHT: u8 = 4;

/// The playing surface.
///
/// Only cells created during setup exist. A missing cell is off the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    /// Height per existing cell.
    heights: HashMap<Point, u8>,
    /// One past the largest coordinate present.
    size: i32,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from a list of cells, all at height 0.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let mut board = Self::new();
        for point in points {
            board.create(point);
        }
        board
    }

    /// Add a cell at height 0 and grow `size` to cover it.
    pub fn create(&mut self, point: Point) {
        self.heights.insert(point, 0);
        let needed = point.x.max(point.y) + 1;
        if needed > self.size {
            self.size = needed;
        }
    }

    /// Height of a cell, or `None` if it is off the map.
    #[must_use]
    #[inline]
    pub fn height(&self, point: Point) -> Option<u8> {
        self.heights.get(&point).copied()
    }

    /// Whether the cell exists.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.heights.contains_key(&point)
    }

    /// Raise a cell by one level.
    ///
    /// Callers validate the height bound beforehand. Raising a missing cell
    /// is ignored and reported as `false`.
    pub fn raise(&mut self, point: Point) -> bool {
        match self.heights.get_mut(&point) {
            Some(height) => {
                *height += 1;
                true
            }
            None => false,
        }
    }

    /// One past the largest coordinate present, used to bound rendering.
    #[must_use]
    pub const fn size(&self) -> i32 {
        self.size
    }

    /// Number of existing cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether no cell exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// All existing cells sorted by `x` then `y`.
    #[must_use]
    pub fn sorted_points(&self) -> Vec<Point> {
        let mut points: Vec<Point> = self.heights.keys().copied().collect();
        points.sort_unstable();
        points
    }

    /// Iterate over cells and heights in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, u8)> + '_ {
        self.heights.iter().map(|(&p, &h)| (p, h))
    }

    /// Render row `y`: a digit per existing cell, `.` for holes.
    #[must_use]
    pub fn render_row(&self, y: i32) -> String {
        (0..self.size)
            .map(|x| match self.height(Point::new(x, y)) {
                Some(h) => char::from(b'0' + h),
                None => '.',
            })
            .collect()
    }

    /// Render every row from 0 to `size - 1`.
    #[must_use]
    pub fn render_rows(&self) -> Vec<String> {
        (0..self.size).map(|y| self.render_row(y)).collect()
    }

    /// Count connected regions under 8-way adjacency.
    ///
    /// Works on any shape; each call is a fresh breadth-first search.
    #[must_use]
    pub fn count_islands(&self) -> usize {
        let mut visited: HashSet<Point> = HashSet::with_capacity(self.heights.len());
        let mut islands = 0;

        for start in self.sorted_points() {
            if visited.contains(&start) {
                continue;
            }
            islands += 1;
            visited.insert(start);
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for direction in Direction::ALL {
                    let next = current.neighbor(direction);
                    if self.contains(next) && visited.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        islands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(n: i32) -> Board {
        Board::from_points((0..n).flat_map(|y| (0..n).map(move |x| Point::new(x, y))))
    }

    #[test]
    fn test_create_extends_size() {
        let mut board = Board::new();
        assert_eq!(board.size(), 0);
        board.create(Point::new(2, 0));
        assert_eq!(board.size(), 3);
        board.create(Point::new(0, 4));
        assert_eq!(board.size(), 5);
        board.create(Point::new(1, 1));
        assert_eq!(board.size(), 5);
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_height_and_raise() {
        let mut board = square(3);
        let p = Point::new(1, 1);
        assert_eq!(board.height(p), Some(0));
        assert!(board.raise(p));
        assert!(board.raise(p));
        assert_eq!(board.height(p), Some(2));
        assert_eq!(board.height(Point::new(-1, 0)), None);
        assert!(!board.raise(Point::new(7, 7)));
    }

    #[test]
    fn test_render_rows_with_holes() {
        let mut board = Board::from_points([Point::new(0, 0), Point::new(2, 0), Point::new(1, 1)]);
        board.raise(Point::new(2, 0));
        assert_eq!(board.render_rows(), vec!["0.1".to_string(), ".0.".to_string(), "...".to_string()]);
    }

    #[test]
    fn test_islands_square() {
        assert_eq!(square(5).count_islands(), 1);
        assert_eq!(Board::new().count_islands(), 0);
    }

    #[test]
    fn test_islands_diagonal_contact_connects() {
        let board = Board::from_points([Point::new(0, 0), Point::new(1, 1), Point::new(2, 2)]);
        assert_eq!(board.count_islands(), 1);
    }

    #[test]
    fn test_islands_irregular_shapes() {
        // A U shape whose arms only meet through the bottom row.
        let mut points = vec![];
        for y in 0..5 {
            points.push(Point::new(0, y));
            points.push(Point::new(4, y));
        }
        for x in 1..4 {
            points.push(Point::new(x, 4));
        }
        let board = Board::from_points(points.clone());
        assert_eq!(board.count_islands(), 1);

        // Cutting the bottom row leaves two arms.
        let board = Board::from_points(points.into_iter().filter(|p| *p != Point::new(2, 4)));
        assert_eq!(board.count_islands(), 2);

        let board = Board::from_points([Point::new(0, 0), Point::new(2, 0), Point::new(4, 0)]);
        assert_eq!(board.count_islands(), 3);
    }
}
