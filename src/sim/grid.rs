//! Grid geometry: positions, headings and free-cell sampling.

use std::collections::HashSet;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;

/// A cell on the board. Valid cells are in `0..GRID_SIZE` on both axes.
pub type Position = IVec2;

/// Rejection-sampling attempts before scanning for free cells
const MAX_SAMPLE_TRIES: u32 = 100;

/// Heading of a snake. Grid y grows downward, so `Up` is -y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step for one tick of movement.
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// True when `other` is the 180-degree reversal of `self`.
    pub fn is_opposite(self, other: Direction) -> bool {
        self.delta() + other.delta() == IVec2::ZERO
    }
}

/// True when `pos` lies outside the board.
pub fn wall_collision(pos: Position) -> bool {
    pos.x < 0 || pos.x >= GRID_SIZE || pos.y < 0 || pos.y >= GRID_SIZE
}

/// True when `pos` equals any cell in `cells`.
pub fn hits_any(pos: Position, cells: &[Position]) -> bool {
    cells.iter().any(|c| *c == pos)
}

/// Chebyshev distance between two cells.
pub fn chebyshev(a: Position, b: Position) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Collects every cell covered by the given position groups.
pub fn occupied_cells<'a, I>(groups: I) -> HashSet<Position>
where
    I: IntoIterator<Item = &'a [Position]>,
{
    groups.into_iter().flatten().copied().collect()
}

/// Uniformly samples a cell not in `occupied`.
///
/// Rejection-samples a bounded number of times, then falls back to an
/// explicit scan of the remaining free cells. Returns `None` only when
/// the board is completely full.
pub fn random_free_cell<R: Rng>(rng: &mut R, occupied: &HashSet<Position>) -> Option<Position> {
    for _ in 0..MAX_SAMPLE_TRIES {
        let pos = IVec2::new(
            rng.random_range(0..GRID_SIZE),
            rng.random_range(0..GRID_SIZE),
        );
        if !occupied.contains(&pos) {
            return Some(pos);
        }
    }
    let free: Vec<Position> = (0..GRID_SIZE)
        .flat_map(|y| (0..GRID_SIZE).map(move |x| IVec2::new(x, y)))
        .filter(|pos| !occupied.contains(pos))
        .collect();
    if free.is_empty() {
        None
    } else {
        Some(free[rng.random_range(0..free.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Up.is_opposite(Direction::Up));
    }

    #[test]
    fn test_wall_collision_bounds() {
        assert!(!wall_collision(IVec2::new(0, 0)));
        assert!(!wall_collision(IVec2::new(GRID_SIZE - 1, GRID_SIZE - 1)));
        assert!(wall_collision(IVec2::new(-1, 5)));
        assert!(wall_collision(IVec2::new(5, -1)));
        assert!(wall_collision(IVec2::new(GRID_SIZE, 5)));
        assert!(wall_collision(IVec2::new(5, GRID_SIZE)));
    }

    #[test]
    fn test_chebyshev() {
        assert_eq!(chebyshev(IVec2::new(3, 3), IVec2::new(3, 3)), 0);
        assert_eq!(chebyshev(IVec2::new(0, 0), IVec2::new(2, 1)), 2);
        assert_eq!(chebyshev(IVec2::new(5, 5), IVec2::new(4, 6)), 1);
    }

    #[test]
    fn test_random_free_cell_avoids_occupied() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut occupied = HashSet::new();
        for x in 0..GRID_SIZE {
            occupied.insert(IVec2::new(x, 0));
        }
        for _ in 0..200 {
            let pos = random_free_cell(&mut rng, &occupied).unwrap();
            assert!(!occupied.contains(&pos));
            assert!(!wall_collision(pos));
        }
    }

    #[test]
    fn test_random_free_cell_finds_last_gap() {
        // Everything filled except one cell, so rejection sampling is
        // overwhelmingly likely to exhaust and hit the fallback scan.
        let mut rng = Pcg32::seed_from_u64(7);
        let gap = IVec2::new(13, 9);
        let mut occupied = HashSet::new();
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let pos = IVec2::new(x, y);
                if pos != gap {
                    occupied.insert(pos);
                }
            }
        }
        assert_eq!(random_free_cell(&mut rng, &occupied), Some(gap));
    }

    #[test]
    fn test_random_free_cell_full_board() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut occupied = HashSet::new();
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                occupied.insert(IVec2::new(x, y));
            }
        }
        assert_eq!(random_free_cell(&mut rng, &occupied), None);
    }
}
