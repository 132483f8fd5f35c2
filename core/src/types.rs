use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for hazard counts, quotas and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// One-based round index.
pub type Round = u32;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Board size of an `Array2` indexed by [`Coord2`].
pub fn grid_size<T>(grid: &Array2<T>) -> Coord2 {
    let (x, y) = grid.dim();
    (
        x.try_into().unwrap_or(Coord::MAX),
        y.try_into().unwrap_or(Coord::MAX),
    )
}

pub fn in_bounds(coords: Coord2, size: Coord2) -> bool {
    coords.0 < size.0 && coords.1 < size.1
}

/// Row-major scan of every coordinate of a board of the given size.
pub fn iter_coords((size_x, size_y): Coord2) -> impl Iterator<Item = Coord2> {
    (0..size_y).flat_map(move |y| (0..size_x).map(move |x| (x, y)))
}

pub trait NeighborIterExt {
    /// The up-to-8 cells touching `center`.
    fn iter_neighbors(&self, center: Coord2) -> NeighborIter;

    /// `center` followed by its neighbors, the 3x3 block clipped to the board.
    fn iter_neighborhood(&self, center: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, center: Coord2) -> NeighborIter {
        NeighborIter::new(center, grid_size(self), false)
    }

    fn iter_neighborhood(&self, center: Coord2) -> NeighborIter {
        NeighborIter::new(center, grid_size(self), true)
    }
}

// row by row, top to bottom
const DISPLACEMENTS: [(i8, i8); 9] = [
    (0, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

fn offset(coords: Coord2, (dx, dy): (i8, i8), (max_x, max_y): Coord2) -> Option<Coord2> {
    let x = coords.0.checked_add_signed(dx)?;
    let y = coords.1.checked_add_signed(dy)?;
    (x < max_x && y < max_y).then_some((x, y))
}

#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: usize,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2, include_center: bool) -> Self {
        Self {
            center,
            bounds,
            index: if include_center { 0 } else { 1 },
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = DISPLACEMENTS.get(self.index) {
            self.index += 1;
            if let Some(coords) = offset(self.center, delta, self.bounds) {
                return Some(coords);
            }
        }
        None
    }
}

/// Python-style `round()`: halfway values go to the even neighbor.
pub(crate) fn round_half_even(value: f64) -> CellCount {
    value.round_ties_even().clamp(0.0, CellCount::MAX as f64) as CellCount
}

/// `round(count * percent / 100)`.
pub(crate) fn percent_of(count: CellCount, percent: u8) -> CellCount {
    round_half_even(f64::from(count) * f64::from(percent) / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = NeighborIter::new((0, 0), (4, 4), false).collect();
        assert_eq!(neighbors, vec![(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn neighborhood_starts_with_center() {
        let block: Vec<_> = NeighborIter::new((1, 1), (3, 3), true).collect();
        assert_eq!(block.len(), 9);
        assert_eq!(block[0], (1, 1));
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        assert_eq!(NeighborIter::new((0, 0), (1, 1), false).count(), 0);
    }

    #[test]
    fn rounding_matches_banker_rounding() {
        assert_eq!(round_half_even(2.5), 2);
        assert_eq!(round_half_even(3.5), 4);
        assert_eq!(percent_of(324, 10), 32);
        assert_eq!(percent_of(25, 10), 2);
        assert_eq!(percent_of(15, 10), 2);
    }

    #[test]
    fn coords_are_scanned_row_major() {
        let coords: Vec<_> = iter_coords((2, 2)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }
}
