use std::ops::BitOr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use economy::*;
pub use error::*;
pub use event::*;
pub use generator::*;
pub use inventory::*;
pub use item::*;
pub use loadout::*;
pub use round::*;
pub use session::*;
pub use tile::*;
pub use types::*;

mod board;
mod economy;
mod engine;
mod error;
mod event;
mod generator;
mod inventory;
mod item;
mod loadout;
mod round;
mod session;
mod tile;
mod types;

/// Generated contents of a board before anyone touches it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    contents: Array2<CellContent>,
    hazard_count: CellCount,
}

impl BoardLayout {
    pub fn empty(size: Coord2) -> Self {
        Self {
            contents: Array2::default(size.to_nd_index()),
            hazard_count: 0,
        }
    }

    /// Places `spawns` in order, hints account for every one of them.
    pub fn from_spawns(size: Coord2, spawns: &[(Coord2, Spawn)]) -> Result<Self> {
        let mut layout = Self::empty(size);
        for &(coords, spawn) in spawns {
            let coords = layout.validate_coords(coords)?;
            if !layout.content_at(coords).is_hint() {
                return Err(GameError::CellOccupied);
            }
            layout.place(coords, spawn);
        }
        Ok(layout)
    }

    /// Puts `spawn` on a cell that still holds a hint and bumps neighboring hints.
    pub(crate) fn place(&mut self, coords: Coord2, spawn: Spawn) {
        self.contents[coords.to_nd_index()] = spawn.into();
        if spawn == Spawn::Hazard {
            self.hazard_count += 1;
        }
        for pos in self.contents.iter_neighbors(coords) {
            if let CellContent::Hint(count) = &mut self.contents[pos.to_nd_index()] {
                *count += 1;
            }
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.contents)
    }

    pub fn total_cells(&self) -> CellCount {
        self.contents.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn hazard_count(&self) -> CellCount {
        self.hazard_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.hazard_count
    }

    pub fn content_at(&self, coords: Coord2) -> CellContent {
        self.contents[coords.to_nd_index()]
    }

    pub(crate) fn into_contents(self) -> Array2<CellContent> {
        self.contents
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    /// A hazard was turned into a flag by a probe.
    Defused,
    /// A hazard went off but a jammer or worn item took it.
    Survived,
    HitHazard,
    Cleared,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    const fn rank(self) -> u8 {
        use RevealOutcome::*;
        match self {
            NoChange => 0,
            Revealed => 1,
            Defused => 2,
            Survived => 3,
            Cleared => 4,
            HitHazard => 5,
        }
    }
}

/// Merges outcomes of multi-cell actions, the most severe one wins.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        if rhs.rank() > self.rank() { rhs } else { self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_rejects_double_placement() {
        let spawns = [((1, 1), Spawn::Hazard), ((1, 1), Spawn::Item(ItemKind::Coin))];
        assert_eq!(
            BoardLayout::from_spawns((3, 3), &spawns),
            Err(GameError::CellOccupied)
        );
    }

    #[test]
    fn layout_rejects_out_of_bounds() {
        assert_eq!(
            BoardLayout::from_spawns((3, 3), &[((3, 0), Spawn::Hazard)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn hints_count_items_and_hazards_alike() {
        let layout = BoardLayout::from_spawns(
            (3, 3),
            &[
                ((0, 0), Spawn::Hazard),
                ((2, 0), Spawn::Item(ItemKind::Magnifier)),
            ],
        )
        .unwrap();

        assert_eq!(layout.content_at((1, 0)), CellContent::Hint(2));
        assert_eq!(layout.content_at((1, 1)), CellContent::Hint(2));
        assert_eq!(layout.content_at((0, 2)), CellContent::Hint(0));
        assert_eq!(layout.hazard_count(), 1);
        assert_eq!(layout.safe_cell_count(), 8);
    }

    #[test]
    fn severest_outcome_wins() {
        use RevealOutcome::*;

        assert_eq!(Revealed | HitHazard, HitHazard);
        assert_eq!(Cleared | Revealed, Cleared);
        assert_eq!(Defused | Revealed, Defused);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
