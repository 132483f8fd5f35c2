use serde::{Deserialize, Serialize};

use crate::ItemKind;

/// What a cell holds, fixed at generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellContent {
    /// Number of hazards and items on neighboring cells.
    Hint(u8),
    Hazard,
    Item(ItemKind),
}

impl CellContent {
    pub const fn is_hazard(self) -> bool {
        matches!(self, Self::Hazard)
    }

    pub const fn is_hint(self) -> bool {
        matches!(self, Self::Hint(_))
    }

    pub const fn collectible(self) -> Option<ItemKind> {
        match self {
            Self::Item(kind) if kind.is_collectible() => Some(kind),
            _ => None,
        }
    }
}

impl Default for CellContent {
    fn default() -> Self {
        Self::Hint(0)
    }
}

/// Something the generator puts on a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spawn {
    Hazard,
    Item(ItemKind),
}

impl From<Spawn> for CellContent {
    fn from(spawn: Spawn) -> Self {
        match spawn {
            Spawn::Hazard => Self::Hazard,
            Spawn::Item(kind) => Self::Item(kind),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Hidden,
    Flagged,
    Revealed,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Hidden
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub content: CellContent,
    pub visibility: Visibility,
    /// Only ever set on revealed collectible cells.
    pub collected: bool,
}

impl Cell {
    pub const fn new(content: CellContent) -> Self {
        Self {
            content,
            visibility: Visibility::Hidden,
            collected: false,
        }
    }

    pub const fn is_hidden(self) -> bool {
        matches!(self.visibility, Visibility::Hidden)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self.visibility, Visibility::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self.visibility, Visibility::Flagged)
    }

    /// Revealed collectible still waiting to be picked up.
    pub const fn is_pickable(self) -> bool {
        self.is_revealed() && !self.collected && self.content.collectible().is_some()
    }
}
