use serde::{Deserialize, Serialize};

use crate::*;

/// Things a renderer may want to animate, in the order they happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CellRevealed {
        coords: Coord2,
        content: CellContent,
    },
    CellFlagged(Coord2),
    CellUnflagged(Coord2),
    /// A magnifier probe turned a hazard into a flag.
    HazardDefused(Coord2),
    /// A neighboring jammer kept the hazard from going off.
    HazardJammed(Coord2),
    HazardAbsorbed {
        coords: Coord2,
        by: ItemKind,
        durability_left: u8,
    },
    PlayerDefeated(Coord2),
    BoardCleared {
        coins_earned: u32,
        jammers_refunded: u32,
    },
    ItemDiscovered(ItemKind),
    ItemCollected {
        coords: Coord2,
        kind: ItemKind,
    },
    JammerPlaced(Coord2),
    PlayerStateChanged(PlayerState),
}
