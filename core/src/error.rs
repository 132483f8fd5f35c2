use thiserror::Error;

use crate::ItemKind;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Cell already holds a hazard or an item")]
    CellOccupied,
    #[error("Round already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("No player state for loadout {active:?} / {passive:?}")]
    UndefinedLoadout {
        active: Option<ItemKind>,
        passive: Option<ItemKind>,
    },
    #[error("{0:?} cannot be equipped in that slot")]
    NotEquippable(ItemKind),
    #[error("{0:?} has not been discovered yet")]
    NotDiscovered(ItemKind),
    #[error("Not enough {0:?} in stock")]
    OutOfStock(ItemKind),
    #[error("{0:?} has no upgrade")]
    NotUpgradable(ItemKind),
    #[error("Upgrader must be equipped to upgrade items")]
    UpgraderNotEquipped,
    #[error("Jammer must be equipped to place a marker")]
    JammerNotEquipped,
    #[error("Price is {price} coins but only {available} available")]
    InsufficientCoins { price: u32, available: u32 },
    #[error("{0:?} is not sold by the trader")]
    NotForSale(ItemKind),
    #[error("Board has not been generated yet")]
    BoardNotStarted,
    #[error("Round is not cleared yet")]
    RoundNotCleared,
    #[error("Action is not available in the current phase")]
    WrongPhase,
}

pub type Result<T> = core::result::Result<T, GameError>;
