use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::*;

/// Numerator of the speed bonus, paid out over elapsed deciseconds.
const SPEED_BONUS: u32 = 2000;

/// Rounds before this one chain straight into another board.
pub const FIRST_TRADING_ROUND: Round = 3;

/// Coins paid for clearing a board of `round` after `elapsed`.
pub fn coins_for_clear(elapsed: Duration, round: Round) -> u32 {
    let deciseconds = (elapsed.as_millis() / 100).clamp(1, u128::from(u32::MAX)) as u32;
    SPEED_BONUS / deciseconds + round
}

/// Where the run goes after a cleared board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundTransition {
    NextGrid,
    Trading,
}

impl RoundTransition {
    pub const fn after(round: Round) -> Self {
        if round < FIRST_TRADING_ROUND {
            Self::NextGrid
        } else {
            Self::Trading
        }
    }
}

/// Sells a fixed catalog for coins between rounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trader {
    prices: Vec<(ItemKind, u32)>,
}

impl Default for Trader {
    fn default() -> Self {
        Self {
            prices: vec![
                (ItemKind::Magnifier, 10),
                (ItemKind::Shield, 10),
                (ItemKind::Upgrader, 10),
            ],
        }
    }
}

impl Trader {
    pub fn price(&self, kind: ItemKind) -> Option<u32> {
        self.prices
            .iter()
            .find(|&&(item, _)| item == kind)
            .map(|&(_, price)| price)
    }

    pub fn catalog(&self) -> &[(ItemKind, u32)] {
        &self.prices
    }

    /// Charges the price and hands over one `kind`.
    pub fn buy(&self, kind: ItemKind, inventory: &mut Inventory) -> Result<()> {
        let price = self.price(kind).ok_or(GameError::NotForSale(kind))?;
        inventory.spend_coins(price)?;
        inventory.pick(kind);
        log::debug!("Bought {kind:?} for {price} coins");
        Ok(())
    }
}
