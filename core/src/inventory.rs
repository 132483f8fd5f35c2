use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::*;

/// Stock every item kind starts a run with.
pub const STARTING_STOCK: u32 = 100;

/// Metal scrap consumed to build one jammer.
pub const SCRAP_PER_JAMMER: u32 = 5;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub amount: u32,
    pub discovered: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    stock: BTreeMap<ItemKind, Stock>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_stock(STARTING_STOCK)
    }
}

impl Inventory {
    /// Every kind gets `amount`, only coins start out discovered.
    pub fn with_stock(amount: u32) -> Self {
        let stock = ItemKind::ALL
            .into_iter()
            .map(|kind| {
                let discovered = kind == ItemKind::Coin;
                (kind, Stock { amount, discovered })
            })
            .collect();
        Self { stock }
    }

    pub fn stock(&self, kind: ItemKind) -> Stock {
        self.stock.get(&kind).copied().unwrap_or_default()
    }

    pub fn amount(&self, kind: ItemKind) -> u32 {
        self.stock(kind).amount
    }

    pub fn is_discovered(&self, kind: ItemKind) -> bool {
        self.stock(kind).discovered
    }

    pub fn coins(&self) -> u32 {
        self.amount(ItemKind::Coin)
    }

    pub fn discovered(&self) -> impl Iterator<Item = ItemKind> + '_ {
        self.stock
            .iter()
            .filter(|(_, stock)| stock.discovered)
            .map(|(&kind, _)| kind)
    }

    /// Marks `kind` discovered, returns whether this is the first time.
    pub fn discover(&mut self, kind: ItemKind) -> bool {
        let stock = self.stock.entry(kind).or_default();
        let first = !stock.discovered;
        stock.discovered = true;
        if first {
            log::debug!("Discovered {kind:?}");
        }
        first
    }

    /// Adds one `kind` found on the board or bought, discovering it on the way.
    /// Returns whether the kind was discovered by this pick.
    pub fn pick(&mut self, kind: ItemKind) -> bool {
        self.deposit(kind, 1);
        self.discover(kind)
    }

    pub fn deposit(&mut self, kind: ItemKind, amount: u32) {
        let stock = self.stock.entry(kind).or_default();
        stock.amount = stock.amount.saturating_add(amount);
    }

    pub fn consume(&mut self, kind: ItemKind, amount: u32) -> Result<()> {
        let stock = self.stock.entry(kind).or_default();
        stock.amount = stock
            .amount
            .checked_sub(amount)
            .ok_or(GameError::OutOfStock(kind))?;
        Ok(())
    }

    pub fn spend_coins(&mut self, price: u32) -> Result<()> {
        let available = self.coins();
        if available < price {
            return Err(GameError::InsufficientCoins { price, available });
        }
        self.consume(ItemKind::Coin, price)
    }

    /// Turns five metal scrap into a jammer.
    pub fn craft_jammer(&mut self) -> Result<()> {
        if !self.is_discovered(ItemKind::MetalScrap) {
            return Err(GameError::NotDiscovered(ItemKind::MetalScrap));
        }
        self.consume(ItemKind::MetalScrap, SCRAP_PER_JAMMER)?;
        self.pick(ItemKind::Jammer);
        Ok(())
    }

    pub(crate) fn require_discovered(&self, kind: ItemKind) -> Result<()> {
        if self.is_discovered(kind) {
            Ok(())
        } else {
            Err(GameError::NotDiscovered(kind))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_coins_discovered() {
        let inventory = Inventory::default();

        assert_eq!(inventory.coins(), STARTING_STOCK);
        assert_eq!(inventory.amount(ItemKind::Armor), STARTING_STOCK);
        assert_eq!(inventory.discovered().collect::<Vec<_>>(), vec![ItemKind::Coin]);
    }

    #[test]
    fn pick_reports_first_discovery_only() {
        let mut inventory = Inventory::with_stock(0);

        assert!(inventory.pick(ItemKind::Magnifier));
        assert!(!inventory.pick(ItemKind::Magnifier));
        assert_eq!(inventory.amount(ItemKind::Magnifier), 2);
    }

    #[test]
    fn consume_never_goes_negative() {
        let mut inventory = Inventory::with_stock(1);

        inventory.consume(ItemKind::Shield, 1).unwrap();
        assert_eq!(
            inventory.consume(ItemKind::Shield, 1),
            Err(GameError::OutOfStock(ItemKind::Shield))
        );
        assert_eq!(inventory.amount(ItemKind::Shield), 0);
    }

    #[test]
    fn crafting_turns_scrap_into_a_jammer() {
        let mut inventory = Inventory::with_stock(0);
        inventory.deposit(ItemKind::MetalScrap, 7);
        inventory.discover(ItemKind::MetalScrap);

        inventory.craft_jammer().unwrap();

        assert_eq!(inventory.amount(ItemKind::MetalScrap), 2);
        assert_eq!(inventory.amount(ItemKind::Jammer), 1);
        assert!(inventory.is_discovered(ItemKind::Jammer));
        assert_eq!(
            inventory.craft_jammer(),
            Err(GameError::OutOfStock(ItemKind::MetalScrap))
        );
    }

    #[test]
    fn crafting_needs_discovered_scrap() {
        let mut inventory = Inventory::default();
        assert_eq!(
            inventory.craft_jammer(),
            Err(GameError::NotDiscovered(ItemKind::MetalScrap))
        );
    }

    #[test]
    fn spending_reports_shortfall() {
        let mut inventory = Inventory::with_stock(4);
        assert_eq!(
            inventory.spend_coins(10),
            Err(GameError::InsufficientCoins {
                price: 10,
                available: 4
            })
        );
        inventory.spend_coins(4).unwrap();
        assert_eq!(inventory.coins(), 0);
    }
}
