use serde::{Deserialize, Serialize};

/// Everything besides hazards that can sit on a cell or in the inventory.
///
/// Declaration order matters: spawn tables, placement and cumulative spawn bands
/// all walk kinds in this order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Coin,
    Magnifier,
    MetalScrap,
    Shield,
    Upgrader,
    BionicGlasses,
    Armor,
    Jammer,
    Rifle,
}

/// Which loadout slot an item goes into, if any.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    Active,
    Passive,
    /// Currency or crafting material, never equipped.
    Stock,
}

/// Sprite sheet used by renderers, the core only hands it out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpriteInfo {
    pub sheet: &'static str,
    pub frames: u8,
    pub fps: u8,
}

pub const HAZARD_SPRITE: SpriteInfo = SpriteInfo {
    sheet: "bomb_sheet",
    frames: 6,
    fps: 6,
};

impl ItemKind {
    pub const ALL: [ItemKind; 9] = [
        Self::Coin,
        Self::Magnifier,
        Self::MetalScrap,
        Self::Shield,
        Self::Upgrader,
        Self::BionicGlasses,
        Self::Armor,
        Self::Jammer,
        Self::Rifle,
    ];

    pub const fn slot(self) -> SlotKind {
        use ItemKind::*;
        match self {
            Coin | MetalScrap => SlotKind::Stock,
            Shield | Armor => SlotKind::Passive,
            Magnifier | Upgrader | BionicGlasses | Jammer | Rifle => SlotKind::Active,
        }
    }

    /// Hazards a passive item absorbs before it breaks.
    pub const fn durability(self) -> Option<u8> {
        match self {
            Self::Shield => Some(1),
            Self::Armor => Some(2),
            _ => None,
        }
    }

    pub const fn upgrade(self) -> Option<ItemKind> {
        match self {
            Self::Magnifier => Some(Self::BionicGlasses),
            Self::Shield => Some(Self::Armor),
            _ => None,
        }
    }

    /// Whether a revealed cell holding this kind can be picked up. Jammers on the
    /// board are markers placed by the player, not loot.
    pub const fn is_collectible(self) -> bool {
        !matches!(self, Self::Jammer)
    }

    pub const fn sprite(self) -> SpriteInfo {
        use ItemKind::*;
        let (sheet, frames, fps) = match self {
            Coin => ("coin_sheet", 7, 20),
            Magnifier => ("magnifier", 1, 20),
            MetalScrap => ("metal_scrap", 1, 20),
            Shield => ("shield", 1, 20),
            Upgrader => ("upgrader", 1, 15),
            BionicGlasses => ("bionic_glasses", 1, 20),
            Armor => ("armor", 1, 20),
            Jammer => ("jammer_sheet", 14, 20),
            Rifle => ("rifle_sheet", 10, 20),
        };
        SpriteInfo { sheet, frames, fps }
    }

    /// Single character used by text renderings.
    pub const fn symbol(self) -> char {
        use ItemKind::*;
        match self {
            Coin => 'c',
            Magnifier => 'm',
            MetalScrap => 's',
            Shield => 'd',
            Upgrader => 'u',
            BionicGlasses => 'g',
            Armor => 'a',
            Jammer => 'j',
            Rifle => 'r',
        }
    }

    pub const fn name(self) -> &'static str {
        use ItemKind::*;
        match self {
            Coin => "coin",
            Magnifier => "magnifier",
            MetalScrap => "metal_scrap",
            Shield => "shield",
            Upgrader => "upgrader",
            BionicGlasses => "bionic_glasses",
            Armor => "armor",
            Jammer => "jammer",
            Rifle => "rifle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Hazard density and item weights for one of the scripted rounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpawnTable {
    pub hazard_percent: u8,
    /// Percent weights in declaration order, they add up to at most 100.
    pub weights: &'static [(ItemKind, u8)],
}

const SPAWN_TABLES: [SpawnTable; 4] = [
    SpawnTable {
        hazard_percent: 10,
        weights: &[
            (ItemKind::Coin, 0),
            (ItemKind::Magnifier, 0),
            (ItemKind::MetalScrap, 0),
            (ItemKind::Shield, 0),
        ],
    },
    SpawnTable {
        hazard_percent: 15,
        weights: &[
            (ItemKind::Coin, 100),
            (ItemKind::Magnifier, 0),
            (ItemKind::MetalScrap, 0),
            (ItemKind::Shield, 0),
        ],
    },
    SpawnTable {
        hazard_percent: 16,
        weights: &[
            (ItemKind::Coin, 65),
            (ItemKind::Magnifier, 20),
            (ItemKind::MetalScrap, 15),
            (ItemKind::Shield, 0),
        ],
    },
    SpawnTable {
        hazard_percent: 19,
        weights: &[
            (ItemKind::Coin, 63),
            (ItemKind::Magnifier, 15),
            (ItemKind::MetalScrap, 15),
            (ItemKind::Shield, 7),
        ],
    },
];

/// Last round with its own table, later rounds extrapolate from it.
pub const LAST_SCRIPTED_ROUND: u32 = SPAWN_TABLES.len() as u32;

/// Spawn table for `round`, rounds past the scripted ones reuse the last table.
pub fn spawn_table(round: u32) -> &'static SpawnTable {
    let index = round.clamp(1, LAST_SCRIPTED_ROUND) - 1;
    &SPAWN_TABLES[index as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_never_exceed_one_hundred() {
        for round in 1..=LAST_SCRIPTED_ROUND {
            let total: u32 = spawn_table(round)
                .weights
                .iter()
                .map(|&(_, weight)| u32::from(weight))
                .sum();
            assert!(total <= 100, "round {round} weights sum to {total}");
        }
    }

    #[test]
    fn later_rounds_reuse_last_table() {
        assert_eq!(spawn_table(9), spawn_table(LAST_SCRIPTED_ROUND));
        assert_eq!(spawn_table(3).hazard_percent, 16);
    }

    #[test]
    fn upgrades_only_lead_to_equippable_items() {
        assert_eq!(ItemKind::Magnifier.upgrade(), Some(ItemKind::BionicGlasses));
        assert_eq!(ItemKind::Shield.upgrade(), Some(ItemKind::Armor));
        assert_eq!(ItemKind::Armor.upgrade(), None);
        assert_eq!(ItemKind::Armor.durability(), Some(2));
    }

    #[test]
    fn names_resolve_back_to_kinds() {
        for kind in ItemKind::ALL {
            assert_eq!(ItemKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ItemKind::from_name("bomb"), None);
    }
}
