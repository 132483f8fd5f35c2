use serde::{Deserialize, Serialize};

use crate::*;

/// Presentation and behavior state derived from what the player is wearing.
///
/// The discriminants are the row indices of the player sprite sheet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerState {
    Inactive = 1,
    Magnifier = 2,
    MagnifierShield = 3,
    MagnifierArmor = 4,
    Glasses = 5,
    GlassesShield = 6,
    Shield = 7,
    GlassesArmor = 8,
    Armor = 9,
    Rifle = 10,
    RifleArmor = 11,
    Upgrader = 12,
    UpgraderShield = 13,
    UpgraderArmor = 14,
    Exploded = 15,
}

impl PlayerState {
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Total over every slot combination, `None` for pairs with no sprite row.
    pub const fn from_slots(active: Option<ItemKind>, passive: Option<ItemKind>) -> Option<Self> {
        use ItemKind as K;
        use PlayerState::*;
        Some(match (active, passive) {
            (None, None) => Inactive,
            (Some(K::Magnifier), None) => Magnifier,
            (Some(K::Magnifier), Some(K::Shield)) => MagnifierShield,
            (Some(K::Magnifier), Some(K::Armor)) => MagnifierArmor,
            (Some(K::BionicGlasses), None) => Glasses,
            (Some(K::BionicGlasses), Some(K::Shield)) => GlassesShield,
            (None, Some(K::Shield)) => Shield,
            (Some(K::BionicGlasses), Some(K::Armor)) => GlassesArmor,
            (None, Some(K::Armor)) => Armor,
            (Some(K::Rifle), None) => Rifle,
            (Some(K::Rifle), Some(K::Armor)) => RifleArmor,
            (Some(K::Upgrader), None) => Upgrader,
            (Some(K::Upgrader), Some(K::Shield)) => UpgraderShield,
            (Some(K::Upgrader), Some(K::Armor)) => UpgraderArmor,
            _ => return None,
        })
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::Inactive
    }
}

/// Equipped passive item and how many more hazards it can take.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveSlot {
    pub kind: ItemKind,
    pub durability: u8,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLoadout {
    active: Option<ItemKind>,
    passive: Option<PassiveSlot>,
}

impl PlayerLoadout {
    pub fn active(&self) -> Option<ItemKind> {
        self.active
    }

    pub fn passive(&self) -> Option<ItemKind> {
        self.passive.map(|slot| slot.kind)
    }

    pub fn passive_slot(&self) -> Option<PassiveSlot> {
        self.passive
    }

    pub fn composite_state(&self) -> Result<PlayerState> {
        PlayerState::from_slots(self.active(), self.passive()).ok_or(GameError::UndefinedLoadout {
            active: self.active(),
            passive: self.passive(),
        })
    }

    pub(crate) fn take_active(&mut self) -> Option<ItemKind> {
        self.active.take()
    }

    /// Spends one durability point of the passive item, dropping it once worn out.
    /// Returns the absorbing kind and the durability left.
    pub(crate) fn absorb_hit(&mut self) -> Option<(ItemKind, u8)> {
        let slot = self.passive.as_mut()?;
        slot.durability = slot.durability.saturating_sub(1);
        let hit = (slot.kind, slot.durability);
        if slot.durability == 0 {
            self.passive = None;
        }
        Some(hit)
    }
}

/// Outcome of an equip or unequip request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EquipOutcome {
    NoChange,
    Equipped,
    Unequipped,
}

impl EquipOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Everything the player carries between boards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub inventory: Inventory,
    loadout: PlayerLoadout,
    state: PlayerState,
}

impl Player {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inventory,
            loadout: PlayerLoadout::default(),
            state: PlayerState::Inactive,
        }
    }

    pub fn loadout(&self) -> &PlayerLoadout {
        &self.loadout
    }

    /// Last valid composite state, or `Exploded` after a defeat.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_defeated(&self) -> bool {
        self.state == PlayerState::Exploded
    }

    pub fn equip_active(&mut self, kind: ItemKind) -> Result<EquipOutcome> {
        if kind.slot() != SlotKind::Active {
            return Err(GameError::NotEquippable(kind));
        }
        self.inventory.require_discovered(kind)?;

        if self.loadout.active == Some(kind) {
            self.inventory.deposit(kind, 1);
            self.loadout.active = None;
            self.refresh_state();
            return Ok(EquipOutcome::Unequipped);
        }

        self.inventory.consume(kind, 1)?;
        if let Some(previous) = self.loadout.active.replace(kind) {
            self.inventory.deposit(previous, 1);
        }
        log::debug!("Equipped {kind:?}");
        self.refresh_state();
        Ok(EquipOutcome::Equipped)
    }

    pub fn equip_passive(&mut self, kind: ItemKind) -> Result<EquipOutcome> {
        let Some(durability) = kind.durability() else {
            return Err(GameError::NotEquippable(kind));
        };
        self.inventory.require_discovered(kind)?;

        if self.loadout.passive.is_some() {
            return Ok(EquipOutcome::NoChange);
        }

        self.inventory.consume(kind, 1)?;
        self.loadout.passive = Some(PassiveSlot { kind, durability });
        log::debug!("Wearing {kind:?}");
        self.refresh_state();
        Ok(EquipOutcome::Equipped)
    }

    pub fn unequip_active(&mut self) -> EquipOutcome {
        match self.loadout.active.take() {
            Some(kind) => {
                self.inventory.deposit(kind, 1);
                self.refresh_state();
                EquipOutcome::Unequipped
            }
            None => EquipOutcome::NoChange,
        }
    }

    pub fn unequip_passive(&mut self) -> EquipOutcome {
        match self.loadout.passive.take() {
            Some(slot) => {
                self.inventory.deposit(slot.kind, 1);
                self.refresh_state();
                EquipOutcome::Unequipped
            }
            None => EquipOutcome::NoChange,
        }
    }

    /// Spends the equipped upgrader to turn one `kind` into its upgrade.
    pub fn apply_upgrade(&mut self, kind: ItemKind) -> Result<ItemKind> {
        if self.loadout.active != Some(ItemKind::Upgrader) {
            return Err(GameError::UpgraderNotEquipped);
        }
        let upgraded = kind.upgrade().ok_or(GameError::NotUpgradable(kind))?;
        self.inventory.require_discovered(kind)?;
        self.inventory.consume(kind, 1)?;
        self.inventory.pick(upgraded);
        self.loadout.active = None;
        log::debug!("Upgraded {kind:?} into {upgraded:?}");
        self.refresh_state();
        Ok(upgraded)
    }

    pub(crate) fn loadout_mut(&mut self) -> &mut PlayerLoadout {
        &mut self.loadout
    }

    /// Re-derives the composite state, returning whether it changed. Loadouts without
    /// a sprite row (a jammer in hand) keep the previous state.
    pub(crate) fn refresh_state(&mut self) -> bool {
        if self.is_defeated() {
            return false;
        }
        match self.loadout.composite_state() {
            Ok(state) => {
                let changed = state != self.state;
                self.state = state;
                changed
            }
            Err(err) => {
                log::warn!("{err}, keeping {:?}", self.state);
                false
            }
        }
    }

    pub(crate) fn mark_defeated(&mut self) {
        self.state = PlayerState::Exploded;
    }

    /// Clears a defeat so the player can take another board.
    pub fn revive(&mut self) {
        self.state = PlayerState::Inactive;
        self.refresh_state();
    }
}
