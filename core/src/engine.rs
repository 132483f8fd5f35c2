use std::collections::{BTreeSet, VecDeque};

use crate::*;

const JAMMER: CellContent = CellContent::Item(ItemKind::Jammer);

impl Board {
    /// Opens `coords` for `player`. Once the board is running the equipped active
    /// item changes what a reveal does: glasses sweep the 3x3 block, a magnifier
    /// probes a single cell.
    pub fn reveal(&mut self, coords: Coord2, player: &mut Player) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        let equipment_on = matches!(self.state, BoardState::Active);

        if equipment_on && player.loadout().active() == Some(ItemKind::BionicGlasses) {
            return Ok(self.glasses_sweep(coords, player));
        }

        if !self.cell_at(coords).is_hidden() {
            return Ok(RevealOutcome::NoChange);
        }
        self.check_not_finished()?;

        if equipment_on && player.loadout().active() == Some(ItemKind::Magnifier) {
            let (outcome, spent) = self.probe(coords, player);
            if spent {
                self.spend_active(player);
            }
            return Ok(outcome);
        }

        self.mark_started();
        Ok(self.uncover(coords, player))
    }

    /// Plainly opens every hidden neighbor of a revealed cell. Flags are not
    /// counted first, flagged cells are simply skipped.
    pub fn chord_reveal(&mut self, coords: Coord2, player: &mut Player) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;

        if !self.cell_at(coords).is_revealed() {
            return Ok(RevealOutcome::NoChange);
        }

        let mut outcome = RevealOutcome::NoChange;
        for pos in self.neighbors(coords) {
            if self.is_finished() {
                break;
            }
            if self.cell_at(pos).is_hidden() {
                outcome = outcome | self.uncover(pos, player);
            }
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use MarkOutcome::*;

        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;

        let cell = self.cell_at(coords);
        Ok(match cell.visibility {
            Visibility::Hidden => {
                self.cells[coords.to_nd_index()].visibility = Visibility::Flagged;
                self.flag_budget -= 1;
                if cell.content.collectible().is_some() {
                    self.flagged_items.insert(coords);
                }
                self.emit(GameEvent::CellFlagged(coords));
                Changed
            }
            Visibility::Flagged => {
                self.cells[coords.to_nd_index()].visibility = Visibility::Hidden;
                self.flag_budget += 1;
                self.flagged_items.remove(&coords);
                self.emit(GameEvent::CellUnflagged(coords));
                Changed
            }
            Visibility::Revealed => NoChange,
        })
    }

    /// Picks up a revealed item that is still lying on the board.
    pub fn collect(&mut self, coords: Coord2, player: &mut Player) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = self.cell_at(coords);

        let Some(kind) = cell.content.collectible().filter(|_| cell.is_pickable()) else {
            return Ok(MarkOutcome::NoChange);
        };

        self.cells[coords.to_nd_index()].collected = true;
        player.inventory.pick(kind);
        self.emit(GameEvent::ItemCollected { coords, kind });
        Ok(MarkOutcome::Changed)
    }

    /// Drops the equipped jammer on a revealed hint. Hazards next to it stop going
    /// off, and the jammer comes back when the board is cleared.
    pub fn place_jammer_marker(
        &mut self,
        coords: Coord2,
        player: &mut Player,
    ) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        if player.loadout().active() != Some(ItemKind::Jammer) {
            return Err(GameError::JammerNotEquipped);
        }
        self.check_not_finished()?;

        let cell = self.cell_at(coords);
        if !cell.is_revealed() || !cell.content.is_hint() {
            return Ok(MarkOutcome::NoChange);
        }

        self.cells[coords.to_nd_index()].content = JAMMER;
        self.jammers_to_refund += 1;
        self.emit(GameEvent::JammerPlaced(coords));
        self.spend_active(player);
        Ok(MarkOutcome::Changed)
    }

    /// Probes the clicked cell and its neighbors one after another, then burns the
    /// glasses whether or not anything was hidden.
    fn glasses_sweep(&mut self, center: Coord2, player: &mut Player) -> RevealOutcome {
        let targets: Vec<Coord2> = self
            .cells
            .iter_neighborhood(center)
            .filter(|&pos| self.cell_at(pos).is_hidden())
            .collect();

        let mut outcome = RevealOutcome::NoChange;
        for pos in targets {
            if self.is_finished() {
                break;
            }
            outcome = outcome | self.probe(pos, player).0;
        }

        self.spend_active(player);
        outcome
    }

    /// Magnifier resolution of a hidden cell. Hazards get defused into flags and
    /// hints open without spreading, both use up the probe; items are revealed as
    /// usual and leave it intact. The flag tells whether the probe was spent.
    fn probe(&mut self, coords: Coord2, player: &mut Player) -> (RevealOutcome, bool) {
        match self.content_at(coords) {
            CellContent::Hazard => {
                self.cells[coords.to_nd_index()].visibility = Visibility::Flagged;
                self.flag_budget -= 1;
                self.emit(GameEvent::HazardDefused(coords));
                (RevealOutcome::Defused, true)
            }
            CellContent::Item(_) => (self.uncover(coords, player), false),
            CellContent::Hint(_) => {
                self.show(coords);
                self.revealed_safe += 1;
                (self.after_safe_reveal(player), true)
            }
        }
    }

    /// Plain resolution of a hidden cell.
    fn uncover(&mut self, coords: Coord2, player: &mut Player) -> RevealOutcome {
        match self.content_at(coords) {
            CellContent::Hazard => self.trigger_hazard(coords, player),
            CellContent::Item(kind) => {
                self.show(coords);
                self.flag_budget -= 1;
                self.revealed_safe += 1;
                if player.inventory.discover(kind) {
                    self.emit(GameEvent::ItemDiscovered(kind));
                }
                self.after_safe_reveal(player)
            }
            CellContent::Hint(count) => {
                self.show(coords);
                self.revealed_safe += 1;
                if count == 0 {
                    self.flood_from(coords);
                }
                self.after_safe_reveal(player)
            }
        }
    }

    fn flood_from(&mut self, origin: Coord2) {
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit: VecDeque<_> = self.neighbors(origin).collect();

        while let Some(pos) = to_visit.pop_front() {
            if !visited.insert(pos) {
                continue;
            }

            let cell = self.cell_at(pos);
            let CellContent::Hint(count) = cell.content else {
                continue;
            };
            if !cell.is_hidden() {
                continue;
            }

            log::trace!("Flood reveals {pos:?}");
            self.show(pos);
            self.revealed_safe += 1;

            if count == 0 {
                to_visit.extend(self.neighbors(pos).filter(|p| !visited.contains(p)));
            }
        }
    }

    fn trigger_hazard(&mut self, coords: Coord2, player: &mut Player) -> RevealOutcome {
        self.flag_budget -= 1;
        self.show(coords);

        if self.neighbors(coords).any(|pos| self.content_at(pos) == JAMMER) {
            self.emit(GameEvent::HazardJammed(coords));
            return RevealOutcome::Survived;
        }

        if let Some((by, durability_left)) = player.loadout_mut().absorb_hit() {
            log::debug!("{by:?} absorbed hazard at {coords:?}, {durability_left} left");
            self.emit(GameEvent::HazardAbsorbed {
                coords,
                by,
                durability_left,
            });
            self.sync_player_state(player);
            return RevealOutcome::Survived;
        }

        self.triggered_hazard = Some(coords);
        self.state = BoardState::Defeated;
        player.mark_defeated();
        log::debug!("Hazard went off at {coords:?}");
        self.emit(GameEvent::PlayerDefeated(coords));
        self.emit(GameEvent::PlayerStateChanged(player.state()));
        RevealOutcome::HitHazard
    }

    fn after_safe_reveal(&mut self, player: &mut Player) -> RevealOutcome {
        if self.revealed_safe == self.safe_cell_count {
            self.clear(player);
            RevealOutcome::Cleared
        } else {
            RevealOutcome::Revealed
        }
    }

    fn clear(&mut self, player: &mut Player) {
        self.state = BoardState::Cleared;
        self.triggered_hazard = None;

        let coins_earned = coins_for_clear(self.elapsed(), self.round);
        let jammers_refunded = std::mem::take(&mut self.jammers_to_refund);
        player.inventory.deposit(ItemKind::Coin, coins_earned);
        player.inventory.deposit(ItemKind::Jammer, jammers_refunded);

        log::debug!(
            "Round {} cleared: {coins_earned} coins, {jammers_refunded} jammers back",
            self.round
        );
        self.emit(GameEvent::BoardCleared {
            coins_earned,
            jammers_refunded,
        });
    }

    fn show(&mut self, coords: Coord2) {
        let cell = &mut self.cells[coords.to_nd_index()];
        cell.visibility = Visibility::Revealed;
        let content = cell.content;
        self.emit(GameEvent::CellRevealed { coords, content });
    }

    /// Empties the active slot after the item in it did its job.
    fn spend_active(&mut self, player: &mut Player) {
        if let Some(kind) = player.loadout_mut().take_active() {
            log::debug!("{kind:?} used up");
        }
        self.sync_player_state(player);
    }

    fn sync_player_state(&mut self, player: &mut Player) {
        if player.refresh_state() {
            self.emit(GameEvent::PlayerStateChanged(player.state()));
        }
    }

    fn mark_started(&mut self) {
        if self.state.is_ready() {
            log::debug!("Round {} started", self.round);
            self.state = BoardState::Active;
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
