use rand::prelude::*;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Knobs a front end picks before a run starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub size: Coord2,
    pub seed: u64,
    pub first_round: Round,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            size: (18, 18),
            seed: 0,
            first_round: 1,
        }
    }
}

impl SessionSettings {
    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Sweeping,
    Trading,
}

/// Drives a run from board to board: lazy generation around the first click,
/// the player-gated advance, and the trader stop between rounds.
#[derive(Clone, Debug)]
pub struct GameSession {
    settings: SessionSettings,
    round: Round,
    phase: Phase,
    player: Player,
    trader: Trader,
    config: RoundConfig,
    board: Option<Board>,
    round_started: Instant,
    advance_requested: bool,
    rng: SmallRng,
}

impl GameSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self::with_player(settings, Player::default())
    }

    pub fn with_player(settings: SessionSettings, player: Player) -> Self {
        let mut rng = SmallRng::seed_from_u64(settings.seed);
        let round = settings.first_round.max(1);
        let config = RoundConfig::derive(round, settings.total_cells(), rng.random());
        Self {
            settings,
            round,
            phase: Phase::Sweeping,
            player,
            trader: Trader::default(),
            config,
            board: None,
            round_started: Instant::now(),
            advance_requested: false,
            rng,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// `None` until the first reveal of the round.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn trader(&self) -> &Trader {
        &self.trader
    }

    pub fn advance_requested(&self) -> bool {
        self.advance_requested
    }

    /// Reveals `coords`, generating the board around it if this is the first click.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.check_phase(Phase::Sweeping)?;
        if !in_bounds(coords, self.settings.size) {
            return Err(GameError::InvalidCoords);
        }

        let board = self.board.get_or_insert_with(|| {
            RandomBoardGenerator::new(self.rng.random(), coords)
                .generate(self.settings.size, &self.config)
                .with_start_time(self.round_started)
        });
        board.reveal(coords, &mut self.player)
    }

    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let (board, player) = self.board_and_player()?;
        board.chord_reveal(coords, player)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let (board, _) = self.board_and_player()?;
        board.toggle_flag(coords)
    }

    pub fn collect(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let (board, player) = self.board_and_player()?;
        board.collect(coords, player)
    }

    pub fn place_jammer_marker(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let (board, player) = self.board_and_player()?;
        board.place_jammer_marker(coords, player)
    }

    /// Latches the player's wish to move on, consumed by [`Self::finish_round`].
    pub fn request_advance(&mut self) {
        self.advance_requested = true;
    }

    /// Wraps up a cleared board. The round only moves forward if the player asked
    /// for it; otherwise the same round is dealt again.
    pub fn finish_round(&mut self) -> Result<RoundTransition> {
        self.check_phase(Phase::Sweeping)?;
        if !self
            .board
            .as_ref()
            .is_some_and(|board| board.state() == BoardState::Cleared)
        {
            return Err(GameError::RoundNotCleared);
        }

        if std::mem::take(&mut self.advance_requested) {
            self.round += 1;
        }

        let transition = RoundTransition::after(self.round);
        log::debug!("Round finished, {transition:?} into round {}", self.round);
        match transition {
            RoundTransition::NextGrid => self.start_round(),
            RoundTransition::Trading => {
                self.board = None;
                self.phase = Phase::Trading;
            }
        }
        Ok(transition)
    }

    /// Deals a fresh board for the current round, reviving a defeated player.
    pub fn retry_round(&mut self) -> Result<()> {
        self.check_phase(Phase::Sweeping)?;
        self.player.revive();
        self.start_round();
        Ok(())
    }

    pub fn leave_trader(&mut self) -> Result<()> {
        self.check_phase(Phase::Trading)?;
        self.phase = Phase::Sweeping;
        self.start_round();
        Ok(())
    }

    pub fn buy(&mut self, kind: ItemKind) -> Result<()> {
        self.check_phase(Phase::Trading)?;
        self.trader.buy(kind, &mut self.player.inventory)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.board
            .as_mut()
            .map(Board::drain_events)
            .unwrap_or_default()
    }

    fn start_round(&mut self) {
        let seed = self.rng.random();
        self.config = RoundConfig::derive(self.round, self.settings.total_cells(), seed);
        self.board = None;
        self.round_started = Instant::now();
        self.advance_requested = false;
        log::debug!("Dealing round {}", self.round);
    }

    fn board_and_player(&mut self) -> Result<(&mut Board, &mut Player)> {
        self.check_phase(Phase::Sweeping)?;
        let board = self.board.as_mut().ok_or(GameError::BoardNotStarted)?;
        Ok((board, &mut self.player))
    }

    fn check_phase(&self, phase: Phase) -> Result<()> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(GameError::WrongPhase)
        }
    }
}
