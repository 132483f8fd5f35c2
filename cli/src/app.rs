use std::io::Write;

use anyhow::Result;
use sapper_core::*;

use crate::command::{Command, HELP};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies prompt commands to a session and prints what happened.
pub struct App {
    session: GameSession,
}

impl App {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            session: GameSession::new(settings),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        use Command::*;

        let session = &mut self.session;
        match command {
            Reveal(coords) => {
                let outcome = session.reveal(coords)?;
                log::debug!("Reveal {coords:?}: {outcome:?}");
            }
            Chord(coords) => {
                let outcome = session.chord_reveal(coords)?;
                log::debug!("Chord {coords:?}: {outcome:?}");
            }
            Flag(coords) => {
                session.toggle_flag(coords)?;
            }
            Collect(coords) => {
                if !session.collect(coords)?.has_update() {
                    writeln!(out, "Nothing to pick up at {coords:?}")?;
                }
            }
            Jammer(coords) => {
                if !session.place_jammer_marker(coords)?.has_update() {
                    writeln!(out, "A jammer cannot go on {coords:?}")?;
                }
            }
            Equip(kind) => {
                let outcome = session.player_mut().equip_active(kind)?;
                writeln!(out, "{} {}", describe_equip(outcome), kind.name())?;
            }
            Wear(kind) => {
                let outcome = session.player_mut().equip_passive(kind)?;
                if !outcome.has_update() {
                    writeln!(out, "Already wearing something, `remove` it first")?;
                }
            }
            Unequip => {
                session.player_mut().unequip_active();
            }
            Remove => {
                session.player_mut().unequip_passive();
            }
            Upgrade(kind) => {
                let upgraded = session.player_mut().apply_upgrade(kind)?;
                writeln!(out, "{} became {}", kind.name(), upgraded.name())?;
            }
            Craft => {
                session.player_mut().inventory.craft_jammer()?;
                writeln!(out, "Crafted a jammer")?;
            }
            Buy(kind) => {
                session.buy(kind)?;
                writeln!(out, "Bought {}", kind.name())?;
            }
            Advance => {
                session.request_advance();
                writeln!(out, "Moving on once this round is done")?;
            }
            Next => {
                let transition = session.finish_round()?;
                log::info!("Round {} dealt, {transition:?}", session.round());
            }
            Leave => session.leave_trader()?,
            Retry => session.retry_round()?,
            Inventory => {
                self.write_inventory(out)?;
                return Ok(Flow::Continue);
            }
            Show => {}
            Help => {
                writeln!(out, "{HELP}")?;
                return Ok(Flow::Continue);
            }
            Quit => return Ok(Flow::Quit),
        }

        self.write_events(out)?;
        self.write_view(out)?;
        Ok(Flow::Continue)
    }

    /// Status line plus the board or the trader's catalog.
    pub fn write_view(&self, out: &mut impl Write) -> Result<()> {
        let session = &self.session;
        let player = session.player();

        match session.phase() {
            Phase::Trading => {
                writeln!(
                    out,
                    "Trader before round {} | coins {}",
                    session.round(),
                    player.inventory.coins()
                )?;
                for &(kind, price) in session.trader().catalog() {
                    writeln!(out, "  {:<16}{price:>4}", kind.name())?;
                }
                writeln!(out, "`buy ITEM`, then `leave`")?;
            }
            Phase::Sweeping => {
                let Some(board) = session.board() else {
                    let (width, height) = session.settings().size;
                    writeln!(
                        out,
                        "Round {} | {width}x{height}, reveal a cell to start",
                        session.round()
                    )?;
                    return Ok(());
                };

                writeln!(
                    out,
                    "Round {} | flags {} | safe left {} | coins {} | {:?}",
                    board.round(),
                    board.flag_budget(),
                    board.hidden_safe_remaining(),
                    player.inventory.coins(),
                    player.state(),
                )?;
                write!(out, "{board}")?;
                log::trace!("Board contents:\n{board:#}");

                let circled = board.circled_flagged_items();
                if !circled.is_empty() {
                    writeln!(out, "Items ready to collect: {circled:?}")?;
                }
                match board.state() {
                    BoardState::Cleared if session.advance_requested() => {
                        writeln!(out, "Cleared! `next` moves on")?
                    }
                    BoardState::Cleared => {
                        writeln!(out, "Cleared! `advance` then `next`, or `next` to replay")?
                    }
                    BoardState::Defeated => writeln!(out, "Boom. `retry` deals the round again")?,
                    BoardState::Ready | BoardState::Active => {}
                }
            }
        }
        Ok(())
    }

    fn write_inventory(&self, out: &mut impl Write) -> Result<()> {
        let player = self.session.player();
        for kind in player.inventory.discovered() {
            writeln!(out, "  {:<16}{:>4}", kind.name(), player.inventory.amount(kind))?;
        }

        let loadout = player.loadout();
        let active = loadout.active().map_or("-", ItemKind::name);
        let passive = match loadout.passive_slot() {
            Some(slot) => format!("{} ({} left)", slot.kind.name(), slot.durability),
            None => "-".to_owned(),
        };
        writeln!(out, "In hand: {active} | worn: {passive}")?;
        Ok(())
    }

    fn write_events(&mut self, out: &mut impl Write) -> Result<()> {
        for event in self.session.drain_events() {
            log::trace!("{event:?}");
            if let Some(text) = describe_event(event) {
                writeln!(out, "{text}")?;
            }
        }
        Ok(())
    }
}

fn describe_equip(outcome: EquipOutcome) -> &'static str {
    match outcome {
        EquipOutcome::Equipped => "Holding",
        EquipOutcome::Unequipped => "Put away",
        EquipOutcome::NoChange => "Still holding",
    }
}

/// Player-facing line for an event, plain reveals and flags are left to the board.
fn describe_event(event: GameEvent) -> Option<String> {
    use GameEvent::*;

    Some(match event {
        CellRevealed { .. } | CellFlagged(_) | CellUnflagged(_) => return None,
        HazardDefused(coords) => format!("Defused the hazard at {coords:?}"),
        HazardJammed(coords) => format!("Jammer silenced the hazard at {coords:?}"),
        HazardAbsorbed {
            coords,
            by,
            durability_left,
        } => format!(
            "{} took the blast at {coords:?}, {durability_left} left",
            by.name()
        ),
        PlayerDefeated(coords) => format!("Hazard went off at {coords:?}"),
        BoardCleared {
            coins_earned,
            jammers_refunded,
        } => format!("Board cleared: +{coins_earned} coins, {jammers_refunded} jammers back"),
        ItemDiscovered(kind) => format!("New item: {}", kind.name()),
        ItemCollected { kind, .. } => format!("Picked up {}", kind.name()),
        JammerPlaced(coords) => format!("Jammer placed at {coords:?}"),
        PlayerStateChanged(state) => format!("Now {state:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(SessionSettings {
            size: (6, 6),
            seed: 3,
            first_round: 1,
        })
    }

    fn run(app: &mut App, line: &str) -> Result<String> {
        let mut out = Vec::new();
        app.execute(line.parse()?, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn first_reveal_prints_the_board() {
        let mut app = app();
        let text = run(&mut app, "r 0 0").unwrap();

        assert!(text.contains("Round 1 | flags"), "{text}");
        assert!(text.contains('┌'));
        assert!(app.session().board().is_some());
    }

    #[test]
    fn errors_leave_the_session_alone() {
        let mut app = app();

        let err = run(&mut app, "f 0 0").unwrap_err();
        assert_eq!(
            err.downcast_ref::<GameError>(),
            Some(&GameError::BoardNotStarted)
        );
        let err = run(&mut app, "buy shield").unwrap_err();
        assert_eq!(err.downcast_ref::<GameError>(), Some(&GameError::WrongPhase));
        assert!(app.session().board().is_none());
    }

    #[test]
    fn inventory_lists_discovered_items_and_slots() {
        let mut app = app();
        let text = run(&mut app, "inv").unwrap();

        assert!(text.contains("coin"));
        assert!(!text.contains("shield"));
        assert!(text.contains("In hand: - | worn: -"));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut app = app();
        let mut out = Vec::new();
        assert_eq!(app.execute(Command::Quit, &mut out).unwrap(), Flow::Quit);
        assert!(out.is_empty());
    }

    #[test]
    fn help_lists_commands() {
        let text = run(&mut app(), "help").unwrap();
        assert!(text.contains("reveal a cell"));
    }
}
