use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    /// Generated, nothing revealed yet.
    Ready,
    Active,
    Cleared,
    Defeated,
}

impl BoardState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Cleared | Self::Defeated)
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::Ready
    }
}

/// One round's grid and its bookkeeping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Board {
    pub(crate) cells: Array2<Cell>,
    pub(crate) round: Round,
    pub(crate) hazard_count: CellCount,
    pub(crate) safe_cell_count: CellCount,
    pub(crate) revealed_safe: CellCount,
    /// Goes negative when the player over-flags.
    pub(crate) flag_budget: isize,
    /// Flagged cells hiding an item, for the circled-flag highlight.
    pub(crate) flagged_items: BTreeSet<Coord2>,
    pub(crate) jammers_to_refund: u32,
    pub(crate) state: BoardState,
    pub(crate) triggered_hazard: Option<Coord2>,
    #[serde(skip, default = "Instant::now")]
    pub(crate) started_at: Instant,
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
}

impl Board {
    pub fn new(layout: BoardLayout, config: &RoundConfig) -> Self {
        Self::from_layout(layout, config.round(), config.flag_budget())
    }

    pub fn from_layout(layout: BoardLayout, round: Round, flag_budget: isize) -> Self {
        let hazard_count = layout.hazard_count();
        let safe_cell_count = layout.safe_cell_count();
        Self {
            cells: layout.into_contents().mapv(Cell::new),
            round,
            hazard_count,
            safe_cell_count,
            revealed_safe: 0,
            flag_budget,
            flagged_items: BTreeSet::new(),
            jammers_to_refund: 0,
            state: BoardState::Ready,
            triggered_hazard: None,
            started_at: Instant::now(),
            events: Vec::new(),
        }
    }

    /// Backdates the clock the clear reward is measured against.
    pub fn with_start_time(mut self, started_at: Instant) -> Self {
        self.started_at = started_at;
        self
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.cells)
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn hazard_count(&self) -> CellCount {
        self.hazard_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.safe_cell_count
    }

    pub fn revealed_safe(&self) -> CellCount {
        self.revealed_safe
    }

    pub fn hidden_safe_remaining(&self) -> CellCount {
        self.safe_cell_count - self.revealed_safe
    }

    pub fn flag_budget(&self) -> isize {
        self.flag_budget
    }

    pub fn jammers_to_refund(&self) -> u32 {
        self.jammers_to_refund
    }

    pub fn triggered_hazard(&self) -> Option<Coord2> {
        self.triggered_hazard
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn content_at(&self, coords: Coord2) -> CellContent {
        self.cell_at(coords).content
    }

    pub fn flagged_items(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.flagged_items.iter().copied()
    }

    /// Events produced since the last drain.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Whether every neighbor of `coords` is revealed or a flagged item.
    pub fn is_fully_circled(&self, coords: Coord2) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cells.iter_neighbors(coords).all(|pos| {
            let cell = self.cell_at(pos);
            cell.is_revealed() || (cell.is_flagged() && cell.content.collectible().is_some())
        }))
    }

    /// Flagged item cells whose whole neighborhood is accounted for.
    pub fn circled_flagged_items(&self) -> Vec<Coord2> {
        self.flagged_items
            .iter()
            .copied()
            .filter(|&coords| self.is_fully_circled(coords).unwrap_or(false))
            .collect()
    }

    pub(crate) fn neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        log::trace!("{event:?}");
        self.events.push(event);
    }
}

fn content_symbol(content: CellContent) -> char {
    match content {
        CellContent::Hint(0) => '.',
        CellContent::Hint(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
        CellContent::Hazard => '*',
        CellContent::Item(kind) => kind.symbol(),
    }
}

fn write_rule(
    f: &mut fmt::Formatter<'_>,
    columns: Coord,
    (left, mid, right): (char, char, char),
) -> fmt::Result {
    write!(f, "{left}")?;
    for x in 0..columns {
        if x > 0 {
            write!(f, "{mid}")?;
        }
        write!(f, "───")?;
    }
    writeln!(f, "{right}")
}

/// Box-drawn grid as the player sees it. The alternate form (`{:#}`) also shows
/// what hides under closed cells.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (size_x, size_y) = self.size();

        write_rule(f, size_x, ('┌', '┬', '┐'))?;
        for y in 0..size_y {
            for x in 0..size_x {
                let cell = self.cell_at((x, y));
                let symbol = content_symbol(cell.content);
                match cell.visibility {
                    Visibility::Revealed if cell.collected => write!(f, "│ _ ")?,
                    Visibility::Revealed => write!(f, "│ {symbol} ")?,
                    Visibility::Hidden if f.alternate() => write!(f, "│({symbol})")?,
                    Visibility::Hidden => write!(f, "│ # ")?,
                    Visibility::Flagged if f.alternate() => write!(f, "│[{symbol}]")?,
                    Visibility::Flagged => write!(f, "│ F ")?,
                }
            }
            writeln!(f, "│")?;
            if y + 1 < size_y {
                write_rule(f, size_x, ('├', '┼', '┤'))?;
            }
        }
        write_rule(f, size_x, ('└', '┴', '┘'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord2, spawns: &[(Coord2, Spawn)]) -> Board {
        let layout = BoardLayout::from_spawns(size, spawns).unwrap();
        Board::from_layout(layout, 1, spawns.len() as isize)
    }

    #[test]
    fn counters_follow_the_layout() {
        let board = board(
            (3, 3),
            &[
                ((0, 0), Spawn::Hazard),
                ((2, 2), Spawn::Item(ItemKind::Coin)),
            ],
        );

        assert_eq!(board.hazard_count(), 1);
        assert_eq!(board.safe_cell_count(), 8);
        assert_eq!(board.hidden_safe_remaining(), 8);
        assert_eq!(board.flag_budget(), 2);
        assert_eq!(board.state(), BoardState::Ready);
        assert_eq!(board.content_at((1, 1)), CellContent::Hint(2));
    }

    #[test]
    fn renders_hidden_contents_only_in_alternate_form() {
        let board = board((2, 1), &[((0, 0), Spawn::Hazard)]);

        assert_eq!(
            format!("{board}"),
            "┌───┬───┐\n│ # │ # │\n└───┴───┘\n"
        );
        assert_eq!(
            format!("{board:#}"),
            "┌───┬───┐\n│(*)│(1)│\n└───┴───┘\n"
        );
    }

    #[test]
    fn circled_check_rejects_out_of_bounds() {
        let board = board((2, 2), &[]);
        assert_eq!(board.is_fully_circled((2, 0)), Err(GameError::InvalidCoords));
    }
}
