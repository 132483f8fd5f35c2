use super::*;

/// Shuffles every cell outside the protected start neighborhood and deals spawns off
/// the front of the deck, so the first reveal never lands on or next to a hazard.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
    start: Coord2,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64, start: Coord2) -> Self {
        Self { seed, start }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, size: Coord2, config: &RoundConfig) -> Board {
        use rand::prelude::*;

        if mult(size.0, size.1) != config.total_cells() {
            log::warn!(
                "Round configured for {} cells but board has {}",
                config.total_cells(),
                mult(size.0, size.1)
            );
        }
        if !in_bounds(self.start, size) {
            log::warn!("Start cell {:?} is outside the board", self.start);
        }

        let protected: Vec<Coord2> = NeighborIter::new(self.start, size, true).collect();
        let mut deck: Vec<Coord2> = iter_coords(size)
            .filter(|coords| !protected.contains(coords))
            .collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        deck.shuffle(&mut rng);
        let mut deck = deck.into_iter();

        let mut layout = BoardLayout::empty(size);
        for &(spawn, count) in config.placements() {
            let mut placed: CellCount = 0;
            for coords in deck.by_ref().take(count.into()) {
                layout.place(coords, spawn);
                placed += 1;
            }
            if placed < count {
                log::warn!(
                    "Board is full, placed {} of {} {:?}",
                    placed,
                    count,
                    spawn
                );
            }
        }

        Board::new(layout, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(seed: u64, start: Coord2, config: &RoundConfig) -> Board {
        RandomBoardGenerator::new(seed, start).generate((9, 9), config)
    }

    #[test]
    fn start_neighborhood_is_never_a_hazard() {
        let config = RoundConfig::with_quotas(3, 81, 72, &[]);
        for seed in 0..16 {
            let board = generate(seed, (4, 4), &config);
            for coords in NeighborIter::new((4, 4), (9, 9), true) {
                assert!(!board.content_at(coords).is_hazard(), "seed {seed} at {coords:?}");
            }
            assert_eq!(board.hazard_count(), 72);
        }
    }

    #[test]
    fn corner_start_protects_only_existing_neighbors() {
        let config = RoundConfig::with_quotas(3, 81, 77, &[]);
        let board = generate(1, (0, 0), &config);

        assert_eq!(board.hazard_count(), 77);
        for coords in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert!(!board.content_at(coords).is_hazard());
        }
    }

    #[test]
    fn overfull_quota_places_what_fits() {
        let config = RoundConfig::with_quotas(3, 81, 81, &[(ItemKind::Coin, 4)]);
        let board = generate(2, (4, 4), &config);

        let coins = iter_coords((9, 9))
            .filter(|&coords| board.content_at(coords) == CellContent::Item(ItemKind::Coin))
            .count();
        assert_eq!(coins, 4);
        assert_eq!(board.hazard_count(), 81 - 9 - 4);
    }

    #[test]
    fn hints_count_every_placed_neighbor() {
        let config = RoundConfig::derive(4, 81, 21);
        for seed in 0..8 {
            let board = generate(seed, (2, 6), &config);
            for coords in iter_coords((9, 9)) {
                if let CellContent::Hint(hint) = board.content_at(coords) {
                    let placed = NeighborIter::new(coords, (9, 9), false)
                        .filter(|&pos| !board.content_at(pos).is_hint())
                        .count();
                    assert_eq!(usize::from(hint), placed, "seed {seed} at {coords:?}");
                }
            }
        }
    }

    #[test]
    fn same_seed_same_board() {
        let config = RoundConfig::derive(3, 81, 4);
        let contents = |board: &Board| {
            iter_coords((9, 9))
                .map(|coords| board.content_at(coords))
                .collect::<Vec<_>>()
        };

        let first = generate(8, (3, 3), &config);
        let second = generate(8, (3, 3), &config);
        assert_eq!(contents(&first), contents(&second));
    }
}
