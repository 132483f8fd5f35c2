use serde::{Deserialize, Serialize};

use crate::*;

/// Hazard percentage added per round past the scripted tables.
const HAZARD_PERCENT_STEP: u8 = 3;

/// Auxiliary items as a percentage of the hazard count.
const AUX_PERCENT: u8 = 10;

/// Round that gets the one-off rifle.
const RIFLE_ROUND: Round = 6;

/// Cumulative spawn bands over `[1, 100]`, built once per round and bisected per draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnBands {
    bands: Vec<(ItemKind, u8)>,
}

impl SpawnBands {
    pub fn new(table: &SpawnTable) -> Self {
        let mut upper = 0u8;
        let bands = table
            .weights
            .iter()
            .filter(|&&(_, weight)| weight > 0)
            .map(|&(kind, weight)| {
                upper = upper.saturating_add(weight).min(100);
                (kind, upper)
            })
            .collect();
        Self { bands }
    }

    /// Kind whose band contains `sample`, `None` past the last band.
    pub fn lookup(&self, sample: u8) -> Option<ItemKind> {
        let index = self.bands.partition_point(|&(_, upper)| upper < sample);
        self.bands.get(index).map(|&(kind, _)| kind)
    }

    pub fn bands(&self) -> &[(ItemKind, u8)] {
        &self.bands
    }
}

/// Everything the generator needs to know about one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    round: Round,
    total_cells: CellCount,
    hazard_percent: u8,
    hazard_count: CellCount,
    aux_total: CellCount,
    /// Applied front to back by the generator.
    placements: Vec<(Spawn, CellCount)>,
    flag_budget: isize,
}

impl RoundConfig {
    /// Derives a round's configuration, `seed` drives the auxiliary item draws.
    pub fn derive(round: Round, total_cells: CellCount, seed: u64) -> Self {
        use rand::prelude::*;

        let round = if round == 0 {
            log::warn!("Round 0 requested, using round 1");
            1
        } else {
            round
        };

        let table = spawn_table(round);
        let hazard_percent = if round <= LAST_SCRIPTED_ROUND {
            table.hazard_percent
        } else {
            let extra = (round - LAST_SCRIPTED_ROUND).saturating_mul(HAZARD_PERCENT_STEP.into());
            u32::from(table.hazard_percent)
                .saturating_add(extra)
                .min(100) as u8
        };
        let hazard_count = percent_of(total_cells, hazard_percent);

        let aux_total = if round > 1 {
            let aux_percent = AUX_PERCENT.min(100 - hazard_percent);
            percent_of(hazard_count, aux_percent)
        } else {
            0
        };

        let bands = SpawnBands::new(table);
        let mut quotas: Vec<(ItemKind, CellCount)> =
            table.weights.iter().map(|&(kind, _)| (kind, 0)).collect();
        let mut rng = SmallRng::seed_from_u64(seed);
        for _ in 0..aux_total {
            if let Some(kind) = bands.lookup(spawn_sample(&mut rng)) {
                if let Some((_, count)) = quotas.iter_mut().find(|(k, _)| *k == kind) {
                    *count += 1;
                }
            }
        }

        let mut placements: Vec<(Spawn, CellCount)> = quotas
            .into_iter()
            .map(|(kind, count)| (Spawn::Item(kind), count))
            .collect();
        placements.push((Spawn::Hazard, hazard_count));

        let mut flag_budget = hazard_count as isize + aux_total as isize;
        if round == RIFLE_ROUND {
            placements.push((Spawn::Item(ItemKind::Rifle), 1));
            flag_budget += 1;
        }

        log::debug!(
            "Round {round}: {hazard_count} hazards ({hazard_percent}%), {aux_total} items, {flag_budget} flags"
        );

        Self {
            round,
            total_cells,
            hazard_percent,
            hazard_count,
            aux_total,
            placements,
            flag_budget,
        }
    }

    /// Explicit configuration, the flag budget covers every hazard and item.
    pub fn with_quotas(
        round: Round,
        total_cells: CellCount,
        hazard_count: CellCount,
        items: &[(ItemKind, CellCount)],
    ) -> Self {
        let hazard_count = hazard_count.min(total_cells);
        let aux_total = items.iter().map(|&(_, count)| count).sum::<CellCount>();
        let mut placements: Vec<_> = items
            .iter()
            .map(|&(kind, count)| (Spawn::Item(kind), count))
            .collect();
        placements.push((Spawn::Hazard, hazard_count));
        let hazard_percent = if total_cells == 0 {
            0
        } else {
            (u32::from(hazard_count) * 100 / u32::from(total_cells)) as u8
        };

        Self {
            round: round.max(1),
            total_cells,
            hazard_percent,
            hazard_count,
            aux_total,
            placements,
            flag_budget: hazard_count as isize + aux_total as isize,
        }
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn total_cells(&self) -> CellCount {
        self.total_cells
    }

    pub fn hazard_percent(&self) -> u8 {
        self.hazard_percent
    }

    pub fn hazard_count(&self) -> CellCount {
        self.hazard_count
    }

    pub fn aux_total(&self) -> CellCount {
        self.aux_total
    }

    pub fn flag_budget(&self) -> isize {
        self.flag_budget
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells - self.hazard_count
    }

    /// Placement quotas in the order the generator applies them.
    pub fn placements(&self) -> &[(Spawn, CellCount)] {
        &self.placements
    }

    /// How many of `kind` this round places.
    pub fn item_quota(&self, kind: ItemKind) -> CellCount {
        self.placements
            .iter()
            .filter(|(spawn, _)| *spawn == Spawn::Item(kind))
            .map(|&(_, count)| count)
            .sum()
    }
}

/// Uniform draw over `1..=100` matched against the spawn bands.
fn spawn_sample(rng: &mut impl rand::Rng) -> u8 {
    rng.random_range(1..=100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_round_has_only_hazards() {
        let config = RoundConfig::derive(1, 324, 7);

        assert_eq!(config.hazard_count(), 32);
        assert_eq!(config.aux_total(), 0);
        assert_eq!(config.flag_budget(), 32);
        assert_eq!(config.safe_cell_count(), 292);
        assert!(ItemKind::ALL.iter().all(|&kind| config.item_quota(kind) == 0));
    }

    #[test]
    fn second_round_items_are_all_coins() {
        let config = RoundConfig::derive(2, 324, 11);

        // 15% of 324 is 48.6, 10% of that is 4.9
        assert_eq!(config.hazard_count(), 49);
        assert_eq!(config.aux_total(), 5);
        assert_eq!(config.item_quota(ItemKind::Coin), 5);
        assert_eq!(config.flag_budget(), 54);
    }

    #[test]
    fn scripted_rounds_place_every_draw() {
        for seed in 0..32 {
            let config = RoundConfig::derive(4, 400, seed);
            let placed: CellCount = [
                ItemKind::Coin,
                ItemKind::Magnifier,
                ItemKind::MetalScrap,
                ItemKind::Shield,
            ]
            .into_iter()
            .map(|kind| config.item_quota(kind))
            .sum();
            assert_eq!(placed, config.aux_total());
        }
    }

    #[test]
    fn later_rounds_extrapolate_hazard_density() {
        assert_eq!(RoundConfig::derive(5, 100, 0).hazard_percent(), 22);
        assert_eq!(RoundConfig::derive(10, 100, 0).hazard_percent(), 37);
        assert_eq!(RoundConfig::derive(40, 100, 0).hazard_percent(), 100);
    }

    #[test]
    fn full_density_leaves_no_room_for_items() {
        let config = RoundConfig::derive(40, 100, 3);

        assert_eq!(config.hazard_count(), 100);
        assert_eq!(config.aux_total(), 0);
        assert_eq!(config.safe_cell_count(), 0);
    }

    #[test]
    fn sixth_round_injects_a_rifle() {
        let config = RoundConfig::derive(6, 324, 5);

        assert_eq!(config.item_quota(ItemKind::Rifle), 1);
        assert_eq!(
            config.flag_budget(),
            config.hazard_count() as isize + config.aux_total() as isize + 1
        );
        assert_eq!(RoundConfig::derive(7, 324, 5).item_quota(ItemKind::Rifle), 0);
    }

    #[test]
    fn hazards_are_placed_after_table_items() {
        let config = RoundConfig::derive(6, 324, 5);
        let order: Vec<_> = config.placements().iter().map(|&(spawn, _)| spawn).collect();

        assert_eq!(
            order,
            vec![
                Spawn::Item(ItemKind::Coin),
                Spawn::Item(ItemKind::Magnifier),
                Spawn::Item(ItemKind::MetalScrap),
                Spawn::Item(ItemKind::Shield),
                Spawn::Hazard,
                Spawn::Item(ItemKind::Rifle),
            ]
        );
    }

    #[test]
    fn bands_follow_declaration_order() {
        let bands = SpawnBands::new(spawn_table(3));

        assert_eq!(
            bands.bands(),
            &[
                (ItemKind::Coin, 65),
                (ItemKind::Magnifier, 85),
                (ItemKind::MetalScrap, 100)
            ]
        );
        assert_eq!(bands.lookup(1), Some(ItemKind::Coin));
        assert_eq!(bands.lookup(65), Some(ItemKind::Coin));
        assert_eq!(bands.lookup(66), Some(ItemKind::Magnifier));
        assert_eq!(bands.lookup(100), Some(ItemKind::MetalScrap));
    }

    #[test]
    fn spawn_samples_cover_one_to_a_hundred() {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(17);
        let mut seen = [0u32; 101];
        for _ in 0..20_000 {
            seen[usize::from(spawn_sample(&mut rng))] += 1;
        }

        assert_eq!(seen[0], 0);
        assert!(seen[1..].iter().all(|&hits| hits > 0));
        // 1 is no more likely than any other value
        assert!(seen[1] < 2 * seen[50], "{} vs {}", seen[1], seen[50]);
    }

    #[test]
    fn empty_table_never_matches() {
        let bands = SpawnBands::new(spawn_table(1));
        assert_eq!(bands.lookup(1), None);
    }

    #[test]
    fn derivation_is_deterministic_per_seed() {
        assert_eq!(RoundConfig::derive(4, 324, 99), RoundConfig::derive(4, 324, 99));
    }

    #[test]
    fn explicit_quotas_budget_every_spawn() {
        let config = RoundConfig::with_quotas(3, 25, 2, &[(ItemKind::Magnifier, 1)]);

        assert_eq!(config.flag_budget(), 3);
        assert_eq!(config.safe_cell_count(), 23);
        assert_eq!(config.item_quota(ItemKind::Magnifier), 1);
    }
}
