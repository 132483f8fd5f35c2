use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self, size: Coord2, config: &RoundConfig) -> Board;
}
