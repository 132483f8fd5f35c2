use std::str::FromStr;

use sapper_core::{Coord, Coord2, ItemKind};
use thiserror::Error;

/// One line typed at the prompt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Chord(Coord2),
    Flag(Coord2),
    Collect(Coord2),
    Jammer(Coord2),
    Equip(ItemKind),
    Wear(ItemKind),
    Unequip,
    Remove,
    Upgrade(ItemKind),
    Craft,
    Buy(ItemKind),
    Advance,
    Next,
    Leave,
    Retry,
    Inventory,
    Show,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{0}` expects {1}")]
    MissingArgument(&'static str, &'static str),
    #[error("`{0}` is not a valid coordinate")]
    BadCoord(String),
    #[error("Unknown item `{0}`")]
    UnknownItem(String),
    #[error("Unexpected trailing input `{0}`")]
    Trailing(String),
}

pub const HELP: &str = "\
r x y        reveal a cell
o x y        reveal every hidden neighbor of a number
f x y        toggle a flag
c x y        pick up a revealed item
j x y        drop the equipped jammer
equip ITEM   put an active item in hand (again to put it away)
wear ITEM    wear a shield or armor
unequip      put the active item away
remove       take the worn item off
upgrade ITEM spend the equipped upgrader on ITEM
craft        build a jammer from metal scrap
buy ITEM     buy from the trader
advance      move on to the next round once this one is cleared
next         finish the cleared round
leave        leave the trader
retry        deal the current round again
inv          show the inventory
show         show the board
quit         exit";

fn cell<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<Coord2, ParseError> {
    let mut coord = || -> Result<Coord, ParseError> {
        let word = words
            .next()
            .ok_or(ParseError::MissingArgument(command, "x y"))?;
        word.parse()
            .map_err(|_| ParseError::BadCoord(word.to_owned()))
    };
    Ok((coord()?, coord()?))
}

fn item(word: Option<&str>, command: &'static str) -> Result<ItemKind, ParseError> {
    let word = word.ok_or(ParseError::MissingArgument(command, "an item name"))?;
    let name = word.to_ascii_lowercase().replace('-', "_");
    ItemKind::from_name(&name).ok_or_else(|| ParseError::UnknownItem(word.to_owned()))
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        use Command::*;

        let mut words = line.split_whitespace();
        let head = words.next().ok_or(ParseError::Empty)?;

        let command = match head {
            "r" | "reveal" => Reveal(cell(&mut words, "reveal")?),
            "o" | "chord" => Chord(cell(&mut words, "chord")?),
            "f" | "flag" => Flag(cell(&mut words, "flag")?),
            "c" | "collect" => Collect(cell(&mut words, "collect")?),
            "j" | "jammer" => Jammer(cell(&mut words, "jammer")?),
            "equip" => Equip(item(words.next(), "equip")?),
            "wear" => Wear(item(words.next(), "wear")?),
            "upgrade" => Upgrade(item(words.next(), "upgrade")?),
            "buy" => Buy(item(words.next(), "buy")?),
            "unequip" => Unequip,
            "remove" => Remove,
            "craft" => Craft,
            "advance" => Advance,
            "next" => Next,
            "leave" => Leave,
            "retry" => Retry,
            "inv" | "inventory" => Inventory,
            "show" => Show,
            "help" | "?" => Help,
            "quit" | "q" | "exit" => Quit,
            other => return Err(ParseError::Unknown(other.to_owned())),
        };

        let rest: Vec<&str> = words.collect();
        if !rest.is_empty() {
            return Err(ParseError::Trailing(rest.join(" ")));
        }
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cell_commands() {
        assert_eq!("r 3 4".parse::<Command>(), Ok(Command::Reveal((3, 4))));
        assert_eq!("  f 0 17 ".parse::<Command>(), Ok(Command::Flag((0, 17))));
        assert_eq!("o 1 1".parse::<Command>(), Ok(Command::Chord((1, 1))));
        assert_eq!("jammer 2 9".parse::<Command>(), Ok(Command::Jammer((2, 9))));
    }

    #[test]
    fn parses_item_names_loosely() {
        assert_eq!(
            "equip Bionic-Glasses".parse::<Command>(),
            Ok(Command::Equip(ItemKind::BionicGlasses))
        );
        assert_eq!("buy shield".parse::<Command>(), Ok(Command::Buy(ItemKind::Shield)));
        assert_eq!(
            "wear helmet".parse::<Command>(),
            Err(ParseError::UnknownItem("helmet".into()))
        );
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!("".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!(
            "r 3".parse::<Command>(),
            Err(ParseError::MissingArgument("reveal", "x y"))
        );
        assert_eq!(
            "r 3 -1".parse::<Command>(),
            Err(ParseError::BadCoord("-1".into()))
        );
        assert_eq!(
            "dig 1 1".parse::<Command>(),
            Err(ParseError::Unknown("dig".into()))
        );
        assert_eq!(
            "craft now".parse::<Command>(),
            Err(ParseError::Trailing("now".into()))
        );
    }
}
