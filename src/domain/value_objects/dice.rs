//! Dice notation parsing and rolling
//!
//! Supports the usual tabletop forms: `d20`, `2d6`, `3d8+5`, `4d6-2` and
//! `d%` as shorthand for `d100`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("Empty dice notation")]
    Empty,

    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),

    #[error("Dice count must be between 1 and {max}, got {got}")]
    InvalidCount { max: u32, got: u32 },

    #[error("A die needs at least 2 sides, got {0}")]
    InvalidSides(u32),
}

/// Parsed dice expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceNotation {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceNotation {
    pub const MAX_DICE_COUNT: u32 = 100;

    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let notation: String = notation
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase()
            .replace("d%", "d100");

        if notation.is_empty() {
            return Err(DiceError::Empty);
        }

        let invalid = || DiceError::InvalidNotation(notation.clone());

        let d_pos = notation.find('d').ok_or_else(invalid)?;
        let count = match &notation[..d_pos] {
            "" => 1,
            digits => digits.parse::<u32>().map_err(|_| invalid())?,
        };
        if count == 0 || count > Self::MAX_DICE_COUNT {
            return Err(DiceError::InvalidCount {
                max: Self::MAX_DICE_COUNT,
                got: count,
            });
        }

        let rest = &notation[d_pos + 1..];
        let (sides_str, modifier) = match rest.find(['+', '-']) {
            Some(pos) => {
                // Exactly one sign followed by digits
                let digits = &rest[pos + 1..];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                let magnitude = digits.parse::<i32>().map_err(|_| invalid())?;
                let modifier = if rest.as_bytes()[pos] == b'-' {
                    -magnitude
                } else {
                    magnitude
                };
                (&rest[..pos], modifier)
            }
            None => (rest, 0),
        };

        let sides = sides_str.parse::<u32>().map_err(|_| invalid())?;
        if sides < 2 {
            return Err(DiceError::InvalidSides(sides));
        }

        Ok(Self {
            count,
            sides,
            modifier,
        })
    }

    pub fn min_total(&self) -> i64 {
        i64::from(self.count) + i64::from(self.modifier)
    }

    pub fn max_total(&self) -> i64 {
        i64::from(self.count) * i64::from(self.sides) + i64::from(self.modifier)
    }

    pub fn roll(&self, rng: &mut impl Rng) -> DiceRoll {
        let rolls: Vec<u32> = (0..self.count)
            .map(|_| rng.gen_range(1..=self.sides))
            .collect();
        let total = rolls.iter().map(|&r| i64::from(r)).sum::<i64>() + i64::from(self.modifier);

        DiceRoll {
            notation: self.to_string(),
            rolls,
            modifier: self.modifier,
            total,
        }
    }
}

impl std::fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{}", m),
            m => write!(f, "{}", m),
        }
    }
}

impl std::str::FromStr for DiceNotation {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Outcome of rolling a [`DiceNotation`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub notation: String,
    pub rolls: Vec<u32>,
    pub modifier: i32,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_standard_forms() {
        assert_eq!(
            DiceNotation::parse("d20").unwrap(),
            DiceNotation { count: 1, sides: 20, modifier: 0 }
        );
        assert_eq!(
            DiceNotation::parse("3d8+5").unwrap(),
            DiceNotation { count: 3, sides: 8, modifier: 5 }
        );
        assert_eq!(
            DiceNotation::parse(" 4D6 - 2 ").unwrap(),
            DiceNotation { count: 4, sides: 6, modifier: -2 }
        );
        assert_eq!(DiceNotation::parse("d%").unwrap().sides, 100);
    }

    #[test]
    fn test_parse_rejects_bad_notation() {
        assert_eq!(DiceNotation::parse("  "), Err(DiceError::Empty));
        assert!(matches!(
            DiceNotation::parse("2x6"),
            Err(DiceError::InvalidNotation(_))
        ));
        assert!(matches!(
            DiceNotation::parse("0d6"),
            Err(DiceError::InvalidCount { got: 0, .. })
        ));
        assert!(matches!(
            DiceNotation::parse("101d6"),
            Err(DiceError::InvalidCount { got: 101, .. })
        ));
        assert_eq!(DiceNotation::parse("2d1"), Err(DiceError::InvalidSides(1)));
        assert!(DiceNotation::parse("2d6+").is_err());
        assert!(DiceNotation::parse("2d6+1+1").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_modifiers() {
        for notation in ["2d6++3", "2d6+-3", "2d6--3", "2d6+", "2d6-", "2d6+3+1", "2d6+3d"] {
            assert!(
                matches!(DiceNotation::parse(notation), Err(DiceError::InvalidNotation(_))),
                "{} should be rejected",
                notation
            );
        }
        assert_eq!(DiceNotation::parse("2d6+03").unwrap().modifier, 3);
    }

    #[test]
    fn test_display_normalizes() {
        assert_eq!(DiceNotation::parse("d6-1").unwrap().to_string(), "1d6-1");
        assert_eq!(DiceNotation::parse("2d10+0").unwrap().to_string(), "2d10");
    }

    #[test]
    fn test_roll_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let notation = DiceNotation::parse("3d6+2").unwrap();
        for _ in 0..500 {
            let roll = notation.roll(&mut rng);
            assert_eq!(roll.rolls.len(), 3);
            assert!(roll.rolls.iter().all(|r| (1..=6).contains(r)));
            assert!(roll.total >= notation.min_total());
            assert!(roll.total <= notation.max_total());
        }
    }
}
