//! Dice expressions like "2d6+1": N dice of S sides plus a flat modifier.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::combat::rng::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceExpr {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceExpr {
    pub const fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    pub fn roll(&self, rng: &mut Rng) -> i32 {
        let mut total = self.modifier;
        for _ in 0..self.count {
            total += rng.roll_die(self.sides);
        }
        total
    }

    /// Expected value, used for threat-rating heuristics and info output.
    pub fn average(&self) -> f64 {
        f64::from(self.count) * (f64::from(self.sides) + 1.0) / 2.0 + f64::from(self.modifier)
    }

    pub fn min_roll(&self) -> i32 {
        self.count as i32 + self.modifier
    }

    pub fn max_roll(&self) -> i32 {
        (self.count * self.sides) as i32 + self.modifier
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.modifier > 0 {
            write!(f, "+{}", self.modifier)?;
        } else if self.modifier < 0 {
            write!(f, "{}", self.modifier)?;
        }
        Ok(())
    }
}

impl Serialize for DiceExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceParseError {
    pub input: String,
}

impl fmt::Display for DiceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid dice expression '{}'", self.input)
    }
}

impl std::error::Error for DiceParseError {}

impl FromStr for DiceExpr {
    type Err = DiceParseError;

    /// Accepts "NdS", "NdS+M", "NdS-M"; a missing N means one die ("d8" == "1d8").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DiceParseError {
            input: s.to_string(),
        };
        let trimmed = s.trim();
        let (dice_part, modifier) = match trimmed.find(['+', '-']) {
            Some(pos) => {
                let modifier: i32 = trimmed[pos..].parse().map_err(|_| err())?;
                (&trimmed[..pos], modifier)
            }
            None => (trimmed, 0),
        };
        let (count_str, sides_str) = dice_part.split_once(['d', 'D']).ok_or_else(err)?;
        let count = if count_str.is_empty() {
            1
        } else {
            count_str.parse().map_err(|_| err())?
        };
        let sides: u32 = sides_str.parse().map_err(|_| err())?;
        if count == 0 || sides == 0 {
            return Err(err());
        }
        Ok(Self::new(count, sides, modifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_modified_expressions() {
        assert_eq!("2d6".parse(), Ok(DiceExpr::new(2, 6, 0)));
        assert_eq!("2d6+1".parse(), Ok(DiceExpr::new(2, 6, 1)));
        assert_eq!("1d8-2".parse(), Ok(DiceExpr::new(1, 8, -2)));
        assert_eq!("d12".parse(), Ok(DiceExpr::new(1, 12, 0)));
    }

    #[test]
    fn rejects_malformed_expressions() {
        for bad in ["", "2", "d", "2d", "0d6", "2d0", "2x6", "2d6+"] {
            assert!(bad.parse::<DiceExpr>().is_err(), "accepted '{bad}'");
        }
    }

    #[test]
    fn display_round_trips() {
        for text in ["2d6", "2d6+1", "1d8-2"] {
            let expr: DiceExpr = text.parse().expect("valid");
            assert_eq!(expr.to_string(), text);
        }
    }

    #[test]
    fn rolls_stay_within_bounds() {
        let expr = DiceExpr::new(3, 4, 2);
        let mut rng = Rng::new(9);
        for _ in 0..500 {
            let roll = expr.roll(&mut rng);
            assert!(roll >= expr.min_roll() && roll <= expr.max_roll());
        }
    }

    #[test]
    fn average_matches_closed_form() {
        let expr = DiceExpr::new(2, 6, 1);
        assert!((expr.average() - 8.0).abs() < 1e-12);
    }
}
