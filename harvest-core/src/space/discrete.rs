use super::{Space, SpaceSummary};
use crate::error::HarvestError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integers `start, start + 1, ..., start + n - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrete {
    /// Number of elements.
    pub n: usize,

    /// Smallest element.
    #[serde(default)]
    pub start: i64,
}

impl Discrete {
    /// Integers `0, ..., n - 1`.
    pub fn new(n: usize) -> Result<Self, HarvestError> {
        Self::with_start(n, 0)
    }

    /// Integers `start, ..., start + n - 1`.
    pub fn with_start(n: usize, start: i64) -> Result<Self, HarvestError> {
        let space = Self { n, start };
        space.validate()?;
        Ok(space)
    }

    /// Checks that the space is non-empty and its largest element fits in `i64`.
    pub fn validate(&self) -> Result<(), HarvestError> {
        if self.n == 0 {
            return Err(HarvestError::InvalidSpace(
                "Discrete space needs at least one element".to_string(),
            ));
        }
        let last = i64::try_from(self.n - 1)
            .ok()
            .and_then(|d| self.start.checked_add(d));
        if last.is_none() {
            return Err(HarvestError::InvalidSpace(format!(
                "Discrete({}, start={}) exceeds the range of i64",
                self.n, self.start
            )));
        }
        Ok(())
    }
}

impl Space for Discrete {
    type Sample = i64;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        (self.start as i128 + rng.gen_range(0..self.n) as i128) as i64
    }

    fn contains(&self, value: &i64) -> bool {
        let (value, start) = (*value as i128, self.start as i128);
        value >= start && value < start + self.n as i128
    }

    fn shape(&self) -> Vec<usize> {
        vec![]
    }

    fn summary(&self) -> SpaceSummary {
        SpaceSummary::Discrete {
            n: self.n,
            start: self.start,
        }
    }
}

impl fmt::Display for Discrete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == 0 {
            write!(f, "Discrete({})", self.n)
        } else {
            write!(f, "Discrete({}, start={})", self.n, self.start)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn samples_stay_in_range() {
        let space = Discrete::with_start(4, -1).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..200 {
            let v = space.sample(&mut rng);
            assert!(space.contains(&v));
            assert!((-1..3).contains(&v));
        }
    }

    #[test]
    fn contains_checks_both_ends() {
        let space = Discrete::new(5).unwrap();
        assert!(space.contains(&0));
        assert!(space.contains(&4));
        assert!(!space.contains(&5));
        assert!(!space.contains(&-1));
    }

    #[test]
    fn empty_space_is_rejected() {
        assert!(matches!(
            Discrete::new(0),
            Err(HarvestError::InvalidSpace(_))
        ));
    }

    #[test]
    fn ranges_beyond_i64_are_rejected() {
        let space: Discrete = serde_yaml::from_str("n: 2\nstart: 9223372036854775807\n").unwrap();
        assert!(matches!(space.validate(), Err(HarvestError::InvalidSpace(_))));
        assert!(!space.contains(&i64::MIN));
        assert!(space.contains(&i64::MAX));

        assert!(Discrete::with_start(1, i64::MAX).is_ok());
        assert!(Discrete::with_start(2, i64::MAX - 1).is_ok());
        assert!(Discrete::new(usize::MAX).is_err());

        let space = Discrete::with_start(3, i64::MAX - 2).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..50 {
            assert!(space.contains(&space.sample(&mut rng)));
        }
    }

    #[test]
    fn display_follows_gymnasium() {
        assert_eq!(Discrete::new(8).unwrap().to_string(), "Discrete(8)");
        assert_eq!(
            Discrete::with_start(3, 1).unwrap().to_string(),
            "Discrete(3, start=1)"
        );
    }
}
