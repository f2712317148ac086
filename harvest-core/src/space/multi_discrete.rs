use super::{Space, SpaceSummary};
use crate::error::HarvestError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vectors whose `i`-th component is in `0..nvec[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiDiscrete {
    /// Number of elements of each component.
    pub nvec: Vec<usize>,
}

impl MultiDiscrete {
    /// Constructs the space.
    pub fn new(nvec: Vec<usize>) -> Result<Self, HarvestError> {
        let space = Self { nvec };
        space.validate()?;
        Ok(space)
    }

    /// Checks that there is at least one component and none is empty.
    pub fn validate(&self) -> Result<(), HarvestError> {
        if self.nvec.is_empty() || self.nvec.contains(&0) {
            return Err(HarvestError::InvalidSpace(format!(
                "MultiDiscrete needs non-empty components, got {:?}",
                self.nvec
            )));
        }
        Ok(())
    }
}

impl Space for MultiDiscrete {
    type Sample = Vec<usize>;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        self.nvec.iter().map(|n| rng.gen_range(0..*n)).collect()
    }

    fn contains(&self, value: &Vec<usize>) -> bool {
        value.len() == self.nvec.len() && value.iter().zip(&self.nvec).all(|(v, n)| v < n)
    }

    fn shape(&self) -> Vec<usize> {
        vec![self.nvec.len()]
    }

    fn summary(&self) -> SpaceSummary {
        SpaceSummary::MultiDiscrete {
            nvec: self.nvec.clone(),
        }
    }
}

impl fmt::Display for MultiDiscrete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nvec: Vec<String> = self.nvec.iter().map(|n| n.to_string()).collect();
        write!(f, "MultiDiscrete([{}])", nvec.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn samples_are_contained() {
        let space = MultiDiscrete::new(vec![3, 1, 5]).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..100 {
            let v = space.sample(&mut rng);
            assert!(space.contains(&v));
            assert_eq!(v[1], 0);
        }
        assert!(!space.contains(&vec![0, 0]));
        assert!(!space.contains(&vec![3, 0, 0]));
        assert_eq!(space.to_string(), "MultiDiscrete([3 1 5])");
    }

    #[test]
    fn empty_components_are_rejected() {
        assert!(MultiDiscrete::new(vec![]).is_err());
        assert!(MultiDiscrete::new(vec![2, 0]).is_err());
    }
}
