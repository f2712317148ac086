use super::{fmt_shape, Space, SpaceSummary};
use crate::error::HarvestError;
use ndarray::{ArrayD, IxDyn};
use rand::Rng;
use rand_distr::{Distribution, Exp1, StandardNormal, Uniform};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arrays of `f32` with per-element inclusive bounds.
///
/// `low` and `high` are flattened in row-major order and have
/// `shape.iter().product()` elements. Infinite bounds are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    /// Lower bounds.
    pub low: Vec<f32>,

    /// Upper bounds.
    pub high: Vec<f32>,

    /// Shape of the elements.
    pub shape: Vec<usize>,
}

impl BoxSpace {
    /// Constructs a box with per-element bounds.
    pub fn new(low: Vec<f32>, high: Vec<f32>, shape: Vec<usize>) -> Result<Self, HarvestError> {
        let space = Self { low, high, shape };
        space.validate()?;
        Ok(space)
    }

    /// Constructs a box whose elements share the same bounds.
    pub fn uniform(shape: &[usize], low: f32, high: f32) -> Result<Self, HarvestError> {
        let n = shape.iter().product();
        Self::new(vec![low; n], vec![high; n], shape.to_vec())
    }

    /// Checks the lengths of the bounds and that `low <= high` everywhere.
    pub fn validate(&self) -> Result<(), HarvestError> {
        let n: usize = self.shape.iter().product();
        if self.low.len() != n || self.high.len() != n {
            return Err(HarvestError::InvalidSpace(format!(
                "Box of shape {:?} needs {} bounds, got {} low and {} high",
                self.shape,
                n,
                self.low.len(),
                self.high.len()
            )));
        }
        if let Some(i) = self
            .low
            .iter()
            .zip(&self.high)
            .position(|(l, h)| l.is_nan() || h.is_nan() || l > h)
        {
            return Err(HarvestError::InvalidSpace(format!(
                "Box bounds at {} are not ordered: low = {}, high = {}",
                i, self.low[i], self.high[i]
            )));
        }
        Ok(())
    }

    fn has_uniform_bounds(&self) -> bool {
        let same = |v: &[f32]| v.windows(2).all(|w| w[0] == w[1]);
        !self.low.is_empty() && same(self.low.as_slice()) && same(self.high.as_slice())
    }
}

// Bounded elements are uniform; the others follow Gymnasium.
fn sample_element<R: Rng + ?Sized>(low: f32, high: f32, rng: &mut R) -> f32 {
    if low == high {
        return low;
    }
    match (low.is_finite(), high.is_finite()) {
        (true, true) if (high - low).is_finite() => Uniform::new_inclusive(low, high).sample(rng),
        (true, true) => {
            // The width overflows f32, so scale a unit draw around the midpoint.
            let mid = low / 2.0 + high / 2.0;
            let half = high / 2.0 - low / 2.0;
            let u: f32 = Uniform::new_inclusive(-1.0f32, 1.0f32).sample(rng);
            (mid + half * u).clamp(low, high)
        }
        (true, false) => {
            let e: f32 = Exp1.sample(rng);
            low + e
        }
        (false, true) => {
            let e: f32 = Exp1.sample(rng);
            high - e
        }
        (false, false) => StandardNormal.sample(rng),
    }
}

impl Space for BoxSpace {
    type Sample = ArrayD<f32>;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ArrayD<f32> {
        let mut value = ArrayD::<f32>::zeros(IxDyn(&self.shape));
        for ((v, l), h) in value.iter_mut().zip(&self.low).zip(&self.high) {
            *v = sample_element(*l, *h, rng);
        }
        value
    }

    fn contains(&self, value: &ArrayD<f32>) -> bool {
        value.shape() == self.shape.as_slice()
            && value
                .iter()
                .zip(&self.low)
                .zip(&self.high)
                .all(|((v, l), h)| v >= l && v <= h)
    }

    fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    fn summary(&self) -> SpaceSummary {
        SpaceSummary::Box {
            shape: self.shape.clone(),
            low: self.low.clone(),
            high: self.high.clone(),
        }
    }
}

impl fmt::Display for BoxSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_uniform_bounds() {
            write!(
                f,
                "Box({:?}, {:?}, {}, float32)",
                self.low[0],
                self.high[0],
                fmt_shape(&self.shape)
            )
        } else {
            write!(
                f,
                "Box({:?}, {:?}, {}, float32)",
                self.low,
                self.high,
                fmt_shape(&self.shape)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn bounded_samples_are_contained() {
        let space = BoxSpace::new(vec![-1.0, 0.0, 5.0], vec![1.0, 255.0, 5.0], vec![3]).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..200 {
            let v = space.sample(&mut rng);
            assert_eq!(v.shape(), &[3]);
            assert!(space.contains(&v));
            assert_eq!(v.as_slice().unwrap()[2], 5.0);
        }
    }

    #[test]
    fn half_and_unbounded_samples_respect_finite_bounds() {
        let space = BoxSpace::new(
            vec![0.0, f32::NEG_INFINITY, f32::NEG_INFINITY],
            vec![f32::INFINITY, 2.0, f32::INFINITY],
            vec![3],
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(0);

        for _ in 0..200 {
            let v = space.sample(&mut rng);
            assert!(v.iter().all(|x| x.is_finite()));
            assert!(space.contains(&v));
        }
    }

    #[test]
    fn full_f32_range_does_not_overflow() {
        let space = BoxSpace::uniform(&[2], f32::MIN, f32::MAX).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let v = space.sample(&mut rng);
        assert!(v.iter().all(|x| x.is_finite()));
        assert!(space.contains(&v));
    }

    #[test]
    fn degenerate_bounds_sample_the_bound() {
        let space = BoxSpace::new(
            vec![f32::INFINITY, f32::NEG_INFINITY, 3.0],
            vec![f32::INFINITY, f32::NEG_INFINITY, 3.0],
            vec![3],
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..20 {
            let v = space.sample(&mut rng);
            assert!(space.contains(&v));
            assert_eq!(v.as_slice().unwrap(), &[f32::INFINITY, f32::NEG_INFINITY, 3.0]);
        }
    }

    #[test]
    fn contains_rejects_wrong_shape_and_nan() {
        let space = BoxSpace::uniform(&[2, 2], 0.0, 1.0).unwrap();
        assert!(space.contains(&ArrayD::zeros(IxDyn(&[2, 2]))));
        assert!(!space.contains(&ArrayD::zeros(IxDyn(&[4]))));
        assert!(!space.contains(&ArrayD::from_elem(IxDyn(&[2, 2]), f32::NAN)));
        assert!(!space.contains(&ArrayD::from_elem(IxDyn(&[2, 2]), 1.5)));
    }

    #[test]
    fn malformed_bounds_are_rejected() {
        assert!(BoxSpace::new(vec![0.0], vec![1.0, 1.0], vec![2]).is_err());
        assert!(BoxSpace::new(vec![1.0], vec![0.0], vec![1]).is_err());
        assert!(BoxSpace::new(vec![f32::NAN], vec![0.0], vec![1]).is_err());
    }

    #[test]
    fn display_follows_gymnasium() {
        let space = BoxSpace::uniform(&[88, 88, 3], 0.0, 255.0).unwrap();
        assert_eq!(space.to_string(), "Box(0.0, 255.0, (88, 88, 3), float32)");

        let space = BoxSpace::new(vec![0.0, -1.0], vec![1.0, 1.0], vec![2]).unwrap();
        assert_eq!(
            space.to_string(),
            "Box([0.0, -1.0], [1.0, 1.0], (2,), float32)"
        );
    }
}
