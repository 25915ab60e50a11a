use rand::Rng;

use crate::catalog::TraitCategory;
use crate::constants::rng::{SPLITMIX_GAMMA, SPLITMIX_MUL_1, SPLITMIX_MUL_2};
use crate::constants::traits::PLACEHOLDER_NONE;
use crate::errors::GeneratorError;
use crate::types::TraitValue;

#[derive(Debug, Clone)]
/// Small deterministic RNG used for reproducible generation runs.
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    /// Create an RNG whose whole stream is determined by `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(SPLITMIX_GAMMA);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX_MUL_1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX_MUL_2);
        z ^ (z >> 31)
    }
}

impl rand::RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let value = self.next_u64_internal();
            let bytes = value.to_le_bytes();
            let remaining = dest.len() - offset;
            let copy_len = remaining.min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}

/// Pick one option from `category` by weighted roulette.
///
/// With `exclude_placeholder` set, `none`/`default` options are removed before
/// weights are summed. A draw `r` in `[0, total)` selects the first option whose
/// cumulative weight is `>= r`: ties at a boundary go to the earlier option and
/// a zero-weight option sitting on a boundary can absorb that draw.
///
/// Returns `Ok(None)` when the `none` placeholder is selected and the option
/// name lower-cased otherwise (including a selected `default`).
pub fn sample_trait<R: Rng + ?Sized>(
    category: &TraitCategory,
    exclude_placeholder: bool,
    rng: &mut R,
) -> Result<Option<TraitValue>, GeneratorError> {
    let total = category.total_weight(exclude_placeholder);
    if total <= 0.0 || total.is_nan() {
        return Err(GeneratorError::Configuration(format!(
            "no eligible weight to sample from (exclude_placeholder={exclude_placeholder})"
        )));
    }

    let draw = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for option in category.eligible(exclude_placeholder) {
        cumulative += option.weight;
        if cumulative >= draw {
            if option.name == PLACEHOLDER_NONE {
                return Ok(None);
            }
            return Ok(Some(option.name.to_lowercase()));
        }
    }

    // Only reachable with negative weights dragging the running sum below the draw.
    Err(GeneratorError::Configuration(format!(
        "weighted walk ended without a selection (draw={draw}, total={total})"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TraitOption;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, VecDeque};

    /// Replays fixed `u64` words so each `random::<f64>()` yields a chosen fraction.
    struct ScriptedRng {
        words: VecDeque<u64>,
    }

    impl ScriptedRng {
        fn fractions(values: &[f64]) -> Self {
            Self {
                words: values
                    .iter()
                    .map(|f| ((f * (1u64 << 53) as f64) as u64) << 11)
                    .collect(),
            }
        }
    }

    impl rand::RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.words.pop_front().expect("scripted rng exhausted")
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }

    fn two_options() -> TraitCategory {
        TraitCategory::new([TraitOption::new("A", 1.0), TraitOption::new("B", 3.0)])
    }

    #[test]
    fn cumulative_walk_follows_scripted_draws() {
        // total=4: draws 0.0, 0.25*4=1.0, 0.5*4=2.0, 0.99*4=3.96
        let mut rng = ScriptedRng::fractions(&[0.0, 0.25, 0.5, 0.99]);
        let category = two_options();
        let picks: Vec<Option<String>> = (0..4)
            .map(|_| sample_trait(&category, false, &mut rng).unwrap())
            .collect();
        assert_eq!(
            picks,
            vec![
                Some("a".to_string()),
                Some("a".to_string()),
                Some("b".to_string()),
                Some("b".to_string()),
            ]
        );
    }

    #[test]
    fn boundary_draws_favor_the_earlier_option() {
        let category = TraitCategory::new([
            TraitOption::new("Ghost", 0.0),
            TraitOption::new("A", 1.0),
            TraitOption::new("B", 1.0),
        ]);
        // A zero draw is absorbed by the leading zero-weight option.
        let mut rng = ScriptedRng::fractions(&[0.0, 0.5, 0.75]);
        assert_eq!(
            sample_trait(&category, false, &mut rng).unwrap(),
            Some("ghost".to_string())
        );
        // draw = 1.0 equals A's cumulative weight exactly.
        assert_eq!(
            sample_trait(&category, false, &mut rng).unwrap(),
            Some("a".to_string())
        );
        assert_eq!(
            sample_trait(&category, false, &mut rng).unwrap(),
            Some("b".to_string())
        );
    }

    #[test]
    fn none_placeholder_yields_absent_and_default_is_a_value() {
        let category = TraitCategory::new([
            TraitOption::new("none", 1.0),
            TraitOption::new("default", 1.0),
        ]);
        let mut rng = ScriptedRng::fractions(&[0.1, 0.9]);
        assert_eq!(sample_trait(&category, false, &mut rng).unwrap(), None);
        assert_eq!(
            sample_trait(&category, false, &mut rng).unwrap(),
            Some("default".to_string())
        );
    }

    #[test]
    fn excluded_placeholder_never_selected_even_with_equal_weight() {
        let category = TraitCategory::new([
            TraitOption::new("none", 5.0),
            TraitOption::new("Crown", 5.0),
        ]);
        let mut rng = ScriptedRng::fractions(&[0.0, 0.3, 0.6, 0.999]);
        for _ in 0..4 {
            assert_eq!(
                sample_trait(&category, true, &mut rng).unwrap(),
                Some("crown".to_string())
            );
        }
    }

    #[test]
    fn excluding_every_option_is_a_configuration_error() {
        let category = TraitCategory::new([
            TraitOption::new("none", 1.0),
            TraitOption::new("default", 1.0),
        ]);
        let mut rng = StdRng::from_seed([0_u8; 32]);
        assert!(matches!(
            sample_trait(&category, true, &mut rng),
            Err(GeneratorError::Configuration(_))
        ));
        assert!(matches!(
            sample_trait(&TraitCategory::default(), false, &mut rng),
            Err(GeneratorError::Configuration(_))
        ));
    }

    #[test]
    fn values_are_lower_cased() {
        let category = TraitCategory::new([TraitOption::new("Top HAT", 1.0)]);
        let mut rng = StdRng::from_seed([1_u8; 32]);
        assert_eq!(
            sample_trait(&category, false, &mut rng).unwrap(),
            Some("top hat".to_string())
        );
    }

    #[test]
    fn frequencies_converge_to_weight_share() {
        let category = two_options();
        let mut rng = StdRng::from_seed([9_u8; 32]);
        let trials = 40_000;
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..trials {
            let pick = sample_trait(&category, false, &mut rng).unwrap().unwrap();
            *counts.entry(pick).or_default() += 1;
        }
        let share_a = counts["a"] as f64 / trials as f64;
        // Expected 0.25; sd ~= 0.0022, so 0.02 is a very wide band.
        assert!((share_a - 0.25).abs() < 0.02, "share_a = {share_a}");
    }

    #[test]
    fn deterministic_rng_replays_identical_streams() {
        let category = TraitCategory::new([
            TraitOption::new("A", 1.0),
            TraitOption::new("B", 1.0),
            TraitOption::new("C", 1.0),
        ]);
        let mut left = DeterministicRng::new(7);
        let mut right = DeterministicRng::new(7);
        for _ in 0..32 {
            assert_eq!(
                sample_trait(&category, false, &mut left).unwrap(),
                sample_trait(&category, false, &mut right).unwrap()
            );
        }
    }
}
