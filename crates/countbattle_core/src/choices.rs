//! Multiple-choice margins offered in hard mode.

use rand::Rng;
use tracing::{debug, instrument, warn};

/// Number of buttons shown.
pub const CHOICE_COUNT: usize = 4;

/// Largest distance between a wrong choice and the right one, when possible.
pub const MAX_CHOICE_OFFSET: u32 = 3;

const MAX_ATTEMPTS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spread {
    Smaller,
    Bigger,
    Either,
}

/// Returns [`CHOICE_COUNT`] distinct margins in increasing order, one of
/// which is `magnitude`.
///
/// Wrong choices lie within [`MAX_CHOICE_OFFSET`] of the right one. A third
/// of the time they are all below it, a third all above, and otherwise they
/// fall on both sides; choices below are clamped at zero. When random draws
/// do not fill the set, the nearest unused values are added, and only past
/// that is a value further away used.
#[instrument(skip(rng))]
pub fn score_choices<R: Rng + ?Sized>(magnitude: u32, rng: &mut R) -> Vec<u32> {
    let spread = match rng.random::<f64>() {
        roll if roll < 0.33 => Spread::Smaller,
        roll if roll < 0.66 => Spread::Bigger,
        _ => Spread::Either,
    };

    let mut choices = vec![magnitude];
    for _ in 0..MAX_ATTEMPTS {
        if choices.len() == CHOICE_COUNT {
            break;
        }
        let offset = rng.random_range(1..=MAX_CHOICE_OFFSET);
        let below = match spread {
            Spread::Smaller => true,
            Spread::Bigger => false,
            Spread::Either => rng.random_bool(0.5),
        };
        let choice = if below {
            magnitude.saturating_sub(offset)
        } else {
            magnitude.saturating_add(offset)
        };
        if !choices.contains(&choice) {
            choices.push(choice);
        }
    }

    if choices.len() < CHOICE_COUNT {
        warn!(?spread, found = choices.len(), "Filling score choices with fallbacks");
    }
    while choices.len() < CHOICE_COUNT {
        let nearest = (1..=MAX_CHOICE_OFFSET)
            .flat_map(|offset| [magnitude.saturating_add(offset), magnitude.saturating_sub(offset)])
            .find(|candidate| !choices.contains(candidate));
        let fallback = match nearest {
            Some(value) => value,
            None => choices.iter().max().copied().unwrap_or(magnitude).saturating_add(1),
        };
        choices.push(fallback);
    }

    choices.sort_unstable();
    debug!(?choices, "Generated score choices");
    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn zero_margin_still_gets_four_choices() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let choices = score_choices(0, &mut rng);
            assert_eq!(choices.len(), CHOICE_COUNT);
            assert_eq!(choices[0], 0);
        }
    }

    #[test]
    fn choices_stay_close_to_large_margins() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let choices = score_choices(40, &mut rng);
            assert!(choices.iter().all(|c| c.abs_diff(40) <= MAX_CHOICE_OFFSET));
        }
    }

    #[test]
    fn largest_margin_does_not_overflow() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            let choices = score_choices(u32::MAX, &mut rng);
            assert_eq!(choices.len(), CHOICE_COUNT);
            assert_eq!(choices[CHOICE_COUNT - 1], u32::MAX);
            assert!(choices.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
