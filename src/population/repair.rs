//! Boundary repair: mapping infeasible positions back into the box.

use crate::problem::Bounds;
use rand::Rng;

/// Policy for repairing out-of-bounds coordinates.
///
/// # Examples
///
/// ```
/// use herdopt::population::{amend_position, Repair};
/// use herdopt::problem::Bounds;
/// use rand::SeedableRng;
///
/// let bounds = Bounds::new(vec![-1.0, -1.0], vec![1.0, 1.0]).unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let x = amend_position(vec![3.0, -0.5], &bounds, Repair::Clip, &mut rng);
/// assert_eq!(x, vec![1.0, -0.5]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Repair {
    /// Clamp each coordinate to `[lower, upper]`.
    #[default]
    Clip,

    /// Redraw each out-of-bounds coordinate uniformly in `[lower, upper]`.
    ///
    /// Keeps exploratory steps from piling up on the boundary.
    RandomReinit,
}

/// Repairs `position` in place so every coordinate lies inside `bounds`.
///
/// NaN coordinates count as out of bounds: `Clip` maps them to the lower
/// bound, `RandomReinit` redraws them.
pub fn repair_in_place<R: Rng>(position: &mut [f64], bounds: &Bounds, policy: Repair, rng: &mut R) {
    let lanes = position
        .iter_mut()
        .zip(bounds.lower().iter().zip(bounds.upper().iter()));
    match policy {
        Repair::Clip => {
            for (x, (&lo, &hi)) in lanes {
                *x = (*x).max(lo).min(hi);
            }
        }
        Repair::RandomReinit => {
            for (x, (&lo, &hi)) in lanes {
                if !(lo <= *x && *x <= hi) {
                    *x = rng.random_range(lo..=hi);
                }
            }
        }
    }
}

/// Returns `position` repaired into `bounds`.
pub fn amend_position<R: Rng>(
    mut position: Vec<f64>,
    bounds: &Bounds,
    policy: Repair,
    rng: &mut R,
) -> Vec<f64> {
    repair_in_place(&mut position, bounds, policy, rng);
    position
}
