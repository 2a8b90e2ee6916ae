//! Core problem-side types: optimization direction, bound shapes, and the
//! objective contract.

use crate::error::{BoxError, OptimError, Result};
use std::str::FromStr;

/// Optimization direction.
///
/// Internally every comparison is "lower is better"; maximization problems
/// are handled by negating the weighted objective value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Minimize the weighted objective.
    #[default]
    Minimize,
    /// Maximize the weighted objective.
    Maximize,
}

impl Direction {
    /// Sign applied to the weighted value to obtain the internal score.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Minimize => 1.0,
            Direction::Maximize => -1.0,
        }
    }
}

impl FromStr for Direction {
    type Err = OptimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" | "minimize" => Ok(Direction::Minimize),
            "max" | "maximize" => Ok(Direction::Maximize),
            other => Err(OptimError::config(
                "direction",
                format!("expected \"min\" or \"max\", got {other:?}"),
            )),
        }
    }
}

/// A lower or upper bound as supplied by the caller.
///
/// Both shapes are normalized into one value per dimension by
/// [`ProblemBuilder::build`](super::ProblemBuilder::build):
///
/// - `Scalar(v)` repeats `v` for every dimension and needs an explicit
///   dimension.
/// - `Vector(vs)` gives one value per dimension. A single-element vector is
///   broadcast when an explicit dimension is set.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// Same bound for every dimension.
    Scalar(f64),
    /// One bound per dimension.
    Vector(Vec<f64>),
}

impl Bound {
    /// Resolves the bound into a per-dimension vector.
    pub fn resolve(&self, dimension: Option<usize>) -> Result<Vec<f64>> {
        match (self, dimension) {
            (_, Some(0)) => Err(OptimError::ZeroDimension),
            (Bound::Scalar(_), None) => Err(OptimError::MissingDimension),
            (Bound::Scalar(v), Some(d)) => Ok(vec![*v; d]),
            (Bound::Vector(vs), _) if vs.is_empty() => Err(OptimError::ZeroDimension),
            (Bound::Vector(vs), None) => Ok(vs.clone()),
            (Bound::Vector(vs), Some(d)) if vs.len() == d => Ok(vs.clone()),
            (Bound::Vector(vs), Some(d)) if vs.len() == 1 => Ok(vec![vs[0]; d]),
            (Bound::Vector(vs), Some(d)) => Err(OptimError::DimensionMismatch {
                len: vs.len(),
                dimension: d,
            }),
        }
    }
}

impl From<f64> for Bound {
    fn from(v: f64) -> Self {
        Bound::Scalar(v)
    }
}

impl From<Vec<f64>> for Bound {
    fn from(vs: Vec<f64>) -> Self {
        Bound::Vector(vs)
    }
}

impl From<&[f64]> for Bound {
    fn from(vs: &[f64]) -> Self {
        Bound::Vector(vs.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Bound {
    fn from(vs: [f64; N]) -> Self {
        Bound::Vector(vs.to_vec())
    }
}

/// The function being optimized.
///
/// Returns one value per objective. Any closure `Fn(&[f64]) -> T` where
/// `T: ObjectiveOutput` implements this trait, so plain closures returning
/// `f64`, `Vec<f64>`, `[f64; N]` or a `Result` of those can be used
/// directly:
///
/// ```
/// use herdopt::problem::Objective;
///
/// let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
/// assert_eq!(sphere.evaluate(&[1.0, 2.0]).unwrap(), vec![5.0]);
/// ```
///
/// The objective must be side-effect free with respect to the search: the
/// engine may evaluate candidates in any order when the `parallel` feature
/// is enabled.
pub trait Objective: Send + Sync {
    /// Evaluates a position and returns its raw objective vector.
    fn evaluate(&self, position: &[f64]) -> Result<Vec<f64>>;
}

impl<F, T> Objective for F
where
    F: Fn(&[f64]) -> T + Send + Sync,
    T: ObjectiveOutput,
{
    fn evaluate(&self, position: &[f64]) -> Result<Vec<f64>> {
        self(position).into_objectives()
    }
}

/// Values an objective closure may return.
pub trait ObjectiveOutput {
    /// Converts the value into an objective vector.
    fn into_objectives(self) -> Result<Vec<f64>>;
}

impl ObjectiveOutput for f64 {
    fn into_objectives(self) -> Result<Vec<f64>> {
        Ok(vec![self])
    }
}

impl ObjectiveOutput for Vec<f64> {
    fn into_objectives(self) -> Result<Vec<f64>> {
        Ok(self)
    }
}

impl<const N: usize> ObjectiveOutput for [f64; N] {
    fn into_objectives(self) -> Result<Vec<f64>> {
        Ok(self.to_vec())
    }
}

impl<T, E> ObjectiveOutput for std::result::Result<T, E>
where
    T: ObjectiveOutput,
    E: Into<BoxError>,
{
    fn into_objectives(self) -> Result<Vec<f64>> {
        self.map_err(|e| OptimError::Objective(e.into()))?
            .into_objectives()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!("min".parse::<Direction>().unwrap(), Direction::Minimize);
        assert_eq!(" MAX ".parse::<Direction>().unwrap(), Direction::Maximize);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Minimize.sign(), 1.0);
        assert_eq!(Direction::Maximize.sign(), -1.0);
    }

    #[test]
    fn test_scalar_bound_needs_dimension() {
        assert!(matches!(
            Bound::Scalar(1.0).resolve(None),
            Err(OptimError::MissingDimension)
        ));
        assert_eq!(Bound::Scalar(-5.0).resolve(Some(3)).unwrap(), vec![-5.0; 3]);
    }

    #[test]
    fn test_vector_bound_shapes() {
        let b = Bound::from(vec![1.0, 2.0]);
        assert_eq!(b.resolve(None).unwrap(), vec![1.0, 2.0]);
        assert_eq!(b.resolve(Some(2)).unwrap(), vec![1.0, 2.0]);
        assert!(matches!(
            b.resolve(Some(3)),
            Err(OptimError::DimensionMismatch { len: 2, dimension: 3 })
        ));

        // single element broadcasts
        let b = Bound::from([10.0]);
        assert_eq!(b.resolve(Some(4)).unwrap(), vec![10.0; 4]);
    }

    #[test]
    fn test_empty_and_zero_dimension() {
        assert!(matches!(
            Bound::Vector(vec![]).resolve(None),
            Err(OptimError::ZeroDimension)
        ));
        assert!(matches!(
            Bound::Scalar(0.0).resolve(Some(0)),
            Err(OptimError::ZeroDimension)
        ));
    }

    #[test]
    fn test_closure_outputs() {
        let scalar = |x: &[f64]| x[0];
        assert_eq!(scalar.evaluate(&[3.0]).unwrap(), vec![3.0]);

        let pair = |x: &[f64]| [x[0], -x[0]];
        assert_eq!(pair.evaluate(&[2.0]).unwrap(), vec![2.0, -2.0]);

        let many = |x: &[f64]| x.to_vec();
        assert_eq!(many.evaluate(&[1.0, 2.0, 3.0]).unwrap().len(), 3);
    }

    #[test]
    fn test_fallible_closure() {
        let checked = |x: &[f64]| -> std::result::Result<f64, String> {
            if x[0] < 0.0 {
                Err(format!("negative input {}", x[0]))
            } else {
                Ok(x[0].sqrt())
            }
        };
        assert_eq!(checked.evaluate(&[4.0]).unwrap(), vec![2.0]);
        let err = checked.evaluate(&[-1.0]).unwrap_err();
        assert!(matches!(err, OptimError::Objective(_)));
        assert!(err.to_string().contains("negative input"));
    }
}
