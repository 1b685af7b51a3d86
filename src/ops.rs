use num::Float;
use serde::{Deserialize, Serialize};

/// And operator method for combining the degrees of propositions
/// in a fuzzy rule antecedent.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AndOp {
    #[default]
    Min,
    Prod,
    BoundedProd,
}

impl AndOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
        }
    }
}

/// Or operator method for combining the degrees of propositions
/// in a fuzzy rule antecedent.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
}

impl OrOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
        }
    }
}

/// Implication operator method for shaping a consequent by a rule's firing strength
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplicationOp {
    /// Mamdani: clips the consequent at the firing strength
    #[default]
    Min,
    /// Larsen: scales the consequent by the firing strength
    Prod,
}

impl ImplicationOp {
    pub fn call<F: Float>(self, strength: F, membership: impl IntoIterator<Item = F>) -> impl Iterator<Item = F> {
        membership.into_iter().map(move |m| match self {
            Self::Min => F::min(strength, m),
            Self::Prod => strength * m,
        })
    }
}

/// Method for aggregating the implied sets of the fuzzy rules
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
}

impl AggregationOp {
    /// Folds `implied` into `acc` pointwise
    pub fn call<F: Float>(self, acc: &mut [F], implied: impl IntoIterator<Item = F>) {
        for (a, v) in acc.iter_mut().zip(implied) {
            *a = match self {
                Self::Max => F::max(*a, v),
                Self::ProbOr => *a + v - *a * v,
                Self::BoundedSum => F::min(F::one(), *a + v),
            };
        }
    }
}

/// Fuzzy complement
pub fn not<F: Float>(u: F) -> F {
    F::one() - u
}

/// The operator set an engine runs with; the default is classic Mamdani min/max
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Operators {
    pub and: AndOp,
    pub or: OrOp,
    pub implication: ImplicationOp,
    pub aggregation: AggregationOp,
}

#[test]
fn test_default_is_mamdani() {
    let ops = Operators::default();

    assert_eq!(ops.and.call(0.3, 0.7), 0.3);
    assert_eq!(ops.or.call(0.3, 0.7), 0.7);
    assert_eq!(ops.implication.call(0.4, [0., 0.2, 0.9, 1.]).collect::<Vec<_>>(), vec![0., 0.2, 0.4, 0.4]);

    let mut acc = [0., 0.5, 0.2];
    ops.aggregation.call(&mut acc, [0.1, 0.1, 0.6]);

    assert_eq!(acc, [0.1, 0.5, 0.6]);
}

#[test]
fn test_alternative_operators() {
    assert_eq!(AndOp::Prod.call(0.5, 0.5), 0.25);
    assert_eq!(AndOp::BoundedProd.call(0.25, 0.5), 0.);
    assert_eq!(OrOp::ProbOr.call(0.5, 0.5), 0.75);
    assert_eq!(OrOp::BoundedSum.call(0.75, 0.5), 1.);
    assert_eq!(ImplicationOp::Prod.call(0.5, [1., 0.5]).collect::<Vec<_>>(), vec![0.5, 0.25]);

    let mut acc = [0.5];
    AggregationOp::BoundedSum.call(&mut acc, [0.75]);

    assert_eq!(acc, [1.]);
    assert_eq!(not(0.25), 0.75);
}
