//! Mamdani fuzzy inference: fuzzify crisp inputs, fire rules, aggregate the implied
//! output sets and defuzzify them by centroid.
//!
//! Build a system either through the handle API ([`Variables`], [`Rules`],
//! [`InferenceEngine`]) or declaratively from TOML with [`SystemConfig`].

mod config;
mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
mod rules;
mod variable;

pub use config::{ExprConfig, RuleConfig, ShapeConfig, SystemConfig, VariableConfig};
pub use dsl::Expr;
pub use error::{Error, Result};
pub use inference::InferenceEngine;
pub use inputs::Inputs;
pub use linspace::{Linspace, Universe, MAX_GRID_POINTS};
pub use math::{centroid, interp, interp_one};
pub use membership::MembershipFunction;
pub use ops::{AggregationOp, AndOp, ImplicationOp, Operators, OrOp};
pub use outputs::{OutputValue, Outputs};
pub use rules::{Rule, Rules};
pub use variable::{
    Antecedent, Consequent, Discretize, LinguisticVariable, Role, Term, Variable, VariableKey, VariableRole, Variables,
};
