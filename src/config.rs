//! Declarative construction of an inference engine
//!
//! A system is described by its operators, linguistic variables and rules. Names are
//! resolved to handles once, in [`SystemConfig::build`]; nothing is looked up by name
//! while computing.
//!
//! # Example Configuration
//!
//! ```toml
//! [operators]
//! and = "min"
//! or = "max"
//!
//! [[variables]]
//! name = "temperatura"
//! role = "antecedent"
//! universe = [0, 100, 1]
//! terms = { baixa = [0, 0, 50], media = [25, 50, 75], alta = [50, 100, 100] }
//!
//! [[variables]]
//! name = "abertura"
//! role = "consequent"
//! universe = [0, 100, 1]
//! terms = { pequena = [0, 0, 50], grande = [50, 100, 100] }
//!
//! [[rules]]
//! antecedent = { is = ["temperatura", "baixa"] }
//! consequent = [["abertura", "grande"]]
//! weight = 0.8
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dsl::Expr;
use crate::error::{Error, Result};
use crate::inference::InferenceEngine;
use crate::linspace::Universe;
use crate::membership::MembershipFunction;
use crate::ops::Operators;
use crate::rules::{Rule, Rules};
use crate::variable::{Antecedent, Consequent, Role, Variables};

/// Full description of a fuzzy system
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub operators: Operators,
    pub variables: Vec<VariableConfig>,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    pub role: Role,
    /// `[min, max, step]`
    pub universe: [f64; 3],
    #[serde(default)]
    pub terms: BTreeMap<String, ShapeConfig>,
}

/// A membership function shape
///
/// Arrays of three and four numbers are triangles and trapezoids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeConfig {
    Triangular([f64; 3]),
    Trapezoidal([f64; 4]),
    Gaussian { mean: f64, sigma: f64 },
    Piecewise { points: Vec<[f64; 2]> },
}

impl ShapeConfig {
    pub fn to_membership(&self) -> Result<MembershipFunction> {
        match *self {
            Self::Triangular([a, b, c]) => MembershipFunction::triangular(a, b, c),
            Self::Trapezoidal([a, b, c, d]) => MembershipFunction::trapezoidal(a, b, c, d),
            Self::Gaussian { mean, sigma } => MembershipFunction::gaussian(mean, sigma),
            Self::Piecewise { ref points } => MembershipFunction::piecewise(points.iter().map(|&[x, y]| (x, y))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub antecedent: ExprConfig,
    /// `[variable, term]` pairs
    pub consequent: Vec<(String, String)>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// Antecedent expression by name; `and`/`or` lists fold left into binary nodes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExprConfig {
    Is(String, String),
    And(Vec<ExprConfig>),
    Or(Vec<ExprConfig>),
    Not(Box<ExprConfig>),
}

impl ExprConfig {
    fn resolve(&self, vars: &Variables) -> Result<Expr> {
        match self {
            Self::Is(variable, term) => {
                let var = vars.lookup::<Antecedent>(variable)?;

                Ok(vars.term(var, term)?.is())
            },
            Self::And(exprs) => Self::fold(exprs, vars, "and", |lhs, rhs| lhs.and(rhs)),
            Self::Or(exprs) => Self::fold(exprs, vars, "or", |lhs, rhs| lhs.or(rhs)),
            Self::Not(expr) => Ok(expr.resolve(vars)?.negate()),
        }
    }

    fn fold(exprs: &[ExprConfig], vars: &Variables, op: &str, combine: fn(Expr, Expr) -> Expr) -> Result<Expr> {
        let (first, rest) = exprs
            .split_first()
            .ok_or_else(|| Error::invalid_rule(format!("`{op}` needs at least one operand")))?;
        let mut expr = first.resolve(vars)?;

        for next in rest {
            expr = combine(expr, next.resolve(vars)?);
        }

        Ok(expr)
    }
}

impl SystemConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;

        debug!(
            path = %path.display(),
            variables = config.variables.len(),
            rules = config.rules.len(),
            "Loaded fuzzy system config"
        );

        Ok(config)
    }

    /// Validates the description and builds an engine; no partial engine is returned on error
    pub fn build(&self) -> Result<InferenceEngine> {
        let mut vars = Variables::new();

        for var in &self.variables {
            let [min, max, step] = var.universe;
            let universe = Universe::new(min, max, step)?;

            match var.role {
                Role::Antecedent => {
                    let handle = vars.add_antecedent(var.name.as_str(), universe)?;

                    for (term, shape) in &var.terms {
                        vars.add_term(handle, term.as_str(), shape.to_membership()?)?;
                    }
                },
                Role::Consequent => {
                    let handle = vars.add_consequent(var.name.as_str(), universe)?;

                    for (term, shape) in &var.terms {
                        vars.add_term(handle, term.as_str(), shape.to_membership()?)?;
                    }
                },
            }
        }

        let mut rules = Rules::with_capacity(self.rules.len());

        for rule in &self.rules {
            let antecedent = rule.antecedent.resolve(&vars)?;
            let consequents = rule
                .consequent
                .iter()
                .map(|(variable, term)| {
                    let var = vars.lookup::<Consequent>(variable)?;

                    vars.term(var, term)
                })
                .collect::<Result<Vec<_>>>()?;

            rules.push(Rule::new(antecedent, consequents)?.with_weight(rule.weight)?);
        }

        InferenceEngine::with_operators(vars, rules, self.operators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
        [[variables]]
        name = "t"
        role = "antecedent"
        universe = [0, 10, 1]
        terms = { low = [0, 0, 5], high = [5, 10, 10] }

        [[variables]]
        name = "o"
        role = "consequent"
        universe = [0, 10, 0.5]
        terms = { small = [0, 0, 5], big = [5, 10, 10], flat = [0, 2, 8, 10], bell = { mean = 5, sigma = 1 }, ramp = { points = [[0, 0], [10, 1]] } }

        [[rules]]
        antecedent = { or = [{ is = ["t", "low"] }, { not = { is = ["t", "high"] } }] }
        consequent = [["o", "small"], ["o", "bell"]]
    "#;

    #[test]
    fn test_parse_shapes_and_defaults() {
        let config = SystemConfig::from_toml_str(SMALL).unwrap();
        let output = &config.variables[1];

        assert_eq!(config.operators, Operators::default());
        assert_eq!(output.universe, [0., 10., 0.5]);
        assert_eq!(output.terms["small"], ShapeConfig::Triangular([0., 0., 5.]));
        assert_eq!(output.terms["flat"], ShapeConfig::Trapezoidal([0., 2., 8., 10.]));
        assert_eq!(output.terms["bell"], ShapeConfig::Gaussian { mean: 5., sigma: 1. });
        assert_eq!(
            output.terms["ramp"],
            ShapeConfig::Piecewise {
                points: vec![[0., 0.], [10., 1.]]
            }
        );
        assert_eq!(config.rules[0].weight, 1.0);
    }

    #[test]
    fn test_build_and_compute() {
        let engine = SystemConfig::from_toml_str(SMALL).unwrap().build().unwrap();
        let outputs = engine.compute_named([("t", 0.)]).unwrap();
        let value = outputs.by_name("o").unwrap();

        assert!(value > 0. && value < 5.);
        assert_eq!(engine.variables().len(), 2);
        assert_eq!(engine.rules().len(), 1);
    }

    fn with_rule(rule: &str) -> String {
        format!("{SMALL}\n[[rules]]\n{rule}\n")
    }

    #[test]
    fn test_unknown_names_are_rejected_at_build() {
        let unknown_term = with_rule(r#"antecedent = { is = ["t", "warm"] }
consequent = [["o", "small"]]"#);
        let unknown_var = with_rule(r#"antecedent = { is = ["p", "low"] }
consequent = [["o", "small"]]"#);
        let wrong_role = with_rule(r#"antecedent = { is = ["o", "small"] }
consequent = [["o", "small"]]"#);
        let empty_and = with_rule(r#"antecedent = { and = [] }
consequent = [["o", "small"]]"#);
        let no_consequent = with_rule(r#"antecedent = { is = ["t", "low"] }
consequent = []"#);

        let build = |s: &str| SystemConfig::from_toml_str(s).unwrap().build();

        assert!(matches!(build(&unknown_term), Err(Error::UnknownTerm { term, .. }) if term == "warm"));
        assert!(matches!(build(&unknown_var), Err(Error::UnknownVariable(name)) if name == "p"));
        assert!(matches!(build(&wrong_role), Err(Error::RoleMismatch { .. })));
        assert!(matches!(build(&empty_and), Err(Error::InvalidRule(_))));
        assert!(matches!(build(&no_consequent), Err(Error::EmptyConsequent)));
    }

    #[test]
    fn test_invalid_shape_and_universe() {
        let bad_shape = SMALL.replace("low = [0, 0, 5]", "low = [5, 0, 0]");
        let bad_universe = SMALL.replace("universe = [0, 10, 1]", "universe = [0, 10, 0]");

        assert!(matches!(
            SystemConfig::from_toml_str(&bad_shape).unwrap().build(),
            Err(Error::InvalidShape(_))
        ));
        assert!(matches!(
            SystemConfig::from_toml_str(&bad_universe).unwrap().build(),
            Err(Error::InvalidUniverse(_))
        ));
        assert!(matches!(SystemConfig::from_toml_str("variables = 3"), Err(Error::Toml(_))));

        for universe in ["[-1e308, 1e308, 1]", "[0, 1e9, 1e-6]"] {
            let huge = SMALL.replace("universe = [0, 10, 1]", &format!("universe = {universe}"));

            assert!(matches!(
                SystemConfig::from_toml_str(&huge).unwrap().build(),
                Err(Error::InvalidUniverse(_))
            ));
        }
    }

    #[test]
    fn test_operators_table() {
        let config = SystemConfig::from_toml_str(&format!(
            "[operators]\nand = \"prod\"\naggregation = \"prob_or\"\n{SMALL}"
        ))
        .unwrap();

        assert_eq!(config.operators.and, crate::ops::AndOp::Prod);
        assert_eq!(config.operators.or, crate::ops::OrOp::Max);
        assert_eq!(config.operators.aggregation, crate::ops::AggregationOp::ProbOr);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SystemConfig::from_path("/nonexistent/fuzzy-valve.toml"),
            Err(Error::Io(_))
        ));
    }
}
