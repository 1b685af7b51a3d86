use crate::dsl::Expr;
use crate::error::{Error, Result};
use crate::inputs::Inputs;
use crate::ops::Operators;
use crate::variable::{Consequent, Term, Variables};

/// Ordered rule base
#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    /// Adds an unweighted rule with a single consequent
    pub fn add(&mut self, antecedent: impl Into<Expr>, consequent: Term<Consequent>) {
        self.0.push(Rule {
            antecedent: antecedent.into(),
            consequents: vec![consequent],
            weight: 1.0,
        });
    }

    pub fn push(&mut self, rule: Rule) {
        self.0.push(rule);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }
}

/// If `antecedent` then every term in `consequents`, scaled by `weight`
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub(crate) antecedent: Expr,
    pub(crate) consequents: Vec<Term<Consequent>>,
    pub(crate) weight: f64,
}

impl Rule {
    pub fn new(antecedent: impl Into<Expr>, consequents: impl IntoIterator<Item = Term<Consequent>>) -> Result<Self> {
        let consequents: Vec<_> = consequents.into_iter().collect();

        if consequents.is_empty() {
            return Err(Error::EmptyConsequent);
        }

        Ok(Self {
            antecedent: antecedent.into(),
            consequents,
            weight: 1.0,
        })
    }

    /// Weights outside `[0, ∞)` are rejected; the firing strength is clamped afterwards
    pub fn with_weight(mut self, weight: f64) -> Result<Self> {
        if !(weight.is_finite() && weight >= 0.) {
            return Err(Error::InvalidWeight(weight));
        }

        self.weight = weight;
        Ok(self)
    }

    pub fn antecedent(&self) -> &Expr {
        &self.antecedent
    }

    pub fn consequents(&self) -> &[Term<Consequent>] {
        &self.consequents
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Firing strength in `[0, 1]`
    pub fn fire(&self, vars: &Variables, inputs: &Inputs, ops: &Operators) -> Result<f64> {
        let degree = self.antecedent.evaluate(vars, inputs, ops)?;

        Ok((self.weight * degree).clamp(0., 1.))
    }
}
