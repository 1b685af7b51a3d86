use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::variable::{Consequent, Variable, VariableKey};

/// Result of inference for one consequent variable
#[derive(Clone, Debug)]
pub struct OutputValue {
    pub(crate) key: VariableKey,
    pub(crate) name: String,
    pub(crate) crisp: Option<f64>,
    pub(crate) aggregated: Vec<f64>,
}

impl OutputValue {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The defuzzified value, or `NoRuleFired` when the aggregated set has no mass
    pub fn value(&self) -> Result<f64> {
        self.crisp.ok_or_else(|| Error::NoRuleFired(self.name.clone()))
    }

    /// Aggregated fuzzy set sampled over the variable's universe
    pub fn aggregated(&self) -> &[f64] {
        &self.aggregated
    }
}

/// Outputs of one `compute` call, one entry per consequent variable used by the rule base
#[derive(Clone, Debug)]
pub struct Outputs {
    values: Vec<OutputValue>,
    firing_strengths: Vec<f64>,
}

impl Outputs {
    pub(crate) fn new(values: Vec<OutputValue>, firing_strengths: Vec<f64>) -> Self {
        Self {
            values,
            firing_strengths,
        }
    }

    pub fn get(&self, var: Variable<Consequent>) -> Result<f64> {
        self.entry(var)?.value()
    }

    pub fn by_name(&self, name: &str) -> Result<f64> {
        self.values
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| Error::UnknownVariable(name.to_owned()))?
            .value()
    }

    pub fn entry(&self, var: Variable<Consequent>) -> Result<&OutputValue> {
        self.values
            .iter()
            .find(|v| v.key == var.0)
            .ok_or_else(|| Error::UnknownVariable(format!("{:?}", var.0)))
    }

    /// Entries in variable declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, OutputValue> {
        self.values.iter()
    }

    /// Crisp values of every variable that had at least one rule fire
    pub fn assignment(&self) -> BTreeMap<String, f64> {
        self.values
            .iter()
            .filter_map(|v| Some((v.name.clone(), v.crisp?)))
            .collect()
    }

    /// Like [`Outputs::assignment`], but fails on the first variable no rule fired for
    pub fn complete(&self) -> Result<BTreeMap<String, f64>> {
        self.values.iter().map(|v| Ok((v.name.clone(), v.value()?))).collect()
    }

    /// Per-rule firing strengths in rule base order
    pub fn firing_strengths(&self) -> &[f64] {
        &self.firing_strengths
    }

    pub fn max_firing_strength(&self) -> f64 {
        self.firing_strengths.iter().copied().fold(0., f64::max)
    }
}
