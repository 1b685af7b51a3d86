use std::collections::HashMap;

use crate::variable::{Antecedent, Variable, VariableKey};

/// Crisp values for antecedent variables
#[derive(Clone, Debug, Default)]
pub struct Inputs(pub(crate) HashMap<VariableKey, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Inputs(HashMap::with_capacity(capacity))
    }

    /// Sets the value for `var`, replacing any earlier one
    pub fn add(&mut self, var: Variable<Antecedent>, val: f64) -> &mut Self {
        self.0.insert(var.0, val);
        self
    }

    pub fn get(&self, var: Variable<Antecedent>) -> Option<f64> {
        self.get_key(var.0)
    }

    pub(crate) fn get_key(&self, key: VariableKey) -> Option<f64> {
        self.0.get(&key).copied()
    }
}
