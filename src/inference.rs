use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::inputs::Inputs;
use crate::math::centroid;
use crate::ops::Operators;
use crate::outputs::{OutputValue, Outputs};
use crate::rules::Rules;
use crate::variable::{Antecedent, Role, VariableKey, Variables};

/// Mamdani inference over a validated, frozen rule base
///
/// `compute` only reads engine state, so one engine can serve many threads at once.
pub struct InferenceEngine {
    vars: Variables,
    rules: Rules,
    ops: Operators,
    // Antecedents referenced by some rule, in declaration order
    required: Vec<VariableKey>,
    // Consequents targeted by some rule, in declaration order
    outputs: Vec<VariableKey>,
}

impl InferenceEngine {
    pub fn new(vars: Variables, rules: Rules) -> Result<Self> {
        Self::with_operators(vars, rules, Operators::default())
    }

    /// Checks every handle in `rules` against `vars` before accepting them
    pub fn with_operators(vars: Variables, rules: Rules, ops: Operators) -> Result<Self> {
        let mut required = HashSet::new();
        let mut outputs = HashSet::new();

        for rule in rules.iter() {
            for term in rule.antecedent.propositions() {
                let var = vars.checked(*term)?;

                ensure_role(var.name(), var.role(), Role::Antecedent)?;
                required.insert(term.var);
            }

            if rule.consequents.is_empty() {
                return Err(Error::EmptyConsequent);
            }

            for term in &rule.consequents {
                let var = vars.checked(*term)?;

                ensure_role(var.name(), var.role(), Role::Consequent)?;
                outputs.insert(term.var);
            }
        }

        let required: Vec<_> = vars.keys().filter(|k| required.contains(k)).collect();
        let outputs: Vec<_> = vars.keys().filter(|k| outputs.contains(k)).collect();

        debug!(
            variables = vars.len(),
            rules = rules.len(),
            inputs = required.len(),
            outputs = outputs.len(),
            "Inference engine ready"
        );

        Ok(Self {
            vars,
            rules,
            ops,
            required,
            outputs,
        })
    }

    pub fn variables(&self) -> &Variables {
        &self.vars
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn operators(&self) -> Operators {
        self.ops
    }

    pub fn compute(&self, inputs: &Inputs) -> Result<Outputs> {
        for &key in &self.required {
            let name = self.vars.arena[key].name();
            let value = inputs.get_key(key).ok_or_else(|| Error::MissingInput(name.to_owned()))?;

            if !value.is_finite() {
                return Err(Error::InvalidInput {
                    variable: name.to_owned(),
                    value,
                });
            }
        }

        // Fuzzificate inputs and evaluate rule antecedents
        let mut firing_strengths = Vec::with_capacity(self.rules.len());

        for (i, rule) in self.rules.iter().enumerate() {
            let strength = rule.fire(&self.vars, inputs, &self.ops)?;

            trace!(rule = i, strength, "Rule evaluated");
            firing_strengths.push(strength);
        }

        let mut values = Vec::with_capacity(self.outputs.len());

        for &key in &self.outputs {
            let var = &self.vars.arena[key];
            let mut aggregated = vec![0.; var.universe().len()];

            // Implication then aggregation; a rule with zero strength implies the empty set
            for (rule, &strength) in self.rules.iter().zip(&firing_strengths) {
                if strength == 0. {
                    continue;
                }

                for term in rule.consequents.iter().filter(|t| t.var == key) {
                    let implied = self.ops.implication.call(strength, var.samples(term.index).iter().copied());

                    self.ops.aggregation.call(&mut aggregated, implied);
                }
            }

            let crisp = centroid(var.universe().points(), &aggregated);

            match crisp {
                Some(value) => trace!(variable = var.name(), value, "Defuzzified"),
                None => debug!(variable = var.name(), "No rule fired"),
            }

            values.push(OutputValue {
                key,
                name: var.name().to_owned(),
                crisp,
                aggregated,
            });
        }

        Ok(Outputs::new(values, firing_strengths))
    }

    /// Like [`InferenceEngine::compute`], with inputs keyed by variable name
    pub fn compute_named<'n>(&self, inputs: impl IntoIterator<Item = (&'n str, f64)>) -> Result<Outputs> {
        let inputs = inputs.into_iter();
        let mut assignment = Inputs::with_capacity(inputs.size_hint().0);

        for (name, value) in inputs {
            assignment.add(self.vars.lookup::<Antecedent>(name)?, value);
        }

        self.compute(&assignment)
    }
}

fn ensure_role(name: &str, actual: Role, expected: Role) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::RoleMismatch {
            variable: name.to_owned(),
            expected,
        })
    }
}
