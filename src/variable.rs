use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::error::{Error, Result};
use crate::linspace::Universe;
use crate::membership::MembershipFunction;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Position a linguistic variable takes in the rule base
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Receives a crisp input and is fuzzified
    Antecedent,
    /// Receives an aggregated fuzzy set and is defuzzified
    Consequent,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Antecedent => f.write_str("antecedent"),
            Role::Consequent => f.write_str("consequent"),
        }
    }
}

/// Type-level role of a [`Variable`] handle
pub trait VariableRole {
    const ROLE: Role;
}

#[derive(Clone, Copy, Debug)]
pub enum Antecedent {}

#[derive(Clone, Copy, Debug)]
pub enum Consequent {}

impl VariableRole for Antecedent {
    const ROLE: Role = Role::Antecedent;
}

impl VariableRole for Consequent {
    const ROLE: Role = Role::Consequent;
}

/// Handle to a variable in a [`Variables`] arena
pub struct Variable<R>(pub(crate) VariableKey, PhantomData<R>);

impl<R> Variable<R> {
    pub(crate) fn new(key: VariableKey) -> Self {
        Variable(key, PhantomData)
    }

    pub fn key(self) -> VariableKey {
        self.0
    }
}

impl<R> Clone for Variable<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Variable<R> {}

impl<R> PartialEq for Variable<R> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<R> Eq for Variable<R> {}

impl<R> fmt::Debug for Variable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Variable").field(&self.0).finish()
    }
}

/// Handle to a named term on a variable, resolved once through [`Variables::term`]
pub struct Term<R> {
    pub(crate) var: VariableKey,
    pub(crate) index: usize,
    _role: PhantomData<R>,
}

impl<R> Term<R> {
    pub(crate) fn new(var: VariableKey, index: usize) -> Self {
        Term {
            var,
            index,
            _role: PhantomData,
        }
    }

    pub fn variable(&self) -> Variable<R> {
        Variable::new(self.var)
    }
}

impl<R> Clone for Term<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Term<R> {}

impl<R> PartialEq for Term<R> {
    fn eq(&self, other: &Self) -> bool {
        self.var == other.var && self.index == other.index
    }
}

impl<R> Eq for Term<R> {}

impl<R> fmt::Debug for Term<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Term").field("var", &self.var).field("index", &self.index).finish()
    }
}

struct TermEntry {
    name: String,
    membership: MembershipFunction,
    // Membership sampled over the universe
    samples: Vec<f64>,
}

/// A named universe of discourse partitioned into named fuzzy sets
pub struct LinguisticVariable {
    name: String,
    role: Role,
    universe: Universe,
    terms: Vec<TermEntry>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, role: Role, universe: Universe) -> Self {
        Self {
            name: name.into(),
            role,
            universe,
            terms: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Term names in insertion order
    pub fn term_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.iter().map(|t| t.name.as_str())
    }

    pub fn add_term(&mut self, name: impl Into<String>, membership: MembershipFunction) -> Result<usize> {
        let name = name.into();

        if self.terms.iter().any(|t| t.name == name) {
            return Err(Error::DuplicateTerm {
                variable: self.name.clone(),
                term: name,
            });
        }

        let samples = self.universe.points().iter().map(|&p| membership.evaluate(p)).collect();

        self.terms.push(TermEntry {
            name,
            membership,
            samples,
        });

        Ok(self.terms.len() - 1)
    }

    pub fn term_index(&self, term: &str) -> Result<usize> {
        self.terms
            .iter()
            .position(|t| t.name == term)
            .ok_or_else(|| Error::unknown_term(&self.name, term))
    }

    pub fn membership_of(&self, term: &str, x: f64) -> Result<f64> {
        let index = self.term_index(term)?;

        Ok(self.terms[index].membership.evaluate(x))
    }

    pub fn membership_function(&self, term: &str) -> Result<&MembershipFunction> {
        let index = self.term_index(term)?;

        Ok(&self.terms[index].membership)
    }

    /// `(universe point, degree)` pairs for `term`; clone or call again to restart
    pub fn discretize(&self, term: &str) -> Result<Discretize<'_>> {
        let index = self.term_index(term)?;

        Ok(self.discretize_index(index))
    }

    pub(crate) fn has_term_index(&self, index: usize) -> bool {
        index < self.terms.len()
    }

    pub(crate) fn evaluate_index(&self, index: usize, x: f64) -> f64 {
        self.terms[index].membership.evaluate(x)
    }

    pub(crate) fn samples(&self, index: usize) -> &[f64] {
        &self.terms[index].samples
    }

    pub(crate) fn discretize_index(&self, index: usize) -> Discretize<'_> {
        Discretize {
            universe: self.universe.points(),
            samples: &self.terms[index].samples,
            index: 0,
        }
    }
}

/// Sampled membership of one term across its variable's universe
#[derive(Clone, Debug)]
pub struct Discretize<'v> {
    universe: &'v [f64],
    samples: &'v [f64],
    index: usize,
}

impl Iterator for Discretize<'_> {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<(f64, f64)> {
        let item = (*self.universe.get(self.index)?, self.samples[self.index]);
        self.index += 1;

        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.universe.len() - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Discretize<'_> {}

/// Arena of linguistic variables with unique names
#[derive(Default)]
pub struct Variables {
    pub(crate) arena: SlotMap<VariableKey, LinguisticVariable>,
    names: HashMap<String, VariableKey>,
    // Insertion order, for deterministic iteration
    order: Vec<VariableKey>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_antecedent(&mut self, name: impl Into<String>, universe: Universe) -> Result<Variable<Antecedent>> {
        self.add(name, universe)
    }

    pub fn add_consequent(&mut self, name: impl Into<String>, universe: Universe) -> Result<Variable<Consequent>> {
        self.add(name, universe)
    }

    pub fn add<R: VariableRole>(&mut self, name: impl Into<String>, universe: Universe) -> Result<Variable<R>> {
        let name = name.into();

        if self.names.contains_key(&name) {
            return Err(Error::DuplicateVariable(name));
        }

        let key = self.arena.insert(LinguisticVariable::new(name.clone(), R::ROLE, universe));
        self.names.insert(name, key);
        self.order.push(key);

        Ok(Variable::new(key))
    }

    /// Adds a term and returns a handle to it
    pub fn add_term<R>(
        &mut self,
        var: Variable<R>,
        name: impl Into<String>,
        membership: MembershipFunction,
    ) -> Result<Term<R>> {
        let variable = self.arena.get_mut(var.0).ok_or_else(|| unknown_key(var.0))?;
        let index = variable.add_term(name, membership)?;

        Ok(Term::new(var.0, index))
    }

    pub fn term<R>(&self, var: Variable<R>, name: &str) -> Result<Term<R>> {
        let index = self.get(var)?.term_index(name)?;

        Ok(Term::new(var.0, index))
    }

    pub fn get<R>(&self, var: Variable<R>) -> Result<&LinguisticVariable> {
        self.arena.get(var.0).ok_or_else(|| unknown_key(var.0))
    }

    /// Looks a variable up by name, checking it plays role `R`
    pub fn lookup<R: VariableRole>(&self, name: &str) -> Result<Variable<R>> {
        let key = *self.names.get(name).ok_or_else(|| Error::UnknownVariable(name.to_owned()))?;

        if self.arena[key].role != R::ROLE {
            return Err(Error::RoleMismatch {
                variable: name.to_owned(),
                expected: R::ROLE,
            });
        }

        Ok(Variable::new(key))
    }

    pub fn discretize<R>(&self, term: Term<R>) -> Result<Discretize<'_>> {
        Ok(self.checked(term)?.discretize_index(term.index))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Variables in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &LinguisticVariable> + '_ {
        self.order.iter().map(move |key| &self.arena[*key])
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = VariableKey> + '_ {
        self.order.iter().copied()
    }

    /// Resolves a term handle, failing if it does not belong to this arena
    pub(crate) fn checked<R>(&self, term: Term<R>) -> Result<&LinguisticVariable> {
        let variable = self.arena.get(term.var).ok_or_else(|| unknown_key(term.var))?;

        if !variable.has_term_index(term.index) {
            return Err(Error::unknown_term(variable.name(), &format!("#{}", term.index)));
        }

        Ok(variable)
    }
}

fn unknown_key(key: VariableKey) -> Error {
    Error::UnknownVariable(format!("{key:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temperature() -> (Variables, Variable<Antecedent>) {
        let mut vars = Variables::new();
        let temp = vars.add_antecedent("temperatura", Universe::new(0., 100., 1.).unwrap()).unwrap();

        vars.add_term(temp, "baixa", MembershipFunction::triangular(0., 0., 50.).unwrap()).unwrap();
        vars.add_term(temp, "media", MembershipFunction::triangular(25., 50., 75.).unwrap()).unwrap();
        vars.add_term(temp, "alta", MembershipFunction::triangular(50., 100., 100.).unwrap()).unwrap();

        (vars, temp)
    }

    #[test]
    fn test_duplicate_term() {
        let (mut vars, temp) = temperature();
        let result = vars.add_term(temp, "media", MembershipFunction::triangular(0., 1., 2.).unwrap());

        assert!(matches!(
            result,
            Err(Error::DuplicateTerm { ref variable, ref term }) if variable == "temperatura" && term == "media"
        ));
        assert_eq!(vars.get(temp).unwrap().term_names().count(), 3);
    }

    #[test]
    fn test_duplicate_variable() {
        let (mut vars, _) = temperature();
        let result = vars.add_consequent("temperatura", Universe::new(0., 1., 0.5).unwrap());

        assert!(matches!(result, Err(Error::DuplicateVariable(name)) if name == "temperatura"));
    }

    #[test]
    fn test_membership_of() {
        let (vars, temp) = temperature();
        let var = vars.get(temp).unwrap();

        assert_eq!(var.membership_of("baixa", 30.).unwrap(), 0.4);
        assert_eq!(var.membership_of("media", 30.).unwrap(), 0.2);
        assert_eq!(var.membership_of("alta", 30.).unwrap(), 0.);
        assert!(matches!(
            var.membership_of("morna", 30.),
            Err(Error::UnknownTerm { term, .. }) if term == "morna"
        ));
    }

    #[test]
    fn test_discretize_is_restartable() {
        let (vars, temp) = temperature();
        let media = vars.term(temp, "media").unwrap();
        let samples = vars.discretize(media).unwrap();

        assert_eq!(samples.len(), 101);

        let first: Vec<_> = samples.clone().collect();
        let second: Vec<_> = samples.collect();

        assert_eq!(first, second);
        assert_eq!(first[50], (50., 1.));
        assert_eq!(first[25], (25., 0.));
        assert_eq!(first[30], (30., 0.2));
    }

    #[test]
    fn test_lookup_checks_role() {
        let (vars, temp) = temperature();

        assert_eq!(vars.lookup::<Antecedent>("temperatura").unwrap(), temp);
        assert!(matches!(
            vars.lookup::<Consequent>("temperatura"),
            Err(Error::RoleMismatch { expected: Role::Consequent, .. })
        ));
        assert!(matches!(vars.lookup::<Antecedent>("pressao"), Err(Error::UnknownVariable(_))));
    }

    #[test]
    fn test_foreign_handle_is_rejected() {
        let (vars, _) = temperature();
        let mut other = Variables::new();
        let a = other.add_antecedent("a", Universe::new(0., 1., 1.).unwrap()).unwrap();
        let b = other.add_antecedent("b", Universe::new(0., 1., 1.).unwrap()).unwrap();
        let term = other.add_term(b, "x", MembershipFunction::triangular(0., 0., 1.).unwrap()).unwrap();

        // `a` shares its slot with `temperatura`, `b` has no counterpart at all
        assert!(vars.get(a).is_ok());
        assert!(matches!(vars.discretize(term), Err(Error::UnknownVariable(_))));
    }
}
