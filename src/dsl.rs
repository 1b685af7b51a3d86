use crate::error::{Error, Result};
use crate::inputs::Inputs;
use crate::ops::{not, Operators};
use crate::variable::{Antecedent, Term, Variables};

/// Antecedent expression tree
///
/// Leaves are single-term memberships; AND/OR combine child degrees with the engine's
/// operators, NOT is the standard complement.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Is(Term<Antecedent>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    pub fn or(self, rhs: impl Into<Expr>) -> Self {
        Expr::Or(Box::new(self), Box::new(rhs.into()))
    }

    pub fn and(self, rhs: impl Into<Expr>) -> Self {
        Expr::And(Box::new(self), Box::new(rhs.into()))
    }

    pub fn negate(self) -> Self {
        Expr::Not(Box::new(self))
    }

    /// Every leaf term, left to right
    pub fn propositions(&self) -> Vec<&Term<Antecedent>> {
        let mut props = Vec::new();

        fn parse<'p>(expr: &'p Expr, out: &mut Vec<&'p Term<Antecedent>>) {
            match expr {
                Expr::Is(term) => out.push(term),
                Expr::And(lhs, rhs) | Expr::Or(lhs, rhs) => {
                    parse(lhs, out);
                    parse(rhs, out);
                },
                Expr::Not(expr) => parse(expr, out),
            }
        }

        parse(self, &mut props);

        props
    }

    /// Degree to which the expression holds for `inputs`
    ///
    /// Both children of a binary node are always evaluated.
    pub fn evaluate(&self, vars: &Variables, inputs: &Inputs, ops: &Operators) -> Result<f64> {
        match self {
            Expr::Is(term) => {
                let var = vars.checked(*term)?;
                let value = inputs
                    .get_key(term.var)
                    .ok_or_else(|| Error::MissingInput(var.name().to_owned()))?;

                Ok(var.evaluate_index(term.index, value))
            },
            Expr::And(lhs, rhs) => {
                let left = lhs.evaluate(vars, inputs, ops)?;
                let right = rhs.evaluate(vars, inputs, ops)?;

                Ok(ops.and.call(left, right))
            },
            Expr::Or(lhs, rhs) => {
                let left = lhs.evaluate(vars, inputs, ops)?;
                let right = rhs.evaluate(vars, inputs, ops)?;

                Ok(ops.or.call(left, right))
            },
            Expr::Not(expr) => Ok(not(expr.evaluate(vars, inputs, ops)?)),
        }
    }
}

impl From<Term<Antecedent>> for Expr {
    fn from(term: Term<Antecedent>) -> Self {
        Expr::Is(term)
    }
}

impl Term<Antecedent> {
    pub fn is(self) -> Expr {
        Expr::Is(self)
    }

    pub fn and(self, rhs: impl Into<Expr>) -> Expr {
        self.is().and(rhs)
    }

    pub fn or(self, rhs: impl Into<Expr>) -> Expr {
        self.is().or(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linspace::Universe;
    use crate::membership::MembershipFunction;
    use crate::variable::Variable;

    struct Fixture {
        vars: Variables,
        temp: Variable<Antecedent>,
        flow: Variable<Antecedent>,
    }

    fn fixture() -> Fixture {
        let mut vars = Variables::new();
        let temp = vars.add_antecedent("temperatura", Universe::new(0., 100., 1.).unwrap()).unwrap();
        let flow = vars.add_antecedent("fluxo", Universe::new(0., 20., 1.).unwrap()).unwrap();

        vars.add_term(temp, "baixa", MembershipFunction::triangular(0., 0., 50.).unwrap()).unwrap();
        vars.add_term(temp, "media", MembershipFunction::triangular(25., 50., 75.).unwrap()).unwrap();
        vars.add_term(flow, "medio", MembershipFunction::triangular(5., 10., 15.).unwrap()).unwrap();
        vars.add_term(flow, "alto", MembershipFunction::triangular(10., 20., 20.).unwrap()).unwrap();

        Fixture { vars, temp, flow }
    }

    fn inputs(f: &Fixture, temp: f64, flow: f64) -> Inputs {
        let mut inputs = Inputs::new();

        inputs.add(f.temp, temp);
        inputs.add(f.flow, flow);
        inputs
    }

    #[test]
    fn test_and_or_not() {
        let f = fixture();
        let ops = Operators::default();
        let baixa = f.vars.term(f.temp, "baixa").unwrap();
        let medio = f.vars.term(f.flow, "medio").unwrap();
        let alto = f.vars.term(f.flow, "alto").unwrap();
        let inputs = inputs(&f, 30., 12.5);

        // baixa(30) = 0.4, medio(12.5) = 0.5, alto(12.5) = 0.25
        assert_eq!(baixa.and(medio).evaluate(&f.vars, &inputs, &ops).unwrap(), 0.4);
        assert_eq!(baixa.or(medio).evaluate(&f.vars, &inputs, &ops).unwrap(), 0.5);
        assert_eq!(baixa.and(alto).evaluate(&f.vars, &inputs, &ops).unwrap(), 0.25);
        assert_eq!(alto.is().negate().evaluate(&f.vars, &inputs, &ops).unwrap(), 0.75);
        assert_eq!(
            baixa.and(medio.or(alto)).negate().evaluate(&f.vars, &inputs, &ops).unwrap(),
            0.6
        );
    }

    #[test]
    fn test_missing_input() {
        let f = fixture();
        let media = f.vars.term(f.temp, "media").unwrap();
        let alto = f.vars.term(f.flow, "alto").unwrap();
        let mut inputs = Inputs::new();

        inputs.add(f.temp, 50.);

        let result = media.and(alto).evaluate(&f.vars, &inputs, &Operators::default());

        assert!(matches!(result, Err(Error::MissingInput(name)) if name == "fluxo"));
    }

    #[test]
    fn test_propositions() {
        let f = fixture();
        let baixa = f.vars.term(f.temp, "baixa").unwrap();
        let medio = f.vars.term(f.flow, "medio").unwrap();
        let alto = f.vars.term(f.flow, "alto").unwrap();
        let expr = baixa.and(medio.is().negate()).or(alto);

        assert_eq!(expr.propositions(), vec![&baixa, &medio, &alto]);
    }
}
