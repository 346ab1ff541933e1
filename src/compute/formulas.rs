//! The fixed accounting-identity table.
//!
//! Each variable is expressed as a signed sum of other variables. The table is
//! `const` data selected by an exhaustive `match`, so adding a variable without
//! a formula fails to compile.

use crate::store::{Model, Variable};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Sign {
    Add = 0,
    Sub = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub sign: Sign,
    pub var: Variable,
}

const fn add(var: Variable) -> Term { Term { sign: Sign::Add, var } }
const fn sub(var: Variable) -> Term { Term { sign: Sign::Sub, var } }

/// A linear identity `target = Σ ±input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formula {
    pub target: Variable,
    pub terms: &'static [Term],
}

impl Formula {
    /// Evaluates the terms left to right against `model`.
    #[inline]
    pub fn evaluate(&self, model: &Model) -> f64 {
        let mut terms = self.terms.iter();
        let mut acc = match terms.next() {
            Some(Term { sign: Sign::Add, var }) => model.get(*var),
            Some(Term { sign: Sign::Sub, var }) => -model.get(*var),
            None => 0.0,
        };
        for term in terms {
            match term.sign {
                Sign::Add => acc += model.get(term.var),
                Sign::Sub => acc -= model.get(term.var),
            }
        }
        acc
    }

    pub fn inputs(&self) -> impl Iterator<Item = Variable> + '_ {
        self.terms.iter().map(|t| t.var)
    }

    pub fn reads(&self, var: Variable) -> bool {
        self.terms.iter().any(|t| t.var == var)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            match (i, term.sign) {
                (0, Sign::Add) => write!(f, "{}", term.var)?,
                (0, Sign::Sub) => write!(f, "-{}", term.var)?,
                (_, Sign::Add) => write!(f, " + {}", term.var)?,
                (_, Sign::Sub) => write!(f, " - {}", term.var)?,
            }
        }
        Ok(())
    }
}

use Variable::*;

const TAXES: Formula = Formula {
    target: Taxes,
    terms: &[add(Gni), sub(Consumption), sub(Savings), sub(Fni)],
};
const EXPENSES: Formula = Formula {
    target: Expenses,
    terms: &[add(Gdp), sub(Consumption), sub(Investments), sub(Exports), add(Imports)],
};
const CONSUMPTION: Formula = Formula {
    target: Consumption,
    terms: &[add(Gdp), sub(Investments), sub(Expenses), sub(Exports), add(Imports)],
};
const SAVINGS: Formula = Formula {
    target: Savings,
    terms: &[add(Gni), sub(Consumption), sub(Taxes), sub(Fni)],
};
const INVESTMENTS: Formula = Formula {
    target: Investments,
    terms: &[add(Gdp), sub(Consumption), sub(Expenses), sub(Exports), add(Imports)],
};
const EXPORTS: Formula = Formula {
    target: Exports,
    terms: &[add(Gdp), sub(Consumption), sub(Investments), sub(Expenses), add(Imports)],
};
const IMPORTS: Formula = Formula {
    target: Imports,
    terms: &[add(Consumption), add(Investments), add(Expenses), add(Exports), sub(Gdp)],
};
const FNI: Formula = Formula {
    target: Fni,
    terms: &[add(Gni), sub(Consumption), sub(Taxes), sub(Savings)],
};
// gdp and gni are defined in terms of each other; see `solver::solve`.
const GDP: Formula = Formula { target: Gdp, terms: &[add(Gni)] };
const GNI: Formula = Formula { target: Gni, terms: &[add(Gdp)] };

/// Returns the identity that drives `var` when it is not pinned.
pub fn formula(var: Variable) -> &'static Formula {
    match var {
        Taxes => &TAXES,
        Expenses => &EXPENSES,
        Consumption => &CONSUMPTION,
        Savings => &SAVINGS,
        Investments => &INVESTMENTS,
        Exports => &EXPORTS,
        Imports => &IMPORTS,
        Fni => &FNI,
        Gdp => &GDP,
        Gni => &GNI,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_table_is_total_and_targets_match() {
        for var in Variable::ALL {
            let f = formula(var);
            assert_eq!(f.target, var);
            assert!(!f.terms.is_empty());
            assert!(!f.reads(var), "{} must not read itself", var);
        }
    }

    #[rstest]
    #[case(Taxes, "gni - consumption - savings - fni")]
    #[case(Expenses, "gdp - consumption - investments - exports + imports")]
    #[case(Consumption, "gdp - investments - expenses - exports + imports")]
    #[case(Savings, "gni - consumption - taxes - fni")]
    #[case(Investments, "gdp - consumption - expenses - exports + imports")]
    #[case(Exports, "gdp - consumption - investments - expenses + imports")]
    #[case(Imports, "consumption + investments + expenses + exports - gdp")]
    #[case(Fni, "gni - consumption - taxes - savings")]
    #[case(Gdp, "gni")]
    #[case(Gni, "gdp")]
    fn test_formula_rendering(#[case] var: Variable, #[case] expected: &str) {
        assert_eq!(formula(var).to_string(), expected);
    }

    #[test]
    fn test_evaluate_against_distinct_values() {
        // taxes=1, expenses=2, consumption=3, savings=4, investments=5,
        // exports=6, imports=7, fni=8, gdp=9, gni=10
        let m = Model::from_values([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let cases = [
            (Taxes, 10.0 - 3.0 - 4.0 - 8.0),
            (Expenses, 9.0 - 3.0 - 5.0 - 6.0 + 7.0),
            (Consumption, 9.0 - 5.0 - 2.0 - 6.0 + 7.0),
            (Savings, 10.0 - 3.0 - 1.0 - 8.0),
            (Investments, 9.0 - 3.0 - 2.0 - 6.0 + 7.0),
            (Exports, 9.0 - 3.0 - 5.0 - 2.0 + 7.0),
            (Imports, 3.0 + 5.0 + 2.0 + 6.0 - 9.0),
            (Fni, 10.0 - 3.0 - 1.0 - 4.0),
            (Gdp, 10.0),
            (Gni, 9.0),
        ];
        for (var, expected) in cases {
            assert_eq!(formula(var).evaluate(&m), expected, "Variable: {}", var);
        }
    }

    #[test]
    fn test_nan_propagates() {
        let m = Model::zero().with(Gdp, f64::NAN);
        assert!(formula(Gni).evaluate(&m).is_nan());
        assert!(formula(Imports).evaluate(&m).is_nan());
        assert_eq!(formula(Taxes).evaluate(&m), 0.0);
    }
}
