use crate::compute::formulas::{formula, Sign, Term};
use crate::store::{Model, PinnedSet, Variable};
use std::fmt::Write;

/// Renders an audit report for one solver pass.
///
/// `before` is the snapshot the formulas were evaluated against (after the
/// pinned values were written), `after` is the solver output.
pub fn format_update(before: &Model, after: &Model, pinned: PinnedSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "UPDATE TRACE pinned={}", pinned);
    let _ = writeln!(out, "--------------------------------------------------");

    for var in Variable::ALL {
        let value = after.get(var);
        if pinned.contains(var) {
            let _ = writeln!(out, "{:<12} [{:.3}] PINNED", var.name(), value);
            continue;
        }
        let f = formula(var);
        let _ = writeln!(out, "{:<12} [{:.3}] = {}", var.name(), value, f);
        let _ = writeln!(out, "{:<12}          = {}", "", substituted(f.terms, before));
    }
    out
}

fn substituted(terms: &[Term], model: &Model) -> String {
    let mut s = String::new();
    for (i, term) in terms.iter().enumerate() {
        let v = model.get(term.var);
        let _ = match (i, term.sign) {
            (0, Sign::Add) => write!(s, "{:.3}", v),
            (0, Sign::Sub) => write!(s, "-{:.3}", v),
            (_, Sign::Add) => write!(s, " + {:.3}", v),
            (_, Sign::Sub) => write!(s, " - {:.3}", v),
        };
    }
    s
}
