//! The identity solver: a pure `(Model, PinnedSet) -> Model` transformation.
use crate::compute::formulas::formula;
use crate::store::{Assignments, Model, PinnedSet, Variable, VariableError};
use tracing::{debug, trace};

/// Recomputes every variable outside `pinned` from its identity.
///
/// All formulas read the input `model`: driven variables never observe each
/// other's fresh values within one call, and no iteration towards a fixed point
/// takes place. In particular, when neither `gdp` nor `gni` is pinned they simply
/// exchange their pre-call values. Pinned values are copied verbatim. Inconsistent
/// pins are not reconciled and degenerate results (negative, infinite, NaN) are
/// returned as-is.
pub fn solve(model: &Model, pinned: PinnedSet) -> Model {
    debug!(pinned = %pinned, "solving national accounts identities");
    let mut values = *model.values();
    for var in Variable::ALL {
        if pinned.contains(var) {
            continue;
        }
        let value = formula(var).evaluate(model);
        trace!(variable = %var, before = model.get(var), after = value, "driven");
        values[var.index()] = value;
    }
    Model::from_values(values)
}

/// `solve` for caller-supplied names; any unknown name fails the call.
pub fn solve_named<I, S>(model: &Model, pinned: I) -> Result<Model, VariableError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let pinned = PinnedSet::from_names(pinned)?;
    Ok(solve(model, pinned))
}

/// Overwrites `model` with `assignments`, then solves with the assigned keys pinned.
pub fn apply_batch(model: &Model, assignments: &Assignments) -> Model {
    let overwritten = model.overwrite(assignments);
    solve(&overwritten, assignments.keys())
}

/// The single-field edit path.
pub fn apply_single(model: &Model, var: Variable, value: f64) -> Model {
    apply_batch(model, &Assignments::single(var, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::residuals::is_consistent;
    use proptest::prelude::*;
    use Variable::*;

    fn expect(values: [(Variable, f64); Variable::COUNT]) -> Model {
        let mut m = Model::zero();
        for (var, value) in values {
            m = m.with(var, value);
        }
        m
    }

    #[test]
    fn test_single_gdp_edit_from_zero() {
        let result = apply_single(&Model::zero(), Gdp, 100.0);
        let expected = expect([
            (Taxes, 0.0),
            (Expenses, 100.0),
            (Consumption, 100.0),
            (Savings, 0.0),
            (Investments, 100.0),
            (Exports, 100.0),
            (Imports, -100.0),
            (Fni, 0.0),
            (Gdp, 100.0),
            (Gni, 100.0),
        ]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_country_batch_from_zero() {
        let batch = Assignments::from_record([("imports", 50.0), ("exports", 30.0), ("gdp", 100.0)]).unwrap();
        let result = apply_batch(&Model::zero(), &batch);
        let expected = expect([
            (Taxes, 0.0),
            (Expenses, 120.0),
            (Consumption, 120.0),
            (Savings, 0.0),
            (Investments, 120.0),
            (Exports, 30.0),
            (Imports, 50.0),
            (Fni, 0.0),
            (Gdp, 100.0),
            (Gni, 100.0),
        ]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_input_snapshot_is_not_mutated() {
        let before = Model::from_values([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let copy = before;
        let _ = solve(&before, PinnedSet::from_iter([Gdp]));
        assert_eq!(before, copy);
    }

    #[test]
    fn test_gdp_gni_swap_when_neither_pinned() {
        let m = Model::zero().with(Gdp, 90.0).with(Gni, 110.0);
        let result = solve(&m, PinnedSet::from_iter([Taxes]));
        assert_eq!(result[Gdp], 110.0);
        assert_eq!(result[Gni], 90.0);
    }

    #[test]
    fn test_driven_values_are_simultaneous_not_sequential() {
        // Sequential evaluation would feed the new `expenses` into `consumption`.
        let m = Model::zero().with(Gdp, 100.0).with(Gni, 100.0);
        let result = solve(&m, PinnedSet::from_iter([Gdp, Gni]));
        assert_eq!(result[Expenses], 100.0);
        assert_eq!(result[Consumption], 100.0);
        assert_eq!(result[Investments], 100.0);
    }

    #[test]
    fn test_solve_named_rejects_unknown_keys() {
        let err = solve_named(&Model::zero(), ["gdp", "GNP"]).unwrap_err();
        assert_eq!(err, VariableError::UnknownVariable { name: "GNP".into() });

        let ok = solve_named(&Model::zero().with(Gdp, 5.0), ["gdp"]).unwrap();
        assert_eq!(ok[Gni], 5.0);
    }

    #[test]
    fn test_pinning_everything_is_identity() {
        let m = Model::from_values([1.0, -2.0, 3.5, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(solve(&m, Variable::ALL.into_iter().collect()), m);
    }

    #[test]
    fn test_degenerate_values_propagate() {
        let result = apply_single(&Model::zero(), Imports, f64::INFINITY);
        assert_eq!(result[Imports], f64::INFINITY);
        assert_eq!(result[Expenses], f64::INFINITY);
        assert_eq!(result[Gdp], 0.0);

        let nan = apply_single(&Model::zero(), Gni, f64::NAN);
        assert!(nan[Gdp].is_nan());
        assert!(nan[Taxes].is_nan());
        assert_eq!(nan[Expenses], 0.0);
    }

    /// Models satisfying every identity: gdp = gni,
    /// taxes + savings + fni + consumption = gni, and
    /// consumption + investments + expenses + exports - imports = gdp.
    /// Integer-valued so that the identities hold exactly in floating point.
    fn consistent_models() -> impl Strategy<Value = Model> {
        prop::array::uniform6(-100_000i32..100_000).prop_map(|[g, c, i, e, x, t]| {
            let (g, c, i, e, x, t) = (g as f64, c as f64, i as f64, e as f64, x as f64, t as f64);
            let s = 0.5 * g;
            let m = c + i + e + x - g;
            let f = g - c - t - s;
            Model::from_values([t, e, c, s, i, x, m, f, g, g])
        })
    }

    fn any_model() -> impl Strategy<Value = Model> {
        prop::array::uniform10(-1.0e6f64..1.0e6).prop_map(Model::from_values)
    }

    fn any_pinned() -> impl Strategy<Value = PinnedSet> {
        (1u16..(1 << Variable::COUNT)).prop_map(|mask| {
            Variable::ALL
                .into_iter()
                .filter(|v| mask & (1 << v.index()) != 0)
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_pinned_values_are_preserved(m in any_model(), pinned in any_pinned()) {
            let result = solve(&m, pinned);
            for var in pinned.iter() {
                prop_assert_eq!(result[var].to_bits(), m[var].to_bits());
            }
        }

        #[test]
        fn prop_driven_values_read_original_model(m in any_model(), pinned in any_pinned()) {
            let result = solve(&m, pinned);
            for var in Variable::ALL.into_iter().filter(|v| !pinned.contains(*v)) {
                prop_assert_eq!(result[var].to_bits(), formula(var).evaluate(&m).to_bits());
            }
        }

        #[test]
        fn prop_batch_is_overwrite_then_solve(
            m in any_model(),
            x in -1.0e6f64..1.0e6,
            y in -1.0e6f64..1.0e6,
        ) {
            let batch: Assignments = [(Imports, x), (Gdp, y)].into_iter().collect();
            let direct = solve(&m.with(Imports, x).with(Gdp, y), PinnedSet::from_iter([Imports, Gdp]));
            prop_assert_eq!(apply_batch(&m, &batch), direct);
        }

        #[test]
        fn prop_consistent_model_is_a_fixed_point(m in consistent_models(), pinned in any_pinned()) {
            prop_assert!(is_consistent(&m, 0.0));
            prop_assert_eq!(solve(&m, pinned), m);
        }

        #[test]
        fn prop_output_is_complete(m in any_model(), pinned in any_pinned()) {
            let record = solve(&m, pinned).to_record();
            prop_assert_eq!(record.len(), Variable::COUNT);
            for var in Variable::ALL {
                prop_assert!(record.contains_key(var.name()));
            }
        }
    }
}
