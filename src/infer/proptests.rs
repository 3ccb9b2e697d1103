//! Property-based tests for the substitution algebra and the unifier.

use std::collections::HashMap;
use std::ops::Range;

use proptest::prelude::*;

use crate::lexer::Span;
use crate::types::{Label, RowType, Scheme, Subst, TVar, Type};

use super::state::InferState;

fn span() -> Span {
    Span::new(0, 0)
}

/// A supply whose fresh variables cannot collide with any variable the
/// strategies below mention.
fn warm_state() -> InferState {
    let mut state = InferState::new();
    for _ in 0..10_000 {
        state.fresh();
    }
    state
}

fn label_strategy() -> impl Strategy<Value = Label> {
    prop::sample::select(vec!["a", "b", "c", "d", "e"]).prop_map(Label::from)
}

/// Types drawing ordinary variables from `vars`. Row tails are assigned
/// afterwards by [`assign_rests`]: in the real pipeline every tail comes
/// from the fresh supply and is distinct, and the algebra relies on that.
fn raw_type_strategy(vars: Range<u32>) -> impl Strategy<Value = Type> {
    let leaf = prop_oneof![
        Just(Type::number()),
        Just(Type::string()),
        Just(Type::unit()),
        vars.prop_map(Type::var),
    ];

    leaf.prop_recursive(3, 24, 4, move |inner| {
        prop_oneof![
            inner.clone().prop_map(Type::list),
            (prop::collection::vec(inner.clone(), 0..3), inner.clone())
                .prop_map(|(params, ret)| Type::func(params, ret)),
            (
                any::<bool>(),
                any::<bool>(),
                prop::collection::btree_map(label_strategy(), inner, 0..4),
            )
                .prop_map(|(union, open, items)| {
                    Type::Row(RowType {
                        union,
                        open,
                        items,
                        rest: TVar(0), // reassigned below
                    })
                }),
        ]
    })
}

/// Give every row a distinct tail variable, numbering from `base`.
fn assign_rests(ty: &Type, counter: &mut u32) -> Type {
    match ty {
        Type::Cons(name, args) => Type::Cons(
            name.clone(),
            args.iter().map(|a| assign_rests(a, counter)).collect(),
        ),
        Type::Var(_) => ty.clone(),
        Type::Row(row) => {
            let items = row
                .items
                .iter()
                .map(|(k, v)| (k.clone(), assign_rests(v, counter)))
                .collect();
            let rest = TVar(*counter);
            *counter += 1;
            Type::Row(RowType {
                union: row.union,
                open: row.open,
                items,
                rest,
            })
        }
    }
}

fn type_strategy_from(vars: Range<u32>, rest_base: u32) -> impl Strategy<Value = Type> {
    raw_type_strategy(vars).prop_map(move |t| {
        let mut counter = rest_base;
        assign_rests(&t, &mut counter)
    })
}

fn type_strategy() -> impl Strategy<Value = Type> {
    type_strategy_from(0..8, 1_000)
}

/// Substitutions over the generated types' variables, with ranges drawn
/// from a disjoint variable pool so composition cannot build cycles.
fn subst_strategy() -> impl Strategy<Value = Subst> {
    prop::collection::hash_map(0u32..8, type_strategy_from(20..28, 3_000), 0..4)
        .prop_map(|map| map.into_iter().map(|(id, ty)| (TVar(id), ty)).collect())
}

/// Structural equality up to a bijective renaming of free variables.
/// Closed-row tails are witnesses, not free variables, so they are ignored.
fn alpha_eq(a: &Type, b: &Type) -> bool {
    fn go(
        a: &Type,
        b: &Type,
        fwd: &mut HashMap<TVar, TVar>,
        bwd: &mut HashMap<TVar, TVar>,
    ) -> bool {
        match (a, b) {
            (Type::Cons(n1, args1), Type::Cons(n2, args2)) => {
                n1 == n2
                    && args1.len() == args2.len()
                    && args1
                        .iter()
                        .zip(args2.iter())
                        .all(|(x, y)| go(x, y, fwd, bwd))
            }
            (Type::Var(v1), Type::Var(v2)) => var_eq(*v1, *v2, fwd, bwd),
            (Type::Row(r1), Type::Row(r2)) => {
                r1.union == r2.union
                    && r1.open == r2.open
                    && r1.items.len() == r2.items.len()
                    && r1
                        .items
                        .iter()
                        .zip(r2.items.iter())
                        .all(|((k1, t1), (k2, t2))| k1 == k2 && go(t1, t2, fwd, bwd))
                    && (!r1.open || var_eq(r1.rest, r2.rest, fwd, bwd))
            }
            _ => false,
        }
    }

    fn var_eq(
        v1: TVar,
        v2: TVar,
        fwd: &mut HashMap<TVar, TVar>,
        bwd: &mut HashMap<TVar, TVar>,
    ) -> bool {
        match (fwd.get(&v1), bwd.get(&v2)) {
            (Some(mapped), Some(reverse)) => *mapped == v2 && *reverse == v1,
            (None, None) => {
                fwd.insert(v1, v2);
                bwd.insert(v2, v1);
                true
            }
            _ => false,
        }
    }

    go(a, b, &mut HashMap::new(), &mut HashMap::new())
}

proptest! {
    /// apply(compose(s1, s2), t) == apply(s1, apply(s2, t))
    #[test]
    fn prop_substitution_composition(
        s1 in subst_strategy(),
        s2 in subst_strategy(),
        t in type_strategy(),
    ) {
        let composed = s1.compose(&s2);
        prop_assert_eq!(composed.apply(&t), s1.apply(&s2.apply(&t)));
    }

    /// A successful unification makes both sides equal under its result.
    #[test]
    fn prop_unifier_soundness(
        t1 in type_strategy_from(0..8, 1_000),
        t2 in type_strategy_from(0..8, 2_000),
    ) {
        let mut state = warm_state();
        if let Ok(subst) = state.unify(span(), &t1, &t2) {
            prop_assert_eq!(subst.apply(&t1), subst.apply(&t2));
        }
    }

    /// Every type unifies with itself.
    #[test]
    fn prop_unify_reflexive(t in type_strategy()) {
        let mut state = warm_state();
        prop_assert!(state.unify(span(), &t, &t).is_ok());
    }

    /// Binding a variable to a type that mentions it must fail.
    #[test]
    fn prop_occurs_safety(id in 0u32..8, t in type_strategy()) {
        let var = TVar(id);
        let containing = Type::func(vec![Type::Var(var)], t);

        let mut state = warm_state();
        prop_assert!(state.unify(span(), &Type::Var(var), &containing).is_err());
    }

    /// instantiate(generalize(t)) equals t up to renaming of free variables.
    #[test]
    fn prop_generalize_instantiate_round_trip(t in type_strategy()) {
        let scheme = Scheme::generalize(&t);
        let mut state = InferState::new();
        let instantiated = state.instantiate(&scheme);

        prop_assert!(
            alpha_eq(&t, &instantiated),
            "{} not alpha-equivalent to {}",
            t,
            instantiated
        );
    }

    /// Key order does not affect row construction or unification outcome.
    #[test]
    fn prop_row_commutativity(
        entries in prop::collection::vec(
            (label_strategy(), type_strategy_from(0..8, 1_000)),
            1..5,
        ),
        target in type_strategy_from(0..8, 2_000),
    ) {
        let mut keys: Vec<_> = entries.iter().map(|(k, _)| k.clone()).collect();
        keys.sort();
        keys.dedup();
        prop_assume!(keys.len() == entries.len());

        let forward = RowType::record_open(entries.iter().cloned().collect(), TVar(999));
        let reversed = RowType::record_open(entries.iter().rev().cloned().collect(), TVar(999));

        prop_assert_eq!(&forward, &reversed);

        let mut s1 = warm_state();
        let mut s2 = warm_state();
        let r1 = s1.unify(span(), &Type::Row(forward), &target);
        let r2 = s2.unify(span(), &Type::Row(reversed), &target);
        prop_assert_eq!(r1.is_ok(), r2.is_ok());
    }
}
