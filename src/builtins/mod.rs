//! Standard environment for frond.
//!
//! The primitive operators are shipped twice: as type schemes for the
//! inferencer ([`initial_env`]) and as values for the evaluator
//! ([`global_scope`]). The two tables bind the same names.

use std::collections::HashMap;

use crate::eval::{Builtin, Value};
use crate::infer::TypeEnv;
use crate::types::{RowType, Scheme, TVar, Type};

/// Witness tail for the closed `[True, False]` row in `eq`'s scheme. It is
/// not quantified (a closed tail is not free), so it must live far above
/// anything the fresh supply can reach within one run.
const BOOL_WITNESS: TVar = TVar(u32::MAX - 1);

/// The closed boolean variant `[True, False]`.
pub fn bool_variant() -> Type {
    Type::Row(RowType::variant(
        [
            ("True".into(), Type::unit()),
            ("False".into(), Type::unit()),
        ]
        .into_iter()
        .collect(),
        BOOL_WITNESS,
    ))
}

/// The initial typing environment with the primitive operator schemes.
pub fn initial_env() -> TypeEnv {
    let mut env = TypeEnv::empty();

    let t = TVar(0);
    let k = TVar(1);
    let e = TVar(2);
    let tv = Type::Var(t);
    let kv = Type::Var(k);
    let ev = Type::Var(e);

    let num_binop = Type::func(vec![Type::number(), Type::number()], Type::number());
    env = env.extend("+".to_string(), Scheme::mono(num_binop.clone()));
    env = env.extend("*".to_string(), Scheme::mono(num_binop));

    env = env.extend(
        "^".to_string(),
        Scheme::mono(Type::func(
            vec![Type::string(), Type::string()],
            Type::string(),
        )),
    );

    env = env.extend(
        "++".to_string(),
        Scheme::poly(
            vec![t],
            Type::func(
                vec![Type::list(tv.clone()), Type::list(tv.clone())],
                Type::list(tv.clone()),
            ),
        ),
    );

    env = env.extend(
        "eq".to_string(),
        Scheme::poly(
            vec![t],
            Type::func(vec![tv.clone(), tv.clone()], bool_variant()),
        ),
    );

    env = env.extend(
        "fold".to_string(),
        Scheme::poly(
            vec![t, k],
            Type::func(
                vec![
                    Type::list(tv.clone()),
                    Type::func(vec![tv.clone(), tv.clone()], kv.clone()),
                    tv.clone(),
                ],
                Type::list(kv.clone()),
            ),
        ),
    );

    env = env.extend(
        "map".to_string(),
        Scheme::poly(
            vec![t, k],
            Type::func(
                vec![Type::list(tv.clone()), Type::func(vec![tv.clone()], kv.clone())],
                Type::list(kv.clone()),
            ),
        ),
    );

    env = env.extend(
        "&>".to_string(),
        Scheme::poly(
            vec![t, e, k],
            Type::func(
                vec![
                    Type::task(tv.clone(), ev.clone()),
                    Type::func(vec![tv], Type::task(kv.clone(), ev.clone())),
                ],
                Type::task(kv, ev),
            ),
        ),
    );

    env
}

/// The initial value environment with the builtin implementations.
pub fn global_scope() -> HashMap<String, Value> {
    [
        ("+", Builtin::Add),
        ("*", Builtin::Mul),
        ("^", Builtin::Concat),
        ("++", Builtin::Append),
        ("eq", Builtin::Eq),
        ("fold", Builtin::Fold),
        ("map", Builtin::Map),
        ("&>", Builtin::Chain),
    ]
    .into_iter()
    .map(|(name, builtin)| (name.to_string(), Value::Builtin(builtin)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_typed_operator_has_a_value() {
        let env = initial_env();
        let scope = global_scope();

        for (name, _) in env.iter() {
            assert!(scope.contains_key(name), "no value for '{}'", name);
        }
        for name in scope.keys() {
            assert!(env.lookup(name).is_some(), "no scheme for '{}'", name);
        }
    }

    #[test]
    fn test_monomorphic_operators() {
        let env = initial_env();
        assert!(env.lookup("+").unwrap().is_mono());
        assert!(env.lookup("*").unwrap().is_mono());
        assert!(env.lookup("^").unwrap().is_mono());
    }

    #[test]
    fn test_polymorphic_operators_quantify() {
        let env = initial_env();
        assert_eq!(env.lookup("++").unwrap().vars.len(), 1);
        assert_eq!(env.lookup("eq").unwrap().vars.len(), 1);
        assert_eq!(env.lookup("fold").unwrap().vars.len(), 2);
        assert_eq!(env.lookup("map").unwrap().vars.len(), 2);
        assert_eq!(env.lookup("&>").unwrap().vars.len(), 3);
    }

    #[test]
    fn test_env_has_no_free_vars() {
        // The bool witness is closed and quantifiers cover the rest, so
        // nothing in the initial environment is accidentally monomorphic
        assert!(initial_env().free_vars().is_empty());
    }

    #[test]
    fn test_bool_variant_shape() {
        let row = bool_variant();
        let row = row.as_row().unwrap();
        assert!(row.union);
        assert!(!row.open);
        assert_eq!(row.items.len(), 2);
    }
}
