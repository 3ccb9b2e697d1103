//! Core type inference.
//!
//! Each expression form yields a `(substitution, type)` pair; the
//! substitution is the change to apply to the environment after inferring
//! that sub-expression. Sibling inferences thread it in textual order. The
//! first unification failure aborts the enclosing inference and propagates
//! to the caller.

use std::collections::BTreeMap;

use crate::error::{FrondError, TypeError};
use crate::lexer::Span;
use crate::parser::ast::{Decl, Expr, Literal, MatchCase, Program};
use crate::types::{Label, RowType, Scheme, Subst, Type};

use super::env::TypeEnv;
use super::state::InferState;

/// Result type for inference operations.
pub type InferResult<T> = Result<T, FrondError>;

impl InferState {
    /// Infer the type of an expression in a typing environment.
    pub fn infer(&mut self, env: &TypeEnv, expr: &Expr) -> InferResult<(Subst, Type)> {
        match expr {
            Expr::Lit { value, .. } => {
                let ty = match value {
                    Literal::Number(_) => Type::number(),
                    Literal::String(_) => Type::string(),
                };
                Ok((Subst::empty(), ty))
            }

            Expr::Id { name, span } => match env.lookup(name) {
                Some(scheme) => Ok((Subst::empty(), self.instantiate(scheme))),
                None => Err(TypeError::UnboundVariable {
                    name: name.clone(),
                    span: *span,
                }
                .into()),
            },

            Expr::Rec { fields, .. } => self.infer_record(env, fields),

            Expr::List { items, .. } => self.infer_list(env, items),

            Expr::Cons { name, payload, .. } => self.infer_cons(env, name, payload.as_deref()),

            Expr::Acc { expr, prop, span } => self.infer_access(env, expr, prop, *span),

            Expr::App { func, args, span } => self.infer_call(env, func, args, *span),

            Expr::Lam { params, body, .. } => self.infer_lambda(env, params, body),

            Expr::Match {
                scrutinee,
                cases,
                otherwise,
                span,
            } => self.infer_match(env, scrutinee, cases, otherwise.as_deref(), *span),
        }
    }

    /// Records infer each field in order and close over exactly those keys.
    /// The extension variable is a fresh, unused witness.
    fn infer_record(
        &mut self,
        env: &TypeEnv,
        fields: &[(String, Expr)],
    ) -> InferResult<(Subst, Type)> {
        let mut subst = Subst::empty();
        let mut env = env.clone();
        let mut items: BTreeMap<Label, Type> = BTreeMap::new();

        for (key, value) in fields {
            let (s, ty) = self.infer(&env, value)?;
            env = s.apply(&env);
            subst = s.compose(&subst);
            items.insert(Label(key.clone()), ty);
        }

        let items = items
            .into_iter()
            .map(|(k, v)| (k, subst.apply(&v)))
            .collect();
        let rest = self.fresh();

        Ok((subst, Type::Row(RowType::record(items, rest))))
    }

    /// All list elements unify against one fresh element variable.
    fn infer_list(&mut self, env: &TypeEnv, items: &[Expr]) -> InferResult<(Subst, Type)> {
        let elem = self.fresh_type();
        let mut subst = Subst::empty();
        let mut env = env.clone();

        for item in items {
            let (s, ty) = self.infer(&env, item)?;
            env = s.apply(&env);
            subst = s.compose(&subst);

            let s = self.unify(item.span(), &subst.apply(&elem), &subst.apply(&ty))?;
            env = s.apply(&env);
            subst = s.compose(&subst);
        }

        let elem = subst.apply(&elem);
        Ok((subst, Type::list(elem)))
    }

    /// Tag construction yields an open union carrying just this tag; the
    /// payload defaults to Unit when absent.
    fn infer_cons(
        &mut self,
        env: &TypeEnv,
        name: &str,
        payload: Option<&Expr>,
    ) -> InferResult<(Subst, Type)> {
        let (subst, payload_ty) = match payload {
            Some(p) => self.infer(env, p)?,
            None => (Subst::empty(), Type::unit()),
        };

        let items = [(Label(name.to_string()), payload_ty)].into_iter().collect();
        let rest = self.fresh();

        Ok((subst, Type::Row(RowType::variant_open(items, rest))))
    }

    /// Field projection constrains the subject to an open record containing
    /// the field at a fresh type.
    fn infer_access(
        &mut self,
        env: &TypeEnv,
        expr: &Expr,
        prop: &str,
        span: Span,
    ) -> InferResult<(Subst, Type)> {
        let (mut subst, subject_ty) = self.infer(env, expr)?;

        let result = self.fresh_type();
        let rest = self.fresh();
        let expected = Type::Row(RowType::record_open(
            [(Label(prop.to_string()), result.clone())]
                .into_iter()
                .collect(),
            rest,
        ));

        let s = self.unify(span, &subst.apply(&subject_ty), &expected)?;
        subst = s.compose(&subst);

        let result = subst.apply(&result);
        Ok((subst, result))
    }

    fn infer_call(
        &mut self,
        env: &TypeEnv,
        func: &Expr,
        args: &[Expr],
        span: Span,
    ) -> InferResult<(Subst, Type)> {
        let (mut subst, func_ty) = self.infer(env, func)?;
        let mut env = subst.apply(env);

        let mut arg_tys = Vec::new();
        for arg in args {
            let (s, ty) = self.infer(&env, arg)?;
            env = s.apply(&env);
            subst = s.compose(&subst);
            arg_tys.push(ty);
        }

        let ret = self.fresh_type();
        let arg_tys: Vec<Type> = arg_tys.iter().map(|t| subst.apply(t)).collect();
        let expected = Type::func(arg_tys, ret.clone());

        let s = self.unify(span, &subst.apply(&func_ty), &expected)?;
        subst = s.compose(&subst);

        let ret = subst.apply(&ret);
        Ok((subst, ret))
    }

    /// Parameters are bound monomorphically; the function type is assembled
    /// from their (substituted) variables and the body type.
    fn infer_lambda(
        &mut self,
        env: &TypeEnv,
        params: &[String],
        body: &Expr,
    ) -> InferResult<(Subst, Type)> {
        let param_tys: Vec<Type> = params.iter().map(|_| self.fresh_type()).collect();

        let mut body_env = env.clone();
        for (param, ty) in params.iter().zip(param_tys.iter()) {
            body_env = body_env.extend(param.clone(), Scheme::mono(ty.clone()));
        }

        let (subst, body_ty) = self.infer(&body_env, body)?;

        let param_tys = param_tys.iter().map(|t| subst.apply(t)).collect();
        let ret_ty = subst.apply(&body_ty);
        Ok((subst, Type::func(param_tys, ret_ty)))
    }

    /// Pattern match over a tag union.
    ///
    /// The scrutinee is first unified with an open empty union so that each
    /// case accretes its tag onto the scrutinee type. Without a default the
    /// scrutinee is finally unified with the *closed* counterpart of the
    /// accreted pattern union, which makes exhaustiveness checking fall out
    /// of ordinary row unification; with a default the union stays as-is and
    /// extra tags flow to the default branch.
    fn infer_match(
        &mut self,
        env: &TypeEnv,
        scrutinee: &Expr,
        cases: &[MatchCase],
        otherwise: Option<&Expr>,
        span: Span,
    ) -> InferResult<(Subst, Type)> {
        let (mut subst, scrut_ty) = self.infer(env, scrutinee)?;

        let rest = self.fresh();
        let empty_union = Type::Row(RowType::variant_open(BTreeMap::new(), rest));
        let s = self.unify(scrutinee.span(), &subst.apply(&scrut_ty), &empty_union)?;
        subst = s.compose(&subst);

        let pat_ty = self.fresh_type();
        let out_ty = self.fresh_type();

        for case in cases {
            // Every name the pattern binds enters the environment at a
            // fresh monomorphic type; the pattern itself is then inferred
            // through its expression projection.
            let mut case_env = subst.apply(env);
            for name in case.pattern.binders() {
                case_env = case_env.extend(name, Scheme::mono(self.fresh_type()));
            }

            let (s, p_ty) = self.infer(&case_env, &case.pattern.to_expr())?;
            case_env = s.apply(&case_env);
            subst = s.compose(&subst);

            let s = self.unify(
                case.pattern.span(),
                &subst.apply(&pat_ty),
                &subst.apply(&p_ty),
            )?;
            case_env = s.apply(&case_env);
            subst = s.compose(&subst);

            let (s, body_ty) = self.infer(&case_env, &case.body)?;
            subst = s.compose(&subst);

            let s = self.unify(
                case.body.span(),
                &subst.apply(&out_ty),
                &subst.apply(&body_ty),
            )?;
            subst = s.compose(&subst);
        }

        let accreted = subst.apply(&pat_ty);
        let target = if otherwise.is_none() {
            match accreted {
                Type::Row(row) => Type::Row(row.with_open(!row.open)),
                other => other,
            }
        } else {
            accreted
        };

        let s = self.unify(span, &subst.apply(&scrut_ty), &target)?;
        subst = s.compose(&subst);

        if let Some(default) = otherwise {
            let (s, default_ty) = self.infer(&subst.apply(env), default)?;
            subst = s.compose(&subst);

            let s = self.unify(
                default.span(),
                &subst.apply(&out_ty),
                &subst.apply(&default_ty),
            )?;
            subst = s.compose(&subst);
        }

        let out_ty = subst.apply(&out_ty);
        Ok((subst, out_ty))
    }

    /// Infer a whole program: declarations are generalised into the
    /// environment one by one, which is the only place generalisation
    /// happens. Returns each declaration's scheme (with its name for
    /// bindings) and the final environment.
    pub fn infer_program(
        &mut self,
        env: &TypeEnv,
        program: &Program,
    ) -> InferResult<(Vec<(Option<String>, Scheme)>, TypeEnv)> {
        let mut env = env.clone();
        let mut schemes = Vec::new();

        for decl in &program.decls {
            match decl {
                Decl::Bind { name, value, .. } => {
                    // Pre-bind the name at a fresh monomorphic type so the
                    // definition can refer to itself.
                    let rec_var = self.fresh_type();
                    let pre_env = env.extend(name.clone(), Scheme::mono(rec_var.clone()));

                    let (subst, ty) = self.infer(&pre_env, value)?;
                    let s = self.unify(value.span(), &subst.apply(&rec_var), &subst.apply(&ty))?;
                    let subst = s.compose(&subst);

                    let ty = subst.apply(&ty);
                    env = subst.apply(&env);

                    let scheme = env.generalize(&ty);
                    env = env.extend(name.clone(), scheme.clone());
                    schemes.push((Some(name.clone()), scheme));
                }
                Decl::Expr(expr) => {
                    let (subst, ty) = self.infer(&env, expr)?;
                    let ty = subst.apply(&ty);
                    env = subst.apply(&env);

                    schemes.push((None, env.generalize(&ty)));
                }
            }
        }

        Ok((schemes, env))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::initial_env;
    use crate::parser::parse;
    use crate::types::PrettyContext;

    fn infer_source(source: &str) -> InferResult<Type> {
        let program = parse(source).unwrap();
        let expr = match program.decls.into_iter().next().unwrap() {
            Decl::Expr(e) => e,
            Decl::Bind { .. } => panic!("expected bare expression"),
        };

        let mut state = InferState::new();
        let env = initial_env();
        let (subst, ty) = state.infer(&env, &expr)?;
        Ok(subst.apply(&ty))
    }

    fn display(ty: &Type) -> String {
        PrettyContext::new().format_type(ty)
    }

    #[test]
    fn test_infer_number() {
        assert_eq!(infer_source("42").unwrap(), Type::number());
    }

    #[test]
    fn test_infer_string() {
        assert_eq!(infer_source("\"hello\"").unwrap(), Type::string());
    }

    #[test]
    fn test_unbound_variable() {
        let err = infer_source("nope").unwrap_err();
        assert!(matches!(
            err,
            FrondError::Type(TypeError::UnboundVariable { ref name, .. }) if name == "nope"
        ));
    }

    #[test]
    fn test_identity_lambda() {
        // (\x -> x) infers ∀t. Func⟨t, t⟩
        let ty = infer_source(r"\x -> x").unwrap();
        match &ty {
            Type::Cons(name, args) => {
                assert_eq!(name, "Func");
                assert_eq!(args.len(), 2);
                assert!(args[0].is_var());
                assert_eq!(args[0], args[1]);
            }
            _ => panic!("expected function type, got {ty}"),
        }

        let scheme = Scheme::generalize(&ty);
        assert_eq!(scheme.vars.len(), 1);
        assert_eq!(scheme.to_string(), "∀a. (a) → a");
    }

    #[test]
    fn test_addition_lambda() {
        // (\(x,y) -> x + y) infers Func⟨num, num, num⟩
        let ty = infer_source(r"\(x, y) -> x + y").unwrap();
        assert_eq!(
            ty,
            Type::func(vec![Type::number(), Type::number()], Type::number())
        );
    }

    #[test]
    fn test_accessor_list_shares_one_type() {
        // [\x -> x.bar, \x -> x.foo]: both lambdas must accept the same
        // record and return the same type
        let ty = infer_source(r"[\x -> x.bar, \x -> x.foo]").unwrap();

        let elem = match &ty {
            Type::Cons(name, args) if name == "List" => &args[0],
            _ => panic!("expected list type, got {ty}"),
        };

        let (params, ret) = match elem {
            Type::Cons(name, args) if name == "Func" => {
                (&args[..args.len() - 1], &args[args.len() - 1])
            }
            _ => panic!("expected function element, got {elem}"),
        };

        assert_eq!(params.len(), 1);
        let row = params[0].as_row().expect("parameter should be a record");
        assert!(row.open);
        assert!(!row.union);
        assert_eq!(row.items.len(), 2);
        assert_eq!(row.items.get(&"bar".into()), Some(ret));
        assert_eq!(row.items.get(&"foo".into()), Some(ret));
    }

    #[test]
    fn test_record_accretes_argument_constraints() {
        // getHello: {hello: num | open} -> num
        // getBar:   ∀t. {bar: t | open} -> t
        // getBaz:   {baz: str | open} -> str
        let mut env = initial_env();
        let mut seed = InferState::new();
        for _ in 0..100 {
            seed.fresh();
        }

        let hello_rest = seed.fresh();
        env = env.extend(
            "getHello".to_string(),
            Scheme::mono(Type::func(
                vec![Type::Row(RowType::record_open(
                    [("hello".into(), Type::number())].into_iter().collect(),
                    hello_rest,
                ))],
                Type::number(),
            )),
        );

        let bar_t = seed.fresh();
        let bar_rest = seed.fresh();
        env = env.extend(
            "getBar".to_string(),
            Scheme::poly(
                vec![bar_t],
                Type::func(
                    vec![Type::Row(RowType::record_open(
                        [("bar".into(), Type::Var(bar_t))].into_iter().collect(),
                        bar_rest,
                    ))],
                    Type::Var(bar_t),
                ),
            ),
        );

        let baz_rest = seed.fresh();
        env = env.extend(
            "getBaz".to_string(),
            Scheme::mono(Type::func(
                vec![Type::Row(RowType::record_open(
                    [("baz".into(), Type::string())].into_iter().collect(),
                    baz_rest,
                ))],
                Type::string(),
            )),
        );

        let source = r"\x -> {hello: getHello(x) + getBar(x), baz: getBaz(x)}";
        let program = parse(source).unwrap();
        let expr = match &program.decls[0] {
            Decl::Expr(e) => e.clone(),
            _ => panic!(),
        };

        let mut state = InferState::new();
        let (subst, ty) = state.infer(&env, &expr).unwrap();
        let ty = subst.apply(&ty);

        let (params, ret) = match &ty {
            Type::Cons(name, args) if name == "Func" => {
                (&args[..args.len() - 1], &args[args.len() - 1])
            }
            _ => panic!("expected function, got {ty}"),
        };

        // The argument accretes all three constraints and stays open
        let arg = params[0].as_row().expect("argument should be a record");
        assert!(arg.open);
        assert_eq!(arg.items.get(&"hello".into()), Some(&Type::number()));
        assert_eq!(arg.items.get(&"bar".into()), Some(&Type::number()));
        assert_eq!(arg.items.get(&"baz".into()), Some(&Type::string()));

        // The result is closed at exactly the constructed keys
        let result = ret.as_row().expect("result should be a record");
        assert!(!result.open);
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items.get(&"hello".into()), Some(&Type::number()));
        assert_eq!(result.items.get(&"baz".into()), Some(&Type::string()));
    }

    #[test]
    fn test_match_without_default_result_is_payload_union() {
        // when Hot(Very) is Hot(x) -> x: the result is the scrutinee's
        // payload union, carrying exactly the Very tag
        let ty = infer_source("when Hot(Very) is Hot(x) -> x").unwrap();

        let row = ty.as_row().expect("result should be a variant");
        assert!(row.union);
        assert_eq!(row.items.len(), 1);
        assert_eq!(row.items.get(&"Very".into()), Some(&Type::unit()));
    }

    #[test]
    fn test_match_scrutinee_closed_via_lambda_param() {
        // The parameter type shows the scrutinee constraint directly
        let ty = infer_source(r"\v -> when v is Hot(x) -> x").unwrap();

        let (params, _) = match &ty {
            Type::Cons(name, args) if name == "Func" => {
                (&args[..args.len() - 1], &args[args.len() - 1])
            }
            _ => panic!("expected function, got {ty}"),
        };

        let scrut = params[0].as_row().expect("scrutinee should be a variant");
        assert!(scrut.union);
        assert!(!scrut.open);
        assert_eq!(scrut.items.len(), 1);
        assert!(scrut.has_item(&"Hot".into()));
    }

    #[test]
    fn test_match_with_default_keeps_scrutinee_open() {
        // when v is Ok(x) -> x else 0: scrutinee carries at least Ok⟨num⟩
        // and stays open for tags consumed by the default
        let ty = infer_source(r"\v -> when v is Ok(x) -> x + 1 else 0").unwrap();

        let (params, ret) = match &ty {
            Type::Cons(name, args) if name == "Func" => {
                (&args[..args.len() - 1], &args[args.len() - 1])
            }
            _ => panic!("expected function, got {ty}"),
        };

        assert_eq!(*ret, Type::number());

        let scrut = params[0].as_row().expect("scrutinee should be a variant");
        assert!(scrut.union);
        assert!(scrut.open);
        assert_eq!(scrut.items.get(&"Ok".into()), Some(&Type::number()));
    }

    #[test]
    fn test_match_branches_unify_output() {
        let err = infer_source(r#"\v -> when v is Ok(x) -> 1, Err(e) -> "no""#).unwrap_err();
        assert!(matches!(err, FrondError::Type(_)));
    }

    #[test]
    fn test_match_on_non_variant_fails() {
        let err = infer_source("when 1 is Hot(x) -> x").unwrap_err();
        assert!(matches!(
            err,
            FrondError::Type(TypeError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_nested_pattern_binders() {
        let ty = infer_source(r"\v -> when v is Pair({left: x, right: y}) -> x + y").unwrap();

        let (params, ret) = match &ty {
            Type::Cons(name, args) if name == "Func" => {
                (&args[..args.len() - 1], &args[args.len() - 1])
            }
            _ => panic!("expected function, got {ty}"),
        };
        assert_eq!(*ret, Type::number());

        let scrut = params[0].as_row().unwrap();
        let payload = scrut.items.get(&"Pair".into()).unwrap();
        let payload_row = payload.as_row().expect("payload should be a record");
        assert_eq!(payload_row.items.get(&"left".into()), Some(&Type::number()));
        assert_eq!(
            payload_row.items.get(&"right".into()),
            Some(&Type::number())
        );
    }

    #[test]
    fn test_list_elements_unify() {
        let ty = infer_source("[1, 2, 3]").unwrap();
        assert_eq!(ty, Type::list(Type::number()));

        assert!(infer_source(r#"[1, "x"]"#).is_err());
    }

    #[test]
    fn test_empty_list_is_polymorphic() {
        let ty = infer_source("[]").unwrap();
        match ty {
            Type::Cons(name, args) => {
                assert_eq!(name, "List");
                assert!(args[0].is_var());
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_record_field_access() {
        let ty = infer_source("{foo: 1}.foo").unwrap();
        assert_eq!(ty, Type::number());
    }

    #[test]
    fn test_access_missing_field_on_closed_record_fails() {
        let err = infer_source("{foo: 1}.bar").unwrap_err();
        assert!(matches!(
            err,
            FrondError::Type(TypeError::RowMismatch { .. })
        ));
    }

    #[test]
    fn test_application_arity_mismatch() {
        let err = infer_source(r"(\x -> x)(1, 2)").unwrap_err();
        assert!(matches!(
            err,
            FrondError::Type(TypeError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn test_application_of_non_function() {
        let err = infer_source("{foo: 1}(2)").unwrap_err();
        assert!(matches!(
            err,
            FrondError::Type(TypeError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_builtin_operators() {
        assert_eq!(infer_source("1 + 2 * 3").unwrap(), Type::number());
        assert_eq!(infer_source(r#""a" ^ "b""#).unwrap(), Type::string());
        assert_eq!(
            infer_source("[1] ++ [2]").unwrap(),
            Type::list(Type::number())
        );
        assert!(infer_source(r#"1 + "a""#).is_err());
    }

    #[test]
    fn test_eq_returns_closed_bool_variant() {
        let ty = infer_source("eq(1, 2)").unwrap();
        let row = ty.as_row().expect("expected variant");
        assert!(row.union);
        assert!(!row.open);
        assert!(row.has_item(&"True".into()));
        assert!(row.has_item(&"False".into()));
    }

    #[test]
    fn test_map_and_fold() {
        let ty = infer_source(r"map([1, 2], \x -> x + 1)").unwrap();
        assert_eq!(ty, Type::list(Type::number()));

        let ty = infer_source(r"fold([1, 2], \(a, b) -> a + b, 0)").unwrap();
        assert_eq!(ty, Type::list(Type::number()));
    }

    #[test]
    fn test_task_chain() {
        let program = parse(r"\(t, f) -> t &> f").unwrap();
        let expr = match &program.decls[0] {
            Decl::Expr(e) => e.clone(),
            _ => panic!(),
        };
        let mut state = InferState::new();
        let (subst, ty) = state.infer(&initial_env(), &expr).unwrap();
        let ty = subst.apply(&ty);
        let rendered = display(&ty);
        assert!(rendered.contains("Task"), "got {rendered}");
    }

    #[test]
    fn test_match_result_display() {
        let ty = infer_source("when Hot(Very) is Hot(x) -> x").unwrap();
        assert_eq!(display(&ty), "[Very | a]");
    }

    #[test]
    fn test_program_generalizes_between_declarations() {
        let program = parse("id = \\x -> x\nid(1)\nid(\"s\")").unwrap();
        let mut state = InferState::new();
        let (schemes, _env) = state.infer_program(&initial_env(), &program).unwrap();

        assert_eq!(schemes.len(), 3);
        let (name, id_scheme) = &schemes[0];
        assert_eq!(name.as_deref(), Some("id"));
        assert_eq!(id_scheme.vars.len(), 1);

        // Both uses instantiate independently
        assert_eq!(schemes[1].1.body, Type::number());
        assert_eq!(schemes[2].1.body, Type::string());
    }

    #[test]
    fn test_recursive_binding_type_checks() {
        let program = parse("f = \\n -> when eq(n, 0) is True -> 0 else f(n * 0)\nf(3)").unwrap();
        let mut state = InferState::new();
        let (schemes, _env) = state.infer_program(&initial_env(), &program).unwrap();

        assert_eq!(
            schemes[0].1.body,
            Type::func(vec![Type::number()], Type::number())
        );
        assert_eq!(schemes[1].1.body, Type::number());
    }

    #[test]
    fn test_lambda_params_stay_monomorphic() {
        // A lambda-bound identifier is not generalised inside the body
        let err = infer_source(r#"(\f -> {a: f(1), b: f("s")})(\x -> x)"#).unwrap_err();
        assert!(matches!(err, FrondError::Type(_)));
    }

    #[test]
    fn test_inference_is_deterministic() {
        let source = r"\v -> when v is Ok(x) -> [x], Err(e) -> [] else [1]";
        let run = || {
            let program = parse(source).unwrap();
            let expr = match &program.decls[0] {
                Decl::Expr(e) => e.clone(),
                _ => panic!(),
            };
            let mut state = InferState::new();
            let (subst, ty) = state.infer(&initial_env(), &expr).unwrap();
            subst.apply(&ty)
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_fresh_supply_never_repeats() {
        let mut state = InferState::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(state.fresh()));
        }
    }
}
