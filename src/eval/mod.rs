//! Tree-walking evaluator for frond programs.
//!
//! The evaluator consumes the same AST as the inferencer but a parallel
//! value environment; it never consults the inferencer's substitutions.
//! Pattern matching tries cases in order and falls through on mismatch,
//! in contrast to the type core where every failure is fatal.

mod value;

pub use value::{values_equal, Builtin, CapturedEnv, Value};

use std::collections::{BTreeMap, HashMap};

use crate::error::{EvalError, Result};
use crate::lexer::Span;
use crate::parser::ast::{Decl, Expr, Literal, Pattern, Program};

/// Lexical local scope: a stack of binding frames consulted innermost
/// first, backed by the evaluator's global frame.
#[derive(Default)]
struct LocalScope {
    frames: Vec<HashMap<String, Value>>,
}

impl LocalScope {
    fn new() -> Self {
        LocalScope { frames: Vec::new() }
    }

    fn from_frame(frame: HashMap<String, Value>) -> Self {
        LocalScope {
            frames: vec![frame],
        }
    }

    fn enter(&mut self) {
        self.frames.push(HashMap::new());
    }

    fn leave(&mut self) {
        self.frames.pop();
    }

    fn add(&mut self, name: String, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, value);
        } else {
            self.frames.push([(name, value)].into_iter().collect());
        }
    }

    fn resolve(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Flatten all frames into a captured environment for a closure.
    fn capture(&self) -> CapturedEnv {
        let mut captured = HashMap::new();
        for frame in &self.frames {
            captured.extend(frame.clone());
        }
        CapturedEnv(captured)
    }
}

/// The evaluator. Top-level declarations bind into the global frame, which
/// closures consult at call time; this is what makes top-level recursion
/// work without knot-tying.
pub struct Evaluator {
    globals: HashMap<String, Value>,
}

impl Evaluator {
    pub fn new(globals: HashMap<String, Value>) -> Self {
        Evaluator { globals }
    }

    /// Evaluate a program, returning the value of the last bare expression.
    pub fn eval_program(&mut self, program: &Program) -> Result<Option<Value>> {
        let mut last = None;
        for decl in &program.decls {
            if let Some(value) = self.eval_decl(decl)? {
                last = Some(value);
            }
        }
        Ok(last)
    }

    /// Evaluate one declaration. Bindings return nothing; bare expressions
    /// return their value.
    pub fn eval_decl(&mut self, decl: &Decl) -> Result<Option<Value>> {
        match decl {
            Decl::Bind { name, value, .. } => {
                let value = self.eval_expr(value, &mut LocalScope::new())?;
                self.globals.insert(name.clone(), value);
                Ok(None)
            }
            Decl::Expr(expr) => {
                let value = self.eval_expr(expr, &mut LocalScope::new())?;
                Ok(Some(value))
            }
        }
    }

    fn eval_expr(&self, expr: &Expr, locals: &mut LocalScope) -> Result<Value> {
        match expr {
            Expr::Lit { value, .. } => Ok(match value {
                Literal::Number(n) => Value::Num(*n),
                Literal::String(s) => Value::Str(s.clone()),
            }),

            Expr::Id { name, span } => locals
                .resolve(name)
                .or_else(|| self.globals.get(name))
                .cloned()
                .ok_or_else(|| {
                    EvalError::UnboundName {
                        name: name.clone(),
                        span: *span,
                    }
                    .into()
                }),

            Expr::Rec { fields, .. } => {
                let mut rec = BTreeMap::new();
                for (key, value) in fields {
                    rec.insert(key.clone(), self.eval_expr(value, locals)?);
                }
                Ok(Value::Rec(rec))
            }

            Expr::List { items, .. } => {
                let values = items
                    .iter()
                    .map(|item| self.eval_expr(item, locals))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(values))
            }

            Expr::Cons { name, payload, .. } => {
                let payload = match payload {
                    Some(p) => Some(Box::new(self.eval_expr(p, locals)?)),
                    None => None,
                };
                Ok(Value::Tag(name.clone(), payload))
            }

            Expr::Acc { expr, prop, span } => {
                let subject = self.eval_expr(expr, locals)?;
                match subject {
                    Value::Rec(mut fields) => fields.remove(prop).ok_or_else(|| {
                        EvalError::MissingField {
                            name: prop.clone(),
                            span: *span,
                        }
                        .into()
                    }),
                    _ => Err(EvalError::MissingField {
                        name: prop.clone(),
                        span: *span,
                    }
                    .into()),
                }
            }

            Expr::App { func, args, span } => {
                let func = self.eval_expr(func, locals)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval_expr(arg, locals))
                    .collect::<Result<Vec<_>>>()?;
                self.apply(func, args, *span)
            }

            Expr::Lam { params, body, .. } => Ok(Value::Closure {
                params: params.clone(),
                body: body.clone(),
                env: locals.capture(),
            }),

            Expr::Match {
                scrutinee,
                cases,
                otherwise,
                span,
            } => {
                let subject = self.eval_expr(scrutinee, locals)?;

                for case in cases {
                    if let Some(bindings) = match_pattern(&case.pattern, &subject) {
                        locals.enter();
                        for (name, value) in bindings {
                            locals.add(name, value);
                        }
                        let result = self.eval_expr(&case.body, locals);
                        locals.leave();
                        return result;
                    }
                }

                match otherwise {
                    Some(default) => self.eval_expr(default, locals),
                    None => Err(EvalError::UnhandledCase { span: *span }.into()),
                }
            }
        }
    }

    /// Apply a function value to evaluated arguments.
    fn apply(&self, func: Value, args: Vec<Value>, span: Span) -> Result<Value> {
        match func {
            Value::Closure { params, body, env } => {
                if params.len() != args.len() {
                    return Err(EvalError::WrongArgumentCount {
                        expected: params.len(),
                        found: args.len(),
                        span,
                    }
                    .into());
                }

                let mut locals = LocalScope::from_frame(env.0);
                locals.enter();
                for (param, arg) in params.iter().zip(args) {
                    locals.add(param.clone(), arg);
                }
                self.eval_expr(&body, &mut locals)
            }

            Value::Builtin(builtin) => {
                if builtin.arity() != args.len() {
                    return Err(EvalError::WrongArgumentCount {
                        expected: builtin.arity(),
                        found: args.len(),
                        span,
                    }
                    .into());
                }
                self.call_builtin(builtin, args, span)
            }

            _ => Err(EvalError::NotAFunction { span }.into()),
        }
    }

    fn call_builtin(&self, builtin: Builtin, args: Vec<Value>, span: Span) -> Result<Value> {
        let bad = |b: Builtin| -> crate::error::FrondError {
            EvalError::BadBuiltinArgument {
                name: b.name().to_string(),
                span,
            }
            .into()
        };

        let mut args = args.into_iter();
        let first = args.next().expect("arity checked");
        let second = args.next().expect("arity checked");

        match builtin {
            Builtin::Add => match (first, second) {
                (Value::Num(a), Value::Num(b)) => Ok(Value::Num(a + b)),
                _ => Err(bad(builtin)),
            },

            Builtin::Mul => match (first, second) {
                (Value::Num(a), Value::Num(b)) => Ok(Value::Num(a * b)),
                _ => Err(bad(builtin)),
            },

            Builtin::Concat => match (first, second) {
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
                _ => Err(bad(builtin)),
            },

            Builtin::Append => match (first, second) {
                (Value::List(mut a), Value::List(b)) => {
                    a.extend(b);
                    Ok(Value::List(a))
                }
                _ => Err(bad(builtin)),
            },

            Builtin::Eq => Ok(Value::bool_tag(values_equal(&first, &second))),

            Builtin::Map => match first {
                Value::List(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for item in items {
                        out.push(self.apply(second.clone(), vec![item], span)?);
                    }
                    Ok(Value::List(out))
                }
                _ => Err(bad(builtin)),
            },

            Builtin::Fold => {
                let init = args.next().expect("arity checked");
                match first {
                    Value::List(items) => {
                        let mut acc = init;
                        let mut out = Vec::with_capacity(items.len());
                        for item in items {
                            acc = self.apply(second.clone(), vec![acc, item], span)?;
                            out.push(acc.clone());
                        }
                        Ok(Value::List(out))
                    }
                    _ => Err(bad(builtin)),
                }
            }

            Builtin::Chain => match first {
                Value::Task(payload) => match self.apply(second, vec![*payload], span)? {
                    task @ Value::Task(_) => Ok(task),
                    _ => Err(bad(builtin)),
                },
                _ => Err(bad(builtin)),
            },
        }
    }
}

/// Try to match a pattern against a value. `None` means fall through to
/// the next case; `Some` carries the bindings in source order.
fn match_pattern(pattern: &Pattern, value: &Value) -> Option<Vec<(String, Value)>> {
    let mut bindings = Vec::new();
    if match_into(pattern, value, &mut bindings) {
        Some(bindings)
    } else {
        None
    }
}

fn match_into(pattern: &Pattern, value: &Value, bindings: &mut Vec<(String, Value)>) -> bool {
    match (pattern, value) {
        (Pattern::Lit { value: lit, .. }, v) => match (lit, v) {
            (Literal::Number(n), Value::Num(m)) => n == m,
            (Literal::String(s), Value::Str(t)) => s == t,
            _ => false,
        },

        (Pattern::Id { name, .. }, v) => {
            bindings.push((name.clone(), v.clone()));
            true
        }

        (Pattern::Cons { name, payload, .. }, Value::Tag(tag, tag_payload)) => {
            if name != tag {
                return false;
            }
            match (payload, tag_payload) {
                (None, None) => true,
                (Some(p), Some(v)) => match_into(p, v, bindings),
                _ => false,
            }
        }

        (Pattern::Rec { fields, .. }, Value::Rec(rec)) => fields.iter().all(|(key, pat)| {
            rec.get(key)
                .is_some_and(|v| match_into(pat, v, bindings))
        }),

        (Pattern::List { items, .. }, Value::List(values)) => {
            items.len() == values.len()
                && items
                    .iter()
                    .zip(values.iter())
                    .all(|(pat, v)| match_into(pat, v, bindings))
        }

        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::global_scope;
    use crate::parser::parse;

    fn eval_source(source: &str) -> Result<Value> {
        let program = parse(source).unwrap();
        let mut evaluator = Evaluator::new(global_scope());
        Ok(evaluator.eval_program(&program)?.expect("no value produced"))
    }

    fn eval_ok(source: &str) -> Value {
        eval_source(source).unwrap()
    }

    #[test]
    fn test_eval_literals() {
        assert!(values_equal(&eval_ok("42"), &Value::Num(42.0)));
        assert!(values_equal(&eval_ok("\"hi\""), &Value::Str("hi".into())));
    }

    #[test]
    fn test_eval_arithmetic() {
        assert!(values_equal(&eval_ok("1 + 2 * 3"), &Value::Num(7.0)));
    }

    #[test]
    fn test_eval_string_concat() {
        assert!(values_equal(
            &eval_ok(r#""foo" ^ "bar""#),
            &Value::Str("foobar".into())
        ));
    }

    #[test]
    fn test_eval_list_append() {
        let v = eval_ok("[1, 2] ++ [3]");
        assert_eq!(v.to_string(), "[1, 2, 3]");
    }

    #[test]
    fn test_eval_lambda_application() {
        assert!(values_equal(&eval_ok(r"(\(x, y) -> x + y)(1, 2)"), &Value::Num(3.0)));
    }

    #[test]
    fn test_closures_capture_environment() {
        let v = eval_ok(r"(\x -> \y -> x + y)(10)(5)");
        assert!(values_equal(&v, &Value::Num(15.0)));
    }

    #[test]
    fn test_record_access() {
        assert!(values_equal(&eval_ok("{a: 1, b: 2}.b"), &Value::Num(2.0)));
    }

    #[test]
    fn test_eval_match_first_case_wins() {
        let v = eval_ok("when Ok(1) is Ok(x) -> x, Err(e) -> 0 else 99");
        assert!(values_equal(&v, &Value::Num(1.0)));
    }

    #[test]
    fn test_eval_match_fallthrough() {
        let v = eval_ok("when Warm is Hot -> 1, Warm -> 2, Cold -> 3");
        assert!(values_equal(&v, &Value::Num(2.0)));
    }

    #[test]
    fn test_eval_match_default() {
        let v = eval_ok("when Other is Hot -> 1 else 42");
        assert!(values_equal(&v, &Value::Num(42.0)));
    }

    #[test]
    fn test_eval_match_nested_pattern() {
        let v = eval_ok("when Pair({left: 1, right: 2}) is Pair({left: x, right: y}) -> x + y");
        assert!(values_equal(&v, &Value::Num(3.0)));
    }

    #[test]
    fn test_eval_unhandled_case() {
        let err = eval_source("when Cold is Hot -> 1").unwrap_err();
        assert!(matches!(
            err,
            crate::error::FrondError::Eval(EvalError::UnhandledCase { .. })
        ));
    }

    #[test]
    fn test_eval_eq() {
        let v = eval_ok("eq(1, 1)");
        assert_eq!(v.to_string(), "True");
        let v = eval_ok("eq({a: 1}, {a: 2})");
        assert_eq!(v.to_string(), "False");
    }

    #[test]
    fn test_eval_map() {
        let v = eval_ok(r"map([1, 2, 3], \x -> x * 2)");
        assert_eq!(v.to_string(), "[2, 4, 6]");
    }

    #[test]
    fn test_eval_fold_collects_steps() {
        let v = eval_ok(r"fold([1, 2, 3], \(a, x) -> a + x, 0)");
        assert_eq!(v.to_string(), "[1, 3, 6]");
    }

    #[test]
    fn test_eval_top_level_bindings() {
        let v = eval_ok("double = \\x -> x * 2\ndouble(21)");
        assert!(values_equal(&v, &Value::Num(42.0)));
    }

    #[test]
    fn test_eval_recursion_through_globals() {
        // Recursion resolves through the global frame at call time; the
        // recursive call zeroes its argument, so it reaches the True case
        // in one step.
        let v = eval_ok("f = \\n -> when eq(n, 0) is True -> 0 else f(n * 0)\nf(3)");
        assert!(values_equal(&v, &Value::Num(0.0)));
    }

    #[test]
    fn test_eval_task_chain() {
        let mut globals = global_scope();
        globals.insert("t".to_string(), Value::Task(Box::new(Value::Num(1.0))));

        let program = parse(r"t &> \x -> t").unwrap();
        let mut evaluator = Evaluator::new(globals);
        let v = evaluator.eval_program(&program).unwrap().unwrap();
        assert_eq!(v.to_string(), "Task(1)");
    }

    #[test]
    fn test_eval_unbound_name() {
        let err = eval_source("nope").unwrap_err();
        assert!(matches!(
            err,
            crate::error::FrondError::Eval(EvalError::UnboundName { .. })
        ));
    }

    #[test]
    fn test_eval_calling_non_function() {
        let err = eval_source("1(2)").unwrap_err();
        assert!(matches!(
            err,
            crate::error::FrondError::Eval(EvalError::NotAFunction { .. })
        ));
    }
}
