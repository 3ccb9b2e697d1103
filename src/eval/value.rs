//! Runtime value representation for the frond evaluator.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::parser::ast::Expr;

/// A captured environment for closures.
#[derive(Debug, Clone, Default)]
pub struct CapturedEnv(pub HashMap<String, Value>);

/// Builtin function identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `+` on numbers.
    Add,
    /// `*` on numbers.
    Mul,
    /// `^` on strings.
    Concat,
    /// `++` on lists.
    Append,
    /// `eq`: structural equality, yields `True`/`False` tags.
    Eq,
    /// `fold`: accumulating fold collecting each step.
    Fold,
    /// `map` over lists.
    Map,
    /// `&>`: task chaining.
    Chain,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Add => "+",
            Builtin::Mul => "*",
            Builtin::Concat => "^",
            Builtin::Append => "++",
            Builtin::Eq => "eq",
            Builtin::Fold => "fold",
            Builtin::Map => "map",
            Builtin::Chain => "&>",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Builtin::Add
            | Builtin::Mul
            | Builtin::Concat
            | Builtin::Append
            | Builtin::Eq
            | Builtin::Map
            | Builtin::Chain => 2,
            Builtin::Fold => 3,
        }
    }
}

/// Runtime value representation.
#[derive(Debug, Clone)]
pub enum Value {
    Num(f64),
    Str(String),
    Unit,
    Rec(BTreeMap<String, Value>),
    List(Vec<Value>),
    Tag(String, Option<Box<Value>>),
    /// A lambda with its captured environment.
    Closure {
        params: Vec<String>,
        body: Box<Expr>,
        env: CapturedEnv,
    },
    Builtin(Builtin),
    /// A resolved task carrying its payload (synchronous task model).
    Task(Box<Value>),
}

impl Value {
    pub fn tag(name: &str) -> Value {
        Value::Tag(name.to_string(), None)
    }

    pub fn bool_tag(b: bool) -> Value {
        Value::tag(if b { "True" } else { "False" })
    }
}

/// Structural equality. Functions never compare equal.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Num(x), Value::Num(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Unit, Value::Unit) => true,
        (Value::Rec(x), Value::Rec(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|((k1, v1), (k2, v2))| k1 == k2 && values_equal(v1, v2))
        }
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(v1, v2)| values_equal(v1, v2))
        }
        (Value::Tag(n1, p1), Value::Tag(n2, p2)) => {
            n1 == n2
                && match (p1, p2) {
                    (None, None) => true,
                    (Some(x), Some(y)) => values_equal(x, y),
                    _ => false,
                }
        }
        (Value::Task(x), Value::Task(y)) => values_equal(x, y),
        _ => false,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Unit => write!(f, "Unit"),
            Value::Rec(fields) => {
                write!(f, "{{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::List(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Tag(name, payload) => {
                write!(f, "{}", name)?;
                if let Some(p) = payload {
                    write!(f, "({})", p)?;
                }
                Ok(())
            }
            Value::Closure { params, .. } => write!(f, "<function/{}>", params.len()),
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name()),
            Value::Task(v) => write!(f, "Task({})", v),
        }
    }
}
