//! Core type definitions for frond type inference.
//!
//! The type tree follows the Hindley-Milner discipline extended with row
//! types, which serve double duty: a row with `union = false` is a record,
//! a row with `union = true` is a polymorphic variant. Functions are
//! encoded as the `Func` constructor whose last argument is the result
//! type, so arity is the argument-list length minus one.

use std::collections::{BTreeMap, HashSet};

/// Unique identifier for type variables.
pub type TVarId = u32;

/// A type variable allocated by the fresh supply. Displays as `T0`, `T1`, …
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TVar(pub TVarId);

impl std::fmt::Display for TVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Field name in records, tag name in variants.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(pub String);

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

/// A row: a finite map of labels to types plus an extension variable.
///
/// `open` rows may gain further labels through `rest`; closed rows are
/// fixed at exactly `items`. The `rest` variable is present even when the
/// row is closed, because unifying two closed rows of the same shape must
/// still succeed by routing both through a shared extension.
#[derive(Clone, Debug, PartialEq)]
pub struct RowType {
    /// `false` for records, `true` for variants.
    pub union: bool,
    pub open: bool,
    pub items: BTreeMap<Label, Type>,
    pub rest: TVar,
}

impl RowType {
    /// A closed record row.
    pub fn record(items: BTreeMap<Label, Type>, rest: TVar) -> Self {
        RowType {
            union: false,
            open: false,
            items,
            rest,
        }
    }

    /// An open record row.
    pub fn record_open(items: BTreeMap<Label, Type>, rest: TVar) -> Self {
        RowType {
            union: false,
            open: true,
            items,
            rest,
        }
    }

    /// A closed variant row.
    pub fn variant(items: BTreeMap<Label, Type>, rest: TVar) -> Self {
        RowType {
            union: true,
            open: false,
            items,
            rest,
        }
    }

    /// An open variant row.
    pub fn variant_open(items: BTreeMap<Label, Type>, rest: TVar) -> Self {
        RowType {
            union: true,
            open: true,
            items,
            rest,
        }
    }

    /// The same row with a different openness flag.
    pub fn with_open(&self, open: bool) -> Self {
        RowType {
            open,
            ..self.clone()
        }
    }

    pub fn has_item(&self, label: &Label) -> bool {
        self.items.contains_key(label)
    }
}

/// Core type representation.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    /// Applied type constructor: `num`, `str`, `Unit`, `List⟨t⟩`,
    /// `Func⟨a, …, r⟩`, `Task⟨t, e⟩`.
    Cons(String, Vec<Type>),

    /// Type variable.
    Var(TVar),

    /// Record or variant row.
    Row(RowType),
}

impl Type {
    pub fn number() -> Self {
        Type::Cons("num".to_string(), vec![])
    }

    pub fn string() -> Self {
        Type::Cons("str".to_string(), vec![])
    }

    pub fn unit() -> Self {
        Type::Cons("Unit".to_string(), vec![])
    }

    pub fn list(elem: Type) -> Self {
        Type::Cons("List".to_string(), vec![elem])
    }

    /// A function type; the result goes last in the argument list.
    pub fn func(params: Vec<Type>, ret: Type) -> Self {
        let mut args = params;
        args.push(ret);
        Type::Cons("Func".to_string(), args)
    }

    pub fn task(value: Type, err: Type) -> Self {
        Type::Cons("Task".to_string(), vec![value, err])
    }

    pub fn var(id: TVarId) -> Self {
        Type::Var(TVar(id))
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Type::Var(_))
    }

    pub fn as_row(&self) -> Option<&RowType> {
        match self {
            Type::Row(row) => Some(row),
            _ => None,
        }
    }

    /// Collect all free type variables. The tail of a closed row is an
    /// internal witness, not a free variable.
    pub fn free_vars(&self) -> HashSet<TVar> {
        let mut vars = HashSet::new();
        self.collect_free_vars(&mut vars);
        vars
    }

    fn collect_free_vars(&self, vars: &mut HashSet<TVar>) {
        match self {
            Type::Cons(_, args) => {
                for arg in args {
                    arg.collect_free_vars(vars);
                }
            }
            Type::Var(v) => {
                vars.insert(*v);
            }
            Type::Row(row) => {
                for ty in row.items.values() {
                    ty.collect_free_vars(vars);
                }
                if row.open {
                    vars.insert(row.rest);
                }
            }
        }
    }

    /// The occurs check: does `var` appear anywhere in this type?
    ///
    /// Unlike [`Type::free_vars`], this counts the tail of a closed row.
    /// Binding a closed row's witness to a type containing that row would
    /// make substitution application loop, so the unifier must refuse it
    /// even though the witness is not free.
    pub fn occurs(&self, var: TVar) -> bool {
        match self {
            Type::Cons(_, args) => args.iter().any(|a| a.occurs(var)),
            Type::Var(v) => *v == var,
            Type::Row(row) => row.rest == var || row.items.values().any(|t| t.occurs(var)),
        }
    }
}

/// Type scheme: a universally quantified type. Only top-level bindings
/// carry non-trivial schemes; lambda-bound identifiers are lifted into
/// trivial ones for environment uniformity.
#[derive(Clone, Debug, PartialEq)]
pub struct Scheme {
    /// Quantified type variables.
    pub vars: Vec<TVar>,
    pub body: Type,
}

impl Scheme {
    /// A monomorphic scheme (no quantification).
    pub fn mono(ty: Type) -> Self {
        Scheme {
            vars: vec![],
            body: ty,
        }
    }

    /// A scheme with the given quantified variables.
    pub fn poly(vars: Vec<TVar>, ty: Type) -> Self {
        Scheme { vars, body: ty }
    }

    /// Generalise a type over all of its free variables, in ascending
    /// variable order for determinism. Top-level callers that must not
    /// capture environment variables use [`crate::infer::TypeEnv::generalize`].
    pub fn generalize(ty: &Type) -> Self {
        let mut vars: Vec<TVar> = ty.free_vars().into_iter().collect();
        vars.sort();
        Scheme {
            vars,
            body: ty.clone(),
        }
    }

    pub fn is_mono(&self) -> bool {
        self.vars.is_empty()
    }

    /// Free variables of the scheme: the body's minus the quantified ones.
    pub fn free_vars(&self) -> HashSet<TVar> {
        let mut vars = self.body.free_vars();
        for v in &self.vars {
            vars.remove(v);
        }
        vars
    }
}
