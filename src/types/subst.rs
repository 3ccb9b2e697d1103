//! Substitutions: finite maps from type variables to types that act as
//! functions on types and compose.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::ty::{Label, RowType, Scheme, TVar, Type};

/// A substitution mapping type variables to types.
#[derive(Clone, Debug, Default)]
pub struct Subst {
    map: HashMap<TVar, Type>,
}

impl Subst {
    /// The identity substitution.
    pub fn empty() -> Self {
        Subst {
            map: HashMap::new(),
        }
    }

    /// A single-binding substitution.
    pub fn singleton(var: TVar, ty: Type) -> Self {
        let mut map = HashMap::new();
        map.insert(var, ty);
        Subst { map }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, var: &TVar) -> Option<&Type> {
        self.map.get(var)
    }

    pub fn contains(&self, var: &TVar) -> bool {
        self.map.contains_key(var)
    }

    pub fn insert(&mut self, var: TVar, ty: Type) {
        self.map.insert(var, ty);
    }

    /// Compose two substitutions: `apply(compose(s1, s2), t)` equals
    /// `apply(s1, apply(s2, t))` for all `t`. Bindings of `self` override
    /// bindings of `other` on collision.
    pub fn compose(&self, other: &Subst) -> Subst {
        let mut result = HashMap::new();

        // Map other's bindings through self
        for (var, ty) in &other.map {
            result.insert(*var, self.apply(ty));
        }

        // Keep self's bindings where other has none
        for (var, ty) in &self.map {
            if !result.contains_key(var) {
                result.insert(*var, ty.clone());
            }
        }

        Subst { map: result }
    }

    /// Apply this substitution to a substitutable value.
    pub fn apply<T: Substitutable>(&self, t: &T) -> T {
        t.apply_subst(self)
    }

    /// A copy of this substitution with certain variables removed.
    pub fn remove_vars(&self, vars: &[TVar]) -> Subst {
        let mut map = self.map.clone();
        for var in vars {
            map.remove(var);
        }
        Subst { map }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TVar, &Type)> {
        self.map.iter()
    }
}

impl FromIterator<(TVar, Type)> for Subst {
    fn from_iter<T: IntoIterator<Item = (TVar, Type)>>(iter: T) -> Self {
        Subst {
            map: iter.into_iter().collect(),
        }
    }
}

/// Trait for values substitutions act on.
pub trait Substitutable {
    /// Apply a substitution to this value. Unknown variables pass through
    /// unchanged.
    fn apply_subst(&self, subst: &Subst) -> Self;

    /// Collect all free type variables.
    fn free_vars(&self) -> HashSet<TVar>;
}

impl Substitutable for Type {
    fn apply_subst(&self, subst: &Subst) -> Self {
        match self {
            Type::Cons(name, args) => Type::Cons(
                name.clone(),
                args.iter().map(|a| a.apply_subst(subst)).collect(),
            ),

            // One lookup suffices: composition keeps every binding's range
            // fully applied, so ranges never mention domain variables.
            Type::Var(v) => match subst.get(v) {
                Some(ty) => ty.clone(),
                None => self.clone(),
            },

            Type::Row(row) => Type::Row(row.apply_subst(subst)),
        }
    }

    fn free_vars(&self) -> HashSet<TVar> {
        Type::free_vars(self)
    }
}

impl Substitutable for RowType {
    /// Rewrites the items pointwise, then resolves the tail. A tail that
    /// resolves to another row is merged flat: the outer items win on key
    /// collision, the tail row's rest becomes the merged rest, and the row
    /// stays open only if both rows were open. Nesting instead of merging
    /// would grow unbounded row chains across repeated refinements and
    /// defeat equality checks.
    fn apply_subst(&self, subst: &Subst) -> Self {
        let items: BTreeMap<Label, Type> = self
            .items
            .iter()
            .map(|(k, v)| (k.clone(), v.apply_subst(subst)))
            .collect();

        if !subst.contains(&self.rest) {
            return RowType {
                union: self.union,
                open: self.open,
                items,
                rest: self.rest,
            };
        }

        match Type::Var(self.rest).apply_subst(subst) {
            Type::Var(v) => RowType {
                union: self.union,
                open: self.open,
                items,
                rest: v,
            },
            Type::Row(tail) if tail.union == self.union => {
                let mut merged = tail.items;
                merged.extend(items);
                RowType {
                    union: self.union,
                    open: self.open && tail.open,
                    items: merged,
                    rest: tail.rest,
                }
            }
            other => unreachable!("row tail {} bound to non-row type {other}", self.rest),
        }
    }

    fn free_vars(&self) -> HashSet<TVar> {
        let mut vars = HashSet::new();
        for ty in self.items.values() {
            vars.extend(ty.free_vars());
        }
        if self.open {
            vars.insert(self.rest);
        }
        vars
    }
}

impl Substitutable for Scheme {
    fn apply_subst(&self, subst: &Subst) -> Self {
        // The quantified variables must not be captured
        let filtered = subst.remove_vars(&self.vars);
        Scheme {
            vars: self.vars.clone(),
            body: self.body.apply_subst(&filtered),
        }
    }

    fn free_vars(&self) -> HashSet<TVar> {
        Scheme::free_vars(self)
    }
}

impl<T: Substitutable> Substitutable for Vec<T> {
    fn apply_subst(&self, subst: &Subst) -> Self {
        self.iter().map(|t| t.apply_subst(subst)).collect()
    }

    fn free_vars(&self) -> HashSet<TVar> {
        let mut vars = HashSet::new();
        for t in self {
            vars.extend(t.free_vars());
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_subst() {
        let subst = Subst::empty();
        let ty = Type::var(0);
        assert_eq!(subst.apply(&ty), ty);
    }

    #[test]
    fn test_singleton_subst() {
        let subst = Subst::singleton(TVar(0), Type::number());
        assert_eq!(subst.apply(&Type::var(0)), Type::number());
        assert_eq!(subst.apply(&Type::var(1)), Type::var(1));
    }

    #[test]
    fn test_subst_in_func() {
        let subst = Subst::singleton(TVar(0), Type::number());
        let ty = Type::func(vec![Type::var(0)], Type::var(0));
        assert_eq!(
            subst.apply(&ty),
            Type::func(vec![Type::number()], Type::number())
        );
    }

    #[test]
    fn test_compose() {
        // s1: T0 -> num, s2: T1 -> T0
        // compose(s1, s2): T0 -> num, T1 -> num
        let s1 = Subst::singleton(TVar(0), Type::number());
        let s2 = Subst::singleton(TVar(1), Type::var(0));
        let composed = s1.compose(&s2);

        assert_eq!(composed.apply(&Type::var(0)), Type::number());
        assert_eq!(composed.apply(&Type::var(1)), Type::number());
    }

    #[test]
    fn test_compose_left_overrides() {
        let s1 = Subst::singleton(TVar(0), Type::number());
        let s2 = Subst::singleton(TVar(0), Type::string());
        let composed = s1.compose(&s2);
        // apply(compose(s1, s2), T0) == apply(s1, apply(s2, T0)) == str
        assert_eq!(composed.apply(&Type::var(0)), Type::string());
    }

    #[test]
    fn test_row_tail_rewrites_to_var() {
        let subst = Subst::singleton(TVar(0), Type::var(5));
        let row = RowType::record_open(
            [("a".into(), Type::number())].into_iter().collect(),
            TVar(0),
        );
        let applied = subst.apply(&row);
        assert_eq!(applied.rest, TVar(5));
        assert!(applied.open);
    }

    #[test]
    fn test_row_tail_merges_flat() {
        // {a: num | T0} with T0 -> {b: str | T1} becomes {a: num, b: str | T1}
        let tail = RowType::record_open(
            [("b".into(), Type::string())].into_iter().collect(),
            TVar(1),
        );
        let subst = Subst::singleton(TVar(0), Type::Row(tail));
        let row = RowType::record_open(
            [("a".into(), Type::number())].into_iter().collect(),
            TVar(0),
        );

        let applied = subst.apply(&row);
        assert_eq!(applied.items.len(), 2);
        assert_eq!(applied.rest, TVar(1));
        assert!(applied.open);
    }

    #[test]
    fn test_row_merge_outer_items_win() {
        let tail = RowType::record_open(
            [("a".into(), Type::string())].into_iter().collect(),
            TVar(1),
        );
        let subst = Subst::singleton(TVar(0), Type::Row(tail));
        let row = RowType::record_open(
            [("a".into(), Type::number())].into_iter().collect(),
            TVar(0),
        );

        let applied = subst.apply(&row);
        assert_eq!(applied.items.get(&"a".into()), Some(&Type::number()));
    }

    #[test]
    fn test_row_merge_closedness() {
        // Open row over a closed tail becomes closed
        let tail = RowType::record(
            [("b".into(), Type::string())].into_iter().collect(),
            TVar(1),
        );
        let subst = Subst::singleton(TVar(0), Type::Row(tail));
        let row = RowType::record_open(
            [("a".into(), Type::number())].into_iter().collect(),
            TVar(0),
        );

        let applied = subst.apply(&row);
        assert!(!applied.open);
        assert_eq!(applied.items.len(), 2);
    }

    #[test]
    fn test_scheme_subst_respects_quantifiers() {
        // forall T0. (T0) -> T1 under {T0 -> num} leaves T0 alone
        let scheme = Scheme::poly(vec![TVar(0)], Type::func(vec![Type::var(0)], Type::var(1)));
        let subst = Subst::singleton(TVar(0), Type::number());

        let result = subst.apply(&scheme);
        assert_eq!(result.body, Type::func(vec![Type::var(0)], Type::var(1)));
    }

    #[test]
    fn test_scheme_subst_applies_to_free_vars() {
        let scheme = Scheme::poly(vec![TVar(0)], Type::func(vec![Type::var(0)], Type::var(1)));
        let subst = Subst::singleton(TVar(1), Type::string());

        let result = subst.apply(&scheme);
        assert_eq!(
            result.body,
            Type::func(vec![Type::var(0)], Type::string())
        );
    }
}
