//! Typing environment: a map from identifier names to schemes.

use std::collections::{HashMap, HashSet};

use crate::types::{Scheme, Subst, Substitutable, TVar, Type};

/// Typing environment. Extension is immutable: `extend` returns a new
/// environment, leaving the original untouched. The environment is only
/// replaced wholesale between top-level declarations.
#[derive(Clone, Debug, Default)]
pub struct TypeEnv {
    bindings: HashMap<String, Scheme>,
}

impl TypeEnv {
    pub fn empty() -> Self {
        TypeEnv {
            bindings: HashMap::new(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Scheme> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Extend with a new binding, returning a new environment.
    pub fn extend(&self, name: String, scheme: Scheme) -> Self {
        let mut bindings = self.bindings.clone();
        bindings.insert(name, scheme);
        TypeEnv { bindings }
    }

    /// Generalise a type over its free variables that are not already free
    /// in this environment.
    pub fn generalize(&self, ty: &Type) -> Scheme {
        let env_free = self.free_vars();
        let mut vars: Vec<TVar> = ty
            .free_vars()
            .into_iter()
            .filter(|v| !env_free.contains(v))
            .collect();
        vars.sort();
        Scheme::poly(vars, ty.clone())
    }

    /// All free type variables of the environment's schemes.
    pub fn free_vars(&self) -> HashSet<TVar> {
        let mut vars = HashSet::new();
        for scheme in self.bindings.values() {
            vars.extend(scheme.free_vars());
        }
        vars
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Scheme)> {
        self.bindings.iter()
    }
}

impl Substitutable for TypeEnv {
    fn apply_subst(&self, subst: &Subst) -> Self {
        let bindings = self
            .bindings
            .iter()
            .map(|(k, scheme)| (k.clone(), scheme.apply_subst(subst)))
            .collect();
        TypeEnv { bindings }
    }

    fn free_vars(&self) -> HashSet<TVar> {
        TypeEnv::free_vars(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_env() {
        let env = TypeEnv::empty();
        assert!(env.lookup("x").is_none());
    }

    #[test]
    fn test_extend_leaves_original_untouched() {
        let env = TypeEnv::empty();
        let env2 = env.extend("x".to_string(), Scheme::mono(Type::number()));

        assert!(env.lookup("x").is_none());
        assert!(env2.lookup("x").is_some());
    }

    #[test]
    fn test_shadowing() {
        let env = TypeEnv::empty()
            .extend("x".to_string(), Scheme::mono(Type::number()))
            .extend("x".to_string(), Scheme::mono(Type::string()));

        assert_eq!(env.lookup("x").unwrap().body, Type::string());
    }

    #[test]
    fn test_quantified_not_free() {
        let env = TypeEnv::empty().extend(
            "id".to_string(),
            Scheme::poly(vec![TVar(0)], Type::func(vec![Type::var(0)], Type::var(0))),
        );
        assert!(env.free_vars().is_empty());
    }

    #[test]
    fn test_generalize_skips_env_vars() {
        // T0 is monomorphic in the environment, so only T1 is quantified
        let env = TypeEnv::empty().extend("x".to_string(), Scheme::mono(Type::var(0)));
        let ty = Type::func(vec![Type::var(0)], Type::var(1));

        let scheme = env.generalize(&ty);
        assert_eq!(scheme.vars, vec![TVar(1)]);
    }

    #[test]
    fn test_apply_subst_to_env() {
        let env = TypeEnv::empty().extend("x".to_string(), Scheme::mono(Type::var(0)));
        let subst = Subst::singleton(TVar(0), Type::number());

        let env = subst.apply(&env);
        assert_eq!(env.lookup("x").unwrap().body, Type::number());
    }
}
