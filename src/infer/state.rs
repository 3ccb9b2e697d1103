//! Inference state: the fresh type-variable supply.
//!
//! The supply is an injected value rather than a process-wide singleton, so
//! tests that depend on specific variable names can start from a fresh
//! state. Two calls on the same state never produce the same name.

use crate::types::{Scheme, Subst, TVar, TVarId, Type};

/// Fresh-variable supply threaded through one inference run.
pub struct InferState {
    name_source: TVarId,
}

impl Default for InferState {
    fn default() -> Self {
        Self::new()
    }
}

impl InferState {
    /// A fresh supply starting at `T0`.
    pub fn new() -> Self {
        InferState { name_source: 0 }
    }

    /// Allocate a distinct type variable.
    pub fn fresh(&mut self) -> TVar {
        let id = self.name_source;
        self.name_source += 1;
        TVar(id)
    }

    /// Allocate a distinct type variable as a type.
    pub fn fresh_type(&mut self) -> Type {
        Type::Var(self.fresh())
    }

    /// Instantiate a scheme: substitute every quantified variable with a
    /// fresh one and return the refreshed body.
    pub fn instantiate(&mut self, scheme: &Scheme) -> Type {
        if scheme.is_mono() {
            return scheme.body.clone();
        }

        let subst: Subst = scheme
            .vars
            .iter()
            .map(|v| (*v, self.fresh_type()))
            .collect();

        subst.apply(&scheme.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_vars_are_distinct() {
        let mut state = InferState::new();
        let v1 = state.fresh();
        let v2 = state.fresh();
        assert_ne!(v1, v2);
        assert_eq!(v1.to_string(), "T0");
        assert_eq!(v2.to_string(), "T1");
    }

    #[test]
    fn test_new_state_resets_supply() {
        let mut state = InferState::new();
        state.fresh();
        let mut state = InferState::new();
        assert_eq!(state.fresh(), TVar(0));
    }

    #[test]
    fn test_instantiate_mono() {
        let mut state = InferState::new();
        let scheme = Scheme::mono(Type::number());
        assert_eq!(state.instantiate(&scheme), Type::number());
    }

    #[test]
    fn test_instantiate_refreshes_quantified() {
        let mut state = InferState::new();
        let scheme = Scheme::poly(
            vec![TVar(100)],
            Type::func(vec![Type::var(100)], Type::var(100)),
        );

        let ty = state.instantiate(&scheme);
        assert_eq!(ty, Type::func(vec![Type::var(0)], Type::var(0)));
    }

    #[test]
    fn test_instantiate_twice_gives_distinct_vars() {
        let mut state = InferState::new();
        let scheme = Scheme::poly(vec![TVar(100)], Type::var(100));

        let t1 = state.instantiate(&scheme);
        let t2 = state.instantiate(&scheme);
        assert_ne!(t1, t2);
    }

    #[test]
    fn test_instantiate_generalize_round_trip() {
        let mut state = InferState::new();
        let ty = Type::func(vec![Type::var(0)], Type::list(Type::var(1)));
        let scheme = Scheme::generalize(&ty);

        // Quantifiers are allocated in ascending order, and a fresh supply
        // hands out T0, T1, ... in the same order.
        let round_tripped = state.instantiate(&scheme);
        assert_eq!(round_tripped, ty);
    }
}
