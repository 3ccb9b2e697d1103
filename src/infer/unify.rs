//! Unification: reconciling two types into the most-general substitution.
//!
//! The unifier is the only component that allocates fresh variables besides
//! the inferencer itself: unifying two rows routes both extension variables
//! through one freshly-allocated common tail, which is what turns width
//! subtyping into plain equality.

use std::collections::BTreeMap;

use crate::error::{FrondError, RowSide, TypeError};
use crate::lexer::Span;
use crate::types::{Label, RowType, Subst, TVar, Type};

use super::state::InferState;

/// Result type for unification.
pub type UnifyResult<T> = Result<T, FrondError>;

impl InferState {
    /// Unify two types, returning the most-general substitution that makes
    /// them equal, or the first `TypeError` encountered.
    pub fn unify(&mut self, span: Span, t1: &Type, t2: &Type) -> UnifyResult<Subst> {
        match (t1, t2) {
            (Type::Var(v1), Type::Var(v2)) if v1 == v2 => Ok(Subst::empty()),

            (Type::Var(v), other) | (other, Type::Var(v)) => Self::bind_var(span, *v, other),

            (Type::Cons(n1, args1), Type::Cons(n2, args2)) => {
                if n1 != n2 {
                    return Err(TypeError::ConstructorMismatch {
                        left: n1.clone(),
                        right: n2.clone(),
                        span,
                    }
                    .into());
                }

                if args1.len() != args2.len() {
                    return Err(TypeError::ArityMismatch {
                        left: t1.to_string(),
                        right: t2.to_string(),
                        span,
                    }
                    .into());
                }

                // Left to right, keeping the running substitution applied to
                // both sides so later argument pairs never see stale
                // variables.
                let mut subst = Subst::empty();
                for (a1, a2) in args1.iter().zip(args2.iter()) {
                    let s = self.unify(span, &subst.apply(a1), &subst.apply(a2))?;
                    subst = s.compose(&subst);
                }
                Ok(subst)
            }

            (Type::Row(r1), Type::Row(r2)) => self.unify_rows(span, r1, r2),

            // Variables are handled above, so the remaining pair is a
            // constructor against a row.
            _ => Err(TypeError::KindMismatch {
                left: t1.to_string(),
                right: t2.to_string(),
                span,
            }
            .into()),
        }
    }

    /// Bind a type variable, guarding against infinite types.
    fn bind_var(span: Span, var: TVar, ty: &Type) -> UnifyResult<Subst> {
        if let Type::Var(v) = ty {
            if *v == var {
                return Ok(Subst::empty());
            }
        }

        if ty.occurs(var) {
            return Err(TypeError::InfiniteType {
                var: var.to_string(),
                ty: ty.to_string(),
                span,
            }
            .into());
        }

        Ok(Subst::singleton(var, ty.clone()))
    }

    /// Unify two rows. Shared items unify pointwise; the exclusive items of
    /// each side are pushed into the other side's extension variable, both
    /// rerouted through one fresh common tail.
    fn unify_rows(&mut self, span: Span, r1: &RowType, r2: &RowType) -> UnifyResult<Subst> {
        if r1.union != r2.union {
            return Err(TypeError::RowKindMismatch {
                left: Type::Row(r1.clone()).to_string(),
                right: Type::Row(r2.clone()).to_string(),
                span,
            }
            .into());
        }

        let mut subst = Subst::empty();

        for (label, left_ty) in &r1.items {
            if let Some(right_ty) = r2.items.get(label) {
                let s = self.unify(span, &subst.apply(left_ty), &subst.apply(right_ty))?;
                subst = s.compose(&subst);
            }
        }

        let left_only: BTreeMap<Label, Type> = r1
            .items
            .iter()
            .filter(|(k, _)| !r2.items.contains_key(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let right_only: BTreeMap<Label, Type> = r2
            .items
            .iter()
            .filter(|(k, _)| !r1.items.contains_key(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let open = r1.open && r2.open;
        // A closed side cannot absorb keys it does not already have.
        let left_can_absorb = right_only.is_empty() || r1.open;
        let right_can_absorb = left_only.is_empty() || r2.open;

        if !(open || (left_can_absorb && right_can_absorb)) {
            let (keys, side) = if !left_can_absorb {
                (row_keys(&right_only), RowSide::Left)
            } else {
                (row_keys(&left_only), RowSide::Right)
            };
            return Err(TypeError::RowMismatch { keys, side, span }.into());
        }

        // Two rows sharing one extension variable cannot each push a
        // different set of keys into it; their widths must already agree.
        if r1.rest == r2.rest {
            if !right_only.is_empty() {
                return Err(TypeError::RowMismatch {
                    keys: row_keys(&right_only),
                    side: RowSide::Left,
                    span,
                }
                .into());
            }
            if !left_only.is_empty() {
                return Err(TypeError::RowMismatch {
                    keys: row_keys(&left_only),
                    side: RowSide::Right,
                    span,
                }
                .into());
            }
            return Ok(subst);
        }

        let common = self.fresh();

        let left_ext = Type::Row(RowType {
            union: r1.union,
            open,
            items: right_only,
            rest: common,
        });
        let s = self.unify(
            span,
            &subst.apply(&Type::Var(r1.rest)),
            &subst.apply(&left_ext),
        )?;
        subst = s.compose(&subst);

        let right_ext = Type::Row(RowType {
            union: r2.union,
            open,
            items: left_only,
            rest: common,
        });
        let s = self.unify(
            span,
            &subst.apply(&Type::Var(r2.rest)),
            &subst.apply(&right_ext),
        )?;
        subst = s.compose(&subst);

        Ok(subst)
    }
}

fn row_keys(items: &BTreeMap<Label, Type>) -> Vec<String> {
    items.keys().map(|k| k.0.clone()).collect()
}
