//! Frond: type inference for a small purely-functional expression language.
//!
//! The core of the library is a Hindley-Milner type inferencer extended with:
//!
//! - **Row-polymorphic records** for structural typing
//! - **Polymorphic variants** (open/closed tag unions) with
//!   exhaustiveness falling out of row unification
//! - **Schemes** generalised at module top level only
//!
//! The surrounding machinery (lexer, parser, evaluator, builtins, CLI,
//! WebAssembly bindings) exists to feed the inferencer and render its
//! results.

pub mod builtins;
pub mod diagnostics;
pub mod error;
pub mod eval;
pub mod infer;
pub mod lexer;
pub mod parser;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;
