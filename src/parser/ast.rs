//! Abstract syntax tree for frond programs.
//!
//! Expression nodes carry a source span used only for diagnostics. All
//! nodes are immutable after construction.

use crate::lexer::Span;

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric or string literal.
    Lit { value: Literal, span: Span },

    /// Variable reference.
    Id { name: String, span: Span },

    /// Record construction. Keys are unique (enforced by the parser).
    Rec {
        fields: Vec<(String, Expr)>,
        span: Span,
    },

    /// Homogeneous list.
    List { items: Vec<Expr>, span: Span },

    /// Tag construction with optional payload. The name begins with an
    /// uppercase letter.
    Cons {
        name: String,
        payload: Option<Box<Expr>>,
        span: Span,
    },

    /// Field projection.
    Acc {
        expr: Box<Expr>,
        prop: String,
        span: Span,
    },

    /// N-ary application.
    App {
        func: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },

    /// N-ary abstraction.
    Lam {
        params: Vec<String>,
        body: Box<Expr>,
        span: Span,
    },

    /// Pattern match over a tag, with optional default. Cases are ordered.
    Match {
        scrutinee: Box<Expr>,
        cases: Vec<MatchCase>,
        otherwise: Option<Box<Expr>>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Lit { span, .. }
            | Expr::Id { span, .. }
            | Expr::Rec { span, .. }
            | Expr::List { span, .. }
            | Expr::Cons { span, .. }
            | Expr::Acc { span, .. }
            | Expr::App { span, .. }
            | Expr::Lam { span, .. }
            | Expr::Match { span, .. } => *span,
        }
    }
}

/// One arm of a `when` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub body: Expr,
}

/// A pattern. Mirrors a restricted expression subset.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Literal pattern.
    Lit { value: Literal, span: Span },

    /// Binds an identifier.
    Id { name: String, span: Span },

    /// Tag pattern with optional payload pattern.
    Cons {
        name: String,
        payload: Option<Box<Pattern>>,
        span: Span,
    },

    /// Record pattern. Keys are unique.
    Rec {
        fields: Vec<(String, Pattern)>,
        span: Span,
    },

    /// List pattern.
    List { items: Vec<Pattern>, span: Span },
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Lit { span, .. }
            | Pattern::Id { span, .. }
            | Pattern::Cons { span, .. }
            | Pattern::Rec { span, .. }
            | Pattern::List { span, .. } => *span,
        }
    }

    /// Project the pattern into the expression of identical shape, so the
    /// inferencer can reuse the ordinary expression rules.
    pub fn to_expr(&self) -> Expr {
        match self {
            Pattern::Lit { value, span } => Expr::Lit {
                value: value.clone(),
                span: *span,
            },
            Pattern::Id { name, span } => Expr::Id {
                name: name.clone(),
                span: *span,
            },
            Pattern::Cons {
                name,
                payload,
                span,
            } => Expr::Cons {
                name: name.clone(),
                payload: payload.as_ref().map(|p| Box::new(p.to_expr())),
                span: *span,
            },
            Pattern::Rec { fields, span } => Expr::Rec {
                fields: fields
                    .iter()
                    .map(|(k, p)| (k.clone(), p.to_expr()))
                    .collect(),
                span: *span,
            },
            Pattern::List { items, span } => Expr::List {
                items: items.iter().map(|p| p.to_expr()).collect(),
                span: *span,
            },
        }
    }

    /// Collect the names this pattern binds, in source order.
    pub fn binders(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_binders(&mut names);
        names
    }

    fn collect_binders(&self, names: &mut Vec<String>) {
        match self {
            Pattern::Lit { .. } => {}
            Pattern::Id { name, .. } => names.push(name.clone()),
            Pattern::Cons { payload, .. } => {
                if let Some(p) = payload {
                    p.collect_binders(names);
                }
            }
            Pattern::Rec { fields, .. } => {
                for (_, p) in fields {
                    p.collect_binders(names);
                }
            }
            Pattern::List { items, .. } => {
                for p in items {
                    p.collect_binders(names);
                }
            }
        }
    }
}

/// A top-level declaration: a named binding or a bare expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Bind {
        name: String,
        value: Expr,
        span: Span,
    },
    Expr(Expr),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Bind { span, .. } => *span,
            Decl::Expr(e) => e.span(),
        }
    }
}

/// A parsed program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub decls: Vec<Decl>,
    pub span: Span,
}
