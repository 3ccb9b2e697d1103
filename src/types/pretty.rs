//! Pretty-printing for types and schemes.
//!
//! Constructor arguments render in `⟨…⟩`, functions as `(…) → r`, records
//! in `{…}`, variants in `[…]`, and scheme prefixes as `∀names.`.

use std::collections::HashMap;
use std::fmt::{self, Display, Write};

use super::ty::{RowType, Scheme, TVar, TVarId, Type};

/// Context for pretty-printing, renaming type variables to `a`, `b`, `c`, …
/// in order of first appearance.
pub struct PrettyContext {
    var_names: HashMap<TVarId, String>,
    next_name: usize,
}

impl PrettyContext {
    pub fn new() -> Self {
        PrettyContext {
            var_names: HashMap::new(),
            next_name: 0,
        }
    }

    fn var_name(&mut self, var: TVar) -> String {
        if let Some(name) = self.var_names.get(&var.0) {
            return name.clone();
        }

        let name = self.generate_name();
        self.var_names.insert(var.0, name.clone());
        name
    }

    fn generate_name(&mut self) -> String {
        let idx = self.next_name;
        self.next_name += 1;

        if idx < 26 {
            char::from(b'a' + idx as u8).to_string()
        } else {
            let letter = char::from(b'a' + (idx % 26) as u8);
            format!("{}{}", letter, idx / 26)
        }
    }

    /// Format a type to a string.
    pub fn format_type(&mut self, ty: &Type) -> String {
        let mut s = String::new();
        self.write_type(&mut s, ty).unwrap();
        s
    }

    /// Format a scheme to a string.
    pub fn format_scheme(&mut self, scheme: &Scheme) -> String {
        let mut s = String::new();
        self.write_scheme(&mut s, scheme).unwrap();
        s
    }

    fn write_type<W: Write>(&mut self, w: &mut W, ty: &Type) -> fmt::Result {
        match ty {
            Type::Cons(name, args) if name == "Func" && !args.is_empty() => {
                let (ret, params) = args.split_last().expect("checked non-empty");
                write!(w, "(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(w, ", ")?;
                    }
                    self.write_type(w, param)?;
                }
                write!(w, ") → ")?;
                self.write_type(w, ret)
            }

            Type::Cons(name, args) => {
                write!(w, "{}", name)?;
                if !args.is_empty() {
                    write!(w, "⟨")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(w, ", ")?;
                        }
                        self.write_type(w, arg)?;
                    }
                    write!(w, "⟩")?;
                }
                Ok(())
            }

            Type::Var(v) => {
                let name = self.var_name(*v);
                write!(w, "{}", name)
            }

            Type::Row(row) => self.write_row(w, row),
        }
    }

    fn write_row<W: Write>(&mut self, w: &mut W, row: &RowType) -> fmt::Result {
        let (open_delim, close_delim) = if row.union { ("[", "]") } else { ("{", "}") };
        write!(w, "{}", open_delim)?;

        let mut first = true;
        for (label, ty) in &row.items {
            if !first {
                write!(w, ", ")?;
            }
            first = false;

            if row.union {
                // Tags with a Unit payload print bare
                write!(w, "{}", label.0)?;
                if *ty != Type::unit() {
                    write!(w, "⟨")?;
                    self.write_type(w, ty)?;
                    write!(w, "⟩")?;
                }
            } else {
                write!(w, "{}: ", label.0)?;
                self.write_type(w, ty)?;
            }
        }

        if row.open {
            if !row.items.is_empty() {
                write!(w, " | ")?;
            }
            let name = self.var_name(row.rest);
            write!(w, "{}", name)?;
        }

        write!(w, "{}", close_delim)
    }

    fn write_scheme<W: Write>(&mut self, w: &mut W, scheme: &Scheme) -> fmt::Result {
        if !scheme.vars.is_empty() {
            write!(w, "∀")?;
            for (i, var) in scheme.vars.iter().enumerate() {
                if i > 0 {
                    write!(w, " ")?;
                }
                let name = self.var_name(*var);
                write!(w, "{}", name)?;
            }
            write!(w, ". ")?;
        }
        self.write_type(w, &scheme.body)
    }
}

impl Default for PrettyContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ctx = PrettyContext::new();
        write!(f, "{}", ctx.format_type(self))
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ctx = PrettyContext::new();
        write!(f, "{}", ctx.format_scheme(self))
    }
}
