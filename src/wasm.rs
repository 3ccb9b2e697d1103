//! WebAssembly bindings for the frond type checker.

use wasm_bindgen::prelude::*;

use crate::builtins::initial_env;
use crate::error::FrondError;
use crate::infer::InferState;
use crate::parser::parse;
use crate::types::PrettyContext;

/// Result of type checking, consumed by a browser host.
#[wasm_bindgen]
pub struct CheckResult {
    success: bool,
    output: String,
    errors: Vec<JsValue>,
}

#[wasm_bindgen]
impl CheckResult {
    #[wasm_bindgen(getter)]
    pub fn success(&self) -> bool {
        self.success
    }

    /// One line per declaration: `name : scheme`.
    #[wasm_bindgen(getter)]
    pub fn output(&self) -> String {
        self.output.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn errors(&self) -> Vec<JsValue> {
        self.errors.clone()
    }
}

/// Format an error into a structured object for JS.
fn format_error(error: &FrondError) -> JsValue {
    let span = error.span();
    let message = error.to_string();

    let obj = js_sys::Object::new();
    js_sys::Reflect::set(&obj, &"message".into(), &message.into()).unwrap();
    js_sys::Reflect::set(&obj, &"start".into(), &JsValue::from_f64(span.start as f64)).unwrap();
    js_sys::Reflect::set(&obj, &"end".into(), &JsValue::from_f64(span.end as f64)).unwrap();
    obj.into()
}

/// Initialize the WASM module (call once at startup).
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Type check frond source code and return the inferred schemes.
#[wasm_bindgen]
pub fn check_types(source: &str) -> CheckResult {
    let program = match parse(source) {
        Ok(program) => program,
        Err(error) => {
            return CheckResult {
                success: false,
                output: String::new(),
                errors: vec![format_error(&error)],
            };
        }
    };

    let mut state = InferState::new();
    match state.infer_program(&initial_env(), &program) {
        Ok((schemes, _env)) => {
            let mut lines = Vec::new();
            for (name, scheme) in &schemes {
                let mut ctx = PrettyContext::new();
                let rendered = ctx.format_scheme(scheme);
                match name {
                    Some(name) => lines.push(format!("{} : {}", name, rendered)),
                    None => lines.push(format!("_ : {}", rendered)),
                }
            }
            CheckResult {
                success: true,
                output: lines.join("\n"),
                errors: vec![],
            }
        }
        Err(error) => CheckResult {
            success: false,
            output: String::new(),
            errors: vec![format_error(&error)],
        },
    }
}
