//! WASM bindings for the Uni parser and serializer.
//!
//! Exposes `format()` and `parse()` to JavaScript via wasm-bindgen.
//! Both throw a JS error carrying the parse diagnostic on malformed input.

use wasm_bindgen::prelude::*;

/// Reformat Uni source into canonical form.
#[wasm_bindgen]
pub fn format(source: &str) -> Result<String, JsError> {
    let forest = uni_parser::parse(source).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(uni_serializer::serialize(&forest))
}

/// Parse Uni source into an array of `{ attributes, children }` objects.
///
/// Each attribute is `{ name, value }` where `value` is
/// `{ kind: "missing" }`, `{ kind: "scalar", value: string }` or
/// `{ kind: "list", value: string[] }`.
#[wasm_bindgen]
pub fn parse(source: &str) -> Result<JsValue, JsError> {
    let forest = uni_parser::parse(source).map_err(|e| JsError::new(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&forest).map_err(|e| JsError::new(&e.to_string()))
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
