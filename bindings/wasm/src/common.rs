use anyhow::{anyhow, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use wasm_bindgen::JsValue;

pub(crate) fn js_err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Round-trip a JS value through `JSON.stringify` into a `serde_json::Value`.
pub(crate) fn js_to_json(value: &JsValue) -> Result<Value> {
    let text = js_sys::JSON::stringify(value)
        .map_err(|e| anyhow!("value is not JSON-serializable: {:?}", e))?
        .as_string()
        .ok_or_else(|| anyhow!("JSON.stringify returned a non-string"))?;
    serde_json::from_str(&text).map_err(|e| anyhow!("invalid JSON: {e}"))
}

/// Deserialize a typed value from JS, treating `undefined`/`null` as `T::default()`.
pub(crate) fn js_to_typed<T: DeserializeOwned + Default>(value: JsValue) -> Result<T> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| anyhow!("{e}"))
}

/// Serialize large GeoJSON to a string first and let JS parse it; plain
/// objects instead of `Map`s for everything else.
pub(crate) fn json_to_js(value: &Value) -> Result<JsValue> {
    let text = serde_json::to_string(value).map_err(|e| anyhow!("Failed to serialize GeoJSON: {e}"))?;
    js_sys::JSON::parse(&text).map_err(|e| anyhow!("Failed to parse GeoJSON string: {:?}", e))
}

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(|e| anyhow!("{e}"))
}
