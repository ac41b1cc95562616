use esomchat_types::WidgetConfig;
use wasm_bindgen::JsValue;

/// Escape HTML to prevent XSS
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Read widget options from a JS object. `undefined` and `null` give the defaults.
pub fn config_from_js(options: &JsValue) -> Result<WidgetConfig, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(WidgetConfig::default());
    }
    let json = js_sys::JSON::stringify(options)?
        .as_string()
        .ok_or_else(|| JsValue::from_str("Options are not serializable"))?;
    WidgetConfig::from_json(&json)
        .map_err(|e| JsValue::from_str(&format!("Invalid chat widget options: {}", e)))
}

/// Current viewport width in CSS pixels
pub fn viewport_width() -> Result<f64, JsValue> {
    crate::window()?
        .inner_width()?
        .as_f64()
        .ok_or_else(|| JsValue::from_str("Viewport width is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
