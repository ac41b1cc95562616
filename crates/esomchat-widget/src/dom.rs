use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, EventTarget, HtmlElement};

/// Get element by ID
pub fn get_element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Element not found: {}", id)))
}

/// Get HTML element by ID
pub fn get_html_element_by_id(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    let element = get_element_by_id(document, id)?;
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("Element is not HtmlElement: {}", id)))
}

/// First HTML element matching a selector
pub fn query_html(document: &Document, selector: &str) -> Result<HtmlElement, JsValue> {
    document
        .query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("Element not found: {}", selector)))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("Element is not HtmlElement: {}", selector)))
}

/// All elements matching a selector, in document order
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Create element with class
pub fn create_element_with_class(
    document: &Document,
    tag: &str,
    class: &str,
) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    element.set_class_name(class);
    Ok(element)
}

/// Create element with class and text content
pub fn create_text_element(
    document: &Document,
    tag: &str,
    class: &str,
    text: &str,
) -> Result<Element, JsValue> {
    let element = create_element_with_class(document, tag, class)?;
    element.set_text_content(Some(text));
    Ok(element)
}

/// Add a listener for an event without a payload
pub fn add_listener<F>(target: &EventTarget, event: &str, callback: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget(); // Keep the closure alive
    Ok(())
}

/// Add click listener to element
pub fn add_click_listener<F>(element: &Element, callback: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    add_listener(element, "click", callback)
}

/// Set a single inline style property
/// Log a failed DOM update. Returns whether it succeeded.
pub fn log_failure(result: Result<(), JsValue>, action: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::error!("Failed to {}: {:?}", action, e);
            false
        }
    }
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) -> Result<(), JsValue> {
    element.style().set_property(property, value)
}

/// Scroll element to bottom
pub fn scroll_to_bottom(element: &Element) {
    if let Ok(html_element) = element.clone().dyn_into::<HtmlElement>() {
        html_element.set_scroll_top(html_element.scroll_height());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_failure_passes_success_through() {
        assert!(log_failure(Ok(()), "update nothing"));
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen_test::wasm_bindgen_test]
    fn test_log_failure_reports_error() {
        assert!(!log_failure(Err(JsValue::from_str("detached node")), "update node"));
    }
}
