use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlInputElement, ScrollBehavior, ScrollToOptions};

use crate::dom;
use crate::utils;

/// Distance the scroll button moves the page down
pub const SCROLL_AMOUNT_PX: f64 = 810.0;
/// Viewport width below which the subscribe button shows only the arrow
pub const COMPACT_SUBSCRIBE_WIDTH: f64 = 1000.0;
pub const RECRUITING_BANNER: &str = "   !!!   ESOM IS NOW RECRUITING   !!!   ";

const HIDDEN_CLASS: &str = "hidden";
const DONT_SHOW_CLASS: &str = "dontshow";

/// Elements pushed behind the open sidebar, with their resting z-index
const SIDEBAR_LAYERS: [(&str, &str); 3] = [
    (".scroll-button", "15"),
    (".scroll-container", "10"),
    (".hero-text", "10"),
];

/// Subscribe address check: anything containing `@`
pub fn is_plausible_email(input: &str) -> bool {
    input.contains('@')
}

pub fn subscribe_label(viewport_width: f64) -> &'static str {
    if viewport_width < COMPACT_SUBSCRIBE_WIDTH {
        "\u{2192}"
    } else {
        "Subscribe \u{2192}"
    }
}

/// The scroll button only shows while the page is at the very top
pub fn scroll_button_visible(scroll_y: f64) -> bool {
    scroll_y == 0.0
}

/// z-index for each sidebar layer selector
pub fn sidebar_layer_z_index(sidebar_open: bool) -> Vec<(&'static str, &'static str)> {
    SIDEBAR_LAYERS
        .iter()
        .map(|&(selector, resting)| (selector, if sidebar_open { "-1" } else { resting }))
        .collect()
}

pub fn ticker_text() -> String {
    RECRUITING_BANNER.repeat(2)
}

/// Wire every home page behaviour
pub fn mount_home() -> Result<(), JsValue> {
    mount_sidebar(true)?;
    let document = crate::document()?;
    mount_subscribe(&document)?;
    mount_scroll_button(&document)?;
    mount_ticker(&document)?;
    log::info!("Home page mounted");
    Ok(())
}

/// `#toggleSidebar` opens `#sidebar`, `#closeSidebar` closes it. With
/// `layered`, the hero layers are pushed behind the open sidebar.
pub fn mount_sidebar(layered: bool) -> Result<(), JsValue> {
    let document = crate::document()?;
    let toggle = dom::get_element_by_id(&document, "toggleSidebar")?;
    let close = dom::get_element_by_id(&document, "closeSidebar")?;
    let sidebar = dom::get_element_by_id(&document, "sidebar")?;

    let doc = document.clone();
    let sidebar_clone = sidebar.clone();
    dom::add_click_listener(&toggle, move || {
        dom::log_failure(sidebar_clone.class_list().add_1("sidebar-open"), "open sidebar");
        if layered {
            set_sidebar_layers(&doc, true);
        }
    })?;

    dom::add_click_listener(&close, move || {
        dom::log_failure(sidebar.class_list().remove_1("sidebar-open"), "close sidebar");
        if layered {
            set_sidebar_layers(&document, false);
        }
    })?;
    Ok(())
}

fn set_sidebar_layers(document: &Document, sidebar_open: bool) {
    for (selector, z_index) in sidebar_layer_z_index(sidebar_open) {
        let result = dom::query_html(document, selector).and_then(|el| dom::set_style(&el, "z-index", z_index));
        if let Err(e) = result {
            log::warn!("Could not restack {}: {:?}", selector, e);
        }
    }
}

fn mount_subscribe(document: &Document) -> Result<(), JsValue> {
    let success = dom::get_element_by_id(document, "subscribe-success")?;
    let failure = dom::get_element_by_id(document, "subscribe-fail")?;
    success.class_list().add_1(DONT_SHOW_CLASS)?;
    failure.class_list().add_1(DONT_SHOW_CLASS)?;

    let input = dom::query_html(document, ".inputbox")?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str("Element is not HtmlInputElement: .inputbox"))?;
    let button = dom::get_html_element_by_id(document, "subB")?;
    button.set_inner_text(subscribe_label(utils::viewport_width()?));

    dom::add_click_listener(&button, move || {
        let (show, hide) = if is_plausible_email(&input.value()) {
            (&success, &failure)
        } else {
            (&failure, &success)
        };
        let result = hide
            .class_list()
            .add_1(DONT_SHOW_CLASS)
            .and_then(|_| show.class_list().remove_1(DONT_SHOW_CLASS));
        dom::log_failure(result, "show subscribe result");
        input.set_value("");
    })
}

fn mount_scroll_button(document: &Document) -> Result<(), JsValue> {
    let button = dom::get_html_element_by_id(document, "scrollButton")?;
    let window = crate::window()?;

    let button_clone = button.clone();
    let window_clone = window.clone();
    dom::add_click_listener(&button, move || {
        let options = ScrollToOptions::new();
        options.set_top(SCROLL_AMOUNT_PX);
        options.set_left(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        window_clone.scroll_by_with_scroll_to_options(&options);
        dom::log_failure(button_clone.class_list().add_1(HIDDEN_CLASS), "hide scroll button");
    })?;

    let update = move |button: &HtmlElement| {
        let at_top = crate::window()
            .and_then(|w| w.scroll_y())
            .map(scroll_button_visible)
            .unwrap_or(false);
        let classes = button.class_list();
        let result = if at_top {
            classes.remove_1(HIDDEN_CLASS)
        } else {
            classes.add_1(HIDDEN_CLASS)
        };
        dom::log_failure(result, "update scroll button");
    };

    update(&button);
    dom::add_listener(&window, "scroll", move || update(&button))
}

fn mount_ticker(document: &Document) -> Result<(), JsValue> {
    let text = ticker_text();
    for span in dom::query_all(document, ".scroll-text span")? {
        span.set_text_content(Some(&text));
    }
    Ok(())
}

/// Research grid: hovering a `.grid-card` reveals its `.hover-circle`,
/// clicking opens the paper page
pub fn mount_research_cards() -> Result<(), JsValue> {
    let document = crate::document()?;
    for card in dom::query_all(&document, ".grid-card")? {
        let Some(circle) = card.query_selector(".hover-circle")? else {
            continue;
        };

        let circle_clone = circle.clone();
        dom::add_listener(&card, "mouseover", move || {
            dom::log_failure(circle_clone.class_list().add_1("visible"), "show research card circle");
        })?;
        dom::add_listener(&card, "mouseout", move || {
            dom::log_failure(circle.class_list().remove_1("visible"), "hide research card circle");
        })?;
        dom::add_click_listener(&card, || {
            let result = crate::window().and_then(|window| window.location().set_href("./specific-paper.html"));
            dom::log_failure(result, "open paper page");
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_email_check() {
        assert!(is_plausible_email("reader@esom.example"));
        assert!(is_plausible_email("@"));
        assert!(!is_plausible_email("reader.esom.example"));
        assert!(!is_plausible_email(""));
    }

    #[test]
    fn test_subscribe_label() {
        assert_eq!(subscribe_label(999.0), "→");
        assert_eq!(subscribe_label(1000.0), "Subscribe →");
    }

    #[test]
    fn test_scroll_button_visible_only_at_top() {
        assert!(scroll_button_visible(0.0));
        assert!(!scroll_button_visible(1.0));
        assert!(!scroll_button_visible(810.0));
    }

    #[test]
    fn test_sidebar_layers() {
        assert_eq!(
            sidebar_layer_z_index(true),
            vec![(".scroll-button", "-1"), (".scroll-container", "-1"), (".hero-text", "-1")]
        );
        assert_eq!(
            sidebar_layer_z_index(false),
            vec![(".scroll-button", "15"), (".scroll-container", "10"), (".hero-text", "10")]
        );
    }

    #[test]
    fn test_ticker_repeats_banner() {
        let text = ticker_text();
        assert_eq!(text.matches("ESOM IS NOW RECRUITING").count(), 2);
        assert_eq!(text.len(), RECRUITING_BANNER.len() * 2);
    }
}
