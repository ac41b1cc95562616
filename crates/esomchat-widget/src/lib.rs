use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

mod carousel;
mod dom;
mod markup;
mod page;
mod storage;
mod styles;
mod transport;
mod typewriter;
mod utils;
mod widget;

pub use carousel::{visible_cards_for_width, CarouselTrack};
pub use markup::render_bot_text;
pub use page::{
    is_plausible_email, scroll_button_visible, sidebar_layer_z_index, subscribe_label, ticker_text,
};
pub use storage::LocalStorageStore;
pub use styles::stylesheet;
pub use transport::FetchTransport;
pub use typewriter::Typewriter;
pub use widget::{ChatWidget, DomChatView};

/// Initialize the WASM module
/// This sets up panic hooks and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    wasm_logger::init(wasm_logger::Config::default());

    log::info!("ESOM chat WASM initialized");
}

/// Mount the floating chat widget. `options` is a plain JS object with any
/// subset of the widget settings; missing keys take their defaults.
#[wasm_bindgen]
pub fn init_chat_widget(options: JsValue) -> Result<(), JsValue> {
    let config = utils::config_from_js(&options)?;
    log::info!("Mounting chat widget for {}", config.api_url);
    widget::ChatWidget::mount(config)
}

/// Wire the events page: looping card carousel and the event modal
#[wasm_bindgen]
pub fn init_events_page() -> Result<(), JsValue> {
    carousel::mount()?;
    carousel::mount_event_modal()
}

/// Wire the research page card grid
#[wasm_bindgen]
pub fn init_research_page() -> Result<(), JsValue> {
    page::mount_research_cards()
}

/// Wire the home page: sidebar, scroll button, subscribe form, ticker and
/// the typewriter heading
#[wasm_bindgen]
pub fn init_home_page() -> Result<(), JsValue> {
    page::mount_home()?;
    typewriter::mount()
}

/// Wire only the sidebar toggle, for pages without the home page extras
#[wasm_bindgen]
pub fn init_sidebar() -> Result<(), JsValue> {
    page::mount_sidebar(false)
}

/// Get the window object
fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))
}

/// Get the document object
fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))
}
