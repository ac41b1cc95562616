use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent};

use esomchat_core::{ChatSession, ChatTransport, ChatView};
use esomchat_types::{display_term, Message, ReplyExtras, Role, WidgetConfig};

use crate::dom;
use crate::markup;
use crate::storage::LocalStorageStore;
use crate::styles::{self, STYLE_ELEMENT_ID};
use crate::transport::FetchTransport;
use crate::utils;

const CONTAINER_ID: &str = "esom-chatbot-container";
const TYPING_ID: &str = "esom-chat-typing";
const INPUT_FOCUS_DELAY_MS: u32 = 300;

const CHAT_ICON: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M20 2H4C2.9 2 2 2.9 2 4V22L6 18H20C21.1 18 22 17.1 22 16V4C22 2.9 21.1 2 20 2Z" fill="white"/></svg>"#;
const SEND_ICON: &str = r#"<svg width="18" height="18" viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M2.01 21L23 12L2.01 3L2 10L17 12L2 14L2.01 21Z" fill="white"/></svg>"#;

type WidgetSession = ChatSession<LocalStorageStore, DomChatView>;

/// Elements of the mounted widget that listeners need
struct Parts {
    launcher: Element,
    close: Element,
    send: Element,
    input: HtmlInputElement,
}

/// Renders the session into the widget's message list
pub struct DomChatView {
    document: Document,
    window: Element,
    messages: Element,
    input: HtmlInputElement,
    bot_name: String,
    bot_initial: String,
    bot_avatar_url: Option<String>,
    user_avatar_url: Option<String>,
}

impl DomChatView {
    fn avatar(&self, role: Role) -> Result<Element, JsValue> {
        let avatar = dom::create_element_with_class(&self.document, "div", "esom-chat-message-avatar")?;
        let (url, alt, fallback) = match role {
            Role::Bot => (self.bot_avatar_url.as_deref(), self.bot_name.as_str(), self.bot_initial.as_str()),
            Role::User => (self.user_avatar_url.as_deref(), "User", "👤"),
        };

        match url {
            Some(url) => {
                let img = self.document.create_element("img")?;
                img.set_attribute("src", url)?;
                img.set_attribute("alt", alt)?;
                avatar.append_child(&img)?;
            }
            None => avatar.set_text_content(Some(fallback)),
        }
        Ok(avatar)
    }

    fn bot_content(&self, text: &str, extras: Option<&ReplyExtras>) -> Result<Element, JsValue> {
        let content = dom::create_element_with_class(&self.document, "div", "esom-chat-message-content")?;

        let body = self.document.create_element("div")?;
        body.set_inner_html(&markup::render_bot_text(text));
        content.append_child(&body)?;

        let Some(extras) = extras else {
            return Ok(content);
        };

        if !extras.glossary_terms.is_empty() {
            let glossary = dom::create_element_with_class(&self.document, "div", "esom-chat-glossary")?;
            for (term, definition) in &extras.glossary_terms {
                let term_el =
                    dom::create_text_element(&self.document, "div", "esom-chat-glossary-term", &display_term(term))?;
                let definition_el = self.document.create_element("div")?;
                definition_el.set_text_content(Some(definition));
                glossary.append_child(&term_el)?;
                glossary.append_child(&definition_el)?;
            }
            content.append_child(&glossary)?;
        }

        if !extras.market_data.is_empty() {
            let market = dom::create_element_with_class(&self.document, "div", "esom-chat-market-data")?;
            let list = self.document.create_element("div")?;
            for (key, value) in &extras.market_data {
                let item = self.document.create_element("div")?;
                item.set_inner_html(&format!(
                    "<strong>{}:</strong> {}",
                    utils::escape_html(key),
                    utils::escape_html(value)
                ));
                list.append_child(&item)?;
            }
            market.append_child(&list)?;
            content.append_child(&market)?;
        }

        if let Some(line) = extras.sources_line() {
            let sources = dom::create_text_element(&self.document, "div", "esom-chat-sources", &line)?;
            content.append_child(&sources)?;
        }

        Ok(content)
    }

    fn try_render(&self, message: &Message, extras: Option<&ReplyExtras>) -> Result<(), JsValue> {
        let class = format!("esom-chat-message {}", message.role);
        let bubble = dom::create_element_with_class(&self.document, "div", &class)?;

        let content = match message.role {
            Role::User => dom::create_text_element(
                &self.document,
                "div",
                "esom-chat-message-content",
                &message.content,
            )?,
            Role::Bot => self.bot_content(&message.content, extras)?,
        };

        let avatar: Element = self.avatar(message.role)?;
        bubble.append_child(&avatar)?;
        bubble.append_child(&content)?;
        self.messages.append_child(&bubble)?;
        dom::scroll_to_bottom(&self.messages);
        Ok(())
    }

    fn try_show_typing(&self) -> Result<(), JsValue> {
        let typing = dom::create_element_with_class(&self.document, "div", "esom-chat-typing")?;
        typing.set_id(TYPING_ID);
        for _ in 0..3 {
            let dot = dom::create_element_with_class(&self.document, "div", "esom-chat-typing-dot")?;
            typing.append_child(&dot)?;
        }
        self.messages.append_child(&typing)?;
        dom::scroll_to_bottom(&self.messages);
        Ok(())
    }
}

impl ChatView for DomChatView {
    fn set_open(&mut self, open: bool) {
        let classes = self.window.class_list();
        let result = if open {
            classes.add_1("open")
        } else {
            classes.remove_1("open")
        };
        if let Err(e) = result {
            log::error!("Failed to toggle chat window: {:?}", e);
        }

        if open {
            let input = self.input.clone();
            Timeout::new(INPUT_FOCUS_DELAY_MS, move || {
                dom::log_failure(input.focus(), "focus chat input");
            })
            .forget();
        }
    }

    fn render_message(&mut self, message: &Message, extras: Option<&ReplyExtras>) {
        if let Err(e) = self.try_render(message, extras) {
            log::error!("Failed to render {} message: {:?}", message.role, e);
        }
    }

    fn show_typing(&mut self) {
        if let Err(e) = self.try_show_typing() {
            log::error!("Failed to show typing indicator: {:?}", e);
        }
    }

    fn hide_typing(&mut self) {
        if let Some(typing) = self.document.get_element_by_id(TYPING_ID) {
            typing.remove();
        }
    }

    fn clear(&mut self) {
        self.messages.set_inner_html("");
    }
}

/// The floating chat widget mounted into the page body
pub struct ChatWidget;

impl ChatWidget {
    /// Build the widget, restore the stored conversation and wire the
    /// listeners. Mounting a second time is a no-op.
    pub fn mount(config: WidgetConfig) -> Result<(), JsValue> {
        let document = crate::document()?;
        if document.get_element_by_id(CONTAINER_ID).is_some() {
            log::warn!("Chat widget already mounted");
            return Ok(());
        }

        inject_styles(&document, &config)?;
        let (view, parts) = build(&document, &config)?;

        let transport = Rc::new(FetchTransport::from_config(&config));
        let store = LocalStorageStore::new(config.storage_key.clone());
        let session = Rc::new(RefCell::new(ChatSession::new(config, store, view)));

        attach_listeners(&session, &transport, parts)?;
        log::info!("Chat widget mounted");
        Ok(())
    }
}

fn inject_styles(document: &Document, config: &WidgetConfig) -> Result<(), JsValue> {
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return Ok(());
    }
    let style = document.create_element("style")?;
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(&styles::stylesheet(config)));
    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("No head element"))?;
    head.append_child(&style)?;
    Ok(())
}

fn build(document: &Document, config: &WidgetConfig) -> Result<(DomChatView, Parts), JsValue> {
    let container = dom::create_element_with_class(document, "div", "esom-chatbot-container")?;
    container.set_id(CONTAINER_ID);

    let launcher = dom::create_element_with_class(document, "div", "esom-chat-button")?;
    let icon = dom::create_element_with_class(document, "div", "esom-chat-button-icon")?;
    icon.set_inner_html(CHAT_ICON);
    launcher.append_child(&icon)?;
    container.append_child(&launcher)?;

    let window = dom::create_element_with_class(document, "div", "esom-chat-window")?;

    let header = dom::create_element_with_class(document, "div", "esom-chat-header")?;
    let logo = dom::create_element_with_class(document, "div", "esom-chat-header-logo")?;
    match &config.bot_avatar_url {
        Some(url) => {
            let img = document.create_element("img")?;
            img.set_attribute("src", url)?;
            img.set_attribute("alt", &config.bot_name)?;
            logo.append_child(&img)?;
        }
        None => {
            let initial =
                dom::create_text_element(document, "div", "esom-chat-default-avatar", &config.bot_initial())?;
            logo.append_child(&initial)?;
        }
    }
    let title = dom::create_text_element(document, "div", "esom-chat-header-title", &config.bot_name)?;
    let close = dom::create_text_element(document, "div", "esom-chat-header-close", "×")?;
    header.append_child(&logo)?;
    header.append_child(&title)?;
    header.append_child(&close)?;
    window.append_child(&header)?;

    let messages = dom::create_element_with_class(document, "div", "esom-chat-messages")?;
    window.append_child(&messages)?;

    let input_area = dom::create_element_with_class(document, "div", "esom-chat-input-area")?;
    let input = dom::create_element_with_class(document, "input", "esom-chat-input")?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str("Element is not HtmlInputElement"))?;
    input.set_type("text");
    input.set_placeholder(&config.placeholder_text);
    let send = dom::create_element_with_class(document, "button", "esom-chat-send-button")?;
    send.set_inner_html(SEND_ICON);
    input_area.append_child(&input)?;
    input_area.append_child(&send)?;
    window.append_child(&input_area)?;

    container.append_child(&window)?;
    document
        .body()
        .ok_or_else(|| JsValue::from_str("No body element"))?
        .append_child(&container)?;

    let view = DomChatView {
        document: document.clone(),
        window,
        messages,
        input: input.clone(),
        bot_name: config.bot_name.clone(),
        bot_initial: config.bot_initial(),
        bot_avatar_url: config.bot_avatar_url.clone(),
        user_avatar_url: config.user_avatar_url.clone(),
    };
    let parts = Parts {
        launcher,
        close,
        send,
        input,
    };
    Ok((view, parts))
}

fn attach_listeners(
    session: &Rc<RefCell<WidgetSession>>,
    transport: &Rc<FetchTransport>,
    parts: Parts,
) -> Result<(), JsValue> {
    let session_clone = session.clone();
    dom::add_click_listener(&parts.launcher, move || {
        session_clone.borrow_mut().toggle();
    })?;

    let session_clone = session.clone();
    dom::add_click_listener(&parts.close, move || {
        session_clone.borrow_mut().close();
    })?;

    let session_clone = session.clone();
    let transport_clone = transport.clone();
    let input_clone = parts.input.clone();
    dom::add_click_listener(&parts.send, move || {
        submit(&session_clone, &transport_clone, &input_clone);
    })?;

    // Enter key handler
    let session_clone = session.clone();
    let transport_clone = transport.clone();
    let input_clone = parts.input.clone();
    let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        if event.key() == "Enter" && !event.is_composing() {
            event.prevent_default();
            submit(&session_clone, &transport_clone, &input_clone);
        }
    }) as Box<dyn FnMut(_)>);
    parts
        .input
        .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();

    Ok(())
}

/// Hand the input text to the session and complete the exchange in the
/// background. The session is never borrowed across the await.
fn submit(session: &Rc<RefCell<WidgetSession>>, transport: &Rc<FetchTransport>, input: &HtmlInputElement) {
    let pending = session.borrow_mut().begin_send(&input.value());
    let Some(pending) = pending else {
        return;
    };
    input.set_value("");

    let session = session.clone();
    let transport = transport.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = transport.exchange(pending.request()).await;
        session.borrow_mut().finish_send(pending, outcome);
    });
}
