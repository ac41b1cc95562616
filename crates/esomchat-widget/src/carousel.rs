use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement};

use crate::dom;
use crate::utils;

/// Cloned cards on each side of the real ones
pub const CLONES_PER_SIDE: usize = 3;
/// Horizontal gap between cards, in pixels
pub const CARD_GAP_PX: f64 = 14.0;
/// Duration of the slide animation
pub const TRANSITION_MS: u32 = 300;

const SLIDE_TRANSITION: &str = "transform 0.3s ease-in-out";

/// Number of cards shown side by side at a viewport width
pub fn visible_cards_for_width(width: f64) -> usize {
    if width < 767.0 {
        1
    } else if width < 1400.0 {
        2
    } else {
        3
    }
}

/// Position of a looping carousel over real cards padded with clones.
///
/// Indices count from the first leading clone. Stepping onto the clones at
/// either end is undone by [`CarouselTrack::adjust_for_loop`], which jumps
/// back into the real cards once the slide animation has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselTrack {
    total: usize,
    visible: usize,
    index: usize,
}

impl CarouselTrack {
    pub fn new(real_cards: usize) -> Self {
        let clones = real_cards.min(CLONES_PER_SIDE);
        Self {
            total: real_cards + 2 * clones,
            visible: CLONES_PER_SIDE,
            index: clones,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Recompute the visible count and realign on the first real card
    pub fn resize(&mut self, viewport_width: f64) {
        self.visible = visible_cards_for_width(viewport_width);
        self.index = self.visible;
    }

    pub fn next(&mut self) {
        if self.index + self.visible < self.total {
            self.index += 1;
        }
    }

    pub fn prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Jump from a clone back onto the matching real card. Returns whether
    /// the index changed.
    pub fn adjust_for_loop(&mut self) -> bool {
        if self.index == 0 {
            self.index = self.total.saturating_sub(2 * self.visible);
            true
        } else if self.index + self.visible == self.total {
            self.index = self.visible;
            true
        } else {
            false
        }
    }

    /// Track translation for the current index
    pub fn offset_px(&self, card_width: f64) -> f64 {
        self.index as f64 * (card_width + CARD_GAP_PX)
    }
}

struct Carousel {
    track: HtmlElement,
    first_card: HtmlElement,
    state: RefCell<CarouselTrack>,
}

impl Carousel {
    fn apply(&self, animate: bool) {
        let offset = self.state.borrow().offset_px(f64::from(self.first_card.offset_width()));
        let transition = if animate { SLIDE_TRANSITION } else { "none" };
        let result = dom::set_style(&self.track, "transition", transition).and_then(|_| {
            dom::set_style(&self.track, "transform", &format!("translateX(-{}px)", offset))
        });
        if let Err(e) = result {
            log::error!("Failed to move carousel: {:?}", e);
        }
    }

    fn realign(&self) {
        match utils::viewport_width() {
            Ok(width) => self.state.borrow_mut().resize(width),
            Err(e) => log::warn!("Could not read viewport width: {:?}", e),
        }
        self.apply(false);
    }

    fn slide(self: &Rc<Self>, forward: bool) {
        {
            let mut state = self.state.borrow_mut();
            if forward {
                state.next();
            } else {
                state.prev();
            }
        }
        self.apply(true);

        let carousel = self.clone();
        Timeout::new(TRANSITION_MS, move || {
            if carousel.state.borrow_mut().adjust_for_loop() {
                carousel.apply(false);
            }
        })
        .forget();
    }
}

/// Pad `.carousel-track` with clones and wire the `#larrow`/`#rarrow` arrows
pub fn mount() -> Result<(), JsValue> {
    let document = crate::document()?;
    let track = dom::query_html(&document, ".carousel-track")?;
    let real_cards = dom::query_all(&document, ".card")?;
    if real_cards.is_empty() {
        log::warn!("Carousel has no cards");
        return Ok(());
    }

    let clones = real_cards.len().min(CLONES_PER_SIDE);
    for card in real_cards[real_cards.len() - clones..].iter().rev() {
        track.prepend_with_node_1(&card.clone_node_with_deep(true)?)?;
    }
    for card in &real_cards[..clones] {
        track.append_with_node_1(&card.clone_node_with_deep(true)?)?;
    }

    let first_card = dom::query_html(&document, ".card")?;
    let carousel = Rc::new(Carousel {
        track,
        first_card,
        state: RefCell::new(CarouselTrack::new(real_cards.len())),
    });

    let right: Element = dom::get_element_by_id(&document, "rarrow")?;
    let carousel_clone = carousel.clone();
    dom::add_click_listener(&right, move || carousel_clone.slide(true))?;

    let left = dom::get_element_by_id(&document, "larrow")?;
    let carousel_clone = carousel.clone();
    dom::add_click_listener(&left, move || carousel_clone.slide(false))?;

    let window = crate::window()?;
    let carousel_clone = carousel.clone();
    dom::add_listener(&window, "resize", move || carousel_clone.realign())?;

    // Card widths settle once images have loaded
    let carousel_clone = carousel.clone();
    dom::add_listener(&window, "load", move || {
        carousel_clone.realign();
        let carousel = carousel_clone.clone();
        Timeout::new(100, move || carousel.apply(false)).forget();
    })?;

    carousel.realign();
    log::info!("Carousel mounted with {} cards", real_cards.len());
    Ok(())
}

/// Open `#modal` from any `#triggerDiv`, close it from `.close` or a click on
/// the backdrop
pub fn mount_event_modal() -> Result<(), JsValue> {
    let document = crate::document()?;
    let modal = dom::get_html_element_by_id(&document, "modal")?;

    for trigger in dom::query_all(&document, "#triggerDiv")? {
        let modal = modal.clone();
        dom::add_click_listener(&trigger, move || {
            dom::log_failure(dom::set_style(&modal, "display", "block"), "open event modal");
        })?;
    }

    let close = dom::query_html(&document, ".close")?;
    let modal_clone = modal.clone();
    dom::add_click_listener(&close, move || {
        dom::log_failure(dom::set_style(&modal_clone, "display", "none"), "close event modal");
    })?;

    let window = crate::window()?;
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |event: web_sys::Event| {
        let on_backdrop = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .map_or(false, |target| target.is_same_node(Some(modal.as_ref())));
        if on_backdrop {
            dom::log_failure(dom::set_style(&modal, "display", "none"), "close event modal");
        }
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_visible_cards_breakpoints() {
        assert_eq!(visible_cards_for_width(320.0), 1);
        assert_eq!(visible_cards_for_width(766.9), 1);
        assert_eq!(visible_cards_for_width(767.0), 2);
        assert_eq!(visible_cards_for_width(1399.0), 2);
        assert_eq!(visible_cards_for_width(1400.0), 3);
    }

    #[test]
    fn test_new_track_starts_on_first_real_card() {
        let track = CarouselTrack::new(6);
        assert_eq!(track.total(), 12);
        assert_eq!(track.index(), 3);
    }

    #[test]
    fn test_resize_realigns() {
        let mut track = CarouselTrack::new(6);
        track.next();
        track.resize(500.0);
        assert_eq!(track.visible(), 1);
        assert_eq!(track.index(), 1);
    }

    #[test]
    fn test_wraps_past_the_end() {
        let mut track = CarouselTrack::new(6);
        track.resize(1600.0);
        for _ in 0..6 {
            track.next();
        }
        assert_eq!(track.index(), 9);
        assert!(track.adjust_for_loop());
        assert_eq!(track.index(), 3);
    }

    #[test]
    fn test_wraps_before_the_start() {
        let mut track = CarouselTrack::new(6);
        track.resize(1000.0);
        assert_eq!(track.index(), 2);
        track.prev();
        track.prev();
        assert_eq!(track.index(), 0);
        assert!(track.adjust_for_loop());
        assert_eq!(track.index(), 8);
    }

    #[test]
    fn test_no_adjust_in_the_middle() {
        let mut track = CarouselTrack::new(6);
        track.resize(1600.0);
        track.next();
        assert!(!track.adjust_for_loop());
        assert_eq!(track.index(), 4);
    }

    #[test]
    fn test_next_stops_at_last_clone_window() {
        let mut track = CarouselTrack::new(6);
        track.resize(1600.0);
        for _ in 0..20 {
            track.next();
        }
        assert_eq!(track.index(), 9);
    }

    #[test]
    fn test_offset_includes_gap() {
        let mut track = CarouselTrack::new(6);
        track.resize(1600.0);
        assert_eq!(track.offset_px(300.0), 3.0 * 314.0);
    }
}
