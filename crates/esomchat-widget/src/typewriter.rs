use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsValue;

use crate::dom;

pub const TYPEWRITER_WORD: &str = "ESOM";
pub const KEYSTROKE_MS: u32 = 100;
pub const HOLD_TYPED_MS: u32 = 2000;
pub const HOLD_ERASED_MS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Typing,
    Erasing,
}

/// Types a word one character at a time, holds it, erases it, holds the
/// empty line and starts over.
#[derive(Debug, Clone)]
pub struct Typewriter {
    word: Vec<char>,
    shown: usize,
    phase: Phase,
}

impl Typewriter {
    pub fn new(word: &str) -> Self {
        Self {
            word: word.chars().collect(),
            shown: 0,
            phase: Phase::Typing,
        }
    }

    /// Advance one step. Returns the text to display and how long to wait
    /// before the next step.
    pub fn step(&mut self) -> (String, u32) {
        let delay = match self.phase {
            Phase::Typing if self.shown < self.word.len() => {
                self.shown += 1;
                KEYSTROKE_MS
            }
            Phase::Typing => {
                self.phase = Phase::Erasing;
                HOLD_TYPED_MS
            }
            Phase::Erasing if self.shown > 0 => {
                self.shown -= 1;
                KEYSTROKE_MS
            }
            Phase::Erasing => {
                self.phase = Phase::Typing;
                HOLD_ERASED_MS
            }
        };
        (self.visible(), delay)
    }

    pub fn visible(&self) -> String {
        self.word[..self.shown].iter().collect()
    }
}

/// Animate `#typewriter-text` forever
pub fn mount() -> Result<(), JsValue> {
    let document = crate::document()?;
    let target = dom::get_element_by_id(&document, "typewriter-text")?;
    target.set_text_content(Some(""));

    wasm_bindgen_futures::spawn_local(async move {
        let mut typewriter = Typewriter::new(TYPEWRITER_WORD);
        loop {
            let (text, delay) = typewriter.step();
            target.set_text_content(Some(&text));
            TimeoutFuture::new(delay).await;
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_cycle() {
        let mut typewriter = Typewriter::new("ESOM");
        let steps: Vec<(String, u32)> = (0..11).map(|_| typewriter.step()).collect();
        let expected: Vec<(String, u32)> = [
            ("E", 100),
            ("ES", 100),
            ("ESO", 100),
            ("ESOM", 100),
            ("ESOM", 2000),
            ("ESO", 100),
            ("ES", 100),
            ("E", 100),
            ("", 100),
            ("", 1000),
            ("E", 100),
        ]
        .iter()
        .map(|(text, delay)| (text.to_string(), *delay))
        .collect();
        assert_eq!(steps, expected);
    }

    #[test]
    fn test_empty_word_only_holds() {
        let mut typewriter = Typewriter::new("");
        assert_eq!(typewriter.step(), (String::new(), HOLD_TYPED_MS));
        assert_eq!(typewriter.step(), (String::new(), HOLD_ERASED_MS));
    }
}
