//! Suggestion dropdown state shared with the debounce task

use crate::location::SuggestionRecord;

/// The dropdown plus the generation counter that guards it
///
/// Every keystroke bumps `generation`; a fetch result is applied only if it
/// was started for the current generation.
#[derive(Debug, Default)]
pub(crate) struct Dropdown {
    pub(crate) generation: u64,
    pub(crate) items: Vec<SuggestionRecord>,
    pub(crate) visible: bool,
    pub(crate) highlighted: Option<usize>,
}

impl Dropdown {
    /// Start a new generation, invalidating in-flight results
    pub(crate) fn bump(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Apply fetch results; false if they are stale
    pub(crate) fn apply(&mut self, generation: u64, items: Vec<SuggestionRecord>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.visible = !items.is_empty();
        self.items = items;
        self.highlighted = None;
        true
    }

    /// Close the dropdown; returns whether it was open
    pub(crate) fn hide(&mut self, clear: bool) -> bool {
        let was_visible = self.visible;
        self.visible = false;
        self.highlighted = None;
        if clear {
            self.items.clear();
        }
        was_visible
    }

    pub(crate) fn highlight_next(&mut self) {
        if !self.visible || self.items.is_empty() {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i + 1 < self.items.len() => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub(crate) fn highlight_prev(&mut self) {
        if !self.visible {
            return;
        }
        self.highlighted = match self.highlighted {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }

    /// The highlighted record, if the dropdown is open
    pub(crate) fn highlighted_record(&self) -> Option<&SuggestionRecord> {
        if !self.visible {
            return None;
        }
        self.highlighted.and_then(|i| self.items.get(i))
    }
}
