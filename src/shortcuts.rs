//! Global keyboard shortcuts.
//!
//! A flat table of `(predicate, handler)` pairs consulted on every key
//! press. There are no modes or chords: each registered shortcut whose
//! predicate matches fires, in registration order, and any match prevents
//! the default action of the key press. A handler never stops later
//! shortcuts from seeing the same event.

use std::fmt;

use crate::signals::{FocusTarget, Signal, Signals};
use crate::store::UiStore;

/// A key press as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key value, e.g. `"b"`, `"Escape"`, `"Enter"`, `"/"`.
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
    /// Element focused when the key was pressed.
    pub target: FocusTarget,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, target: FocusTarget) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
            shift: false,
            alt: false,
            target,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn has_mod(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Case-insensitive key comparison (`Shift+m` reports `"M"`).
    pub fn is_key(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

type Predicate = Box<dyn Fn(&KeyEvent) -> bool + Send + Sync>;
type Handler = Box<dyn Fn(&KeyEvent) + Send + Sync>;

pub struct Shortcut {
    name: &'static str,
    predicate: Predicate,
    handler: Handler,
}

impl Shortcut {
    pub fn new(
        name: &'static str,
        predicate: impl Fn(&KeyEvent) -> bool + Send + Sync + 'static,
        handler: impl Fn(&KeyEvent) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            predicate: Box::new(predicate),
            handler: Box::new(handler),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        (self.predicate)(event)
    }
}

impl fmt::Debug for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shortcut").field("name", &self.name).finish()
    }
}

/// What dispatching one key press did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// At least one shortcut matched; the host should suppress the key's default action.
    pub default_prevented: bool,
    /// Names of the shortcuts that fired, in order.
    pub fired: Vec<&'static str>,
}

#[derive(Debug, Default)]
pub struct ShortcutTable {
    shortcuts: Vec<Shortcut>,
}

impl ShortcutTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, shortcut: Shortcut) -> &mut Self {
        self.shortcuts.push(shortcut);
        self
    }

    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    pub fn dispatch(&self, event: &KeyEvent) -> KeyOutcome {
        let mut outcome = KeyOutcome::default();
        for shortcut in &self.shortcuts {
            if shortcut.matches(event) {
                outcome.default_prevented = true;
                (shortcut.handler)(event);
                outcome.fired.push(shortcut.name);
            }
        }
        if !outcome.fired.is_empty() {
            tracing::trace!(key = %event.key, fired = ?outcome.fired, "shortcut");
        }
        outcome
    }

    /// The application's global shortcuts.
    pub fn standard(ui: UiStore, signals: Signals) -> Self {
        let mut table = Self::new();

        let escape_ui = ui.clone();
        let stop_ui = ui.clone();
        table.register(Shortcut::new(
            "stop-streaming",
            move |e| e.is_key("Escape") && escape_ui.is_streaming(),
            move |_| {
                stop_ui.stop_streaming();
            },
        ));

        let sidebar_ui = ui.clone();
        table.register(Shortcut::new(
            "toggle-sidebar",
            |e| e.has_mod() && !e.shift && !e.alt && e.is_key("b"),
            move |_| sidebar_ui.toggle_sidebar(),
        ));

        table.register(Shortcut::new(
            "toggle-metadata-panel",
            |e| e.has_mod() && e.shift && !e.alt && e.is_key("m"),
            move |_| ui.toggle_metadata_panel(),
        ));

        let search_signals = signals.clone();
        table.register(Shortcut::new(
            "focus-search",
            |e| e.has_mod() && !e.shift && !e.alt && e.is_key("k"),
            move |_| {
                search_signals.emit(Signal::Focus(FocusTarget::Search));
            },
        ));

        let composer_signals = signals.clone();
        table.register(Shortcut::new(
            "focus-composer",
            |e| e.key == "/" && !e.has_mod() && !e.alt && !e.target.is_text_field(),
            move |_| {
                composer_signals.emit(Signal::Focus(FocusTarget::Composer));
            },
        ));

        table.register(Shortcut::new(
            "submit-composer",
            |e| e.has_mod() && e.is_key("Enter") && e.target == FocusTarget::Composer,
            move |_| {
                signals.emit(Signal::SyntheticInput {
                    target: FocusTarget::Composer,
                    data: "submit".to_string(),
                });
            },
        ));

        table
    }
}
