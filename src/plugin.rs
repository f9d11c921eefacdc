// WHY: event handlers and commands wired to one explicit state object instead of globals
// Each handler takes a fresh settings snapshot so reloads are picked up between passes

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::detector::{detect, DetectorError};
use crate::highlight;
use crate::host::{DisplayLayer, View, Window};
use crate::rewriter::{rewrite_buffer, Mode, RewriteSummary};
use crate::settings::SettingsStore;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("invalid arguments for {command}: {source}")]
    Arguments {
        command: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Detector(#[from] DetectorError),
}

/// Commands exposed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Flip automatic highlighting
    ToggleHighlight,
    /// Replace or escape every problem character in the active view
    RewriteTypography { mode: Mode },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RewriteArgs {
    mode: Mode,
}

impl Command {
    pub const TOGGLE_HIGHLIGHT: &'static str = "toggle-highlight";
    pub const REWRITE_TYPOGRAPHY: &'static str = "rewrite-typography";

    /// Resolve a host command invocation, `args` being its JSON argument object
    pub fn from_invocation(name: &str, args: Option<&serde_json::Value>) -> Result<Self, CommandError> {
        match name {
            Self::TOGGLE_HIGHLIGHT => Ok(Command::ToggleHighlight),
            Self::REWRITE_TYPOGRAPHY => {
                let args = match args {
                    Some(value) => RewriteArgs::deserialize(value).map_err(|source| {
                        CommandError::Arguments {
                            command: name.to_string(),
                            source,
                        }
                    })?,
                    None => RewriteArgs::default(),
                };
                Ok(Command::RewriteTypography { mode: args.mode })
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Plugin state: the enabled flag and the settings store
#[derive(Debug)]
pub struct Typographer {
    settings: SettingsStore,
    enabled: bool,
}

impl Typographer {
    /// Initial enabled state comes from the loaded settings
    pub fn new(settings: SettingsStore) -> Self {
        let enabled = settings.snapshot().enabled;
        info!("Typographer initialized, highlighting {}", if enabled { "on" } else { "off" });
        Self { settings, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn on_modified<D: DisplayLayer + ?Sized>(&self, view: &dyn View, display: &mut D) -> Result<(), DetectorError> {
        self.on_event("modified", view, display)
    }

    pub fn on_activated<D: DisplayLayer + ?Sized>(&self, view: &dyn View, display: &mut D) -> Result<(), DetectorError> {
        self.on_event("activated", view, display)
    }

    pub fn on_load<D: DisplayLayer + ?Sized>(&self, view: &dyn View, display: &mut D) -> Result<(), DetectorError> {
        self.on_event("load", view, display)
    }

    fn on_event<D: DisplayLayer + ?Sized>(
        &self,
        event: &str,
        view: &dyn View,
        display: &mut D,
    ) -> Result<(), DetectorError> {
        if !self.enabled {
            debug!("Ignoring {} event on {}, highlighting disabled", event, view.id());
            return Ok(());
        }
        self.highlight_view(view, display)?;
        Ok(())
    }

    /// One highlight pass over `view` if it is eligible; returns whether it was scanned
    pub fn highlight_view<D: DisplayLayer + ?Sized>(&self, view: &dyn View, display: &mut D) -> Result<bool, DetectorError> {
        let settings = self.settings.snapshot();
        if !settings.eligibility().is_eligible(&view.facts()) {
            debug!("Skipping ineligible {}", view.id());
            return Ok(false);
        }

        let spans = detect(&view.text(), &settings.replacement_table)?;
        highlight::highlight(display, view.id(), &spans, &settings.highlight_style);
        Ok(true)
    }

    /// Flip the enabled flag; highlights the active view on enable, clears every view on disable
    pub fn toggle<W: Window + ?Sized, D: DisplayLayer + ?Sized>(
        &mut self,
        window: &W,
        display: &mut D,
    ) -> Result<bool, DetectorError> {
        self.enabled = !self.enabled;
        info!("Highlighting toggled {}", if self.enabled { "on" } else { "off" });

        if self.enabled {
            if let Some(view) = window.active_view() {
                self.highlight_view(view, display)?;
            }
        } else {
            for view in window.views() {
                highlight::clear(display, view.id());
            }
        }
        Ok(self.enabled)
    }

    /// Rewrite every problem character of `view`
    pub fn rewrite_typography(&self, view: &mut dyn View, mode: Mode) -> Result<RewriteSummary, DetectorError> {
        let settings = self.settings.snapshot();
        let spans = detect(&view.text(), &settings.replacement_table)?;
        let count = rewrite_buffer(view, &spans, mode, &settings.replacement_table);
        let summary = RewriteSummary { mode, count };
        info!("{}: {}", view.id(), summary.message());
        Ok(summary)
    }

    /// Dispatch a host command; returns the status text, if the command emits one
    pub fn run_command<W: Window + ?Sized, D: DisplayLayer + ?Sized>(
        &mut self,
        command: Command,
        window: &mut W,
        display: &mut D,
    ) -> Result<Option<String>, CommandError> {
        match command {
            Command::ToggleHighlight => {
                self.toggle(window, display)?;
                Ok(None)
            }
            Command::RewriteTypography { mode } => match window.active_view_mut() {
                Some(view) => Ok(Some(self.rewrite_typography(view, mode)?.message())),
                None => {
                    debug!("No active view for {}", Command::REWRITE_TYPOGRAPHY);
                    Ok(None)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Span;
    use crate::document::{Document, Workspace};
    use crate::highlight::MemoryDisplay;
    use crate::settings::Settings;
    use crate::table::ReplacementTable;
    use serde_json::json;

    fn plugin() -> Typographer {
        Typographer::new(SettingsStore::default())
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(
            Command::from_invocation("toggle-highlight", None).unwrap(),
            Command::ToggleHighlight
        );
        assert_eq!(
            Command::from_invocation("rewrite-typography", None).unwrap(),
            Command::RewriteTypography { mode: Mode::Replace }
        );
        assert_eq!(
            Command::from_invocation("rewrite-typography", Some(&json!({"mode": "escape"}))).unwrap(),
            Command::RewriteTypography { mode: Mode::Escape }
        );
        assert!(matches!(
            Command::from_invocation("rewrite-typography", Some(&json!({"mode": "delete"}))),
            Err(CommandError::Arguments { .. })
        ));
        assert!(matches!(
            Command::from_invocation("erase", None),
            Err(CommandError::Unknown(_))
        ));
    }

    #[test]
    fn test_plain_text_view_is_never_highlighted() {
        let plugin = plugin();
        let mut display = MemoryDisplay::new();
        let doc = Document::new("\u{201C}quoted\u{201D}", Some("Plain Text"));

        plugin.on_modified(&doc, &mut display).unwrap();
        assert!(display.calls().is_empty());
    }

    #[test]
    fn test_html_view_highlights_detected_spans() {
        let plugin = plugin();
        let mut display = MemoryDisplay::new();
        let doc = Document::new("<p>\u{201C}x\u{201D}</p>", Some("HTML"));

        plugin.on_load(&doc, &mut display).unwrap();
        let marks = display.marks(doc.id()).unwrap();
        assert_eq!(marks.spans, vec![Span::new(3, 4), Span::new(5, 6)]);
        assert_eq!(marks.style, "invalid");
    }

    #[test]
    fn test_disabled_by_settings() {
        let store = SettingsStore::new(Settings {
            enabled: false,
            ..Settings::default()
        });
        let plugin = Typographer::new(store);
        let mut display = MemoryDisplay::new();
        let doc = Document::new("\u{2026}", Some("HTML"));

        assert!(!plugin.is_enabled());
        plugin.on_activated(&doc, &mut display).unwrap();
        assert!(display.calls().is_empty());
    }

    #[test]
    fn test_toggle_cycle() {
        let mut plugin = plugin();
        let mut display = MemoryDisplay::new();
        let mut ws = Workspace::new();
        let id = ws.open(Document::new("a\u{2014}b", Some("HTML")));

        plugin.on_load(ws.get(id).unwrap(), &mut display).unwrap();
        assert!(display.marks(id).is_some());

        // Off: all views cleared, modify events ignored
        assert!(!plugin.toggle(&ws, &mut display).unwrap());
        assert!(display.marks(id).is_none());
        display.take_calls();

        ws.get_mut(id).unwrap().insert(0, "\u{2026}");
        plugin.on_modified(ws.get(id).unwrap(), &mut display).unwrap();
        assert!(display.calls().is_empty());

        // On: active view highlighted immediately, then on every modify
        assert!(plugin.toggle(&ws, &mut display).unwrap());
        assert_eq!(display.marks(id).unwrap().spans, vec![Span::new(0, 1), Span::new(2, 3)]);

        ws.get_mut(id).unwrap().insert(4, "\u{00BD}");
        display.take_calls();
        plugin.on_modified(ws.get(id).unwrap(), &mut display).unwrap();
        assert_eq!(display.calls().len(), 1);
        assert_eq!(
            display.marks(id).unwrap().spans,
            vec![Span::new(0, 1), Span::new(2, 3), Span::new(4, 5)]
        );
    }

    #[test]
    fn test_toggle_off_clears_every_open_view() {
        let mut plugin = plugin();
        let mut display = MemoryDisplay::new();
        let mut ws = Workspace::new();
        let page = ws.open(Document::new("<p>\u{201C}x\u{201D}</p>", Some("HTML")));
        let feed = ws.open(Document::new("<t>\u{00BD}</t>", Some("XML")));

        plugin.on_load(ws.get(page).unwrap(), &mut display).unwrap();
        plugin.on_load(ws.get(feed).unwrap(), &mut display).unwrap();
        assert!(display.marks(page).is_some());
        assert!(display.marks(feed).is_some());

        // Only the feed is active, the page must still be cleared
        assert_eq!(ws.active_view().map(|v| v.id()), Some(feed));
        assert!(!plugin.toggle(&ws, &mut display).unwrap());
        assert!(display.marks(page).is_none());
        assert!(display.marks(feed).is_none());

        // Re-enabling highlights the active view only
        assert!(plugin.toggle(&ws, &mut display).unwrap());
        assert_eq!(display.marks(feed).unwrap().spans, vec![Span::new(3, 4)]);
        assert!(display.marks(page).is_none());
    }

    #[test]
    fn test_rewrite_command_on_active_view() {
        let mut plugin = plugin();
        let mut display = MemoryDisplay::new();
        let mut ws = Workspace::new();
        let id = ws.open(Document::new("\u{201C}Hi\u{201D}\u{2026}", Some("HTML")));

        let status = plugin
            .run_command(Command::RewriteTypography { mode: Mode::Replace }, &mut ws, &mut display)
            .unwrap();
        assert_eq!(status.as_deref(), Some("Replaced 3 special characters"));
        assert_eq!(ws.get(id).unwrap().text(), "\"Hi\"...");

        let status = plugin
            .run_command(Command::RewriteTypography { mode: Mode::Escape }, &mut ws, &mut display)
            .unwrap();
        assert_eq!(status.as_deref(), Some("No special characters to escape!"));
    }

    #[test]
    fn test_toggle_command_emits_no_status() {
        let mut plugin = plugin();
        let mut display = MemoryDisplay::new();
        let mut ws = Workspace::new();
        let status = plugin
            .run_command(Command::ToggleHighlight, &mut ws, &mut display)
            .unwrap();
        assert!(status.is_none());
        assert!(!plugin.is_enabled());
    }

    #[test]
    fn test_reloaded_table_used_on_next_pass() {
        let plugin = plugin();
        let mut display = MemoryDisplay::new();
        let mut doc = Document::new("a\u{00A9}b\u{2026}", Some("HTML"));

        plugin.on_modified(&doc, &mut display).unwrap();
        assert_eq!(display.marks(doc.id()).unwrap().spans, vec![Span::new(3, 4)]);

        let mut table = ReplacementTable::empty();
        table.insert('\u{00A9}', "(c)");
        plugin.settings().replace(Settings {
            replacement_table: table,
            ..Settings::default()
        });

        plugin.on_modified(&doc, &mut display).unwrap();
        assert_eq!(display.marks(doc.id()).unwrap().spans, vec![Span::new(1, 2)]);

        let summary = plugin.rewrite_typography(&mut doc, Mode::Replace).unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.message(), "Replaced 1 special character");
        assert_eq!(doc.text(), "a(c)b\u{2026}");
    }

    #[test]
    fn test_oversized_view_skipped() {
        let store = SettingsStore::new(Settings {
            max_file_size: 4,
            ..Settings::default()
        });
        let plugin = Typographer::new(store);
        let mut display = MemoryDisplay::new();

        let fits = Document::new("ab\u{2026}d", Some("HTML"));
        let too_big = Document::new("ab\u{2026}de", Some("HTML"));
        assert!(plugin.highlight_view(&fits, &mut display).unwrap());
        assert!(!plugin.highlight_view(&too_big, &mut display).unwrap());
        assert!(display.marks(too_big.id()).is_none());
    }
}
