pub mod table;
pub mod detector;
pub mod rewriter;
pub mod eligibility;
pub mod settings;
pub mod host;
pub mod highlight;
pub mod document;
pub mod plugin;
pub mod discovery;
pub mod reader;
pub mod report;
pub mod processing;

// Re-export core types for convenient access
pub use detector::{detect, Detector, Span};
pub use rewriter::{rewrite, Mode, Rewrite, RewriteSummary};
pub use table::ReplacementTable;

// Re-export host integration types
pub use eligibility::EligibilityPolicy;
pub use plugin::{Command, Typographer};
pub use settings::{Settings, SettingsStore};
