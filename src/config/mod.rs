//! # Configuration
//!
//! Process-level provider settings.
//!
//! Store-level configuration arrives with each store manifest (see `crd`);
//! the settings here cover what is shared by every provider instance in the
//! process: identity discovery endpoints, logging and metrics.

mod settings;

pub use settings::ProviderSettings;
