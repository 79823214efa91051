use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

/// User preferences that survive a page reload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub show_help_on_load: bool,
}

impl Preferences {
    pub fn load_or_default(store: &impl PreferenceStore) -> Self {
        store.load().unwrap_or_default()
    }

    pub fn to_json(&self) -> String {
        // a struct of plain bools always serializes
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(prefs) => Some(prefs),
            Err(err) => {
                log::warn!("discarding malformed preferences: {}", err);
                None
            }
        }
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_help_on_load: true,
        }
    }
}

/// Durable key/value slot holding [`Preferences`].
pub trait PreferenceStore {
    fn load(&self) -> Option<Preferences>;
    fn save(&mut self, prefs: &Preferences) -> Result<()>;
}

/// Store that only lives as long as the value itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryPreferenceStore {
    stored: Option<String>,
}

impl MemoryPreferenceStore {
    pub const fn new() -> Self {
        Self { stored: None }
    }

    pub fn raw(&self) -> Option<&str> {
        self.stored.as_deref()
    }

    pub fn set_raw(&mut self, raw: impl Into<String>) {
        self.stored = Some(raw.into());
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Option<Preferences> {
        self.stored.as_deref().and_then(Preferences::from_json)
    }

    fn save(&mut self, prefs: &Preferences) -> Result<()> {
        self.stored = Some(prefs.to_json());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_falls_back_to_showing_help() {
        let store = MemoryPreferenceStore::new();

        assert!(Preferences::load_or_default(&store).show_help_on_load);
    }

    #[test]
    fn saved_preferences_are_read_back() {
        let mut store = MemoryPreferenceStore::new();
        let prefs = Preferences {
            show_help_on_load: false,
        };

        store.save(&prefs).unwrap();

        assert_eq!(store.raw(), Some(r#"{"show_help_on_load":false}"#));
        assert_eq!(Preferences::load_or_default(&store), prefs);
    }

    #[test]
    fn malformed_value_is_ignored() {
        let mut store = MemoryPreferenceStore::new();
        store.set_raw("not json");

        assert_eq!(store.load(), None);
        assert_eq!(Preferences::load_or_default(&store), Preferences::default());
    }

    #[test]
    fn unknown_fields_keep_defaults_for_missing_ones() {
        assert_eq!(
            Preferences::from_json(r#"{"theme":"dark"}"#),
            Some(Preferences::default())
        );
    }
}
