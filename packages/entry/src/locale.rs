//! Locale overlay for localized Cockpit fields (`title`, `title_de`, ...).

use crate::{Error, Fields, Key, OnLoadHook};

/// On-load hook exposing `<field>_<locale>` values under `<field>`.
///
/// When the requested locale differs from the default one, every field with
/// a localized sibling takes a copy of the sibling's value. The suffixed
/// fields stay in place. Fields without a translation keep the default value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleOverlay {
    requested: String,
    default: String,
}

impl LocaleOverlay {
    pub fn new(requested: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            requested: requested.into(),
            default: default.into(),
        }
    }

    pub fn requested(&self) -> &str {
        &self.requested
    }

    pub fn default_locale(&self) -> &str {
        &self.default
    }

    pub fn is_default(&self) -> bool {
        self.requested == self.default
    }
}

impl OnLoadHook for LocaleOverlay {
    fn on_load(&self, fields: &mut Fields) -> Result<(), Error> {
        if self.is_default() {
            return Ok(());
        }

        let overlays: Vec<_> = fields
            .keys()
            .filter_map(|key| {
                let name = key.as_name()?;
                let localized = Key::name(format!("{}_{}", name, self.requested));
                let value = fields.get(&localized)?;
                Some((key.clone(), value.clone()))
            })
            .collect();

        for (key, value) in overlays {
            fields.insert(key, value);
        }
        Ok(())
    }
}
