//! Translator: dotted-key lookup over per-language JSON catalogs.
//!
//! ```ignore
//! let mut tr = Translator::bundled();
//! assert_eq!(tr.t("resources.vendors"), "Vendors");
//! tr.set_language("es")?;
//! assert_eq!(tr.t("resources.vendors"), "Proveedores");
//! assert_eq!(tr.t_with("table.selected", &[("count", "3")]), "3 seleccionados");
//! ```
//!
//! Lookups fall back to the default language, then to the key itself.

use crate::error::ClientError;
use serde_json::Value;
use shared::utils::merge_json;
use std::collections::BTreeMap;

pub const DEFAULT_LANGUAGE: &str = "en";

const BUNDLED: [(&str, &str); 2] = [
    ("en", include_str!("../assets/locales/en.json")),
    ("es", include_str!("../assets/locales/es.json")),
];

#[derive(Debug, Clone)]
pub struct Translator {
    catalogs: BTreeMap<String, Value>,
    default_language: String,
    language: String,
}

impl Translator {
    /// Empty translator; every lookup returns its key until catalogs are added.
    pub fn new(default_language: &str) -> Self {
        Self {
            catalogs: BTreeMap::new(),
            default_language: default_language.to_string(),
            language: default_language.to_string(),
        }
    }

    /// Translator with the catalogs shipped in the binary.
    pub fn bundled() -> Self {
        let mut translator = Self::new(DEFAULT_LANGUAGE);
        for (language, text) in BUNDLED {
            match serde_json::from_str::<Value>(text) {
                Ok(catalog) => translator.add_catalog(language, catalog),
                Err(e) => tracing::error!(language, error = %e, "Bundled locale catalog is not valid JSON"),
            }
        }
        translator
    }

    /// Adds a catalog, deep-merging into any catalog already loaded for
    /// `language`.
    pub fn add_catalog(&mut self, language: &str, catalog: Value) {
        match self.catalogs.get_mut(language) {
            Some(existing) => merge_json(existing, catalog),
            None => {
                self.catalogs.insert(language.to_string(), catalog);
            }
        }
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.catalogs.contains_key(language)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: &str) -> Result<(), ClientError> {
        if !self.has_language(language) {
            return Err(ClientError::ValidationError(format!(
                "unsupported language '{}' (available: {})",
                language,
                self.languages().collect::<Vec<_>>().join(", ")
            )));
        }
        self.language = language.to_string();
        tracing::debug!(language, "Language switched");
        Ok(())
    }

    pub fn t(&self, key: &str) -> String {
        self.lookup(&self.language, key)
            .or_else(|| self.lookup(&self.default_language, key))
            .unwrap_or_else(|| key.to_string())
    }

    /// Translates and fills `{{name}}` placeholders.
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.t(key), |text, (name, value)| {
            text.replace(&format!("{{{{{}}}}}", name), value)
        })
    }

    fn lookup(&self, language: &str, key: &str) -> Option<String> {
        let mut node = self.catalogs.get(language)?;
        for part in key.split('.') {
            node = node.get(part)?;
        }
        node.as_str().map(str::to_string)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::bundled()
    }
}
