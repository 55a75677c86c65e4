//! Localised UI strings.
//!
//! Locale files live at `<dir>/<lang>.json`. Nested objects are flattened
//! into dotted keys, so `{"menu": {"start": "Start"}}` answers `menu.start`.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Texts {
    language: String,
    entries: BTreeMap<String, String>,
}

impl Texts {
    pub fn new(language: impl Into<String>, entries: BTreeMap<String, String>) -> Self {
        Self {
            language: language.into(),
            entries,
        }
    }

    /// Build from a parsed locale document.
    pub fn from_json(language: impl Into<String>, document: &Value) -> Self {
        let mut entries = BTreeMap::new();
        flatten("", document, &mut entries);
        Self::new(language, entries)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// The string for `key`, or blank when it is missing.
    pub fn get(&self, key: &str) -> &str {
        self.entries.get(key).map_or("", String::as_str)
    }

    /// Direct children of `prefix` as `(suffix, text)` pairs in key order.
    pub fn children(&self, prefix: &str) -> Vec<(&str, &str)> {
        let dotted = format!("{prefix}.");
        self.entries
            .range(dotted.clone()..)
            .take_while(|(key, _)| key.starts_with(&dotted))
            .filter_map(|(key, text)| {
                let suffix = &key[dotted.len()..];
                (!suffix.contains('.')).then_some((suffix, text.as_str()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(object) => {
            for (key, child) in object {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        Value::Null => {}
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

pub trait TextProvider {
    /// Never fails: an unknown language yields an empty table.
    fn load(&self, language: &str) -> Texts;
}

pub struct JsonTextProvider {
    dir: PathBuf,
}

impl JsonTextProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TextProvider for JsonTextProvider {
    fn load(&self, language: &str) -> Texts {
        let path = self.dir.join(format!("{language}.json"));
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("No locale file {} ({e}), texts will be blank", path.display());
                return Texts::new(language, BTreeMap::new());
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(document) => {
                let texts = Texts::from_json(language, &document);
                log::info!("Loaded {} texts for '{language}'", texts.len());
                texts
            }
            Err(e) => {
                log::error!("Failed to parse locale file {}: {e}", path.display());
                Texts::new(language, BTreeMap::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "curb_locale_test_{}_{}_{}",
            name_hint,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn nested_keys_are_flattened() {
        let texts = Texts::from_json(
            "en",
            &json!({ "menu": { "start": "Start", "options": { "sound": "Sound" } }, "version": 2 }),
        );
        assert_eq!(texts.get("menu.start"), "Start");
        assert_eq!(texts.get("menu.options.sound"), "Sound");
        assert_eq!(texts.get("version"), "2");
        assert_eq!(texts.get("menu.missing"), "");
    }

    #[test]
    fn children_lists_one_level() {
        let texts = Texts::from_json(
            "en",
            &json!({
                "languages": { "en": "English", "pt": "Português" },
                "languagesx": "not a child",
                "menu": { "title": "x" }
            }),
        );
        assert_eq!(
            texts.children("languages"),
            vec![("en", "English"), ("pt", "Português")]
        );
        assert!(texts.children("nothing").is_empty());
    }

    #[test]
    fn provider_reads_file_and_tolerates_missing_language() {
        let dir = temp_dir_path("provider");
        fs::write(dir.join("pt.json"), r#"{ "menu": { "start": "Iniciar" } }"#).unwrap();
        let provider = JsonTextProvider::new(&dir);

        let pt = provider.load("pt");
        assert_eq!(pt.language(), "pt");
        assert_eq!(pt.get("menu.start"), "Iniciar");

        let xx = provider.load("xx");
        assert!(xx.is_empty());
        assert_eq!(xx.get("menu.start"), "");
    }
}
