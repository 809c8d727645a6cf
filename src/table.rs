// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Translation tables keyed by `msgctxt|msgid`.

use crate::po::Entry;
use log::warn;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Separates the context from the message in a table key.
pub const KEY_SEPARATOR: char = '|';

/// Build the table key for a message.
///
/// Messages without a context get an empty context, so the key for
/// `msgid "Hello"` is `"|Hello"`.
pub fn key(msgctxt: &str, msgid: &str) -> String {
    format!("{msgctxt}{KEY_SEPARATOR}{msgid}")
}

/// What to do with messages that have no translation yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Show the untranslated source text.
    #[default]
    SourceText,
    /// Leave the message out of the table.
    Omit,
}

/// The display strings for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    entries: BTreeMap<String, String>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from parsed PO entries.
    ///
    /// Untranslated messages are handled according to `policy`, with a
    /// warning in either case. If two entries share a key, the last
    /// one wins.
    pub fn from_entries(entries: &[Entry], policy: FallbackPolicy) -> Self {
        let mut table = Self::new();
        for entry in entries {
            let key = key(&entry.msgctxt, &entry.msgid);
            let value = if !entry.msgstr.is_empty() {
                entry.msgstr.clone()
            } else {
                match policy {
                    FallbackPolicy::SourceText => {
                        warn!("No translation for {key:?}, using the source text");
                        entry.msgid.clone()
                    }
                    FallbackPolicy::Omit => {
                        warn!("No translation for {key:?}, leaving it out");
                        continue;
                    }
                }
            };
            if let Some(previous) = table.insert(key.clone(), value) {
                warn!("Duplicate message {key:?}, replacing {previous:?}");
            }
        }
        table
    }

    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::po::parse;
    use pretty_assertions::assert_eq;

    fn table(content: &str, policy: FallbackPolicy) -> TranslationTable {
        TranslationTable::from_entries(&parse(content).entries, policy)
    }

    #[test]
    fn test_key() {
        assert_eq!(key("", "Hello"), "|Hello");
        assert_eq!(key("menu", "File"), "menu|File");
    }

    #[test]
    fn test_translated_entry() {
        let table = table(
            "msgctxt \"menu\"\nmsgid \"File\"\nmsgstr \"Archivo\"\n",
            FallbackPolicy::default(),
        );
        assert_eq!(table.get("menu|File"), Some("Archivo"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_fallback_to_source_text() {
        let table = table(
            "msgid \"Hello\"\nmsgstr \"\"\n",
            FallbackPolicy::SourceText,
        );
        assert_eq!(table.get("|Hello"), Some("Hello"));
    }

    #[test]
    fn test_omit_untranslated() {
        let table = table(
            "msgid \"Hello\"\nmsgstr \"\"\n\nmsgid \"Bye\"\nmsgstr \"Adiós\"\n",
            FallbackPolicy::Omit,
        );
        assert_eq!(table.get("|Hello"), None);
        assert_eq!(table.get("|Bye"), Some("Adiós"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_context_separates_keys() {
        let table = table(
            "msgctxt \"verb\"\nmsgid \"Open\"\nmsgstr \"Abrir\"\n\n\
             msgctxt \"adjective\"\nmsgid \"Open\"\nmsgstr \"Abierto\"\n\n\
             msgid \"Open\"\nmsgstr \"Abrir\"\n",
            FallbackPolicy::default(),
        );
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            vec![
                ("adjective|Open", "Abierto"),
                ("verb|Open", "Abrir"),
                ("|Open", "Abrir"),
            ]
        );
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let table = table(
            "msgid \"A\"\nmsgstr \"first\"\n\nmsgid \"A\"\nmsgstr \"second\"\n",
            FallbackPolicy::default(),
        );
        assert_eq!(table.get("|A"), Some("second"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_fallback_policy_from_json() {
        let policy: FallbackPolicy = serde_json::from_str("\"omit\"").unwrap();
        assert_eq!(policy, FallbackPolicy::Omit);
        let policy: FallbackPolicy = serde_json::from_str("\"source-text\"").unwrap();
        assert_eq!(policy, FallbackPolicy::SourceText);
    }
}
