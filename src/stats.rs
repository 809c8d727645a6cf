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

use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::po::{parse, po_files, Entry};
use crate::settings::Settings;
use log::warn;
use std::fmt::{self, Display, Formatter};
use std::fs;

/// Counts of translation message statuses.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MessageStats {
    pub locale: Locale,
    pub non_translated_count: u32,
    pub translated_count: u32,
    pub fuzzy_non_translated_count: u32,
    pub fuzzy_translated_count: u32,
}

impl MessageStats {
    /// Returns the total number of messages.
    pub fn total(&self) -> u32 {
        self.non_translated_count
            + self.translated_count
            + self.fuzzy_non_translated_count
            + self.fuzzy_translated_count
    }

    /// Returns the percentage of messages with a non-fuzzy translation.
    pub fn translated_percent(&self) -> f64 {
        match self.total() {
            0 => 100.0,
            total => 100.0 * f64::from(self.translated_count) / f64::from(total),
        }
    }

    /// Returns counts of messages statuses in the given entries.
    pub fn for_entries(locale: Locale, entries: &[Entry]) -> Self {
        let mut stats = Self {
            locale,
            non_translated_count: 0,
            translated_count: 0,
            fuzzy_non_translated_count: 0,
            fuzzy_translated_count: 0,
        };
        for entry in entries {
            let translated = !entry.msgstr.is_empty();
            if translated {
                if entry.fuzzy {
                    stats.fuzzy_translated_count += 1;
                } else {
                    stats.translated_count += 1;
                }
            } else if entry.fuzzy {
                stats.fuzzy_non_translated_count += 1;
            } else {
                stats.non_translated_count += 1;
            }
        }
        stats
    }
}

impl Display for MessageStats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}, {}) / {} translated, {:.1}%",
            self.locale,
            self.translated_count,
            self.fuzzy_translated_count,
            self.fuzzy_non_translated_count,
            self.total(),
            self.translated_percent(),
        )
    }
}

/// Reads each PO file in the PO directory and returns message stats
/// for each locale.
pub fn status(settings: &Settings) -> Result<Vec<MessageStats>> {
    let mut all_stats = Vec::new();
    for path in po_files(&settings.po_dir)? {
        let locale =
            Locale::from_po_path(&path).ok_or_else(|| Error::MissingInput(path.clone()))?;
        let content = fs::read_to_string(&path).map_err(|err| Error::io(&path, err))?;
        let parsed = parse(&content);
        if !parsed.diagnostics.is_empty() {
            warn!(
                "{}: {} line(s) could not be parsed and are not counted",
                path.display(),
                parsed.diagnostics.len()
            );
        }
        all_stats.push(MessageStats::for_entries(locale, &parsed.entries));
    }
    Ok(all_stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    // As written by msgmerge: no Plural-Forms and a fuzzy header.
    const DE_PO: &str = r#"# German translations.
#, fuzzy
msgid ""
msgstr ""
"Project-Id-Version: PACKAGE VERSION\n"
"Report-Msgid-Bugs-To: \n"
"POT-Creation-Date: 2024-05-01 10:00+0200\n"
"PO-Revision-Date: YEAR-MO-DA HO:MI+ZONE\n"
"Language: de\n"
"MIME-Version: 1.0\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Content-Transfer-Encoding: 8bit\n"

msgid "Hello"
msgstr "Hallo"

msgid "Goodbye"
msgstr "Tschüss"

#, fuzzy
msgid "Settings"
msgstr "Einstellung"

msgid "Help"
msgstr ""

#~ msgid "Removed"
#~ msgstr "Entfernt"
"#;

    #[test]
    fn test_status() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("de.po"), DE_PO).unwrap();
        let settings = Settings {
            po_dir: PathBuf::from(dir.path()),
            ..Settings::default()
        };

        let stats = status(&settings).unwrap();
        assert_eq!(
            stats,
            vec![MessageStats {
                locale: Locale::new("de"),
                non_translated_count: 1,
                translated_count: 2,
                fuzzy_non_translated_count: 0,
                fuzzy_translated_count: 1,
            }]
        );
        assert_eq!(stats[0].total(), 4);
        assert_eq!(stats[0].to_string(), "de: 2 (1, 0) / 4 translated, 50.0%");
    }

    #[test]
    fn test_empty_catalog_is_complete() {
        let stats = MessageStats {
            locale: Locale::new("fr"),
            non_translated_count: 0,
            translated_count: 0,
            fuzzy_non_translated_count: 0,
            fuzzy_translated_count: 0,
        };
        assert_eq!(stats.translated_percent(), 100.0);
    }
}
