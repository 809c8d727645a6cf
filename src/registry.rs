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

use crate::locale::Locale;
use crate::table::{self, TranslationTable};
use std::collections::BTreeMap;

/// Translation tables for every loaded locale.
///
/// This is the in-process counterpart of the table registration done by
/// the generated code: whoever builds the registry owns it and passes
/// it to the code that needs to resolve display strings.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    tables: BTreeMap<Locale, TranslationTable>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the table for `locale`, returning the table it replaces.
    pub fn register(
        &mut self,
        locale: Locale,
        table: TranslationTable,
    ) -> Option<TranslationTable> {
        self.tables.insert(locale, table)
    }

    /// Look up a `msgctxt|msgid` key in the table for `locale`.
    pub fn lookup(&self, locale: &Locale, key: &str) -> Option<&str> {
        self.tables.get(locale)?.get(key)
    }

    /// Look up a message by its context and source text.
    pub fn translate(&self, locale: &Locale, msgctxt: &str, msgid: &str) -> Option<&str> {
        self.lookup(locale, &table::key(msgctxt, msgid))
    }

    pub fn table(&self, locale: &Locale) -> Option<&TranslationTable> {
        self.tables.get(locale)
    }

    /// The registered locales in sorted order.
    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.tables.keys()
    }
}
