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

//! Rendering of the ClojureScript module for one locale.
//!
//! The generated module requires the i18n runtime, defines the table as
//! a map literal and adds it to `*loaded-translations*` under the
//! locale when it is loaded.

use crate::error::Result;
use crate::locale::Locale;
use crate::table::TranslationTable;
use serde::Serialize;
use std::fmt::Write as _;
use tera::{Context, Tera};

const MODULE_TEMPLATE: &str = include_str!("../templates/translations.cljs");

/// Names used in the generated module.
#[derive(Debug, Clone, Copy)]
pub struct Module<'a> {
    /// Namespace of the generated module, e.g. `translations.pt-BR`.
    pub name: &'a str,
    /// Namespace of the runtime holding the translation registry.
    pub runtime: &'a str,
    /// File the table was read from, mentioned in the header comment.
    pub source: &'a str,
}

#[derive(Serialize)]
struct Literal {
    key: String,
    value: String,
}

/// Quote `text` as a ClojureScript string literal.
pub fn string_literal(text: &str) -> String {
    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('"');
    for c in text.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(literal, "\\u{:04x}", c as u32);
            }
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

/// Render the module registering `table` for `locale`.
///
/// The output only depends on the arguments, so rendering unchanged
/// input produces identical text.
pub fn render(locale: &Locale, table: &TranslationTable, module: &Module<'_>) -> Result<String> {
    let entries = table
        .iter()
        .map(|(key, value)| Literal {
            key: string_literal(key),
            value: string_literal(value),
        })
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("source", module.source);
    context.insert("module", module.name);
    context.insert("runtime", module.runtime);
    context.insert("locale", &string_literal(locale.as_str()));
    context.insert("entries", &entries);
    Ok(Tera::one_off(MODULE_TEMPLATE, &context, false)?)
}
