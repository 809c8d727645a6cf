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

//! Helpers for translating Fulcro applications with GNU Gettext.
//!
//! The workflow has two steps, both driven by the `fulcro-gettext`
//! binary:
//!
//! 1. **Extract**: run `xgettext` on the compiled JavaScript of the
//!    application to produce `messages.pot`, and update every PO file
//!    with `msgmerge`. Translators then edit the PO files.
//! 2. **Deploy**: turn every PO file into a ClojureScript module which
//!    registers a `msgctxt|msgid` → translation map for its locale.
//!
//! The same tables can be loaded in-process into a [`Registry`].

pub mod codegen;
pub mod deploy;
pub mod error;
pub mod extract;
pub mod locale;
pub mod po;
pub mod process;
pub mod registry;
pub mod settings;
pub mod stats;
pub mod table;

pub use error::{Error, Result};
pub use locale::Locale;
pub use registry::Registry;
pub use settings::Settings;
pub use table::{FallbackPolicy, TranslationTable};
