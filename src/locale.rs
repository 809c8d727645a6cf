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

use std::fmt;
use std::path::Path;

/// A language code such as `es` or `pt-BR`.
///
/// Locales are always stored with hyphens. Gettext names PO files with
/// underscores (`pt_BR.po`), and generated files follow the ClojureScript
/// convention of underscores in file names, so the underscore form is
/// available through [`Locale::file_stem`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Locale(String);

impl Locale {
    pub fn new(code: &str) -> Self {
        Locale(code.replace('_', "-"))
    }

    /// Derive the locale from a PO file name, e.g. `i18n/pt_BR.po`.
    ///
    /// Returns `None` if the path has no usable file stem.
    pub fn from_po_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        if stem.is_empty() {
            return None;
        }
        Some(Locale::new(stem))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The locale with hyphens turned back into underscores.
    pub fn file_stem(&self) -> String {
        self.0.replace('-', "_")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Locale::new(code)
    }
}
