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

//! This file contains the logic behind `fulcro-gettext deploy`.
//!
//! Every PO file in the PO directory is turned into a ClojureScript
//! module in the output directory. Files are processed one at a time
//! and each generated module is overwritten in place, so an aborted run
//! can leave a mix of old and new modules. Running deploy again
//! regenerates all of them.

use crate::codegen::{self, Module};
use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::po::{self, po_files, Diagnostic};
use crate::registry::Registry;
use crate::settings::{Settings, GENERATED_EXTENSION};
use crate::table::TranslationTable;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// The translations read from one PO file.
#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    pub locale: Locale,
    pub path: PathBuf,
    pub table: TranslationTable,
    pub diagnostics: Vec<Diagnostic>,
}

/// A module written by [`deploy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployed {
    pub locale: Locale,
    pub source: PathBuf,
    pub output: PathBuf,
    pub messages: usize,
    pub diagnostics: usize,
}

/// Parse the PO file at `path` into a translation table.
///
/// Diagnostics are logged. In strict mode they abort with
/// [`Error::Diagnostics`].
pub fn read_catalog(path: &Path, settings: &Settings) -> Result<LocaleCatalog> {
    let locale = Locale::from_po_path(path)
        .ok_or_else(|| Error::MissingInput(path.to_path_buf()))?;
    let content = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    let parsed = po::parse(&content);
    for diagnostic in &parsed.diagnostics {
        warn!("{}:{diagnostic}", path.display());
    }
    if settings.strict && !parsed.diagnostics.is_empty() {
        return Err(Error::Diagnostics {
            path: path.to_path_buf(),
            count: parsed.diagnostics.len(),
        });
    }
    let table = TranslationTable::from_entries(&parsed.entries, settings.fallback);
    debug!(
        "Read {} messages for {locale} from {}",
        table.len(),
        path.display()
    );
    Ok(LocaleCatalog {
        locale,
        path: path.to_path_buf(),
        table,
        diagnostics: parsed.diagnostics,
    })
}

/// Generate a module for every PO file in the PO directory.
///
/// The source directory must exist. The PO directory and the output
/// directory are created when missing.
pub fn deploy(settings: &Settings) -> Result<Vec<Deployed>> {
    let paths = settings.expand()?;
    if !settings.src.is_dir() {
        return Err(Error::MissingDirectory(settings.src.clone()));
    }
    fs::create_dir_all(&settings.po_dir).map_err(|err| Error::io(&settings.po_dir, err))?;
    fs::create_dir_all(&paths.output_dir).map_err(|err| Error::io(&paths.output_dir, err))?;

    let sources = po_files(&settings.po_dir)?;
    if sources.is_empty() {
        warn!("No PO files found in {}", settings.po_dir.display());
    }

    let mut deployed = Vec::with_capacity(sources.len());
    for source in sources {
        let catalog = read_catalog(&source, settings)?;
        let module_name = settings.module_name(&catalog.locale);
        let source_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let rendered = codegen::render(
            &catalog.locale,
            &catalog.table,
            &Module {
                name: &module_name,
                runtime: &settings.runtime_namespace,
                source: &source_name,
            },
        )?;

        let output = paths.output_dir.join(format!(
            "{}.{GENERATED_EXTENSION}",
            catalog.locale.file_stem()
        ));
        fs::write(&output, rendered).map_err(|err| Error::io(&output, err))?;
        info!(
            "Wrote {} ({} messages) for {}",
            output.display(),
            catalog.table.len(),
            catalog.locale
        );

        deployed.push(Deployed {
            locale: catalog.locale,
            source,
            output,
            messages: catalog.table.len(),
            diagnostics: catalog.diagnostics.len(),
        });
    }
    Ok(deployed)
}

/// Read every PO file into a [`Registry`] without generating anything.
pub fn load_registry(settings: &Settings) -> Result<Registry> {
    if !settings.po_dir.is_dir() {
        return Err(Error::MissingDirectory(settings.po_dir.clone()));
    }
    let mut registry = Registry::new();
    for path in po_files(&settings.po_dir)? {
        let catalog = read_catalog(&path, settings)?;
        registry.register(catalog.locale, catalog.table);
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::FallbackPolicy;
    use pretty_assertions::assert_eq;

    const ES_PO: &str = r#"# Spanish translations.
msgid ""
msgstr ""
"Project-Id-Version: PACKAGE VERSION\n"
"Language: es\n"
"Content-Type: text/plain; charset=UTF-8\n"

#: app.js:1
msgid "Hello"
msgstr "Hola"

#: app.js:2
msgctxt "menu"
msgid "File"
msgstr "Archivo"

#: app.js:3
msgid "Untranslated"
msgstr ""
"#;

    const PT_BR_PO: &str = r#"msgid ""
msgstr ""
"Project-Id-Version: PACKAGE VERSION\n"

msgid "Hello, "
"World!"
msgstr "Olá, "
"Mundo!"
"#;

    fn project(files: &[(&str, &str)]) -> (tempfile::TempDir, Settings) {
        let root = tempfile::tempdir().unwrap();
        let settings = Settings {
            src: root.path().join("src"),
            namespace: String::from("app.i18n-data"),
            po_dir: root.path().join("i18n"),
            ..Settings::default()
        };
        fs::create_dir_all(&settings.src).unwrap();
        fs::create_dir_all(&settings.po_dir).unwrap();
        for (name, content) in files {
            fs::write(settings.po_dir.join(name), content).unwrap();
        }
        (root, settings)
    }

    #[test]
    fn test_deploy_writes_one_module_per_locale() {
        let (_root, settings) = project(&[("es.po", ES_PO), ("pt_BR.po", PT_BR_PO)]);
        let deployed = deploy(&settings).unwrap();

        let output_dir = settings.src.join("app").join("i18n_data");
        assert_eq!(
            deployed,
            vec![
                Deployed {
                    locale: Locale::new("es"),
                    source: settings.po_dir.join("es.po"),
                    output: output_dir.join("es.cljs"),
                    messages: 3,
                    diagnostics: 0,
                },
                Deployed {
                    locale: Locale::new("pt-BR"),
                    source: settings.po_dir.join("pt_BR.po"),
                    output: output_dir.join("pt_BR.cljs"),
                    messages: 1,
                    diagnostics: 0,
                },
            ]
        );

        let es = fs::read_to_string(output_dir.join("es.cljs")).unwrap();
        assert!(es.contains("(ns app.i18n-data.es\n"));
        assert!(es.contains("{\"menu|File\" \"Archivo\"\n"));
        assert!(es.contains("\"|Hello\" \"Hola\"\n"));
        assert!(es.contains("\"|Untranslated\" \"Untranslated\"})"));
        assert!(es.contains("assoc \"es\" translations)"));
        assert!(!es.contains("Project-Id-Version"));

        let pt_br = fs::read_to_string(output_dir.join("pt_BR.cljs")).unwrap();
        assert!(pt_br.contains("(ns app.i18n-data.pt-BR\n"));
        assert!(pt_br.contains("{\"|Hello, World!\" \"Olá, Mundo!\"})"));
        assert!(pt_br.contains("assoc \"pt-BR\" translations)"));
    }

    #[test]
    fn test_deploy_is_idempotent() {
        let (_root, settings) = project(&[("es.po", ES_PO), ("pt_BR.po", PT_BR_PO)]);
        let first = deploy(&settings).unwrap();
        let before = first
            .iter()
            .map(|d| fs::read(&d.output).unwrap())
            .collect::<Vec<_>>();

        let second = deploy(&settings).unwrap();
        let after = second
            .iter()
            .map(|d| fs::read(&d.output).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(first, second);
        assert_eq!(before, after);
    }

    #[test]
    fn test_deploy_overwrites_stale_module() {
        let (_root, settings) = project(&[("es.po", ES_PO)]);
        let output_dir = settings.expand().unwrap().output_dir;
        fs::create_dir_all(&output_dir).unwrap();
        fs::write(output_dir.join("es.cljs"), "stale").unwrap();

        deploy(&settings).unwrap();
        let es = fs::read_to_string(output_dir.join("es.cljs")).unwrap();
        assert!(es.contains("\"Hola\""));
    }

    #[test]
    fn test_deploy_without_fallback() {
        let (_root, mut settings) = project(&[("es.po", ES_PO)]);
        settings.fallback = FallbackPolicy::Omit;
        let deployed = deploy(&settings).unwrap();
        assert_eq!(deployed[0].messages, 2);
        let es = fs::read_to_string(&deployed[0].output).unwrap();
        assert!(!es.contains("Untranslated"));
    }

    #[test]
    fn test_deploy_requires_source_directory() {
        let (_root, mut settings) = project(&[("es.po", ES_PO)]);
        settings.src = settings.src.join("missing");
        assert!(matches!(
            deploy(&settings),
            Err(Error::MissingDirectory(path)) if path == settings.src
        ));
    }

    #[test]
    fn test_deploy_creates_po_directory() {
        let (_root, mut settings) = project(&[]);
        settings.po_dir = settings.po_dir.join("nested");
        assert_eq!(deploy(&settings).unwrap(), vec![]);
        assert!(settings.po_dir.is_dir());
        assert!(settings.expand().unwrap().output_dir.is_dir());
    }

    #[test]
    fn test_deploy_reports_diagnostics() {
        let broken = format!("{ES_PO}\nmsgid \"apple\"\nmsgid_plural \"apples\"\nmsgstr[0] \"manzana\"\n");
        let (_root, settings) = project(&[("es.po", broken.as_str())]);
        let deployed = deploy(&settings).unwrap();
        assert_eq!(deployed[0].diagnostics, 2);
        assert_eq!(deployed[0].messages, 4);
    }

    #[test]
    fn test_strict_deploy_aborts_on_diagnostics() {
        let broken = format!("{ES_PO}\nmsgid \"apple\"\nmsgid_plural \"apples\"\n");
        let (_root, mut settings) = project(&[("es.po", broken.as_str()), ("pt_BR.po", PT_BR_PO)]);
        settings.strict = true;

        let err = deploy(&settings).unwrap_err();
        assert!(matches!(err, Error::Diagnostics { count: 1, .. }));
        let output_dir = settings.expand().unwrap().output_dir;
        assert!(!output_dir.join("es.cljs").exists());
        assert!(!output_dir.join("pt_BR.cljs").exists());
    }

    #[test]
    fn test_load_registry() {
        let (_root, settings) = project(&[("es.po", ES_PO), ("pt_BR.po", PT_BR_PO)]);
        let registry = load_registry(&settings).unwrap();

        let es = Locale::new("es");
        assert_eq!(registry.translate(&es, "menu", "File"), Some("Archivo"));
        assert_eq!(registry.lookup(&es, "|Untranslated"), Some("Untranslated"));
        assert_eq!(
            registry.translate(&Locale::new("pt_BR"), "", "Hello, World!"),
            Some("Olá, Mundo!")
        );
        // Nothing is generated.
        assert!(!settings.expand().unwrap().output_dir.exists());
    }

    #[test]
    fn test_load_registry_requires_po_directory() {
        let (_root, mut settings) = project(&[]);
        settings.po_dir = settings.po_dir.join("missing");
        assert!(matches!(
            load_registry(&settings),
            Err(Error::MissingDirectory(_))
        ));
    }
}
