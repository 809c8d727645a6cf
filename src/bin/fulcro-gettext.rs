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

//! `fulcro-gettext` keeps the translations of a Fulcro application in
//! sync with its source.
//!
//! Run `extract` after a whitespace-optimized build to update the PO
//! files in the PO directory (typically `i18n/`), translate them, and
//! run `deploy` to regenerate the ClojureScript translation modules.

use anyhow::Context as _;
use clap::{Args as ClapArgs, Parser};
use fulcro_i18n_helpers::deploy::{deploy, load_registry};
use fulcro_i18n_helpers::extract::{extract, Toolchain};
use fulcro_i18n_helpers::process::RunOptions;
use fulcro_i18n_helpers::stats::status;
use fulcro_i18n_helpers::{table, FallbackPolicy, Locale, Settings};
use log::info;
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(version, about)]
enum Args {
    /// Extract messages from the compiled JavaScript and merge them into the PO files.
    Extract {
        /// The whitespace-optimized JavaScript build to scan.
        #[arg(long = "js", value_name = "i18n.js")]
        js_path: PathBuf,
        /// Create a PO file for this locale if it does not exist yet.
        #[arg(long = "init", value_name = "LOCALE")]
        init: Vec<String>,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Generate a ClojureScript translation module for every PO file.
    Deploy {
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Print how much of each PO file is translated.
    Status {
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Print the translation of a message as deploy would register it.
    Lookup {
        locale: String,
        msgid: String,
        /// The message context.
        #[arg(long = "context", default_value = "")]
        msgctxt: String,
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

/// Options shared by all commands. They override the settings file.
#[derive(Clone, Debug, ClapArgs)]
struct SettingsArgs {
    /// JSON file with settings.
    #[arg(long, value_name = "gettext.json")]
    config: Option<PathBuf>,
    /// Root of the ClojureScript sources.
    #[arg(long)]
    src: Option<PathBuf>,
    /// Namespace of the generated modules.
    #[arg(long)]
    namespace: Option<String>,
    /// Directory holding the PO files.
    #[arg(long)]
    po_dir: Option<PathBuf>,
    /// Namespace of the i18n runtime.
    #[arg(long)]
    runtime_namespace: Option<String>,
    /// Fail on lines which cannot be parsed.
    #[arg(long)]
    strict: bool,
    /// Leave untranslated messages out instead of showing the source text.
    #[arg(long)]
    no_fallback: bool,
    /// Seconds to wait for each external tool, 0 to wait forever.
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,
}

impl SettingsArgs {
    fn resolve(self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("Could not load settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(src) = self.src {
            settings.src = src;
        }
        if let Some(namespace) = self.namespace {
            settings.namespace = namespace;
        }
        if let Some(po_dir) = self.po_dir {
            settings.po_dir = po_dir;
        }
        if let Some(runtime_namespace) = self.runtime_namespace {
            settings.runtime_namespace = runtime_namespace;
        }
        if self.strict {
            settings.strict = true;
        }
        if self.no_fallback {
            settings.fallback = FallbackPolicy::Omit;
        }
        if let Some(secs) = self.timeout {
            settings.tool_timeout_secs = (secs > 0).then_some(secs);
        }
        Ok(settings)
    }
}

#[allow(clippy::print_stdout)]
fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));

    match Args::parse() {
        Args::Extract {
            js_path,
            init,
            settings,
        } => {
            let settings = settings.resolve()?;
            let tools = Toolchain::locate(&settings.po_dir)
                .context("Gettext tools are required for extraction")?;
            let new_locales = init.iter().map(|code| Locale::new(code)).collect::<Vec<_>>();
            let options = RunOptions {
                timeout: settings.tool_timeout(),
                cancel: None,
            };
            let extraction = extract(&settings, &js_path, &new_locales, &tools, &options)
                .context("Extracting messages")?;
            info!(
                "Updated {} and {} PO file(s)",
                extraction.template.display(),
                extraction.merged.len() + extraction.initialized.len()
            );
        }
        Args::Deploy { settings } => {
            let settings = settings.resolve()?;
            let deployed = deploy(&settings).context("Deploying translations")?;
            info!("Deployed {} locale(s)", deployed.len());
        }
        Args::Status { settings } => {
            let settings = settings.resolve()?;
            let mut all_stats = status(&settings).context("Reading PO files")?;
            all_stats.sort_by_key(|stats| stats.translated_count);
            all_stats.reverse();
            println!("Counts are \"translated (fuzzy, fuzzy untranslated) / total\"");
            for stats in all_stats {
                println!("{stats}");
            }
        }
        Args::Lookup {
            locale,
            msgid,
            msgctxt,
            settings,
        } => {
            let settings = settings.resolve()?;
            let registry = load_registry(&settings).context("Loading translations")?;
            let locale = Locale::new(&locale);
            let key = table::key(&msgctxt, &msgid);
            let translation = registry
                .lookup(&locale, &key)
                .with_context(|| format!("No translation for {key:?} in {locale}"))?;
            println!("{translation}");
        }
    }

    Ok(())
}
