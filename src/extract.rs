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

//! This file contains the logic behind `fulcro-gettext extract`.
//!
//! Extraction runs `xgettext` on the compiled (whitespace optimized)
//! JavaScript to produce `messages.pot`, then brings every existing PO
//! file up to date with `msgmerge`. New locales can be started from
//! the fresh template.

use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::po::{po_files, update_header};
use crate::process::{RunOptions, Tool};
use crate::settings::Settings;
use log::{info, warn};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Flags passed to `xgettext` before the output and input paths.
///
/// The keywords match the `tr`, `trc` and `trf` translation helpers.
pub const XGETTEXT_FLAGS: [&str; 6] = [
    "--from-code=UTF-8",
    "--debug",
    "-k",
    "-ktr:1",
    "-ktrc:1c,2",
    "-ktrf:1",
];

/// Flags passed to `msgmerge` before `-U <po> <template>`.
pub const MSGMERGE_FLAGS: [&str; 2] = ["--force-po", "--no-wrap"];

/// The external programs needed for extraction.
///
/// `msgmerge` is only needed once there are PO files to merge.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub xgettext: Tool,
    pub msgmerge: Option<Tool>,
}

impl Toolchain {
    /// Find the tools needed to extract into `po_dir` on the `PATH`,
    /// failing before anything is run.
    pub fn locate(po_dir: &Path) -> Result<Self> {
        let xgettext = Tool::locate("xgettext")?;
        let msgmerge = if po_dir.is_dir() && !po_files(po_dir)?.is_empty() {
            Some(Tool::locate("msgmerge")?)
        } else {
            None
        };
        Ok(Toolchain { xgettext, msgmerge })
    }
}

/// What an extraction run touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub template: PathBuf,
    pub merged: Vec<PathBuf>,
    pub initialized: Vec<PathBuf>,
}

fn xgettext_args(template: &Path, js_path: &Path) -> Vec<OsString> {
    let mut args = XGETTEXT_FLAGS.map(OsString::from).to_vec();
    args.push("-o".into());
    args.push(template.into());
    args.push(js_path.into());
    args
}

fn msgmerge_args(po_path: &Path, template: &Path) -> Vec<OsString> {
    let mut args = MSGMERGE_FLAGS.map(OsString::from).to_vec();
    args.push("-U".into());
    args.push(po_path.into());
    args.push(template.into());
    args
}

/// Extract messages from `js_path` and update the PO files.
///
/// `new_locales` lists locales which should get a PO file if they do
/// not have one yet.
pub fn extract(
    settings: &Settings,
    js_path: &Path,
    new_locales: &[Locale],
    tools: &Toolchain,
    options: &RunOptions,
) -> Result<Extraction> {
    let template = settings.expand()?.template;
    if !js_path.is_file() {
        return Err(Error::MissingInput(js_path.to_path_buf()));
    }
    fs::create_dir_all(&settings.po_dir).map_err(|err| Error::io(&settings.po_dir, err))?;
    let existing = po_files(&settings.po_dir)?;
    let msgmerge = match &tools.msgmerge {
        Some(tool) => Some(tool),
        None if existing.is_empty() => None,
        None => return Err(Error::ToolNotFound("msgmerge")),
    };

    info!(
        "Extracting messages from {} into {}",
        js_path.display(),
        template.display()
    );
    tools
        .xgettext
        .run(xgettext_args(&template, js_path), options)?;

    let mut extraction = Extraction {
        template,
        ..Extraction::default()
    };
    if let Some(msgmerge) = msgmerge {
        for po_path in existing {
            info!("Merging {}", po_path.display());
            msgmerge.run(msgmerge_args(&po_path, &extraction.template), options)?;
            extraction.merged.push(po_path);
        }
    }

    for locale in new_locales {
        let po_path = settings
            .po_dir
            .join(format!("{}.po", locale.file_stem()));
        if po_path.exists() {
            warn!(
                "Not initializing {locale}: {} already exists",
                po_path.display()
            );
            continue;
        }
        init_locale(&extraction.template, locale, &po_path)?;
        extraction.initialized.push(po_path);
    }

    Ok(extraction)
}

/// Create a PO file for `locale` from the template, like `msginit`.
///
/// Only the header is touched: the messages are copied as they are.
pub fn init_locale(template: &Path, locale: &Locale, output: &Path) -> Result<()> {
    let content = fs::read_to_string(template).map_err(|err| Error::io(template, err))?;
    let language = locale.file_stem();
    let revision_date = chrono::Local::now().format("%Y-%m-%d %H:%M%z").to_string();
    let localized = update_header(
        &content,
        &[
            ("PO-Revision-Date", revision_date.as_str()),
            ("Language", language.as_str()),
            ("Content-Type", "text/plain; charset=UTF-8"),
        ],
    )
    .ok_or_else(|| Error::Catalog {
        path: template.to_path_buf(),
        message: String::from("the template has no header"),
    })?;
    fs::write(output, localized).map_err(|err| Error::io(output, err))?;
    info!("Initialized {} for {locale}", output.display());
    Ok(())
}
