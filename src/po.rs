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

//! Parsing of GNU Gettext PO files.
//!
//! The parser understands the subset of the PO format produced by
//! `xgettext` and `msgmerge` for singular messages: blocks separated
//! by blank lines, each with optional `msgctxt`, `msgid` and `msgstr`
//! fields whose quoted values may continue over several lines.
//!
//! Parsing is best-effort. Lines which cannot be understood are
//! recorded as [`Diagnostic`]s and skipped, leaving it to the caller
//! to decide if they are fatal.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// One message parsed from a PO block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub msgctxt: String,
    pub msgid: String,
    pub msgstr: String,
    /// Whether the block carries the `fuzzy` flag.
    pub fuzzy: bool,
    /// The 1-based line number of the first line in the block.
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A line which is neither a comment, a field nor a continuation.
    UnexpectedInput,
    /// A quoted string with no field before it in the block.
    OrphanContinuation,
    /// A block without `msgid` (and without `msgctxt`).
    MissingMsgid,
}

/// A problem found while parsing, tied to the line it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub text: String,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            DiagnosticKind::UnexpectedInput => "unexpected input",
            DiagnosticKind::OrphanContinuation => "continuation without a field",
            DiagnosticKind::MissingMsgid => "block without msgid",
        };
        write!(f, "{}: {what}: {:?}", self.line, self.text)
    }
}

/// The result of parsing a PO file: the messages and everything that
/// was skipped along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCatalog {
    pub entries: Vec<Entry>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Msgctxt,
    Msgid,
    Msgstr,
}

fn field_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = r#"(?x)
              ^(?<field>msgctxt|msgid|msgstr)    # the field marker
              \s+
              (?<value>".*")                     # the quoted value
              \s*$
        "#;
        Regex::new(pattern).expect("well-formed regex")
    })
}

/// Remove the surrounding quotes and decode escape sequences.
fn unquote(raw: &str) -> String {
    let raw = raw.trim();
    let raw = raw.strip_prefix('"').unwrap_or(raw);
    let raw = raw.strip_suffix('"').unwrap_or(raw);

    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

/// Check for a `#,` comment listing the `fuzzy` flag.
fn is_fuzzy_flag(line: &str) -> bool {
    line.trim_start()
        .strip_prefix("#,")
        .is_some_and(|flags| flags.split(',').any(|flag| flag.trim() == "fuzzy"))
}

fn is_quoted(line: &str) -> bool {
    line.len() >= 2 && line.starts_with('"') && line.ends_with('"')
}

/// Check if the comment-free lines of a block form the catalog header.
///
/// The header is the `msgid ""`/`msgstr ""` pair followed by the
/// `Project-Id-Version` metadata line written by `xgettext`.
fn is_header(lines: &[(usize, &str)]) -> bool {
    matches!(
        lines,
        [(_, "msgid \"\""), (_, "msgstr \"\""), (_, third), ..]
            if third.starts_with("\"Project-Id-Version:")
    )
}

/// Split `content` into blocks of non-blank lines, labeled with their
/// 1-based line numbers.
fn split_blocks(content: &str) -> Vec<Vec<(usize, &str)>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push((idx + 1, line));
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn parse_block(
    start: usize,
    block: &[(usize, &str)],
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Entry> {
    let mut entry = Entry {
        line: start,
        ..Entry::default()
    };
    let mut current: Option<Field> = None;
    let mut seen_msgid = false;

    for &(lineno, line) in block {
        let line = line.trim();
        if let Some(captures) = field_regex().captures(line) {
            let field = match &captures["field"] {
                "msgctxt" => Field::Msgctxt,
                "msgid" => Field::Msgid,
                _ => Field::Msgstr,
            };
            let value = unquote(&captures["value"]);
            match field {
                Field::Msgctxt => entry.msgctxt = value,
                Field::Msgid => {
                    entry.msgid = value;
                    seen_msgid = true;
                }
                Field::Msgstr => entry.msgstr = value,
            }
            current = Some(field);
        } else if is_quoted(line) {
            let value = unquote(line);
            match current {
                Some(Field::Msgctxt) => entry.msgctxt.push_str(&value),
                Some(Field::Msgid) => entry.msgid.push_str(&value),
                Some(Field::Msgstr) => entry.msgstr.push_str(&value),
                None => diagnostics.push(Diagnostic {
                    line: lineno,
                    text: line.to_string(),
                    kind: DiagnosticKind::OrphanContinuation,
                }),
            }
        } else {
            diagnostics.push(Diagnostic {
                line: lineno,
                text: line.to_string(),
                kind: DiagnosticKind::UnexpectedInput,
            });
        }
    }

    if current.is_none() {
        // Nothing but noise, which has already been reported.
        return None;
    }
    if entry.msgid.is_empty() && entry.msgctxt.is_empty() {
        diagnostics.push(Diagnostic {
            line: entry.line,
            text: if seen_msgid {
                String::from("msgid \"\"")
            } else {
                String::new()
            },
            kind: DiagnosticKind::MissingMsgid,
        });
        return None;
    }
    Some(entry)
}

/// Parse the content of a PO file.
///
/// # Examples
///
/// ```
/// use fulcro_i18n_helpers::po::parse;
///
/// let parsed = parse("msgctxt \"menu\"\nmsgid \"File\"\nmsgstr \"Archivo\"\n");
/// assert_eq!(parsed.entries[0].msgctxt, "menu");
/// assert_eq!(parsed.entries[0].msgstr, "Archivo");
/// assert!(parsed.diagnostics.is_empty());
/// ```
pub fn parse(content: &str) -> ParsedCatalog {
    let mut parsed = ParsedCatalog::default();
    for block in split_blocks(content) {
        let start = block.first().map_or(0, |(lineno, _)| *lineno);
        let fuzzy = block.iter().any(|(_, line)| is_fuzzy_flag(line));
        let lines = block
            .into_iter()
            .filter(|(_, line)| !line.trim_start().starts_with('#'))
            .collect::<Vec<_>>();
        if lines.is_empty() || is_header(&lines) {
            continue;
        }
        if let Some(entry) = parse_block(start, &lines, &mut parsed.diagnostics) {
            parsed.entries.push(Entry { fuzzy, ..entry });
        }
    }
    parsed
}

/// Set metadata fields in the header of a PO file, keeping all other
/// lines as they are.
///
/// Fields missing from the header are appended to it, and the `fuzzy`
/// flag which `xgettext` puts on the template header is dropped.
/// Returns `None` if `content` does not start with a header.
pub fn update_header(content: &str, fields: &[(&str, &str)]) -> Option<String> {
    let lines = content.lines().collect::<Vec<_>>();
    let end = lines
        .iter()
        .position(|line| line.trim().is_empty())
        .unwrap_or(lines.len());
    let (header, rest) = lines.split_at(end);
    let metadata = header
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with('#'))
        .map(|(idx, line)| (idx, line.trim()))
        .collect::<Vec<_>>();
    if !is_header(&metadata) {
        return None;
    }
    let last_field = metadata.last().map_or(0, |(idx, _)| *idx);

    let mut pending = fields.to_vec();
    let mut updated = String::with_capacity(content.len());
    for (idx, line) in header.iter().enumerate() {
        if let Some(flags) = line.strip_prefix("#,") {
            let flags = flags
                .split(',')
                .map(str::trim)
                .filter(|flag| !flag.is_empty() && *flag != "fuzzy")
                .collect::<Vec<_>>();
            if !flags.is_empty() {
                updated.push_str(&format!("#, {}\n", flags.join(", ")));
            }
        } else if let Some(pos) = pending
            .iter()
            .position(|(key, _)| line.trim().starts_with(&format!("\"{key}:")))
        {
            let (key, value) = pending.remove(pos);
            updated.push_str(&format!("\"{key}: {value}\\n\"\n"));
        } else {
            updated.push_str(line);
            updated.push('\n');
        }
        if idx == last_field {
            for (key, value) in pending.drain(..) {
                updated.push_str(&format!("\"{key}: {value}\\n\"\n"));
            }
        }
    }
    for line in rest {
        updated.push_str(line);
        updated.push('\n');
    }
    Some(updated)
}

/// Given a directory path, returns the paths of all the `.po` files in
/// it, sorted by name.
pub fn po_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(directory).map_err(|err| Error::io(directory, err))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| Error::io(directory, err))?.path();
        if path.is_file() && path.extension() == Some("po".as_ref()) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
