#![no_main]

use fulcro_i18n_helpers::po::parse;
use fulcro_i18n_helpers::{FallbackPolicy, TranslationTable};
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|content: &str| {
    let parsed = parse(content);
    assert_eq!(parsed, parse(content));

    let line_count = content.lines().count();
    for diagnostic in &parsed.diagnostics {
        assert!(diagnostic.line >= 1 && diagnostic.line <= line_count);
    }

    let table = TranslationTable::from_entries(&parsed.entries, FallbackPolicy::SourceText);
    assert!(table.len() <= parsed.entries.len());
    let omitted = TranslationTable::from_entries(&parsed.entries, FallbackPolicy::Omit);
    assert!(omitted.len() <= table.len());
});
