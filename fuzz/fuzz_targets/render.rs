#![no_main]

use arbitrary::Arbitrary;
use fulcro_i18n_helpers::codegen::{render, string_literal, Module};
use fulcro_i18n_helpers::{Locale, TranslationTable};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    locale: &'a str,
    translations: Vec<(&'a str, &'a str)>,
}

fuzz_target!(|input: Input| {
    let mut table = TranslationTable::new();
    for (key, value) in &input.translations {
        table.insert(String::from(*key), String::from(*value));
    }
    let module = Module {
        name: "translations.fuzz",
        runtime: "fulcro.i18n",
        source: "fuzz.po",
    };

    let rendered = render(&Locale::new(input.locale), &table, &module).unwrap();
    for (key, _) in &input.translations {
        assert!(rendered.contains(&string_literal(key)));
    }
});
