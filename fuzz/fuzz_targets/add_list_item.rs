#![no_main]

use libfuzzer_sys::fuzz_target;
use threadscribe_core::{LocaleConfig, ModifyError, indent_level};
use threadscribe_parser::ThreadParser;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let parser = ThreadParser::new(LocaleConfig::default()).unwrap();
        let Ok(threads) = parser.parse_threads(&threadscribe_html::parse_body(s)) else {
            return;
        };
        let count = threads.comments().count();

        for index in 0..count {
            // Every insertion gets a fresh tree.
            let body = threadscribe_html::parse_body(s);
            let Ok(threads) = parser.parse_threads(&body) else {
                return;
            };
            let Some(id) = threads.comments().nth(index) else {
                return;
            };
            match threadscribe_modifier::add_list_item(&threads, id) {
                Ok(item) => assert_eq!(indent_level(&item, &body), threads.item(id).level),
                Err(ModifyError::NotAComment) => panic!("comment {id:?} rejected"),
                Err(_) => {}
            }
        }
    }
});
