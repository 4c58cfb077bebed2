#![no_main]

use libfuzzer_sys::fuzz_target;
use threadscribe_core::LocaleConfig;
use threadscribe_parser::ThreadParser;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let body = threadscribe_html::parse_body(s);
        let parser = ThreadParser::new(LocaleConfig::default()).unwrap();
        // Impossible dates drop their signature instead of failing the page.
        if let Ok(threads) = parser.parse_threads(&body) {
            for id in threads.comments() {
                let item = threads.item(id);
                assert!(item.id.is_some(), "comment without id");
                if let Some(parent) = item.parent {
                    assert!(threads.item(parent).replies.contains(&id));
                }
            }
        }
    }
});
