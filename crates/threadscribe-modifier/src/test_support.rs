use threadscribe_core::{LocaleConfig, Threads};
use threadscribe_html::{RcNode, parse_body};
use threadscribe_parser::ThreadParser;

/// Signed line for user `user` at `time` on 1 May 2021.
pub fn sig(user: &str, time: &str) -> String {
    format!(r#"<a href="./User:{user}">{user}</a> {time}, 1 May 2021 (UTC)"#)
}

pub fn parse(html: &str) -> (RcNode, Threads<RcNode>) {
    let body = parse_body(html);
    let parser = ThreadParser::new(LocaleConfig::default()).unwrap();
    let threads = parser.parse_threads(&body).unwrap();
    (body, threads)
}
