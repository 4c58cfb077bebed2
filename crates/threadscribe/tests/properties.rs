//! End-to-end properties of parsing and reply insertion on html5ever trees.

use pretty_assertions::assert_eq;
use threadscribe::html::{RcNode, parse_body, serialize_inner};
use threadscribe::modifier::{add_list_item, unwrap_list};
use threadscribe::parser::{ThreadParser, TimestampMatcher};
use threadscribe::prelude::*;
use threadscribe::{closest_element, indent_level};

fn sig(user: &str, time: &str) -> String {
    format!(r#"<a href="./User:{user}">{user}</a> (<a href="./User_talk:{user}">talk</a>) {time}, 1 May 2021 (UTC)"#)
}

fn parse(html: &str) -> (RcNode, Threads<RcNode>) {
    let body = parse_body(html);
    let parser = ThreadParser::new(LocaleConfig::default()).unwrap();
    let threads = parser.parse_threads(&body).unwrap();
    (body, threads)
}

fn by_author(threads: &Threads<RcNode>, author: &str) -> ItemId {
    threads
        .comments()
        .find(|&id| threads.item(id).author() == Some(author))
        .unwrap()
}

fn discussion() -> String {
    format!(
        concat!(
            "<h2>Proposal</h2>",
            "<p>Let us rename the page. {}</p>",
            "<dl><dd>Support. {}",
            "<dl><dd>Why? {}",
            "<dl><dd>Because. {}</dd></dl></dd></dl></dd>",
            "<dd>Oppose. {}</dd></dl>",
            "<ul><li>Comment. {}</li></ul>",
            "<h2>Other</h2>",
            "<p>Unrelated. {}</p>",
        ),
        sig("Alice", "10:00"),
        sig("Bob", "11:00"),
        sig("Carol", "12:00"),
        sig("Bob", "13:00"),
        sig("Dave", "14:00"),
        sig("Erin", "15:00"),
        sig("Frank", "16:00"),
    )
}

#[test]
fn test_reply_depth_matches_comment_level() {
    let html = discussion();
    let (_, threads) = parse(&html);
    let count = threads.comments().count();
    assert_eq!(count, 7);

    for index in 0..count {
        // Each insertion mutates the tree, so start from a fresh page.
        let (body, threads) = parse(&html);
        let id = threads.comments().nth(index).unwrap();
        let item = add_list_item(&threads, id).unwrap();
        assert_eq!(
            indent_level(&item, &body),
            threads.item(id).level,
            "reply to {:?}",
            threads.item(id).id
        );
    }
}

#[test]
fn test_reply_after_whole_subtree() {
    let html = format!(
        "<h2>T</h2><p>A {}</p><dl><dd>B {}<dl><dd>C {}</dd></dl></dd></dl>",
        sig("A", "10:00"),
        sig("B", "11:00"),
        sig("C", "12:00"),
    );
    let (body, threads) = parse(&html);
    let a = by_author(&threads, "A");
    let item = add_list_item(&threads, a).unwrap();

    let b_item = closest_element(
        &threads.item(by_author(&threads, "B")).range.end_container,
        &["dd"],
    )
    .unwrap();
    assert_eq!(b_item.next_sibling(), Some(item.clone()));
    assert_eq!(indent_level(&item, &body), 1);

    // The empty item adds no comments.
    let (_, reparsed) = parse(&serialize_inner(&body));
    assert_eq!(reparsed.comments().count(), 3);
}

#[test]
fn test_thread_shape() {
    let (_, threads) = parse(&discussion());
    let headings = threads.headings();
    assert_eq!(headings.len(), 2);

    let alice = by_author(&threads, "Alice");
    assert_eq!(threads.item(headings[0]).replies, vec![alice]);
    let authors = threads.authors_below(headings[0]);
    assert_eq!(authors, vec!["Alice", "Bob", "Carol", "Dave", "Erin"]);
    assert_eq!(threads.heading_of(by_author(&threads, "Frank")), Some(headings[1]));

    let erin = threads.item(by_author(&threads, "Erin"));
    assert_eq!(erin.level, 2);
    assert_eq!(erin.parent, Some(alice));
}

#[test]
fn test_unwrapped_list_has_same_text() {
    let html = format!(
        "<h2>T</h2><p>A {}</p><dl><dd>B {}</dd><dd>C {}</dd></dl>",
        sig("A", "10:00"),
        sig("B", "11:00"),
        sig("C", "12:00"),
    );
    let (body, _) = parse(&html);
    let before = body.text_content();
    let list = body.children()[2].clone();
    unwrap_list(&list).unwrap();

    let (body, threads) = parse(&serialize_inner(&body));
    assert_eq!(body.text_content(), before);
    for id in threads.comments() {
        let item = threads.item(id);
        assert_eq!(item.level, 1, "{:?}", item.id);
        assert_eq!(closest_element(&item.range.end_container, &["dl", "ul", "ol"]), None);
    }
}

#[test]
fn test_unwrap_is_noop_for_transcluded_list() {
    let html = format!(
        r##"<h2>T</h2><p>A {}</p><dl about="#mwt3" typeof="mw:Transclusion"><dd>B {}</dd></dl>"##,
        sig("A", "10:00"),
        sig("B", "11:00"),
    );
    let (body, _) = parse(&html);
    let before = serialize_inner(&body);
    let list = body.children()[2].clone();
    unwrap_list(&list).unwrap();
    unwrap_list(&list).unwrap();
    assert_eq!(serialize_inner(&body), before);
}

#[test]
fn test_documented_timestamp_example() {
    let config = LocaleConfig::default();
    assert_eq!(config.date_format, "H:i, j F Y");
    let matcher = TimestampMatcher::new(&config).unwrap();
    let text = "Signed 14:32, 3 June 2021 (UTC) here";
    let found = matcher.find(text).unwrap();
    assert_eq!(
        text.chars().skip(found.start).take(found.end - found.start).collect::<String>(),
        "14:32, 3 June 2021 (UTC)"
    );
    let timestamp = matcher.parse(&found).unwrap();
    assert_eq!(timestamp.to_iso(), "2021-06-03T14:32:00.000Z");
    assert_eq!(timestamp.warning, None);
}

#[test]
fn test_two_signatures_in_one_item() {
    let html = format!(
        "<h2>T</h2><p>Q {}</p><dl><dd>First. {} Also. {}</dd></dl>",
        sig("A", "10:00"),
        sig("B", "11:00"),
        sig("B", "11:30"),
    );
    let (_, threads) = parse(&html);
    let bobs: Vec<_> = threads
        .comments()
        .filter(|&id| threads.item(id).author() == Some("B"))
        .collect();
    assert_eq!(bobs.len(), 1);
    let comment = threads.item(bobs[0]).as_comment().unwrap();
    assert_eq!(comment.signature_ranges.len(), 2);
}

#[test]
fn test_unsigned_timestamp_beyond_scan_limit_dropped() {
    let config = LocaleConfig {
        signature_scan_limit: 20,
        ..LocaleConfig::default()
    };
    let html = format!(
        "<h2>T</h2><p><a href=\"./User:A\">A</a> <b>{}</b> 10:00, 1 May 2021 (UTC)</p>",
        "a long aside that pushes the link out of reach"
    );
    let body = parse_body(&html);
    let parser = ThreadParser::new(config).unwrap();
    let threads = parser.parse_threads(&body).unwrap();
    assert_eq!(threads.comments().count(), 0);
    assert_eq!(threads.items().len(), 1);
}

#[test]
fn test_dst_fall_back_resolution() {
    let config: LocaleConfig = serde_json::from_str(
        r#"{"local_timezone": "America/New_York", "timezones": {"EDT": "EDT", "EST": "EST", "PST": "PST"}}"#,
    )
    .unwrap();
    let parser = ThreadParser::new(config).unwrap();
    let page = |abbr: &str| {
        format!(r#"<h2>T</h2><p><a href="./User:A">A</a> 01:30, 1 November 2020 ({abbr})</p>"#)
    };

    let mut results = Vec::new();
    for abbr in ["EDT", "EST", "PST"] {
        let body = parse_body(&page(abbr));
        let threads = parser.parse_threads(&body).unwrap();
        let id = threads.comments().next().unwrap();
        let item = threads.item(id);
        let comment = item.as_comment().unwrap();
        results.push((comment.timestamp.to_iso(), item.warnings.clone()));
    }

    assert_eq!(results[0], ("2020-11-01T05:30:00.000Z".to_string(), vec![]));
    assert_eq!(
        results[1],
        (
            "2020-11-01T06:30:00.000Z".to_string(),
            vec![ItemWarning::Timestamp(threadscribe::TimestampWarning::AmbiguousDst)]
        )
    );
    assert_eq!(
        results[2],
        (
            "2020-11-01T06:30:00.000Z".to_string(),
            vec![ItemWarning::Timestamp(threadscribe::TimestampWarning::WrongAbbreviation)]
        )
    );
}

#[test]
fn test_impossible_date_keeps_rest_of_page() {
    let html = format!(
        concat!(
            "<h2>T</h2><p>Valid. {}</p>",
            r#"<dl><dd>Typo. <a href="./User:Bob">Bob</a> 12:00, 31 February 2021 (UTC)</dd></dl>"#,
            "<dl><dd>Later. {}</dd></dl>",
        ),
        sig("Alice", "10:00"),
        sig("Carol", "11:00"),
    );
    let (_, threads) = parse(&html);
    let authors: Vec<_> = threads
        .comments()
        .filter_map(|id| threads.item(id).author())
        .collect();
    assert_eq!(authors, vec!["Alice", "Carol"]);
    assert!(threads.find_comment_by_id("Alice|2021-05-01T10:00:00.000Z|0").is_some());
}
