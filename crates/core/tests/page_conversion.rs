//! End-to-end conversion of page documents.

use proptest::prelude::*;
use railens_core::document::TreeNavigation;
use railens_core::{ConversionSession, DocumentNode, Preferences, SegmentTree};

fn prefs(base: &str, rates: &[(&str, &str)], currencies: &[&str]) -> Preferences {
    let mut prefs = Preferences {
        enabled: true,
        base_rate: base.to_string(),
        supported_currencies: currencies.iter().map(|c| c.to_string()).collect(),
        ..Preferences::default()
    };
    for (code, rate) in rates {
        prefs.rates.insert(code.to_string(), rate.to_string());
    }
    prefs
}

fn convert(json: &str, prefs: &Preferences) -> SegmentTree {
    let mut tree = SegmentTree::from_json(json).unwrap();
    let mut session = ConversionSession::new(prefs).unwrap();
    session.start(&mut tree);
    tree
}

fn texts(tree: &SegmentTree) -> Vec<String> {
    tree.text_segments(tree.root())
        .into_iter()
        .filter_map(|id| tree.text(id).map(str::to_string))
        .collect()
}

#[test]
fn test_plain_price() {
    let tree = convert(
        r#"{"tag":"body","children":[{"tag":"p","children":[{"text":"Price: $1,234.56"}]}]}"#,
        &prefs("2", &[("usd", "2")], &["usd"]),
    );
    assert_eq!(texts(&tree), vec!["Price: 617.28 RAI"]);
}

#[test]
fn test_joined_notation() {
    let tree = convert(
        r#"{"tag":"body","children":[{"text":"$2.94k"}]}"#,
        &prefs("0.5", &[("usd", "0.5")], &["usd"]),
    );
    assert_eq!(texts(&tree), vec!["5,880.00 RAI"]);
}

#[test]
fn test_tiny_amounts_are_clamped() {
    let tree = convert(
        r#"{"tag":"body","children":[{"tag":"p","children":[{"text":"$0.01"}]},{"tag":"p","children":[{"text":"-0.01 USD"}]}]}"#,
        &prefs("1000", &[], &["usd"]),
    );
    assert_eq!(texts(&tree), vec!["<0.01 RAI", ">-0.01 RAI"]);
}

#[test]
fn test_split_integer_and_fraction() {
    let json = r#"{"tag":"body","children":[{"tag":"div","children":[
        {"tag":"span","children":[{"text":"$"}]},
        {"tag":"b","children":[{"text":"6"}]},
        {"tag":"b","children":[{"text":"66"}]}
    ]}]}"#;
    let tree = convert(json, &prefs("1", &[], &["usd"]));
    assert_eq!(texts(&tree), vec!["", "6.66 RAI", ""]);
}

#[test]
fn test_magnitude_words() {
    let tree = convert(
        r#"{"tag":"body","children":[{"text":"Raised 3 million USD"}]}"#,
        &prefs("2", &[], &["usd"]),
    );
    assert_eq!(texts(&tree), vec!["Raised 1,500,000.00 RAI"]);
}

#[test]
fn test_first_supported_currency_wins() {
    // "5 $" is a dollar amount, but with an unknown code first the dollar
    // patterns are borrowed under that code's rate
    let json = r#"{"tag":"body","children":[{"text":"5 $"}]}"#;
    let tree = convert(json, &prefs("1", &[("xyz", "5"), ("usd", "1")], &["xyz", "usd"]));
    assert_eq!(texts(&tree), vec!["1.00 RAI"]);

    let tree = convert(json, &prefs("1", &[("xyz", "5"), ("usd", "1")], &["usd", "xyz"]));
    assert_eq!(texts(&tree), vec!["5.00 RAI"]);
}

#[test]
fn test_avoided_tags_are_untouched() {
    let json = r#"{"tag":"body","children":[
        {"tag":"textarea","children":[{"text":"$5"}]},
        {"tag":"style","children":[{"text":"$5"}]},
        {"tag":"em","children":[{"text":"$5"}]}
    ]}"#;
    let tree = convert(json, &prefs("1", &[], &["usd"]));
    assert_eq!(texts(&tree), vec!["$5", "$5", "5.00 RAI"]);
}

#[test]
fn test_document_round_trip_after_conversion() {
    let tree = convert(
        r#"{"tag":"body","children":[{"tag":"p","children":[{"text":"Only 7.77 Dollars"}]}]}"#,
        &prefs("1", &[], &["usd"]),
    );
    assert_eq!(
        tree.to_document(),
        DocumentNode::element(
            "body",
            vec![DocumentNode::element(
                "p",
                vec![DocumentNode::text("Only 7.77 RAI")]
            )]
        )
    );
}

#[test]
fn test_out_of_range_magnitude_is_left_as_written() {
    let tree = convert(
        r#"{"tag":"body","children":[{"text":"Debt: $70000000000000000000000000b"},{"text":"$4"}]}"#,
        &prefs("1", &[], &["usd"]),
    );
    assert_eq!(
        texts(&tree),
        vec!["Debt: $70000000000000000000000000b", "4.00 RAI"]
    );
}

#[test]
fn test_marker_with_magnitude_word_in_next_segment() {
    let tree = convert(
        r#"{"tag":"body","children":[{"tag":"span","children":[{"text":"$"}]},{"text":" 3 million"}]}"#,
        &prefs("1", &[], &["usd"]),
    );
    assert_eq!(texts(&tree), vec!["", " 3,000,000.00 RAI"]);
}

#[test]
fn test_capital_letter_word_is_not_a_magnitude() {
    let tree = convert(
        r#"{"tag":"body","children":[{"text":"$5 M&A fee"}]}"#,
        &prefs("1", &[], &["usd"]),
    );
    assert_eq!(texts(&tree), vec!["5.00 RAI M&A fee"]);
}

fn arb_fragment() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("$"),
        Just("USD"),
        Just("€"),
        Just("dollars"),
        Just("5"),
        Just("12.50"),
        Just("1,234.56"),
        Just("2.94k"),
        Just("3 million"),
        Just("RAI"),
        Just("price:"),
        Just("and"),
    ]
}

fn arb_paragraph() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(arb_fragment(), 1..6),
        prop::bool::ANY,
    )
        .prop_map(|(fragments, spaced)| fragments.join(if spaced { " " } else { "" }))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Scanning converted output again changes nothing.
    #[test]
    fn prop_scan_is_idempotent(paragraphs in prop::collection::vec(arb_paragraph(), 1..5)) {
        let document = DocumentNode::element(
            "body",
            paragraphs
                .iter()
                .map(|text| DocumentNode::element("p", vec![DocumentNode::text(text)]))
                .collect(),
        );
        let prefs = prefs("2", &[("eur", "3")], &["usd", "eur"]);

        let mut tree = SegmentTree::from_document(&document).unwrap();
        let mut session = ConversionSession::new(&prefs).unwrap();
        session.start(&mut tree);
        let once = tree.to_document();

        let mut again = SegmentTree::from_document(&once).unwrap();
        let mut fresh = ConversionSession::new(&prefs).unwrap();
        fresh.start(&mut again);
        prop_assert_eq!(again.to_document(), once);
    }
}
