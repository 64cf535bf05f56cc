#![allow(clippy::unwrap_used, clippy::expect_used)]

use gridconf_core::codec::override_list::{is_override, NONE};
use gridconf_core::codec::{decode, encode, read_multiline_value, ListFormat, Record, RecordCodec};
use gridconf_core::model::ClusterQueueConfig;
use proptest::prelude::*;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_decode_overrides_keep_their_place() {
    let tokens = decode("pe1,p2,[host=p2],[master=pe1]", ListFormat::Comma).unwrap();
    assert_eq!(tokens, strings(&["pe1", "p2", "[host=p2]", "[master=pe1]"]));
    assert_eq!(encode(&tokens, ","), "pe1,p2,[host=p2],[master=pe1]");
}

#[test]
fn test_none_round_trip() {
    assert!(decode("NONE", ListFormat::Comma).unwrap().is_empty());
    assert!(decode("none", ListFormat::SpaceLeading).unwrap().is_empty());
    assert_eq!(encode::<String>(&[], ","), NONE);
}

#[test]
fn test_encode_moves_overrides_last() {
    let tokens = strings(&["[node1=4]", "1", "[@gpu=8]", "2"]);
    assert_eq!(encode(&tokens, " "), "1 2,[node1=4],[@gpu=8]");
}

#[test]
fn test_space_leading_format() {
    let tokens = decode("make mpi,[@gpu=mpi smp]", ListFormat::SpaceLeading).unwrap();
    assert_eq!(tokens, strings(&["make", "mpi", "[@gpu=mpi smp]"]));
}

#[test]
fn test_decode_then_mutate_then_encode() {
    let mut tokens = decode("[node1=mpi],mpi,smp", ListFormat::Comma).unwrap();
    tokens.retain(|t| t != "smp");
    tokens.push("hybrid".to_string());
    assert_eq!(encode(&tokens, ","), "mpi,hybrid,[node1=mpi]");
}

#[test]
fn test_folded_queue_attribute_decodes() {
    let lines = vec![
        "qname                 all.q".to_string(),
        "slots                 1,[node1=4], \\".to_string(),
        "                      [node2=8]".to_string(),
        "pe_list               make".to_string(),
    ];

    let (value, folded) = read_multiline_value(&lines, 1).unwrap();
    assert!(folded);

    let text = lines.join("\n");
    let record = Record::parse(&text).unwrap();
    let queue = ClusterQueueConfig::from_record(&record).unwrap();
    assert_eq!(queue.slots, strings(&["1", "[node1=4]", "[node2=8]"]));
    assert_eq!(
        decode(&value, ListFormat::Comma).unwrap(),
        queue.slots,
        "reader and record parser agree"
    );
}

fn plain_token() -> impl Strategy<Value = String> {
    "[a-z0-9_.@]{1,8}".prop_filter("NONE is reserved", |s| !s.eq_ignore_ascii_case(NONE))
}

fn override_token() -> impl Strategy<Value = String> {
    ("[a-z0-9@]{1,6}", "[a-z0-9]{1,6}").prop_map(|(scope, value)| format!("[{}={}]", scope, value))
}

fn token() -> impl Strategy<Value = String> {
    prop_oneof![3 => plain_token(), 1 => override_token()]
}

proptest! {
    #[test]
    fn prop_encode_decode_preserves_token_set(tokens in prop::collection::vec(token(), 0..8)) {
        let encoded = encode(&tokens, ",");
        let decoded = decode(&encoded, ListFormat::Comma).unwrap();

        let mut expected: Vec<String> = tokens.iter().filter(|t| !is_override(t)).cloned().collect();
        expected.extend(tokens.iter().filter(|t| is_override(t)).cloned());
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn prop_canonical_text_is_a_fixed_point(
        plain in prop::collection::vec(plain_token(), 0..5),
        overrides in prop::collection::vec(override_token(), 0..4),
    ) {
        let mut tokens = plain.clone();
        tokens.extend(overrides.iter().cloned());
        let text = encode(&tokens, ",");

        let again = encode(&decode(&text, ListFormat::Comma).unwrap(), ",");
        prop_assert_eq!(again, text);
    }
}
