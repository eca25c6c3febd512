//! Snapshot round-trip law and corrupt-input handling.

use proptest::prelude::*;
use volvelle::{ChecksumVariant, Error, Session, SessionParams};

const SYMBOLS: &str = "QPZRY9X8GF2TVDW0S3JN54KHCE6MUA7L";

fn params() -> impl Strategy<Value = SessionParams> {
    (
        prop_oneof![Just("ms"), Just("ex"), Just("tb"), Just("bc")],
        2u8..=9,
        prop_oneof![Just(128u16), Just(136), Just(256)],
        prop_oneof![Just(ChecksumVariant::Bech32), Just(ChecksumVariant::Codex32)],
    )
        .prop_map(|(hrp, k, bits, v)| SessionParams::new(hrp, k, bits, v).unwrap())
}

/// Per share: a list of (editable position, symbol or clear).
fn edits() -> impl Strategy<Value = Vec<Vec<(usize, Option<char>)>>> {
    let symbol = prop::sample::select(SYMBOLS.chars().collect::<Vec<_>>());
    let edit = (0usize..200, prop::option::weighted(0.9, symbol));
    prop::collection::vec(prop::collection::vec(edit, 0..50), 0..4)
}

fn build(params: SessionParams, edits: &[Vec<(usize, Option<char>)>]) -> Session {
    let mut session = Session::new(params).unwrap();
    for share_edits in edits {
        let share = session.new_share();
        let ids: Vec<String> = session
            .worksheet_cells(share)
            .unwrap()
            .into_iter()
            .filter(|c| c.kind.is_editable())
            .map(|c| c.id.to_string())
            .collect();
        for (pos, value) in share_edits {
            let value = value.map(String::from).unwrap_or_default();
            session
                .handle_input_change(&ids[pos % ids.len()], &value)
                .unwrap();
        }
    }
    session
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// deserialize(serialize(s)) keeps parameters and every displayed value.
    #[test]
    fn prop_round_trip(params in params(), edits in edits()) {
        let session = build(params, &edits);
        let snapshot = session.serialize().unwrap();
        let back = Session::deserialize(&snapshot).unwrap();
        prop_assert_eq!(back.params(), session.params());
        prop_assert_eq!(back.share_count(), session.share_count());
        for share in 0..session.share_count() {
            prop_assert_eq!(
                back.worksheet_cells(share).unwrap(),
                session.worksheet_cells(share).unwrap()
            );
            prop_assert_eq!(back.is_valid(share).unwrap(), session.is_valid(share).unwrap());
        }
        // Serialization is stable across a round trip.
        prop_assert_eq!(back.serialize().unwrap(), snapshot);
    }
}

#[test]
fn round_trip_of_a_complete_share() {
    let params = SessionParams::new("ms", 2, 128, ChecksumVariant::Codex32).unwrap();
    let mut session = Session::new(params).unwrap();
    session.new_share();
    let data = "2NAMEA320ZYXWVUTSRQPNMLKJHGFEDCAXRPP870HKKQRM";
    let mut ids: Vec<_> = session
        .worksheet_cells(0)
        .unwrap()
        .into_iter()
        .filter(|c| c.kind.is_editable())
        .collect();
    ids.sort_by_key(|c| c.x);
    for (cell, c) in ids.iter().zip(data.chars()) {
        session
            .handle_input_change(&cell.id.to_string(), &c.to_string())
            .unwrap();
    }
    let back = Session::deserialize(&session.serialize().unwrap()).unwrap();
    assert_eq!(back.is_valid(0).unwrap(), Some(true));
    assert_eq!(
        back.share_string(0).unwrap(),
        "MS12NAMEA320ZYXWVUTSRQPNMLKJHGFEDCAXRPP870HKKQRM"
    );
}

#[test]
fn empty_session_round_trips() {
    let params = SessionParams::new("ex", 3, 256, ChecksumVariant::Bech32).unwrap();
    let session = Session::new(params).unwrap();
    let back = Session::deserialize(&session.serialize().unwrap()).unwrap();
    assert_eq!(back.share_count(), 0);
    assert_eq!(back.params(), session.params());
}

#[test]
fn foreign_json_is_corrupt() {
    for input in [
        "",
        "[]",
        r#"{"format":"volvelle-session"}"#,
        r#"{"format":"volvelle-session","version":1,"hrp":"ms","threshold":2,"bits":128,"variant":"base58","next_share":0,"shares":[]}"#,
        r#"{"format":"volvelle-session","version":1,"hrp":"ms","threshold":2,"bits":128,"variant":"codex32","next_share":0,"shares":[],"extra":true}"#,
    ] {
        assert!(
            matches!(Session::deserialize(input), Err(Error::CorruptSnapshot { .. })),
            "{input}"
        );
    }
}
