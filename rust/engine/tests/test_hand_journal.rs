use std::fs;

use showdown_engine::evaluate;
use showdown_engine::game::Hand;
use showdown_engine::logger::{read_journal, HandLogger, HandRecord};
use showdown_engine::player::Player;

fn settled_record() -> HandRecord {
    let hand = Hand {
        hand_id: "journal-1".to_string(),
        stack_size: 1000,
        players: vec![
            Player::new(1, "BTN", "AhKh", 950),
            Player::new(2, "SB", "2d2c", 975),
            Player::new(3, "BB", "JsQd", 950),
        ],
        actions: "1:raise,50 2:fold 3:fold".to_string(),
        community_cards: String::new(),
        pot: 125,
        stack_info: String::new(),
        positions: String::new(),
        hole_cards: String::new(),
    };
    HandRecord::from_result(&evaluate(&hand).expect("settles"))
}

#[test]
fn writes_jsonl_with_lf_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hands.jsonl");
    let mut logger = HandLogger::create(&path).expect("create logger");
    logger.write(&settled_record()).expect("write");
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
}

#[test]
fn ts_is_generated_when_missing_and_preserved_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("hands.jsonl");
    let mut logger = HandLogger::create(&path).expect("create logger");
    let rec = settled_record();
    logger.write(&rec).expect("write");

    let preset = "2030-01-01T00:00:00Z".to_string();
    logger
        .write(&HandRecord {
            ts: Some(preset.clone()),
            ..rec
        })
        .expect("write2");

    let records = read_journal(&path).expect("read back");
    assert_eq!(records.len(), 2);
    assert!(records[0].ts.is_some(), "ts should be injected");
    assert_eq!(records[1].ts.as_deref(), Some(preset.as_str()));
}

#[test]
fn append_keeps_earlier_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hands.jsonl");
    HandLogger::create(&path)
        .unwrap()
        .write(&settled_record())
        .unwrap();
    HandLogger::append(&path)
        .unwrap()
        .write(&HandRecord {
            hand_id: "journal-2".to_string(),
            ..settled_record()
        })
        .unwrap();

    let records = read_journal(&path).unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.hand_id.as_str()).collect();
    assert_eq!(ids, vec!["journal-1", "journal-2"]);
    assert_eq!(records[0].actions, "1:raise,50:2:fold:3:fold");
    assert_eq!(
        records[0].winnings,
        "Player 1: +75; Player 2: -25; Player 3: -50"
    );
}

#[test]
fn corrupt_line_is_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hands.jsonl");
    fs::write(&path, "{\"hand_id\":\n").unwrap();
    let err = read_journal(&path).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}
