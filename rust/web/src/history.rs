use serde::{Deserialize, Serialize};
use showdown_engine::logger::{format_stack_info, read_journal, timestamp_now, HandLogger, HandRecord};
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::{Mutex, RwLock};
use thiserror::Error;
use tracing::{debug, info};

/// Storage for settled hands.
pub trait HandRepository: Send + Sync {
    /// Stores `record`, replacing any earlier record with the same hand id.
    fn save(&self, record: HandRecord) -> Result<HandRecord, HistoryError>;

    fn find_by_id(&self, hand_id: &str) -> Result<Option<HandRecord>, HistoryError>;

    /// Up to `limit` records, most recent first.
    fn recent(&self, limit: usize) -> Result<Vec<HandRecord>, HistoryError>;
}

/// In-memory hand history, optionally mirrored to a JSONL journal.
pub struct HistoryStore {
    hands: RwLock<Vec<HandRecord>>,
    journal: Option<Mutex<HandLogger>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            hands: RwLock::new(Vec::new()),
            journal: None,
        }
    }

    /// Loads the journal at `path` if it exists and appends every later save
    /// to it.
    pub fn open_journal<P: AsRef<Path>>(path: P) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        let loaded = match read_journal(path) {
            Ok(records) => records,
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(HistoryError::Journal(err)),
        };
        info!(path = %path.display(), hands = loaded.len(), "hand journal opened");

        let mut hands: Vec<HandRecord> = Vec::with_capacity(loaded.len());
        for record in loaded {
            // a re-submitted hand appears twice; the later line wins
            hands.retain(|h| h.hand_id != record.hand_id);
            hands.push(record);
        }

        let logger = HandLogger::append(path)?;
        Ok(Self {
            hands: RwLock::new(hands),
            journal: Some(Mutex::new(logger)),
        })
    }

    pub fn total_hands(&self) -> Result<usize, HistoryError> {
        let hands = self
            .hands
            .read()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        Ok(hands.len())
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("hands", &self.total_hands().ok())
            .field("journal", &self.journal.is_some())
            .finish()
    }
}

impl HandRepository for HistoryStore {
    fn save(&self, mut record: HandRecord) -> Result<HandRecord, HistoryError> {
        if record.ts.is_none() {
            record.ts = Some(timestamp_now());
        }

        let mut hands = self
            .hands
            .write()
            .map_err(|_| HistoryError::StoragePoisoned)?;

        // journal first so memory never holds a hand the file lacks
        if let Some(journal) = &self.journal {
            let mut logger = journal.lock().map_err(|_| HistoryError::StoragePoisoned)?;
            logger.write(&record)?;
        }

        hands.retain(|h| h.hand_id != record.hand_id);
        hands.push(record.clone());
        debug!(hand_id = %record.hand_id, total = hands.len(), "hand stored");
        Ok(record)
    }

    fn find_by_id(&self, hand_id: &str) -> Result<Option<HandRecord>, HistoryError> {
        let hands = self
            .hands
            .read()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        Ok(hands.iter().find(|h| h.hand_id == hand_id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<HandRecord>, HistoryError> {
        let hands = self
            .hands
            .read()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        Ok(hands.iter().rev().take(limit).cloned().collect())
    }
}

/// Entry of the recent-hands listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSummary {
    pub hand_id: String,
    pub stack_size: i64,
    pub positions: String,
    pub hands: Vec<String>,
    pub actions: String,
    pub winnings: String,
}

impl From<&HandRecord> for HandSummary {
    fn from(record: &HandRecord) -> Self {
        Self {
            hand_id: record.hand_id.clone(),
            stack_size: record.stack,
            positions: record.positions.clone(),
            hands: record.hands.clone(),
            actions: record.actions.clone(),
            winnings: record.winnings.clone(),
        }
    }
}

/// A single hand looked up by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandHistoryEntry {
    pub hand_id: String,
    /// `"Stack <n>"`
    pub stack_info: String,
    pub positions: String,
    /// Hole cards joined with `;`
    pub hands: String,
    /// The stored action string split on `:`
    pub actions: Vec<String>,
}

impl From<&HandRecord> for HandHistoryEntry {
    fn from(record: &HandRecord) -> Self {
        let actions = if record.actions.is_empty() {
            Vec::new()
        } else {
            record.actions.split(':').map(str::to_string).collect()
        };
        Self {
            hand_id: record.hand_id.clone(),
            stack_info: format_stack_info(record.stack),
            positions: record.positions.clone(),
            hands: record.hands.join(";"),
            actions,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryListResponse {
    pub hands: Vec<HandSummary>,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History storage poisoned")]
    StoragePoisoned,
    #[error("Hand with ID {0} not found")]
    NotFound(String),
    #[error("Hand journal error: {0}")]
    Journal(#[from] std::io::Error),
}

impl crate::errors::IntoErrorResponse for HistoryError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            HistoryError::StoragePoisoned | HistoryError::Journal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            HistoryError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            HistoryError::StoragePoisoned | HistoryError::Journal(_) => "history_storage_error",
            HistoryError::NotFound(_) => "hand_not_found",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn severity(&self) -> crate::errors::ErrorSeverity {
        use crate::errors::ErrorSeverity;
        match self {
            HistoryError::StoragePoisoned => ErrorSeverity::Critical,
            HistoryError::Journal(_) => ErrorSeverity::Server,
            HistoryError::NotFound(_) => ErrorSeverity::Client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn create_test_hand(hand_id: &str, ts: Option<&str>) -> HandRecord {
        HandRecord {
            hand_id: hand_id.to_string(),
            stack: 1000,
            positions: "Dealer: Player 1; Player 2 Small blind; Player 3 Big blind".to_string(),
            hands: vec!["AhKh".into(), "2d2c".into(), "JsQd".into()],
            actions: "1:raise,50:2:fold:3:fold".to_string(),
            winnings: "Player 1: +75; Player 2: -25; Player 3: -50".to_string(),
            ts: ts.map(String::from),
        }
    }

    #[test]
    fn test_save_and_find_hand() {
        let store = HistoryStore::new();
        let hand = create_test_hand("test-001", Some("2025-01-01T12:00:00Z"));

        let saved = store.save(hand.clone()).expect("save hand");
        assert_eq!(saved, hand);

        let found = store.find_by_id("test-001").expect("find hand");
        assert_eq!(found, Some(hand));
        assert_eq!(store.find_by_id("nonexistent").expect("find"), None);
    }

    #[test]
    fn save_stamps_missing_timestamp() {
        let store = HistoryStore::new();
        let saved = store.save(create_test_hand("t", None)).unwrap();
        assert!(saved.ts.is_some());
    }

    #[test]
    fn test_recent_hands_with_limit() {
        let store = HistoryStore::new();
        for i in 0..10 {
            store
                .save(create_test_hand(&format!("test-{:03}", i), None))
                .expect("save hand");
        }

        let recent = store.recent(5).expect("recent");
        assert_eq!(recent.len(), 5);
        // most recent first
        assert_eq!(recent[0].hand_id, "test-009");
        assert_eq!(recent[4].hand_id, "test-005");

        assert_eq!(store.recent(50).unwrap().len(), 10);
        assert!(store.recent(0).unwrap().is_empty());
    }

    #[test]
    fn resubmitted_hand_replaces_and_becomes_most_recent() {
        let store = HistoryStore::new();
        store.save(create_test_hand("a", None)).unwrap();
        store.save(create_test_hand("b", None)).unwrap();
        store
            .save(HandRecord {
                stack: 500,
                ..create_test_hand("a", None)
            })
            .unwrap();

        assert_eq!(store.total_hands().unwrap(), 2);
        let recent = store.recent(5).unwrap();
        assert_eq!(recent[0].hand_id, "a");
        assert_eq!(recent[0].stack, 500);
    }

    #[test]
    fn views_reshape_the_record() {
        let record = create_test_hand("view", None);

        let summary = HandSummary::from(&record);
        assert_eq!(summary.stack_size, 1000);
        assert_eq!(summary.hands.len(), 3);

        let entry = HandHistoryEntry::from(&record);
        assert_eq!(entry.stack_info, "Stack 1000");
        assert_eq!(entry.hands, "AhKh;2d2c;JsQd");
        assert_eq!(
            entry.actions,
            vec!["1", "raise,50", "2", "fold", "3", "fold"]
        );

        let empty = HandHistoryEntry::from(&HandRecord {
            actions: String::new(),
            ..record
        });
        assert!(empty.actions.is_empty());
    }

    #[test]
    fn journal_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hands.jsonl");
        {
            let store = HistoryStore::open_journal(&path).expect("open new journal");
            assert_eq!(store.total_hands().unwrap(), 0);
            store.save(create_test_hand("j-1", None)).unwrap();
            store.save(create_test_hand("j-2", None)).unwrap();
            store.save(create_test_hand("j-1", None)).unwrap();
        }

        let reopened = HistoryStore::open_journal(&path).expect("reopen journal");
        assert_eq!(reopened.total_hands().unwrap(), 2);
        let ids: Vec<String> = reopened
            .recent(5)
            .unwrap()
            .into_iter()
            .map(|h| h.hand_id)
            .collect();
        assert_eq!(ids, vec!["j-1", "j-2"]);
    }

    #[test]
    fn corrupt_journal_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hands.jsonl");
        fs::write(&path, "not json\n").unwrap();
        assert!(matches!(
            HistoryStore::open_journal(&path),
            Err(HistoryError::Journal(_))
        ));
    }

    #[test]
    fn not_found_message() {
        assert_eq!(
            HistoryError::NotFound("abc".into()).to_string(),
            "Hand with ID abc not found"
        );
    }
}
