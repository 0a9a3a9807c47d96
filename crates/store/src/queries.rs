//! Append-only recent-query log
//!
//! Backs the recent-queries listing on the HTTP surface. Append-only,
//! in-memory, newest-first reads; substitutable by any persistent list
//! store without touching callers.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use advisor_config::constants::queries::{DEFAULT_LOAN_TYPE, RECENT_LIMIT};

/// One logged query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub id: String,
    pub query: String,
    pub loan_type: String,
    pub timestamp: DateTime<Utc>,
}

/// In-memory append-only query log
#[derive(Default)]
pub struct QueryLog {
    records: RwLock<Vec<QueryRecord>>,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query. An empty loan type is recorded as the default.
    pub fn record(&self, query: &str, loan_type: &str) -> QueryRecord {
        let loan_type = if loan_type.trim().is_empty() {
            DEFAULT_LOAN_TYPE
        } else {
            loan_type.trim()
        };
        let record = QueryRecord {
            id: Uuid::new_v4().to_string(),
            query: query.to_string(),
            loan_type: loan_type.to_string(),
            timestamp: Utc::now(),
        };
        self.records.write().push(record.clone());
        record
    }

    /// Newest-first listing, capped at the recent limit
    pub fn recent(&self) -> Vec<QueryRecord> {
        let records = self.records.read();
        records.iter().rev().take(RECENT_LIMIT).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
