// src/db/evaluations.rs
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

use crate::domain::{Assumptions, Evaluation, Flow, MarketStats, SubjectProperty};
use crate::errors::ServerError;

/// Most rows the history page ever shows.
pub const HISTORY_LIMIT: usize = 50;

/// One finished evaluation, as saved and as shown on its result page.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRecord {
    pub id: String,
    pub flow: Flow,
    pub subject: SubjectProperty,
    pub stats: MarketStats,
    pub evaluation: Evaluation,
    pub assumptions: Assumptions,
    /// Unix seconds.
    pub created_at: i64,
}

impl EvaluationRecord {
    pub fn new(
        flow: Flow,
        subject: SubjectProperty,
        stats: MarketStats,
        evaluation: Evaluation,
        assumptions: Assumptions,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            flow,
            subject,
            stats,
            evaluation,
            assumptions,
            created_at,
        }
    }
}

/// A history-page row.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSummary {
    pub id: String,
    pub flow: Flow,
    pub address: String,
    pub created_at: i64,
}

pub fn save_evaluation(
    conn: &Connection,
    session_hash: &[u8],
    record: &EvaluationRecord,
) -> Result<(), ServerError> {
    conn.execute(
        "insert into evaluations
            (id, session_hash, flow, address, property_data, market_stats,
             evaluation_data, assumptions, created_at)
         values (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            record.id,
            session_hash,
            record.flow.as_str(),
            record.subject.address,
            serde_json::to_string(&record.subject)?,
            serde_json::to_string(&record.stats)?,
            serde_json::to_string(&record.evaluation)?,
            serde_json::to_string(&record.assumptions)?,
            record.created_at,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert evaluation failed: {e}")))?;

    info!(id = %record.id, flow = record.flow.as_str(), "evaluation saved");
    Ok(())
}

/// The session's evaluations, newest first.
pub fn list_evaluations_for_session(
    conn: &Connection,
    session_hash: &[u8],
) -> Result<Vec<EvaluationSummary>, ServerError> {
    let mut stmt = conn.prepare(
        "select id, flow, address, created_at
         from evaluations
         where session_hash = ?
         order by created_at desc, rowid desc
         limit ?",
    )?;

    let rows = stmt.query_map(params![session_hash, HISTORY_LIMIT as i64], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, i64>(3)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, flow, address, created_at) = row?;
        out.push(EvaluationSummary {
            id,
            flow: parse_flow(&flow)?,
            address,
            created_at,
        });
    }
    Ok(out)
}

/// `None` when the id is unknown or belongs to another session.
pub fn get_evaluation(
    conn: &Connection,
    session_hash: &[u8],
    id: &str,
) -> Result<Option<EvaluationRecord>, ServerError> {
    let raw = conn
        .query_row(
            "select id, flow, property_data, market_stats, evaluation_data,
                    assumptions, created_at
             from evaluations
             where id = ? and session_hash = ?",
            params![id, session_hash],
            RawRecord::from_row,
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("evaluation lookup failed: {e}")))?;

    raw.map(RawRecord::decode).transpose()
}

/// Returns whether a row was removed. Other sessions' rows are never touched.
pub fn delete_evaluation(
    conn: &Connection,
    session_hash: &[u8],
    id: &str,
) -> Result<bool, ServerError> {
    let deleted = conn
        .execute(
            "delete from evaluations where id = ? and session_hash = ?",
            params![id, session_hash],
        )
        .map_err(|e| ServerError::DbError(format!("delete evaluation failed: {e}")))?;

    if deleted > 0 {
        info!(%id, "evaluation deleted");
    }
    Ok(deleted > 0)
}

struct RawRecord {
    id: String,
    flow: String,
    property_data: String,
    market_stats: String,
    evaluation_data: String,
    assumptions: String,
    created_at: i64,
}

impl RawRecord {
    fn from_row(r: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            flow: r.get(1)?,
            property_data: r.get(2)?,
            market_stats: r.get(3)?,
            evaluation_data: r.get(4)?,
            assumptions: r.get(5)?,
            created_at: r.get(6)?,
        })
    }

    fn decode(self) -> Result<EvaluationRecord, ServerError> {
        Ok(EvaluationRecord {
            flow: parse_flow(&self.flow)?,
            subject: serde_json::from_str(&self.property_data)?,
            stats: serde_json::from_str(&self.market_stats)?,
            evaluation: serde_json::from_str(&self.evaluation_data)?,
            assumptions: serde_json::from_str(&self.assumptions)?,
            id: self.id,
            created_at: self.created_at,
        })
    }
}

fn parse_flow(slug: &str) -> Result<Flow, ServerError> {
    Flow::from_slug(slug).ok_or_else(|| ServerError::DbError(format!("unknown flow '{slug}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_market_stats;
    use crate::auth::token::hash_token;
    use crate::db::connection::{init_db, Database};
    use crate::domain::{DemandLevel, FlowDetails, PricePosition};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_db() -> Database {
        let path = std::env::temp_dir().join(format!(
            "evaluations_test_{}.sqlite",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let db = Database::new(path);
        init_db(&db, "sql/schema.sql").expect("Failed to initialize DB");
        db
    }

    fn record(address: &str, created_at: i64) -> EvaluationRecord {
        let subject = SubjectProperty::with_address(address);
        let stats = compute_market_stats(&subject, &[]);
        let evaluation = Evaluation {
            summary: "Looks fine.".into(),
            price_position: PricePosition::Average,
            demand_level: DemandLevel::Balanced,
            red_flags: vec!["Limited market data".into()],
            green_flags: vec![],
            details: FlowDetails::Rent {
                estimated_rent: 2_500.0,
                condition: "Unknown".into(),
            },
        };
        EvaluationRecord::new(
            Flow::Rent,
            subject,
            stats,
            evaluation,
            Assumptions::default(),
            created_at,
        )
    }

    #[test]
    fn saved_record_round_trips() {
        let db = make_db();
        let owner = hash_token("owner");
        let saved = record("1 Main St", 1_700_000_000);

        let loaded = db
            .with_conn(|conn| {
                save_evaluation(conn, &owner, &saved)?;
                get_evaluation(conn, &owner, &saved.id)
            })
            .unwrap()
            .expect("record should exist");

        assert_eq!(loaded, saved);
    }

    #[test]
    fn other_sessions_cannot_read_or_delete() {
        let db = make_db();
        let owner = hash_token("owner");
        let stranger = hash_token("stranger");
        let saved = record("2 Main St", 1_700_000_000);

        db.with_conn(|conn| save_evaluation(conn, &owner, &saved))
            .unwrap();

        db.with_conn(|conn| {
            assert_eq!(get_evaluation(conn, &stranger, &saved.id)?, None);
            assert!(!delete_evaluation(conn, &stranger, &saved.id)?);
            assert!(list_evaluations_for_session(conn, &stranger)?.is_empty());

            assert!(get_evaluation(conn, &owner, &saved.id)?.is_some());
            assert!(delete_evaluation(conn, &owner, &saved.id)?);
            assert_eq!(get_evaluation(conn, &owner, &saved.id)?, None);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn history_is_newest_first() {
        let db = make_db();
        let owner = hash_token("owner");

        let older = record("Old Rd", 100);
        let newer = record("New Rd", 200);

        let listed = db
            .with_conn(|conn| {
                save_evaluation(conn, &owner, &older)?;
                save_evaluation(conn, &owner, &newer)?;
                list_evaluations_for_session(conn, &owner)
            })
            .unwrap();

        let addresses: Vec<_> = listed.iter().map(|s| s.address.as_str()).collect();
        assert_eq!(addresses, vec!["New Rd", "Old Rd"]);
        assert_eq!(listed[0].flow, Flow::Rent);
    }

    #[test]
    fn unknown_id_is_none() {
        let db = make_db();
        let owner = hash_token("owner");
        let found = db
            .with_conn(|conn| get_evaluation(conn, &owner, "does-not-exist"))
            .unwrap();
        assert_eq!(found, None);
    }
}
