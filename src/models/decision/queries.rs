use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, params};

use super::types::*;
use crate::errors::{AppError, is_unique_violation};
use crate::models::project;
use crate::models::user::User;

const URGENCIES: [&str; 3] = ["low", "medium", "high"];

fn row_to_decision(row: &rusqlite::Row<'_>) -> rusqlite::Result<Decision> {
    let kind_str: String = row.get("kind")?;
    let status_str: String = row.get("status")?;
    Ok(Decision {
        id: row.get("id")?,
        kind: DecisionKind::parse(&kind_str).unwrap_or(DecisionKind::Poll),
        project_id: row.get("project_id")?,
        creator_id: row.get("creator_id")?,
        title: row.get("title")?,
        context: row.get("context")?,
        urgency: row.get("urgency")?,
        status: DecisionStatus::parse(&status_str).unwrap_or(DecisionStatus::Open),
        winning_choice_id: row.get("winning_choice_id")?,
        staff_decider_id: row.get("staff_decider_id")?,
        created_at: row.get("created_at")?,
        resolved_at: row.get("resolved_at")?,
    })
}

fn row_to_choice(row: &rusqlite::Row<'_>) -> rusqlite::Result<Choice> {
    Ok(Choice {
        id: row.get("id")?,
        decision_id: row.get("decision_id")?,
        label: row.get("label")?,
        position: row.get("position")?,
    })
}

fn row_to_ballot(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ballot> {
    Ok(Ballot {
        id: row.get("id")?,
        decision_id: row.get("decision_id")?,
        choice_id: row.get("choice_id")?,
        voter_id: row.get("voter_id")?,
        cast_at: row.get("cast_at")?,
    })
}

const DECISION_COLUMNS: &str = "id, kind, project_id, creator_id, title, context, urgency, \
     status, winning_choice_id, staff_decider_id, created_at, resolved_at";

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Decision>, AppError> {
    let decision = conn
        .query_row(
            &format!("SELECT {DECISION_COLUMNS} FROM decisions WHERE id = ?1"),
            params![id],
            row_to_decision,
        )
        .optional()?;
    Ok(decision)
}

pub fn choices_for(conn: &Connection, decision_id: i64) -> Result<Vec<Choice>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, decision_id, label, position
         FROM decision_choices WHERE decision_id = ?1 ORDER BY position",
    )?;
    let choices = stmt
        .query_map(params![decision_id], row_to_choice)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(choices)
}

pub fn find_detail(conn: &Connection, id: i64) -> Result<Option<DecisionDetail>, AppError> {
    let Some(decision) = find_by_id(conn, id)? else {
        return Ok(None);
    };
    let choices = choices_for(conn, id)?;
    Ok(Some(DecisionDetail { decision, choices }))
}

/// List decisions, newest first, with optional project / status / kind filters.
pub fn list(conn: &Connection, filter: &DecisionFilter) -> Result<Vec<Decision>, AppError> {
    let mut sql = format!("SELECT {DECISION_COLUMNS} FROM decisions WHERE 1=1");
    let mut bind: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(project_id) = filter.project_id {
        sql.push_str(&format!(" AND project_id = ?{}", bind.len() + 1));
        bind.push(Box::new(project_id));
    }
    if let Some(status) = filter.status.as_deref() {
        let status = DecisionStatus::parse(status)
            .ok_or_else(|| AppError::Validation(format!("Unknown status '{status}'")))?;
        sql.push_str(&format!(" AND status = ?{}", bind.len() + 1));
        bind.push(Box::new(status.as_str()));
    }
    if let Some(kind) = filter.kind.as_deref() {
        let kind = DecisionKind::parse(kind)
            .ok_or_else(|| AppError::Validation(format!("Unknown kind '{kind}'")))?;
        sql.push_str(&format!(" AND kind = ?{}", bind.len() + 1));
        bind.push(Box::new(kind.as_str()));
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let decisions = stmt
        .query_map(rusqlite::params_from_iter(bind.iter().map(|value| value.as_ref())), row_to_decision)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(decisions)
}

/// Create a decision with its choices in one transaction. A reader can
/// never observe the decision without its full choice set.
pub fn create(
    conn: &mut Connection,
    creator_id: i64,
    input: &NewDecision,
) -> Result<DecisionDetail, AppError> {
    if input.choices.len() < 2 {
        return Err(AppError::Validation(
            "A decision needs at least 2 choices".to_string(),
        ));
    }
    if input.kind == DecisionKind::Dispute && input.choices.len() != 2 {
        return Err(AppError::Validation(
            "A dispute is between exactly 2 parties".to_string(),
        ));
    }
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("Title must not be empty".to_string()));
    }
    let urgency = input.urgency.as_deref().unwrap_or("medium");
    if !URGENCIES.contains(&urgency) {
        return Err(AppError::Validation(format!("Unknown urgency '{urgency}'")));
    }
    if !project::exists(conn, input.project_id)? {
        return Err(AppError::NotFound("Project"));
    }

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO decisions (kind, project_id, creator_id, title, context, urgency)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            input.kind.as_str(),
            input.project_id,
            creator_id,
            input.title,
            input.context,
            urgency,
        ],
    )?;
    let decision_id = tx.last_insert_rowid();

    for (position, label) in input.choices.iter().enumerate() {
        tx.execute(
            "INSERT INTO decision_choices (decision_id, label, position) VALUES (?1, ?2, ?3)",
            params![decision_id, label, position as i64],
        )?;
    }
    tx.commit()?;

    find_detail(conn, decision_id)?.ok_or(AppError::NotFound("Decision"))
}

fn choice_belongs(conn: &Connection, decision_id: i64, choice_id: i64) -> Result<bool, AppError> {
    let found: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM decision_choices WHERE id = ?1 AND decision_id = ?2",
        params![choice_id, decision_id],
        |row| row.get(0),
    )?;
    Ok(found)
}

pub fn find_ballot(
    conn: &Connection,
    decision_id: i64,
    voter_id: i64,
) -> Result<Option<Ballot>, AppError> {
    let ballot = conn
        .query_row(
            "SELECT id, decision_id, choice_id, voter_id, cast_at
             FROM ballots WHERE decision_id = ?1 AND voter_id = ?2",
            params![decision_id, voter_id],
            row_to_ballot,
        )
        .optional()?;
    Ok(ballot)
}

/// Cast a ballot. Preconditions are checked in order inside one
/// transaction; first failure wins. The UNIQUE(decision_id, voter_id)
/// index remains the authoritative duplicate guard, so two concurrent
/// casts by the same voter can never both commit.
pub fn cast_ballot(
    conn: &mut Connection,
    decision_id: i64,
    voter_id: i64,
    choice_id: i64,
) -> Result<Ballot, AppError> {
    let tx = conn.transaction()?;

    let status: Option<String> = tx
        .query_row(
            "SELECT status FROM decisions WHERE id = ?1",
            params![decision_id],
            |row| row.get(0),
        )
        .optional()?;
    let status = status.ok_or(AppError::NotFound("Decision"))?;
    let status = DecisionStatus::parse(&status).unwrap_or(DecisionStatus::Open);
    if status.is_terminal() {
        return Err(AppError::InvalidState(
            "Voting is closed for this decision".to_string(),
        ));
    }
    if !choice_belongs(&tx, decision_id, choice_id)? {
        return Err(AppError::Validation(
            "Choice does not belong to this decision".to_string(),
        ));
    }
    // Fast path; the unique index below is what actually prevents the race.
    if find_ballot(&tx, decision_id, voter_id)?.is_some() {
        return Err(AppError::Conflict(
            "You already voted on this decision".to_string(),
        ));
    }

    let inserted = tx.execute(
        "INSERT INTO ballots (decision_id, choice_id, voter_id) VALUES (?1, ?2, ?3)",
        params![decision_id, choice_id, voter_id],
    );
    if let Err(e) = inserted {
        if is_unique_violation(&e) {
            return Err(AppError::Conflict(
                "You already voted on this decision".to_string(),
            ));
        }
        return Err(e.into());
    }
    let ballot_id = tx.last_insert_rowid();

    let ballot = tx.query_row(
        "SELECT id, decision_id, choice_id, voter_id, cast_at FROM ballots WHERE id = ?1",
        params![ballot_id],
        row_to_ballot,
    )?;
    tx.commit()?;
    Ok(ballot)
}

/// Per-choice ballot counts. Pure read; choices nobody voted for are
/// absent from the map, so read endpoints merge with `choices_for` to
/// report explicit zeros. Informational only: the tally never picks a
/// winner and ties are not broken here.
pub fn tally(conn: &Connection, decision_id: i64) -> Result<HashMap<i64, i64>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT choice_id, COUNT(*) FROM ballots WHERE decision_id = ?1 GROUP BY choice_id",
    )?;
    let counts = stmt
        .query_map(params![decision_id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<Result<HashMap<_, _>, _>>()?;
    Ok(counts)
}

/// Shared terminal transition: one atomic UPDATE of status, winner, staff
/// decider and resolved_at, guarded on the row still being open so a
/// concurrent transition can never overwrite a terminal decision.
fn close(
    conn: &Connection,
    decision_id: i64,
    status: DecisionStatus,
    winning_choice_id: i64,
    staff_decider_id: Option<i64>,
) -> Result<DecisionDetail, AppError> {
    let updated = conn.execute(
        "UPDATE decisions
         SET status = ?1, winning_choice_id = ?2, staff_decider_id = ?3,
             resolved_at = datetime('now')
         WHERE id = ?4 AND status = 'open'",
        params![status.as_str(), winning_choice_id, staff_decider_id, decision_id],
    )?;
    if updated == 0 {
        return Err(AppError::InvalidState(
            "Decision is already resolved".to_string(),
        ));
    }
    find_detail(conn, decision_id)?.ok_or(AppError::NotFound("Decision"))
}

/// Staff override: terminal, role-gated, and final regardless of the
/// tally. The staff check lives here rather than in the HTTP layer so it
/// cannot be bypassed by a misconfigured route.
pub fn staff_override(
    conn: &Connection,
    decision_id: i64,
    staff: &User,
    winning_choice_id: i64,
    reason: Option<&str>,
) -> Result<DecisionDetail, AppError> {
    if !staff.is_staff() {
        return Err(AppError::Forbidden("Staff access required".to_string()));
    }
    let decision = find_by_id(conn, decision_id)?.ok_or(AppError::NotFound("Decision"))?;
    if decision.status.is_terminal() {
        return Err(AppError::InvalidState(
            "Decision already has a final outcome".to_string(),
        ));
    }
    if !choice_belongs(conn, decision_id, winning_choice_id)? {
        return Err(AppError::Validation(
            "Choice does not belong to this decision".to_string(),
        ));
    }

    if let Some(reason) = reason {
        log::info!(
            "Staff override on decision {decision_id} by {}: {reason}",
            staff.login
        );
    }
    close(
        conn,
        decision_id,
        DecisionStatus::StaffDecided,
        winning_choice_id,
        Some(staff.id),
    )
}

/// Manual resolution with a declared winner, by the creator or staff.
/// This is the only non-override path out of `Open`; there is no
/// automatic close-by-tally.
pub fn resolve(
    conn: &Connection,
    decision_id: i64,
    actor: &User,
    winning_choice_id: i64,
) -> Result<DecisionDetail, AppError> {
    let decision = find_by_id(conn, decision_id)?.ok_or(AppError::NotFound("Decision"))?;
    if decision.creator_id != actor.id && !actor.is_staff() {
        return Err(AppError::Forbidden(
            "Only the creator or staff can resolve a decision".to_string(),
        ));
    }
    if decision.status.is_terminal() {
        return Err(AppError::InvalidState(
            "Decision already has a final outcome".to_string(),
        ));
    }
    if !choice_belongs(conn, decision_id, winning_choice_id)? {
        return Err(AppError::Validation(
            "Choice does not belong to this decision".to_string(),
        ));
    }
    close(conn, decision_id, DecisionStatus::Resolved, winning_choice_id, None)
}

/// Delete a decision; choices and ballots go with it via FK cascade.
pub fn delete(conn: &Connection, decision_id: i64, actor: &User) -> Result<(), AppError> {
    let decision = find_by_id(conn, decision_id)?.ok_or(AppError::NotFound("Decision"))?;
    if decision.creator_id != actor.id && !actor.is_staff() {
        return Err(AppError::Forbidden(
            "Only the creator or staff can delete a decision".to_string(),
        ));
    }
    conn.execute("DELETE FROM decisions WHERE id = ?1", params![decision_id])?;
    Ok(())
}
