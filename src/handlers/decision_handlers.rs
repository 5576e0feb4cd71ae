use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::identity;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::decision::{self, Decision, DecisionFilter, NewDecision};

/// A choice with its ballot count. Counts come from the tally map merged
/// with the declared choice list, so zero-ballot choices report an
/// explicit 0 instead of being absent.
#[derive(Serialize)]
pub struct ChoiceWithCount {
    pub id: i64,
    pub label: String,
    pub position: i64,
    pub count: i64,
}

#[derive(Serialize)]
pub struct DecisionResponse {
    #[serde(flatten)]
    pub decision: Decision,
    pub choices: Vec<ChoiceWithCount>,
    pub total_ballots: i64,
    /// The caller's own ballot choice, when a valid token was presented.
    pub your_choice_id: Option<i64>,
}

fn build_response(
    conn: &rusqlite::Connection,
    decision_id: i64,
    viewer_id: Option<i64>,
) -> Result<DecisionResponse, AppError> {
    let detail = decision::find_detail(conn, decision_id)?
        .ok_or(AppError::NotFound("Decision"))?;
    let counts = decision::tally(conn, decision_id)?;

    let choices: Vec<ChoiceWithCount> = detail
        .choices
        .into_iter()
        .map(|c| ChoiceWithCount {
            count: counts.get(&c.id).copied().unwrap_or(0),
            id: c.id,
            label: c.label,
            position: c.position,
        })
        .collect();
    let total_ballots = choices.iter().map(|c| c.count).sum();

    let your_choice_id = match viewer_id {
        Some(user_id) => {
            decision::find_ballot(conn, decision_id, user_id)?.map(|b| b.choice_id)
        }
        None => None,
    };

    Ok(DecisionResponse {
        decision: detail.decision,
        choices,
        total_ballots,
        your_choice_id,
    })
}

/// GET /api/decisions - public listing with project / status / kind filters.
pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<DecisionFilter>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let decisions = decision::list(&conn, &query)?;
    Ok(HttpResponse::Ok().json(decisions))
}

/// POST /api/decisions - open a poll or dispute.
pub async fn create(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    payload: web::Json<NewDecision>,
) -> Result<HttpResponse, AppError> {
    let mut conn = pool.get()?;
    let current = identity::require_user(&req, &conn, &config)?;
    let detail = decision::create(&mut conn, current.id, &payload)?;
    Ok(HttpResponse::Created().json(json!({ "id": detail.decision.id })))
}

/// GET /api/decisions/{id} - entity, per-choice counts, and (with a token)
/// the caller's own ballot. Auth is optional here.
pub async fn read(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let viewer = identity::maybe_user(&req, &conn, &config)?;
    let response = build_response(&conn, path.into_inner(), viewer.map(|u| u.id))?;
    Ok(HttpResponse::Ok().json(response))
}

#[derive(Deserialize)]
pub struct CastBallotPayload {
    pub choice_id: i64,
}

/// POST /api/decisions/{id}/vote - one immutable ballot per voter.
pub async fn vote(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    path: web::Path<i64>,
    payload: web::Json<CastBallotPayload>,
) -> Result<HttpResponse, AppError> {
    let mut conn = pool.get()?;
    let current = identity::require_user(&req, &conn, &config)?;
    let ballot = decision::cast_ballot(&mut conn, path.into_inner(), current.id, payload.choice_id)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Vote recorded",
        "ballot_id": ballot.id
    })))
}

#[derive(Deserialize)]
pub struct ResolvePayload {
    pub winning_choice_id: i64,
}

/// POST /api/decisions/{id}/resolve - creator or staff declares a winner.
pub async fn resolve(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    path: web::Path<i64>,
    payload: web::Json<ResolvePayload>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let current = identity::require_user(&req, &conn, &config)?;
    let detail = decision::resolve(&conn, path.into_inner(), &current, payload.winning_choice_id)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Decision resolved",
        "status": detail.decision.status,
        "winning_choice_id": detail.decision.winning_choice_id
    })))
}

#[derive(Deserialize)]
pub struct StaffDecisionPayload {
    pub winning_choice_id: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

/// POST /api/decisions/{id}/staff-decide - staff override. The response
/// states finality explicitly: this outcome supersedes any ballot tally.
pub async fn staff_decide(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    path: web::Path<i64>,
    payload: web::Json<StaffDecisionPayload>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let current = identity::require_user(&req, &conn, &config)?;
    let detail = decision::staff_override(
        &conn,
        path.into_inner(),
        &current,
        payload.winning_choice_id,
        payload.reason.as_deref(),
    )?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Decision made by staff: this outcome is final regardless of ballot counts",
        "decided_by": detail.decision.staff_decider_id,
        "winning_choice_id": detail.decision.winning_choice_id
    })))
}

/// DELETE /api/decisions/{id} - creator or staff; ballots cascade.
pub async fn delete(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let current = identity::require_user(&req, &conn, &config)?;
    decision::delete(&conn, path.into_inner(), &current)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Decision deleted" })))
}
