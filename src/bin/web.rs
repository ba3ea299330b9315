//! Single binary web server: REST API over the Americano library.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! DATA_DIR stores tournaments as JSON files (in-memory when unset).
//! SCHEDULE_SEED pins the schedule shuffle (random when unset).

use actix_web::{
    delete, get, middleware::Logger, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use padel_americano::export::{import_tournament, leaderboard_csv, matches_csv, tournament_json};
use padel_americano::{
    adjusted_leaderboard, advance_round, calculate_fairness_stats, estimate_schedule, finish_tournament,
    get_players_with_fewer_matches, get_schedule_stats, start_tournament, submit_score, tournament_standings,
    AdjustmentMethod, InMemoryRepository, JsonFileRepository, Leaderboard, Tournament, TournamentError,
    TournamentId, TournamentRepository, TournamentStatus,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Shared server state: the persistence collaborator plus scheduling config.
struct AppContext {
    repo: Arc<dyn TournamentRepository>,
    schedule_seed: Option<u64>,
    /// Serializes load-modify-save cycles.
    write_lock: Mutex<()>,
}

type AppState = Data<AppContext>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// One row of the tournament list.
#[derive(serde::Serialize)]
struct TournamentSummary {
    id: TournamentId,
    name: String,
    status: TournamentStatus,
    players: usize,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default = "default_tournament_name")]
    name: String,
}

fn default_tournament_name() -> String {
    "Americano".to_string()
}

#[derive(Deserialize)]
struct PlayerNameBody {
    name: String,
}

#[derive(Deserialize)]
struct SettingsBody {
    points_per_match: Option<u32>,
    courts: Option<u32>,
}

#[derive(Deserialize)]
struct ScoreBody {
    score1: u32,
    score2: u32,
}

#[derive(Deserialize)]
struct EstimateQuery {
    players: u32,
    courts: u32,
}

#[derive(Deserialize)]
struct MethodQuery {
    method: Option<AdjustmentMethod>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and player id.
#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: Uuid,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: Uuid,
}

/// Why a request could not be served.
enum Failure {
    NoTournament,
    Rejected(TournamentError),
    Internal(String),
}

impl From<TournamentError> for Failure {
    fn from(e: TournamentError) -> Self {
        match e {
            TournamentError::Storage(_) | TournamentError::Export(_) => Failure::Internal(e.to_string()),
            other => Failure::Rejected(other),
        }
    }
}

impl Failure {
    fn into_response(self) -> HttpResponse {
        match self {
            Failure::NoTournament => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
            Failure::Rejected(e @ (TournamentError::PlayerNotFound(_) | TournamentError::MatchNotFound(_))) => {
                HttpResponse::NotFound().json(serde_json::json!({ "error": e.to_string() }))
            }
            Failure::Rejected(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
            Failure::Internal(msg) => {
                log::error!("{}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({ "error": msg }))
            }
        }
    }
}

/// Run repository work off the async executor.
async fn blocking<T, F>(f: F) -> Result<T, Failure>
where
    F: FnOnce() -> Result<T, Failure> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Failure::Internal(e.to_string()))?
}

/// Load a tournament for reading.
async fn load(state: &AppState, id: TournamentId) -> Result<Tournament, Failure> {
    let state = state.clone();
    blocking(move || state.repo.load(id)?.ok_or(Failure::NoTournament)).await
}

/// Load, apply `f`, and save. Responds with the updated tournament.
async fn mutate<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError> + Send + 'static,
{
    let state = state.clone();
    let result = blocking(move || {
        let _guard = state
            .write_lock
            .lock()
            .map_err(|_| Failure::Internal("lock error".to_string()))?;
        let mut t = state.repo.load(id)?.ok_or(Failure::NoTournament)?;
        f(&mut t)?;
        state.repo.save(&t)?;
        Ok(t)
    })
    .await;
    match result {
        Ok(t) => HttpResponse::Ok().json(&t),
        Err(e) => e.into_response(),
    }
}

fn csv_response(body: String, filename: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(("Content-Disposition", format!("attachment; filename=\"{}\"", filename)))
        .body(body)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "padel-americano",
    })
}

/// List stored tournaments.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let state = state.clone();
    let result = blocking(move || {
        let mut summaries = Vec::new();
        for id in state.repo.list_ids()? {
            if let Some(t) = state.repo.load(id)? {
                summaries.push(TournamentSummary {
                    id: t.id,
                    name: t.name,
                    status: t.status,
                    players: t.players.len(),
                });
            }
        }
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    })
    .await;
    match result {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => e.into_response(),
    }
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Option<Json<CreateTournamentBody>>) -> HttpResponse {
    let name = body.map(|b| b.into_inner().name).unwrap_or_else(default_tournament_name);
    let tournament = Tournament::new(name.trim());
    let state = state.clone();
    let result = blocking(move || {
        state.repo.save(&tournament)?;
        Ok(tournament)
    })
    .await;
    match result {
        Ok(t) => {
            log::info!("Created tournament {}", t.id);
            HttpResponse::Ok().json(&t)
        }
        Err(e) => e.into_response(),
    }
}

/// Import a tournament previously exported as JSON.
#[post("/api/tournaments/import")]
async fn api_import_tournament(state: AppState, body: String) -> HttpResponse {
    let state = state.clone();
    let result = blocking(move || {
        let t = import_tournament(&body)?;
        state.repo.save(&t)?;
        Ok(t)
    })
    .await;
    match result {
        Ok(t) => HttpResponse::Ok().json(&t),
        Err(e) => e.into_response(),
    }
}

/// Get a tournament by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match load(&state, path.id).await {
        Ok(t) => HttpResponse::Ok().json(&t),
        Err(e) => e.into_response(),
    }
}

/// Delete a tournament and everything in it.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    let state = state.clone();
    let result = blocking(move || {
        if state.repo.delete(id)? {
            Ok(())
        } else {
            Err(Failure::NoTournament)
        }
    })
    .await;
    match result {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => e.into_response(),
    }
}

/// Add a player (Setup only).
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(state: AppState, path: Path<TournamentPath>, body: Json<PlayerNameBody>) -> HttpResponse {
    let name = body.into_inner().name;
    mutate(&state, path.id, move |t| t.add_player(name).map(|_| ())).await
}

/// Remove a player by id (Setup only).
#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    let player_id = path.player_id;
    mutate(&state, path.id, move |t| t.remove_player(player_id)).await
}

/// Rename a player (any phase).
#[put("/api/tournaments/{id}/players/{player_id}")]
async fn api_rename_player(
    state: AppState,
    path: Path<TournamentPlayerPath>,
    body: Json<PlayerNameBody>,
) -> HttpResponse {
    let player_id = path.player_id;
    let name = body.into_inner().name;
    mutate(&state, path.id, move |t| t.rename_player(player_id, &name)).await
}

/// Update points per match and/or courts (Setup only).
#[put("/api/tournaments/{id}/settings")]
async fn api_update_settings(state: AppState, path: Path<TournamentPath>, body: Json<SettingsBody>) -> HttpResponse {
    let SettingsBody {
        points_per_match,
        courts,
    } = body.into_inner();
    mutate(&state, path.id, move |t| t.update_settings(points_per_match, courts)).await
}

/// Preview rounds and matches per player without generating a schedule.
#[get("/api/estimate")]
async fn api_estimate(query: Query<EstimateQuery>) -> HttpResponse {
    HttpResponse::Ok().json(estimate_schedule(query.players, query.courts))
}

/// Generate the schedule and start (Setup -> Active).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let seed = state.schedule_seed;
    mutate(&state, path.id, move |t| {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        start_tournament(t, &mut rng)
    })
    .await
}

/// Submit the score of one match (Active only).
#[put("/api/tournaments/{id}/matches/{match_id}/score")]
async fn api_submit_score(state: AppState, path: Path<TournamentMatchPath>, body: Json<ScoreBody>) -> HttpResponse {
    let match_id = path.match_id;
    let ScoreBody { score1, score2 } = body.into_inner();
    mutate(&state, path.id, move |t| submit_score(t, match_id, score1, score2)).await
}

/// Advance to the next round once the current one is complete.
#[post("/api/tournaments/{id}/rounds/advance")]
async fn api_advance_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, advance_round).await
}

/// Finish the tournament (Active -> Completed).
#[post("/api/tournaments/{id}/finish")]
async fn api_finish_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, finish_tournament).await
}

/// Restart tournament: back to Setup with same players and settings.
#[post("/api/tournaments/{id}/restart")]
async fn api_restart_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, Tournament::restart_tournament).await
}

/// Actual leaderboard.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match load(&state, path.id).await {
        Ok(t) => HttpResponse::Ok().json(Leaderboard::Actual {
            rows: tournament_standings(&t),
        }),
        Err(e) => e.into_response(),
    }
}

/// Fairness-adjusted leaderboard (?method=average|opponent-based|partner-based|combined).
#[get("/api/tournaments/{id}/standings/adjusted")]
async fn api_adjusted_standings(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<MethodQuery>,
) -> HttpResponse {
    match load(&state, path.id).await {
        Ok(t) => {
            let method = query.method.unwrap_or_default();
            let standings = tournament_standings(&t);
            HttpResponse::Ok().json(adjusted_leaderboard(
                method,
                &standings,
                &t.matches,
                t.settings.points_per_match,
            ))
        }
        Err(e) => e.into_response(),
    }
}

/// Match-count balance and who is behind.
#[get("/api/tournaments/{id}/fairness")]
async fn api_fairness(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match load(&state, path.id).await {
        Ok(t) => {
            let standings = tournament_standings(&t);
            HttpResponse::Ok().json(serde_json::json!({
                "stats": calculate_fairness_stats(&standings),
                "players_with_fewer_matches": get_players_with_fewer_matches(&standings),
            }))
        }
        Err(e) => e.into_response(),
    }
}

/// Partnership coverage of the generated schedule.
#[get("/api/tournaments/{id}/schedule/stats")]
async fn api_schedule_stats(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match load(&state, path.id).await {
        Ok(t) => HttpResponse::Ok().json(get_schedule_stats(&t.matches, &t.players)),
        Err(e) => e.into_response(),
    }
}

/// Leaderboard CSV; adjusted when ?method= is given.
#[get("/api/tournaments/{id}/export/leaderboard.csv")]
async fn api_export_leaderboard(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<MethodQuery>,
) -> HttpResponse {
    let t = match load(&state, path.id).await {
        Ok(t) => t,
        Err(e) => return e.into_response(),
    };
    let standings = tournament_standings(&t);
    let leaderboard = match query.method {
        Some(method) => adjusted_leaderboard(method, &standings, &t.matches, t.settings.points_per_match),
        None => Leaderboard::Actual { rows: standings },
    };
    match leaderboard_csv(&leaderboard) {
        Ok(body) => csv_response(body, "leaderboard.csv"),
        Err(e) => Failure::from(e).into_response(),
    }
}

/// All matches as CSV.
#[get("/api/tournaments/{id}/export/matches.csv")]
async fn api_export_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let result = load(&state, path.id)
        .await
        .and_then(|t| matches_csv(&t).map_err(Failure::from));
    match result {
        Ok(body) => csv_response(body, "matches.csv"),
        Err(e) => e.into_response(),
    }
}

/// Whole tournament as JSON (re-importable).
#[get("/api/tournaments/{id}/export/tournament.json")]
async fn api_export_json(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let result = load(&state, path.id)
        .await
        .and_then(|t| tournament_json(&t).map_err(Failure::from));
    match result {
        Ok(body) => HttpResponse::Ok()
            .content_type("application/json")
            .insert_header(("Content-Disposition", "attachment; filename=\"tournament.json\""))
            .body(body),
        Err(e) => e.into_response(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let schedule_seed: Option<u64> = std::env::var("SCHEDULE_SEED").ok().and_then(|s| s.parse().ok());

    let repo: Arc<dyn TournamentRepository> = match std::env::var("DATA_DIR") {
        Ok(dir) => {
            log::info!("Storing tournaments under {}", dir);
            Arc::new(JsonFileRepository::open(&dir).map_err(std::io::Error::other)?)
        }
        Err(_) => {
            log::info!("DATA_DIR not set; tournaments are kept in memory");
            Arc::new(InMemoryRepository::new())
        }
    };
    if let Some(seed) = schedule_seed {
        log::info!("Schedule shuffle pinned to seed {}", seed);
    }

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(AppContext {
        repo,
        schedule_seed,
        write_lock: Mutex::new(()),
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .service(api_health)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_import_tournament)
            .service(api_estimate)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_rename_player)
            .service(api_update_settings)
            .service(api_start_tournament)
            .service(api_submit_score)
            .service(api_advance_round)
            .service(api_finish_tournament)
            .service(api_restart_tournament)
            .service(api_standings)
            .service(api_adjusted_standings)
            .service(api_fairness)
            .service(api_schedule_stats)
            .service(api_export_leaderboard)
            .service(api_export_matches)
            .service(api_export_json)
    })
    .bind(bind)?
    .run()
    .await
}
