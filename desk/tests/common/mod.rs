//! In-memory stand-in for the waiting-list service, served over real HTTP
//! so the reqwest client is exercised end to end.
#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::{Read, Write};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use waitlist_desk::models::{
    Entry, EntryId, EntryStatus, NewEntry, Position, SearchHit, SearchQuery, WaitingList,
};

#[derive(Default)]
pub struct StubState {
    pub lists: Vec<WaitingList>,
    pub position_writes: Vec<(String, Position)>,
    /// Position writes accepted before every further one gets a 503.
    pub fail_after: Option<usize>,
    next_id: u64,
}

pub type Shared = Arc<Mutex<StubState>>;

type ApiResult<T> = Result<(StatusCode, Json<T>), (StatusCode, String)>;

#[derive(Deserialize)]
struct CreateListRequest {
    date: NaiveDate,
}

#[derive(Deserialize)]
struct StatusRequest {
    status: EntryStatus,
}

#[derive(Deserialize)]
struct PositionRequest {
    position: Position,
}

fn entry_mut<'a>(state: &'a mut StubState, id: &str) -> Option<&'a mut Entry> {
    state
        .lists
        .iter_mut()
        .flat_map(|l| l.entries.iter_mut())
        .find(|e| e.id.as_str() == id)
}

async fn create_list(
    State(state): State<Shared>,
    Json(req): Json<CreateListRequest>,
) -> ApiResult<WaitingList> {
    let mut state = state.lock().unwrap();
    if state.lists.iter().any(|l| l.date == req.date) {
        return Err((StatusCode::CONFLICT, "List already exists".to_string()));
    }
    state.next_id += 1;
    let list = WaitingList {
        id: format!("list-{}", state.next_id),
        date: req.date,
        entries: Vec::new(),
    };
    state.lists.push(list.clone());
    Ok((StatusCode::CREATED, Json(list)))
}

async fn get_list(State(state): State<Shared>, Path(key): Path<String>) -> ApiResult<WaitingList> {
    let date: NaiveDate = key
        .parse()
        .map_err(|_| (StatusCode::BAD_REQUEST, "Bad date".to_string()))?;
    let state = state.lock().unwrap();
    state
        .lists
        .iter()
        .find(|l| l.date == date)
        .map(|l| (StatusCode::OK, Json(l.clone())))
        .ok_or((StatusCode::NOT_FOUND, "List not found".to_string()))
}

async fn add_entry(
    State(state): State<Shared>,
    Path(key): Path<String>,
    Json(req): Json<NewEntry>,
) -> ApiResult<Entry> {
    let mut state = state.lock().unwrap();
    state.next_id += 1;
    let id = EntryId(state.next_id.to_string());
    let list = state
        .lists
        .iter_mut()
        .find(|l| l.id == key)
        .ok_or((StatusCode::NOT_FOUND, "List not found".to_string()))?;
    let position = list.entries.iter().map(|e| e.position).max().unwrap_or(0) + 1;
    let entry = Entry {
        id,
        puppy_name: req.puppy_name,
        owner_name: req.owner_name,
        service: req.service,
        arrival_time: req.arrival_time,
        status: EntryStatus::Waiting,
        position,
    };
    list.entries.push(entry.clone());
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_status(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<Entry> {
    let mut state = state.lock().unwrap();
    let entry = entry_mut(&mut state, &id)
        .ok_or((StatusCode::NOT_FOUND, "Entry not found".to_string()))?;
    entry.status = req.status;
    Ok((StatusCode::OK, Json(entry.clone())))
}

async fn update_position(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(req): Json<PositionRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut state = state.lock().unwrap();
    match state.fail_after {
        Some(0) => {
            return Err((StatusCode::SERVICE_UNAVAILABLE, "Try again later".to_string()));
        }
        Some(left) => state.fail_after = Some(left - 1),
        None => {}
    }
    let entry = entry_mut(&mut state, &id)
        .ok_or((StatusCode::NOT_FOUND, "Entry not found".to_string()))?;
    if entry.status.is_terminal() {
        return Err((StatusCode::CONFLICT, "Entry is completed".to_string()));
    }
    entry.position = req.position;
    state.position_writes.push((id, req.position));
    Ok(StatusCode::NO_CONTENT)
}

async fn search(
    State(state): State<Shared>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<SearchHit>> {
    let state = state.lock().unwrap();
    let needle = query.name.unwrap_or_default().to_lowercase();
    let hits = state
        .lists
        .iter()
        .filter(|l| query.date.map_or(true, |d| d == l.date))
        .flat_map(|l| l.entries.iter().map(move |e| (l.date, e)))
        .filter(|(_, e)| {
            e.puppy_name.to_lowercase().contains(&needle)
                || e.owner_name.to_lowercase().contains(&needle)
        })
        .map(|(date, e)| SearchHit {
            date,
            entry: e.clone(),
        })
        .collect();
    Ok((StatusCode::OK, Json(hits)))
}

pub fn build_router(state: Shared) -> Router {
    Router::new()
        .route("/api/lists", post(create_list))
        .route("/api/lists/{key}", get(get_list))
        .route("/api/lists/{key}/entries", post(add_entry))
        .route("/api/entries/search", get(search))
        .route("/api/entries/{id}/status", put(update_status))
        .route("/api/entries/{id}/position", put(update_position))
        .with_state(state)
}

/// Helper: start the stub on a random port and return (base_url, state).
pub async fn start_stub_service() -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(StubState::default()));
    let app = build_router(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

/// Waiting puppy names in the order the service stores them.
pub fn stored_order(state: &Shared) -> Vec<String> {
    let state = state.lock().unwrap();
    let mut entries: Vec<Entry> = state
        .lists
        .iter()
        .flat_map(|l| l.entries.iter().cloned())
        .filter(Entry::is_waiting)
        .collect();
    entries.sort_by_key(|e| e.position);
    entries.into_iter().map(|e| e.puppy_name).collect()
}

/// A base url that answers one request with a 500 whose body is cut off
/// before its declared length.
pub fn truncated_error_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(
                b"HTTP/1.1 500 Internal Server Error\r\n\
                  content-type: text/plain\r\n\
                  content-length: 64\r\n\r\n\
                  cut sho",
            );
        }
    });
    format!("http://{}", addr)
}

/// A base url nothing is listening on.
pub async fn dead_service_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
