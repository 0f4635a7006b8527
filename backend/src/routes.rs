//! The JSON surface the reading list widget talks to.
//!
//! Every answer is JSON. Requests that need a user but have none are told
//! where to go with a `redirect_to` body instead of an HTTP redirect, so the
//! widget can follow it itself.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::{json, Value};

use readit_frontend::actions::{ActionRegistry, ADD_READING, GET_READINGS};
use readit_frontend::reading::iso8601;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::{ReadingStore, StoredReading};

pub const USER_COOKIE: &str = "readit_user";
pub const LOGIN_PATH: &str = "/";
pub const READINGS_PATH: &str = "/readings";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReadingStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReadingStore>, config: Config) -> Self {
        AppState {
            store,
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub name: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route(READINGS_PATH, get(fetch_reading_list).post(add_reading))
        .route("/readings/:id", delete(remove_reading))
        .route("/config", get(dump_configuration))
        .with_state(state)
}

/// The operations a logged in user may perform.
pub fn advertised_actions() -> ActionRegistry {
    ActionRegistry::new()
        .with(ADD_READING, "POST", READINGS_PATH)
        .with(GET_READINGS, "GET", READINGS_PATH)
}

pub fn wire_reading(reading: &StoredReading) -> Value {
    json!({
        "id": reading.id,
        "title": reading.title,
        "link": reading.link,
        "when": iso8601(&reading.when),
    })
}

fn redirect_to(url: &str) -> Json<Value> {
    Json(json!({ "redirect_to": url }))
}

fn current_user(jar: &CookieJar) -> Option<String> {
    jar.get(USER_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|user| !user.is_empty())
}

async fn login(jar: CookieJar, Json(form): Json<LoginForm>) -> Result<impl IntoResponse> {
    let name = form.name.trim().to_owned();
    if name.is_empty() {
        return Err(Error::BadRequest("a name is required to log in".into()));
    }
    log::info!("{} logged in", name);

    let cookie = Cookie::build((USER_COOKIE, name)).path("/").http_only(true);
    Ok((jar.add(cookie), redirect_to(READINGS_PATH)))
}

async fn logout(jar: CookieJar) -> impl IntoResponse {
    if let Some(user) = current_user(&jar) {
        log::info!("{} logged out", user);
    }
    (
        jar.remove(Cookie::build(USER_COOKIE).path("/")),
        redirect_to(LOGIN_PATH),
    )
}

async fn fetch_reading_list(State(state): State<AppState>, jar: CookieJar) -> Result<Json<Value>> {
    let Some(user) = current_user(&jar) else {
        return Ok(redirect_to(LOGIN_PATH));
    };

    let readings: Vec<Value> = state
        .store
        .find_readings(&user)?
        .iter()
        .map(wire_reading)
        .collect();

    Ok(Json(json!({
        "readings": readings,
        "actions": advertised_actions(),
    })))
}

async fn add_reading(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<Value>>,
) -> Result<Json<Value>> {
    let Some(user) = current_user(&jar) else {
        return Ok(redirect_to(LOGIN_PATH));
    };
    let Some(Json(data)) = body else {
        return Err(Error::BadRequest("a JSON reading is required".into()));
    };

    let field = |name: &str| {
        data.get(name)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| Error::BadRequest(format!("reading has no {}", name)))
    };
    let title = field("title")?;
    let link = field("link")?;

    let reading = state.store.add_reading(&user, &title, &link)?;
    Ok(Json(json!({ "new_reading": wire_reading(&reading) })))
}

async fn remove_reading(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(reading_id): Path<String>,
) -> Result<Json<Value>> {
    let Some(user) = current_user(&jar) else {
        return Ok(redirect_to(LOGIN_PATH));
    };

    state.store.remove_reading(&user, &reading_id)?;
    log::debug!("removed reading {} of {}", reading_id, user);
    Ok(Json(json!({ "removed": reading_id })))
}

async fn dump_configuration(State(state): State<AppState>) -> Result<Json<Value>> {
    if !state.config.debug {
        return Err(Error::Forbidden);
    }
    Ok(Json(json!({ "config": *state.config })))
}
