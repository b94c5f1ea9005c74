use std::cmp::Ordering;

use actix_web::{
    http::{header::AUTHORIZATION, StatusCode},
    web, HttpRequest, HttpResponse,
};
use admin_shared::{
    const_config::{resource::RESOURCE_TOTAL_COUNT_HEADER, user::USER_DEFAULT_ROLE},
    uac::UserUpdatePayload,
};
use chrono::{Duration, Utc};
use serde_json::{json, Map, Value};
use tracing::warn;

use super::{BackendState, RecordedRequest, StoredUser};
use crate::fake_signed_token;

type State = web::Data<BackendState>;

const LIST_KEYS: [&str; 4] = ["pageNumber", "pageSize", "sort", "order"];
const REFERENCE_KEYS: [&str; 4] = ["page", "perPage", "sort", "order"];

#[derive(serde::Deserialize)]
struct LoginBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(serde::Deserialize)]
struct RegisterBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    role: Option<String>,
}

/// Records the request and returns the json body if there was one
fn record(state: &BackendState, req: &HttpRequest, body: &web::Bytes) -> Option<Value> {
    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(body).ok()
    };
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.lock().requests.push(RecordedRequest {
        method: req.method().to_string(),
        path: req.path().to_string(),
        query: parse_query(req),
        authorization,
        body: body.clone(),
    });
    body
}

fn parse_query(req: &HttpRequest) -> Vec<(String, String)> {
    web::Query::<Vec<(String, String)>>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default()
}

fn query_value<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn query_number(query: &[(String, String)], key: &str, default: usize) -> usize {
    query_value(query, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn is_authorized(state: &BackendState, req: &HttpRequest) -> bool {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| state.lock().issued_tokens.contains(token))
}

fn message(status: StatusCode, msg: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "message": msg }))
}

fn unauthorized() -> HttpResponse {
    message(StatusCode::UNAUTHORIZED, "Unauthorized")
}

fn title_case(role: &str) -> String {
    let mut chars = role.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn user_json(user: &StoredUser) -> Value {
    json!({
        "id": user.id,
        "userName": user.username,
        "email": user.email,
        "roles": user.roles,
    })
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn id_text(record: &Value) -> Option<String> {
    record.get("id").map(text)
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => text(a).cmp(&text(b)),
    }
}

/// Keeps records matching every query key not listed in `reserved`. Repeated
/// keys match any of their values
fn filter_and_sort(
    records: Vec<Value>,
    query: &[(String, String)],
    reserved: &[&str],
) -> Vec<Value> {
    let filters: Vec<_> = query
        .iter()
        .filter(|(k, _)| !reserved.contains(&k.as_str()))
        .collect();
    let mut result: Vec<Value> = records
        .into_iter()
        .filter(|record| {
            filters.iter().all(|(key, _)| {
                let Some(actual) = record.get(key.as_str()).map(text) else {
                    return false;
                };
                filters
                    .iter()
                    .filter(|(k, _)| k == key)
                    .any(|(_, v)| *v == actual)
            })
        })
        .collect();
    if let Some(field) = query_value(query, "sort") {
        result.sort_by(|a, b| compare(&a[field], &b[field]));
        if query_value(query, "order") == Some("DESC") {
            result.reverse();
        }
    }
    result
}

fn paginate(records: Vec<Value>, page: usize, per_page: usize) -> Vec<Value> {
    records
        .into_iter()
        .skip(page.saturating_sub(1) * per_page)
        .take(per_page)
        .collect()
}

fn ids_from_filter(query: &[(String, String)]) -> Vec<String> {
    query_value(query, "filter")
        .and_then(|f| serde_json::from_str::<Value>(f).ok())
        .and_then(|f| f.get("id").and_then(Value::as_array).cloned())
        .map(|ids| ids.iter().map(text).collect())
        .unwrap_or_default()
}

fn merge(record: &mut Value, changes: &Value) {
    if let (Value::Object(record), Value::Object(changes)) = (record, changes) {
        for (key, value) in changes {
            if key != "id" {
                record.insert(key.clone(), value.clone());
            }
        }
    }
}

#[tracing::instrument(skip_all)]
pub(super) async fn login(req: HttpRequest, state: State, body: web::Bytes) -> HttpResponse {
    let body = record(&state, &req, &body);
    let Some(args) = body.and_then(|b| serde_json::from_value::<LoginBody>(b).ok()) else {
        return message(StatusCode::BAD_REQUEST, "Invalid login request");
    };
    let mut guard = state.lock();
    let Some(user) = guard
        .users
        .iter()
        .find(|u| u.username == args.username && u.password == args.password)
        .cloned()
    else {
        return message(StatusCode::UNAUTHORIZED, "Invalid username or password");
    };
    let token = fake_signed_token(Utc::now() + Duration::hours(1));
    guard.issued_tokens.insert(token.clone());
    let role = user
        .roles
        .first()
        .map(|r| r.to_lowercase())
        .unwrap_or_else(|| USER_DEFAULT_ROLE.to_string());
    HttpResponse::Ok().json(json!({
        "token": token,
        "id": user.id,
        "username": user.username,
        "role": role,
    }))
}

#[tracing::instrument(skip_all)]
pub(super) async fn register(req: HttpRequest, state: State, body: web::Bytes) -> HttpResponse {
    let body = record(&state, &req, &body);
    let Some(args) = body.and_then(|b| serde_json::from_value::<RegisterBody>(b).ok()) else {
        return message(StatusCode::BAD_REQUEST, "Invalid registration request");
    };
    if args.username.is_empty() || args.password.is_empty() {
        return message(StatusCode::BAD_REQUEST, "Username and password are required");
    }
    let mut guard = state.lock();
    if guard.users.iter().any(|u| u.username == args.username) {
        return HttpResponse::BadRequest().json(json!({
            "isSuccess": false,
            "message": "Username is already taken",
        }));
    }
    if guard.users.iter().any(|u| u.email == args.email) {
        return HttpResponse::Ok().json(json!({
            "isSuccess": false,
            "message": "Email is already registered",
        }));
    }
    let id = guard.next_id();
    let role = args.role.unwrap_or_else(|| USER_DEFAULT_ROLE.to_string());
    guard.users.push(StoredUser {
        id,
        username: args.username,
        email: args.email,
        password: args.password,
        roles: vec![title_case(&role)],
    });
    HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "message": "User registered successfully",
        "id": id,
    }))
}

#[tracing::instrument(skip_all)]
pub(super) async fn list_users(req: HttpRequest, state: State, body: web::Bytes) -> HttpResponse {
    record(&state, &req, &body);
    if !is_authorized(&state, &req) {
        return unauthorized();
    }
    let query = parse_query(&req);
    let users: Vec<Value> = state.lock().users.iter().map(user_json).collect();
    let page = paginate(
        users,
        query_number(&query, "pageNumber", 1),
        query_number(&query, "pageSize", 10),
    );
    HttpResponse::Ok().json(json!({ "isSuccess": true, "result": page }))
}

#[tracing::instrument(skip_all)]
pub(super) async fn get_user(
    req: HttpRequest,
    state: State,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    record(&state, &req, &body);
    if !is_authorized(&state, &req) {
        return unauthorized();
    }
    let id = path.into_inner();
    match state
        .lock()
        .users
        .iter()
        .find(|u| u.id.to_string() == id)
    {
        Some(user) => HttpResponse::Ok().json(json!({ "isSuccess": true, "result": user_json(user) })),
        None => HttpResponse::Ok().json(json!({ "isSuccess": false, "message": "User not found" })),
    }
}

#[tracing::instrument(skip_all)]
pub(super) async fn update_user(
    req: HttpRequest,
    state: State,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let body = record(&state, &req, &body);
    if !is_authorized(&state, &req) {
        return unauthorized();
    }
    let payload = match serde_json::from_value::<UserUpdatePayload>(body.unwrap_or_default()) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(?e, "rejected user update body");
            return message(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };
    let id = path.into_inner();
    let mut guard = state.lock();
    let Some(user) = guard.users.iter_mut().find(|u| u.id.to_string() == id) else {
        return message(StatusCode::NOT_FOUND, "User not found");
    };
    if let Some(user_name) = payload.user_name {
        user.username = user_name;
    }
    if let Some(email) = payload.email {
        user.email = email;
    }
    if let Some(role) = payload.role {
        user.roles = vec![title_case(&role)];
    }
    HttpResponse::Ok().json(json!({ "isSuccess": true, "message": "User updated successfully" }))
}

#[tracing::instrument(skip_all)]
pub(super) async fn delete_user(
    req: HttpRequest,
    state: State,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    record(&state, &req, &body);
    if !is_authorized(&state, &req) {
        return unauthorized();
    }
    let id = path.into_inner();
    let mut guard = state.lock();
    let before = guard.users.len();
    guard.users.retain(|u| u.id.to_string() != id);
    if guard.users.len() == before {
        return message(StatusCode::NOT_FOUND, "User not found");
    }
    HttpResponse::Ok().json(json!({ "isSuccess": true, "message": "User deleted successfully" }))
}

/// Serves list, get many (`id` keys) and get many by reference (`page` and
/// `perPage` keys) requests
#[tracing::instrument(skip_all)]
pub(super) async fn list_records(
    req: HttpRequest,
    state: State,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    record(&state, &req, &body);
    let query = parse_query(&req);
    let records = state.records(&path.into_inner());

    if query_value(&query, "id").is_some() {
        let ids: Vec<&str> = query
            .iter()
            .filter(|(k, _)| k == "id")
            .map(|(_, v)| v.as_str())
            .collect();
        let found: Vec<Value> = records
            .into_iter()
            .filter(|r| id_text(r).is_some_and(|id| ids.contains(&id.as_str())))
            .collect();
        return HttpResponse::Ok().json(found);
    }

    if query_value(&query, "page").is_some() || query_value(&query, "perPage").is_some() {
        let matching = filter_and_sort(records, &query, &REFERENCE_KEYS);
        let total = matching.len();
        let page = paginate(
            matching,
            query_number(&query, "page", 1),
            query_number(&query, "perPage", 10),
        );
        return HttpResponse::Ok()
            .insert_header((RESOURCE_TOTAL_COUNT_HEADER, total.to_string()))
            .json(page);
    }

    let matching = filter_and_sort(records, &query, &LIST_KEYS);
    let total = matching.len();
    let page = paginate(
        matching,
        query_number(&query, "pageNumber", 1),
        query_number(&query, "pageSize", 10),
    );
    HttpResponse::Ok()
        .insert_header((RESOURCE_TOTAL_COUNT_HEADER, total.to_string()))
        .json(json!({ "data": page }))
}

#[tracing::instrument(skip_all)]
pub(super) async fn create_record(
    req: HttpRequest,
    state: State,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let Some(Value::Object(data)) = record(&state, &req, &body) else {
        return message(StatusCode::BAD_REQUEST, "Expected a json object");
    };
    let created = state.seed_records(&path.into_inner(), vec![Value::Object(data)]);
    HttpResponse::Created().json(created.first().cloned().unwrap_or_default())
}

#[tracing::instrument(skip_all)]
pub(super) async fn update_records(
    req: HttpRequest,
    state: State,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let changes = record(&state, &req, &body).unwrap_or_else(|| Value::Object(Map::new()));
    let ids = ids_from_filter(&parse_query(&req));
    let mut guard = state.lock();
    let records = guard.records.entry(path.into_inner()).or_default();
    let mut updated = Vec::new();
    for record in records.iter_mut() {
        if id_text(record).is_some_and(|id| ids.contains(&id)) {
            merge(record, &changes);
            updated.push(record.clone());
        }
    }
    HttpResponse::Ok().json(updated)
}

#[tracing::instrument(skip_all)]
pub(super) async fn delete_records(
    req: HttpRequest,
    state: State,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    record(&state, &req, &body);
    let ids = ids_from_filter(&parse_query(&req));
    let mut guard = state.lock();
    let records = guard.records.entry(path.into_inner()).or_default();
    let (removed, kept): (Vec<Value>, Vec<Value>) = std::mem::take(records)
        .into_iter()
        .partition(|r| id_text(r).is_some_and(|id| ids.contains(&id)));
    *records = kept;
    HttpResponse::Ok().json(removed)
}

#[tracing::instrument(skip_all)]
pub(super) async fn get_record(
    req: HttpRequest,
    state: State,
    path: web::Path<(String, String)>,
    body: web::Bytes,
) -> HttpResponse {
    record(&state, &req, &body);
    let (resource, id) = path.into_inner();
    match state
        .records(&resource)
        .into_iter()
        .find(|r| id_text(r).as_deref() == Some(id.as_str()))
    {
        Some(found) => HttpResponse::Ok().json(found),
        None => message(StatusCode::NOT_FOUND, "Record not found"),
    }
}

#[tracing::instrument(skip_all)]
pub(super) async fn update_record(
    req: HttpRequest,
    state: State,
    path: web::Path<(String, String)>,
    body: web::Bytes,
) -> HttpResponse {
    let changes = record(&state, &req, &body).unwrap_or_else(|| Value::Object(Map::new()));
    let (resource, id) = path.into_inner();
    let mut guard = state.lock();
    let found = guard
        .records
        .entry(resource)
        .or_default()
        .iter_mut()
        .find(|r| id_text(r).as_deref() == Some(id.as_str()));
    match found {
        Some(found) => {
            merge(found, &changes);
            HttpResponse::Ok().json(found.clone())
        }
        None => message(StatusCode::NOT_FOUND, "Record not found"),
    }
}

#[tracing::instrument(skip_all)]
pub(super) async fn delete_record(
    req: HttpRequest,
    state: State,
    path: web::Path<(String, String)>,
    body: web::Bytes,
) -> HttpResponse {
    record(&state, &req, &body);
    let (resource, id) = path.into_inner();
    let mut guard = state.lock();
    let records = guard.records.entry(resource).or_default();
    match records
        .iter()
        .position(|r| id_text(r).as_deref() == Some(id.as_str()))
    {
        Some(index) => HttpResponse::Ok().json(records.remove(index)),
        None => message(StatusCode::NOT_FOUND, "Record not found"),
    }
}
