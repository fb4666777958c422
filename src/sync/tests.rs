//! SyncTV client tests against an in-process server

#[cfg(test)]
mod client_tests {
    use crate::manifest::ImportItem;
    use crate::sync::{SyncError, SyncServer, SyncTvClient};
    use axum::{
        Json, Router,
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::post,
    };
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const TOKEN: &str = "test-token";
    const ROOM: &str = "0123456789abcdef0123456789abcdef";

    #[derive(Clone, Default)]
    struct Room {
        movies: Arc<Mutex<Vec<Value>>>,
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {TOKEN}"))
    }

    fn known_room(query: &HashMap<String, String>) -> bool {
        query.get("roomId").is_some_and(|id| id == ROOM)
    }

    fn error(status: StatusCode, message: &str) -> Response {
        (status, Json(json!({"error": message}))).into_response()
    }

    async fn login(Json(body): Json<Value>) -> Response {
        if body["username"] == "root" && body["password"] == "root" {
            Json(json!({"data": {"token": TOKEN}})).into_response()
        } else {
            error(StatusCode::UNAUTHORIZED, "username or password error")
        }
    }

    async fn clear(
        State(room): State<Room>,
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> Response {
        if !authorized(&headers) {
            return error(StatusCode::UNAUTHORIZED, "unauthorized");
        }
        if !known_room(&query) {
            return error(StatusCode::BAD_REQUEST, "room id invalid");
        }
        assert_eq!(body, json!({"parentId": ""}));

        let mut movies = room.movies.lock().unwrap();
        if movies.is_empty() {
            return error(StatusCode::BAD_REQUEST, "movie list Not Found");
        }
        movies.clear();
        StatusCode::NO_CONTENT.into_response()
    }

    async fn pushs(
        State(room): State<Room>,
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
        Json(body): Json<Vec<Value>>,
    ) -> Response {
        if !authorized(&headers) {
            return error(StatusCode::UNAUTHORIZED, "unauthorized");
        }
        if !known_room(&query) {
            return error(StatusCode::BAD_REQUEST, "room id invalid");
        }
        if body.iter().any(|m| m["url"].as_str().is_none_or(str::is_empty)) {
            return (StatusCode::BAD_REQUEST, "url is empty").into_response();
        }

        room.movies.lock().unwrap().extend(body);
        Json(json!({"data": {}})).into_response()
    }

    async fn spawn_server() -> (String, Room) {
        let room = Room::default();
        let router = Router::new()
            .route("/api/user/login", post(login))
            .route("/api/room/movie/clear", post(clear))
            .route("/api/room/movie/pushs", post(pushs))
            .with_state(room.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        (format!("http://{addr}/"), room)
    }

    fn client(base: &str) -> SyncTvClient {
        SyncTvClient::new(base, Duration::from_secs(5)).unwrap()
    }

    fn items() -> Vec<ImportItem> {
        vec![
            ImportItem::new("第1集", "https://a/1.m3u8"),
            ImportItem::new("第2集", "https://a/2.m3u8"),
        ]
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let (base, _) = spawn_server().await;

        let token = client(&base).login("root", "root").await.unwrap();
        assert_eq!(token, TOKEN);
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let (base, _) = spawn_server().await;

        let err = client(&base).login("root", "wrong").await.unwrap_err();
        match err {
            SyncError::Auth { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "username or password error");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_push_preserves_order() {
        let (base, room) = spawn_server().await;
        let client = client(&base);

        let count = client.push_movies(TOKEN, ROOM, &items()).await.unwrap();

        assert_eq!(count, 2);
        let movies = room.movies.lock().unwrap();
        assert_eq!(movies[0], json!({"url": "https://a/1.m3u8", "name": "第1集"}));
        assert_eq!(movies[1]["name"], "第2集");
    }

    #[tokio::test]
    async fn test_push_rejected_with_plain_text() {
        let (base, room) = spawn_server().await;

        let err = client(&base)
            .push_movies(TOKEN, ROOM, &[ImportItem::new("broken", "")])
            .await
            .unwrap_err();

        match err {
            SyncError::Submission { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "url is empty");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(room.movies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_push_unauthorized() {
        let (base, _) = spawn_server().await;

        let err = client(&base)
            .push_movies("stale", ROOM, &items())
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Submission { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_clear_twice_is_idempotent() {
        let (base, room) = spawn_server().await;
        let client = client(&base);
        client.push_movies(TOKEN, ROOM, &items()).await.unwrap();

        client.clear_playlist(TOKEN, ROOM).await.unwrap();
        assert!(room.movies.lock().unwrap().is_empty());

        // Second call hits the "not found" answer of an empty playlist
        client.clear_playlist(TOKEN, ROOM).await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_other_bad_request_fails() {
        let (base, _) = spawn_server().await;

        let err = client(&base)
            .clear_playlist(TOKEN, "unknown-room")
            .await
            .unwrap_err();

        match err {
            SyncError::Clear { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "room id invalid");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
