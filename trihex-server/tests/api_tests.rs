//! Integration tests for trihex-server API

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use trihex_server::{create_router, ServerState};
use trihex_worker::WorkerConfig;

fn test_app() -> axum::Router {
    let config = WorkerConfig {
        seed: Some(42),
        ..WorkerConfig::default()
    };
    let state = Arc::new(ServerState::new(config).unwrap());
    create_router(state)
}

fn blank_edges() -> Value {
    json!(["blank", "blank", "blank", "blank", "blank", "blank"])
}

fn one_triangle_edges() -> Value {
    json!(["triangle", "blank", "blank", "blank", "blank", "blank"])
}

async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_status_endpoint() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "ok");
    assert_eq!(json["engine"], "rust");
    assert_eq!(json["requests"]["moves"], 0);
}

#[tokio::test]
async fn test_ai_move_takes_the_point() {
    let request = json!({
        "board": [
            { "id": 0, "ownerId": 1, "edges": one_triangle_edges(),
              "orientation": 0, "x": 0, "y": 0 }
        ],
        "ownHand": [{ "id": 1, "ownerId": 1, "edges": one_triangle_edges() }],
        "opponentHand": [],
        "actingPlayerId": 1,
        "opponentPlayerId": 2,
        "mode": "basic",
        "difficulty": "greedy"
    });

    let (status, json) = post_json(test_app(), "/api/ai/move", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "place");
    assert_eq!(json["tileId"], 1);
    assert_eq!(json["orientation"], 3);
    assert_eq!(json["x"], 0);
    assert_eq!(json["y"], -1);
}

#[tokio::test]
async fn test_ai_move_without_tiles_is_none() {
    let request = json!({
        "board": [],
        "ownHand": [],
        "opponentHand": [],
        "actingPlayerId": 2,
        "opponentPlayerId": 1,
        "difficulty": "hard"
    });

    let (status, json) = post_json(test_app(), "/api/ai/move", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "type": "none" }));
}

#[tokio::test]
async fn test_bad_snapshot_is_rejected() {
    let request = json!({
        "board": [{ "id": 0, "ownerId": 1, "edges": ["blank", "blank"], "x": 0, "y": 0 }],
        "ownHand": [],
        "opponentHand": [],
        "actingPlayerId": 1,
        "opponentPlayerId": 2
    });

    let (status, json) = post_json(test_app(), "/api/ai/move", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("2 edges"));
}

#[tokio::test]
async fn test_ai_removal_picks_opponent_tile() {
    let mut board = vec![json!({ "id": 20, "ownerId": 2, "edges": blank_edges(), "x": 0, "y": 0 })];
    let ring = [(0, -1), (1, -1), (1, 0), (0, 1), (-1, 1), (-1, 0)];
    for (i, (x, y)) in ring.iter().enumerate() {
        board.push(json!({ "id": i, "ownerId": 1, "edges": blank_edges(), "x": x, "y": y }));
    }
    let request = json!({
        "board": board,
        "surroundedTiles": [{ "id": 20, "x": 0, "y": 0, "ownerId": 2 }],
        "actingPlayerId": 1,
        "difficulty": "medium"
    });

    let (status, json) = post_json(test_app(), "/api/ai/removal", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "id": 20, "x": 0, "y": 0, "ownerId": 2 }));
}

#[tokio::test]
async fn test_removal_of_open_tile_is_rejected() {
    let board = json!([
        { "id": 20, "ownerId": 2, "edges": blank_edges(), "x": 0, "y": 0 },
        { "id": 0, "ownerId": 1, "edges": blank_edges(), "x": 0, "y": -1 }
    ]);
    let request = json!({
        "board": board,
        "surroundedTiles": [{ "id": 20, "x": 0, "y": 0, "ownerId": 2 }],
        "actingPlayerId": 1
    });

    let (status, json) = post_json(test_app(), "/api/ai/removal", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("not surrounded"));
}

#[tokio::test]
async fn test_legal_moves_on_empty_board() {
    let request = json!({
        "board": [],
        "ownHand": [{ "id": 0, "ownerId": 1, "edges": one_triangle_edges() }],
        "opponentHand": [],
        "actingPlayerId": 1,
        "opponentPlayerId": 2
    });

    let (status, json) = post_json(test_app(), "/api/moves", request).await;

    assert_eq!(status, StatusCode::OK);
    // A single-triangle tile has six distinct orientations, all on the origin
    assert_eq!(json["count"], 6);
    for mv in json["moves"].as_array().unwrap() {
        assert_eq!(mv["x"], 0);
        assert_eq!(mv["y"], 0);
    }
}

#[tokio::test]
async fn test_score_endpoint() {
    let request = json!({
        "board": [
            { "id": 0, "ownerId": 1, "edges": one_triangle_edges(),
              "orientation": 0, "x": 0, "y": 0 },
            { "id": 1, "ownerId": 1, "edges": one_triangle_edges(),
              "orientation": 3, "x": 0, "y": -1 }
        ]
    });

    let (status, json) = post_json(test_app(), "/api/score", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["player1"], 1);
    assert_eq!(json["player2"], 0);
    assert_eq!(json["surrounded"], 0);
}
