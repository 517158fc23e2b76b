use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use axum::extract::ws::{self, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{any, get, post};
use axum::{Json, Router};
use futures_util::StreamExt as _;
use log::{debug, info};
use rizzroast_model::share::share_link;
use rizzroast_model::{RoastLevel, Screen};
use serde::{Deserialize, Serialize};
use tower_http::services::{ServeDir, ServeFile};

use crate::rizzroast::message_bus::{Message, MessageBus, UiCommand};

struct AppState {
    message_bus: MessageBus,
}

type AppStateArg = State<Arc<AppState>>;

#[derive(Serialize)]
struct EmptyResponse {}

impl IntoResponse for EmptyResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

impl AppState {
    fn send(&self, command: UiCommand) -> EmptyResponse {
        self.message_bus.send(Message::UiCommand(command));
        EmptyResponse {}
    }
}

async fn initialize_ui(State(state): AppStateArg) -> impl IntoResponse {
    debug!("initialize_ui");
    state.send(UiCommand::InitializeUi)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Generate {
    screen: Screen,
    input: String,
    roast_level: Option<RoastLevel>,
}
async fn generate(State(state): AppStateArg, Json(body): Json<Generate>) -> impl IntoResponse {
    debug!("generate({:?})", body);
    state.send(UiCommand::Generate {
        screen: body.screen,
        input: body.input,
        roast_level: body.roast_level,
    })
}

#[derive(Debug, Deserialize)]
struct ScreenBody {
    screen: Screen,
}
async fn save_favorite(State(state): AppStateArg, Json(body): Json<ScreenBody>) -> impl IntoResponse {
    debug!("save_favorite({:?})", body);
    state.send(UiCommand::SaveFavorite(body.screen))
}

async fn clear_line(State(state): AppStateArg, Json(body): Json<ScreenBody>) -> impl IntoResponse {
    debug!("clear_line({:?})", body);
    state.send(UiCommand::ClearLine(body.screen))
}

#[derive(Debug, Deserialize)]
struct DeleteFavorite {
    screen: Screen,
    index: usize,
}
async fn delete_favorite(
    State(state): AppStateArg,
    Json(body): Json<DeleteFavorite>,
) -> impl IntoResponse {
    debug!("delete_favorite({:?})", body);
    state.send(UiCommand::DeleteFavorite(body.screen, body.index))
}

#[derive(Debug, Deserialize)]
struct Share {
    text: String,
}
async fn share(Query(query): Query<Share>) -> impl IntoResponse {
    Redirect::to(&share_link(&query.text))
}

async fn create_ui_event_stream(ws: WebSocketUpgrade, State(state): AppStateArg) -> Response {
    ws.on_upgrade(move |socket| ui_event_stream(socket, state.message_bus.clone()))
}

fn wrap_result<T: Serialize, E: Display>(
    r: std::result::Result<T, E>,
) -> std::result::Result<ws::Message, axum::Error> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    enum WrappedResult<T> {
        Success(T),
        Error(String),
    }
    let wrapped_result = match r {
        Ok(data) => WrappedResult::Success(data),
        Err(e) => WrappedResult::Error(e.to_string()),
    };
    let json_text = serde_json::to_string(&wrapped_result)
        .unwrap_or_else(|e| format!("{{ \"error\": \"JSON serialization failed: {e}\" }}"));
    Ok(ws::Message::text(json_text))
}

async fn ui_event_stream(socket: WebSocket, message_bus: MessageBus) {
    info!("New UI event stream started.");
    let stream = message_bus.subscribe().ui_update_stream().map(wrap_result);
    match stream.forward(socket).await {
        Ok(()) => {
            info!("UI event stream closed.");
        }
        Err(e) => {
            info!("UI event stream closed with: {e}.");
        }
    }
}

async fn redirect_to_ui() -> impl IntoResponse {
    Redirect::permanent("/ui/")
}

fn router(message_bus: MessageBus, static_dir: &Path) -> Router {
    let shared_state = Arc::new(AppState { message_bus });
    // Anything under /ui that is not a file (e.g. /ui/roast) gets the page, which picks the screen from the URL.
    let ui = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
    Router::new()
        .route("/", get(redirect_to_ui))
        .nest(
            "/ui/api/v1",
            Router::new()
                .route("/ui_stream", any(create_ui_event_stream))
                .route("/initialize_ui", post(initialize_ui))
                .route("/generate", post(generate))
                .route("/save_favorite", post(save_favorite))
                .route("/delete_favorite", post(delete_favorite))
                .route("/clear_line", post(clear_line))
                .route("/share", get(share))
                .with_state(shared_state),
        )
        .fallback_service(Router::new().nest_service("/ui", ui))
}

pub async fn serve(message_bus: MessageBus, addr: String, static_dir: &Path) -> Result<()> {
    let app = router(message_bus, static_dir);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;
    info!("Serving UI on http://{addr}/ui/");
    axum::serve(listener, app).await.context("Api server failed")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use reqwest::redirect::Policy;
    use serde_json::json;
    use tempdir::TempDir;

    use super::*;
    use crate::rizzroast::message_bus::MessageBusSubscription;

    async fn spawn_api(message_bus: MessageBus) -> String {
        spawn_api_serving(message_bus, Path::new("ui/dist")).await
    }

    async fn spawn_api_serving(message_bus: MessageBus, static_dir: &Path) -> String {
        let app = router(message_bus, static_dir);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        format!("http://{addr}")
    }

    async fn next_command(subscription: &mut MessageBusSubscription) -> UiCommand {
        loop {
            if let Some(Message::UiCommand(command)) = subscription.recv().await {
                return command;
            }
        }
    }

    #[tokio::test]
    async fn generate_is_forwarded_to_bus() {
        let message_bus = MessageBus::new();
        let mut subscription = message_bus.subscribe();
        let base = spawn_api(message_bus).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/ui/api/v1/generate"))
            .json(&json!({"screen": "roast", "input": "Bob", "roastLevel": "Savage"}))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        match next_command(&mut subscription).await {
            UiCommand::Generate {
                screen,
                input,
                roast_level,
            } => {
                assert_eq!(screen, Screen::Roast);
                assert_eq!(input, "Bob");
                assert_eq!(roast_level, Some(RoastLevel::Savage));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_favorite_is_forwarded_to_bus() {
        let message_bus = MessageBus::new();
        let mut subscription = message_bus.subscribe();
        let base = spawn_api(message_bus).await;

        reqwest::Client::new()
            .post(format!("{base}/ui/api/v1/delete_favorite"))
            .json(&json!({"screen": "pickup", "index": 3}))
            .send()
            .await
            .unwrap();
        assert!(matches!(
            next_command(&mut subscription).await,
            UiCommand::DeleteFavorite(Screen::Pickup, 3)
        ));
    }

    #[tokio::test]
    async fn unknown_screen_is_rejected() {
        let message_bus = MessageBus::new();
        let _subscription = message_bus.subscribe();
        let base = spawn_api(message_bus).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/ui/api/v1/save_favorite"))
            .json(&json!({"screen": "home"}))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn share_redirects_to_whatsapp() {
        let base = spawn_api(MessageBus::new()).await;
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .unwrap();
        let response = client
            .get(format!("{base}/ui/api/v1/share"))
            .query(&[("text", "You are *amazing*")])
            .send()
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers()["location"],
            "https://wa.me/?text=You%20are%20*amazing*"
        );
    }

    #[tokio::test]
    async fn static_files_are_served_under_ui() {
        let dir = TempDir::new("rizzroast").unwrap();
        fs::write(dir.path().join("index.html"), "<p>page</p>").unwrap();
        fs::write(dir.path().join("app.js"), "start()").unwrap();
        let base = spawn_api_serving(MessageBus::new(), dir.path()).await;

        let get = |path: &str| reqwest::get(format!("{base}{path}"));
        assert_eq!(get("/ui/app.js").await.unwrap().text().await.unwrap(), "start()");
        assert_eq!(get("/ui/").await.unwrap().text().await.unwrap(), "<p>page</p>");
        assert_eq!(get("/ui/roast").await.unwrap().text().await.unwrap(), "<p>page</p>");
        assert!(get("/app.js").await.unwrap().status().is_client_error());
    }
}
