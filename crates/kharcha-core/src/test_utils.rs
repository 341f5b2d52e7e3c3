//! Test utilities for kharcha-core
//!
//! A mock analysis server answering both analysis endpoints with a fixed
//! response, for exercising [`crate::client::AnalysisClient`] without a
//! database behind it.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::models::AnalysisData;

/// What the mock server answers with
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 200 with this payload
    Data(AnalysisData),
    /// 204, no body
    NoContent,
    /// The given status with an `{"error": message}` body
    Error { status: u16, message: String },
}

struct MockState {
    response: MockResponse,
    requests: Mutex<Vec<Value>>,
}

/// Mock analysis server for client tests
pub struct MockAnalysisServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAnalysisServer {
    /// Start the mock server on an available port
    pub async fn start(response: MockResponse) -> Self {
        let state = Arc::new(MockState {
            response,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/expenses/monthly-analysis", post(handle_analysis))
            .route("/api/expenses/yearly-analysis", post(handle_analysis))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request bodies received so far
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAnalysisServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_analysis(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.requests.lock().unwrap().push(body);

    match &state.response {
        MockResponse::Data(data) => Json(data.clone()).into_response(),
        MockResponse::NoContent => StatusCode::NO_CONTENT.into_response(),
        MockResponse::Error { status, message } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({ "error": message }))).into_response()
        }
    }
}
