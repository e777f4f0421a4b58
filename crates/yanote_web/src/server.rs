//! HTTP server bootstrap.

use crate::build_router;
use crate::state::AppState;
use log::info;
use std::io;
use tokio::net::TcpListener;

/// Serves the application on one address until the process stops.
pub struct NotesServer {
    state: AppState,
    addr: String,
}

impl NotesServer {
    pub fn new(state: AppState, addr: impl Into<String>) -> Self {
        Self {
            state,
            addr: addr.into(),
        }
    }

    /// Binds the listener and serves requests.
    pub async fn run(self) -> io::Result<()> {
        let listener = TcpListener::bind(&self.addr).await?;
        info!(
            "event=server_start module=web status=ok addr={}",
            listener.local_addr()?
        );
        axum::serve(listener, build_router(self.state)).await
    }
}
