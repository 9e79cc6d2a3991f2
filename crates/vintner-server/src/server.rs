//! Local file server for the output tree.
//!
//! Routing follows a narrow page rule: `/` maps to the root index page and
//! any extensionless path maps to `{path}.html`. Paths with a real extension
//! are served verbatim, so assets keep their on-disk names. Individual
//! requests are not logged.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::extract::Request;
use axum::middleware::map_request;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;

/// Errors from the serving phase.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server fault: {0}")]
    Serve(std::io::Error),
}

/// A running server task. The server only stops when [`shutdown`] is
/// called; the handle owner controls start/stop ordering.
///
/// [`shutdown`]: ServerHandle::shutdown
pub struct ServerHandle {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<(), ServerError>>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and release the port.
    pub async fn shutdown(self) -> Result<(), ServerError> {
        let _ = self.stop.send(());
        self.task
            .await
            .map_err(|err| ServerError::Serve(std::io::Error::other(err)))?
    }
}

/// Bind `addr` and serve `output_dir` until shutdown is signalled.
///
/// The listener is bound before this returns, so a taken port surfaces to
/// the caller rather than inside the spawned task.
pub async fn start(addr: SocketAddr, output_dir: PathBuf) -> Result<ServerHandle, ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let addr = listener.local_addr().map_err(ServerError::Serve)?;

    let app = router(output_dir);
    let (stop, stop_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
            .map_err(ServerError::Serve)
    });

    Ok(ServerHandle { addr, stop, task })
}

fn router(output_dir: PathBuf) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(output_dir))
        .layer(map_request(rewrite_page_path))
}

async fn rewrite_page_path(mut req: Request) -> Request {
    if let Some(page) = page_path(req.uri().path()) {
        let target = match req.uri().query() {
            Some(query) => format!("{page}?{query}"),
            None => page,
        };
        if let Ok(uri) = target.parse() {
            *req.uri_mut() = uri;
        }
    }
    req
}

/// The wire contract for page routing: `/` is the root index page, an
/// extensionless path addresses a rendered page, anything else is left for
/// the file tree.
fn page_path(path: &str) -> Option<String> {
    if path == "/" {
        return Some("/index.html".to_string());
    }
    let last = path.rsplit('/').next().unwrap_or("");
    if last.is_empty() || last.contains('.') {
        None
    } else {
        Some(format!("{path}.html"))
    }
}
