//! HTTP server lifecycle: serve, drain on shutdown, force-stop after a
//! grace period.

use std::future::Future;
use std::time::Duration;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::error::ErrorResponse;

/// How long connections get to flush their aborted responses.
const FORCE_STOP_WAIT: Duration = Duration::from_secs(1);

/// Serves `app` on `listener` until `shutdown` resolves.
///
/// Once `shutdown` fires the listener stops accepting connections and
/// in-flight requests get `grace` to finish. Handlers still running after
/// that are dropped and their clients receive `503 Service Unavailable`.
///
/// # Errors
///
/// Returns an I/O error if the accept loop fails or the server task
/// panics.
pub async fn run<F>(
    listener: TcpListener,
    app: Router,
    grace: Duration,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let (drain_tx, mut drain_rx) = watch::channel(false);
    let (abort_tx, abort_rx) = watch::channel(false);

    let app = app.layer(middleware::from_fn(move |request: Request, next: Next| {
        let abort = abort_rx.clone();
        abortable(request, next, abort)
    }));

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = drain_rx.changed().await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => return joined.map_err(std::io::Error::other)?,
        () = shutdown => {
            tracing::info!(grace_secs = grace.as_secs(), "shutdown requested, draining in-flight requests");
        }
    }

    let _ = drain_tx.send(true);
    if let Ok(joined) = tokio::time::timeout(grace, &mut server).await {
        return joined.map_err(std::io::Error::other)?;
    }

    tracing::warn!("grace period elapsed, aborting in-flight requests");
    let _ = abort_tx.send(true);
    match tokio::time::timeout(FORCE_STOP_WAIT, &mut server).await {
        Ok(joined) => joined.map_err(std::io::Error::other)?,
        Err(_) => {
            tracing::warn!("connections still open after abort, dropping them");
            server.abort();
            Ok(())
        }
    }
}

/// Runs the rest of the stack unless the force-stop signal fires first,
/// in which case the handler future is dropped.
async fn abortable(request: Request, next: Next, mut abort: watch::Receiver<bool>) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let aborted = async move {
        if abort.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        response = next.run(request) => response,
        () = aborted => {
            tracing::warn!(%method, %uri, "request aborted at shutdown");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new("server shutting down", Some("unavailable"))),
            )
                .into_response()
        }
    }
}

/// Resolves on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
///
/// If a handler cannot be installed that signal is ignored rather than
/// treated as a shutdown request.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::warn!("received SIGINT"),
        () = terminate => tracing::warn!("received SIGTERM"),
    }
}
