use std::{future::Future, time::Duration};

use axum::Router;
use tokio::{net::TcpListener, sync::oneshot};
use tracing::{info, warn};

/// How the server stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drain {
    /// Every in-flight request finished (or the server stopped on its own).
    Completed,
    /// The grace window ran out with requests still in flight.
    TimedOut,
}

/// Serve `app` until `signal` resolves, then stop accepting and give in-flight
/// requests at most `grace` to finish.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> anyhow::Result<Drain>
where
    F: Future<Output = ()> + Send,
{
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        res = &mut server => {
            res??;
            return Ok(Drain::Completed);
        }
        _ = signal => {}
    }

    info!(grace_ms = grace.as_millis() as u64, "shutdown requested; draining in-flight requests");
    let _ = stop_tx.send(());

    match tokio::time::timeout(grace, &mut server).await {
        Ok(res) => {
            res??;
            info!("drain complete");
            Ok(Drain::Completed)
        }
        Err(_) => {
            warn!("grace window elapsed before drain finished");
            server.abort();
            Ok(Drain::TimedOut)
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c"),
        _ = terminate => info!("received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn slow_app(delay: Duration) -> Router {
        Router::new().route(
            "/slow",
            get(move || async move {
                tokio::time::sleep(delay).await;
                "done"
            }),
        )
    }

    async fn bind() -> (TcpListener, std::net::SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr)
    }

    /// Sends a request and returns once the server has started handling it.
    async fn start_request(addr: std::net::SocketAddr) -> tokio::net::TcpStream {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /slow HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        stream
    }

    #[tokio::test]
    async fn idle_server_drains_immediately() {
        let (listener, _) = bind().await;
        let outcome = serve_until(
            listener,
            slow_app(Duration::ZERO),
            async {},
            Duration::from_secs(3),
        )
        .await
        .unwrap();
        assert_eq!(outcome, Drain::Completed);
    }

    #[tokio::test]
    async fn in_flight_request_finishes_within_grace() {
        let (listener, addr) = bind().await;
        let (tx, rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve_until(
            listener,
            slow_app(Duration::from_millis(300)),
            async {
                let _ = rx.await;
            },
            Duration::from_secs(5),
        ));

        let mut stream = start_request(addr).await;
        tx.send(()).unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        let text = String::from_utf8_lossy(&response);
        assert!(text.starts_with("HTTP/1.1 200"), "got {text}");
        assert!(text.ends_with("done"));

        assert_eq!(server.await.unwrap().unwrap(), Drain::Completed);
    }

    #[tokio::test]
    async fn slow_request_past_grace_times_out() {
        let (listener, addr) = bind().await;
        let (tx, rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve_until(
            listener,
            slow_app(Duration::from_secs(30)),
            async {
                let _ = rx.await;
            },
            Duration::from_millis(200),
        ));

        let _stream = start_request(addr).await;
        tx.send(()).unwrap();

        assert_eq!(server.await.unwrap().unwrap(), Drain::TimedOut);
    }
}
