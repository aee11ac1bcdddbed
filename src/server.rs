//! HTTP server lifecycle: bind, serve, drain, stop.

use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::Router;
use strum::Display;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinError;
use tracing::{error, info};

use crate::error::{Result, ServiceError};
use crate::metrics;
use crate::utils::ShutdownToken;

/// Lifecycle phase of a [`Server`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    /// Listener bound, not yet serving.
    Starting,
    /// Serving requests.
    Running,
    /// Shutdown requested; waiting for in-flight requests.
    Draining,
    /// Terminal.
    Stopped,
}

/// A bound HTTP server awaiting [`Server::run`].
pub struct Server {
    listener: TcpListener,
    router: Router,
    grace: Duration,
    phase: watch::Sender<Phase>,
}

impl Server {
    /// Bind the listener. A bind failure is returned, not retried.
    pub async fn bind(addr: SocketAddr, router: Router, grace: Duration) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|source| {
            error!(%addr, error = %source, "listen error");
            ServiceError::Bind { addr, source }
        })?;
        let (phase, _) = watch::channel(Phase::Starting);

        Ok(Self {
            listener,
            router,
            grace,
            phase,
        })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Observe phase transitions.
    pub fn phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// Serve until `token` is cancelled, then drain within the grace period.
    ///
    /// Returns [`ServiceError::ShutdownTimeout`] if requests are still in
    /// flight when the grace period elapses; the serving task is aborted.
    pub async fn run(self, token: ShutdownToken) -> Result<()> {
        let Self {
            listener,
            router,
            grace,
            phase,
        } = self;
        let addr = listener.local_addr()?;

        let drain = token.clone();
        let mut serving = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { drain.cancelled().await })
                .await
        });
        set_phase(&phase, Phase::Running);
        info!(%addr, "listening");

        tokio::select! {
            _ = token.cancelled() => {}
            result = &mut serving => {
                set_phase(&phase, Phase::Stopped);
                let err = listener_failure(result);
                error!(error = %err, "listener stopped before shutdown was requested");
                return Err(err);
            }
        }

        set_phase(&phase, Phase::Draining);
        info!(?grace, "draining in-flight requests");
        let start = Instant::now();
        let outcome = tokio::time::timeout(grace, &mut serving).await;
        set_phase(&phase, Phase::Stopped);

        match outcome {
            Ok(Ok(Ok(()))) => {
                metrics::record_drain_latency(start);
                info!("Exiting...");
                Ok(())
            }
            Ok(result) => Err(listener_failure(result)),
            Err(_) => {
                serving.abort();
                error!(?grace, "Server forced to shutdown");
                Err(ServiceError::ShutdownTimeout { grace })
            }
        }
    }
}

fn set_phase(phase: &watch::Sender<Phase>, next: Phase) {
    phase.send_replace(next);
    info!(phase = %next, "server phase");
}

fn listener_failure(result: std::result::Result<io::Result<()>, JoinError>) -> ServiceError {
    match result {
        Ok(Ok(())) => ServiceError::Listener("serve loop exited".to_string()),
        Ok(Err(e)) => ServiceError::Io(e),
        Err(e) => ServiceError::Listener(e.to_string()),
    }
}
