use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use crate::http::parser::{ParseError, read_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::vhost::VirtualHosts;
use crate::http::writer::ResponseWriter;

/// Idle window for the start of each request.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Drives one client connection until it closes.
pub struct Connection<S> {
    stream: BufReader<S>,
    hosts: Arc<VirtualHosts>,
    idle_timeout: Duration,
    state: ConnectionState,
}

#[derive(Debug)]
pub enum ConnectionState {
    AwaitingRequest,
    Serving(Request),
    Closing,
}

/// What one parse attempt produced.
#[derive(Debug)]
pub enum Inbound {
    Request(Request),
    /// The peer closed the stream, or it failed underneath us.
    Closed(ParseError),
    /// The idle deadline fired before a full request arrived.
    TimedOut,
    /// Bytes arrived but did not form a valid request.
    Malformed(ParseError),
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, hosts: Arc<VirtualHosts>, idle_timeout: Duration) -> Self {
        Self {
            stream: BufReader::new(stream),
            hosts,
            idle_timeout,
            state: ConnectionState::AwaitingRequest,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closing) {
                ConnectionState::AwaitingRequest => match self.next_request().await {
                    Inbound::Request(req) => {
                        self.state = ConnectionState::Serving(req);
                    }

                    Inbound::Closed(e) => {
                        debug!(reason = %e, "Peer closed connection");
                    }

                    Inbound::TimedOut => {
                        debug!(timeout = ?self.idle_timeout, "Connection idle, closing");
                    }

                    Inbound::Malformed(e) => {
                        warn!(error = %e, "Malformed request");
                        let response = Response::bad_request();
                        self.send(&response).await?;
                    }
                },

                ConnectionState::Serving(req) => {
                    let response = self.handle_request(req).await;
                    self.send(&response).await?;

                    if !response.closes_connection() {
                        self.state = ConnectionState::AwaitingRequest;
                    }
                }

                ConnectionState::Closing => {
                    // Best effort, the peer may already be gone.
                    let _ = self.stream.get_mut().shutdown().await;
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads the next request under a freshly armed idle deadline.
    pub async fn next_request(&mut self) -> Inbound {
        match tokio::time::timeout(self.idle_timeout, read_request(&mut self.stream)).await {
            Err(_) => Inbound::TimedOut,
            Ok(Ok(req)) => Inbound::Request(req),
            Ok(Err(e)) if e.is_transport() => Inbound::Closed(e),
            Ok(Err(e)) => Inbound::Malformed(e),
        }
    }

    async fn handle_request(&self, req: Request) -> Response {
        let response = match self.hosts.resolve(&req.host, &req.target).await {
            Ok(file) => Response::ok(req, file),
            Err(e) => {
                debug!(host = %req.host, target = %req.target, reason = %e, "Resolution failed");
                Response::not_found(req)
            }
        };

        if let Some(req) = &response.request {
            debug!(
                method = req.method.as_str(),
                target = %req.target,
                host = %req.host,
                status = response.status.as_u16(),
                "Request served"
            );
        }

        response
    }

    async fn send(&mut self, response: &Response) -> anyhow::Result<()> {
        ResponseWriter::new(response)
            .write_to_stream(self.stream.get_mut())
            .await
            .with_context(|| format!("writing {} response", response.status.as_u16()))
    }
}
