use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::vhost::VirtualHosts;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!(
        hosts = cfg.virtual_hosts.len(),
        "Listening on {}", cfg.server.listen_addr
    );

    serve(listener, Arc::new(cfg.virtual_hosts()), cfg.idle_timeout()).await
}

/// Accepts connections forever, one task each.
pub async fn serve(
    listener: TcpListener,
    hosts: Arc<VirtualHosts>,
    idle_timeout: Duration,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Accept failed");
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let hosts = hosts.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, hosts, idle_timeout);
            if let Err(e) = conn.run().await {
                error!("Connection error from {}: {:#}", peer, e);
            }
        });
    }
}
