//! Serving the language server over stdio or TCP

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use buglang_config::Settings;
use tokio::net::TcpListener;
use tower_lsp::{LspService, Server};
use tracing::info;

use crate::server::BuglangLspServer;
use crate::symbols::SymbolTables;

/// Default TCP port
pub const DEFAULT_PORT: u16 = 9257;

/// Default TCP bind address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// How the server talks to its client
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Stdio,
    Tcp { host: String, port: u16 },
}

/// Parse a TCP bind address
pub fn socket_addr(host: &str, port: u16) -> Result<SocketAddr> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    Ok(addr)
}

/// Run the server until the client disconnects (stdio) or forever (TCP)
pub async fn serve(transport: Transport, settings: Settings) -> Result<()> {
    let tables = Arc::new(SymbolTables::buglang());
    let settings = Arc::new(settings);

    match transport {
        Transport::Stdio => serve_stdio(tables, settings).await,
        Transport::Tcp { host, port } => {
            serve_tcp(socket_addr(&host, port)?, tables, settings).await
        }
    }
}

/// Run LSP server in stdio mode
async fn serve_stdio(tables: Arc<SymbolTables>, settings: Arc<Settings>) -> Result<()> {
    info!("starting Buglang LSP server (stdio mode)");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        LspService::new(move |client| BuglangLspServer::with_settings(client, tables, settings));
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}

/// Run LSP server in TCP mode, one service per connection
async fn serve_tcp(
    addr: SocketAddr,
    tables: Arc<SymbolTables>,
    settings: Arc<Settings>,
) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "Buglang LSP server listening");

    loop {
        let (stream, client_addr) = listener.accept().await?;
        info!(%client_addr, "client connected");

        let (read, write) = tokio::io::split(stream);

        let tables = Arc::clone(&tables);
        let settings = Arc::clone(&settings);
        let (service, socket) = LspService::new(move |client| {
            BuglangLspServer::with_settings(client, tables, settings)
        });

        tokio::spawn(async move {
            Server::new(read, write, socket).serve(service).await;
            info!(%client_addr, "client disconnected");
        });
    }
}
