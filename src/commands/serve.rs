//! Start the blog server

use anyhow::Result;

use crate::App;

/// Run the server until interrupted.
pub async fn run(app: &App, ip: &str, port: u16) -> Result<()> {
    crate::server::start(app, ip, port).await
}
