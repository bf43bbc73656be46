//! Development server for the generated documents.
//!
//! A lightweight HTTP server built on `tiny_http`:
//!
//! - Serves the generated files from the output directory
//! - Applies the feed route policy: RSS routes answer 404 with an empty
//!   body while the feed subsystem is disabled, so "feed disabled"
//!   (not-found) stays distinguishable from "feed enabled but empty"
//!   (valid empty document)
//! - Graceful shutdown on Ctrl+C

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result};
use std::{fs, net::SocketAddr, path::PathBuf, sync::Arc};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the server and block until Ctrl+C.
pub fn serve_site(config: &SiteConfig) -> Result<()> {
    let interface: std::net::IpAddr = config.serve.interface.parse()?;
    let base_port = config.serve.port;

    let (server, addr) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < max_retries => {
                continue;
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    max_retries,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

// ============================================================================
// Request Handling
// ============================================================================

/// Outcome of resolving a request path against the route policy.
#[derive(Debug, PartialEq, Eq)]
enum Resolution {
    /// Serve this file from the output directory.
    File(PathBuf),
    /// Answer 404 with an empty body.
    NotFound,
}

/// Handle a single HTTP request.
fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    let path = request_path(request.url());

    match resolve(&path, config) {
        Resolution::File(file) => match fs::read(&file) {
            Ok(bytes) => {
                let header = content_type(&file, is_rss_route(&path, config));
                request.respond(Response::from_data(bytes).with_header(header))?;
            }
            Err(_) => request.respond(Response::empty(StatusCode(404)))?,
        },
        Resolution::NotFound => request.respond(Response::empty(StatusCode(404)))?,
    }

    Ok(())
}

/// Strip the query string from a request URL.
fn request_path(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_string()
}

/// Apply the route policy and map a request path to an output file.
///
/// Request paths are matched without percent-decoding: category feeds
/// are written under their percent-encoded labels, so the encoded URL
/// is the file name.
fn resolve(path: &str, config: &SiteConfig) -> Resolution {
    // Path traversal never reaches the filesystem
    if path.split('/').any(|segment| segment == "..") {
        return Resolution::NotFound;
    }

    // Administrative disable: RSS routes are gone, not empty
    if !config.build.rss.enable && is_rss_route(path, config) {
        return Resolution::NotFound;
    }

    let relative = path.trim_start_matches('/');
    let mut file = config.build.output.join(relative);
    if relative.is_empty() || file.is_dir() {
        file = file.join("index.html");
    }

    if file.is_file() {
        Resolution::File(file)
    } else {
        Resolution::NotFound
    }
}

/// True for the site feed route and every per-category feed route.
fn is_rss_route(path: &str, config: &SiteConfig) -> bool {
    let rss_path = format!("/{}", config.build.rss.path.display());
    let category_prefix = format!("/{}/", config.build.rss.category_dir.display());
    path == rss_path || path.starts_with(&category_prefix)
}

/// Content-Type header for a resolved file.
///
/// Returns `application/octet-stream` for unknown extensions.
fn content_type(file: &std::path::Path, is_rss: bool) -> Header {
    let value = match file.extension().and_then(|e| e.to_str()) {
        Some("json") => "application/json",
        Some("xml") if is_rss => "application/rss+xml",
        Some("xml") => "application/xml",
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    };

    Header::from_bytes("Content-Type", value).unwrap()
}
