//! Serve the icon endpoint and stylesheets over http

use std::net::{Ipv4Addr, TcpListener};
use std::sync::Arc;

use notify::Watcher;
use pulsar_shared::cache_keys;
use pulsar_style::prelude::*;
use tiny_http::{Header, Method, Response, Server};

use crate::options::{self, PulsarConfig};
use crate::prelude::*;
use crate::styles::Pipeline;

/// Route serving every stylesheet
const STYLESHEET_ROUTE: &str = "/styles.css";

/// A response before it is turned into a `tiny_http` one
#[derive(Debug, PartialEq, Eq)]
struct Reply {
    /// Http status
    status: u16,
    /// Value of the `Content-Type` header
    content_type: &'static str,
    /// Response body
    body: String,
}

impl Reply {
    /// A plain text reply
    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.to_owned(),
        }
    }
}

/// Whether the `Authorization` header carries `token`
fn is_authorized(authorization: Option<&str>, token: Option<&str>) -> bool {
    let Some(token) = token else {
        return true;
    };
    authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|given| given.trim() == token)
}

/// Answer a single request
fn route(
    pipeline: &Pipeline,
    method: &Method,
    url: &str,
    authorization: Option<&str>,
    token: Option<&str>,
) -> Reply {
    if *method != Method::Get {
        return Reply::text(405, "Method not allowed");
    }

    let path = url.split_once('?').map_or(url, |(path, _)| path);
    if path == pulsar_shared::icons_endpoint() {
        if !is_authorized(authorization, token) {
            log::debug!("Rejected unauthorized icon request");
            return Reply::text(401, "Unauthorized");
        }

        return match serde_json::to_string(&pipeline.icons.icon_sets()) {
            Ok(body) => Reply {
                status: 200,
                content_type: "application/json",
                body,
            },
            Err(err) => {
                log::error!("Failed to serialize icon sets: {err}");
                Reply::text(500, "Failed to serialize icon sets")
            }
        };
    }

    if path == STYLESHEET_ROUTE {
        return Reply {
            status: 200,
            content_type: "text/css",
            body: pipeline.combined_css(),
        };
    }

    Reply::text(404, "🚫 404 Not Found!")
}

/// Find a free port
pub(crate) fn get_free_port(preferred: u16) -> Result<u16> {
    if TcpListener::bind((Ipv4Addr::LOCALHOST, preferred)).is_ok() {
        return Ok(preferred);
    }

    Ok(TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?
        .local_addr()?
        .port())
}

/// Run the server until the process is stopped
pub(crate) fn serve(config: &PulsarConfig, args: &options::ServeArguments) -> Result<()> {
    let pipeline = Pipeline::new(config)?;

    let cache = Arc::clone(&pipeline.cache);
    let mut watcher = notify::recommended_watcher(move |event: Result<notify::Event, _>| {
        if let Ok(event) = event
            && (event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove())
        {
            log::info!("Icons changed, clearing cache");
            cache.delete(cache_keys::ICON_SETS);
        }
    })?;
    if config.icons_dir.is_dir() {
        watcher.watch(&config.icons_dir, notify::RecursiveMode::Recursive)?;
    } else {
        log::warn!(
            "Icon directory {} not found, not watching it",
            config.icons_dir.display()
        );
    }

    let ip = if args.allow_external {
        Ipv4Addr::UNSPECIFIED
    } else {
        Ipv4Addr::LOCALHOST
    };
    let port = match args.port {
        Some(port) => port,
        None => get_free_port(8000).context("Finding free port")?,
    };

    let server = Server::http((ip, port)).map_err(|err| anyhow!("Failed to start server: {err}"))?;
    let port = server
        .server_addr()
        .to_ip()
        .ok_or_else(|| anyhow!("Server is not listening on an ip address"))?
        .port();
    println!(
        "{}{}{}{}",
        "🚀 Server running at http://".green(),
        ip.bright_red(),
        ":".bright_red(),
        port.to_string().bright_red(),
    );
    println!(
        "{} {}",
        "   icons:".bright_black(),
        pulsar_shared::icons_endpoint().bright_black()
    );

    let token = config.api_token.as_deref();
    for request in server.incoming_requests() {
        let authorization = request
            .headers()
            .iter()
            .find(|header| header.field.equiv("Authorization"))
            .map(|header| header.value.as_str().to_owned());

        let reply = route(
            &pipeline,
            request.method(),
            request.url(),
            authorization.as_deref(),
            token,
        );
        log::debug!("{} {} -> {}", request.method(), request.url(), reply.status);

        let mut response = Response::from_string(reply.body).with_status_code(reply.status);
        match Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
            Ok(header) => response.add_header(header),
            Err(()) => log::warn!("Invalid content type {}", reply.content_type),
        }

        if let Err(err) = request.respond(response) {
            log::warn!("Failed to respond: {err}");
        }
    }

    Ok(())
}
