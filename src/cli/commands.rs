use crate::config::{load_config, ServiceConfig};
use crate::controller::{Controller, EchoController};
use crate::credentials::Credentials;
use crate::registry::{resource_class_name, ControllerRegistry};
use crate::request::{parse_method, RestRequest};
use crate::response::RestResponse;
use crate::service::RestService;
use crate::users::{InMemoryUserStore, User};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Dispatch a single REST request through the pipeline
#[derive(Parser, Debug)]
#[command(name = "restgate")]
#[command(about = "Run one request through the REST dispatch pipeline", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the service configuration file (YAML or JSON)
    #[arg(short, long, env = "RESTGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Resource to expose through an echo controller (repeatable, underscore_case)
    #[arg(short, long = "resource", value_name = "NAME")]
    pub resources: Vec<String>,

    /// Seed a user as `name:password` (repeatable)
    #[arg(short, long = "user", value_name = "NAME:PASSWORD")]
    pub users: Vec<String>,

    /// Send Basic credentials as `name:password`
    #[arg(short, long, value_name = "NAME:PASSWORD")]
    pub auth: Option<String>,

    /// Request body
    #[arg(short, long)]
    pub data: Option<String>,

    /// Content type of `--data`
    #[arg(long, default_value = "application/json")]
    pub content_type: String,

    /// HTTP method (any case)
    pub method: String,

    /// Resource name as it appears in the URL
    pub controller: String,

    /// Resource identifier
    pub id: Option<String>,

    /// Sub-property of the identified resource
    pub property: Option<String>,
}

/// Split a `name:password` argument on its first colon.
///
/// # Errors
///
/// Fails when there is no colon or the name is empty.
pub fn parse_user_pair(raw: &str) -> Result<(String, String)> {
    match raw.split_once(':') {
        Some((name, password)) if !name.is_empty() => Ok((name.to_string(), password.to_string())),
        _ => bail!("Expected NAME:PASSWORD, got '{raw}'"),
    }
}

/// Build the service described by the command line.
///
/// # Errors
///
/// Fails on an unreadable config, a malformed user pair or a rejected
/// resource registration.
pub fn build_service(cli: &Cli) -> Result<RestService> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = ServiceConfig::default();
            config.apply_env();
            config
        }
    };

    let store = InMemoryUserStore::new();
    for raw in &cli.users {
        let (name, password) = parse_user_pair(raw)?;
        store.insert(User::new(name), &password);
    }
    let store = Arc::new(store);

    let mut registry = ControllerRegistry::new();
    registry
        .exclusions_mut()
        .exclude_models(config.rest.excluded_models.iter().cloned());
    for resource in &cli.resources {
        let class_name = resource_class_name(resource);
        let name = class_name.clone();
        registry
            .register(&class_name, move |req: &RestRequest| -> Box<dyn Controller> {
                Box::new(EchoController::new(name.clone(), req))
            })
            .with_context(|| format!("Cannot expose resource '{resource}'"))?;
    }

    Ok(RestService::new(&config, registry, store.clone(), store))
}

/// Build the request described by the command line.
///
/// # Errors
///
/// Fails on an invalid method or a malformed `--auth` pair.
pub fn build_request(cli: &Cli) -> Result<RestRequest> {
    let method = parse_method(&cli.method)?;
    let mut request = RestRequest::new(method, cli.controller.clone());
    if let Some(id) = &cli.id {
        request = request.with_id(id.clone());
    }
    if let Some(property) = &cli.property {
        request = request.with_property(property.clone());
    }
    if let Some(auth) = &cli.auth {
        let (username, password) = parse_user_pair(auth)?;
        request = request.with_header(
            "Authorization",
            Credentials { username, password }.to_authorization(),
        );
    }
    if let Some(data) = &cli.data {
        request = request.with_body(Some(&cli.content_type), data.as_bytes());
    }
    Ok(request)
}

/// Build the service and request and run the request.
///
/// # Errors
///
/// Startup failures only; pipeline failures are responses.
pub fn run_cli(cli: &Cli) -> Result<RestResponse> {
    let service = build_service(cli)?;
    let request = build_request(cli)?;
    info!(
        resources = ?service.registry().resources(),
        excluded = ?service.excluded_models(),
        "Service ready"
    );
    Ok(service.handle_request(&request))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("restgate").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_user_pair() {
        assert_eq!(
            parse_user_pair("neo:the:one").unwrap(),
            ("neo".to_string(), "the:one".to_string())
        );
        assert!(parse_user_pair("neo").is_err());
        assert!(parse_user_pair(":secret").is_err());
    }

    #[test]
    fn test_put_with_body() {
        let cli = parse(&[
            "--resource", "user", "--user", "neo:matrix", "--auth", "neo:matrix",
            "--data", r#"{"name":"Neo"}"#, "put", "user", "42",
        ]);
        let res = run_cli(&cli).unwrap();
        assert_eq!(res.status, 200);
        assert_eq!(res.body["action"], "put");
        assert_eq!(res.body["data"]["name"], "Neo");
        assert_eq!(res.body["user"], "neo");
    }

    #[test]
    fn test_missing_auth_is_401() {
        let cli = parse(&["--resource", "user", "GET", "user"]);
        let res = run_cli(&cli).unwrap();
        assert_eq!(res.status, 401);
    }

    #[test]
    fn test_bad_resource_name_fails_startup() {
        let cli = parse(&["--resource", "9lives", "GET", "x"]);
        assert!(run_cli(&cli).is_err());
    }
}
