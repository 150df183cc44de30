//! Serve command - launches the Gwydion API server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Args;

use gwydion_config::{self, GwydionConfig};
use gwydion_content::WikiClient;
use gwydion_llm::{OpenAiBackend, OpenAiConfig, SharedBackend};
use gwydion_oauth::{ClientSecrets, OAuthConfig};
use gwydion_server::{Server, ServerConfig};

use super::Context;

/// Arguments for the serve command.
///
/// CLI arguments override config file values.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind to (overrides config)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Path to the Google client-secrets JSON (overrides config)
    #[arg(long)]
    pub client_secrets: Option<PathBuf>,

    /// OpenAI API key (overrides config and OPENAI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Completion model (overrides config)
    #[arg(long)]
    pub model: Option<String>,

    /// Browser origin allowed to call the API (overrides config)
    #[arg(long)]
    pub cors_origin: Option<String>,

    /// Path to config file (overrides default discovery)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the serve command.
pub async fn run(args: ServeArgs, ctx: &Context) -> Result<()> {
    // ── Load configuration ──────────────────────────────────────────────

    let loaded = if let Some(ref config_path) = args.config {
        // Explicit config file
        let config = gwydion_config::load_config_file(config_path)?;
        gwydion_config::LoadedConfig {
            config,
            sources: vec![gwydion_config::ConfigSource {
                path: config_path.clone(),
                loaded: true,
            }],
            warnings: Vec::new(),
        }
    } else {
        gwydion_config::load_config(None)?
    };

    // Print warnings (plaintext keys, parse errors, etc.)
    for warning in &loaded.warnings {
        eprintln!("warning: {}", warning);
    }

    if ctx.verbose {
        let sources = loaded.loaded_from();
        if sources.is_empty() {
            println!("No config files found, using defaults + CLI args");
        } else {
            for source in sources {
                println!("Loaded config: {}", source.display());
            }
        }
    }

    let config = &loaded.config;

    // ── OAuth client material ───────────────────────────────────────────

    let oauth = build_oauth(config, &args)?;

    if ctx.verbose {
        println!("OAuth client: {}", oauth.client_id);
        println!("Redirect URI: {}", oauth.redirect_uri);
        println!("Scopes: {}", oauth.scope_param());
    }

    // ── Completion backend ──────────────────────────────────────────────

    let backend = build_backend(config, &args)?;

    if ctx.verbose {
        let model = args.model.clone().unwrap_or_else(|| config.openai().model);
        println!("Completion model: {}", model);
    }

    // ── Wikipedia client ────────────────────────────────────────────────

    let wikipedia = config.wikipedia();
    let mut wiki = WikiClient::for_language(&wikipedia.language)?;
    if let Some(ref base_url) = wikipedia.base_url {
        wiki = wiki.with_base_url(base_url);
    }

    // ── Server settings ─────────────────────────────────────────────────

    let server_section = config.server();
    let port = args.port.unwrap_or(server_section.port);
    let bind = args.bind.clone().unwrap_or(server_section.host);
    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;

    let cors_origin = args
        .cors_origin
        .clone()
        .unwrap_or(server_section.cors_origin);

    let mut server_config = ServerConfig::new()
        .with_bind_address(addr)
        .with_cors_origin(&cors_origin)
        .with_request_logging(true);

    let google = config.google();
    if let Some(ref calendar_url) = google.calendar_url {
        server_config = server_config.with_calendar_url(calendar_url);
    }

    if ctx.verbose {
        println!("Bind address: {}", addr);
        println!("CORS origin: {}", cors_origin);
        if let Some(ref url) = google.calendar_url {
            println!("Calendar API: {}", url);
        }
    }

    // ── Start server ────────────────────────────────────────────────────

    let server = Server::new(oauth, backend, wiki, server_config);

    println!("Gwydion server starting on http://{}", addr);
    println!("Press Ctrl+C to stop");

    server.run().await?;

    Ok(())
}

/// Assemble the OAuth configuration from client secrets plus config overrides.
fn build_oauth(config: &GwydionConfig, args: &ServeArgs) -> Result<OAuthConfig> {
    let secrets_path = match args.client_secrets {
        Some(ref path) => path.clone(),
        None => config.client_secrets_path()?,
    };

    let secrets = ClientSecrets::from_file(&secrets_path).with_context(|| {
        format!(
            "failed to load client secrets from {}",
            secrets_path.display()
        )
    })?;

    let google = config.google();
    let redirect_uri = config.server().redirect_uri;

    let mut oauth = OAuthConfig::from_secrets(secrets, &redirect_uri, google.scopes);
    if let Some(ref auth_url) = google.auth_url {
        oauth = oauth.with_auth_url(auth_url);
    }
    if let Some(ref token_url) = google.token_url {
        oauth = oauth.with_token_url(token_url);
    }

    Ok(oauth)
}

/// Assemble the completion backend from config plus CLI overrides.
fn build_backend(config: &GwydionConfig, args: &ServeArgs) -> Result<SharedBackend> {
    let api_key = match args.api_key {
        Some(ref key) => key.clone(),
        None => config.openai_api_key().context(
            "OpenAI API key required. Set OPENAI_API_KEY or add api_key to [openai] in the config",
        )?,
    };

    let openai = config.openai();
    let model = args.model.clone().unwrap_or(openai.model);

    let mut backend_config = OpenAiConfig::new(api_key)
        .with_model(&model)
        .with_timeout(Duration::from_secs(openai.timeout_secs));
    if let Some(ref base_url) = openai.base_url {
        backend_config = backend_config.with_base_url(base_url);
    }

    Ok(Arc::new(OpenAiBackend::new(backend_config)?))
}
