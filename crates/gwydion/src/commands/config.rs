//! Config command - configuration management.

use anyhow::Result;
use clap::{Args, Subcommand};

use gwydion_config::{self, GwydionConfig};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show resolved configuration
    Show,

    /// Show which config files are loaded and their precedence
    Which,

    /// Open configuration file in $EDITOR
    Edit,

    /// Initialize a config file with defaults
    Init {
        /// Create project-local config (./gwydion.toml) instead of user config
        #[arg(long)]
        local: bool,
    },

    /// Show configuration file path
    Path,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx).await,
        ConfigCommand::Which => cmd_which(ctx).await,
        ConfigCommand::Edit => cmd_edit().await,
        ConfigCommand::Init { local } => cmd_init(local).await,
        ConfigCommand::Path => cmd_path().await,
    }
}

async fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = gwydion_config::load_config(None)?;
    let config = &loaded.config;

    println!("# Gwydion Configuration\n");

    // Sources
    let sources = loaded.loaded_from();
    if sources.is_empty() {
        println!("No config files loaded (using defaults)\n");
    } else {
        println!("Config files:");
        for source in &sources {
            println!("  {}", source.display());
        }
        println!();
    }

    // Server settings
    let server = config.server();
    println!("Server:");
    println!("  bind: {}", server.bind_address());
    println!("  redirect: {}", server.redirect_uri);
    println!("  cors origin: {}", server.cors_origin);
    println!();

    // Google OAuth
    let google = config.google();
    println!("Google:");
    match config.client_secrets_path() {
        Ok(path) => println!("  secrets: {}", path.display()),
        Err(_) => println!("  secrets: (not configured)"),
    }
    println!("  scopes: {}", google.scopes.join(" "));
    println!();

    // Completion backend
    let openai = config.openai();
    println!("OpenAI:");
    println!("  model: {}  {}", openai.model, key_status(config));
    if let Some(ref base_url) = openai.base_url {
        println!("  base url: {}", base_url);
    }
    println!();

    // Wikipedia
    let wikipedia = config.wikipedia();
    println!("Wikipedia:");
    println!("  language: {}", wikipedia.language);
    println!();

    // Warnings
    if !loaded.warnings.is_empty() {
        println!("Warnings:");
        for w in &loaded.warnings {
            println!("  ⚠ {}", w);
        }
        println!();
    }

    if ctx.verbose {
        // Show raw TOML
        println!("---\nRaw config:\n");
        if let Ok(toml_str) = config.to_toml() {
            println!("{}", toml_str);
        }
    }

    Ok(())
}

async fn cmd_which(_ctx: &Context) -> Result<()> {
    let loaded = gwydion_config::load_config(None)?;

    println!("Config file search order (later overrides earlier):\n");

    for source in &loaded.sources {
        let status = if source.loaded {
            "✓ loaded"
        } else {
            "· not found"
        };
        println!("  {} {}", status, source.path.display());
    }

    println!();
    let loaded_count = loaded.loaded_from().len();
    if loaded_count == 0 {
        println!("No config files found. Run 'gwydion config init' to create one.");
    } else {
        println!("{} config file(s) loaded.", loaded_count);
    }

    Ok(())
}

async fn cmd_edit() -> Result<()> {
    let config_path = gwydion_config::xdg_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    if !config_path.exists() {
        println!("No config file exists yet. Run 'gwydion config init' first.");
        return Ok(());
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

    let status = std::process::Command::new(&editor)
        .arg(&config_path)
        .status()?;

    if !status.success() {
        eprintln!("Editor exited with non-zero status");
    }

    Ok(())
}

async fn cmd_init(local: bool) -> Result<()> {
    let path = if local {
        std::path::PathBuf::from("gwydion.toml")
    } else {
        let dir = gwydion_config::xdg_config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        std::fs::create_dir_all(&dir)?;
        dir.join("config.toml")
    };

    if path.exists() {
        println!("Config file already exists: {}", path.display());
        println!("Use 'gwydion config edit' to modify it.");
        return Ok(());
    }

    let template = r#"# Gwydion Configuration
# See: https://github.com/dstorey/gwydion

# [server]
# host = "127.0.0.1"
# port = 5000
# redirect_uri = "http://localhost:5000/api/callback"
# cors_origin = "http://localhost:3000"

[google]
# Path to the OAuth client secrets downloaded from the Google console.
# Falls back to the GOOGLE_APPLICATION_CREDENTIALS environment variable.
# client_secrets_file = "/path/to/client_secret.json"
scopes = ["https://www.googleapis.com/auth/calendar"]

[openai]
# api_key falls back to the OPENAI_API_KEY environment variable.
model = "gpt-4o-mini"

# [wikipedia]
# language = "en"
"#;

    std::fs::write(&path, template)?;
    println!("✓ Created config file: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  export OPENAI_API_KEY=sk-...    # completion backend key");
    println!("  gwydion config edit             # customize config");
    println!("  gwydion config show             # verify configuration");

    Ok(())
}

async fn cmd_path() -> Result<()> {
    if let Some(path) = gwydion_config::xdg_config_path() {
        println!("{}", path.display());
    } else {
        eprintln!("Could not determine config directory");
    }
    Ok(())
}

fn key_status(config: &GwydionConfig) -> &'static str {
    if config.has_plaintext_api_key() {
        "(config ✓)"
    } else if std::env::var(gwydion_config::OPENAI_API_KEY_ENV).is_ok() {
        "(env var ✓)"
    } else {
        "(no key)"
    }
}
