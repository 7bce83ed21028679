mod interactive;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slyd_client::Console;
use slyd_core::config::ENV_CONFIG_PATH;
use slyd_core::launch::{build_command, display_config, shell_join};
use slyd_core::{
    BenchmarkPanel, ConsoleConfig, RawConfig, ServiceConfig, TestSuite,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slyd")]
#[command(about = "Slyd - admin console for a local vLLM service", long_about = None)]
struct Cli {
    /// JSON settings file (defaults to $SLYD_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Management API base URL
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Port the inference service listens on
    #[arg(long, global = true)]
    service_port: Option<u16>,

    /// Bearer token for the management API
    #[arg(long, global = true)]
    api_token: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show service status and probe the inference API
    Status,

    /// Restart the inference service
    Restart {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Check that a model exists and is accessible
    CheckModel {
        /// Model ID (e.g. HuggingFaceTB/SmolLM3-3B)
        model_id: String,
    },

    /// Read and write the service configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Store the model hub access token
    Token {
        token: String,
    },

    /// Send one prompt to the served model
    Chat {
        prompt: String,

        /// Max tokens to generate
        #[arg(short, long, default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: u32,

        /// Temperature for generation
        #[arg(short, long, default_value_t = DEFAULT_TEMPERATURE)]
        temperature: f32,
    },

    /// Run a benchmark suite (quick, standard, full, stress)
    Bench {
        #[arg(default_value = "quick")]
        suite: TestSuite,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Print the vLLM server command for a config file
    LaunchCmd {
        file: PathBuf,

        /// Also list every setting
        #[arg(long)]
        display: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the stored configuration
    Show {
        /// Print the raw JSON instead of form fields
        #[arg(long)]
        raw: bool,
    },

    /// Update form fields and save the whole form
    Save {
        /// Field to change, repeatable (e.g. --set port=8000)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Replace the stored config with raw JSON from a file, or - for stdin
    Edit {
        file: String,
    },

    /// Restore factory defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print factory defaults without contacting the backend
    Defaults,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli, |key| std::env::var(key).ok())?;

    let ok = match cli.command {
        None => {
            interactive::run(Console::new(config)?).await?;
            true
        }
        Some(Commands::LaunchCmd { file, display }) => cmd_launch(&file, display)?,
        Some(Commands::Config(ConfigCommand::Defaults)) => cmd_defaults()?,
        Some(command) => {
            let mut console = Console::new(config)?;
            run_command(&mut console, command).await?
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Defaults, then the settings file, then the environment, then flags.
fn load_config(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> Result<ConsoleConfig> {
    let path = cli
        .config
        .clone()
        .or_else(|| lookup(ENV_CONFIG_PATH).map(PathBuf::from));

    let config = match path {
        Some(path) => ConsoleConfig::from_file(&path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?,
        None => ConsoleConfig::default(),
    };
    let mut config = config.apply_vars(&lookup)?;

    if let Some(base) = &cli.api_base {
        config.api_base = base.clone();
    }
    if let Some(port) = cli.service_port {
        config.service_port = port;
    }
    if let Some(token) = &cli.api_token {
        config.api_token = Some(token.clone());
    }
    tracing::debug!("Management API at {}", config.api_base);
    Ok(config)
}

async fn run_command(console: &mut Console, command: Commands) -> Result<bool> {
    match command {
        Commands::Status => cmd_status(console).await,
        Commands::Restart { yes } => cmd_restart(console, yes).await,
        Commands::CheckModel { model_id } => {
            console.form_mut().set("model", &model_id)?;
            cmd_check_model(console).await
        }
        Commands::Config(ConfigCommand::Show { raw }) => cmd_config_show(console, raw).await,
        Commands::Config(ConfigCommand::Save { set }) => cmd_config_save(console, &set).await,
        Commands::Config(ConfigCommand::Edit { file }) => {
            let text = read_source(&file)?;
            cmd_config_edit(console, text).await
        }
        Commands::Config(ConfigCommand::Reset { yes }) => cmd_config_reset(console, yes).await,
        Commands::Config(ConfigCommand::Defaults) => cmd_defaults(),
        Commands::Token { token } => cmd_token(console, &token).await,
        Commands::Chat {
            prompt,
            max_tokens,
            temperature,
        } => cmd_chat(console, &prompt, max_tokens, temperature).await,
        Commands::Bench { suite, output } => cmd_bench(console, suite, &output).await,
        Commands::LaunchCmd { file, display } => cmd_launch(&file, display),
    }
}

pub(crate) async fn cmd_status(console: &mut Console) -> Result<bool> {
    println!("Service Status:");
    println!("{:-<40}", "");
    println!("  Management API: {}", console.config().api_base);
    println!();

    let panel = console.poll().await;
    println!("{}", panel.render());
    Ok(!panel.is_error())
}

pub(crate) async fn cmd_restart(console: &mut Console, yes: bool) -> Result<bool> {
    if !yes && !confirm("Are you sure you want to restart the vLLM service?")? {
        println!("  Cancelled.");
        return Ok(true);
    }

    let panel = console.restart_service().await;
    println!("{}", panel.render());
    if panel.is_error() {
        return Ok(false);
    }

    let delay = console.config().restart_settle();
    println!("Checking status in {}s...", delay.as_secs_f32());
    println!();
    let panel = console.poll_after(delay).await;
    println!("{}", panel.render());
    Ok(!panel.is_error())
}

pub(crate) async fn cmd_check_model(console: &mut Console) -> Result<bool> {
    println!("Checking {}...", console.state().form.model.trim());
    let message = console.check_model().await;
    println!("{}", message);
    Ok(!message.is_error())
}

async fn cmd_config_show(console: &mut Console, raw: bool) -> Result<bool> {
    if raw {
        println!("{}", console.load_raw().await?);
    } else {
        console.load_form().await?;
        println!("Service Configuration:");
        println!("{:-<40}", "");
        println!("{}", console.state().render_form());
    }
    Ok(true)
}

async fn cmd_config_save(console: &mut Console, assignments: &[String]) -> Result<bool> {
    console.load_form().await?;
    for assignment in assignments {
        let (key, value) = assignment
            .split_once('=')
            .with_context(|| format!("Expected KEY=VALUE, got {:?}", assignment))?;
        console.form_mut().set(key.trim(), value)?;
    }

    let message = console.save_config().await;
    println!("{}", message);
    Ok(!message.is_error())
}

pub(crate) async fn cmd_config_edit(console: &mut Console, text: String) -> Result<bool> {
    console.set_raw_editor(text);
    let message = console.save_raw().await;
    println!("{}", message);
    if message.is_error() {
        return Ok(false);
    }

    let delay = console.config().raw_save_settle();
    println!("Checking status in {}s...", delay.as_secs_f32());
    println!();
    let panel = console.settle_after_raw_save().await;
    println!("{}", panel.render());
    Ok(true)
}

pub(crate) async fn cmd_config_reset(console: &mut Console, yes: bool) -> Result<bool> {
    if !yes && !confirm("Are you sure you want to reset to default configuration?")? {
        println!("  Cancelled.");
        return Ok(true);
    }

    let message = console.reset_config().await;
    println!("{}", message);
    Ok(!message.is_error())
}

pub(crate) fn cmd_defaults() -> Result<bool> {
    let raw = ServiceConfig::default().to_raw()?;
    println!("Default Configuration:");
    println!("{:-<40}", "");
    println!("{}", display_config(&raw)?);
    Ok(true)
}

pub(crate) async fn cmd_token(console: &mut Console, token: &str) -> Result<bool> {
    let message = console.save_token(token).await;
    println!("{}", message);
    Ok(!message.is_error())
}

pub(crate) async fn cmd_chat(
    console: &mut Console,
    prompt: &str,
    max_tokens: u32,
    temperature: f32,
) -> Result<bool> {
    let panel = console.chat(prompt, max_tokens, temperature).await;
    println!("{}", panel.render());
    Ok(!panel.is_error())
}

pub(crate) async fn cmd_bench(console: &mut Console, suite: TestSuite, output: &str) -> Result<bool> {
    eprintln!("{}", suite.caption());

    let panel = console.run_benchmark(suite).await;
    match (panel, output) {
        (BenchmarkPanel::Report(result), "json") => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        (panel, _) => println!("{}", panel.render()),
    }
    Ok(!panel.is_error())
}

fn cmd_launch(file: &Path, display: bool) -> Result<bool> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let raw = RawConfig::parse(&text)?;
    let argv = build_command(&raw)?;

    if display {
        println!("Configuration:");
        println!("{}", display_config(&raw)?);
        println!();
    }
    println!("{}", shell_join(&argv));
    Ok(true)
}

fn read_source(file: &str) -> Result<String> {
    if file == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))
}

pub(crate) fn confirm(question: &str) -> Result<bool> {
    print!("  {} (y/N): ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
