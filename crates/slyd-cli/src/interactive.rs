use crate::{
    cmd_bench, cmd_chat, cmd_check_model, cmd_config_edit, cmd_config_reset, cmd_defaults,
    cmd_restart, cmd_status, cmd_token,
};
use anyhow::Result;
use slyd_client::Console;
use slyd_core::{TestSuite, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use std::io::{self, BufRead, Write};

pub async fn run(mut console: Console) -> Result<()> {
    display_welcome();

    if let Err(e) = console.load_form().await {
        println!("  Could not load stored configuration: {}", e);
    }
    cmd_status(&mut console).await?;
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("slyd> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (cmd, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (trimmed.to_lowercase(), ""),
        };

        if matches!(cmd.as_str(), "exit" | "quit" | "q") {
            println!("  Goodbye!");
            break;
        }

        if let Err(e) = dispatch(&mut console, &cmd, rest).await {
            println!("Error: {}", e);
        }
        println!();
    }

    Ok(())
}

async fn dispatch(console: &mut Console, cmd: &str, rest: &str) -> Result<()> {
    match cmd {
        "help" | "h" | "?" => display_help(),
        "status" | "s" => {
            cmd_status(console).await?;
        }
        "restart" => {
            cmd_restart(console, false).await?;
        }
        "check" | "c" => {
            if !rest.is_empty() {
                console.form_mut().set("model", rest)?;
            }
            cmd_check_model(console).await?;
        }
        "form" | "f" => println!("{}", console.state().render_form()),
        "set" => {
            let (key, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if key.is_empty() {
                println!("Usage: set <field> <value>   (an empty value clears optional fields)");
            } else {
                console.form_mut().set(key, value.trim())?;
                println!("  {} = {}", key, value.trim());
            }
        }
        "save" => println!("{}", console.save_config().await),
        "reload" => {
            console.load_form().await?;
            println!("{}", console.state().render_form());
        }
        "reset" => {
            cmd_config_reset(console, false).await?;
        }
        "raw" => handle_raw_command(console, rest).await?,
        "defaults" => {
            cmd_defaults()?;
        }
        "token" => {
            cmd_token(console, rest).await?;
        }
        "chat" => {
            cmd_chat(console, rest, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE).await?;
        }
        "bench" | "b" => {
            let suite = if rest.is_empty() {
                TestSuite::default()
            } else {
                rest.parse()?
            };
            cmd_bench(console, suite, "text").await?;
        }
        "clear" | "cls" => {
            print!("\x1B[2J\x1B[1;1H");
            io::stdout().flush()?;
        }
        _ => {
            println!("Unknown command: {}. Type 'help' for available commands.", cmd);
        }
    }
    Ok(())
}

async fn handle_raw_command(console: &mut Console, args: &str) -> Result<()> {
    let mut parts = args.splitn(2, char::is_whitespace);
    match (parts.next().unwrap_or(""), parts.next().map(str::trim)) {
        ("" | "load", None) => println!("{}", console.load_raw().await?),
        ("save", Some(path)) if !path.is_empty() => {
            let text = std::fs::read_to_string(path)?;
            cmd_config_edit(console, text).await?;
        }
        _ => {
            println!("Usage: raw            Show the stored JSON");
            println!("       raw save <file>  Replace it with the JSON in <file>");
        }
    }
    Ok(())
}

fn display_welcome() {
    println!();
    println!("  ╔═╗ ╦   ╦ ╦ ╔╦╗");
    println!("  ╚═╗ ║   ╚╦╝  ║║");
    println!("  ╚═╝ ╩═╝  ╩  ═╩╝");
    println!();
    println!("  Admin console for a local vLLM service");
    println!();
    println!("  status, s              # Check the service");
    println!("  chat <prompt>          # Ask the served model");
    println!("  bench, b [suite]       # Run a benchmark (quick, standard, full, stress)");
    println!("  help                   # Show all command options");
    println!("  exit, quit, q          # Leave the console");
    println!();
}

fn display_help() {
    println!();
    println!("Available Commands:");
    println!("  status, s              Service status and API probe");
    println!("  restart                Restart the service (asks first)");
    println!("  check, c [model]       Check a model ID (defaults to the form's model)");
    println!("  form, f                Show the configuration form");
    println!("  set <field> <value>    Change one form field");
    println!("  save                   Save the form");
    println!("  reload                 Reload the form from the backend");
    println!("  reset                  Restore factory defaults (asks first)");
    println!("  defaults               Show factory defaults");
    println!("  raw [load]             Show the stored JSON config");
    println!("  raw save <file>        Replace the stored config with a JSON file");
    println!("  token <token>          Save the model hub access token");
    println!("  chat <prompt>          Send a prompt to the served model");
    println!("  bench, b [suite]       Run a benchmark suite:");
    for suite in TestSuite::all() {
        println!("    {:<10}           {}", suite.label(), suite.tests().join(", "));
    }
    println!("  clear, cls             Clear screen");
    println!("  help, h                Show this help message");
    println!("  exit, quit, q          Leave the console");
    println!();
}
