use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use keybond::config::{format_duration, parse_duration, Config, Target};
use keybond::{vk, Dispatch, Key, KeyBonding, Modifier, NativeWindows, ProcessFinder};
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "keybond",
    version,
    about = "Post synthetic key presses to a specific window",
    long_about = None
)]
struct Cli {
    /// Keys to send: a character (a, 7), a key name (f5, space) or a code (13, 0x0D)
    keys: Vec<Key>,

    /// Target the window with this exact title
    #[arg(short, long, conflicts_with_all = ["hwnd", "process"])]
    title: Option<String>,

    /// Target a raw window handle (decimal or 0x-prefixed hex)
    #[arg(short = 'w', long, value_parser = parse_handle, conflicts_with = "process")]
    hwnd: Option<u64>,

    /// Target the main window of a process whose name contains this string
    #[arg(short, long)]
    process: Option<String>,

    /// Modifier to hold (alt, altgr, shift, ctrl, rshift, rctrl); repeatable
    #[arg(short, long = "modifier", value_name = "MODIFIER")]
    modifiers: Vec<Modifier>,

    /// Load settings from a JSON config file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Number of times to send the combination
    #[arg(short, long)]
    repeat: Option<u32>,

    /// Delay between repetitions (e.g. 500ms, 2s)
    #[arg(short, long, value_parser = parse_interval)]
    interval: Option<Duration>,

    /// Send even when no window matches the title
    #[arg(long)]
    allow_missing: bool,

    /// Write the effective configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    save_config: Option<String>,

    /// Print the known virtual-key names and exit
    #[arg(long)]
    list_keys: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_handle(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim();
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(format!("invalid window handle '{s}'"));
    }
    u64::from_str_radix(digits, radix).map_err(|e| format!("invalid window handle '{s}': {e}"))
}

fn parse_interval(s: &str) -> std::result::Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

fn merge_cli(cli: &Cli, mut config: Config) -> Config {
    if cli.title.is_some() || cli.hwnd.is_some() || cli.process.is_some() {
        config.window_title = cli.title.clone();
        config.window_handle = cli.hwnd;
        config.process_name = cli.process.clone();
    }
    if !cli.modifiers.is_empty() {
        config.modifiers = cli.modifiers.clone();
    }
    if !cli.keys.is_empty() {
        config.keys = cli.keys.clone();
    }
    if let Some(repeat) = cli.repeat {
        config.repeat_count = repeat;
    }
    if let Some(interval) = cli.interval {
        config.interval = interval;
    }
    config.allow_missing_window |= cli.allow_missing;
    config.verbose |= cli.verbose;
    config
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_key_names() {
    println!("{}", "Virtual-key names:".bold());
    for (name, code) in vk::NAMED_KEYS {
        println!("  {:<12} {}", name, format!("{code:#04x}").dimmed());
    }
    println!(
        "  {:<12} {}",
        "0-9, A-Z",
        "single characters map to their uppercase ASCII code".dimmed()
    );
}

fn report(round: u32, dispatch: &Dispatch) {
    println!(
        "{} round {}: {} message(s) posted",
        "✔".green(),
        round,
        dispatch.posted
    );
    for skipped in &dispatch.skipped {
        println!(
            "  {} skipped {} on {:?}: {}",
            "⚠".yellow(),
            skipped.key,
            skipped.event,
            skipped.error
        );
    }
}

fn assign_target(bonding: &mut KeyBonding, config: &Config) -> Result<()> {
    match config.target()? {
        Target::Handle(handle) => {
            bonding.assign_window(handle);
        }
        Target::Title(title) => {
            if config.allow_missing_window {
                let handle = bonding.assign_window_by_title(&NativeWindows, &title)?;
                if handle.is_null() {
                    warn!(title = %title, "no window matched, sending to the null handle");
                }
            } else {
                bonding.require_window_by_title(&NativeWindows, &title)?;
            }
        }
        Target::Process(name) => {
            let mut finder = ProcessFinder::new();
            bonding.assign_window_by_process(&mut finder, &name)?;
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_keys {
        print_key_names();
        return Ok(());
    }

    let base = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let config = merge_cli(&cli, base);

    init_logging(config.verbose);
    debug!(?config, "effective configuration");

    config.validate().context("invalid configuration")?;

    if let Some(path) = &cli.save_config {
        config.save_to_file(path)?;
        println!("{} configuration saved to {}", "✔".green(), path.bold());
        return Ok(());
    }

    let mut bonding = config.to_bonding(NativeWindows);
    assign_target(&mut bonding, &config).context("failed to resolve target window")?;

    println!(
        "{} sending to window {} ({} × every {})",
        "→".cyan(),
        bonding.handle().to_string().bold(),
        config.repeat_count,
        format_duration(config.interval)
    );

    for round in 1..=config.repeat_count {
        let dispatch = bonding
            .launch()
            .with_context(|| format!("failed to post keys in round {round}"))?;
        report(round, &dispatch);

        if round < config.repeat_count {
            tokio::select! {
                _ = tokio::time::sleep(config.interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    println!("{} interrupted", "■".red());
                    break;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_handle() {
        assert_eq!(parse_handle("4660"), Ok(4660));
        assert_eq!(parse_handle("0x1234"), Ok(0x1234));
        assert_eq!(parse_handle(" 0XBEEF "), Ok(0xBEEF));

        for bad in ["", "0x", "0x-5", "0x+41", "+13", "-1", "12ab", "0xfffffffffffffffff"] {
            assert!(parse_handle(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from(["keybond", "--title", "Notepad", "-m", "rctrl", "a", "0x0D"]);
        let base = Config {
            process_name: Some("game.exe".to_string()),
            keys: vec![Key::Char('z')],
            repeat_count: 5,
            ..Config::default()
        };

        let config = merge_cli(&cli, base);

        assert_eq!(config.window_title.as_deref(), Some("Notepad"));
        assert_eq!(config.process_name, None);
        assert_eq!(config.modifiers, vec![Modifier::RightControl]);
        assert_eq!(config.keys, vec![Key::Char('a'), Key::Code(0x0D)]);
        assert_eq!(config.repeat_count, 5);
    }
}
