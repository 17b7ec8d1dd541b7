use std::env;

use anyhow::{anyhow, Context, Result};
use mathlearn::settings::{config_file_path, load_or_default, save, AppConfig, GradeUnlockPolicy};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse()?;
    let config_path = config_file_path()?;
    let mut config = load_or_default()?;
    let changed = args.apply(&mut config) || !config_path.exists();

    if changed {
        let path = save(&config)?;
        println!("Settings recorded at {}", path.display());
    } else {
        println!("Settings already up to date at {}", config_path.display());
    }
    print_config(&config);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[derive(Default)]
struct CliArgs {
    sound: Option<bool>,
    hints: Option<bool>,
    timer: Option<bool>,
    timer_secs: Option<u32>,
    grade_unlock: Option<GradeUnlockPolicy>,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--sound" => parsed.sound = Some(parse_switch(&arg, args.next())?),
                "--hints" => parsed.hints = Some(parse_switch(&arg, args.next())?),
                "--timer" => parsed.timer = Some(parse_switch(&arg, args.next())?),
                "--timer-secs" => {
                    let value = args
                        .next()
                        .context("Expected a number of seconds after --timer-secs")?;
                    let secs: u32 = value
                        .parse()
                        .with_context(|| format!("Invalid --timer-secs value '{value}'"))?;
                    if secs == 0 {
                        return Err(anyhow!("--timer-secs must be greater than zero"));
                    }
                    parsed.timer_secs = Some(secs);
                }
                "--grade-unlock" => {
                    let value = args
                        .next()
                        .context("Expected a policy after --grade-unlock")?;
                    let policy = GradeUnlockPolicy::parse(&value).with_context(|| {
                        format!("Unknown grade unlock policy '{value}' (use any, all or always)")
                    })?;
                    parsed.grade_unlock = Some(policy);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument '{other}'. Run with --help for usage instructions."
                    ));
                }
            }
        }
        Ok(parsed)
    }

    fn apply(&self, config: &mut AppConfig) -> bool {
        let mut changed = false;
        changed |= set_if(&mut config.sound_enabled, self.sound);
        changed |= set_if(&mut config.show_hints, self.hints);
        changed |= set_if(&mut config.show_timer, self.timer);
        changed |= set_if(&mut config.timer_duration_secs, self.timer_secs);
        changed |= set_if(&mut config.progression.grade_unlock, self.grade_unlock);
        changed
    }
}

fn set_if<T: PartialEq>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) if *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}

fn parse_switch(flag: &str, value: Option<String>) -> Result<bool> {
    let value = value.with_context(|| format!("Expected on/off after {flag}"))?;
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(anyhow!("Expected on/off after {flag}, got '{other}'")),
    }
}

fn print_usage() {
    println!("MathLearn setup");
    println!("Records practice preferences in config.toml.");
    println!("Usage: cargo run --bin setup -- [options]");
    println!("Options:");
    println!("  --sound <on|off>          Feedback sounds (default: on)");
    println!("  --hints <on|off>          Show strategy hints (default: on)");
    println!("  --timer <on|off>          Per-exercise countdown (default: off)");
    println!("  --timer-secs <n>          Countdown length in seconds (default: 30)");
    println!("  --grade-unlock <policy>   any | all | always (default: any)");
}

fn print_config(config: &AppConfig) {
    println!("  sound:        {}", on_off(config.sound_enabled));
    println!("  hints:        {}", on_off(config.show_hints));
    println!(
        "  timer:        {} ({}s)",
        on_off(config.show_timer),
        config.timer_duration_secs
    );
    println!(
        "  grade unlock: {}",
        config.progression.grade_unlock.as_str()
    );
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
