#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::env;
use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use owo_colors::OwoColorize;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Identity;
use crate::domain::models::Message;
use crate::domain::models::TranscriptStore;
use crate::domain::services::actions::help_text;
use crate::domain::services::parse_transcript;
use crate::domain::services::HISTORY_SLOT;
use crate::infrastructure::identity::local::LocalIdentity;
use crate::infrastructure::storage::file::FileStore;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

pub fn log_dir() -> path::PathBuf {
    if let Ok(dir) = env::var("TRACWISE_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("tracwise");
}

pub fn format_message(message: &Message) -> String {
    let mut sender = "You".to_string();
    if !message.is_user() {
        sender = "TracWise".to_string();
    }

    let time = message
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M");

    return format!("[{time}] {sender}: {}", message.text);
}

async fn print_history() -> Result<()> {
    let store = FileStore::default();
    let messages = match store.get(HISTORY_SLOT).await? {
        Some(payload) => parse_transcript(&payload).unwrap_or_default(),
        None => vec![],
    };

    if messages.is_empty() {
        println!("There is no saved conversation. Start one with `tracwise chat`!");
        return Ok(());
    }

    let res = messages
        .iter()
        .map(format_message)
        .collect::<Vec<String>>()
        .join("\n\n");
    println!("{res}");

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

/// Stands in for the sign in page. Chatting requires a name to greet the
/// operator with, so ask for one when none is configured.
fn ensure_signed_in() -> Result<bool> {
    let identity = LocalIdentity::default();
    if identity.is_signed_in() {
        return Ok(true);
    }

    let name = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Sign in to TracWise. What's your name?")
        .allow_empty(true)
        .interact_text()?;

    if name.trim().is_empty() {
        println!("You need to sign in before chatting with TracWise.");
        return Ok(false);
    }

    Config::set(ConfigKey::Username, name.trim());
    return Ok(true);
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for TracWise")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running TracWise with environment variable RUST_LOG=tracwise")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_history() -> Command {
    return Command::new("history")
        .about("Manage the saved conversation.")
        .arg_required_else_help(true)
        .subcommand(Command::new("path").about("Print where the conversation is saved."))
        .subcommand(Command::new("show").about("Print the saved conversation."))
        .subcommand(Command::new("clear").about("Delete the saved conversation."));
}

fn arg_global(key: ConfigKey, env_name: &str, help: String) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env_name.to_string())
        .num_args(1)
        .help(help)
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text(true, true)
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return format!("CHAT {line}").bold().underline().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("tracwise")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Chat with TracWise, picking up where you left off."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(subcommand_history())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("TRACWISE_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(arg_global(
            ConfigKey::AnswerURL,
            "TRACWISE_ANSWER_URL",
            format!("URL of the TracWise question answering service. [default: {}]", Config::default(ConfigKey::AnswerURL)),
        ))
        .arg(arg_global(
            ConfigKey::AnswerModel,
            "TRACWISE_ANSWER_MODEL",
            format!("Assistant mode sent alongside every question. [default: {}]", Config::default(ConfigKey::AnswerModel)),
        ))
        .arg(arg_global(
            ConfigKey::HealthCheckTimeout,
            "TRACWISE_HEALTH_CHECK_TIMEOUT",
            format!("Time to wait in milliseconds before timing out when checking the answer service is reachable. [default: {}]", Config::default(ConfigKey::HealthCheckTimeout)),
        ))
        .arg(arg_global(
            ConfigKey::StorageDir,
            "TRACWISE_STORAGE_DIR",
            format!("Directory the conversation is saved in. [default: {}]", Config::default(ConfigKey::StorageDir)),
        ))
        .arg(arg_global(
            ConfigKey::SpeechCommand,
            "TRACWISE_SPEECH_COMMAND",
            format!("Text to speech program used to read answers aloud, the text is passed as its last argument. Speech output is disabled when empty or not installed. [default: {}]", Config::default(ConfigKey::SpeechCommand)),
        ))
        .arg(arg_global(
            ConfigKey::CaptureCommand,
            "TRACWISE_CAPTURE_COMMAND",
            "Speech to text program used for voice input. Every line it prints replaces the prompt. Voice input is disabled when empty.".to_string(),
        ))
        .arg(
            arg_global(
                ConfigKey::Username,
                "TRACWISE_USERNAME",
                "Your name, used to greet you. [default: your login name]".to_string(),
            )
            .short('u'),
        );
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_dir().join("debug.log").to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("history", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            match subcmd_matches.subcommand() {
                Some(("path", _)) => {
                    let file_path = FileStore::default().get_file_path(HISTORY_SLOT);
                    println!("{}", file_path.to_string_lossy());
                }
                Some(("show", _)) => {
                    print_history().await?;
                }
                Some(("clear", _)) => {
                    FileStore::default().delete(HISTORY_SLOT).await?;
                    println!("Deleted the saved conversation");
                }
                _ => {
                    subcommand_history().print_long_help()?;
                }
            }
            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return ensure_signed_in();
}
