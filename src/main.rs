use artgenai::{
    logger::{self, LogLevel, LoggerConfig},
    storage, Config, GeneratedImage, GenerationSession, HistoryStore, ImageClient,
    ResponseFormat,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::{fs, path::PathBuf, sync::Arc};

#[derive(Parser, Debug)]
#[command(name = "artgenai", version, about = "Generate images from text prompts")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the history directory
    #[arg(long, global = true)]
    history_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one image and record it in the history
    Generate {
        prompt: String,
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Write inline image bytes to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List past generations, oldest first
    History {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatArg {
    Url,
    Base64,
}

impl From<FormatArg> for ResponseFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Url => ResponseFormat::Url,
            FormatArg::Base64 => ResponseFormat::Base64,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    logger::init_with_config(LoggerConfig::new().with_level(level))?;
    if !dotenv_loaded {
        log::debug!("No .env file found, using process environment");
    }

    let mut config = Config::from_env();
    if let Some(dir) = cli.history_dir {
        config.history = config.history.with_directory(dir);
    }

    let settings = storage::open(&config.history)?;
    let history = Arc::new(HistoryStore::load(settings, config.history.key.clone()));

    match cli.command {
        Command::Generate {
            prompt,
            format,
            out,
        } => {
            if let Some(format) = format {
                config.openai = config.openai.with_response_format(format.into());
            }
            logger::log_config_info(&config);

            let client = ImageClient::new(config.openai.clone())?;
            let session = GenerationSession::new(Arc::new(client), history);

            match session.submit(prompt).await? {
                GeneratedImage::Remote(url) => println!("{}", url),
                GeneratedImage::Inline(bytes) => {
                    let path = out.unwrap_or_else(|| PathBuf::from("generated.png"));
                    fs::write(&path, &bytes)?;
                    println!("{} ({} bytes)", path.display(), bytes.len());
                }
            }
        }
        Command::History { json } => {
            let entries = history.entries();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No history yet.");
            } else {
                for entry in entries {
                    let image = match &entry.image {
                        GeneratedImage::Remote(url) => url.clone(),
                        GeneratedImage::Inline(bytes) => format!(
                            "<{} {} bytes>",
                            entry.image.mime_type().unwrap_or("image"),
                            bytes.len()
                        ),
                    };
                    println!(
                        "{}  {}  {}  {}",
                        entry.created_at.format("%Y-%m-%d %H:%M"),
                        entry.id,
                        entry.prompt,
                        image
                    );
                }
            }
        }
    }

    Ok(())
}
