use std::error::Error;
use std::io::Write as _;

use clap::{Parser, Subcommand};
use clio::Output;
use linegen::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use linegen::{GeminiClient, GeminiConfig, LineGenerator as _};
use rizzroast_model::emphasis::strip_emphasis;
use rizzroast_model::share::share_link;
use rizzroast_model::{GenerationMode, RoastLevel};

/// CLI for generating a single pickup line or roast
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    kind: Kind,

    /// Gemini API key
    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    #[clap(long, default_value = DEFAULT_MODEL)]
    model: String,

    #[clap(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Also print a WhatsApp share link
    #[clap(long)]
    share: bool,

    /// Keep *emphasis* markers in the output
    #[clap(long)]
    bold_markers: bool,

    /// File to write output
    #[clap(long, short, value_parser, default_value = "-")]
    output: Output,
}

#[derive(Subcommand, Debug)]
enum Kind {
    /// Pickup line based on a name or a fun fact
    Pickup { input: String },
    /// Roast based on a name or a fun fact
    Roast {
        #[clap(long, short, value_parser = parse_level, default_value = "mild")]
        level: RoastLevel,
        input: String,
    },
}

fn parse_level(value: &str) -> Result<RoastLevel, String> {
    RoastLevel::try_from(value).map_err(|e| e.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let mut args = Args::parse();
    let (mode, input) = match args.kind {
        Kind::Pickup { input } => (GenerationMode::Pickup, input),
        Kind::Roast { level, input } => (GenerationMode::Roast(level), input),
    };
    if input.trim().is_empty() {
        return Ok(());
    }

    let gemini = GeminiClient::new(GeminiConfig {
        endpoint: args.endpoint,
        model: args.model,
        api_key: args.api_key,
    });
    let line = gemini.generate(mode, &input).await?;

    if args.bold_markers {
        writeln!(args.output, "{line}")?;
    } else {
        writeln!(args.output, "{}", strip_emphasis(&line))?;
    }
    if args.share {
        writeln!(args.output, "{}", share_link(&line))?;
    }
    Ok(())
}
