use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use praygen_client::{
    CancelToken, ClientError, ReqwestTransport, SuggestOptions, Suggestion, SuggestionClient,
    SuggestionLength,
};
use praygen_config::{EnvSettings, KNOWN_TRANSLATIONS};

#[derive(Parser, Debug)]
#[command(name = "praygen")]
#[command(about = "AI-assisted prayer suggestions for journal entries.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Suggest a prayer for a journal entry.
    ///
    /// Configuration comes from PRAYGEN_API_KEY, PRAYGEN_BASE_URL and the
    /// optional PRAYGEN_MODEL / PRAYGEN_TRANSLATION (known codes: esv,
    /// niv, kjv; others are passed through).
    Suggest {
        /// The journal entry text.
        #[arg(long)]
        text: String,
        /// "short", "medium" (default) or "long".
        #[arg(long, default_value = "medium")]
        length: String,
        /// Fallback verse topic if the suggestion service is unavailable.
        #[arg(long)]
        topic: Option<String>,
    },

    /// Compose a new prayer keeping the theme of an existing one.
    Rephrase {
        /// The existing prayer text.
        #[arg(long)]
        text: String,
        /// "short", "medium" (default) or "long".
        #[arg(long, default_value = "medium")]
        length: String,
    },

    /// Short prayer (50-70 words) for a named topic, seeded with one of
    /// its verses.
    Short {
        /// A topic from `praygen topics`.
        #[arg(long)]
        topic: String,
    },

    /// List the offline verse topics.
    Topics,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Suggest { text, length, topic } => {
            let client = build_client()?;
            let opts = SuggestOptions {
                length: parse_length(&length)?,
                ..Default::default()
            };
            match client.suggest_with(&text, &opts) {
                Ok(suggestion) => print_suggestion(&suggestion),
                Err(err) => fall_back(err, topic.as_deref())?,
            }
        }

        Command::Rephrase { text, length } => {
            let client = build_client()?;
            let opts = SuggestOptions {
                length: parse_length(&length)?,
                ..Default::default()
            };
            match client.rephrase(&text, &opts) {
                Ok(suggestion) => print_suggestion(&suggestion),
                Err(err) => fall_back(err, None)?,
            }
        }

        Command::Short { topic } => {
            let Some(verse) = praygen_verses::random_verse(&topic) else {
                return Err(anyhow!("unknown topic {topic:?} (see `praygen topics`)"));
            };
            let client = build_client()?;
            match client.topic_prayer(&topic, verse.reference, verse.text, &CancelToken::new()) {
                Ok(suggestion) => print_suggestion(&suggestion),
                Err(err) => fall_back(err, Some(topic.as_str()))?,
            }
        }

        Command::Topics => {
            for topic in praygen_verses::topics() {
                println!("{topic}");
            }
            println!();
            println!("known translations: {}", KNOWN_TRANSLATIONS.join(", "));
        }
    }

    Ok(())
}

fn build_client() -> Result<SuggestionClient<ReqwestTransport>> {
    let config = praygen_config::resolve(&EnvSettings)
        .context("resolve praygen configuration from environment")?;
    let transport = ReqwestTransport::with_default_timeout()?;
    Ok(SuggestionClient::new(config, transport))
}

fn parse_length(raw: &str) -> Result<SuggestionLength> {
    match raw {
        "short" => Ok(SuggestionLength::Short),
        "medium" => Ok(SuggestionLength::Medium),
        "long" => Ok(SuggestionLength::Long),
        other => Err(anyhow!("unknown length {other:?} (short, medium, long)")),
    }
}

fn print_suggestion(suggestion: &Suggestion) {
    println!("{}", suggestion.text);
    if let Some(citation) = &suggestion.citation {
        println!();
        println!(
            "— {} ({})",
            citation.reference,
            citation.translation.to_uppercase()
        );
    }
}

/// The user never sees raw client errors; they get a verse when a topic is
/// available, otherwise a generic message.
fn fall_back(err: ClientError, topic: Option<&str>) -> Result<()> {
    if matches!(err, ClientError::InvalidInput(_)) {
        return Err(anyhow!("the journal entry text is empty"));
    }

    eprintln!("WARN: suggestion service failed: {err}");

    if let Some(topic) = topic {
        if let Some(verse) = praygen_verses::random_verse(topic) {
            println!("{}", verse.text);
            println!();
            println!("— {}", verse.reference);
            return Ok(());
        }
        eprintln!("WARN: unknown fallback topic {topic:?}");
    }

    Err(anyhow!("suggestion unavailable, please try again later"))
}
