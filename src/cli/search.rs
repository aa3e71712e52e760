//! Suggest and resolve command handlers

use crate::error::Result;
use crate::location::SuggestionRecord;
use clap::Args;

/// Suggest command arguments
#[derive(Args)]
pub struct SuggestArgs {
    /// Partial address or place name
    pub query: String,

    /// Print suggestions as JSON
    #[arg(long)]
    pub json: bool,
}

/// Resolve command arguments
#[derive(Args)]
pub struct ResolveArgs {
    /// Address or place name
    pub query: String,

    /// Resolve the N-th suggestion (1-based) instead of geocoding the text
    #[arg(long)]
    pub pick: Option<usize>,

    /// Output format (text, json, url)
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Map provider for the url format
    #[arg(long)]
    pub provider: Option<String>,
}

/// Run the suggest command
pub async fn run_suggest(args: SuggestArgs) -> Result<()> {
    let (_, chain) = super::load_chain()?;
    let suggestions = chain.suggest(&args.query).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        eprintln!("No suggestions for '{}'", args.query);
        return Ok(());
    }
    for (i, record) in suggestions.iter().enumerate() {
        println!("{}", describe(i + 1, record));
    }
    Ok(())
}

/// Run the resolve command
pub async fn run_resolve(args: ResolveArgs) -> Result<()> {
    let (config, chain) = super::load_chain()?;

    let location = match args.pick {
        Some(n) => {
            let suggestions = chain.suggest(&args.query).await;
            let Some(record) = n.checked_sub(1).and_then(|i| suggestions.get(i)) else {
                eprintln!(
                    "Error: '{}' has {} suggestion(s), cannot pick {}",
                    args.query,
                    suggestions.len(),
                    n
                );
                std::process::exit(1);
            };
            chain.resolve(record).await?
        }
        None => chain.geocode(&args.query).await,
    };

    match location {
        Some(location) => super::print_location(&location, &args.format, args.provider, &config),
        None => {
            eprintln!("Error: Could not find a location for '{}'", args.query);
            std::process::exit(1);
        }
    }
}

/// One numbered suggestion line
fn describe(position: usize, record: &SuggestionRecord) -> String {
    match record.coords() {
        Some(coords) => format!(
            "{:>2}. {} ({}) [{}]",
            position, record.display_name, coords, record.source
        ),
        None => format!("{:>2}. {} [{}]", position, record.display_name, record.source),
    }
}
