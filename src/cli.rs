use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, eyre};

use crate::api::FeedClient;
use crate::api::types::{TweetSnapshot, ViewerSession};
use crate::cache::FeedKey;
use crate::config::{AppConfig, load_config};
use crate::session::load_session;
use crate::ui::tweet::CardModel;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "tweetcard", about = "Terminal client for a tweet feed")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum CliCommand {
    /// Launch the interactive TUI (default)
    Tui,
    /// Print a feed as rendered cards (JSONL)
    Feed {
        /// Show one author's tweets instead of the home feed
        #[arg(long)]
        user: Option<String>,
    },
    /// Delete one of your tweets
    Delete {
        /// Tweet ID
        tweet_id: String,
        /// Stored image to remove along with the tweet
        #[arg(long)]
        image_id: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

/// One JSON line describing a card as the viewer would see it.
fn card_line(
    tweet: &TweetSnapshot,
    viewer: Option<&ViewerSession>,
    config: &AppConfig,
) -> eyre::Result<String> {
    let model = CardModel::derive(tweet, viewer, false, &config.default_avatar_url);
    Ok(serde_json::to_string(&model)?)
}

// ---------------------------------------------------------------------------
// Client construction (shared with main.rs TUI path)
// ---------------------------------------------------------------------------

/// Build a `FeedClient` for the configured service, authenticated as the
/// viewer when a token is available.
pub fn build_client(config: &AppConfig, viewer: Option<&ViewerSession>) -> eyre::Result<FeedClient> {
    let token = viewer.and_then(|v| v.token.clone());
    FeedClient::new(&config.api_base_url, token).map_err(|e| eyre!("{e}"))
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

pub async fn run_command(cmd: CliCommand) -> eyre::Result<()> {
    let config = load_config();
    let viewer = load_session()?;
    let client = build_client(&config, viewer.as_ref())?;

    match cmd {
        CliCommand::Tui => unreachable!("tui is handled in main"),

        CliCommand::Feed { user } => {
            let feed = user.map_or(FeedKey::Home, FeedKey::Profile);
            let tweets = client.get_tweets(&feed).await.map_err(|e| eyre!("{e}"))?;
            for tweet in &tweets {
                println!("{}", card_line(tweet, viewer.as_ref(), &config)?);
            }
        }

        CliCommand::Delete { tweet_id, image_id } => {
            if viewer.is_none() {
                tracing::warn!("no viewer session; the server will likely reject the delete");
            }
            client
                .delete_tweet(&tweet_id, image_id.as_deref())
                .await
                .map_err(|e| eyre!("{e}"))?;
            let line = serde_json::to_string(&serde_json::json!({ "deleted": tweet_id }))?;
            println!("{line}");
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
