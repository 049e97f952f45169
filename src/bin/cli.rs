//! Feedcore CLI
//!
//! Demo and maintenance interface over the engine: inspect statistics,
//! answer quiz items, toggle flags, and reset persisted progress. Content
//! comes from the bundled fixture catalog.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use feedcore::content::{CachedSource, OptionLabel, StaticLoader};
use feedcore::progress::FeedStatistics;
use feedcore::settings::{validate_auto_advance_delay, ThumbBarPosition};
use feedcore::storage::SledStore;
use feedcore::App;

#[derive(Parser)]
#[command(name = "feedcore-cli")]
#[command(about = "Feedcore engine command line interface")]
#[command(version)]
struct Cli {
    /// Path to the sled database (defaults to the user config directory)
    #[arg(short, long, env = "FEEDCORE_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FeedArg {
    Quiz,
    Reel,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThumbBarArg {
    Left,
    Right,
}

impl From<ThumbBarArg> for ThumbBarPosition {
    fn from(value: ThumbBarArg) -> Self {
        match value {
            ThumbBarArg::Left => ThumbBarPosition::Left,
            ThumbBarArg::Right => ThumbBarPosition::Right,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show both feeds' statistics
    Stats,

    /// Answer a quiz item
    Answer {
        /// Quiz item id
        quiz_id: String,

        /// Option label (A-D)
        option: OptionLabel,

        /// Time spent on the question, in milliseconds
        #[arg(short, long, default_value_t = 0)]
        elapsed_ms: u64,
    },

    /// Toggle a bookmark on an item
    Bookmark {
        /// Which feed the item belongs to
        #[arg(value_enum)]
        feed: FeedArg,

        /// Item id
        item_id: String,
    },

    /// Toggle a like on a reel
    Like {
        /// Reel id
        reel_id: String,
    },

    /// Toggle mute on a reel
    Mute {
        /// Reel id
        reel_id: String,
    },

    /// Show or change user settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Clear all persisted progress and settings
    Reset,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings
    Show,

    /// Set the auto-advance delay in milliseconds (0-10000)
    Delay { ms: i64 },

    /// Enable or disable haptic feedback
    Haptics { enabled: bool },

    /// Enable or disable sound effects
    Sound { enabled: bool },

    /// Move the one-handed action bar
    ThumbBar {
        #[arg(value_enum)]
        position: ThumbBarArg,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("feedcore=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = match cli.store {
        Some(path) => SledStore::open(path)?,
        None => SledStore::new()?,
    };
    let quiz_source = Arc::new(CachedSource::new(Arc::new(StaticLoader::bundled_quizzes()?)));
    let reel_source = Arc::new(CachedSource::new(Arc::new(StaticLoader::bundled_reels()?)));
    let mut app = App::init(Arc::new(store), quiz_source, reel_source).await;

    match cli.command {
        Commands::Stats => {
            app.quiz.fetch().await;
            app.reels.fetch().await;
            if let Some(error) = app.quiz.error() {
                eprintln!("quiz feed: {}", error);
            }
            print_stats("quizzes", app.quiz.stats());
            print_stats("reels", app.reels.stats());
        }
        Commands::Answer {
            quiz_id,
            option,
            elapsed_ms,
        } => {
            app.quiz.fetch().await;
            match app.quiz.select_option(&quiz_id, option, elapsed_ms).await {
                Some(record) => {
                    if record.is_correct {
                        println!("correct ({} in {} ms)", record.selected_label, record.elapsed_ms);
                    } else {
                        println!("incorrect ({})", record.selected_label);
                        if let Some(item) = app.quiz.items().iter().find(|q| q.id == quiz_id) {
                            println!("the answer was {}: {}", item.correct, item.options.get(item.correct));
                        }
                    }
                    println!("streak: {}", app.quiz.stats().streak);
                }
                None => {
                    eprintln!("no quiz item with id {}", quiz_id);
                    process::exit(1);
                }
            }
        }
        Commands::Bookmark { feed, item_id } => match feed {
            FeedArg::Quiz => {
                app.quiz.toggle_bookmark(&item_id).await;
                println!("bookmarked: {}", app.quiz.is_bookmarked(&item_id));
            }
            FeedArg::Reel => {
                app.reels.toggle_bookmark(&item_id).await;
                println!("bookmarked: {}", app.reels.is_bookmarked(&item_id));
            }
        },
        Commands::Like { reel_id } => {
            app.reels.toggle_like(&reel_id).await;
            println!("liked: {}", app.reels.is_liked(&reel_id));
        }
        Commands::Mute { reel_id } => {
            let muted = app.reels.toggle_mute(&reel_id).await;
            println!("muted: {}", muted);
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                let payload = app.settings.payload();
                println!("haptics enabled:      {}", payload.haptics_enabled);
                println!("sound enabled:        {}", payload.sound_enabled);
                println!("auto-advance delay:   {} ms", payload.auto_advance_delay_ms);
                println!("thumb bar position:   {:?}", payload.thumb_bar_position);
            }
            SettingsAction::Delay { ms } => {
                // validation failure leaves the container untouched
                let validated = match validate_auto_advance_delay(ms) {
                    Ok(value) => value,
                    Err(e) => {
                        eprintln!("{}", e);
                        process::exit(1);
                    }
                };
                app.settings.set_auto_advance_delay_ms(validated as i64).await;
                println!("auto-advance delay set to {} ms", validated);
            }
            SettingsAction::Haptics { enabled } => {
                app.settings.set_haptics_enabled(enabled).await;
                println!("haptics enabled: {}", enabled);
            }
            SettingsAction::Sound { enabled } => {
                app.settings.set_sound_enabled(enabled).await;
                println!("sound enabled: {}", enabled);
            }
            SettingsAction::ThumbBar { position } => {
                app.settings.set_thumb_bar_position(position.into()).await;
                println!("thumb bar position: {:?}", position);
            }
        },
        Commands::Reset => {
            app.reset_all().await;
            println!("all progress and settings cleared");
        }
    }

    Ok(())
}

fn print_stats(label: &str, stats: &FeedStatistics) {
    println!(
        "{}: answered {} ({} correct, {:.0}% accuracy), streak {}, {} ms on task, seen up to index {}",
        label,
        stats.answered,
        stats.correct,
        stats.accuracy() * 100.0,
        stats.streak,
        stats.total_time_ms,
        stats.last_seen_index
    );
}
