//! readnext CLI
//!
//! Console front end for the recommendation API.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use readnext::{
    config::load_config,
    error::{AppError, Result},
    models::{Config, Limit},
    pages::{Page, Session},
    query::QueryCache,
    render,
    services::{RecommendationClient, RecommendationSource},
    utils::log as console,
    view::{ViewState, guard_async},
};
use tokio::io::{AsyncBufReadExt, BufReader};

/// readnext - Book Recommendations
#[derive(Parser, Debug)]
#[command(name = "readnext", version, about = "Book recommendation client")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show trending books
    Global {
        /// Number of books (6, 10, 12, 20, 24 or 30)
        #[arg(short, long, default_value = "12", value_parser = parse_limit)]
        limit: Limit,
    },

    /// Show personalized recommendations for a user
    User {
        /// Positive user id; other values are reported as a validation error
        #[arg(allow_negative_numbers = true)]
        user_id: i64,

        #[arg(short, long, default_value = "12", value_parser = parse_limit)]
        limit: Limit,
    },

    /// Show books similar to the given titles
    Similar {
        #[arg(required = true)]
        titles: Vec<String>,

        #[arg(short, long, default_value = "12", value_parser = parse_limit)]
        limit: Limit,
    },

    /// Open a page by path (`/`, `/user`, `/similar`)
    Open { path: String },

    /// Interactive session
    Shell,

    /// Validate configuration
    Validate,
}

fn parse_limit(value: &str) -> std::result::Result<Limit, String> {
    let n: u32 = value.parse().map_err(|_| format!("'{value}' is not a number"))?;
    Limit::choice(n).map_err(|e| e.to_string())
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, config: &Config) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    console::init(level);
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(console::LogLevel::from_str(level).as_filter()),
    )
    .format_timestamp_secs()
    .init();
}

/// Print the active page, or only the fallback notice if rendering fails.
fn show(session: &Session, state: &ViewState) {
    console::block(&render::guarded(|| render::screen(session, state)));
}

/// Apply one-shot page parameters, then load and print.
async fn open(session: &mut Session, path: &str, setup: impl FnOnce(&mut Page)) {
    session.navigate(path);
    setup(session.page_mut());
    let state = session.page().load().await;
    show(session, &state);
}

async fn shell(session: &mut Session) -> Result<()> {
    const HELP: &str = "commands: go <path> | user <id> | add <title> | remove <title> | clear | \
                        limit <n> | detail <n> | refresh | help | quit";

    let state = session.page().load().await;
    show(session, &state);
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();

        let reload = match command {
            "" => false,
            "quit" | "exit" => break,
            "help" => {
                println!("{}", HELP);
                false
            }
            "go" => {
                session.navigate(if arg.is_empty() { "/" } else { arg });
                true
            }
            "refresh" => {
                session.page().invalidate();
                true
            }
            "detail" => {
                detail(session, arg);
                false
            }
            "limit" => match parse_limit(arg) {
                Ok(limit) => {
                    set_limit(session.page_mut(), limit);
                    true
                }
                Err(e) => {
                    console::warn(&e);
                    false
                }
            },
            _ => {
                let route = session.route();
                let applied = edit_page(session.page_mut(), command, arg);
                if !applied {
                    console::warn(&format!("'{}' is not available on {}", command, route));
                }
                applied
            }
        };

        if reload {
            let state = session.page().load().await;
            show(session, &state);
        }
    }
    Ok(())
}

fn set_limit(page: &mut Page, limit: Limit) {
    match page {
        Page::Home(p) => {
            p.set_limit(limit);
        }
        Page::User(p) => {
            p.set_limit(limit);
        }
        Page::Similar(p) => {
            p.set_limit(limit);
        }
        Page::NotFound => {}
    }
}

/// Page-specific shell commands. Returns `false` if the page has no such command.
fn edit_page(page: &mut Page, command: &str, arg: &str) -> bool {
    match (command, page) {
        ("user", Page::User(p)) => {
            if !p.search(arg) {
                console::warn(&format!("'{}' is not a new positive user id", arg));
            }
        }
        ("add", Page::Similar(p)) => {
            p.add(arg);
        }
        ("remove", Page::Similar(p)) => {
            p.remove(arg);
        }
        ("clear", Page::Similar(p)) => {
            p.clear();
        }
        _ => return false,
    }
    true
}

/// Print the detail view of the n-th book of the current page.
fn detail(session: &Session, arg: &str) {
    let view = match session.page() {
        Page::Home(p) => p.view(),
        Page::User(p) => p.view(),
        Page::Similar(p) => p.view(),
        Page::NotFound => ViewState::Idle,
    };
    let book = arg
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| view.books().get(i));

    match book {
        Some(book) => {
            console::separator();
            console::block(&render::guarded(|| render::book_detail(book)));
            console::separator();
        }
        None => console::warn(&format!("No book #{} on this page", arg)),
    }
}

async fn run(command: Command, config: Config) -> Result<()> {
    let client = RecommendationClient::new(&config.api)?;
    console::summary(
        "Recommendation API",
        &[
            ("Base URL", client.base_url().to_string()),
            ("Timeout", format!("{}s", config.api.timeout_secs)),
        ],
    );

    let source: Arc<dyn RecommendationSource> = Arc::new(client);
    let cache = Arc::new(QueryCache::with_config(source, config.query.clone()));
    let mut session = Session::new(cache);

    match command {
        Command::Global { limit } => {
            open(&mut session, "/", |page| {
                if let Page::Home(p) = page {
                    p.set_limit(limit);
                }
            })
            .await;
        }

        Command::User { user_id, limit } => {
            open(&mut session, "/user", |page| {
                if let Page::User(p) = page {
                    p.set_limit(limit);
                    p.set_user(Some(user_id));
                }
            })
            .await;
        }

        Command::Similar { titles, limit } => {
            open(&mut session, "/similar", |page| {
                if let Page::Similar(p) = page {
                    p.set_limit(limit);
                    for title in &titles {
                        p.add(title);
                    }
                }
            })
            .await;
        }

        Command::Open { path } => open(&mut session, &path, |_| {}).await,

        Command::Shell => shell(&mut session).await?,

        Command::Validate => {
            console::success(&format!("Config OK (API at {})", config.api.base_url));
        }
    }
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.verbose, &Config::default());
            console::error(&format!("Config validation failed: {}", e));
            return Err(e);
        }
    };
    init_logging(cli.verbose, &config);
    log::info!("readnext starting with {}", cli.config.display());

    match guard_async(run(cli.command, config)).await {
        Ok(result) => result,
        Err(fallback) => {
            console::block(&render::fallback(&fallback));
            Err(AppError::from(fallback))
        }
    }
}
