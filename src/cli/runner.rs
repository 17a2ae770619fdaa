//! CLI runner - executes commands

use crate::auth::{CredentialStore, Credentials, HttpTokenRefresher};
use crate::cli::commands::{BrowseCommand, Cli, Commands, OutputFormat};
use crate::config::PagerConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpListingClient;
use crate::pagination::{FetchController, LoadOutcome, PageView, PaginatedList};
use crate::types::User;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

const BROWSE_HELP: &str = "n next | p previous | r reload | \
    s <term> search (page printed once the input settles) | / <term> search now | \
    size <n> | v view | q quit";

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.resolve_config()?;
        let controller = self.build_controller(&config)?;

        match &self.cli.command {
            Commands::Page => self.page(&controller).await,
            Commands::Walk { max_pages } => self.walk(&controller, *max_pages).await,
            Commands::Browse => self.browse(&config, controller).await,
        }
    }

    /// Config file first, then command-line overrides
    fn resolve_config(&self) -> Result<PagerConfig> {
        let mut config = match (&self.cli.config, &self.cli.url) {
            (Some(path), _) => PagerConfig::load(path)?,
            (None, Some(url)) => PagerConfig::new(url.clone()),
            (None, None) => {
                return Err(Error::config(
                    "Listing endpoint not specified (use --url or --config)",
                ))
            }
        };

        if let Some(ref url) = self.cli.url {
            config.listing_url.clone_from(url);
        }
        if let Some(ref url) = self.cli.refresh_url {
            config.refresh_url = Some(url.clone());
        }
        if let Some(page_size) = self.cli.page_size {
            config.page_size = page_size;
        }
        if let Some(mode) = self.cli.mode {
            config.mode = mode;
        }

        config.validate()?;
        Ok(config)
    }

    fn build_controller(&self, config: &PagerConfig) -> Result<FetchController<User>> {
        let credentials = match self.cli.token {
            Some(ref token) => {
                let mut creds = Credentials::new(token.clone());
                if let Some(ref refresh) = self.cli.refresh_token {
                    creds = creds.with_refresh_token(refresh.clone());
                }
                CredentialStore::with_credentials(creds)
            }
            None => CredentialStore::new(),
        };

        let transport = HttpListingClient::with_config(
            config.listing_url.clone(),
            config.http_client_config(),
        )?;

        let mut builder = FetchController::<User>::builder(Arc::new(transport), credentials)
            .mode(config.mode)
            .page_size(config.page_size)
            .request_timeout(config.request_timeout())
            .on_auth_error(|kind| {
                warn!("Session ended ({:?}); provide a new token to continue", kind);
            });

        if let Some(ref refresh_url) = config.refresh_url {
            let refresher =
                HttpTokenRefresher::with_timeout(refresh_url.clone(), config.request_timeout())?;
            builder = builder.refresher(Arc::new(refresher));
        }
        if let Some(ref term) = self.cli.search {
            builder = builder.search_term(term.clone());
        }

        Ok(builder.build())
    }

    /// Print the first page
    async fn page(&self, controller: &FetchController<User>) -> Result<()> {
        controller.load_initial().await.into_result()?;
        self.output_message(&page_message(&controller.snapshot()));
        Ok(())
    }

    /// Print pages until the listing is exhausted or `max_pages` is reached
    async fn walk(
        &self,
        controller: &FetchController<User>,
        max_pages: Option<usize>,
    ) -> Result<()> {
        let mut outcome = controller.load_initial().await;
        let mut pages = 0usize;

        loop {
            match outcome.into_result()? {
                LoadOutcome::Loaded { .. } => {
                    pages += 1;
                    self.output_message(&page_message(&controller.snapshot()));
                }
                other => {
                    debug!("Walk stopped: {:?}", other);
                    break;
                }
            }

            if !controller.has_more() || max_pages.is_some_and(|max| pages >= max) {
                break;
            }
            outcome = controller.go_next().await;
        }

        info!("Walked {} pages", pages);
        Ok(())
    }

    /// Interactive session; commands are read line by line from stdin
    async fn browse(
        &self,
        config: &PagerConfig,
        controller: FetchController<User>,
    ) -> Result<()> {
        // Debounced searches commit in the background; print their pages as they land
        let format = self.cli.format;
        let list = PaginatedList::mount_with_observer(
            controller,
            config.search_debounce(),
            move |controller, outcome| {
                print_message(format, &outcome_message(outcome, || controller.snapshot()));
            },
        );
        self.report(&list, list.start().await);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read stdin")?
        {
            let command = match BrowseCommand::parse(&line) {
                None => continue,
                Some(Ok(command)) => command,
                Some(Err(message)) => {
                    self.output_message(&json!({
                        "type": "ERROR",
                        "kind": "input",
                        "message": message,
                    }));
                    continue;
                }
            };

            match command {
                BrowseCommand::Next => self.report(&list, list.go_next().await),
                BrowseCommand::Previous => self.report(&list, list.go_previous().await),
                BrowseCommand::Reload => self.report(&list, list.reload().await),
                BrowseCommand::Search(term) => list.set_search_term(term),
                BrowseCommand::SearchNow(term) => {
                    list.set_search_term(term);
                    match list.search_now().await {
                        Some(outcome) => self.report(&list, outcome),
                        None => self.output_message(&page_message(&list.snapshot())),
                    }
                }
                BrowseCommand::PageSize(size) => match list.set_page_size(size).await? {
                    Some(outcome) => self.report(&list, outcome),
                    None => self.output_message(&page_message(&list.snapshot())),
                },
                BrowseCommand::View => self.output_message(&page_message(&list.snapshot())),
                BrowseCommand::Help => {
                    self.output_message(&json!({"type": "HELP", "commands": BROWSE_HELP}));
                }
                BrowseCommand::Quit => break,
            }
        }

        Ok(())
    }

    /// Print the outcome of a navigation
    fn report(&self, list: &PaginatedList<User>, outcome: LoadOutcome) {
        self.output_message(&outcome_message(&outcome, || list.snapshot()));
    }

    fn output_message(&self, msg: &Value) {
        print_message(self.cli.format, msg);
    }
}

fn print_message(format: OutputFormat, msg: &Value) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(msg).unwrap_or_default());
        }
        OutputFormat::Pretty => {
            println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
        }
    }
}

fn outcome_message(outcome: &LoadOutcome, view: impl FnOnce() -> PageView<User>) -> Value {
    match outcome {
        LoadOutcome::Loaded { .. } => page_message(&view()),
        LoadOutcome::Skipped(reason) => json!({"type": "SKIPPED", "reason": reason.as_str()}),
        LoadOutcome::Cancelled => json!({"type": "CANCELLED"}),
        LoadOutcome::Failed(err) => json!({
            "type": "ERROR",
            "kind": err.kind(),
            "message": err.to_string(),
        }),
    }
}

fn page_message(view: &PageView<User>) -> Value {
    json!({
        "type": "PAGE",
        "page": view,
    })
}
