//! Async driver for the browse state.
//!
//! One task owns [`SearchState`] and [`DetailsPanel`]. Commands arrive over an
//! mpsc channel, fetches run as spawned tasks and report back over a second
//! channel, and every change is published on a `watch` channel. Only the
//! driver task ever mutates state.

use cinescope_catalog::{CatalogError, CatalogFetcher, DetailsLookup};
use cinescope_core::types::{DetailInfo, MediaItem, ResultPage};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::debounce::Debouncer;
use crate::details::DetailsPanel;
use crate::pagination::{DEFAULT_WINDOW, PageWindow, page_window};
use crate::state::{FetchTicket, SearchState};
use crate::{BrowseConfig, BrowseError};

/// Snapshot published after every state change.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseView {
    pub search: SearchState,
    pub details: DetailsPanel,
}

impl BrowseView {
    pub fn page_window(&self) -> PageWindow {
        page_window(self.search.page, self.search.total_pages, DEFAULT_WINDOW)
    }
}

#[derive(Debug)]
enum Command {
    Input(String),
    NextPage,
    PreviousPage,
    GoToPage(u32),
    Select(MediaItem),
    CloseDetails,
}

enum Completion {
    Listing {
        token: u64,
        result: Result<ResultPage, CatalogError>,
    },
    Details {
        token: u64,
        result: Result<DetailInfo, CatalogError>,
    },
}

/// Cloneable handle to a running controller.
#[derive(Clone)]
pub struct BrowseHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<BrowseView>,
}

impl BrowseHandle {
    fn send(&self, command: Command) -> Result<(), BrowseError> {
        self.commands.send(command).map_err(|_| BrowseError::Closed)
    }

    /// New search text. The query is committed once input goes quiet.
    pub fn input(&self, text: impl Into<String>) -> Result<(), BrowseError> {
        self.send(Command::Input(text.into()))
    }

    pub fn next_page(&self) -> Result<(), BrowseError> {
        self.send(Command::NextPage)
    }

    pub fn previous_page(&self) -> Result<(), BrowseError> {
        self.send(Command::PreviousPage)
    }

    pub fn go_to_page(&self, page: u32) -> Result<(), BrowseError> {
        self.send(Command::GoToPage(page))
    }

    pub fn select(&self, item: MediaItem) -> Result<(), BrowseError> {
        self.send(Command::Select(item))
    }

    pub fn close_details(&self) -> Result<(), BrowseError> {
        self.send(Command::CloseDetails)
    }

    pub fn current(&self) -> BrowseView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BrowseView> {
        self.view.clone()
    }
}

pub struct BrowseController {
    fetcher: CatalogFetcher,
    details: DetailsLookup,
    config: BrowseConfig,
}

impl BrowseController {
    pub fn new(fetcher: CatalogFetcher, details: DetailsLookup, config: BrowseConfig) -> Self {
        Self {
            fetcher,
            details,
            config,
        }
    }

    /// Start the driver task and load the default listing.
    pub fn spawn(self) -> BrowseHandle {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let initial = BrowseView {
            search: SearchState::new(&self.config),
            details: DetailsPanel::default(),
        };
        let (view_tx, view_rx) = watch::channel(initial);

        tokio::spawn(self.run(commands_rx, view_tx));

        BrowseHandle {
            commands: commands_tx,
            view: view_rx,
        }
    }

    async fn run(
        self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        view: watch::Sender<BrowseView>,
    ) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let mut search = SearchState::new(&self.config);
        let mut details = DetailsPanel::default();
        let mut debouncer = Debouncer::new(self.config.debounce);

        info!(
            transport = self.fetcher.transport_name(),
            paging = ?self.config.paging,
            "browse controller started"
        );
        self.fetch_listing(search.initial_load(), &done_tx);
        publish(&view, &search, &details);

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    self.handle(command, &mut search, &mut details, &mut debouncer, &done_tx);
                }
                Some(done) = done_rx.recv() => match done {
                    Completion::Listing { token, result } => {
                        search.apply(token, result);
                    }
                    Completion::Details { token, result } => {
                        details.apply(token, result);
                    }
                },
                _ = debouncer.fired(), if debouncer.is_pending() => {
                    if let Some(ticket) = search.commit_debounced() {
                        debug!(query = %search.debounced_query, "search text settled");
                        self.fetch_listing(ticket, &done_tx);
                    }
                }
            }
            publish(&view, &search, &details);
        }

        info!("browse controller stopped");
    }

    fn handle(
        &self,
        command: Command,
        search: &mut SearchState,
        details: &mut DetailsPanel,
        debouncer: &mut Debouncer,
        done_tx: &mpsc::UnboundedSender<Completion>,
    ) {
        match command {
            Command::Input(text) => {
                search.on_input_change(text);
                debouncer.touch();
            }
            Command::NextPage => {
                if let Some(ticket) = search.request_next_page() {
                    self.fetch_listing(ticket, done_tx);
                }
            }
            Command::PreviousPage => {
                if let Some(ticket) = search.request_previous_page() {
                    self.fetch_listing(ticket, done_tx);
                }
            }
            Command::GoToPage(page) => {
                if let Some(ticket) = search.go_to_page(page) {
                    self.fetch_listing(ticket, done_tx);
                }
            }
            Command::Select(item) => {
                let token = details.select(item.clone(), self.config.embed_base.as_deref());
                let lookup = self.details.clone();
                let done_tx = done_tx.clone();
                tokio::spawn(async move {
                    let result = lookup.lookup(&item).await;
                    let _ = done_tx.send(Completion::Details { token, result });
                });
            }
            Command::CloseDetails => details.close(),
        }
    }

    fn fetch_listing(&self, ticket: FetchTicket, done_tx: &mpsc::UnboundedSender<Completion>) {
        let fetcher = self.fetcher.clone();
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch_page(&ticket.request).await;
            let _ = done_tx.send(Completion::Listing {
                token: ticket.token,
                result,
            });
        });
    }
}

fn publish(view: &watch::Sender<BrowseView>, search: &SearchState, details: &DetailsPanel) {
    view.send_if_modified(|current| {
        if current.search == *search && current.details == *details {
            return false;
        }
        current.search = search.clone();
        current.details = details.clone();
        true
    });
}
