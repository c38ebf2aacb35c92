//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier with the root unit
//! - Dispatching visits to a bounded pool of fetch tasks
//! - Applying each visit's results to the shared crawl state
//! - Detecting completion and resolving visited items into places

use crate::config::{Config, SourceConfig};
use crate::crawler::extractor::{Extractor, ParsedPage, PatternExtractor};
use crate::crawler::fetcher::{build_http_client, fetch_page, item_url, FetchResult};
use crate::crawler::frontier::Frontier;
use crate::location::{LocationResolver, ReferenceTable};
use crate::output::{Category, Place};
use crate::state::{ItemBody, ItemKey, ItemState, ItemType};
use crate::AtlasError;
use reqwest::Client;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Number of visits between progress log lines
const PROGRESS_INTERVAL: usize = 50;

/// Why the crawl stopped dispatching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every discovered item was visited
    FrontierExhausted,

    /// The visit cap was reached with items still queued
    CapReached,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrontierExhausted => write!(f, "frontier exhausted"),
            Self::CapReached => write!(f, "visit cap reached"),
        }
    }
}

/// Counters describing a finished crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    /// Items handed to the fetcher
    pub visited: usize,

    /// Items whose page was fetched and scanned
    pub parsed: usize,

    /// Items whose page could not be fetched or decoded
    pub fetch_failures: usize,

    /// Parsed items whose page carried no location fields
    pub without_location: usize,

    /// Items whose location text is not in the reference table
    pub unresolved: usize,

    /// Items located outside the mapped buildings
    pub extern_dropped: usize,

    pub places_emitted: usize,

    pub stop_reason: StopReason,

    pub elapsed: Duration,
}

/// Places produced by a crawl together with its report
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub places: Vec<Place>,
    pub report: CrawlReport,
}

/// Mutable crawl state shared between the dispatch loop and visit tasks
#[derive(Debug)]
struct CrawlState {
    frontier: Frontier,
    states: HashMap<ItemKey, ItemState>,
    bodies: HashMap<ItemKey, ItemBody>,
}

impl CrawlState {
    fn new(frontier: Frontier) -> Self {
        Self {
            frontier,
            states: HashMap::new(),
            bodies: HashMap::new(),
        }
    }

    /// Moves an item to its next state, rejecting illegal transitions
    fn transition(&mut self, key: &ItemKey, next: ItemState) -> bool {
        let current = self
            .states
            .get(key)
            .copied()
            .unwrap_or(ItemState::Frontier);

        if !current.can_transition_to(next) {
            tracing::warn!("Rejected state transition for {}: {} -> {}", key, current, next);
            return false;
        }

        self.states.insert(key.clone(), next);
        true
    }

    /// Pops queued items until one that was not visited yet is found
    ///
    /// The returned item is already marked visited and `Fetching`.
    fn dispatch_next(&mut self) -> Option<ItemKey> {
        while !self.frontier.should_stop() {
            let key = self.frontier.next()?;
            if self.frontier.is_visited(&key) {
                continue;
            }

            self.frontier.mark_visited(key.clone());
            self.transition(&key, ItemState::Fetching);
            return Some(key);
        }
        None
    }

    /// Applies the outcome of one visit
    fn complete_visit(&mut self, key: ItemKey, parsed: Option<ParsedPage>) {
        let Some(parsed) = parsed else {
            self.transition(&key, ItemState::FetchFailed);
            return;
        };

        let mut queued = 0;
        for item in parsed.subitems {
            if self.frontier.enqueue_if_new(item.key, item.name) {
                queued += 1;
            }
        }

        tracing::debug!(
            "Parsed {}: {} new items, location {:?}",
            key,
            queued,
            parsed.body.location_text()
        );

        if self.transition(&key, ItemState::Parsed) {
            self.bodies.insert(key, parsed.body);
        }
    }

    fn count_in_state(&self, state: ItemState) -> usize {
        self.states.values().filter(|s| **s == state).count()
    }

    /// Items that were dispatched but never reached a terminal state
    fn unfinished(&self) -> usize {
        self.states.values().filter(|s| !s.is_terminal()).count()
    }

    fn stop_reason(&self) -> StopReason {
        if self.frontier.cap_reached() && self.frontier.frontier_len() > 0 {
            StopReason::CapReached
        } else {
            StopReason::FrontierExhausted
        }
    }
}

/// Tally of the completion gate's decisions
#[derive(Debug, Default)]
struct GateCounts {
    without_location: usize,
    unresolved: usize,
    extern_dropped: usize,
}

/// Resolves every visited item into a place where possible
///
/// Items without a location, with an unknown location, or located in an
/// external building are skipped.
fn emit_places(
    state: &CrawlState,
    resolver: &LocationResolver,
    source: &SourceConfig,
) -> (Vec<Place>, GateCounts) {
    let mut counts = GateCounts::default();
    let mut places = Vec::new();

    let mut visited: Vec<&ItemKey> = state.frontier.visited().collect();
    visited.sort_by(|a, b| {
        (a.item_type().as_str(), a.key_string()).cmp(&(b.item_type().as_str(), b.key_string()))
    });

    for key in visited {
        let Some(body) = state.bodies.get(key) else {
            continue;
        };

        let Some(location) = body.location_text() else {
            counts.without_location += 1;
            continue;
        };

        let Some(resolution) = resolver.resolve(location) else {
            tracing::debug!("Location of {} not in reference table: \"{}\"", key, location);
            counts.unresolved += 1;
            continue;
        };

        if resolution.is_extern() {
            counts.extern_dropped += 1;
            continue;
        }

        let category = match key.item_type() {
            ItemType::Unit => Category::Chair,
            ItemType::Lecturer => Category::Person,
        };

        places.push(Place {
            name: state
                .frontier
                .name_of(key)
                .unwrap_or(key.key_string())
                .to_string(),
            latitude: resolution.latitude,
            longitude: resolution.longitude,
            category,
            floor: resolution.floor,
            url: Some(item_url(key, source)),
            building: resolution.building,
        });
    }

    (places, counts)
}

fn lock(state: &Mutex<CrawlState>) -> MutexGuard<'_, CrawlState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fetches and scans one item, then records the result
async fn visit(
    key: ItemKey,
    url: String,
    client: Client,
    extractor: Arc<dyn Extractor>,
    state: Arc<Mutex<CrawlState>>,
) {
    tracing::debug!("Fetching {} from {}", key, url);

    let parsed = match fetch_page(&client, &url).await {
        FetchResult::Success { body, .. } => Some(extractor.parse_page(&body, &key)),
        FetchResult::Undecodable { status_code } => {
            tracing::warn!("Undecodable page for {} (HTTP {})", key, status_code);
            None
        }
        FetchResult::HttpError { status_code } => {
            tracing::warn!("HTTP {} for {}", status_code, key);
            None
        }
        FetchResult::NetworkError { error, timed_out } => {
            if timed_out {
                tracing::warn!("Timed out fetching {}", key);
            } else {
                tracing::warn!("Failed to fetch {}: {}", key, error);
            }
            None
        }
    };

    lock(&state).complete_visit(key, parsed);
}

/// Main crawler coordinator structure
pub struct Coordinator {
    state: Arc<Mutex<CrawlState>>,
    client: Client,
    extractor: Arc<dyn Extractor>,
    resolver: LocationResolver,
    source: SourceConfig,
    max_concurrent_fetches: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Builds the HTTP client and seeds the frontier with the configured
    /// root unit.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `resolver` - Resolver over the room reference table
    /// * `extractor` - Page scanner for links and locations
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(AtlasError)` - The HTTP client could not be built
    pub fn new(
        config: &Config,
        resolver: LocationResolver,
        extractor: Arc<dyn Extractor>,
    ) -> Result<Self, AtlasError> {
        let client = build_http_client(&config.crawler, &config.user_agent)?;

        let root = ItemKey::unit(config.source.root_key.clone());
        let frontier = Frontier::new(
            root,
            config.source.root_name.clone(),
            config.crawler.max_items_to_visit,
        );

        Ok(Self {
            state: Arc::new(Mutex::new(CrawlState::new(frontier))),
            client,
            extractor,
            resolver,
            source: config.source.clone(),
            max_concurrent_fetches: config.crawler.max_concurrent_fetches.max(1),
        })
    }

    /// Creates a coordinator with the configured reference table and the
    /// pattern extractor
    pub fn from_config(config: &Config) -> Result<Self, AtlasError> {
        let table = ReferenceTable::from_config(&config.reference)?;
        let extractor = PatternExtractor::new()?;
        Self::new(config, LocationResolver::new(table), Arc::new(extractor))
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// Current state of an item, if it was ever dispatched
    pub fn item_state(&self, key: &ItemKey) -> Option<ItemState> {
        lock(&self.state).states.get(key).copied()
    }

    /// Runs the crawl and returns the located places
    ///
    /// Per-item failures are logged and never abort the crawl.
    pub async fn run(&mut self) -> Vec<Place> {
        self.run_with_report().await.places
    }

    /// Runs the crawl and returns the places together with a report
    pub async fn run_with_report(&mut self) -> CrawlOutcome {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl at {} (cap {}, {} concurrent fetches)",
            self.source.root_key,
            lock(&self.state).frontier.max_items_to_visit(),
            self.max_concurrent_fetches
        );

        let mut tasks = JoinSet::new();
        loop {
            self.dispatch(&mut tasks);

            match tasks.join_next().await {
                Some(Ok(())) => {}
                Some(Err(e)) => tracing::error!("Visit task failed: {}", e),
                None => break,
            }
        }

        let state = lock(&self.state);
        let unfinished = state.unfinished();
        if unfinished > 0 {
            tracing::warn!("{} visited items never finished and are skipped", unfinished);
        }

        let (places, counts) = emit_places(&state, &self.resolver, &self.source);

        let report = CrawlReport {
            visited: state.frontier.visited_count(),
            parsed: state.count_in_state(ItemState::Parsed),
            fetch_failures: state.count_in_state(ItemState::FetchFailed),
            without_location: counts.without_location,
            unresolved: counts.unresolved,
            extern_dropped: counts.extern_dropped,
            places_emitted: places.len(),
            stop_reason: state.stop_reason(),
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawl completed: {} items visited, {} places located in {:?} ({})",
            report.visited,
            report.places_emitted,
            report.elapsed,
            report.stop_reason
        );

        CrawlOutcome { places, report }
    }

    /// Runs the crawl on a dedicated runtime, blocking the calling thread
    pub fn run_blocking(mut self) -> Result<Vec<Place>, AtlasError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.run()))
    }

    /// Spawns visits until the pool is full or nothing can be dispatched
    fn dispatch(&self, tasks: &mut JoinSet<()>) {
        while tasks.len() < self.max_concurrent_fetches {
            let (key, visited) = {
                let mut state = lock(&self.state);
                match state.dispatch_next() {
                    Some(key) => (key, state.frontier.visited_count()),
                    None => return,
                }
            };

            if visited % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {} items visited, {} in flight",
                    visited,
                    tasks.len()
                );
            }

            let url = item_url(&key, &self.source);
            tasks.spawn(visit(
                key,
                url,
                self.client.clone(),
                Arc::clone(&self.extractor),
                Arc::clone(&self.state),
            ));
        }
    }
}
