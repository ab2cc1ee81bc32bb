//! Search session orchestration
//!
//! A [`SearchSession`] owns everything the UI shows: the live query token,
//! the suggestion list, the current selection with its address and weather,
//! and the recent-location list. User actions arrive through the `on_*`
//! methods (or as [`SessionCommand`]s through [`SearchSession::run`]);
//! provider calls run as spawned tasks that report back over a channel, and
//! the session applies each completion only if it still carries the live
//! token. Results of superseded queries are dropped, not aborted.
//!
//! All state is touched by the session alone, one message at a time, so no
//! locking is involved. Sinks observe the session through
//! [`PresentationEvent`]s.

mod events;
mod token;

pub use events::{CommitTarget, PresentationEvent, SessionCommand};
pub use token::QueryToken;

use crate::cache::{RecentEntry, RecentLocationCache};
use crate::geocoding::{GeoSearchClient, ReverseLookupClient};
use crate::models::{AddressDetail, BoundaryCandidate, WeatherSnapshot};
use crate::view_fit::{self, ViewFitPlan, Viewport};
use crate::weather::WeatherClient;
use crate::LookupError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Queries shorter than this only clear the suggestions
pub const MIN_QUERY_CHARS: usize = 2;

/// Where the session is in its query lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Searching,
    Suggesting,
    Committing,
}

/// The three providers a session talks to
#[derive(Clone)]
pub struct SessionClients {
    pub geo: Arc<dyn GeoSearchClient>,
    pub reverse: Arc<dyn ReverseLookupClient>,
    pub weather: Arc<dyn WeatherClient>,
}

#[derive(Debug)]
struct Completion {
    token: QueryToken,
    outcome: Outcome,
}

#[derive(Debug)]
enum Outcome {
    Suggestions(Result<Vec<BoundaryCandidate>, LookupError>),
    Resolved {
        query: String,
        result: Result<Vec<BoundaryCandidate>, LookupError>,
    },
    Address(Result<AddressDetail, LookupError>),
    Weather(Result<WeatherSnapshot, LookupError>),
}

enum Step {
    Command(SessionCommand),
    Completion(Completion),
}

pub struct SearchSession {
    clients: SessionClients,
    recent: RecentLocationCache,
    viewport: Viewport,
    state: SessionState,
    active_token: QueryToken,
    suggestions: Vec<BoundaryCandidate>,
    current_selection: Option<BoundaryCandidate>,
    current_address: Option<AddressDetail>,
    current_weather: Option<WeatherSnapshot>,
    /// Detail lookups of the live commit still outstanding
    pending_details: usize,
    /// Spawned lookups whose completion has not been received yet
    in_flight: usize,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    events: mpsc::UnboundedSender<PresentationEvent>,
}

impl SearchSession {
    /// Create a session and the receiving end of its presentation events
    pub fn new(
        clients: SessionClients,
        viewport: Viewport,
    ) -> (Self, mpsc::UnboundedReceiver<PresentationEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let session = Self {
            clients,
            recent: RecentLocationCache::new(),
            viewport,
            state: SessionState::Idle,
            active_token: QueryToken::default(),
            suggestions: Vec::new(),
            current_selection: None,
            current_address: None,
            current_weather: None,
            pending_details: 0,
            in_flight: 0,
            completions_tx,
            completions_rx,
            events,
        };
        (session, events_rx)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn active_token(&self) -> QueryToken {
        self.active_token
    }

    pub fn suggestions(&self) -> &[BoundaryCandidate] {
        &self.suggestions
    }

    pub fn current_selection(&self) -> Option<&BoundaryCandidate> {
        self.current_selection.as_ref()
    }

    pub fn current_address(&self) -> Option<&AddressDetail> {
        self.current_address.as_ref()
    }

    pub fn current_weather(&self) -> Option<&WeatherSnapshot> {
        self.current_weather.as_ref()
    }

    pub fn recent(&self) -> &RecentLocationCache {
        &self.recent
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of spawned lookups not yet received back
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Dispatch one user command
    pub fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Typed(query) => self.on_typed(&query),
            SessionCommand::Commit(target) => self.on_commit(target),
            SessionCommand::Clear => self.on_clear(),
            SessionCommand::Recall(entry) => self.on_recall(&entry),
            SessionCommand::ViewportChanged(viewport) => self.on_viewport_changed(viewport),
        }
    }

    /// Live-typing input: fetch suggestions for `query`
    pub fn on_typed(&mut self, query: &str) {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            debug!("Query '{}' too short, clearing suggestions", query);
            self.state = SessionState::Idle;
            self.set_suggestions(Vec::new());
            return;
        }

        let token = self.advance_token();
        self.state = SessionState::Searching;
        debug!("Searching suggestions for '{}' ({})", query, token);

        let geo = Arc::clone(&self.clients.geo);
        let query = query.to_string();
        self.spawn_lookup(token, async move {
            Outcome::Suggestions(geo.search(&query).await)
        });
    }

    /// Finalize a query: select a candidate and load its details
    #[instrument(skip(self, target), fields(token))]
    pub fn on_commit(&mut self, target: CommitTarget) {
        let token = self.advance_token();
        tracing::Span::current().record("token", token.value());
        self.state = SessionState::Committing;
        self.set_suggestions(Vec::new());

        match target {
            CommitTarget::Candidate(candidate) => self.select(token, candidate),
            CommitTarget::Query(query) => {
                let query = query.trim().to_string();
                if query.is_empty() {
                    self.state = SessionState::Idle;
                    self.emit(PresentationEvent::CommitFailed(LookupError::no_results(query)));
                    return;
                }

                debug!("Resolving committed query '{}'", query);
                let geo = Arc::clone(&self.clients.geo);
                self.spawn_lookup(token, async move {
                    let result = geo.search(&query).await;
                    Outcome::Resolved { query, result }
                });
            }
        }
    }

    /// Drop the selection and everything in flight; back to the world view
    pub fn on_clear(&mut self) {
        let token = self.advance_token();
        debug!("Clearing session ({})", token);

        self.state = SessionState::Idle;
        self.suggestions.clear();
        self.current_selection = None;
        self.current_address = None;
        self.current_weather = None;

        self.emit(PresentationEvent::Cleared);
        self.emit(PresentationEvent::ViewPlanReady(ViewFitPlan::world()));
    }

    /// Jump back to a recent entry; its details are not refetched
    pub fn on_recall(&mut self, entry: &RecentEntry) {
        let token = self.advance_token();
        debug!("Recalling '{}' ({})", entry.name, token);

        self.state = SessionState::Idle;
        self.emit(PresentationEvent::ViewPlanReady(ViewFitPlan::point(
            entry.latitude,
            entry.longitude,
        )));
    }

    /// Remember the presentation layer's current viewport for view planning
    pub fn on_viewport_changed(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Wait for one lookup to finish and apply it.
    ///
    /// Returns `false` if nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.completions_rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Apply completions until no lookup is in flight
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    /// Serve commands until the command channel closes, then finish the
    /// lookups already in flight
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<SessionCommand>) {
        loop {
            let step = tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => Step::Command(command),
                    None => break,
                },
                Some(completion) = self.completions_rx.recv() => Step::Completion(completion),
            };

            match step {
                Step::Command(command) => self.handle(command),
                Step::Completion(completion) => self.apply(completion),
            }
        }
        debug!("Command channel closed, settling {} lookups", self.in_flight);
        self.settle().await;
        debug!("Session stopped");
    }

    fn advance_token(&mut self) -> QueryToken {
        self.active_token = self.active_token.next();
        self.pending_details = 0;
        self.active_token
    }

    fn spawn_lookup<F>(&mut self, token: QueryToken, lookup: F)
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        let completions = self.completions_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let outcome = lookup.await;
            // the session owns the receiver; a send error means it is gone
            let _ = completions.send(Completion { token, outcome });
        });
    }

    fn emit(&self, event: PresentationEvent) {
        if self.events.send(event).is_err() {
            debug!("No presentation sink attached, dropping event");
        }
    }

    fn set_suggestions(&mut self, suggestions: Vec<BoundaryCandidate>) {
        self.suggestions = suggestions.clone();
        self.emit(PresentationEvent::SuggestionsChanged(suggestions));
    }

    fn emit_selection(&self) {
        if let Some(candidate) = &self.current_selection {
            self.emit(PresentationEvent::SelectionChanged {
                candidate: candidate.clone(),
                address: self.current_address.clone(),
                weather: self.current_weather.clone(),
            });
        }
    }

    fn select(&mut self, token: QueryToken, candidate: BoundaryCandidate) {
        info!(
            "Selected '{}' at ({:.4}, {:.4})",
            candidate.display_name, candidate.latitude, candidate.longitude
        );
        let (latitude, longitude) = (candidate.latitude, candidate.longitude);

        self.state = SessionState::Committing;
        self.current_address = None;
        self.current_weather = None;
        self.current_selection = Some(candidate);
        self.emit_selection();

        let reverse = Arc::clone(&self.clients.reverse);
        self.spawn_lookup(token, async move {
            Outcome::Address(reverse.reverse_lookup(latitude, longitude).await)
        });
        let weather = Arc::clone(&self.clients.weather);
        self.spawn_lookup(token, async move {
            Outcome::Weather(weather.fetch_weather(latitude, longitude).await)
        });
        self.pending_details = 2;

        if let Some(candidate) = &self.current_selection {
            let plan = view_fit::plan(candidate, self.viewport.height_px, &self.viewport.projection);
            debug!("View plan for '{}': {:?}", candidate.display_name, plan);
            self.emit(PresentationEvent::ViewPlanReady(plan));

            let name = candidate.display_name.clone();
            if self.recent.record(&name, latitude, longitude) {
                self.emit(PresentationEvent::RecentListChanged(self.recent.list()));
            }
        }
    }

    fn apply(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);

        let Completion { token, outcome } = completion;
        if token != self.active_token {
            debug!(
                "Discarding stale {} result ({} superseded by {})",
                outcome.kind(),
                token,
                self.active_token
            );
            return;
        }

        match outcome {
            Outcome::Suggestions(result) => self.apply_suggestions(result),
            Outcome::Resolved { query, result } => self.apply_resolved(token, query, result),
            Outcome::Address(result) => {
                match result {
                    Ok(address) => {
                        self.current_address = Some(address);
                        self.emit_selection();
                    }
                    Err(e) => warn!("Reverse lookup failed, keeping previous details: {}", e),
                }
                self.detail_finished();
            }
            Outcome::Weather(result) => {
                match result {
                    Ok(weather) => {
                        self.current_weather = Some(weather);
                        self.emit_selection();
                    }
                    Err(e) => warn!("Weather lookup failed, keeping previous panel: {}", e),
                }
                self.detail_finished();
            }
        }
    }

    fn apply_suggestions(&mut self, result: Result<Vec<BoundaryCandidate>, LookupError>) {
        // a short query after this search was issued put the session back to idle
        if self.state != SessionState::Searching {
            debug!("Dropping suggestions, session is {:?}", self.state);
            return;
        }

        match result {
            Ok(candidates) => {
                debug!("{} suggestions", candidates.len());
                self.state = SessionState::Suggesting;
                self.set_suggestions(candidates);
            }
            Err(e) => {
                warn!("Suggestion lookup failed: {}", e);
                self.state = SessionState::Idle;
                self.set_suggestions(Vec::new());
            }
        }
    }

    fn apply_resolved(
        &mut self,
        token: QueryToken,
        query: String,
        result: Result<Vec<BoundaryCandidate>, LookupError>,
    ) {
        match result.map(|candidates| candidates.into_iter().next()) {
            Ok(Some(candidate)) => self.select(token, candidate),
            Ok(None) => {
                info!("No administrative boundaries for committed query '{}'", query);
                self.state = SessionState::Idle;
                self.emit(PresentationEvent::CommitFailed(LookupError::no_results(query)));
            }
            Err(e) => {
                warn!("Resolving committed query '{}' failed: {}", query, e);
                self.state = SessionState::Idle;
                self.emit(PresentationEvent::CommitFailed(e));
            }
        }
    }

    fn detail_finished(&mut self) {
        self.pending_details = self.pending_details.saturating_sub(1);
        if self.pending_details == 0 && self.state == SessionState::Committing {
            self.state = SessionState::Idle;
        }
    }
}

impl Outcome {
    fn kind(&self) -> &'static str {
        match self {
            Outcome::Suggestions(_) => "suggestion",
            Outcome::Resolved { .. } => "commit search",
            Outcome::Address(_) => "reverse lookup",
            Outcome::Weather(_) => "weather",
        }
    }
}

/// Cloneable handle feeding commands to a session started with
/// [`SearchSession::run`]
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    /// Start `session` on the current runtime and return its handle
    pub fn spawn(session: SearchSession) -> Self {
        let (commands, commands_rx) = mpsc::unbounded_channel();
        tokio::spawn(session.run(commands_rx));
        Self { commands }
    }

    pub fn on_typed(&self, query: impl Into<String>) {
        self.send(SessionCommand::Typed(query.into()));
    }

    pub fn on_commit(&self, target: CommitTarget) {
        self.send(SessionCommand::Commit(target));
    }

    pub fn on_clear(&self) {
        self.send(SessionCommand::Clear);
    }

    pub fn on_recall(&self, entry: RecentEntry) {
        self.send(SessionCommand::Recall(entry));
    }

    pub fn on_viewport_changed(&self, viewport: Viewport) {
        self.send(SessionCommand::ViewportChanged(viewport));
    }

    fn send(&self, command: SessionCommand) {
        if self.commands.send(command).is_err() {
            warn!("Search session has stopped, ignoring command");
        }
    }
}
