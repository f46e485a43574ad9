//! Page controller: owns the displayed partner rows and applies fetch, filter and
//! sort transitions to them.

use chrono::{DateTime, Utc};
use shared::{
    domain::{FilterCriteria, PartnerColumn, PartnerRecord},
    error::FetchError,
};
use tracing::{debug, info, warn};

use crate::{
    filter,
    sort::{self, SortAction, SortState},
};

/// Identifies one fetch request. Tokens grow monotonically, so a larger token is
/// always the newer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(FetchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer request was issued after this one; the response was dropped.
    Stale,
}

#[derive(Debug, Clone)]
enum PendingFetch {
    Initial,
    Filter(FilterCriteria),
}

#[derive(Debug)]
pub struct PageController {
    full: Vec<PartnerRecord>,
    rows: Vec<PartnerRecord>,
    sort: SortState,
    load: LoadState,
    last_issued: u64,
    pending: Option<(RequestToken, PendingFetch)>,
    last_request: Option<PendingFetch>,
    last_loaded_at: Option<DateTime<Utc>>,
}

impl Default for PageController {
    fn default() -> Self {
        Self::new()
    }
}

impl PageController {
    pub fn new() -> Self {
        Self {
            full: Vec::new(),
            rows: Vec::new(),
            sort: SortState::default(),
            load: LoadState::Idle,
            last_issued: 0,
            pending: None,
            last_request: None,
            last_loaded_at: None,
        }
    }

    pub fn rows(&self) -> &[PartnerRecord] {
        &self.rows
    }

    /// Most recently fetched dataset, before filtering.
    pub fn full_dataset(&self) -> &[PartnerRecord] {
        &self.full
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    /// Token of the request whose response is still awaited.
    pub fn pending_token(&self) -> Option<RequestToken> {
        self.pending.as_ref().map(|(token, _)| *token)
    }

    pub fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.last_loaded_at
    }

    pub fn begin_initial_load(&mut self) -> RequestToken {
        self.begin(PendingFetch::Initial)
    }

    /// Starts a re-fetch whose result will be filtered by `criteria`.
    pub fn begin_filter(&mut self, criteria: FilterCriteria) -> RequestToken {
        self.begin(PendingFetch::Filter(criteria))
    }

    /// Re-issues the most recent request with the same criteria. Returns `None`
    /// when nothing has been requested yet.
    pub fn retry(&mut self) -> Option<RequestToken> {
        let fetch = self.last_request.clone()?;
        Some(self.begin(fetch))
    }

    fn begin(&mut self, fetch: PendingFetch) -> RequestToken {
        self.last_issued += 1;
        self.last_request = Some(fetch.clone());
        let token = RequestToken(self.last_issued);
        if let Some((superseded, _)) = self.pending.replace((token, fetch)) {
            debug!(
                superseded = superseded.0,
                token = token.0,
                "superseding in-flight partner fetch"
            );
        }
        self.load = LoadState::Loading;
        token
    }

    /// Applies the response for `token`. Responses to anything but the newest
    /// request are discarded without touching state.
    pub fn complete_fetch(
        &mut self,
        token: RequestToken,
        result: Result<Vec<PartnerRecord>, FetchError>,
    ) -> FetchOutcome {
        let fetch = match self.pending.take() {
            Some((pending, fetch)) if pending == token => fetch,
            other => {
                self.pending = other;
                debug!(token = token.0, "discarding stale partner fetch response");
                return FetchOutcome::Stale;
            }
        };

        match result {
            Ok(records) => {
                self.rows = match &fetch {
                    PendingFetch::Initial => records.clone(),
                    PendingFetch::Filter(criteria) => filter::apply(&records, criteria),
                };
                self.full = records;
                self.load = LoadState::Ready;
                self.last_loaded_at = Some(Utc::now());
                info!(
                    token = token.0,
                    fetched = self.full.len(),
                    displayed = self.rows.len(),
                    "partner rows updated"
                );
            }
            Err(err) => {
                warn!(token = token.0, code = ?err.code(), "partner fetch failed: {err}");
                self.load = LoadState::Failed(err);
            }
        }
        FetchOutcome::Applied
    }

    /// Header activation: sorts by a newly chosen column or reverses the current
    /// order when the active column is chosen again. Never re-fetches.
    pub fn activate_header(&mut self, column: PartnerColumn) -> SortAction {
        let action = self.sort.activate(column);
        sort::apply_action(&mut self.rows, action);
        debug!(column = %column, ?action, direction = ?self.sort.direction, "applied header activation");
        action
    }
}
