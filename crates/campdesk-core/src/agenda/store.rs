//! Client-side state for one camp's agenda.
//!
//! The session collection is either not yet requested, loading, loaded, or
//! failed. Consumers read days only through the `Loaded`/`Refreshing` states,
//! so partially delivered data never reaches them.

use futures::try_join;
use tracing::{debug, info, warn};

use crate::api::{AgendaApi, ApiError};
use crate::cache::{QueryCache, QueryKey};
use crate::models::{AgendaDay, AgendaItem, Camp, ReferenceData};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AgendaState {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<AgendaDay>),
    /// Re-fetch in flight; the previous days stay visible.
    Refreshing(Vec<AgendaDay>),
    Failed(String),
}

pub struct SessionStore {
    camp_id: i64,
    state: AgendaState,
}

impl SessionStore {
    pub fn new(camp_id: i64) -> Self {
        Self {
            camp_id,
            state: AgendaState::Idle,
        }
    }

    pub fn camp_id(&self) -> i64 {
        self.camp_id
    }

    pub fn state(&self) -> &AgendaState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, AgendaState::Loading | AgendaState::Refreshing(_))
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, AgendaState::Loaded(_) | AgendaState::Refreshing(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            AgendaState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Mark a fetch as started.
    pub fn begin_loading(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            AgendaState::Loaded(days) | AgendaState::Refreshing(days) => {
                AgendaState::Refreshing(days)
            }
            _ => AgendaState::Loading,
        };
    }

    /// Apply the outcome of a fetch.
    pub fn finish_loading(&mut self, result: Result<Vec<AgendaDay>, String>) {
        self.state = match result {
            Ok(days) => {
                debug!(camp_id = self.camp_id, days = days.len(), "Agenda loaded");
                AgendaState::Loaded(days)
            }
            Err(message) => {
                warn!(camp_id = self.camp_id, error = %message, "Agenda load failed");
                AgendaState::Failed(message)
            }
        };
    }

    /// Seed from an offline snapshot. Ignored once the store has real data.
    pub fn seed(&mut self, days: Vec<AgendaDay>) {
        if matches!(self.state, AgendaState::Idle | AgendaState::Failed(_)) {
            self.state = AgendaState::Loaded(days);
        }
    }

    /// Fetch (or serve from cache) and apply in one step.
    pub async fn load<A: AgendaApi + ?Sized>(&mut self, api: &A, cache: &QueryCache) -> &AgendaState {
        self.begin_loading();
        let result = fetch_agenda_days(api, cache, self.camp_id)
            .await
            .map_err(|e| e.user_message());
        self.finish_loading(result);
        &self.state
    }

    /// Explicit refresh: drop every cached query for the camp so the next
    /// read goes to the server, then load.
    pub async fn reload<A: AgendaApi + ?Sized>(&mut self, api: &A, cache: &QueryCache) -> &AgendaState {
        info!(camp_id = self.camp_id, "Reloading agenda from server");
        cache.invalidate_camp(self.camp_id);
        self.load(api, cache).await
    }

    pub fn days(&self) -> &[AgendaDay] {
        match &self.state {
            AgendaState::Loaded(days) | AgendaState::Refreshing(days) => days,
            _ => &[],
        }
    }

    pub fn day(&self, day: u32) -> Option<&AgendaDay> {
        self.days().iter().find(|d| d.day == day)
    }

    pub fn find_item(&self, session_id: i64) -> Option<&AgendaItem> {
        self.days()
            .iter()
            .flat_map(|d| d.items.iter())
            .find(|i| i.id == session_id)
    }

    pub fn total_sessions(&self) -> usize {
        self.days().iter().map(|d| d.items.len()).sum()
    }
}

/// Agenda days for `camp_id`, from the query cache when still valid.
pub async fn fetch_agenda_days<A: AgendaApi + ?Sized>(
    api: &A,
    cache: &QueryCache,
    camp_id: i64,
) -> Result<Vec<AgendaDay>, ApiError> {
    let key = QueryKey::Agenda(camp_id);
    if let Some(days) = cache.get::<Vec<AgendaDay>>(&key) {
        debug!(camp_id, "Agenda served from query cache");
        return Ok(days);
    }
    info!(camp_id, "Fetching agenda");
    let generation = cache.generation(&key);
    let days = api.fetch_agenda(camp_id).await?.into_days();
    cache.insert_if_current(key, generation, &days);
    Ok(days)
}

/// Camp metadata, from the query cache when still valid.
pub async fn fetch_camp<A: AgendaApi + ?Sized>(
    api: &A,
    cache: &QueryCache,
    camp_id: i64,
) -> Result<Camp, ApiError> {
    let key = QueryKey::Camp(camp_id);
    if let Some(camp) = cache.get::<Camp>(&key) {
        return Ok(camp);
    }
    let generation = cache.generation(&key);
    let camp = api.fetch_camp(camp_id).await?;
    cache.insert_if_current(key, generation, &camp);
    Ok(camp)
}

/// Clinicians, locations and staff for a camp, fetched concurrently.
pub async fn fetch_references<A: AgendaApi + ?Sized>(
    api: &A,
    cache: &QueryCache,
    camp_id: i64,
) -> Result<ReferenceData, ApiError> {
    let clinicians_key = QueryKey::Clinicians(camp_id);
    let locations_key = QueryKey::Locations(camp_id);
    let staff_key = QueryKey::Staff(camp_id);
    let generations = (
        cache.generation(&clinicians_key),
        cache.generation(&locations_key),
        cache.generation(&staff_key),
    );

    let (clinicians, locations, staff) = try_join!(
        async {
            match cache.get(&clinicians_key) {
                Some(c) => Ok(c),
                None => api.fetch_clinicians(camp_id).await,
            }
        },
        async {
            match cache.get(&locations_key) {
                Some(l) => Ok(l),
                None => api.fetch_locations(camp_id).await,
            }
        },
        async {
            match cache.get(&staff_key) {
                Some(s) => Ok(s),
                None => api.fetch_staff(camp_id).await,
            }
        },
    )?;

    cache.insert_if_current(clinicians_key, generations.0, &clinicians);
    cache.insert_if_current(locations_key, generations.1, &locations);
    cache.insert_if_current(staff_key, generations.2, &staff);

    Ok(ReferenceData {
        clinicians,
        locations,
        staff,
    })
}
