use crate::models::{MediaItem, Speaker, SurveyResponse};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Where a monitored collection is in its fetch cycle.
///
/// `Idle -> Fetching -> (Reconciled | FetchFailed)`; the terminal states
/// count as idle until the next cycle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Fetching,
    Reconciled,
    FetchFailed,
}

impl FetchState {
    pub fn is_busy(&self) -> bool {
        matches!(self, FetchState::Fetching)
    }
}

/// Locally cached copy of one remote collection
#[derive(Debug, Clone)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub state: FetchState,
    pub last_reconciled: Option<DateTime<Utc>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            state: FetchState::Idle,
            last_reconciled: None,
        }
    }
}

impl<T> Collection<T> {
    pub fn begin_fetch(&mut self) {
        self.state = FetchState::Fetching;
    }

    /// Drop an in-flight fetch whose results will never be applied
    pub fn abandon_fetch(&mut self) {
        if self.state.is_busy() {
            self.state = FetchState::Idle;
        }
    }

    /// Replace the whole collection with the authoritative list
    pub fn reconcile(&mut self, items: Vec<T>) {
        self.items = items;
        self.state = FetchState::Reconciled;
        self.last_reconciled = Some(Utc::now());
    }

    /// Keep the previous items; the next scheduled cycle retries
    pub fn fail(&mut self) {
        self.state = FetchState::FetchFailed;
    }
}

/// Disposable cache of the remote store shown by the site
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub media: Collection<MediaItem>,
    pub speakers: Collection<Speaker>,
    pub survey_responses: Collection<SurveyResponse>,
}

pub type SharedViewState = Arc<RwLock<ViewState>>;

impl ViewState {
    pub fn shared() -> SharedViewState {
        Arc::new(RwLock::new(Self::default()))
    }

    /// Newest first, matching the remote ordering
    pub fn add_media(&mut self, items: impl IntoIterator<Item = MediaItem>) {
        let mut added: Vec<MediaItem> = items.into_iter().collect();
        added.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        added.append(&mut self.media.items);
        self.media.items = added;
    }

    pub fn remove_media(&mut self, id: &str) -> bool {
        remove_by(&mut self.media.items, |item| item.id == id)
    }

    /// Insert or replace by id, keeping speakers sorted by name
    pub fn upsert_speaker(&mut self, speaker: Speaker) {
        let speakers = &mut self.speakers.items;
        match speakers.iter_mut().find(|s| s.id == speaker.id) {
            Some(existing) => *existing = speaker,
            None => speakers.push(speaker),
        }
        speakers.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn remove_speaker(&mut self, id: &str) -> bool {
        remove_by(&mut self.speakers.items, |speaker| speaker.id == id)
    }

    pub fn add_survey_response(&mut self, response: SurveyResponse) {
        self.survey_responses.items.insert(0, response);
    }

    pub fn remove_survey_response(&mut self, id: &str) -> bool {
        remove_by(&mut self.survey_responses.items, |response| response.id == id)
    }
}

fn remove_by<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !matches(item));
    items.len() != before
}
