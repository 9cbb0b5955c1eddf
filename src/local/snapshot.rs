use crate::local::error::LocalStoreError;
use crate::local::store::LocalStore;
use crate::models::{MediaItem, Speaker, SurveyResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub const MEDIA_KEY: &str = "media";
pub const SPEAKERS_KEY: &str = "speakers";
pub const SURVEY_KEY: &str = "survey-responses";

/// Older builds split media per type and used a camelCase survey key
const MEDIA_ALIASES: [&str; 3] = ["photos", "videos", "presentations"];
const SURVEY_ALIASES: [&str; 1] = ["surveyResponses"];

/// Records persisted only locally, predating the remote store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacySnapshot {
    pub media: Vec<MediaItem>,
    pub speakers: Vec<Speaker>,
    pub survey_responses: Vec<SurveyResponse>,
}

/// Something with an identity used to de-duplicate snapshot entries
trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for MediaItem {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Speaker {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for SurveyResponse {
    fn key(&self) -> &str {
        &self.id
    }
}

impl LegacySnapshot {
    /// Read every known key; corrupt entries are skipped with a warning
    pub async fn load<L: LocalStore + ?Sized>(store: &L) -> Result<Self, LocalStoreError> {
        let mut media_keys = vec![MEDIA_KEY];
        media_keys.extend(MEDIA_ALIASES);
        let mut survey_keys = vec![SURVEY_KEY];
        survey_keys.extend(SURVEY_ALIASES);

        let snapshot = Self {
            media: load_collection(store, &media_keys).await?,
            speakers: load_collection(store, &[SPEAKERS_KEY]).await?,
            survey_responses: load_collection(store, &survey_keys).await?,
        };

        info!(
            "Loaded legacy snapshot: {} media items, {} speakers, {} survey responses",
            snapshot.media.len(),
            snapshot.speakers.len(),
            snapshot.survey_responses.len()
        );
        Ok(snapshot)
    }

    /// Write the snapshot under the canonical keys and drop the aliases
    pub async fn persist<L: LocalStore + ?Sized>(&self, store: &L) -> Result<(), LocalStoreError> {
        store_collection(store, MEDIA_KEY, &self.media).await?;
        store_collection(store, SPEAKERS_KEY, &self.speakers).await?;
        store_collection(store, SURVEY_KEY, &self.survey_responses).await?;

        for key in MEDIA_ALIASES.iter().chain(SURVEY_ALIASES.iter()) {
            store.remove(key).await?;
        }
        debug!("Persisted legacy snapshot");
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.media.is_empty() && self.speakers.is_empty() && self.survey_responses.is_empty()
    }
}

async fn load_collection<L, T>(store: &L, keys: &[&str]) -> Result<Vec<T>, LocalStoreError>
where
    L: LocalStore + ?Sized,
    T: DeserializeOwned + Keyed,
{
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for key in keys {
        let Some(raw) = store.get(key).await? else {
            continue;
        };
        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!("Ignoring corrupt legacy entry {key}: {e}");
                continue;
            }
        };

        for value in values {
            match serde_json::from_value::<T>(value) {
                Ok(record) => {
                    // Unsaved records carry no id yet and are all distinct
                    let key = record.key().trim();
                    if key.is_empty() || seen.insert(key.to_string()) {
                        records.push(record);
                    } else {
                        debug!("Skipping duplicate legacy record {} under {key}", record.key());
                    }
                }
                Err(e) => warn!("Skipping unreadable legacy record under {key}: {e}"),
            }
        }
    }
    Ok(records)
}

async fn store_collection<L, T>(store: &L, key: &str, records: &[T]) -> Result<(), LocalStoreError>
where
    L: LocalStore + ?Sized,
    T: Serialize,
{
    let raw = serde_json::to_string(records)
        .map_err(|e| LocalStoreError::EncodeError(key.to_string(), e.to_string()))?;
    store.set(key, &raw).await
}
