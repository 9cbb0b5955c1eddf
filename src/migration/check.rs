use crate::db::Database;
use crate::gateway::{Gateway, GatewayError};
use crate::local::LegacySnapshot;
use crate::s3::Storage;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// How one local collection compares with its remote table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionCheck {
    pub local: usize,
    pub remote: usize,
    pub missing_in_remote: Vec<String>,
    pub missing_in_local: Vec<String>,
    pub synced: bool,
}

impl CollectionCheck {
    pub fn compare<'a>(
        local: impl IntoIterator<Item = &'a str>,
        remote: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let local: Vec<&str> = local.into_iter().collect();
        let remote: Vec<&str> = remote.into_iter().collect();
        let local_ids: HashSet<&str> = local.iter().copied().collect();
        let remote_ids: HashSet<&str> = remote.iter().copied().collect();

        let missing_in_remote: Vec<String> = local
            .iter()
            .filter(|id| !remote_ids.contains(*id))
            .map(|id| id.to_string())
            .collect();
        let missing_in_local: Vec<String> = remote
            .iter()
            .filter(|id| !local_ids.contains(*id))
            .map(|id| id.to_string())
            .collect();

        Self {
            local: local.len(),
            remote: remote.len(),
            synced: missing_in_remote.is_empty() && missing_in_local.is_empty(),
            missing_in_remote,
            missing_in_local,
        }
    }
}

impl fmt::Display for CollectionCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "local {}, remote {}, missing remotely {}, missing locally {}{}",
            self.local,
            self.remote,
            self.missing_in_remote.len(),
            self.missing_in_local.len(),
            if self.synced { " (synced)" } else { "" }
        )
    }
}

/// A collection whose remote side could not be read keeps the error
#[derive(Debug)]
pub struct SyncCheckReport {
    pub media: Result<CollectionCheck, GatewayError>,
    pub speakers: Result<CollectionCheck, GatewayError>,
    pub survey_responses: Result<CollectionCheck, GatewayError>,
}

impl SyncCheckReport {
    pub fn is_synced(&self) -> bool {
        [&self.media, &self.speakers, &self.survey_responses]
            .iter()
            .all(|check| matches!(check, Ok(check) if check.synced))
    }
}

/// Compare the legacy snapshot with the remote tables by id
pub async fn check_sync<D: Database, S: Storage>(
    gateway: &Gateway<D, S>,
    snapshot: &LegacySnapshot,
) -> SyncCheckReport {
    let (media, speakers, survey_responses) = tokio::join!(
        gateway.fetch_media_items(),
        gateway.fetch_speakers(),
        gateway.fetch_survey_responses(),
    );

    SyncCheckReport {
        media: media.map(|remote| {
            CollectionCheck::compare(
                snapshot.media.iter().map(|item| item.id.as_str()),
                remote.iter().map(|item| item.id.as_str()),
            )
        }),
        speakers: speakers.map(|remote| {
            CollectionCheck::compare(
                snapshot.speakers.iter().map(|speaker| speaker.id.as_str()),
                remote.iter().map(|speaker| speaker.id.as_str()),
            )
        }),
        survey_responses: survey_responses.map(|remote| {
            CollectionCheck::compare(
                snapshot
                    .survey_responses
                    .iter()
                    .map(|response| response.id.as_str()),
                remote.iter().map(|response| response.id.as_str()),
            )
        }),
    }
}
