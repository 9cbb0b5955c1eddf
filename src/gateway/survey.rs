use super::mapping::survey_row;
use super::{Entity, Gateway, GatewayError};
use crate::db::Database;
use crate::models::{parse_canonical_uuid, SurveyResponse};
use crate::s3::Storage;
use tracing::{debug, info, warn};
use uuid::Uuid;

fn validate(response: &SurveyResponse) -> Result<(), GatewayError> {
    let required = [
        ("Full name", &response.full_name),
        ("Contacts", &response.contacts),
        ("Occupation", &response.occupation),
    ];
    for (label, value) in required {
        if value.trim().is_empty() {
            return Err(GatewayError::Validation(format!("{label} is required")));
        }
    }
    Ok(())
}

impl<D: Database, S: Storage> Gateway<D, S> {
    /// Accept a response from the public form, assigning a UUID when it has none
    pub async fn submit_survey_response(
        &self,
        response: &SurveyResponse,
    ) -> Result<SurveyResponse, GatewayError> {
        validate(response)?;

        let mut response = response.clone();
        if parse_canonical_uuid(&response.id).is_none() {
            response.id = Uuid::new_v4().to_string();
        }
        self.create_survey_response(&response).await
    }

    /// Insert a response whose id is already a canonical UUID
    pub async fn create_survey_response(
        &self,
        response: &SurveyResponse,
    ) -> Result<SurveyResponse, GatewayError> {
        validate(response)?;
        let id = parse_canonical_uuid(&response.id).ok_or_else(|| {
            GatewayError::Validation(format!("Survey response id '{}' is not a UUID", response.id))
        })?;

        let row = survey_row(response, id).map_err(|e| {
            GatewayError::transport(Entity::SurveyResponse, "create", Some(&response.id), e)
        })?;
        let saved = self.db.insert_survey_response(row).await.map_err(|e| {
            GatewayError::transport(Entity::SurveyResponse, "create", Some(&response.id), e)
        })?;

        info!("Stored survey response {}", saved.id);
        SurveyResponse::try_from(saved).map_err(|e| {
            GatewayError::transport(Entity::SurveyResponse, "create", Some(&response.id), e)
        })
    }

    /// All survey responses, newest first. Rows that fail to map are skipped.
    pub async fn fetch_survey_responses(&self) -> Result<Vec<SurveyResponse>, GatewayError> {
        let rows = self
            .db
            .list_survey_responses()
            .await
            .map_err(|e| GatewayError::transport(Entity::SurveyResponse, "fetch", None, e))?;

        let mut responses = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id;
            match SurveyResponse::try_from(row) {
                Ok(response) => responses.push(response),
                Err(e) => warn!("Skipping survey response {}: {}", id, e),
            }
        }
        debug!("Fetched {} survey responses", responses.len());
        Ok(responses)
    }

    pub async fn delete_survey_response(&self, id: &str) -> Result<bool, GatewayError> {
        let uuid = parse_canonical_uuid(id).ok_or_else(|| {
            GatewayError::Validation(format!("Survey response id '{id}' is not a UUID"))
        })?;

        self.db
            .delete_survey_response(uuid)
            .await
            .map_err(|e| GatewayError::transport(Entity::SurveyResponse, "delete", Some(id), e))
    }
}
