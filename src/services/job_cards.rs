use std::sync::Arc;

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::job_card::{
    compute_total_cost, Column, Entity as JobCard, JobCardParts, JobCardStatus, JobCardTasks,
    Model as JobCardModel,
};
use crate::errors::ServiceError;

const QR_TOKEN_LEN: usize = 24;

/// Fields accepted when opening a new job card.
#[derive(Debug, Clone)]
pub struct NewJobCard {
    pub vehicle_name: String,
    pub vehicle_identifier: String,
    pub driver_name: Option<String>,
    pub mechanic_name: Option<String>,
    pub odometer: Option<i32>,
    pub reported_issues: Option<String>,
    pub requested_work: Option<String>,
    pub tasks: JobCardTasks,
    pub parts: JobCardParts,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct JobCardChanges {
    pub vehicle_name: Option<String>,
    pub vehicle_identifier: Option<String>,
    pub driver_name: Option<Option<String>>,
    pub mechanic_name: Option<Option<String>>,
    pub odometer: Option<Option<i32>>,
    pub reported_issues: Option<Option<String>>,
    pub requested_work: Option<Option<String>>,
    pub tasks: Option<JobCardTasks>,
    pub parts: Option<JobCardParts>,
}

#[derive(Debug, Clone)]
pub struct JobCardService {
    db: Arc<DbPool>,
}

impl JobCardService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, card), err)]
    pub async fn create_job_card(&self, card: NewJobCard) -> Result<JobCardModel, ServiceError> {
        let now = Utc::now();
        let total_cost = compute_total_cost(&card.parts.0);
        let job_card_no = self.next_job_card_no().await?;

        let model = crate::entities::job_card::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_card_no: Set(job_card_no),
            status: Set(JobCardStatus::Draft),
            vehicle_name: Set(card.vehicle_name),
            vehicle_identifier: Set(card.vehicle_identifier),
            driver_name: Set(card.driver_name),
            mechanic_name: Set(card.mechanic_name),
            odometer: Set(card.odometer),
            reported_issues: Set(card.reported_issues),
            requested_work: Set(card.requested_work),
            tasks: Set(card.tasks),
            parts: Set(card.parts),
            total_cost: Set(total_cost),
            print_count: Set(0),
            printed_at: Set(None),
            printed_by: Set(None),
            qr_token: Set(generate_qr_token()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&*self.db).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn get_job_card(&self, id: Uuid) -> Result<JobCardModel, ServiceError> {
        JobCard::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Job card {} not found", id)))
    }

    /// Public lookup used by the QR access route.
    #[instrument(skip(self), err)]
    pub async fn get_by_qr_token(&self, token: &str) -> Result<JobCardModel, ServiceError> {
        JobCard::find()
            .filter(Column::QrToken.eq(token))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Job card not found".to_string()))
    }

    #[instrument(skip(self), err)]
    pub async fn list_job_cards(
        &self,
        status: Option<JobCardStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<JobCardModel>, u64), ServiceError> {
        let mut query = JobCard::find();
        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }

        let total = query.clone().count(&*self.db).await?;
        let cards = query
            .order_by_desc(Column::CreatedAt)
            .offset(page.saturating_sub(1) * per_page)
            .limit(per_page)
            .all(&*self.db)
            .await?;

        Ok((cards, total))
    }

    #[instrument(skip(self, changes), err)]
    pub async fn update_job_card(
        &self,
        id: Uuid,
        changes: JobCardChanges,
    ) -> Result<JobCardModel, ServiceError> {
        let card = self.get_job_card(id).await?;
        let mut model = card.into_active_model();

        if let Some(v) = changes.vehicle_name {
            model.vehicle_name = Set(v);
        }
        if let Some(v) = changes.vehicle_identifier {
            model.vehicle_identifier = Set(v);
        }
        if let Some(v) = changes.driver_name {
            model.driver_name = Set(v);
        }
        if let Some(v) = changes.mechanic_name {
            model.mechanic_name = Set(v);
        }
        if let Some(v) = changes.odometer {
            model.odometer = Set(v);
        }
        if let Some(v) = changes.reported_issues {
            model.reported_issues = Set(v);
        }
        if let Some(v) = changes.requested_work {
            model.requested_work = Set(v);
        }
        if let Some(tasks) = changes.tasks {
            model.tasks = Set(tasks);
        }
        if let Some(parts) = changes.parts {
            model.total_cost = Set(compute_total_cost(&parts.0));
            model.parts = Set(parts);
        }
        model.updated_at = Set(Utc::now());

        Ok(model.update(&*self.db).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn activate_job_card(&self, id: Uuid) -> Result<JobCardModel, ServiceError> {
        self.transition(id, JobCardStatus::Active, &[JobCardStatus::Draft])
            .await
    }

    #[instrument(skip(self), err)]
    pub async fn complete_job_card(&self, id: Uuid) -> Result<JobCardModel, ServiceError> {
        self.transition(
            id,
            JobCardStatus::Completed,
            &[JobCardStatus::Draft, JobCardStatus::Active],
        )
        .await
    }

    #[instrument(skip(self), err)]
    pub async fn cancel_job_card(&self, id: Uuid) -> Result<JobCardModel, ServiceError> {
        self.transition(
            id,
            JobCardStatus::Cancelled,
            &[
                JobCardStatus::Draft,
                JobCardStatus::Active,
                JobCardStatus::Cancelled,
            ],
        )
        .await
    }

    async fn transition(
        &self,
        id: Uuid,
        to: JobCardStatus,
        allowed_from: &[JobCardStatus],
    ) -> Result<JobCardModel, ServiceError> {
        let card = self.get_job_card(id).await?;
        if !allowed_from.contains(&card.status) {
            return Err(ServiceError::InvalidOperation(format!(
                "Job card {} cannot move from {} to {}",
                card.job_card_no, card.status, to
            )));
        }

        let mut model = card.into_active_model();
        model.status = Set(to);
        model.updated_at = Set(Utc::now());
        Ok(model.update(&*self.db).await?)
    }

    /// Record a successful print: bump the counter and stamp who/when.
    ///
    /// This runs as its own UPDATE after the PDF bytes already exist; it is
    /// not part of any transaction with the render.
    #[instrument(skip(self), err)]
    pub async fn record_print_audit(
        &self,
        id: Uuid,
        printed_by: Option<String>,
    ) -> Result<JobCardModel, ServiceError> {
        let card = self.get_job_card(id).await?;
        let print_count = card.print_count + 1;

        let mut model = card.into_active_model();
        model.print_count = Set(print_count);
        model.printed_at = Set(Some(Utc::now()));
        model.printed_by = Set(printed_by);
        Ok(model.update(&*self.db).await?)
    }

    /// Next human-readable number, derived from the current row count.
    async fn next_job_card_no(&self) -> Result<String, ServiceError> {
        let count = JobCard::find().count(&*self.db).await?;
        Ok(format!("JC-{:04}", count + 1))
    }
}

fn generate_qr_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(QR_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_tokens_are_alphanumeric_and_fixed_length() {
        let token = generate_qr_token();
        assert_eq!(token.len(), QR_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_qr_token());
    }
}
