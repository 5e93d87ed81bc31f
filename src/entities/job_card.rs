use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Job-card lifecycle. The `Display` form is what appears on printed cards.
#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum JobCardStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    #[strum(serialize = "In Progress")]
    InProgress,
    Completed,
}

/// A unit of work on a job card. Owned by the card, stored in its JSON column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCardTask {
    pub description: String,
    pub status: TaskStatus,
    pub hours: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A part consumed by a job card. Owned by the card, stored in its JSON column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCardPart {
    pub name: String,
    pub part_number: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
}

impl JobCardPart {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_cost
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct JobCardTasks(pub Vec<JobCardTask>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct JobCardParts(pub Vec<JobCardPart>);

/// Total cost over the part list. Tasks never contribute to cost.
pub fn compute_total_cost(parts: &[JobCardPart]) -> Decimal {
    parts.iter().map(JobCardPart::line_total).sum()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_cards")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Sequential human-readable number, e.g. "JC-0042"
    pub job_card_no: String,

    pub status: JobCardStatus,
    pub vehicle_name: String,
    /// Plate or trailer number
    pub vehicle_identifier: String,
    pub driver_name: Option<String>,
    pub mechanic_name: Option<String>,
    pub odometer: Option<i32>,
    pub reported_issues: Option<String>,
    pub requested_work: Option<String>,

    #[sea_orm(column_type = "Json")]
    pub tasks: JobCardTasks,
    #[sea_orm(column_type = "Json")]
    pub parts: JobCardParts,

    pub total_cost: Decimal,

    pub print_count: i32,
    pub printed_at: Option<DateTime<Utc>>,
    pub printed_by: Option<String>,

    /// Random token granting public read access via the by-token route
    pub qr_token: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn part(quantity: i32, unit_cost: Decimal) -> JobCardPart {
        JobCardPart {
            name: "Oil filter".to_string(),
            part_number: "OF-1042".to_string(),
            quantity,
            unit_cost,
        }
    }

    #[test]
    fn empty_part_list_costs_nothing() {
        assert_eq!(compute_total_cost(&[]), Decimal::ZERO);
    }

    #[test]
    fn total_cost_is_sum_of_line_totals() {
        let parts = vec![part(2, dec!(15.50)), part(1, dec!(3.25)), part(4, dec!(0.99))];
        assert_eq!(compute_total_cost(&parts), dec!(38.21));
    }

    #[test]
    fn line_total_multiplies_quantity_by_unit_cost() {
        assert_eq!(part(3, dec!(12.40)).line_total(), dec!(37.20));
    }

    #[test]
    fn task_and_part_wire_format_is_camel_case() {
        let json = serde_json::to_value(part(1, dec!(9.99))).unwrap();
        assert!(json.get("partNumber").is_some());
        assert!(json.get("unitCost").is_some());

        let task = JobCardTask {
            description: "Replace brake pads".to_string(),
            status: TaskStatus::InProgress,
            hours: dec!(1.5),
            notes: None,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "in_progress");
    }
}
