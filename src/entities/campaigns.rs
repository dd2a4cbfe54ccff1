use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "ended")]
    Ended,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampaignStatus::Draft => write!(f, "draft"),
            CampaignStatus::Active => write!(f, "active"),
            CampaignStatus::Ended => write!(f, "ended"),
            CampaignStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// 活动实体
/// - ticket_price_cents / credits_per_ticket: 直接参与时的固定费率
/// - uses_end_date: 是否按截止日期开奖（否则等售罄）
/// - max_tickets_per_user: 单用户购票上限 (NULL = 不限)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub status: CampaignStatus,
    pub ticket_price_cents: i64,
    pub credits_per_ticket: i64,
    pub max_tickets_per_user: Option<i64>,
    pub uses_end_date: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 活动是否已开始（无 start_date 视为已开始）
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        match self.start_date {
            None => true,
            Some(start) => now >= start,
        }
    }

    /// 活动是否已结束（无 end_date 视为未结束）
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        match self.end_date {
            None => false,
            Some(end) => now > end,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_prizes::Entity")]
    ProductPrizes,
    #[sea_orm(has_many = "super::campaign_tickets::Entity")]
    CampaignTickets,
}

impl Related<super::product_prizes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductPrizes.def()
    }
}

impl Related<super::campaign_tickets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CampaignTickets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn campaign(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Model {
        Model {
            id: 1,
            title: "Test".to_string(),
            status: CampaignStatus::Active,
            ticket_price_cents: 1000,
            credits_per_ticket: 500,
            max_tickets_per_user: None,
            uses_end_date: false,
            start_date: start,
            end_date: end,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_window_checks_without_bounds() {
        let now = Utc::now();
        let c = campaign(None, None);
        assert!(c.has_started(now));
        assert!(!c.has_ended(now));
    }

    #[test]
    fn test_window_checks_with_bounds() {
        let now = Utc::now();
        let future = campaign(Some(now + Duration::hours(1)), None);
        assert!(!future.has_started(now));

        let past = campaign(None, Some(now - Duration::hours(1)));
        assert!(past.has_ended(now));

        let open = campaign(Some(now - Duration::hours(1)), Some(now + Duration::hours(1)));
        assert!(open.has_started(now));
        assert!(!open.has_ended(now));
    }
}
