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
pub enum TicketStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "used")]
    Used,
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Active => write!(f, "active"),
            TicketStatus::Used => write!(f, "used"),
            TicketStatus::Expired => write!(f, "expired"),
        }
    }
}

/// 抽奖票实体
/// 统一约定：一行 = 一张票（quantity 固定为 1，列保留用于兼容历史数据的限购汇总）
/// - 订单路径: order_id / product_id 均有值, credits_earned = 0
/// - 直接参与路径: 无 order_id / product_id, credits_earned = 活动费率
/// - is_winner / won_at 由外部开奖动作一次性写入，其余字段创建后不变
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "campaign_tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ticket_number: String,
    pub campaign_id: i64,
    pub customer_id: i64,
    pub order_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: i64,
    pub total_price_cents: i64,
    pub credits_earned: i64,
    pub is_winner: bool,
    pub won_at: Option<DateTime<Utc>>,
    pub status: TicketStatus,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaigns::Entity",
        from = "Column::CampaignId",
        to = "super::campaigns::Column::Id"
    )]
    Campaign,
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
