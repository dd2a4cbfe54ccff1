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
pub enum CreditType {
    #[sea_orm(string_value = "earned")]
    Earned,
    #[sea_orm(string_value = "spent")]
    Spent,
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl std::fmt::Display for CreditType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreditType::Earned => write!(f, "earned"),
            CreditType::Spent => write!(f, "spent"),
            CreditType::Expired => write!(f, "expired"),
        }
    }
}

/// 积分流水实体（仅追加账本）
/// 余额永远由流水汇总得出，不单独存储
/// earned 类型带 6 个月有效期，过期后不再计入可用余额
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_credits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub customer_id: i64,
    pub ticket_id: Option<i64>,
    pub credit_type: CreditType,
    pub amount: i64,
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 该条流水在 now 时刻是否已过期
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
