use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{CreditType, customer_credit_entity};

/// 积分余额响应（全部由流水推导）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreditBalanceResponse {
    pub available: i64,
    pub total_earned: i64,
    pub total_spent: i64,
}

/// 积分流水查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreditHistoryQuery {
    /// 页码 (默认 1)
    pub page: Option<u32>,
    /// 每页数量 (默认 20)
    pub per_page: Option<u32>,
}

/// 积分流水响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreditEntryResponse {
    pub id: i64,
    pub ticket_id: Option<i64>,
    pub credit_type: CreditType,
    pub amount: i64,
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<customer_credit_entity::Model> for CreditEntryResponse {
    fn from(m: customer_credit_entity::Model) -> Self {
        CreditEntryResponse {
            id: m.id,
            ticket_id: m.ticket_id,
            credit_type: m.credit_type,
            amount: m.amount,
            description: m.description,
            expires_at: m.expires_at,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}
