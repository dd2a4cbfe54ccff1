use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{TicketStatus, campaign_ticket_entity};

/// 票查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TicketQuery {
    /// 页码 (默认 1)
    pub page: Option<u32>,
    /// 每页数量 (默认 20)
    pub per_page: Option<u32>,
}

/// 新发票摘要（下单 / 直接参与后返回）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TicketSummary {
    pub id: i64,
    pub ticket_number: String,
    pub campaign_id: i64,
    pub product_id: Option<i64>,
    pub total_price_cents: i64,
    pub credits_earned: i64,
}

impl From<campaign_ticket_entity::Model> for TicketSummary {
    fn from(m: campaign_ticket_entity::Model) -> Self {
        TicketSummary {
            id: m.id,
            ticket_number: m.ticket_number,
            campaign_id: m.campaign_id,
            product_id: m.product_id,
            total_price_cents: m.total_price_cents,
            credits_earned: m.credits_earned,
        }
    }
}

/// 客户持票响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TicketResponse {
    pub id: i64,
    pub ticket_number: String,
    pub campaign_id: i64,
    pub order_id: Option<i64>,
    pub product_id: Option<i64>,
    pub total_price_cents: i64,
    pub credits_earned: i64,
    pub is_winner: bool,
    pub won_at: Option<DateTime<Utc>>,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

impl From<campaign_ticket_entity::Model> for TicketResponse {
    fn from(m: campaign_ticket_entity::Model) -> Self {
        TicketResponse {
            id: m.id,
            ticket_number: m.ticket_number,
            campaign_id: m.campaign_id,
            order_id: m.order_id,
            product_id: m.product_id,
            total_price_cents: m.total_price_cents,
            credits_earned: m.credits_earned,
            is_winner: m.is_winner,
            won_at: m.won_at,
            status: m.status,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}
