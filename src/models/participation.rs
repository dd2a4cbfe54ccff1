use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TicketSummary;

/// 直接参与请求（不经过商品购买）
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ParticipateRequest {
    /// 购票张数 (1-10)
    pub quantity: i64,
}

/// 直接参与响应
/// 统一一行一票后，一次参与会发出 quantity 张票
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipationResponse {
    pub campaign_id: i64,
    pub quantity: i64,
    pub total_price_cents: i64,
    pub credits_earned: i64,
    pub tickets: Vec<TicketSummary>,
}
