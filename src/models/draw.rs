use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{campaign_ticket_entity, campaigns, product_prizes, products};

/// 公开开奖视图（隐藏内部计数器）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawPrizeView {
    pub product_id: i64,
    pub campaign_id: i64,
    pub product_name: Option<String>,
    pub product_image: Option<String>,
    pub campaign_title: Option<String>,
    pub tickets_remaining: i64,
    /// 剩余票数进入阈值后前端展示倒计时
    pub countdown_started: bool,
    pub category: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
    pub draw_date: Option<DateTime<Utc>>,
    pub won_at: Option<DateTime<Utc>>,
}

/// 管理端开奖视图（含原始计数器）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminDrawPrizeView {
    pub prize_id: i64,
    pub product_id: i64,
    pub campaign_id: i64,
    pub product_name: Option<String>,
    pub campaign_title: Option<String>,
    pub tickets_required: i64,
    pub tickets_sold: i64,
    pub tickets_remaining: i64,
    pub is_active: bool,
    pub category: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
    pub draw_date: Option<DateTime<Utc>>,
    pub won_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// 三个互斥桶：进行中 / 待开奖 / 已开奖
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawBucketsResponse<T> {
    pub active: Vec<T>,
    pub upcoming: Vec<T>,
    pub past: Vec<T>,
}

/// 奖池条目（开奖执行方按创建时间顺序抽取）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TicketPoolEntry {
    pub ticket_id: i64,
    pub ticket_number: String,
    pub customer_id: i64,
    pub is_winner: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<campaign_ticket_entity::Model> for TicketPoolEntry {
    fn from(m: campaign_ticket_entity::Model) -> Self {
        TicketPoolEntry {
            ticket_id: m.id,
            ticket_number: m.ticket_number,
            customer_id: m.customer_id,
            is_winner: m.is_winner,
            created_at: m.created_at,
        }
    }
}

impl DrawPrizeView {
    pub fn from_parts(
        prize: &product_prizes::Model,
        campaign: Option<&campaigns::Model>,
        product: Option<&products::Model>,
        won_at: Option<DateTime<Utc>>,
    ) -> Self {
        DrawPrizeView {
            product_id: prize.product_id,
            campaign_id: prize.campaign_id,
            product_name: product.map(|p| p.name.clone()),
            product_image: product.and_then(|p| p.image_url.clone()),
            campaign_title: campaign.map(|c| c.title.clone()),
            tickets_remaining: prize.tickets_remaining(),
            countdown_started: prize.countdown_started(),
            category: prize.category.clone(),
            end_date: prize.end_date,
            draw_date: prize.draw_date,
            won_at,
        }
    }
}

impl AdminDrawPrizeView {
    pub fn from_parts(
        prize: &product_prizes::Model,
        campaign: Option<&campaigns::Model>,
        product: Option<&products::Model>,
        won_at: Option<DateTime<Utc>>,
    ) -> Self {
        AdminDrawPrizeView {
            prize_id: prize.id,
            product_id: prize.product_id,
            campaign_id: prize.campaign_id,
            product_name: product.map(|p| p.name.clone()),
            campaign_title: campaign.map(|c| c.title.clone()),
            tickets_required: prize.tickets_required,
            tickets_sold: prize.tickets_sold,
            tickets_remaining: prize.tickets_remaining(),
            is_active: prize.is_active,
            category: prize.category.clone(),
            end_date: prize.end_date,
            draw_date: prize.draw_date,
            won_at,
            created_at: prize.created_at,
        }
    }
}
