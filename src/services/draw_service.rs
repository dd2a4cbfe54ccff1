use crate::entities::{
    CampaignStatus, campaign_entity as campaigns, campaign_ticket_entity as tickets,
    product_entity as products, product_prize_entity as prizes,
};
use crate::error::{AppError, AppResult};
use crate::models::{AdminDrawPrizeView, DrawBucketsResponse, DrawPrizeView, TicketPoolEntry};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

/// 公开视图下 past / upcoming 各自最多返回的条数
const PUBLIC_BUCKET_LIMIT: usize = 20;

/// 分桶结果，三桶互斥；都不满足（如绑定被停用且未就绪）则不出现在任何桶
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawBucket {
    Active,
    Upcoming,
    Past,
}

/// 纯分桶判定，无副作用
/// - Past: 已有中奖票
/// - Upcoming: 无中奖票，且售罄 / 活动按截止日期开奖且已到期 / 绑定自身截止已过
/// - Active: 无中奖票、绑定与活动均有效、未售罄、无任何截止条件已过
pub fn classify_prize(
    prize: &prizes::Model,
    campaign: Option<&campaigns::Model>,
    has_winner: bool,
    now: DateTime<Utc>,
) -> Option<DrawBucket> {
    if has_winner {
        return Some(DrawBucket::Past);
    }

    let campaign_deadline_passed =
        campaign.map(|c| c.uses_end_date && c.has_ended(now)).unwrap_or(false);
    if prize.is_sold_out() || campaign_deadline_passed || prize.deadline_passed(now) {
        return Some(DrawBucket::Upcoming);
    }

    let campaign_active = campaign
        .map(|c| c.status == CampaignStatus::Active)
        .unwrap_or(false);
    if prize.is_active && campaign_active && prize.tickets_remaining() > 0 {
        return Some(DrawBucket::Active);
    }

    None
}

/// 单个绑定的分类输入（查询结果的汇集）
struct ClassifiedPrize {
    prize: prizes::Model,
    campaign: Option<campaigns::Model>,
    won_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct DrawService {
    pool: DatabaseConnection,
}

impl DrawService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 公开开奖视图（past / upcoming 截断到最近 20 条）
    pub async fn list_draws_public(&self) -> AppResult<DrawBucketsResponse<DrawPrizeView>> {
        let (buckets, products_map) = self.load_buckets().await?;

        let project = |items: &[ClassifiedPrize]| {
            items
                .iter()
                .map(|c| {
                    DrawPrizeView::from_parts(
                        &c.prize,
                        c.campaign.as_ref(),
                        products_map.get(&c.prize.product_id),
                        c.won_at,
                    )
                })
                .collect::<Vec<_>>()
        };

        let mut past = project(&buckets.past);
        let mut upcoming = project(&buckets.upcoming);
        past.truncate(PUBLIC_BUCKET_LIMIT);
        upcoming.truncate(PUBLIC_BUCKET_LIMIT);

        Ok(DrawBucketsResponse {
            active: project(&buckets.active),
            upcoming,
            past,
        })
    }

    /// 管理端开奖视图（全量，含原始计数器）
    pub async fn list_draws_admin(&self) -> AppResult<DrawBucketsResponse<AdminDrawPrizeView>> {
        let (buckets, products_map) = self.load_buckets().await?;

        let project = |items: &[ClassifiedPrize]| {
            items
                .iter()
                .map(|c| {
                    AdminDrawPrizeView::from_parts(
                        &c.prize,
                        c.campaign.as_ref(),
                        products_map.get(&c.prize.product_id),
                        c.won_at,
                    )
                })
                .collect::<Vec<_>>()
        };

        Ok(DrawBucketsResponse {
            active: project(&buckets.active),
            upcoming: project(&buckets.upcoming),
            past: project(&buckets.past),
        })
    }

    /// 指定奖品的完整票池，按创建时间正序（外部开奖动作按此顺序随机抽取）
    pub async fn ticket_pool(
        &self,
        product_id: i64,
        campaign_id: i64,
    ) -> AppResult<Vec<TicketPoolEntry>> {
        prizes::Entity::find()
            .filter(prizes::Column::ProductId.eq(product_id))
            .filter(prizes::Column::CampaignId.eq(campaign_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Prize binding for product {product_id} and campaign {campaign_id} not found"
                ))
            })?;

        let rows = tickets::Entity::find()
            .filter(tickets::Column::ProductId.eq(product_id))
            .filter(tickets::Column::CampaignId.eq(campaign_id))
            .order_by_asc(tickets::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(TicketPoolEntry::from).collect())
    }

    /// 读取绑定 + 活动 + 中奖记录并分桶排序
    /// 只读查询，不开事务，可接受轻微滞后的读
    async fn load_buckets(
        &self,
    ) -> AppResult<(ClassifiedBuckets, HashMap<i64, products::Model>)> {
        let now = Utc::now();

        let bindings = prizes::Entity::find()
            .find_also_related(campaigns::Entity)
            .all(&self.pool)
            .await?;

        let product_ids: Vec<i64> = bindings.iter().map(|(p, _)| p.product_id).collect();
        let products_map: HashMap<i64, products::Model> = products::Entity::find()
            .filter(products::Column::Id.is_in(product_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        // (product, campaign) -> 最近一次中奖时间
        let winner_rows = tickets::Entity::find()
            .filter(tickets::Column::IsWinner.eq(true))
            .filter(tickets::Column::ProductId.is_not_null())
            .all(&self.pool)
            .await?;
        let mut winners: HashMap<(i64, i64), DateTime<Utc>> = HashMap::new();
        for ticket in winner_rows {
            let Some(product_id) = ticket.product_id else {
                continue;
            };
            let won_at = ticket.won_at.unwrap_or_else(Utc::now);
            winners
                .entry((product_id, ticket.campaign_id))
                .and_modify(|at| {
                    if won_at > *at {
                        *at = won_at;
                    }
                })
                .or_insert(won_at);
        }

        let mut buckets = ClassifiedBuckets::default();
        for (prize, campaign) in bindings {
            let won_at = winners.get(&(prize.product_id, prize.campaign_id)).copied();
            let classified = ClassifiedPrize {
                won_at,
                prize,
                campaign,
            };
            match classify_prize(
                &classified.prize,
                classified.campaign.as_ref(),
                won_at.is_some(),
                now,
            ) {
                Some(DrawBucket::Active) => buckets.active.push(classified),
                Some(DrawBucket::Upcoming) => buckets.upcoming.push(classified),
                Some(DrawBucket::Past) => buckets.past.push(classified),
                None => {}
            }
        }

        // active: 最新创建在前; upcoming: 最接近就绪在前; past: 最近开奖在前
        buckets
            .active
            .sort_by(|a, b| b.prize.created_at.cmp(&a.prize.created_at));
        buckets.upcoming.sort_by(|a, b| {
            let key_a = (
                a.prize.tickets_remaining(),
                a.prize.draw_date.unwrap_or(DateTime::<Utc>::MAX_UTC),
            );
            let key_b = (
                b.prize.tickets_remaining(),
                b.prize.draw_date.unwrap_or(DateTime::<Utc>::MAX_UTC),
            );
            key_a.cmp(&key_b)
        });
        buckets.past.sort_by(|a, b| b.won_at.cmp(&a.won_at));

        Ok((buckets, products_map))
    }
}

#[derive(Default)]
struct ClassifiedBuckets {
    active: Vec<ClassifiedPrize>,
    upcoming: Vec<ClassifiedPrize>,
    past: Vec<ClassifiedPrize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn prize(required: i64, sold: i64) -> prizes::Model {
        prizes::Model {
            id: 1,
            product_id: 10,
            campaign_id: 20,
            tickets_required: required,
            tickets_sold: sold,
            countdown_start_tickets: 0,
            is_active: true,
            end_date: None,
            draw_date: None,
            category: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn campaign(status: CampaignStatus) -> campaigns::Model {
        campaigns::Model {
            id: 20,
            title: "Test".to_string(),
            status,
            ticket_price_cents: 1000,
            credits_per_ticket: 500,
            max_tickets_per_user: None,
            uses_end_date: false,
            start_date: None,
            end_date: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_fresh_binding_is_active() {
        let now = Utc::now();
        let c = campaign(CampaignStatus::Active);
        assert_eq!(
            classify_prize(&prize(100, 3), Some(&c), false, now),
            Some(DrawBucket::Active)
        );
    }

    #[test]
    fn test_sold_out_binding_is_upcoming_not_active() {
        let now = Utc::now();
        let c = campaign(CampaignStatus::Active);
        assert_eq!(
            classify_prize(&prize(100, 100), Some(&c), false, now),
            Some(DrawBucket::Upcoming)
        );
    }

    #[test]
    fn test_winner_moves_binding_to_past_only() {
        // 售罄 + 已中奖：Past 优先于 Upcoming
        let now = Utc::now();
        let c = campaign(CampaignStatus::Active);
        assert_eq!(
            classify_prize(&prize(100, 100), Some(&c), true, now),
            Some(DrawBucket::Past)
        );
    }

    #[test]
    fn test_binding_deadline_makes_it_upcoming() {
        let now = Utc::now();
        let c = campaign(CampaignStatus::Active);
        let mut p = prize(100, 3);
        p.draw_date = Some(now - Duration::hours(1));
        assert_eq!(
            classify_prize(&p, Some(&c), false, now),
            Some(DrawBucket::Upcoming)
        );
    }

    #[test]
    fn test_campaign_end_date_only_counts_when_used() {
        let now = Utc::now();
        let mut c = campaign(CampaignStatus::Active);
        c.end_date = Some(now - Duration::hours(1));

        // 不按截止日期开奖的活动：过了 end_date 也不进入待开奖
        c.uses_end_date = false;
        assert_eq!(
            classify_prize(&prize(100, 3), Some(&c), false, now),
            Some(DrawBucket::Active)
        );

        c.uses_end_date = true;
        assert_eq!(
            classify_prize(&prize(100, 3), Some(&c), false, now),
            Some(DrawBucket::Upcoming)
        );
    }

    #[test]
    fn test_deactivated_binding_is_in_no_bucket() {
        let now = Utc::now();
        let c = campaign(CampaignStatus::Active);
        let mut p = prize(100, 3);
        p.is_active = false;
        assert_eq!(classify_prize(&p, Some(&c), false, now), None);
    }

    #[test]
    fn test_inactive_campaign_blocks_active_bucket() {
        let now = Utc::now();
        let c = campaign(CampaignStatus::Draft);
        assert_eq!(classify_prize(&prize(100, 3), Some(&c), false, now), None);
    }

    #[test]
    fn test_buckets_are_disjoint_for_any_state() {
        // 每种输入组合恰好落入至多一个桶（classify 返回单值本身即保证互斥）
        let now = Utc::now();
        let c = campaign(CampaignStatus::Active);
        for sold in [0, 50, 100, 120] {
            for has_winner in [false, true] {
                let bucket = classify_prize(&prize(100, sold), Some(&c), has_winner, now);
                if has_winner {
                    assert_eq!(bucket, Some(DrawBucket::Past));
                } else if sold >= 100 {
                    assert_eq!(bucket, Some(DrawBucket::Upcoming));
                } else {
                    assert_eq!(bucket, Some(DrawBucket::Active));
                }
            }
        }
    }
}
