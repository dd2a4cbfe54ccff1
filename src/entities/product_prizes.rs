use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 商品-活动绑定实体（奖品账本）
/// - tickets_required: 开奖所需票数
/// - tickets_sold: 已售票数（单调递增，与发票同事务）
/// - countdown_start_tickets: 剩余票数达到该阈值时前端展示倒计时
/// - tickets_remaining 不落库，读取时计算，避免与 sold 双写漂移
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "product_prizes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: i64,
    pub campaign_id: i64,
    pub tickets_required: i64,
    pub tickets_sold: i64,
    pub countdown_start_tickets: i64,
    pub is_active: bool,
    pub end_date: Option<DateTime<Utc>>,
    pub draw_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 剩余票数 = required - sold，下限 0
    pub fn tickets_remaining(&self) -> i64 {
        (self.tickets_required - self.tickets_sold).max(0)
    }

    /// 是否已售罄
    pub fn is_sold_out(&self) -> bool {
        self.tickets_remaining() <= 0
    }

    /// 是否进入倒计时展示区间
    pub fn countdown_started(&self) -> bool {
        self.countdown_start_tickets > 0 && self.tickets_remaining() <= self.countdown_start_tickets
    }

    /// 绑定自身的截止条件（end_date 或 draw_date）是否已过
    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        matches!(self.end_date, Some(end) if now > end)
            || matches!(self.draw_date, Some(draw) if now > draw)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::campaigns::Entity",
        from = "Column::CampaignId",
        to = "super::campaigns::Column::Id"
    )]
    Campaign,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn prize(required: i64, sold: i64) -> Model {
        Model {
            id: 1,
            product_id: 1,
            campaign_id: 1,
            tickets_required: required,
            tickets_sold: sold,
            countdown_start_tickets: 10,
            is_active: true,
            end_date: None,
            draw_date: None,
            category: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_tickets_remaining_is_computed() {
        assert_eq!(prize(100, 3).tickets_remaining(), 97);
        assert_eq!(prize(100, 100).tickets_remaining(), 0);
    }

    #[test]
    fn test_tickets_remaining_never_negative() {
        // 计数器超卖时剩余数量不为负
        assert_eq!(prize(100, 105).tickets_remaining(), 0);
        assert!(prize(100, 105).is_sold_out());
    }

    #[test]
    fn test_countdown_threshold() {
        assert!(!prize(100, 3).countdown_started());
        assert!(prize(100, 92).countdown_started());
    }

    #[test]
    fn test_deadline_passed() {
        let now = Utc::now();
        let mut p = prize(100, 0);
        assert!(!p.deadline_passed(now));
        p.end_date = Some(now - Duration::hours(1));
        assert!(p.deadline_passed(now));
        p.end_date = None;
        p.draw_date = Some(now - Duration::minutes(5));
        assert!(p.deadline_passed(now));
    }
}
