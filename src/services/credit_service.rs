use crate::entities::{CreditType, customer_credit_entity as credits};
use crate::error::AppResult;
use crate::models::{
    CreditBalanceResponse, CreditEntryResponse, CreditHistoryQuery, PaginatedResponse,
    PaginationParams,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// 余额折算：earned 只在未过期时计入，spent 永久扣减，expired 冲销行不参与
/// （有效期判断直接作用在 earned 行上，冲销行只是审计痕迹）
fn compute_balance(entries: &[credits::Model], now: DateTime<Utc>) -> CreditBalanceResponse {
    let mut total_earned = 0;
    let mut total_spent = 0;
    for entry in entries {
        match entry.credit_type {
            CreditType::Earned => {
                if !entry.is_expired(now) {
                    total_earned += entry.amount;
                }
            }
            CreditType::Spent => total_spent += entry.amount,
            CreditType::Expired => {}
        }
    }
    CreditBalanceResponse {
        available: total_earned - total_spent,
        total_earned,
        total_spent,
    }
}

#[derive(Clone)]
pub struct CreditService {
    pool: DatabaseConnection,
}

impl CreditService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 可用余额（读取时重算，余额从不落库）
    pub async fn balance(&self, customer_id: i64) -> AppResult<CreditBalanceResponse> {
        let entries = credits::Entity::find()
            .filter(credits::Column::CustomerId.eq(customer_id))
            .all(&self.pool)
            .await?;
        Ok(compute_balance(&entries, Utc::now()))
    }

    /// 积分流水（分页，倒序）
    pub async fn history(
        &self,
        customer_id: i64,
        query: &CreditHistoryQuery,
    ) -> AppResult<PaginatedResponse<CreditEntryResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let base_query = credits::Entity::find()
            .filter(credits::Column::CustomerId.eq(customer_id));

        let total = base_query.clone().count(&self.pool).await? as i64;

        let rows = base_query
            .order_by(credits::Column::CreatedAt, Order::Desc)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let data: Vec<CreditEntryResponse> =
            rows.into_iter().map(CreditEntryResponse::from).collect();

        Ok(PaginatedResponse::new(
            data,
            params.page.unwrap_or(1),
            params.get_limit(),
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(
        credit_type: CreditType,
        amount: i64,
        expires_at: Option<DateTime<Utc>>,
    ) -> credits::Model {
        credits::Model {
            id: 0,
            customer_id: 1,
            ticket_id: None,
            credit_type,
            amount,
            description: None,
            expires_at,
            created_at: None,
        }
    }

    #[test]
    fn test_balance_of_empty_ledger_is_zero() {
        let balance = compute_balance(&[], Utc::now());
        assert_eq!(balance.available, 0);
        assert_eq!(balance.total_earned, 0);
        assert_eq!(balance.total_spent, 0);
    }

    #[test]
    fn test_balance_is_earned_minus_spent() {
        let now = Utc::now();
        let future = Some(now + Duration::days(30));
        let entries = vec![
            entry(CreditType::Earned, 500, future),
            entry(CreditType::Earned, 500, future),
            entry(CreditType::Earned, 500, future),
            entry(CreditType::Spent, 200, None),
            entry(CreditType::Spent, 200, None),
        ];
        let balance = compute_balance(&entries, now);
        assert_eq!(balance.total_earned, 1500);
        assert_eq!(balance.total_spent, 400);
        assert_eq!(balance.available, 1100);
    }

    #[test]
    fn test_expired_earned_entry_contributes_zero() {
        let now = Utc::now();
        let entries = vec![
            entry(CreditType::Earned, 500, Some(now - Duration::days(1))),
            entry(CreditType::Earned, 300, Some(now + Duration::days(1))),
        ];
        let balance = compute_balance(&entries, now);
        assert_eq!(balance.total_earned, 300);
        assert_eq!(balance.available, 300);
    }

    #[test]
    fn test_earned_without_expiry_always_counts() {
        let now = Utc::now();
        let entries = vec![entry(CreditType::Earned, 100, None)];
        assert_eq!(compute_balance(&entries, now).available, 100);
    }

    #[test]
    fn test_spent_ignores_expiry() {
        // spent 是永久扣减，带过期时间也照算
        let now = Utc::now();
        let entries = vec![
            entry(CreditType::Earned, 500, None),
            entry(CreditType::Spent, 200, Some(now - Duration::days(1))),
        ];
        assert_eq!(compute_balance(&entries, now).available, 300);
    }
}
