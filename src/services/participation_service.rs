use crate::entities::{
    CampaignStatus, CreditType, TicketStatus, campaign_entity as campaigns,
    campaign_ticket_entity as tickets, customer_credit_entity as credits,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    PaginatedResponse, PaginationParams, ParticipateRequest, ParticipationResponse, TicketQuery,
    TicketResponse, TicketSummary,
};
use crate::utils::generate_ticket_number;
use chrono::{DateTime, Duration, Months, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 积分有效期：发放起 6 个月
fn credit_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_months(Months::new(6))
        .unwrap_or_else(|| now + Duration::days(183))
}

/// 构造本次参与要发的票：数量 N 恰好发 N 张，每张独立票号
/// 直接参与路径无订单/商品关联，按活动固定费率计价与发积分
fn mint_participation_tickets(
    campaign: &campaigns::Model,
    customer_id: i64,
    quantity: i64,
) -> Vec<tickets::ActiveModel> {
    (0..quantity)
        .map(|_| tickets::ActiveModel {
            ticket_number: Set(generate_ticket_number()),
            campaign_id: Set(campaign.id),
            customer_id: Set(customer_id),
            order_id: Set(None),
            product_id: Set(None),
            quantity: Set(1),
            total_price_cents: Set(campaign.ticket_price_cents),
            credits_earned: Set(campaign.credits_per_ticket),
            is_winner: Set(false),
            status: Set(TicketStatus::Active),
            ..Default::default()
        })
        .collect()
}

/// 限购校验：已持有 + 本次申请不得超过活动上限
fn check_ticket_allowance(max: i64, existing: i64, requested: i64) -> AppResult<()> {
    if existing + requested > max {
        return Err(AppError::BusinessError(format!(
            "Ticket limit exceeded: limit {max}, already held {existing}, requested {requested}"
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ParticipationService {
    pool: DatabaseConnection,
}

impl ParticipationService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 直接参与活动（不经过商品购买，单事务）
    ///
    /// 逻辑:
    /// 1. 活动必须 active 且在起止窗口内，失败给出具体原因
    /// 2. 有限购时汇总已持有票数校验额度
    /// 3. 按活动固定费率定价，逐张发票（一行一票）
    /// 4. 每张票配一条 earned 积分流水，6 个月有效期
    /// 5. 提交；任何失败整体回滚
    pub async fn participate(
        &self,
        customer_id: i64,
        campaign_id: i64,
        req: ParticipateRequest,
    ) -> AppResult<ParticipationResponse> {
        if customer_id <= 0 {
            return Err(AppError::ValidationError("Missing customer id".to_string()));
        }
        if !(1..=10).contains(&req.quantity) {
            return Err(AppError::ValidationError(
                "Quantity must be between 1 and 10".to_string(),
            ));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let campaign = campaigns::Entity::find_by_id(campaign_id)
            .one(&txn)
            .await?
            .filter(|c| c.status == CampaignStatus::Active)
            .ok_or_else(|| AppError::NotFound("Campaign not found or inactive".to_string()))?;
        if !campaign.has_started(now) {
            return Err(AppError::BusinessError(
                "Campaign has not started yet".to_string(),
            ));
        }
        if campaign.has_ended(now) {
            return Err(AppError::BusinessError("Campaign has ended".to_string()));
        }

        if let Some(max) = campaign.max_tickets_per_user {
            // 按 quantity 列汇总，兼容历史上一行多票的数据
            let existing: i64 = tickets::Entity::find()
                .filter(tickets::Column::CampaignId.eq(campaign.id))
                .filter(tickets::Column::CustomerId.eq(customer_id))
                .all(&txn)
                .await?
                .iter()
                .map(|t| t.quantity)
                .sum();
            check_ticket_allowance(max, existing, req.quantity)?;
        }

        let expires_at = credit_expiry(now);
        let mut summaries: Vec<TicketSummary> = Vec::with_capacity(req.quantity as usize);

        for ticket in mint_participation_tickets(&campaign, customer_id, req.quantity) {
            let ticket = ticket.insert(&txn).await?;

            credits::ActiveModel {
                customer_id: Set(customer_id),
                ticket_id: Set(Some(ticket.id)),
                credit_type: Set(CreditType::Earned),
                amount: Set(campaign.credits_per_ticket),
                description: Set(Some(format!(
                    "Credits earned from campaign \"{}\"",
                    campaign.title
                ))),
                expires_at: Set(Some(expires_at)),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            summaries.push(TicketSummary::from(ticket));
        }

        txn.commit().await?;

        log::info!(
            "Customer {customer_id} bought {} ticket(s) in campaign {} ({} cents, {} credits)",
            req.quantity,
            campaign.id,
            campaign.ticket_price_cents * req.quantity,
            campaign.credits_per_ticket * req.quantity
        );

        Ok(ParticipationResponse {
            campaign_id: campaign.id,
            quantity: req.quantity,
            total_price_cents: campaign.ticket_price_cents * req.quantity,
            credits_earned: campaign.credits_per_ticket * req.quantity,
            tickets: summaries,
        })
    }

    /// 客户持票列表（分页，倒序）
    pub async fn list_customer_tickets(
        &self,
        customer_id: i64,
        query: &TicketQuery,
    ) -> AppResult<PaginatedResponse<TicketResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let base_query =
            tickets::Entity::find().filter(tickets::Column::CustomerId.eq(customer_id));

        let total = base_query.clone().count(&self.pool).await? as i64;

        let rows = base_query
            .order_by(tickets::Column::CreatedAt, Order::Desc)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let data: Vec<TicketResponse> = rows.into_iter().map(TicketResponse::from).collect();

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

    #[test]
    fn test_allowance_rejects_over_limit() {
        // 上限 5，已持 3：再买 3 超额
        let err = check_ticket_allowance(5, 3, 3).unwrap_err();
        match err {
            AppError::BusinessError(msg) => {
                assert!(msg.contains("limit 5"));
                assert!(msg.contains("already held 3"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_allowance_accepts_exact_fill() {
        // 上限 5，已持 3：再买 2 刚好打满
        assert!(check_ticket_allowance(5, 3, 2).is_ok());
    }

    fn campaign() -> campaigns::Model {
        campaigns::Model {
            id: 20,
            title: "Test".to_string(),
            status: CampaignStatus::Active,
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
    fn test_participation_mints_one_ticket_per_requested_unit() {
        // 申请 N 张恰好构造 N 张，每张按活动费率计价发积分
        let batch = mint_participation_tickets(&campaign(), 7, 4);
        assert_eq!(batch.len(), 4);
        for ticket in &batch {
            assert_eq!(*ticket.quantity.as_ref(), 1);
            assert_eq!(*ticket.total_price_cents.as_ref(), 1000);
            assert_eq!(*ticket.credits_earned.as_ref(), 500);
            assert_eq!(*ticket.order_id.as_ref(), None);
            assert_eq!(*ticket.product_id.as_ref(), None);
        }
    }

    #[test]
    fn test_participation_tickets_have_unique_numbers() {
        let batch = mint_participation_tickets(&campaign(), 7, 10);
        let numbers: std::collections::HashSet<String> = batch
            .iter()
            .map(|t| t.ticket_number.as_ref().clone())
            .collect();
        assert_eq!(numbers.len(), 10);
    }

    #[test]
    fn test_credit_expiry_is_six_months_out() {
        let now = Utc::now();
        let expiry = credit_expiry(now);
        let days = (expiry - now).num_days();
        assert!((180..=186).contains(&days), "expiry was {days} days out");
    }
}
