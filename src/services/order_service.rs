use crate::entities::{
    OrderStatus, PaymentStatus, TicketStatus, campaign_ticket_entity as tickets,
    customer_entity as customers, order_entity as orders, order_item_entity as order_items,
    product_entity as products, product_prize_entity as prizes,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateOrderRequest, OrderItemResponse, OrderQuery, OrderResponse, OrderSummaryResponse,
    PaginatedResponse, PaginationParams, TicketSummary,
};
use crate::utils::{generate_order_number, generate_ticket_number};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 定价完成后的订单行（第一遍校验的产物，第二遍写库时使用）
struct PricedLine {
    product: products::Model,
    prize: Option<prizes::Model>,
    quantity: i64,
    unit_price_cents: i64,
    subtotal_cents: i64,
    color: Option<String>,
    size: Option<String>,
}

/// 订单总额 = 各行小计之和（行单价为下单时快照）
fn order_total(lines: &[PricedLine]) -> i64 {
    lines.iter().map(|l| l.subtotal_cents).sum()
}

/// 构造一条活动行要发的票：数量 N 的行恰好发 N 张，每张独立票号
/// 订单路径发的票不产生积分
fn mint_order_tickets(
    campaign_id: i64,
    customer_id: i64,
    order_id: i64,
    product_id: i64,
    quantity: i64,
    unit_price_cents: i64,
) -> Vec<tickets::ActiveModel> {
    (0..quantity)
        .map(|_| tickets::ActiveModel {
            ticket_number: Set(generate_ticket_number()),
            campaign_id: Set(campaign_id),
            customer_id: Set(customer_id),
            order_id: Set(Some(order_id)),
            product_id: Set(Some(product_id)),
            quantity: Set(1),
            total_price_cents: Set(unit_price_cents),
            credits_earned: Set(0),
            is_winner: Set(false),
            status: Set(TicketStatus::Active),
            ..Default::default()
        })
        .collect()
}

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 下单（单事务）
    ///
    /// 逻辑:
    /// 1. 请求校验：行列表非空、数量 >= 1、状态枚举合法
    /// 2. 第一遍：逐行查商品与奖品绑定并定价，缺商品整单 404
    /// 3. 写订单 + 明细（商品名/图片落快照）
    /// 4. 条件更新原子扣库存，受影响行数为 0 即库存不足，整单回滚
    /// 5. 活动行：尽力而为累加 tickets_sold，按件数逐张发票
    /// 6. 提交；任何关键步骤失败整体回滚
    pub async fn create_order(
        &self,
        customer_id: i64,
        req: CreateOrderRequest,
    ) -> AppResult<OrderResponse> {
        if customer_id <= 0 {
            return Err(AppError::ValidationError("Missing customer id".to_string()));
        }
        if req.items.is_empty() {
            return Err(AppError::ValidationError(
                "Order must contain at least one item".to_string(),
            ));
        }
        for item in &req.items {
            if item.quantity < 1 {
                return Err(AppError::ValidationError(format!(
                    "Invalid quantity {} for product {}",
                    item.quantity, item.product_id
                )));
            }
        }
        let order_status = match &req.order_status {
            Some(s) => s.parse::<OrderStatus>().map_err(AppError::ValidationError)?,
            None => OrderStatus::Pending,
        };
        let payment_status = match &req.payment_status {
            Some(s) => s
                .parse::<PaymentStatus>()
                .map_err(AppError::ValidationError)?,
            None => PaymentStatus::Pending,
        };
        // 收货地址在入口处归一化，落库只存标准 JSON
        let shipping_address = match req.shipping_address {
            Some(input) => Some(serde_json::to_string(&input.normalize()?)?),
            None => None,
        };

        let txn = self.pool.begin().await?;

        customers::Entity::find_by_id(customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Customer {customer_id} not found")))?;

        // 第一遍：查商品 / 定价 / 取有效奖品绑定
        let mut lines: Vec<PricedLine> = Vec::with_capacity(req.items.len());
        for item in &req.items {
            let product = products::Entity::find_by_id(item.product_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Product {} not found", item.product_id))
                })?;
            if product.stock_quantity < item.quantity {
                return Err(AppError::BusinessError(format!(
                    "Insufficient stock for \"{}\": requested {}, available {}",
                    product.name, item.quantity, product.stock_quantity
                )));
            }
            let prize = prizes::Entity::find()
                .filter(prizes::Column::ProductId.eq(product.id))
                .filter(prizes::Column::IsActive.eq(true))
                .one(&txn)
                .await?;
            let unit_price_cents = product.effective_price_cents();
            lines.push(PricedLine {
                prize,
                quantity: item.quantity,
                unit_price_cents,
                subtotal_cents: unit_price_cents * item.quantity,
                color: item.color.clone(),
                size: item.size.clone(),
                product,
            });
        }

        let total_amount_cents = order_total(&lines);

        let order = orders::ActiveModel {
            order_number: Set(generate_order_number()),
            customer_id: Set(customer_id),
            total_amount_cents: Set(total_amount_cents),
            payment_status: Set(payment_status),
            order_status: Set(order_status),
            payment_method: Set(req.payment_method.clone()),
            payment_transaction_id: Set(req.payment_transaction_id.clone()),
            shipping_address: Set(shipping_address),
            notes: Set(req.notes.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut item_responses: Vec<OrderItemResponse> = Vec::with_capacity(lines.len());
        let mut campaign_entries: Vec<TicketSummary> = Vec::new();

        for line in &lines {
            let item = order_items::ActiveModel {
                order_id: Set(order.id),
                product_id: Set(line.product.id),
                campaign_id: Set(line.prize.as_ref().map(|p| p.campaign_id)),
                product_name: Set(line.product.name.clone()),
                product_image: Set(line.product.image_url.clone()),
                quantity: Set(line.quantity),
                unit_price_cents: Set(line.unit_price_cents),
                subtotal_cents: Set(line.subtotal_cents),
                color: Set(line.color.clone()),
                size: Set(line.size.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            item_responses.push(OrderItemResponse::from(item));

            // 条件更新扣库存：预检查只负责报错信息，真正的并发保护在这里
            let decrement = products::Entity::update_many()
                .col_expr(
                    products::Column::StockQuantity,
                    Expr::col(products::Column::StockQuantity).sub(line.quantity),
                )
                .filter(products::Column::Id.eq(line.product.id))
                .filter(products::Column::StockQuantity.gte(line.quantity))
                .exec(&txn)
                .await?;
            if decrement.rows_affected == 0 {
                return Err(AppError::BusinessError(format!(
                    "Insufficient stock for \"{}\": requested {}",
                    line.product.name, line.quantity
                )));
            }

            if let Some(prize) = &line.prize {
                // 奖品计数器为非关键步骤：失败记日志不回滚，票数可通过对账恢复
                // 用保存点隔离，计数器语句出错不会污染外层事务
                let counter_update: Result<(), sea_orm::DbErr> = async {
                    let savepoint = txn.begin().await?;
                    prizes::Entity::update_many()
                        .col_expr(
                            prizes::Column::TicketsSold,
                            Expr::col(prizes::Column::TicketsSold).add(line.quantity),
                        )
                        .filter(prizes::Column::Id.eq(prize.id))
                        .exec(&savepoint)
                        .await?;
                    savepoint.commit().await
                }
                .await;
                if let Err(e) = counter_update {
                    log::warn!(
                        "Failed to bump tickets_sold for prize {} (product {}, campaign {}): {e}",
                        prize.id,
                        prize.product_id,
                        prize.campaign_id
                    );
                }

                for ticket in mint_order_tickets(
                    prize.campaign_id,
                    customer_id,
                    order.id,
                    line.product.id,
                    line.quantity,
                    line.unit_price_cents,
                ) {
                    let ticket = ticket.insert(&txn).await?;
                    campaign_entries.push(TicketSummary::from(ticket));
                }
            }
        }

        txn.commit().await?;

        log::info!(
            "Order {} created for customer {customer_id}: {} line(s), {} ticket(s), total {} cents",
            order.order_number,
            item_responses.len(),
            campaign_entries.len(),
            total_amount_cents
        );

        Ok(OrderResponse::from_parts(
            order,
            item_responses,
            campaign_entries,
        ))
    }

    /// 客户订单列表（分页，倒序）
    pub async fn list_customer_orders(
        &self,
        customer_id: i64,
        query: &OrderQuery,
    ) -> AppResult<PaginatedResponse<OrderSummaryResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let base_query = orders::Entity::find().filter(orders::Column::CustomerId.eq(customer_id));

        let total = base_query.clone().count(&self.pool).await? as i64;

        let items = base_query
            .order_by(orders::Column::CreatedAt, Order::Desc)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let data: Vec<OrderSummaryResponse> =
            items.into_iter().map(OrderSummaryResponse::from).collect();

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

    fn product(id: i64, price: i64, sale: Option<i64>) -> products::Model {
        products::Model {
            id,
            name: format!("Product {id}"),
            image_url: None,
            price_cents: price,
            sale_price_cents: sale,
            stock_quantity: 100,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn line(product: products::Model, quantity: i64) -> PricedLine {
        let unit_price_cents = product.effective_price_cents();
        PricedLine {
            prize: None,
            quantity,
            unit_price_cents,
            subtotal_cents: unit_price_cents * quantity,
            color: None,
            size: None,
            product,
        }
    }

    #[test]
    fn test_order_total_sums_line_subtotals() {
        let lines = vec![line(product(1, 2000, None), 3), line(product(2, 500, None), 2)];
        assert_eq!(order_total(&lines), 7000);
    }

    #[test]
    fn test_order_total_uses_sale_price_when_present() {
        let lines = vec![line(product(1, 2000, Some(1500)), 2)];
        assert_eq!(order_total(&lines), 3000);
    }

    #[test]
    fn test_order_total_of_empty_order_is_zero() {
        assert_eq!(order_total(&[]), 0);
    }

    #[test]
    fn test_campaign_line_mints_one_ticket_per_unit() {
        // 数量 N 的活动行恰好发 N 张票
        let batch = mint_order_tickets(20, 7, 100, 10, 5, 2000);
        assert_eq!(batch.len(), 5);
        for ticket in &batch {
            assert_eq!(*ticket.quantity.as_ref(), 1);
            assert_eq!(*ticket.credits_earned.as_ref(), 0);
            assert_eq!(*ticket.order_id.as_ref(), Some(100));
            assert_eq!(*ticket.product_id.as_ref(), Some(10));
            assert_eq!(*ticket.total_price_cents.as_ref(), 2000);
        }
    }

    #[test]
    fn test_minted_tickets_have_unique_numbers() {
        let batch = mint_order_tickets(20, 7, 100, 10, 50, 1000);
        let numbers: std::collections::HashSet<String> = batch
            .iter()
            .map(|t| t.ticket_number.as_ref().clone())
            .collect();
        assert_eq!(numbers.len(), 50);
    }

    #[test]
    fn test_zero_quantity_line_mints_nothing() {
        assert!(mint_order_tickets(20, 7, 100, 10, 0, 1000).is_empty());
    }
}
