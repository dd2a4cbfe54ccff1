use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{OrderStatus, PaymentStatus, order_entity, order_item_entity};
use crate::error::{AppError, AppResult};

use super::TicketSummary;

/// 下单请求
/// payment_status / order_status 以字符串提交，服务端校验枚举取值
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: Option<ShippingAddressInput>,
    pub payment_method: Option<String>,
    pub payment_transaction_id: Option<String>,
    pub payment_status: Option<String>,
    pub order_status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: i64,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// 收货地址入口形态：历史客户端有的直接传结构体，有的传 JSON 字符串。
/// 入口处立即归一化成标准结构，落库只存一种形态。
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ShippingAddressInput {
    Structured(ShippingAddress),
    Raw(String),
}

impl ShippingAddressInput {
    /// 归一化：Raw 形态按 JSON 解析，解析失败算校验错误
    pub fn normalize(self) -> AppResult<ShippingAddress> {
        match self {
            ShippingAddressInput::Structured(addr) => Ok(addr),
            ShippingAddressInput::Raw(text) => serde_json::from_str(&text)
                .map_err(|e| AppError::ValidationError(format!("Invalid shipping address: {e}"))),
        }
    }
}

/// 标准化收货地址
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ShippingAddress {
    pub recipient: String,
    pub phone: Option<String>,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// 订单列表查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct OrderQuery {
    /// 页码 (默认 1)
    pub page: Option<u32>,
    /// 每页数量 (默认 20)
    pub per_page: Option<u32>,
}

/// 订单明细响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i64,
    pub product_id: i64,
    /// 绑定了奖品的明细才有活动引用
    pub campaign_id: Option<i64>,
    /// 下单时的商品名快照
    pub product_name: String,
    pub product_image: Option<String>,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl From<order_item_entity::Model> for OrderItemResponse {
    fn from(m: order_item_entity::Model) -> Self {
        OrderItemResponse {
            id: m.id,
            product_id: m.product_id,
            campaign_id: m.campaign_id,
            product_name: m.product_name,
            product_image: m.product_image,
            quantity: m.quantity,
            unit_price_cents: m.unit_price_cents,
            subtotal_cents: m.subtotal_cents,
            color: m.color,
            size: m.size,
        }
    }
}

/// 订单响应（含明细与本单新发的抽奖票摘要）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub order_number: String,
    pub customer_id: i64,
    pub total_amount_cents: i64,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub payment_method: Option<String>,
    pub shipping_address: Option<ShippingAddress>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
    pub campaign_entries: Vec<TicketSummary>,
}

impl OrderResponse {
    pub fn from_parts(
        order: order_entity::Model,
        items: Vec<OrderItemResponse>,
        campaign_entries: Vec<TicketSummary>,
    ) -> Self {
        // 落库的是标准化 JSON，解析失败按缺失处理
        let shipping_address = order
            .shipping_address
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok());

        OrderResponse {
            id: order.id,
            order_number: order.order_number,
            customer_id: order.customer_id,
            total_amount_cents: order.total_amount_cents,
            payment_status: order.payment_status,
            order_status: order.order_status,
            payment_method: order.payment_method,
            shipping_address,
            notes: order.notes,
            created_at: order.created_at.unwrap_or_else(Utc::now),
            items,
            campaign_entries,
        }
    }
}

/// 订单列表条目（不带明细）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderSummaryResponse {
    pub id: i64,
    pub order_number: String,
    pub total_amount_cents: i64,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<order_entity::Model> for OrderSummaryResponse {
    fn from(m: order_entity::Model) -> Self {
        OrderSummaryResponse {
            id: m.id,
            order_number: m.order_number,
            total_amount_cents: m.total_amount_cents,
            payment_status: m.payment_status,
            order_status: m.order_status,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            recipient: "Alice".to_string(),
            phone: Some("555-0100".to_string()),
            line1: "1 Main St".to_string(),
            line2: None,
            city: "Springfield".to_string(),
            state: Some("IL".to_string()),
            postal_code: Some("62701".to_string()),
            country: Some("US".to_string()),
        }
    }

    #[test]
    fn test_normalize_structured_address_passes_through() {
        let input = ShippingAddressInput::Structured(address());
        assert_eq!(input.normalize().unwrap(), address());
    }

    #[test]
    fn test_normalize_raw_json_address() {
        let raw = serde_json::to_string(&address()).unwrap();
        let input = ShippingAddressInput::Raw(raw);
        assert_eq!(input.normalize().unwrap(), address());
    }

    #[test]
    fn test_normalize_rejects_malformed_raw_json() {
        let input = ShippingAddressInput::Raw("not json".to_string());
        assert!(matches!(
            input.normalize(),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_request_deserializes_both_address_shapes() {
        let structured = r#"{"items":[{"product_id":1,"quantity":2}],
            "shipping_address":{"recipient":"Alice","line1":"1 Main St","city":"Springfield"}}"#;
        let req: CreateOrderRequest = serde_json::from_str(structured).unwrap();
        assert!(matches!(
            req.shipping_address,
            Some(ShippingAddressInput::Structured(_))
        ));

        let raw = r#"{"items":[{"product_id":1,"quantity":2}],
            "shipping_address":"{\"recipient\":\"Alice\",\"line1\":\"1 Main St\",\"city\":\"Springfield\"}"}"#;
        let req: CreateOrderRequest = serde_json::from_str(raw).unwrap();
        let addr = req.shipping_address.unwrap().normalize().unwrap();
        assert_eq!(addr.recipient, "Alice");
    }
}
