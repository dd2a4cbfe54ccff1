use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 商品实体
/// - price_cents: 原价(美分)
/// - sale_price_cents: 促销价(美分, NULL = 无促销)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub price_cents: i64,
    pub sale_price_cents: Option<i64>,
    pub stock_quantity: i64,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 下单单价：有促销价用促销价，否则用原价
    pub fn effective_price_cents(&self) -> i64 {
        self.sale_price_cents.unwrap_or(self.price_cents)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: i64, sale: Option<i64>) -> Model {
        Model {
            id: 1,
            name: "Test".to_string(),
            image_url: None,
            price_cents: price,
            sale_price_cents: sale,
            stock_quantity: 10,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_effective_price_uses_sale_price_when_present() {
        assert_eq!(product(2000, Some(1500)).effective_price_cents(), 1500);
    }

    #[test]
    fn test_effective_price_falls_back_to_list_price() {
        assert_eq!(product(2000, None).effective_price_cents(), 2000);
    }
}
