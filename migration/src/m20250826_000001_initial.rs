use sea_orm_migration::prelude::*;

/// 客户表（最小化：认证/注册由外部系统负责，这里只保留外键目标）
#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Name,
    Email,
    CreatedAt,
}

/// 商品表
#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    ImageUrl,
    PriceCents,
    SalePriceCents,
    StockQuantity,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

/// 活动表（抽奖活动）
/// - uses_end_date: 活动是否按截止日期开奖（否则按售罄开奖）
/// - max_tickets_per_user: 单用户购票上限 (NULL = 不限)
#[derive(DeriveIden)]
enum Campaigns {
    Table,
    Id,
    Title,
    Status,
    TicketPriceCents,
    CreditsPerTicket,
    MaxTicketsPerUser,
    UsesEndDate,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

/// 商品-活动绑定表（奖品账本）
/// tickets_remaining 不落库，读取时由 required - sold 计算，避免双写漂移
#[derive(DeriveIden)]
enum ProductPrizes {
    Table,
    Id,
    ProductId,
    CampaignId,
    TicketsRequired,
    TicketsSold,
    CountdownStartTickets,
    IsActive,
    EndDate,
    DrawDate,
    Category,
    CreatedAt,
    UpdatedAt,
}

/// 订单表
#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderNumber,
    CustomerId,
    TotalAmountCents,
    PaymentStatus,
    OrderStatus,
    PaymentMethod,
    PaymentTransactionId,
    ShippingAddress,
    Notes,
    CreatedAt,
    UpdatedAt,
}

/// 订单明细表（价格/名称/图片为下单时快照，创建后不可变）
#[derive(DeriveIden)]
enum OrderItems {
    Table,
    Id,
    OrderId,
    ProductId,
    CampaignId,
    ProductName,
    ProductImage,
    Quantity,
    UnitPriceCents,
    SubtotalCents,
    Color,
    Size,
    CreatedAt,
}

/// 抽奖票表（一行 = 一张票）
#[derive(DeriveIden)]
enum CampaignTickets {
    Table,
    Id,
    TicketNumber,
    CampaignId,
    CustomerId,
    OrderId,
    ProductId,
    Quantity,
    TotalPriceCents,
    CreditsEarned,
    IsWinner,
    WonAt,
    Status,
    CreatedAt,
}

/// 积分流水表（仅追加，余额由读取时汇总）
#[derive(DeriveIden)]
enum CustomerCredits {
    Table,
    Id,
    CustomerId,
    TicketId,
    CreditType,
    Amount,
    Description,
    ExpiresAt,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 客户表
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::Email).string().not_null())
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_customers_email_unique")
                    .table(Customers::Table)
                    .col(Customers::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 商品表
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(ColumnDef::new(Products::ImageUrl).string())
                    .col(ColumnDef::new(Products::PriceCents).big_integer().not_null())
                    .col(ColumnDef::new(Products::SalePriceCents).big_integer())
                    .col(
                        ColumnDef::new(Products::StockQuantity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Products::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Products::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 活动表
        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campaigns::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Campaigns::Title).string().not_null())
                    .col(
                        ColumnDef::new(Campaigns::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Campaigns::TicketPriceCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Campaigns::CreditsPerTicket)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Campaigns::MaxTicketsPerUser).big_integer())
                    .col(
                        ColumnDef::new(Campaigns::UsesEndDate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Campaigns::StartDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Campaigns::EndDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Campaigns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Campaigns::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 商品-活动绑定表
        manager
            .create_table(
                Table::create()
                    .table(ProductPrizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductPrizes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProductPrizes::ProductId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductPrizes::CampaignId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductPrizes::TicketsRequired)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductPrizes::TicketsSold)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProductPrizes::CountdownStartTickets)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProductPrizes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ProductPrizes::EndDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(ProductPrizes::DrawDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(ProductPrizes::Category).string())
                    .col(
                        ColumnDef::new(ProductPrizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(ProductPrizes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_prizes_product")
                            .from(ProductPrizes::Table, ProductPrizes::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_prizes_campaign")
                            .from(ProductPrizes::Table, ProductPrizes::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一商品在同一活动下只允许一条绑定
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_product_prizes_product_campaign_unique")
                    .table(ProductPrizes::Table)
                    .col(ProductPrizes::ProductId)
                    .col(ProductPrizes::CampaignId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 订单表
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::OrderNumber).string().not_null())
                    .col(ColumnDef::new(Orders::CustomerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::TotalAmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::PaymentStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Orders::OrderStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Orders::PaymentMethod).string())
                    .col(ColumnDef::new(Orders::PaymentTransactionId).string())
                    .col(ColumnDef::new(Orders::ShippingAddress).text())
                    .col(ColumnDef::new(Orders::Notes).text())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_customer")
                            .from(Orders::Table, Orders::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_order_number_unique")
                    .table(Orders::Table)
                    .col(Orders::OrderNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_customer")
                    .table(Orders::Table)
                    .col(Orders::CustomerId)
                    .to_owned(),
            )
            .await?;

        // 订单明细表
        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderItems::OrderId).big_integer().not_null())
                    .col(
                        ColumnDef::new(OrderItems::ProductId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrderItems::CampaignId).big_integer())
                    .col(ColumnDef::new(OrderItems::ProductName).string().not_null())
                    .col(ColumnDef::new(OrderItems::ProductImage).string())
                    .col(ColumnDef::new(OrderItems::Quantity).big_integer().not_null())
                    .col(
                        ColumnDef::new(OrderItems::UnitPriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderItems::SubtotalCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrderItems::Color).string())
                    .col(ColumnDef::new(OrderItems::Size).string())
                    .col(
                        ColumnDef::new(OrderItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_product")
                            .from(OrderItems::Table, OrderItems::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_campaign")
                            .from(OrderItems::Table, OrderItems::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_order_items_order")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .to_owned(),
            )
            .await?;

        // 抽奖票表
        manager
            .create_table(
                Table::create()
                    .table(CampaignTickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CampaignTickets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CampaignTickets::TicketNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CampaignTickets::CampaignId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CampaignTickets::CustomerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CampaignTickets::OrderId).big_integer())
                    .col(ColumnDef::new(CampaignTickets::ProductId).big_integer())
                    .col(
                        ColumnDef::new(CampaignTickets::Quantity)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(CampaignTickets::TotalPriceCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CampaignTickets::CreditsEarned)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CampaignTickets::IsWinner)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CampaignTickets::WonAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(CampaignTickets::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(CampaignTickets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_tickets_campaign")
                            .from(CampaignTickets::Table, CampaignTickets::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_tickets_customer")
                            .from(CampaignTickets::Table, CampaignTickets::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_tickets_order")
                            .from(CampaignTickets::Table, CampaignTickets::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_tickets_product")
                            .from(CampaignTickets::Table, CampaignTickets::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_campaign_tickets_number_unique")
                    .table(CampaignTickets::Table)
                    .col(CampaignTickets::TicketNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 用户限购校验与奖池查询都按 (campaign, customer) / (campaign, product) 过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_campaign_tickets_campaign_customer")
                    .table(CampaignTickets::Table)
                    .col(CampaignTickets::CampaignId)
                    .col(CampaignTickets::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_campaign_tickets_campaign_product")
                    .table(CampaignTickets::Table)
                    .col(CampaignTickets::CampaignId)
                    .col(CampaignTickets::ProductId)
                    .to_owned(),
            )
            .await?;

        // 积分流水表
        manager
            .create_table(
                Table::create()
                    .table(CustomerCredits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerCredits::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CustomerCredits::CustomerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CustomerCredits::TicketId).big_integer())
                    .col(
                        ColumnDef::new(CustomerCredits::CreditType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerCredits::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CustomerCredits::Description).text())
                    .col(ColumnDef::new(CustomerCredits::ExpiresAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(CustomerCredits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_credits_customer")
                            .from(CustomerCredits::Table, CustomerCredits::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_credits_ticket")
                            .from(CustomerCredits::Table, CustomerCredits::TicketId)
                            .to(CampaignTickets::Table, CampaignTickets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_customer_credits_customer")
                    .table(CustomerCredits::Table)
                    .col(CustomerCredits::CustomerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerCredits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CampaignTickets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductPrizes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Campaigns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        Ok(())
    }
}
