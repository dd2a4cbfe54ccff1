use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{CampaignStatus, CreditType, OrderStatus, PaymentStatus, TicketStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::order::create_order,
        handlers::order::get_orders,
        handlers::campaign::participate,
        handlers::customer::get_credits,
        handlers::customer::get_credit_history,
        handlers::customer::get_tickets,
        handlers::draw::get_draws,
        handlers::admin::get_admin_draws,
        handlers::admin::get_ticket_pool,
    ),
    components(
        schemas(
            CreateOrderRequest,
            OrderItemRequest,
            ShippingAddressInput,
            ShippingAddress,
            OrderQuery,
            OrderResponse,
            OrderItemResponse,
            OrderSummaryResponse,
            OrderStatus,
            PaymentStatus,
            ParticipateRequest,
            ParticipationResponse,
            CampaignStatus,
            TicketQuery,
            TicketSummary,
            TicketResponse,
            TicketStatus,
            TicketPoolEntry,
            CreditBalanceResponse,
            CreditHistoryQuery,
            CreditEntryResponse,
            CreditType,
            DrawPrizeView,
            AdminDrawPrizeView,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "order", description = "Order placement and history API"),
        (name = "campaign", description = "Campaign participation API"),
        (name = "customer", description = "Customer credits and tickets API"),
        (name = "draw", description = "Public draw classification API"),
        (name = "admin", description = "Admin draw management API"),
    ),
    info(
        title = "Winshop Backend API",
        version = "1.0.0",
        description = "Winshop prize-campaign storefront REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
