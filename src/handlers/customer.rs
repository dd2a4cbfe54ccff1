use crate::middlewares::AuthedCustomer;
use crate::models::*;
use crate::services::{CreditService, ParticipationService};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn get_authed_customer(req: &HttpRequest) -> Option<AuthedCustomer> {
    req.extensions().get::<AuthedCustomer>().copied()
}

#[utoipa::path(
    get,
    path = "/customer/credits",
    tag = "customer",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取积分余额成功", body = CreditBalanceResponse),
        (status = 401, description = "未授权")
    )
)]
/// 当前客户的可用积分余额（读取时由流水重算）
pub async fn get_credits(
    service: web::Data<CreditService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let customer_id = get_authed_customer(&req).map(|c| c.id).unwrap_or(0);
    match service.balance(customer_id).await {
        Ok(balance) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": balance }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/customer/credits/history",
    tag = "customer",
    params(
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取积分流水成功", body = PaginatedResponse<CreditEntryResponse>),
        (status = 401, description = "未授权")
    )
)]
/// 分页获取当前客户的积分流水（倒序）
pub async fn get_credit_history(
    service: web::Data<CreditService>,
    req: HttpRequest,
    query: web::Query<CreditHistoryQuery>,
) -> Result<HttpResponse> {
    let customer_id = get_authed_customer(&req).map(|c| c.id).unwrap_or(0);
    match service.history(customer_id, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/customer/tickets",
    tag = "customer",
    params(
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取持票列表成功", body = PaginatedResponse<TicketResponse>),
        (status = 401, description = "未授权")
    )
)]
/// 分页获取当前客户的抽奖票（倒序）
pub async fn get_tickets(
    service: web::Data<ParticipationService>,
    req: HttpRequest,
    query: web::Query<TicketQuery>,
) -> Result<HttpResponse> {
    let customer_id = get_authed_customer(&req).map(|c| c.id).unwrap_or(0);
    match service
        .list_customer_tickets(customer_id, &query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn customer_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customer")
            .route("/credits", web::get().to(get_credits))
            .route("/credits/history", web::get().to(get_credit_history))
            .route("/tickets", web::get().to(get_tickets)),
    );
}
