use crate::middlewares::AuthedCustomer;
use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

/// 从请求扩展中获取客户身份（中间件在鉴权后注入）
fn get_authed_customer(req: &HttpRequest) -> Option<AuthedCustomer> {
    req.extensions().get::<AuthedCustomer>().copied()
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "order",
    request_body = CreateOrderRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "下单成功，返回订单、明细与新发抽奖票", body = OrderResponse),
        (status = 400, description = "校验失败或库存不足"),
        (status = 404, description = "商品不存在"),
        (status = 401, description = "未授权")
    )
)]
/// 下单：校验 / 定价 / 扣库存 / 活动行发票，全部在一个事务内完成
pub async fn create_order(
    service: web::Data<OrderService>,
    req: HttpRequest,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    let customer_id = get_authed_customer(&req).map(|c| c.id).unwrap_or(0);
    match service.create_order(customer_id, body.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Created().json(json!({ "success": true, "order": order }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    params(
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取订单列表成功", body = PaginatedResponse<OrderSummaryResponse>),
        (status = 401, description = "未授权")
    )
)]
/// 分页获取当前客户的订单（倒序）
pub async fn get_orders(
    service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    let customer_id = get_authed_customer(&req).map(|c| c.id).unwrap_or(0);
    match service
        .list_customer_orders(customer_id, &query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(create_order))
            .route("", web::get().to(get_orders)),
    );
}
