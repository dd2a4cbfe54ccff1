use crate::error::AppError;
use crate::middlewares::AuthedCustomer;
use crate::models::*;
use crate::services::DrawService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

/// 管理端接口要求令牌带 is_admin 声明
fn require_admin(req: &HttpRequest) -> Result<AuthedCustomer, AppError> {
    req.extensions()
        .get::<AuthedCustomer>()
        .copied()
        .filter(|c| c.is_admin)
        .ok_or(AppError::Forbidden)
}

#[utoipa::path(
    get,
    path = "/admin/draws",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取开奖分桶成功（含原始计数器）", body = DrawBucketsResponse<AdminDrawPrizeView>),
        (status = 403, description = "无管理权限"),
        (status = 401, description = "未授权")
    )
)]
/// 管理端开奖视图：全量分桶，含 required / sold 原始计数
pub async fn get_admin_draws(
    service: web::Data<DrawService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }
    match service.list_draws_admin().await {
        Ok(buckets) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": buckets }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/draws/pool/{product_id}/{campaign_id}",
    tag = "admin",
    params(
        ("product_id" = i64, Path, description = "商品ID"),
        ("campaign_id" = i64, Path, description = "活动ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取奖池成功（按创建时间正序）", body = [TicketPoolEntry]),
        (status = 404, description = "奖品绑定不存在"),
        (status = 403, description = "无管理权限"),
        (status = 401, description = "未授权")
    )
)]
/// 指定奖品的完整票池，供外部开奖动作按序随机抽取
pub async fn get_ticket_pool(
    service: web::Data<DrawService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }
    let (product_id, campaign_id) = path.into_inner();
    match service.ticket_pool(product_id, campaign_id).await {
        Ok(pool) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": pool }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/draws", web::get().to(get_admin_draws))
            .route(
                "/draws/pool/{product_id}/{campaign_id}",
                web::get().to(get_ticket_pool),
            ),
    );
}
