use crate::middlewares::AuthedCustomer;
use crate::models::*;
use crate::services::ParticipationService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn get_authed_customer(req: &HttpRequest) -> Option<AuthedCustomer> {
    req.extensions().get::<AuthedCustomer>().copied()
}

#[utoipa::path(
    post,
    path = "/campaigns/{id}/participate",
    tag = "campaign",
    params(
        ("id" = i64, Path, description = "活动ID")
    ),
    request_body = ParticipateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "参与成功，返回新发抽奖票", body = ParticipationResponse),
        (status = 400, description = "数量越界 / 限购超额 / 活动窗口外"),
        (status = 404, description = "活动不存在或未启用"),
        (status = 401, description = "未授权")
    )
)]
/// 直接参与活动购票（不经过商品购买），发票与积分同事务落库
pub async fn participate(
    service: web::Data<ParticipationService>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<ParticipateRequest>,
) -> Result<HttpResponse> {
    let customer_id = get_authed_customer(&req).map(|c| c.id).unwrap_or(0);
    let campaign_id = path.into_inner();
    match service
        .participate(customer_id, campaign_id, body.into_inner())
        .await
    {
        Ok(ticket) => Ok(HttpResponse::Created().json(json!({ "success": true, "ticket": ticket }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn campaign_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/campaigns").route("/{id}/participate", web::post().to(participate)),
    );
}
