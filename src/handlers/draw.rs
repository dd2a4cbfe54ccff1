use crate::models::*;
use crate::services::DrawService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/draws",
    tag = "draw",
    responses(
        (status = 200, description = "获取开奖分桶成功", body = DrawBucketsResponse<DrawPrizeView>)
    )
)]
/// 公开开奖视图：进行中 / 待开奖 / 已开奖三个互斥桶
/// past / upcoming 截断到最近 20 条
pub async fn get_draws(service: web::Data<DrawService>) -> Result<HttpResponse> {
    match service.list_draws_public().await {
        Ok(buckets) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": buckets }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn draw_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/draws").route("", web::get().to(get_draws)));
}
