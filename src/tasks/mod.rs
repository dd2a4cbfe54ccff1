//! 后台维护任务

use crate::entities::{
    TicketStatus, campaign_entity as campaigns, campaign_ticket_entity as tickets,
};
use crate::error::AppResult;
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// 将已结束活动的 active 票标记为 expired（幂等，可反复执行）
pub async fn expire_tickets_of_ended_campaigns(pool: &DatabaseConnection) -> AppResult<u64> {
    let now = Utc::now();

    let ended_ids: Vec<i64> = campaigns::Entity::find()
        .filter(campaigns::Column::EndDate.lt(now))
        .all(pool)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();

    if ended_ids.is_empty() {
        return Ok(0);
    }

    let result = tickets::Entity::update_many()
        .set(tickets::ActiveModel {
            status: Set(TicketStatus::Expired),
            ..Default::default()
        })
        .filter(tickets::Column::CampaignId.is_in(ended_ids))
        .filter(tickets::Column::Status.eq(TicketStatus::Active))
        .exec(pool)
        .await?;

    Ok(result.rows_affected)
}

/// 周期执行过期票巡检
pub fn spawn_ticket_expiry_task(pool: DatabaseConnection, interval_secs: u64) {
    tokio::spawn(async move {
        loop {
            match expire_tickets_of_ended_campaigns(&pool).await {
                Ok(0) => {}
                Ok(n) => log::info!("Expired {n} ticket(s) of ended campaigns"),
                Err(e) => log::error!("Ticket expiry sweep failed: {e:?}"),
            }
            tokio::time::sleep(std::time::Duration::from_secs(interval_secs)).await;
        }
    });
}
