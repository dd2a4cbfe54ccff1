use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

/// 生成订单号：时间戳 + 6位随机后缀
/// 唯一性最终由 order_number 唯一索引兜底
pub fn generate_order_number() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "ORD{}{:06}",
        Utc::now().format("%Y%m%d%H%M%S"),
        rng.gen_range(0..1_000_000)
    )
}

/// 生成票号：批量发票时同一秒内会产生大量票，用 UUID 保证不冲突
pub fn generate_ticket_number() -> String {
    format!("TKT-{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        assert!(number.starts_with("ORD"));
        // ORD + 14位时间戳 + 6位随机
        assert_eq!(number.len(), 23);
        assert!(number[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_ticket_number_format() {
        let number = generate_ticket_number();
        assert!(number.starts_with("TKT-"));
        assert_eq!(number.len(), 4 + 32);
    }

    #[test]
    fn test_ticket_numbers_are_unique_in_batch() {
        let numbers: HashSet<String> = (0..1000).map(|_| generate_ticket_number()).collect();
        assert_eq!(numbers.len(), 1000);
    }
}
