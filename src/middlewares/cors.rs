use actix_cors::Cors;

pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| {
            // 在生产环境中应该限制允许的域名
            true
        })
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        // 放宽自定义 Header，防止前端预检失败
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
