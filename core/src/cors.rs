use actix_cors::Cors;
use actix_web::http::header;

pub fn middleware(origins: &[String]) -> Cors {
    // an empty allow-list means local development; stay permissive there
    if origins.is_empty() {
        return Cors::permissive();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .max_age(3600);

    for origin in origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
