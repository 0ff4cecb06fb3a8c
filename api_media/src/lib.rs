use actix_web::web;

pub mod routes {
    pub mod analyze;
    pub mod download;
    pub mod upload;
}

mod services {
    pub(crate) mod analyze;
}

mod dtos {
    pub(crate) mod media;
}

pub fn mount(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::upload::post_upload)
        .service(routes::download::get_signed_download)
        .service(routes::analyze::post_analyze);
}
