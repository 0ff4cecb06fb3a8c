use actix_web::web;

pub mod routes {
    pub mod checkout;
    pub mod portal;
    pub mod webhook;
}

mod services {
    pub(crate) mod checkout;
    pub(crate) mod webhook;
}

mod dtos {
    pub(crate) mod billing;
}

pub fn mount(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::checkout::post_checkout_session)
        .service(routes::portal::post_portal_session)
        .service(routes::webhook::post_webhook);
}
