pub mod auth;
pub mod categories;
pub mod portfolios;
pub mod profiles;
pub mod projects;
pub mod quotes;
pub mod vendors;

use actix_web::web;

use crate::cache::{CacheData, RedisCache};
use crate::services::portfolios::MAX_IMAGE_BYTES;

/// The cache is optional app data; handlers work without it.
pub(crate) fn cache_ref(cache: &Option<web::Data<CacheData>>) -> Option<&RedisCache> {
    cache.as_ref().map(|c| c.get_ref().as_ref())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Session ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── Profiles ──
    cfg.service(web::resource("/profiles/me").route(web::put().to(profiles::update_me)));
    cfg.service(web::resource("/clients/me").route(web::put().to(profiles::update_client)));

    // ── Reference data ──
    cfg.service(web::resource("/categories").route(web::get().to(categories::list_categories)));

    // ── Vendors and discovery ──
    // `/vendors/me` is registered before `/vendors/{id}` so it is matched first.
    cfg.service(
        web::scope("/vendors")
            .route("", web::get().to(vendors::discover))
            .route("/me", web::put().to(vendors::update_me))
            .route("/{id}", web::get().to(vendors::get_vendor))
            .route("/{id}/portfolios", web::get().to(vendors::get_vendor_portfolios))
            .route("/{id}/quote-requests", web::post().to(vendors::request_quote)),
    );

    // ── Portfolios ──
    cfg.service(web::resource("/portfolios").route(web::post().to(portfolios::create_portfolio)));
    cfg.service(
        web::resource("/portfolios/{id}")
            .route(web::get().to(portfolios::get_portfolio))
            .route(web::put().to(portfolios::update_portfolio))
            .route(web::delete().to(portfolios::delete_portfolio)),
    );
    cfg.service(
        web::resource("/portfolios/{id}/images")
            .app_data(web::PayloadConfig::new(MAX_IMAGE_BYTES + 1))
            .route(web::post().to(portfolios::upload_image)),
    );
    cfg.service(
        web::resource("/portfolio-images/{id}").route(web::delete().to(portfolios::delete_image)),
    );

    // ── Projects ──
    cfg.service(
        web::scope("/projects")
            .route("", web::get().to(projects::list_projects))
            .route("/{id}", web::get().to(projects::get_project))
            .route("/{id}/quote", web::put().to(projects::submit_quote))
            .route("/{id}/cancel", web::post().to(projects::cancel_project))
            .route("/{id}/complete", web::post().to(projects::complete_project)),
    );

    // ── Quotes ──
    cfg.service(
        web::scope("/quotes")
            .route("/{id}", web::get().to(quotes::get_quote))
            .route("/{id}/accept", web::post().to(quotes::accept_quote))
            .route("/{id}/payment-summary", web::get().to(quotes::payment_summary)),
    );
}
