// src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{
  auth_handlers, cart_handlers, checkout_handlers, invoice_handlers, order_handlers, product_handlers,
  report_handlers, review_handlers, wishlist_handlers,
};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called from `main.rs` (and the integration tests) to configure the app.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      // Authentication
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler))
          .route("/logout", web::post().to(auth_handlers::logout_handler))
          .route("/me", web::get().to(auth_handlers::me_handler)),
      )
      // Catalog
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("", web::post().to(product_handlers::create_product_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
          .route("/{product_id}", web::put().to(product_handlers::update_product_handler))
          .route(
            "/{product_id}",
            web::delete().to(product_handlers::delete_product_handler),
          )
          .route(
            "/{product_id}/reviews",
            web::get().to(product_handlers::product_reviews_handler),
          )
          .route(
            "/{product_id}/reviews",
            web::post().to(review_handlers::create_review_handler),
          ),
      )
      // Cart
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::view_cart_handler))
          .route("/add", web::post().to(cart_handlers::add_to_cart_handler))
          .route(
            "/{product_id}",
            web::delete().to(cart_handlers::remove_from_cart_handler),
          ),
      )
      // Checkout
      .service(web::scope("/checkout").route("", web::post().to(checkout_handlers::checkout_handler)))
      // Orders & invoices
      .service(
        web::scope("/orders")
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler)),
      )
      .service(
        web::scope("/invoices")
          .route("", web::get().to(invoice_handlers::list_invoices_handler))
          .route("/{invoice_id}", web::get().to(invoice_handlers::get_invoice_handler)),
      )
      // Reviews
      .service(
        web::scope("/reviews")
          .route("", web::get().to(review_handlers::list_my_reviews_handler))
          .route("/{review_id}", web::put().to(review_handlers::update_review_handler))
          .route("/{review_id}", web::delete().to(review_handlers::delete_review_handler)),
      )
      // Reports
      .service(
        web::scope("/reports")
          .route("", web::get().to(report_handlers::list_reports_handler))
          .route("", web::post().to(report_handlers::create_report_handler))
          .route("/{report_id}", web::get().to(report_handlers::get_report_handler))
          .route("/{report_id}", web::put().to(report_handlers::update_report_handler))
          .route("/{report_id}", web::delete().to(report_handlers::delete_report_handler)),
      )
      // Wishlist
      .service(
        web::scope("/wishlist")
          .route("", web::get().to(wishlist_handlers::list_wishlist_handler))
          .route(
            "/add/{product_id}",
            web::post().to(wishlist_handlers::add_to_wishlist_handler),
          )
          .route(
            "/toggle/{product_id}",
            web::post().to(wishlist_handlers::toggle_wishlist_handler),
          )
          .route(
            "/{wishlist_id}",
            web::delete().to(wishlist_handlers::remove_from_wishlist_handler),
          ),
      ),
  );
}
