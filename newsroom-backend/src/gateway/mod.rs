pub mod actix_ws;
pub mod events;
pub mod protocol;

pub use events::EventBroadcaster;
pub use protocol::GatewayEvent;

use actix_web::web;

/// Mount the live-update socket at `/ws`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").route(web::get().to(actix_ws::ws_handler)));
}
