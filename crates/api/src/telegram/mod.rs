mod commands;
mod receive_update;

use actix_web::web;
use receive_update::receive_update_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/telegram/webhook",
        web::post().to(receive_update_controller),
    );
}
