pub mod catchers;
pub mod config;
pub mod error;
pub mod queries;
pub mod registry;
pub mod routes;
pub mod service;
pub mod store;

pub use shared::{models::*, error::*};

use rocket::{Build, Rocket, catchers, routes};
use crate::{
    catchers::{bad_request, fallback, internal_error, not_found},
    routes::{cast_vote, list_votes, live_updates},
    service::VoteService,
};

/// Mounts the API, the live channel and the JSON catchers onto `rocket`.
pub fn app(rocket: Rocket<Build>, service: VoteService) -> Rocket<Build> {
    rocket
        .manage(service)
        .mount("/api", routes![list_votes, cast_vote])
        .mount("/", routes![live_updates])
        .register(
            "/",
            catchers![bad_request, not_found, internal_error, fallback],
        )
}
