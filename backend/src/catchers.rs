use rocket::{Request, catch, http::Status, serde::json::Json};
use shared::error::ErrorDetail;

#[catch(400)]
pub fn bad_request(_req: &Request) -> Json<ErrorDetail> {
    Json(ErrorDetail::new("Invalid data"))
}

#[catch(404)]
pub fn not_found(_req: &Request) -> Json<ErrorDetail> {
    Json(ErrorDetail::new("Not found"))
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Json<ErrorDetail> {
    Json(ErrorDetail::new("Internal server error"))
}

#[catch(default)]
pub fn fallback(status: Status, _req: &Request) -> (Status, Json<ErrorDetail>) {
    let reason = status.reason().unwrap_or("Error");
    (status, Json(ErrorDetail::new(reason)))
}
