use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use tracing::error;
use shared::error::VoteError;

/// HTTP face of `VoteError`: client errors are 400, storage faults 500, and
/// every body is `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub VoteError);

impl From<VoteError> for ApiError {
    fn from(err: VoteError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self.0 {
            VoteError::InvalidRequest => Status::BadRequest,
            VoteError::InvalidVoteId => Status::BadRequest,
            VoteError::Storage(_) => Status::InternalServerError,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        if status == Status::InternalServerError {
            error!("{} {} failed: {}", req.method(), req.uri(), self.0);
        }

        rocket::Response::build_from(Json(self.0.detail()).respond_to(req)?)
            .status(status)
            .ok()
    }
}
