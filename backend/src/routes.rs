use std::sync::Arc;
use futures::{SinkExt, StreamExt};
use rocket::{State, get, post, serde::json::{self, Json}};
use rocket_ws::{Channel, Message, WebSocket};
use tracing::{debug, info, instrument};
use shared::models::{CastVoteRequest, VoteOption};
use crate::{error::ApiError, service::VoteService};

#[get("/votes")]
pub async fn list_votes(service: &State<VoteService>) -> Result<Json<Vec<VoteOption>>, ApiError> {
    Ok(Json(service.get_votes().await?))
}

#[instrument(skip(service, request))]
#[post("/votes/cast", data = "<request>")]
pub async fn cast_vote(
    service: &State<VoteService>,
    request: Result<Json<CastVoteRequest>, json::Error<'_>>,
) -> Result<Json<VoteOption>, ApiError> {
    // a body that does not parse is treated like one with missing fields
    let request = match request {
        Ok(request) => request.into_inner(),
        Err(e) => {
            debug!("Rejected cast body: {}", e);
            CastVoteRequest::default()
        }
    };

    let option = service.cast_vote(request.name.as_deref(), request.id).await?;
    Ok(Json(option))
}

/// Live update channel. Inbound frames are read only to notice the client
/// going away.
///
/// Nothing is sent on connect; clients fetch `GET /api/votes/` for the
/// current tallies and then apply each `update` frame as it arrives.
#[get("/ws")]
pub fn live_updates(ws: WebSocket, service: &State<VoteService>) -> Channel<'static> {
    let registry = Arc::clone(service.registry());

    ws.channel(move |stream| Box::pin(async move {
        let (connection, mut outbound) = registry.open();
        let id = connection.id();
        registry.register(connection).await;
        info!(connection = %id, "Live client connected");

        let (mut sink, mut inbound) = stream.split();
        loop {
            tokio::select! {
                update = outbound.recv() => match update {
                    Some(text) => {
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            debug!(connection = %id, error = %e, "Send failed");
                            break;
                        }
                    }
                    // dropped by the registry after a failed delivery
                    None => break,
                },
                frame = inbound.next() => match frame {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!(connection = %id, error = %e, "Receive failed");
                        break;
                    }
                },
            }
        }

        registry.unregister(id).await;
        info!(connection = %id, "Live client disconnected");
        Ok(())
    }))
}
