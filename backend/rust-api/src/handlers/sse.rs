use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::{error::Error, models::event::ProgressionEvent, services::AppState};

/// SSE endpoint for progression events
/// GET /api/v1/customer-quests/{id}/stream
pub async fn progression_stream(
    State(state): State<Arc<AppState>>,
    Path(customer_quest_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    // Verify the enrollment exists before opening the stream
    state.progression.customer_quest(&customer_quest_id).await?;

    tracing::info!(
        "Client connected to progression stream: customer_quest={}",
        customer_quest_id
    );

    let receiver = state.events.subscribe();
    let stream = create_event_stream(customer_quest_id, receiver);

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Filters the broadcast feed down to one customer quest's events. Lagged
/// receivers skip ahead rather than closing the stream.
fn create_event_stream(
    customer_quest_id: String,
    receiver: broadcast::Receiver<ProgressionEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(
        (customer_quest_id, receiver),
        |(customer_quest_id, mut receiver)| async move {
            loop {
                match receiver.recv().await {
                    Ok(event) if event.customer_quest_id() == customer_quest_id => {
                        let sse_event = Event::default()
                            .event(event.event_name())
                            .data(event.to_sse_data());
                        return Some((Ok(sse_event), (customer_quest_id, receiver)));
                    }
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "progression stream for {} lagged, skipped {} events",
                            customer_quest_id,
                            skipped
                        );
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        },
    )
}
