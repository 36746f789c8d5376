use crate::auth_client::AuthenticatedHttpClient;
use crate::error::{ClientError, Result};
use crate::request::ApiRequest;
use crate::schedule::parse_event_time;
use crate::token_store::SessionStore;
use crate::transport::Transport;
use crate::types::{CreateEventBody, Event, MessageResponse, UpdateEventBody};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// Parse an event date and render it as a UTC instant (`2099-05-01T22:00:00.000Z`)
fn normalize_date_time(value: &str) -> Result<(DateTime<FixedOffset>, String)> {
    let at = parse_event_time(value)
        .ok_or_else(|| ClientError::Validation(format!("Invalid event date {value:?}")))?;
    let utc = at
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    Ok((at, utc))
}

impl<S: SessionStore, T: Transport> AuthenticatedHttpClient<S, T> {
    /// List all events
    pub async fn get_events(&self) -> Result<Vec<Event>> {
        self.call(&ApiRequest::get("/events")).await
    }

    /// Get one event by id
    pub async fn get_event(&self, id: &str) -> Result<Event> {
        self.call(&ApiRequest::get(format!("/events/{id}"))).await
    }

    /// Next upcoming event, if any
    pub async fn get_next_event(&self) -> Result<Option<Event>> {
        self.call(&ApiRequest::get("/events/next")).await
    }

    /// Create an event; events can't be scheduled in the past
    ///
    /// `date_time` is sent as a UTC instant, so a bare local form value is
    /// read as São Paulo time first.
    pub async fn create_event(&self, body: &CreateEventBody) -> Result<Event> {
        let (at, date_time) = normalize_date_time(&body.date_time)?;
        if at <= Utc::now() {
            return Err(ClientError::Validation(
                "Events can't be scheduled in the past".to_string(),
            ));
        }

        let body = CreateEventBody {
            date_time,
            ..body.clone()
        };
        let request = ApiRequest::post("/events").json(&body)?;
        self.call(&request).await
    }

    /// Update an event; a new `date_time` is normalized like in `create_event`
    pub async fn update_event(&self, id: &str, body: &UpdateEventBody) -> Result<Event> {
        let mut body = body.clone();
        if let Some(value) = &body.date_time {
            let (_, date_time) = normalize_date_time(value)?;
            body.date_time = Some(date_time);
        }

        let request = ApiRequest::put(format!("/events/{id}")).json(&body)?;
        self.call(&request).await
    }

    /// Delete an event
    pub async fn remove_event(&self, id: &str) -> Result<MessageResponse> {
        self.call(&ApiRequest::delete(format!("/events/{id}"))).await
    }
}
