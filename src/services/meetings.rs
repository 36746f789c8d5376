use crate::auth_client::AuthenticatedHttpClient;
use crate::error::{ClientError, Result};
use crate::request::ApiRequest;
use crate::schedule::is_valid_meeting_time;
use crate::token_store::SessionStore;
use crate::transport::Transport;
use crate::types::{CreateMeetingBody, Meeting, MessageResponse, UpdateMeetingBody};

fn check_time(time: &str) -> Result<()> {
    if is_valid_meeting_time(time) {
        Ok(())
    } else {
        Err(ClientError::Validation(format!(
            "Invalid meeting time {time:?}, expected HH:MM"
        )))
    }
}

impl<S: SessionStore, T: Transport> AuthenticatedHttpClient<S, T> {
    /// Create a meeting; `time` is checked before sending
    pub async fn create_meeting(&self, body: &CreateMeetingBody) -> Result<Meeting> {
        check_time(&body.time)?;
        let request = ApiRequest::post("/meetings").json(body)?;
        self.call(&request).await
    }

    /// List all meetings
    pub async fn get_meetings(&self) -> Result<Vec<Meeting>> {
        self.call(&ApiRequest::get("/meetings")).await
    }

    /// Fetch one meeting by id
    pub async fn get_meeting_by_id(&self, id: &str) -> Result<Meeting> {
        self.call(&ApiRequest::get(format!("/meetings/{id}"))).await
    }

    /// Update a meeting; a new `time` is checked before sending
    pub async fn update_meeting(&self, id: &str, body: &UpdateMeetingBody) -> Result<Meeting> {
        if let Some(time) = &body.time {
            check_time(time)?;
        }
        let request = ApiRequest::put(format!("/meetings/{id}")).json(body)?;
        self.call(&request).await
    }

    /// Delete a meeting
    pub async fn remove_meeting(&self, id: &str) -> Result<MessageResponse> {
        self.call(&ApiRequest::delete(format!("/meetings/{id}"))).await
    }

    /// Today's meeting, if any
    pub async fn get_today_meeting(&self) -> Result<Option<Meeting>> {
        self.call(&ApiRequest::get("/meetings/today")).await
    }
}
