use crate::auth_client::AuthenticatedHttpClient;
use crate::error::Result;
use crate::request::ApiRequest;
use crate::token_store::SessionStore;
use crate::transport::Transport;
use crate::types::{Admin, MessageResponse, RegisterAdminBody, UpdateAdminBody};
use serde_json::Value;

impl<S: SessionStore, T: Transport> AuthenticatedHttpClient<S, T> {
    /// Register a new admin; the API emails them a define-password link
    pub async fn register_admin(&self, body: &RegisterAdminBody) -> Result<MessageResponse> {
        let request = ApiRequest::post("/auth/register").json(body)?;
        self.call(&request).await
    }

    /// List all admins
    pub async fn get_admins(&self) -> Result<Vec<Admin>> {
        self.call(&ApiRequest::get("/admins")).await
    }

    /// Fetch one admin by id
    pub async fn get_admin_by_id(&self, id: &str) -> Result<Admin> {
        self.call(&ApiRequest::get(format!("/admins/{id}"))).await
    }

    /// Update an admin's name or email
    pub async fn update_admin(&self, id: &str, body: &UpdateAdminBody) -> Result<MessageResponse> {
        let request = ApiRequest::put(format!("/admins/{id}")).json(body)?;
        self.call(&request).await
    }

    /// Delete an admin. The API answers with an arbitrary JSON body.
    pub async fn remove_admin(&self, id: &str) -> Result<Value> {
        self.call(&ApiRequest::delete(format!("/admins/{id}"))).await
    }
}
