use crate::auth_client::AuthenticatedHttpClient;
use crate::error::Result;
use crate::request::ApiRequest;
use crate::token_store::SessionStore;
use crate::transport::Transport;
use crate::types::{
    ChangePasswordRequest, DefinePasswordRequest, ForgotPasswordRequest, LoginRequest,
    LoginResponse, MessageResponse,
};
use tracing::info;

impl<S: SessionStore, T: Transport> AuthenticatedHttpClient<S, T> {
    /// Log in and store the new session (both tokens and the admin id)
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let request = ApiRequest::post("/auth/login")
            .json(&LoginRequest { email, password })?
            .skip_auth();
        let response: LoginResponse = self.call(&request).await?;

        self.tokens()
            .set_tokens(&response.access_token, &response.refresh_token);
        self.tokens().set_admin_id(&response.admin.id);
        info!(admin_id = %response.admin.id, "Logged in");

        Ok(response)
    }

    /// Set the first password of a newly registered admin, using the emailed token
    pub async fn define_password(&self, token: &str, password: &str) -> Result<MessageResponse> {
        let request = ApiRequest::post("/admins/define-password")
            .json(&DefinePasswordRequest { token, password })?
            .skip_auth();
        self.call(&request).await
    }

    /// Change the signed-in admin's password
    pub async fn change_admin_password(
        &self,
        admin_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<MessageResponse> {
        let request = ApiRequest::post("/admins/change-password").json(&ChangePasswordRequest {
            admin_id,
            current_password,
            new_password,
        })?;
        self.call(&request).await
    }

    /// Ask the API to email a password reset link
    pub async fn forgot_admin_password(&self, email: &str) -> Result<MessageResponse> {
        let request =
            ApiRequest::post("/auth/forgot-password").json(&ForgotPasswordRequest { email })?;
        self.call(&request).await
    }
}
