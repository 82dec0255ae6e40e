use crate::api::{ApiClient, ApiError, ApiRequest, endpoints};
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

impl ApiClient {
    /// Create a parent account.
    ///
    /// Sent without refresh handling: a rejected registration is an error,
    /// never a session problem.
    pub async fn register(&self, data: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let request = ApiRequest::post(endpoints::AUTH_REGISTER).with_json(data)?;
        let resp: RegisterResponse = self.attempt(&request, None).await?;
        tracing::info!("Registered parent account {}", resp.parent.email);
        Ok(resp)
    }

    /// Sign in and replace the stored session with the issued tokens.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let request = ApiRequest::post(endpoints::AUTH_LOGIN).with_json(credentials)?;
        let resp: LoginResponse = self.attempt(&request, None).await?;

        let user = serde_json::to_value(&resp.data.user)?;
        self.session().set_session(
            resp.data.access_token.as_str(),
            resp.data.refresh_token.as_str(),
            Some(user),
        );

        tracing::info!("Logged in as {}", resp.data.user.email);
        Ok(resp)
    }

    /// Drop the session. The backend keeps no logout state.
    pub fn logout(&self) {
        self.session().clear();
        tracing::info!("Logged out");
    }
}
