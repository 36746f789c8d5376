use crate::auth_client::AuthenticatedHttpClient;
use crate::error::Result;
use crate::request::ApiRequest;
use crate::token_store::SessionStore;
use crate::transport::Transport;
use crate::types::{Secretariat, UpdateSecretariatBody};
use serde_json::Value;

impl<S: SessionStore, T: Transport> AuthenticatedHttpClient<S, T> {
    /// Current cash and PIX balances
    pub async fn get_secretariat(&self) -> Result<Secretariat> {
        self.call(&ApiRequest::get("/secretariat")).await
    }

    /// Record new balances. The reply shape is not fixed, so it comes back as raw JSON.
    pub async fn update_secretariat(&self, body: &UpdateSecretariatBody) -> Result<Value> {
        let request = ApiRequest::post("/secretariat").json(body)?;
        self.call(&request).await
    }
}

#[cfg(test)]
mod tests {
    use crate::format::format_money;
    use crate::test_support::*;
    use crate::types::UpdateSecretariatBody;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_secretariat_round() {
        let (client, transport) = test_client();
        client.tokens().set_tokens("a", "r");
        transport
            .on(
                Method::GET,
                "/secretariat",
                Reply::json(
                    200,
                    json!({
                        "cashValue": 1234.5,
                        "pixValue": 80,
                        "createdAt": "2025-03-02T18:00:00Z",
                        "author": { "id": "1", "name": "Ana", "email": "ana@example.org" }
                    }),
                ),
            )
            .on(Method::POST, "/secretariat", Reply::json(200, json!({ "ok": true })));

        let summary = client.get_secretariat().await.unwrap();
        assert_eq!(format_money(summary.cash_value), "R$ 1.234,50");
        assert_eq!(format_money(summary.pix_value), "R$ 80,00");
        assert_eq!(summary.author.name, "Ana");

        client
            .update_secretariat(&UpdateSecretariatBody {
                cash_value: 10.0,
                pix_value: 2.5,
            })
            .await
            .unwrap();

        let sent = transport.requests();
        assert_eq!(body_json(&sent[1]), json!({ "cashValue": 10.0, "pixValue": 2.5 }));
        assert_eq!(bearer(&sent[1]), Some("Bearer a"));
    }
}
