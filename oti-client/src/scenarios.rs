//! Scenario endpoints

use crate::IndicatorsClient;
use crate::error::Result;
use oti_core::domain::scenario::Scenario;

impl IndicatorsClient {
    /// List scenarios, optionally only those created by one user
    ///
    /// # Arguments
    /// * `user_id` - Restrict to this author, or `None` for every scenario
    pub async fn list_scenarios(&self, user_id: Option<i64>) -> Result<Vec<Scenario>> {
        let url = format!("{}/api/scenarios/", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(user_id) = user_id {
            request = request.query(&[("created_by", user_id)]);
        }
        let response = request.send().await?;

        self.handle_response(response).await
    }
}
