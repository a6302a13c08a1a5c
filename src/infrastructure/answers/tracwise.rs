#[cfg(test)]
#[path = "tracwise_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AnswerProvider;
use crate::domain::models::AnswerRequest;
use crate::domain::models::AnswerResponse;

/// The TracWise question answering service.
pub struct TracWiseApi {
    url: String,
    timeout: String,
}

impl Default for TracWiseApi {
    fn default() -> TracWiseApi {
        return TracWiseApi {
            url: Config::get(ConfigKey::AnswerURL),
            timeout: Config::get(ConfigKey::HealthCheckTimeout),
        };
    }
}

#[async_trait]
impl AnswerProvider for TracWiseApi {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("TracWise answer URL is not defined");
        }

        let res = reqwest::Client::new()
            .get(&self.url)
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "TracWise is not reachable");
                bail!("TracWise is not reachable");
            }
        };

        // The endpoint only answers POST, anything short of a server error
        // means someone is listening.
        let status = res.status().as_u16();
        if status >= 500 {
            tracing::error!(status = status, "TracWise health check failed");
            bail!("TracWise health check failed");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn ask(&self, request: &AnswerRequest) -> Result<String> {
        let res = reqwest::Client::new()
            .post(&self.url)
            .json(request)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to make question request to TracWise"
            );
            bail!("Failed to make question request to TracWise");
        }

        let body = res.json::<AnswerResponse>().await?;

        return Ok(body.answer);
    }
}
