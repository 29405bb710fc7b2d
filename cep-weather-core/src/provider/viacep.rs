use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};

use crate::{Cep, TraceContext, provider::truncate_body};

use super::CityResolver;

/// Default ViaCEP endpoint; `{cep}` is replaced with the 8-digit code.
pub const DEFAULT_URL_TEMPLATE: &str = "https://viacep.com.br/ws/{cep}/json/";

/// City resolver backed by the ViaCEP JSON API.
#[derive(Debug, Clone)]
pub struct ViaCepResolver {
    url_template: String,
    http: Client,
}

impl ViaCepResolver {
    pub fn new(url_template: String, http: Client) -> Self {
        Self { url_template, http }
    }

    fn url_for(&self, cep: &Cep) -> String {
        self.url_template.replace("{cep}", cep.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct VcResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default, deserialize_with = "lenient_flag")]
    erro: bool,
}

// ViaCEP has reported the error flag both as `true` and as `"true"`.
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => flag,
        Flag::Text(text) => text.eq_ignore_ascii_case("true"),
    })
}

#[async_trait]
impl CityResolver for ViaCepResolver {
    async fn resolve_city(&self, cx: &TraceContext, cep: &Cep) -> Result<String> {
        let url = self.url_for(cep);
        tracing::info!(%url, "querying city resolver");

        let res = self
            .http
            .get(&url)
            .headers(cx.headers())
            .send()
            .await
            .context("Failed to send request to ViaCEP")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read ViaCEP response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "ViaCEP request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: VcResponse =
            serde_json::from_str(&body).context("Failed to parse ViaCEP JSON")?;

        if parsed.erro {
            return Err(anyhow!("ViaCEP reported CEP {cep} as unknown"));
        }

        if parsed.localidade.trim().is_empty() {
            return Err(anyhow!("ViaCEP returned no city for CEP {cep}"));
        }

        Ok(parsed.localidade)
    }
}
