use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Address parts a postal-code lookup can fill in.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostalAddress {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

/// Resolve a Brazilian postal code (CEP) to an address.
///
/// `None` covers both an unknown code and a failed request; callers only
/// learn that there is nothing to fill in.
#[async_trait]
pub trait PostalCodeLookup: Send + Sync {
    async fn lookup(&self, zip_code: &str) -> Option<PostalAddress>;
}

/// Strip everything but digits; a CEP has exactly eight.
#[must_use]
pub fn normalize_postal_code(input: &str) -> Option<String> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    (digits.len() == 8).then_some(digits)
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    // `true` or `"true"` depending on the API revision.
    #[serde(default)]
    erro: Option<Value>,
}

impl ViaCepResponse {
    fn into_address(self) -> Option<PostalAddress> {
        match self.erro {
            None | Some(Value::Bool(false)) => Some(PostalAddress {
                street: self.logradouro,
                neighborhood: self.bairro,
                city: self.localidade,
                state: self.uf,
            }),
            Some(_) => None,
        }
    }
}

/// Lookup backed by the public ViaCEP web service.
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ViaCepError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        Ok(Self { client, base_url })
    }

    fn url_for(&self, zip_code: &str) -> String {
        format!("{}{zip_code}/json/", self.base_url)
    }

    /// Fetch the address for a code, keeping transport failures apart from
    /// unknown codes.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response is not JSON.
    pub async fn fetch(&self, zip_code: &str) -> Result<Option<PostalAddress>, ViaCepError> {
        let Some(zip_code) = normalize_postal_code(zip_code) else {
            return Ok(None);
        };

        let response = self
            .client
            .get(self.url_for(&zip_code))
            .send()
            .await?
            .error_for_status()?;
        let body: ViaCepResponse = response.json().await?;
        Ok(body.into_address())
    }
}

#[async_trait]
impl PostalCodeLookup for ViaCepClient {
    async fn lookup(&self, zip_code: &str) -> Option<PostalAddress> {
        match self.fetch(zip_code).await {
            Ok(address) => {
                if address.is_none() {
                    tracing::debug!("No address found for postal code {zip_code}");
                }
                address
            }
            Err(e) => {
                tracing::warn!("Postal code lookup for {zip_code} failed: {e}");
                None
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ViaCepError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
