//! Receipt and document extraction.
//!
//! Sends a receipt image to a multimodal model with a fixed prompt and reads
//! back a best-effort expense record. The model's reply is free text; the
//! first `{ ... }` span in it is parsed as JSON and anything unparseable
//! becomes the all-empty record. There are no retries.

use crate::config::ExtractionEndpoint;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

/// Mime type assumed when the caller does not give one.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

const EXTRACTION_PROMPT: &str = "Analyze this receipt or document image and extract expense information.
Return a JSON object with the following fields:
- date: The date of the transaction in YYYY-MM-DD format (extract from the receipt)
- amount: The total amount paid as a string (just the number, no currency symbol)
- vendor: The name of the business/vendor
- description: A brief description of what was purchased
- gallons: If this is a fuel receipt, the number of gallons purchased
- pricePerGallon: If this is a fuel receipt, the price per gallon
- miles: If this is a mileage log or odometer reading, the miles driven
- expenseType: One of \"fuel\", \"maintenance\", \"food\", or \"mileage\" based on the document type

If a field cannot be determined from the image, set it to null.
Only respond with valid JSON, no additional text.";

/// Extraction errors.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No image data was supplied.
    #[error("Image data is required")]
    MissingImage,

    /// Image data is not valid base64.
    #[error("Image data is not valid base64")]
    InvalidImage,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Invalid response from the API.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// The response pattern failed to compile.
    #[error("Response pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl ExtractionError {
    /// Whether the caller sent bad input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExtractionError::MissingImage | ExtractionError::InvalidImage)
    }
}

/// Kind of expense a document describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseType {
    Fuel,
    Maintenance,
    Food,
    Mileage,
}

impl ExpenseType {
    /// Parse expense type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fuel" => Some(ExpenseType::Fuel),
            "maintenance" => Some(ExpenseType::Maintenance),
            "food" => Some(ExpenseType::Food),
            "mileage" => Some(ExpenseType::Mileage),
            _ => None,
        }
    }
}

/// Fields read off a receipt. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedExpense {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vendor: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gallons: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub price_per_gallon: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub miles: Option<String>,
    #[serde(default, deserialize_with = "lenient_expense_type")]
    pub expense_type: Option<ExpenseType>,
}

impl ExtractedExpense {
    /// Whether nothing was extracted.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// Models answer numbers as numbers even when asked for strings.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_expense_type<'de, D>(deserializer: D) -> Result<Option<ExpenseType>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| v.as_str()).and_then(ExpenseType::parse))
}

/// An extraction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRequest {
    /// Base64 image bytes, without a data URL prefix.
    #[serde(default)]
    pub image_base64: String,

    /// Image mime type.
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// What the model returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutcome {
    /// Parsed fields, all-empty when the reply could not be parsed.
    pub extracted: ExtractedExpense,

    /// Model reply as received.
    pub raw_response: String,
}

/// Pulls the JSON object out of a model reply.
#[derive(Debug, Clone)]
pub struct ResponseParser {
    json_span: Regex,
}

impl ResponseParser {
    /// Compile the parser.
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            json_span: Regex::new(r"\{[\s\S]*\}")?,
        })
    }

    /// Parse a reply, or `None` when it holds no usable object.
    pub fn parse(&self, text: &str) -> Option<ExtractedExpense> {
        let span = self.json_span.find(text)?;
        serde_json::from_str(span.as_str()).ok()
    }

    /// Parse a reply, falling back to the all-empty record.
    pub fn parse_or_empty(&self, text: &str) -> ExtractedExpense {
        self.parse(text).unwrap_or_else(|| {
            error!(response = %text, "Failed to parse extraction response");
            ExtractedExpense::default()
        })
    }
}

/// Document extraction client.
#[derive(Clone)]
pub struct ExtractionClient {
    /// HTTP client instance.
    client: Client,

    /// Model endpoint.
    endpoint: ExtractionEndpoint,

    parser: ResponseParser,
}

impl ExtractionClient {
    /// Create a new extraction client.
    pub fn new(endpoint: ExtractionEndpoint, timeout: Duration) -> Result<Self, ExtractionError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            parser: ResponseParser::new()?,
        })
    }

    /// Model name requests go to.
    pub fn model(&self) -> &str {
        &self.endpoint.model
    }

    /// Extract expense fields from a receipt image.
    #[instrument(skip(self, request), fields(model = %self.endpoint.model))]
    pub async fn extract(&self, request: ExtractionRequest) -> Result<ExtractionOutcome, ExtractionError> {
        let image = request.image_base64.trim();
        if image.is_empty() {
            return Err(ExtractionError::MissingImage);
        }
        if STANDARD.decode(image).is_err() {
            return Err(ExtractionError::InvalidImage);
        }

        let mime_type = request
            .mime_type
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE);
        debug!(mime_type, bytes = image.len(), "Sending document for extraction");

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text { text: EXTRACTION_PROMPT },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type,
                            data: image,
                        },
                    },
                ],
            }],
        };

        let url = self.endpoint.generate_content_url();
        let mut http = self.client.post(&url).json(&body);
        if let Some(ref api_key) = self.endpoint.api_key {
            http = http.header("x-goog-api-key", api_key);
        }

        let response = http.send().await?;
        let reply: GenerateContentResponse = self.handle_response(response).await?;
        let raw_response = reply.text();

        Ok(ExtractionOutcome {
            extracted: self.parser.parse_or_empty(&raw_response),
            raw_response,
        })
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T>(&self, response: reqwest::Response) -> Result<T, ExtractionError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Extraction API error ({}): {}", status.as_u16(), message);
            return Err(ExtractionError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ExtractionError::InvalidResponse(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}
