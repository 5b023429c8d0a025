//! The remote survey service over HTTP.
//!
//! Three POST endpoints. The response body is interpreted whatever the HTTP
//! status; a body that is not JSON counts as a transport failure.

use anyhow::Context;
use async_trait::async_trait;
use minitest_types::{
    AnswerSubmission, ClientError, Question, RemoteCall, Survey, SurveyId, SurveyService,
};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{ClientConfig, EndpointConfig};

/// A [`SurveyService`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpSurveyService {
    client: Client,
    redeem_url: String,
    questions_url: String,
    answer_url: String,
}

#[derive(Debug, Deserialize)]
struct RedeemResponse {
    #[serde(default)]
    survey: Option<Survey>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    questions: Option<serde_json::Value>,
}

impl StatusResponse {
    fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    fn failure_reason(&self) -> String {
        match (&self.error, &self.status) {
            (Some(serde_json::Value::String(error)), _) => error.clone(),
            (Some(error), _) => error.to_string(),
            (None, Some(status)) => format!("status {status}"),
            (None, None) => "unexpected response format".to_string(),
        }
    }
}

impl HttpSurveyService {
    /// Build a service from configuration.
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self::with_client(client, &config.endpoints))
    }

    /// Use an existing client.
    pub fn with_client(client: Client, endpoints: &EndpointConfig) -> Self {
        Self {
            client,
            redeem_url: endpoints.redeem_url(),
            questions_url: endpoints.questions_url(),
            answer_url: endpoints.answer_url(),
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        call: RemoteCall,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::network(call, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::network(call, e))?;
        debug!(call = call.as_str(), %status, bytes = body.len(), "response received");

        serde_json::from_str(&body).map_err(|e| {
            ClientError::network(call, format!("HTTP {status}, undecodable body: {e}"))
        })
    }
}

#[async_trait]
impl SurveyService for HttpSurveyService {
    async fn redeem_code(&self, code: &str) -> Result<Survey, ClientError> {
        let call = RemoteCall::RedeemCode;
        let request = self
            .client
            .post(&self.redeem_url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(format!("token={}", urlencoding::encode(code)));

        let response: RedeemResponse = self.send(call, request).await?;
        match response {
            RedeemResponse {
                error: Some(error), ..
            } if !error.is_empty() => Err(ClientError::InvalidCode(error)),
            RedeemResponse {
                survey: Some(survey),
                ..
            } => Ok(survey),
            _ => Err(ClientError::network(call, "response has neither survey nor error")),
        }
    }

    async fn list_questions(&self, survey_id: SurveyId) -> Result<Vec<Question>, ClientError> {
        let request = self
            .client
            .post(&self.questions_url)
            .json(&serde_json::json!({ "survey_id": survey_id }));

        let response: StatusResponse = self.send(RemoteCall::ListQuestions, request).await?;
        if !response.is_success() {
            return Err(ClientError::SurveyFetchFailed {
                reason: response.failure_reason(),
            });
        }
        match response.questions {
            Some(serde_json::Value::Array(items)) => {
                serde_json::from_value(serde_json::Value::Array(items)).map_err(|e| {
                    ClientError::SurveyFetchFailed {
                        reason: format!("malformed question list: {e}"),
                    }
                })
            }
            _ => Err(ClientError::SurveyFetchFailed {
                reason: "questions is missing or not a list".to_string(),
            }),
        }
    }

    async fn submit_answer(&self, submission: &AnswerSubmission) -> Result<(), ClientError> {
        let request = self.client.post(&self.answer_url).json(submission);

        let response: StatusResponse = self.send(RemoteCall::SubmitAnswer, request).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(ClientError::SubmitFailed {
                reason: response.failure_reason(),
            })
        }
    }
}
