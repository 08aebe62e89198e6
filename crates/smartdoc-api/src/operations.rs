//! Typed operations against the SmartDoc backend.
//!
//! One method per logical backend operation. Operations with both a legacy
//! and a versioned route go through [`try_v1_then_legacy`]; the auth pair
//! exists only on the versioned API and never falls back.

use reqwest::Method;
use smartdoc_core::session::ConversationChannel;

use crate::client::{ApiClient, try_v1_then_legacy};
use crate::error::ApiResult;
use crate::types::{
    ChatRequest, ChatResponse, DiagnosisRequest, EvaluationResponse, HealthResponse, LoginRequest,
    LoginResponse, ReflectionSubmission,
};

impl ApiClient {
    /// Health check, always at the legacy root.
    pub async fn health_check(&self) -> ApiResult<HealthResponse> {
        let url = self.endpoints().legacy_url("/health");
        self.request(Method::GET, &url, None::<&()>).await
    }

    /// Sends one chat turn on the given conversation channel.
    pub async fn send_chat(
        &self,
        message: &str,
        channel: ConversationChannel,
        session_id: &str,
    ) -> ApiResult<ChatResponse> {
        let request = ChatRequest {
            message: message.to_string(),
            context: channel.as_label().to_string(),
            session_id: session_id.to_string(),
        };
        let v1_url = self.endpoints().v1_url("/chat");
        let legacy_url = self.endpoints().legacy_url("/get_bot_response");
        try_v1_then_legacy(
            "chat",
            self.endpoints().prefer_v1,
            || self.request(Method::POST, &v1_url, Some(&request)),
            || self.request(Method::POST, &legacy_url, Some(&request)),
        )
        .await
    }

    /// Submits a diagnosis without reflection.
    pub async fn submit_diagnosis(
        &self,
        request: &DiagnosisRequest,
    ) -> ApiResult<serde_json::Value> {
        let v1_url = self.endpoints().v1_url("/diagnosis");
        let legacy_url = self.endpoints().legacy_url("/submit_diagnosis");
        try_v1_then_legacy(
            "diagnosis",
            self.endpoints().prefer_v1,
            || self.request(Method::POST, &v1_url, Some(request)),
            || self.request(Method::POST, &legacy_url, Some(request)),
        )
        .await
    }

    /// Submits the diagnosis plus metacognitive reflection for evaluation.
    pub async fn submit_diagnosis_with_reflection(
        &self,
        submission: &ReflectionSubmission,
    ) -> ApiResult<EvaluationResponse> {
        let v1_url = self.endpoints().v1_url("/evaluation/submit");
        let legacy_url = self
            .endpoints()
            .legacy_url("/submit_diagnosis_with_reflection");
        try_v1_then_legacy(
            "evaluation",
            self.endpoints().prefer_v1,
            || self.request(Method::POST, &v1_url, Some(submission)),
            || self.request(Method::POST, &legacy_url, Some(submission)),
        )
        .await
    }

    /// Exchanges an access code for a bearer token. Versioned API only.
    pub async fn login(&self, code: &str) -> ApiResult<LoginResponse> {
        let url = self.endpoints().v1_url("/auth/login");
        let request = LoginRequest {
            code: code.to_string(),
        };
        self.request(Method::POST, &url, Some(&request)).await
    }

    /// Invalidates the current bearer token. Versioned API only.
    pub async fn logout(&self) -> ApiResult<serde_json::Value> {
        let url = self.endpoints().v1_url("/auth/logout");
        self.request(Method::POST, &url, None::<&()>).await
    }
}
