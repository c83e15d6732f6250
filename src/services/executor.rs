// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote code execution through the RapidAPI online compiler.

use crate::config::Config;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Languages offered by the compiler panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Language {
    #[default]
    Cpp,
    C,
    Python,
    Java,
    Javascript,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Cpp,
        Language::C,
        Language::Python,
        Language::Java,
        Language::Javascript,
    ];

    /// Identifier sent to the executor.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Python => "python",
            Language::Java => "java",
            Language::Javascript => "javascript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| format!("Unsupported language: {}", s))
    }
}

/// Request body expected by the executor.
#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    language: &'a str,
    version: &'a str,
    code: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteResponse {
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    cpu_time: serde_json::Value,
}

/// Result of one execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub output: String,
    /// CPU time as reported by the executor, in milliseconds
    pub cpu_time: String,
}

/// HTTP client for the executor. No retries and no timeout beyond reqwest's defaults.
#[derive(Clone)]
pub struct ExecutorClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    api_host: String,
}

impl ExecutorClient {
    pub fn new(config: &Config) -> Self {
        Self::with_url(
            &config.executor_url,
            &config.rapid_api_key,
            &config.rapid_api_host,
        )
    }

    pub fn with_url(url: &str, api_key: &str, api_host: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
            api_key: api_key.to_string(),
            api_host: api_host.to_string(),
        }
    }

    pub async fn execute(
        &self,
        language: Language,
        code: &str,
        input: &str,
    ) -> Result<Execution, AppError> {
        let body = ExecuteRequest {
            language: language.as_str(),
            version: "latest",
            code,
            input,
        };

        let response = self
            .http
            .post(&self.url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Executor(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %text, "Executor request failed");
            return Err(AppError::Executor(format!(
                "Request failed with status code {}",
                status.as_u16()
            )));
        }

        let parsed: ExecuteResponse = response
            .json()
            .await
            .map_err(|e| AppError::Executor(format!("Invalid executor response: {}", e)))?;

        let cpu_time = match parsed.cpu_time {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };

        Ok(Execution {
            output: parsed.output.unwrap_or_default(),
            cpu_time,
        })
    }
}

/// One of the three panel buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffer {
    Code,
    Input,
    Output,
}

/// Compiler panel state: the Code, Input and Output buffers plus the language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerPanel {
    language: Language,
    code: String,
    input: String,
    output: String,
}

impl CompilerPanel {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch language. Returns true when it actually changed.
    pub fn set_language(&mut self, language: Language) -> bool {
        let changed = self.language != language;
        self.language = language;
        changed
    }

    pub fn buffer(&self, buffer: Buffer) -> &str {
        match buffer {
            Buffer::Code => &self.code,
            Buffer::Input => &self.input,
            Buffer::Output => &self.output,
        }
    }

    pub fn set_buffer(&mut self, buffer: Buffer, value: impl Into<String>) {
        let value = value.into();
        match buffer {
            Buffer::Code => self.code = value,
            Buffer::Input => self.input = value,
            Buffer::Output => self.output = value,
        }
    }

    /// Run the Code buffer with the Input buffer as stdin.
    ///
    /// On success the Output buffer holds the program output and the returned
    /// string is the user-facing message. An empty Code buffer is rejected
    /// without contacting the executor.
    pub async fn run(&mut self, client: &ExecutorClient) -> Result<String, AppError> {
        if self.code.is_empty() {
            return Err(AppError::BadRequest("Please enter some code".to_string()));
        }

        let execution = client
            .execute(self.language, &self.code, &self.input)
            .await?;

        tracing::debug!(
            language = %self.language,
            cpu_time = %execution.cpu_time,
            "Code executed"
        );

        self.output = execution.output;
        Ok(format!("Code ran successfully in {} ms", execution.cpu_time))
    }
}
