//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::PipelineError;
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use crate::schema;
use chrono::NaiveDate;
use rapport_domain::traits::LlmProvider;
use rapport_domain::ExtractedRecord;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info};

/// The Extractor turns free text into a validated batch of records
///
/// Each call makes at most one request to the text service and never
/// retries; retry policy belongs to the caller.
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    prompt_builder: PromptBuilder,
    config: ExtractorConfig,
    response_schema: String,
}

impl<L> Extractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self {
            llm_provider: Arc::new(llm_provider),
            prompt_builder: PromptBuilder::new(),
            config,
            response_schema: schema::response_schema().to_string(),
        }
    }

    /// Anchor birth-date estimates on `date`
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.prompt_builder = self.prompt_builder.with_reference_date(date);
        self
    }

    /// The prompt that `extract` would send for `text`
    pub fn prompt_for(&self, text: &str) -> String {
        self.prompt_builder.build(text)
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract records from text
    ///
    /// Blank text yields an empty batch without calling the service. Text
    /// with no identifiable person also yields an empty batch, as decided by
    /// the service.
    pub async fn extract(&self, text: &str) -> Result<Vec<ExtractedRecord>, PipelineError> {
        if text.trim().is_empty() {
            debug!("Blank input, skipping extraction");
            return Ok(Vec::new());
        }

        let length = text.chars().count();
        if length > self.config.max_text_length {
            return Err(PipelineError::ExtractionFailure(format!(
                "Text too long: {} chars (max: {})",
                length, self.config.max_text_length
            )));
        }

        info!("Starting extraction, text length {}", length);

        let prompt = self.prompt_builder.build(text);
        debug!("Prompt length: {} chars", prompt.len());

        let response = timeout(self.config.extraction_timeout(), self.call_llm(prompt))
            .await
            .map_err(|_| {
                PipelineError::ExtractionFailure(format!(
                    "Extraction timed out after {}s",
                    self.config.extraction_timeout_secs
                ))
            })??;

        debug!("LLM response length: {} chars", response.len());

        let records = parse_response(&response)?;

        info!("Extracted {} records", records.len());
        Ok(records)
    }

    /// Call the LLM provider
    async fn call_llm(&self, prompt: String) -> Result<String, PipelineError> {
        let llm = Arc::clone(&self.llm_provider);
        let schema = self.response_schema.clone();

        // Call in a blocking context since LlmProvider is not async
        tokio::task::spawn_blocking(move || {
            llm.generate_structured(&prompt, &schema)
                .map_err(|e| PipelineError::ExtractionFailure(e.to_string()))
        })
        .await
        .map_err(|e| PipelineError::ExtractionFailure(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapport_domain::Gender;
    use rapport_llm::{LlmError, MockProvider};
    use std::time::Duration;

    const ONE_PERSON: &str = r#"[{
        "name": "张三", "gender": "male", "birth_date": "1996-01-01",
        "company": "Acme", "title": "Engineer", "phone": "13900000000", "wechat": null
    }]"#;

    fn create_test_extractor(response: &str) -> (MockProvider, Extractor<MockProvider>) {
        let llm = MockProvider::new(response);
        let extractor = Extractor::new(llm.clone(), ExtractorConfig::default());
        (llm, extractor)
    }

    #[tokio::test]
    async fn test_extract_single_record() {
        let (llm, extractor) = create_test_extractor(ONE_PERSON);

        let records = extractor.extract("张三, male, about 30").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "张三");
        assert_eq!(records[0].gender, Gender::Male);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_extract_sends_schema_and_prompt() {
        let (llm, extractor) = create_test_extractor("[]");

        extractor.extract("Alice is a nurse").await.unwrap();

        let schema: serde_json::Value =
            serde_json::from_str(&llm.last_schema().unwrap()).unwrap();
        assert_eq!(schema, schema::response_schema());
        assert_eq!(
            llm.last_prompt().unwrap(),
            extractor.prompt_for("Alice is a nurse")
        );
    }

    #[tokio::test]
    async fn test_extract_empty_response() {
        let (_llm, extractor) = create_test_extractor("[]");
        let records = extractor.extract("The weather is nice.").await.unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_blank_input_skips_service() {
        let (llm, extractor) = create_test_extractor(ONE_PERSON);

        assert!(tokio_test::block_on(extractor.extract("")).unwrap().is_empty());
        assert!(tokio_test::block_on(extractor.extract("  \n\t")).unwrap().is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extract_text_too_long() {
        let llm = MockProvider::new("[]");
        let config = ExtractorConfig {
            max_text_length: 10,
            ..Default::default()
        };
        let extractor = Extractor::new(llm.clone(), config);

        let result = extractor.extract(&"a".repeat(11)).await;
        assert!(matches!(result, Err(PipelineError::ExtractionFailure(_))));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_length_counts_characters() {
        let config = ExtractorConfig {
            max_text_length: 4,
            ..Default::default()
        };
        let extractor = Extractor::new(MockProvider::new("[]"), config);

        // Four characters, twelve bytes
        assert!(extractor.extract("张三李四").await.is_ok());
    }

    #[tokio::test]
    async fn test_service_failure() {
        let llm = MockProvider::failing(LlmError::Communication("connection refused".into()));
        let extractor = Extractor::new(llm, ExtractorConfig::default());

        match extractor.extract("Alice").await {
            Err(PipelineError::ExtractionFailure(msg)) => {
                assert!(msg.contains("connection refused"));
            }
            other => panic!("Expected ExtractionFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_schema_violation_carries_payload() {
        let payload = r#"[{"gender": "male", "birth_date": "1990-01-01"}]"#;
        let (_llm, extractor) = create_test_extractor(payload);

        let error = extractor.extract("someone").await.unwrap_err();
        assert!(matches!(error, PipelineError::SchemaViolation { .. }));
        assert_eq!(error.payload(), Some(payload));
    }

    struct SlowProvider;

    impl LlmProvider for SlowProvider {
        type Error = LlmError;

        fn generate(&self, _prompt: &str) -> Result<String, Self::Error> {
            std::thread::sleep(Duration::from_millis(1500));
            Ok("[]".to_string())
        }

        fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
            self.generate(prompt)
        }
    }

    #[tokio::test]
    async fn test_extract_timeout() {
        let config = ExtractorConfig {
            extraction_timeout_secs: 1,
            ..Default::default()
        };
        let extractor = Extractor::new(SlowProvider, config);

        match extractor.extract("Alice").await {
            Err(PipelineError::ExtractionFailure(msg)) => assert!(msg.contains("timed out")),
            other => panic!("Expected timeout, got {:?}", other),
        }
    }
}
