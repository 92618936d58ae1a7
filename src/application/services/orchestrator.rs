use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::application::ports::{LlmInvoker, LlmInvokerError, ResultSink};
use crate::application::services::acquisition_router::{
    Acquired, AcquisitionFault, AcquisitionRouter,
};
use crate::application::services::prompt_builder::PromptBuilder;
use crate::application::services::response_parser::{normalize_object, parse_attributes};
use crate::application::services::retry::RetryPolicy;
use crate::domain::{
    AttributeSpec, DocumentRef, DocumentStage, ErrorKind, ExtractionRequest, ExtractionResult,
    FewShotExample, FileKind, ModelParams, ParsingMode,
};

/// One batch as accepted at the submission boundary: an ordered list of
/// documents plus one shared extraction configuration.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub documents: Vec<DocumentRef>,
    pub parsing_mode: ParsingMode,
    pub attributes: Vec<AttributeSpec>,
    pub instructions: Option<String>,
    pub model_params: ModelParams,
    pub few_shots: Vec<FewShotExample>,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<ExtractionResult>,
}

#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    pub max_concurrency: usize,
    pub max_attributes: usize,
    pub document_timeout: Duration,
    pub batch_deadline: Duration,
    pub retry: RetryPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 16,
            max_attributes: 50,
            document_timeout: Duration::from_secs(300),
            batch_deadline: Duration::from_secs(900),
            retry: RetryPolicy::default(),
        }
    }
}

/// Malformed batch configuration, rejected before any document is dispatched.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("attribute set is empty")]
    EmptyAttributes,
    #[error("too many attributes: {count} exceeds the maximum of {max}")]
    TooManyAttributes { count: usize, max: usize },
    #[error("duplicate attribute name: {0}")]
    DuplicateAttributeName(String),
    #[error("attribute name is not a valid identifier: {0}")]
    InvalidAttributeName(String),
    #[error("attribute has an empty description: {0}")]
    EmptyDescription(String),
}

/// Fans a batch out to per-document pipeline runs with bounded concurrency,
/// applies per-stage retry, and isolates per-document failures so the rest
/// of the batch always completes.
pub struct BatchOrchestrator {
    router: AcquisitionRouter,
    prompt_builder: PromptBuilder,
    invoker: Arc<dyn LlmInvoker>,
    sink: Arc<dyn ResultSink>,
    config: OrchestratorConfig,
}

impl BatchOrchestrator {
    pub fn new(
        router: AcquisitionRouter,
        prompt_builder: PromptBuilder,
        invoker: Arc<dyn LlmInvoker>,
        sink: Arc<dyn ResultSink>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            router,
            prompt_builder,
            invoker,
            sink,
            config,
        }
    }

    /// Run a whole batch to completion. Returns one result per submitted
    /// document, failed ones included; never aborts the batch because of a
    /// single document's permanent fault.
    pub async fn run_batch(
        self: &Arc<Self>,
        batch: BatchRequest,
    ) -> Result<BatchOutcome, ConfigurationError> {
        validate_attributes(&batch.attributes, self.config.max_attributes)?;

        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        let submitted = batch.documents.len();
        tracing::info!(
            batch_id = %batch_id,
            documents = submitted,
            parsing_mode = %batch.parsing_mode,
            model_id = %batch.model_params.model_id,
            "Batch accepted"
        );

        let requests: Vec<ExtractionRequest> = batch
            .documents
            .iter()
            .map(|document_ref| ExtractionRequest {
                document_ref: document_ref.clone(),
                file_kind: FileKind::from_document_ref(document_ref),
                parsing_mode: batch.parsing_mode,
                attributes: batch.attributes.clone(),
                instructions: batch.instructions.clone(),
                model_params: batch.model_params.clone(),
                few_shots: batch.few_shots.clone(),
            })
            .collect();

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut join_set = JoinSet::new();
        for request in requests {
            let orchestrator = Arc::clone(self);
            let semaphore = Arc::clone(&semaphore);
            let document_timeout = self.config.document_timeout;
            join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("batch semaphore is never closed");

                let document_ref = request.document_ref.clone();
                let result = match tokio::time::timeout(
                    document_timeout,
                    orchestrator.process_document(&request),
                )
                .await
                {
                    Ok(result) => result,
                    Err(_) => ExtractionResult::failed(
                        document_ref,
                        ErrorKind::InvocationError,
                        format!(
                            "document processing timed out after {}s",
                            document_timeout.as_secs()
                        ),
                        None,
                    ),
                };

                orchestrator.emit(&result).await;
                result
            });
        }

        let deadline = tokio::time::Instant::now() + self.config.batch_deadline;
        let mut results: Vec<ExtractionResult> = Vec::with_capacity(submitted);
        loop {
            match tokio::time::timeout_at(deadline, join_set.join_next()).await {
                Ok(Some(Ok(result))) => results.push(result),
                Ok(Some(Err(join_error))) => {
                    tracing::error!(batch_id = %batch_id, error = %join_error, "Pipeline task aborted");
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!(
                        batch_id = %batch_id,
                        completed = results.len(),
                        submitted,
                        "Batch deadline exceeded, cancelling remaining documents"
                    );
                    join_set.abort_all();
                    break;
                }
            }
        }

        // Liveness: every submitted document gets a terminal result, even
        // the ones cancelled by the deadline or lost to a task panic. The
        // synthesized results go through the sink like any other terminal
        // result; their tasks were aborted before they could emit.
        for result in backfill_missing_results(&batch.documents, &results) {
            self.emit(&result).await;
            results.push(result);
        }

        let failed = results.iter().filter(|r| !r.is_ok()).count();
        let finished_at = Utc::now();
        tracing::info!(
            batch_id = %batch_id,
            completed = results.len() - failed,
            failed,
            "Batch finished"
        );

        Ok(BatchOutcome {
            batch_id,
            started_at,
            finished_at,
            results,
        })
    }

    /// One document's pipeline: Pending -> Acquiring -> Prompting ->
    /// Invoking -> Parsing -> Completed | Failed. The automation path is the
    /// single early exit, straight from Acquiring to a terminal state.
    async fn process_document(&self, request: &ExtractionRequest) -> ExtractionResult {
        let document_ref = request.document_ref.clone();
        let mut stage = DocumentStage::Pending;

        self.transition(&document_ref, &mut stage, DocumentStage::Acquiring);
        let acquired = self
            .config
            .retry
            .run("acquiring", AcquisitionFault::is_transient, || {
                self.router.acquire(request)
            })
            .await;
        let content = match acquired {
            Ok(Acquired::Extracted(attributes)) => {
                let attributes = normalize_object(attributes, &request.attributes);
                self.transition(&document_ref, &mut stage, DocumentStage::Completed);
                return ExtractionResult::completed(document_ref, attributes);
            }
            Ok(Acquired::Content(content)) => content,
            Err(fault) => {
                self.transition(&document_ref, &mut stage, DocumentStage::Failed);
                return ExtractionResult::failed(
                    document_ref,
                    ErrorKind::AcquisitionError,
                    fault.to_string(),
                    None,
                );
            }
        };

        self.transition(&document_ref, &mut stage, DocumentStage::Prompting);
        let prompt = self.prompt_builder.build(request, &content);

        self.transition(&document_ref, &mut stage, DocumentStage::Invoking);
        let response = self
            .config
            .retry
            .run("invoking", LlmInvokerError::is_transient, || {
                self.invoker.invoke(&prompt, &request.model_params)
            })
            .await;
        let response = match response {
            Ok(response) => response,
            Err(error) => {
                let kind = match &error {
                    LlmInvokerError::UnsupportedModel(_) => ErrorKind::UnsupportedModel,
                    _ => ErrorKind::InvocationError,
                };
                self.transition(&document_ref, &mut stage, DocumentStage::Failed);
                return ExtractionResult::failed(document_ref, kind, error.to_string(), None);
            }
        };
        if let Some(usage) = response.token_usage {
            tracing::debug!(
                document_ref = %document_ref,
                input_tokens = usage.input,
                output_tokens = usage.output,
                "Model invocation complete"
            );
        }

        self.transition(&document_ref, &mut stage, DocumentStage::Parsing);
        match parse_attributes(&response.raw_text, &request.attributes) {
            Ok(attributes) => {
                self.transition(&document_ref, &mut stage, DocumentStage::Completed);
                ExtractionResult::completed(document_ref, attributes)
            }
            Err(error) => {
                // A decode failure is permanent: re-invoking the model most
                // often reproduces the same malformed shape.
                let raw_text = error.raw_text().to_string();
                self.transition(&document_ref, &mut stage, DocumentStage::Failed);
                ExtractionResult::failed(
                    document_ref,
                    ErrorKind::ParseError,
                    error.to_string(),
                    Some(raw_text),
                )
            }
        }
    }

    fn transition(&self, document_ref: &DocumentRef, stage: &mut DocumentStage, next: DocumentStage) {
        tracing::debug!(
            document_ref = %document_ref,
            from = %stage,
            to = %next,
            "Document stage transition"
        );
        *stage = next;
    }

    async fn emit(&self, result: &ExtractionResult) {
        if let Err(e) = self.sink.record(result).await {
            tracing::warn!(
                document_ref = %result.document_ref,
                error = %e,
                "Failed to record result in sink"
            );
        }
    }
}

fn validate_attributes(
    attributes: &[AttributeSpec],
    max_attributes: usize,
) -> Result<(), ConfigurationError> {
    if attributes.is_empty() {
        return Err(ConfigurationError::EmptyAttributes);
    }
    if attributes.len() > max_attributes {
        return Err(ConfigurationError::TooManyAttributes {
            count: attributes.len(),
            max: max_attributes,
        });
    }

    let mut seen = std::collections::HashSet::with_capacity(attributes.len());
    for attribute in attributes {
        if !attribute.has_valid_name() {
            return Err(ConfigurationError::InvalidAttributeName(
                attribute.name.clone(),
            ));
        }
        if attribute.description.trim().is_empty() {
            return Err(ConfigurationError::EmptyDescription(attribute.name.clone()));
        }
        if !seen.insert(attribute.name.as_str()) {
            return Err(ConfigurationError::DuplicateAttributeName(
                attribute.name.clone(),
            ));
        }
    }
    Ok(())
}

/// Documents may legitimately appear more than once in a batch, so missing
/// results are reconciled per-ref occurrence counts rather than by set
/// difference. Returns the synthesized failures for documents with no
/// terminal result of their own.
fn backfill_missing_results(
    documents: &[DocumentRef],
    results: &[ExtractionResult],
) -> Vec<ExtractionResult> {
    let mut outstanding: HashMap<&DocumentRef, usize> = HashMap::new();
    for document_ref in documents {
        *outstanding.entry(document_ref).or_insert(0) += 1;
    }
    for result in results {
        if let Some(count) = outstanding.get_mut(&result.document_ref) {
            *count = count.saturating_sub(1);
        }
    }

    let mut synthesized = Vec::new();
    for (document_ref, count) in outstanding {
        for _ in 0..count {
            synthesized.push(ExtractionResult::failed(
                document_ref.clone(),
                ErrorKind::InvocationError,
                "batch deadline exceeded before the document reached a terminal state",
                None,
            ));
        }
    }
    synthesized
}
