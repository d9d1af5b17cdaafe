// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Transport-agnostic service facade over the pipeline engine.
//!
//! Each operation returns an [`ApiResponse`] carrying the HTTP status code and
//! JSON body a REST front end would send, so any web framework can mount
//! these calls directly.
//!
//! | Status | Meaning |
//! |---|---|
//! | 200 | success with body |
//! | 204 | success, no body |
//! | 404 | pipeline or vCon not found |
//! | 422 | invalid definition, options or vCon body |
//! | 430 | pipeline timed out |
//! | 500 | processor failure or backend fault |

use serde_json::{json, Map, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::PipelineError;
use crate::pipeline::{
    PipelineDefinition, PipelineRunResult, PipelineRunner, PipelineStore, RunOptions, RunStatus,
};
use crate::processor::ProcessorIo;
use crate::queue::PipelineJob;
use crate::traits::{JobQueue, VconStorage};
use crate::vcon::Vcon;

pub const STATUS_OK: u16 = 200;
pub const STATUS_NO_CONTENT: u16 = 204;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_UNPROCESSABLE: u16 = 422;
pub const STATUS_TIMED_OUT: u16 = 430;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `None` means no body (204), distinct from a JSON `null` body
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: STATUS_OK,
            body: Some(body),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: STATUS_NO_CONTENT,
            body: None,
        }
    }

    /// Error response with a `{"detail": message}` body.
    pub fn error(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(json!({ "detail": detail.into() })),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<PipelineError> for ApiResponse {
    fn from(error: PipelineError) -> Self {
        let status = match &error {
            PipelineError::PipelineNotFound { .. } | PipelineError::VconNotFound { .. } => {
                STATUS_NOT_FOUND
            }
            PipelineError::Validation(_) | PipelineError::Io(_) => STATUS_UNPROCESSABLE,
            _ => STATUS_INTERNAL_ERROR,
        };
        ApiResponse::error(status, error.to_string())
    }
}

/// Pipeline CRUD, synchronous runs and job enqueueing.
#[derive(Clone)]
pub struct PipelineService {
    pipelines: PipelineStore,
    runner: PipelineRunner,
    storage: Arc<dyn VconStorage>,
    queue: Arc<dyn JobQueue>,
}

impl PipelineService {
    pub fn new(
        pipelines: PipelineStore,
        runner: PipelineRunner,
        storage: Arc<dyn VconStorage>,
        queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            pipelines,
            runner,
            storage,
            queue,
        }
    }

    /// Create or replace a pipeline from its JSON document.
    pub async fn put_pipeline(&self, name: &str, document: Value, validate: bool) -> ApiResponse {
        let definition = match PipelineDefinition::from_value(document) {
            Ok(definition) => definition,
            Err(e) => return ApiResponse::error(STATUS_UNPROCESSABLE, e.to_string()),
        };
        match self.pipelines.set(name, &definition, validate).await {
            Ok(()) => ApiResponse::no_content(),
            Err(e) => e.into(),
        }
    }

    pub async fn get_pipeline(&self, name: &str) -> ApiResponse {
        let definition = match self.pipelines.get(name).await {
            Ok(definition) => definition,
            Err(e) => return e.into(),
        };
        match serde_json::to_value(&definition) {
            Ok(body) => ApiResponse::ok(body),
            Err(e) => ApiResponse::error(STATUS_INTERNAL_ERROR, e.to_string()),
        }
    }

    pub async fn list_pipelines(&self) -> ApiResponse {
        match self.pipelines.list_names().await {
            Ok(names) => ApiResponse::ok(json!(names)),
            Err(e) => e.into(),
        }
    }

    pub async fn delete_pipeline(&self, name: &str) -> ApiResponse {
        match self.pipelines.delete(name).await {
            Ok(()) => ApiResponse::no_content(),
            Err(e) => e.into(),
        }
    }

    /// Run a pipeline over a stored vCon.
    ///
    /// The vCon is added under a per-run lock key, so it is only written back
    /// when a processor updated it and saving is enabled.
    pub async fn run_pipeline_by_uuid(
        &self,
        name: &str,
        uuid: Uuid,
        save_vcons: Option<bool>,
        return_results: bool,
    ) -> ApiResponse {
        match self
            .run_stored(name, uuid, save_vcons, return_results)
            .await
        {
            Ok(result) => Self::run_response(&result, return_results),
            Err(e) => e.into(),
        }
    }

    /// Run a pipeline over a vCon supplied in the request body.
    ///
    /// The vCon counts as new: it is committed whenever saving is enabled.
    pub async fn run_pipeline_inline(
        &self,
        name: &str,
        body: Value,
        save_vcons: Option<bool>,
        return_results: bool,
    ) -> ApiResponse {
        let dict = match body {
            Value::Object(dict) => dict,
            other => {
                return ApiResponse::error(
                    STATUS_UNPROCESSABLE,
                    format!("vCon body must be a JSON object, got {}", other),
                )
            }
        };
        if let Err(e) = Vcon::from_dict(dict.clone()) {
            return ApiResponse::error(STATUS_UNPROCESSABLE, format!("invalid vCon: {}", e));
        }

        match self
            .run_supplied(name, dict, save_vcons, return_results)
            .await
        {
            Ok(result) => Self::run_response(&result, return_results),
            Err(e) => e.into(),
        }
    }

    /// Queue a pipeline job; responds with the job id.
    pub async fn enqueue_job(
        &self,
        queue_name: &str,
        pipeline_name: &str,
        vcon_uuids: Vec<Uuid>,
    ) -> ApiResponse {
        if let Err(e) = self.pipelines.get(pipeline_name).await {
            return e.into();
        }
        let job = PipelineJob::new(pipeline_name, vcon_uuids);
        match self.queue.enqueue(queue_name, job).await {
            Ok(job_id) => ApiResponse::ok(json!({ "job_id": job_id })),
            Err(e) => PipelineError::from(e).into(),
        }
    }

    async fn run_stored(
        &self,
        name: &str,
        uuid: Uuid,
        save_vcons: Option<bool>,
        return_results: bool,
    ) -> Result<PipelineRunResult, PipelineError> {
        let definition = self.pipelines.get(name).await?;
        let vcon = self
            .storage
            .get(uuid)
            .await?
            .ok_or(PipelineError::VconNotFound { uuid })?;

        let lock_key = Uuid::new_v4().to_string();
        let mut io = ProcessorIo::new(self.storage.clone());
        io.add_vcon(vcon, Some(&lock_key), false).await?;
        self.run(name, &definition, io, save_vcons, return_results)
            .await
    }

    async fn run_supplied(
        &self,
        name: &str,
        dict: Map<String, Value>,
        save_vcons: Option<bool>,
        return_results: bool,
    ) -> Result<PipelineRunResult, PipelineError> {
        let definition = self.pipelines.get(name).await?;
        let mut io = ProcessorIo::new(self.storage.clone());
        io.add_vcon(dict, None, false).await?;
        self.run(name, &definition, io, save_vcons, return_results)
            .await
    }

    async fn run(
        &self,
        name: &str,
        definition: &PipelineDefinition,
        io: ProcessorIo,
        save_vcons: Option<bool>,
        return_results: bool,
    ) -> Result<PipelineRunResult, PipelineError> {
        let options = RunOptions {
            save_vcons,
            return_results,
            ..RunOptions::default()
        };
        self.runner.run(name, definition, io, &options).await
    }

    fn run_response(result: &PipelineRunResult, return_results: bool) -> ApiResponse {
        match &result.status {
            RunStatus::Completed => match (&result.output, return_results) {
                (Some(output), true) => match serde_json::to_value(output) {
                    Ok(body) => ApiResponse::ok(with_parameters(body, &result.parameters)),
                    Err(e) => ApiResponse::error(STATUS_INTERNAL_ERROR, e.to_string()),
                },
                _ => ApiResponse::ok(Value::Null),
            },
            RunStatus::TimedOut { completed_steps } => ApiResponse::error(
                STATUS_TIMED_OUT,
                format!(
                    "pipeline: {} timed out after {} step(s)",
                    result.pipeline_name, completed_steps
                ),
            ),
            RunStatus::Failed {
                processor_name,
                error,
                ..
            } => ApiResponse::error(
                STATUS_INTERNAL_ERROR,
                format!("processor: {} failed: {}", processor_name, error),
            ),
        }
    }
}

fn with_parameters(mut body: Value, parameters: &Map<String, Value>) -> Value {
    if let (false, Value::Object(map)) = (parameters.is_empty(), &mut body) {
        map.insert("parameters".to_string(), Value::Object(parameters.clone()));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{stub_registry, FAIL, SLEEP, SUBJECT_SETTER};
    use crate::processor::InitOptions;
    use crate::queue::InMemoryJobQueue;
    use crate::storage::{InMemoryKeyValueStore, InMemoryVconStorage};

    struct Fixture {
        service: PipelineService,
        storage: Arc<InMemoryVconStorage>,
        queue: Arc<InMemoryJobQueue>,
    }

    async fn fixture() -> Fixture {
        let mut registry = stub_registry();
        registry.register(InitOptions::new(), "ghost", "missing", "nothing", None, None);
        let registry = Arc::new(registry);
        let storage = Arc::new(InMemoryVconStorage::new());
        let queue = Arc::new(InMemoryJobQueue::new());
        let service = PipelineService::new(
            PipelineStore::new(Arc::new(InMemoryKeyValueStore::new()), registry.clone()),
            PipelineRunner::new(registry),
            storage.clone(),
            queue.clone(),
        );

        let pipelines = [
            (
                "tag",
                json!({
                    "pipeline_options": {"save_vcons": true},
                    "processors": [{"processor_name": SUBJECT_SETTER, "processor_options": {"subject": "tagged"}}]
                }),
            ),
            (
                "slow",
                json!({
                    "pipeline_options": {"timeout": 0.01},
                    "processors": [{"processor_name": SLEEP}, {"processor_name": SLEEP}]
                }),
            ),
            ("broken", json!({"processors": [{"processor_name": FAIL}]})),
        ];
        for (name, document) in pipelines {
            let response = service.put_pipeline(name, document, true).await;
            assert_eq!(response, ApiResponse::no_content(), "seeding '{}'", name);
        }

        Fixture {
            service,
            storage,
            queue,
        }
    }

    fn detail(response: &ApiResponse) -> &str {
        response
            .body
            .as_ref()
            .and_then(|body| body["detail"].as_str())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_put_pipeline_validation() {
        struct TestCase {
            name: &'static str,
            document: Value,
            validate: bool,
            expected_status: u16,
            detail_contains: &'static str,
        }

        let test_cases = vec![
            TestCase {
                name: "unregistered processor",
                document: json!({"processors": [{"processor_name": "nope"}]}),
                validate: true,
                expected_status: STATUS_UNPROCESSABLE,
                detail_contains: "nope not registered",
            },
            TestCase {
                name: "processor failed to instantiate",
                document: json!({"processors": [{"processor_name": "ghost"}]}),
                validate: true,
                expected_status: STATUS_UNPROCESSABLE,
                detail_contains: "ghost not instantiated",
            },
            TestCase {
                name: "unregistered processor without validation",
                document: json!({"processors": [{"processor_name": "nope"}]}),
                validate: false,
                expected_status: STATUS_NO_CONTENT,
                detail_contains: "",
            },
            TestCase {
                name: "bad timeout",
                document: json!({"pipeline_options": {"timeout": "soon"}, "processors": []}),
                validate: false,
                expected_status: STATUS_UNPROCESSABLE,
                detail_contains: "timeout",
            },
            TestCase {
                name: "options mismatch",
                document: json!({"processors": [{"processor_name": SUBJECT_SETTER, "processor_options": {}}]}),
                validate: true,
                expected_status: STATUS_UNPROCESSABLE,
                detail_contains: "SubjectOptions",
            },
            TestCase {
                name: "not a definition",
                document: json!(["noop"]),
                validate: true,
                expected_status: STATUS_UNPROCESSABLE,
                detail_contains: "malformed",
            },
        ];

        let fixture = fixture().await;
        for test_case in test_cases {
            let response = fixture
                .service
                .put_pipeline("candidate", test_case.document, test_case.validate)
                .await;
            assert_eq!(response.status, test_case.expected_status, "Test case '{}'", test_case.name);
            assert!(
                detail(&response).contains(test_case.detail_contains),
                "Test case '{}': {:?}",
                test_case.name,
                response.body
            );
        }
    }

    #[tokio::test]
    async fn test_pipeline_crud() {
        let fixture = fixture().await;
        let service = &fixture.service;

        let listed = service.list_pipelines().await;
        assert_eq!(listed, ApiResponse::ok(json!(["broken", "slow", "tag"])));

        let fetched = service.get_pipeline("tag").await;
        assert_eq!(fetched.status, STATUS_OK);
        let body = fetched.body.unwrap();
        assert_eq!(body["pipeline_options"]["save_vcons"], json!(true));
        assert_eq!(body["processors"][0]["processor_name"], json!(SUBJECT_SETTER));

        assert_eq!(service.delete_pipeline("tag").await, ApiResponse::no_content());
        let missing = service.get_pipeline("tag").await;
        assert_eq!(missing.status, STATUS_NOT_FOUND);
        assert_eq!(detail(&missing), "pipeline: tag not found");
        assert_eq!(service.delete_pipeline("tag").await.status, STATUS_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_run_by_uuid() {
        let fixture = fixture().await;
        let vcon = Vcon::new();
        fixture.storage.insert(vcon.clone()).await;

        let response = fixture
            .service
            .run_pipeline_by_uuid("tag", vcon.uuid, None, true)
            .await;
        assert_eq!(response.status, STATUS_OK);
        let body = response.body.unwrap();
        assert_eq!(body["vcons"][0]["subject"], json!("tagged"));
        assert_eq!(body["vcons_modified"], json!([true]));

        let stored = fixture.storage.get(vcon.uuid).await.unwrap().unwrap();
        assert_eq!(stored.subject.as_deref(), Some("tagged"));
        assert!(!fixture.storage.is_locked(vcon.uuid).await);
    }

    #[tokio::test]
    async fn test_run_statuses() {
        struct TestCase {
            name: &'static str,
            pipeline: &'static str,
            stored: bool,
            return_results: bool,
            expected_status: u16,
            expected_body: Option<Value>,
        }

        let test_cases = vec![
            TestCase {
                name: "no results requested",
                pipeline: "tag",
                stored: true,
                return_results: false,
                expected_status: STATUS_OK,
                expected_body: Some(Value::Null),
            },
            TestCase {
                name: "timeout",
                pipeline: "slow",
                stored: true,
                return_results: true,
                expected_status: STATUS_TIMED_OUT,
                expected_body: None,
            },
            TestCase {
                name: "processor failure",
                pipeline: "broken",
                stored: true,
                return_results: true,
                expected_status: STATUS_INTERNAL_ERROR,
                expected_body: None,
            },
            TestCase {
                name: "unknown pipeline",
                pipeline: "nope",
                stored: true,
                return_results: true,
                expected_status: STATUS_NOT_FOUND,
                expected_body: None,
            },
            TestCase {
                name: "unknown vCon",
                pipeline: "tag",
                stored: false,
                return_results: true,
                expected_status: STATUS_NOT_FOUND,
                expected_body: None,
            },
        ];

        let fixture = fixture().await;
        for test_case in test_cases {
            let vcon = Vcon::new();
            if test_case.stored {
                fixture.storage.insert(vcon.clone()).await;
            }
            let response = fixture
                .service
                .run_pipeline_by_uuid(test_case.pipeline, vcon.uuid, None, test_case.return_results)
                .await;

            assert_eq!(response.status, test_case.expected_status, "Test case '{}'", test_case.name);
            if let Some(expected_body) = test_case.expected_body {
                assert_eq!(response.body, Some(expected_body), "Test case '{}'", test_case.name);
            } else {
                assert!(!detail(&response).is_empty(), "Test case '{}'", test_case.name);
            }
        }
    }

    #[tokio::test]
    async fn test_run_inline() {
        let fixture = fixture().await;
        let vcon = Vcon::new();
        let body = Value::Object(vcon.to_dict().unwrap());

        let response = fixture
            .service
            .run_pipeline_inline("tag", body, Some(false), true)
            .await;
        assert_eq!(response.status, STATUS_OK);
        assert_eq!(response.body.unwrap()["vcons"][0]["subject"], json!("tagged"));
        assert!(fixture.storage.get(vcon.uuid).await.unwrap().is_none());

        let malformed = fixture
            .service
            .run_pipeline_inline("tag", json!({"uuid": "not-a-uuid"}), None, true)
            .await;
        assert_eq!(malformed.status, STATUS_UNPROCESSABLE);

        let not_object = fixture
            .service
            .run_pipeline_inline("tag", json!("vcon"), None, true)
            .await;
        assert_eq!(not_object.status, STATUS_UNPROCESSABLE);
    }

    #[tokio::test]
    async fn test_enqueue_job() {
        let fixture = fixture().await;

        let response = fixture
            .service
            .enqueue_job("ingress", "tag", vec![Uuid::new_v4()])
            .await;
        assert_eq!(response.status, STATUS_OK);
        assert!(response.body.unwrap()["job_id"].is_string());
        assert_eq!(fixture.queue.len("ingress").await.unwrap(), 1);

        let unknown = fixture.service.enqueue_job("ingress", "nope", vec![]).await;
        assert_eq!(unknown.status, STATUS_NOT_FOUND);
    }
}
