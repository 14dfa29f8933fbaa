#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use stackwatch_core::config::WatchConfig;
use stackwatch_core::deploy::Orchestrator;
use stackwatch_core::error::ApiError;
use stackwatch_core::provider::{
    ChangeSetSummary, CloudFormationApi, CreateChangeSetRequest, RawStackEvent, StackSummary,
};
use stackwatch_core::report::{EventRecord, Reporter, StatusRecord};

pub const STACK: &str = "demo-stack";
pub const CHANGESET_ID: &str = "arn:aws:cloudformation:us-west-2:123456789012:changeSet/demo";

type Response<T> = Result<T, ApiError>;

/// Queue of responses for one operation. The last response repeats.
struct Script<T> {
    operation: &'static str,
    steps: VecDeque<Response<T>>,
}

impl<T: Clone> Script<T> {
    fn new(operation: &'static str) -> Self {
        Self {
            operation,
            steps: VecDeque::new(),
        }
    }

    fn next(&mut self) -> Response<T> {
        if self.steps.len() > 1 {
            return self.steps.pop_front().unwrap();
        }
        self.steps
            .front()
            .cloned()
            .unwrap_or_else(|| Err(ApiError::new(self.operation, "no scripted response")))
    }
}

struct State {
    stacks: Script<Vec<StackSummary>>,
    events: Script<Vec<RawStackEvent>>,
    create: Script<String>,
    change_sets: Script<ChangeSetSummary>,
    execute: Script<()>,
    delete: Script<()>,
    calls: HashMap<&'static str, usize>,
    created: Vec<CreateChangeSetRequest>,
}

/// In-memory CloudFormation driven by per-operation response scripts.
pub struct ScriptedCloudFormation {
    state: Mutex<State>,
}

impl ScriptedCloudFormation {
    pub fn new() -> Self {
        let mut create = Script::new("CreateChangeSet");
        create.steps.push_back(Ok(CHANGESET_ID.to_string()));
        let mut execute = Script::new("ExecuteChangeSet");
        execute.steps.push_back(Ok(()));
        let mut delete = Script::new("DeleteStack");
        delete.steps.push_back(Ok(()));

        Self {
            state: Mutex::new(State {
                stacks: Script::new("DescribeStacks"),
                events: Script::new("DescribeStackEvents"),
                create,
                change_sets: Script::new("DescribeChangeSet"),
                execute,
                delete,
                calls: HashMap::new(),
                created: Vec::new(),
            }),
        }
    }

    pub fn describe_stacks_returns(self, response: Response<Vec<StackSummary>>) -> Self {
        self.state.lock().unwrap().stacks.steps.push_back(response);
        self
    }

    pub fn describe_stack_events_returns(self, response: Response<Vec<RawStackEvent>>) -> Self {
        self.state.lock().unwrap().events.steps.push_back(response);
        self
    }

    pub fn describe_change_set_returns(self, response: Response<ChangeSetSummary>) -> Self {
        self.state.lock().unwrap().change_sets.steps.push_back(response);
        self
    }

    /// Replaces the default successful DeleteStack response.
    pub fn delete_stack_returns(self, response: Response<()>) -> Self {
        let mut state = self.state.lock().unwrap();
        state.delete.steps.clear();
        state.delete.steps.push_back(response);
        drop(state);
        self
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn created(&self) -> Vec<CreateChangeSetRequest> {
        self.state.lock().unwrap().created.clone()
    }

    fn record(&self, operation: &'static str) -> std::sync::MutexGuard<'_, State> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(operation).or_insert(0) += 1;
        state
    }
}

#[async_trait]
impl CloudFormationApi for ScriptedCloudFormation {
    async fn describe_stacks(&self, _stack_name: &str) -> Result<Vec<StackSummary>, ApiError> {
        self.record("DescribeStacks").stacks.next()
    }

    async fn describe_stack_events(
        &self,
        _stack_name: &str,
    ) -> Result<Vec<RawStackEvent>, ApiError> {
        self.record("DescribeStackEvents").events.next()
    }

    async fn create_change_set(
        &self,
        request: &CreateChangeSetRequest,
    ) -> Result<String, ApiError> {
        let mut state = self.record("CreateChangeSet");
        state.created.push(request.clone());
        state.create.next()
    }

    async fn describe_change_set(
        &self,
        _stack_name: &str,
        _change_set_id: &str,
    ) -> Result<ChangeSetSummary, ApiError> {
        self.record("DescribeChangeSet").change_sets.next()
    }

    async fn execute_change_set(
        &self,
        _stack_name: &str,
        _change_set_id: &str,
    ) -> Result<(), ApiError> {
        self.record("ExecuteChangeSet").execute.next()
    }

    async fn delete_stack(&self, _stack_name: &str) -> Result<(), ApiError> {
        self.record("DeleteStack").delete.next()
    }
}

/// Reporter that keeps every record for later assertions.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<EventRecord>>,
    statuses: Mutex<Vec<StatusRecord>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<EventRecord> {
        self.events.lock().unwrap().clone()
    }

    /// Resource events only, without the final deployment record.
    pub fn resource_events(&self) -> Vec<EventRecord> {
        self.events()
            .into_iter()
            .filter(|record| record.event_type == "Resource")
            .collect()
    }

    pub fn deployment_events(&self) -> Vec<EventRecord> {
        self.events()
            .into_iter()
            .filter(|record| record.event_type == "Deployment")
            .collect()
    }

    pub fn statuses(&self) -> Vec<StatusRecord> {
        self.statuses.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn event(&self, record: &EventRecord) {
        self.events.lock().unwrap().push(record.clone());
    }

    fn status(&self, record: &StatusRecord) {
        self.statuses.lock().unwrap().push(record.clone());
    }
}

pub fn stack(status: &str) -> StackSummary {
    StackSummary {
        stack_name: STACK.to_string(),
        status: status.to_string(),
        status_reason: None,
    }
}

pub fn event(id: &str, resource: &str, status: &str) -> RawStackEvent {
    RawStackEvent {
        event_id: Some(id.to_string()),
        logical_resource_id: Some(resource.to_string()),
        physical_resource_id: Some(format!("{resource}-physical")),
        resource_status: Some(status.to_string()),
        resource_type: None,
        resource_status_reason: None,
    }
}

pub fn change_set(status: &str, change_count: usize) -> ChangeSetSummary {
    ChangeSetSummary {
        status: status.to_string(),
        status_reason: None,
        change_count,
    }
}

pub fn not_found(operation: &'static str) -> ApiError {
    ApiError::stack_not_found(operation, STACK)
}

pub fn config() -> WatchConfig {
    WatchConfig::new(STACK)
        .with_poll_interval(Duration::from_secs(3))
        .with_timeout(Duration::from_secs(60))
}

pub fn orchestrator(
    api: &Arc<ScriptedCloudFormation>,
    reporter: &Arc<RecordingReporter>,
    config: WatchConfig,
) -> Orchestrator {
    Orchestrator::new(config, api.clone(), reporter.clone())
}
