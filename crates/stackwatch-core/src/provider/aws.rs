//! AWS CloudFormation implementation of [`CloudFormationApi`].

use async_trait::async_trait;
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::error::DisplayErrorContext;
use aws_sdk_cloudformation::types::{
    ChangeSetType as SdkChangeSetType, Parameter as SdkParameter, StackEvent as SdkStackEvent,
};

use crate::error::ApiError;

use super::{
    ChangeSetSummary, ChangeSetType, CloudFormationApi, CreateChangeSetRequest, RawStackEvent,
    StackSummary,
};

/// CloudFormation client backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct AwsCloudFormation {
    client: Client,
}

impl AwsCloudFormation {
    /// Build a client from the default AWS provider chain.
    ///
    /// `region` overrides whatever region the environment resolves.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let config = loader.load().await;
        Self::from_client(Client::new(&config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn api_error<E>(operation: &'static str, err: E) -> ApiError
where
    E: std::error::Error + 'static,
{
    ApiError::new(operation, DisplayErrorContext(err).to_string())
}

fn raw_event(event: &SdkStackEvent) -> RawStackEvent {
    RawStackEvent {
        event_id: event.event_id().map(str::to_string),
        logical_resource_id: event.logical_resource_id().map(str::to_string),
        physical_resource_id: event.physical_resource_id().map(str::to_string),
        resource_status: event.resource_status().map(|s| s.as_str().to_string()),
        resource_type: event.resource_type().map(str::to_string),
        resource_status_reason: event.resource_status_reason().map(str::to_string),
    }
}

#[async_trait]
impl CloudFormationApi for AwsCloudFormation {
    async fn describe_stacks(&self, stack_name: &str) -> Result<Vec<StackSummary>, ApiError> {
        let output = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| api_error("DescribeStacks", e))?;

        Ok(output
            .stacks()
            .iter()
            .map(|stack| StackSummary {
                stack_name: stack.stack_name().unwrap_or_default().to_string(),
                status: stack
                    .stack_status()
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default(),
                status_reason: stack.stack_status_reason().map(str::to_string),
            })
            .collect())
    }

    async fn describe_stack_events(
        &self,
        stack_name: &str,
    ) -> Result<Vec<RawStackEvent>, ApiError> {
        let output = self
            .client
            .describe_stack_events()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| api_error("DescribeStackEvents", e))?;

        Ok(output.stack_events().iter().map(raw_event).collect())
    }

    async fn create_change_set(
        &self,
        request: &CreateChangeSetRequest,
    ) -> Result<String, ApiError> {
        let change_set_type = match request.change_set_type {
            ChangeSetType::Create => SdkChangeSetType::Create,
            ChangeSetType::Update => SdkChangeSetType::Update,
        };
        let parameters = request
            .parameters
            .iter()
            .map(|p| {
                SdkParameter::builder()
                    .parameter_key(&p.key)
                    .parameter_value(&p.value)
                    .build()
            })
            .collect::<Vec<_>>();

        let output = self
            .client
            .create_change_set()
            .stack_name(&request.stack_name)
            .change_set_name(&request.change_set_name)
            .change_set_type(change_set_type)
            .description(&request.description)
            .template_body(&request.template_body)
            .set_parameters(Some(parameters))
            .send()
            .await
            .map_err(|e| api_error("CreateChangeSet", e))?;

        output
            .id()
            .map(str::to_string)
            .ok_or_else(|| ApiError::new("CreateChangeSet", "response did not include a changeset id"))
    }

    async fn describe_change_set(
        &self,
        stack_name: &str,
        change_set_id: &str,
    ) -> Result<ChangeSetSummary, ApiError> {
        let output = self
            .client
            .describe_change_set()
            .stack_name(stack_name)
            .change_set_name(change_set_id)
            .send()
            .await
            .map_err(|e| api_error("DescribeChangeSet", e))?;

        Ok(ChangeSetSummary {
            status: output
                .status()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            status_reason: output.status_reason().map(str::to_string),
            change_count: output.changes().len(),
        })
    }

    async fn execute_change_set(
        &self,
        stack_name: &str,
        change_set_id: &str,
    ) -> Result<(), ApiError> {
        self.client
            .execute_change_set()
            .stack_name(stack_name)
            .change_set_name(change_set_id)
            .send()
            .await
            .map_err(|e| api_error("ExecuteChangeSet", e))?;
        Ok(())
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<(), ApiError> {
        self.client
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| api_error("DeleteStack", e))?;
        Ok(())
    }
}
