//! Tests for stack deletion.

mod support;

use std::sync::Arc;
use std::time::Duration;

use stackwatch_core::deploy::DestroyOutcome;
use stackwatch_core::error::{ApiError, StackwatchError};

use support::{
    RecordingReporter, ScriptedCloudFormation, config, event, not_found, orchestrator, stack,
};

#[tokio::test(start_paused = true)]
async fn missing_stack_is_already_destroyed() {
    let api = Arc::new(
        ScriptedCloudFormation::new().describe_stacks_returns(Err(not_found("DescribeStacks"))),
    );
    let reporter = Arc::new(RecordingReporter::default());
    let orchestrator = orchestrator(&api, &reporter, config());

    let outcome = orchestrator.destroy().await.unwrap();

    assert_eq!(outcome, DestroyOutcome::StackAbsent);
    assert_eq!(api.calls("DeleteStack"), 0);
    assert_eq!(api.calls("DescribeStackEvents"), 0);
}

#[tokio::test(start_paused = true)]
async fn stack_in_review_is_not_deleted() {
    let api = Arc::new(
        ScriptedCloudFormation::new()
            .describe_stacks_returns(Ok(vec![stack("REVIEW_IN_PROGRESS")])),
    );
    let reporter = Arc::new(RecordingReporter::default());
    let orchestrator = orchestrator(&api, &reporter, config());

    assert_eq!(
        orchestrator.destroy().await.unwrap(),
        DestroyOutcome::StackAbsent
    );
    assert_eq!(api.calls("DeleteStack"), 0);
}

#[tokio::test(start_paused = true)]
async fn stack_disappearing_during_watch_is_success() {
    let api = Arc::new(
        ScriptedCloudFormation::new()
            .describe_stacks_returns(Ok(vec![stack("CREATE_COMPLETE")]))
            .describe_stacks_returns(Ok(vec![stack("DELETE_IN_PROGRESS")]))
            .describe_stacks_returns(Err(not_found("DescribeStacks")))
            .describe_stack_events_returns(Ok(vec![event("old-1", "Bucket", "CREATE_COMPLETE")]))
            .describe_stack_events_returns(Ok(vec![
                event("del-1", "Bucket", "DELETE_IN_PROGRESS"),
                event("old-1", "Bucket", "CREATE_COMPLETE"),
            ])),
    );
    let reporter = Arc::new(RecordingReporter::default());
    let orchestrator = orchestrator(&api, &reporter, config());

    let outcome = orchestrator.destroy().await.unwrap();

    assert_eq!(outcome, DestroyOutcome::Deleted);
    assert_eq!(api.calls("DeleteStack"), 1);

    let reported = reporter.resource_events();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].status, "DELETE_IN_PROGRESS");
    assert!(reported.iter().all(|record| record.status != "CREATE_COMPLETE"));
}

#[tokio::test(start_paused = true)]
async fn empty_describe_after_delete_is_success() {
    let api = Arc::new(
        ScriptedCloudFormation::new()
            .describe_stacks_returns(Ok(vec![stack("UPDATE_COMPLETE")]))
            .describe_stacks_returns(Ok(Vec::new()))
            .describe_stack_events_returns(Ok(Vec::new())),
    );
    let reporter = Arc::new(RecordingReporter::default());
    let orchestrator = orchestrator(&api, &reporter, config());

    assert_eq!(orchestrator.destroy().await.unwrap(), DestroyOutcome::Deleted);
}

#[tokio::test(start_paused = true)]
async fn both_watchers_losing_the_stack_is_success() {
    let api = Arc::new(
        ScriptedCloudFormation::new()
            .describe_stacks_returns(Ok(vec![stack("UPDATE_COMPLETE")]))
            .describe_stacks_returns(Err(not_found("DescribeStacks")))
            .describe_stack_events_returns(Ok(Vec::new()))
            .describe_stack_events_returns(Err(not_found("DescribeStackEvents"))),
    );
    let reporter = Arc::new(RecordingReporter::default());
    let orchestrator = orchestrator(&api, &reporter, config());

    assert_eq!(orchestrator.destroy().await.unwrap(), DestroyOutcome::Deleted);
}

#[tokio::test(start_paused = true)]
async fn other_watcher_errors_fail_the_destroy() {
    let api = Arc::new(
        ScriptedCloudFormation::new()
            .describe_stacks_returns(Ok(vec![stack("UPDATE_COMPLETE")]))
            .describe_stacks_returns(Err(ApiError::new("DescribeStacks", "AccessDenied")))
            .describe_stack_events_returns(Ok(Vec::new())),
    );
    let reporter = Arc::new(RecordingReporter::default());
    let orchestrator = orchestrator(&api, &reporter, config());

    let err = orchestrator.destroy().await.unwrap_err();

    assert!(matches!(err, StackwatchError::Api(_)));
    assert!(!err.is_stack_not_found());
}

#[tokio::test(start_paused = true)]
async fn delete_failure_is_returned() {
    let api = Arc::new(
        ScriptedCloudFormation::new()
            .describe_stacks_returns(Ok(vec![stack("UPDATE_COMPLETE")]))
            .describe_stack_events_returns(Ok(Vec::new()))
            .delete_stack_returns(Err(ApiError::new("DeleteStack", "AccessDenied"))),
    );
    let reporter = Arc::new(RecordingReporter::default());
    let orchestrator = orchestrator(&api, &reporter, config());

    let err = orchestrator.destroy().await.unwrap_err();

    match err {
        StackwatchError::Api(api_err) => assert_eq!(api_err.operation(), "DeleteStack"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(api.calls("DescribeStacks"), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_deletion_times_out_without_error() {
    let api = Arc::new(
        ScriptedCloudFormation::new()
            .describe_stacks_returns(Ok(vec![stack("UPDATE_COMPLETE")]))
            .describe_stacks_returns(Ok(vec![stack("DELETE_IN_PROGRESS")]))
            .describe_stack_events_returns(Ok(Vec::new())),
    );
    let reporter = Arc::new(RecordingReporter::default());
    let orchestrator = orchestrator(
        &api,
        &reporter,
        config().with_timeout(Duration::from_secs(10)),
    );

    assert_eq!(orchestrator.destroy().await.unwrap(), DestroyOutcome::TimedOut);
    assert_eq!(api.calls("DeleteStack"), 1);
}
