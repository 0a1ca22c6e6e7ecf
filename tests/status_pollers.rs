// ABOUTME: Integration tests for the stack and replica status pollers.
// ABOUTME: Runs against the fake platform on a paused tokio clock.

mod support;

use std::sync::Arc;
use std::time::Duration;

use harmonia::ops::{Manifest, OpsError, StackTemplate};
use harmonia::poll::PollOutcome;
use harmonia::status::{
    DeploymentStatus, ReplicaPollSettings, ReplicaScaler, ReplicaSnapshot, ReplicaStatusPoller,
    ReplicaTarget, StackAction, StackPollSettings, StackSnapshot, StackStatusPoller,
};
use harmonia::task::CancelToken;
use harmonia::types::DeploymentUid;
use parking_lot::Mutex;
use serde_json::json;
use support::fake_platform::{FakePlatform, deployment, resource_event, stack_event};
use support::fixtures::{self, AppShape};

fn stack_poller(platform: &Arc<FakePlatform>) -> StackStatusPoller {
    let app = fixtures::app(AppShape::ecs_cdk());
    let env = app.environment("dev").unwrap();
    StackStatusPoller::new(platform.clone(), app.stack_ref(env).unwrap()).with_settings(
        StackPollSettings {
            interval: Duration::from_secs(1),
            max_iterations: 10,
            ..StackPollSettings::default()
        },
    )
}

fn replica_poller(platform: &Arc<FakePlatform>) -> (ReplicaStatusPoller, ReplicaScaler) {
    let app = fixtures::app(AppShape::eks_cdk());
    let env = app.environment("dev").unwrap();
    let query = app.deployment_query(env, env.eks.as_ref().unwrap(), "opa-dev".into());
    let poller = ReplicaStatusPoller::new(platform.clone(), query).with_settings(
        ReplicaPollSettings {
            start_interval: Duration::from_secs(1),
            stop_interval: Duration::from_secs(1),
            max_iterations: 10,
            retry_attempts: 0,
        },
    );
    let scaler = ReplicaScaler::new(platform.clone(), app.manifest_source(env));
    (poller, scaler)
}

fn template() -> StackTemplate {
    StackTemplate {
        s3_bucket_name: "orders-artifacts".into(),
        cf_file_name: "packaged.yaml".into(),
    }
}

fn count(platform: &FakePlatform, prefix: &str) -> usize {
    platform
        .calls()
        .iter()
        .filter(|call| call.starts_with(prefix))
        .count()
}

#[tokio::test(start_paused = true)]
async fn launch_create_follows_events_until_root_completes() {
    support::init_tracing();
    let platform = FakePlatform::new();
    platform.script_stack_events(vec![
        Ok(vec![stack_event("CREATE_IN_PROGRESS")]),
        Ok(vec![resource_event("CREATE_COMPLETE"), stack_event("CREATE_IN_PROGRESS")]),
        Ok(vec![stack_event("CREATE_COMPLETE"), resource_event("CREATE_COMPLETE")]),
    ]);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    let outcome = stack_poller(&platform)
        .launch(
            StackAction::Create(template()),
            &CancelToken::new(),
            move |snapshot: &StackSnapshot| sink.lock().push(snapshot.status()),
        )
        .await
        .unwrap();

    let PollOutcome::Completed(snapshot) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(snapshot.status(), DeploymentStatus::Live);
    assert_eq!(platform.calls()[0], "create_stack:orders-dev");
    assert_eq!(count(&platform, "describe_stack_events"), 3);
    assert_eq!(
        *seen.lock(),
        vec![
            DeploymentStatus::InProgress,
            DeploymentStatus::InProgress,
            DeploymentStatus::Live
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn launch_update_and_delete_use_matching_operations() {
    let platform = FakePlatform::new();
    platform.script_stack_events(vec![Ok(vec![stack_event("DELETE_COMPLETE")])]);
    let poller = stack_poller(&platform);

    let updated = poller
        .launch(StackAction::Update(template()), &CancelToken::new(), |_| {})
        .await
        .unwrap();
    let deleted = poller
        .launch(StackAction::Delete, &CancelToken::new(), |_| {})
        .await
        .unwrap();

    assert!(updated.is_completed());
    assert_eq!(
        deleted.status().map(StackSnapshot::status),
        Some(DeploymentStatus::Deleted)
    );
    assert!(platform.called("update_stack:orders-dev"));
    assert!(platform.called("delete_stack:orders-dev"));
}

#[tokio::test(start_paused = true)]
async fn rejected_launch_returns_error_without_polling() {
    let platform = FakePlatform::new();
    platform.fail(
        "update_stack:orders-dev",
        OpsError::Http {
            endpoint: "/cloudformation/updateStack".into(),
            status: 400,
            body: "No updates are to be performed.".into(),
        },
    );

    let err = stack_poller(&platform)
        .launch(StackAction::Update(template()), &CancelToken::new(), |_| {})
        .await
        .unwrap_err();

    assert!(err.to_string().contains("No updates are to be performed."));
    assert_eq!(count(&platform, "describe_stack_events"), 0);
}

#[tokio::test(start_paused = true)]
async fn cancelled_launch_never_polls() {
    let platform = FakePlatform::new();
    let token = CancelToken::new();
    token.cancel();

    let outcome = stack_poller(&platform)
        .launch(StackAction::Delete, &token, |_| {})
        .await
        .unwrap();

    assert_eq!(outcome, PollOutcome::Cancelled);
    assert_eq!(count(&platform, "describe_stack_events"), 0);
}

#[tokio::test(start_paused = true)]
async fn snapshot_of_untouched_stack_is_unstaged() {
    let platform = FakePlatform::new();

    let snapshot = stack_poller(&platform).snapshot().await.unwrap();

    assert_eq!(snapshot.status(), DeploymentStatus::Unstaged);
    assert!(snapshot.latest.is_none());
    assert!(snapshot.is_terminal());
}

#[tokio::test(start_paused = true)]
async fn stack_that_never_settles_exhausts_with_last_snapshot() {
    let platform = FakePlatform::new();
    platform.script_stack_events(vec![Ok(vec![stack_event("UPDATE_IN_PROGRESS")])]);

    let outcome = stack_poller(&platform)
        .poll(&CancelToken::new(), |_| {})
        .await
        .unwrap();

    let PollOutcome::Exhausted(Some(last)) = outcome else {
        panic!("expected exhaustion, got {outcome:?}");
    };
    assert_eq!(last.status(), DeploymentStatus::InProgress);
    assert_eq!(count(&platform, "describe_stack_events"), 10);
}

#[tokio::test(start_paused = true)]
async fn watch_handle_can_be_cancelled() {
    let platform = FakePlatform::new();
    platform.script_stack_events(vec![Ok(vec![stack_event("UPDATE_IN_PROGRESS")])]);

    let handle = stack_poller(&platform).watch(|_| {}).unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    handle.cancel();

    assert_eq!(handle.outcome().await, PollOutcome::Cancelled);
    assert_eq!(count(&platform, "describe_stack_events"), 3);
}

fn scaled_manifests() -> Vec<Manifest> {
    vec![
        Manifest::new(json!({
            "kind": "Deployment",
            "metadata": { "name": "orders", "namespace": "orders-dev" },
            "spec": { "replicas": 3 }
        })),
        Manifest::new(json!({
            "kind": "Service",
            "metadata": { "name": "orders", "namespace": "orders-dev" },
            "spec": { "ports": [{ "port": 80 }] }
        })),
    ]
}

#[tokio::test(start_paused = true)]
async fn stop_rewrites_replicas_and_waits_for_zero_ready() {
    let platform = FakePlatform::new();
    platform.set_manifests(scaled_manifests());
    platform.script_deployments(vec![
        Ok(vec![deployment("uid-1", "orders", 0, Some(3))]),
        Ok(vec![deployment("uid-1", "orders", 0, Some(1))]),
        Ok(vec![deployment("uid-1", "orders", 0, None)]),
    ]);
    let (poller, scaler) = replica_poller(&platform);

    let outcome = poller
        .scale(
            &scaler,
            DeploymentUid::new("uid-1"),
            ReplicaTarget::Stop,
            3,
            &CancelToken::new(),
            |_| {},
        )
        .await
        .unwrap();

    assert!(outcome.is_completed());
    assert_eq!(
        &platform.calls()[..2],
        ["fetch_manifests:dev", "apply_manifests:orders-dev"]
    );
    let applied = platform.applied_manifests();
    let deployment = serde_json::to_value(&applied[0][0]).unwrap();
    let service = serde_json::to_value(&applied[0][1]).unwrap();
    assert_eq!(deployment["spec"]["replicas"], json!(0));
    assert!(service["spec"].get("replicas").is_none());
}

#[tokio::test(start_paused = true)]
async fn start_requests_at_least_one_replica() {
    let platform = FakePlatform::new();
    platform.set_manifests(scaled_manifests());
    platform.script_deployments(vec![Ok(vec![deployment("uid-1", "orders", 1, Some(1))])]);
    let (poller, scaler) = replica_poller(&platform);

    let outcome = poller
        .scale(
            &scaler,
            DeploymentUid::new("uid-1"),
            ReplicaTarget::Start,
            0,
            &CancelToken::new(),
            |_| {},
        )
        .await
        .unwrap();

    let PollOutcome::Completed(ReplicaSnapshot { deployment: Some(found) }) = outcome else {
        panic!("expected the tracked deployment, got {outcome:?}");
    };
    assert_eq!(found.ready_replicas, Some(1));
    let applied = serde_json::to_value(&platform.applied_manifests()[0][0]).unwrap();
    assert_eq!(applied["spec"]["replicas"], json!(1));
}

#[tokio::test(start_paused = true)]
async fn missing_deployment_never_counts_as_stopped() {
    let platform = FakePlatform::new();
    platform.script_deployments(vec![Ok(vec![deployment("other", "worker", 0, None)])]);
    let (poller, _) = replica_poller(&platform);

    let outcome = poller
        .poll(
            DeploymentUid::new("uid-1"),
            ReplicaTarget::Stop,
            &CancelToken::new(),
            |_| {},
        )
        .await
        .unwrap();

    assert_eq!(
        outcome,
        PollOutcome::Exhausted(Some(ReplicaSnapshot { deployment: None }))
    );
}

#[tokio::test(start_paused = true)]
async fn failed_manifest_apply_surfaces_before_polling() {
    let platform = FakePlatform::new();
    platform.set_manifests(scaled_manifests());
    platform.fail(
        "apply_manifests:orders-dev",
        OpsError::RemoteFunction {
            function: "kubectl".into(),
            message: "forbidden".into(),
        },
    );
    let (poller, scaler) = replica_poller(&platform);

    let result = poller
        .scale(
            &scaler,
            DeploymentUid::new("uid-1"),
            ReplicaTarget::Start,
            1,
            &CancelToken::new(),
            |_| {},
        )
        .await;

    assert!(result.unwrap_err().to_string().contains("forbidden"));
    assert_eq!(count(&platform, "list_deployments"), 0);
}

#[tokio::test(start_paused = true)]
async fn app_states_summarise_every_listed_deployment() {
    let platform = FakePlatform::new();
    platform.script_deployments(vec![Ok(vec![
        deployment("uid-1", "orders", 2, Some(2)),
        deployment("uid-2", "worker", 1, None),
    ])]);
    let (poller, _) = replica_poller(&platform);

    let states = poller.app_states().await.unwrap();

    assert_eq!(states.len(), 2);
    assert_eq!(states[0].status, DeploymentStatus::Live);
    assert_eq!(states[1].status, DeploymentStatus::Deleted);
    assert_eq!(platform.calls(), vec!["list_deployments:dev"]);
}
