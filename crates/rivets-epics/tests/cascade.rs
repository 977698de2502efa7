//! Integration tests for the caller-driven closure cascade.

use rivets_epics::context::ReadContext;
use rivets_epics::domain::IssueId;
use rivets_epics::error::Error;

mod common;
use common::Tracker;

/// Close `start`, then keep closing whatever becomes eligible, one level at
/// a time. Returns the auto-closed epics in the order they were closed.
async fn cascade_close(tracker: &Tracker, start: &IssueId) -> Vec<IssueId> {
    let ctx = ReadContext::background();
    tracker.close(start);

    let mut closed = Vec::new();
    let mut pending = vec![start.clone()];
    while let Some(id) = pending.pop() {
        let candidates = tracker
            .evaluator()
            .closure_candidates(&ctx, &id)
            .await
            .expect("closure_candidates failed");
        for epic in candidates {
            tracker.close(&epic.id);
            closed.push(epic.id.clone());
            pending.push(epic.id);
        }
    }
    closed
}

#[tokio::test]
async fn test_cascade_climbs_one_level_at_a_time() {
    let mut tracker = Tracker::in_memory();
    let top = tracker.epic("proj-top");
    let mid = tracker.epic("proj-mid");
    let leaf = tracker.task("proj-leaf");
    tracker.add_child(&mid, &top);
    tracker.add_child(&leaf, &mid);

    // A single call only reports the direct parent.
    tracker.close(&leaf);
    let direct = tracker
        .evaluator()
        .closure_candidates(&ReadContext::background(), &leaf)
        .await
        .unwrap();
    let direct: Vec<IssueId> = direct.into_iter().map(|i| i.id).collect();
    assert_eq!(direct, vec![mid.clone()]);

    // Driving the loop closes the whole chain.
    tracker.set_status(&leaf, "open");
    let closed = cascade_close(&tracker, &leaf).await;
    assert_eq!(closed, vec![mid, top]);
}

#[tokio::test]
async fn test_cascade_stops_at_epic_with_open_children() {
    let mut tracker = Tracker::in_memory();
    let top = tracker.epic("proj-top");
    let mid = tracker.epic("proj-mid");
    let sibling = tracker.task("proj-sibling");
    let leaf = tracker.task("proj-leaf");
    tracker.add_child(&mid, &top);
    tracker.add_child(&sibling, &top);
    tracker.add_child(&leaf, &mid);

    let closed = cascade_close(&tracker, &leaf).await;
    assert_eq!(closed, vec![mid.clone()]);

    let statuses = tracker
        .evaluator()
        .list_eligible_epics(&ReadContext::background())
        .await
        .unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].epic.id, top);
    assert_eq!(
        (statuses[0].total_children(), statuses[0].closed_children()),
        (2, 1)
    );

    // Finishing the sibling lets the cascade reach the top.
    assert_eq!(cascade_close(&tracker, &sibling).await, vec![top]);
}

#[tokio::test]
async fn test_cascade_fans_out_to_every_parent() {
    let mut tracker = Tracker::in_memory();
    let urgent = tracker.create("proj-urgent", "epic", 0);
    let later = tracker.create("proj-later", "epic", 3);
    let shared = tracker.task("proj-shared");
    tracker.add_child(&shared, &later);
    tracker.add_child(&shared, &urgent);

    let closed = cascade_close(&tracker, &shared).await;
    // Candidates come back in priority order.
    assert_eq!(closed, vec![urgent, later]);
}

#[tokio::test]
async fn test_already_closed_parents_are_not_candidates() {
    let mut tracker = Tracker::in_memory();
    let epic = tracker.epic("proj-ep");
    let task = tracker.task("proj-task");
    tracker.add_child(&task, &epic);
    tracker.close(&epic);

    assert!(cascade_close(&tracker, &task).await.is_empty());
}

#[tokio::test]
async fn test_blocks_edges_do_not_cascade() {
    let mut tracker = Tracker::in_memory();
    let epic = tracker.epic("proj-ep");
    let other = tracker.epic("proj-other");
    let task = tracker.task("proj-task");
    tracker.add_child(&task, &epic);
    tracker.add_dependency(&task, &other, "blocks");

    assert_eq!(cascade_close(&tracker, &task).await, vec![epic]);
}

#[tokio::test]
async fn test_candidates_share_one_deadline() {
    let mut tracker = Tracker::in_memory();
    let first = tracker.epic("proj-first");
    let second = tracker.epic("proj-second");
    let task = tracker.task("proj-task");
    tracker.add_child(&task, &first);
    tracker.add_child(&task, &second);
    tracker.close(&task);

    let ctx = ReadContext::background().with_timeout(std::time::Duration::ZERO);
    let err = tracker
        .evaluator()
        .closure_candidates(&ctx, &task)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DeadlineExceeded { .. }));
}
