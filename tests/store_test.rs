//! Entity store integration tests
//!
//! Exercise find-or-create under concurrent requests and the persisted side
//! of vote gating against an in-memory database.

mod helpers;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use futures::future::join_all;

use helpers::*;
use ReportBot::database::{CastVote, CastVoteOutcome, OpenReport, OpenReportOutcome};
use ReportBot::models::{GroupSetting, ReportStatus, DEFAULT_VOTE_THRESHOLD};
use ReportBot::services::{has_vote_power, IgnoreReason, VoteOutcome};
use ReportBot::ReportBotError;

fn open_report(offender_id: i64, reported_message_id: i64, initiator_privileged: bool) -> OpenReport {
    OpenReport {
        chat_id: CHAT,
        initiator_id: 1,
        initiator_message_id: reported_message_id + 1,
        offender_id,
        reported_message_id,
        initiator_privileged,
        at: Utc::now(),
    }
}

fn cast_vote(voter_id: i64, prompt_message_id: i64, voter_privileged: bool) -> CastVote {
    CastVote {
        chat_id: CHAT,
        voter_id,
        prompt_message_id,
        voter_privileged,
        at: Utc::now(),
    }
}

#[tokio::test]
async fn test_concurrent_membership_requests_share_one_record() {
    let ctx = TestContext::new().await;

    let requests = (0..32).map(|_| ctx.store.membership(CHAT, 42));
    let memberships = join_all(requests).await;

    let first = memberships[0].as_ref().unwrap().id;
    assert!(memberships.iter().all(|m| m.as_ref().unwrap().id == first));
    assert_eq!(ctx.count("memberships").await, 1);
    assert_eq!(ctx.count("members").await, 1);
    assert_eq!(ctx.count("chat_groups").await, 1);
}

#[tokio::test]
async fn test_concurrent_report_case_requests_create_once() {
    let ctx = TestContext::new().await;
    let now = Utc::now();

    let requests = (0..16i64).map(|i| ctx.store.report_case(CHAT, 7, 300, 301 + i, now));
    let results = join_all(requests).await;

    let created = results.iter().filter(|r| r.as_ref().unwrap().1).count();
    assert_eq!(created, 1);
    assert_eq!(ctx.count("report_cases").await, 1);

    let (case, _) = results[0].as_ref().unwrap();
    assert_eq!(case.status, ReportStatus::Open);
    assert!((301..317).contains(&case.initiator_message_id));
    assert!(case.votes.is_empty());
    assert_eq!(case.prompt_message_id, None);
}

#[tokio::test]
async fn test_new_group_uses_defaults() {
    let ctx = TestContext::new().await;
    let group = ctx.store.group(CHAT).await.unwrap();
    assert_eq!(group.vote_threshold, DEFAULT_VOTE_THRESHOLD);
    assert_eq!(group.cooldown_minutes, 10080);
    assert_eq!(group.min_messages_for_vote_power, 20);
}

#[tokio::test]
async fn test_record_message_counts_and_stamps_first_message() {
    let ctx = TestContext::new().await;
    let before = Utc::now();

    let first = ctx.store.record_message(CHAT, 9, before).await.unwrap();
    assert_eq!(first.message_count, 1);
    assert_eq!(first.first_message_at, Some(before));

    let later = before + Duration::minutes(5);
    let second = ctx.store.record_message(CHAT, 9, later).await.unwrap();
    assert_eq!(second.message_count, 2);
    assert_eq!(second.first_message_at, Some(before));

    ctx.store.record_message(CHAT - 1, 9, later).await.unwrap();
    let member = ctx.store.member(9).await.unwrap();
    assert_eq!(member.message_count, 3);
}

#[tokio::test]
async fn test_vote_power_follows_cooldown() {
    let ctx = TestContext::new().await;
    ctx.store
        .update_group_setting(CHAT, GroupSetting::MinMessagesForVotePower(2))
        .await
        .unwrap();
    let group = ctx
        .store
        .update_group_setting(CHAT, GroupSetting::CooldownMinutes(60))
        .await
        .unwrap();

    let start = Utc::now();
    let membership = ctx.store.record_message(CHAT, 5, start).await.unwrap();
    assert!(!has_vote_power(&membership, &group, start + Duration::days(30)));

    let membership = ctx.store.record_message(CHAT, 5, start).await.unwrap();
    assert!(!has_vote_power(&membership, &group, start + Duration::minutes(59)));
    assert!(has_vote_power(&membership, &group, start + Duration::minutes(60)));
}

#[tokio::test]
async fn test_unwritten_membership_never_has_vote_power() {
    let ctx = TestContext::new().await;
    let group = ctx
        .store
        .update_group_setting(CHAT, GroupSetting::CooldownMinutes(0))
        .await
        .unwrap();
    let membership = ctx.store.membership(CHAT, 8).await.unwrap();
    assert_eq!(membership.first_message_at, None);
    assert!(!has_vote_power(&membership, &group, Utc::now()));
}

#[tokio::test]
async fn test_votes_are_persisted_and_toggled() {
    let ctx = TestContext::new().await;
    ctx.open_voting(CHAT, 3).await;
    ctx.store.record_message(CHAT, 20, Utc::now()).await.unwrap();

    let OpenReportOutcome::Opened(context) = ctx.store.open_report(open_report(7, 100, false)).await.unwrap() else {
        panic!("expected a new open case");
    };
    assert!(ctx.store.attach_prompt(context.case.id, 900).await.unwrap());

    let outcome = ctx.store.cast_vote(cast_vote(20, 900, false)).await.unwrap();
    assert_matches!(
        outcome,
        CastVoteOutcome::Applied { outcome: VoteOutcome::Counted { total: 1, .. }, .. }
    );
    assert_eq!(ctx.count("report_votes").await, 1);

    let outcome = ctx.store.cast_vote(cast_vote(20, 900, false)).await.unwrap();
    assert_matches!(
        outcome,
        CastVoteOutcome::Applied { outcome: VoteOutcome::Counted { total: 0, .. }, .. }
    );
    assert_eq!(ctx.count("report_votes").await, 0);

    let case = ctx.store.find_case(context.case.id).await.unwrap().unwrap();
    assert_eq!(case.status, ReportStatus::Open);
    assert!(case.votes.is_empty());
}

#[tokio::test]
async fn test_vote_without_power_is_not_persisted() {
    let ctx = TestContext::new().await;
    let OpenReportOutcome::Opened(context) = ctx.store.open_report(open_report(7, 100, false)).await.unwrap() else {
        panic!("expected a new open case");
    };
    assert!(ctx.store.attach_prompt(context.case.id, 900).await.unwrap());

    let outcome = ctx.store.cast_vote(cast_vote(20, 900, false)).await.unwrap();
    assert_matches!(
        outcome,
        CastVoteOutcome::Applied { outcome: VoteOutcome::Ignored(IgnoreReason::NoVotePower), .. }
    );
    assert_eq!(ctx.count("report_votes").await, 0);
}

#[tokio::test]
async fn test_privileged_report_is_accepted_without_votes() {
    let ctx = TestContext::new().await;
    let outcome = ctx.store.open_report(open_report(7, 100, true)).await.unwrap();

    let context = assert_matches!(outcome, OpenReportOutcome::Accepted(context) => context);
    assert_eq!(context.case.status, ReportStatus::Accepted);
    assert!(context.case.votes.is_empty());
    assert_eq!(context.case.prompt_message_id, None);

    let again = ctx.store.open_report(open_report(7, 100, true)).await.unwrap();
    assert_matches!(again, OpenReportOutcome::AlreadyClosed(_));
    assert_eq!(ctx.count("report_cases").await, 1);
}

#[tokio::test]
async fn test_repeat_report_reuses_open_case() {
    let ctx = TestContext::new().await;
    let OpenReportOutcome::Opened(context) = ctx.store.open_report(open_report(7, 100, false)).await.unwrap() else {
        panic!("expected a new open case");
    };

    // Until a prompt is attached the case keeps asking for one
    let again = ctx.store.open_report(open_report(7, 100, false)).await.unwrap();
    let retry = assert_matches!(again, OpenReportOutcome::Opened(retry) => retry);
    assert_eq!(retry.case.id, context.case.id);

    assert!(ctx.store.attach_prompt(context.case.id, 900).await.unwrap());
    assert!(!ctx.store.attach_prompt(context.case.id, 901).await.unwrap());

    let again = ctx.store.open_report(open_report(7, 100, false)).await.unwrap();
    let open = assert_matches!(again, OpenReportOutcome::AlreadyOpen(open) => open);
    assert_eq!(open.case.prompt_message_id, Some(900));

    let by_admin = ctx.store.open_report(open_report(7, 100, true)).await.unwrap();
    let context = assert_matches!(by_admin, OpenReportOutcome::Accepted(context) => context);
    assert_eq!(context.case.status, ReportStatus::Accepted);
    assert_eq!(ctx.count("report_cases").await, 1);
}

#[tokio::test]
async fn test_acceptance_happens_once() {
    let ctx = TestContext::new().await;
    ctx.open_voting(CHAT, 1).await;
    for voter in [20, 21] {
        ctx.store.record_message(CHAT, voter, Utc::now()).await.unwrap();
    }
    let OpenReportOutcome::Opened(context) = ctx.store.open_report(open_report(7, 100, false)).await.unwrap() else {
        panic!("expected a new open case");
    };
    assert!(ctx.store.attach_prompt(context.case.id, 900).await.unwrap());

    let (first, second, admin) = tokio::join!(
        ctx.store.cast_vote(cast_vote(20, 900, false)),
        ctx.store.cast_vote(cast_vote(21, 900, false)),
        ctx.store.cast_vote(cast_vote(22, 900, true)),
    );
    let accepted = [first.unwrap(), second.unwrap(), admin.unwrap()]
        .into_iter()
        .filter(|o| matches!(o, CastVoteOutcome::Applied { outcome: VoteOutcome::Accepted { .. }, .. }))
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(ctx.case_status(100).await.as_deref(), Some("accepted"));
}

#[tokio::test]
async fn test_huge_cooldown_keeps_the_store_running() {
    let ctx = TestContext::new().await;
    ctx.open_voting(CHAT, 2).await;
    ctx.store
        .update_group_setting(CHAT, GroupSetting::CooldownMinutes(100_000_000_000_000))
        .await
        .unwrap();
    ctx.store.record_message(CHAT, 20, Utc::now()).await.unwrap();

    let OpenReportOutcome::Opened(context) = ctx.store.open_report(open_report(7, 100, false)).await.unwrap() else {
        panic!("expected a new open case");
    };
    assert!(ctx.store.attach_prompt(context.case.id, 900).await.unwrap());

    let outcome = ctx.store.cast_vote(cast_vote(20, 900, false)).await.unwrap();
    assert_matches!(
        outcome,
        CastVoteOutcome::Applied { outcome: VoteOutcome::Ignored(IgnoreReason::NoVotePower), .. }
    );

    assert!(!ctx.worker.is_finished());
    assert_eq!(ctx.store.member(20).await.unwrap().message_count, 1);
}

#[tokio::test]
async fn test_prompt_is_not_attached_to_a_closed_case() {
    let ctx = TestContext::new().await;
    let OpenReportOutcome::Accepted(context) = ctx.store.open_report(open_report(7, 100, true)).await.unwrap() else {
        panic!("expected an accepted case");
    };
    assert!(!ctx.store.attach_prompt(context.case.id, 900).await.unwrap());
    assert_eq!(ctx.store.cast_vote(cast_vote(20, 900, true)).await.unwrap(), CastVoteOutcome::UnknownCase);
}

#[tokio::test]
async fn test_unknown_prompt_is_reported() {
    let ctx = TestContext::new().await;
    let outcome = ctx.store.cast_vote(cast_vote(20, 12345, true)).await.unwrap();
    assert_eq!(outcome, CastVoteOutcome::UnknownCase);
}

#[tokio::test]
async fn test_prompt_lookup_is_scoped_to_the_chat() {
    let ctx = TestContext::new().await;
    let OpenReportOutcome::Opened(context) = ctx.store.open_report(open_report(7, 100, false)).await.unwrap() else {
        panic!("expected a new open case");
    };
    assert!(ctx.store.attach_prompt(context.case.id, 900).await.unwrap());

    let mut elsewhere = cast_vote(20, 900, true);
    elsewhere.chat_id = CHAT - 1;
    assert_eq!(ctx.store.cast_vote(elsewhere).await.unwrap(), CastVoteOutcome::UnknownCase);
}

#[tokio::test]
async fn test_confirm_removal_marks_ban() {
    let ctx = TestContext::new().await;
    let membership = ctx.store.membership(CHAT, 7).await.unwrap();

    let member = ctx.store.confirm_removal(membership.id, 7).await.unwrap();
    assert_eq!(member.accepted_reports, 1);
    assert!(ctx.store.membership(CHAT, 7).await.unwrap().banned);
}

#[tokio::test]
async fn test_requests_fail_once_the_worker_is_gone() {
    let TestContext { store, worker, .. } = TestContext::new().await;
    worker.abort();
    let _ = worker.await;

    let result = store.member(1).await;
    assert_matches!(result, Err(ReportBotError::StoreClosed));
}
