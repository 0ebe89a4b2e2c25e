mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use common::{BATCH_TX, Harness, contract, init_tracing, open_window};
use vigil_ledger::{LedgerError, RelayReply, verify_payload};
use vigil_primitives::{Interaction, LocalRecord, VoteId};
use vigil_state::ReadMode;
use vigil_storage::MemoryReceiptStore;
use vigil_storage_redb::RedbReceiptStore;
use vigil_test_utils::StateBuilder;
use vigil_vote::{VoteCoordinator, VoteError, VoteOutcome};

const VOTE: VoteId = VoteId::new(7);

async fn restored(harness: &Harness) -> VoteCoordinator {
    let coordinator = VoteCoordinator::new(harness.services(ReadMode::Cached));
    coordinator.restore().await.unwrap();
    coordinator
}

#[tokio::test]
async fn relayed_vote_is_accepted_and_receipt_kept() {
    init_tracing();
    let harness = Harness::new(open_window().build());
    let coordinator = restored(&harness).await;
    assert_eq!(coordinator.total_voted().await.unwrap(), 6);

    let outcome = coordinator.submit_vote(VOTE, false).await.unwrap();

    let receipt = assert_matches!(outcome, VoteOutcome::Accepted(receipt) => receipt);
    assert_eq!(receipt.vote_id(), Some(VOTE));
    assert_eq!(coordinator.total_voted().await.unwrap(), 7);
    assert_eq!(coordinator.receipts().await.unwrap(), vec![receipt]);

    let submissions = harness.relay.submissions();
    assert_eq!(submissions.len(), 1);
    let payload = &submissions[0];
    assert_eq!(payload.vote.vote_id, VOTE);
    assert_eq!(payload.vote.user_vote, "true");
    assert_eq!(payload.sender_address, harness.wallet());
    assert!(verify_payload(payload).unwrap());

    let stored = harness.store.load(&harness.wallet()).unwrap().unwrap();
    assert_eq!(stored.total_voted, 7);
    assert_eq!(stored.receipts.len(), 1);
}

#[tokio::test]
async fn mismatching_payload_votes_false() {
    let harness = Harness::new(open_window().build());
    harness
        .transactions
        .insert(BATCH_TX, r#"{"tx1":41,"tx2":{"bytes":1024,"views":3}}"#.to_string());
    let coordinator = restored(&harness).await;

    let outcome = coordinator.submit_vote(VOTE, false).await.unwrap();

    assert_matches!(outcome, VoteOutcome::Accepted(_));
    assert_eq!(harness.relay.submissions()[0].vote.user_vote, "false");
}

#[tokio::test]
async fn unparseable_payload_votes_false() {
    let harness = Harness::new(open_window().build());
    harness.transactions.insert(BATCH_TX, "not json at all");
    let coordinator = restored(&harness).await;

    coordinator.submit_vote(VOTE, false).await.unwrap();

    assert_eq!(harness.relay.submissions()[0].vote.user_vote(), Some(false));
}

#[tokio::test]
async fn expired_window_is_counted_without_submitting() {
    let harness = Harness::new(open_window().build());
    let coordinator = restored(&harness).await;

    let outcome = coordinator.submit_vote(VoteId::new(99), false).await.unwrap();

    assert_eq!(outcome, VoteOutcome::WindowExpired);
    assert_eq!(coordinator.total_voted().await.unwrap(), 7);
    assert!(harness.relay.submissions().is_empty());
    assert_eq!(harness.gateway.calls(), 0);
}

#[tokio::test]
async fn batch_outside_window_is_expired() {
    let state = StateBuilder::new()
        .window(100, 200)
        .batch(7, 201, BATCH_TX)
        .build();
    let harness = Harness::new(state);
    let coordinator = restored(&harness).await;

    assert_eq!(
        coordinator.submit_vote(VOTE, false).await.unwrap(),
        VoteOutcome::WindowExpired
    );
}

#[tokio::test]
async fn second_vote_is_duplicate_and_still_counted() {
    let harness = Harness::new(open_window().build());
    let coordinator = restored(&harness).await;

    assert_matches!(
        coordinator.submit_vote(VOTE, false).await.unwrap(),
        VoteOutcome::Accepted(_)
    );
    assert_eq!(
        coordinator.submit_vote(VOTE, false).await.unwrap(),
        VoteOutcome::DuplicatedVote
    );

    assert_eq!(coordinator.total_voted().await.unwrap(), 8);
    assert_eq!(coordinator.receipts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn direct_vote_uses_boolean_interaction() {
    let harness = Harness::new(open_window().build());
    let coordinator = restored(&harness).await;

    let outcome = coordinator.submit_vote(VOTE, true).await.unwrap();

    let tx = assert_matches!(outcome, VoteOutcome::JustVoted(tx) => tx);
    assert_eq!(tx.as_str(), "tx-1");
    assert_eq!(
        harness.writer.interactions(),
        vec![(
            contract(),
            Interaction::Vote {
                vote_id: VOTE,
                user_vote: true
            }
        )]
    );
    assert!(harness.relay.submissions().is_empty());
    assert_eq!(coordinator.total_voted().await.unwrap(), 7);
    assert!(coordinator.receipts().await.unwrap().is_empty());
}

#[tokio::test]
async fn direct_vote_without_writer_fails() {
    let harness = Harness::new(open_window().build());
    let coordinator = VoteCoordinator::new(harness.services_without_writer(ReadMode::Cached));
    coordinator.restore().await.unwrap();

    assert_matches!(
        coordinator.submit_vote(VOTE, true).await,
        Err(VoteError::DirectVotingUnavailable)
    );
    assert_eq!(coordinator.total_voted().await.unwrap(), 6);
}

#[tokio::test]
async fn vote_before_restore_is_unavailable() {
    let harness = Harness::new(open_window().build());
    let coordinator = VoteCoordinator::new(harness.services(ReadMode::Cached));

    assert_matches!(
        coordinator.submit_vote(VOTE, false).await,
        Err(VoteError::StoreUnavailable(wallet)) if wallet == harness.wallet()
    );
    assert_matches!(
        coordinator.total_voted().await,
        Err(VoteError::StoreUnavailable(_))
    );
    assert_eq!(harness.gateway.calls(), 0);
    assert!(harness.store.load(&harness.wallet()).unwrap().is_none());
}

#[tokio::test]
async fn transport_failure_is_not_counted() {
    let harness = Harness::new(open_window().build());
    let coordinator = restored(&harness).await;

    harness.relay.fail_with_status(502);
    assert_matches!(
        coordinator.submit_vote(VOTE, false).await,
        Err(VoteError::Ledger(LedgerError::Status { status: 502, .. }))
    );

    harness.gateway.set_failing(true);
    assert_matches!(
        coordinator.submit_vote(VOTE, false).await,
        Err(VoteError::Ledger(_))
    );

    assert_eq!(coordinator.total_voted().await.unwrap(), 6);
}

#[tokio::test]
async fn missing_batch_payload_is_not_counted() {
    let harness = Harness::new(open_window().batch(8, 160, "unknown-tx").build());
    let coordinator = restored(&harness).await;

    assert_matches!(
        coordinator.submit_vote(VoteId::new(8), false).await,
        Err(VoteError::Ledger(LedgerError::Status { status: 404, .. }))
    );
    assert_eq!(coordinator.total_voted().await.unwrap(), 6);
}

#[tokio::test]
async fn unknown_replies_pass_through() {
    let harness = Harness::new(open_window().build());
    let coordinator = restored(&harness).await;

    harness
        .relay
        .respond_with(RelayReply::Other("rate limited".into()));
    assert_eq!(
        coordinator.submit_vote(VOTE, false).await.unwrap(),
        VoteOutcome::Passthrough("rate limited".into())
    );

    harness.relay.respond_with(RelayReply::Success(None));
    assert_eq!(
        coordinator.submit_vote(VOTE, false).await.unwrap(),
        VoteOutcome::Passthrough("success".into())
    );

    assert_eq!(coordinator.total_voted().await.unwrap(), 8);
    assert!(coordinator.receipts().await.unwrap().is_empty());
}

#[tokio::test]
async fn first_matching_batch_wins() {
    let state = open_window().batch(7, 160, "tx-other").build();
    let harness = Harness::new(state);
    harness.transactions.insert("tx-other", "{}");
    let coordinator = restored(&harness).await;

    coordinator.submit_vote(VOTE, false).await.unwrap();

    // The first batch carries the matching payload.
    assert_eq!(harness.relay.submissions()[0].vote.user_vote, "true");
}

#[tokio::test]
async fn pending_votes_are_submitted_in_order() {
    let state = open_window()
        .batch(8, 170, BATCH_TX)
        .batch(7, 180, BATCH_TX)
        .build();
    let harness = Harness::new(state);
    let coordinator = restored(&harness).await;

    assert_eq!(
        coordinator.pending_votes().await.unwrap(),
        vec![VoteId::new(7), VoteId::new(8)]
    );

    let outcomes = coordinator.submit_pending(false).await.unwrap();
    let ids: Vec<_> = outcomes.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![VoteId::new(7), VoteId::new(8)]);
    assert!(
        outcomes
            .iter()
            .all(|(_, outcome)| matches!(outcome, VoteOutcome::Accepted(_)))
    );

    assert_eq!(coordinator.total_voted().await.unwrap(), 8);
    assert!(coordinator.pending_votes().await.unwrap().is_empty());
}

#[tokio::test]
async fn submit_pending_stops_at_first_failure() {
    let harness = Harness::new(open_window().batch(8, 170, BATCH_TX).build());
    let coordinator = restored(&harness).await;
    harness.relay.fail_with_status(500);

    assert_matches!(
        coordinator.submit_pending(false).await,
        Err(VoteError::Ledger(_))
    );
    assert_eq!(harness.relay.submissions().len(), 1);
}

#[tokio::test]
async fn existing_journal_is_restored_unchanged() {
    let harness = Harness::new(open_window().build());
    let store = Arc::new(MemoryReceiptStore::with_records([(
        harness.wallet(),
        LocalRecord::new(20),
    )]));
    let harness = Harness {
        store: store.clone(),
        ..harness
    };

    let coordinator = restored(&harness).await;

    assert_eq!(coordinator.total_voted().await.unwrap(), 20);
    assert!(coordinator.pending_votes().await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_votes_are_all_counted() {
    let harness = Harness::new(open_window().build());
    let coordinator = restored(&harness).await;

    let votes = (0..10).map(|_| coordinator.submit_vote(VOTE, false));
    let outcomes = futures::future::join_all(votes).await;

    let accepted = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Ok(VoteOutcome::Accepted(_))))
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(coordinator.total_voted().await.unwrap(), 16);
    assert_eq!(
        harness
            .store
            .load(&harness.wallet())
            .unwrap()
            .unwrap()
            .total_voted,
        16
    );
}

#[tokio::test]
async fn journal_survives_restart_with_redb() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.redb");

    let harness = Harness::with_store(
        open_window().build(),
        Arc::new(RedbReceiptStore::open(&path).unwrap()),
    );
    let coordinator = restored(&harness).await;
    coordinator.submit_vote(VOTE, false).await.unwrap();
    let receipts = coordinator.receipts().await.unwrap();

    // redb refuses a second open while the first handle is alive.
    drop(coordinator);
    drop(harness.store);

    let harness = Harness {
        store: Arc::new(RedbReceiptStore::open(&path).unwrap()),
        ..harness
    };
    let coordinator = restored(&harness).await;

    assert_eq!(coordinator.total_voted().await.unwrap(), 7);
    assert_eq!(coordinator.receipts().await.unwrap(), receipts);
}
