//! Entity store
//!
//! A single worker task owns the database service and executes requests one
//! at a time, in arrival order. Handlers talk to it through a cloneable
//! [`EntityStore`] handle, so no two read-modify-write sequences ever
//! interleave and find-or-create can never produce duplicates.

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::database::{CastVote, CastVoteOutcome, DatabaseService, OpenReport, OpenReportOutcome};
use crate::models::{Group, GroupSetting, Member, Membership, ReportCase};
use crate::utils::errors::{ReportBotError, Result};

/// Pending requests the worker buffers before senders wait
const STORE_QUEUE_CAPACITY: usize = 256;

type Reply<T> = oneshot::Sender<Result<T>>;

enum StoreRequest {
    Member {
        member_id: i64,
        reply: Reply<Member>,
    },
    Group {
        group_id: i64,
        reply: Reply<Group>,
    },
    Membership {
        group_id: i64,
        member_id: i64,
        reply: Reply<Membership>,
    },
    ReportCase {
        group_id: i64,
        member_id: i64,
        reported_message_id: i64,
        initiator_message_id: i64,
        at: DateTime<Utc>,
        reply: Reply<(ReportCase, bool)>,
    },
    FindCase {
        case_id: i64,
        reply: Reply<Option<ReportCase>>,
    },
    RecordMessage {
        group_id: i64,
        member_id: i64,
        at: DateTime<Utc>,
        reply: Reply<Membership>,
    },
    OpenReport {
        request: OpenReport,
        reply: Reply<OpenReportOutcome>,
    },
    AttachPrompt {
        case_id: i64,
        prompt_message_id: i64,
        reply: Reply<bool>,
    },
    CastVote {
        request: CastVote,
        reply: Reply<CastVoteOutcome>,
    },
    ConfirmRemoval {
        membership_id: i64,
        member_id: i64,
        reply: Reply<Member>,
    },
    UpdateGroupSetting {
        group_id: i64,
        setting: GroupSetting,
        reply: Reply<Group>,
    },
}

/// Handle to the store worker
#[derive(Clone, Debug)]
pub struct EntityStore {
    sender: mpsc::Sender<StoreRequest>,
}

impl std::fmt::Debug for StoreRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StoreRequest::Member { .. } => "Member",
            StoreRequest::Group { .. } => "Group",
            StoreRequest::Membership { .. } => "Membership",
            StoreRequest::ReportCase { .. } => "ReportCase",
            StoreRequest::FindCase { .. } => "FindCase",
            StoreRequest::RecordMessage { .. } => "RecordMessage",
            StoreRequest::OpenReport { .. } => "OpenReport",
            StoreRequest::AttachPrompt { .. } => "AttachPrompt",
            StoreRequest::CastVote { .. } => "CastVote",
            StoreRequest::ConfirmRemoval { .. } => "ConfirmRemoval",
            StoreRequest::UpdateGroupSetting { .. } => "UpdateGroupSetting",
        };
        f.write_str(name)
    }
}

impl EntityStore {
    /// Spawn the worker on the current runtime.
    ///
    /// The worker stops once every handle has been dropped.
    pub fn spawn(database: DatabaseService) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(STORE_QUEUE_CAPACITY);
        let worker = tokio::spawn(run_worker(database, receiver));
        info!("Entity store worker started");
        (Self { sender }, worker)
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> StoreRequest) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| ReportBotError::StoreClosed)?;
        response.await.map_err(|_| ReportBotError::StoreClosed)?
    }

    pub async fn member(&self, member_id: i64) -> Result<Member> {
        self.request(|reply| StoreRequest::Member { member_id, reply }).await
    }

    pub async fn group(&self, group_id: i64) -> Result<Group> {
        self.request(|reply| StoreRequest::Group { group_id, reply }).await
    }

    pub async fn membership(&self, group_id: i64, member_id: i64) -> Result<Membership> {
        self.request(|reply| StoreRequest::Membership { group_id, member_id, reply })
            .await
    }

    /// Find or create the case for a reported message; `true` when created
    pub async fn report_case(
        &self,
        group_id: i64,
        member_id: i64,
        reported_message_id: i64,
        initiator_message_id: i64,
        at: DateTime<Utc>,
    ) -> Result<(ReportCase, bool)> {
        self.request(|reply| StoreRequest::ReportCase {
            group_id,
            member_id,
            reported_message_id,
            initiator_message_id,
            at,
            reply,
        })
        .await
    }

    pub async fn find_case(&self, case_id: i64) -> Result<Option<ReportCase>> {
        self.request(|reply| StoreRequest::FindCase { case_id, reply }).await
    }

    pub async fn record_message(&self, group_id: i64, member_id: i64, at: DateTime<Utc>) -> Result<Membership> {
        self.request(|reply| StoreRequest::RecordMessage { group_id, member_id, at, reply })
            .await
    }

    pub async fn open_report(&self, request: OpenReport) -> Result<OpenReportOutcome> {
        self.request(|reply| StoreRequest::OpenReport { request, reply }).await
    }

    /// Whether the prompt was recorded on the case
    pub async fn attach_prompt(&self, case_id: i64, prompt_message_id: i64) -> Result<bool> {
        self.request(|reply| StoreRequest::AttachPrompt { case_id, prompt_message_id, reply })
            .await
    }

    pub async fn cast_vote(&self, request: CastVote) -> Result<CastVoteOutcome> {
        self.request(|reply| StoreRequest::CastVote { request, reply }).await
    }

    pub async fn confirm_removal(&self, membership_id: i64, member_id: i64) -> Result<Member> {
        self.request(|reply| StoreRequest::ConfirmRemoval { membership_id, member_id, reply })
            .await
    }

    pub async fn update_group_setting(&self, group_id: i64, setting: GroupSetting) -> Result<Group> {
        self.request(|reply| StoreRequest::UpdateGroupSetting { group_id, setting, reply })
            .await
    }
}

async fn run_worker(database: DatabaseService, mut receiver: mpsc::Receiver<StoreRequest>) {
    while let Some(request) = receiver.recv().await {
        debug!(request = ?request, "Store request received");
        handle_request(&database, request).await;
    }
    info!("Entity store worker stopped");
}

async fn handle_request(db: &DatabaseService, request: StoreRequest) {
    match request {
        StoreRequest::Member { member_id, reply } => {
            respond(reply, db.member(member_id).await);
        }
        StoreRequest::Group { group_id, reply } => {
            respond(reply, db.group(group_id).await);
        }
        StoreRequest::Membership { group_id, member_id, reply } => {
            respond(reply, db.membership(group_id, member_id).await);
        }
        StoreRequest::ReportCase {
            group_id,
            member_id,
            reported_message_id,
            initiator_message_id,
            at,
            reply,
        } => {
            let result = db
                .report_case(group_id, member_id, reported_message_id, initiator_message_id, at)
                .await;
            respond(reply, result);
        }
        StoreRequest::FindCase { case_id, reply } => {
            respond(reply, db.find_case(case_id).await);
        }
        StoreRequest::RecordMessage { group_id, member_id, at, reply } => {
            respond(reply, db.record_message(group_id, member_id, at).await);
        }
        StoreRequest::OpenReport { request, reply } => {
            respond(reply, db.open_report(request).await);
        }
        StoreRequest::AttachPrompt { case_id, prompt_message_id, reply } => {
            respond(reply, db.attach_prompt(case_id, prompt_message_id).await);
        }
        StoreRequest::CastVote { request, reply } => {
            respond(reply, db.cast_vote(request).await);
        }
        StoreRequest::ConfirmRemoval { membership_id, member_id, reply } => {
            respond(reply, db.confirm_removal(membership_id, member_id).await);
        }
        StoreRequest::UpdateGroupSetting { group_id, setting, reply } => {
            respond(reply, db.update_group_setting(group_id, setting).await);
        }
    }
}

fn respond<T>(reply: Reply<T>, result: Result<T>) {
    if let Err(Err(e)) = reply.send(result) {
        warn!(error = %e, "Store request failed after its caller went away");
    }
}
