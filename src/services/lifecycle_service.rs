use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::database::store::LifecycleStore;
use crate::error::{Error, Result};
use crate::middleware::auth::Actor;
use crate::middleware::ownership::{Authorization, OwnershipResolver};
use crate::models::job_record::{DeletionState, JobRecord, JobRecordSummary};
use crate::models::trash_entry::TrashView;

/// Drives job records between active and trashed.
///
/// Every transition runs inside a single unit of work, so the flag on the job
/// record and the trash ledger are always committed together: a ledger entry
/// exists exactly when the record is trashed.
#[derive(Clone)]
pub struct LifecycleService {
    store: Arc<dyn LifecycleStore>,
    resolver: Arc<dyn OwnershipResolver>,
}

impl LifecycleService {
    pub fn new(store: Arc<dyn LifecycleStore>, resolver: Arc<dyn OwnershipResolver>) -> Self {
        Self { store, resolver }
    }

    /// Moves a record to `target` on behalf of `actor`.
    ///
    /// Trashing is open to the owner and to admins. Bringing a record back is
    /// admin-only, whichever route the request came through.
    pub async fn change_state(
        &self,
        actor: &Actor,
        job_record_id: i64,
        target: DeletionState,
    ) -> Result<JobRecord> {
        match target {
            DeletionState::Trashed => self.soft_delete(actor, job_record_id).await,
            DeletionState::Active => self.restore_record(actor, job_record_id).await,
        }
    }

    #[instrument(skip(self, actor), fields(actor = actor.user_id))]
    pub async fn soft_delete(&self, actor: &Actor, job_record_id: i64) -> Result<JobRecord> {
        self.authorize(actor, job_record_id).await?;

        let mut uow = self.store.begin().await?;
        let record = uow
            .set_deletion_state(job_record_id, DeletionState::Trashed)
            .await?;
        let inserted = uow.insert_if_absent(job_record_id).await?;
        uow.commit().await?;

        info!(job_record_id, new_entry = inserted, "job record moved to trash");
        Ok(record)
    }

    #[instrument(skip(self, actor), fields(actor = actor.user_id))]
    pub async fn restore_record(&self, actor: &Actor, job_record_id: i64) -> Result<JobRecord> {
        if self.authorize(actor, job_record_id).await? != Authorization::Admin {
            return Err(forbidden());
        }

        let mut uow = self.store.begin().await?;
        let record = uow.get(job_record_id).await?;
        if !record.is_trashed() {
            return Err(not_in_trash(job_record_id));
        }
        let restored = uow
            .set_deletion_state(job_record_id, DeletionState::Active)
            .await?;
        if uow.remove_by_job_record_id(job_record_id).await? == 0 {
            return Err(lost_race(job_record_id));
        }
        uow.commit().await?;

        info!(job_record_id, "job record restored");
        Ok(restored)
    }

    #[instrument(skip(self, actor), fields(actor = actor.user_id))]
    pub async fn restore(&self, actor: &Actor, trash_entry_id: i64) -> Result<JobRecordSummary> {
        require_admin(actor)?;

        let mut uow = self.store.begin().await?;
        let entry = uow.get_by_entry_id(trash_entry_id).await?;
        let record = uow.get(entry.job_record_id).await?;
        if !record.is_trashed() {
            return Err(not_in_trash(record.id));
        }
        let restored = uow
            .set_deletion_state(record.id, DeletionState::Active)
            .await?;
        if uow.remove_by_entry_id(entry.id).await? == 0 {
            return Err(lost_race(record.id));
        }
        uow.commit().await?;

        info!(trash_entry_id, job_record_id = record.id, "job record restored");
        Ok(restored.into())
    }

    #[instrument(skip(self, actor), fields(actor = actor.user_id))]
    pub async fn hard_delete(&self, actor: &Actor, trash_entry_id: i64) -> Result<()> {
        require_admin(actor)?;

        let mut uow = self.store.begin().await?;
        let entry = uow.get_by_entry_id(trash_entry_id).await?;
        let record = uow.get(entry.job_record_id).await?;
        if !record.is_trashed() {
            return Err(not_in_trash(record.id));
        }
        uow.hard_delete(record.id).await?;
        if uow.remove_by_entry_id(entry.id).await? == 0 {
            return Err(lost_race(record.id));
        }
        uow.commit().await?;

        info!(trash_entry_id, job_record_id = record.id, "job record permanently deleted");
        Ok(())
    }

    pub async fn list_trash(&self, actor: &Actor) -> Result<Vec<TrashView>> {
        require_admin(actor)?;
        let mut uow = self.store.begin().await?;
        let items = uow.list().await?;
        uow.commit().await?;
        Ok(items)
    }

    pub async fn list_trashed(&self, actor: &Actor) -> Result<Vec<JobRecordSummary>> {
        require_admin(actor)?;
        let mut uow = self.store.begin().await?;
        let items = uow.list_trashed().await?;
        uow.commit().await?;
        Ok(items)
    }

    async fn authorize(&self, actor: &Actor, job_record_id: i64) -> Result<Authorization> {
        let decision = self.resolver.authorize(actor, job_record_id).await?;
        if !decision.is_allowed() {
            debug!(job_record_id, "actor does not own job record");
            return Err(forbidden());
        }
        Ok(decision)
    }
}

fn require_admin(actor: &Actor) -> Result<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(forbidden())
    }
}

fn forbidden() -> Error {
    Error::Forbidden("Forbidden".to_string())
}

fn not_in_trash(job_record_id: i64) -> Error {
    warn!(job_record_id, "transition requires a trashed job record");
    Error::Conflict("Job record is not in the trash".to_string())
}

// The guarded ledger row vanished between our read and our delete.
fn lost_race(job_record_id: i64) -> Error {
    warn!(job_record_id, "trash entry removed by a concurrent request");
    Error::Conflict("Job record was modified concurrently".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::{fixtures::job_record, MemoryStore};
    use crate::database::store::LifecycleStore;
    use crate::middleware::ownership::MockOwnershipResolver;
    use crate::models::user::Role;
    use tokio_test::{assert_err, assert_ok};

    const ADMIN: Actor = Actor {
        user_id: 1,
        role: Role::Admin,
    };

    fn service(store: &MemoryStore) -> LifecycleService {
        LifecycleService::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    async fn seeded(records: &[(i64, i64)]) -> MemoryStore {
        let store = MemoryStore::new();
        for &(id, alumni_id) in records {
            store.put_job_record(job_record(id, alumni_id)).await;
        }
        store
    }

    async fn trash_size(store: &MemoryStore) -> usize {
        let mut uow = store.begin().await.unwrap();
        uow.list().await.unwrap().len()
    }

    #[tokio::test]
    async fn soft_delete_twice_keeps_single_entry() {
        let store = seeded(&[(1, 1)]).await;
        let svc = service(&store);

        let first = assert_ok!(svc.soft_delete(&ADMIN, 1).await);
        let second = assert_ok!(svc.soft_delete(&ADMIN, 1).await);

        assert_eq!(first.deletion_state, DeletionState::Trashed);
        assert_eq!(second.deletion_state, DeletionState::Trashed);
        assert_eq!(store.trash_entries().await.len(), 1);
    }

    #[tokio::test]
    async fn restoring_active_record_conflicts_without_writes() {
        let store = seeded(&[(1, 1)]).await;
        let svc = service(&store);
        let before = store.job_record(1).await.unwrap();

        let err = assert_err!(svc.restore_record(&ADMIN, 1).await);
        assert!(matches!(err, Error::Conflict(_)));

        let err = assert_err!(svc.restore(&ADMIN, 1).await);
        assert!(matches!(err, Error::NotFound(_)));

        assert_eq!(store.job_record(1).await.unwrap(), before);
        assert!(store.trash_entries().await.is_empty());
    }

    #[tokio::test]
    async fn hard_delete_is_all_or_nothing() {
        let store = seeded(&[(1, 1)]).await;
        let svc = service(&store);
        svc.soft_delete(&ADMIN, 1).await.unwrap();
        let entry_id = store.trash_entries().await[0].id;

        store.fail_next_ledger_removal();
        let err = assert_err!(svc.hard_delete(&ADMIN, entry_id).await);
        assert!(matches!(err, Error::Database(_)));

        let record = store.job_record(1).await.expect("record survives failed purge");
        assert_eq!(record.deletion_state, DeletionState::Trashed);
        assert_eq!(store.trash_entries().await.len(), 1);

        assert_ok!(svc.hard_delete(&ADMIN, entry_id).await);
        assert!(store.job_record(1).await.is_none());
        assert!(store.trash_entries().await.is_empty());
    }

    #[tokio::test]
    async fn hard_delete_requires_trashed_record() {
        let store = seeded(&[(1, 1)]).await;
        let svc = service(&store);
        svc.soft_delete(&ADMIN, 1).await.unwrap();
        let entry_id = store.trash_entries().await[0].id;

        // Flag flipped back behind the ledger's back.
        {
            let mut uow = store.begin().await.unwrap();
            uow.set_deletion_state(1, DeletionState::Active).await.unwrap();
            uow.commit().await.unwrap();
        }

        let err = assert_err!(svc.hard_delete(&ADMIN, entry_id).await);
        assert!(matches!(err, Error::Conflict(_)));
        assert!(store.job_record(1).await.is_some());
    }

    #[tokio::test]
    async fn non_owner_is_forbidden_and_record_untouched() {
        let store = seeded(&[(7, 3)]).await;
        let mut resolver = MockOwnershipResolver::new();
        resolver
            .expect_authorize()
            .withf(|actor, id| actor.user_id == 20 && *id == 7)
            .times(1)
            .returning(|_, _| Ok(Authorization::Denied));
        let svc = LifecycleService::new(Arc::new(store.clone()), Arc::new(resolver));
        let stranger = Actor {
            user_id: 20,
            role: Role::User,
        };

        let err = assert_err!(svc.soft_delete(&stranger, 7).await);
        assert!(matches!(err, Error::Forbidden(_)));
        assert_eq!(
            store.job_record(7).await.unwrap().deletion_state,
            DeletionState::Active
        );
        assert!(store.trash_entries().await.is_empty());
    }

    #[tokio::test]
    async fn resolver_not_found_is_not_reported_as_forbidden() {
        let store = MemoryStore::new();
        let mut resolver = MockOwnershipResolver::new();
        resolver
            .expect_authorize()
            .returning(|_, _| Err(Error::NotFound("Job record not found".into())));
        let svc = LifecycleService::new(Arc::new(store), Arc::new(resolver));
        let user = Actor {
            user_id: 5,
            role: Role::User,
        };

        let err = assert_err!(svc.soft_delete(&user, 404).await);
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn owner_can_trash_but_not_restore() {
        let store = seeded(&[(7, 3)]).await;
        store.link_user(10, Some(3)).await;
        let svc = service(&store);
        let owner = Actor {
            user_id: 10,
            role: Role::User,
        };

        let trashed = assert_ok!(svc.change_state(&owner, 7, DeletionState::Trashed).await);
        assert!(trashed.is_trashed());

        let err = assert_err!(svc.change_state(&owner, 7, DeletionState::Active).await);
        assert!(matches!(err, Error::Forbidden(_)));
        let entry_id = store.trash_entries().await[0].id;
        let err = assert_err!(svc.restore(&owner, entry_id).await);
        assert!(matches!(err, Error::Forbidden(_)));
        let err = assert_err!(svc.list_trash(&owner).await);
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn trash_round_trip() {
        let store = seeded(&[(1, 1), (2, 1)]).await;
        let svc = service(&store);

        svc.soft_delete(&ADMIN, 2).await.unwrap();
        let trash = svc.list_trash(&ADMIN).await.unwrap();
        assert_eq!(trash.len(), 1);
        assert_eq!(trash[0].job_record_id, 2);
        assert_eq!(trash[0].status, "trashed");
        assert_eq!(trash[0].company, "Company 2");

        let restored = svc.restore(&ADMIN, trash[0].trash_entry_id).await.unwrap();
        assert_eq!(restored.id, 2);
        assert_eq!(restored.deletion_state, DeletionState::Active);
        assert!(svc.list_trash(&ADMIN).await.unwrap().is_empty());
        assert_eq!(trash_size(&store).await, 0);
    }

    #[tokio::test]
    async fn admin_trash_then_restore_record_seven() {
        let store = seeded(&[(7, 3)]).await;
        let svc = service(&store);

        let trashed = svc.soft_delete(&ADMIN, 7).await.unwrap();
        assert_eq!(trashed.deletion_state, DeletionState::Trashed);
        let entries = store.trash_entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].job_record_id, 7);
        let listed = svc.list_trashed(&ADMIN).await.unwrap();
        assert_eq!(listed.iter().map(|r| r.id).collect::<Vec<_>>(), vec![7]);

        svc.restore(&ADMIN, entries[0].id).await.unwrap();
        assert_eq!(
            store.job_record(7).await.unwrap().deletion_state,
            DeletionState::Active
        );
        assert!(store.trash_entries().await.is_empty());
        assert!(svc.list_trashed(&ADMIN).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn user_linked_to_other_alumni_cannot_trash_record_seven() {
        let store = seeded(&[(7, 3)]).await;
        store.link_user(30, Some(9)).await;
        let svc = service(&store);
        let user = Actor {
            user_id: 30,
            role: Role::User,
        };

        let err = assert_err!(svc.soft_delete(&user, 7).await);
        assert!(matches!(err, Error::Forbidden(_)));
        assert_eq!(
            store.job_record(7).await.unwrap().deletion_state,
            DeletionState::Active
        );
    }

    #[tokio::test]
    async fn second_transition_on_same_entry_loses() {
        let store = seeded(&[(1, 1)]).await;
        let svc = service(&store);
        svc.soft_delete(&ADMIN, 1).await.unwrap();
        let entry_id = store.trash_entries().await[0].id;

        svc.hard_delete(&ADMIN, entry_id).await.unwrap();
        let err = assert_err!(svc.restore(&ADMIN, entry_id).await);
        assert!(matches!(err, Error::NotFound(_)));
        let err = assert_err!(svc.hard_delete(&ADMIN, entry_id).await);
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn admin_restore_by_record_id_clears_ledger() {
        let store = seeded(&[(4, 2)]).await;
        let svc = service(&store);
        svc.change_state(&ADMIN, 4, DeletionState::Trashed)
            .await
            .unwrap();

        let restored = svc
            .change_state(&ADMIN, 4, DeletionState::Active)
            .await
            .unwrap();
        assert_eq!(restored.deletion_state, DeletionState::Active);
        assert!(store.trash_entries().await.is_empty());
    }
}
