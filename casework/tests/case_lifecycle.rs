//! End-to-end case and evidence flows against the in-memory store.

use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;
use uuid::Uuid;

use audit::{AuditConfig, AuditOutcome, AuditTrail};
use casework::{
    CaseService, CaseUpdate, CaseworkError, EvidenceService, NewCase, NewEvidence,
};
use entities::{Actor, CasePriority, CaseStatus, EvidenceKind, Organization, Role, User};
use store::{MemoryStore, OrganizationStore, UserStore};

struct Harness {
    store: Arc<MemoryStore>,
    cases: CaseService,
    evidence: EvidenceService,
    audit: Arc<AuditTrail>,
    _dir: TempDir,
}

fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let audit = Arc::new(
        AuditTrail::new(AuditConfig {
            trail_path: dir.path().join("trail.jsonl"),
        })
        .unwrap(),
    );
    let store = Arc::new(MemoryStore::default());
    let cases = CaseService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        audit.clone(),
    );
    let evidence = EvidenceService::new(store.clone(), store.clone(), store.clone(), audit.clone());
    Harness {
        store,
        cases,
        evidence,
        audit,
        _dir: dir,
    }
}

async fn seed_org(store: &MemoryStore, name: &str, max_cases: u32) -> Organization {
    let mut org = Organization::new(name, name);
    org.max_cases = max_cases;
    store.insert_organization(org.clone()).await.unwrap();
    org
}

async fn seed_user(store: &MemoryStore, role: Role, org: Option<Uuid>) -> User {
    let name = Uuid::new_v4().to_string();
    let user = User::new(
        &name,
        format!("{name}@example.com"),
        "Test User",
        "hash",
        role,
        org,
    );
    store.insert_user(user.clone()).await.unwrap();
    user
}

fn new_case(title: &str, org: Option<Uuid>) -> NewCase {
    NewCase {
        title: title.to_string(),
        description: None,
        priority: None,
        organization_id: org,
    }
}

fn new_evidence(case_id: Uuid, name: &str) -> NewEvidence {
    NewEvidence {
        case_id,
        kind: EvidenceKind::Url,
        name: name.to_string(),
        description: None,
        file_path: None,
        file_hash: None,
        file_size: None,
        tags: None,
    }
}

#[tokio::test]
async fn individual_cases_carry_no_organization() {
    let h = harness();
    let user = seed_user(&h.store, Role::IndividualUser, None).await;
    let actor = Actor::from_user(&user);

    let case = h
        .cases
        .create_case(&actor, new_case("Romance scam profile", None))
        .await
        .unwrap();
    assert_eq!(case.organization_id, None);
    assert_eq!(case.created_by, actor.id);
    assert_eq!(case.priority, CasePriority::Medium);

    let err = h
        .cases
        .create_case(&actor, new_case("misdirected", Some(Uuid::new_v4())))
        .await
        .unwrap_err();
    assert!(matches!(err, CaseworkError::Validation(_)));
}

#[tokio::test]
async fn super_admin_must_name_a_tenant() {
    let h = harness();
    let admin = seed_user(&h.store, Role::SuperAdmin, None).await;
    let actor = Actor::from_user(&admin);

    let err = h
        .cases
        .create_case(&actor, new_case("orphan", None))
        .await
        .unwrap_err();
    assert!(matches!(err, CaseworkError::Validation(_)));

    let org = seed_org(&h.store, "tenant-a", 50).await;
    let case = h
        .cases
        .create_case(&actor, new_case("placed", Some(org.id)))
        .await
        .unwrap();
    assert_eq!(case.organization_id, Some(org.id));
}

#[tokio::test]
async fn staff_cases_land_in_their_own_tenant() {
    let h = harness();
    let org = seed_org(&h.store, "tenant-b", 50).await;
    let staff = seed_user(&h.store, Role::StaffUser, Some(org.id)).await;
    let actor = Actor::from_user(&staff);

    let case = h
        .cases
        .create_case(&actor, new_case("Takedown request", None))
        .await
        .unwrap();
    assert_eq!(case.organization_id, Some(org.id));

    // Naming a different tenant is refused outright.
    let err = h
        .cases
        .create_case(&actor, new_case("sneaky", Some(Uuid::new_v4())))
        .await
        .unwrap_err();
    assert!(matches!(err, CaseworkError::Forbidden));
}

#[tokio::test]
async fn case_quota_is_enforced_per_tenant() {
    let h = harness();
    let org = seed_org(&h.store, "tiny-tenant", 1).await;
    let admin = seed_user(&h.store, Role::OrgAdmin, Some(org.id)).await;
    let actor = Actor::from_user(&admin);

    h.cases
        .create_case(&actor, new_case("first", None))
        .await
        .unwrap();
    let err = h
        .cases
        .create_case(&actor, new_case("second", None))
        .await
        .unwrap_err();
    assert!(matches!(err, CaseworkError::Validation(_)));
}

#[tokio::test]
async fn closing_stamps_and_reopening_clears_closed_at() {
    let h = harness();
    let user = seed_user(&h.store, Role::IndividualUser, None).await;
    let actor = Actor::from_user(&user);
    let case = h
        .cases
        .create_case(&actor, new_case("short-lived", None))
        .await
        .unwrap();

    let closed = h
        .cases
        .update_case(
            &actor,
            case.id,
            CaseUpdate {
                status: Some(CaseStatus::Closed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(closed.closed_at.is_some());

    let reopened = h
        .cases
        .update_case(
            &actor,
            case.id,
            CaseUpdate {
                status: Some(CaseStatus::Open),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(reopened.closed_at.is_none());
    assert_eq!(reopened.status, CaseStatus::Open);
}

#[rstest]
#[case(CaseStatus::Closed)]
#[case(CaseStatus::Archived)]
#[tokio::test]
async fn terminal_case_locks_evidence_even_for_super_admin(#[case] status: CaseStatus) {
    let h = harness();
    let org = seed_org(&h.store, "tenant-c", 50).await;
    let admin = seed_user(&h.store, Role::SuperAdmin, None).await;
    let actor = Actor::from_user(&admin);
    let case = h
        .cases
        .create_case(&actor, new_case("wrapped up", Some(org.id)))
        .await
        .unwrap();
    h.cases
        .update_case(
            &actor,
            case.id,
            CaseUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = h
        .evidence
        .add_evidence(&actor, new_evidence(case.id, "late arrival"))
        .await
        .unwrap_err();
    assert!(matches!(err, CaseworkError::Validation(_)));
}

#[tokio::test]
async fn evidence_inherits_the_tenant_of_its_case() {
    let h = harness();
    let org = seed_org(&h.store, "tenant-d", 50).await;
    let staff = seed_user(&h.store, Role::StaffUser, Some(org.id)).await;
    let actor = Actor::from_user(&staff);
    let case = h
        .cases
        .create_case(&actor, new_case("Domain cluster", None))
        .await
        .unwrap();

    let item = h
        .evidence
        .add_evidence(&actor, new_evidence(case.id, "registrar whois"))
        .await
        .unwrap();
    assert_eq!(item.organization_id, Some(org.id));
    assert_eq!(item.uploaded_by, Some(actor.id));
    assert!(!item.is_verified);
}

#[tokio::test]
async fn uploader_keeps_delete_rights_after_losing_the_case() {
    let h = harness();
    let creator = seed_user(&h.store, Role::IndividualUser, None).await;
    let creator_actor = Actor::from_user(&creator);
    let helper = seed_user(&h.store, Role::IndividualUser, None).await;
    let helper_actor = Actor::from_user(&helper);

    let case = h
        .cases
        .create_case(&creator_actor, new_case("shared lead", None))
        .await
        .unwrap();
    // Hand the helper the legacy assignment so they can upload.
    h.cases
        .update_case(
            &creator_actor,
            case.id,
            CaseUpdate {
                assigned_to: Some(Some(helper.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let item = h
        .evidence
        .add_evidence(&helper_actor, new_evidence(case.id, "chat export"))
        .await
        .unwrap();

    // Take the case back; the helper can no longer even view it.
    h.cases
        .update_case(
            &creator_actor,
            case.id,
            CaseUpdate {
                assigned_to: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(matches!(
        h.cases.get_case(&helper_actor, case.id).await.unwrap_err(),
        CaseworkError::Forbidden
    ));

    // Uploader identity still grants deletion of their own upload.
    h.evidence
        .delete_evidence(&helper_actor, item.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn non_uploader_base_role_cannot_delete_evidence() {
    let h = harness();
    let org = seed_org(&h.store, "tenant-e", 50).await;
    let uploader = seed_user(&h.store, Role::StaffUser, Some(org.id)).await;
    let colleague = seed_user(&h.store, Role::StaffUser, Some(org.id)).await;
    let uploader_actor = Actor::from_user(&uploader);
    let colleague_actor = Actor::from_user(&colleague);

    let case = h
        .cases
        .create_case(&uploader_actor, new_case("Org case", None))
        .await
        .unwrap();
    let item = h
        .evidence
        .add_evidence(&uploader_actor, new_evidence(case.id, "screenshot"))
        .await
        .unwrap();

    // Same tenant is not enough to see an unrelated colleague's case.
    assert!(matches!(
        h.evidence
            .list_evidence(&colleague_actor, case.id)
            .await
            .unwrap_err(),
        CaseworkError::Forbidden
    ));
    let org_admin = seed_user(&h.store, Role::OrgAdmin, Some(org.id)).await;
    let org_admin_actor = Actor::from_user(&org_admin);
    assert_eq!(
        h.evidence
            .list_evidence(&org_admin_actor, case.id)
            .await
            .unwrap()
            .len(),
        1
    );
    assert!(matches!(
        h.evidence
            .delete_evidence(&colleague_actor, item.id)
            .await
            .unwrap_err(),
        CaseworkError::Forbidden
    ));
    // The org admin deletes by role alone.
    h.evidence
        .delete_evidence(&org_admin_actor, item.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn denied_mutations_land_in_the_audit_trail() {
    let h = harness();
    let owner = seed_user(&h.store, Role::IndividualUser, None).await;
    let outsider = seed_user(&h.store, Role::IndividualUser, None).await;
    let case = h
        .cases
        .create_case(&Actor::from_user(&owner), new_case("private", None))
        .await
        .unwrap();

    let err = h
        .cases
        .update_case(
            &Actor::from_user(&outsider),
            case.id,
            CaseUpdate {
                title: Some("hijacked".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CaseworkError::Forbidden));

    let entries = h.audit.read_entries().unwrap();
    assert!(entries
        .iter()
        .any(|entry| entry.outcome == AuditOutcome::Denied
            && entry.actor_id == Some(outsider.id)));
    assert!(h.audit.verify_chain().unwrap());
}

#[tokio::test]
async fn list_cases_is_filtered_by_role() {
    let h = harness();
    let org = seed_org(&h.store, "tenant-f", 50).await;
    let org_admin = seed_user(&h.store, Role::OrgAdmin, Some(org.id)).await;
    let staff = seed_user(&h.store, Role::StaffUser, Some(org.id)).await;
    let individual = seed_user(&h.store, Role::IndividualUser, None).await;
    let super_admin = seed_user(&h.store, Role::SuperAdmin, None).await;

    let org_admin_actor = Actor::from_user(&org_admin);
    let staff_actor = Actor::from_user(&staff);
    let individual_actor = Actor::from_user(&individual);

    h.cases
        .create_case(&org_admin_actor, new_case("org case one", None))
        .await
        .unwrap();
    h.cases
        .create_case(&staff_actor, new_case("org case two", None))
        .await
        .unwrap();
    h.cases
        .create_case(&individual_actor, new_case("personal", None))
        .await
        .unwrap();

    assert_eq!(
        h.cases
            .list_cases(&Actor::from_user(&super_admin))
            .await
            .unwrap()
            .len(),
        3
    );
    assert_eq!(h.cases.list_cases(&org_admin_actor).await.unwrap().len(), 2);
    // Staff sees only the case they created, not the whole tenant.
    assert_eq!(h.cases.list_cases(&staff_actor).await.unwrap().len(), 1);
    assert_eq!(h.cases.list_cases(&individual_actor).await.unwrap().len(), 1);
}

#[tokio::test]
async fn case_deletion_cascades_to_evidence() {
    let h = harness();
    let org = seed_org(&h.store, "tenant-g", 50).await;
    let admin = seed_user(&h.store, Role::OrgAdmin, Some(org.id)).await;
    let actor = Actor::from_user(&admin);
    let case = h
        .cases
        .create_case(&actor, new_case("doomed", None))
        .await
        .unwrap();
    h.evidence
        .add_evidence(&actor, new_evidence(case.id, "soon gone"))
        .await
        .unwrap();

    h.cases.delete_case(&actor, case.id).await.unwrap();

    assert!(matches!(
        h.cases.get_case(&actor, case.id).await.unwrap_err(),
        CaseworkError::NotFound(_)
    ));
    use store::EvidenceStore;
    assert!(h
        .store
        .list_evidence_for_case(case.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn staff_cannot_delete_their_own_case() {
    let h = harness();
    let org = seed_org(&h.store, "tenant-h", 50).await;
    let staff = seed_user(&h.store, Role::StaffUser, Some(org.id)).await;
    let actor = Actor::from_user(&staff);
    let case = h
        .cases
        .create_case(&actor, new_case("keeper", None))
        .await
        .unwrap();

    assert!(matches!(
        h.cases.delete_case(&actor, case.id).await.unwrap_err(),
        CaseworkError::Forbidden
    ));
}
