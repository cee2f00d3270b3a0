//! End-to-end integration coverage for the profile and catalog services.
//!
//! These tests exercise full workflows against a real on-disk database with
//! migrations applied: catalog curation, profile creation with tag
//! attachment, association updates, filtered listing, and deactivation. They
//! complement the per-module unit tests by crossing service boundaries the
//! way an embedding HTTP layer would.

use std::sync::Arc;

use medmatch_core::ProfileDirectory;
use medmatch_domain::{
    LanguageChoice, MedMatchError, NewUserProfile, Proficiency, TagKind, UserFilter, UserRole,
};
use medmatch_infra::{CatalogService, DbManager, ProfileService};
use tempfile::TempDir;

struct DbHarness {
    #[allow(dead_code)]
    temp_dir: TempDir,
    profiles: ProfileService,
    catalogs: CatalogService,
}

impl DbHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("temporary directory should be created");
        let db_path = temp_dir.path().join("infra-integration.db");

        let manager = Arc::new(
            DbManager::new(&db_path, 4).expect("database manager should initialise"),
        );
        manager.run_migrations().expect("schema migrations should apply");

        let profiles = ProfileService::new(Arc::clone(&manager));
        let catalogs = CatalogService::new(manager);

        Self { temp_dir, profiles, catalogs }
    }

    /// Seed both catalogs with a fixed set of entries.
    async fn seed_catalogs(&self) {
        for name in ["cardiology", "neurology", "pediatrics"] {
            self.catalogs
                .add(TagKind::Interest, name)
                .await
                .expect("interest catalog entry should insert");
        }
        for name in ["english", "french", "spanish"] {
            self.catalogs
                .add(TagKind::Language, name)
                .await
                .expect("language catalog entry should insert");
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn profile_lifecycle_workflow() {
    let harness = DbHarness::new();
    harness.seed_catalogs().await;

    let created = harness
        .profiles
        .create_user(
            new_doctor("lifecycle@example.com", "Dr. Lifecycle"),
            vec!["cardiology".into(), "neurology".into()],
            vec![language("english", Proficiency::Fluent)],
        )
        .await
        .expect("profile creation should succeed");

    assert_eq!(created.profile.email, "lifecycle@example.com");
    assert!(created.profile.is_active, "new profiles start active");
    assert_eq!(tag_names(&created), vec!["cardiology", "neurology"]);
    assert_eq!(created.languages.len(), 1);

    let fetched = harness
        .profiles
        .get(created.profile.uuid)
        .await
        .expect("profile fetch should succeed")
        .expect("created profile should be found");
    assert_eq!(fetched, created, "fetch should round-trip the created state");

    // Swap one interest and raise the language proficiency set in one call
    // each; the engine should touch only the changed rows.
    let interests = harness
        .profiles
        .update_interests(created.profile.uuid, vec!["cardiology".into(), "pediatrics".into()])
        .await
        .expect("interest update should succeed");
    assert_eq!((interests.added, interests.updated, interests.removed), (1, 0, 1));

    let languages = harness
        .profiles
        .update_languages(
            created.profile.uuid,
            vec![language("english", Proficiency::Fluent), language("french", Proficiency::Beginner)],
        )
        .await
        .expect("language update should succeed");
    assert_eq!((languages.added, languages.updated, languages.removed), (1, 0, 0));

    let listed = harness
        .profiles
        .list(UserFilter { interests: vec!["pediatrics".into()], ..UserFilter::default() })
        .await
        .expect("filtered listing should succeed");
    assert_eq!(listed.len(), 1, "the updated profile should match the interest filter");
    assert_eq!(listed[0].profile.uuid, created.profile.uuid);

    let deactivated = harness
        .profiles
        .deactivate(created.profile.uuid)
        .await
        .expect("deactivation should succeed")
        .expect("deactivated profile should be returned");
    assert!(!deactivated.is_active);

    let active = harness
        .profiles
        .list(UserFilter::active_only())
        .await
        .expect("active listing should succeed");
    assert!(active.is_empty(), "deactivated profiles should drop out of active listings");

    let still_there = harness
        .profiles
        .get(created.profile.uuid)
        .await
        .expect("fetch after deactivation should succeed");
    assert!(still_there.is_some(), "deactivation must not delete the row");
}

#[tokio::test(flavor = "multi_thread")]
async fn catalog_deletion_respects_references() {
    let harness = DbHarness::new();
    harness.seed_catalogs().await;

    let created = harness
        .profiles
        .create_user(
            new_doctor("holder@example.com", "Dr. Holder"),
            vec!["neurology".into()],
            vec![],
        )
        .await
        .expect("profile creation should succeed");

    let neurology = harness
        .catalogs
        .list(TagKind::Interest)
        .await
        .expect("interest listing should succeed")
        .into_iter()
        .find(|entry| entry.name == "neurology")
        .expect("seeded entry should be listed");

    let blocked = harness.catalogs.delete(TagKind::Interest, neurology.id).await;
    assert!(blocked.is_err(), "a referenced catalog entry must not be deletable");

    harness
        .profiles
        .update_interests(created.profile.uuid, vec![])
        .await
        .expect("clearing interests should succeed");

    let removed = harness
        .catalogs
        .delete(TagKind::Interest, neurology.id)
        .await
        .expect("deletion should succeed once unreferenced")
        .expect("the removed entry should be returned");
    assert_eq!(removed.name, "neurology");

    let remaining = harness
        .catalogs
        .list(TagKind::Interest)
        .await
        .expect("interest listing should succeed");
    assert!(
        remaining.iter().all(|entry| entry.name != "neurology"),
        "deleted entry should no longer be listed"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_creation_leaves_no_partial_state() {
    let harness = DbHarness::new();
    harness.seed_catalogs().await;

    harness
        .profiles
        .create_user(
            new_doctor("taken@example.com", "Dr. First"),
            vec!["cardiology".into()],
            vec![language("spanish", Proficiency::Intermediate)],
        )
        .await
        .expect("first profile creation should succeed");

    let duplicate = harness
        .profiles
        .create_user(
            new_doctor("taken@example.com", "Dr. Second"),
            vec!["neurology".into()],
            vec![language("french", Proficiency::Fluent)],
        )
        .await;
    match duplicate {
        Err(MedMatchError::Database(msg)) => {
            assert!(msg.contains("unique"), "duplicate email should surface as a unique violation")
        }
        other => panic!("expected a database error, got {other:?}"),
    }

    let all = harness
        .profiles
        .list(UserFilter::any())
        .await
        .expect("listing should succeed");
    assert_eq!(all.len(), 1, "the failed creation must not leave a profile behind");
    assert_eq!(tag_names(&all[0]), vec!["cardiology"]);
    assert_eq!(all[0].languages.len(), 1, "the winner's associations should be untouched");
}

fn new_doctor(email: &str, name: &str) -> NewUserProfile {
    NewUserProfile::new(email, name, UserRole::Doctor)
}

fn language(name: &str, proficiency: Proficiency) -> LanguageChoice {
    LanguageChoice::new(name, proficiency)
}

fn tag_names(user: &medmatch_domain::UserWithTags) -> Vec<&str> {
    user.interests.iter().map(|entry| entry.name.as_str()).collect()
}
