//! Postgres Guest Repository Tests
//!
//! Run against a live database:
//! `RSVP_TEST_DATABASE_URL=postgres://... cargo test -p rsvp-platform -- --ignored`

use uuid::Uuid;

use rsvp_config::DatabaseConfig;
use rsvp_platform::domain::{Guest, GuestUpdate, RsvpStatus};
use rsvp_platform::repository::{GuestRepository, PgGuestRepository};

async fn test_repo() -> Option<PgGuestRepository> {
    let url = std::env::var("RSVP_TEST_DATABASE_URL").ok()?;
    let repo = PgGuestRepository::connect_lazy(&DatabaseConfig {
        url,
        ..Default::default()
    })
    .unwrap();
    repo.init_schema().await.unwrap();
    Some(repo)
}

async fn seeded_guest(repo: &PgGuestRepository) -> Guest {
    let mut guest = Guest::new("Jane", &format!("jane-{}@x.com", Uuid::new_v4()), "Bride", 2);
    guest.hongbao = 88.0;
    repo.insert(&guest).await.unwrap();
    guest
}

#[tokio::test]
#[ignore] // Requires Postgres via RSVP_TEST_DATABASE_URL
async fn test_update_partial_merges_in_statement() {
    let Some(repo) = test_repo().await else { return };
    let guest = seeded_guest(&repo).await;
    let new_email = format!("jane.new-{}@x.com", Uuid::new_v4());

    let update = GuestUpdate {
        id: guest.id,
        name: String::new(),
        email: new_email.clone(),
        family_side: String::new(),
        hongbao: 0.0,
        total_guests: 4,
        rsvp_status: String::new(),
    };

    let first = repo.update_partial(&update).await.unwrap().unwrap();
    assert_eq!(first.name, "Jane");
    assert_eq!(first.email, new_email);
    assert_eq!(first.family_side, "Bride");
    assert_eq!(first.hongbao, 0.0);
    assert_eq!(first.total_guests, 4);
    assert_eq!(first.rsvp_status, RsvpStatus::Pending);
    assert_eq!(first.rsvp_token, guest.rsvp_token);
    assert_eq!(first, update.merge_into(&guest));

    let second = repo.update_partial(&update).await.unwrap().unwrap();
    assert_eq!(second, first);

    repo.delete(guest.id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Postgres via RSVP_TEST_DATABASE_URL
async fn test_update_rsvp_touches_only_status_and_party_size() {
    let Some(repo) = test_repo().await else { return };
    let guest = seeded_guest(&repo).await;

    let updated = repo
        .update_rsvp(&guest.rsvp_token, &RsvpStatus::Attending, 3)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.rsvp_status, RsvpStatus::Attending);
    assert_eq!(updated.total_guests, 3);
    assert_eq!(updated.name, guest.name);
    assert_eq!(updated.email, guest.email);
    assert_eq!(updated.family_side, guest.family_side);
    assert_eq!(updated.hongbao, 88.0);

    let stored = repo.find_by_token(&guest.rsvp_token).await.unwrap();
    assert_eq!(stored, Some(updated));

    repo.delete(guest.id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Postgres via RSVP_TEST_DATABASE_URL
async fn test_updates_on_unknown_keys_return_none() {
    let Some(repo) = test_repo().await else { return };

    let update = GuestUpdate {
        id: Uuid::new_v4(),
        name: "Nobody".to_string(),
        email: String::new(),
        family_side: String::new(),
        hongbao: 0.0,
        total_guests: 1,
        rsvp_status: String::new(),
    };
    assert!(repo.update_partial(&update).await.unwrap().is_none());
    assert!(repo
        .update_rsvp(&Uuid::new_v4().to_string(), &RsvpStatus::NotAttending, 0)
        .await
        .unwrap()
        .is_none());
}
