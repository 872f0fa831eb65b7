//! Waiter flow: ratings with tips, notes, shifts and table lifecycle.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use carta_server::db::models::{
    NoteCreate, ShiftCreate, TableClose, TableOpen, WaiterCreate, WaiterRatingCreate,
};
use carta_server::db::repository::WaiterRepository;
use carta_server::db::DbService;
use shared::models::{NoteKind, RatingCategories, ShiftStatus, TableStatus};

async fn repo() -> WaiterRepository {
    let db = DbService::memory().await.expect("in-memory db");
    WaiterRepository::new(db.db)
}

fn maria() -> WaiterCreate {
    WaiterCreate {
        name: "María García".into(),
        photo: None,
        dni: "12345678Z".into(),
        is_active: Some(true),
    }
}

fn rating(stars: i32, tip: i64) -> WaiterRatingCreate {
    WaiterRatingCreate {
        user_id: "user:guest".into(),
        rating: stars,
        comment: None,
        table_number: Some(4),
        tip: Some(Decimal::from(tip)),
        categories: RatingCategories {
            attention: stars,
            friendliness: stars,
            speed: stars,
            knowledge: stars,
        },
        customer_name: "Cliente".into(),
        photos: vec![],
    }
}

#[tokio::test]
async fn tips_accumulate_and_average_tracks_ratings() {
    let repo = repo().await;
    let waiter = repo.create(maria()).await.unwrap();
    let id = waiter.id.as_ref().unwrap().to_string();
    assert_eq!(waiter.total_tips, Decimal::ZERO);

    let after_first = repo.add_rating(&id, rating(4, 100).into_rating()).await.unwrap();
    assert_eq!(after_first.total_tips, Decimal::from(100));
    assert_eq!(after_first.average_rating, 4.0);

    let after_second = repo.add_rating(&id, rating(2, 25).into_rating()).await.unwrap();
    assert_eq!(after_second.total_tips, Decimal::from(125));
    assert_eq!(after_second.average_rating, 3.0);
    assert_eq!(after_second.ratings.len(), 2);
}

#[tokio::test]
async fn likes_and_highlight_touch_one_rating() {
    let repo = repo().await;
    let waiter = repo.create(maria()).await.unwrap();
    let id = waiter.id.as_ref().unwrap().to_string();

    let with_rating = repo.add_rating(&id, rating(5, 0).into_rating()).await.unwrap();
    let rating_id = with_rating.ratings[0].id;

    let liked = repo.like_rating(&id, rating_id).await.unwrap();
    assert_eq!(liked.ratings[0].likes, 1);

    let highlighted = repo.toggle_highlight(&id, rating_id).await.unwrap();
    assert!(highlighted.ratings[0].is_highlighted);
    let plain = repo.toggle_highlight(&id, rating_id).await.unwrap();
    assert!(!plain.ratings[0].is_highlighted);

    // Unknown rating id is a no-op, not an error
    let untouched = repo.like_rating(&id, 999_999).await.unwrap();
    assert_eq!(untouched.ratings[0].likes, 1);
}

#[tokio::test]
async fn note_round_trip_restores_the_array() {
    let repo = repo().await;
    let waiter = repo.create(maria()).await.unwrap();
    let id = waiter.id.as_ref().unwrap().to_string();

    let note = NoteCreate {
        kind: NoteKind::Logro,
        content: "Empleada del mes".into(),
        created_by: "user:admin".into(),
    }
    .into_note();
    let note_id = note.id;

    let with_note = repo.add_note(&id, note).await.unwrap();
    assert_eq!(with_note.notes.len(), 1);

    let without = repo.remove_note(&id, note_id).await.unwrap();
    assert!(without.notes.is_empty());
}

#[tokio::test]
async fn shift_status_transitions_by_id() {
    let repo = repo().await;
    let waiter = repo.create(maria()).await.unwrap();
    let id = waiter.id.as_ref().unwrap().to_string();

    let shift = ShiftCreate {
        date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
        start_time: "12:00".into(),
        end_time: "20:00".into(),
    }
    .into_shift();
    let shift_id = shift.id;

    let scheduled = repo.add_shift(&id, shift).await.unwrap();
    assert_eq!(scheduled.shifts[0].status, ShiftStatus::Scheduled);

    let completed = repo
        .update_shift_status(&id, shift_id, ShiftStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed.shifts[0].status, ShiftStatus::Completed);
}

#[tokio::test]
async fn closing_a_table_recomputes_performance() {
    let repo = repo().await;
    let waiter = repo.create(maria()).await.unwrap();
    let id = waiter.id.as_ref().unwrap().to_string();

    let table = TableOpen {
        table_number: 7,
        customer_count: 3,
    }
    .into_table();
    let table_id = table.id;

    let open = repo.open_table(&id, table).await.unwrap();
    assert_eq!(open.current_tables[0].status, TableStatus::Active);
    assert_eq!(open.performance.tables_served, 0);

    let closed = repo
        .close_table(
            &id,
            table_id,
            TableClose {
                total_amount: Decimal::from(85),
                tip_amount: Decimal::from(10),
            },
        )
        .await
        .unwrap();

    let table = &closed.current_tables[0];
    assert_eq!(table.status, TableStatus::Completed);
    assert!(table.end_time.is_some());
    assert_eq!(closed.performance.tables_served, 1);
    assert_eq!(closed.performance.customers_served, 3);
    assert_eq!(closed.performance.total_sales, Decimal::from(85));
}
