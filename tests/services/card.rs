#[path = "../common/mod.rs"]
mod common;

use common::{columns_of, open_app, raw_conn};
use kanban::core::time::format_timestamp;
use kanban::model::{CardUpdate, Priority};

fn due(date: &str) -> CardUpdate {
    CardUpdate {
        due_date: Some(date.to_string()),
        ..CardUpdate::default()
    }
}

#[test]
fn test_create_card_defaults_and_positions() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Cards").unwrap();
    let col = columns_of(&app, &board.id).remove(0);

    let first = app.create_card(&col.id, "First").unwrap();
    assert_eq!(first.position, 1000);
    assert_eq!(first.priority, Priority::Medium);
    assert_eq!(first.description, None);
    assert_eq!(first.due_date, None);
    assert_eq!(first.column_id, col.id);

    let second = app.create_card(&col.id, "Second").unwrap();
    assert_eq!(second.position, 2000);

    app.move_card(&second.id, &col.id, 7250).unwrap();
    assert_eq!(app.create_card(&col.id, "Third").unwrap().position, 8250);

    assert_eq!(app.get_card(&first.id).unwrap(), first);
}

#[test]
fn test_create_card_validates_title_and_column() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Cards").unwrap();
    let col = columns_of(&app, &board.id).remove(0);

    assert!(app.create_card(&col.id, "").unwrap_err().is_validation());
    let err = app.create_card("missing", "Orphan").unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("column not found"), "{err}");
}

#[test]
fn test_update_priority_touches_only_priority_and_timestamp() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Patch").unwrap();
    let col = columns_of(&app, &board.id).remove(0);
    let card = app.create_card(&col.id, "Patch me").unwrap();
    let card = app
        .update_card(
            &card.id,
            CardUpdate {
                description: Some("details".to_string()),
                due_date: Some("2026-12-24".to_string()),
                ..CardUpdate::default()
            },
        )
        .unwrap();
    std::thread::sleep(std::time::Duration::from_millis(1100));

    let updated = app
        .update_card(
            &card.id,
            CardUpdate {
                priority: Some(Priority::High),
                ..CardUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.priority, Priority::High);
    assert!(updated.updated_at > card.updated_at);
    assert_eq!(updated.title, card.title);
    assert_eq!(updated.description, card.description);
    assert_eq!(updated.due_date, card.due_date);
    assert_eq!(updated.position, card.position);
    assert_eq!(updated.column_id, card.column_id);
    assert_eq!(updated.created_at, card.created_at);
}

#[test]
fn test_due_date_absent_keeps_empty_clears() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Due").unwrap();
    let col = columns_of(&app, &board.id).remove(0);
    let card = app.create_card(&col.id, "Deadline").unwrap();

    let with_due = app.update_card(&card.id, due("2026-11-01")).unwrap();
    let stored = with_due.due_date.expect("due date set");
    assert_eq!(format_timestamp(&stored), "2026-11-01T00:00:00Z");

    let untouched = app.update_card(&card.id, CardUpdate::default()).unwrap();
    assert_eq!(untouched.due_date, Some(stored));

    let cleared = app.update_card(&card.id, due("")).unwrap();
    assert_eq!(cleared.due_date, None);
    assert_eq!(app.get_card(&card.id).unwrap().due_date, None);
}

#[test]
fn test_update_rejects_bad_input_and_unknown_card() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Bad").unwrap();
    let col = columns_of(&app, &board.id).remove(0);
    let card = app.create_card(&col.id, "Keep").unwrap();

    let empty_title = CardUpdate {
        title: Some(String::new()),
        ..CardUpdate::default()
    };
    assert!(app.update_card(&card.id, empty_title).unwrap_err().is_validation());
    assert!(app.update_card(&card.id, due("someday")).unwrap_err().is_validation());
    assert!(
        app.update_card("missing", CardUpdate::default())
            .unwrap_err()
            .is_not_found()
    );
    assert_eq!(app.get_card(&card.id).unwrap().title, "Keep");
}

#[test]
fn test_delete_card() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Del").unwrap();
    let col = columns_of(&app, &board.id).remove(0);
    let card = app.create_card(&col.id, "Bye").unwrap();

    app.delete_card(&card.id).unwrap();
    assert!(app.get_card(&card.id).unwrap_err().is_not_found());
    assert!(app.delete_card(&card.id).unwrap_err().is_not_found());
}

#[test]
fn test_move_card_between_columns() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Move").unwrap();
    let cols = columns_of(&app, &board.id);
    let card = app.create_card(&cols[0].id, "Travel").unwrap();

    app.move_card(&card.id, &cols[2].id, 500).unwrap();
    let moved = app.get_card(&card.id).unwrap();
    assert_eq!((moved.column_id.as_str(), moved.position), (cols[2].id.as_str(), 500));

    let data = app.get_board_with_data(&board.id).unwrap();
    assert!(data.columns[0].cards.is_empty());
    assert_eq!(data.columns[2].cards[0].id, card.id);

    assert!(app.move_card(&card.id, "missing", 1).unwrap_err().is_not_found());
    assert!(app.move_card("missing", &cols[0].id, 1).unwrap_err().is_not_found());
}

#[test]
fn test_search_matches_description_and_is_scoped_to_board() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Search").unwrap();
    let other = app.create_board("Elsewhere").unwrap();
    let cols = columns_of(&app, &board.id);
    let foreign_col = columns_of(&app, &other.id).remove(0);

    let hidden = app.create_card(&cols[1].id, "Plain title").unwrap();
    app.update_card(
        &hidden.id,
        CardUpdate {
            description: Some("needle in the description".to_string()),
            ..CardUpdate::default()
        },
    )
    .unwrap();
    app.create_card(&cols[0].id, "Unrelated").unwrap();
    app.create_card(&foreign_col.id, "needle elsewhere").unwrap();

    let hits = app.search_cards(&board.id, "needle").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, hidden.id);
}

#[test]
fn test_search_is_case_sensitive_literal_and_ordered() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Search").unwrap();
    let cols = columns_of(&app, &board.id);

    let late = app.create_card(&cols[0].id, "Fix login bug").unwrap();
    let early = app.create_card(&cols[1].id, "Another login bug").unwrap();
    app.move_card(&late.id, &cols[0].id, 9000).unwrap();
    app.move_card(&early.id, &cols[1].id, 100).unwrap();
    app.create_card(&cols[0].id, "100% done").unwrap();

    let hits: Vec<String> = app
        .search_cards(&board.id, "login")
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(hits, vec![early.id.clone(), late.id.clone()]);

    assert!(app.search_cards(&board.id, "LOGIN").unwrap().is_empty());
    assert_eq!(app.search_cards(&board.id, "%").unwrap().len(), 1);
    assert!(app.search_cards(&board.id, "l_gin").unwrap().is_empty());
}

#[test]
fn test_rows_with_legacy_timestamp_formats_are_readable() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Legacy").unwrap();
    let col = columns_of(&app, &board.id).remove(0);

    raw_conn(&app)
        .execute(
            "INSERT INTO cards (id, column_id, title, description, due_date, position, created_at, updated_at)
             VALUES ('legacy', ?1, 'Old card', NULL, '2023-05-06', 1000, '2023-05-01 09:30:00', '2023-05-02T10:00:00+02:00')",
            [&col.id],
        )
        .unwrap();

    let card = app.get_card("legacy").unwrap();
    assert_eq!(card.priority, Priority::Medium);
    assert_eq!(format_timestamp(&card.created_at), "2023-05-01T09:30:00Z");
    assert_eq!(format_timestamp(&card.updated_at), "2023-05-02T08:00:00Z");
    assert_eq!(
        card.due_date.as_ref().map(format_timestamp).as_deref(),
        Some("2023-05-06T00:00:00Z")
    );
}

#[test]
fn test_create_card_after_max_position_is_rejected_not_wrapped() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Edge").unwrap();
    let col = columns_of(&app, &board.id).remove(0);
    let top = app.create_card(&col.id, "top").unwrap();

    app.move_card(&top.id, &col.id, i64::MAX - 10).unwrap();
    assert!(app.create_card(&col.id, "next").unwrap_err().is_validation());
    assert_eq!(app.get_board_with_data(&board.id).unwrap().columns[0].cards.len(), 1);

    app.move_card(&top.id, &col.id, -5000).unwrap();
    assert_eq!(app.create_card(&col.id, "next").unwrap().position, -4000);
}
