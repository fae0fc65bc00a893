#[path = "../common/mod.rs"]
mod common;

use common::{columns_of, open_app, raw_conn};

#[test]
fn test_create_appends_after_max_position() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Cols").unwrap();

    let backlog = app.create_column(&board.id, "Backlog").unwrap();
    assert_eq!(backlog.position, 4000);

    app.move_column(&backlog.id, 10_500).unwrap();
    let review = app.create_column(&board.id, "Review").unwrap();
    assert_eq!(review.position, 11_500);
    assert_eq!(columns_of(&app, &board.id).last().unwrap().id, review.id);
}

#[test]
fn test_create_validates_title_and_board() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Cols").unwrap();
    assert!(app.create_column(&board.id, "").unwrap_err().is_validation());
    assert!(app.create_column("missing", "Review").unwrap_err().is_not_found());
    assert!(app.list_columns("missing").unwrap_err().is_not_found());
}

#[test]
fn test_create_batch_assigns_consecutive_gaps() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Batch").unwrap();
    let cols = app.create_columns(&board.id, &["QA", "Staging"]).unwrap();
    let positions: Vec<i64> = cols.iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![4000, 5000]);
    assert_eq!(app.list_columns(&board.id).unwrap().len(), 5);
}

#[test]
fn test_create_batch_is_all_or_nothing() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Batch").unwrap();
    raw_conn(&app)
        .execute_batch(
            "CREATE TRIGGER fail_blocked BEFORE INSERT ON columns
             WHEN NEW.title = 'Blocked'
             BEGIN SELECT RAISE(ABORT, 'injected column failure'); END;",
        )
        .unwrap();

    let err = app
        .create_columns(&board.id, &["QA", "Blocked", "Staging"])
        .unwrap_err();
    assert!(err.to_string().contains("insert column 1"), "{err}");
    assert_eq!(app.list_columns(&board.id).unwrap().len(), 3);

    assert!(
        app.create_columns(&board.id, &["QA", ""])
            .unwrap_err()
            .is_validation()
    );
}

#[test]
fn test_update_column_title() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Cols").unwrap();
    let col = columns_of(&app, &board.id).remove(0);

    let renamed = app.update_column(&col.id, "Inbox").unwrap();
    assert_eq!(renamed.title, "Inbox");
    assert_eq!(renamed.position, col.position);
    assert_eq!(columns_of(&app, &board.id)[0].title, "Inbox");

    assert!(app.update_column(&col.id, "").unwrap_err().is_validation());
    assert!(app.update_column("missing", "x").unwrap_err().is_not_found());
}

#[test]
fn test_last_column_cannot_be_deleted() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Lonely").unwrap();
    let cols = columns_of(&app, &board.id);
    app.delete_column(&cols[1].id, None).unwrap();
    app.delete_column(&cols[2].id, None).unwrap();

    let err = app.delete_column(&cols[0].id, None).unwrap_err();
    assert!(err.is_last_column());
    let err = app.delete_column(&cols[0].id, Some(&cols[1].id)).unwrap_err();
    assert!(err.is_last_column());
    assert_eq!(columns_of(&app, &board.id).len(), 1);
}

#[test]
fn test_delete_moving_cards_reassigns_them_keeping_positions() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Move").unwrap();
    let cols = columns_of(&app, &board.id);
    let a = app.create_card(&cols[0].id, "a").unwrap();
    let b = app.create_card(&cols[0].id, "b").unwrap();
    let existing = app.create_card(&cols[2].id, "already done").unwrap();

    app.delete_column(&cols[0].id, Some(&cols[2].id)).unwrap();

    let moved_a = app.get_card(&a.id).unwrap();
    let moved_b = app.get_card(&b.id).unwrap();
    assert_eq!(moved_a.column_id, cols[2].id);
    assert_eq!(moved_b.column_id, cols[2].id);
    assert_eq!((moved_a.position, moved_b.position), (a.position, b.position));
    // Duplicate positions in the destination are tolerated.
    assert_eq!(moved_a.position, existing.position);

    let data = app.get_board_with_data(&board.id).unwrap();
    assert_eq!(data.columns.len(), 2);
    assert_eq!(data.columns[1].cards.len(), 3);
}

#[test]
fn test_delete_without_move_drops_cards() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Drop").unwrap();
    let cols = columns_of(&app, &board.id);
    let card = app.create_card(&cols[1].id, "gone").unwrap();

    app.delete_column(&cols[1].id, None).unwrap();
    assert!(app.get_card(&card.id).unwrap_err().is_not_found());

    // An empty target id behaves like no target.
    let other = app.create_card(&cols[0].id, "also gone").unwrap();
    app.delete_column(&cols[0].id, Some("")).unwrap();
    assert!(app.get_card(&other.id).unwrap_err().is_not_found());
}

#[test]
fn test_delete_rejects_bad_move_targets() {
    let (_tmp, app) = open_app();
    let board = app.create_board("One").unwrap();
    let other = app.create_board("Two").unwrap();
    let cols = columns_of(&app, &board.id);
    let foreign = columns_of(&app, &other.id).remove(0);
    let card = app.create_card(&cols[0].id, "stays").unwrap();

    assert!(app.delete_column("missing", None).unwrap_err().is_not_found());
    assert!(
        app.delete_column(&cols[0].id, Some("missing"))
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        app.delete_column(&cols[0].id, Some(&cols[0].id))
            .unwrap_err()
            .is_validation()
    );
    assert!(
        app.delete_column(&cols[0].id, Some(&foreign.id))
            .unwrap_err()
            .is_validation()
    );

    assert_eq!(app.get_card(&card.id).unwrap().column_id, cols[0].id);
    assert_eq!(columns_of(&app, &board.id).len(), 3);
}

#[test]
fn test_move_column_overwrites_position() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Move").unwrap();
    let cols = columns_of(&app, &board.id);

    app.move_column(&cols[2].id, 1500).unwrap();
    let order: Vec<String> = columns_of(&app, &board.id).into_iter().map(|c| c.id).collect();
    assert_eq!(order, vec![cols[0].id.clone(), cols[2].id.clone(), cols[1].id.clone()]);

    // Collisions are accepted as given.
    app.move_column(&cols[1].id, 1000).unwrap();
    assert_eq!(
        columns_of(&app, &board.id)
            .iter()
            .filter(|c| c.position == 1000)
            .count(),
        2
    );

    assert!(app.move_column("missing", 10).unwrap_err().is_not_found());
}

#[test]
fn test_failed_delete_keeps_cards_in_their_column() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Guarded").unwrap();
    let cols = columns_of(&app, &board.id);
    let card = app.create_card(&cols[0].id, "stays put").unwrap();
    raw_conn(&app)
        .execute_batch(
            "CREATE TRIGGER fail_column_delete BEFORE DELETE ON columns
             BEGIN SELECT RAISE(ABORT, 'injected delete failure'); END;",
        )
        .unwrap();

    let err = app.delete_column(&cols[0].id, Some(&cols[1].id)).unwrap_err();
    assert!(err.to_string().contains("delete column"), "{err}");

    assert_eq!(app.get_card(&card.id).unwrap().column_id, cols[0].id);
    assert_eq!(columns_of(&app, &board.id).len(), 3);
}

#[test]
fn test_create_after_max_position_is_rejected_not_wrapped() {
    let (_tmp, app) = open_app();
    let board = app.create_board("Edge").unwrap();
    let cols = columns_of(&app, &board.id);

    app.move_column(&cols[2].id, i64::MAX).unwrap();
    assert!(app.create_column(&board.id, "Overflow").unwrap_err().is_validation());
    assert!(
        app.create_columns(&board.id, &["A", "B"])
            .unwrap_err()
            .is_validation()
    );
    assert_eq!(columns_of(&app, &board.id).len(), 3);

    // Room for exactly one more gap still works.
    app.move_column(&cols[2].id, i64::MAX - 2 * 1000).unwrap();
    assert_eq!(
        app.create_column(&board.id, "Last").unwrap().position,
        i64::MAX - 1000
    );
}
