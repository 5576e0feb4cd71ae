//! Tests for the project catalogue queries and the startup seed.

mod common;

use common::{create_project, setup_test_db};
use ft_nexus::models::project;
use rusqlite::params;

#[test]
fn test_find_all_ordered_by_index() {
    let (_dir, conn) = setup_test_db();
    conn.execute(
        "INSERT INTO projects (name, slug, order_index) VALUES ('minishell', 'minishell', 5)",
        params![],
    )
    .expect("insert");
    conn.execute(
        "INSERT INTO projects (name, slug, order_index) VALUES ('Libft', 'libft', 0)",
        params![],
    )
    .expect("insert");

    let all = project::find_all(&conn).expect("find_all");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].slug, "libft");
    assert_eq!(all[1].slug, "minishell");
}

#[test]
fn test_lookup_by_id_and_slug() {
    let (_dir, conn) = setup_test_db();
    let id = create_project(&conn, "push_swap", "push-swap");

    let by_id = project::find_by_id(&conn, id).expect("find").expect("exists");
    assert_eq!(by_id.name, "push_swap");

    let by_slug = project::find_by_slug(&conn, "push-swap").expect("find").expect("exists");
    assert_eq!(by_slug.id, id);

    assert!(project::find_by_id(&conn, 9999).expect("find").is_none());
    assert!(project::find_by_slug(&conn, "nope").expect("find").is_none());
    assert!(project::exists(&conn, id).expect("exists"));
    assert!(!project::exists(&conn, 9999).expect("exists"));
}
