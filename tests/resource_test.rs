//! Integration tests for the resource model layer: creation validation,
//! vote toggle semantics, filtered listing and owner/staff delete.

mod common;

use common::{create_project, create_user, get_user, setup_test_db};
use ft_nexus::errors::AppError;
use ft_nexus::models::resource::{self, NewResource, ResourceFilter, VoteOutcome};

fn new_resource(project_id: i64, title: &str) -> NewResource {
    NewResource {
        project_id,
        title: title.to_string(),
        url: "https://example.com/guide".to_string(),
        description: None,
        resource_type: Some("article".to_string()),
    }
}

#[test]
fn test_create_and_read_resource() {
    let (_dir, conn) = setup_test_db();
    let author = create_user(&conn, 1001, "author", false);
    let project_id = create_project(&conn, "Libft", "libft");

    let id = resource::create(&conn, author, &new_resource(project_id, "Libft guide"))
        .expect("create");
    let item = resource::find_by_id(&conn, id).expect("find").expect("exists");
    assert_eq!(item.title, "Libft guide");
    assert_eq!(item.user_login, "author");
    assert_eq!(item.project_name, "Libft");
    assert_eq!((item.upvotes, item.downvotes), (0, 0));
}

#[test]
fn test_create_validation() {
    let (_dir, conn) = setup_test_db();
    let author = create_user(&conn, 1001, "author", false);
    let project_id = create_project(&conn, "Libft", "libft");

    let mut input = new_resource(project_id, "");
    assert!(matches!(
        resource::create(&conn, author, &input),
        Err(AppError::Validation(_))
    ));

    input.title = "ok".to_string();
    input.resource_type = Some("podcast".to_string());
    assert!(matches!(
        resource::create(&conn, author, &input),
        Err(AppError::Validation(_))
    ));

    input.resource_type = None;
    input.project_id = 9999;
    assert!(matches!(
        resource::create(&conn, author, &input),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_vote_toggle_semantics() {
    let (_dir, conn) = setup_test_db();
    let author = create_user(&conn, 1001, "author", false);
    let voter = create_user(&conn, 1002, "voter", false);
    let project_id = create_project(&conn, "Libft", "libft");
    let id = resource::create(&conn, author, &new_resource(project_id, "Guide")).expect("create");

    // Record, flip, then toggle off.
    assert_eq!(resource::vote(&conn, id, voter, true).expect("up"), VoteOutcome::Recorded);
    let item = resource::find_by_id(&conn, id).expect("find").expect("exists");
    assert_eq!((item.upvotes, item.downvotes), (1, 0));

    assert_eq!(resource::vote(&conn, id, voter, false).expect("flip"), VoteOutcome::Changed);
    let item = resource::find_by_id(&conn, id).expect("find").expect("exists");
    assert_eq!((item.upvotes, item.downvotes), (0, 1));

    assert_eq!(resource::vote(&conn, id, voter, false).expect("off"), VoteOutcome::Removed);
    let item = resource::find_by_id(&conn, id).expect("find").expect("exists");
    assert_eq!((item.upvotes, item.downvotes), (0, 0));

    assert!(matches!(
        resource::vote(&conn, 9999, voter, true),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_list_filters() {
    let (_dir, conn) = setup_test_db();
    let author = create_user(&conn, 1001, "author", false);
    let libft = create_project(&conn, "Libft", "libft");
    let minishell = create_project(&conn, "minishell", "minishell");

    resource::create(&conn, author, &new_resource(libft, "Libft testing guide")).expect("r1");
    resource::create(&conn, author, &new_resource(minishell, "Parser deep dive")).expect("r2");
    let mut video = new_resource(minishell, "Shell video");
    video.resource_type = Some("video".to_string());
    resource::create(&conn, author, &video).expect("r3");

    let all = resource::list(&conn, &ResourceFilter::default()).expect("all");
    assert_eq!(all.len(), 3);

    let minishell_only = resource::list(
        &conn,
        &ResourceFilter { project_id: Some(minishell), ..Default::default() },
    )
    .expect("by project");
    assert_eq!(minishell_only.len(), 2);

    let videos = resource::list(
        &conn,
        &ResourceFilter { resource_type: Some("video".to_string()), ..Default::default() },
    )
    .expect("by type");
    assert_eq!(videos.len(), 1);

    let searched = resource::list(
        &conn,
        &ResourceFilter { search: Some("guide".to_string()), ..Default::default() },
    )
    .expect("by search");
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].title, "Libft testing guide");
}

#[test]
fn test_delete_owner_or_staff_only() {
    let (_dir, conn) = setup_test_db();
    let author = create_user(&conn, 1001, "author", false);
    let stranger = create_user(&conn, 1002, "stranger", false);
    let staff = create_user(&conn, 2001, "staff", true);
    let project_id = create_project(&conn, "Libft", "libft");

    let id = resource::create(&conn, author, &new_resource(project_id, "Guide")).expect("create");

    let stranger_user = get_user(&conn, stranger);
    assert!(matches!(
        resource::delete(&conn, id, &stranger_user),
        Err(AppError::Forbidden(_))
    ));

    let staff_user = get_user(&conn, staff);
    resource::delete(&conn, id, &staff_user).expect("staff delete");
    assert!(resource::find_by_id(&conn, id).expect("find").is_none());

    assert!(matches!(
        resource::delete(&conn, id, &staff_user),
        Err(AppError::NotFound(_))
    ));
}
