//! Page storage queries

use link_ai::backend::pages::db;
use link_ai::backend::pages::types::NewPage;
use serial_test::serial;

use crate::assert_ok;
use crate::common::database::test_pool;

fn new_page(slug: &str, user_id: &str) -> NewPage {
    NewPage {
        title: "Coffee Shop".to_string(),
        slug: slug.to_string(),
        html_content: "<h1>Coffee</h1>".to_string(),
        prompt: Some("A coffee shop".to_string()),
        user_id: user_id.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
#[serial]
async fn test_insert_and_find_page() {
    let Some(pool) = test_pool().await else { return };

    let page = assert_ok!(db::insert_page(&pool, &new_page("coffee", "user-1")).await);
    assert_eq!(page.views, 0);
    assert!(!page.pwa_enabled);

    let by_slug = assert_ok!(db::find_by_slug(&pool, "coffee").await).expect("page by slug");
    assert_eq!(by_slug.id, page.id);

    let by_id = assert_ok!(db::find_by_id(&pool, page.id).await).expect("page by id");
    assert_eq!(by_id.title, "Coffee Shop");
}

#[tokio::test]
#[serial]
async fn test_ownership_and_listing() {
    let Some(pool) = test_pool().await else { return };

    let mine = assert_ok!(db::insert_page(&pool, &new_page("mine", "user-1")).await);
    assert_ok!(db::insert_page(&pool, &new_page("theirs", "user-2")).await);

    assert!(assert_ok!(db::find_owned(&pool, mine.id, "user-1").await).is_some());
    assert!(assert_ok!(db::find_owned(&pool, mine.id, "user-2").await).is_none());

    let listed = assert_ok!(db::list_pages(&pool, Some("user-1")).await);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].slug, "mine");

    let all = assert_ok!(db::list_pages(&pool, None).await);
    assert_eq!(all.len(), 2);
    assert_eq!(assert_ok!(db::count_pages(&pool).await), 2);
    assert_eq!(assert_ok!(db::count_user_pages(&pool, "user-2").await), 1);
}

#[tokio::test]
#[serial]
async fn test_unique_slug_numbers_collisions() {
    let Some(pool) = test_pool().await else { return };

    assert_eq!(assert_ok!(db::unique_slug(&pool, "coffee").await), "coffee");
    assert_ok!(db::insert_page(&pool, &new_page("coffee", "user-1")).await);

    let next = assert_ok!(db::unique_slug(&pool, "coffee").await);
    assert_ne!(next, "coffee");
    assert!(next.starts_with("coffee"));
    assert!(!assert_ok!(db::slug_exists(&pool, &next).await));
}

#[tokio::test]
#[serial]
async fn test_views_save_and_delete() {
    let Some(pool) = test_pool().await else { return };

    let mut page = assert_ok!(db::insert_page(&pool, &new_page("coffee", "user-1")).await);
    assert_ok!(db::increment_views(&pool, page.id).await);
    assert_ok!(db::increment_views(&pool, page.id).await);
    assert_eq!(assert_ok!(db::total_views(&pool).await), 2);

    page.title = "Tea House".to_string();
    page.meta_description = Some("Loose leaf tea".to_string());
    let saved = assert_ok!(db::save_page(&pool, &page).await);
    assert_eq!(saved.title, "Tea House");
    assert_eq!(saved.meta_description.as_deref(), Some("Loose leaf tea"));

    assert!(assert_ok!(db::delete_page(&pool, page.id).await));
    assert!(!assert_ok!(db::delete_page(&pool, page.id).await));
    assert!(assert_ok!(db::find_by_id(&pool, page.id).await).is_none());
}
