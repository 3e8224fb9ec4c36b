mod common;

use courseboard::models::content::Category;

#[tokio::test]
async fn public_dashboard_groups_content_by_category() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    env.seed_item(Category::Slides, "Week 1", 5).await;
    env.seed_item(Category::Assignments, "Problem Set 1", 4).await;
    env.seed_item(Category::Links, "Course page", 3).await;
    env.seed_item(Category::Announcements, "Welcome", 6).await;
    env.seed_item(Category::Announcements, "Room change", 2).await;
    env.seed_item(Category::Announcements, "Quiz friday", 0).await;

    let body: serde_json::Value = server.get("/").await.json();

    assert_eq!(body["slides"].as_array().unwrap().len(), 1);
    assert_eq!(body["assignments"].as_array().unwrap().len(), 1);
    assert_eq!(body["links"].as_array().unwrap().len(), 1);
    assert_eq!(body["announcements"].as_array().unwrap().len(), 3);

    // The banner shows only the latest two, newest first.
    let recent = body["recentAnnouncements"].as_array().unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["title"].as_str(), None);
    assert_eq!(recent[0]["name"].as_str(), Some("Quiz friday"));
    assert_eq!(recent[1]["name"].as_str(), Some("Room change"));
}

#[tokio::test]
async fn dashboard_reflects_admin_mutations() {
    let env = common::TestEnv::start().await;
    let server = env.server();
    env.login(&server, "instructor").await;

    env.post_announcement(&server, "Welcome", "First week notes are up.")
        .await;

    let body: serde_json::Value = server.get("/").await.json();
    let announcements = body["announcements"].as_array().unwrap();
    assert_eq!(announcements.len(), 1);
    assert_eq!(announcements[0]["title"].as_str(), Some("Welcome"));
}

#[tokio::test]
async fn admin_dashboard_is_gated() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    server.get("/admin").await.assert_status_unauthorized();

    env.login(&server, "student").await;
    server.get("/admin").await.assert_status_forbidden();
}

#[tokio::test]
async fn admin_dashboard_counts_items() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    env.seed_item(Category::Slides, "Week 1", 2).await;
    env.seed_item(Category::Slides, "Week 2", 1).await;
    env.seed_item(Category::Links, "Course page", 1).await;

    env.login(&server, "instructor").await;
    let body: serde_json::Value = server.get("/admin").await.json();

    assert_eq!(body["user"]["isAdmin"].as_bool(), Some(true));
    assert_eq!(body["totalItems"].as_u64(), Some(3));
    assert_eq!(body["counts"]["slides"].as_u64(), Some(2));
    assert_eq!(body["counts"]["links"].as_u64(), Some(1));
    assert_eq!(body["counts"]["announcements"].as_u64(), Some(0));
}
