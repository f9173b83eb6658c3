//! Integration tests for the fixture orchestrator
//!
//! End-to-end flows across registration, the capability handle, and the
//! HTTP routes, using the in-memory connector as the backing store.

use fixture_core::{register, FixtureOptions};
use test_utils::{write_fixture_file, TestApp, DEFAULT_FIXTURES_DIR};

mod full_cycle {
    use super::*;
    use axum_test::TestServer;
    use interface_api::create_router;
    use serde_json::json;

    /// The canonical harness flow: seed over HTTP, verify, wipe over HTTP.
    #[tokio::test]
    async fn http_setup_then_teardown_round_trip() {
        let app = TestApp::new();
        let fixtures = register(&app.host, &FixtureOptions::default())
            .await
            .unwrap()
            .expect("test environment should activate");
        let server = TestServer::new(create_router(Some(fixtures))).unwrap();

        let response = server.get("/fixtures/setup").await;
        response.assert_status_ok();
        response.assert_json(&json!({"fixtures": "setup complete"}));
        assert_eq!(app.count("Item"), 2);

        let response = server.get("/fixtures/teardown").await;
        response.assert_status_ok();
        response.assert_json(&json!({"fixtures": "teardown complete"}));
        assert_eq!(app.count("Item"), 0);
        assert_eq!(app.count("Item2"), 0);
    }
}

mod capability_handle {
    use super::*;

    #[tokio::test]
    async fn setup_populates_the_name_registry() {
        let app = TestApp::new();
        let fixtures = register(&app.host, &FixtureOptions::default())
            .await
            .unwrap()
            .unwrap();

        fixtures.setup_all().await.unwrap();
        assert_eq!(
            fixtures.fixture_names().await,
            Some(vec!["Item".to_string(), "Item2".to_string()])
        );
    }

    #[tokio::test]
    async fn setup_is_additive_not_idempotent() {
        let app = TestApp::new();
        let fixtures = register(&app.host, &FixtureOptions::default())
            .await
            .unwrap()
            .unwrap();

        fixtures.setup_all().await.unwrap();
        fixtures.setup_all().await.unwrap();

        assert_eq!(app.count("Item"), 4);
        assert_eq!(app.count("Item2"), 4);
    }

    #[tokio::test]
    async fn selected_setup_and_teardown_leave_other_models_alone() {
        let app = TestApp::new();
        let fixtures = register(&app.host, &FixtureOptions::default())
            .await
            .unwrap()
            .unwrap();

        fixtures
            .setup_selected(&["Item2".to_string()])
            .await
            .unwrap();
        assert_eq!(app.count("Item"), 0);
        assert_eq!(app.count("Item2"), 2);

        fixtures.setup_all().await.unwrap();
        fixtures.teardown_selected(&["Item2".to_string()]).await;
        assert_eq!(app.count("Item"), 2);
        assert_eq!(app.count("Item2"), 0);
    }

    #[tokio::test]
    async fn strict_mode_surfaces_setup_errors_to_the_caller() {
        let app = TestApp::with_invalid_fixtures();
        let options = FixtureOptions::default().error_on_setup_failure(true);
        let fixtures = register(&app.host, &options).await.unwrap().unwrap();

        let err = fixtures.setup_all().await.unwrap_err();
        assert!(err.to_string().contains("Unregistered"));
    }
}

mod cache_behavior {
    use super::*;
    use test_utils::item2_records;

    /// Once a fixture is cached its on-disk content is never re-read, even
    /// if the file changes.
    #[tokio::test]
    async fn cached_fixtures_ignore_file_changes() {
        let app = TestApp::new();
        let fixtures = register(&app.host, &FixtureOptions::default())
            .await
            .unwrap()
            .unwrap();

        fixtures.setup_all().await.unwrap();
        assert_eq!(app.count("Item"), 2);

        // rewrite Item.json with different content
        let dir = app.app_root().join(DEFAULT_FIXTURES_DIR);
        write_fixture_file(&dir, "Item", &item2_records()[..1]);

        fixtures.teardown_all().await;
        fixtures.setup_all().await.unwrap();

        // still the original two records, not the rewritten one
        assert_eq!(app.count("Item"), 2);
    }

    #[tokio::test]
    async fn reset_picks_up_file_changes() {
        let app = TestApp::new();
        let fixtures = register(&app.host, &FixtureOptions::default())
            .await
            .unwrap()
            .unwrap();

        fixtures.setup_all().await.unwrap();

        let dir = app.app_root().join(DEFAULT_FIXTURES_DIR);
        write_fixture_file(&dir, "Item", &item2_records()[..1]);

        fixtures.teardown_all().await;
        fixtures.reset().await;
        fixtures.setup_all().await.unwrap();

        assert_eq!(app.count("Item"), 1);
    }
}

mod startup_load {
    use super::*;

    #[tokio::test]
    async fn load_on_startup_seeds_before_registration_returns() {
        let app = TestApp::new();
        let options = FixtureOptions::default().load_on_startup(true);

        register(&app.host, &options).await.unwrap().unwrap();
        assert_eq!(app.count("Item"), 2);
        assert_eq!(app.count("Item2"), 2);
    }

    #[tokio::test]
    async fn startup_failures_are_swallowed_unless_strict() {
        let app = TestApp::with_invalid_fixtures();
        let options = FixtureOptions::default().load_on_startup(true);
        assert!(register(&app.host, &options).await.is_ok());

        let strict = FixtureOptions::default()
            .load_on_startup(true)
            .error_on_setup_failure(true);
        assert!(register(&app.host, &strict).await.is_err());
    }

    #[tokio::test]
    async fn extra_fixture_files_appear_in_the_registry() {
        let app = TestApp::new();
        let dir = app.app_root().join(DEFAULT_FIXTURES_DIR);
        app.datasource.define_model("Extra");
        write_fixture_file(&dir, "Extra", &test_utils::item_records());

        let options = FixtureOptions::default().load_on_startup(true);
        let fixtures = register(&app.host, &options).await.unwrap().unwrap();

        assert_eq!(
            fixtures.fixture_names().await,
            Some(vec![
                "Extra".to_string(),
                "Item".to_string(),
                "Item2".to_string()
            ])
        );
        assert_eq!(app.count("Extra"), 2);
    }
}
