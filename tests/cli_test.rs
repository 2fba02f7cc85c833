//! CLI Command Tests
//!
//! Argument parsing plus the command handlers run against a mock server
//! and an in-memory store. Covers exit codes and input validation.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use clap::Parser;
    use couchtv::cli::{Cli, Command, KindArg};

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from::<_, &str>(["couchtv"]);
        assert!(!cli.is_cli_mode());
        assert!(cli.profile.is_none());
    }

    #[test]
    fn test_streams_defaults() {
        let cli = Cli::parse_from(["couchtv", "streams", "series"]);
        assert!(cli.is_cli_mode());
        match cli.command {
            Some(Command::Streams(cmd)) => {
                assert_eq!(cmd.kind, KindArg::Series);
                assert_eq!(cmd.limit, 50);
                assert!(cmd.category.is_none());
            }
            other => panic!("Expected Streams command, got {:?}", other),
        }
    }

    #[test]
    fn test_command_aliases() {
        let cli = Cli::parse_from(["couchtv", "ls", "vod", "--category", "12"]);
        match cli.command {
            Some(Command::Streams(cmd)) => {
                assert_eq!(cmd.kind, KindArg::Movies);
                assert_eq!(cmd.category.as_deref(), Some("12"));
            }
            other => panic!("Expected Streams command, got {:?}", other),
        }

        let cli = Cli::parse_from(["couchtv", "i", "series", "44"]);
        assert!(matches!(cli.command, Some(Command::Info(ref cmd)) if cmd.id == "44"));

        let cli = Cli::parse_from(["couchtv", "fav"]);
        assert!(matches!(cli.command, Some(Command::Favorites(_))));
    }

    #[test]
    fn test_config_path_flag() {
        let cli = Cli::parse_from(["couchtv", "history", "-c", "/tmp/couchtv.toml"]);
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/tmp/couchtv.toml"))
        );
    }

    #[test]
    fn test_login_requires_credentials() {
        assert!(Cli::try_parse_from(["couchtv", "login", "home", "--url", "tv.example"]).is_err());
    }

    #[test]
    fn test_profiles_delete() {
        let cli = Cli::parse_from(["couchtv", "profiles", "--delete", "kids"]);
        match cli.command {
            Some(Command::Profiles(cmd)) => assert_eq!(cmd.delete.as_deref(), Some("kids")),
            other => panic!("Expected Profiles command, got {:?}", other),
        }
    }
}

// =============================================================================
// Command Handler Tests
// =============================================================================

mod handlers {
    use std::sync::Arc;

    use mockito::{Matcher, Server};

    use couchtv::cli::{
        CategoriesCmd, ExitCode, FavoritesCmd, HistoryCmd, InfoCmd, KindArg, LoginCmd, Output,
        ProfilesCmd, SearchCmd,
    };
    use couchtv::commands::{self, Context};
    use couchtv::config::Config;
    use couchtv::models::{FavoriteMovie, Profile};
    use couchtv::storage::{FavoritesStore, KeyValueStore, MemoryStore, ProfileStore};

    fn output() -> Output {
        Output {
            json: true,
            quiet: true,
        }
    }

    /// Context signed in as `home` against `url`
    fn context(url: &str) -> (Context, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        ProfileStore::new(store.clone()).save(Profile {
            profile_name: "home".into(),
            user_name: "alice".into(),
            password: "secret".into(),
            url: url.to_string(),
        });
        let mut ctx = Context::with_store(Config::default(), store.clone());
        ctx.config.active_profile = Some("home".into());
        (ctx, store)
    }

    #[tokio::test]
    async fn test_login_verifies_against_server() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/player_api.php")
            .match_query(Matcher::Regex("^username=alice&password=secret$".into()))
            .with_body(r#"{"user_info":{"auth":1,"username":"alice","status":"Active"}}"#)
            .create_async()
            .await;

        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut ctx = Context::with_store(Config::default(), store.clone());
        let code = commands::login_cmd(
            LoginCmd {
                name: "home".into(),
                url: server.url(),
                username: "alice".into(),
                password: "secret".into(),
                no_verify: false,
            },
            &mut ctx,
            &output(),
        )
        .await;

        mock.assert_async().await;
        assert_eq!(code, ExitCode::Success);
        assert!(ProfileStore::new(store).get("home").is_some());
    }

    #[tokio::test]
    async fn test_rejected_login_is_not_saved() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/player_api.php")
            .match_query(Matcher::Any)
            .with_body(r#"{"user_info":{"auth":0}}"#)
            .create_async()
            .await;

        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut ctx = Context::with_store(Config::default(), store.clone());
        let code = commands::login_cmd(
            LoginCmd {
                name: "home".into(),
                url: server.url(),
                username: "alice".into(),
                password: "wrong".into(),
                no_verify: false,
            },
            &mut ctx,
            &output(),
        )
        .await;

        assert_eq!(code, ExitCode::AuthError);
        assert!(ProfileStore::new(store).all().is_empty());
        assert!(ctx.config.active_profile.is_none());
    }

    #[tokio::test]
    async fn test_categories_success() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/player_api.php")
            .match_query(Matcher::UrlEncoded(
                "action".into(),
                "get_series_categories".into(),
            ))
            .with_body(r#"[{"category_id":"3","category_name":"Drama"}]"#)
            .create_async()
            .await;

        let (ctx, _) = context(&server.url());
        let code = commands::categories_cmd(
            CategoriesCmd {
                kind: KindArg::Series,
            },
            &ctx,
            &output(),
        )
        .await;
        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_server_error_maps_to_network_exit_code() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/player_api.php")
            .match_query(Matcher::Any)
            .with_status(500)
            .expect_at_least(1)
            .create_async()
            .await;

        let (ctx, _) = context(&server.url());
        let code = commands::search_cmd(
            SearchCmd {
                kind: KindArg::Movies,
                query: "heat".into(),
                limit: 10,
            },
            &ctx,
            &output(),
        )
        .await;
        assert_eq!(code, ExitCode::NetworkError);
    }

    #[tokio::test]
    async fn test_unknown_profile_flag() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut ctx = Context::with_store(Config::default(), store);
        ctx.config.active_profile = Some("ghost".into());
        let code = commands::info_cmd(
            InfoCmd {
                kind: KindArg::Movies,
                id: "7".into(),
            },
            &ctx,
            &output(),
        )
        .await;
        assert_eq!(code, ExitCode::InvalidArgs);
    }

    #[tokio::test]
    async fn test_info_on_live_is_invalid() {
        let (ctx, _) = context("http://127.0.0.1:9");
        let code = commands::info_cmd(
            InfoCmd {
                kind: KindArg::Live,
                id: "1".into(),
            },
            &ctx,
            &output(),
        )
        .await;
        assert_eq!(code, ExitCode::InvalidArgs);
    }

    #[tokio::test]
    async fn test_profiles_delete_unknown() {
        let (ctx, store) = context("http://tv.example");
        let code = commands::profiles_cmd(
            ProfilesCmd {
                delete: Some("kids".into()),
            },
            &ctx,
            &output(),
        )
        .await;
        assert_eq!(code, ExitCode::InvalidArgs);

        let code = commands::profiles_cmd(
            ProfilesCmd {
                delete: Some("home".into()),
            },
            &ctx,
            &output(),
        )
        .await;
        assert_eq!(code, ExitCode::Success);
        assert!(ProfileStore::new(store).all().is_empty());
    }

    #[tokio::test]
    async fn test_history_clear_and_favorites_need_no_server() {
        let (ctx, store) = context("http://127.0.0.1:9");
        FavoritesStore::new(store).add_movie(FavoriteMovie {
            content_id: "7".into(),
            name: "Heat".into(),
            icon: None,
            container_format: Some("mkv".into()),
        });

        let code = commands::history_cmd(
            HistoryCmd {
                remove: None,
                clear: true,
            },
            &ctx,
            &output(),
        )
        .await;
        assert_eq!(code, ExitCode::Success);

        let code = commands::favorites_cmd(FavoritesCmd {}, &ctx, &output()).await;
        assert_eq!(code, ExitCode::Success);
    }
}
