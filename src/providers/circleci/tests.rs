#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    use crate::auth::Token;
    use crate::error::WakkaError;
    use crate::providers::circleci::{CircleCiProvider, ProjectRef, Variable};

    const TOKEN: &str = "test-token";

    /// Matches `path` whether or not the server hands the query string to
    /// the path matcher.
    fn path(path: &str) -> Matcher {
        Matcher::Regex(format!(r"^{path}(\?|$)"))
    }

    fn token_query() -> Matcher {
        Matcher::UrlEncoded("circle-token".to_string(), TOKEN.to_string())
    }

    fn provider(server: &ServerGuard) -> CircleCiProvider {
        CircleCiProvider::new(&server.url(), Token::from(TOKEN)).unwrap()
    }

    fn widgets() -> ProjectRef {
        ProjectRef {
            vcs: "github".to_string(),
            username: "acme".to_string(),
            project: "widgets".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_projects() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", path("/projects"))
            .match_query(token_query())
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {
                        "vcs_url": "https://github.com/acme/widgets",
                        "branches": {"master": {"recent_builds": [
                            {"build_num": 7, "status": "success"},
                            {"build_num": 6, "status": "failed"}
                        ]}}
                    },
                    {
                        "vcs_url": "https://github.com/acme/gadgets",
                        "branches": {"master": {"recent_builds": []}}
                    }
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let projects = provider(&server).list_projects().await.unwrap();

        mock.assert_async().await;
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "widgets");
        assert_eq!(projects[0].build_number_label(), "7");
        assert_eq!(projects[0].status_label(), "success");
        assert_eq!(projects[1].status_label(), "N/A");
    }

    #[tokio::test]
    async fn test_list_variables() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", path("/project/github/acme/widgets/envvar"))
            .match_query(token_query())
            .with_status(200)
            .with_body(r#"[{"name":"API_KEY","value":"xxxxf00d"},{"name":"REGION","value":"xxxx-1"}]"#)
            .create_async()
            .await;

        let variables = provider(&server).list_variables(&widgets()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            variables,
            vec![
                Variable {
                    name: "API_KEY".to_string(),
                    value: "xxxxf00d".to_string()
                },
                Variable {
                    name: "REGION".to_string(),
                    value: "xxxx-1".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_upsert_deletes_then_adds() {
        let mut server = Server::new_async().await;
        let delete = server
            .mock("DELETE", path("/project/github/acme/widgets/envvar/API_KEY"))
            .match_query(token_query())
            .with_status(200)
            .with_body(r#"{"message":"ok"}"#)
            .create_async()
            .await;
        let add = server
            .mock("POST", path("/project/github/acme/widgets/envvar"))
            .match_query(token_query())
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"name": "API_KEY", "value": "s3cret"})))
            .with_status(201)
            .with_body(r#"{"name":"API_KEY","value":"xxxxcret"}"#)
            .create_async()
            .await;

        let variable = Variable {
            name: "API_KEY".to_string(),
            value: "s3cret".to_string(),
        };
        provider(&server)
            .upsert_variable(&widgets(), &variable)
            .await
            .unwrap();

        delete.assert_async().await;
        add.assert_async().await;
    }

    #[tokio::test]
    async fn test_upsert_tolerates_missing_variable() {
        let mut server = Server::new_async().await;
        let _delete = server
            .mock("DELETE", path("/project/github/acme/widgets/envvar/NEW_VAR"))
            .with_status(404)
            .with_body(r#"{"message":"Environment variable not found"}"#)
            .create_async()
            .await;
        let add = server
            .mock("POST", path("/project/github/acme/widgets/envvar"))
            .with_status(201)
            .with_body(r#"{"name":"NEW_VAR","value":"xxxx"}"#)
            .create_async()
            .await;

        let variable = Variable {
            name: "NEW_VAR".to_string(),
            value: "value".to_string(),
        };
        let result = provider(&server).upsert_variable(&widgets(), &variable).await;

        assert!(result.is_ok());
        add.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_variable() {
        let mut server = Server::new_async().await;
        let delete = server
            .mock("DELETE", path("/project/github/acme/widgets/envvar/API_KEY"))
            .match_query(token_query())
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"message":"ok"}"#)
            .create_async()
            .await;

        provider(&server)
            .delete_variable(&widgets(), "API_KEY")
            .await
            .unwrap();

        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_error_status_is_not_fatal() {
        let mut server = Server::new_async().await;
        let _delete = server
            .mock("DELETE", path("/project/github/acme/widgets/envvar/API_KEY"))
            .with_status(500)
            .with_body(r#"{"message":"oops"}"#)
            .create_async()
            .await;

        let result = provider(&server).delete_variable(&widgets(), "API_KEY").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_upsert_stops_when_delete_cannot_connect() {
        let provider = CircleCiProvider::new("http://127.0.0.1:1", Token::from(TOKEN)).unwrap();
        let variable = Variable {
            name: "API_KEY".to_string(),
            value: "s3cret".to_string(),
        };

        let err = provider
            .upsert_variable(&widgets(), &variable)
            .await
            .unwrap_err();

        assert!(matches!(err, WakkaError::Transport(_)));
    }

    #[tokio::test]
    async fn test_error_status_is_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", path("/projects"))
            .with_status(401)
            .with_body(r#"{"message":"You must log in first."}"#)
            .create_async()
            .await;

        let err = provider(&server).list_projects().await.unwrap_err();

        match err {
            WakkaError::Api { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("log in"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", path("/project/github/acme/widgets/envvar"))
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = provider(&server)
            .list_variables(&widgets())
            .await
            .unwrap_err();

        assert!(matches!(err, WakkaError::Decode(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Port 1 is reserved and nothing listens there
        let provider = CircleCiProvider::new("http://127.0.0.1:1", Token::from(TOKEN)).unwrap();

        let err = provider.list_projects().await.unwrap_err();

        assert!(matches!(err, WakkaError::Transport(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
