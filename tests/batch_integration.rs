//! Integration tests for the release batch.
//!
//! The first group drives real hosts against wiremock servers and counts the
//! requests that reach the platform. The second group uses MockHost for
//! scenarios that are awkward to express over HTTP.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use releasekit::core::types::RepositoryRef;
use releasekit::forge::github::GitHubHost;
use releasekit::forge::gitlab::GitLabHost;
use releasekit::forge::mock::{FailOn, MockHost, MockOperation};
use releasekit::forge::{CommitSummary, ForgeError, Platform, DEFAULT_TIMEOUT};
use releasekit::release::{
    run_batch, NoopReporter, ReleaseOptions, RepoOutcome, TagOrder,
};

fn github_repos(paths: &[&str]) -> Vec<RepositoryRef> {
    paths
        .iter()
        .map(|p| RepositoryRef::parse(Platform::GitHub, p).unwrap())
        .collect()
}

async fn mount_github_tags(server: &MockServer, repo: &str, tags: &[&str]) {
    let body: Vec<_> = tags
        .iter()
        .map(|t| json!({"name": t, "commit": {"sha": format!("sha-{}", t)}}))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/tags", repo)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// =============================================================================
// Against HTTP
// =============================================================================

mod over_http {
    use super::*;

    #[tokio::test]
    async fn creates_release_with_generated_notes() {
        let server = MockServer::start().await;
        mount_github_tags(&server, "acme/widget", &["v2.0", "v1.0"]).await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/releases/tags/v2.0"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/compare/v1.0...v2.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "commits": [
                    {"sha": "1111111aaaa", "commit": {"message": "Add gear", "author": {"name": "Ada"}}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/widget/releases"))
            .and(body_partial_json(json!({"tag_name": "v2.0", "name": "v2.0"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "tag_name": "v2.0",
                "html_url": "https://github.com/acme/widget/releases/tag/v2.0"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let host = GitHubHost::with_api_base("ghp_test", &server.uri(), DEFAULT_TIMEOUT).unwrap();
        let report = run_batch(
            &host,
            &github_repos(&["acme/widget"]),
            &ReleaseOptions::default(),
            &mut NoopReporter,
        )
        .await;

        assert_eq!(
            report.reports[0].outcome,
            RepoOutcome::Created {
                tag: "v2.0".into(),
                url: "https://github.com/acme/widget/releases/tag/v2.0".into()
            }
        );
        assert_eq!(report.summary.exit_code(), 0);

        let requests = server.received_requests().await.unwrap();
        let post = requests
            .iter()
            .find(|r| r.method.as_str() == "POST")
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
        let notes = body["body"].as_str().unwrap();
        assert!(notes.contains("## What's Changed in v2.0"));
        assert!(notes.contains("- Add gear (1111111) by Ada"));
        assert!(notes.contains(&format!(
            "**Full Changelog**: {}/acme/widget/compare/v1.0...v2.0",
            server.uri()
        )));
    }

    #[tokio::test]
    async fn existing_release_sends_no_post() {
        let server = MockServer::start().await;
        mount_github_tags(&server, "acme/widget", &["v2.0", "v1.0"]).await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/releases/tags/v2.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let host = GitHubHost::with_api_base("ghp_test", &server.uri(), DEFAULT_TIMEOUT).unwrap();
        let report = run_batch(
            &host,
            &github_repos(&["acme/widget"]),
            &ReleaseOptions::default(),
            &mut NoopReporter,
        )
        .await;

        assert_eq!(
            report.reports[0].outcome,
            RepoOutcome::AlreadyExists { tag: "v2.0".into() }
        );
        assert_eq!(report.summary.already_exists, 1);
        assert_eq!(report.summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn tagless_repository_fails_and_batch_continues() {
        let server = MockServer::start().await;
        mount_github_tags(&server, "acme/empty", &[]).await;
        mount_github_tags(&server, "acme/widget", &["v1.0"]).await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/releases/tags/v1.0"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/widget/releases"))
            .and(body_partial_json(json!({"body": "Release v1.0"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "tag_name": "v1.0",
                "html_url": "https://github.com/acme/widget/releases/tag/v1.0"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/empty/releases"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let host = GitHubHost::with_api_base("ghp_test", &server.uri(), DEFAULT_TIMEOUT).unwrap();
        let report = run_batch(
            &host,
            &github_repos(&["acme/empty", "acme/widget"]),
            &ReleaseOptions::default(),
            &mut NoopReporter,
        )
        .await;

        assert_eq!(report.reports[0].outcome, RepoOutcome::NoTags);
        assert!(matches!(report.reports[1].outcome, RepoOutcome::Created { .. }));
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.created, 1);
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.exit_code(), 1);
    }

    #[tokio::test]
    async fn server_error_is_reported_with_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/tags"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let host = GitHubHost::with_api_base("ghp_test", &server.uri(), DEFAULT_TIMEOUT).unwrap();
        let report = run_batch(
            &host,
            &github_repos(&["acme/widget"]),
            &ReleaseOptions::default(),
            &mut NoopReporter,
        )
        .await;

        assert_eq!(
            report.reports[0].outcome,
            RepoOutcome::Failed {
                reason: "HTTP 502: bad gateway".into()
            }
        );
    }

    #[tokio::test]
    async fn gitlab_batch_with_milestones() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/group%2Fsub%2Fproject"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 99})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/99/repository/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "v3.1.0", "commit": {"id": "c3"}}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/99/releases/v3.1.0"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v4/projects/99/releases"))
            .and(body_partial_json(json!({
                "tag_name": "v3.1.0",
                "description": "Release v3.1.0",
                "milestones": ["Q3"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"tag_name": "v3.1.0"})))
            .expect(1)
            .mount(&server)
            .await;

        let host = GitLabHost::with_base_url("glpat-test", &server.uri(), DEFAULT_TIMEOUT).unwrap();
        let repos = vec![RepositoryRef::parse(Platform::GitLab, "group/sub/project").unwrap()];
        let options = ReleaseOptions {
            milestones: vec!["Q3".into()],
            ..Default::default()
        };

        let report = run_batch(&host, &repos, &options, &mut NoopReporter).await;

        assert_eq!(
            report.reports[0].outcome,
            RepoOutcome::Created {
                tag: "v3.1.0".into(),
                url: format!("{}/group/sub/project/-/releases/v3.1.0", server.uri())
            }
        );
    }
}

// =============================================================================
// Against MockHost
// =============================================================================

mod with_mock_host {
    use super::*;

    #[tokio::test]
    async fn rerun_is_idempotent() {
        let host = MockHost::new()
            .with_repo("acme/a", &["v2", "v1"])
            .with_repo("acme/b", &["v9"]);
        let repos = github_repos(&["acme/a", "acme/b"]);

        let first = run_batch(&host, &repos, &ReleaseOptions::default(), &mut NoopReporter).await;
        let second = run_batch(&host, &repos, &ReleaseOptions::default(), &mut NoopReporter).await;

        assert_eq!(first.summary.created, 2);
        assert_eq!(second.summary.created, 0);
        assert_eq!(second.summary.already_exists, 2);
        assert_eq!(host.create_calls(), 2);
    }

    #[tokio::test]
    async fn semver_order_overrides_host_order() {
        let host = MockHost::new().with_repo("acme/a", &["v1.9.0", "v1.10.0", "v1.2.0"]);
        let options = ReleaseOptions {
            tag_order: TagOrder::Semver,
            auto_notes: true,
            ..Default::default()
        };

        run_batch(&host, &github_repos(&["acme/a"]), &options, &mut NoopReporter).await;

        assert!(host.release("acme/a", "v1.10.0").is_some());
        assert!(host.operations().contains(&MockOperation::CompareCommits {
            repo: "acme/a".into(),
            from: "v1.9.0".into(),
            to: "v1.10.0".into()
        }));
    }

    #[tokio::test]
    async fn notes_failure_still_creates_release() {
        let host = MockHost::new()
            .with_repo("acme/a", &["v2", "v1"])
            .with_commits("acme/a", vec![CommitSummary::new("abc1234", "x", "y")])
            .fail_on(FailOn::CompareCommits(ForgeError::NetworkError(
                "reset".into(),
            )));

        let report = run_batch(
            &host,
            &github_repos(&["acme/a"]),
            &ReleaseOptions::default(),
            &mut NoopReporter,
        )
        .await;

        assert!(matches!(report.reports[0].outcome, RepoOutcome::Created { .. }));
        assert_eq!(host.release("acme/a", "v2").unwrap().body, "Release v2");
    }

    #[tokio::test]
    async fn create_failure_is_counted() {
        let host = MockHost::new()
            .with_repo("acme/a", &["v1"])
            .with_repo("acme/b", &["v1"])
            .fail_on_repo(
                "acme/a",
                FailOn::CreateRelease(ForgeError::ApiError {
                    status: 403,
                    message: String::new(),
                }),
            );

        let report = run_batch(
            &host,
            &github_repos(&["acme/a", "acme/b"]),
            &ReleaseOptions::default(),
            &mut NoopReporter,
        )
        .await;

        assert_eq!(
            report.reports[0].outcome,
            RepoOutcome::Failed {
                reason: "could not create release v1: HTTP 403: <empty response body>".into()
            }
        );
        assert!(matches!(report.reports[1].outcome, RepoOutcome::Created { .. }));
        assert_eq!(report.summary.failed, 1);
    }

    #[tokio::test]
    async fn outcomes_follow_input_order() {
        let host = MockHost::new()
            .with_repo("acme/c", &["v1"])
            .with_repo("acme/a", &["v1"])
            .with_repo("acme/b", &["v1"]);

        let report = run_batch(
            &host,
            &github_repos(&["acme/c", "acme/a", "acme/b"]),
            &ReleaseOptions::default(),
            &mut NoopReporter,
        )
        .await;

        let order: Vec<String> = report.reports.iter().map(|r| r.repo.path()).collect();
        assert_eq!(order, vec!["acme/c", "acme/a", "acme/b"]);
    }
}
