//! Install orchestration tests

use selfhost_installer::errors::InstallerError;
use selfhost_installer::installer::profile::InstallProfile;
use selfhost_installer::storage::install_record::load_install_record;

use crate::common::{
    admin_body, base_body, project_body, request, FakeBackend, FakeRunner, Harness,
};

const SETTINGS_CALLS: [&str; 4] = [
    "upsert_setting:maintenance_mode",
    "upsert_setting:homepage_sections",
    "upsert_setting:site_name",
    "upsert_setting:offers",
];

fn step_names(outcome: &selfhost_installer::installer::steps::InstallOutcome) -> Vec<String> {
    outcome
        .steps
        .as_ref()
        .map(|log| log.records().iter().map(|r| r.step.clone()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_basic_install_writes_config_and_record_only() {
    let h = Harness::new(InstallProfile::Basic, FakeBackend::default(), FakeRunner::default());

    let outcome = h.installer.install(request(base_body())).await.unwrap();

    assert!(outcome.ok);
    assert!(outcome.steps.is_none());
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        serde_json::json!({"ok": true})
    );

    let script = std::fs::read_to_string(h.config_path()).unwrap();
    assert!(script.contains("SUPABASE_URL: \"https://x.test\""));
    assert!(script.contains("SUPABASE_ANON_KEY: \"anon\""));
    assert!(script.contains("ZOOM_WEBHOOK_URL: \"\""));

    let record = load_install_record(&h.layout.install_record_file()).await.unwrap();
    assert_eq!(record.admin_email, "a@b.com");
    assert_eq!(record.admin_password, "pw");
    assert!(record.access_token.is_none());

    assert!(h.backend.calls().is_empty());
    assert!(h.runner.calls().is_empty());
}

#[tokio::test]
async fn test_missing_field_touches_nothing() {
    for profile in [InstallProfile::Basic, InstallProfile::Admin, InstallProfile::Project] {
        let h = Harness::new(profile, FakeBackend::creating("u-1"), FakeRunner::default());
        let mut body = project_body();
        body.as_object_mut().unwrap().remove("ADMIN_EMAIL");

        let result = h.installer.install(request(body)).await;

        assert!(matches!(result, Err(InstallerError::MissingValues)));
        assert!(!h.config_path().exists());
        assert!(!h.record_path().exists());
        assert!(h.backend.calls().is_empty());
        assert!(h.runner.calls().is_empty());
        assert!(h.config_store.snapshot().await.is_none());
    }
}

#[tokio::test]
async fn test_project_profile_requires_link_fields() {
    let h = Harness::new(InstallProfile::Project, FakeBackend::creating("u-1"), FakeRunner::default());

    let result = h.installer.install(request(admin_body())).await;

    assert!(matches!(result, Err(InstallerError::MissingValues)));
    assert!(!h.config_path().exists());
}

#[tokio::test]
async fn test_admin_profile_promotes_created_user() {
    let h = Harness::new(InstallProfile::Admin, FakeBackend::creating("u-1"), FakeRunner::default());

    let outcome = h.installer.install(request(admin_body())).await.unwrap();

    assert!(outcome.ok);
    assert!(outcome.steps.is_none());
    assert_eq!(
        h.backend.calls(),
        [
            "create_admin:a@b.com",
            "update_user:u-1",
            "upsert_profile:u-1",
            "upsert_admin_role:u-1",
        ]
    );
    assert!(h.runner.calls().is_empty());
}

#[tokio::test]
async fn test_admin_fallback_matches_email_case_insensitively() {
    let backend = FakeBackend::with_existing(&[("u-7", "someone@else.com"), ("u-9", "A@B.COM")]);
    let h = Harness::new(InstallProfile::Admin, backend, FakeRunner::default());

    let outcome = h.installer.install(request(admin_body())).await.unwrap();

    assert!(outcome.ok);
    assert_eq!(
        h.backend.calls(),
        [
            "create_admin:a@b.com",
            "list_users",
            "update_user:u-9",
            "upsert_profile:u-9",
            "upsert_admin_role:u-9",
        ]
    );
}

#[tokio::test]
async fn test_created_user_without_id_falls_back_to_lookup() {
    let mut backend = FakeBackend::with_existing(&[("", "a@b.com"), ("u-9", "a@b.com")]);
    backend.created_id = Some(String::new());
    let h = Harness::new(InstallProfile::Admin, backend, FakeRunner::default());

    let outcome = h.installer.install(request(admin_body())).await.unwrap();

    assert!(outcome.ok);
    assert_eq!(
        h.backend.calls(),
        [
            "create_admin:a@b.com",
            "list_users",
            "update_user:u-9",
            "upsert_profile:u-9",
            "upsert_admin_role:u-9",
        ]
    );
}

#[tokio::test]
async fn test_admin_fallback_without_match_stops_quietly() {
    let backend = FakeBackend::with_existing(&[("u-7", "someone@else.com")]);
    let h = Harness::new(InstallProfile::Admin, backend, FakeRunner::default());

    let outcome = h.installer.install(request(admin_body())).await.unwrap();

    assert!(outcome.ok);
    assert_eq!(h.backend.calls(), ["create_admin:a@b.com", "list_users"]);
}

#[tokio::test]
async fn test_admin_substeps_continue_after_failure() {
    let backend = FakeBackend::creating("u-1").failing_update();
    let h = Harness::new(InstallProfile::Admin, backend, FakeRunner::default());

    let outcome = h.installer.install(request(admin_body())).await.unwrap();

    assert!(outcome.ok);
    assert_eq!(
        h.backend.calls()[1..],
        ["update_user:u-1", "upsert_profile:u-1", "upsert_admin_role:u-1"]
    );
}

#[tokio::test]
async fn test_project_install_runs_every_step_in_order() {
    let h = Harness::new(InstallProfile::Project, FakeBackend::creating("u-1"), FakeRunner::default());

    let outcome = h.installer.install(request(project_body())).await.unwrap();

    assert!(outcome.ok);
    assert_eq!(step_names(&outcome), ["init", "login", "link", "push", "secrets"]);
    assert!(outcome.steps.as_ref().unwrap().records().iter().all(|r| r.ok));
    assert_eq!(h.runner.subcommands(), ["init", "login", "link", "db", "secrets"]);

    let mut expected = vec!["create_uploads_bucket".to_string()];
    expected.extend(SETTINGS_CALLS.iter().map(|s| s.to_string()));
    expected.extend(
        ["create_admin:a@b.com", "update_user:u-1", "upsert_profile:u-1", "upsert_admin_role:u-1"]
            .iter()
            .map(|s| s.to_string()),
    );
    assert_eq!(h.backend.calls(), expected);

    let record = load_install_record(&h.layout.install_record_file()).await.unwrap();
    assert_eq!(record.access_token.as_deref(), Some("sbp_token"));
    assert_eq!(record.project_ref.as_deref(), Some("abcdefgh"));
}

#[tokio::test]
async fn test_cli_runs_in_project_dir_with_credentials_in_env() {
    let h = Harness::new(InstallProfile::Project, FakeBackend::creating("u-1"), FakeRunner::default());
    let mut body = project_body();
    body["SUPABASE_DB_PASSWORD"] = serde_json::Value::from("db-pass");

    h.installer.install(request(body)).await.unwrap();

    let calls = h.runner.calls();
    assert!(!calls.is_empty());
    for call in &calls {
        assert_eq!(call.workdir, h.layout.project_dir);
        assert_eq!(call.env.get("SUPABASE_ACCESS_TOKEN").map(String::as_str), Some("sbp_token"));
        assert_eq!(call.env.get("SUPABASE_DB_PASSWORD").map(String::as_str), Some("db-pass"));
    }

    let link = calls.iter().find(|c| c.args[0] == "link").unwrap();
    assert_eq!(link.args, ["link", "--project-ref", "abcdefgh"]);
    let secrets = calls.iter().find(|c| c.args[0] == "secrets").unwrap();
    assert!(secrets.args.contains(&"PROJECT_URL=https://x.test".to_string()));
    assert!(secrets.args.contains(&"SERVICE_ROLE_KEY=service-role".to_string()));
}

#[tokio::test]
async fn test_existing_project_skips_init() {
    let h = Harness::new(InstallProfile::Project, FakeBackend::creating("u-1"), FakeRunner::default());
    let project_config = h.layout.project_config_file();
    std::fs::create_dir_all(project_config.path().parent().unwrap()).unwrap();
    std::fs::write(project_config.path(), "project_id = \"x\"\n").unwrap();

    let outcome = h.installer.install(request(project_body())).await.unwrap();

    assert!(outcome.ok);
    assert_eq!(step_names(&outcome), ["login", "link", "push", "secrets"]);
}

#[tokio::test]
async fn test_failed_init_aborts_install() {
    let h = Harness::new(
        InstallProfile::Project,
        FakeBackend::creating("u-1"),
        FakeRunner::failing_on(&["init"]),
    );

    let outcome = h.installer.install(request(project_body())).await.unwrap();

    assert!(!outcome.ok);
    assert_eq!(step_names(&outcome), ["init"]);
    assert_eq!(h.runner.subcommands(), ["init"]);
    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn test_failed_link_short_circuits() {
    let h = Harness::new(
        InstallProfile::Project,
        FakeBackend::creating("u-1"),
        FakeRunner::failing_on(&["link"]),
    );

    let outcome = h.installer.install(request(project_body())).await.unwrap();

    assert!(!outcome.ok);
    assert_eq!(step_names(&outcome), ["init", "login", "link"]);
    let last = outcome.steps.as_ref().unwrap().last().unwrap();
    assert!(!last.ok);
    assert_eq!(last.err, "link failed");

    // Nothing after the failing step ran
    assert_eq!(h.runner.subcommands(), ["init", "login", "link"]);
    assert!(h.backend.calls().is_empty());

    // Config and record were already written
    assert!(h.config_path().exists());
    assert!(h.record_path().exists());

    assert_eq!(serde_json::to_value(&outcome).unwrap()["ok"], false);
}

#[tokio::test]
async fn test_late_failures_do_not_stop_install() {
    let backend = FakeBackend::creating("u-1")
        .failing_bucket()
        .failing_settings();
    let h = Harness::new(
        InstallProfile::Project,
        backend,
        FakeRunner::failing_on(&["secrets"]),
    );
    let mut body = project_body();
    body["ZOOM_WEBHOOK_SECRET"] = serde_json::Value::from("whsec");

    let outcome = h.installer.install(request(body)).await.unwrap();

    assert!(outcome.ok);
    assert_eq!(
        step_names(&outcome),
        ["init", "login", "link", "push", "secrets", "webhook-secret", "deploy-function"]
    );
    let records = outcome.steps.as_ref().unwrap().records();
    assert!(!records[4].ok);
    assert!(!records[5].ok);
    assert!(records[6].ok);

    let calls = h.backend.calls();
    assert_eq!(calls[0], "create_uploads_bucket");
    assert_eq!(calls[1..5], SETTINGS_CALLS);
    assert_eq!(calls[5], "create_admin:a@b.com");
    assert_eq!(calls.len(), 9);

    let deploy = h.runner.calls().pop().unwrap();
    assert_eq!(
        deploy.args,
        ["functions", "deploy", "zoom-webhook", "--project-ref", "abcdefgh"]
    );
}
