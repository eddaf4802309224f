use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{json, Value};

use leadsite::db::{
    DbActivity, DbContactSubmission, DbError, DbEvaluation, DbLead, LeadInput, NewActivity,
    NewEvaluation,
};
use leadsite::http::build_router;
use leadsite::state::AppState;
use leadsite::store::{RecordStore, SqliteStore};
use leadsite::types::Config;

struct TestServer {
    base: String,
    store: Arc<SqliteStore>,
    _dir: tempfile::TempDir,
}

fn write_post(dir: &Path, slug: &str, frontmatter: &str, body: &str) {
    std::fs::write(
        dir.join(format!("{slug}.md")),
        format!("---\n{frontmatter}---\n{body}"),
    )
    .expect("write post");
}

fn seed_content(dir: &Path) {
    write_post(
        dir,
        "zapier-to-n8n",
        "title: Moving off Zapier\ndescription: Lessons from a migration\ndate: 2025-02-01\ncategory: automation\ntags: [n8n]\nkeywords: [zapier]\nrelatedCaseStudy: lead-lifecycle\n",
        "## Why\n\nCost.\n\n## How\n\nSlowly.\n\n### Gotchas\n\nWebhooks.\n\n## Why\n\nAgain.\n",
    );
    write_post(
        dir,
        "crm-hygiene",
        "title: CRM hygiene\ndescription: Keep it clean\ndate: 2024-11-15\ncategory: automation\ntags: []\nkeywords: []\n",
        "Short body.\n",
    );
    write_post(
        dir,
        "pricing-notes",
        "title: Pricing notes\ndescription: Draft thoughts\ndate: 2025-03-01\ncategory: strategy\ntags: []\nkeywords: []\npublished: false\n",
        "Not ready.\n",
    );
}

async fn spawn_with_store(store: Arc<dyn RecordStore>, content_dir: PathBuf) -> String {
    let config = Config {
        content_dir,
        site_url: "https://example.test".to_string(),
        site_title: "Example".to_string(),
        ..Config::default()
    };
    let app = build_router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    format!("http://{addr}")
}

async fn spawn_server() -> TestServer {
    let dir = tempfile::tempdir().expect("tempdir");
    let blog = dir.path().join("blog");
    std::fs::create_dir_all(&blog).expect("content dir");
    seed_content(&blog);

    let store = Arc::new(SqliteStore::open_at(dir.path().join("leads.db")).expect("open store"));
    let base = spawn_with_store(store.clone(), blog).await;

    TestServer {
        base,
        store,
        _dir: dir,
    }
}

fn contact_body(email: &str) -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": email,
        "company": "Engines Ltd",
        "inquiryType": "Client Project",
        "message": "We need help automating our invoicing."
    })
}

async fn post_json(base: &str, path: &str, body: &Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}{path}"))
        .json(body)
        .send()
        .await
        .expect("send");
    let status = resp.status().as_u16();
    let json = resp.json::<Value>().await.expect("json body");
    (status, json)
}

async fn get_json(base: &str, path: &str) -> (u16, Value) {
    let resp = reqwest::get(format!("{base}{path}")).await.expect("send");
    let status = resp.status().as_u16();
    let json = resp.json::<Value>().await.expect("json body");
    (status, json)
}

// =============================================================================
// Submissions
// =============================================================================

#[tokio::test]
async fn contact_submission_succeeds() {
    let server = spawn_server().await;
    let (status, body) = post_json(&server.base, "/api/contact", &contact_body("ada@example.com")).await;

    assert_eq!(status, 200, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Contact form submitted successfully");
    let lead_id = body["leadId"].as_str().expect("lead id");

    let lead = server
        .store
        .with_db(|db| db.get_lead(lead_id))
        .expect("read")
        .expect("lead exists");
    assert_eq!(lead.email, "ada@example.com");
    assert!(lead.has_contact_submission);
}

#[tokio::test]
async fn repeated_contact_submission_reuses_lead() {
    let server = spawn_server().await;
    let (_, first) = post_json(&server.base, "/api/contact", &contact_body("ada@example.com")).await;
    let (_, second) =
        post_json(&server.base, "/api/contact", &contact_body("  ADA@Example.com ")).await;

    assert_eq!(first["leadId"], second["leadId"]);
    let lead_id = first["leadId"].as_str().unwrap().to_string();
    server.store.with_db(|db| {
        assert_eq!(db.count_leads().unwrap(), 1);
        assert_eq!(db.contact_submissions_for_lead(&lead_id).unwrap().len(), 2);
        assert_eq!(db.activities_for_lead(&lead_id).unwrap().len(), 2);
    });
}

#[tokio::test]
async fn contact_validation_lists_field_errors() {
    let server = spawn_server().await;
    let (status, body) = post_json(
        &server.base,
        "/api/contact",
        &json!({"name": "A", "email": "bad", "inquiryType": "Other", "message": "hi"}),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"].as_array().unwrap().len(), 4);
    assert_eq!(server.store.with_db(|db| db.count_leads()).unwrap(), 0);
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let server = spawn_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/evaluation", server.base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["details"], json!(["Request body must be a JSON object"]));
}

#[tokio::test]
async fn get_on_form_routes_is_405() {
    let server = spawn_server().await;
    for path in ["/api/contact", "/api/evaluation"] {
        let (status, body) = get_json(&server.base, path).await;
        assert_eq!(status, 405, "{path}");
        assert_eq!(body["error"], "Method not allowed");
    }
}

#[tokio::test]
async fn evaluation_returns_preview() {
    let server = spawn_server().await;
    let (status, body) = post_json(
        &server.base,
        "/api/evaluation",
        &json!({
            "name": "Grace",
            "email": "grace@example.com",
            "mode": "firefighting",
            "focusArea": "Sales ops",
            "workflowName": "Lead routing",
            "biggestFrustration": "Manual triage",
            "hoursPerWeek": "8",
            "clarityScore": 4,
            "processScore": 4,
            "toolsScore": 4,
            "automationScore": 3,
            "measurementScore": 4
        }),
    )
    .await;

    assert_eq!(status, 200, "{body}");
    assert_eq!(body["message"], "Evaluation submitted successfully");
    assert!(body["evaluationId"].is_string());
    let preview = &body["preview"];
    assert_eq!(preview["category"], "growth");
    assert_eq!(preview["totalScore"], 19);
    assert_eq!(preview["maxScore"], 25);
    assert_eq!(preview["osScores"]["automation"], 3);
    assert_eq!(preview["bottlenecks"], json!([]));
    assert_eq!(preview["workflowName"], "Lead routing");
    assert_eq!(preview["focusArea"], "Sales ops");

    let lead_id = body["leadId"].as_str().unwrap();
    let lead = server.store.with_db(|db| db.get_lead(lead_id)).unwrap().unwrap();
    assert_eq!(lead.estimated_value.as_deref(), Some("8 hrs/week optimization opportunity"));
    assert_eq!(lead.category.as_deref(), Some("growth"));
}

#[tokio::test]
async fn evaluation_requires_name_and_email() {
    let server = spawn_server().await;
    let (status, body) =
        post_json(&server.base, "/api/evaluation", &json!({"mode": "growth"})).await;
    assert_eq!(status, 400);
    assert_eq!(body["details"], json!(["Name is required", "Email is required"]));
}

/// Store whose lead creation always fails.
struct BrokenStore;

impl RecordStore for BrokenStore {
    fn find_lead_by_email(&self, _email: &str) -> Result<Option<DbLead>, DbError> {
        Ok(None)
    }

    fn create_lead(&self, _input: &LeadInput) -> Result<DbLead, DbError> {
        Err(DbError::Migration("database is locked".to_string()))
    }

    fn update_lead(&self, id: &str, _input: &LeadInput) -> Result<DbLead, DbError> {
        Err(DbError::LeadNotFound(id.to_string()))
    }

    fn insert_contact_submission(
        &self,
        _lead_id: &str,
        _message: &str,
    ) -> Result<DbContactSubmission, DbError> {
        unreachable!("no lead is ever created")
    }

    fn insert_evaluation(&self, _evaluation: &NewEvaluation) -> Result<DbEvaluation, DbError> {
        unreachable!("no lead is ever created")
    }

    fn insert_activity(&self, _activity: &NewActivity) -> Result<DbActivity, DbError> {
        unreachable!("no lead is ever created")
    }
}

#[tokio::test]
async fn storage_failure_is_opaque_500() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_with_store(Arc::new(BrokenStore), dir.path().to_path_buf()).await;

    let (status, body) = post_json(&base, "/api/contact", &contact_body("ada@example.com")).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({"error": "Failed to save submission"}));

    let (status, body) = post_json(
        &base,
        "/api/evaluation",
        &json!({"name": "Grace", "email": "grace@example.com"}),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({"error": "Failed to save evaluation"}));
}

// =============================================================================
// Content
// =============================================================================

#[tokio::test]
async fn listing_hides_drafts_but_slug_lookup_finds_them() {
    let server = spawn_server().await;

    let (status, posts) = get_json(&server.base, "/api/posts").await;
    assert_eq!(status, 200);
    let slugs: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["zapier-to-n8n", "crm-hygiene"]);

    let (status, draft) = get_json(&server.base, "/api/posts/pricing-notes").await;
    assert_eq!(status, 200);
    assert_eq!(draft["published"], false);
}

#[tokio::test]
async fn post_detail_has_toc_and_lookups() {
    let server = spawn_server().await;
    let (status, post) = get_json(&server.base, "/api/posts/zapier-to-n8n").await;
    assert_eq!(status, 200);

    let ids: Vec<&str> = post["headings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["why", "how", "gotchas", "why-1"]);
    assert_eq!(post["headings"][2]["level"], 3);
    assert_eq!(post["showToc"], true);
    assert_eq!(post["categoryInfo"]["label"], "Automation");
    assert_eq!(post["caseStudy"]["key"], "lead-lifecycle");
    assert_eq!(post["readTime"], "1 min read");
    assert!(post["content"].as_str().unwrap().contains(r#"<h2 id="why-1">"#));
}

#[tokio::test]
async fn missing_post_is_404() {
    let server = spawn_server().await;
    let (status, body) = get_json(&server.base, "/api/posts/does-not-exist").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Post not found");

    let (status, _) = get_json(&server.base, "/api/posts/does-not-exist/related").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn category_filter_and_related() {
    let server = spawn_server().await;

    let (_, strategy) = get_json(&server.base, "/api/posts?category=strategy").await;
    assert_eq!(strategy, json!([]));

    let (status, related) = get_json(&server.base, "/api/posts/zapier-to-n8n/related").await;
    assert_eq!(status, 200);
    let slugs: Vec<&str> = related
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["crm-hygiene"]);

    let (_, counts) = get_json(&server.base, "/api/categories").await;
    let automation = counts
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["slug"] == "automation")
        .unwrap();
    assert_eq!(automation["count"], 2);
}

#[tokio::test]
async fn rss_feed_lists_published_posts() {
    let server = spawn_server().await;
    let resp = reqwest::get(format!("{}/rss.xml", server.base)).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("application/rss+xml"));

    let xml = resp.text().await.unwrap();
    assert!(xml.contains("<title>Moving off Zapier</title>"));
    assert!(xml.contains("https://example.test/blog/crm-hygiene"));
    assert!(!xml.contains("pricing-notes"));
}

#[tokio::test]
async fn healthz_ok() {
    let server = spawn_server().await;
    let resp = reqwest::get(format!("{}/healthz", server.base)).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}
