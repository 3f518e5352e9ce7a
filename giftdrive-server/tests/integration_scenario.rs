use axum::http::StatusCode;
use giftdrive_server::{server, storage};
use giftdrive_shared::api::{AdminCredentials, PledgeReq, endpoints as ep, rest};
use reqwest::Client;
use serde_json::{Value, json};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::Path;

const ADMIN_EMAIL: &str = "admin@example.org";
const ADMIN_PASSWORD: &str = "secret123";
const JWT_SECRET: &str = "integration-test-secret";

struct TestServer {
    base: String,
    client: Client,
    handle: tokio::task::JoinHandle<()>,
    _tempdir: tempfile::TempDir,
}

impl TestServer {
    async fn spawn() -> Option<Self> {
        Self::spawn_with(Some(JWT_SECRET)).await
    }

    async fn spawn_with(jwt_secret: Option<&str>) -> Option<Self> {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let (addr, handle) = match start_server(&db_path, jwt_secret).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                eprintln!("Skipping test due to sandbox restrictions: {e}");
                return None;
            }
            Err(e) => panic!("failed to start server: {e}"),
        };
        Some(Self {
            base: format!("http://{}", addr),
            client: Client::new(),
            handle,
            _tempdir: dir,
        })
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let url = format!("{}{}", self.base, path);
        let mut req = match method {
            "GET" => self.client.get(&url),
            "POST" => self.client.post(&url),
            "PUT" => self.client.put(&url),
            "DELETE" => self.client.delete(&url),
            other => panic!("unsupported method {other}"),
        };
        if let Some(t) = token {
            req = req.bearer_auth(t);
        }
        if let Some(b) = body {
            req = req.json(&b);
        }
        let resp = req.send().await.unwrap();
        let status = resp.status();
        let text = resp.text().await.unwrap();
        let val = if text.is_empty() {
            json!(null)
        } else {
            serde_json::from_str(&text).unwrap_or(json!({"raw": text}))
        };
        (status, val)
    }

    async fn request_expect(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
        expected: StatusCode,
    ) -> Value {
        let (status, value) = self.request(method, path, token, body).await;
        assert_eq!(
            status, expected,
            "{method} {path} returned {status:?} with body {value:?}",
        );
        value
    }

    /// Admin write with credentials merged into the JSON body.
    async fn admin_write(
        &self,
        method: &str,
        resource: &str,
        mut body: Value,
        password: &str,
        expected: StatusCode,
    ) -> Value {
        body["email"] = json!(ADMIN_EMAIL);
        body["password"] = json!(password);
        self.request_expect(method, resource, None, Some(body), expected)
            .await
    }

    async fn create_party(&self, name: &str, date: &str) -> i64 {
        let v = self
            .admin_write(
                "POST",
                ep::ADMIN_PARTY,
                json!({"name": name, "date": date, "location": "Hall", "description": "Fun"}),
                ADMIN_PASSWORD,
                StatusCode::OK,
            )
            .await;
        v["party"]["id"].as_i64().unwrap()
    }

    async fn create_child(&self, party_id: i64, name: &str, wishlist: Value) -> Value {
        let v = self
            .admin_write(
                "POST",
                ep::ADMIN_CHILD,
                json!({"name": name, "age": 7, "partyId": party_id, "wishlist": wishlist}),
                ADMIN_PASSWORD,
                StatusCode::OK,
            )
            .await;
        v["child"].clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn creds() -> AdminCredentials {
    AdminCredentials::new(ADMIN_EMAIL, ADMIN_PASSWORD)
}

fn wrong_creds() -> AdminCredentials {
    AdminCredentials::new(ADMIN_EMAIL, "not-the-password")
}

async fn start_server(
    tmp_db: &Path,
    jwt_secret: Option<&str>,
) -> Result<(SocketAddr, tokio::task::JoinHandle<()>), std::io::Error> {
    // Low cost keeps debug-build verification fast
    let admin_hash = bcrypt::hash(ADMIN_PASSWORD, 4).unwrap();
    let config = server::AppConfig {
        app_name: "Giftdrive Test".into(),
        jwt_secret: jwt_secret.map(str::to_string),
        admins: vec![server::AdminConfig {
            email: ADMIN_EMAIL.into(),
            password_hash: admin_hash,
        }],
        ..Default::default()
    };

    let store = storage::Store::connect_sqlite(tmp_db.to_str().unwrap())
        .await
        .expect("db");
    for admin in &config.admins {
        store
            .upsert_admin(&admin.email, &admin.password_hash)
            .await
            .expect("admin");
    }

    let state = server::AppState::new(config, store);
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Ok((addr, handle))
}

#[tokio::test]
async fn public_endpoints_work() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };
    server
        .request_expect("GET", "/healthz", None, None, StatusCode::OK)
        .await;
    let parties = server
        .request_expect("GET", ep::PARTIES, None, None, StatusCode::OK)
        .await;
    assert!(parties.as_array().unwrap().is_empty());

    let missing = server
        .request_expect("GET", "/parties/999", None, None, StatusCode::NOT_FOUND)
        .await;
    assert_eq!(missing["error"], "Party not found");
    server
        .request_expect("GET", "/parties/abc", None, None, StatusCode::NOT_FOUND)
        .await;

    let late = server.create_party("Late Party", "2024-12-22").await;
    let early = server.create_party("Early Party", "2024-12-20T10:00:00Z").await;
    server.create_child(early, "Thabo", json!(["bike"])).await;

    let parties = rest::list_parties(&server.base).await.unwrap();
    assert_eq!(
        parties.iter().map(|p| p.id as i64).collect::<Vec<_>>(),
        vec![early, late]
    );
    assert_eq!(parties[0].child_count, 1);
    assert_eq!(parties[1].child_count, 0);
    assert_eq!(parties[0].date, "2024-12-20T10:00:00+00:00");

    let party = rest::get_party(&server.base, early as i32).await.unwrap();
    assert_eq!(party.party.name, "Early Party");
    assert_eq!(party.children.len(), 1);
    assert_eq!(party.children[0].wishlist[0].text, "bike");
    assert!(party.children[0].pledges.is_empty());
}

#[tokio::test]
async fn responses_carry_request_id_and_no_store() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };
    let resp = server
        .client
        .get(format!("{}/parties", server.base))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "req-42");
    assert!(
        resp.headers()["cache-control"]
            .to_str()
            .unwrap()
            .contains("no-store")
    );
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");

    let resp = server
        .client
        .get(format!("{}/healthz", server.base))
        .send()
        .await
        .unwrap();
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn pledge_flow() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };
    let party = server.create_party("Winter", "2024-12-20").await;
    let child = server.create_child(party, "Lerato", json!(["doll"])).await;
    let child_id = child["id"].as_i64().unwrap();

    let missing = server
        .request_expect(
            "POST",
            ep::PLEDGE,
            None,
            Some(json!({"donorName": "Ann"})),
            StatusCode::BAD_REQUEST,
        )
        .await;
    assert_eq!(missing["error"], "Child ID is required");

    server
        .request_expect(
            "POST",
            ep::PLEDGE,
            None,
            Some(json!({"childId": 9999})),
            StatusCode::NOT_FOUND,
        )
        .await;

    // Form-style string id, blank fields stored as absent
    let ok = server
        .request_expect(
            "POST",
            ep::PLEDGE,
            None,
            Some(json!({
                "childId": child_id.to_string(),
                "donorName": "Ann",
                "donorEmail": "  ",
                "message": "Merry Christmas"
            })),
            StatusCode::OK,
        )
        .await;
    assert_eq!(ok["success"], true);
    assert_eq!(ok["pledge"]["donorName"], "Ann");
    assert!(ok["pledge"]["donorEmail"].is_null());
    assert_eq!(ok["pledge"]["childId"].as_i64().unwrap(), child_id);

    let again = server
        .request_expect(
            "POST",
            ep::PLEDGE,
            None,
            Some(json!({"childId": child_id, "donorName": "Bob"})),
            StatusCode::BAD_REQUEST,
        )
        .await;
    assert_eq!(again["error"], "This child has already been pledged for");

    let tree = rest::get_party(&server.base, party as i32).await.unwrap();
    let kid = &tree.children[0];
    assert!(kid.child.pledged);
    assert_eq!(kid.pledges.len(), 1);
    assert_eq!(kid.pledges[0].donor_name.as_deref(), Some("Ann"));
}

#[tokio::test]
async fn concurrent_pledges_have_single_winner() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };
    let party = server.create_party("Winter", "2024-12-20").await;
    let child = server.create_child(party, "Sipho", json!([])).await;
    let child_id = child["id"].as_i64().unwrap() as i32;

    let attempts = (0..12).map(|i| {
        let base = server.base.clone();
        async move {
            let req = PledgeReq {
                child_id: Some(child_id),
                donor_name: Some(format!("Donor {i}")),
                ..Default::default()
            };
            rest::pledge(&base, &req).await
        }
    });
    let results = futures::future::join_all(attempts).await;

    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "results: {results:?}");
    for r in results.iter().filter_map(|r| r.as_ref().err()) {
        match r {
            rest::RestError::Status { status, body } => {
                assert_eq!(*status, 400, "unexpected error {r:?}");
                assert!(body.contains("already been pledged"), "unexpected body {body}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    let tree = rest::get_party(&server.base, party as i32).await.unwrap();
    assert_eq!(tree.children[0].pledges.len(), 1);
}

#[tokio::test]
async fn wrong_password_is_rejected_and_changes_nothing() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };
    let party = server.create_party("Winter", "2024-12-20").await;

    let rejected = server
        .admin_write(
            "POST",
            ep::ADMIN_PARTY,
            json!({"name": "Sneaky", "date": "2024-12-24", "location": "x", "description": "y"}),
            "nope",
            StatusCode::UNAUTHORIZED,
        )
        .await;
    assert_eq!(rejected["error"], "Invalid credentials");

    server
        .admin_write(
            "PUT",
            ep::ADMIN_PARTY,
            json!({"id": party, "name": "Renamed", "date": "2024-12-24", "location": "x", "description": "y"}),
            "nope",
            StatusCode::UNAUTHORIZED,
        )
        .await;
    server
        .request_expect(
            "DELETE",
            &ep::admin_delete("", ep::ADMIN_PARTY, party as i32, &wrong_creds()),
            None,
            None,
            StatusCode::UNAUTHORIZED,
        )
        .await;

    for resource in [ep::ADMIN_PARTY, ep::ADMIN_CHILD, ep::ADMIN_WISHLIST, ep::ADMIN_EXPORT] {
        server
            .request_expect(
                "GET",
                &ep::admin_list("", resource, &wrong_creds()),
                None,
                None,
                StatusCode::UNAUTHORIZED,
            )
            .await;
        server
            .request_expect(
                "GET",
                &ep::admin_list("", resource, &AdminCredentials::default()),
                None,
                None,
                StatusCode::UNAUTHORIZED,
            )
            .await;
    }

    // Unknown admin looks the same as a wrong password
    let stranger = AdminCredentials::new("nobody@example.org", ADMIN_PASSWORD);
    server
        .request_expect(
            "GET",
            &ep::admin_list("", ep::ADMIN_PARTY, &stranger),
            None,
            None,
            StatusCode::UNAUTHORIZED,
        )
        .await;

    let child = server.create_child(party, "Lerato", json!(["doll"])).await;
    let child_id = child["id"].as_i64().unwrap();
    let item_id = child["wishlist"][0]["id"].as_i64().unwrap();
    server
        .admin_write(
            "POST",
            ep::ADMIN_CHILD,
            json!({"name": "Sneaky", "age": 5, "partyId": party, "wishlist": ["pony"]}),
            "nope",
            StatusCode::UNAUTHORIZED,
        )
        .await;
    server
        .admin_write(
            "PUT",
            ep::ADMIN_WISHLIST,
            json!({"id": item_id, "childId": child_id, "text": "castle"}),
            "nope",
            StatusCode::UNAUTHORIZED,
        )
        .await;
    let tree = rest::get_party(&server.base, party as i32).await.unwrap();
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].wishlist.len(), 1);
    assert_eq!(tree.children[0].wishlist[0].text, "doll");

    let parties = rest::list_parties(&server.base).await.unwrap();
    assert_eq!(parties.len(), 1);
    assert_eq!(parties[0].name, "Winter");

    server
        .admin_write(
            "PUT",
            ep::ADMIN_PARTY,
            json!({"id": party, "name": "Renamed", "date": "2024-12-24", "location": "x", "description": "y"}),
            ADMIN_PASSWORD,
            StatusCode::OK,
        )
        .await;
    let parties = rest::list_parties(&server.base).await.unwrap();
    assert_eq!(parties[0].name, "Renamed");
}

#[tokio::test]
async fn admin_crud_and_cascade() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };
    let party = server.create_party("Winter", "2024-12-20").await;
    let child = server
        .create_child(party, "Thabo", json!(["bike", "", "   ", "ball"]))
        .await;
    let child_id = child["id"].as_i64().unwrap();
    assert_eq!(child["wishlist"].as_array().unwrap().len(), 2);
    assert_eq!(child["pledged"], false);

    // Replace the wishlist; blanks are dropped
    let updated = server
        .admin_write(
            "PUT",
            ep::ADMIN_CHILD,
            json!({"id": child_id, "name": "Thabo M", "age": "9", "partyId": party, "wishlist": ["a", "", "  ", "b"]}),
            ADMIN_PASSWORD,
            StatusCode::OK,
        )
        .await;
    let texts: Vec<&str> = updated["child"]["wishlist"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts.len(), 2);
    assert!(texts.contains(&"a") && texts.contains(&"b"));
    assert_eq!(updated["child"]["age"], 9);

    // Single wishlist item lifecycle
    let item = server
        .admin_write(
            "POST",
            ep::ADMIN_WISHLIST,
            json!({"childId": child_id, "text": "kite"}),
            ADMIN_PASSWORD,
            StatusCode::OK,
        )
        .await;
    let item_id = item["wishlistItem"]["id"].as_i64().unwrap();
    server
        .admin_write(
            "PUT",
            ep::ADMIN_WISHLIST,
            json!({"id": item_id, "childId": child_id, "text": "red kite"}),
            ADMIN_PASSWORD,
            StatusCode::OK,
        )
        .await;
    let items = server
        .request_expect(
            "GET",
            &ep::admin_list("", ep::ADMIN_WISHLIST, &creds()),
            None,
            None,
            StatusCode::OK,
        )
        .await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["text"], "red kite");
    assert_eq!(items[0]["child"]["party"]["name"], "Winter");

    server
        .request_expect(
            "DELETE",
            &ep::admin_delete("", ep::ADMIN_WISHLIST, item_id as i32, &creds()),
            None,
            None,
            StatusCode::OK,
        )
        .await;
    server
        .request_expect(
            "DELETE",
            &ep::admin_delete("", ep::ADMIN_WISHLIST, item_id as i32, &creds()),
            None,
            None,
            StatusCode::NOT_FOUND,
        )
        .await;

    server
        .request_expect(
            "POST",
            ep::PLEDGE,
            None,
            Some(json!({"childId": child_id})),
            StatusCode::OK,
        )
        .await;

    let children = server
        .request_expect(
            "GET",
            &ep::admin_list("", ep::ADMIN_CHILD, &creds()),
            None,
            None,
            StatusCode::OK,
        )
        .await;
    let children = children.as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["party"]["id"].as_i64().unwrap(), party);
    assert_eq!(children[0]["pledges"].as_array().unwrap().len(), 1);

    let parties = server
        .request_expect(
            "GET",
            &ep::admin_list("", ep::ADMIN_PARTY, &creds()),
            None,
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(parties[0]["children"][0]["id"].as_i64().unwrap(), child_id);

    // Deleting the party takes everything below it
    let deleted = server
        .request_expect(
            "DELETE",
            &ep::admin_delete("", ep::ADMIN_PARTY, party as i32, &creds()),
            None,
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(deleted["success"], true);
    server
        .request_expect(
            "GET",
            &format!("/parties/{party}"),
            None,
            None,
            StatusCode::NOT_FOUND,
        )
        .await;
    for resource in [ep::ADMIN_CHILD, ep::ADMIN_WISHLIST] {
        let rows = server
            .request_expect(
                "GET",
                &ep::admin_list("", resource, &creds()),
                None,
                None,
                StatusCode::OK,
            )
            .await;
        assert!(rows.as_array().unwrap().is_empty(), "{resource} not empty");
    }
    server
        .request_expect(
            "POST",
            ep::PLEDGE,
            None,
            Some(json!({"childId": child_id})),
            StatusCode::NOT_FOUND,
        )
        .await;
}

#[tokio::test]
async fn admin_validation_errors() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };
    let party = server.create_party("Winter", "2024-12-20").await;

    server
        .admin_write(
            "POST",
            ep::ADMIN_PARTY,
            json!({"name": "Bad", "date": "tomorrow", "location": "x", "description": "y"}),
            ADMIN_PASSWORD,
            StatusCode::BAD_REQUEST,
        )
        .await;
    server
        .admin_write(
            "POST",
            ep::ADMIN_CHILD,
            json!({"name": "Neg", "age": -2, "partyId": party}),
            ADMIN_PASSWORD,
            StatusCode::BAD_REQUEST,
        )
        .await;
    let missing_id = server
        .admin_write(
            "PUT",
            ep::ADMIN_CHILD,
            json!({"name": "NoId", "age": 3, "partyId": party}),
            ADMIN_PASSWORD,
            StatusCode::BAD_REQUEST,
        )
        .await;
    assert_eq!(missing_id["error"], "Child ID is required");
    server
        .admin_write(
            "POST",
            ep::ADMIN_CHILD,
            json!({"name": "Orphan", "age": 3, "partyId": 4242}),
            ADMIN_PASSWORD,
            StatusCode::NOT_FOUND,
        )
        .await;
    server
        .admin_write(
            "PUT",
            ep::ADMIN_PARTY,
            json!({"id": 4242, "name": "Ghost", "date": "2024-12-20", "location": "x", "description": "y"}),
            ADMIN_PASSWORD,
            StatusCode::NOT_FOUND,
        )
        .await;

    // Nothing from the failed writes was stored
    let children = server
        .request_expect(
            "GET",
            &ep::admin_list("", ep::ADMIN_CHILD, &creds()),
            None,
            None,
            StatusCode::OK,
        )
        .await;
    assert!(children.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn export_returns_workbook() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };
    let party = server.create_party("Winter Wonderland!", "2024-12-20").await;
    let child = server.create_child(party, "Thabo", json!(["bike"])).await;
    server.create_party("Empty", "2024-12-22").await;
    server
        .request_expect(
            "POST",
            ep::PLEDGE,
            None,
            Some(json!({"childId": child["id"], "donorName": "Ann"})),
            StatusCode::OK,
        )
        .await;

    let (filename, bytes) = rest::admin_export(&server.base, &creds()).await.unwrap();
    let filename = filename.unwrap();
    assert!(filename.starts_with("giftdrive-test-report-"), "{filename}");
    assert!(filename.ends_with(".xlsx"));
    assert!(bytes.starts_with(b"PK"));

    let resp = server
        .client
        .get(ep::admin_export(&server.base, &creds()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()["content-type"],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(
        resp.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .starts_with("attachment;")
    );

    let err = rest::admin_export(&server.base, &wrong_creds())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn token_mode_round_trip() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };
    server
        .request_expect(
            "POST",
            ep::ADMIN_LOGIN,
            None,
            Some(json!({"email": ADMIN_EMAIL, "password": "wrong"})),
            StatusCode::UNAUTHORIZED,
        )
        .await;

    let login = rest::admin_login(
        &server.base,
        &giftdrive_shared::api::LoginReq {
            email: ADMIN_EMAIL.into(),
            password: ADMIN_PASSWORD.into(),
        },
    )
    .await
    .unwrap();
    assert!(!login.token.is_empty());

    server
        .request_expect(
            "GET",
            ep::ADMIN_PARTY,
            Some(&login.token),
            None,
            StatusCode::OK,
        )
        .await;
    let created = server
        .request_expect(
            "POST",
            ep::ADMIN_PARTY,
            Some(&login.token),
            Some(json!({"name": "Token Party", "date": "2024-12-20", "location": "x", "description": "y"})),
            StatusCode::OK,
        )
        .await;
    assert_eq!(created["party"]["name"], "Token Party");

    // Explicit credentials win over a valid token
    server
        .request_expect(
            "GET",
            &ep::admin_list("", ep::ADMIN_PARTY, &wrong_creds()),
            Some(&login.token),
            None,
            StatusCode::UNAUTHORIZED,
        )
        .await;

    server
        .request_expect(
            "GET",
            ep::ADMIN_PARTY,
            Some("not-a-jwt"),
            None,
            StatusCode::UNAUTHORIZED,
        )
        .await;

    rest::admin_logout(&server.base, &login.token).await.unwrap();
    server
        .request_expect(
            "GET",
            ep::ADMIN_PARTY,
            Some(&login.token),
            None,
            StatusCode::UNAUTHORIZED,
        )
        .await;
}

#[tokio::test]
async fn token_mode_disabled_without_secret() {
    let Some(server) = TestServer::spawn_with(None).await else {
        return;
    };
    server
        .request_expect(
            "POST",
            ep::ADMIN_LOGIN,
            None,
            Some(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
            StatusCode::NOT_FOUND,
        )
        .await;
    // Bearer headers are ignored; credentials still work
    server
        .request_expect(
            "GET",
            ep::ADMIN_PARTY,
            Some("anything"),
            None,
            StatusCode::UNAUTHORIZED,
        )
        .await;
    server
        .request_expect(
            "GET",
            &ep::admin_list("", ep::ADMIN_PARTY, &creds()),
            None,
            None,
            StatusCode::OK,
        )
        .await;
}

#[tokio::test]
async fn child_delete_and_pledged_override() {
    let Some(server) = TestServer::spawn().await else {
        return;
    };
    let party = server.create_party("Winter", "2024-12-20").await;
    let kept = server.create_child(party, "Thabo", json!(["bike"])).await;
    let kept_id = kept["id"].as_i64().unwrap();

    // Admin marks the child as pledged without a pledge row
    let marked = server
        .admin_write(
            "PUT",
            ep::ADMIN_CHILD,
            json!({"id": kept_id, "name": "Thabo", "age": 8, "partyId": party, "pledged": true}),
            ADMIN_PASSWORD,
            StatusCode::OK,
        )
        .await;
    assert_eq!(marked["child"]["pledged"], true);
    assert!(marked["child"]["pledges"].as_array().unwrap().is_empty());
    assert_eq!(marked["child"]["wishlist"].as_array().unwrap().len(), 1);
    let blocked = server
        .request_expect(
            "POST",
            ep::PLEDGE,
            None,
            Some(json!({"childId": kept_id, "donorName": "Ann"})),
            StatusCode::BAD_REQUEST,
        )
        .await;
    assert!(
        blocked["error"]
            .as_str()
            .unwrap()
            .contains("already been pledged")
    );

    let doomed = server
        .create_child(party, "Sipho", json!(["ball", "puzzle"]))
        .await;
    let doomed_id = doomed["id"].as_i64().unwrap();
    server
        .request_expect(
            "POST",
            ep::PLEDGE,
            None,
            Some(json!({"childId": doomed_id})),
            StatusCode::OK,
        )
        .await;

    let deleted = server
        .request_expect(
            "DELETE",
            &ep::admin_delete("", ep::ADMIN_CHILD, doomed_id as i32, &creds()),
            None,
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(deleted["success"], true);
    server
        .request_expect(
            "DELETE",
            &ep::admin_delete("", ep::ADMIN_CHILD, doomed_id as i32, &creds()),
            None,
            None,
            StatusCode::NOT_FOUND,
        )
        .await;

    let tree = rest::get_party(&server.base, party as i32).await.unwrap();
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].child.id as i64, kept_id);
    assert!(tree.children[0].pledges.is_empty());

    let items = server
        .request_expect(
            "GET",
            &ep::admin_list("", ep::ADMIN_WISHLIST, &creds()),
            None,
            None,
            StatusCode::OK,
        )
        .await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["childId"].as_i64().unwrap(), kept_id);

    // Wrong credentials cannot delete the remaining child
    server
        .request_expect(
            "DELETE",
            &ep::admin_delete("", ep::ADMIN_CHILD, kept_id as i32, &wrong_creds()),
            None,
            None,
            StatusCode::UNAUTHORIZED,
        )
        .await;
}
