use axum::Router;

use crate::bootstrap::app_context::AppContext;

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod files;
pub mod folders;
pub mod health;
pub mod navigation;
pub mod records;
pub mod users;

/// Every authenticated route, relative to `/api`. Health needs the pool and
/// is mounted separately.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .merge(auth::routes(ctx.clone()))
        .merge(users::routes(ctx.clone()))
        .merge(navigation::routes(ctx.clone()))
        .merge(dashboard::routes(ctx.clone()))
        .merge(records::programs::routes(ctx.clone()))
        .merge(records::projects::routes(ctx.clone()))
        .merge(records::grants::routes(ctx.clone()))
        .merge(records::donations::routes(ctx.clone()))
        .merge(records::beneficiaries::routes(ctx.clone()))
        .merge(records::partners::routes(ctx.clone()))
        .merge(records::distributions::routes(ctx.clone()))
        .merge(folders::routes(ctx.clone()))
        .merge(files::routes(ctx.clone()))
        .merge(attendance::routes(ctx))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{self, Body};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::application::ports::user_repository::UserRow;
    use crate::application::test_support::{
        FixedDashboard, MemAttendance, MemBlobs, MemFiles, MemFolders, MemRecords, MemUsers,
    };
    use crate::bootstrap::app_context::{AppServices, RecordRepos};
    use crate::bootstrap::config::Config;

    struct Harness {
        app: Router,
        ctx: AppContext,
        users: Arc<MemUsers>,
        blobs: Arc<MemBlobs>,
    }

    fn harness() -> Harness {
        let users = Arc::new(MemUsers::default());
        let blobs = Arc::new(MemBlobs::default());
        let records = RecordRepos {
            programs: Arc::new(MemRecords::default()),
            projects: Arc::new(MemRecords::default()),
            grants: Arc::new(MemRecords::default()),
            donations: Arc::new(MemRecords::default()),
            beneficiaries: Arc::new(MemRecords::default()),
            partners: Arc::new(MemRecords::default()),
            distributions: Arc::new(MemRecords::default()),
        };
        let services = AppServices::new(
            users.clone(),
            records,
            Arc::new(FixedDashboard::default()),
            Arc::new(MemFolders::default()),
            Arc::new(MemFiles::default()),
            blobs.clone(),
            Arc::new(MemAttendance::default()),
        );
        let ctx = AppContext::new(Config::for_tests(), services);
        Harness {
            app: router(ctx.clone()),
            ctx,
            users,
            blobs,
        }
    }

    impl Harness {
        fn login_as(&self, email: &str, role: &str) -> (UserRow, String) {
            let row = self.users.seed(email, role);
            let token = auth::issue_token(&self.ctx.cfg, row.id).unwrap();
            (row, token)
        }

        async fn call(
            &self,
            method: &str,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut req = Request::builder().method(method).uri(uri);
            if let Some(t) = token {
                req = req.header(header::AUTHORIZATION, format!("Bearer {}", t));
            }
            let req = match body {
                Some(v) => req
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(v.to_string()))
                    .unwrap(),
                None => req.body(Body::empty()).unwrap(),
            };
            let resp = self.app.clone().oneshot(req).await.unwrap();
            let status = resp.status();
            let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, value)
        }
    }

    #[tokio::test]
    async fn register_login_and_me() {
        let h = harness();
        let (status, user) = h
            .call(
                "POST",
                "/auth/register",
                None,
                Some(json!({"email": "Root@NGO.test", "name": "Root", "password": "correct horse"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["role"], "admin");
        assert_eq!(user["email"], "root@ngo.test");

        let (status, body) = h
            .call(
                "POST",
                "/auth/register",
                None,
                Some(json!({"email": "root@ngo.test", "password": "another one"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "email_taken");

        let (status, login) = h
            .call(
                "POST",
                "/auth/login",
                None,
                Some(json!({"email": "root@ngo.test", "password": "correct horse"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let token = login["access_token"].as_str().unwrap().to_string();

        let (status, me) = h.call("GET", "/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["id"], user["id"]);

        let (status, _) = h
            .call(
                "POST",
                "/auth/login",
                None,
                Some(json!({"email": "root@ngo.test", "password": "wrong"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_or_stale_token_is_unauthorized() {
        let h = harness();
        let (status, _) = h.call("GET", "/programs", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let ghost = auth::issue_token(&h.ctx.cfg, uuid::Uuid::new_v4()).unwrap();
        let (status, _) = h.call("GET", "/navigation", Some(&ghost), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn program_crud_respects_roles() {
        let h = harness();
        let (_, manager) = h.login_as("lead@ngo.test", "manager");
        let (_, volunteer) = h.login_as("helper@ngo.test", "volunteer");

        let (status, _) = h
            .call("POST", "/programs", Some(&volunteer), Some(json!({"name": "Literacy"})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Forbidden wins over a malformed body.
        let (status, _) = h
            .call(
                "POST",
                "/programs",
                Some(&volunteer),
                Some(json!({"name": "", "status": "bogus"})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = h
            .call(
                "POST",
                "/programs",
                Some(&manager),
                Some(json!({"name": "Literacy", "status": "bogus"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_failed");

        let (status, created) = h
            .call(
                "POST",
                "/programs",
                Some(&manager),
                Some(json!({"name": "  Literacy  ", "status": "active"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["name"], "Literacy");
        let id = created["id"].as_str().unwrap().to_string();

        let (status, page) = h.call("GET", "/programs?q=liter", Some(&volunteer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 1);

        let (status, updated) = h
            .call(
                "PATCH",
                &format!("/programs/{}", id),
                Some(&manager),
                Some(json!({"description": "Evening classes"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["description"], "Evening classes");
        assert_eq!(updated["name"], "Literacy");

        let (status, _) = h
            .call("DELETE", &format!("/programs/{}", id), Some(&manager), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = h
            .call("GET", &format!("/programs/{}", id), Some(&manager), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn donations_are_hidden_from_staff() {
        let h = harness();
        let (_, staff) = h.login_as("field@ngo.test", "staff");
        let (status, body) = h.call("GET", "/donations", Some(&staff), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden");
    }

    #[tokio::test]
    async fn malformed_list_filters_are_rejected() {
        let h = harness();
        let (_, manager) = h.login_as("lead@ngo.test", "manager");
        for uri in ["/programs?project_id=abc", "/programs?page=first"] {
            let (status, _) = h.call("GET", uri, Some(&manager), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }
        let (status, body) = h
            .call("GET", "/programs?q=&page=1", Some(&manager), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 1);
    }

    #[tokio::test]
    async fn navigation_and_dashboard_follow_role() {
        let h = harness();
        let (_, finance) = h.login_as("books@ngo.test", "finance");
        let (status, nav) = h.call("GET", "/navigation", Some(&finance), None).await;
        assert_eq!(status, StatusCode::OK);
        let keys: Vec<&str> = nav["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["key"].as_str().unwrap())
            .collect();
        assert!(keys.contains(&"donations"));
        assert!(!keys.contains(&"beneficiaries"));
        assert!(!keys.contains(&"users"));

        let (status, dash) = h.call("GET", "/dashboard", Some(&finance), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(dash.get("donations_last_30_days").is_some());
        assert!(dash.get("beneficiaries").is_none());
        assert!(dash.get("attendance").is_none());
    }

    #[tokio::test]
    async fn attendance_day_over_http() {
        let h = harness();
        let (user, token) = h.login_as("worker@ngo.test", "volunteer");

        let (status, body) = h.call("POST", "/attendance/break/start", Some(&token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "not_checked_in");

        let (status, session) = h.call("POST", "/attendance/check-in", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["status"], "checked_in");

        let (status, body) = h.call("POST", "/attendance/check-in", Some(&token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "already_checked_in");

        let (status, session) = h.call("POST", "/attendance/break/start", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["status"], "on_break");

        let (status, body) = h.call("POST", "/attendance/break/start", Some(&token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "invalid_transition");

        let (status, session) = h.call("POST", "/attendance/check-out", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["status"], "checked_out");
        assert_eq!(session["breaks"].as_array().unwrap().len(), 1);

        let (_, current) = h.call("GET", "/attendance/current", Some(&token), None).await;
        assert!(current["session"].is_null());

        let (status, history) = h.call("GET", "/attendance", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history.as_array().unwrap().len(), 1);

        let (status, _) = h.call("GET", "/attendance/active", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, manager) = h.login_as("lead@ngo.test", "manager");
        let (status, _) = h
            .call(
                "GET",
                &format!("/attendance?user_id={}", user.id),
                Some(&manager),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn folders_share_and_hide() {
        let h = harness();
        let (owner, owner_token) = h.login_as("owner@ngo.test", "staff");
        let (other, other_token) = h.login_as("other@ngo.test", "staff");

        let (status, root) = h
            .call("POST", "/folders", Some(&owner_token), Some(json!({"name": "Reports"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        let root_id = root["id"].as_str().unwrap().to_string();
        let (status, child) = h
            .call(
                "POST",
                "/folders",
                Some(&owner_token),
                Some(json!({"name": "2026", "parent_id": root_id})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(child["owner_id"], json!(owner.id));

        let (status, _) = h
            .call("GET", &format!("/folders/{}", root_id), Some(&other_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, shared) = h
            .call(
                "POST",
                &format!("/folders/{}/share", root_id),
                Some(&owner_token),
                Some(json!({"user_ids": [other.id]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(shared["updated"], 2);

        let (status, detail) = h
            .call("GET", &format!("/folders/{}", child["id"].as_str().unwrap()), Some(&other_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["path"][0]["id"], root["id"]);

        // Grantees can look but not delete.
        let (status, _) = h
            .call("DELETE", &format!("/folders/{}", root_id), Some(&other_token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, mine) = h.call("GET", "/files/shared", Some(&other_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mine["folders"].as_array().unwrap().len(), 2);

        let (status, body) = h
            .call(
                "PATCH",
                &format!("/folders/{}", root_id),
                Some(&owner_token),
                Some(json!({"parent_id": child["id"]})),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "folder_cycle");
    }

    #[tokio::test]
    async fn upload_and_read_back_file() {
        let h = harness();
        let (_, token) = h.login_as("field@ngo.test", "staff");
        let boundary = "X-BOUNDARY";
        let payload = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\nContent-Type: text/plain\r\n\r\nhello field\r\n--{b}--\r\n",
            b = boundary
        );
        let req = Request::builder()
            .method("POST")
            .uri("/files")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(payload))
            .unwrap();
        let resp = h.app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let file: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(file["name"], "notes.txt");
        assert_eq!(file["size"], 11);
        let id = file["id"].as_str().unwrap().to_string();

        let req = Request::builder()
            .uri(format!("/files/{}/content", id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let resp = h.app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/plain");
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"hello field");

        let (status, _) = h.call("DELETE", &format!("/files/{}", id), Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = h.call("GET", &format!("/files/{}", id), Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(h.blobs.len(), 0);
    }

    #[tokio::test]
    async fn users_admin_only() {
        let h = harness();
        let (admin, admin_token) = h.login_as("root@ngo.test", "admin");
        let (staff, staff_token) = h.login_as("field@ngo.test", "staff");

        let (status, _) = h.call("GET", "/users", Some(&staff_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, dir) = h.call("GET", "/users/directory", Some(&staff_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dir.as_array().unwrap().len(), 2);

        let (status, body) = h
            .call(
                "PATCH",
                &format!("/users/{}/role", staff.id),
                Some(&admin_token),
                Some(json!({"role": "wizard"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "unknown_role");

        let (status, updated) = h
            .call(
                "PATCH",
                &format!("/users/{}/role", staff.id),
                Some(&admin_token),
                Some(json!({"role": "Manager"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["role"], "manager");

        // The new role applies to the next request without a new token.
        let (status, _) = h
            .call("POST", "/programs", Some(&staff_token), Some(json!({"name": "Water"})))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = h
            .call("DELETE", &format!("/users/{}", admin.id), Some(&admin_token), None)
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
