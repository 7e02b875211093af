mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn submit(server: &common::TestServer, name: &str, email: &str, message: &str) -> Result<i64> {
    let res = common::client()
        .post(server.url("/api/contact"))
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .header("user-agent", "integration-test")
        .json(&json!({ "name": name, "email": email, "message": message }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    Ok(body["data"]["id"].as_i64().unwrap_or_default())
}

#[tokio::test]
async fn contact_submission_is_stored_unread() -> Result<()> {
    let Some(server) = common::spawn_db_app().await? else { return Ok(()) };
    let id = submit(&server, "Ann", "Ann@Example.com", "Hello there").await?;

    let row: (String, String, String, String, Option<String>, Option<String>) = sqlx::query_as(
        "SELECT email, subject, status, source, ip_address, user_agent FROM contact_messages WHERE id = $1",
    )
    .bind(id)
    .fetch_one(server.db.pool())
    .await?;

    assert_eq!(row.0, "ann@example.com");
    assert_eq!(row.1, "General Inquiry");
    assert_eq!(row.2, "unread");
    assert_eq!(row.3, "contact_form");
    assert_eq!(row.4.as_deref(), Some("203.0.113.9"));
    assert_eq!(row.5.as_deref(), Some("integration-test"));
    Ok(())
}

#[tokio::test]
async fn viewing_marks_read_once() -> Result<()> {
    let Some(server) = common::spawn_db_app().await? else { return Ok(()) };
    let client = common::client();
    let token = common::admin_token();
    let id = submit(&server, "Ann", "ann@example.com", "First").await?;

    let first = client
        .get(server.url(&format!("/api/messages/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(first["message"]["status"], "read");
    let read_at = first["message"]["read_at"].clone();
    assert!(read_at.is_string());

    let second = client
        .get(server.url(&format!("/api/messages/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(second["message"]["read_at"], read_at);

    let res = client
        .get(server.url("/api/messages/999999"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "success": false, "message": "Message not found" })
    );
    Ok(())
}

#[tokio::test]
async fn replied_is_stamped_once_and_notes_can_be_cleared() -> Result<()> {
    let Some(server) = common::spawn_db_app().await? else { return Ok(()) };
    let client = common::client();
    let token = common::admin_token();
    let id = submit(&server, "Ann", "ann@example.com", "Question").await?;
    let url = server.url(&format!("/api/messages/{}", id));

    let first = client
        .put(&url)
        .bearer_auth(&token)
        .json(&json!({ "status": "replied", "admin_notes": "answered by mail" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let data = &first["data"];
    assert_eq!(data["status"], "replied");
    assert_eq!(data["admin_notes"], "answered by mail");
    assert!(data["replied_at"].is_string());
    // Leaving unread through an admin update stamps read_at too.
    assert!(data["read_at"].is_string());

    let second = client
        .put(&url)
        .bearer_auth(&token)
        .json(&json!({ "status": "replied" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(second["data"]["replied_at"], data["replied_at"]);
    assert_eq!(second["data"]["admin_notes"], "answered by mail");

    let cleared = client
        .put(&url)
        .bearer_auth(&token)
        .json(&json!({ "admin_notes": null }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(cleared["data"]["admin_notes"].is_null());
    assert_eq!(cleared["data"]["status"], "replied");

    let res = client
        .put(server.url("/api/messages/999999"))
        .bearer_auth(&token)
        .json(&json!({ "status": "archived" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn listing_pages_agree_with_count_and_search() -> Result<()> {
    let Some(server) = common::spawn_db_app().await? else { return Ok(()) };
    let client = common::client();
    let token = common::admin_token();

    for i in 0..7 {
        submit(&server, &format!("Person {}", i), &format!("p{}@example.com", i), "General note").await?;
    }
    submit(&server, "Foo Fighter", "band@example.com", "hello").await?;
    submit(&server, "Zed", "foo@example.com", "hello").await?;
    submit(&server, "Amy", "amy@example.com", "I like food").await?;
    submit(&server, "Pct", "pct@example.com", "100% sure").await?;

    // Every row once across all pages, and total matches.
    let mut seen = Vec::new();
    let mut page = 1;
    loop {
        let body = client
            .get(server.url(&format!("/api/messages?page={}&limit=3&sortBy=name&sortOrder=asc", page)))
            .bearer_auth(&token)
            .send()
            .await?
            .json::<Value>()
            .await?;
        let rows = body["messages"].as_array().cloned().unwrap_or_default();
        assert!(rows.len() <= 3);
        assert_eq!(body["pagination"]["total"], 11);
        assert_eq!(body["pagination"]["pages"], 4);
        if rows.is_empty() {
            break;
        }
        seen.extend(rows.iter().filter_map(|r| r["id"].as_i64()));
        page += 1;
    }
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 11);

    let body = client
        .get(server.url("/api/messages?search=foo&limit=50"))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    let mut names: Vec<String> = body["messages"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .filter_map(|r| r["name"].as_str().map(str::to_string))
        .collect();
    names.sort();
    assert_eq!(names, ["Amy", "Foo Fighter", "Zed"]);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["stats"]["total"], 11);
    assert_eq!(body["stats"]["unread"], 11);

    // A repeated key does not drop the other parameters.
    let body = client
        .get(server.url("/api/messages?search=foo&page=1&page=1"))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["pagination"]["total"], 3);

    // Wildcards in the search term match literally.
    let body = client
        .get(server.url("/api/messages?search=%25"))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["pagination"]["total"], 1);

    let body = client
        .get(server.url("/api/messages?status=read"))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["pagination"]["total"], 0);
    assert_eq!(body["pagination"]["pages"], 0);
    Ok(())
}

#[tokio::test]
async fn stats_and_unread_count() -> Result<()> {
    let Some(server) = common::spawn_db_app().await? else { return Ok(()) };
    let client = common::client();
    let token = common::admin_token();

    let a = submit(&server, "Ann", "ann@example.com", "one").await?;
    submit(&server, "Bob", "bob@example.com", "two").await?;
    client
        .put(server.url(&format!("/api/messages/{}", a)))
        .bearer_auth(&token)
        .json(&json!({ "status": "replied" }))
        .send()
        .await?;

    let body = client
        .get(server.url("/api/messages/stats/summary"))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(
        body["stats"],
        json!({
            "total": 2, "unread": 1, "replied": 1, "today": 2,
            "yesterday": 0, "last7Days": 2, "last30Days": 2
        })
    );

    let body = client
        .get(server.url("/api/messages/count/unread"))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body, json!({ "success": true, "count": 1 }));

    let res = client
        .delete(server.url(&format!("/api/messages/{}", a)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = client
        .delete(server.url(&format!("/api/messages/{}", a)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
