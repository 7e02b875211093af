mod common;

use anyhow::Result;
use reqwest::{multipart, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn health_reports_service_and_database() -> Result<()> {
    let server = common::spawn_app().await?;
    let res = common::client().get(server.url("/api/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "Portfolio API");
    assert_eq!(body["database"], "unavailable");
    assert_eq!(
        body["features"],
        json!(["projects", "contact", "messages", "authentication"])
    );
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_404() -> Result<()> {
    let server = common::spawn_app().await?;
    let res = common::client().get(server.url("/api/nope?x=1")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({ "error": "Endpoint not found", "path": "/api/nope?x=1" }));
    Ok(())
}

#[tokio::test]
async fn contact_form_validation() -> Result<()> {
    let server = common::spawn_app().await?;
    let client = common::client();

    let cases = [
        (json!({ "name": "Ann", "email": "ann@example.com" }), "Name, email, and message are required"),
        (json!({ "name": " ", "email": "ann@example.com", "message": "Hi" }), "Name, email, and message are required"),
        (json!({ "name": "Ann", "email": "not-an-email", "message": "Hi" }), "Invalid email format"),
        (
            json!({ "name": "N".repeat(150), "email": "ann@example.com", "message": "Hi" }),
            "Name must be at most 100 characters",
        ),
    ];

    for (body, expected) in cases {
        let res = client.post(server.url("/api/contact")).json(&body).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let payload = res.json::<Value>().await?;
        assert_eq!(payload, json!({ "success": false, "message": expected }));
    }

    let res = client
        .post(server.url("/api/contact"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn non_numeric_ids_are_400() -> Result<()> {
    let server = common::spawn_app().await?;
    let client = common::client();
    let token = common::admin_token();

    let res = client.get(server.url("/api/projects/abc")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "Invalid project ID" }));

    let res = client.post(server.url("/api/projects/abc/view")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(server.url("/api/messages/abc"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "success": false, "message": "Invalid message ID" })
    );
    Ok(())
}

#[tokio::test]
async fn message_update_needs_a_change() -> Result<()> {
    let server = common::spawn_app().await?;
    let client = common::client();
    let token = common::admin_token();

    for (body, expected) in [
        (json!({}), "No data to update"),
        (json!({ "status": "" }), "No data to update"),
        (json!({ "status": "shredded" }), "Invalid status value"),
    ] {
        let res = client
            .put(server.url("/api/messages/1"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.json::<Value>().await?["message"], expected);
    }
    Ok(())
}

#[tokio::test]
async fn login_requires_both_fields() -> Result<()> {
    let server = common::spawn_app().await?;
    let client = common::client();

    for body in [json!({}), json!({ "username": "Admin" }), json!({ "username": "", "password": "x" })] {
        let res = client.post(server.url("/api/admin/login")).json(&body).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            res.json::<Value>().await?,
            json!({ "error": "Username and password required" })
        );
    }
    Ok(())
}

#[tokio::test]
async fn project_create_requires_text_fields() -> Result<()> {
    let server = common::spawn_app().await?;
    let res = common::client()
        .post(server.url("/api/projects"))
        .bearer_auth(common::admin_token())
        .json(&json!({ "title": "Site", "technologies": "Rust" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "error": "Title, description, and technologies are required" })
    );
    Ok(())
}

#[tokio::test]
async fn project_columns_are_length_checked() -> Result<()> {
    let server = common::spawn_app().await?;
    let client = common::client();
    let token = common::admin_token();

    let res = client
        .put(server.url("/api/projects/1"))
        .bearer_auth(&token)
        .json(&json!({ "title": "T".repeat(256) }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "error": "Title must be at most 255 characters" })
    );

    let res = client
        .post(server.url("/api/projects"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Site",
            "description": "A site",
            "technologies": "Rust",
            "project_url": format!("https://example.com/{}", "p".repeat(500)),
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "error": "Project URL must be at most 500 characters" })
    );
    Ok(())
}

#[tokio::test]
async fn upload_stores_allowed_images() -> Result<()> {
    let server = common::spawn_app().await?;
    let part = multipart::Part::bytes(b"\x89PNG fake".to_vec())
        .file_name("my cat.png")
        .mime_str("image/png")?;

    let res = common::client()
        .post(server.url("/api/upload"))
        .bearer_auth(common::admin_token())
        .multipart(multipart::Form::new().part("image", part))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    let filename = body["filename"].as_str().unwrap_or_default().to_string();
    assert!(filename.ends_with("_my_cat.png"), "{}", body);
    assert_eq!(body["path"], format!("/uploads/{}", filename));
    assert_eq!(body["size"], 9);
    assert_eq!(body["mimetype"], "image/png");
    assert!(server.uploads.path().join(&filename).exists());

    // And it is served back statically.
    let res = common::client().get(server.url(&format!("/uploads/{}", filename))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.bytes().await?.as_ref(), b"\x89PNG fake");
    Ok(())
}

#[tokio::test]
async fn upload_rejections() -> Result<()> {
    let server = common::spawn_app().await?;
    let client = common::client();
    let token = common::admin_token();

    let pdf = multipart::Part::bytes(b"%PDF".to_vec())
        .file_name("cv.pdf")
        .mime_str("application/pdf")?;
    let res = client
        .post(server.url("/api/upload"))
        .bearer_auth(&token)
        .multipart(multipart::Form::new().part("image", pdf))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "Only image files are allowed" }));

    let res = client
        .post(server.url("/api/upload"))
        .bearer_auth(&token)
        .multipart(multipart::Form::new().text("caption", "no file"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "No files were uploaded" }));

    // Not multipart at all.
    let res = client
        .post(server.url("/api/upload"))
        .bearer_auth(&token)
        .json(&json!({ "image": "data" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "No files were uploaded" }));

    let big = multipart::Part::bytes(vec![0u8; 5 * 1024 * 1024 + 1])
        .file_name("huge.jpg")
        .mime_str("image/jpeg")?;
    let res = client
        .post(server.url("/api/upload"))
        .bearer_auth(&token)
        .multipart(multipart::Form::new().part("image", big))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "File size exceeds limit (5MB)" }));
    Ok(())
}
