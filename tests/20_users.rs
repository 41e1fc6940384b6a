mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn register_hides_password_and_defaults_role() -> Result<()> {
    let server = common::spawn_server().await?;
    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({"firstname": "Ada", "lastname": "Obi", "email": "ada@obi.ng", "password": "secret1"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User Created Successfully");
    assert_eq!(body["data"]["roles"], json!(["customer"]));
    assert!(body["data"].get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn register_rejects_bad_input_and_duplicates() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({"firstname": "Ada", "lastname": "Obi", "email": "not-an-email", "password": "secret1"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "email must be a valid email address");

    let res = server
        .client
        .post(server.url("/users"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    server.register("ada@obi.ng", "secret1").await?;
    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({"firstname": "Ada", "lastname": "Obi", "email": "ada@obi.ng", "password": "secret2"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(res.json::<Value>().await?["error"], "user with email already exists");
    Ok(())
}

#[tokio::test]
async fn login_and_refresh() -> Result<()> {
    let server = common::spawn_server().await?;
    server.register("ada@obi.ng", "secret1").await?;

    let res = server
        .client
        .post(server.url("/users/login"))
        .json(&json!({"email": "ada@obi.ng", "password": "wrong-password"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await?["error"], "check email and password");

    let res = server
        .client
        .post(server.url("/users/login"))
        .json(&json!({"email": "bola@obi.ng", "password": "secret1"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await?["error"], "user with email doesn't exist");

    let res = server
        .client
        .post(server.url("/users/login"))
        .json(&json!({"email": "ada@obi.ng", "password": "secret1"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["user"]["email"], "ada@obi.ng");
    let refresh_token = body["data"]["refreshToken"].as_str().unwrap().to_string();
    let access_token = body["data"]["token"].as_str().unwrap().to_string();

    let res = server
        .client
        .post(server.url("/users/refresh"))
        .json(&json!({ "refreshToken": refresh_token }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.json::<Value>().await?["data"]["token"].is_string());

    // An access token is not a refresh token.
    let res = server
        .client
        .post(server.url("/users/refresh"))
        .json(&json!({ "refreshToken": access_token }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn bearer_token_is_required() -> Result<()> {
    let server = common::spawn_server().await?;
    let (id, _) = server.signup("ada@obi.ng").await?;

    let res = server.client.get(server.url(&format!("/users/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await?["error"], "Missing Authorisation header");

    let res = server
        .client
        .get(server.url(&format!("/users/{}", id)))
        .header("authorization", "Token abc")
        .send()
        .await?;
    assert_eq!(res.json::<Value>().await?["error"], "Invalid Authorisation format");

    let res = server
        .client
        .get(server.url(&format!("/users/{}", id)))
        .bearer_auth("not.a.jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.json::<Value>().await?["error"].as_str().unwrap().starts_with("Invalid Token: "));
    Ok(())
}

#[tokio::test]
async fn get_user_by_id() -> Result<()> {
    let server = common::spawn_server().await?;
    let (id, token) = server.signup("ada@obi.ng").await?;

    let res = server.client.get(server.url(&format!("/users/{}", id))).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["_id"], id.as_str());
    assert!(body["data"].get("password").is_none());

    let res = server
        .client
        .get(server.url("/users/7a0f6f4e-0d55-4a3b-9d61-2f8a3c0b9e11"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server.client.get(server.url("/users/42")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn users_patch_only_themselves() -> Result<()> {
    let server = common::spawn_server().await?;
    let (ada, ada_token) = server.signup("ada@obi.ng").await?;
    let (bola, _) = server.signup("bola@obi.ng").await?;

    let res = server
        .client
        .patch(server.url(&format!("/users/{}", ada)))
        .bearer_auth(&ada_token)
        .json(&json!({"lastname": "Eze", "password": "brand-new"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["message"], "User updated successfully");
    server.login("ada@obi.ng", "brand-new").await?;

    let res = server
        .client
        .patch(server.url(&format!("/users/{}", bola)))
        .bearer_auth(&ada_token)
        .json(&json!({"lastname": "Eze"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .client
        .patch(server.url(&format!("/users/{}", ada)))
        .bearer_auth(&ada_token)
        .json(&json!({"_id": bola}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .patch(server.url(&format!("/users/{}", ada)))
        .bearer_auth(&ada_token)
        .json(&json!({"roles": ["admin"]}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn delete_user() -> Result<()> {
    let server = common::spawn_server().await?;
    let (id, token) = server.signup("ada@obi.ng").await?;

    let res = server.client.delete(server.url(&format!("/users/{}", id))).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // The token is still valid, so the second delete reaches the store.
    let res = server.client.delete(server.url(&format!("/users/{}", id))).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["error"], "No user got deleted");
    Ok(())
}

#[tokio::test]
async fn register_cannot_claim_privileged_roles() -> Result<()> {
    let server = common::spawn_server().await?;
    let (bola, _) = server.signup("bola@obi.ng").await?;

    for role in ["admin", "hospital_owner"] {
        let res = server
            .client
            .post(server.url("/users"))
            .json(&json!({"firstname": "Ada", "lastname": "Obi", "email": "ada@obi.ng", "password": "secret1", "roles": [role]}))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.json::<Value>().await?["error"], "roles failed on the 'roles' validation");
    }

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({"firstname": "Ada", "lastname": "Obi", "email": "ada@obi.ng", "password": "secret1", "roles": ["doctor"]}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.json::<Value>().await?["data"]["roles"], json!(["doctor"]));

    let token = server.login("ada@obi.ng", "secret1").await?;
    let res = server.client.delete(server.url(&format!("/users/{}", bola))).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn emails_are_case_insensitive() -> Result<()> {
    let server = common::spawn_server().await?;
    server.register("Ada@Obi.ng", "secret1").await?;

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({"firstname": "Ada", "lastname": "Obi", "email": "ada@obi.NG", "password": "secret1"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    server.login("ADA@OBI.NG", "secret1").await?;
    Ok(())
}
