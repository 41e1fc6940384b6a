mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_sets_owner_and_grants_role() -> Result<()> {
    let server = common::spawn_server().await?;
    let (owner, token) = server.signup("owner@marina.ng").await?;

    let mut body = common::hospital_body("Marina Clinic");
    body["userId"] = json!("7a0f6f4e-0d55-4a3b-9d61-2f8a3c0b9e11");
    let res = server.client.post(server.url("/hospitals")).bearer_auth(&token).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Hospital Successfully created");
    assert_eq!(body["data"]["userId"], owner.as_str());
    assert_eq!(body["data"]["location"]["point"]["coordinates"], json!([3.3792, 6.5244]));

    let user = server
        .client
        .get(server.url(&format!("/users/{}", owner)))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(user["data"]["roles"], json!(["customer", "hospital_owner"]));
    Ok(())
}

#[tokio::test]
async fn create_validates_body() -> Result<()> {
    let server = common::spawn_server().await?;
    let (_, token) = server.signup("owner@marina.ng").await?;

    let mut body = common::hospital_body("Marina Clinic");
    body["location"]["point"]["type"] = json!("Polygon");
    body["phone"] = json!("08012345678");
    let res = server.client.post(server.url("/hospitals")).bearer_auth(&token).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json::<Value>().await?["error"],
        "location failed on the 'geopoint' validation, phone failed on the 'e164' validation"
    );

    let res = server.client.post(server.url("/hospitals")).json(&common::hospital_body("Marina")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn list_and_filter_by_specialty() -> Result<()> {
    let server = common::spawn_server().await?;
    let (_, token) = server.signup("owner@marina.ng").await?;
    server.create_hospital(&token, "Marina Clinic").await?;

    let mut pediatric = common::hospital_body("Ikoyi Children's");
    pediatric["specialties"] = json!(["pediatrician"]);
    let res = server.client.post(server.url("/hospitals")).bearer_auth(&token).json(&pediatric).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let all = server.client.get(server.url("/hospitals")).send().await?.json::<Value>().await?;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let dentists = server.client.get(server.url("/hospitals?specialty=dentist")).send().await?.json::<Value>().await?;
    let dentists = dentists["data"].as_array().unwrap();
    assert_eq!(dentists.len(), 1);
    assert_eq!(dentists[0]["name"], "Marina Clinic");

    let res = server.client.get(server.url("/hospitals?specialty=wizard")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn get_by_id() -> Result<()> {
    let server = common::spawn_server().await?;
    let (_, token) = server.signup("owner@marina.ng").await?;
    let id = server.create_hospital(&token, "Marina Clinic").await?;

    let res = server.client.get(server.url(&format!("/hospitals/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["data"]["name"], "Marina Clinic");

    let res = server.client.get(server.url("/hospitals/7a0f6f4e-0d55-4a3b-9d61-2f8a3c0b9e11")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = server.client.get(server.url("/hospitals/marina")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn only_the_owner_updates_and_deletes() -> Result<()> {
    let server = common::spawn_server().await?;
    let (_, owner_token) = server.signup("owner@marina.ng").await?;
    let (_, other_token) = server.signup("other@ikoyi.ng").await?;
    let id = server.create_hospital(&owner_token, "Marina Clinic").await?;
    let path = format!("/hospitals/{}", id);

    let res = server
        .client
        .patch(server.url(&path))
        .bearer_auth(&other_token)
        .json(&json!({"open": false}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .client
        .patch(server.url(&path))
        .bearer_auth(&owner_token)
        .json(&json!({"open": false, "description": "Closed for renovation"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["open"], false);
    assert_eq!(body["data"]["description"], "Closed for renovation");
    assert_eq!(body["data"]["name"], "Marina Clinic");

    let res = server
        .client
        .patch(server.url(&path))
        .bearer_auth(&owner_token)
        .json(&json!({"createdAt": "2020-01-01T00:00:00Z"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server.client.delete(server.url(&path)).bearer_auth(&other_token).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server.client.delete(server.url(&path)).bearer_auth(&owner_token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["message"], "Hospital deleted successfully");

    let res = server.client.delete(server.url(&path)).bearer_auth(&owner_token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleted_owner_cannot_create_hospitals() -> Result<()> {
    let server = common::spawn_server().await?;
    let (owner, token) = server.signup("owner@marina.ng").await?;
    let res = server.client.delete(server.url(&format!("/users/{}", owner))).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server
        .client
        .post(server.url("/hospitals"))
        .bearer_auth(&token)
        .json(&common::hospital_body("Marina Clinic"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let list = server.client.get(server.url("/hospitals")).send().await?.json::<Value>().await?;
    assert_eq!(list["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn rejects_coordinates_outside_wgs84() -> Result<()> {
    let server = common::spawn_server().await?;
    let (_, token) = server.signup("owner@marina.ng").await?;

    let mut body = common::hospital_body("Marina Clinic");
    body["location"]["point"]["coordinates"] = json!([200.0, 95.0]);
    let res = server.client.post(server.url("/hospitals")).bearer_auth(&token).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "location failed on the 'geopoint' validation");
    Ok(())
}
