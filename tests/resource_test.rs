use fusion_recipe::app::{Authentication, Connection};
use fusion_recipe::framework::{is_forbidden, unbox, ResourceRepository, ResourceStencil};
use fusion_recipe::model::Profile;
use fusion_recipe::rest::{Endpoint, RestResource};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn profile(server: &MockServer) -> RestResource<Profile> {
    let addr = server.address();
    let connection = Connection::new("http", addr.ip().to_string(), addr.port());
    RestResource::new(Endpoint::new(&connection, &Authentication::None, "/profile").unwrap())
}

#[tokio::test]
async fn resource_uses_the_base_path_for_every_verb() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Ada", "favourites": ["Heat"]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/profile"))
        .and(body_json(json!({"name": "Ada", "favourites": ["Heat", "Dune"]})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let resource = profile(&server);
    let mut current = resource.load().await.unwrap();
    assert_eq!(current.name, "Ada");

    current.favourites.push("Dune".to_string());
    resource.save(current).await.unwrap();
    resource.delete().await.unwrap();
}

#[tokio::test]
async fn resource_stencil_surfaces_forbidden() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let stencil = profile(&server).into_stencil();
    assert_eq!(stencil.entity_type(), "Profile");

    let err = stencil.load().await.unwrap_err();
    assert!(is_forbidden(&err));

    stencil.delete().await.unwrap();

    let mismatch = stencil.save(Box::new(42u32)).await.unwrap_err();
    assert!(mismatch.is_programming_error());
}

#[tokio::test]
async fn resource_stencil_round_trips_opaque_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Ada"})))
        .mount(&server)
        .await;

    let stencil = profile(&server).into_stencil();
    let loaded = unbox::<Profile>(stencil.load().await.unwrap()).unwrap();
    assert_eq!(
        loaded,
        Profile {
            name: "Ada".to_string(),
            favourites: Vec::new(),
        }
    );
}
