use httptest::{matchers::request, responders::json_encoded, Expectation, Server};
use serde_json::json;

use apptimize::{
    models::{ApptimizeConfig, ApptimizeOptions},
    Client,
};

pub const API_TOKEN: &str = "api_token";
pub const APP_NAME: &str = "checkout-service";
pub const APP_VERSION: &str = "2.4.1";

pub fn expect_variant(server: &Server, path: &'static str, variant: &str) {
    server.expect(
        Expectation::matching(request::method_path("GET", path))
            .respond_with(json_encoded(json!({ "codeBlockVariant": variant }))),
    );
}

pub fn test_config() -> ApptimizeConfig {
    ApptimizeConfig {
        app_name: Some(APP_NAME.to_string()),
        app_version: Some(APP_VERSION.to_string()),
        ..ApptimizeConfig::new(API_TOKEN.to_string())
    }
}

pub fn create_client(server: &Server) -> Client {
    Client::with_options(
        test_config(),
        ApptimizeOptions {
            api_url: Some(format!("http://{}", server.addr())),
            ..ApptimizeOptions::default()
        },
    )
    .expect("should be able to create apptimize client")
}
