use httpmock::prelude::*;
use httpmock::{
    Mock,
    Then,
    When,
};
use serde_json::json;

pub struct MockServerBuilder {
    server: MockServer,
    mock_ids: Vec<usize>,
}

impl MockServerBuilder {
    pub fn new() -> MockServerBuilder {
        MockServerBuilder { server: MockServer::start(), mock_ids: vec![] }
    }

    pub fn assert(&self) {
        for id in &self.mock_ids {
            println!("checking assertions for mock {id}");
            Mock::new(*id, &self.server).assert()
        }
    }

    pub fn handle<F: Fn(When, Then) + 'static>(&mut self, f: F) -> &mut Self {
        let id = self.server.mock(f).id;
        self.mock_ids.push(id);
        self
    }

    pub fn handle_list(&mut self, path: &str, list: serde_json::Value) -> &mut Self {
        let path = path.to_string();
        self.handle(move |when, then| {
            when.method(GET).path(&path);
            then.json_body(list.clone());
        })
    }

    pub fn handle_status(&mut self, path: &str, status: serde_json::Value) -> &mut Self {
        let path = path.to_string();
        let code = status["code"].as_u64().unwrap_or(500) as u16;
        self.handle(move |when, then| {
            when.method(GET).path(&path);
            then.status(code).json_body(status.clone());
        })
    }

    pub fn url(&self) -> http::Uri {
        http::Uri::try_from(self.server.url("/")).unwrap()
    }
}

impl Default for MockServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn make_fake_apiserver() -> (MockServerBuilder, kube::Client) {
    let builder = MockServerBuilder::new();
    let config = kube::Config::new(builder.url());
    let client = kube::Client::try_from(config).unwrap();
    (builder, client)
}

pub fn status_not_found() -> serde_json::Value {
    json!({
      "kind": "Status",
      "apiVersion": "v1",
      "metadata": {},
      "status": "Failure",
      "reason": "NotFound",
      "code": 404
    })
}

pub fn status_forbidden() -> serde_json::Value {
    json!({
      "kind": "Status",
      "apiVersion": "v1",
      "metadata": {},
      "status": "Failure",
      "reason": "Forbidden",
      "code": 403
    })
}
