#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use std::cell::{Cell, RefCell};

use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;

use crate::rest::{REST, SendRequest};

pub fn rest_with_response(
    response: Option<Result<Response, gloo_net::Error>>,
) -> REST<MockSendRequest> {
    rest_with_responses(vec![response])
}

/// Respond to consecutive requests in the given order. Requests beyond the
/// given responses fail like a lost connection.
pub fn rest_with_responses(
    responses: Vec<Option<Result<Response, gloo_net::Error>>>,
) -> REST<MockSendRequest> {
    REST {
        sender: MockSendRequest {
            requests: RefCell::new(vec![]),
            responses: RefCell::new(responses.into_iter().rev().collect()),
            delay: Cell::new(None),
        },
    }
}

pub fn requested_url(rest: &REST<MockSendRequest>) -> String {
    rest.sender
        .requests
        .borrow()
        .last()
        .map(Request::url)
        .unwrap_or_default()
}

pub fn requested_urls(rest: &REST<MockSendRequest>) -> Vec<String> {
    rest.sender
        .requests
        .borrow()
        .iter()
        .map(Request::url)
        .collect()
}

pub struct MockSendRequest {
    pub requests: RefCell<Vec<Request>>,
    responses: RefCell<Vec<Option<Result<Response, gloo_net::Error>>>>,
    /// Delay in milliseconds of the response to the next request only.
    pub delay: Cell<Option<u32>>,
}

impl SendRequest for MockSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error> {
        self.requests.borrow_mut().push(request);
        let response = self
            .responses
            .borrow_mut()
            .pop()
            .flatten()
            .unwrap_or(Err(gloo_net::Error::GlooError("no response".to_string())));
        if let Some(millis) = self.delay.take() {
            TimeoutFuture::new(millis).await;
        }
        response
    }
}
