//! Scripted `AuthApi` shared by the state and component tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;

use futures::channel::oneshot;
use serde_json::json;

use crate::error::AuthError;
use crate::net::api::AuthApi;
use crate::net::types::{ApiResponse, RefreshPayload, UserProfile};

pub type Reply<T> = Result<ApiResponse<T>, AuthError>;

pub enum Scripted<T> {
    Now(Reply<T>),
    Later(oneshot::Receiver<Reply<T>>),
}

#[derive(Default)]
pub struct FakeState {
    refresh_replies: RefCell<VecDeque<Scripted<RefreshPayload>>>,
    profile_replies: RefCell<VecDeque<Scripted<UserProfile>>>,
    refresh_calls: Cell<usize>,
    profile_calls: RefCell<Vec<String>>,
}

#[derive(Clone, Default)]
pub struct FakeApi(Rc<FakeState>);

impl FakeApi {
    pub fn refresh_reply(&self, reply: Reply<RefreshPayload>) {
        self.0.refresh_replies.borrow_mut().push_back(Scripted::Now(reply));
    }

    pub fn refresh_token(&self, token: &str) {
        self.refresh_reply(Ok(refresh_ok(token)));
    }

    pub fn refresh_later(&self) -> oneshot::Sender<Reply<RefreshPayload>> {
        let (tx, rx) = oneshot::channel();
        self.0.refresh_replies.borrow_mut().push_back(Scripted::Later(rx));
        tx
    }

    pub fn profile_reply(&self, reply: Reply<UserProfile>) {
        self.0.profile_replies.borrow_mut().push_back(Scripted::Now(reply));
    }

    pub fn profile_later(&self) -> oneshot::Sender<Reply<UserProfile>> {
        let (tx, rx) = oneshot::channel();
        self.0.profile_replies.borrow_mut().push_back(Scripted::Later(rx));
        tx
    }

    pub fn refresh_calls(&self) -> usize {
        self.0.refresh_calls.get()
    }

    pub fn profile_calls(&self) -> Vec<String> {
        self.0.profile_calls.borrow().clone()
    }
}

async fn resolve<T>(scripted: Option<Scripted<T>>) -> Reply<T> {
    match scripted {
        Some(Scripted::Now(reply)) => reply,
        Some(Scripted::Later(rx)) => rx.await.unwrap_or(Err(AuthError::Cancelled)),
        None => Err(AuthError::Transport("no scripted reply".to_owned())),
    }
}

impl AuthApi for FakeApi {
    fn refresh_access_token(&self) -> impl Future<Output = Reply<RefreshPayload>> {
        self.0.refresh_calls.set(self.0.refresh_calls.get() + 1);
        let scripted = self.0.refresh_replies.borrow_mut().pop_front();
        resolve(scripted)
    }

    fn get_authenticated_user(&self, access_token: &str) -> impl Future<Output = Reply<UserProfile>> {
        self.0.profile_calls.borrow_mut().push(access_token.to_owned());
        let scripted = self.0.profile_replies.borrow_mut().pop_front();
        resolve(scripted)
    }
}

pub fn refresh_ok(token: &str) -> ApiResponse<RefreshPayload> {
    ApiResponse::new(200, RefreshPayload { access_token: Some(token.to_owned()) })
}

pub fn user(id: u64, name: &str) -> UserProfile {
    UserProfile(json!({ "id": id, "name": name }))
}
