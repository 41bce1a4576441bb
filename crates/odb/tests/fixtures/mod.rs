//! Shared records and a scripted driver for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

use odb::prelude::*;
use odb_core::{ConnectionError, ConnectionErrorKind, QueryErrorKind};

/// One statement the driver received.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub sql: String,
    pub params: Params,
    pub mode: ReturnMode,
}

/// Driver that replays queued results and records every call.
///
/// With nothing queued it answers `Done`.
#[derive(Debug, Default)]
pub struct FakeDriver {
    queue: RefCell<VecDeque<Result<QueryOutput>>>,
    calls: RefCell<Vec<Call>>,
    insert_id: Cell<Option<i64>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning_rows(self, rows: Vec<Row>) -> Self {
        self.queue.borrow_mut().push_back(Ok(QueryOutput::Rows(rows)));
        self
    }

    pub fn returning_count(self, count: u64) -> Self {
        self.queue.borrow_mut().push_back(Ok(QueryOutput::Count(count)));
        self
    }

    pub fn failing(self, message: &str) -> Self {
        self.queue.borrow_mut().push_back(Err(Error::statement(
            QueryErrorKind::Execute,
            message,
            "",
        )));
        self
    }

    pub fn losing_connection(self) -> Self {
        self.queue.borrow_mut().push_back(Err(Error::Connection(ConnectionError {
            kind: ConnectionErrorKind::Lost,
            message: "server has gone away".to_string(),
            source: None,
        })));
        self
    }

    pub fn with_insert_id(self, id: i64) -> Self {
        self.insert_id.set(Some(id));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn last_call(&self) -> Call {
        self.calls
            .borrow()
            .last()
            .cloned()
            .expect("no statement was executed")
    }
}

impl Driver for FakeDriver {
    fn execute(&self, sql: &str, params: &Params, mode: ReturnMode) -> Result<QueryOutput> {
        self.calls.borrow_mut().push(Call {
            sql: sql.to_string(),
            params: params.clone(),
            mode,
        });
        self.queue
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(QueryOutput::Done))
    }

    fn last_insert_id(&self) -> Result<Option<i64>> {
        Ok(self.insert_id.get())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
#[record(table = "users")]
#[record(relation(name = "profile", target = Profile, column = "username", property = "username"))]
#[record(relation(name = "friends", kind = "to_many", target = User))]
#[record(relation(name = "posts", kind = "to_many", target = Post, column = "author_id", property = "id"))]
pub struct User {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub profile: Option<String>,
    #[record(skip)]
    pub session_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct Profile {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
#[record(table = "posts")]
pub struct Post {
    pub id: Option<i64>,
    pub author_id: Option<i64>,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub meta: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
#[record(table = "Namespace/User")]
pub struct NamespacedUser {
    pub id: Option<i64>,
    pub email: Option<String>,
}

pub fn user_row(id: i64, username: &str, firstname: &str, lastname: &str) -> Row {
    Row::new()
        .with("id", id)
        .with("username", username)
        .with("firstname", firstname)
        .with("lastname", lastname)
}
