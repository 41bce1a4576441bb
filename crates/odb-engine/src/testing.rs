//! Scripted driver and sample records for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use odb_core::{
    Driver, Error, FromValue, Params, QueryErrorKind, QueryOutput, Record, RelationDef, ReturnMode, Row,
    Value,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub sql: String,
    pub params: Params,
    pub mode: ReturnMode,
}

/// Replays queued responses in order; an empty queue answers `Done`.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    responses: RefCell<VecDeque<odb_core::Result<QueryOutput>>>,
    executed: RefCell<Vec<Executed>>,
    last_id: Cell<Option<i64>>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, output: QueryOutput) -> Self {
        self.responses.borrow_mut().push_back(Ok(output));
        self
    }

    pub fn rows(self, rows: Vec<Row>) -> Self {
        self.respond(QueryOutput::Rows(rows))
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses.borrow_mut().push_back(Err(Error::statement(
            QueryErrorKind::Execute,
            message,
            "",
        )));
        self
    }

    pub fn last_id(self, id: Option<i64>) -> Self {
        self.last_id.set(id);
        self
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.executed.borrow().clone()
    }
}

impl Driver for ScriptedDriver {
    fn execute(&self, sql: &str, params: &Params, mode: ReturnMode) -> odb_core::Result<QueryOutput> {
        self.executed.borrow_mut().push(Executed {
            sql: sql.to_string(),
            params: params.clone(),
            mode,
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(QueryOutput::Done))
    }

    fn last_insert_id(&self) -> odb_core::Result<Option<i64>> {
        Ok(self.last_id.get())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub profile: Option<String>,
    pub friends: Option<String>,
}

impl Record for User {
    const TYPE_NAME: &'static str = "User";
    const TABLE: Option<&'static str> = Some("users");
    const FIELDS: &'static [&'static str] = &["id", "username", "firstname", "profile", "friends"];
    const RELATIONS: &'static [RelationDef] = &[
        RelationDef::to_one("profile", "Profile").matching("username", "username"),
        RelationDef::to_many("friends", "User"),
        RelationDef::to_many("namesakes", "User").matching("firstname", "firstname"),
        RelationDef::to_many("admins", "User").matching("role", "admin"),
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn field_value(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.into()),
            "username" => Some(self.username.clone().into()),
            "firstname" => Some(self.firstname.clone().into()),
            "profile" => Some(self.profile.clone().into()),
            "friends" => Some(self.friends.clone().into()),
            _ => None,
        }
    }

    fn set_field_value(&mut self, name: &str, value: Value) -> odb_core::Result<bool> {
        match name {
            "id" => self.id = FromValue::from_value(value)?,
            "username" => self.username = FromValue::from_value(value)?,
            "firstname" => self.firstname = FromValue::from_value(value)?,
            "profile" => self.profile = FromValue::from_value(value)?,
            "friends" => self.friends = FromValue::from_value(value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub bio: Option<String>,
}

impl Record for Profile {
    const TYPE_NAME: &'static str = "Profile";
    const FIELDS: &'static [&'static str] = &["id", "username", "bio"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn field_value(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.into()),
            "username" => Some(self.username.clone().into()),
            "bio" => Some(self.bio.clone().into()),
            _ => None,
        }
    }

    fn set_field_value(&mut self, name: &str, value: Value) -> odb_core::Result<bool> {
        match name {
            "id" => self.id = FromValue::from_value(value)?,
            "username" => self.username = FromValue::from_value(value)?,
            "bio" => self.bio = FromValue::from_value(value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

pub fn user_row(id: i64, username: &str, firstname: &str) -> Row {
    Row::new()
        .with("id", id)
        .with("username", username)
        .with("firstname", firstname)
}
