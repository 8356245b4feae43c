use std::fmt;
use std::str::FromStr;

use crate::error::{LibrisError, Result};
use crate::storage::Record;

/// What a member is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// Search, borrow, list own loans
    #[default]
    Member,

    /// Everything a member can do, plus catalogue, registration,
    /// issue/return on behalf of others, and reports
    Librarian,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Librarian => "librarian",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = LibrisError;

    /// An empty value reads as [`Role::Member`]
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "member" => Ok(Role::Member),
            "librarian" => Ok(Role::Librarian),
            other => Err(LibrisError::CorruptRecord(format!("unknown role '{}'", other))),
        }
    }
}

/// A registered member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub member_id: String,
    pub name: String,

    /// Salted hash, see [`crate::credentials`]
    pub password_hash: String,

    pub email: String,

    /// `YYYY-MM-DD`
    pub join_date: String,

    pub role: Role,
}

impl Member {
    /// Persisted field order
    pub const FIELDS: [&'static str; 6] =
        ["MemberID", "Name", "PasswordHash", "Email", "JoinDate", "Role"];

    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            member_id: record.require("MemberID")?.to_string(),
            name: record.require("Name")?.to_string(),
            password_hash: record.require("PasswordHash")?.to_string(),
            email: record.require("Email")?.to_string(),
            join_date: record.require("JoinDate")?.to_string(),
            role: record.get("Role").unwrap_or("").parse()?,
        })
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("MemberID", self.member_id.as_str())
            .with("Name", self.name.as_str())
            .with("PasswordHash", self.password_hash.as_str())
            .with("Email", self.email.as_str())
            .with("JoinDate", self.join_date.as_str())
            .with("Role", self.role.as_str())
    }

    pub fn is_librarian(&self) -> bool {
        self.role == Role::Librarian
    }
}

/// Registration input
///
/// Holds the raw secret only until it is hashed.
#[derive(Clone)]
pub struct NewMember {
    pub member_id: String,
    pub name: String,
    pub secret: String,
    pub email: String,
    pub role: Role,
}

impl NewMember {
    pub fn new(
        member_id: impl Into<String>,
        name: impl Into<String>,
        secret: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            name: name.into(),
            secret: secret.into(),
            email: email.into(),
            role: Role::Member,
        }
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

impl fmt::Debug for NewMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewMember")
            .field("member_id", &self.member_id)
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish()
    }
}
