//! Member Directory
//!
//! Member identity records, registration and credential checks.

use crate::credentials;
use crate::error::{LibrisError, Result};
use crate::model::{Member, NewMember};
use crate::storage::Record;

/// In-memory working copy of the members dataset
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    members: Vec<Member>,
}

impl MemberDirectory {
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    pub fn from_records(records: &[Record]) -> Result<Self> {
        let members = records
            .iter()
            .map(Member::from_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { members })
    }

    pub fn to_records(&self) -> Vec<Record> {
        self.members.iter().map(Member::to_record).collect()
    }

    pub fn find_member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.member_id == member_id)
    }

    /// Register a new member joining on `join_date`
    ///
    /// The secret is hashed before it is stored. Fails with `DuplicateKey`
    /// if the member id is taken.
    pub fn register(
        &mut self,
        new: NewMember,
        join_date: &str,
        hash_iterations: u32,
    ) -> Result<&Member> {
        if self.find_member(&new.member_id).is_some() {
            return Err(LibrisError::DuplicateKey(format!(
                "member {}",
                new.member_id
            )));
        }

        self.members.push(Member {
            password_hash: credentials::hash_secret(&new.secret, hash_iterations),
            member_id: new.member_id,
            name: new.name,
            email: new.email,
            join_date: join_date.to_string(),
            role: new.role,
        });

        Ok(&self.members[self.members.len() - 1])
    }

    /// Return the member if `secret` matches
    ///
    /// An unknown id and a wrong secret both yield `None`. For an unknown id
    /// a dummy hash of `hash_iterations` rounds is still checked.
    pub fn verify(&self, member_id: &str, secret: &str, hash_iterations: u32) -> Option<&Member> {
        match self.find_member(member_id) {
            Some(member) => {
                credentials::verify_secret(secret, &member.password_hash).then_some(member)
            }
            None => {
                let dummy = credentials::dummy_hash(hash_iterations);
                credentials::verify_secret(secret, &dummy);
                None
            }
        }
    }

    pub fn has_librarian(&self) -> bool {
        self.members.iter().any(Member::is_librarian)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
