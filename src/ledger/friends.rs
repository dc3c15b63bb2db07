//! Friend relationships
//!
//! Each operation rewrites both user documents in one transaction so the
//! relationship is always symmetric.

use super::LedgerError;
use crate::domain::{push_unique, User};
use crate::store::{fetch_doc, run_transaction, DocumentStore, Transaction};

/// Outcome of sending a friend request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Request stored on the recipient
    Sent,
    /// The recipient had already asked; both are now friends
    Accepted,
    /// Already friends or already requested; nothing written
    Unchanged,
}

fn load_pair(tx: &mut Transaction<'_>, a: &str, b: &str) -> Result<(User, User), LedgerError> {
    if a == b {
        return Err(LedgerError::Invalid("cannot befriend yourself".into()));
    }
    let first: User = tx.get(a)?.ok_or_else(|| LedgerError::user_not_found(a))?;
    let second: User = tx.get(b)?.ok_or_else(|| LedgerError::user_not_found(b))?;
    Ok((first, second))
}

fn befriend(a: &mut User, b: &mut User) {
    a.friend_requests.retain(|r| r != &b.id);
    b.friend_requests.retain(|r| r != &a.id);
    push_unique(&mut a.friends, &b.id);
    push_unique(&mut b.friends, &a.id);
}

pub fn send_friend_request(
    store: &dyn DocumentStore,
    max_attempts: u32,
    from: &str,
    to: &str,
) -> Result<RequestOutcome, LedgerError> {
    run_transaction(store, max_attempts, |tx| {
        let (mut sender, mut recipient) = load_pair(tx, from, to)?;

        if sender.is_friend(to) || recipient.has_request_from(from) {
            return Ok(RequestOutcome::Unchanged);
        }

        let outcome = if sender.has_request_from(to) {
            befriend(&mut sender, &mut recipient);
            tx.put(&sender)?;
            RequestOutcome::Accepted
        } else {
            recipient.friend_requests.push(from.to_string());
            RequestOutcome::Sent
        };
        tx.put(&recipient)?;
        Ok(outcome)
    })
}

pub fn accept_friend_request(
    store: &dyn DocumentStore,
    max_attempts: u32,
    user_id: &str,
    requester: &str,
) -> Result<(), LedgerError> {
    run_transaction(store, max_attempts, |tx| {
        let (mut user, mut other) = load_pair(tx, user_id, requester)?;
        if !user.has_request_from(requester) {
            return Err(LedgerError::NotFound {
                entity: "friend request",
                id: format!("{requester} -> {user_id}"),
            });
        }
        befriend(&mut user, &mut other);
        tx.put(&user)?;
        tx.put(&other)?;
        Ok(())
    })
}

pub fn decline_friend_request(
    store: &dyn DocumentStore,
    max_attempts: u32,
    user_id: &str,
    requester: &str,
) -> Result<(), LedgerError> {
    run_transaction(store, max_attempts, |tx| {
        let mut user: User = tx
            .get(user_id)?
            .ok_or_else(|| LedgerError::user_not_found(user_id))?;
        if !user.has_request_from(requester) {
            return Err(LedgerError::NotFound {
                entity: "friend request",
                id: format!("{requester} -> {user_id}"),
            });
        }
        user.friend_requests.retain(|r| r != requester);
        tx.put(&user)?;
        Ok(())
    })
}

/// Remove a friendship from both sides. Returns false if they were not friends.
pub fn remove_friend(
    store: &dyn DocumentStore,
    max_attempts: u32,
    user_id: &str,
    friend_id: &str,
) -> Result<bool, LedgerError> {
    run_transaction(store, max_attempts, |tx| {
        let (mut user, mut friend) = load_pair(tx, user_id, friend_id)?;
        if !user.is_friend(friend_id) && !friend.is_friend(user_id) {
            return Ok(false);
        }
        user.friends.retain(|f| f != friend_id);
        friend.friends.retain(|f| f != user_id);
        tx.put(&user)?;
        tx.put(&friend)?;
        Ok(true)
    })
}

/// Friends of `user_id`, skipping accounts that no longer exist
pub fn list_friends(store: &dyn DocumentStore, user_id: &str) -> Result<Vec<User>, LedgerError> {
    let user: User = fetch_doc(store, user_id)?.ok_or_else(|| LedgerError::user_not_found(user_id))?;
    let mut friends = Vec::with_capacity(user.friends.len());
    for id in &user.friends {
        if let Some(friend) = fetch_doc::<User>(store, id)? {
            friends.push(friend);
        }
    }
    Ok(friends)
}
