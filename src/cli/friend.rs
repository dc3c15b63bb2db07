//! Friend commands

use anyhow::Result;
use clap::Subcommand;

use ascend::ledger::{Ledger, RequestOutcome};

#[derive(Subcommand)]
pub enum FriendCommand {
    /// Send a friend request
    Request {
        /// User id to befriend
        id: String,
    },

    /// Accept a pending request
    Accept {
        /// Requesting user id
        id: String,
    },

    /// Decline a pending request
    Decline {
        /// Requesting user id
        id: String,
    },

    /// Remove a friend
    Remove {
        /// Friend's user id
        id: String,
    },

    /// List friends and pending requests
    List,
}

pub async fn friend_command(ledger: &Ledger, user_id: &str, command: FriendCommand) -> Result<()> {
    match command {
        FriendCommand::Request { id } => match ledger.send_friend_request(user_id, &id).await? {
            RequestOutcome::Sent => println!("Friend request sent to {}", id),
            RequestOutcome::Accepted => println!("{} had already asked: you are now friends", id),
            RequestOutcome::Unchanged => println!("Already friends with or waiting on {}", id),
        },
        FriendCommand::Accept { id } => {
            ledger.accept_friend_request(user_id, &id).await?;
            println!("You are now friends with {}", id);
        }
        FriendCommand::Decline { id } => {
            ledger.decline_friend_request(user_id, &id).await?;
            println!("Declined request from {}", id);
        }
        FriendCommand::Remove { id } => {
            if ledger.remove_friend(user_id, &id).await? {
                println!("Removed {} from friends", id);
            } else {
                println!("{} is not a friend", id);
            }
        }
        FriendCommand::List => {
            let friends = ledger.friends(user_id).await?;
            if friends.is_empty() {
                println!("No friends yet.");
            }
            for friend in friends {
                let best = friend
                    .categories
                    .iter()
                    .max_by_key(|(_, p)| (p.level, p.current_exp))
                    .map(|(c, p)| format!("{} L{}", c.label(), p.level))
                    .unwrap_or_default();
                println!("  {} ({})  {}", friend.username, friend.id, best);
            }

            let user = ledger.user(user_id).await?;
            if !user.friend_requests.is_empty() {
                println!("\nPending requests: {}", user.friend_requests.join(", "));
            }
        }
    }
    Ok(())
}
