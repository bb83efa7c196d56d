//! Reciprocity check between the two sides of the follow graph

use std::collections::HashSet;

use crate::types::UserRecord;

/// Accounts in `following` whose username does not appear in `followers`,
/// in `following` order. Usernames are compared exactly, without case
/// folding.
pub fn diff(following: &[UserRecord], followers: &[UserRecord]) -> Vec<UserRecord> {
    let follower_names: HashSet<&str> = followers.iter().map(|u| u.username.as_str()).collect();

    following
        .iter()
        .filter(|user| !follower_names.contains(user.username.as_str()))
        .cloned()
        .collect()
}
