use anyhow::Result;
use tracing::{debug, info};

use crate::repository::{NewUser, UserRepository};

/// Demo accounts created on first start. `admin` is the designated
/// administrator; the rest are plain users.
pub const DEFAULT_USERS: [(&str, &str); 4] = [
    ("admin", "admin123"),
    ("user1", "password1"),
    ("user2", "password2"),
    ("artist", "paint123"),
];

/// Create [`DEFAULT_USERS`] if the user table is empty. All four accounts are
/// written in one transaction, so a failed start leaves the table empty and
/// the next start seeds again. Returns how many accounts were created.
pub fn seed_default_users(users: &UserRepository) -> Result<usize> {
    // Skip the hashing when there is nothing to do.
    let existing = users.count()?;
    if existing > 0 {
        debug!("{} users present, skipping default user seed", existing);
        return Ok(0);
    }

    let accounts = DEFAULT_USERS.map(|(username, password)| NewUser { username, password });
    let created = users.save_all_if_empty(&accounts)?;
    if created == 0 {
        debug!("Users appeared during seeding, skipping default user seed");
        return Ok(0);
    }

    info!("Default users created:");
    for (username, password) in DEFAULT_USERS {
        info!("{} / {}", username, password);
    }

    Ok(created)
}
