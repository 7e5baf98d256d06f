use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;

/// Sized for a few cohorts of interns plus staff; the filter grows on its
/// own past this.
const FILTER_CAPACITY: usize = 50_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static USERNAME_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

#[inline]
fn normalize(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Check if a username might exist (false positives possible)
pub fn might_exist(username: &str) -> bool {
    let username = normalize(username);
    USERNAME_FILTER
        .read()
        .expect("username filter poisoned")
        .contains(&username)
}

/// Insert a single username into the filter
pub fn insert(username: &str) {
    let username = normalize(username);
    USERNAME_FILTER
        .write()
        .expect("username filter poisoned")
        .add(&username);
}

/// Populate the filter from the users table, streaming in batches so the
/// write lock is not held across row fetches.
pub async fn warmup_username_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String,)>("SELECT username FROM users").fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (username,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(normalize(&username));
        total += 1;

        if batch.len() == batch_size {
            insert_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch);
    }

    log::info!("Username filter warmup complete: {} accounts", total);
    Ok(())
}

fn insert_batch(usernames: &[String]) {
    let mut filter = USERNAME_FILTER.write().expect("username filter poisoned");

    for username in usernames {
        filter.add(username);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_might_exist() {
        insert("Freshly.Registered");
        // Normalization means lookups are case-insensitive.
        assert!(might_exist("freshly.registered"));
        assert!(might_exist("  FRESHLY.REGISTERED  "));
    }
}
