use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// Positive availability cache: an entry means the username is TAKEN.
/// Absence means nothing; the cuckoo filter and the database decide.
///
/// Sized for a program that onboards cohorts of a few hundred interns at a
/// time. 12h TTL: registration bursts are short, stale entries only cost a
/// database round trip.
pub static USERNAME_CACHE: Lazy<Cache<String, bool>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(12 * 3600))
        .build()
});

/// Mark a single username as taken
pub async fn mark_taken(username: &str) {
    USERNAME_CACHE.insert(username.to_lowercase(), true).await;
}

/// Check if username is taken
pub async fn is_taken(username: &str) -> bool {
    USERNAME_CACHE
        .get(&username.to_lowercase())
        .await
        .unwrap_or(false)
}

async fn mark_many(usernames: &[String]) {
    let inserts: Vec<_> = usernames
        .iter()
        .map(|u| USERNAME_CACHE.insert(u.to_lowercase(), true))
        .collect();

    futures::future::join_all(inserts).await;
}

/// Preload usernames that are likely to collide with new registrations:
/// accounts that logged in recently, plus accounts created recently —
/// a freshly onboarded cohort exists before anyone in it has logged in.
pub async fn warmup_username_cache(pool: &MySqlPool, days: u32, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT username
        FROM users
        WHERE is_active = TRUE
          AND (last_login_at >= NOW() - INTERVAL ? DAY
               OR created_at >= NOW() - INTERVAL ? DAY)
        "#,
    )
    .bind(days)
    .bind(days)
    .fetch(pool);

    let mut pending = Vec::with_capacity(batch_size);
    let mut warmed = 0usize;

    while let Some(row) = stream.next().await {
        let (username,) = row?;
        pending.push(username);
        warmed += 1;

        if pending.len() >= batch_size {
            mark_many(&pending).await;
            pending.clear();
        }
    }

    if !pending.is_empty() {
        mark_many(&pending).await;
    }

    log::info!(
        "Username cache warmup complete: {} accounts active or created in the last {} days",
        warmed,
        days
    );

    Ok(())
}
