//! Passing a cache through an application context.
//!
//! The cache is built once at startup from configuration and handed to
//! request handlers inside a context struct, so tests and separate
//! subsystems can each own an independent instance.
//!
//! Run with `cargo run --example request_context`.

use slot_lru::config::SlotLruConfig;
use slot_lru::metrics::CacheMetrics;
use slot_lru::{CapacityError, SlotLruCache};
use std::time::Duration;

/// Settings read at startup.
struct Settings {
    profile_cache_entries: usize,
    profile_ttl: Duration,
}

/// Everything a request handler needs.
struct AppContext {
    profiles: SlotLruCache<u64, Profile>,
    backend_calls: u32,
}

#[derive(Debug, Clone)]
struct Profile {
    user_id: u64,
    display_name: String,
}

impl AppContext {
    fn new(settings: &Settings) -> Result<Self, CapacityError> {
        let config =
            SlotLruConfig::new(settings.profile_cache_entries).with_ttl(settings.profile_ttl);
        Ok(Self {
            profiles: SlotLruCache::init(config, None)?,
            backend_calls: 0,
        })
    }

    /// Stand-in for a database or RPC lookup.
    fn load_profile(&mut self, user_id: u64) -> Profile {
        self.backend_calls += 1;
        Profile {
            user_id,
            display_name: format!("user-{user_id}"),
        }
    }
}

/// Handles one request, reading through the profile cache.
fn handle_request(ctx: &mut AppContext, user_id: u64) -> String {
    if let Some(profile) = ctx.profiles.get(&user_id) {
        return format!("hello again, {}", profile.display_name);
    }
    let profile = ctx.load_profile(user_id);
    let greeting = format!("hello, {}", profile.display_name);
    ctx.profiles.set(profile.user_id, profile);
    greeting
}

fn main() -> Result<(), CapacityError> {
    let settings = Settings {
        profile_cache_entries: 2,
        profile_ttl: Duration::from_secs(300),
    };
    let mut ctx = AppContext::new(&settings)?;

    for user_id in [1, 2, 1, 3, 2, 1] {
        println!("{}", handle_request(&mut ctx, user_id));
    }

    println!("backend calls: {}", ctx.backend_calls);
    for (name, value) in ctx.profiles.metrics() {
        println!("{name:>16}: {value}");
    }

    // A misconfigured capacity is caught at startup, not on the first request.
    let broken = Settings {
        profile_cache_entries: 0,
        profile_ttl: Duration::from_secs(1),
    };
    if let Err(err) = AppContext::new(&broken) {
        println!("rejected configuration: {err}");
    }

    Ok(())
}
