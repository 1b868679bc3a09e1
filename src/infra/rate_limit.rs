use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use redis::{Script, aio::ConnectionManager};

use super::InfraError;
use crate::app_error::{AppError, AppResult};

/// Trait for rate limiting implementations.
#[async_trait]
pub trait RateLimiterTrait: Send + Sync {
    /// Count one request from `ip`.
    /// Returns Ok(()) if within limits, Err(AppError::RateLimited) if exceeded.
    async fn check(&self, ip: &str) -> AppResult<()>;
}

/// Lua script for atomic increment with TTL.
/// Returns the new count after increment.
/// If the key doesn't exist, it's created with TTL.
/// If the key exists but has no TTL, TTL is set.
const INCR_WITH_TTL_SCRIPT: &str = r#"
local current = redis.call('INCR', KEYS[1])
if current == 1 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
elseif redis.call('TTL', KEYS[1]) == -1 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return current
"#;

/// Redis-backed rate limiter, shared across instances.
#[derive(Clone)]
pub struct RedisRateLimiter {
    manager: ConnectionManager,
    window_secs: u64,
    max_per_ip: u64,
    script: Script,
}

impl RedisRateLimiter {
    pub async fn new(redis_url: &str, window_secs: u64, max_per_ip: u64) -> Result<Self, InfraError> {
        let client = redis::Client::open(redis_url).map_err(InfraError::RedisConnection)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(InfraError::RedisConnection)?;
        let script = Script::new(INCR_WITH_TTL_SCRIPT);
        Ok(Self {
            manager,
            window_secs,
            max_per_ip,
            script,
        })
    }
}

#[async_trait]
impl RateLimiterTrait for RedisRateLimiter {
    async fn check(&self, ip: &str) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let current: u64 = self
            .script
            .key(format!("waitlist:rate:ip:{ip}"))
            .arg(self.window_secs)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if current > self.max_per_ip {
            return Err(AppError::RateLimited);
        }
        Ok(())
    }
}

/// Fixed-window limiter kept in process memory. Used when no Redis is configured.
pub struct InMemoryRateLimiter {
    window: Duration,
    max_per_ip: u64,
    state: Mutex<WindowState>,
}

struct WindowState {
    counters: HashMap<String, (Instant, u64)>,
    last_sweep: Instant,
}

impl InMemoryRateLimiter {
    pub fn new(window_secs: u64, max_per_ip: u64) -> Self {
        Self {
            window: Duration::from_secs(window_secs),
            max_per_ip,
            state: Mutex::new(WindowState {
                counters: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    /// A limiter that never rejects.
    pub fn permissive() -> Self {
        Self::new(60, u64::MAX)
    }

    fn bump(&self, ip: &str, now: Instant) -> AppResult<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| AppError::Internal("rate limiter lock poisoned".into()))?;

        // Expired windows of idle addresses are dropped at most once per window.
        let window = self.window;
        if now.saturating_duration_since(state.last_sweep) >= window {
            state
                .counters
                .retain(|_, (started, _)| now.saturating_duration_since(*started) < window);
            state.last_sweep = now;
        }

        let entry = state.counters.entry(ip.to_string()).or_insert((now, 0));
        if now.saturating_duration_since(entry.0) >= window {
            *entry = (now, 0);
        }
        entry.1 = entry.1.saturating_add(1);
        if entry.1 > self.max_per_ip {
            return Err(AppError::RateLimited);
        }
        Ok(())
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.state.lock().unwrap().counters.len()
    }
}

#[async_trait]
impl RateLimiterTrait for InMemoryRateLimiter {
    async fn check(&self, ip: &str) -> AppResult<()> {
        self.bump(ip, Instant::now())
    }
}
