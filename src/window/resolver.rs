use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::window::control::WindowControl;
use crate::window::handle::{WindowHandle, WindowQuery, WindowRole};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionCacheEntry {
    pub role: WindowRole,
    pub handle: WindowHandle,
    pub last_resolved: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub force_refresh: bool,
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            force_refresh: false,
            max_attempts: 1,
            retry_delay: Duration::ZERO,
        }
    }
}

impl ResolveOptions {
    pub fn forced() -> Self {
        Self {
            force_refresh: true,
            ..Self::default()
        }
    }

    pub fn forced_with_retries(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            force_refresh: true,
            max_attempts,
            retry_delay,
        }
    }
}

/// Memoized role -> window lookups.
///
/// A failed lookup never touches the cache, so a stale entry stays available
/// to later non-forced calls. Forced lookups use
/// [`WindowControl::find_fresh`] and are never rate limited away.
#[derive(Debug)]
pub struct WindowResolver {
    ui_query: WindowQuery,
    player_query: WindowQuery,
    ttl: Duration,
    entries: HashMap<WindowRole, ResolutionCacheEntry>,
}

impl WindowResolver {
    pub fn new(ui_query: WindowQuery, player_query: WindowQuery, ttl: Duration) -> Self {
        Self {
            ui_query,
            player_query,
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn query(&self, role: WindowRole) -> &WindowQuery {
        match role {
            WindowRole::UiWindow => &self.ui_query,
            WindowRole::PlayerWindow => &self.player_query,
        }
    }

    pub fn cached(&self, role: WindowRole) -> Option<ResolutionCacheEntry> {
        self.entries.get(&role).copied()
    }

    pub fn resolve(
        &mut self,
        control: &mut dyn WindowControl,
        role: WindowRole,
        opts: ResolveOptions,
    ) -> Option<WindowHandle> {
        if !opts.force_refresh {
            if let Some(entry) = self.entries.get(&role) {
                if entry.last_resolved.elapsed() < self.ttl {
                    return Some(entry.handle);
                }
            }
        }

        let attempts = opts.max_attempts.max(1);
        let query = self.query(role).clone();
        for attempt in 1..=attempts {
            let found = if opts.force_refresh {
                control.find_fresh(&query)
            } else {
                control.find(&query)
            };
            if let Some(handle) = found {
                tracing::debug!(%role, %handle, attempt, "window resolved");
                self.entries.insert(
                    role,
                    ResolutionCacheEntry {
                        role,
                        handle,
                        last_resolved: Instant::now(),
                    },
                );
                return Some(handle);
            }
            if attempt < attempts && !opts.retry_delay.is_zero() {
                std::thread::sleep(opts.retry_delay);
            }
        }
        tracing::debug!(%role, %query, attempts, "window not found");
        None
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
    }
}
