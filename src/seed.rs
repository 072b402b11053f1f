//! Deterministic fallback dataset.
//!
//! Used whenever the initial load yields nothing usable. The generator is a
//! fixed-seed xorshift sequence over a fixed vocabulary, so the same count
//! and base timestamp always produce the same tasks. No `rand` dependency is
//! needed for this.

use crate::fields::{Priority, Status};
use crate::task::Task;

/// Default number of generated tasks when no count is configured.
pub const DEFAULT_SEED_COUNT: usize = 50;

const SEED: u64 = 0x5173_ac5e_11d9_0b7f;

const ACTIVITIES: &[&str] = &[
    "Follow up with",
    "Demo call with",
    "Contract renewal for",
    "Proposal draft for",
    "Onboarding session for",
    "Upsell pitch to",
    "Quarterly review with",
    "Cold outreach to",
];

const CLIENTS: &[&str] = &[
    "Acme Corp",
    "Northwind",
    "Globex",
    "Initech",
    "Umbrella Ltd",
    "Stark Industries",
    "Wayne Enterprises",
    "Hooli",
    "Vandelay",
    "Pied Piper",
];

struct XorShift64(u64);

impl XorShift64 {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

/// Generate `count` tasks with creation times spread over the 30 days
/// preceding `base_ts`. Same inputs, same output.
pub fn generate_tasks(count: usize, base_ts: i64) -> Vec<Task> {
    let mut rng = XorShift64(SEED);
    let mut tasks = Vec::with_capacity(count);
    for i in 0..count {
        let activity = ACTIVITIES[rng.below(ACTIVITIES.len() as u64) as usize];
        let client = CLIENTS[rng.below(CLIENTS.len() as u64) as usize];
        let status = match rng.below(3) {
            0 => Status::Todo,
            1 => Status::InProgress,
            _ => Status::Done,
        };
        let priority = match rng.below(3) {
            0 => Priority::High,
            1 => Priority::Medium,
            _ => Priority::Low,
        };
        // Revenue in 250..=10_000, half-hour granularity in 0.5..=16 hours.
        let revenue = 250.0 + rng.below(391) as f64 * 25.0;
        let time_taken = 0.5 + rng.below(32) as f64 * 0.5;
        let created_at_utc = base_ts - rng.below(30 * 24 * 3600) as i64;
        let completed_at_utc = if status == Status::Done {
            Some(created_at_utc + rng.below(7 * 24 * 3600) as i64)
        } else {
            None
        };
        tasks.push(Task {
            id: i as u64 + 1,
            title: format!("{activity} {client}"),
            status,
            priority,
            revenue,
            time_taken,
            created_at_utc,
            completed_at_utc,
        });
    }
    tasks
}
