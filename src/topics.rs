//! Weighted random topic selection.
//!
//! Each topic is picked with probability `weight / total_weight`, where weights
//! of zero or less count as one.

use crate::config::{DEFAULT_TOPIC, TopicConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Pick a topic name at random, weighted by each topic's `weight`.
///
/// The RNG is freshly seeded from the OS on every call. Topics are walked in
/// list order, accumulating weight, and the first topic whose running total
/// exceeds the roll wins.
///
/// # Arguments
///
/// * `topics` - Configured topics; weights of zero or less count as one
///
/// # Returns
///
/// The name of the chosen topic, or [`DEFAULT_TOPIC`] when `topics` is empty.
/// Config loading guarantees at least one topic, so callers only see the
/// fallback if that guarantee was bypassed.
///
/// # Examples
///
/// ```ignore
/// let topics = vec![heavy_topic("Rust", 10), light_topic("Go", 1)];
/// let picked = select_topic(&topics);
/// assert!(picked == "Rust" || picked == "Go");
/// ```
pub fn select_topic(topics: &[TopicConfig]) -> String {
    let mut rng = StdRng::from_os_rng();
    select_topic_with(topics, &mut rng)
}

/// Same as [`select_topic`] with a caller-provided RNG.
pub fn select_topic_with<R: Rng + ?Sized>(topics: &[TopicConfig], rng: &mut R) -> String {
    if topics.is_empty() {
        warn!(fallback = DEFAULT_TOPIC, "No topics to choose from; using fallback topic");
        return DEFAULT_TOPIC.to_string();
    }

    // u128 so that any number of i64 weights sums without overflow.
    let total: u128 = topics.iter().map(effective_weight).sum();
    let roll = rng.random_range(0..total);

    let mut cumulative = 0u128;
    for topic in topics {
        cumulative += effective_weight(topic);
        if roll < cumulative {
            debug!(topic = %topic.name, roll, total, "Selected topic");
            return topic.name.clone();
        }
    }

    // roll < total, so the walk above always returns.
    topics[0].name.clone()
}

fn effective_weight(topic: &TopicConfig) -> u128 {
    if topic.weight <= 0 {
        1
    } else {
        topic.weight as u128
    }
}
