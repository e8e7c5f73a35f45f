use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::models::Question;

/// Target count that switches question delivery into the composite assembly mode.
pub(crate) const COMPOSITE_TARGET: usize = 40;

const GENERAL_STAGE_COUNT: usize = 25;
const QUOTA_STAGE_COUNT: usize = 5;
const QUOTA_TASK_TYPES: [i32; 3] = [6, 8, 10];

/// Picks the questions delivered for one attempt at a test.
///
/// Privileged callers get the full pool back for preview. Everyone else gets
/// either a uniform sample (`target_count != 40`) or the staged composite
/// build. Pool shortfalls degrade the count, never error.
pub(crate) fn select_questions<R: Rng>(
    pool: Vec<Question>,
    target_count: usize,
    privileged: bool,
    rng: &mut R,
) -> Vec<Question> {
    if privileged {
        return pool;
    }
    if target_count == 0 || pool.is_empty() {
        return Vec::new();
    }
    if target_count == COMPOSITE_TARGET {
        return select_composite(&pool, rng);
    }

    let mut sampled = pool;
    sampled.shuffle(rng);
    sampled.truncate(target_count);
    sampled
}

/// Four-stage quota assembly for the 40-question composite mode.
/// Stage order is preserved in the output; randomness is confined to the
/// cluster pick and the backfills.
fn select_composite<R: Rng>(pool: &[Question], rng: &mut R) -> Vec<Question> {
    let mut used: HashSet<String> = HashSet::new();
    let mut selected: Vec<Question> = Vec::with_capacity(COMPOSITE_TARGET);

    // Stage 1: up to 25 questions outside the quota task types, in pool order.
    let general: Vec<&Question> =
        pool.iter().filter(|question| !is_quota_type(question)).collect();
    for question in general.into_iter().take(GENERAL_STAGE_COUNT) {
        push_unique(question, &mut used, &mut selected);
    }

    // Stage 2: 5 of task_type 10, sampled from a source_text cluster of >= 5
    // (a shared passage with its sub-questions). No cluster: uniform sample.
    let tens: Vec<&Question> =
        pool.iter().filter(|question| question.task_type == Some(10)).collect();
    let stage_two = match source_text_cluster(&tens, QUOTA_STAGE_COUNT) {
        Some(cluster) => sample(&cluster, QUOTA_STAGE_COUNT, rng),
        None => sample(&tens, QUOTA_STAGE_COUNT, rng),
    };
    for question in stage_two {
        push_unique(question, &mut used, &mut selected);
    }

    // Stages 3 and 4: first-encountered quota picks with random backfill.
    take_with_backfill(pool, 8, QUOTA_STAGE_COUNT, &mut used, &mut selected, rng);
    take_with_backfill(pool, 6, QUOTA_STAGE_COUNT, &mut used, &mut selected, rng);

    // Final backfill covers shortfalls from any earlier stage.
    if selected.len() < COMPOSITE_TARGET {
        backfill(pool, COMPOSITE_TARGET - selected.len(), &mut used, &mut selected, rng);
    }
    selected.truncate(COMPOSITE_TARGET);
    selected
}

fn is_quota_type(question: &Question) -> bool {
    matches!(question.task_type, Some(code) if QUOTA_TASK_TYPES.contains(&code))
}

fn push_unique(question: &Question, used: &mut HashSet<String>, selected: &mut Vec<Question>) {
    if used.insert(question.id.clone()) {
        selected.push(question.clone());
    }
}

fn sample<'a, R: Rng>(items: &[&'a Question], count: usize, rng: &mut R) -> Vec<&'a Question> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}

/// First `source_text` value (in pool order) backed by at least `size`
/// questions; returns the whole cluster for the caller to sample from.
fn source_text_cluster<'a>(
    items: &[&'a Question],
    size: usize,
) -> Option<Vec<&'a Question>> {
    for candidate in items {
        let Some(source) = candidate.source_text.as_deref() else {
            continue;
        };
        let cluster: Vec<&Question> = items
            .iter()
            .filter(|question| question.source_text.as_deref() == Some(source))
            .copied()
            .collect();
        if cluster.len() >= size {
            return Some(cluster);
        }
    }
    None
}

/// Takes the first `count` questions of `task_type` in pool order, then
/// tops up from the unused remainder at random.
fn take_with_backfill<R: Rng>(
    pool: &[Question],
    task_type: i32,
    count: usize,
    used: &mut HashSet<String>,
    selected: &mut Vec<Question>,
    rng: &mut R,
) {
    let before = selected.len();
    for question in pool.iter().filter(|question| question.task_type == Some(task_type)) {
        if selected.len() - before >= count {
            break;
        }
        push_unique(question, used, selected);
    }
    let taken = selected.len() - before;
    if taken < count {
        backfill(pool, count - taken, used, selected, rng);
    }
}

fn backfill<R: Rng>(
    pool: &[Question],
    count: usize,
    used: &mut HashSet<String>,
    selected: &mut Vec<Question>,
    rng: &mut R,
) {
    let remaining: Vec<&Question> =
        pool.iter().filter(|question| !used.contains(question.id.as_str())).collect();
    for question in sample(&remaining, count, rng) {
        push_unique(question, used, selected);
    }
}
