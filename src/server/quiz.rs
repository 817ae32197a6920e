use rand::Rng;
use sqlx::SqlitePool;

use crate::db::{queries::questions, Question};

/// Which questions may be drawn in a quiz turn. Category id `0` means any category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySelector {
    Any,
    Only(i64),
}

impl CategorySelector {
    pub fn from_id(id: i64) -> Self {
        match id {
            0 => Self::Any,
            id => Self::Only(id),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Any => "all".to_owned(),
            Self::Only(id) => id.to_string(),
        }
    }
}

pub async fn fetch_candidates(
    pool: &SqlitePool,
    selector: CategorySelector,
) -> sqlx::Result<Vec<Question>> {
    match selector {
        CategorySelector::Any => questions::get_all_questions(pool).await,
        CategorySelector::Only(id) => questions::get_questions_for_category(pool, id).await,
    }
}

/// Draws the next question uniformly from `candidates`.
///
/// Already served ids are only removed from the pool when `exclude_previous` is set; otherwise
/// a question may come up again within the same session. `None` means the pool is exhausted.
pub fn select_next<R>(
    mut candidates: Vec<Question>,
    previous: &[i64],
    exclude_previous: bool,
    rng: &mut R,
) -> Option<Question>
where
    R: Rng + ?Sized,
{
    if exclude_previous {
        candidates.retain(|q| !previous.contains(&q.id));
    }
    if candidates.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..candidates.len());
    Some(candidates.swap_remove(idx))
}
