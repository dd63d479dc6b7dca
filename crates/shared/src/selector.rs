//! Priority-ordered paper selection.

use crate::arxiv::PaperSource;
use crate::models::PaperRecord;

/// Pick the first available paper walking `categories` in priority order.
///
/// Each category is asked for its newest paper and the first one that yields
/// a result wins; nothing below it is fetched. A category with no papers is
/// skipped silently. A category whose fetch fails is skipped too, with a
/// warning, so a broken feed cannot mask the categories below it.
///
/// Returns `None` when every category is exhausted.
pub async fn select_paper(
    source: &dyn PaperSource,
    categories: &[String],
) -> Option<PaperRecord> {
    for category in categories {
        match source.fetch_latest(category).await {
            Ok(Some(paper)) => return Some(paper),
            Ok(None) => {
                println!("  No papers found for category {}", category);
            }
            Err(e) => {
                tracing::warn!(category = %category, error = %e, "Fetch failed, skipping category");
            }
        }
    }
    None
}
