#![forbid(unsafe_code)]

//! Deterministic, collision-free identifier assignment.
//!
//! Identifiers follow the pattern `<prefix>-<n>`, where the prefix is the
//! widget kind with a trailing `-widget` suffix stripped (`text-widget`
//! numbers as `text-0`, `text-1`, ...). The next number is one past the
//! highest numeric suffix already in use with that prefix, so freed numbers
//! below the high-water mark are not reused.
//!
//! # Invariants
//!
//! 1. The returned widget's id is non-empty and absent from `existing`.
//! 2. A widget whose id is already unique (and not the kind sentinel) is
//!    returned unchanged, so re-running the allocator never renumbers
//!    unrelated widgets.

use ahash::AHashSet;

use crate::widget::{Widget, WidgetId};

/// Assign a guaranteed-unique id to `widget`, scanned against `existing`.
///
/// Three cases:
///
/// - empty or colliding id: allocate `<prefix>-<n>` with the `-widget`
///   suffix stripped from the kind;
/// - id literally equal to the kind (the "use a default id" sentinel):
///   allocate on the full kind as prefix, so `slider-widget` resolves to
///   `slider-widget-0`, then `slider-widget-1` once that is taken;
/// - otherwise: already unique, returned unchanged.
#[must_use]
pub fn with_unique_id(mut widget: Widget, existing: &AHashSet<WidgetId>) -> Widget {
    if widget.id.is_empty() || existing.contains(&widget.id) {
        widget.id = next_numbered_id(default_prefix(&widget.kind), existing);
    } else if widget.id == widget.kind {
        widget.id = next_numbered_id(&widget.kind, existing);
    }
    widget
}

/// Numbering prefix for a kind: strip one trailing `-widget` suffix.
fn default_prefix(kind: &str) -> &str {
    match kind.strip_suffix("-widget") {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => kind,
    }
}

/// Smallest id of the form `<prefix>-<n>` above every numeric suffix in use.
fn next_numbered_id(prefix: &str, existing: &AHashSet<WidgetId>) -> WidgetId {
    let mut highest: i64 = -1;
    for id in existing {
        let Some(suffix) = id
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('-'))
        else {
            continue;
        };
        if let Ok(number) = suffix.parse::<i64>() {
            highest = highest.max(number);
        }
    }
    format!("{prefix}-{}", highest + 1)
}

// ── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(kind: &str, id: &str) -> Widget {
        Widget {
            id: id.to_owned(),
            kind: kind.to_owned(),
            label: kind.to_owned(),
            inputs: indexmap::IndexMap::new(),
        }
    }

    fn ids(entries: &[&str]) -> AHashSet<WidgetId> {
        entries.iter().map(|id| (*id).to_owned()).collect()
    }

    #[test]
    fn empty_id_gets_stripped_prefix() {
        let assigned = with_unique_id(widget("text-widget", ""), &ids(&[]));
        assert_eq!(assigned.id, "text-0");
    }

    #[test]
    fn numbering_continues_past_highest() {
        let assigned = with_unique_id(widget("text-widget", ""), &ids(&["text-0", "text-4"]));
        assert_eq!(assigned.id, "text-5");
    }

    #[test]
    fn freed_numbers_below_high_water_mark_not_reused() {
        // text-1 was removed; the next allocation still goes above text-3.
        let assigned = with_unique_id(widget("text-widget", ""), &ids(&["text-0", "text-3"]));
        assert_eq!(assigned.id, "text-4");
    }

    #[test]
    fn unique_supplied_id_passes_through() {
        let assigned = with_unique_id(widget("text-widget", "headline"), &ids(&["text-0"]));
        assert_eq!(assigned.id, "headline");
    }

    #[test]
    fn colliding_supplied_id_is_reallocated() {
        let assigned = with_unique_id(widget("text-widget", "text-0"), &ids(&["text-0"]));
        assert_eq!(assigned.id, "text-1");
    }

    #[test]
    fn id_equal_to_kind_numbers_on_full_kind() {
        let first = with_unique_id(widget("slider-widget", "slider-widget"), &ids(&[]));
        assert_eq!(first.id, "slider-widget-0");

        let second = with_unique_id(
            widget("slider-widget", "slider-widget"),
            &ids(&["slider-widget-0"]),
        );
        assert_eq!(second.id, "slider-widget-1");
    }

    #[test]
    fn non_numeric_suffixes_ignored() {
        let assigned = with_unique_id(
            widget("text-widget", ""),
            &ids(&["text-abc", "text-2x", "text", "text-1"]),
        );
        assert_eq!(assigned.id, "text-2");
    }

    #[test]
    fn kind_without_widget_suffix_numbers_verbatim() {
        let assigned = with_unique_id(widget("clock", ""), &ids(&["clock-0"]));
        assert_eq!(assigned.id, "clock-1");
    }

    #[test]
    fn idempotent_against_own_result() {
        let existing = ids(&["text-0"]);
        let assigned = with_unique_id(widget("text-widget", ""), &existing);
        assert_eq!(assigned.id, "text-1");

        // Re-running against the workspace minus itself changes nothing.
        let rerun = with_unique_id(assigned.clone(), &existing);
        assert_eq!(rerun, assigned);
    }
}
