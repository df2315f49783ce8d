//! Tab strip geometry
//!
//! Pure width/position math. The widget feeds it measurements read from the
//! DOM and writes the results back as inline styles and a scoped style block.

use crate::classes;
use crate::options::TabStripOptions;

/// Measurements a reflow starts from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripMetrics {
    /// Inner width of the `.chrome-tabs-content` element
    pub content_width: f32,
    /// Width of the add button, 0 when there is none
    pub add_button_width: f32,
    /// Number of tabs in the strip
    pub tab_count: usize,
}

/// Result of a reflow
#[derive(Debug, Clone, PartialEq)]
pub struct TabLayout {
    /// Width every tab gets
    pub tab_width: f32,
    /// Horizontal offset of each tab, in DOM order
    pub positions: Vec<f32>,
}

impl TabLayout {
    /// Compute widths and positions for the given measurements
    pub fn compute(options: &TabStripOptions, metrics: &StripMetrics) -> Self {
        let tab_width = tab_width(options, metrics);
        let step = effective_width(options, tab_width);
        Self {
            tab_width,
            positions: tab_positions(metrics.tab_count, step),
        }
    }
}

/// Width of a single tab
///
/// Tabs stay at `max_width` while all of them plus the add button fit;
/// past that they shrink evenly, never leaving `[min_width, max_width]`.
pub fn tab_width(options: &TabStripOptions, metrics: &StripMetrics) -> f32 {
    let count = metrics.tab_count;
    if count == 0 {
        return options.max_width;
    }

    let gap = options.add_button_gap;
    let total_at_max = total_width(options, options.max_width, count);
    if total_at_max + metrics.add_button_width + gap <= metrics.content_width {
        return options.max_width;
    }

    let available = (metrics.content_width - metrics.add_button_width - gap).max(0.0);
    let overlap = options.tab_overlap_distance;
    let width = (available - overlap) / count as f32 + overlap;
    // not f32::clamp: a misconfigured min > max must not panic
    options.min_width.max(options.max_width.min(width))
}

/// Span of `count` overlapping tabs of `width`
pub fn total_width(options: &TabStripOptions, width: f32, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    width + (count - 1) as f32 * (width - options.tab_overlap_distance)
}

/// Spacing step between adjacent tabs
pub fn effective_width(options: &TabStripOptions, tab_width: f32) -> f32 {
    tab_width - options.tab_overlap_distance
}

/// Left offsets of `count` tabs spaced `step` apart
pub fn tab_positions(count: usize, step: f32) -> Vec<f32> {
    (0..count).map(|i| i as f32 * step).collect()
}

/// Left offset of the add button inside the content element, rounded to
/// whole pixels
pub fn add_button_left(
    options: &TabStripOptions,
    layout: &TabLayout,
    content_width: f32,
    add_button_width: f32,
) -> f32 {
    let max_left = (content_width - add_button_width).max(0.0);
    let left = match layout.positions.last() {
        Some(&last) => {
            let last_right = last + layout.tab_width - options.tab_overlap_distance;
            (last_right + options.add_button_gap).min(max_left)
        }
        None => options.add_button_gap.min(max_left),
    };
    left.round()
}

/// Style block placing each tab by `nth-child`, scoped to one strip instance
pub fn position_rules(instance_id: u32, positions: &[f32]) -> String {
    positions
        .iter()
        .enumerate()
        .map(|(i, left)| {
            format!(
                ".{}[{}=\"{}\"] .{}:nth-child({}) {{\n  transform: translate3d({}px, 0, 0)\n}}\n",
                classes::STRIP,
                classes::INSTANCE_ATTR,
                instance_id,
                classes::TAB,
                i + 1,
                left
            )
        })
        .collect()
}

/// `translate3d` value for a horizontal offset
pub fn translate_x(x: f32) -> String {
    format!("translate3d({}px, 0, 0)", x)
}
