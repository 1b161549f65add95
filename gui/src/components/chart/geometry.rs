// Pixel geometry for the line chart: value scaling, x positions, line segments.
use crate::config::ChartConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn from_config(chart: &ChartConfig) -> Self {
        Self {
            left: chart.margin_left,
            top: chart.margin_top,
            width: (chart.width - chart.margin_left - chart.margin_right).max(1.0),
            height: (chart.height - chart.margin_top - chart.margin_bottom).max(1.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Center of the slot of period `index` out of `count` evenly spaced periods.
    pub fn x(&self, index: usize, count: usize) -> f64 {
        if count == 0 {
            return self.left;
        }
        let slot = self.width / count as f64;
        self.left + slot * index as f64 + slot / 2.0
    }

    /// Width of one period slot; used for the hover bands.
    pub fn slot_width(&self, count: usize) -> f64 {
        if count == 0 {
            self.width
        } else {
            self.width / count as f64
        }
    }
}

/// Linear value axis, padded so lines never touch the plot edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
}

impl ValueScale {
    pub fn new(min: f64, max: f64) -> Self {
        if (max - min).abs() < f64::EPSILON {
            let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
            return Self { min: min - pad, max: max + pad };
        }
        let pad = (max - min) * 0.05;
        Self { min: min - pad, max: max + pad }
    }

    pub fn y(&self, value: f64, area: &PlotArea) -> f64 {
        let span = self.max - self.min;
        area.top + (self.max - value) / span * area.height
    }

    /// `count` evenly spaced tick values from min to max.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![(self.min + self.max) / 2.0],
            n => {
                let step = (self.max - self.min) / (n - 1) as f64;
                (0..n).map(|i| self.min + step * i as f64).collect()
            }
        }
    }
}

/// SVG `points` strings for each unbroken run of present values.
/// Missing values split the line instead of being bridged.
pub fn line_segments(values: &[Option<f64>], scale: &ValueScale, area: &PlotArea) -> Vec<String> {
    let count = values.len();
    let mut segments = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) => current.push(format!("{:.2},{:.2}", area.x(i, count), scale.y(*v, area))),
            None => {
                if !current.is_empty() {
                    segments.push(current.join(" "));
                    current.clear();
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current.join(" "));
    }
    segments
}

/// Indices of period labels to print so that at most `max_labels` appear.
pub fn label_stride(count: usize, max_labels: usize) -> usize {
    if max_labels == 0 || count <= max_labels {
        1
    } else {
        (count + max_labels - 1) / max_labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> PlotArea {
        PlotArea { left: 10.0, top: 0.0, width: 100.0, height: 50.0 }
    }

    #[test]
    fn test_x_positions_are_slot_centers() {
        let a = area();
        assert_eq!(a.x(0, 4), 22.5);
        assert_eq!(a.x(3, 4), 97.5);
        assert_eq!(a.x(0, 1), 60.0);
        assert_eq!(a.slot_width(4), 25.0);
    }

    #[test]
    fn test_value_scale_maps_top_and_bottom() {
        let scale = ValueScale { min: 0.0, max: 10.0 };
        let a = area();
        assert_eq!(scale.y(10.0, &a), 0.0);
        assert_eq!(scale.y(0.0, &a), 50.0);
        assert_eq!(scale.y(5.0, &a), 25.0);
    }

    #[test]
    fn test_flat_series_gets_padding() {
        let scale = ValueScale::new(5.0, 5.0);
        assert!(scale.min < 5.0 && scale.max > 5.0);
        let zero = ValueScale::new(0.0, 0.0);
        assert_eq!((zero.min, zero.max), (-1.0, 1.0));
    }

    #[test]
    fn test_missing_values_split_segments() {
        let scale = ValueScale { min: 0.0, max: 10.0 };
        let segments = line_segments(&[Some(1.0), Some(2.0), None, Some(3.0), None], &scale, &area());
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].split(' ').count(), 2);
        assert_eq!(segments[1], "70.00,35.00");
        assert!(line_segments(&[None, None], &scale, &area()).is_empty());
    }

    #[test]
    fn test_ticks() {
        let scale = ValueScale { min: 0.0, max: 10.0 };
        assert_eq!(scale.ticks(3), vec![0.0, 5.0, 10.0]);
        assert!(scale.ticks(0).is_empty());
    }

    #[test]
    fn test_label_stride() {
        assert_eq!(label_stride(12, 12), 1);
        assert_eq!(label_stride(25, 12), 3);
        assert_eq!(label_stride(5, 0), 1);
    }
}
