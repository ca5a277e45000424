use serde::{Deserialize, Serialize};

/// Line style for a plotted quantity. Unset fields inherit from whatever the
/// renderer already has, so styles can be layered.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dashed: Option<bool>,
}

impl PlotStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Black, one unit wide, solid.
    pub fn fallback() -> Self {
        Self {
            color: Some("black".to_string()),
            width: Some(1.0),
            is_dashed: Some(false),
        }
    }

    /// Sets the color unless `color` is absent or empty.
    pub fn with_color(mut self, color: Option<&str>) -> Self {
        if let Some(c) = color.filter(|c| !c.is_empty()) {
            self.color = Some(c.to_string());
        }
        self
    }

    /// Sets the width unless it is zero or not a number.
    pub fn with_width(mut self, width: f64) -> Self {
        if width != 0.0 && !width.is_nan() {
            self.width = Some(width);
        }
        self
    }

    pub fn with_dashed(mut self, is_dashed: bool) -> Self {
        self.is_dashed = Some(is_dashed);
        self
    }

    /// CSS border shorthand, e.g. `2px dashed #AA4644 ;`.
    pub fn border_style(&self) -> String {
        let mut style = String::new();
        if let Some(width) = self.width.filter(|w| *w != 0.0) {
            style.push_str(&format!("{}px ", width));
        }
        style.push_str(if self.is_dashed == Some(true) { "dashed " } else { "solid " });
        if let Some(color) = self.color.as_deref().filter(|c| !c.is_empty()) {
            style.push_str(color);
            style.push(' ');
        }
        style.push(';');
        style
    }
}

/// Base styles per unit and colors per phase.
#[derive(Clone, Debug, Default)]
pub struct StyleBook {
    unit_styles: Vec<(String, PlotStyle)>,
    phase_colors: Vec<(String, String)>,
}

impl StyleBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unit_style(&mut self, unit: &str, style: PlotStyle) {
        match self.unit_styles.iter_mut().find(|(u, _)| u == unit) {
            Some((_, existing)) => *existing = style,
            None => self.unit_styles.push((unit.to_string(), style)),
        }
    }

    pub fn add_phase_color(&mut self, phase: &str, color: &str) {
        match self.phase_colors.iter_mut().find(|(p, _)| p == phase) {
            Some((_, existing)) => *existing = color.to_string(),
            None => self.phase_colors.push((phase.to_string(), color.to_string())),
        }
    }

    /// The unit's base style (or the fallback) tinted with the phase color.
    pub fn resolve(&self, unit: Option<&str>, phase: Option<&str>) -> PlotStyle {
        let base = unit
            .and_then(|u| self.unit_styles.iter().find(|(name, _)| name == u))
            .map(|(_, style)| style.clone())
            .unwrap_or_else(PlotStyle::fallback);
        let color = phase.and_then(|p| {
            self.phase_colors
                .iter()
                .find(|(name, _)| name == p)
                .map(|(_, c)| c.as_str())
        });
        base.with_color(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falsy_arguments_leave_fields_unset() {
        let style = PlotStyle::new().with_width(0.0).with_color(Some("")).with_color(None);
        assert_eq!(style, PlotStyle::default());
    }

    #[test]
    fn builder_sets_fields() {
        let style = PlotStyle::new().with_width(2.0).with_color(Some("#4573A7")).with_dashed(true);
        assert_eq!(style.width, Some(2.0));
        assert_eq!(style.border_style(), "2px dashed #4573A7 ;");
    }

    #[test]
    fn resolve_layers_phase_color_over_unit_style() {
        let mut book = StyleBook::new();
        book.add_unit_style("Current", PlotStyle::new().with_width(2.0).with_dashed(true));
        book.add_phase_color("1", "#AA4644");

        let style = book.resolve(Some("Current"), Some("1"));
        assert_eq!(style.color.as_deref(), Some("#AA4644"));
        assert_eq!(style.is_dashed, Some(true));

        let unknown = book.resolve(Some("Power"), Some("9"));
        assert_eq!(unknown, PlotStyle::fallback());
    }
}
