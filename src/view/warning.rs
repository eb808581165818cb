//! Warning text shown to the candidate.

/// Visual treatment of the warning text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarningStyle {
    #[default]
    Normal,
    /// Rendered in the alert color.
    Alert,
}

/// A single line of warning text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningLabel {
    text: String,
    style: WarningStyle,
}

impl WarningLabel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `message` in the alert style.
    pub fn alert(&mut self, message: &str) {
        self.text.clear();
        self.text.push_str(message);
        self.style = WarningStyle::Alert;
    }

    /// Empties the text. The style is left as is.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> WarningStyle {
        self.style
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_then_clear() {
        let mut label = WarningLabel::new();
        assert!(label.is_empty());
        assert_eq!(label.style(), WarningStyle::Normal);

        label.alert("Face not recognized");
        assert_eq!(label.text(), "Face not recognized");
        assert_eq!(label.style(), WarningStyle::Alert);

        label.clear();
        assert!(label.is_empty());
    }
}
