//! Layout-wide switches.

/// Options applied to every pass of a `GroupLayout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    /// Insert padding between adjacent components
    pub auto_create_gaps: bool,
    /// Insert padding between components and the host edges
    pub auto_create_container_gaps: bool,
    /// Invisible components are laid out as if absent
    pub honors_visibility: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            auto_create_gaps: false,
            auto_create_container_gaps: false,
            honors_visibility: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LayoutOptions::default();
        assert!(!options.auto_create_gaps);
        assert!(!options.auto_create_container_gaps);
        assert!(options.honors_visibility);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_json() {
        let options: LayoutOptions = serde_json::from_str(r#"{"auto_create_gaps": true}"#).unwrap();
        assert!(options.auto_create_gaps);
        assert!(options.honors_visibility);
    }
}
