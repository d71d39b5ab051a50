use serde::Serialize;
use std::fmt;

/// EPA AQI categories, safest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthyForSensitiveGroups,
    #[serde(rename = "Unhealthy")]
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    #[serde(rename = "Hazardous")]
    Hazardous,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Good,
        Category::Moderate,
        Category::UnhealthyForSensitiveGroups,
        Category::Unhealthy,
        Category::VeryUnhealthy,
        Category::Hazardous,
    ];

    /// Map an AQI index onto its category. Boundary values belong to the
    /// lower band, so 50 is Good and 51 is Moderate.
    pub fn from_index(index: u16) -> Self {
        match index {
            0..=50 => Category::Good,
            51..=100 => Category::Moderate,
            101..=150 => Category::UnhealthyForSensitiveGroups,
            151..=200 => Category::Unhealthy,
            201..=300 => Category::VeryUnhealthy,
            _ => Category::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very Unhealthy",
            Category::Hazardous => "Hazardous",
        }
    }

    /// EPA display color as a hex string without the leading `#`.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Good => "00E400",
            Category::Moderate => "FFFF00",
            Category::UnhealthyForSensitiveGroups => "FF7E00",
            Category::Unhealthy => "FF0000",
            Category::VeryUnhealthy => "8F3F97",
            Category::Hazardous => "7E0023",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Category::Good)]
    #[case(50, Category::Good)]
    #[case(51, Category::Moderate)]
    #[case(100, Category::Moderate)]
    #[case(101, Category::UnhealthyForSensitiveGroups)]
    #[case(150, Category::UnhealthyForSensitiveGroups)]
    #[case(151, Category::Unhealthy)]
    #[case(200, Category::Unhealthy)]
    #[case(201, Category::VeryUnhealthy)]
    #[case(300, Category::VeryUnhealthy)]
    #[case(301, Category::Hazardous)]
    #[case(500, Category::Hazardous)]
    #[case(999, Category::Hazardous)]
    fn category_boundaries(#[case] index: u16, #[case] expected: Category) {
        assert_eq!(Category::from_index(index), expected);
    }

    #[test]
    fn labels_and_colors() {
        assert_eq!(Category::from_index(50).label(), "Good");
        assert_eq!(Category::from_index(51).label(), "Moderate");
        assert_eq!(Category::from_index(500).label(), "Hazardous");
        assert_eq!(Category::Good.color(), "00E400");
        assert_eq!(Category::UnhealthyForSensitiveGroups.color(), "FF7E00");
        assert_eq!(Category::Hazardous.color(), "7E0023");
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Category::UnhealthyForSensitiveGroups).unwrap();
        assert_eq!(json, "\"Unhealthy for Sensitive Groups\"");
    }

    #[test]
    fn ordering_follows_severity() {
        assert!(Category::Good < Category::Moderate);
        assert!(Category::VeryUnhealthy < Category::Hazardous);
    }
}
