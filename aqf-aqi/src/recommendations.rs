//! Health guidance per pollutant and category.
//!
//! Only PM2.5 guidance is published here; every other pollutant reports
//! [`AqiError::UnsupportedPollutant`] and callers decide how to degrade.

use crate::category::Category;
use crate::error::{AqiError, Result};
use crate::pollutant::Pollutant;

const ASTHMA_TIP: &str =
    "People with asthma: Follow your asthma action plan and keep quick-relief medicine handy.";

const HEART_TIP: &str = "People with heart disease: Symptoms such as palpitations, shortness of breath, or unusual fatigue may indicate a serious problem. If you have any of these, contact your health care provider.";

static PM25_GOOD: [&str; 1] = ["It's a great day to be active outside."];

static PM25_MODERATE: [&str; 1] = [
    "Unusually sensitive people: Consider making outdoor activities shorter and less intense. Go inside if you have symptoms such as coughing or shortness of breath.",
];

static PM25_SENSITIVE: [&str; 3] = [
    "Sensitive groups: Make outdoor activities shorter and less intense. It's OK to be active outdoors but take more breaks. Watch for symptoms such as coughing or shortness of breath.",
    ASTHMA_TIP,
    HEART_TIP,
];

static PM25_UNHEALTHY: [&str; 4] = [
    ASTHMA_TIP,
    HEART_TIP,
    "Sensitive groups: Consider rescheduling or moving all activities inside. Go inside if you have symptoms.",
    "Everyone else: Keep outdoor activities shorter and less intense. Go inside if you have symptoms.",
];

static PM25_VERY_UNHEALTHY: [&str; 4] = [
    ASTHMA_TIP,
    HEART_TIP,
    "Sensitive groups: Avoid all physical activity outdoors. Reschedule to a time when air quality is better or move activities indoors.",
    "Everyone else: Limit outdoor physical activity. Go indoors if you have symptoms.",
];

static PM25_HAZARDOUS: [&str; 4] = [
    ASTHMA_TIP,
    HEART_TIP,
    "Sensitive groups: Stay indoors and keep activity levels light. Follow tips for keeping particle levels low indoors.",
    "Everyone: Avoid all physical activity outdoors.",
];

fn pm25(category: Category) -> &'static [&'static str] {
    match category {
        Category::Good => &PM25_GOOD,
        Category::Moderate => &PM25_MODERATE,
        Category::UnhealthyForSensitiveGroups => &PM25_SENSITIVE,
        Category::Unhealthy => &PM25_UNHEALTHY,
        Category::VeryUnhealthy => &PM25_VERY_UNHEALTHY,
        Category::Hazardous => &PM25_HAZARDOUS,
    }
}

/// Ordered guidance strings for a pollutant at a category.
pub fn recommendations_for(
    pollutant: Pollutant,
    category: Category,
) -> Result<&'static [&'static str]> {
    match pollutant {
        Pollutant::Pm25 => Ok(pm25(category)),
        _ => Err(AqiError::UnsupportedPollutant {
            pollutant,
            category,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pm25_has_guidance_for_every_category() {
        for category in Category::ALL {
            let tips = recommendations_for(Pollutant::Pm25, category).unwrap();
            assert!(!tips.is_empty(), "{} should have guidance", category);
        }
    }

    #[test]
    fn pm25_guidance_order() {
        let good = recommendations_for(Pollutant::Pm25, Category::Good).unwrap();
        assert_eq!(good, ["It's a great day to be active outside."]);

        let sensitive =
            recommendations_for(Pollutant::Pm25, Category::UnhealthyForSensitiveGroups).unwrap();
        assert_eq!(sensitive.len(), 3);
        assert!(sensitive[0].starts_with("Sensitive groups"));
        assert_eq!(sensitive[1], ASTHMA_TIP);
        assert_eq!(sensitive[2], HEART_TIP);

        let hazardous = recommendations_for(Pollutant::Pm25, Category::Hazardous).unwrap();
        assert_eq!(hazardous[3], "Everyone: Avoid all physical activity outdoors.");
    }

    #[test]
    fn other_pollutants_are_unsupported() {
        for pollutant in Pollutant::ALL.into_iter().filter(|p| *p != Pollutant::Pm25) {
            assert_eq!(
                recommendations_for(pollutant, Category::Moderate),
                Err(AqiError::UnsupportedPollutant {
                    pollutant,
                    category: Category::Moderate,
                })
            );
        }
    }
}
